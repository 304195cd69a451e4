use paramorph_image::{Image, ImageError};
use paramorph_tensor::get_strides_from_shape;
use rayon::prelude::*;

/// Pad an image symmetrically with a constant value.
///
/// Every axis `a` grows by `padding[a]` samples on both sides, so the destination must have shape
/// `src.shape[a] + 2 * padding[a]`. The source lands in the centre of `dst`; everything else is
/// filled with `constant_value`.
///
/// # Arguments
///
/// * `src` - The source image to pad.
/// * `dst` - The destination image where the padded output will be stored.
/// * `padding` - The margin added on each side of every axis.
/// * `constant_value` - The value of the added border.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if `dst` does not have the padded shape.
///
/// # Examples
///
/// ```rust
/// use paramorph_image::Image;
/// use paramorph_imgproc::padding::pad_constant;
///
/// let image = Image::<u8, 2>::new([1, 2], vec![1, 2]).unwrap();
/// let mut padded = Image::<u8, 2>::from_size_val([3, 2], 0);
///
/// pad_constant(&image, &mut padded, [1, 0], 9).unwrap();
/// assert_eq!(padded.as_slice(), &[9, 9, 1, 2, 9, 9]);
/// ```
pub fn pad_constant<T, const N: usize>(
    src: &Image<T, N>,
    dst: &mut Image<T, N>,
    padding: [usize; N],
    constant_value: T,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    let mut expected = src.shape;
    for (e, p) in expected.iter_mut().zip(padding) {
        *e += 2 * p;
    }
    if dst.shape != expected {
        return Err(ImageError::InvalidImageSize(
            dst.shape.to_vec(),
            expected.to_vec(),
        ));
    }
    if N == 0 || dst.numel() == 0 {
        return Ok(());
    }

    let src_shape = src.shape;
    let src_strides = src.strides;
    let dst_row = dst.shape[N - 1];
    let src_row = src_shape[N - 1];
    let row_strides = row_strides(dst.shape);
    let src_data = src.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(dst_row)
        .enumerate()
        .for_each(|(r, row)| {
            row.fill(constant_value);
            // offset of the matching source row, if this row crosses the source region
            let mut offset = 0;
            for a in 0..N - 1 {
                let idx = (r / row_strides[a]) % expected[a];
                if idx < padding[a] || idx >= padding[a] + src_shape[a] {
                    return;
                }
                offset += (idx - padding[a]) * src_strides[a];
            }
            let start = padding[N - 1];
            row[start..start + src_row].copy_from_slice(&src_data[offset..offset + src_row]);
        });

    Ok(())
}

/// Crop an N-dimensional region out of an image.
///
/// # Arguments
///
/// * `src` - The source image to crop.
/// * `dst` - The destination image, whose shape is the size of the region.
/// * `offset` - The index of the first sample of the region in `src`.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if the region does not fit inside `src`.
///
/// # Examples
///
/// ```rust
/// use paramorph_image::Image;
/// use paramorph_imgproc::padding::crop;
///
/// let image = Image::<u8, 2>::new([3, 3], (0..9).collect()).unwrap();
/// let mut cropped = Image::<u8, 2>::from_size_val([2, 2], 0);
///
/// crop(&image, &mut cropped, [1, 1]).unwrap();
/// assert_eq!(cropped.as_slice(), &[4, 5, 7, 8]);
/// ```
pub fn crop<T, const N: usize>(
    src: &Image<T, N>,
    dst: &mut Image<T, N>,
    offset: [usize; N],
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    if (0..N).any(|a| offset[a] + dst.shape[a] > src.shape[a]) {
        return Err(ImageError::InvalidImageSize(
            src.shape.to_vec(),
            dst.shape.to_vec(),
        ));
    }
    if N == 0 || dst.numel() == 0 {
        return Ok(());
    }

    let dst_shape = dst.shape;
    let dst_row = dst_shape[N - 1];
    let row_strides = row_strides(dst_shape);
    let src_strides = src.strides;
    let src_data = src.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(dst_row)
        .enumerate()
        .for_each(|(r, row)| {
            let mut start = offset[N - 1];
            for a in 0..N - 1 {
                let idx = (r / row_strides[a]) % dst_shape[a];
                start += (idx + offset[a]) * src_strides[a];
            }
            row.copy_from_slice(&src_data[start..start + dst_row]);
        });

    Ok(())
}

// strides of the row index over the leading axes; the last entry is unused
fn row_strides<const N: usize>(shape: [usize; N]) -> [usize; N] {
    let mut rows = shape;
    if N > 0 {
        rows[N - 1] = 1;
    }
    get_strides_from_shape(rows)
}
