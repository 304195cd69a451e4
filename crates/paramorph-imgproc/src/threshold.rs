use num_traits::Zero;
use std::cmp::PartialOrd;

use paramorph_image::{check_same_size, Image, ImageError};

use crate::parallel;

/// Apply a binary threshold to an image.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image, possibly of a different type.
/// * `threshold` - The threshold value. Must be the same type as the input image.
/// * `max_value` - The value written where the input value is greater than the threshold.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if the shapes differ.
///
/// # Examples
///
/// ```
/// use paramorph_image::Image;
/// use paramorph_imgproc::threshold::threshold_binary;
///
/// let image = Image::<f32, 2>::new([2, 2], vec![0.5, 1.5, 2.0, -1.0]).unwrap();
/// let mut thresholded = Image::<u8, 2>::from_size_val(image.size(), 0);
///
/// threshold_binary(&image, &mut thresholded, 1.0, 255).unwrap();
/// assert_eq!(thresholded.as_slice(), &[0, 255, 255, 0]);
/// ```
pub fn threshold_binary<T, U, const N: usize>(
    src: &Image<T, N>,
    dst: &mut Image<U, N>,
    threshold: T,
    max_value: U,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + PartialOrd,
    U: Copy + Send + Sync + Zero,
{
    check_same_size(src, dst)?;

    run(src, dst, |src_pixel, dst_pixel| {
        *dst_pixel = if *src_pixel > threshold {
            max_value
        } else {
            U::zero()
        };
    })
}

/// Apply a binary threshold that also accepts values equal to the threshold.
///
/// Writes `max_value` where `src >= threshold` and zero elsewhere.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if the shapes differ.
pub fn threshold_greater_equal<T, U, const N: usize>(
    src: &Image<T, N>,
    dst: &mut Image<U, N>,
    threshold: T,
    max_value: U,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + PartialOrd,
    U: Copy + Send + Sync + Zero,
{
    check_same_size(src, dst)?;

    run(src, dst, |src_pixel, dst_pixel| {
        *dst_pixel = if *src_pixel >= threshold {
            max_value
        } else {
            U::zero()
        };
    })
}

/// Split an image on equality with a value.
///
/// Writes `equal_value` where `src == value` and `other_value` everywhere else.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if the shapes differ.
///
/// # Examples
///
/// ```
/// use paramorph_image::Image;
/// use paramorph_imgproc::threshold::threshold_equal;
///
/// let image = Image::<u8, 1>::new([4], vec![0, 3, 0, 7]).unwrap();
/// let mut mask = Image::<f64, 1>::from_size_val(image.size(), 0.0);
///
/// threshold_equal(&image, &mut mask, 0, 0.0, 10.0).unwrap();
/// assert_eq!(mask.as_slice(), &[0.0, 10.0, 0.0, 10.0]);
/// ```
pub fn threshold_equal<T, U, const N: usize>(
    src: &Image<T, N>,
    dst: &mut Image<U, N>,
    value: T,
    equal_value: U,
    other_value: U,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + PartialEq,
    U: Copy + Send + Sync,
{
    check_same_size(src, dst)?;

    run(src, dst, |src_pixel, dst_pixel| {
        *dst_pixel = if *src_pixel == value {
            equal_value
        } else {
            other_value
        };
    })
}

fn run<T, U, const N: usize>(
    src: &Image<T, N>,
    dst: &mut Image<U, N>,
    f: impl Fn(&T, &mut U) + Send + Sync,
) -> Result<(), ImageError>
where
    T: Sync,
    U: Send,
{
    let (src_shape, dst_shape) = (src.shape, dst.shape);
    parallel::par_iter_val(src.as_slice(), dst.as_slice_mut(), f)
        .map_err(|_| ImageError::InvalidImageSize(src_shape.to_vec(), dst_shape.to_vec()))
}
