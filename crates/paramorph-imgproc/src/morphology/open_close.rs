use num_traits::{Float, NumCast};
use paramorph_image::Image;

use crate::morphology::config::{ParabolicConfig, Scale};
use crate::morphology::erode_dilate::{all_axes, check_shape, convert_into};
use crate::morphology::line::{Dilation, Erosion};
use crate::morphology::MorphologyError;
use crate::padding::{crop, pad_constant};

/// Parabolic opening: erosion followed by dilation with the same scale.
///
/// With `safe_border` the image is first padded with its maximum by
/// [`safe_border_margins`] samples per side, so that the boundary behaves like an infinite
/// extension of bright samples, and cropped back afterwards. Without it, samples near the boundary
/// only see samples inside the image.
///
/// # Errors
///
/// Fails on a non-positive or non-finite scale, on mismatched shapes and when a sample cannot be
/// represented in `T`.
///
/// # Example
///
/// ```
/// use paramorph_image::Image;
/// use paramorph_imgproc::morphology::{open, ParabolicConfig};
///
/// // the narrow spike is flattened, the wide plateau keeps its top
/// let src = Image::<f64, 1>::new([7], vec![0.0, 9.0, 0.0, 0.0, 5.0, 5.0, 5.0]).unwrap();
/// let mut dst = Image::<f64, 1>::from_size_val(src.size(), 0.0);
///
/// open(&src, &mut dst, 0.5, false, &ParabolicConfig::default()).unwrap();
/// assert_eq!(dst.as_slice()[1], 1.0);
/// assert_eq!(dst.as_slice()[6], 5.0);
/// ```
pub fn open<S, T, const N: usize>(
    src: &Image<S, N>,
    dst: &mut Image<T, N>,
    scale: impl Into<Scale<N>>,
    safe_border: bool,
    config: &ParabolicConfig,
) -> Result<(), MorphologyError>
where
    S: NumCast + Copy + Sync,
    T: Float + Send + Sync,
{
    open_close::<S, T, N>(src, dst, scale.into(), safe_border, true, config)
}

/// Parabolic closing: dilation followed by erosion with the same scale.
///
/// With `safe_border` the image is padded with its minimum, see [`open`].
///
/// # Errors
///
/// Fails on a non-positive or non-finite scale, on mismatched shapes and when a sample cannot be
/// represented in `T`.
pub fn close<S, T, const N: usize>(
    src: &Image<S, N>,
    dst: &mut Image<T, N>,
    scale: impl Into<Scale<N>>,
    safe_border: bool,
    config: &ParabolicConfig,
) -> Result<(), MorphologyError>
where
    S: NumCast + Copy + Sync,
    T: Float + Send + Sync,
{
    open_close::<S, T, N>(src, dst, scale.into(), safe_border, false, config)
}

/// Border margins that keep the image boundary from influencing an opening or closing.
///
/// A sample at distance `d` can only win over the extremum of the image when
/// `m d^2 <= max - min`, with `m = spacing^2 / (2 * scale)`. The margin along every axis is therefore
/// `ceil(sqrt(2 * scale / spacing^2 * (max - min)))`, the spacing being 1 unless
/// `use_image_spacing` is set.
///
/// # Errors
///
/// Fails on an invalid scale or an image without comparable samples, and with
/// [`MorphologyError::BorderTooLarge`] when a margin does not fit in `usize`.
///
/// # Example
///
/// ```
/// use paramorph_image::Image;
/// use paramorph_imgproc::morphology::safe_border_margins;
///
/// let image = Image::<f32, 2>::new([2, 2], vec![0.0, 8.0, 2.0, 1.0]).unwrap();
/// assert_eq!(safe_border_margins(&image, [1.0, 4.0], false).unwrap(), [4, 8]);
/// ```
pub fn safe_border_margins<T, const N: usize>(
    image: &Image<T, N>,
    scale: impl Into<Scale<N>>,
    use_image_spacing: bool,
) -> Result<[usize; N], MorphologyError>
where
    T: Float,
{
    let scale = scale.into();
    scale.validate()?;
    let (lo, hi) = image.min_max()?;
    let range = (hi - lo)
        .to_f64()
        .filter(|r| r.is_finite())
        .ok_or(MorphologyError::NumericConversion)?;
    let spacing = image.spacing();

    let mut margins = [0usize; N];
    for (axis, margin) in margins.iter_mut().enumerate() {
        let s = if use_image_spacing { spacing[axis] } else { 1.0 };
        let needed = (2.0 * scale.0[axis] / (s * s) * range).sqrt().ceil();
        *margin = margin_in_samples(axis, needed)?;
    }
    Ok(margins)
}

/// Checked conversion of a margin, in samples, to an extent.
pub(crate) fn margin_in_samples(axis: usize, margin: f64) -> Result<usize, MorphologyError> {
    <usize as NumCast>::from(margin).ok_or(MorphologyError::BorderTooLarge { axis, margin })
}

/// `shape` grown by `margins` samples on both sides of every axis.
///
/// Fails with [`MorphologyError::BorderTooLarge`] when an extent overflows or the padded image
/// could not be allocated as a single buffer of `T`.
pub(crate) fn padded_shape<T, const N: usize>(
    shape: [usize; N],
    margins: [usize; N],
) -> Result<[usize; N], MorphologyError> {
    let max_numel = isize::MAX as usize / std::mem::size_of::<T>().max(1);
    let mut padded = shape;
    let mut numel = 1usize;
    for (axis, (extent, margin)) in padded.iter_mut().zip(margins).enumerate() {
        let too_large = || MorphologyError::BorderTooLarge {
            axis,
            margin: margin as f64,
        };
        *extent = margin
            .checked_mul(2)
            .and_then(|m| extent.checked_add(m))
            .ok_or_else(too_large)?;
        numel = numel
            .checked_mul(*extent)
            .filter(|&n| n <= max_numel)
            .ok_or_else(too_large)?;
    }
    Ok(padded)
}

fn open_close<S, T, const N: usize>(
    src: &Image<S, N>,
    dst: &mut Image<T, N>,
    scale: Scale<N>,
    safe_border: bool,
    opening: bool,
    config: &ParabolicConfig,
) -> Result<(), MorphologyError>
where
    S: NumCast + Copy + Sync,
    T: Float + Send + Sync,
{
    scale.validate()?;
    check_shape(src, dst)?;
    config.strategy.install(|| {
        convert_into(src, dst)?;
        if !safe_border || dst.numel() == 0 {
            return erode_then_dilate(dst, &scale, opening, config);
        }

        let margins = safe_border_margins(dst, scale, config.use_image_spacing)?;
        let (lo, hi) = dst.min_max()?;
        let border = if opening { hi } else { lo };
        log::debug!(
            "safe border for {}: margins {:?}",
            if opening { "opening" } else { "closing" },
            margins
        );

        let shape = padded_shape::<T, N>(dst.shape, margins)?;
        let mut padded = Image::from_size_val(shape, border).with_spacing(dst.spacing())?;
        pad_constant(dst, &mut padded, margins, border)?;
        erode_then_dilate(&mut padded, &scale, opening, config)?;
        crop(&padded, dst, margins)?;
        Ok(())
    })?
}

fn erode_then_dilate<T, const N: usize>(
    image: &mut Image<T, N>,
    scale: &Scale<N>,
    opening: bool,
    config: &ParabolicConfig,
) -> Result<(), MorphologyError>
where
    T: Float + Send + Sync,
{
    if opening {
        all_axes::<T, Erosion, N>(image, scale, config)?;
        all_axes::<T, Dilation, N>(image, scale, config)
    } else {
        all_axes::<T, Dilation, N>(image, scale, config)?;
        all_axes::<T, Erosion, N>(image, scale, config)
    }
}
