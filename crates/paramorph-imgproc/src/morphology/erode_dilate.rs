use num_traits::{Float, NumCast};
use paramorph_image::Image;
use rayon::prelude::*;

use crate::morphology::axis::{axis_pass, line_magnitude};
use crate::morphology::config::{ParabolicConfig, Scale};
use crate::morphology::line::{Dilation, Erosion, Polarity};
use crate::morphology::MorphologyError;

/// Parabolic erosion of an N-dimensional image.
///
/// The erosion is separable: one [`parabolic_axis_pass`](crate::morphology::parabolic_axis_pass)
/// per axis, each reading the output of the previous one. Samples near the image boundary only
/// see samples inside the image.
///
/// # Arguments
///
/// * `src` - The input image, of any numeric sample type.
/// * `dst` - The output image, same shape as `src`. Receives the spacing of `src`.
/// * `scale` - The scale of the parabola, one value for every axis or a per-axis array.
/// * `config` - Algorithm, spacing and threading options.
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
/// use paramorph_imgproc::morphology::{erode, ParabolicConfig};
///
/// let src = Image::<u8, 2>::new([1, 5], vec![9, 9, 0, 9, 9]).unwrap();
/// let mut dst = Image::<f32, 2>::from_size_val(src.size(), 0.0);
///
/// erode(&src, &mut dst, 0.5, &ParabolicConfig::default()).unwrap();
/// assert_eq!(dst.as_slice(), &[4.0, 1.0, 0.0, 1.0, 4.0]);
/// ```
pub fn erode<S, T, const N: usize>(
    src: &Image<S, N>,
    dst: &mut Image<T, N>,
    scale: impl Into<Scale<N>>,
    config: &ParabolicConfig,
) -> Result<(), MorphologyError>
where
    S: NumCast + Copy + Sync,
    T: Float + Send + Sync,
{
    morph::<S, T, Erosion, N>(src, dst, scale.into(), config)
}

/// Parabolic dilation of an N-dimensional image.
///
/// The dual of [`erode`]: `dilate(f) == -erode(-f)` exactly, for the same configuration.
///
/// # Errors
///
/// Fails on a non-positive or non-finite scale, on mismatched shapes and when a sample cannot be
/// represented in `T`.
pub fn dilate<S, T, const N: usize>(
    src: &Image<S, N>,
    dst: &mut Image<T, N>,
    scale: impl Into<Scale<N>>,
    config: &ParabolicConfig,
) -> Result<(), MorphologyError>
where
    S: NumCast + Copy + Sync,
    T: Float + Send + Sync,
{
    morph::<S, T, Dilation, N>(src, dst, scale.into(), config)
}

/// In-place version of [`erode`].
///
/// # Errors
///
/// Fails on a non-positive or non-finite scale.
pub fn erode_inplace<T, const N: usize>(
    image: &mut Image<T, N>,
    scale: impl Into<Scale<N>>,
    config: &ParabolicConfig,
) -> Result<(), MorphologyError>
where
    T: Float + Send + Sync,
{
    let scale = scale.into();
    scale.validate()?;
    config
        .strategy
        .install(|| all_axes::<T, Erosion, N>(image, &scale, config))?
}

/// In-place version of [`dilate`].
///
/// # Errors
///
/// Fails on a non-positive or non-finite scale.
pub fn dilate_inplace<T, const N: usize>(
    image: &mut Image<T, N>,
    scale: impl Into<Scale<N>>,
    config: &ParabolicConfig,
) -> Result<(), MorphologyError>
where
    T: Float + Send + Sync,
{
    let scale = scale.into();
    scale.validate()?;
    config
        .strategy
        .install(|| all_axes::<T, Dilation, N>(image, &scale, config))?
}

fn morph<S, T, P, const N: usize>(
    src: &Image<S, N>,
    dst: &mut Image<T, N>,
    scale: Scale<N>,
    config: &ParabolicConfig,
) -> Result<(), MorphologyError>
where
    S: NumCast + Copy + Sync,
    T: Float + Send + Sync,
    P: Polarity,
{
    scale.validate()?;
    check_shape(src, dst)?;
    check_magnitudes::<T, N>(&src.spacing(), &scale, config)?;
    config.strategy.install(|| {
        convert_into(src, dst)?;
        all_axes::<T, P, N>(dst, &scale, config)
    })?
}

/// Run one axis pass per axis, in axis order.
pub(crate) fn all_axes<T, P, const N: usize>(
    image: &mut Image<T, N>,
    scale: &Scale<N>,
    config: &ParabolicConfig,
) -> Result<(), MorphologyError>
where
    T: Float + Send + Sync,
    P: Polarity,
{
    check_magnitudes::<T, N>(&image.spacing(), scale, config)?;
    for (axis, &s) in scale.0.iter().enumerate() {
        axis_pass::<T, P, N>(image, axis, s, config)?;
    }
    Ok(())
}

/// Fail before any axis is written if one of them has an unusable curvature in `T`.
pub(crate) fn check_magnitudes<T: Float, const N: usize>(
    spacing: &[f64; N],
    scale: &Scale<N>,
    config: &ParabolicConfig,
) -> Result<(), MorphologyError> {
    for (axis, &s) in scale.0.iter().enumerate() {
        line_magnitude::<T>(config.spacing_factor(spacing, axis), s, axis)?;
    }
    Ok(())
}

/// Fail with [`MorphologyError::ShapeMismatch`] unless both images share a shape.
pub(crate) fn check_shape<S, T, const N: usize>(
    src: &Image<S, N>,
    dst: &Image<T, N>,
) -> Result<(), MorphologyError> {
    if src.shape != dst.shape {
        return Err(MorphologyError::ShapeMismatch(
            src.shape.to_vec(),
            dst.shape.to_vec(),
        ));
    }
    Ok(())
}

/// Copy `src` into `dst` converting every sample, and carry over the spacing.
pub(crate) fn convert_into<S, T, const N: usize>(
    src: &Image<S, N>,
    dst: &mut Image<T, N>,
) -> Result<(), MorphologyError>
where
    S: NumCast + Copy + Sync,
    T: NumCast + Send,
{
    check_shape(src, dst)?;
    dst.set_spacing(src.spacing())?;
    dst.as_slice_mut()
        .par_iter_mut()
        .zip(src.as_slice().par_iter())
        .try_for_each(|(d, &s)| {
            *d = T::from(s).ok_or(MorphologyError::NumericConversion)?;
            Ok(())
        })
}
