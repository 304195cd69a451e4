use num_traits::Float;
use paramorph_image::Image;
use rayon::prelude::*;

use crate::morphology::config::{ParabolicConfig, Scale};
use crate::morphology::erode_dilate::{all_axes, check_shape};
use crate::morphology::line::{Dilation, Erosion};
use crate::morphology::MorphologyError;
use crate::parallel::par_iter_val_two;
use crate::threshold::threshold_equal;

// magnitude 1 per unit distance, so the erosion yields squared distances
const DISTANCE_SCALE: f64 = 0.5;

/// Euclidean distance transform.
///
/// Every sample equal to `outside_value` is background and reads 0. Every other sample reads its
/// distance to the nearest background sample, in samples or, with `config.use_image_spacing`, in
/// physical units. The distance is exact, not an approximation by chamfer masks.
///
/// When the image holds no background sample at all, every sample reads `sqrt(W)` with
/// `W = 1 + sum_a (extent_a * spacing_a)^2`, a value larger than any distance inside the image.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output distances, same shape as `src`.
/// * `outside_value` - The value marking background samples.
/// * `squared` - Write squared distances and skip the square root.
/// * `config` - Algorithm, spacing and threading options.
///
/// # Errors
///
/// Fails on mismatched shapes or when the saturation value cannot be represented in `T`.
///
/// # Example
///
/// ```
/// use paramorph_image::Image;
/// use paramorph_imgproc::morphology::{distance_transform, ParabolicConfig};
///
/// let src = Image::<u8, 1>::new([6], vec![1, 1, 0, 1, 1, 1]).unwrap();
/// let mut dst = Image::<f32, 1>::from_size_val(src.size(), 0.0);
///
/// distance_transform(&src, &mut dst, 0, false, &ParabolicConfig::default()).unwrap();
/// assert_eq!(dst.as_slice(), &[2.0, 1.0, 0.0, 1.0, 2.0, 3.0]);
/// ```
pub fn distance_transform<S, T, const N: usize>(
    src: &Image<S, N>,
    dst: &mut Image<T, N>,
    outside_value: S,
    squared: bool,
    config: &ParabolicConfig,
) -> Result<(), MorphologyError>
where
    S: Copy + PartialEq + Send + Sync,
    T: Float + Send + Sync,
{
    check_shape(src, dst)?;
    config.strategy.install(|| {
        dst.set_spacing(src.spacing())?;
        let saturation = saturation_value(dst, config)?;
        threshold_equal(src, dst, outside_value, T::zero(), saturation)?;
        all_axes::<T, Erosion, N>(dst, &Scale::from(DISTANCE_SCALE), config)?;
        if !squared {
            dst.as_slice_mut()
                .par_iter_mut()
                .for_each(|v| *v = v.max(T::zero()).sqrt());
        }
        Ok(())
    })?
}

/// Signed Euclidean distance transform.
///
/// Samples equal to `outside_value` are outside the object, all others inside. Each sample reads
/// the distance to the nearest sample of the other class, negative inside and positive outside.
/// `inside_is_positive` flips the sign convention. As in [`distance_transform`], a class with no
/// counterpart in the image reads `sqrt(W)`.
///
/// # Errors
///
/// Fails on mismatched shapes or when the saturation value cannot be represented in `T`.
///
/// # Example
///
/// ```
/// use paramorph_image::Image;
/// use paramorph_imgproc::morphology::{signed_distance_transform, ParabolicConfig};
///
/// let src = Image::<u8, 1>::new([6], vec![0, 0, 1, 1, 1, 0]).unwrap();
/// let mut dst = Image::<f64, 1>::from_size_val(src.size(), 0.0);
///
/// signed_distance_transform(&src, &mut dst, 0, false, &ParabolicConfig::default()).unwrap();
/// assert_eq!(dst.as_slice(), &[2.0, 1.0, -1.0, -2.0, -1.0, 1.0]);
/// ```
pub fn signed_distance_transform<S, T, const N: usize>(
    src: &Image<S, N>,
    dst: &mut Image<T, N>,
    outside_value: S,
    inside_is_positive: bool,
    config: &ParabolicConfig,
) -> Result<(), MorphologyError>
where
    S: Copy + PartialEq + Send + Sync,
    T: Float + Send + Sync,
{
    check_shape(src, dst)?;
    config.strategy.install(|| {
        dst.set_spacing(src.spacing())?;
        let saturation = saturation_value(dst, config)?;
        let scale = Scale::from(DISTANCE_SCALE);

        // 0 inside, -W outside
        threshold_equal(src, dst, outside_value, -saturation, T::zero())?;
        let mut eroded = dst.clone();
        all_axes::<T, Erosion, N>(&mut eroded, &scale, config)?;
        let mut dilated = dst.clone();
        all_axes::<T, Dilation, N>(&mut dilated, &scale, config)?;

        let inside_sign = if inside_is_positive { T::one() } else { -T::one() };
        par_iter_val_two(
            eroded.as_slice(),
            dilated.as_slice(),
            dst.as_slice_mut(),
            |&ero, &dil, d| {
                *d = if *d == T::zero() {
                    inside_sign * (ero + saturation).max(T::zero()).sqrt()
                } else {
                    -inside_sign * (-dil).max(T::zero()).sqrt()
                };
            },
        )?;
        Ok(())
    })?
}

/// `1 + sum_a (extent_a * spacing_a)^2`, strictly above every squared distance in the image.
fn saturation_value<T, const N: usize>(
    image: &Image<T, N>,
    config: &ParabolicConfig,
) -> Result<T, MorphologyError>
where
    T: Float,
{
    let spacing = image.spacing();
    let extent_sq: f64 = (0..N)
        .map(|axis| {
            let extent = image.shape[axis] as f64 * config.spacing_factor(&spacing, axis);
            extent * extent
        })
        .sum();
    let saturation = 1.0 + extent_sq;
    log::debug!("distance transform saturation {}", saturation);
    T::from(saturation).ok_or(MorphologyError::NumericConversion)
}
