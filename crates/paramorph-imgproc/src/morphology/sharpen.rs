use std::ops::Sub;

use num_traits::{Float, NumCast};
use paramorph_image::Image;

use crate::morphology::config::{ParabolicConfig, Scale};
use crate::morphology::erode_dilate::{all_axes, check_shape, convert_into};
use crate::morphology::line::{Dilation, Erosion};
use crate::morphology::MorphologyError;
use crate::parallel::par_iter_val_two;

/// Morphological sharpening.
///
/// Each iteration computes the dilation and the erosion of the current image at `scale` and moves
/// every sample to whichever of the two is closer, keeping it where both are equally close. Edges
/// get steeper while flat regions and extrema stay put. `iterations == 0` copies the input.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The sharpened image, same shape as `src`.
/// * `scale` - The scale of the parabola, one value for every axis or a per-axis array.
/// * `iterations` - How many times the step is applied, each one on the previous output.
/// * `config` - Algorithm, spacing and threading options.
///
/// # Errors
///
/// Fails on a non-positive or non-finite scale, on mismatched shapes and when a sample cannot be
/// represented in `T`.
pub fn sharpen<S, T, const N: usize>(
    src: &Image<S, N>,
    dst: &mut Image<T, N>,
    scale: impl Into<Scale<N>>,
    iterations: usize,
    config: &ParabolicConfig,
) -> Result<(), MorphologyError>
where
    S: NumCast + Copy + Sync,
    T: Float + Send + Sync,
{
    let scale = scale.into();
    scale.validate()?;
    check_shape(src, dst)?;
    config.strategy.install(|| {
        convert_into(src, dst)?;
        for iteration in 0..iterations {
            log::debug!("sharpen iteration {} of {}", iteration + 1, iterations);
            let mut dilated = dst.clone();
            all_axes::<T, Dilation, N>(&mut dilated, &scale, config)?;
            let mut eroded = dst.clone();
            all_axes::<T, Erosion, N>(&mut eroded, &scale, config)?;
            par_iter_val_two(
                dilated.as_slice(),
                eroded.as_slice(),
                dst.as_slice_mut(),
                |&d, &e, v| *v = sharpen_op(d, *v, e),
            )?;
        }
        Ok(())
    })?
}

/// Pick the dilated or the eroded value, whichever is closer to the original.
///
/// Ties keep the original value.
///
/// ```
/// use paramorph_imgproc::morphology::sharpen_op;
///
/// assert_eq!(sharpen_op(10.0, 8.0, 2.0), 10.0);
/// assert_eq!(sharpen_op(10.0, 4.0, 2.0), 2.0);
/// assert_eq!(sharpen_op(10.0, 6.0, 2.0), 6.0);
/// ```
pub fn sharpen_op<T>(dilated: T, original: T, eroded: T) -> T
where
    T: Copy + PartialOrd + Sub<Output = T>,
{
    let up = dilated - original;
    let down = original - eroded;
    if up < down {
        dilated
    } else if down < up {
        eroded
    } else {
        original
    }
}
