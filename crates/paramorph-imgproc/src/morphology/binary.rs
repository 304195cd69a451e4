use num_traits::{One, Zero};
use paramorph_image::Image;

use crate::morphology::axis::axis_pass;
use crate::morphology::config::{ParabolicConfig, Radius, Scale, StructuringShape};
use crate::morphology::erode_dilate::{all_axes, check_shape};
use crate::morphology::line::{Dilation, Erosion, Polarity};
use crate::morphology::open_close::{margin_in_samples, padded_shape};
use crate::morphology::MorphologyError;
use crate::padding::{crop, pad_constant};
use crate::threshold::{threshold_binary, threshold_equal, threshold_greater_equal};

// samples are lifted to {0, 2} so that the parabola crosses 1 at the radius
const ON: f64 = 2.0;
const OFF: f64 = 0.0;
const LEVEL: f64 = 1.0;
const EPS: f64 = 1e-9;

/// Binary dilation by a disc, sphere or box.
///
/// A sample of the output is on when an "on" sample of the input lies within the structuring
/// element centred on it. For [`StructuringShape::Circular`] that is `sum_a (d_a / r_a)^2 <= 1`,
/// for [`StructuringShape::Rectangular`] it is `|d_a| <= r_a` on every axis. Distances are in
/// samples, or in physical units when `config.use_image_spacing` is set.
///
/// # Arguments
///
/// * `src` - The input mask, containing only 0 and 1.
/// * `dst` - The output mask, same shape as `src`.
/// * `radius` - One radius for every axis, or a per-axis array.
/// * `shape` - The structuring element shape.
/// * `config` - Algorithm, spacing and threading options.
///
/// # Errors
///
/// Returns [`MorphologyError::NonBinaryInput`] if `src` holds anything but 0 and 1, and fails on a
/// non-positive radius or mismatched shapes.
///
/// # Example
///
/// ```
/// use paramorph_image::Image;
/// use paramorph_imgproc::morphology::{binary_dilate, ParabolicConfig, StructuringShape};
///
/// let mut data = vec![0u8; 25];
/// data[12] = 1;
/// let src = Image::<u8, 2>::new([5, 5], data).unwrap();
/// let mut dst = Image::<u8, 2>::from_size_val(src.size(), 0);
///
/// binary_dilate(&src, &mut dst, 1.0, StructuringShape::Circular, &ParabolicConfig::default()).unwrap();
/// assert_eq!(dst.as_slice().iter().filter(|&&v| v == 1).count(), 5);
///
/// binary_dilate(&src, &mut dst, 1.0, StructuringShape::Rectangular, &ParabolicConfig::default()).unwrap();
/// assert_eq!(dst.as_slice().iter().filter(|&&v| v == 1).count(), 9);
/// ```
pub fn binary_dilate<T, const N: usize>(
    src: &Image<T, N>,
    dst: &mut Image<T, N>,
    radius: impl Into<Radius<N>>,
    shape: StructuringShape,
    config: &ParabolicConfig,
) -> Result<(), MorphologyError>
where
    T: Copy + Zero + One + PartialEq + Send + Sync,
{
    binary_morph(src, dst, radius.into(), shape, &[Stage::Dilate], None, config)
}

/// Binary erosion by a disc, sphere or box.
///
/// A sample stays on when no "off" sample lies within the structuring element centred on it, see
/// [`binary_dilate`] for the element definition. Samples outside the image do not count as off.
///
/// # Errors
///
/// Returns [`MorphologyError::NonBinaryInput`] if `src` holds anything but 0 and 1, and fails on a
/// non-positive radius or mismatched shapes.
pub fn binary_erode<T, const N: usize>(
    src: &Image<T, N>,
    dst: &mut Image<T, N>,
    radius: impl Into<Radius<N>>,
    shape: StructuringShape,
    config: &ParabolicConfig,
) -> Result<(), MorphologyError>
where
    T: Copy + Zero + One + PartialEq + Send + Sync,
{
    binary_morph(src, dst, radius.into(), shape, &[Stage::Erode], None, config)
}

/// Binary opening: [`binary_erode`] followed by [`binary_dilate`].
///
/// With `safe_border` the mask is padded with "on" samples beyond the reach of the structuring
/// element before the opening and cropped back afterwards, so objects touching the boundary are
/// not eaten away by it.
///
/// # Errors
///
/// Returns [`MorphologyError::NonBinaryInput`] if `src` holds anything but 0 and 1, and fails on a
/// non-positive radius or mismatched shapes.
pub fn binary_open<T, const N: usize>(
    src: &Image<T, N>,
    dst: &mut Image<T, N>,
    radius: impl Into<Radius<N>>,
    shape: StructuringShape,
    safe_border: bool,
    config: &ParabolicConfig,
) -> Result<(), MorphologyError>
where
    T: Copy + Zero + One + PartialEq + Send + Sync,
{
    let border = safe_border.then_some(ON);
    binary_morph(src, dst, radius.into(), shape, &[Stage::Erode, Stage::Dilate], border, config)
}

/// Binary closing: [`binary_dilate`] followed by [`binary_erode`].
///
/// With `safe_border` the mask is padded with "off" samples before the closing and cropped back
/// afterwards.
///
/// # Errors
///
/// Returns [`MorphologyError::NonBinaryInput`] if `src` holds anything but 0 and 1, and fails on a
/// non-positive radius or mismatched shapes.
pub fn binary_close<T, const N: usize>(
    src: &Image<T, N>,
    dst: &mut Image<T, N>,
    radius: impl Into<Radius<N>>,
    shape: StructuringShape,
    safe_border: bool,
    config: &ParabolicConfig,
) -> Result<(), MorphologyError>
where
    T: Copy + Zero + One + PartialEq + Send + Sync,
{
    let border = safe_border.then_some(OFF);
    binary_morph(src, dst, radius.into(), shape, &[Stage::Dilate, Stage::Erode], border, config)
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Erode,
    Dilate,
}

fn binary_morph<T, const N: usize>(
    src: &Image<T, N>,
    dst: &mut Image<T, N>,
    radius: Radius<N>,
    shape: StructuringShape,
    stages: &[Stage],
    border: Option<f64>,
    config: &ParabolicConfig,
) -> Result<(), MorphologyError>
where
    T: Copy + Zero + One + PartialEq + Send + Sync,
{
    radius.validate()?;
    check_shape(src, dst)?;
    let scale = radius.to_scale();
    let mut mask = lift_mask(src)?;

    config.strategy.install(|| {
        let margins = match border {
            Some(value) if mask.numel() > 0 => {
                let margins = binary_margins(&mask, &radius, config)?;
                log::debug!("binary safe border: margins {:?}", margins);
                let shape = padded_shape::<f64, N>(mask.shape, margins)?;
                let mut padded = Image::from_size_val(shape, value).with_spacing(mask.spacing())?;
                pad_constant(&mask, &mut padded, margins, value)?;
                mask = padded;
                Some(margins)
            }
            _ => None,
        };

        for stage in stages {
            match stage {
                Stage::Erode => {
                    binary_pass::<Erosion, N>(&mut mask, &scale, shape, config)?
                }
                Stage::Dilate => {
                    binary_pass::<Dilation, N>(&mut mask, &scale, shape, config)?
                }
            }
        }

        if let Some(margins) = margins {
            let mut cropped = Image::from_size_val(src.size(), OFF);
            crop(&mask, &mut cropped, margins)?;
            mask = cropped;
        }

        dst.set_spacing(src.spacing())?;
        threshold_binary(&mask, dst, LEVEL, T::one())?;
        Ok(())
    })?
}

/// Check the {0, 1} precondition and lift the mask to {0, 2}.
fn lift_mask<T, const N: usize>(src: &Image<T, N>) -> Result<Image<f64, N>, MorphologyError>
where
    T: Copy + Zero + One + PartialEq + Send + Sync,
{
    if let Some(offset) = src
        .as_slice()
        .iter()
        .position(|v| *v != T::zero() && *v != T::one())
    {
        return Err(MorphologyError::NonBinaryInput { offset });
    }
    let mut mask = Image::from_size_val(src.size(), OFF).with_spacing(src.spacing())?;
    threshold_equal(src, &mut mask, T::one(), ON, OFF)?;
    Ok(mask)
}

/// One erosion or dilation on a {0, 2} mask, leaving a {0, 2} mask behind.
fn binary_pass<P: Polarity, const N: usize>(
    mask: &mut Image<f64, N>,
    scale: &Scale<N>,
    shape: StructuringShape,
    config: &ParabolicConfig,
) -> Result<(), MorphologyError> {
    match shape {
        StructuringShape::Circular => {
            all_axes::<f64, P, N>(mask, scale, config)?;
            rebinarize::<P, N>(mask)
        }
        StructuringShape::Rectangular => {
            for (axis, &s) in scale.0.iter().enumerate() {
                axis_pass::<f64, P, N>(mask, axis, s, config)?;
                rebinarize::<P, N>(mask)?;
            }
            Ok(())
        }
    }
}

// dilation keeps the level itself, erosion drops it
fn rebinarize<P: Polarity, const N: usize>(mask: &mut Image<f64, N>) -> Result<(), MorphologyError> {
    let mut out = Image::from_size_val(mask.size(), OFF).with_spacing(mask.spacing())?;
    if P::DILATE {
        threshold_greater_equal(mask, &mut out, LEVEL - EPS, ON)?;
    } else {
        threshold_binary(mask, &mut out, LEVEL + EPS, ON)?;
    }
    *mask = out;
    Ok(())
}

fn binary_margins<const N: usize>(
    mask: &Image<f64, N>,
    radius: &Radius<N>,
    config: &ParabolicConfig,
) -> Result<[usize; N], MorphologyError> {
    let spacing = mask.spacing();
    let mut margins = [0usize; N];
    for (axis, margin) in margins.iter_mut().enumerate() {
        let s = config.spacing_factor(&spacing, axis);
        *margin = margin_in_samples(axis, (radius.0[axis] / s).ceil() + 1.0)?;
    }
    Ok(margins)
}
