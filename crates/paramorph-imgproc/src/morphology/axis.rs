use num_traits::Float;
use paramorph_image::{Image, ImageError};

use crate::morphology::config::{LineAlgorithm, ParabolicConfig};
use crate::morphology::line::{
    transform_line_contact_point, transform_line_intersection, ContactPointWorkspace,
    IntersectionWorkspace, Polarity,
};
use crate::morphology::MorphologyError;
use crate::parallel;

/// Apply a parabolic erosion or dilation along a single axis, in place.
///
/// Every line of `image` running along `axis` is transformed independently with the algorithm
/// chosen by `config`. The parabola curvature is `spacing^2 / (2 * scale)` when
/// `config.use_image_spacing` is set and `1 / (2 * scale)` otherwise.
///
/// # Arguments
///
/// * `image` - The image to transform.
/// * `axis` - The axis the lines run along.
/// * `scale` - The scale of the parabola along `axis`.
/// * `config` - Algorithm, spacing and threading options.
///
/// # Errors
///
/// Returns [`MorphologyError::AxisOutOfBounds`] if `axis >= N` and
/// [`MorphologyError::InvalidScale`] if `scale` is not finite and positive. Returns
/// [`MorphologyError::CurvatureOutOfRange`] if `spacing^2 / (2 * scale)` is zero or not finite in
/// `T`. Nothing is written in any of these cases.
///
/// # Example
///
/// ```
/// use paramorph_image::Image;
/// use paramorph_imgproc::morphology::{parabolic_axis_pass, Dilation, ParabolicConfig};
///
/// let mut image = Image::<f32, 2>::new([2, 3], vec![0.0, 0.0, 0.0, 0.0, 4.0, 0.0]).unwrap();
/// parabolic_axis_pass::<_, Dilation, 2>(&mut image, 1, 0.5, &ParabolicConfig::default()).unwrap();
/// assert_eq!(image.as_slice(), &[0.0, 0.0, 0.0, 3.0, 4.0, 3.0]);
/// ```
pub fn parabolic_axis_pass<T, P, const N: usize>(
    image: &mut Image<T, N>,
    axis: usize,
    scale: f64,
    config: &ParabolicConfig,
) -> Result<(), MorphologyError>
where
    T: Float + Send + Sync,
    P: Polarity,
{
    if axis >= N {
        return Err(MorphologyError::AxisOutOfBounds { axis, ndim: N });
    }
    if !(scale.is_finite() && scale > 0.0) {
        return Err(MorphologyError::InvalidScale { axis, value: scale });
    }
    config
        .strategy
        .install(|| axis_pass::<T, P, N>(image, axis, scale, config))?
}

/// Axis pass without argument checks or pool installation.
pub(crate) fn axis_pass<T, P, const N: usize>(
    image: &mut Image<T, N>,
    axis: usize,
    scale: f64,
    config: &ParabolicConfig,
) -> Result<(), MorphologyError>
where
    T: Float + Send + Sync,
    P: Polarity,
{
    let spacing = config.spacing_factor(&image.spacing(), axis);
    let voxel_scale = scale / (spacing * spacing);
    let magnitude = line_magnitude::<T>(spacing, scale, axis)?;
    let algorithm = config
        .algorithm
        .resolve(voxel_scale, config.contact_point_threshold);

    let lanes = image.lanes(axis).map_err(ImageError::from)?;

    log::debug!(
        "parabolic {} along axis {}: {} lines of {} samples, {:?}, magnitude {}",
        P::NAME,
        axis,
        lanes.num_lines(),
        lanes.len,
        algorithm,
        spacing * spacing / (2.0 * scale),
    );

    let strategy = config.strategy;
    let data = image.as_slice_mut();
    match algorithm {
        LineAlgorithm::ContactPoint => parallel::transform_lines(
            data,
            lanes,
            strategy,
            ContactPointWorkspace::<T>::new,
            |workspace, line| transform_line_contact_point::<T, P>(line, workspace, magnitude),
        )?,
        LineAlgorithm::Intersection => parallel::transform_lines(
            data,
            lanes,
            strategy,
            IntersectionWorkspace::<T>::new,
            |workspace, line| transform_line_intersection::<T, P>(line, workspace, magnitude),
        )?,
    }

    Ok(())
}

/// Curvature `spacing^2 / (2 * scale)` of the parabola along `axis`, in the sample type.
///
/// The line transforms need a finite, strictly positive curvature.
pub(crate) fn line_magnitude<T: Float>(
    spacing: f64,
    scale: f64,
    axis: usize,
) -> Result<T, MorphologyError> {
    T::from(spacing * spacing / (2.0 * scale))
        .filter(|m| m.is_finite() && *m > T::zero())
        .ok_or(MorphologyError::CurvatureOutOfRange { axis, scale })
}
