use crate::morphology::MorphologyError;
use crate::parallel::ExecutionStrategy;

/// Line algorithm used by an axis pass.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParabolicAlgorithm {
    /// Pick per axis from the effective scale, see [`ParabolicAlgorithm::resolve`].
    Auto,
    /// The contact point algorithm, data dependent cost, fast at small scales.
    ContactPoint,
    /// The lower envelope algorithm, linear cost.
    #[default]
    Intersection,
}

impl ParabolicAlgorithm {
    /// Resolve the choice for one axis into the line algorithm that will run.
    ///
    /// `voxel_scale` is the scale expressed in samples (`scale / spacing^2` when spacing is used).
    /// [`ParabolicAlgorithm::Auto`] picks the contact point algorithm when
    /// `2 * voxel_scale < threshold`. Explicit choices map to themselves.
    ///
    /// # Example
    ///
    /// ```
    /// use paramorph_imgproc::morphology::{LineAlgorithm, ParabolicAlgorithm};
    ///
    /// assert_eq!(ParabolicAlgorithm::Auto.resolve(0.05, 0.2), LineAlgorithm::ContactPoint);
    /// assert_eq!(ParabolicAlgorithm::Auto.resolve(0.1, 0.2), LineAlgorithm::Intersection);
    /// assert_eq!(ParabolicAlgorithm::ContactPoint.resolve(9.0, 0.2), LineAlgorithm::ContactPoint);
    /// ```
    pub fn resolve(self, voxel_scale: f64, threshold: f64) -> LineAlgorithm {
        match self {
            ParabolicAlgorithm::Auto if 2.0 * voxel_scale < threshold => LineAlgorithm::ContactPoint,
            ParabolicAlgorithm::Auto => LineAlgorithm::Intersection,
            ParabolicAlgorithm::ContactPoint => LineAlgorithm::ContactPoint,
            ParabolicAlgorithm::Intersection => LineAlgorithm::Intersection,
        }
    }
}

/// A concrete line algorithm, the result of [`ParabolicAlgorithm::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAlgorithm {
    /// See [`crate::morphology::transform_line_contact_point`].
    ContactPoint,
    /// See [`crate::morphology::transform_line_intersection`].
    Intersection,
}

/// Default crossover of the automatic algorithm choice.
pub const DEFAULT_CONTACT_POINT_THRESHOLD: f64 = 0.2;

/// Options shared by every parabolic operation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParabolicConfig {
    /// Measure scales and radii in physical units using the image spacing.
    pub use_image_spacing: bool,
    /// Line algorithm for every axis pass.
    pub algorithm: ParabolicAlgorithm,
    /// Crossover used by [`ParabolicAlgorithm::Auto`].
    pub contact_point_threshold: f64,
    /// How lines are distributed over threads.
    pub strategy: ExecutionStrategy,
}

impl Default for ParabolicConfig {
    fn default() -> Self {
        Self {
            use_image_spacing: false,
            algorithm: ParabolicAlgorithm::default(),
            contact_point_threshold: DEFAULT_CONTACT_POINT_THRESHOLD,
            strategy: ExecutionStrategy::default(),
        }
    }
}

impl ParabolicConfig {
    /// Set whether the image spacing is used.
    pub fn with_image_spacing(mut self, use_image_spacing: bool) -> Self {
        self.use_image_spacing = use_image_spacing;
        self
    }

    /// Set the line algorithm.
    pub fn with_algorithm(mut self, algorithm: ParabolicAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the crossover used by [`ParabolicAlgorithm::Auto`].
    pub fn with_contact_point_threshold(mut self, threshold: f64) -> Self {
        self.contact_point_threshold = threshold;
        self
    }

    /// Set the execution strategy.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Spacing factor of `axis` given the image spacing.
    pub(crate) fn spacing_factor<const N: usize>(&self, spacing: &[f64; N], axis: usize) -> f64 {
        if self.use_image_spacing {
            spacing[axis]
        } else {
            1.0
        }
    }
}

/// Per-axis scale of the parabolic structuring element.
///
/// A single value is broadcast to every axis.
///
/// ```
/// use paramorph_imgproc::morphology::Scale;
///
/// assert_eq!(Scale::<3>::from(2.0), Scale([2.0; 3]));
/// assert_eq!(Scale::from([1.0, 4.0]).0[1], 4.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale<const N: usize>(pub [f64; N]);

impl<const N: usize> From<f64> for Scale<N> {
    fn from(value: f64) -> Self {
        Self([value; N])
    }
}

impl<const N: usize> From<[f64; N]> for Scale<N> {
    fn from(values: [f64; N]) -> Self {
        Self(values)
    }
}

impl<const N: usize> Scale<N> {
    /// Check that every entry is finite and positive.
    ///
    /// # Errors
    ///
    /// Returns [`MorphologyError::InvalidScale`] naming the first offending axis.
    pub fn validate(&self) -> Result<(), MorphologyError> {
        match self.0.iter().position(|s| !(s.is_finite() && *s > 0.0)) {
            Some(axis) => Err(MorphologyError::InvalidScale {
                axis,
                value: self.0[axis],
            }),
            None => Ok(()),
        }
    }
}

/// Per-axis radius of a binary structuring element.
///
/// Measured in samples, or in physical units when the image spacing is used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Radius<const N: usize>(pub [f64; N]);

impl<const N: usize> From<f64> for Radius<N> {
    fn from(value: f64) -> Self {
        Self([value; N])
    }
}

impl<const N: usize> From<[f64; N]> for Radius<N> {
    fn from(values: [f64; N]) -> Self {
        Self(values)
    }
}

impl<const N: usize> Radius<N> {
    /// Check that every entry is finite and positive.
    ///
    /// # Errors
    ///
    /// Returns [`MorphologyError::InvalidRadius`] naming the first offending axis.
    pub fn validate(&self) -> Result<(), MorphologyError> {
        match self.0.iter().position(|r| !(r.is_finite() && *r > 0.0)) {
            Some(axis) => Err(MorphologyError::InvalidRadius {
                axis,
                value: self.0[axis],
            }),
            None => Ok(()),
        }
    }

    /// The scale whose parabola, lifted by 1, crosses 0 at this radius: `r^2 / 2`.
    pub fn to_scale(&self) -> Scale<N> {
        Scale(self.0.map(|r| r * r / 2.0))
    }
}

/// Shape of a binary structuring element.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StructuringShape {
    /// Disc, sphere or ellipsoid: `sum_a (d_a / r_a)^2 <= 1`.
    #[default]
    Circular,
    /// Box of half-width `r_a` along every axis.
    Rectangular,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builders() {
        let config = ParabolicConfig::default()
            .with_image_spacing(true)
            .with_algorithm(ParabolicAlgorithm::Auto)
            .with_contact_point_threshold(0.5)
            .with_strategy(ExecutionStrategy::Serial);
        assert!(config.use_image_spacing);
        assert_eq!(config.algorithm, ParabolicAlgorithm::Auto);
        assert_eq!(config.strategy, ExecutionStrategy::Serial);
        assert_eq!(config.spacing_factor(&[2.0, 3.0], 1), 3.0);
        assert_eq!(ParabolicConfig::default().spacing_factor(&[2.0, 3.0], 1), 1.0);
    }

    #[test]
    fn test_auto_threshold_is_strict() {
        assert_eq!(
            ParabolicAlgorithm::Auto.resolve(0.1, 0.2),
            LineAlgorithm::Intersection
        );
        assert_eq!(
            ParabolicAlgorithm::Auto.resolve(0.2, 0.5),
            LineAlgorithm::ContactPoint
        );
    }

    #[test]
    fn test_explicit_algorithm_ignores_threshold() {
        for scale in [1e-6, 0.05, 1.0, 1e6] {
            assert_eq!(
                ParabolicAlgorithm::ContactPoint.resolve(scale, 0.2),
                LineAlgorithm::ContactPoint
            );
            assert_eq!(
                ParabolicAlgorithm::Intersection.resolve(scale, 0.2),
                LineAlgorithm::Intersection
            );
        }
    }

    #[test]
    fn test_scale_validation() {
        assert!(Scale::<2>::from(1.0).validate().is_ok());
        assert_eq!(
            Scale::from([1.0, 0.0]).validate(),
            Err(MorphologyError::InvalidScale { axis: 1, value: 0.0 })
        );
        assert!(Scale::<1>::from(f64::INFINITY).validate().is_err());
        assert_eq!(
            Radius::from([-2.0, 1.0]).validate(),
            Err(MorphologyError::InvalidRadius { axis: 0, value: -2.0 })
        );
        assert_eq!(Radius::<2>::from(4.0).to_scale(), Scale([8.0, 8.0]));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serde() -> Result<(), Box<dyn std::error::Error>> {
        let config = ParabolicConfig::default().with_strategy(ExecutionStrategy::Fixed(4));
        let json = serde_json::to_string(&config)?;
        let back: ParabolicConfig = serde_json::from_str(&json)?;
        assert_eq!(config, back);
        Ok(())
    }
}
