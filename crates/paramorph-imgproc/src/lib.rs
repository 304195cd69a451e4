#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// parabolic morphology module.
pub mod morphology;

/// image padding and cropping module.
pub mod padding;

/// module containing parallelization utilities.
pub mod parallel;

/// image thresholding module.
pub mod threshold;
