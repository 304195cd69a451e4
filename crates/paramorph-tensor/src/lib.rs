#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! `paramorph-tensor` holds the array plumbing the morphology engine is built on: an owned,
//! contiguous, row-major N-dimensional [`Tensor`] and the geometry of the 1-D lines that run along
//! one of its axes ([`AxisLanes`]).
//!
//! # Quick Start
//!
//! ```rust
//! use paramorph_tensor::Tensor;
//!
//! let t = Tensor::<f32, 2>::from_shape_vec([2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
//! assert_eq!(t.get([1, 2]), Some(&6.0));
//! assert_eq!(t.strides, [3, 1]);
//!
//! // the lines running along axis 0 are the columns
//! let lanes = t.lanes(0).unwrap();
//! assert_eq!(lanes.num_lines(), 3);
//! assert_eq!(lanes.gather(t.as_slice(), 1).collect::<Vec<_>>(), vec![2.0, 5.0]);
//! ```

/// Axis line geometry for contiguous tensors.
pub mod lanes;

/// Serde support for tensors.
#[cfg(feature = "serde")]
pub mod serde;

/// Tensor module containing the main tensor implementation and error types.
pub mod tensor;

pub use crate::lanes::AxisLanes;
pub use crate::tensor::{get_strides_from_shape, Tensor, TensorError};

