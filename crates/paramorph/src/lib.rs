//! Fast N-dimensional morphology with parabolic structuring elements.
//!
//! ```
//! use paramorph::image::Image;
//! use paramorph::imgproc::morphology::{erode, ParabolicConfig};
//!
//! let src = Image::<u8, 2>::new([3, 3], vec![9, 9, 9, 9, 0, 9, 9, 9, 9]).unwrap();
//! let mut dst = Image::<f64, 2>::from_size_val(src.size(), 0.0);
//! erode(&src, &mut dst, 0.5, &ParabolicConfig::default()).unwrap();
//! assert_eq!(dst.as_slice(), &[2.0, 1.0, 2.0, 1.0, 0.0, 1.0, 2.0, 1.0, 2.0]);
//! ```

#[doc(inline)]
pub use paramorph_tensor as tensor;

#[doc(inline)]
pub use paramorph_image as image;

#[doc(inline)]
pub use paramorph_imgproc as imgproc;
