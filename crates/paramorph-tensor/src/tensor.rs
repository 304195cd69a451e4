use thiserror::Error;

use crate::lanes::AxisLanes;

/// An error type for tensor operations.
#[derive(Error, Debug, PartialEq)]
pub enum TensorError {
    /// Tensor shape does not match the provided data.
    ///
    /// The product of the shape dimensions must equal the number of elements exactly.
    #[error("Shape mismatch: expected {expected} elements for shape, but got {actual} elements in data")]
    InvalidShape {
        /// Expected number of elements based on shape
        expected: usize,
        /// Actual number of elements in the data
        actual: usize,
    },

    /// The requested axis does not exist.
    #[error("Axis {axis} out of bounds for a tensor with {ndim} dimensions")]
    AxisOutOfBounds {
        /// The requested axis
        axis: usize,
        /// The number of dimensions of the tensor
        ndim: usize,
    },
}

impl TensorError {
    /// Creates an InvalidShape error with clear context.
    pub fn invalid_shape(expected: usize, actual: usize) -> Self {
        Self::InvalidShape { expected, actual }
    }
}

/// Computes the strides for a row-major (C-contiguous) tensor layout.
///
/// The rightmost dimension has stride 1, and each dimension's stride is the product of all
/// dimensions to its right.
///
/// # Examples
///
/// ```rust
/// use paramorph_tensor::get_strides_from_shape;
///
/// assert_eq!(get_strides_from_shape([2, 3]), [3, 1]);
/// assert_eq!(get_strides_from_shape([2, 3, 4]), [12, 4, 1]);
/// ```
pub fn get_strides_from_shape<const N: usize>(shape: [usize; N]) -> [usize; N] {
    let mut strides: [usize; N] = [0; N];
    let mut stride = 1;
    for i in (0..shape.len()).rev() {
        strides[i] = stride;
        stride *= shape[i];
    }
    strides
}

/// A multi-dimensional array with owned, contiguous, row-major data.
///
/// # Type Parameters
///
/// * `T` - The element type stored in the tensor
/// * `N` - The number of dimensions (const generic, checked at compile time)
///
/// The last axis varies fastest in memory. The morphology engine relies on this: every line
/// along axis `a` is a strided view with stride `strides[a]`, see [`Tensor::lanes`].
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor<T, const N: usize> {
    data: Vec<T>,
    /// The shape of the tensor.
    pub shape: [usize; N],
    /// The strides of the tensor data in memory.
    pub strides: [usize; N],
}

impl<T, const N: usize> Tensor<T, N> {
    /// Creates a new `Tensor` with the given shape and data.
    ///
    /// # Errors
    ///
    /// If the number of elements in the data does not match the shape of the tensor, an error is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use paramorph_tensor::Tensor;
    ///
    /// let t = Tensor::<u8, 2>::from_shape_vec([2, 2], vec![1, 2, 3, 4]).unwrap();
    /// assert_eq!(t.shape, [2, 2]);
    /// ```
    pub fn from_shape_vec(shape: [usize; N], data: Vec<T>) -> Result<Self, TensorError> {
        let numel = shape.iter().product::<usize>();
        if numel != data.len() {
            return Err(TensorError::invalid_shape(numel, data.len()));
        }
        let strides = get_strides_from_shape(shape);
        Ok(Self {
            data,
            shape,
            strides,
        })
    }

    /// Creates a new `Tensor` with the given shape filled with `value`.
    ///
    /// ```
    /// use paramorph_tensor::Tensor;
    ///
    /// let t = Tensor::<u8, 3>::from_shape_val([2, 1, 3], 2);
    /// assert_eq!(t.as_slice(), &[2, 2, 2, 2, 2, 2]);
    /// ```
    pub fn from_shape_val(shape: [usize; N], value: T) -> Self
    where
        T: Clone,
    {
        let numel = shape.iter().product::<usize>();
        Self {
            data: vec![value; numel],
            shape,
            strides: get_strides_from_shape(shape),
        }
    }

    /// Create a new `Tensor` with the given shape and a function to generate the data.
    ///
    /// The function `f` is called with the index of the element to generate.
    ///
    /// ```
    /// use paramorph_tensor::Tensor;
    ///
    /// let t = Tensor::<u8, 2>::from_shape_fn([2, 2], |[i, j]| (i * 2 + j) as u8);
    /// assert_eq!(t.as_slice(), &[0, 1, 2, 3]);
    /// ```
    pub fn from_shape_fn<F>(shape: [usize; N], f: F) -> Self
    where
        F: Fn([usize; N]) -> T,
    {
        let strides = get_strides_from_shape(shape);
        let numel = shape.iter().product::<usize>();
        let data = (0..numel)
            .map(|offset| f(unravel_offset(offset, &strides)))
            .collect();
        Self {
            data,
            shape,
            strides,
        }
    }

    /// Get the data of the tensor as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the data of the tensor as a mutable slice.
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Returns the number of elements in the tensor.
    #[inline]
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Returns the number of dimensions of the tensor.
    #[inline]
    pub const fn ndim(&self) -> usize {
        N
    }

    /// Get the offset of the element at the given index, or `None` if any index is out of range.
    pub fn get_iter_offset(&self, index: [usize; N]) -> Option<usize> {
        let mut offset = 0;
        for ((&idx, dim_size), stride) in index.iter().zip(self.shape).zip(self.strides) {
            if idx >= dim_size {
                return None;
            }
            offset += idx * stride;
        }
        Some(offset)
    }

    /// Get the element at the given index, checking if the index is out of bounds.
    ///
    /// ```
    /// use paramorph_tensor::Tensor;
    ///
    /// let t = Tensor::<u8, 2>::from_shape_vec([2, 2], vec![1, 2, 3, 4]).unwrap();
    /// assert_eq!(t.get([1, 0]), Some(&3));
    /// assert!(t.get([2, 0]).is_none());
    /// ```
    pub fn get(&self, index: [usize; N]) -> Option<&T> {
        self.get_iter_offset(index).and_then(|i| self.data.get(i))
    }

    /// Mutable counterpart of [`Self::get`].
    pub fn get_mut(&mut self, index: [usize; N]) -> Option<&mut T> {
        self.get_iter_offset(index)
            .and_then(move |i| self.data.get_mut(i))
    }

    /// Apply a function to each element, producing a new tensor of the same shape.
    pub fn map<U, F>(&self, f: F) -> Tensor<U, N>
    where
        F: Fn(&T) -> U,
    {
        Tensor {
            data: self.data.iter().map(f).collect(),
            shape: self.shape,
            strides: self.strides,
        }
    }

    /// Describe the 1-D lines of this tensor that run along `axis`.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::AxisOutOfBounds`] if `axis >= N`.
    pub fn lanes(&self, axis: usize) -> Result<AxisLanes, TensorError> {
        AxisLanes::new(&self.shape, axis)
    }
}

fn unravel_offset<const N: usize>(offset: usize, strides: &[usize; N]) -> [usize; N] {
    let mut idx = [0; N];
    let mut rem = offset;
    for (dim_i, &s) in strides.iter().enumerate() {
        // zero-sized shapes produce zero strides; no element reaches here in that case
        if s == 0 {
            continue;
        }
        idx[dim_i] = rem / s;
        rem %= s;
    }
    idx
}
