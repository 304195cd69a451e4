use crate::tensor::TensorError;

/// Geometry of the 1-D lines running along one axis of a row-major tensor.
///
/// A row-major buffer of shape `[d0, .., dn]` decomposes around axis `a` into `outer` blocks of
/// `len * inner` contiguous elements, where `len = d_a`, `outer = d0 * .. * d(a-1)` and
/// `inner = d(a+1) * .. * dn`. Line `i` starts at `(i / inner) * len * inner + i % inner` and its
/// `k`-th element sits `k * inner` further along.
///
/// Lines never share an element, so the lines of one outer block can be written back without
/// touching any other block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisLanes {
    /// Number of elements in every line.
    pub len: usize,
    /// Distance in memory between consecutive elements of a line.
    pub inner: usize,
    /// Number of contiguous blocks the lines are grouped into.
    pub outer: usize,
}

impl AxisLanes {
    /// Compute the line geometry of `shape` along `axis`.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::AxisOutOfBounds`] if `axis >= N`.
    pub fn new<const N: usize>(shape: &[usize; N], axis: usize) -> Result<Self, TensorError> {
        if axis >= N {
            return Err(TensorError::AxisOutOfBounds { axis, ndim: N });
        }
        Ok(Self {
            len: shape[axis],
            inner: shape[axis + 1..].iter().product(),
            outer: shape[..axis].iter().product(),
        })
    }

    /// Total number of lines.
    #[inline]
    pub fn num_lines(&self) -> usize {
        self.outer * self.inner
    }

    /// Number of elements in one outer block.
    #[inline]
    pub fn block_len(&self) -> usize {
        self.len * self.inner
    }

    /// Whether the lines are contiguous in memory (stride 1).
    #[inline]
    pub fn is_contiguous(&self) -> bool {
        self.inner == 1
    }

    /// Memory offset of the first element of line `line`.
    #[inline]
    pub fn line_start(&self, line: usize) -> usize {
        (line / self.inner) * self.block_len() + line % self.inner
    }

    /// Iterate over the elements of line `line` in `data`.
    ///
    /// # Panics
    ///
    /// Panics if `data` is shorter than the tensor the lanes were computed for.
    pub fn gather<'a, T: Copy>(
        &self,
        data: &'a [T],
        line: usize,
    ) -> impl Iterator<Item = T> + 'a {
        let start = self.line_start(line);
        let inner = self.inner;
        (0..self.len).map(move |k| data[start + k * inner])
    }

    /// Write line-major `lines` back into a single outer block.
    ///
    /// `lines` holds the `inner` lines of the block back to back, `len` elements each, which is
    /// the layout produced by gathering lines `block * inner .. (block + 1) * inner` in order.
    pub fn scatter_block<T: Copy>(&self, block: &mut [T], lines: &[T]) {
        for (i, line) in lines.chunks_exact(self.len.max(1)).enumerate() {
            for (k, &v) in line.iter().enumerate() {
                block[k * self.inner + i] = v;
            }
        }
    }
}
