use paramorph_tensor::AxisLanes;
use rayon::prelude::*;
use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// Input and output sizes do not match.
    #[error("source and destination slices must have the same length")]
    SizeMismatch,
}

/// Controls how the lines of an axis pass are distributed over threads.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Use the ambient Rayon thread pool and process lines in parallel.
    #[default]
    Parallel,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every top-level call, which has significant overhead.
    /// Use this primarily for benchmarking or specific isolation needs.
    Fixed(usize),
}

impl ExecutionStrategy {
    /// Whether work should be split across threads.
    #[inline]
    pub fn is_parallel(&self) -> bool {
        !matches!(self, ExecutionStrategy::Serial)
    }

    /// Run `op` under this strategy.
    ///
    /// For [`ExecutionStrategy::Fixed`] a dedicated pool is built and `op` runs inside it, so every
    /// Rayon call made by `op` uses that pool. The other strategies call `op` directly.
    ///
    /// # Errors
    ///
    /// Returns [`ParallelError::InvalidThreadCount`] for `Fixed(0)` and
    /// [`ParallelError::BuildError`] if the pool cannot be created.
    pub fn install<R, F>(&self, op: F) -> Result<R, ParallelError>
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        match *self {
            ExecutionStrategy::Serial | ExecutionStrategy::Parallel => Ok(op()),
            ExecutionStrategy::Fixed(n) => {
                if n == 0 {
                    return Err(ParallelError::InvalidThreadCount(n));
                }
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| ParallelError::BuildError(e.to_string()))?;
                Ok(pool.install(op))
            }
        }
    }
}

/// Transform every line of `data` running along the axis described by `lanes`.
///
/// `init` creates the per-thread scratch state handed to `op`, which is called once per line with
/// a contiguous buffer holding that line's samples and must leave the transformed samples in it.
/// Lines are independent: with a parallel strategy they are distributed across threads and every
/// thread owns its scratch.
///
/// Lines along the last axis are contiguous and transformed in place. For any other axis each
/// line is gathered into a line-major copy, transformed there, and scattered back one outer block
/// at a time.
///
/// # Errors
///
/// Returns [`ParallelError::SizeMismatch`] if `data` does not hold exactly the elements `lanes`
/// describes.
pub fn transform_lines<T, S, I, F>(
    data: &mut [T],
    lanes: AxisLanes,
    strategy: ExecutionStrategy,
    init: I,
    op: F,
) -> Result<(), ParallelError>
where
    T: Copy + Send + Sync,
    I: Fn() -> S + Send + Sync,
    F: Fn(&mut S, &mut [T]) + Send + Sync,
{
    if data.len() != lanes.num_lines() * lanes.len {
        return Err(ParallelError::SizeMismatch);
    }
    if data.is_empty() {
        return Ok(());
    }

    if !strategy.is_parallel() {
        transform_lines_serial(data, lanes, init, op);
        return Ok(());
    }

    if lanes.is_contiguous() {
        data.par_chunks_mut(lanes.len)
            .for_each_init(&init, |scratch, line| op(scratch, line));
        return Ok(());
    }

    // gather -> transform -> scatter, no two threads ever write the same block
    let mut lines = data.to_vec();
    {
        let src: &[T] = data;
        lines
            .par_chunks_mut(lanes.len)
            .enumerate()
            .for_each_init(&init, |scratch, (i, line)| {
                line.iter_mut()
                    .zip(lanes.gather(src, i))
                    .for_each(|(dst, v)| *dst = v);
                op(scratch, line);
            });
    }
    data.par_chunks_mut(lanes.block_len())
        .zip(lines.par_chunks(lanes.block_len()))
        .for_each(|(block, block_lines)| lanes.scatter_block(block, block_lines));

    Ok(())
}

fn transform_lines_serial<T, S, I, F>(data: &mut [T], lanes: AxisLanes, init: I, op: F)
where
    T: Copy,
    I: Fn() -> S,
    F: Fn(&mut S, &mut [T]),
{
    let mut scratch = init();
    if lanes.is_contiguous() {
        data.chunks_mut(lanes.len)
            .for_each(|line| op(&mut scratch, line));
        return;
    }

    let mut line = Vec::with_capacity(lanes.len);
    for block in data.chunks_mut(lanes.block_len()) {
        for i in 0..lanes.inner {
            line.clear();
            line.extend((0..lanes.len).map(|k| block[k * lanes.inner + i]));
            op(&mut scratch, &mut line);
            for (k, &v) in line.iter().enumerate() {
                block[k * lanes.inner + i] = v;
            }
        }
    }
}

/// Apply a function to each pixel pair in parallel.
///
/// # Errors
///
/// Returns [`ParallelError::SizeMismatch`] if the slices differ in length.
pub fn par_iter_val<T1, T2>(
    src: &[T1],
    dst: &mut [T2],
    f: impl Fn(&T1, &mut T2) + Send + Sync,
) -> Result<(), ParallelError>
where
    T1: Sync,
    T2: Send,
{
    if src.len() != dst.len() {
        return Err(ParallelError::SizeMismatch);
    }
    src.par_iter()
        .zip(dst.par_iter_mut())
        .with_min_len(PIXEL_CHUNK)
        .for_each(|(s, d)| f(s, d));
    Ok(())
}

/// Apply a function to each pixel in parallel with two source values.
///
/// # Errors
///
/// Returns [`ParallelError::SizeMismatch`] if the slices differ in length.
pub fn par_iter_val_two<T1, T2, T3>(
    src1: &[T1],
    src2: &[T2],
    dst: &mut [T3],
    f: impl Fn(&T1, &T2, &mut T3) + Send + Sync,
) -> Result<(), ParallelError>
where
    T1: Sync,
    T2: Sync,
    T3: Send,
{
    if src1.len() != dst.len() || src2.len() != dst.len() {
        return Err(ParallelError::SizeMismatch);
    }
    src1.par_iter()
        .zip(src2.par_iter())
        .zip(dst.par_iter_mut())
        .with_min_len(PIXEL_CHUNK)
        .for_each(|((a, b), d)| f(a, b, d));
    Ok(())
}

const PIXEL_CHUNK: usize = 4096;
