use num_traits::Float;

/// Direction of a parabolic transform, resolved at compile time.
///
/// Erosion computes `g(x) = min_y f(y) + m (x - y)^2` and dilation computes
/// `g(x) = max_y f(y) - m (x - y)^2`. Dilation is evaluated as the erosion of `-f` followed by a
/// negation, and both steps are exact in floating point, so `dilate(f) == -erode(-f)` holds
/// bit for bit for either line algorithm.
pub trait Polarity: Send + Sync + 'static {
    /// `true` for dilation.
    const DILATE: bool;

    /// Human readable name, used in log messages.
    const NAME: &'static str;

    /// The "nothing found yet" baseline of the contact point search.
    fn extreme<T: Float>() -> T;

    /// Whether `candidate` replaces `current` as the running extremum. Ties replace.
    fn prefer<T: Float>(candidate: T, current: T) -> bool;

    /// Map a sample into erosion space and back.
    fn orient<T: Float>(value: T) -> T;
}

/// Marker for the parabolic erosion.
#[derive(Debug, Clone, Copy, Default)]
pub struct Erosion;

/// Marker for the parabolic dilation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dilation;

impl Polarity for Erosion {
    const DILATE: bool = false;
    const NAME: &'static str = "erosion";

    #[inline(always)]
    fn extreme<T: Float>() -> T {
        T::infinity()
    }

    #[inline(always)]
    fn prefer<T: Float>(candidate: T, current: T) -> bool {
        candidate <= current
    }

    #[inline(always)]
    fn orient<T: Float>(value: T) -> T {
        value
    }
}

impl Polarity for Dilation {
    const DILATE: bool = true;
    const NAME: &'static str = "dilation";

    #[inline(always)]
    fn extreme<T: Float>() -> T {
        T::neg_infinity()
    }

    #[inline(always)]
    fn prefer<T: Float>(candidate: T, current: T) -> bool {
        candidate >= current
    }

    #[inline(always)]
    fn orient<T: Float>(value: T) -> T {
        -value
    }
}

// 0, 1, 2, .. built by repeated addition, exact up to the mantissa width
fn extend_positions<T: Float>(positions: &mut Vec<T>, len: usize) {
    while positions.len() < len {
        let next = positions.last().map_or(T::zero(), |&p| p + T::one());
        positions.push(next);
    }
}

/// Reusable buffers for [`transform_line_contact_point`].
#[derive(Debug, Clone, Default)]
pub struct ContactPointWorkspace<T> {
    tmp: Vec<T>,
    squares: Vec<T>,
    positions: Vec<T>,
}

impl<T: Float> ContactPointWorkspace<T> {
    /// Create an empty workspace. Buffers grow on first use.
    pub fn new() -> Self {
        Self {
            tmp: Vec::new(),
            squares: Vec::new(),
            positions: Vec::new(),
        }
    }

    fn prepare(&mut self, len: usize) {
        self.tmp.resize(len, T::zero());
        if self.squares.len() < len {
            extend_positions(&mut self.positions, len);
            self.squares = self.positions.iter().map(|&p| p * p).collect();
        }
    }
}

/// Parabolic erosion or dilation of one line with the contact point algorithm.
///
/// A forward sweep folds in the left half of the parabola and a backward sweep the right half.
/// Each sweep only revisits offsets from the previous contact point onwards: the best offset moves
/// monotonically along the line, so the narrowed search still returns the exact extremum. Cost is
/// data dependent, close to linear for small scales and quadratic in the worst case.
///
/// # Arguments
///
/// * `line` - The samples, transformed in place. Only `[0, line.len())` is ever read.
/// * `workspace` - Scratch buffers, reused across lines.
/// * `magnitude` - The positive curvature `m` of the parabola, i.e. `spacing^2 / (2 * scale)`.
///
/// # Example
///
/// ```
/// use paramorph_imgproc::morphology::{transform_line_contact_point, ContactPointWorkspace, Erosion};
///
/// let mut line = vec![4.0f64, 4.0, 0.0, 4.0, 4.0];
/// let mut workspace = ContactPointWorkspace::new();
/// transform_line_contact_point::<_, Erosion>(&mut line, &mut workspace, 1.0);
/// assert_eq!(line, vec![4.0, 1.0, 0.0, 1.0, 4.0]);
/// ```
pub fn transform_line_contact_point<T: Float, P: Polarity>(
    line: &mut [T],
    workspace: &mut ContactPointWorkspace<T>,
    magnitude: T,
) {
    let len = line.len();
    if len <= 1 {
        return;
    }
    workspace.prepare(len);
    let tmp = &mut workspace.tmp[..len];
    let squares = &workspace.squares[..len];
    let curvature = P::orient(magnitude);

    // left half of the parabola, candidates pos - reach ..= pos
    let mut reach = 0usize;
    for pos in 0..len {
        let mut best = P::extreme::<T>();
        let mut contact = 0usize;
        for d in (0..=reach).rev() {
            let t = line[pos - d] + curvature * squares[d];
            if P::prefer(t, best) {
                best = t;
                contact = d;
            }
        }
        tmp[pos] = best;
        reach = contact + 1;
    }

    // right half, candidates pos ..= pos + reach
    let mut reach = 0usize;
    for pos in (0..len).rev() {
        let mut best = P::extreme::<T>();
        let mut contact = 0usize;
        for d in (0..=reach).rev() {
            let t = tmp[pos + d] + curvature * squares[d];
            if P::prefer(t, best) {
                best = t;
                contact = d;
            }
        }
        line[pos] = best;
        reach = contact + 1;
    }
}

/// Reusable buffers for [`transform_line_intersection`].
#[derive(Debug, Clone, Default)]
pub struct IntersectionWorkspace<T> {
    envelope: Vec<T>,
    apex: Vec<usize>,
    bounds: Vec<T>,
    positions: Vec<T>,
}

impl<T: Float> IntersectionWorkspace<T> {
    /// Create an empty workspace. Buffers grow on first use.
    pub fn new() -> Self {
        Self {
            envelope: Vec::new(),
            apex: Vec::new(),
            bounds: Vec::new(),
            positions: Vec::new(),
        }
    }

    fn prepare(&mut self, len: usize) {
        self.envelope.resize(len, T::zero());
        self.apex.resize(len, 0);
        self.bounds.resize(len + 1, T::zero());
        extend_positions(&mut self.positions, len);
    }
}

/// Parabolic erosion or dilation of one line with the lower envelope algorithm.
///
/// Builds the lower envelope of the parabolas `f(v)/m + (x - v)^2` rooted at every sample with a
/// stack of apexes and the breakpoints between them, then reads the envelope back at every
/// position. Strictly `O(n)` per line.
///
/// The envelope is stored relative to `1/m` and squared positions, so for long lines in single
/// precision the reconstruction `m * (q (q - 2v) + F[v])` loses digits to cancellation. Prefer
/// `f64` samples for lines longer than a few thousand samples.
///
/// # Arguments
///
/// * `line` - The samples, transformed in place.
/// * `workspace` - Scratch buffers, reused across lines.
/// * `magnitude` - The positive curvature `m` of the parabola, i.e. `spacing^2 / (2 * scale)`.
///
/// # Example
///
/// ```
/// use paramorph_imgproc::morphology::{transform_line_intersection, Dilation, IntersectionWorkspace};
///
/// let mut line = vec![0.0f64, 0.0, 9.0, 0.0, 0.0];
/// let mut workspace = IntersectionWorkspace::new();
/// transform_line_intersection::<_, Dilation>(&mut line, &mut workspace, 2.0);
/// assert_eq!(line, vec![1.0, 7.0, 9.0, 7.0, 1.0]);
/// ```
pub fn transform_line_intersection<T: Float, P: Polarity>(
    line: &mut [T],
    workspace: &mut IntersectionWorkspace<T>,
    magnitude: T,
) {
    let len = line.len();
    if len <= 1 {
        return;
    }
    workspace.prepare(len);
    let IntersectionWorkspace {
        envelope: f,
        apex: v,
        bounds: z,
        positions: x,
    } = workspace;
    let two = T::one() + T::one();

    let intersect = |f: &[T], a: usize, b: usize| (f[b] - f[a]) / (two * (x[b] - x[a]));

    f[0] = P::orient(line[0]) / magnitude;
    v[0] = 0;
    z[0] = T::neg_infinity();
    z[1] = T::infinity();
    let mut k = 0usize;

    for q in 1..len {
        f[q] = P::orient(line[q]) / magnitude + x[q] * x[q];
        let mut s = intersect(f, v[k], q);
        while k > 0 && s <= z[k] {
            k -= 1;
            s = intersect(f, v[k], q);
        }
        k += 1;
        v[k] = q;
        z[k] = s;
        z[k + 1] = T::infinity();
    }

    k = 0;
    for (q, out) in line.iter_mut().enumerate() {
        let xq = x[q];
        while z[k + 1] < xq {
            k += 1;
        }
        let apex = v[k];
        *out = P::orient((xq * (xq - two * x[apex]) + f[apex]) * magnitude);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn brute_force<P: Polarity>(line: &[f64], magnitude: f64) -> Vec<f64> {
        (0..line.len())
            .map(|x| {
                line.iter().enumerate().fold(P::extreme::<f64>(), |best, (y, &fy)| {
                    let d = x as f64 - y as f64;
                    let t = fy + P::orient(magnitude) * d * d;
                    if P::prefer(t, best) {
                        t
                    } else {
                        best
                    }
                })
            })
            .collect()
    }

    #[test]
    fn test_length_one_is_noop() {
        let mut line = vec![3.5f32];
        transform_line_contact_point::<_, Erosion>(&mut line, &mut ContactPointWorkspace::new(), 1.0);
        transform_line_intersection::<_, Dilation>(&mut line, &mut IntersectionWorkspace::new(), 1.0);
        assert_eq!(line, vec![3.5]);

        let mut empty: Vec<f32> = vec![];
        transform_line_intersection::<_, Erosion>(&mut empty, &mut IntersectionWorkspace::new(), 1.0);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_intersection_erosion_non_unit_magnitude() {
        // the first sample must be scaled like every other one
        let mut line = vec![10.0f64, 0.0, 10.0];
        transform_line_intersection::<_, Erosion>(&mut line, &mut IntersectionWorkspace::new(), 4.0);
        assert_eq!(line, vec![4.0, 0.0, 4.0]);
    }

    #[test]
    fn test_contact_point_dilation() {
        let mut line = vec![0.0f64, 0.0, 9.0, 0.0, 0.0];
        transform_line_contact_point::<_, Dilation>(&mut line, &mut ContactPointWorkspace::new(), 2.0);
        assert_eq!(line, vec![1.0, 7.0, 9.0, 7.0, 1.0]);
    }

    #[test]
    fn test_algorithms_match_brute_force() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut cp = ContactPointWorkspace::new();
        let mut ia = IntersectionWorkspace::new();
        for &magnitude in &[0.01, 0.3, 1.0, 25.0] {
            for len in [2usize, 3, 17, 64] {
                let line: Vec<f64> = (0..len).map(|_| rng.random_range(-50.0..50.0)).collect();

                let expected = brute_force::<Erosion>(&line, magnitude);
                let mut a = line.clone();
                transform_line_contact_point::<_, Erosion>(&mut a, &mut cp, magnitude);
                let mut b = line.clone();
                transform_line_intersection::<_, Erosion>(&mut b, &mut ia, magnitude);
                for i in 0..len {
                    assert_relative_eq!(a[i], expected[i], epsilon = 1e-9, max_relative = 1e-9);
                    assert_relative_eq!(b[i], expected[i], epsilon = 1e-9, max_relative = 1e-9);
                }

                let expected = brute_force::<Dilation>(&line, magnitude);
                let mut a = line.clone();
                transform_line_contact_point::<_, Dilation>(&mut a, &mut cp, magnitude);
                let mut b = line.clone();
                transform_line_intersection::<_, Dilation>(&mut b, &mut ia, magnitude);
                for i in 0..len {
                    assert_relative_eq!(a[i], expected[i], epsilon = 1e-9, max_relative = 1e-9);
                    assert_relative_eq!(b[i], expected[i], epsilon = 1e-9, max_relative = 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_duality_is_exact() {
        let mut rng = StdRng::seed_from_u64(11);
        let line: Vec<f32> = (0..40).map(|_| rng.random_range(0.0..255.0)).collect();
        let negated: Vec<f32> = line.iter().map(|v| -v).collect();

        let mut dil = line.clone();
        let mut ero = negated.clone();
        transform_line_intersection::<_, Dilation>(&mut dil, &mut IntersectionWorkspace::new(), 0.7);
        transform_line_intersection::<_, Erosion>(&mut ero, &mut IntersectionWorkspace::new(), 0.7);
        assert!(dil.iter().zip(&ero).all(|(d, e)| *d == -*e));

        let mut dil = line.clone();
        let mut ero = negated;
        transform_line_contact_point::<_, Dilation>(&mut dil, &mut ContactPointWorkspace::new(), 0.7);
        transform_line_contact_point::<_, Erosion>(&mut ero, &mut ContactPointWorkspace::new(), 0.7);
        assert!(dil.iter().zip(&ero).all(|(d, e)| *d == -*e));
    }

    #[test]
    fn test_workspace_reuse_across_lengths() {
        let mut ws = IntersectionWorkspace::new();
        let mut long = vec![100.0f64; 10];
        long[9] = -9.0;
        transform_line_intersection::<_, Erosion>(&mut long, &mut ws, 1.0);
        assert_eq!(long[0], 72.0);

        let mut short = vec![5.0f64, -1.0, 5.0];
        transform_line_intersection::<_, Erosion>(&mut short, &mut ws, 1.0);
        assert_eq!(short, vec![0.0, -1.0, 0.0]);
    }
}
