use approx::assert_relative_eq;
use paramorph_image::Image;
use paramorph_imgproc::morphology::{
    close, dilate, erode, open, parabolic_axis_pass, safe_border_margins, Dilation, Erosion,
    MorphologyError, ParabolicAlgorithm, ParabolicConfig,
};
use paramorph_imgproc::padding::{crop, pad_constant};
use paramorph_imgproc::parallel::ExecutionStrategy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ALGORITHMS: [ParabolicAlgorithm; 3] = [
    ParabolicAlgorithm::ContactPoint,
    ParabolicAlgorithm::Intersection,
    ParabolicAlgorithm::Auto,
];

fn random_image<const N: usize>(rng: &mut StdRng, shape: [usize; N], hi: f64) -> Image<f64, N> {
    let numel = shape.iter().product();
    let data = (0..numel).map(|_| rng.random_range(0.0..hi)).collect();
    Image::new(shape, data).unwrap()
}

// O(n^2) reference on a 2-D image
fn brute_force_2d(src: &Image<f64, 2>, magnitude: [f64; 2], dilate: bool) -> Vec<f64> {
    let [rows, cols] = src.size();
    let mut out = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            let mut best = if dilate { f64::NEG_INFINITY } else { f64::INFINITY };
            for y in 0..rows {
                for x in 0..cols {
                    let dy = r as f64 - y as f64;
                    let dx = c as f64 - x as f64;
                    let penalty = magnitude[0] * dy * dy + magnitude[1] * dx * dx;
                    let v = src.as_slice()[y * cols + x];
                    best = if dilate {
                        best.max(v - penalty)
                    } else {
                        best.min(v + penalty)
                    };
                }
            }
            out.push(best);
        }
    }
    out
}

#[test]
fn test_matches_brute_force() -> Result<(), MorphologyError> {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let shape = [rng.random_range(1..12), rng.random_range(1..12)];
        let scale = [rng.random_range(0.02..4.0), rng.random_range(0.02..4.0)];
        let src = random_image(&mut rng, shape, 50.0);
        let magnitude = scale.map(|s| 1.0 / (2.0 * s));
        let expected_ero = brute_force_2d(&src, magnitude, false);
        let expected_dil = brute_force_2d(&src, magnitude, true);

        for algorithm in ALGORITHMS {
            let config = ParabolicConfig::default().with_algorithm(algorithm);
            let mut dst = src.clone();
            erode(&src, &mut dst, scale, &config)?;
            for (x, y) in dst.as_slice().iter().zip(&expected_ero) {
                assert_relative_eq!(*x, *y, epsilon = 1e-9, max_relative = 1e-12);
            }
            dilate(&src, &mut dst, scale, &config)?;
            for (x, y) in dst.as_slice().iter().zip(&expected_dil) {
                assert_relative_eq!(*x, *y, epsilon = 1e-9, max_relative = 1e-12);
            }
        }
    }
    Ok(())
}

#[test]
fn test_duality_is_exact() -> Result<(), MorphologyError> {
    let mut rng = StdRng::seed_from_u64(11);
    let src = random_image(&mut rng, [9, 13, 5], 100.0);
    let negated = src.map(|v| -v);
    for algorithm in ALGORITHMS {
        let config = ParabolicConfig::default().with_algorithm(algorithm);
        let mut dilated = src.clone();
        dilate(&src, &mut dilated, [0.05, 1.0, 3.0], &config)?;
        let mut eroded = src.clone();
        erode(&negated, &mut eroded, [0.05, 1.0, 3.0], &config)?;
        assert_eq!(dilated, eroded.map(|v| -v));
    }
    Ok(())
}

#[test]
fn test_axis_order_does_not_matter() -> Result<(), MorphologyError> {
    let mut rng = StdRng::seed_from_u64(3);
    let src = random_image(&mut rng, [6, 7, 8], 20.0);
    let scale = [0.3, 1.7, 0.9];
    let config = ParabolicConfig::default().with_strategy(ExecutionStrategy::Fixed(3));

    let mut expected = src.clone();
    erode(&src, &mut expected, scale, &config)?;

    for order in [[2, 0, 1], [1, 2, 0], [2, 1, 0]] {
        let mut permuted = src.clone();
        for axis in order {
            parabolic_axis_pass::<_, Erosion, 3>(&mut permuted, axis, scale[axis], &config)?;
        }
        for (x, y) in permuted.as_slice().iter().zip(expected.as_slice()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-9);
        }
    }
    Ok(())
}

#[test]
fn test_strategies_agree() -> Result<(), MorphologyError> {
    let mut rng = StdRng::seed_from_u64(5);
    let src = random_image(&mut rng, [17, 33, 9], 10.0);
    let mut reference = src.clone();
    let serial = ParabolicConfig::default().with_strategy(ExecutionStrategy::Serial);
    dilate(&src, &mut reference, 2.0, &serial)?;

    for strategy in [ExecutionStrategy::Parallel, ExecutionStrategy::Fixed(2)] {
        let mut dst = src.clone();
        let config = ParabolicConfig::default().with_strategy(strategy);
        dilate(&src, &mut dst, 2.0, &config)?;
        assert_eq!(dst, reference);
    }
    Ok(())
}

#[test]
fn test_open_close_idempotent() -> Result<(), MorphologyError> {
    let mut rng = StdRng::seed_from_u64(13);
    let src = random_image(&mut rng, [16, 12], 100.0);
    let config = ParabolicConfig::default();

    for scale in [0.4, 2.5, 10.0] {
        let mut once = src.clone();
        let mut twice = src.clone();
        open(&src, &mut once, scale, false, &config)?;
        open(&once, &mut twice, scale, false, &config)?;
        for (x, y) in once.as_slice().iter().zip(twice.as_slice()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-8);
        }

        close(&src, &mut once, scale, false, &config)?;
        close(&once, &mut twice, scale, false, &config)?;
        for (x, y) in once.as_slice().iter().zip(twice.as_slice()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-8);
        }
    }
    Ok(())
}

#[test]
fn test_safe_border_matches_large_padding() -> Result<(), MorphologyError> {
    let mut rng = StdRng::seed_from_u64(17);
    let src = random_image(&mut rng, [10, 14], 30.0);
    let (lo, hi) = src.min_max()?;
    let scale = [0.8, 1.6];
    let config = ParabolicConfig::default();

    let margins = safe_border_margins(&src, scale, false)?;
    let big = margins.map(|m| 3 * m + 5);

    for opening in [true, false] {
        let border = if opening { hi } else { lo };
        let mut padded = Image::from_size_val([10 + 2 * big[0], 14 + 2 * big[1]], border);
        pad_constant(&src, &mut padded, big, border)?;
        let mut reference = padded.clone();
        if opening {
            open(&padded, &mut reference, scale, false, &config)?;
        } else {
            close(&padded, &mut reference, scale, false, &config)?;
        }
        let mut expected = src.clone();
        crop(&reference, &mut expected, big)?;

        let mut dst = src.clone();
        if opening {
            open(&src, &mut dst, scale, true, &config)?;
        } else {
            close(&src, &mut dst, scale, true, &config)?;
        }
        for (x, y) in dst.as_slice().iter().zip(expected.as_slice()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-9);
        }
    }
    Ok(())
}

#[test]
fn test_spacing_compensated_scale() -> Result<(), MorphologyError> {
    let mut rng = StdRng::seed_from_u64(19);
    let src = random_image(&mut rng, [11, 15], 40.0);
    let unit = ParabolicConfig::default();
    let physical = ParabolicConfig::default().with_image_spacing(true);

    let mut expected = src.clone();
    dilate(&src, &mut expected, 0.5, &unit)?;

    // scale' = scale * spacing^2 gives the same curvature
    let spaced = src.clone().with_spacing([2.0, 0.5])?;
    let mut dst = spaced.clone();
    dilate(&spaced, &mut dst, [2.0, 0.125], &physical)?;
    assert_eq!(dst.as_slice(), expected.as_slice());

    let root_two = std::f64::consts::SQRT_2;
    let spaced = src.clone().with_spacing([root_two, root_two])?;
    dilate(&spaced, &mut dst, 1.0, &physical)?;
    for (x, y) in dst.as_slice().iter().zip(expected.as_slice()) {
        assert_relative_eq!(*x, *y, epsilon = 1e-9);
    }
    Ok(())
}

#[test]
fn test_degenerate_extents() -> Result<(), MorphologyError> {
    let config = ParabolicConfig::default();
    let empty = Image::<f32, 2>::from_size_val([0, 4], 0.0);
    let mut dst = empty.clone();
    erode(&empty, &mut dst, 1.0, &config)?;
    assert_eq!(dst.numel(), 0);

    let single = Image::<f32, 3>::from_size_val([1, 1, 1], 3.5);
    let mut dst = single.clone();
    dilate(&single, &mut dst, 1.0, &config)?;
    assert_eq!(dst.as_slice(), &[3.5]);
    parabolic_axis_pass::<_, Dilation, 3>(&mut dst, 2, 0.01, &config)?;
    assert_eq!(dst.as_slice(), &[3.5]);
    Ok(())
}
