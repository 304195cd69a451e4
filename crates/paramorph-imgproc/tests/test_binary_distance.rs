use approx::assert_relative_eq;
use paramorph_image::Image;
use paramorph_imgproc::morphology::{
    binary_dilate, binary_erode, binary_open, distance_transform, signed_distance_transform,
    MorphologyError, ParabolicAlgorithm, ParabolicConfig, StructuringShape,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_mask(rng: &mut StdRng, shape: [usize; 2], density: f64) -> Image<u8, 2> {
    let data = (0..shape[0] * shape[1])
        .map(|_| u8::from(rng.random_bool(density)))
        .collect();
    Image::new(shape, data).unwrap()
}

// squared distance from every sample to the nearest sample where `target` holds
fn brute_force_sq_distance(
    mask: &Image<u8, 2>,
    spacing: [f64; 2],
    target: impl Fn(u8) -> bool,
) -> Vec<f64> {
    let [rows, cols] = mask.size();
    let mut out = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            let mut best = f64::INFINITY;
            for y in 0..rows {
                for x in 0..cols {
                    if !target(mask.as_slice()[y * cols + x]) {
                        continue;
                    }
                    let dy = (r as f64 - y as f64) * spacing[0];
                    let dx = (c as f64 - x as f64) * spacing[1];
                    best = best.min(dy * dy + dx * dx);
                }
            }
            out.push(best);
        }
    }
    out
}

#[test]
fn test_binary_dilate_disk_256() -> Result<(), MorphologyError> {
    let mut src = Image::<u8, 2>::from_size_val([256, 256], 0);
    if let Some(v) = src.get_mut([128, 128]) {
        *v = 1;
    }
    let mut dst = src.clone();
    binary_dilate(&src, &mut dst, 5.0, StructuringShape::Circular, &ParabolicConfig::default())?;

    let mut on = 0;
    for r in 0..256i64 {
        for c in 0..256i64 {
            let d2 = (r - 128).pow(2) + (c - 128).pow(2);
            let expected = u8::from(d2 <= 25);
            assert_eq!(dst.get([r as usize, c as usize]), Some(&expected), "at {r},{c}");
            on += usize::from(expected);
        }
    }
    // lattice points in a disc of radius 5
    assert_eq!(on, 81);
    Ok(())
}

#[test]
fn test_binary_algorithms_agree() -> Result<(), MorphologyError> {
    let mut rng = StdRng::seed_from_u64(23);
    let src = random_mask(&mut rng, [40, 30], 0.2);
    for shape in [StructuringShape::Circular, StructuringShape::Rectangular] {
        let mut reference = src.clone();
        let ia = ParabolicConfig::default().with_algorithm(ParabolicAlgorithm::Intersection);
        binary_erode(&src, &mut reference, [2.5, 1.5], shape, &ia)?;

        let mut dst = src.clone();
        let cp = ParabolicConfig::default().with_algorithm(ParabolicAlgorithm::ContactPoint);
        binary_erode(&src, &mut dst, [2.5, 1.5], shape, &cp)?;
        assert_eq!(dst, reference);
    }
    Ok(())
}

#[test]
fn test_binary_open_idempotent() -> Result<(), MorphologyError> {
    let mut rng = StdRng::seed_from_u64(29);
    let src = random_mask(&mut rng, [32, 32], 0.7);
    let config = ParabolicConfig::default();
    let mut once = src.clone();
    let mut twice = src.clone();
    binary_open(&src, &mut once, 2.0, StructuringShape::Circular, false, &config)?;
    binary_open(&once, &mut twice, 2.0, StructuringShape::Circular, false, &config)?;
    assert_eq!(once, twice);
    Ok(())
}

#[test]
fn test_distance_matches_brute_force() -> Result<(), MorphologyError> {
    let mut rng = StdRng::seed_from_u64(31);
    let spacing = [1.0, 1.5];
    for algorithm in [ParabolicAlgorithm::ContactPoint, ParabolicAlgorithm::Intersection] {
        let mut src = random_mask(&mut rng, [24, 18], 0.9);
        // at least one background sample
        if let Some(v) = src.get_mut([5, 7]) {
            *v = 0;
        }
        let src = src.with_spacing(spacing)?;
        let expected = brute_force_sq_distance(&src, spacing, |v| v == 0);

        let config = ParabolicConfig::default()
            .with_image_spacing(true)
            .with_algorithm(algorithm);
        let mut dst = Image::<f64, 2>::from_size_val(src.size(), 0.0);
        distance_transform(&src, &mut dst, 0, false, &config)?;
        for (x, y) in dst.as_slice().iter().zip(&expected) {
            assert_relative_eq!(*x, y.sqrt(), epsilon = 1e-9);
        }
    }
    Ok(())
}

#[test]
fn test_distance_at_disk_centre() -> Result<(), MorphologyError> {
    let radius = 20i64;
    let size = 64usize;
    let centre = 32i64;
    let data = (0..size * size)
        .map(|i| {
            let (r, c) = ((i / size) as i64, (i % size) as i64);
            u8::from((r - centre).pow(2) + (c - centre).pow(2) <= radius * radius)
        })
        .collect();
    let src = Image::<u8, 2>::new([size, size], data)?;
    let mut dst = Image::<f32, 2>::from_size_val(src.size(), 0.0);
    distance_transform(&src, &mut dst, 0, false, &ParabolicConfig::default())?;

    let at_centre = dst.get([32, 32]).copied().unwrap_or(f32::NAN);
    assert!((at_centre - radius as f32).abs() <= 1.0, "got {at_centre}");
    Ok(())
}

#[test]
fn test_signed_distance_matches_brute_force() -> Result<(), MorphologyError> {
    let mut rng = StdRng::seed_from_u64(37);
    let src = random_mask(&mut rng, [20, 20], 0.5);
    let to_outside = brute_force_sq_distance(&src, [1.0, 1.0], |v| v == 0);
    let to_inside = brute_force_sq_distance(&src, [1.0, 1.0], |v| v == 1);

    let mut dst = Image::<f64, 2>::from_size_val(src.size(), 0.0);
    signed_distance_transform(&src, &mut dst, 0, false, &ParabolicConfig::default())?;
    for (i, v) in dst.as_slice().iter().enumerate() {
        let expected = if src.as_slice()[i] == 1 {
            -to_outside[i].sqrt()
        } else {
            to_inside[i].sqrt()
        };
        assert_relative_eq!(*v, expected, epsilon = 1e-9);
    }
    Ok(())
}
