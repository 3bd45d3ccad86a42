//! Contract Invariant Tests
//!
//! These tests verify the non-negotiable guarantees of generation.

use plaidicon_core::{
    generate, generate_icon, GenerateOptions, IconError, MiddleColor, RotationStep, StyleConfig,
    palette::BlockDivisor,
};

fn decode(png: &[u8]) -> image::RgbImage {
    let img = image::load_from_memory(png).unwrap();
    assert_eq!(img.color(), image::ColorType::Rgb8);
    img.to_rgb8()
}

#[test]
fn invariant_same_seed_same_bytes() {
    let options = GenerateOptions::new(200, "plaidicons");

    let first = generate(&options).unwrap();
    let second = generate(&options).unwrap();

    assert_eq!(first, second);
}

#[test]
fn invariant_different_seeds_differ() {
    let a = generate(&GenerateOptions::new(120, "alpha")).unwrap();
    let b = generate(&GenerateOptions::new(120, "omega")).unwrap();
    assert_ne!(a, b);
}

#[test]
fn invariant_output_is_size_square() {
    for size in [1, 500, 1000] {
        let png = generate(&GenerateOptions::new(size, "dimensions")).unwrap();
        let img = decode(&png);
        assert_eq!((img.width() as i64, img.height() as i64), (size, size));
    }
}

#[test]
fn invariant_large_output_is_size_square() {
    // A full-turn step keeps the rotation an identity, so only size is exercised.
    let style = StyleConfig {
        antialias: false,
        rotation: RotationStep::Snapped { step: 360 },
        ..Default::default()
    };
    let png = generate(&GenerateOptions::new(4000, "dimensions").with_style(style)).unwrap();
    let dimensions = image::ImageReader::new(std::io::Cursor::new(&png))
        .with_guessed_format()
        .unwrap()
        .into_dimensions()
        .unwrap();
    assert_eq!(dimensions, (4000, 4000));
}

#[test]
fn invariant_non_positive_size_rejected() {
    for size in [0, -5] {
        let result = generate(&GenerateOptions::new(size, "size"));
        assert!(matches!(result, Err(IconError::InvalidSize(s)) if s == size));
    }
}

#[test]
fn invariant_missing_seed_generates_one() {
    let options = GenerateOptions {
        size: 16,
        ..GenerateOptions::default()
    };
    let icon = generate_icon(&options).unwrap();
    assert_eq!(icon.seed.len(), 32);
    assert!(icon.seed.chars().all(|c| c.is_ascii_hexdigit()));

    // Replaying the reported seed reproduces the icon
    let replay = generate(&GenerateOptions::new(16, icon.seed.clone())).unwrap();
    assert_eq!(replay, icon.png);
}

#[test]
fn invariant_every_style_variant_is_deterministic() {
    let styles = [
        StyleConfig::default(),
        StyleConfig { antialias: false, ..Default::default() },
        StyleConfig { middle_color: MiddleColor::Average, ..Default::default() },
        StyleConfig { rotation: RotationStep::Continuous, ..Default::default() },
        StyleConfig {
            block_divisor: BlockDivisor::Fractional { min: 2.5, max: 4.0 },
            ..Default::default()
        },
    ];

    for style in styles {
        let options = GenerateOptions::new(64, "variants").with_style(style.clone());
        let a = generate(&options).unwrap();
        let b = generate(&options).unwrap();
        assert_eq!(a, b, "{style:?}");
        assert_eq!(decode(&a).dimensions(), (64, 64));
    }
}

#[test]
fn invariant_snapped_rotation_is_multiple_of_five() {
    for seed in ["a", "b", "c", "d", "e"] {
        let icon = generate_icon(&GenerateOptions::new(8, seed)).unwrap();
        assert_eq!(icon.rotation_degrees % 5.0, 0.0);
        assert!((0.0..=360.0).contains(&icon.rotation_degrees));
    }
}

#[test]
fn invariant_palette_uses_gray_background() {
    let icon = generate_icon(&GenerateOptions::new(50, "palette")).unwrap();
    assert_eq!(icon.palette.background.0, [236, 239, 240]);
    assert!(icon.block_size >= 1);
    assert!(icon.working_dimension >= icon.size);
}

#[test]
fn invariant_concurrent_calls_are_independent() {
    let options = GenerateOptions::new(96, "threads");
    let expected = generate(&options).unwrap();

    let results: Vec<Vec<u8>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4).map(|_| scope.spawn(|| generate(&options).unwrap())).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for bytes in results {
        assert_eq!(bytes, expected);
    }
}

#[test]
fn invariant_invalid_style_fails_before_generation() {
    let style = StyleConfig { crop_factor: 0.9, ..Default::default() };
    let result = generate(&GenerateOptions::new(32, "style").with_style(style));
    assert!(matches!(result, Err(IconError::Config(_))));
}

#[test]
fn invariant_sub_unit_divisor_rejected() {
    let style = StyleConfig {
        block_divisor: BlockDivisor::Fractional { min: 0.001, max: 0.004 },
        ..Default::default()
    };
    let result = generate_icon(&GenerateOptions::new(64, "tiny").with_style(style));
    assert!(matches!(result, Err(IconError::Config(_))));
}

#[test]
fn invariant_oversized_request_rejected() {
    let result = generate(&GenerateOptions::new(40_000, "huge"));
    let err = result.unwrap_err();
    assert!(matches!(err, IconError::InvalidSize(40_000)));
    assert!(err.to_string().contains("1..=32768"));
}

#[test]
fn invariant_manifest_hash_stable() {
    let options = GenerateOptions::new(40, "manifest");

    let m1 = generate_icon(&options).unwrap().manifest().unwrap();
    let m2 = generate_icon(&options).unwrap().manifest().unwrap();

    assert_eq!(m1.png_sha256, m2.png_sha256);
    assert_eq!(m1.request_hash, m2.request_hash);
    assert_eq!(m1.manifest_hash, m2.manifest_hash);
}

#[test]
fn invariant_written_file_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("icon.png");

    let png = generate(&GenerateOptions::new(48, "file")).unwrap();
    std::fs::write(&path, &png).unwrap();

    let img = image::open(&path).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (48, 48));
    assert_eq!(img, decode(&png));
}
