use palette::{FromColor, Lch, Srgb};
use rgb::RGBA8;

use huecycle::{
    recolor_animation, recolor_static, Frame, Gradient, QuantizeAlgorithm, RecolorConfig,
    RecolorError,
};

fn checker_frame(seed: u8) -> Frame {
    let palette = vec![
        RGBA8::new(0, 0, 0, 0),
        RGBA8::new(seed, 40, 200, 255),
        RGBA8::new(200, seed, 40, 255),
        RGBA8::new(90, 90, 90, 255),
    ];
    let pixels = (0..16u16).map(|i| ((i + seed as u16) % 4) as u8).collect();
    Frame::new(4, 4, pixels, palette)
}

fn animation(n: usize) -> Vec<Frame> {
    (0..n).map(|i| checker_frame((i * 13) as u8)).collect()
}

#[test]
fn worker_count_does_not_change_output() {
    let config_serial = RecolorConfig::new().workers(1);
    let config_parallel = RecolorConfig::new().workers(8);

    let mut serial = animation(21);
    let mut parallel = animation(21);

    recolor_animation(&mut serial, &config_serial).unwrap();
    recolor_animation(&mut parallel, &config_parallel).unwrap();

    assert_eq!(serial, parallel);
}

#[test]
fn black_to_white_three_frames() {
    let black = Srgb::new(0.0, 0.0, 0.0);
    let white = Srgb::new(1.0, 1.0, 1.0);
    let gradient = Gradient::new(vec![black, white], false);

    let overlays = gradient.generate(3);
    assert_eq!(overlays.len(), 3);
    assert_eq!(overlays[0], black);

    // Samples fall at 0, 1/3 and 2/3; the later two must sit strictly
    // between the endpoints, in increasing luma order.
    let second = Lch::from_color(overlays[1]).l;
    let third = Lch::from_color(overlays[2]).l;
    assert!(second > 1.0 && second < 99.0);
    assert!(third > 1.0 && third < 99.0);
    assert!(second < third);
}

#[test]
fn config_errors_leave_frames_untouched() {
    let mut frames = animation(3);
    let untouched = frames.clone();

    let zero_workers = RecolorConfig::new().workers(0);
    assert!(matches!(
        recolor_animation(&mut frames, &zero_workers),
        Err(RecolorError::InvalidWorkerCount(0))
    ));
    assert_eq!(frames, untouched);

    let unknown: Result<QuantizeAlgorithm, _> = "flood-fill".parse();
    assert!(matches!(unknown, Err(RecolorError::UnknownAlgorithm(_))));
}

#[test]
fn transparent_palette_entries_survive_end_to_end() {
    let mut frames = animation(5);
    recolor_animation(&mut frames, &RecolorConfig::new()).unwrap();

    for frame in &frames {
        assert_eq!(frame.palette[0], RGBA8::new(0, 0, 0, 0));
        for entry in &frame.palette[1..] {
            assert_eq!(entry.a, 255);
        }
    }
}

#[test]
fn pixel_buffers_never_change_during_recolor() {
    let mut frames = animation(4);
    let original_pixels: Vec<Vec<u8>> = frames.iter().map(|f| f.pixels.clone()).collect();

    recolor_animation(&mut frames, &RecolorConfig::new()).unwrap();

    for (frame, pixels) in frames.iter().zip(&original_pixels) {
        assert_eq!(&frame.pixels, pixels);
    }
}

#[test]
fn loop_count_replays_recolored_sequence() {
    let config = RecolorConfig::new().loop_count(3).delay_override(12);
    let mut frames = animation(4);
    recolor_animation(&mut frames, &config).unwrap();

    assert_eq!(frames.len(), 12);
    for frame in &frames {
        assert_eq!(frame.delay_cs, 12);
    }
    // Each replay is a byte-identical copy of the recolored base run.
    assert_eq!(frames[..4], frames[4..8]);
    assert_eq!(frames[..4], frames[8..12]);
}

#[test]
fn static_image_becomes_animated_sequence() {
    let mut pixels = Vec::with_capacity(256);
    for i in 0..256u32 {
        pixels.push(RGBA8::new(
            (i % 16 * 16) as u8,
            (i / 16 * 16) as u8,
            120,
            255,
        ));
    }

    let config = RecolorConfig::new()
        .algorithm(QuantizeAlgorithm::MedianCut)
        .max_colors(16)
        .loop_count(6)
        .dither(false);

    let frames = recolor_static(&pixels, 16, 16, &config).unwrap();
    assert_eq!(frames.len(), 6);

    for frame in &frames {
        assert_eq!(frame.width, 16);
        assert_eq!(frame.height, 16);
        assert_eq!(frame.pixels.len(), 256);
        assert!(frame.palette.len() <= 16);
        for &index in &frame.pixels {
            assert!((index as usize) < frame.palette.len());
        }
    }

    // All frames index the same pixel layout but carry different tints.
    assert_eq!(frames[0].pixels, frames[1].pixels);
    assert_ne!(frames[0].palette, frames[1].palette);
}

#[test]
fn static_path_rejects_octree_before_building_frames() {
    let pixels = vec![RGBA8::new(0, 0, 0, 255); 4];
    let config = RecolorConfig::new().algorithm(QuantizeAlgorithm::Octree);

    let result = recolor_static(&pixels, 2, 2, &config);
    assert!(matches!(
        result,
        Err(RecolorError::UnsupportedAlgorithm("octree"))
    ));
}

#[test]
fn static_path_validates_dimensions() {
    let pixels = vec![RGBA8::new(0, 0, 0, 255); 4];
    let config = RecolorConfig::new();

    assert!(matches!(
        recolor_static(&pixels, 0, 2, &config),
        Err(RecolorError::ZeroDimension)
    ));
    assert!(matches!(
        recolor_static(&pixels, 3, 2, &config),
        Err(RecolorError::DimensionMismatch { .. })
    ));
}
