use palette::Srgb;
use rgb::RGBA8;

use crate::blend;

/// One indexed raster: a pixel buffer of palette indices plus its palette.
///
/// Delay (centiseconds) and disposal ride along untouched for the container
/// collaborator that owns frame timing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
    pub palette: Vec<RGBA8>,
    pub delay_cs: u16,
    pub disposal: u8,
}

impl Frame {
    pub fn new(width: usize, height: usize, pixels: Vec<u8>, palette: Vec<RGBA8>) -> Self {
        Self {
            width,
            height,
            pixels,
            palette,
            delay_cs: 0,
            disposal: 0,
        }
    }
}

/// Blend `overlay` into every usable palette entry of `frame`.
///
/// Fully transparent entries pass through untouched so transparency holes
/// survive recoloring. The pixel index buffer is never modified; only the
/// palette it points into changes.
pub fn apply_overlay(frame: &mut Frame, overlay: Srgb) {
    for entry in frame.palette.iter_mut() {
        if entry.a == 0 {
            continue;
        }

        let base = Srgb::new(entry.r, entry.g, entry.b).into_format::<f32>();
        let blended: Srgb<u8> = blend::blend_color(overlay, base).into_format();
        *entry = RGBA8::new(blended.red, blended.green, blended.blue, 255);
    }
}
