use log::debug;
use rgb::RGBA8;

use crate::error::RecolorError;
use crate::frame::Frame;
use crate::quantize::{QuantizeAlgorithm, Quantizer};

/// Adapt a flat, non-paletted pixel population into the indexed frame model
/// the rest of the pipeline expects.
///
/// Quantizes the full population once, then finalizes pixel indices either
/// through Floyd–Steinberg error diffusion against the new palette or, when
/// `dither` is off, straight from the quantizer's own index mapping.
pub fn quantize_image(
    pixels: &[RGBA8],
    width: usize,
    height: usize,
    algorithm: QuantizeAlgorithm,
    max_colors: usize,
    dither: bool,
) -> Result<Frame, RecolorError> {
    if width == 0 || height == 0 {
        return Err(RecolorError::ZeroDimension);
    }
    if pixels.len() != width * height {
        return Err(RecolorError::DimensionMismatch {
            len: pixels.len(),
            width,
            height,
        });
    }

    let quantizer = Quantizer::new(max_colors);
    let (palette, mapping) = quantizer.quantize(algorithm, pixels)?;
    debug!(
        "static adapter: {}x{} image quantized to {} colors (dither: {})",
        width,
        height,
        palette.len(),
        dither
    );

    let indices = if dither {
        diffuse_errors(pixels, width, height, &palette)
    } else {
        mapping.into_iter().map(|index| index as u8).collect()
    };

    Ok(Frame::new(width, height, indices, palette))
}

/// Floyd–Steinberg error diffusion against a fixed palette.
///
/// Works on float channel values; quantization error spreads right 7/16,
/// down-left 3/16, down 5/16, down-right 1/16.
fn diffuse_errors(pixels: &[RGBA8], width: usize, height: usize, palette: &[RGBA8]) -> Vec<u8> {
    let mut working: Vec<[f32; 3]> = pixels
        .iter()
        .map(|p| [p.r as f32, p.g as f32, p.b as f32])
        .collect();
    let mut indices = vec![0u8; pixels.len()];

    for y in 0..height {
        for x in 0..width {
            let at = y * width + x;
            let current = working[at];

            let chosen = nearest_entry(palette, current, pixels[at].a);
            indices[at] = chosen as u8;
            let entry = palette[chosen];

            let err = [
                current[0] - entry.r as f32,
                current[1] - entry.g as f32,
                current[2] - entry.b as f32,
            ];

            let mut spread = |target: usize, fraction: f32| {
                working[target][0] += err[0] * fraction;
                working[target][1] += err[1] * fraction;
                working[target][2] += err[2] * fraction;
            };

            if x + 1 < width {
                spread(at + 1, 7.0 / 16.0);
            }
            if y + 1 < height {
                if x > 0 {
                    spread(at + width - 1, 3.0 / 16.0);
                }
                spread(at + width, 5.0 / 16.0);
                if x + 1 < width {
                    spread(at + width + 1, 1.0 / 16.0);
                }
            }
        }
    }

    indices
}

/// Nearest palette entry to an error-adjusted color; alpha participates so
/// transparent pixels stay with transparent entries. Lowest index wins ties.
fn nearest_entry(palette: &[RGBA8], color: [f32; 3], alpha: u8) -> usize {
    let mut best = 0;
    let mut best_dist = f32::MAX;

    for (index, entry) in palette.iter().enumerate() {
        let dr = color[0] - entry.r as f32;
        let dg = color[1] - entry.g as f32;
        let db = color[2] - entry.b as f32;
        let da = alpha as f32 - entry.a as f32;
        let dist = dr * dr + dg * dg + db * db + da * da;
        if dist < best_dist {
            best_dist = dist;
            best = index;
        }
    }

    best
}
