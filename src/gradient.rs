use palette::{Clamp, Srgb};

use crate::blend;
use crate::error::RecolorError;

/// An ordered sequence of color keyframes distributed over [0, 1].
///
/// Immutable once built. `generate` walks the cycle and produces one
/// interpolated overlay color per animation frame.
#[derive(Debug, Clone)]
pub struct Gradient {
    colors: Vec<Srgb>,
    positions: Vec<f32>,
}

/// A read-only view of one gradient stop.
#[derive(Debug, Clone, Copy)]
pub struct KeyFrame<'a> {
    pub color: &'a Srgb,
    pub position: f32,
    pub index: usize,
}

impl Gradient {
    /// Build a gradient with keyframes spaced evenly over [0, 1].
    ///
    /// With `wrap` set and more than one color, a copy of the first color is
    /// appended as a trailing keyframe so position 1.0 lands back on the
    /// start and the cycle closes seamlessly.
    pub fn new(mut colors: Vec<Srgb>, wrap: bool) -> Self {
        if wrap && colors.len() > 1 {
            let first = colors[0];
            colors.push(first);
        }

        let positions = match colors.len() {
            0 => Vec::new(),
            1 => vec![0.0],
            n => {
                let length = (n - 1) as f32;
                (0..n).map(|i| i as f32 / length).collect()
            }
        };

        Self { colors, positions }
    }

    pub fn colors(&self) -> &[Srgb] {
        &self.colors
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Produce exactly `frame_count` overlay colors.
    ///
    /// Frame `i` samples position `i / frame_count`. Dividing by the frame
    /// count (not `frame_count - 1`) means the sampled position never
    /// reaches 1.0, so one call never quite completes a full cycle; with a
    /// wrapped gradient the next replay continues seamlessly where the last
    /// one left off.
    pub fn generate(&self, frame_count: usize) -> Vec<Srgb> {
        if self.colors.is_empty() {
            return Vec::new();
        }

        let mut generated = Vec::with_capacity(frame_count);
        for i in 0..frame_count {
            let position = i as f32 / frame_count as f32;
            let (lower, upper) = self.position_search(position);

            let color = match upper {
                None => lower.color.clamp(),
                Some(upper) => {
                    let relative =
                        (position - lower.position) / (upper.position - lower.position);
                    if relative == 0.0 {
                        // On a stored keyframe: reproduce it exactly, skip
                        // the Lch round-trip.
                        lower.color.clamp()
                    } else {
                        blend::mix_perceptual(*lower.color, *upper.color, relative)
                    }
                }
            };
            generated.push(color);
        }

        generated
    }

    /// Locate the keyframe(s) bounding `position`.
    ///
    /// Returns the lower keyframe and, when `position` falls strictly inside
    /// the keyframe range, the upper one. The lower index is clamped so a
    /// position that floors to the last keyframe under floating-point
    /// rounding still resolves.
    pub fn position_search(&self, position: f32) -> (KeyFrame<'_>, Option<KeyFrame<'_>>) {
        let length = self.colors.len() - 1;
        if length == 0 {
            return (self.key_frame(0), None);
        }

        let base = 1.0 / length as f32;
        let lower = ((position / base).floor() as usize).min(length);

        if lower == length {
            (self.key_frame(lower), None)
        } else {
            (self.key_frame(lower), Some(self.key_frame(lower + 1)))
        }
    }

    fn key_frame(&self, index: usize) -> KeyFrame<'_> {
        KeyFrame {
            color: &self.colors[index],
            position: self.positions[index],
            index,
        }
    }
}

/// Parse an `RRGGBB` hex color, with or without a leading `#`.
pub fn parse_hex(input: &str) -> Result<Srgb, RecolorError> {
    let digits = input.strip_prefix('#').unwrap_or(input);
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(RecolorError::InvalidColor(input.to_string()));
    }

    let channel = |range: core::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map_err(|_| RecolorError::InvalidColor(input.to_string()))
    };

    let r = channel(0..2)?;
    let g = channel(2..4)?;
    let b = channel(4..6)?;
    Ok(Srgb::new(r, g, b).into_format())
}

/// The seven-stop ROYGBV preset used when no gradient colors are configured.
/// The final stop is a slightly darkened red so the loop closes without a
/// doubled start color.
pub fn default_preset() -> Vec<Srgb> {
    vec![
        Srgb::new(1.0, 0.0, 0.0),
        Srgb::new(1.0, 127.0 / 255.0, 0.0),
        Srgb::new(1.0, 1.0, 0.0),
        Srgb::new(0.0, 1.0, 0.0),
        Srgb::new(0.0, 0.0, 1.0),
        Srgb::new(139.0 / 255.0, 0.0, 1.0),
        Srgb::new(0.9, 0.0, 0.0),
    ]
}
