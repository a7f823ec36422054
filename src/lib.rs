#![forbid(unsafe_code)]

//! Animated palette recoloring.
//!
//! A cyclic perceptual gradient produces one overlay color per frame; each
//! frame's palette is tinted toward its overlay while keeping per-pixel
//! brightness, so the animation sweeps through the gradient without
//! touching a single pixel index. Inputs that exceed the palette budget go
//! through bounded quantization first.
//!
//! Container decode/encode, CLI parsing, and file I/O live with the caller;
//! this crate consumes and returns [`Frame`] sequences.

pub mod blend;
pub mod error;
pub mod frame;
pub mod gradient;
pub mod median_cut;
pub mod palette;
pub mod quantize;
pub mod scheduler;
pub mod static_image;

use log::info;
use rgb::RGBA8;

pub use error::RecolorError;
pub use frame::Frame;
pub use gradient::Gradient;
pub use quantize::{QuantizeAlgorithm, Quantizer};

/// Configuration for a recoloring run.
#[derive(Debug, Clone)]
pub struct RecolorConfig {
    /// Gradient stops as hex strings (`RRGGBB`, `#` optional). Empty means
    /// the built-in seven-stop ROYGBV preset.
    pub gradient_colors: Vec<String>,
    /// Close the gradient cycle by repeating the first stop at the end.
    pub wrap: bool,
    /// Palette reduction algorithm for non-paletted inputs.
    pub algorithm: QuantizeAlgorithm,
    /// Quantization target palette size (2..=256).
    pub max_colors: u32,
    /// Parallel workers for the overlay pass. Must be at least 1.
    pub workers: usize,
    /// How many times the base frame sequence is replayed.
    pub loop_count: usize,
    /// Uniform frame delay (centiseconds) applied to all output frames.
    pub delay_override: Option<u16>,
    /// Error-diffusion dithering on the static-image path.
    pub dither: bool,
}

impl Default for RecolorConfig {
    fn default() -> Self {
        Self {
            gradient_colors: Vec::new(),
            wrap: false,
            algorithm: QuantizeAlgorithm::MedianCut,
            max_colors: 256,
            workers: num_cpus::get().max(1),
            loop_count: 1,
            delay_override: None,
            dither: true,
        }
    }
}

impl RecolorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gradient_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.gradient_colors = colors.into_iter().map(Into::into).collect();
        self
    }

    pub fn wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn algorithm(mut self, algorithm: QuantizeAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn max_colors(mut self, max_colors: u32) -> Self {
        self.max_colors = max_colors;
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn loop_count(mut self, loop_count: usize) -> Self {
        self.loop_count = loop_count;
        self
    }

    pub fn delay_override(mut self, delay_cs: u16) -> Self {
        self.delay_override = Some(delay_cs);
        self
    }

    pub fn dither(mut self, dither: bool) -> Self {
        self.dither = dither;
        self
    }

    /// Reject configurations that could not possibly run. Called before any
    /// frame work is committed.
    pub fn validate(&self) -> Result<(), RecolorError> {
        if self.workers < 1 {
            return Err(RecolorError::InvalidWorkerCount(self.workers));
        }
        if self.loop_count < 1 {
            return Err(RecolorError::InvalidLoopCount(self.loop_count));
        }
        if !(2..=256).contains(&self.max_colors) {
            return Err(RecolorError::InvalidMaxColors(self.max_colors));
        }
        Ok(())
    }

    fn build_gradient(&self) -> Result<Gradient, RecolorError> {
        let colors = if self.gradient_colors.is_empty() {
            gradient::default_preset()
        } else {
            self.gradient_colors
                .iter()
                .map(|stop| gradient::parse_hex(stop))
                .collect::<Result<Vec<_>, _>>()?
        };
        Ok(Gradient::new(colors, self.wrap))
    }
}

/// Recolor an already-paletted frame sequence in place.
///
/// Validates the configuration and gradient colors up front, generates one
/// overlay color per frame, tints every frame's palette in parallel, then
/// applies the delay override and replays the recolored base sequence
/// `loop_count` times. On error nothing useful has been written and the
/// frames must be discarded.
pub fn recolor_animation(
    frames: &mut Vec<Frame>,
    config: &RecolorConfig,
) -> Result<(), RecolorError> {
    config.validate()?;
    let gradient = config.build_gradient()?;

    info!(
        "recoloring {} frames over a {}-stop gradient",
        frames.len(),
        gradient.len()
    );

    let overlays = gradient.generate(frames.len());
    scheduler::apply_overlays(frames, &overlays, config.workers)?;

    if let Some(delay_cs) = config.delay_override {
        for frame in frames.iter_mut() {
            frame.delay_cs = delay_cs;
        }
    }

    if config.loop_count > 1 {
        let base = frames.clone();
        for _ in 1..config.loop_count {
            frames.extend(base.iter().cloned());
        }
    }

    Ok(())
}

/// Recolor a single non-paletted image into an animated sequence.
///
/// The image is quantized once into an indexed frame, replicated
/// `loop_count` times, and then run through the normal gradient pipeline,
/// so the repeat count decides how far through the gradient the resulting
/// animation travels.
pub fn recolor_static(
    pixels: &[RGBA8],
    width: usize,
    height: usize,
    config: &RecolorConfig,
) -> Result<Vec<Frame>, RecolorError> {
    config.validate()?;

    let mut base = static_image::quantize_image(
        pixels,
        width,
        height,
        config.algorithm,
        config.max_colors as usize,
        config.dither,
    )?;
    if let Some(delay_cs) = config.delay_override {
        base.delay_cs = delay_cs;
    }

    let mut frames = vec![base; config.loop_count];

    // Replication already happened; the inner pass must not replay again.
    let single_pass = RecolorConfig {
        loop_count: 1,
        ..config.clone()
    };
    recolor_animation(&mut frames, &single_pass)?;

    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        RecolorConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_workers_rejected() {
        let config = RecolorConfig::new().workers(0);
        assert!(matches!(
            config.validate(),
            Err(RecolorError::InvalidWorkerCount(0))
        ));
    }

    #[test]
    fn zero_loop_count_rejected() {
        let config = RecolorConfig::new().loop_count(0);
        assert!(matches!(
            config.validate(),
            Err(RecolorError::InvalidLoopCount(0))
        ));
    }

    #[test]
    fn out_of_range_max_colors_rejected() {
        for max_colors in [0u32, 1, 257, 4096] {
            let config = RecolorConfig::new().max_colors(max_colors);
            assert!(matches!(
                config.validate(),
                Err(RecolorError::InvalidMaxColors(_))
            ));
        }
    }

    #[test]
    fn bad_gradient_color_surfaces_before_frame_work() {
        let config = RecolorConfig::new().gradient_colors(["not-a-color"]);
        let mut frames = vec![Frame::new(1, 1, vec![0], vec![rgb::RGBA8::new(1, 2, 3, 255)])];
        let untouched = frames.clone();

        let result = recolor_animation(&mut frames, &config);
        assert!(matches!(result, Err(RecolorError::InvalidColor(_))));
        assert_eq!(frames, untouched);
    }

    #[test]
    fn empty_color_list_falls_back_to_preset() {
        let config = RecolorConfig::new();
        let gradient = config.build_gradient().unwrap();
        assert_eq!(gradient.len(), 7);
    }

    #[test]
    fn wrap_flag_reaches_gradient() {
        let config = RecolorConfig::new()
            .gradient_colors(["ff0000", "0000ff"])
            .wrap(true);
        let gradient = config.build_gradient().unwrap();
        assert_eq!(gradient.len(), 3);
    }
}
