use palette::{Clamp, FromColor, Lch, Mix, Srgb};

/// Standard "over" alpha compositing of `top` onto `bottom`.
///
/// Returns the composited color and its combined alpha. The combination of
/// `top_alpha == 0.0` and `bottom_alpha == 0.0` is undefined (division by
/// zero) and callers must not pass it.
pub fn blend_normal(top: Srgb, top_alpha: f32, bottom: Srgb, bottom_alpha: f32) -> (Srgb, f32) {
    let alpha_delta = (1.0 - top_alpha) * bottom_alpha;
    let alpha = alpha_delta + top_alpha;

    let red = (alpha_delta * bottom.red + top_alpha * top.red) / alpha;
    let green = (alpha_delta * bottom.green + top_alpha * top.green) / alpha;
    let blue = (alpha_delta * bottom.blue + top_alpha * top.blue) / alpha;

    (Srgb::new(red, green, blue).clamp(), alpha)
}

/// Impose the hue and chroma of `top` while keeping the luma of `bottom`.
///
/// This is the tinting operator: the overlay dictates what color a pixel
/// becomes, the pixel keeps how bright it looked.
pub fn blend_color(top: Srgb, bottom: Srgb) -> Srgb {
    let top_lch = Lch::from_color(top);
    let bottom_lch = Lch::from_color(bottom);

    Srgb::from_color(Lch::new(bottom_lch.l, top_lch.chroma, top_lch.hue)).clamp()
}

/// Impose only the hue of `top`, keeping the chroma and luma of `bottom`.
pub fn blend_hue(top: Srgb, bottom: Srgb) -> Srgb {
    let top_lch = Lch::from_color(top);
    let bottom_lch = Lch::from_color(bottom);

    Srgb::from_color(Lch::new(bottom_lch.l, bottom_lch.chroma, top_lch.hue)).clamp()
}

/// Interpolate between two colors in Lch at `factor` in [0, 1].
///
/// Hue travels the shortest arc around the cylinder, so a red-to-violet
/// blend does not detour through green.
pub fn mix_perceptual(a: Srgb, b: Srgb, factor: f32) -> Srgb {
    let a_lch = Lch::from_color(a);
    let b_lch = Lch::from_color(b);

    Srgb::from_color(a_lch.mix(b_lch, factor)).clamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn normal_opaque_top_wins() {
        let top = Srgb::new(1.0, 0.0, 0.0);
        let bottom = Srgb::new(0.0, 0.0, 1.0);
        let (out, alpha) = blend_normal(top, 1.0, bottom, 1.0);
        assert!(close(alpha, 1.0));
        assert!(close(out.red, 1.0) && close(out.green, 0.0) && close(out.blue, 0.0));
    }

    #[test]
    fn normal_transparent_top_passes_bottom() {
        let top = Srgb::new(1.0, 0.0, 0.0);
        let bottom = Srgb::new(0.2, 0.4, 0.6);
        let (out, alpha) = blend_normal(top, 0.0, bottom, 1.0);
        assert!(close(alpha, 1.0));
        assert!(close(out.red, 0.2) && close(out.green, 0.4) && close(out.blue, 0.6));
    }

    #[test]
    fn normal_half_alpha_weights_evenly() {
        let top = Srgb::new(1.0, 1.0, 1.0);
        let bottom = Srgb::new(0.0, 0.0, 0.0);
        let (out, alpha) = blend_normal(top, 0.5, bottom, 1.0);
        // alphaDelta = 0.5, alpha = 1.0, each channel = 0.5
        assert!(close(alpha, 1.0));
        assert!(close(out.red, 0.5) && close(out.green, 0.5) && close(out.blue, 0.5));
    }

    #[test]
    fn color_keeps_bottom_luma() {
        let top = Srgb::new(1.0, 0.0, 0.0);
        let bottom = Srgb::new(0.3, 0.3, 0.3);
        let out = blend_color(top, bottom);

        let out_lch = Lch::from_color(out);
        let bottom_lch: Lch = Lch::from_color(bottom);
        assert!(
            (out_lch.l - bottom_lch.l).abs() < 2.0,
            "expected luma near {} got {}",
            bottom_lch.l,
            out_lch.l
        );
        // Red hue imposed: red channel must dominate
        assert!(out.red > out.green && out.red > out.blue);
    }

    #[test]
    fn hue_keeps_bottom_chroma_and_luma() {
        let top = Srgb::new(0.0, 0.0, 1.0);
        let bottom = Srgb::new(0.8, 0.2, 0.2);
        let out = blend_hue(top, bottom);

        let out_lch = Lch::from_color(out);
        let top_lch = Lch::from_color(top);
        let bottom_lch = Lch::from_color(bottom);

        let hue_diff = (out_lch.hue.into_positive_degrees()
            - top_lch.hue.into_positive_degrees())
        .abs();
        assert!(
            hue_diff < 5.0 || hue_diff > 355.0,
            "expected hue near {} got {}",
            top_lch.hue.into_positive_degrees(),
            out_lch.hue.into_positive_degrees()
        );
        assert!((out_lch.l - bottom_lch.l).abs() < 2.0);
    }

    #[test]
    fn mix_endpoints() {
        let a = Srgb::new(0.1, 0.2, 0.3);
        let b = Srgb::new(0.9, 0.8, 0.7);
        let at_zero = mix_perceptual(a, b, 0.0);
        let at_one = mix_perceptual(a, b, 1.0);
        assert!(close(at_zero.red, a.red) && close(at_zero.green, a.green));
        assert!(close(at_one.red, b.red) && close(at_one.green, b.green));
    }

    #[test]
    fn mix_midpoint_between_black_and_white() {
        let mid = mix_perceptual(Srgb::new(0.0, 0.0, 0.0), Srgb::new(1.0, 1.0, 1.0), 0.5);
        let mid_lch = Lch::from_color(mid);
        assert!(mid_lch.l > 5.0 && mid_lch.l < 95.0);
    }
}
