//! Color conversion helpers.
//!
//! Authoring colors are 8-bit sRGB hex values; shaders work in linear light
//! and the sRGB surface re-encodes on present, so every authored color is
//! converted once at scene-build time.

/// Decode one sRGB channel in `[0, 1]` to linear light.
#[must_use]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Split a `0xRRGGBB` hex color into sRGB channels in `[0, 1]`.
#[must_use]
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Convert a `0xRRGGBB` hex color to linear RGB.
#[must_use]
pub fn hex_to_linear(hex: u32) -> [f32; 3] {
    rgb_to_linear(hex_to_rgb(hex))
}

/// Convert an sRGB triple in `[0, 1]` to linear RGB.
#[must_use]
pub fn rgb_to_linear(rgb: [f32; 3]) -> [f32; 3] {
    [
        srgb_to_linear(rgb[0]),
        srgb_to_linear(rgb[1]),
        srgb_to_linear(rgb[2]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn black_and_white_are_fixed_points() {
        assert_eq!(hex_to_linear(0x000000), [0.0, 0.0, 0.0]);
        let white = hex_to_linear(0xffffff);
        for c in white {
            assert!((c - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn linear_values_never_exceed_srgb_values() {
        // The sRGB curve is below identity on (0, 1).
        for i in 1..255u32 {
            let c = i as f32 / 255.0;
            let l = srgb_to_linear(c);
            assert!(l > 0.0 && l < c, "channel {i}");
        }
    }

    #[test]
    fn hex_channels_decode_in_order() {
        let [r, g, b] = hex_to_linear(0xff0000);
        assert!((r - 1.0).abs() < 1e-6);
        assert_eq!(g, 0.0);
        assert_eq!(b, 0.0);
    }
}
