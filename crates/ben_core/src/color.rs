/// 8-bit RGBA color, the unit the level format and the editor sliders work in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorRGBA8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ColorRGBA8 {
    pub const WHITE: ColorRGBA8 = ColorRGBA8::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build from float channels in 0..=255, as produced by slider widgets.
    /// Values are clamped and truncated.
    pub fn from_channels(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self::new(channel(r), channel(g), channel(b), channel(a))
    }

    /// Normalised channels for vertex data.
    pub fn to_f32_array(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

impl Default for ColorRGBA8 {
    fn default() -> Self {
        Self::WHITE
    }
}

fn channel(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_channels_clamps_and_truncates() {
        let c = ColorRGBA8::from_channels(-4.0, 127.9, 300.0, f32::NAN);
        assert_eq!(c, ColorRGBA8::new(0, 127, 255, 0));
    }

    #[test]
    fn to_f32_array_normalises() {
        let c = ColorRGBA8::new(255, 0, 51, 255).to_f32_array();
        assert_eq!(c[0], 1.0);
        assert_eq!(c[1], 0.0);
        assert!((c[2] - 0.2).abs() < 1e-6);
        assert_eq!(c[3], 1.0);
    }

    #[test]
    fn with_alpha_keeps_rgb() {
        let c = ColorRGBA8::new(1, 2, 3, 4).with_alpha(200);
        assert_eq!(c, ColorRGBA8::new(1, 2, 3, 200));
    }
}
