use clock_intro_protocol::{Color, ThemeToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    pub fn visuals(self) -> egui::Visuals {
        match self {
            ThemeMode::Dark => egui::Visuals::dark(),
            ThemeMode::Light => egui::Visuals::light(),
        }
    }
}

fn to_color32(c: Color) -> egui::Color32 {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(channel(c.r), channel(c.g), channel(c.b), channel(c.a))
}

/// Resolve a token for `mode`, multiplied by `opacity`.
pub fn resolve(token: ThemeToken, mode: ThemeMode, opacity: f32) -> egui::Color32 {
    let base = token.default_color();
    let color = match mode {
        ThemeMode::Dark => base,
        // Ink on paper: invert the channels, keep the alpha.
        ThemeMode::Light => Color {
            r: 1.0 - base.r,
            g: 1.0 - base.g,
            b: 1.0 - base.b,
            a: base.a,
        },
    };
    to_color32(color).gamma_multiply(opacity.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_mode_inverts_background() {
        let dark = resolve(ThemeToken::Background, ThemeMode::Dark, 1.0);
        let light = resolve(ThemeToken::Background, ThemeMode::Light, 1.0);
        assert_eq!(dark.r(), 255 - light.r());
    }

    #[test]
    fn zero_opacity_is_transparent() {
        assert_eq!(
            resolve(ThemeToken::Tick, ThemeMode::Dark, 0.0),
            egui::Color32::TRANSPARENT
        );
    }
}
