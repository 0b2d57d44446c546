use ratatui::style::Color;

/// Runtime theme colors (Gruvbox Material dark)
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub fg1: Color,
    pub grey1: Color,
    pub grey2: Color,

    // Palette colors
    pub red: Color,
    pub orange: Color,
    pub yellow: Color,
    pub green: Color,
    pub aqua: Color,
    pub blue: Color,
    pub purple: Color,

    // Semantic colors
    pub accent: Color,
    pub cursor: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg0: Color::Rgb(0x28, 0x28, 0x28),
            bg1: Color::Rgb(0x32, 0x30, 0x2f),
            bg2: Color::Rgb(0x45, 0x40, 0x3d),
            fg0: Color::Rgb(0xd4, 0xbe, 0x98),
            fg1: Color::Rgb(0xdd, 0xc7, 0xa1),
            grey1: Color::Rgb(0x92, 0x83, 0x74),
            grey2: Color::Rgb(0xa8, 0x99, 0x84),
            red: Color::Rgb(0xea, 0x69, 0x62),
            orange: Color::Rgb(0xe7, 0x8a, 0x4e),
            yellow: Color::Rgb(0xd8, 0xa6, 0x57),
            green: Color::Rgb(0xa9, 0xb6, 0x65),
            aqua: Color::Rgb(0x89, 0xb4, 0x82),
            blue: Color::Rgb(0x7d, 0xae, 0xa3),
            purple: Color::Rgb(0xd3, 0x86, 0x9b),
            accent: Color::Rgb(0x89, 0xb4, 0x82),
            cursor: Color::Rgb(0xdd, 0xc7, 0xa1),
        }
    }
}

impl Theme {
    /// Palette colors cycled through by counters and bars
    pub fn series(&self, index: usize) -> Color {
        let palette = [self.blue, self.purple, self.orange, self.green];
        palette[index % palette.len()]
    }

    /// Bar color by filled fraction, strongest for the fullest bars
    pub fn level(&self, fraction: f64) -> Color {
        if fraction >= 3000.0 / 3500.0 {
            self.blue
        } else if fraction >= 2000.0 / 3500.0 {
            self.purple
        } else if fraction >= 1000.0 / 3500.0 {
            self.orange
        } else {
            self.green
        }
    }

    /// `fg` drawn at `opacity` over the page background
    pub fn fade(&self, fg: Color, opacity: f64) -> Color {
        blend(self.bg0, fg, opacity)
    }
}

/// Mix two RGB colors; `t = 0` gives `from`, `t = 1` gives `to`.
/// Non-RGB colors snap to whichever end is closer.
pub fn blend(from: Color, to: Color, t: f64) -> Color {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    match (from, to) {
        (Color::Rgb(r0, g0, b0), Color::Rgb(r1, g1, b1)) => {
            let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
            Color::Rgb(mix(r0, r1), mix(g0, g1), mix(b0, b1))
        }
        _ if t < 0.5 => from,
        _ => to,
    }
}
