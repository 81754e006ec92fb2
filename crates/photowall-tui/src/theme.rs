use ratatui::style::Color;

/// Colors used across the gallery and the carousel
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub fg1: Color,
    pub grey0: Color,
    pub grey1: Color,

    // Semantic colors
    /// Border of the selected card and of the active thumbnail
    pub selection: Color,
    /// Skeleton cards while the catalog loads
    pub skeleton: Color,
    /// Backdrop behind the carousel
    pub overlay: Color,
    pub link: Color,
    pub error: Color,
    pub info: Color,
    pub accent: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg0: Color::Rgb(0x1c, 0x1c, 0x1c),
            bg1: Color::Rgb(0x26, 0x26, 0x26),
            bg2: Color::Rgb(0x3a, 0x3a, 0x3a),
            fg0: Color::Rgb(0xe4, 0xe4, 0xe4),
            fg1: Color::Rgb(0xff, 0xff, 0xff),
            grey0: Color::Rgb(0x6c, 0x6c, 0x6c),
            grey1: Color::Rgb(0x9e, 0x9e, 0x9e),
            selection: Color::Rgb(0xff, 0xff, 0xff),
            skeleton: Color::Rgb(0x30, 0x30, 0x30),
            overlay: Color::Rgb(0x00, 0x00, 0x00),
            link: Color::Rgb(0x7d, 0xae, 0xa3),
            error: Color::Rgb(0xea, 0x69, 0x62),
            info: Color::Rgb(0x7d, 0xae, 0xa3),
            accent: Color::Rgb(0xd8, 0xa6, 0x57),
        }
    }
}
