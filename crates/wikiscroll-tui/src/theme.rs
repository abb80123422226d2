use ratatui::style::Color;
use wikiscroll_core::config::ThemeColorOverrides;

/// Runtime theme with configurable colors
#[derive(Debug, Clone)]
pub struct Theme {
    /// Panel background when no image is available
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub accent: Color,
    /// Disabled controls (the search box)
    pub disabled: Color,
    pub status_bg: Color,
    pub status_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Near-black base so text stays readable over darkened images
        Self {
            background: Color::Rgb(0x10, 0x10, 0x12),
            foreground: Color::Rgb(0xf2, 0xf2, 0xf2),
            muted: Color::Rgb(0xc8, 0xc8, 0xcc),
            accent: Color::Rgb(0xff, 0xff, 0xff),
            disabled: Color::Rgb(0x80, 0x80, 0x88),
            status_bg: Color::Rgb(0x26, 0x26, 0x2b),
            status_fg: Color::Rgb(0xd0, 0xd0, 0xd4),
        }
    }
}

impl Theme {
    /// Default theme with config overrides applied; invalid colors are ignored
    pub fn from_overrides(overrides: &ThemeColorOverrides) -> Self {
        let mut theme = Self::default();

        let apply = |slot: &mut Color, value: &Option<String>, name: &str| {
            if let Some(hex) = value {
                match parse_hex_color(hex) {
                    Some(color) => *slot = color,
                    None => tracing::warn!("Invalid color for theme.{}: {:?}", name, hex),
                }
            }
        };

        apply(&mut theme.background, &overrides.background, "background");
        apply(&mut theme.foreground, &overrides.foreground, "foreground");
        apply(&mut theme.muted, &overrides.muted, "muted");
        apply(&mut theme.accent, &overrides.accent, "accent");
        apply(&mut theme.status_bg, &overrides.status_bg, "status_bg");

        theme
    }
}

/// Parse a hex color string into a ratatui Color
/// Accepts formats: "#RRGGBB", "RRGGBB", "#RGB", "RGB"
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }

    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff8000"), Some(Color::Rgb(255, 128, 0)));
        assert_eq!(parse_hex_color("ff8000"), Some(Color::Rgb(255, 128, 0)));
        assert_eq!(parse_hex_color("#fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("zzzzzz"), None);
        assert_eq!(parse_hex_color("ééé"), None);
    }

    #[test]
    fn test_overrides() {
        let overrides = ThemeColorOverrides {
            accent: Some("#00ff00".to_string()),
            background: Some("nonsense".to_string()),
            ..Default::default()
        };
        let theme = Theme::from_overrides(&overrides);
        assert_eq!(theme.accent, Color::Rgb(0, 255, 0));
        assert_eq!(theme.background, Theme::default().background);
    }
}
