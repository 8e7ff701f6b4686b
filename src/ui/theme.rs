//! Greyscale theme for xampp-mechanic
//! A high-contrast monochrome palette with a few semantic accents

use ratatui::style::{Color, Modifier, Style};

/// The greyscale color palette
pub struct Theme;

impl Theme {
    // ─────────────────────────────────────────────────────────────────────
    // Core greyscale palette - from brightest to darkest
    // ─────────────────────────────────────────────────────────────────────

    /// Pure white - maximum emphasis, critical alerts
    pub const WHITE: Color = Color::Rgb(255, 255, 255);

    /// Near white - headers, selected items, primary focus
    pub const GREY_50: Color = Color::Rgb(250, 250, 250);

    /// Bright grey - primary text, important content
    pub const GREY_100: Color = Color::Rgb(220, 220, 220);

    /// Light grey - secondary text, active elements
    pub const GREY_200: Color = Color::Rgb(180, 180, 180);

    /// Medium grey - muted text, less important info
    pub const GREY_300: Color = Color::Rgb(140, 140, 140);

    /// Dark grey - subtle elements, inactive rows
    pub const GREY_400: Color = Color::Rgb(100, 100, 100);

    /// Darker grey - borders, separators
    pub const GREY_500: Color = Color::Rgb(70, 70, 70);

    /// Very dark grey - panel backgrounds, subtle borders
    pub const GREY_600: Color = Color::Rgb(45, 45, 45);

    /// Dark grey - overlay backgrounds
    pub const GREY_700: Color = Color::Rgb(35, 35, 35);

    /// Near black - main background
    pub const GREY_800: Color = Color::Rgb(28, 28, 28);

    /// True black - deepest background
    pub const GREY_900: Color = Color::Rgb(18, 18, 18);

    /// Background color alias
    pub const BG: Color = Self::GREY_900;

    // ─────────────────────────────────────────────────────────────────────
    // Accent colors
    // ─────────────────────────────────────────────────────────────────────

    pub const GREEN: Color = Color::Rgb(100, 200, 100);
    pub const RED: Color = Color::Rgb(200, 100, 100);
    pub const YELLOW: Color = Color::Rgb(255, 200, 100);
    pub const ACCENT: Color = Color::Rgb(140, 180, 255);

    // ─────────────────────────────────────────────────────────────────────
    // Branding
    // ─────────────────────────────────────────────────────────────────────

    pub const LOGO: &'static str = "x a m p p   m e c h a n i c";
    pub const TAGLINE: &'static str = "swap a broken mysql data dir for its backup";

    // ─────────────────────────────────────────────────────────────────────
    // Glyphs
    // ─────────────────────────────────────────────────────────────────────

    pub const RADIO_ON: &'static str = "(•)";
    pub const RADIO_OFF: &'static str = "( )";
    pub const CURSOR: char = '▏';

    // ─────────────────────────────────────────────────────────────────────
    // Pre-built styles for common UI elements
    // ─────────────────────────────────────────────────────────────────────

    pub fn text() -> Style {
        Style::default().fg(Self::GREY_100)
    }

    pub fn text_muted() -> Style {
        Style::default().fg(Self::GREY_300)
    }

    pub fn text_dim() -> Style {
        Style::default().fg(Self::GREY_400)
    }

    pub fn selected() -> Style {
        Style::default()
            .fg(Self::WHITE)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::GREY_600)
    }

    pub fn border_active() -> Style {
        Style::default().fg(Self::GREY_300)
    }

    /// Key badge used in footers and dialogs (` r ` on a grey chip)
    pub fn key() -> Style {
        Style::default().fg(Self::GREY_900).bg(Self::GREY_400)
    }
}
