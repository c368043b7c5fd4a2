use std::str::FromStr;

use eframe::egui::Color32;
use palette::{Darken, Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Hex parsing and shading
// ---------------------------------------------------------------------------

/// Parse `#rrggbb` (or `rrggbb`) into a colour.
pub fn hex_color(code: &str) -> Option<Color32> {
    let rgb = Srgb::<u8>::from_str(code).ok()?;
    Some(Color32::from_rgb(rgb.red, rgb.green, rgb.blue))
}

/// Darken a colour by `amount` (0–1) of its HSL lightness.
pub fn darken(color: Color32, amount: f32) -> Color32 {
    let rgb = Srgb::new(color.r(), color.g(), color.b()).into_format::<f32>();
    let hsl: Hsl = rgb.into_color();
    let out: Srgb = hsl.darken(amount).into_color();
    let out = out.into_format::<u8>();
    Color32::from_rgb(out.red, out.green, out.blue)
}

fn themed(code: &str) -> Color32 {
    hex_color(code).unwrap_or(Color32::GRAY)
}

// ---------------------------------------------------------------------------
// Dashboard theme
// ---------------------------------------------------------------------------

/// Colours used across the dashboard panels and charts.
#[derive(Debug, Clone)]
pub struct Theme {
    pub title: Color32,
    pub subtitle: Color32,
    pub button: Color32,
    pub button_text: Color32,
    pub result_fill: Color32,
    pub result_text: Color32,
    pub error_text: Color32,
    pub importance_bar: Color32,
    pub histogram_bar: Color32,
    pub kde_line: Color32,
    pub footer: Color32,
}

impl Default for Theme {
    fn default() -> Self {
        let histogram_bar = themed("#f39c12");
        Self {
            title: themed("#2c3e50"),
            subtitle: themed("#555555"),
            button: themed("#4CAF50"),
            button_text: Color32::WHITE,
            result_fill: themed("#e8f5e9"),
            result_text: themed("#2e7d32"),
            error_text: Color32::RED,
            importance_bar: themed("#3498db"),
            histogram_bar,
            kde_line: darken(histogram_bar, 0.3),
            footer: Color32::GRAY,
        }
    }
}
