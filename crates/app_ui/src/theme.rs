//! Application theming

use app_core::ThemeConfig;
use egui::{Color32, Visuals};

/// Application theme
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub primary: Color32,
    pub secondary: Color32,
    pub accent: Color32,
    pub highlight: Color32,
    pub text: Color32,
    pub text_secondary: Color32,
    pub button: Color32,
    pub button_hover: Color32,
    pub panel: Color32,
}

impl Theme {
    /// Build from configured hex colors. Unparseable entries keep the
    /// built-in color and are logged.
    pub fn from_config(config: &ThemeConfig) -> Self {
        let fallback = Self::from_hex_or(&ThemeConfig::default(), &Self::builtin());
        Self::from_hex_or(config, &fallback)
    }

    fn from_hex_or(config: &ThemeConfig, fallback: &Theme) -> Self {
        let pick = |name: &str, hex: &str, default: Color32| {
            Self::parse_color(hex).unwrap_or_else(|| {
                tracing::warn!("Invalid theme color {} = {:?}, using default", name, hex);
                default
            })
        };

        Self {
            primary: pick("primary", &config.primary, fallback.primary),
            secondary: pick("secondary", &config.secondary, fallback.secondary),
            accent: pick("accent", &config.accent, fallback.accent),
            highlight: pick("highlight", &config.highlight, fallback.highlight),
            text: pick("text", &config.text, fallback.text),
            text_secondary: pick("text_secondary", &config.text_secondary, fallback.text_secondary),
            button: pick("button", &config.button, fallback.button),
            button_hover: pick("button_hover", &config.button_hover, fallback.button_hover),
            panel: pick("panel", &config.panel, fallback.panel),
        }
    }

    fn builtin() -> Self {
        Self {
            primary: Color32::from_rgb(0x1A, 0x1A, 0x2E),
            secondary: Color32::from_rgb(0x16, 0x21, 0x3E),
            accent: Color32::from_rgb(0x0F, 0x34, 0x60),
            highlight: Color32::from_rgb(0xE9, 0x45, 0x60),
            text: Color32::WHITE,
            text_secondary: Color32::from_rgb(0xB2, 0xB2, 0xB2),
            button: Color32::from_rgb(0xE9, 0x45, 0x60),
            button_hover: Color32::from_rgb(0xD6, 0x36, 0x55),
            panel: Color32::from_rgb(0x1E, 0x3C, 0x72),
        }
    }

    /// Apply theme to egui
    pub fn apply(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();
        let mut visuals = Visuals::dark();

        visuals.panel_fill = self.primary;
        visuals.window_fill = self.secondary;
        visuals.extreme_bg_color = self.accent;
        visuals.faint_bg_color = self.secondary;
        visuals.override_text_color = Some(self.text);

        visuals.widgets.noninteractive.bg_fill = self.secondary;
        visuals.widgets.noninteractive.fg_stroke.color = self.text;

        visuals.widgets.inactive.bg_fill = self.button;
        visuals.widgets.inactive.weak_bg_fill = self.button;
        visuals.widgets.inactive.fg_stroke.color = self.text;

        visuals.widgets.hovered.bg_fill = self.button_hover;
        visuals.widgets.hovered.weak_bg_fill = self.button_hover;
        visuals.widgets.hovered.fg_stroke.color = self.text;

        visuals.widgets.active.bg_fill = self.button_hover;
        visuals.widgets.active.weak_bg_fill = self.button_hover;
        visuals.widgets.active.fg_stroke.color = self.text;

        visuals.selection.bg_fill = self.highlight.linear_multiply(0.6);
        visuals.selection.stroke.color = self.highlight;
        visuals.hyperlink_color = self.highlight;

        style.visuals = visuals;
        ctx.set_style(style);
    }

    /// Linear clear color for the render pass
    pub fn clear_color(&self) -> [f64; 3] {
        let rgba = egui::Rgba::from(self.primary);
        [f64::from(rgba.r()), f64::from(rgba.g()), f64::from(rgba.b())]
    }

    /// Parse a hex color string
    pub fn parse_color(hex: &str) -> Option<Color32> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }

        if hex.len() == 6 {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color32::from_rgb(r, g, b))
        } else if hex.len() == 8 {
            let a = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let r = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let g = u8::from_str_radix(&hex[4..6], 16).ok()?;
            let b = u8::from_str_radix(&hex[6..8], 16).ok()?;
            Some(Color32::from_rgba_unmultiplied(r, g, b, a))
        } else {
            None
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}
