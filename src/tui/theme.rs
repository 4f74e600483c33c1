use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::{Category, UiConfig};

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub green: Color,
    pub purple: Color,
    pub selection_bg: Color,
    pub selection_id: Color,
    /// Per-category colors
    pub category_colors: HashMap<Category, Color>,
}

impl Default for Theme {
    fn default() -> Self {
        let mut category_colors = HashMap::new();
        category_colors.insert(Category::Design, Color::Rgb(0xA5, 0xB4, 0xFC));
        category_colors.insert(Category::Development, Color::Rgb(0x67, 0xE8, 0xF9));
        category_colors.insert(Category::Productivity, Color::Rgb(0xFC, 0xD3, 0x4D));
        category_colors.insert(Category::Inspiration, Color::Rgb(0xF9, 0xA8, 0xD4));

        Theme {
            background: Color::Rgb(0x0A, 0x0A, 0x0A),
            text: Color::Rgb(0xD4, 0xD4, 0xD4),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0x63, 0x66, 0xF1),
            dim: Color::Rgb(0x73, 0x73, 0x73),
            red: Color::Rgb(0xF8, 0x71, 0x71),
            green: Color::Rgb(0x4A, 0xDE, 0x80),
            purple: Color::Rgb(0xA8, 0x55, 0xF7),
            selection_bg: Color::Rgb(0x1E, 0x1B, 0x4B),
            selection_id: Color::Rgb(0xC7, 0xD2, 0xFE),
            category_colors,
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from hub UI config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        // Apply color overrides from [ui.colors]
        for (key, value) in &ui.colors {
            if let Some(color) = parse_hex_color(value) {
                match key.as_str() {
                    "background" => theme.background = color,
                    "text" => theme.text = color,
                    "text_bright" => theme.text_bright = color,
                    "highlight" => theme.highlight = color,
                    "dim" => theme.dim = color,
                    "red" => theme.red = color,
                    "green" => theme.green = color,
                    "purple" => theme.purple = color,
                    "selection_bg" => theme.selection_bg = color,
                    "selection_id" => theme.selection_id = color,
                    _ => {}
                }
            }
        }

        // Apply category color overrides from [ui.category_colors]
        for (label, value) in &ui.category_colors {
            if let (Ok(category), Some(color)) = (label.parse::<Category>(), parse_hex_color(value))
            {
                theme.category_colors.insert(category, color);
            }
        }

        theme
    }

    /// Get the color for a category, falling back to text color
    pub fn category_color(&self, category: Category) -> Color {
        self.category_colors
            .get(&category)
            .copied()
            .unwrap_or(self.text)
    }
}
