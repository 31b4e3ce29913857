use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: metric column → Color32
// ---------------------------------------------------------------------------

/// Assigns each numeric column its own series colour.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(columns: &[String]) -> Self {
        let palette = generate_palette(columns.len());
        ColorMap {
            mapping: columns.iter().cloned().zip(palette).collect(),
            default_color: Color32::LIGHT_BLUE,
        }
    }

    pub fn color_for(&self, column: &str) -> Color32 {
        self.mapping
            .get(column)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_colours() {
        let palette = generate_palette(4);
        assert_eq!(palette.len(), 4);
        for (i, a) in palette.iter().enumerate() {
            for b in &palette[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_column_gets_default_colour() {
        let map = ColorMap::new(&["revenue".to_string()]);
        assert_ne!(map.color_for("revenue"), Color32::LIGHT_BLUE);
        assert_eq!(map.color_for("cost"), Color32::LIGHT_BLUE);
    }
}
