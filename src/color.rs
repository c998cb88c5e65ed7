use std::collections::HashMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

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
// Categorical mapping: category name → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct values of a categorical column to distinct colours.
/// Legend order is the order the values were given in.
#[derive(Debug, Clone, Default)]
pub struct CategoryColors {
    order: Vec<String>,
    mapping: HashMap<String, Color32>,
}

impl CategoryColors {
    pub fn new(values: &[String]) -> Self {
        let palette = generate_palette(values.len());
        let mapping = values.iter().cloned().zip(palette).collect();
        Self {
            order: values.to_vec(),
            mapping,
        }
    }

    /// Colour for a value; grey for values the map was not built with.
    pub fn color_for(&self, value: &str) -> Color32 {
        self.mapping.get(value).copied().unwrap_or(Color32::GRAY)
    }

    /// The legend entries (value label → colour) for the UI.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.order
            .iter()
            .map(|v| (v.clone(), self.color_for(v)))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Continuous scales
// ---------------------------------------------------------------------------

/// Named continuous colour scales used by the hierarchical charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScale {
    /// Diverging red → white → blue.
    RdBu,
    /// Sequential light green → dark teal.
    Tealgrn,
}

const RDBU: &[(u8, u8, u8)] = &[
    (103, 0, 31),
    (178, 24, 43),
    (214, 96, 77),
    (244, 165, 130),
    (253, 219, 199),
    (247, 247, 247),
    (209, 229, 240),
    (146, 197, 222),
    (67, 147, 195),
    (33, 102, 172),
    (5, 48, 97),
];

const TEALGRN: &[(u8, u8, u8)] = &[
    (176, 242, 188),
    (137, 232, 172),
    (103, 219, 165),
    (76, 200, 163),
    (56, 178, 163),
    (44, 152, 160),
    (37, 125, 152),
];

fn to_linear((r, g, b): (u8, u8, u8)) -> LinSrgb {
    Srgb::new(r, g, b).into_format::<f32>().into_linear()
}

impl ColorScale {
    pub fn name(self) -> &'static str {
        match self {
            ColorScale::RdBu => "RdBu",
            ColorScale::Tealgrn => "Tealgrn",
        }
    }

    fn stops(self) -> &'static [(u8, u8, u8)] {
        match self {
            ColorScale::RdBu => RDBU,
            ColorScale::Tealgrn => TEALGRN,
        }
    }

    /// Colour at position `t` in `[0, 1]`; out-of-range and NaN clamp to
    /// the nearest end.
    pub fn sample(self, t: f64) -> Color32 {
        let stops = self.stops();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let pos = t * (stops.len() - 1) as f64;
        let lo = pos.floor() as usize;
        let hi = (lo + 1).min(stops.len() - 1);
        let frac = (pos - lo as f64) as f32;

        let mixed = to_linear(stops[lo]).mix(to_linear(stops[hi]), frac);
        let rgb: Srgb<u8> = Srgb::<f32>::from_linear(mixed).into_format();
        Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
    }

    /// Colour of `value` on a scale spanning `min..=max`.
    pub fn color_for(self, value: f64, min: f64, max: f64) -> Color32 {
        let span = max - min;
        if span.abs() < f64::EPSILON {
            return self.sample(0.5);
        }
        self.sample((value - min) / span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(7).len(), 7);
    }

    #[test]
    fn category_colors_are_distinct_and_ordered() {
        let values = vec!["b".to_string(), "a".to_string(), "c".to_string()];
        let colors = CategoryColors::new(&values);
        let legend = colors.legend_entries();
        assert_eq!(legend[0].0, "b");
        assert_ne!(colors.color_for("a"), colors.color_for("b"));
        assert_eq!(colors.color_for("unknown"), Color32::GRAY);
    }

    #[test]
    fn scale_endpoints_hit_first_and_last_stop() {
        assert_eq!(ColorScale::RdBu.sample(0.0), Color32::from_rgb(103, 0, 31));
        assert_eq!(ColorScale::RdBu.sample(1.0), Color32::from_rgb(5, 48, 97));
        assert_eq!(ColorScale::Tealgrn.sample(-3.0), Color32::from_rgb(176, 242, 188));
        assert_eq!(ColorScale::Tealgrn.sample(9.0), Color32::from_rgb(37, 125, 152));
    }

    #[test]
    fn degenerate_range_uses_midpoint() {
        assert_eq!(
            ColorScale::Tealgrn.color_for(5.0, 5.0, 5.0),
            ColorScale::Tealgrn.sample(0.5)
        );
    }
}
