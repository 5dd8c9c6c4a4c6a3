use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues,
/// starting at `hue_offset` degrees.
pub fn generate_palette(n: usize, hue_offset: f32) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (hue_offset + (i as f32 / n as f32) * 360.0) % 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.5);
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
// Series colours for the charts
// ---------------------------------------------------------------------------

/// Colours of the plotted series.
#[derive(Debug, Clone, Copy)]
pub struct SeriesColors {
    pub samples: Color32,
    pub fitted_line: Color32,
    pub prediction: Color32,
    pub residual_above: Color32,
    pub residual_below: Color32,
}

impl Default for SeriesColors {
    fn default() -> Self {
        // Offset puts the fitted line on red, the samples on blue.
        let c = generate_palette(5, 350.0);
        SeriesColors {
            fitted_line: c[0],
            prediction: c[1],
            residual_above: c[2],
            samples: c[3],
            residual_below: c[4],
        }
    }
}

impl SeriesColors {
    /// Colour of a residual point by its sign.
    pub fn residual(&self, residual: f64) -> Color32 {
        if residual >= 0.0 {
            self.residual_above
        } else {
            self.residual_below
        }
    }
}
