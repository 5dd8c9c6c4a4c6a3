use serde::Serialize;

use crate::data::sample::SampleVectors;
use crate::error::{RegressionError, Result, MIN_SAMPLES};

// ---------------------------------------------------------------------------
// Fitted model
// ---------------------------------------------------------------------------

/// The least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FittedModel {
    pub slope: f64,
    pub intercept: f64,
}

impl FittedModel {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

// ---------------------------------------------------------------------------
// Centered sums
// ---------------------------------------------------------------------------

/// Means and centered sums of squares / cross-products of a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    pub n: usize,
    pub mean_x: f64,
    pub mean_y: f64,
    /// Σ(xᵢ − x̄)²
    pub sxx: f64,
    /// Σ(yᵢ − ȳ)²
    pub syy: f64,
    /// Σ(xᵢ − x̄)(yᵢ − ȳ)
    pub sxy: f64,
    pub x_constant: bool,
    pub y_constant: bool,
}

impl Moments {
    /// Two-pass computation: means first, then centered sums.
    pub fn from_samples(samples: &SampleVectors) -> Self {
        let (x, y) = (samples.x(), samples.y());
        let n = x.len();
        let mean_x = mean(x);
        let mean_y = mean(y);

        let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
        for (&xi, &yi) in x.iter().zip(y) {
            let dx = xi - mean_x;
            let dy = yi - mean_y;
            sxx += dx * dx;
            syy += dy * dy;
            sxy += dx * dy;
        }

        Moments {
            n,
            mean_x,
            mean_y,
            sxx,
            syy,
            sxy,
            x_constant: is_constant(x) || sxx == 0.0,
            y_constant: is_constant(y) || syy == 0.0,
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// All values identical. Checked directly because the centered sum of a
/// constant column can come out as a tiny non-zero value after rounding.
fn is_constant(values: &[f64]) -> bool {
    match values.first() {
        Some(&first) => values.iter().all(|&v| v == first),
        None => true,
    }
}

// ---------------------------------------------------------------------------
// Ordinary least squares
// ---------------------------------------------------------------------------

/// Fit the OLS line through `samples`. `predictor` names the x column in errors.
pub fn fit(samples: &SampleVectors, predictor: &str) -> Result<FittedModel> {
    if samples.len() < MIN_SAMPLES {
        return Err(RegressionError::InsufficientData {
            got: samples.len(),
            min: MIN_SAMPLES,
        });
    }

    let m = Moments::from_samples(samples);
    if m.x_constant {
        return Err(RegressionError::DegenerateInput {
            column: predictor.to_string(),
        });
    }

    let slope = m.sxy / m.sxx;
    let intercept = m.mean_y - slope * m.mean_x;
    if ![m.sxx, m.sxy, slope, intercept].iter().all(|v| v.is_finite()) {
        return Err(RegressionError::NumericOverflow(format!(
            "sums of squares of '{predictor}' exceed the range of f64"
        )));
    }
    Ok(FittedModel { slope, intercept })
}
