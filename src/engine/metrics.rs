use std::fmt;

use serde::Serialize;

use super::ols::{FittedModel, Moments};
use crate::data::sample::SampleVectors;

// ---------------------------------------------------------------------------
// Metric – a value or an explicit "not computable" marker
// ---------------------------------------------------------------------------

/// A goodness-of-fit number that may be undefined for the sample.
///
/// Undefined values are never exposed as NaN; they serialize as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Metric {
    Value(f64),
    NotComputable,
}

impl Metric {
    pub fn value(self) -> Option<f64> {
        match self {
            Metric::Value(v) => Some(v),
            Metric::NotComputable => None,
        }
    }

    pub fn is_computable(self) -> bool {
        matches!(self, Metric::Value(_))
    }

    fn from_finite(v: f64) -> Self {
        if v.is_finite() {
            Metric::Value(v)
        } else {
            Metric::NotComputable
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Value(v) => write!(f, "{v:.4}"),
            Metric::NotComputable => write!(f, "not computable"),
        }
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Correlation and fit quality, all derived from one sample snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    /// Pearson r between x and y.
    pub correlation: Metric,
    /// Coefficient of determination of the fitted line.
    pub r_squared: Metric,
    pub n_samples: usize,
    pub dropped_rows: usize,
    /// Root-mean-square residual.
    pub rmse: Metric,
}

/// Compute metrics of `model` against the samples it was fitted on.
pub fn compute(samples: &SampleVectors, model: &FittedModel) -> Metrics {
    let m = Moments::from_samples(samples);

    let correlation = if m.x_constant || m.y_constant {
        Metric::NotComputable
    } else {
        Metric::from_finite((m.sxy / (m.sxx.sqrt() * m.syy.sqrt())).clamp(-1.0, 1.0))
    };

    let ss_res: f64 = samples
        .points()
        .map(|[x, y]| (y - model.predict(x)).powi(2))
        .sum();

    let r_squared = if m.y_constant {
        Metric::NotComputable
    } else {
        Metric::from_finite(1.0 - ss_res / m.syy)
    };

    let rmse = if m.n == 0 {
        Metric::NotComputable
    } else {
        Metric::from_finite((ss_res / m.n as f64).sqrt())
    };

    Metrics {
        correlation,
        r_squared,
        n_samples: m.n,
        dropped_rows: samples.dropped(),
        rmse,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{load_delimited, Separator};
    use crate::data::sample::ColumnSelection;
    use crate::engine::ols::fit;
    use approx::assert_relative_eq;

    fn fitted(text: &str) -> (SampleVectors, FittedModel) {
        let ds = load_delimited(text.as_bytes(), Separator::Comma).unwrap();
        let samples = SampleVectors::extract(&ds, &ColumnSelection::new("x", "y")).unwrap();
        let model = fit(&samples, "x").unwrap();
        (samples, model)
    }

    #[test]
    fn perfect_negative_line() {
        let (samples, model) = fitted("x,y\n1,8\n2,6\n3,4\n4,2\n");
        let metrics = compute(&samples, &model);
        assert_relative_eq!(metrics.correlation.value().unwrap(), -1.0, epsilon = 1e-12);
        assert_relative_eq!(metrics.r_squared.value().unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(metrics.rmse.value().unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn r_squared_is_square_of_correlation_for_ols() {
        let (samples, model) = fitted("x,y\n1,1\n2,3\n3,2\n4,4\n");
        let metrics = compute(&samples, &model);
        let r = metrics.correlation.value().unwrap();
        // r = 4 / sqrt(5 * 5)
        assert_relative_eq!(r, 0.8, epsilon = 1e-12);
        assert_relative_eq!(metrics.r_squared.value().unwrap(), r * r, epsilon = 1e-12);
        assert_eq!(metrics.n_samples, 4);
    }

    #[test]
    fn constant_response_is_not_computable() {
        let (samples, model) = fitted("x,y\n1,5\n2,5\n3,5\n");
        let metrics = compute(&samples, &model);
        assert_eq!(metrics.correlation, Metric::NotComputable);
        assert_eq!(metrics.r_squared, Metric::NotComputable);
        assert_eq!(metrics.correlation.to_string(), "not computable");
    }

    #[test]
    fn not_computable_serializes_as_null() {
        let json = serde_json::to_string(&Metric::NotComputable).unwrap();
        assert_eq!(json, "null");
        assert_eq!(serde_json::to_string(&Metric::Value(0.5)).unwrap(), "0.5");
    }
}
