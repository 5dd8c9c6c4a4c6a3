//! Regression engine: owns the dataset, the column selection and the fit.
//!
//! State machine:
//! ```text
//!   Empty ──load──▶ Loaded ──select_columns──▶ ColumnsSelected ──fit──▶ Fitted
//!                     ▲                              ▲                    │
//!                     └────────── load ──────────────┴── select_columns ──┘
//! ```
//! The fitted model, its metrics and the sample vectors are stored together
//! as one snapshot, so they can never disagree with each other.

pub mod metrics;
pub mod ols;

use std::io::Read;
use std::path::Path;

use log::{debug, info};
use serde::Serialize;

use crate::data::loader::{self, Separator};
use crate::data::model::Dataset;
use crate::data::sample::{ColumnSelection, SampleVectors};
use crate::error::{RegressionError, Result, MIN_SAMPLES};

pub use metrics::{Metric, Metrics};
pub use ols::FittedModel;

/// Where the engine is in its load → select → fit lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Empty,
    Loaded,
    ColumnsSelected,
    Fitted,
}

/// Everything produced by one successful fit.
#[derive(Debug, Clone)]
struct FitSnapshot {
    samples: SampleVectors,
    model: FittedModel,
    metrics: Metrics,
}

/// Serializable report of the current fit.
#[derive(Debug, Clone, Serialize)]
pub struct FitSummary<'a> {
    pub x_column: &'a str,
    pub y_column: &'a str,
    pub model: FittedModel,
    pub metrics: Metrics,
}

#[derive(Debug, Default)]
pub struct RegressionEngine {
    dataset: Option<Dataset>,
    selection: Option<ColumnSelection>,
    fitted: Option<FitSnapshot>,
}

impl RegressionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> EngineState {
        match (&self.dataset, &self.selection, &self.fitted) {
            (None, _, _) => EngineState::Empty,
            (Some(_), None, _) => EngineState::Loaded,
            (Some(_), Some(_), None) => EngineState::ColumnsSelected,
            (Some(_), Some(_), Some(_)) => EngineState::Fitted,
        }
    }

    // -- Loading --

    /// Parse delimited text from `source` and make it the current dataset.
    ///
    /// On failure the previously loaded dataset and fit stay untouched.
    pub fn load<R: Read>(&mut self, source: R, separator: Separator) -> Result<&Dataset> {
        let dataset = loader::load_delimited(source, separator)?;
        Ok(self.replace_dataset(dataset))
    }

    /// Load a file, dispatching on its extension (see [`loader::load_file`]).
    pub fn load_file(&mut self, path: &Path, separator: Separator) -> Result<&Dataset> {
        let dataset = loader::load_file(path, separator)?;
        info!("Loaded {}", path.display());
        Ok(self.replace_dataset(dataset))
    }

    fn replace_dataset(&mut self, dataset: Dataset) -> &Dataset {
        info!(
            "Dataset has {} rows and columns {:?}",
            dataset.len(),
            dataset.column_names()
        );
        self.selection = None;
        self.fitted = None;
        self.dataset.insert(dataset)
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// Column names of the current dataset, empty before the first load.
    pub fn column_names(&self) -> Vec<String> {
        self.dataset
            .as_ref()
            .map(Dataset::column_names)
            .unwrap_or_default()
    }

    // -- Column selection --

    /// Choose the predictor and response columns. `x == y` is allowed.
    ///
    /// Invalidates any previous fit on success.
    pub fn select_columns(&mut self, x: &str, y: &str) -> Result<()> {
        let dataset = self.dataset.as_ref().ok_or(RegressionError::NoDataset)?;
        let selection = ColumnSelection::new(x, y);
        selection.validate(dataset)?;

        debug!("Selected x = '{x}', y = '{y}'");
        self.selection = Some(selection);
        self.fitted = None;
        Ok(())
    }

    pub fn selection(&self) -> Option<&ColumnSelection> {
        self.selection.as_ref()
    }

    // -- Fitting --

    /// Fit the least-squares line on the selected columns and compute its metrics.
    pub fn fit(&mut self) -> Result<FittedModel> {
        let dataset = self.dataset.as_ref().ok_or(RegressionError::NoDataset)?;
        let selection = self.selection.as_ref().ok_or(RegressionError::NoSelection)?;

        let samples = SampleVectors::extract(dataset, selection)?;
        let model = ols::fit(&samples, &selection.x)?;
        let metrics = metrics::compute(&samples, &model);

        info!(
            "Fitted '{}' ~ '{}': slope = {}, intercept = {}, r = {}, R² = {} ({} rows)",
            selection.y,
            selection.x,
            model.slope,
            model.intercept,
            metrics.correlation,
            metrics.r_squared,
            samples.len()
        );

        self.fitted = Some(FitSnapshot {
            samples,
            model,
            metrics,
        });
        Ok(model)
    }

    /// Recompute correlation and R² for the current fit.
    pub fn compute_metrics(&mut self) -> Result<Metrics> {
        let snapshot = self.fitted.as_mut().ok_or(RegressionError::NoModel)?;
        snapshot.metrics = metrics::compute(&snapshot.samples, &snapshot.model);
        Ok(snapshot.metrics)
    }

    fn snapshot(&self) -> Result<&FitSnapshot> {
        self.fitted.as_ref().ok_or(RegressionError::NoModel)
    }

    pub fn has_model(&self) -> bool {
        self.fitted.is_some()
    }

    pub fn model(&self) -> Option<FittedModel> {
        self.fitted.as_ref().map(|s| s.model)
    }

    pub fn metrics(&self) -> Option<Metrics> {
        self.fitted.as_ref().map(|s| s.metrics)
    }

    // -- Prediction --

    /// `slope * x + intercept`. Extrapolation outside the sample range is allowed.
    pub fn predict(&self, x: f64) -> Result<f64> {
        let model = self.snapshot()?.model;
        if !x.is_finite() {
            return Err(RegressionError::InvalidInput(format!(
                "{x} is not a finite number"
            )));
        }
        let y = model.predict(x);
        if !y.is_finite() {
            return Err(RegressionError::NumericOverflow(format!(
                "prediction for x = {x} exceeds the range of f64"
            )));
        }
        Ok(y)
    }

    /// Parse user text as a number, then [`predict`](Self::predict).
    /// Returns the parsed `x` together with the prediction.
    pub fn predict_str(&self, text: &str) -> Result<(f64, f64)> {
        self.snapshot()?;
        let x: f64 = text
            .trim()
            .parse()
            .map_err(|_| RegressionError::InvalidInput(format!("'{text}' is not a number")))?;
        Ok((x, self.predict(x)?))
    }

    // -- Plot data --

    /// The `[x, y]` samples used by the last fit, in row order.
    pub fn sample_points(&self) -> Result<impl Iterator<Item = [f64; 2]> + Clone + '_> {
        Ok(self.snapshot()?.samples.points())
    }

    /// `[x, ŷ]` for every sample x.
    pub fn fitted_line_points(&self) -> Result<impl Iterator<Item = [f64; 2]> + Clone + '_> {
        let snapshot = self.snapshot()?;
        let model = snapshot.model;
        Ok(snapshot
            .samples
            .x()
            .iter()
            .map(move |&x| [x, model.predict(x)]))
    }

    /// The fitted line evaluated at the smallest and largest sample x.
    pub fn fitted_line_endpoints(&self) -> Result<[[f64; 2]; 2]> {
        let snapshot = self.snapshot()?;
        let (lo, hi) = snapshot
            .samples
            .x_range()
            .ok_or(RegressionError::InsufficientData {
                got: 0,
                min: MIN_SAMPLES,
            })?;
        let model = snapshot.model;
        Ok([[lo, model.predict(lo)], [hi, model.predict(hi)]])
    }

    /// `[x, y − ŷ]`, row-aligned with [`sample_points`](Self::sample_points).
    pub fn residuals(&self) -> Result<impl Iterator<Item = [f64; 2]> + Clone + '_> {
        let snapshot = self.snapshot()?;
        let model = snapshot.model;
        Ok(snapshot
            .samples
            .points()
            .map(move |[x, y]| [x, y - model.predict(x)]))
    }

    /// Source row index and residual of the sample farthest from the line.
    pub fn largest_residual(&self) -> Result<(usize, f64)> {
        let snapshot = self.snapshot()?;
        let model = snapshot.model;
        snapshot
            .samples
            .rows()
            .iter()
            .zip(snapshot.samples.points())
            .map(|(&row, [x, y])| (row, y - model.predict(x)))
            .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
            .ok_or(RegressionError::InsufficientData {
                got: 0,
                min: MIN_SAMPLES,
            })
    }

    /// `[ŷ, y − ŷ]`, the layout of a residuals-versus-predicted chart.
    pub fn residuals_vs_predicted(
        &self,
    ) -> Result<impl Iterator<Item = [f64; 2]> + Clone + '_> {
        let snapshot = self.snapshot()?;
        let model = snapshot.model;
        Ok(snapshot.samples.points().map(move |[x, y]| {
            let predicted = model.predict(x);
            [predicted, y - predicted]
        }))
    }

    /// Report of the current fit, ready for serialization.
    pub fn summary(&self) -> Result<FitSummary<'_>> {
        let snapshot = self.snapshot()?;
        let selection = self.selection.as_ref().ok_or(RegressionError::NoSelection)?;
        Ok(FitSummary {
            x_column: &selection.x,
            y_column: &selection.y,
            model: snapshot.model,
            metrics: snapshot.metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "x,y\n1,3\n2,5\n3,7\n4,9\n";

    #[test]
    fn walks_the_state_machine() {
        let mut engine = RegressionEngine::new();
        assert_eq!(engine.state(), EngineState::Empty);

        engine.load(LINE.as_bytes(), Separator::Comma).unwrap();
        assert_eq!(engine.state(), EngineState::Loaded);

        engine.select_columns("x", "y").unwrap();
        assert_eq!(engine.state(), EngineState::ColumnsSelected);

        engine.fit().unwrap();
        assert_eq!(engine.state(), EngineState::Fitted);

        engine.select_columns("y", "x").unwrap();
        assert_eq!(engine.state(), EngineState::ColumnsSelected);
        assert!(!engine.has_model());
    }

    #[test]
    fn preconditions_are_reported() {
        let mut engine = RegressionEngine::new();
        assert_eq!(engine.select_columns("x", "y"), Err(RegressionError::NoDataset));
        assert_eq!(engine.fit(), Err(RegressionError::NoDataset));

        engine.load(LINE.as_bytes(), Separator::Comma).unwrap();
        assert_eq!(engine.fit(), Err(RegressionError::NoSelection));
        assert_eq!(engine.compute_metrics(), Err(RegressionError::NoModel));
        assert!(engine.sample_points().is_err());
        assert!(engine.summary().is_err());
    }

    #[test]
    fn predict_str_parses_and_validates() {
        let mut engine = RegressionEngine::new();
        assert_eq!(engine.predict_str("abc"), Err(RegressionError::NoModel));

        engine.load(LINE.as_bytes(), Separator::Comma).unwrap();
        engine.select_columns("x", "y").unwrap();
        engine.fit().unwrap();

        let (x, y) = engine.predict_str(" 5 ").unwrap();
        assert_eq!(x, 5.0);
        assert!((y - 11.0).abs() < 1e-9);
        assert!(matches!(
            engine.predict_str("five"),
            Err(RegressionError::InvalidInput(_))
        ));
        assert!(matches!(
            engine.predict_str("inf"),
            Err(RegressionError::InvalidInput(_))
        ));
    }

    #[test]
    fn summary_serializes() {
        let mut engine = RegressionEngine::new();
        engine.load(LINE.as_bytes(), Separator::Comma).unwrap();
        engine.select_columns("x", "y").unwrap();
        engine.fit().unwrap();

        let json = serde_json::to_value(engine.summary().unwrap()).unwrap();
        assert_eq!(json["x_column"], "x");
        assert_eq!(json["metrics"]["n_samples"], 4);
        assert!(json["model"]["slope"].as_f64().is_some());
    }
}
