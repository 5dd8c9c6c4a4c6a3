use std::path::Path;

use anyhow::{Context, Result};
use linear_regressor::{EngineState, Metric, RegressionEngine, RegressionError, Separator};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which chart the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotView {
    #[default]
    Regression,
    Residuals,
}

/// Message shown in the top bar.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusMessage {
    Info(String),
    Error(String),
}

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Regression engine holding dataset, selection and fit.
    pub engine: RegressionEngine,

    /// Separator used for the next delimited-text load.
    pub separator: Separator,

    /// File name of the loaded source.
    pub source_name: Option<String>,

    /// Column chosen as predictor.
    pub x_column: Option<String>,

    /// Column chosen as response.
    pub y_column: Option<String>,

    /// Text of the "value of X" field.
    pub predict_input: String,

    /// Last successful prediction as `(x, y)`.
    pub last_prediction: Option<(f64, f64)>,

    /// Error from the last selection/fit attempt, used for the metric labels.
    pub fit_error: Option<RegressionError>,

    pub view: PlotView,

    /// Status / error message shown in the UI.
    pub status_message: Option<StatusMessage>,

    pub show_help: bool,
}

impl AppState {
    /// Load a file with the current separator and pre-select the first two columns.
    pub fn load_path(&mut self, path: &Path) {
        match self.engine.load_file(path, self.separator) {
            Ok(dataset) => {
                let names = dataset.column_names();
                self.source_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned());
                self.x_column = names.first().cloned();
                self.y_column = names.get(1).or(names.first()).cloned();
                self.last_prediction = None;
                self.status_message = Some(StatusMessage::Info("File loaded successfully".into()));
                self.update_selection();
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.status_message = Some(StatusMessage::Error(e.to_string()));
            }
        }
    }

    pub fn set_x_column(&mut self, col: String) {
        self.x_column = Some(col);
        self.update_selection();
    }

    pub fn set_y_column(&mut self, col: String) {
        self.y_column = Some(col);
        self.update_selection();
    }

    /// Push the chosen columns into the engine and refresh the fit, so the
    /// metric labels always follow the pickers.
    fn update_selection(&mut self) {
        let (Some(x), Some(y)) = (self.x_column.clone(), self.y_column.clone()) else {
            return;
        };
        self.last_prediction = None;
        let result = self
            .engine
            .select_columns(&x, &y)
            .and_then(|()| self.engine.fit());
        self.fit_error = result.err();
        if let Some(err) = &self.fit_error {
            log::warn!("Regression on '{y}' ~ '{x}' failed: {err}");
        }
    }

    /// Explicit "Run regression" action.
    pub fn run_regression(&mut self) {
        if self.engine.state() == EngineState::Empty {
            self.status_message = Some(StatusMessage::Error("Load a file first".into()));
            return;
        }
        self.update_selection();
        self.status_message = Some(match &self.fit_error {
            None => StatusMessage::Info("Regression ran successfully".into()),
            Some(e) => StatusMessage::Error(e.to_string()),
        });
    }

    pub fn predict(&mut self) {
        match self.engine.predict_str(&self.predict_input) {
            Ok((x, y)) => {
                self.last_prediction = Some((x, y));
                self.status_message = None;
            }
            Err(e) => {
                self.last_prediction = None;
                self.status_message = Some(StatusMessage::Error(e.to_string()));
            }
        }
    }

    /// Labels for correlation and R² in the side panel.
    pub fn metric_labels(&self) -> (String, String) {
        if let Some(m) = self.engine.metrics() {
            let label = |name: &str, metric: Metric| {
                if metric.is_computable() {
                    format!("{name}: {metric}")
                } else {
                    format!("{name}: not computable (constant column)")
                }
            };
            return (label("Correlation", m.correlation), label("R²", m.r_squared));
        }
        let reason = match &self.fit_error {
            Some(RegressionError::NonNumericColumn { .. }) => "non-numeric data",
            Some(RegressionError::InsufficientData { .. }) => "not enough data",
            Some(RegressionError::DegenerateInput { .. }) => "constant X column",
            _ => "–",
        };
        (format!("Correlation: {reason}"), format!("R²: {reason}"))
    }

    /// Side-panel line naming the sample farthest from the line, by
    /// 1-based data row (the header is not counted).
    pub fn largest_residual_label(&self) -> Option<String> {
        let (row, residual) = self.engine.largest_residual().ok()?;
        Some(format!("Largest residual: {residual:.4} at data row {}", row + 1))
    }

    /// Pretty JSON report of the current fit.
    pub fn summary_json(&self) -> Result<String> {
        let summary = self.engine.summary()?;
        serde_json::to_string_pretty(&summary).context("serializing fit summary")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn loaded(contents: &str) -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(contents.as_bytes())
            .unwrap();
        let mut state = AppState::default();
        state.load_path(&path);
        (state, dir)
    }

    #[test]
    fn load_preselects_and_fits() {
        let (state, _dir) = loaded("x,y\n1,3\n2,5\n3,7\n");
        assert_eq!(state.x_column.as_deref(), Some("x"));
        assert_eq!(state.y_column.as_deref(), Some("y"));
        assert!(state.engine.has_model());
        assert_eq!(state.source_name.as_deref(), Some("data.csv"));
    }

    #[test]
    fn non_numeric_column_shows_in_labels() {
        let (mut state, _dir) = loaded("x,label\n1,a\n2,b\n");
        assert!(!state.engine.has_model());
        let (corr, r2) = state.metric_labels();
        assert_eq!(corr, "Correlation: non-numeric data");
        assert_eq!(r2, "R²: non-numeric data");

        state.set_y_column("x".into());
        assert!(state.engine.has_model());
        assert!(state.summary_json().unwrap().contains("\"x_column\": \"x\""));
    }

    #[test]
    fn constant_response_label_says_why() {
        let (state, _dir) = loaded("x,y\n1,4\n2,4\n3,4\n");
        let (corr, r2) = state.metric_labels();
        assert_eq!(corr, "Correlation: not computable (constant column)");
        assert_eq!(r2, "R²: not computable (constant column)");
    }

    #[test]
    fn largest_residual_uses_data_rows() {
        let (state, _dir) = loaded("x,y\n1,3\nNA,0\n2,5\n3,40\n4,9\n");
        let label = state.largest_residual_label().unwrap();
        assert!(label.ends_with("at data row 4"), "{label}");
    }

    #[test]
    fn predict_records_result_or_error() {
        let (mut state, _dir) = loaded("x,y\n1,3\n2,5\n3,7\n");
        state.predict_input = "10".into();
        state.predict();
        let (x, y) = state.last_prediction.unwrap();
        assert_eq!(x, 10.0);
        assert!((y - 21.0).abs() < 1e-9);

        state.predict_input = "ten".into();
        state.predict();
        assert!(state.last_prediction.is_none());
        assert!(matches!(state.status_message, Some(StatusMessage::Error(_))));
    }
}
