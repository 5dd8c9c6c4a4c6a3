use thiserror::Error;

/// Minimum number of valid paired rows needed to fit a line.
pub const MIN_SAMPLES: usize = 2;

// ---------------------------------------------------------------------------
// Engine error type
// ---------------------------------------------------------------------------

/// Every failure the regression engine reports to its caller.
///
/// Each variant maps to one thing the user can act on (pick another file,
/// re-select columns, supply more data, ...), so the UI can react per kind
/// instead of showing one generic message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegressionError {
    /// The source could not be read or parsed, or it has no rows / columns.
    #[error("Failed to load data: {0}")]
    DataLoad(String),

    /// A selected column name is absent from the current dataset.
    #[error("Column not found: '{0}'")]
    ColumnNotFound(String),

    /// A selected column holds values that are not numbers.
    #[error("Column '{column}' is not numeric (row {row}: '{value}')")]
    NonNumericColumn {
        column: String,
        row: usize,
        value: String,
    },

    /// Fewer than [`MIN_SAMPLES`] valid paired rows remain after dropping missing values.
    #[error("Insufficient data: got {got} valid paired rows, need at least {min}")]
    InsufficientData { got: usize, min: usize },

    /// The predictor has zero variance, so the slope is undefined.
    #[error("Degenerate input: predictor column '{column}' has zero variance")]
    DegenerateInput { column: String },

    /// The data is finite but too large in magnitude for the sums of squares,
    /// or a prediction falls outside the range of `f64`.
    #[error("Numeric overflow: {0}")]
    NumericOverflow(String),

    /// An operation that needs a fitted model was called before a successful fit.
    #[error("No fitted model: run the regression first")]
    NoModel,

    /// Prediction input is not a finite number.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Column selection or fitting was requested before any dataset was loaded.
    #[error("No dataset loaded")]
    NoDataset,

    /// Fitting was requested before both columns were selected.
    #[error("No columns selected")]
    NoSelection,
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, RegressionError>;

impl From<anyhow::Error> for RegressionError {
    fn from(err: anyhow::Error) -> Self {
        RegressionError::DataLoad(format!("{err:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_name_the_problem() {
        let err = RegressionError::NonNumericColumn {
            column: "price".into(),
            row: 3,
            value: "abc".into(),
        };
        assert_eq!(err.to_string(), "Column 'price' is not numeric (row 3: 'abc')");

        let err = RegressionError::InsufficientData { got: 1, min: MIN_SAMPLES };
        assert_eq!(
            err.to_string(),
            "Insufficient data: got 1 valid paired rows, need at least 2"
        );
    }

    #[test]
    fn anyhow_chain_becomes_data_load() {
        let err = anyhow::anyhow!("inner").context("opening CSV");
        assert_eq!(
            RegressionError::from(err),
            RegressionError::DataLoad("opening CSV: inner".into())
        );
    }
}
