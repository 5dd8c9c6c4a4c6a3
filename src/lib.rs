//! Simple linear regression engine: load a delimited table, pick a predictor
//! and a response column, fit an ordinary least-squares line, and read back
//! metrics, predictions and plot data.

pub mod data;
pub mod engine;
pub mod error;

pub use data::loader::Separator;
pub use engine::{EngineState, FittedModel, Metric, Metrics, RegressionEngine};
pub use error::{RegressionError, Result};
