use log::debug;

use super::model::{Column, Dataset};
use crate::error::{RegressionError, Result};

// ---------------------------------------------------------------------------
// Column selection
// ---------------------------------------------------------------------------

/// The predictor (x) and response (y) column names chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSelection {
    pub x: String,
    pub y: String,
}

impl ColumnSelection {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        ColumnSelection {
            x: x.into(),
            y: y.into(),
        }
    }

    /// Check both names against the dataset's columns.
    pub fn validate(&self, dataset: &Dataset) -> Result<()> {
        for name in [&self.x, &self.y] {
            if !dataset.has_column(name) {
                return Err(RegressionError::ColumnNotFound(name.clone()));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sample vectors: row-aligned numeric pairs
// ---------------------------------------------------------------------------

/// Paired numeric samples extracted from two columns.
///
/// Rows where either cell is missing are dropped from both vectors, so
/// `x`, `y` and `rows` always have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleVectors {
    x: Vec<f64>,
    y: Vec<f64>,
    /// Source row index of each pair.
    rows: Vec<usize>,
    dropped: usize,
}

impl SampleVectors {
    /// Extract the selected columns from `dataset`.
    ///
    /// Fails with [`RegressionError::NonNumericColumn`] when either column
    /// holds text; numeric-ness is checked before any pairing happens.
    pub fn extract(dataset: &Dataset, selection: &ColumnSelection) -> Result<Self> {
        let x_col = numeric_column(dataset, &selection.x)?;
        let y_col = numeric_column(dataset, &selection.y)?;

        let mut x = Vec::with_capacity(dataset.len());
        let mut y = Vec::with_capacity(dataset.len());
        let mut rows = Vec::with_capacity(dataset.len());

        for (row, (xv, yv)) in x_col.values.iter().zip(&y_col.values).enumerate() {
            if let (Some(xi), Some(yi)) = (xv.as_f64(), yv.as_f64()) {
                x.push(xi);
                y.push(yi);
                rows.push(row);
            }
        }

        let dropped = dataset.len() - rows.len();
        if dropped > 0 {
            debug!(
                "Dropped {dropped} of {} rows with missing values in '{}' or '{}'",
                dataset.len(),
                selection.x,
                selection.y
            );
        }

        Ok(SampleVectors { x, y, rows, dropped })
    }

    /// Number of valid paired rows.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Rows excluded because of a missing value in either column.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// `[x, y]` pairs in row order. Re-iterable: clone the iterator or call again.
    pub fn points(&self) -> impl Iterator<Item = [f64; 2]> + Clone + '_ {
        self.x.iter().zip(&self.y).map(|(&xi, &yi)| [xi, yi])
    }

    /// Smallest and largest x, or `None` when there are no samples.
    pub fn x_range(&self) -> Option<(f64, f64)> {
        if self.x.is_empty() {
            return None;
        }
        let min = self.x.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = self.x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }
}

fn numeric_column<'a>(dataset: &'a Dataset, name: &str) -> Result<&'a Column> {
    let column = dataset
        .column(name)
        .ok_or_else(|| RegressionError::ColumnNotFound(name.to_string()))?;
    if !column.kind().is_numeric() {
        let (row, value) = column.first_non_numeric().unwrap_or((0, ""));
        return Err(RegressionError::NonNumericColumn {
            column: name.to_string(),
            row,
            value: value.to_string(),
        });
    }
    Ok(column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{load_delimited, Separator};

    fn dataset(text: &str) -> Dataset {
        load_delimited(text.as_bytes(), Separator::Comma).unwrap()
    }

    #[test]
    fn drops_rows_missing_in_either_column() {
        let ds = dataset("x,y\n1,2\n,4\n5,\n7,8\n");
        let samples = SampleVectors::extract(&ds, &ColumnSelection::new("x", "y")).unwrap();
        assert_eq!(samples.x(), &[1.0, 7.0]);
        assert_eq!(samples.y(), &[2.0, 8.0]);
        assert_eq!(samples.rows(), &[0, 3]);
        assert_eq!(samples.dropped(), 2);
        assert_eq!(samples.points().collect::<Vec<_>>(), vec![[1.0, 2.0], [7.0, 8.0]]);
    }

    #[test]
    fn text_column_is_rejected_before_pairing() {
        let ds = dataset("x,y\n1,2\n2,abc\n");
        let err = SampleVectors::extract(&ds, &ColumnSelection::new("x", "y")).unwrap_err();
        assert_eq!(
            err,
            RegressionError::NonNumericColumn {
                column: "y".into(),
                row: 1,
                value: "abc".into()
            }
        );
    }

    #[test]
    fn unknown_column_is_reported() {
        let ds = dataset("x,y\n1,2\n");
        let selection = ColumnSelection::new("x", "z");
        assert_eq!(
            selection.validate(&ds),
            Err(RegressionError::ColumnNotFound("z".into()))
        );
    }

    #[test]
    fn x_range_spans_samples() {
        let ds = dataset("x,y\n3,1\n-1,2\n10,3\n");
        let samples = SampleVectors::extract(&ds, &ColumnSelection::new("x", "y")).unwrap();
        assert_eq!(samples.x_range(), Some((-1.0, 10.0)));
    }
}
