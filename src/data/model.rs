use std::fmt;

use anyhow::{bail, Result};

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, inferred from the text of the source.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Missing,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Missing => write!(f, "<missing>"),
        }
    }
}

impl CellValue {
    /// Numeric view of the cell; `None` for text and missing cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

// ---------------------------------------------------------------------------
// Column – one named, typed column
// ---------------------------------------------------------------------------

/// Type inferred for a whole column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every non-missing cell is a number.
    Numeric,
    /// At least one non-missing cell is text.
    Text,
    /// Every cell is missing.
    Empty,
}

impl ColumnKind {
    /// Whether arithmetic on the column is allowed. An all-missing column
    /// counts as numeric; it simply yields no samples.
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Numeric | ColumnKind::Empty)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Text => write!(f, "text"),
            ColumnKind::Empty => write!(f, "empty"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub values: Vec<CellValue>,
    kind: ColumnKind,
}

impl Column {
    /// Build a column and infer its kind from the cells.
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        let kind = infer_kind(&values);
        Column {
            name: name.into(),
            values,
            kind,
        }
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    /// First text cell as `(row, text)`, if any.
    pub fn first_non_numeric(&self) -> Option<(usize, &str)> {
        self.values.iter().enumerate().find_map(|(row, v)| match v {
            CellValue::Text(s) => Some((row, s.as_str())),
            _ => None,
        })
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_missing()).count()
    }
}

fn infer_kind(values: &[CellValue]) -> ColumnKind {
    let mut any_present = false;
    for v in values {
        match v {
            CellValue::Text(_) => return ColumnKind::Text,
            CellValue::Integer(_) | CellValue::Float(_) => any_present = true,
            CellValue::Missing => {}
        }
    }
    if any_present {
        ColumnKind::Numeric
    } else {
        ColumnKind::Empty
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// An ordered, rectangular table of named columns.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Dataset {
    /// Assemble a dataset, rejecting empty or ragged tables.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let Some(first) = columns.first() else {
            bail!("dataset has no columns");
        };
        let n_rows = first.values.len();
        if n_rows == 0 {
            bail!("dataset has no rows");
        }
        if let Some(bad) = columns.iter().find(|c| c.values.len() != n_rows) {
            bail!(
                "column '{}' has {} rows, expected {n_rows}",
                bad.name,
                bad.values.len()
            );
        }
        Ok(Dataset { columns, n_rows })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.n_rows
    }

    /// Always false for a constructed dataset; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in source order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }
}
