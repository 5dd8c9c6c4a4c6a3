use std::collections::BTreeSet;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Column, Dataset};

/// Cell texts read as missing values.
const MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-nan", "null", "NULL", "None", "#N/A",
];

// ---------------------------------------------------------------------------
// Field separator
// ---------------------------------------------------------------------------

/// Field delimiters offered for delimited-text sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separator {
    #[default]
    Comma,
    Semicolon,
    Colon,
    Pipe,
    Slash,
    Tab,
}

impl Separator {
    pub const ALL: [Separator; 6] = [
        Separator::Comma,
        Separator::Semicolon,
        Separator::Colon,
        Separator::Pipe,
        Separator::Slash,
        Separator::Tab,
    ];

    pub fn as_char(self) -> char {
        match self {
            Separator::Comma => ',',
            Separator::Semicolon => ';',
            Separator::Colon => ':',
            Separator::Pipe => '|',
            Separator::Slash => '/',
            Separator::Tab => '\t',
        }
    }

    pub fn as_byte(self) -> u8 {
        self.as_char() as u8
    }

    /// Human readable label for pickers.
    pub fn label(self) -> &'static str {
        match self {
            Separator::Comma => "Comma  ,",
            Separator::Semicolon => "Semicolon  ;",
            Separator::Colon => "Colon  :",
            Separator::Pipe => "Pipe  |",
            Separator::Slash => "Slash  /",
            Separator::Tab => "Tab",
        }
    }
}

impl TryFrom<char> for Separator {
    type Error = anyhow::Error;

    fn try_from(c: char) -> Result<Self> {
        Separator::ALL
            .into_iter()
            .find(|s| s.as_char() == c)
            .with_context(|| format!("unsupported separator {c:?}"))
    }
}

/// Parses a command-line separator: the character itself, or `tab` / `\t`.
impl FromStr for Separator {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("tab") || s == "\\t" {
            return Ok(Separator::Tab);
        }
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Separator::try_from(c),
            _ => bail!("separator must be a single character, got {s:?}"),
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` / `.tsv` / `.dat` – delimited text split on `separator`
/// * `.json`    – `[{ "x": 1.0, "y": 2.0 }, ...]`
/// * `.parquet` – flat table of numeric / string columns
pub fn load_file(path: &Path, separator: Separator) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" | "txt" | "tsv" | "dat" | "" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            load_delimited(file, separator)
        }
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Parse delimited text: first row is the header, every following row a record.
pub fn load_delimited<R: Read>(source: R, separator: Separator) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(separator.as_byte())
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers: Vec<String> = reader
        .headers()
        .context("reading header row")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if headers.is_empty() {
        bail!("no columns found: the source is empty");
    }

    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("row {}", row_no + 1))?;
        for (col_idx, value) in record.iter().enumerate() {
            cells[col_idx].push(guess_cell_type(value));
        }
    }

    if cells[0].is_empty() {
        bail!("no data rows found below the header");
    }
    build_dataset(headers, cells)
}

fn build_dataset(headers: Vec<String>, cells: Vec<Vec<CellValue>>) -> Result<Dataset> {
    let columns = normalize_headers(headers)
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    Dataset::from_columns(columns)
}

/// Name blank headers `Unnamed: <idx>` and suffix duplicates with `.1`, `.2`, ...
fn normalize_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: BTreeSet<String> = BTreeSet::new();
    headers
        .into_iter()
        .enumerate()
        .map(|(idx, raw)| {
            let base = if raw.trim().is_empty() {
                format!("Unnamed: {idx}")
            } else {
                raw.trim().to_string()
            };
            let mut name = base.clone();
            let mut n = 1;
            while seen.contains(&name) {
                name = format!("{base}.{n}");
                n += 1;
            }
            seen.insert(name.clone());
            name
        })
        .collect()
}

fn guess_cell_type(raw: &str) -> CellValue {
    let s = raw.trim();
    if MISSING_MARKERS.contains(&s) {
        return CellValue::Missing;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return if f.is_finite() {
            CellValue::Float(f)
        } else {
            CellValue::Missing
        };
    }
    CellValue::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, one object per row. Keys missing from a record
/// become missing cells; columns are ordered by key name.
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut names: BTreeSet<String> = BTreeSet::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        names.extend(obj.keys().cloned());
    }
    if names.is_empty() {
        bail!("no columns found in JSON records");
    }

    let headers: Vec<String> = names.into_iter().collect();
    let cells = headers
        .iter()
        .map(|name| {
            records
                .iter()
                .map(|rec| rec.get(name).map_or(CellValue::Missing, json_to_cell))
                .collect()
        })
        .collect();

    build_dataset(headers, cells)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::String(s) => guess_cell_type(s),
        JsonValue::Null => CellValue::Missing,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet table. Integer and float columns become numeric
/// cells, everything else is read through its string form.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    if headers.is_empty() {
        bail!("parquet file has no columns");
    }
    let reader = builder.build().context("building parquet reader")?;

    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col_idx, column) in batch.columns().iter().enumerate() {
            let values = arrow_column_cells(column)
                .with_context(|| format!("column '{}'", headers[col_idx]))?;
            cells[col_idx].extend(values);
        }
    }

    if cells[0].is_empty() {
        bail!("parquet file has no rows");
    }
    build_dataset(headers, cells)
}

fn arrow_column_cells(col: &ArrayRef) -> Result<Vec<CellValue>> {
    let data_type = col.data_type();
    if data_type.is_integer() {
        let ints = cast(col, &DataType::Int64).context("casting to Int64")?;
        Ok(ints
            .as_primitive::<Int64Type>()
            .iter()
            .map(|v| v.map_or(CellValue::Missing, CellValue::Integer))
            .collect())
    } else if data_type.is_floating() {
        let floats = cast(col, &DataType::Float64).context("casting to Float64")?;
        Ok(floats
            .as_primitive::<Float64Type>()
            .iter()
            .map(|v| match v {
                Some(f) if f.is_finite() => CellValue::Float(f),
                _ => CellValue::Missing,
            })
            .collect())
    } else {
        let text = cast(col, &DataType::Utf8)
            .with_context(|| format!("unsupported column type {data_type:?}"))?;
        Ok(text
            .as_string::<i32>()
            .iter()
            .map(|v| v.map_or(CellValue::Missing, guess_cell_type))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ColumnKind;

    #[test]
    fn parses_every_separator() {
        for sep in Separator::ALL {
            let c = sep.as_char();
            let text = format!("x{c}y\n1{c}3\n2{c}5\n");
            let ds = load_delimited(text.as_bytes(), sep).unwrap();
            assert_eq!(ds.column_names(), vec!["x", "y"], "separator {sep:?}");
            assert_eq!(ds.len(), 2);
        }
    }

    #[test]
    fn separator_from_char() {
        assert_eq!(Separator::try_from('|').unwrap(), Separator::Pipe);
        assert!(Separator::try_from('#').is_err());
    }

    #[test]
    fn separator_from_command_line() {
        assert_eq!(";".parse::<Separator>().unwrap(), Separator::Semicolon);
        assert_eq!("TAB".parse::<Separator>().unwrap(), Separator::Tab);
        assert_eq!("\\t".parse::<Separator>().unwrap(), Separator::Tab);
        assert!(";;".parse::<Separator>().is_err());
        assert!("".parse::<Separator>().is_err());
    }

    #[test]
    fn infers_cell_types_and_missing_markers() {
        let text = "a;b;c\n1; 2.5 ;abc\nNA;;x\nnan;inf;y\n";
        let ds = load_delimited(text.as_bytes(), Separator::Semicolon).unwrap();
        let a = ds.column("a").unwrap();
        assert_eq!(a.values[0], CellValue::Integer(1));
        assert!(a.values[1].is_missing());
        assert!(a.values[2].is_missing());
        assert_eq!(a.kind(), ColumnKind::Numeric);

        let b = ds.column("b").unwrap();
        assert_eq!(b.values[0], CellValue::Float(2.5));
        assert!(b.values[2].is_missing());

        assert_eq!(ds.column("c").unwrap().kind(), ColumnKind::Text);
    }

    #[test]
    fn empty_and_header_only_sources_fail() {
        assert!(load_delimited("".as_bytes(), Separator::Comma).is_err());
        let err = load_delimited("x,y\n".as_bytes(), Separator::Comma).unwrap_err();
        assert!(format!("{err:#}").contains("no data rows"));
    }

    #[test]
    fn ragged_rows_fail() {
        let err = load_delimited("x,y\n1,2\n3\n".as_bytes(), Separator::Comma).unwrap_err();
        assert!(format!("{err:#}").contains("row 2"));
    }

    #[test]
    fn blank_and_duplicate_headers_are_renamed() {
        let ds = load_delimited(",a,a,a\n0,1,2,3\n".as_bytes(), Separator::Comma).unwrap();
        assert_eq!(ds.column_names(), vec!["Unnamed: 0", "a", "a.1", "a.2"]);
    }

    #[test]
    fn unsupported_extension_fails() {
        let err = load_file(Path::new("data.xlsx"), Separator::Comma).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }

    #[test]
    fn json_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, r#"[{"x": 1, "y": 2.5}, {"x": 2, "label": "b"}]"#).unwrap();

        let ds = load_file(&path, Separator::Comma).unwrap();
        assert_eq!(ds.column_names(), vec!["label", "x", "y"]);
        assert_eq!(ds.column("y").unwrap().values[1], CellValue::Missing);
        assert_eq!(ds.column("label").unwrap().kind(), ColumnKind::Text);
    }
}
