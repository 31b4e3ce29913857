use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::AsArray;
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use calamine::{Data, Range, Reader, open_workbook_auto};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::ChunkReader;
use serde_json::{Map, Value as JsonValue};

use super::model::{Column, Dataset};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a tabular dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one column per metric
/// * `.json`    – records (`[{ "month": ..., "revenue": ... }, ...]`) or
///                columns (`{ "revenue": [...], ... }`)
/// * `.xlsx`    – first worksheet, header in the first row
/// * `.parquet` – flat columns of numbers, strings, booleans or dates
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => {
            let file = std::fs::File::open(path).context("opening parquet file")?;
            read_parquet(file)
        }
        "xlsx" | "xls" | "ods" => load_spreadsheet(path),
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            parse_json(&text)
        }
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            read_csv(file)
        }
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Cell markers treated as missing values.
const MISSING_MARKERS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

fn is_missing(s: &str) -> bool {
    MISSING_MARKERS.contains(&s.trim())
}

/// Rename repeated headers to `name.1`, `name.2`, ... so the load does not
/// fail on a sheet that reuses a column title.
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    headers
        .into_iter()
        .map(|name| {
            let mut candidate = name.clone();
            let mut n = 0;
            while seen.contains(&candidate) {
                n += 1;
                candidate = format!("{name}.{n}");
            }
            seen.insert(candidate.clone());
            candidate
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Type inference shared by the text and spreadsheet loaders
// ---------------------------------------------------------------------------

/// A raw cell before its column's type is decided.
enum RawCell {
    Number(f64),
    Text(String),
    Missing,
}

/// A column is numeric when every non-missing cell is a number; otherwise
/// every cell is kept as text.
fn infer_column(name: &str, cells: Vec<RawCell>) -> Column {
    let all_numeric = cells
        .iter()
        .all(|c| matches!(c, RawCell::Number(_) | RawCell::Missing));

    if all_numeric {
        let values = cells
            .into_iter()
            .map(|c| match c {
                RawCell::Number(v) => Some(v),
                _ => None,
            })
            .collect();
        Column::numeric(name, values)
    } else {
        let values = cells
            .into_iter()
            .map(|c| match c {
                RawCell::Number(v) => Some(v.to_string()),
                RawCell::Text(s) => Some(s),
                RawCell::Missing => None,
            })
            .collect();
        Column::text(name, values)
    }
}

fn guess_cell(s: &str) -> RawCell {
    if is_missing(s) {
        return RawCell::Missing;
    }
    match s.trim().parse::<f64>() {
        Ok(v) => RawCell::Number(v),
        Err(_) => RawCell::Text(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one row per period.
pub fn read_csv<R: Read>(input: R) -> Result<Dataset> {
    let mut reader = csv::Reader::from_reader(input);
    let headers = dedupe_headers(
        reader
            .headers()
            .context("reading CSV headers")?
            .iter()
            .map(|h| h.trim().to_string())
            .collect(),
    );

    let mut cells: Vec<Vec<RawCell>> = headers.iter().map(|_| Vec::new()).collect();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() != headers.len() {
            bail!(
                "CSV row {row_no}: expected {} fields, found {}",
                headers.len(),
                record.len()
            );
        }
        for (col_idx, value) in record.iter().enumerate() {
            cells[col_idx].push(guess_cell(value));
        }
    }

    let columns = headers
        .iter()
        .zip(cells)
        .map(|(name, col)| infer_column(name, col))
        .collect();
    Dataset::from_columns(columns).context("building dataset from CSV")
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Accepts the two layouts a dataframe usually serialises to:
///
/// ```json
/// [ { "month": "2024-01", "revenue": 100 }, { "month": "2024-02", "revenue": 80 } ]
/// ```
///
/// ```json
/// { "month": ["2024-01", "2024-02"], "revenue": { "0": 100, "1": 80 } }
/// ```
pub fn parse_json(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    match root {
        JsonValue::Array(records) => json_records(&records),
        JsonValue::Object(columns) => json_columns(&columns),
        _ => bail!("Expected a JSON array of records or an object of columns"),
    }
}

fn json_records(records: &[JsonValue]) -> Result<Dataset> {
    // Column order follows first appearance across records.
    let mut names: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }

    let columns = names
        .iter()
        .map(|name| {
            let cells = records
                .iter()
                .map(|rec| rec.get(name).map_or(RawCell::Missing, json_to_cell))
                .collect();
            infer_column(name, cells)
        })
        .collect();
    Dataset::from_columns(columns).context("building dataset from JSON records")
}

fn json_columns(columns: &Map<String, JsonValue>) -> Result<Dataset> {
    let columns = columns
        .iter()
        .map(|(name, values)| {
            let cells: Vec<RawCell> = match values {
                JsonValue::Array(arr) => arr.iter().map(json_to_cell).collect(),
                JsonValue::Object(by_index) => by_index.values().map(json_to_cell).collect(),
                _ => bail!("Column '{name}' is neither an array nor an index object"),
            };
            Ok(infer_column(name, cells))
        })
        .collect::<Result<Vec<_>>>()?;
    Dataset::from_columns(columns).context("building dataset from JSON columns")
}

fn json_to_cell(val: &JsonValue) -> RawCell {
    match val {
        JsonValue::Number(n) => n.as_f64().map_or(RawCell::Missing, RawCell::Number),
        JsonValue::String(s) => guess_cell(s),
        JsonValue::Null => RawCell::Missing,
        JsonValue::Bool(b) => RawCell::Text(b.to_string()),
        other => RawCell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

fn load_spreadsheet(path: &Path) -> Result<Dataset> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("opening workbook {}", path.display()))?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .context("reading first worksheet")?;
    sheet_to_dataset(&range)
}

/// First row is the header; every following row is one period.
fn sheet_to_dataset(range: &Range<Data>) -> Result<Dataset> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Dataset::from_columns(Vec::new()).context("building dataset from worksheet");
    };
    let headers = dedupe_headers(
        header
            .iter()
            .enumerate()
            .map(|(i, cell)| match cell {
                Data::Empty => format!("Unnamed: {i}"),
                other => other.to_string().trim().to_string(),
            })
            .collect(),
    );

    let mut cells: Vec<Vec<RawCell>> = headers.iter().map(|_| Vec::new()).collect();
    for row in rows {
        for (col_idx, cell) in row.iter().enumerate() {
            cells[col_idx].push(sheet_cell(cell));
        }
    }

    let columns = headers
        .iter()
        .zip(cells)
        .map(|(name, col)| infer_column(name, col))
        .collect();
    Dataset::from_columns(columns).context("building dataset from worksheet")
}

fn sheet_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Float(f) => RawCell::Number(*f),
        Data::String(s) => guess_cell(s),
        Data::Bool(b) => RawCell::Text(b.to_string()),
        // Excel dates render as ISO text so date detection can pick them up.
        Data::DateTime(dt) => dt.as_datetime().map_or(RawCell::Missing, |d| {
            RawCell::Text(d.format("%Y-%m-%d %H:%M:%S").to_string())
        }),
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::Text(s.clone()),
        Data::Error(_) | Data::Empty => RawCell::Missing,
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Read Parquet data with flat columns from a file or an in-memory buffer.
///
/// Integer and float columns become numeric; strings, booleans and
/// date/timestamp columns become text (dates render as ISO strings and are
/// picked up later by date detection).
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn read_parquet<T: ChunkReader + 'static>(input: T) -> Result<Dataset> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(input)
        .context("reading parquet metadata")?;
    let fields: Vec<(String, DataType)> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| (f.name().clone(), f.data_type().clone()))
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut numeric: Vec<Vec<Option<f64>>> = fields.iter().map(|_| Vec::new()).collect();
    let mut text: Vec<Vec<Option<String>>> = fields.iter().map(|_| Vec::new()).collect();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (idx, (name, data_type)) in fields.iter().enumerate() {
            let col = batch.column(idx);
            if is_numeric_type(data_type) {
                let floats = cast(col, &DataType::Float64)
                    .with_context(|| format!("casting '{name}' to float"))?;
                let floats = floats.as_primitive::<Float64Type>();
                numeric[idx].extend(floats.iter());
            } else {
                let strings = cast(col, &DataType::Utf8)
                    .with_context(|| format!("column '{name}' has unsupported type {data_type:?}"))?;
                let strings = strings.as_string::<i32>();
                text[idx].extend(strings.iter().map(|s| s.map(str::to_string)));
            }
        }
    }

    let columns = fields
        .iter()
        .zip(numeric.into_iter().zip(text))
        .map(|((name, data_type), (nums, strs))| {
            if is_numeric_type(data_type) {
                Column::numeric(name.as_str(), nums)
            } else {
                Column::text(name.as_str(), strs)
            }
        })
        .collect();
    Dataset::from_columns(columns).context("building dataset from parquet")
}

fn is_numeric_type(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float16
            | DataType::Float32
            | DataType::Float64
            | DataType::Decimal128(_, _)
            | DataType::Decimal256(_, _)
    )
}
