use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDateTime;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DataError {
    #[error("column '{column}' has {found} rows, expected {expected}")]
    RaggedColumns {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("column '{0}' not found")]
    MissingColumn(String),

    #[error("column '{column}' holds {kind} data, expected numeric")]
    NotNumeric { column: String, kind: ColumnKind },
}

// ---------------------------------------------------------------------------
// CellValue – a single cell, used for display
// ---------------------------------------------------------------------------

/// One cell of the table, borrowed out of its column for rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Date(NaiveDateTime),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Whole numbers render without a trailing ".0", like a dataframe preview.
            CellValue::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{v:.0}"),
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

// ---------------------------------------------------------------------------
// Column – a named, typed value sequence
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Text,
    Temporal,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Text => "text",
            ColumnKind::Temporal => "temporal",
        };
        f.write_str(s)
    }
}

/// Values of one column. `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
    Temporal(Vec<Option<NaiveDateTime>>),
}

impl ColumnData {
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Text(_) => ColumnKind::Text,
            ColumnData::Temporal(_) => ColumnKind::Temporal,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
            ColumnData::Temporal(v) => v.len(),
        }
    }

    pub fn cell(&self, row: usize) -> CellValue {
        match self {
            ColumnData::Numeric(v) => v
                .get(row)
                .copied()
                .flatten()
                .map_or(CellValue::Null, CellValue::Number),
            ColumnData::Text(v) => v
                .get(row)
                .cloned()
                .flatten()
                .map_or(CellValue::Null, CellValue::Text),
            ColumnData::Temporal(v) => v
                .get(row)
                .copied()
                .flatten()
                .map_or(CellValue::Null, CellValue::Date),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    /// Numeric column; NaN is stored as a missing value.
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        let values = values
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Column {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Column {
            name: name.into(),
            data: ColumnData::Text(values),
        }
    }

    pub fn temporal(name: impl Into<String>, values: Vec<Option<NaiveDateTime>>) -> Self {
        Column {
            name: name.into(),
            data: ColumnData::Temporal(values),
        }
    }

    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn as_numeric(&self) -> Result<&[Option<f64>], DataError> {
        match &self.data {
            ColumnData::Numeric(v) => Ok(v),
            other => Err(DataError::NotNumeric {
                column: self.name.clone(),
                kind: other.kind(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// An ordered set of equally long columns. Row order is taken as
/// chronological order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: usize,
}

impl Dataset {
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, DataError> {
        let rows = columns.first().map_or(0, Column::len);
        let mut seen = BTreeSet::new();
        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                return Err(DataError::DuplicateColumn(col.name.clone()));
            }
            if col.len() != rows {
                return Err(DataError::RaggedColumns {
                    column: col.name.clone(),
                    expected: rows,
                    found: col.len(),
                });
            }
        }
        Ok(Dataset { columns, rows })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Typed accessor: the named column's values, or an error when it is
    /// absent or not numeric.
    pub fn numeric(&self, name: &str) -> Result<&[Option<f64>], DataError> {
        self.column(name)
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))?
            .as_numeric()
    }

    /// Numeric columns in declared order.
    pub fn numeric_columns(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> {
        self.columns.iter().filter_map(|c| match &c.data {
            ColumnData::Numeric(v) => Some((c.name.as_str(), v.as_slice())),
            _ => None,
        })
    }

    /// Return a new dataset with the same-named column swapped for `column`.
    /// Columns of a different length or unknown name leave the dataset as is.
    pub fn with_column_replaced(mut self, column: Column) -> Self {
        if column.len() == self.rows {
            if let Some(slot) = self.columns.iter_mut().find(|c| c.name == column.name) {
                *slot = column;
            }
        }
        self
    }

    /// First rows of the table, for a preview.
    pub fn head(&self, n: usize) -> Vec<Vec<CellValue>> {
        (0..self.rows.min(n))
            .map(|row| self.columns.iter().map(|c| c.data.cell(row)).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_ragged_columns() {
        let err = Dataset::from_columns(vec![
            Column::numeric("revenue", vec![Some(1.0), Some(2.0)]),
            Column::numeric("cost", vec![Some(1.0)]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            DataError::RaggedColumns {
                column: "cost".into(),
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = Dataset::from_columns(vec![
            Column::numeric("revenue", vec![Some(1.0)]),
            Column::numeric("revenue", vec![Some(2.0)]),
        ])
        .unwrap_err();
        assert_eq!(err, DataError::DuplicateColumn("revenue".into()));
    }

    #[test]
    fn numeric_accessor_fails_explicitly_on_text() {
        let ds = Dataset::from_columns(vec![Column::text(
            "conversion",
            vec![Some("5%".into())],
        )])
        .unwrap();
        assert!(matches!(
            ds.numeric("conversion"),
            Err(DataError::NotNumeric { kind: ColumnKind::Text, .. })
        ));
        assert_eq!(
            ds.numeric("traffic"),
            Err(DataError::MissingColumn("traffic".into()))
        );
    }

    #[test]
    fn nan_is_stored_as_missing() {
        let col = Column::numeric("x", vec![Some(f64::NAN), Some(1.0)]);
        assert_eq!(col.as_numeric().unwrap(), &[None, Some(1.0)]);
    }

    #[test]
    fn head_renders_cells_in_column_order() {
        let ds = Dataset::from_columns(vec![
            Column::text("month", vec![Some("Jan".into()), None, Some("Mar".into())]),
            Column::numeric("sales", vec![Some(10.0), Some(12.5), None]),
        ])
        .unwrap();
        let head = ds.head(2);
        assert_eq!(head.len(), 2);
        assert_eq!(head[0][0].to_string(), "Jan");
        assert_eq!(head[0][1].to_string(), "10");
        assert_eq!(head[1][0], CellValue::Null);
        assert_eq!(head[1][1].to_string(), "12.5");
    }

    #[test]
    fn numeric_columns_skip_other_kinds() {
        let ds = Dataset::from_columns(vec![
            Column::text("region", vec![Some("EU".into())]),
            Column::numeric("profit", vec![Some(3.0)]),
        ])
        .unwrap();
        let names: Vec<&str> = ds.numeric_columns().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["profit"]);
    }
}
