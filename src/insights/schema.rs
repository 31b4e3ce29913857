use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::data::model::{Column, ColumnData, Dataset};

// ---------------------------------------------------------------------------
// Temporal column detection
// ---------------------------------------------------------------------------

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// A column that coerced to timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct TemporalColumn {
    pub name: String,
    pub values: Vec<Option<NaiveDateTime>>,
}

/// Parse one cell as a timestamp. Month-only values (`2024-03`) map to the
/// first day of the month.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Try to read a column as timestamps. Numeric columns never qualify; a text
/// column qualifies when it has at least one value and every value parses.
fn coerce(column: &Column) -> Option<TemporalColumn> {
    let values = match &column.data {
        ColumnData::Temporal(v) => v.clone(),
        ColumnData::Numeric(_) => return None,
        ColumnData::Text(cells) => {
            if cells.iter().all(Option::is_none) {
                return None;
            }
            cells
                .iter()
                .map(|cell| match cell {
                    Some(raw) => parse_timestamp(raw).map(Some),
                    None => Some(None),
                })
                .collect::<Option<Vec<_>>>()?
        }
    };
    Some(TemporalColumn {
        name: column.name.clone(),
        values,
    })
}

/// First column, in declared order, that reads as timestamps.
pub fn probe_temporal(dataset: &Dataset) -> Option<TemporalColumn> {
    dataset.columns().iter().find_map(coerce)
}

/// Detect the temporal column and return a dataset where that column holds
/// timestamps, together with its name.
pub fn upgrade_temporal(dataset: Dataset) -> (Dataset, Option<String>) {
    match probe_temporal(&dataset) {
        Some(found) => {
            log::debug!("Temporal column detected: {}", found.name);
            let name = found.name.clone();
            let upgraded = dataset.with_column_replaced(Column::temporal(found.name, found.values));
            (upgraded, Some(name))
        }
        None => {
            log::debug!("No temporal column detected");
            (dataset, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ColumnKind;

    fn text(name: &str, values: &[&str]) -> Column {
        Column::text(name, values.iter().map(|v| Some(v.to_string())).collect())
    }

    #[test]
    fn parses_common_date_shapes() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        for raw in ["2024-03-01", "2024/03/01", "03/01/2024", "01.03.2024", "2024-03", "2024-03-01T00:00:00", "2024-03-01T00:00:00Z"] {
            assert_eq!(parse_timestamp(raw), Some(expected), "{raw}");
        }
        assert_eq!(parse_timestamp("north"), None);
    }

    #[test]
    fn parses_fractional_seconds() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_milli_opt(0, 0, 0, 500)
            .unwrap();
        for raw in ["2024-01-01T00:00:00.500", "2024-01-01 00:00:00.5"] {
            assert_eq!(parse_timestamp(raw), Some(expected), "{raw}");
        }
    }

    #[test]
    fn first_coercible_column_wins_and_is_upgraded() {
        let ds = Dataset::from_columns(vec![
            text("region", &["EU", "US"]),
            Column::numeric("revenue", vec![Some(20240101.0), Some(20240201.0)]),
            text("month", &["2024-01", "2024-02"]),
            text("closed", &["2024-01-31", "2024-02-29"]),
        ])
        .unwrap();

        let (upgraded, name) = upgrade_temporal(ds);
        assert_eq!(name.as_deref(), Some("month"));
        assert_eq!(upgraded.column("month").unwrap().kind(), ColumnKind::Temporal);
        assert_eq!(upgraded.column("closed").unwrap().kind(), ColumnKind::Text);
        assert_eq!(upgraded.column("revenue").unwrap().kind(), ColumnKind::Numeric);
    }

    #[test]
    fn one_bad_cell_disqualifies_a_column() {
        let ds = Dataset::from_columns(vec![text("when", &["2024-01-01", "soon"])]).unwrap();
        assert_eq!(probe_temporal(&ds), None);
    }

    #[test]
    fn missing_cells_are_kept() {
        let ds = Dataset::from_columns(vec![Column::text(
            "date",
            vec![Some("2024-01-01".into()), None],
        )])
        .unwrap();
        let found = probe_temporal(&ds).unwrap();
        assert_eq!(found.values.len(), 2);
        assert!(found.values[1].is_none());
    }

    #[test]
    fn no_date_column_leaves_dataset_untouched() {
        let ds = Dataset::from_columns(vec![text("notes", &["fine", "great"])]).unwrap();
        let (same, name) = upgrade_temporal(ds.clone());
        assert_eq!(name, None);
        assert_eq!(same, ds);
    }
}
