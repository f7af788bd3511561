//! Dataset adapter: raw tabular input → validated [`Dataset`].
//!
//! The adapter is the only place that knows about column names and cell
//! text. Everything downstream works on typed observations.

mod csv_source;

use abn_common::{Dataset, Error, Observation, Result};
use abn_config::ColumnNames;
use tracing::debug;

/// Untyped table: a header row plus string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Build from string slices, mostly for tests and embedding callers.
    pub fn from_rows(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    /// Position of a header, ignoring surrounding whitespace. First match wins.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.headers.iter().position(|h| h.trim() == name)
    }
}

/// Which input columns hold the id, group and outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub id: String,
    pub group: String,
    pub converted: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            id: "user_id".to_string(),
            group: "group".to_string(),
            converted: "converted".to_string(),
        }
    }
}

impl From<&ColumnNames> for ColumnMapping {
    fn from(names: &ColumnNames) -> Self {
        Self {
            id: names.id.clone(),
            group: names.group.clone(),
            converted: names.converted.clone(),
        }
    }
}

/// Validate and normalize a raw table into a [`Dataset`].
///
/// Errors:
/// - `MissingColumns` listing every absent column
/// - `RaggedRow` when a row's cell count differs from the header
/// - `NonBinaryOutcome` when a `converted` cell does not coerce to a boolean
/// - `EmptyGroupLabel` / `EmptyDataset` from dataset construction
///
/// Row numbers are 1-based and count data rows only.
pub fn normalize(table: &RawTable, columns: &ColumnMapping) -> Result<Dataset> {
    let id_idx = table.column_index(&columns.id);
    let group_idx = table.column_index(&columns.group);
    let converted_idx = table.column_index(&columns.converted);

    let (id_idx, group_idx, converted_idx) = match (id_idx, group_idx, converted_idx) {
        (Some(i), Some(g), Some(c)) => (i, g, c),
        _ => {
            let missing = [
                (id_idx, &columns.id),
                (group_idx, &columns.group),
                (converted_idx, &columns.converted),
            ]
            .into_iter()
            .filter(|(idx, _)| idx.is_none())
            .map(|(_, name)| name.clone())
            .collect();
            return Err(Error::MissingColumns {
                missing,
                available: table.headers.clone(),
            });
        }
    };

    let expected = table.headers.len();
    let mut observations = Vec::with_capacity(table.rows.len());
    for (idx, row) in table.rows.iter().enumerate() {
        let row_number = idx + 1;
        if row.len() != expected {
            return Err(Error::RaggedRow {
                row: row_number,
                expected,
                found: row.len(),
            });
        }

        let raw = &row[converted_idx];
        let converted = coerce_converted(raw).ok_or_else(|| Error::NonBinaryOutcome {
            row: row_number,
            value: raw.clone(),
        })?;

        observations.push(Observation::new(
            row[id_idx].clone(),
            row[group_idx].clone(),
            converted,
        ));
    }

    let dataset = Dataset::new(observations)?;
    debug!(
        rows = dataset.len(),
        groups = dataset.groups().len(),
        "dataset normalized"
    );
    Ok(dataset)
}

/// Permissive boolean coercion for the outcome column.
///
/// Accepts (case-insensitive, trimmed) `1/true/t/yes/y` and `0/false/f/no/n`,
/// plus numeric text equal to exactly 1 or 0 (`"1.0"`, `"0e0"`).
pub fn coerce_converted(value: &str) -> Option<bool> {
    let v = value.trim().to_ascii_lowercase();
    match v.as_str() {
        "1" | "true" | "t" | "yes" | "y" => Some(true),
        "0" | "false" | "f" | "no" | "n" => Some(false),
        "" => None,
        other => match other.parse::<f64>() {
            Ok(x) if x == 1.0 => Some(true),
            Ok(x) if x == 0.0 => Some(false),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> RawTable {
        RawTable::from_rows(&["user_id", "group", "converted"], rows)
    }

    #[test]
    fn normalizes_valid_table() {
        let ds = normalize(
            &table(&[&["u1", "A", "1"], &["u2", "B", "0"], &["u3", "A", "true"]]),
            &ColumnMapping::default(),
        )
        .unwrap();
        assert_eq!(ds.len(), 3);
        let counts = ds.group_counts();
        assert_eq!((counts[0].trials, counts[0].successes), (2, 2));
        assert_eq!((counts[1].trials, counts[1].successes), (1, 0));
    }

    #[test]
    fn reports_all_missing_columns() {
        let raw = RawTable::from_rows(&["user_id", "arm"], &[&["u1", "A"]]);
        let err = normalize(&raw, &ColumnMapping::default()).unwrap_err();
        match err {
            Error::MissingColumns { missing, available } => {
                assert_eq!(missing, vec!["group", "converted"]);
                assert_eq!(available, vec!["user_id", "arm"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn header_whitespace_is_ignored() {
        let raw = RawTable::from_rows(&[" user_id", "group ", " converted "], &[&["u1", "A", "1"]]);
        assert!(normalize(&raw, &ColumnMapping::default()).is_ok());
    }

    #[test]
    fn custom_column_names() {
        let raw = RawTable::from_rows(
            &["visitor", "variant", "bought"],
            &[&["v1", "control", "no"], &["v2", "treatment", "yes"]],
        );
        let mapping = ColumnMapping {
            id: "visitor".into(),
            group: "variant".into(),
            converted: "bought".into(),
        };
        let ds = normalize(&raw, &mapping).unwrap();
        assert_eq!(ds.groups().len(), 2);
    }

    #[test]
    fn non_binary_outcome_names_row_and_value() {
        let err = normalize(
            &table(&[&["u1", "A", "1"], &["u2", "A", "2"]]),
            &ColumnMapping::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::NonBinaryOutcome { row: 2, ref value } if value == "2"));
        assert!(err.is_validation_error());
    }

    #[test]
    fn empty_outcome_cell_is_rejected() {
        let err = normalize(&table(&[&["u1", "A", ""]]), &ColumnMapping::default()).unwrap_err();
        assert!(matches!(err, Error::NonBinaryOutcome { row: 1, .. }));
    }

    #[test]
    fn short_row_is_schema_error() {
        let err = normalize(
            &table(&[&["u1", "A", "1"], &["u2", "B"]]),
            &ColumnMapping::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::RaggedRow {
                row: 2,
                expected: 3,
                found: 2
            }
        ));
        assert!(err.is_schema_error());
    }

    #[test]
    fn header_only_table_is_empty_dataset() {
        let err = normalize(&table(&[]), &ColumnMapping::default()).unwrap_err();
        assert!(matches!(err, Error::EmptyDataset));
    }

    #[test]
    fn coercion_table() {
        for v in ["1", "true", "TRUE", " t ", "Yes", "y", "1.0", "1e0"] {
            assert_eq!(coerce_converted(v), Some(true), "{v:?}");
        }
        for v in ["0", "false", "F", "no", "N", "0.0", "-0", " 0 "] {
            assert_eq!(coerce_converted(v), Some(false), "{v:?}");
        }
        for v in ["", "2", "0.5", "maybe", "nan", "-1", "inf"] {
            assert_eq!(coerce_converted(v), None, "{v:?}");
        }
    }
}
