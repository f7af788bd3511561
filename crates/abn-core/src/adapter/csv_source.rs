//! CSV input for [`RawTable`].

use std::io::Read;
use std::path::Path;

use abn_common::Result;
use tracing::debug;

use super::RawTable;

impl RawTable {
    /// Read a headed, comma-separated table.
    ///
    /// Rows of differing width are read as-is; `normalize` rejects them with
    /// a row number instead of surfacing a bare CSV error.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(String::from).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Read a CSV file from disk.
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let table = Self::from_csv_reader(std::io::BufReader::new(file))?;
        debug!(
            path = %path.display(),
            columns = table.headers.len(),
            rows = table.rows.len(),
            "csv loaded"
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_headers_and_rows() {
        let data = "user_id,group,converted\nu1,A,1\nu2,B,0\n";
        let table = RawTable::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(table.headers, vec!["user_id", "group", "converted"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1], vec!["u2", "B", "0"]);
    }

    #[test]
    fn quoted_labels_keep_commas() {
        let data = "user_id,group,converted\nu1,\"A, red button\",1\n";
        let table = RawTable::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(table.rows[0][1], "A, red button");
    }

    #[test]
    fn short_rows_are_preserved() {
        let data = "user_id,group,converted\nu1,A\n";
        let table = RawTable::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(table.rows[0].len(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = RawTable::from_csv_path(Path::new("/nonexistent/abn/data.csv")).unwrap_err();
        assert!(matches!(err, abn_common::Error::Io(_)));
    }
}
