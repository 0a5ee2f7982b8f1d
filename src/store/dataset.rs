//! Dataset loading from CSV.
//!
//! The first row is a header. Column 0 holds the record key, which must be
//! an integer; the remaining header cells name the record's fields.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::store::{Record, RecordStore};

/// Errors that can occur while loading the dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The dataset file could not be opened.
    #[error("failed to open dataset {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV could not be parsed.
    #[error("malformed dataset: {0}")]
    Csv(#[from] csv::Error),

    /// The file has no header row.
    #[error("dataset has no header row")]
    MissingHeader,

    /// A row's key column is not an integer.
    #[error("invalid key {key:?} on line {line}")]
    InvalidKey { key: String, line: u64 },
}

/// Load the dataset at `path` into a fresh store.
pub fn load_dataset(path: &Path) -> Result<RecordStore, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let store = load_from_reader(file)?;

    tracing::info!(
        path = %path.display(),
        records = store.len(),
        last_key = ?store.last_key(),
        "Dataset loaded"
    );
    Ok(store)
}

/// Load CSV data from any reader into a fresh store.
pub fn load_from_reader<R: Read>(reader: R) -> Result<RecordStore, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(DatasetError::MissingHeader);
    }

    let store = RecordStore::new();
    for row in reader.records() {
        let row = row?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();

        let key = row.get(0).unwrap_or_default().trim();
        if key.parse::<i64>().is_err() {
            return Err(DatasetError::InvalidKey {
                key: key.to_string(),
                line,
            });
        }

        if store.contains(key) {
            tracing::warn!(key, line, "Duplicate key in dataset, keeping last row");
        }

        let record = Record::from_row(headers.iter().skip(1), row.iter().skip(1));
        store.put(key, record);
    }

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;
    use serde_json::json;

    const VEHICLES: &str = "\
id,make,model,year
1,Ford,Focus,2012
2,Toyota,Corolla,2018
3,Honda,Civic,2020
";

    #[test]
    fn test_load_rows() {
        let store = load_from_reader(VEHICLES.as_bytes()).unwrap();

        assert_eq!(store.list(), vec!["1", "2", "3"]);
        assert_eq!(
            store.get("2"),
            Some(Record::Json(json!({"make": "Toyota", "model": "Corolla", "year": "2018"})))
        );
        assert_eq!(store.last_key(), Some(3));
        assert_eq!(store.next_key().unwrap(), "4");
    }

    #[test]
    fn test_ragged_rows() {
        let data = "id,make,model\n1,Ford\n2,Kia,Rio,extra\n";
        let store = load_from_reader(data.as_bytes()).unwrap();

        assert_eq!(store.get("1"), Some(Record::Json(json!({"make": "Ford"}))));
        assert_eq!(
            store.get("2"),
            Some(Record::Json(json!({"make": "Kia", "model": "Rio"})))
        );
    }

    #[test]
    fn test_header_only() {
        let store = load_from_reader("id,make\n".as_bytes()).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.next_key().unwrap(), "0");
    }

    #[test]
    fn test_max_key_loads_but_exhausts_counter() {
        let data = "id,make\n9223372036854775807,Ford\n1,Kia\n";
        let store = load_from_reader(data.as_bytes()).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.last_key(), Some(i64::MAX));
        assert!(matches!(
            store.next_key(),
            Err(StoreError::KeysExhausted { last: i64::MAX })
        ));
    }

    #[test]
    fn test_empty_file() {
        let err = load_from_reader("".as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::MissingHeader));
    }

    #[test]
    fn test_invalid_key() {
        let err = load_from_reader("id,make\n1,Ford\nx,Kia\n".as_bytes()).unwrap_err();
        match err {
            DatasetError::InvalidKey { key, line } => {
                assert_eq!(key, "x");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let store = load_from_reader("id,make\n1,Ford\n1,Kia\n".as_bytes()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("1"), Some(Record::Json(json!({"make": "Kia"}))));
    }

    #[test]
    fn test_missing_file() {
        let err = load_dataset(Path::new("/nonexistent/Vehicles.csv")).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
        assert!(err.to_string().contains("Vehicles.csv"));
    }
}
