//! Stored record representation.

use serde_json::{Map, Value};

/// One stored item.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// Structured JSON, including rows seeded from the dataset.
    Json(Value),
    /// Opaque text uploaded with a non-JSON content type.
    Text(String),
}

impl Record {
    /// Build a record from a dataset row.
    ///
    /// Fields pair up positionally; surplus headers or cells are dropped.
    pub fn from_row<'a, H, C>(headers: H, cells: C) -> Self
    where
        H: IntoIterator<Item = &'a str>,
        C: IntoIterator<Item = &'a str>,
    {
        let fields: Map<String, Value> = headers
            .into_iter()
            .zip(cells)
            .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
            .collect();
        Record::Json(Value::Object(fields))
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Record::Json(value)
    }
}

impl From<String> for Record {
    fn from(text: String) -> Self {
        Record::Text(text)
    }
}
