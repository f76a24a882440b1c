use serde_json::{Map, Value};
use thiserror::Error;

use crate::record::model::RawValue;

/// Failure to turn uploaded bytes into rows.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("error reading CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("file has no header row")]
    NoHeader,
    #[error("row {row} is not a JSON object")]
    NotAnObject { row: usize },
}

/// Header row plus data rows, cells aligned with headers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<RawValue>>>,
}

impl RawTable {
    /// Tokenize CSV bytes. The first record is the header row; blank lines are
    /// skipped and ragged rows are kept as-is.
    pub fn from_csv(bytes: &[u8]) -> Result<Self, TableError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut records = reader.records();
        let headers: Vec<String> = match records.next() {
            Some(header) => header?.iter().map(str::to_string).collect(),
            None => return Err(TableError::NoHeader),
        };

        let mut rows = Vec::new();
        for record in records {
            let record = record?;
            rows.push(
                record
                    .iter()
                    .map(|cell| Some(RawValue::Text(cell.to_string())))
                    .collect(),
            );
        }

        Ok(Self { headers, rows })
    }

    /// Build a table from JSON objects. Headers are the union of keys in order
    /// of first appearance; `null` cells count as absent.
    pub fn from_json_rows(objects: &[Value]) -> Result<Self, TableError> {
        let mut headers: Vec<String> = Vec::new();
        let mut maps: Vec<&Map<String, Value>> = Vec::with_capacity(objects.len());

        for (row, object) in objects.iter().enumerate() {
            let map = object
                .as_object()
                .ok_or(TableError::NotAnObject { row: row + 1 })?;
            for key in map.keys() {
                if !headers.iter().any(|h| h == key) {
                    headers.push(key.clone());
                }
            }
            maps.push(map);
        }

        let rows = maps
            .into_iter()
            .map(|map| {
                headers
                    .iter()
                    .map(|h| map.get(h).and_then(json_cell))
                    .collect()
            })
            .collect();

        Ok(Self { headers, rows })
    }
}

fn json_cell(value: &Value) -> Option<RawValue> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(RawValue::Text(s.clone())),
        Value::Number(n) => Some(RawValue::Number(n.clone())),
        Value::Bool(b) => Some(RawValue::Text(b.to_string())),
        other => Some(RawValue::Text(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn csv_with_quotes_and_blank_lines() {
        let csv = "Network,Message\ntwitter,\"hello, world\"\n\nlinkedin,\"multi\nline\"\n";
        let table = RawTable::from_csv(csv.as_bytes()).unwrap();
        assert_eq!(table.headers, vec!["Network", "Message"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][1], Some(RawValue::from("hello, world")));
        assert_eq!(table.rows[1][1], Some(RawValue::from("multi\nline")));
    }

    #[test]
    fn csv_ragged_rows_kept() {
        let table = RawTable::from_csv(b"a,b,c\n1,2\n").unwrap();
        assert_eq!(table.rows[0].len(), 2);
    }

    #[test]
    fn empty_csv_has_no_header() {
        assert!(matches!(RawTable::from_csv(b""), Err(TableError::NoHeader)));
    }

    #[test]
    fn csv_invalid_utf8_is_an_error() {
        assert!(matches!(
            RawTable::from_csv(b"Network\n\xff\xfe\n"),
            Err(TableError::Csv(_))
        ));
    }

    #[test]
    fn json_rows_union_keys() {
        let rows = vec![
            json!({"Network": "twitter", "Followers": 10}),
            json!({"Network": "x", "Date": null, "Message": "hi"}),
        ];
        let table = RawTable::from_json_rows(&rows).unwrap();
        assert_eq!(table.headers.len(), 4);
        let date_col = table.headers.iter().position(|h| h == "Date").unwrap();
        assert_eq!(table.rows[1][date_col], None);
        let followers_col = table.headers.iter().position(|h| h == "Followers").unwrap();
        assert!(matches!(table.rows[0][followers_col], Some(RawValue::Number(_))));
    }

    #[test]
    fn json_rejects_non_objects() {
        let rows = vec![json!({"Network": "x"}), json!([1, 2])];
        assert!(matches!(
            RawTable::from_json_rows(&rows),
            Err(TableError::NotAnObject { row: 2 })
        ));
    }
}
