use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// One entry of the reference database, one per input PDF.
///
/// `path` and `title` are always present; `isbn` and `doi` only when the
/// corresponding resolution path produced them. Everything an external
/// metadata source returns beyond the well-known fields lands verbatim in
/// `extra`, which serde flattens so the JSON stays a flat object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Record {
    pub path: String,
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    pub fn new(path: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Merge one enrichment field into the record.
    ///
    /// Well-known keys are routed to the typed fields so the flattened
    /// `extra` map can never shadow them in the serialized output; `path`
    /// is the record's identity and is never overwritten by enrichment.
    pub fn merge_field(&mut self, key: &str, value: Value) {
        match key {
            "path" => {}
            "title" => self.title = plain_string(value),
            "isbn" => self.isbn = Some(plain_string(value)),
            "doi" => self.doi = Some(plain_string(value)),
            _ => {
                self.extra.insert(key.to_string(), value);
            }
        }
    }

    /// Look up a field by its serialized name, typed fields included.
    pub fn field(&self, name: &str) -> Option<Value> {
        match name {
            "path" => Some(Value::String(self.path.clone())),
            "title" => Some(Value::String(self.title.clone())),
            "isbn" => self.isbn.clone().map(Value::String),
            "doi" => self.doi.clone().map(Value::String),
            _ => self.extra.get(name).cloned(),
        }
    }
}

fn plain_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// An ordered collection of records, serialized as a plain JSON array.
///
/// Order follows the sorted file-path traversal order of the collector run
/// that produced it. The JSON form is the interop contract: any database
/// written by one implementation must load in another.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct Database {
    pub records: Vec<Record>,
}

impl Database {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_routes_well_known_fields() {
        let mut record = Record::new("a.pdf", "a.pdf");
        record.merge_field("title", json!("Deep Learning"));
        record.merge_field("author", json!("Goodfellow, Ian"));
        record.merge_field("year", json!(2016));
        record.merge_field("path", json!("elsewhere.pdf"));

        assert_eq!(record.title, "Deep Learning");
        assert_eq!(record.path, "a.pdf");
        assert_eq!(record.extra["author"], json!("Goodfellow, Ian"));
        assert_eq!(record.extra["year"], json!(2016));
        assert!(!record.extra.contains_key("title"));
    }

    #[test]
    fn extra_fields_serialize_flat() {
        let mut record = Record::new("b/b.pdf", "B");
        record.merge_field("journal", json!("Nature"));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["path"], json!("b/b.pdf"));
        assert_eq!(value["journal"], json!("Nature"));
        assert!(value.get("extra").is_none());
        assert!(value.get("isbn").is_none());
    }

    #[test]
    fn database_is_a_json_array() {
        let db = Database::new(vec![Record::new("a.pdf", "A"), Record::new("b.pdf", "B")]);
        let json = db.to_json_pretty().unwrap();
        assert!(json.trim_start().starts_with('['));

        let back: Database = serde_json::from_str(&json).unwrap();
        assert_eq!(back, db);
    }

    #[test]
    fn loads_foreign_database_with_unknown_fields() {
        let raw = r#"[
            {"path": "a.pdf", "title": "A"},
            {"path": "b/b.pdf", "title": "B", "author": "X, Y", "year": 2020, "journal": "J"}
        ]"#;
        let db: Database = serde_json::from_str(raw).unwrap();
        assert_eq!(db.len(), 2);
        assert_eq!(db.records[1].extra["year"], serde_json::json!(2020));
        assert_eq!(db.records[1].field("journal"), Some(serde_json::json!("J")));
        assert_eq!(db.records[0].field("author"), None);
    }

    #[test]
    fn load_from_disk_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("db.json");

        let mut record = Record::new("a.pdf", "A");
        record.isbn = Some("9780306406157".to_string());
        let db = Database::new(vec![record]);
        std::fs::write(&path, db.to_json_pretty().unwrap()).unwrap();

        let loaded = Database::load(&path).unwrap();
        assert_eq!(loaded, db);
    }
}
