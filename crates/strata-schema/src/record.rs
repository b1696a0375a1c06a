//! Flat entries and canonical records.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::schema::Schema;

/// A flat entry as emitted by the flattener: index names and flat field
/// paths mapped to values, in emission order.
pub type Entry = Map<String, Value>;

/// The canonical projected record shape.
///
/// `indexes` holds only primary-root index values; everything else lives in
/// `fields`. SQL results additionally carry `_all_fields`, the unrestricted
/// field map, which the unflattener uses to recover joined-root indexes
/// after projection narrowed `fields`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Root name of the primary schema.
    pub root: String,
    /// Primary-root index values keyed by index name.
    pub indexes: Map<String, Value>,
    /// Field values keyed by flat path (joined records also carry
    /// `<other-root>.<flat-path>` and `<other-root>.indexes.<idx>` keys).
    pub fields: Map<String, Value>,
    /// Unrestricted post-projection field map, present on SQL results.
    #[serde(rename = "_all_fields", skip_serializing_if = "Option::is_none")]
    pub all_fields: Option<Map<String, Value>>,
}

impl Record {
    /// Projects a flat entry into the canonical shape against a schema.
    ///
    /// Keys naming one of the schema's indexes go to `indexes`; every other
    /// key goes to `fields`.
    pub fn project(entry: &Entry, schema: &Schema) -> Self {
        let mut indexes = Map::new();
        let mut fields = Map::new();
        for (key, value) in entry {
            if schema.has_index(key) {
                indexes.insert(key.clone(), value.clone());
            } else {
                fields.insert(key.clone(), value.clone());
            }
        }
        Self {
            root: schema.root().to_string(),
            indexes,
            fields,
            all_fields: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        attr::{AttrType, IndexAttr},
        fields::FieldTree,
    };

    use super::*;

    fn books_schema() -> Schema {
        Schema::new(
            "books",
            vec![IndexAttr::new("id", AttrType::Str)],
            FieldTree::new()
                .field("title", AttrType::Str)
                .group("publisher", FieldTree::new().field("city", AttrType::Str)),
        )
    }

    #[test]
    fn project_splits_indexes_from_fields() {
        let schema = books_schema();
        let mut entry = Entry::new();
        entry.insert("id".to_string(), json!("book_101"));
        entry.insert("title".to_string(), json!("1984"));
        entry.insert("publisher.city".to_string(), json!("London"));

        let record = Record::project(&entry, &schema);
        assert_eq!(record.root, "books");
        assert_eq!(record.indexes.get("id"), Some(&json!("book_101")));
        assert_eq!(record.fields.get("title"), Some(&json!("1984")));
        assert_eq!(record.fields.get("publisher.city"), Some(&json!("London")));
        assert!(!record.fields.contains_key("id"));
        assert!(record.all_fields.is_none());
    }

    #[test]
    fn serializes_all_fields_under_underscore_name() {
        let schema = books_schema();
        let mut entry = Entry::new();
        entry.insert("id".to_string(), json!("book_101"));
        entry.insert("title".to_string(), json!("1984"));

        let mut record = Record::project(&entry, &schema);
        record.all_fields = Some(record.fields.clone());

        let text = serde_json::to_string(&record).unwrap();
        assert!(text.contains("\"_all_fields\""));
    }
}
