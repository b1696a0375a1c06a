//! The schema-directed flattener.
//!
//! Turns a nested document into uniform flat entries. Traversal follows the
//! schema's index order: each index level consumes one level of document
//! nesting, recording the key as the index value. Index filter values prune
//! branches during descent; non-index filter values are applied to the
//! complete entry set afterwards under the normalized string comparison.
//!
//! The flattener never fails: malformed branches (a non-object where an
//! index level or entity was expected) simply yield no entries.

use serde_json::{Map, Value};

use strata_schema::{Entry, FieldSpec, FilterValues, Schema, value};

/// Flattens a document against a schema, honouring filter values.
///
/// Entries appear in the document's key order at each index level,
/// depth-first. Every entry carries one value per index on its path and one
/// value per flat field (the declared default when the entity lacks it).
pub fn flatten(schema: &Schema, document: &Value, filters: Option<&FilterValues>) -> Vec<Entry> {
    let mut entries = all_entries(schema, document, filters);
    apply_field_filters(&mut entries, filters);
    entries
}

/// Runs the index-level traversal and entity extraction, without the
/// post-traversal field filters.
fn all_entries(schema: &Schema, document: &Value, filters: Option<&FilterValues>) -> Vec<Entry> {
    let Some(root_data) = document.get(schema.root()) else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    let mut acc = Vec::new();
    walk(schema, root_data, 0, &mut acc, filters, &mut entries);
    entries
}

/// Recurses through one index level, accumulating index values.
fn walk(
    schema: &Schema,
    node: &Value,
    depth: usize,
    acc: &mut Vec<(String, Value)>,
    filters: Option<&FilterValues>,
    out: &mut Vec<Entry>,
) {
    let indexes = schema.indexes();
    if depth == indexes.len() {
        if let Value::Object(entity) = node {
            out.push(build_entry(acc, schema.flat_fields(), entity));
        }
        return;
    }

    let Value::Object(children) = node else {
        return;
    };

    let index_name = &indexes[depth].name;
    let filter_value = filters.and_then(|f| f.index_value(index_name));

    for (key, child) in children {
        // Index filter presence is bit-exact string comparison on the key.
        if let Some(wanted) = filter_value {
            if *key != value::key_string(wanted) {
                continue;
            }
        }
        acc.push((index_name.clone(), Value::String(key.clone())));
        walk(schema, child, depth + 1, acc, filters, out);
        acc.pop();
    }
}

/// Builds one flat entry from accumulated index values and an entity.
fn build_entry(acc: &[(String, Value)], specs: &[FieldSpec], entity: &Map<String, Value>) -> Entry {
    let mut entry = Entry::new();
    for (name, val) in acc {
        entry.insert(name.clone(), val.clone());
    }
    for spec in specs {
        entry.insert(spec.name.clone(), field_value(entity, spec));
    }
    entry
}

/// Walks a flat field's path inside an entity, falling back to the default
/// when an intermediate is missing, null, or not an object.
fn field_value(entity: &Map<String, Value>, spec: &FieldSpec) -> Value {
    let mut map = entity;
    for (pos, segment) in spec.path.iter().enumerate() {
        match map.get(segment) {
            Some(Value::Null) | None => break,
            Some(found) => {
                if pos + 1 == spec.path.len() {
                    return found.clone();
                }
                match found {
                    Value::Object(inner) => map = inner,
                    _ => break,
                }
            }
        }
    }
    spec.default.clone()
}

/// Drops entries that fail any non-index filter value.
fn apply_field_filters(entries: &mut Vec<Entry>, filters: Option<&FilterValues>) {
    let Some(filters) = filters else {
        return;
    };

    for (flat_path, wanted) in filters.field_values() {
        entries.retain(|entry| {
            entry
                .get(flat_path)
                .is_some_and(|found| value::normalized_eq(found, wanted))
        });
    }
}
