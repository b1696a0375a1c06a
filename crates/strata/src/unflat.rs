//! The unflattener.
//!
//! Rebuilds a nested document from canonical records: descend into the
//! record's root, then through its index values in schema order, then
//! deep-merge the dotted field paths expanded back into a tree. Records
//! produced by joins additionally carry `<other-root>.…` keys, which are
//! re-rooted under their own schemas rather than nested inside the primary
//! root.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use strata_schema::{Record, SchemaRegistry, value};

/// Rebuilds a nested document from a list of records.
///
/// Index descent uses the registry's schema order for the record's root,
/// falling back to the record's own index insertion order when the root is
/// not registered. Contributions from several records merge deeply.
pub fn unflat(records: &[Record], registry: &SchemaRegistry) -> Value {
    let mut result = Map::new();
    for record in records {
        merge_record(&mut result, record, registry);
    }
    Value::Object(result)
}

/// Rebuilds one nested document per field from per-field search results,
/// preserving field order.
pub fn unflat_fields(
    results: &IndexMap<String, Vec<Record>>,
    registry: &SchemaRegistry,
) -> Value {
    let mut out = Map::new();
    for (field, records) in results {
        out.insert(field.clone(), unflat(records, registry));
    }
    Value::Object(out)
}

/// Merges one record's contribution into the result tree.
fn merge_record(result: &mut Map<String, Value>, record: &Record, registry: &SchemaRegistry) {
    let root = &record.root;
    if root.is_empty() {
        return;
    }

    // Joined-root index values live in the unrestricted field map when the
    // projection narrowed `fields`.
    let all_fields = record.all_fields.as_ref().unwrap_or(&record.fields);

    let index_order: Vec<String> = match registry.get(root) {
        Some(schema) => schema.index_names().map(String::from).collect(),
        None => record.indexes.keys().cloned().collect(),
    };

    let node = descend(object_slot(result, root), &index_order, &record.indexes);

    let mut primary = Map::new();
    for (key, val) in &record.fields {
        let first = key.split('.').next().unwrap_or("");
        if registry.contains(first) && first != root.as_str() {
            continue;
        }
        primary.insert(key.clone(), val.clone());
    }
    deep_merge(node, expand_dotted(&primary, registry));

    for (other_root, other_schema) in registry.iter() {
        if other_root == root.as_str() {
            continue;
        }

        let index_prefix = format!("{other_root}.indexes.");
        let field_prefix = format!("{other_root}.");

        let mut other_indexes = Map::new();
        for (key, val) in all_fields {
            if let Some(idx_name) = key.strip_prefix(&index_prefix) {
                other_indexes.insert(idx_name.to_string(), val.clone());
            }
        }

        let mut other_fields = Map::new();
        for (key, val) in &record.fields {
            if let Some(sub) = key.strip_prefix(&field_prefix) {
                if sub.starts_with("indexes.") {
                    continue;
                }
                other_fields.insert(sub.to_string(), val.clone());
            }
        }

        if other_indexes.is_empty() && other_fields.is_empty() {
            continue;
        }

        let other_order: Vec<String> = other_schema.index_names().map(String::from).collect();
        let other_node = descend(object_slot(result, other_root), &other_order, &other_indexes);
        deep_merge(other_node, expand_dotted(&other_fields, registry));
    }
}

/// Descends through index values in the given order, creating (or
/// replacing non-object) levels as needed. Indexes missing from the record
/// are skipped.
fn descend<'a>(
    mut node: &'a mut Map<String, Value>,
    index_order: &[String],
    indexes: &Map<String, Value>,
) -> &'a mut Map<String, Value> {
    for idx_name in index_order {
        let Some(idx_value) = indexes.get(idx_name) else {
            continue;
        };
        node = object_slot(node, &value::key_string(idx_value));
    }
    node
}

/// Returns the object under `key`, inserting or replacing as needed.
fn object_slot<'a>(map: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    let slot = map
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    let Value::Object(inner) = slot else {
        unreachable!("slot was just made an object");
    };
    inner
}

/// Expands dotted keys into nested objects.
///
/// Keys of the form `<registered-root>.indexes.<idx>` are index metadata
/// for additional roots, never leaf fields, and are skipped here.
fn expand_dotted(flat: &Map<String, Value>, registry: &SchemaRegistry) -> Map<String, Value> {
    let mut result = Map::new();
    for (key, val) in flat {
        let parts: Vec<&str> = key.split('.').collect();
        if parts.len() >= 3 && parts[1] == "indexes" && registry.contains(parts[0]) {
            continue;
        }

        let mut node = &mut result;
        for part in &parts[..parts.len() - 1] {
            node = object_slot(node, part);
        }
        node.insert(parts[parts.len() - 1].to_string(), val.clone());
    }
    result
}

/// Deep-merges `src` into `dst`: matching object values recurse, anything
/// else is overwritten by the right side.
fn deep_merge(dst: &mut Map<String, Value>, src: Map<String, Value>) {
    for (key, val) in src {
        let merge_objects = val.is_object() && dst.get(&key).is_some_and(Value::is_object);
        if merge_objects {
            if let (Some(Value::Object(existing)), Value::Object(incoming)) =
                (dst.get_mut(&key), val)
            {
                deep_merge(existing, incoming);
            }
        } else {
            dst.insert(key, val);
        }
    }
}
