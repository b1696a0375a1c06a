//! SQL statement resolution and execution.
//!
//! The parser hands over names exactly as written; this module resolves
//! them against the registry (FROM roots, ON references, WHERE references,
//! the SELECT list), runs the flatten/join/filter pipeline, and projects
//! the surviving entries into canonical records.

use serde_json::{Map, Value};

use strata_schema::{Entry, Record, Schema, SchemaRegistry};

use crate::{
    error::{EngineError, SqlClause},
    flatten::flatten,
    sql::ast::{FromPath, SelectList, SelectStatement, WhereExpr},
};

/// Which side of a join a resolved ON reference reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    /// The primary (left) root.
    Left,
    /// The joined (right) root.
    Right,
}

/// A resolved ON reference: the side and the flat-entry key to read.
#[derive(Debug, Clone)]
struct JoinRef {
    /// Side of the join the key lives on.
    side: Side,
    /// Index name or flat path within that side's entries.
    key: String,
}

/// A WHERE expression with references resolved to storage keys.
#[derive(Debug, Clone)]
enum WherePred {
    /// All must hold.
    And(Vec<Self>),
    /// At least one must hold.
    Or(Vec<Self>),
    /// Typed equality against one entry key.
    Cond {
        /// Resolved storage key.
        key: String,
        /// Comparison value.
        value: Value,
    },
}

impl WherePred {
    /// Evaluates the predicate against a flat entry, short-circuiting.
    fn eval(&self, entry: &Entry) -> bool {
        match self {
            Self::And(parts) => parts.iter().all(|p| p.eval(entry)),
            Self::Or(parts) => parts.iter().any(|p| p.eval(entry)),
            Self::Cond { key, value } => entry.get(key).is_some_and(|found| found == value),
        }
    }
}

/// The validated SELECT list in internal (storage-key) form.
struct Projection {
    /// The engine's star expansion for this statement.
    star_internal: Vec<String>,
    /// The selected names, primary-root prefixes stripped.
    select_internal: Vec<String>,
}

/// Executes a parsed statement against a document.
pub(crate) fn execute(
    stmt: &SelectStatement,
    document: &Value,
    registry: &SchemaRegistry,
) -> Result<Vec<Record>, EngineError> {
    let left = resolve_from(&stmt.from, registry)?;
    let right = match &stmt.join {
        Some(join) => Some(resolve_from(&join.from, registry)?),
        None => None,
    };

    let projection = resolve_projection(&stmt.select, left, right)?;

    let mut entries = flatten(left, document, None);

    if let (Some(join), Some(right_schema)) = (&stmt.join, right) {
        let conditions: Vec<(JoinRef, JoinRef)> = join
            .on
            .iter()
            .map(|(first, second)| -> Result<(JoinRef, JoinRef), EngineError> {
                Ok((
                    resolve_join_ident(first, left, right_schema)?,
                    resolve_join_ident(second, left, right_schema)?,
                ))
            })
            .collect::<Result<_, EngineError>>()?;

        let right_entries = flatten(right_schema, document, None);
        let mut joined = Vec::new();
        for left_entry in &entries {
            for right_entry in &right_entries {
                if join_matches(&conditions, left_entry, right_entry) {
                    joined.push(combine(left_entry, right_entry, right_schema));
                }
            }
        }
        entries = joined;
    }

    if let Some(where_expr) = &stmt.where_expr {
        let predicate = resolve_where(where_expr, left, right)?;
        entries.retain(|entry| predicate.eval(entry));
    }

    Ok(entries
        .iter()
        .map(|entry| project(entry, left, &projection))
        .collect())
}

/// Resolves a FROM path: the root must be registered and the index suffix
/// must be a prefix of the schema's index order.
fn resolve_from<'a>(
    path: &FromPath,
    registry: &'a SchemaRegistry,
) -> Result<&'a Schema, EngineError> {
    let schema = registry
        .get(&path.root)
        .ok_or_else(|| EngineError::UnknownReference {
            clause: SqlClause::From,
            name: path.root.clone(),
        })?;

    if !path.indexes.is_empty() {
        let expected: Vec<String> = schema
            .index_names()
            .take(path.indexes.len())
            .map(String::from)
            .collect();
        if path.indexes != expected {
            return Err(EngineError::FromIndexMismatch {
                found: path.indexes.clone(),
                expected,
            });
        }
    }

    Ok(schema)
}

/// Validates the SELECT list and computes the internal storage keys.
fn resolve_projection(
    select: &SelectList,
    left: &Schema,
    right: Option<&Schema>,
) -> Result<Projection, EngineError> {
    let mut star_internal: Vec<String> =
        left.flat_fields().iter().map(|s| s.name.clone()).collect();
    if let Some(right) = right {
        for spec in right.flat_fields() {
            star_internal.push(format!("{}.{}", right.root(), spec.name));
        }
    }

    let select_internal = match select {
        SelectList::Star => star_internal.clone(),
        SelectList::Columns(names) => names
            .iter()
            .map(|name| resolve_select_name(name, left, right))
            .collect::<Result<_, _>>()?,
    };

    Ok(Projection {
        star_internal,
        select_internal,
    })
}

/// Resolves one SELECT name to its internal storage key.
///
/// Primary names may be bare or prefixed with the primary root (the prefix
/// is stripped); right-root names keep their full qualified form.
fn resolve_select_name(
    name: &str,
    left: &Schema,
    right: Option<&Schema>,
) -> Result<String, EngineError> {
    if left.flat_field(name).is_some() {
        return Ok(name.to_string());
    }

    if let Some(suffix) = strip_root(name, left.root()) {
        if left.flat_field(suffix).is_some() {
            return Ok(suffix.to_string());
        }
    }

    if let Some(right) = right {
        if let Some(suffix) = strip_root(name, right.root()) {
            let valid = match suffix.strip_prefix("indexes.") {
                Some(idx) => right.has_index(idx),
                None => right.flat_field(suffix).is_some(),
            };
            if valid {
                return Ok(name.to_string());
            }
        }
    }

    Err(EngineError::UnknownReference {
        clause: SqlClause::Select,
        name: name.to_string(),
    })
}

/// Resolves a qualified ON identifier against the two joined schemas.
///
/// Accepted forms are `<root>.indexes.<idx>` and `<root>.<flat-path>`; a
/// two-segment form whose suffix names an index (and no flat path) is an
/// index reference.
fn resolve_join_ident(
    ident: &str,
    left: &Schema,
    right: &Schema,
) -> Result<JoinRef, EngineError> {
    let unknown = || EngineError::UnknownReference {
        clause: SqlClause::Join,
        name: ident.to_string(),
    };

    let (side, schema, rest) = if let Some(rest) = strip_root(ident, left.root()) {
        (Side::Left, left, rest)
    } else if let Some(rest) = strip_root(ident, right.root()) {
        (Side::Right, right, rest)
    } else {
        return Err(unknown());
    };

    if let Some(idx) = rest.strip_prefix("indexes.") {
        return if schema.has_index(idx) {
            Ok(JoinRef {
                side,
                key: idx.to_string(),
            })
        } else {
            Err(unknown())
        };
    }

    if !rest.contains('.') && schema.has_index(rest) && schema.flat_field(rest).is_none() {
        return Ok(JoinRef {
            side,
            key: rest.to_string(),
        });
    }

    if schema.flat_field(rest).is_some() {
        return Ok(JoinRef {
            side,
            key: rest.to_string(),
        });
    }

    Err(unknown())
}

/// Resolves a WHERE expression into a predicate over flat entries.
fn resolve_where(
    expr: &WhereExpr,
    left: &Schema,
    right: Option<&Schema>,
) -> Result<WherePred, EngineError> {
    match expr {
        WhereExpr::And(parts) => Ok(WherePred::And(
            parts
                .iter()
                .map(|p| resolve_where(p, left, right))
                .collect::<Result<_, _>>()?,
        )),
        WhereExpr::Or(parts) => Ok(WherePred::Or(
            parts
                .iter()
                .map(|p| resolve_where(p, left, right))
                .collect::<Result<_, _>>()?,
        )),
        WhereExpr::Cond { ident, value } => Ok(WherePred::Cond {
            key: resolve_where_ident(ident, left, right)?,
            value: value.to_value(),
        }),
    }
}

/// Resolves one WHERE identifier to its storage key.
///
/// Idents may be unqualified, qualified with the primary root (which is
/// stripped), or `indexes.<name>`. Under a join, right-root qualified
/// columns resolve to their full combined-entry keys.
fn resolve_where_ident(
    ident: &str,
    left: &Schema,
    right: Option<&Schema>,
) -> Result<String, EngineError> {
    let unknown = || EngineError::UnknownReference {
        clause: SqlClause::Where,
        name: ident.to_string(),
    };

    let stripped = strip_root(ident, left.root()).unwrap_or(ident);

    if let Some(idx) = stripped.strip_prefix("indexes.") {
        return if left.has_index(idx) {
            Ok(idx.to_string())
        } else {
            Err(unknown())
        };
    }
    if left.has_index(stripped) || left.flat_field(stripped).is_some() {
        return Ok(stripped.to_string());
    }

    if let Some(right) = right {
        if let Some(rest) = strip_root(ident, right.root()) {
            let valid = match rest.strip_prefix("indexes.") {
                Some(idx) => right.has_index(idx),
                None => right.flat_field(rest).is_some(),
            };
            if valid {
                return Ok(ident.to_string());
            }
        }
    }

    Err(unknown())
}

/// Strips a `<root>.` prefix, returning the remainder.
fn strip_root<'a>(ident: &'a str, root: &str) -> Option<&'a str> {
    ident
        .strip_prefix(root)
        .and_then(|rest| rest.strip_prefix('.'))
}

/// Evaluates a resolved ON conjunction for one left/right pair.
fn join_matches(conditions: &[(JoinRef, JoinRef)], left: &Entry, right: &Entry) -> bool {
    conditions.iter().all(|(first, second)| {
        side_value(first, left, right) == side_value(second, left, right)
    })
}

/// Reads the value a resolved ON reference points at.
fn side_value<'a>(reference: &JoinRef, left: &'a Entry, right: &'a Entry) -> Option<&'a Value> {
    match reference.side {
        Side::Left => left.get(&reference.key),
        Side::Right => right.get(&reference.key),
    }
}

/// Copies a left entry and folds a right entry in under qualified keys.
///
/// Right index values land under `<right>.indexes.<idx>`; every other right
/// key lands under `<right>.<key>`.
fn combine(left_entry: &Entry, right_entry: &Entry, right: &Schema) -> Entry {
    let mut combined = left_entry.clone();
    for (key, value) in right_entry {
        let stored = if right.has_index(key) {
            format!("{}.indexes.{}", right.root(), key)
        } else {
            format!("{}.{}", right.root(), key)
        };
        combined.insert(stored, value.clone());
    }
    combined
}

/// Projects a surviving entry into a canonical record.
///
/// `fields` is restricted to the selected names (a select list equal to the
/// star expansion keeps everything); `_all_fields` always carries the
/// unrestricted map so the unflattener can recover joined-root indexes.
fn project(entry: &Entry, left: &Schema, projection: &Projection) -> Record {
    let mut record = Record::project(entry, left);
    let all_fields = record.fields.clone();

    record.fields = if projection.select_internal == projection.star_internal {
        all_fields.clone()
    } else {
        let mut selected = Map::new();
        for name in &projection.select_internal {
            selected.insert(
                name.clone(),
                all_fields.get(name).cloned().unwrap_or(Value::Null),
            );
        }
        selected
    };
    record.all_fields = Some(all_fields);
    record
}
