//! The search façade.
//!
//! Combines the flattener, the boolean query language, and the term matcher
//! into the user-facing search operations. Results come back in the
//! canonical `{root, indexes, fields}` shape, in flattening order, capped
//! at `max_results`.

use indexmap::IndexMap;
use serde_json::Value;

use strata_query::parse;
use strata_schema::{Entry, FilterValues, Record, Schema, value};

use crate::{
    error::EngineError,
    flatten::flatten,
    matcher::{MatchParams, term_matches},
};

/// Parameters for a search call.
#[derive(Debug, Clone, Copy)]
pub struct SearchParams {
    /// Use fuzzy similarity instead of substring/equality matching.
    pub fuzzy: bool,
    /// Non-fuzzy mode: require equality instead of substring containment.
    pub exact: bool,
    /// Fuzzy temperature in [0, 100]; out-of-range values are clamped.
    pub temp: f64,
    /// Maximum number of records to return (per field).
    pub max_results: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            fuzzy: false,
            exact: false,
            temp: 80.0,
            max_results: 5,
        }
    }
}

impl SearchParams {
    /// The term-matching subset of the parameters.
    fn match_params(&self) -> MatchParams {
        MatchParams {
            fuzzy: self.fuzzy,
            exact: self.exact,
            temp: self.temp,
        }
    }
}

/// Searches one field of a collection with a boolean query.
///
/// The document is flattened against `schema` (honouring `filters`), the
/// query is compiled, and every entry whose field targets satisfy the query
/// is projected into a canonical [`Record`]. A blank query returns no
/// records without touching the parser.
pub fn search(
    document: &Value,
    field: &str,
    query: &str,
    schema: &Schema,
    filters: Option<&FilterValues>,
    params: &SearchParams,
) -> Result<Vec<Record>, EngineError> {
    check_filters(schema, filters)?;

    if query.trim().is_empty() {
        return Ok(Vec::new());
    }

    let Some(expr) = parse(query)? else {
        return Ok(Vec::new());
    };

    let entries = flatten(schema, document, filters);
    let match_params = params.match_params();

    let mut matched = Vec::new();
    for entry in &entries {
        let targets = field_targets(entry, field);
        if expr.matches(&|term: &str| term_matches(&targets, term, match_params)) {
            matched.push(Record::project(entry, schema));
            if matched.len() >= params.max_results {
                break;
            }
        }
    }

    Ok(matched)
}

/// Searches several fields, returning per-field results in field order.
pub fn search_fields(
    document: &Value,
    fields: &[&str],
    query: &str,
    schema: &Schema,
    filters: Option<&FilterValues>,
    params: &SearchParams,
) -> Result<IndexMap<String, Vec<Record>>, EngineError> {
    let mut results = IndexMap::new();
    for field in fields {
        let records = search(document, field, query, schema, filters, params)?;
        results.insert((*field).to_string(), records);
    }
    Ok(results)
}

/// Searches with a list of alternative queries, rejoined with ` OR ` at the
/// outermost level. Blank list elements are dropped.
pub fn search_any(
    document: &Value,
    field: &str,
    queries: &[&str],
    schema: &Schema,
    filters: Option<&FilterValues>,
    params: &SearchParams,
) -> Result<Vec<Record>, EngineError> {
    search(document, field, &join_queries(queries), schema, filters, params)
}

/// Rejoins a query list with ` OR `, skipping blanks.
fn join_queries(queries: &[&str]) -> String {
    queries
        .iter()
        .filter(|q| !q.trim().is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" OR ")
}

/// Rejects filter values bound for a different schema.
fn check_filters(schema: &Schema, filters: Option<&FilterValues>) -> Result<(), EngineError> {
    if let Some(filters) = filters {
        if filters.schema_root() != schema.root() {
            return Err(EngineError::NotAFilterModel {
                expected: schema.root().to_string(),
                found: filters.schema_root().to_string(),
            });
        }
    }
    Ok(())
}

/// Extracts the normalized target list for a field of an entry.
///
/// List values contribute their elements, scalars themselves, and null (or
/// a missing field) nothing. Null elements inside a list are dropped.
fn field_targets(entry: &Entry, field: &str) -> Vec<String> {
    match entry.get(field) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().filter_map(value::normalized).collect(),
        Some(scalar) => value::normalized(scalar).into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use strata_schema::{AttrType, FieldTree, FilterModel, IndexAttr};

    use super::*;

    fn books_schema() -> Schema {
        Schema::new(
            "books",
            vec![IndexAttr::new("id", AttrType::Str)],
            FieldTree::new()
                .field("title", AttrType::Str)
                .field("tags", AttrType::List)
                .group("author", FieldTree::new().field("name", AttrType::Str)),
        )
    }

    fn library() -> Value {
        json!({
            "books": {
                "book_101": {
                    "title": "aaaa",
                    "tags": ["classic", "dystopia"],
                    "author": {"name": "Georgeaaaa Orwell"}
                },
                "book_102": {"title": "aaaabbbb", "tags": []},
                "book_103": {"title": "1984", "tags": null}
            }
        })
    }

    #[test]
    fn not_excludes_matches() {
        let schema = books_schema();
        let records = search(
            &library(),
            "title",
            "a NOT b",
            &schema,
            None,
            &SearchParams::default(),
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].indexes.get("id"), Some(&json!("book_101")));
    }

    #[test]
    fn records_are_canonical() {
        let schema = books_schema();
        let records = search(
            &library(),
            "title",
            "1984",
            &schema,
            None,
            &SearchParams::default(),
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.root, "books");
        assert!(record.indexes.contains_key("id"));
        assert!(record.fields.contains_key("title"));
        assert!(!record.fields.contains_key("id"));
    }

    #[test]
    fn list_fields_match_per_element() {
        let schema = books_schema();
        let records = search(
            &library(),
            "tags",
            "dystopia",
            &schema,
            None,
            &SearchParams::default(),
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].indexes.get("id"), Some(&json!("book_101")));
    }

    #[test]
    fn fuzzy_search_with_max_temperature() {
        let schema = books_schema();
        let params = SearchParams {
            fuzzy: true,
            temp: 100.0,
            ..SearchParams::default()
        };
        let records = search(&library(), "author.name", "Georg", &schema, None, &params).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].indexes.get("id"), Some(&json!("book_101")));
    }

    #[test]
    fn empty_query_returns_nothing() {
        let schema = books_schema();
        let records = search(
            &library(),
            "title",
            "   ",
            &schema,
            None,
            &SearchParams::default(),
        )
        .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn malformed_query_is_a_syntax_error() {
        let schema = books_schema();
        let err = search(
            &library(),
            "title",
            "(aaaa",
            &schema,
            None,
            &SearchParams::default(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::QuerySyntax(_)));
    }

    #[test]
    fn max_results_caps_in_order() {
        let schema = books_schema();
        let params = SearchParams {
            max_results: 1,
            ..SearchParams::default()
        };
        let records = search(&library(), "title", "a", &schema, None, &params).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].indexes.get("id"), Some(&json!("book_101")));
    }

    #[test]
    fn per_field_results_keep_field_order() {
        let schema = books_schema();
        let results = search_fields(
            &library(),
            &["tags", "title"],
            "classic OR 1984",
            &schema,
            None,
            &SearchParams::default(),
        )
        .unwrap();
        let fields: Vec<&String> = results.keys().collect();
        assert_eq!(fields, vec!["tags", "title"]);
        assert_eq!(results["tags"].len(), 1);
        assert_eq!(results["title"].len(), 1);
    }

    #[test]
    fn query_lists_are_rejoined_with_or() {
        let schema = books_schema();
        let records = search_any(
            &library(),
            "title",
            &["1984", "", "aaaabbbb"],
            &schema,
            None,
            &SearchParams::default(),
        )
        .unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn filters_narrow_the_entry_set() {
        let schema = books_schema();
        let model = FilterModel::implicit(&schema);
        let mut values = serde_json::Map::new();
        values.insert("id".to_string(), json!("book_102"));
        let filters = model.bind(values).unwrap();

        let records = search(
            &library(),
            "title",
            "a",
            &schema,
            Some(&filters),
            &SearchParams::default(),
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].indexes.get("id"), Some(&json!("book_102")));
    }

    #[test]
    fn foreign_filters_are_rejected() {
        let schema = books_schema();
        let other = Schema::new(
            "movies",
            vec![IndexAttr::new("id", AttrType::Str)],
            FieldTree::new().field("title", AttrType::Str),
        );
        let filters = FilterModel::implicit(&other).bind(serde_json::Map::new()).unwrap();

        let err = search(
            &library(),
            "title",
            "a",
            &schema,
            Some(&filters),
            &SearchParams::default(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::NotAFilterModel { .. }));
    }
}
