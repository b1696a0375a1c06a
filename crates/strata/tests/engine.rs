//! End-to-end scenarios: register schemas, flatten, search, run SQL, and
//! rebuild nested documents from the results.

use serde_json::{Value, json};

use strata::{
    AttrType, FieldTree, FilterModel, IndexAttr, Schema, SchemaRegistry, SearchParams, search,
    search_fields, sql, unflat, unflat_fields,
};

/// The books schema used throughout: one `id` index, nested publisher.
fn books_schema() -> Schema {
    Schema::new(
        "books",
        vec![IndexAttr::new("id", AttrType::Str)],
        FieldTree::new()
            .field("title", AttrType::Str)
            .field("author", AttrType::Str)
            .field_with_default("available", AttrType::Bool, json!(false))
            .group("publisher", FieldTree::new().field("city", AttrType::Str)),
    )
}

/// The movies schema joined against books in the join scenarios.
fn movies_schema() -> Schema {
    Schema::new(
        "movies",
        vec![IndexAttr::new("id", AttrType::Str)],
        FieldTree::new()
            .field("title", AttrType::Str)
            .group("studio", FieldTree::new().field("city", AttrType::Str)),
    )
}

fn registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    registry.register(books_schema()).unwrap();
    registry.register(movies_schema()).unwrap();
    registry
}

fn library() -> Value {
    json!({
        "books": {
            "book_101": {
                "title": "aaaa",
                "author": "Georgeaaaa Orwell",
                "available": true,
                "publisher": {"city": "London"}
            },
            "book_102": {
                "title": "aaaabbbb",
                "author": "Aldous Huxley",
                "available": false,
                "publisher": {"city": "London"}
            },
            "book_103": {
                "title": "1984",
                "author": "Ray Bradbury",
                "available": true,
                "publisher": {"city": "New York"}
            }
        },
        "movies": {
            "movie_201": {"title": "Metropolis", "studio": {"city": "London"}},
            "movie_202": {"title": "Modern Times", "studio": {"city": "Los Angeles"}}
        }
    })
}

#[test]
fn simple_sql_projection_unflattens_to_titles() {
    let records = sql("SELECT title FROM books", &library(), &registry()).unwrap();
    assert_eq!(records.len(), 3);

    let tree = unflat(&records, &registry());
    assert_eq!(
        tree,
        json!({
            "books": {
                "book_101": {"title": "aaaa"},
                "book_102": {"title": "aaaabbbb"},
                "book_103": {"title": "1984"}
            }
        })
    );
}

#[test]
fn where_on_nested_field_and_boolean() {
    let records = sql(
        "SELECT title FROM books WHERE publisher.city = 'London' AND available = TRUE",
        &library(),
        &registry(),
    )
    .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].indexes.get("id"), Some(&json!("book_101")));
}

#[test]
fn boolean_search_with_not() {
    // "a NOT b" over titles "aaaa", "aaaabbbb", "1984": only book_101
    // contains "a" without "b".
    let records = search(
        &library(),
        "title",
        "a NOT b",
        &books_schema(),
        None,
        &SearchParams::default(),
    )
    .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].indexes.get("id"), Some(&json!("book_101")));
}

#[test]
fn fuzzy_search_at_maximum_temperature() {
    let params = SearchParams {
        fuzzy: true,
        temp: 100.0,
        ..SearchParams::default()
    };
    let records = search(&library(), "author", "Georg", &books_schema(), None, &params).unwrap();
    assert!(
        records
            .iter()
            .any(|r| r.indexes.get("id") == Some(&json!("book_101")))
    );
}

#[test]
fn cross_join_yields_the_full_product_and_both_roots() {
    let records = sql(
        "SELECT books.title, movies.title FROM books CROSS JOIN movies",
        &library(),
        &registry(),
    )
    .unwrap();
    assert_eq!(records.len(), 6);

    let tree = unflat(&records, &registry());
    let books = tree.get("books").unwrap().as_object().unwrap();
    let movies = tree.get("movies").unwrap().as_object().unwrap();
    assert_eq!(books.len(), 3);
    assert_eq!(movies.len(), 2);
    assert_eq!(
        movies.get("movie_201").unwrap().get("title"),
        Some(&json!("Metropolis"))
    );
}

#[test]
fn inner_join_on_city_with_where() {
    let records = sql(
        "SELECT books.title, movies.title FROM books INNER JOIN movies \
         ON books.publisher.city = movies.studio.city WHERE books.available = TRUE",
        &library(),
        &registry(),
    )
    .unwrap();
    // Books in London joined with Metropolis (London); only book_101 is
    // both available and published there.
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].fields.get("title"), Some(&json!("aaaa")));
    assert_eq!(records[0].fields.get("movies.title"), Some(&json!("Metropolis")));

    let tree = unflat(&records, &registry());
    assert_eq!(
        tree,
        json!({
            "books": {"book_101": {"title": "aaaa"}},
            "movies": {"movie_201": {"title": "Metropolis"}}
        })
    );
}

#[test]
fn swapping_inner_join_for_join_changes_nothing() {
    let inner = sql(
        "SELECT books.title FROM books INNER JOIN movies ON books.publisher.city = movies.studio.city",
        &library(),
        &registry(),
    )
    .unwrap();
    let bare = sql(
        "SELECT books.title FROM books JOIN movies ON books.publisher.city = movies.studio.city",
        &library(),
        &registry(),
    )
    .unwrap();
    assert_eq!(inner, bare);
}

#[test]
fn per_field_search_and_unflat() {
    let results = search_fields(
        &library(),
        &["title", "author"],
        "1984 OR Huxley",
        &books_schema(),
        None,
        &SearchParams::default(),
    )
    .unwrap();

    assert_eq!(results["title"].len(), 1);
    assert_eq!(results["author"].len(), 1);

    let tree = unflat_fields(&results, &registry());
    let by_title = tree.get("title").unwrap();
    assert!(by_title.get("books").unwrap().get("book_103").is_some());
    let by_author = tree.get("author").unwrap();
    assert!(by_author.get("books").unwrap().get("book_102").is_some());
}

#[test]
fn keyword_filters_narrow_search_through_the_implicit_model() {
    let schema = books_schema();
    let model = FilterModel::implicit(&schema);
    let mut values = serde_json::Map::new();
    values.insert("city".to_string(), json!("london"));
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
    assert_eq!(records.len(), 2);
    for record in &records {
        assert_eq!(record.fields.get("publisher.city"), Some(&json!("London")));
    }
}

#[test]
fn search_results_unflatten_with_full_fields() {
    let records = search(
        &library(),
        "title",
        "1984",
        &books_schema(),
        None,
        &SearchParams::default(),
    )
    .unwrap();
    let tree = unflat(&records, &registry());
    assert_eq!(
        tree,
        json!({
            "books": {
                "book_103": {
                    "title": "1984",
                    "author": "Ray Bradbury",
                    "available": true,
                    "publisher": {"city": "New York"}
                }
            }
        })
    );
}
