//! OpenSearch query builders.
//!
//! This module provides functions to build OpenSearch request bodies for the
//! structured query path and for literal JSON queries.

use serde_json::{json, Value};

use crate::types::TYPE_TAG_FIELD;
use catalog_indexer_shared::{DocumentKind, SearchPage};

/// Build the structured search body for `kind`.
///
/// Every non-empty term becomes a `multi_match` of type `phrase_prefix`
/// over the kind's search fields, placed in the `filter` list of a `bool`
/// query. Filter clauses are all required, so several terms combine as an
/// AND. The same clauses are repeated under `should`: with a `filter`
/// present and no `must`, `should` clauses are optional and only contribute
/// relevance, which keeps hit scores meaningful.
///
/// Results are sorted by `id` ascending and windowed with `from`/`size`.
pub fn build_structured_query(kind: DocumentKind, terms: &[String], page: SearchPage) -> Value {
    let clauses: Vec<Value> = terms
        .iter()
        .map(|term| term.trim())
        .filter(|term| !term.is_empty())
        .map(|term| build_phrase_prefix_clause(term, kind.search_fields()))
        .collect();

    let query = if clauses.is_empty() {
        scope_to_kind(kind, json!({ "match_all": {} }))
    } else {
        let mut filter = clauses.clone();
        if kind.shares_index() {
            filter.push(type_tag_filter(kind));
        }
        json!({
            "bool": {
                "should": clauses,
                "filter": filter
            }
        })
    };

    wrap_query(query, page)
}

/// Build a search body around a literal JSON query.
///
/// `query` is the value of the `"query"` key, for example `{"match_all":{}}`.
pub fn build_raw_query(kind: DocumentKind, query: Value, page: SearchPage) -> Value {
    wrap_query(scope_to_kind(kind, query), page)
}

/// Build a `multi_match` clause matching documents whose fields start with `term`.
fn build_phrase_prefix_clause(term: &str, fields: &[&str]) -> Value {
    json!({
        "multi_match": {
            "query": term,
            "type": "phrase_prefix",
            "fields": fields
        }
    })
}

/// Restrict a query to one kind when the kind shares its index.
fn scope_to_kind(kind: DocumentKind, query: Value) -> Value {
    if !kind.shares_index() {
        return query;
    }

    json!({
        "bool": {
            "must": [query],
            "filter": [type_tag_filter(kind)]
        }
    })
}

fn type_tag_filter(kind: DocumentKind) -> Value {
    json!({ "term": { TYPE_TAG_FIELD: kind.type_tag() } })
}

/// Add sorting, paging and score tracking around a query.
///
/// Scores are not computed by default when sorting on a field, so
/// `track_scores` is set to keep them in the response.
fn wrap_query(query: Value, page: SearchPage) -> Value {
    json!({
        "query": query,
        "sort": [{ "id": { "order": "asc" } }],
        "from": page.from,
        "size": page.size,
        "track_scores": true
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_structured_query_single_term() {
        let body = build_structured_query(DocumentKind::Catalog, &terms(&["usb"]), SearchPage::default());

        let filter = body["query"]["bool"]["filter"].as_array().unwrap();
        assert_eq!(filter.len(), 1);
        assert_eq!(filter[0]["multi_match"]["query"], "usb");
        assert_eq!(filter[0]["multi_match"]["type"], "phrase_prefix");

        let fields = filter[0]["multi_match"]["fields"].as_array().unwrap();
        assert!(fields.contains(&json!("supplier_pn")));
        assert!(fields.contains(&json!("param")));

        assert_eq!(body["sort"][0]["id"]["order"], "asc");
        assert_eq!(body["from"], 0);
        assert_eq!(body["size"], 10);
        assert_eq!(body["track_scores"], true);
    }

    #[test]
    fn test_structured_query_terms_are_all_required() {
        let body = build_structured_query(
            DocumentKind::Catalog,
            &terms(&["apple", "usb"]),
            SearchPage::new(20, 5),
        );

        let filter = body["query"]["bool"]["filter"].as_array().unwrap();
        let should = body["query"]["bool"]["should"].as_array().unwrap();
        assert_eq!(filter.len(), 2);
        assert_eq!(should.len(), 2);
        assert!(body["query"]["bool"].get("minimum_should_match").is_none());
        assert_eq!(body["from"], 20);
        assert_eq!(body["size"], 5);
    }

    #[test]
    fn test_structured_query_design_fields_and_type_filter() {
        let body = build_structured_query(DocumentKind::Application, &terms(&["motor"]), SearchPage::default());

        let filter = body["query"]["bool"]["filter"].as_array().unwrap();
        assert_eq!(filter.len(), 2);

        let fields = filter[0]["multi_match"]["fields"].as_array().unwrap();
        assert!(fields.contains(&json!("features")));
        assert_eq!(filter[1]["term"]["doc_type"], "app");
    }

    #[test]
    fn test_structured_query_without_terms_matches_all() {
        let body = build_structured_query(DocumentKind::News, &terms(&["", "  "]), SearchPage::default());
        assert!(body["query"]["match_all"].is_object());

        let body = build_structured_query(DocumentKind::Design, &[], SearchPage::default());
        assert!(body["query"]["bool"]["must"][0]["match_all"].is_object());
        assert_eq!(body["query"]["bool"]["filter"][0]["term"]["doc_type"], "design");
    }

    #[test]
    fn test_raw_query_keeps_literal_query() {
        let body = build_raw_query(
            DocumentKind::Catalog,
            json!({ "match_all": {} }),
            SearchPage::new(0, 25),
        );

        assert!(body["query"]["match_all"].is_object());
        assert_eq!(body["size"], 25);
        assert_eq!(body["sort"][0]["id"]["order"], "asc");
    }
}
