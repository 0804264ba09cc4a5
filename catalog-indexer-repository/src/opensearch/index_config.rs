//! OpenSearch index configuration and mappings.
//!
//! This module defines the index settings and mappings for each document kind.

use serde_json::{json, Value};

use crate::types::TYPE_TAG_FIELD;
use catalog_indexer_shared::DocumentKind;

/// Get the index settings and mappings for the index holding `kind`.
///
/// Design and application documents share one index, so both kinds return
/// the same mapping.
///
/// The configuration includes:
/// - **Text fields** with a `raw` keyword sub-field where exact matching is useful
/// - **Keyword fields** for the type tag and provenance filters
/// - **Numeric fields** for identity (the sort key) and inventory
pub fn get_index_settings(kind: DocumentKind) -> Value {
    let properties = match kind {
        DocumentKind::Catalog => catalog_properties(),
        DocumentKind::Design | DocumentKind::Application => design_properties(),
        DocumentKind::News => news_properties(),
    };

    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": {
            "properties": properties
        }
    })
}

fn text_with_raw() -> Value {
    json!({
        "type": "text",
        "fields": {
            "raw": { "type": "keyword", "ignore_above": 256 }
        }
    })
}

fn stored_only() -> Value {
    json!({ "type": "keyword", "index": false })
}

fn catalog_properties() -> Value {
    json!({
        "id": { "type": "long" },
        "pn": text_with_raw(),
        "supplier_pn": text_with_raw(),
        "mfs": text_with_raw(),
        "catalog": text_with_raw(),
        "description": { "type": "text" },
        "param": { "type": "text" },
        "supplier": text_with_raw(),
        "inventory": { "type": "long" },
        "currency": { "type": "keyword" },
        "official_price": { "type": "keyword" },
        "source": { "type": "keyword" },
        TYPE_TAG_FIELD: { "type": "keyword" }
    })
}

fn design_properties() -> Value {
    json!({
        "id": { "type": "long" },
        "name": text_with_raw(),
        "mfs": text_with_raw(),
        "category": text_with_raw(),
        "pn": text_with_raw(),
        "desc": { "type": "text" },
        "features": { "type": "text" },
        "logo": stored_only(),
        "url": stored_only(),
        "product": { "type": "keyword" },
        "kind": { "type": "keyword" },
        "total_count": { "type": "integer" },
        TYPE_TAG_FIELD: { "type": "keyword" }
    })
}

fn news_properties() -> Value {
    json!({
        "id": { "type": "long" },
        "picture": stored_only(),
        "main_title": { "type": "text" },
        "content": { "type": "text" },
        "article_content": { "type": "text" },
        "article_web": stored_only(),
        "create_time": { "type": "date" },
        "time_string": { "type": "keyword" },
        "total_count": { "type": "integer" },
        TYPE_TAG_FIELD: { "type": "keyword" }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_settings_structure() {
        let settings = get_index_settings(DocumentKind::Catalog);

        assert!(settings["settings"]["number_of_shards"].is_number());
        assert!(settings["settings"]["number_of_replicas"].is_number());

        let properties = &settings["mappings"]["properties"];
        assert_eq!(properties["id"]["type"], "long");
        assert_eq!(properties["inventory"]["type"], "long");
        assert_eq!(properties["doc_type"]["type"], "keyword");
    }

    #[test]
    fn test_every_searched_field_is_mapped() {
        for kind in DocumentKind::ALL {
            let settings = get_index_settings(kind);
            let properties = &settings["mappings"]["properties"];
            for field in kind.search_fields() {
                assert!(
                    properties[*field].is_object(),
                    "{} is not mapped for {}",
                    field,
                    kind
                );
            }
        }
    }

    #[test]
    fn test_design_and_application_share_mapping() {
        assert_eq!(
            get_index_settings(DocumentKind::Design),
            get_index_settings(DocumentKind::Application)
        );
        assert_eq!(
            get_index_settings(DocumentKind::News)["mappings"]["properties"]["create_time"]["type"],
            "date"
        );
    }
}
