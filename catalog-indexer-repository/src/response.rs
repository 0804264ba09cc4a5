//! Decoding of search responses into [`SearchResultEnvelope`].
//!
//! Both query paths hand the backend's JSON body to [`decode_search_response`].
//! Hits whose `_source` cannot be decoded are skipped and counted; they never
//! fail the whole response.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::errors::SearchIndexError;
use catalog_indexer_shared::{
    DocumentKind, SearchDocument, SearchHit, SearchResultEnvelope, ShardStats,
};

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(default)]
    took: u64,
    #[serde(default)]
    timed_out: bool,
    #[serde(rename = "_shards", default)]
    shards: ShardStats,
    #[serde(default)]
    hits: RawHits,
}

#[derive(Debug, Default, Deserialize)]
struct RawHits {
    #[serde(default)]
    total: Option<RawTotal>,
    #[serde(default)]
    max_score: Option<f64>,
    #[serde(default)]
    hits: Vec<Value>,
}

/// Older backends report the total as a number, newer ones as an object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTotal {
    Count(u64),
    Object { value: u64 },
}

impl RawTotal {
    fn value(&self) -> u64 {
        match self {
            RawTotal::Count(n) => *n,
            RawTotal::Object { value } => *value,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_index", default)]
    index: String,
    #[serde(rename = "_id", default)]
    id: String,
    #[serde(rename = "_score", default)]
    score: Option<f64>,
    #[serde(rename = "_source")]
    source: Value,
}

/// Decode a search response body, using the decoder for `kind` on every hit.
///
/// # Returns
///
/// * `Ok(SearchResultEnvelope)` - Decoded response; may hold zero hits
/// * `Err(SearchIndexError)` - If the body is an error response or is not a
///   search response at all
pub fn decode_search_response(
    kind: DocumentKind,
    body: Value,
) -> Result<SearchResultEnvelope, SearchIndexError> {
    if let Some(error) = body.get("error") {
        return Err(SearchIndexError::query(error.to_string()));
    }

    let raw: RawResponse = serde_json::from_value(body)
        .map_err(|e| SearchIndexError::parse(format!("Invalid search response: {}", e)))?;

    let mut hits = Vec::with_capacity(raw.hits.hits.len());
    let mut skipped_hits = 0;

    for value in raw.hits.hits {
        match decode_hit(kind, value) {
            Ok(hit) => hits.push(hit),
            Err(e) => {
                skipped_hits += 1;
                warn!(kind = %kind, error = %e, "Skipping undecodable search hit");
            }
        }
    }

    Ok(SearchResultEnvelope {
        took: raw.took,
        timed_out: raw.timed_out,
        shards: raw.shards,
        total: raw.hits.total.map(|t| t.value()).unwrap_or(0),
        max_score: raw.hits.max_score,
        hits,
        skipped_hits,
    })
}

fn decode_hit(kind: DocumentKind, value: Value) -> Result<SearchHit, serde_json::Error> {
    let raw: RawHit = serde_json::from_value(value)?;
    let document = SearchDocument::from_source(kind, raw.source)?;

    Ok(SearchHit {
        index: raw.index,
        id: raw.id,
        score: raw.score.unwrap_or(0.0),
        document,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_indexer_shared::DesignKind;
    use serde_json::json;

    #[test]
    fn test_decode_legacy_total() {
        let body = json!({
            "took": 4,
            "timed_out": false,
            "_shards": { "total": 5, "successful": 5, "failed": 0 },
            "hits": {
                "total": 1,
                "max_score": 1.2,
                "hits": [{
                    "_index": "product",
                    "_type": "product",
                    "_id": "fm_product_1_10",
                    "_score": 1.2,
                    "_source": {
                        "id": 10,
                        "pn": "USB3320C",
                        "inventory": 25,
                        "offical_price": "1.10"
                    }
                }]
            }
        });

        let envelope = decode_search_response(DocumentKind::Catalog, body).unwrap();

        assert_eq!(envelope.took, 4);
        assert_eq!(envelope.total, 1);
        assert_eq!(envelope.shards.successful, 5);
        assert_eq!(envelope.hits.len(), 1);
        assert_eq!(envelope.hits[0].id, "fm_product_1_10");
        assert_eq!(envelope.hits[0].score, 1.2);

        let doc = envelope.hits[0].document.as_catalog().unwrap();
        assert_eq!(doc.pn, "USB3320C");
        assert_eq!(doc.official_price, "1.10");
    }

    #[test]
    fn test_decode_object_total() {
        let body = json!({
            "took": 1,
            "timed_out": false,
            "_shards": { "total": 1, "successful": 1, "skipped": 0, "failed": 0 },
            "hits": {
                "total": { "value": 42, "relation": "eq" },
                "max_score": null,
                "hits": []
            }
        });

        let envelope = decode_search_response(DocumentKind::News, body).unwrap();
        assert_eq!(envelope.total, 42);
        assert!(envelope.max_score.is_none());
        assert!(envelope.is_empty());
    }

    #[test]
    fn test_zero_hits_is_not_an_error() {
        let body = json!({
            "took": 0,
            "timed_out": false,
            "hits": { "total": { "value": 0 }, "hits": [] }
        });

        let envelope = decode_search_response(DocumentKind::Catalog, body).unwrap();
        assert_eq!(envelope.total, 0);
        assert!(envelope.hits.is_empty());
        assert_eq!(envelope.skipped_hits, 0);
    }

    #[test]
    fn test_undecodable_hit_is_skipped() {
        let body = json!({
            "hits": {
                "total": 3,
                "hits": [
                    { "_id": "design_1", "_score": 2.0, "_source": { "id": 1, "name": "A", "kind": "design", "total_count": 2 } },
                    { "_id": "broken", "_score": 1.5, "_source": { "name": "no identity" } },
                    { "_id": "design_3", "_score": 1.0, "_source": { "id": 3, "name": "C", "kind": "design", "total_count": 2 } }
                ]
            }
        });

        let envelope = decode_search_response(DocumentKind::Design, body).unwrap();
        assert_eq!(envelope.total, 3);
        assert_eq!(envelope.skipped_hits, 1);
        assert_eq!(envelope.ids(), vec![1, 3]);
    }

    #[test]
    fn test_design_hit_without_kind_field() {
        let body = json!({
            "hits": {
                "total": 1,
                "hits": [{
                    "_index": "mfs",
                    "_id": "design_5",
                    "_score": 1.0,
                    "_source": {
                        "id": 5,
                        "name": "Buck",
                        "mfs": "TI",
                        "desc": "12V to 5V",
                        "total_count": 2
                    }
                }]
            }
        });

        let envelope = decode_search_response(DocumentKind::Design, body).unwrap();
        assert_eq!(envelope.total, 1);
        assert_eq!(envelope.skipped_hits, 0);
        assert_eq!(envelope.hits.len(), 1);

        let doc = envelope.hits[0].document.as_design().unwrap();
        assert_eq!(doc.kind(), DesignKind::Design);
        assert_eq!(doc.name, "Buck");
    }

    #[test]
    fn test_null_score_defaults_to_zero() {
        let body = json!({
            "hits": {
                "total": 1,
                "hits": [{
                    "_id": "7",
                    "_score": null,
                    "_source": {
                        "id": 7,
                        "create_time": "2020-01-02T03:04:05Z",
                        "time_string": "2020/01/02",
                        "total_count": 3
                    }
                }]
            }
        });

        let envelope = decode_search_response(DocumentKind::News, body).unwrap();
        assert_eq!(envelope.hits[0].score, 0.0);
        assert_eq!(envelope.hits[0].document.as_news().unwrap().total_count(), 3);
    }

    #[test]
    fn test_error_body_is_reported() {
        let body = json!({
            "error": { "type": "index_not_found_exception", "reason": "no such index [news]" },
            "status": 404
        });

        let result = decode_search_response(DocumentKind::News, body);
        assert!(matches!(result, Err(SearchIndexError::QueryError(_))));
    }
}
