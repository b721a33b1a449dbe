//! Wire formats of the catalog API and their conversion into models
//!
//! Every optional or inconsistently shaped field is resolved here, so the
//! rest of the crate only sees [`SearchResult`], [`ChapterRef`] and
//! [`ImageHandshake`].

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::app::models::{ChapterRef, ImageHandshake, SearchResult};
use crate::errors::{CatalogError, CatalogResult};

/// Label the catalog uses for chapters and volumes without a number
const UNNUMBERED: &str = "none";

/// A keyed grouping that the API serializes as `[]` when empty
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Grouping<T> {
    Map(BTreeMap<String, T>),
    List(Vec<T>),
}

impl<T> Default for Grouping<T> {
    fn default() -> Self {
        Grouping::Map(BTreeMap::new())
    }
}

impl<T> Grouping<T> {
    fn into_values(self) -> Vec<T> {
        match self {
            Grouping::Map(map) => map.into_values().collect(),
            Grouping::List(list) => list,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<MangaData>,
}

#[derive(Debug, Deserialize)]
struct MangaData {
    id: String,
    #[serde(default)]
    attributes: MangaAttributes,
}

#[derive(Debug, Default, Deserialize)]
struct MangaAttributes {
    #[serde(default)]
    title: Grouping<Option<String>>,
}

impl MangaData {
    fn into_search_result(self) -> SearchResult {
        let titles: BTreeMap<String, String> = match self.attributes.title {
            Grouping::Map(map) => map
                .into_iter()
                .filter_map(|(lang, title)| title.map(|t| (lang, t)))
                .filter(|(_, title)| !title.trim().is_empty())
                .collect(),
            Grouping::List(_) => BTreeMap::new(),
        };

        let display_title = titles
            .get("en")
            .cloned()
            .or_else(|| titles.into_values().next())
            .unwrap_or_else(|| self.id.clone());

        SearchResult {
            id: self.id,
            display_title,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AggregateResponse {
    #[serde(default)]
    volumes: Grouping<AggregateVolume>,
}

#[derive(Debug, Deserialize)]
struct AggregateVolume {
    #[serde(default)]
    volume: Option<String>,
    #[serde(default)]
    chapters: Grouping<AggregateChapter>,
}

#[derive(Debug, Deserialize)]
struct AggregateChapter {
    #[serde(default)]
    chapter: Option<String>,
    id: String,
}

#[derive(Debug, Deserialize)]
struct AtHomeResponse {
    #[serde(rename = "baseUrl")]
    base_url: Option<String>,
    chapter: Option<AtHomeChapter>,
}

#[derive(Debug, Deserialize)]
struct AtHomeChapter {
    hash: Option<String>,
    #[serde(default)]
    data: Vec<String>,
}

/// Decode a `GET /manga?title=` body into search results
pub fn parse_search(body: &str) -> CatalogResult<Vec<SearchResult>> {
    let response: SearchResponse = decode(body, "search")?;
    Ok(response
        .data
        .into_iter()
        .map(MangaData::into_search_result)
        .collect())
}

/// Decode a `GET /manga/{id}/aggregate` body into a flat chapter list
///
/// Volume boundaries are discarded; the order of the result follows the
/// grouping keys and is not reading order.
pub fn parse_aggregate(body: &str) -> CatalogResult<Vec<ChapterRef>> {
    let response: AggregateResponse = decode(body, "aggregate")?;
    Ok(flatten_aggregate(response))
}

/// Decode a `GET /at-home/server/{id}` body into a handshake
pub fn parse_handshake(body: &str) -> CatalogResult<ImageHandshake> {
    let response: AtHomeResponse = decode(body, "handshake")?;
    into_handshake(response)
}

fn decode<T: for<'de> Deserialize<'de>>(body: &str, context: &'static str) -> CatalogResult<T> {
    serde_json::from_str(body).map_err(|source| CatalogError::Decode { context, source })
}

fn flatten_aggregate(response: AggregateResponse) -> Vec<ChapterRef> {
    let mut chapters = Vec::new();
    for volume in response.volumes.into_values() {
        let volume_label = volume.volume.filter(|v| v != UNNUMBERED);
        for chapter in volume.chapters.into_values() {
            chapters.push(ChapterRef {
                chapter_number: chapter
                    .chapter
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or_else(|| UNNUMBERED.to_string()),
                chapter_id: chapter.id,
                volume: volume_label.clone(),
            });
        }
    }
    chapters
}

fn into_handshake(response: AtHomeResponse) -> CatalogResult<ImageHandshake> {
    let context = "handshake";
    let image_base_url = response.base_url.ok_or(CatalogError::MissingField {
        context,
        field: "baseUrl",
    })?;
    let chapter = response.chapter.ok_or(CatalogError::MissingField {
        context,
        field: "chapter",
    })?;
    let image_hash = chapter.hash.ok_or(CatalogError::MissingField {
        context,
        field: "chapter.hash",
    })?;

    Ok(ImageHandshake {
        image_base_url,
        image_hash,
        file_names: chapter.data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_prefers_english_title() {
        let body = r#"{
            "result": "ok",
            "data": [
                {"id": "a1", "type": "manga", "attributes": {"title": {"en": "Foo Bar"}}},
                {"id": "a2", "attributes": {"title": {"ja-ro": "Fuu Baa", "ja": "フーバー"}}},
                {"id": "a3", "attributes": {"title": []}}
            ]
        }"#;

        let results = parse_search(body).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].display_title, "Foo Bar");
        // Falls back to the first localized title in key order
        assert_eq!(results[1].display_title, "フーバー");
        // No title at all falls back to the id
        assert_eq!(results[2].display_title, "a3");
    }

    #[test]
    fn test_parse_search_missing_data_is_empty() {
        assert!(parse_search(r#"{"result": "ok"}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_search_rejects_non_json() {
        match parse_search("<html>rate limited</html>") {
            Err(CatalogError::Decode { context, .. }) => assert_eq!(context, "search"),
            other => panic!("Expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_aggregate_flattens_volumes() {
        let body = r#"{
            "result": "ok",
            "volumes": {
                "1": {"volume": "1", "count": 2, "chapters": {
                    "1": {"chapter": "1", "id": "c1", "others": [], "count": 1},
                    "2": {"chapter": "2", "id": "c2", "others": [], "count": 1}
                }},
                "none": {"volume": "none", "count": 1, "chapters": {
                    "none": {"chapter": "none", "id": "cx", "others": [], "count": 1}
                }}
            }
        }"#;

        let mut chapters = parse_aggregate(body).unwrap();
        chapters.sort_by(|a, b| a.chapter_id.cmp(&b.chapter_id));

        assert_eq!(chapters.len(), 3);
        assert_eq!(chapters[0].chapter_id, "c1");
        assert_eq!(chapters[0].volume.as_deref(), Some("1"));
        assert_eq!(chapters[2].chapter_number, "none");
        assert_eq!(chapters[2].volume, None);
    }

    #[test]
    fn test_parse_aggregate_accepts_empty_list_shapes() {
        assert!(parse_aggregate(r#"{"result": "ok", "volumes": []}"#)
            .unwrap()
            .is_empty());

        let body = r#"{"volumes": {"1": {"volume": "1", "chapters": []}}}"#;
        assert!(parse_aggregate(body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_handshake() {
        let body = r#"{
            "result": "ok",
            "baseUrl": "https://img",
            "chapter": {"hash": "h1", "data": ["x1.png", "x2.png"], "dataSaver": ["x1.jpg"]}
        }"#;

        let handshake = parse_handshake(body).unwrap();
        assert_eq!(handshake.image_base_url, "https://img");
        assert_eq!(handshake.image_hash, "h1");
        assert_eq!(handshake.file_names, vec!["x1.png", "x2.png"]);
    }

    #[test]
    fn test_parse_handshake_missing_base_url() {
        let body = r#"{"result": "error", "chapter": {"hash": "h1", "data": []}}"#;
        match parse_handshake(body) {
            Err(CatalogError::MissingField { field, .. }) => assert_eq!(field, "baseUrl"),
            other => panic!("Expected missing field, got {:?}", other),
        }
    }
}
