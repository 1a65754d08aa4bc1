//! Raw store join shape and the flattened `PatternRecord` view-model.

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::UNKNOWN_WORD;

/// One voicing as returned by the joined read query.
///
/// Nested relations are optional on the wire: `layer` may be null and the
/// `essences`/`images` arrays may be null or missing entirely. Text columns
/// that come back null read as empty strings, so one bad row never sinks
/// the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawVoicingJoin {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    pub created_at: String,
    #[serde(default)]
    pub layer: Option<RawLayer>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub essences: Vec<RawEssence>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLayer {
    #[serde(default, deserialize_with = "null_as_default")]
    pub word: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEssence {
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<RawImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawImage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Flattened, denormalized view of one voicing.
///
/// Only ever produced by a fetch and never written back; deleting one
/// deletes the underlying voicing row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRecord {
    pub id: String,
    pub word: String,
    pub voicing: String,
    pub essence: String,
    pub image_url: String,
    pub created_at: String,
}

impl From<RawVoicingJoin> for PatternRecord {
    /// Picks the first essence and the first image of that essence.
    ///
    /// Missing or empty relations resolve to `"Unknown"` for the word and to
    /// empty strings for essence and image; this never fails.
    fn from(raw: RawVoicingJoin) -> Self {
        let word = raw
            .layer
            .map(|layer| layer.word)
            .filter(|word| !word.is_empty())
            .unwrap_or_else(|| UNKNOWN_WORD.to_owned());

        let (essence, image_url) = match raw.essences.into_iter().next() {
            Some(first) => {
                let image_url =
                    first.images.into_iter().next().map(|img| img.image_url).unwrap_or_default();
                (first.content, image_url)
            },
            None => (String::new(), String::new()),
        };

        Self {
            id: raw.id,
            word,
            voicing: raw.content,
            essence,
            image_url,
            created_at: raw.created_at,
        }
    }
}

/// Flatten a batch of joined rows, preserving store order.
pub fn flatten_voicings(rows: Vec<RawVoicingJoin>) -> Vec<PatternRecord> {
    rows.into_iter().map(PatternRecord::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, layer: Option<&str>, essences: Vec<RawEssence>) -> RawVoicingJoin {
        RawVoicingJoin {
            id: id.to_owned(),
            content: format!("voicing {id}"),
            created_at: "2024-01-01T00:00:00Z".to_owned(),
            layer: layer.map(|w| RawLayer { word: w.to_owned() }),
            essences,
        }
    }

    fn essence(content: &str, images: &[&str]) -> RawEssence {
        RawEssence {
            content: content.to_owned(),
            images: images.iter().map(|u| RawImage { image_url: (*u).to_owned() }).collect(),
        }
    }

    #[test]
    fn test_bare_voicing_flattens_to_fallbacks() {
        let row: RawVoicingJoin = serde_json::from_value(serde_json::json!({
            "id": "v1",
            "content": "hums quietly",
            "created_at": "2024-01-01T00:00:00Z",
            "layer": null,
            "essences": []
        }))
        .unwrap();

        assert_eq!(
            PatternRecord::from(row),
            PatternRecord {
                id: "v1".to_owned(),
                word: "Unknown".to_owned(),
                voicing: "hums quietly".to_owned(),
                essence: String::new(),
                image_url: String::new(),
                created_at: "2024-01-01T00:00:00Z".to_owned(),
            }
        );
    }

    #[test]
    fn test_full_join_uses_nested_values() {
        let row: RawVoicingJoin = serde_json::from_value(serde_json::json!({
            "id": "v2",
            "content": "rushes downhill",
            "created_at": "2024-02-01T00:00:00Z",
            "layer": { "word": "river" },
            "essences": [
                { "content": "flowing calm", "images": [{ "image_url": "http://x/img.png" }] }
            ]
        }))
        .unwrap();

        let record = PatternRecord::from(row);
        assert_eq!(record.word, "river");
        assert_eq!(record.essence, "flowing calm");
        assert_eq!(record.image_url, "http://x/img.png");
        assert_eq!(record.voicing, "rushes downhill");
    }

    #[test]
    fn test_only_first_essence_and_first_image_are_used() {
        let row = raw(
            "v3",
            Some("stone"),
            vec![
                essence("first", &["http://x/1.png", "http://x/2.png"]),
                essence("second", &["http://x/3.png"]),
            ],
        );
        let record = PatternRecord::from(row);
        assert_eq!(record.essence, "first");
        assert_eq!(record.image_url, "http://x/1.png");
    }

    #[test]
    fn test_first_essence_without_images_yields_empty_url() {
        let row = raw("v4", Some("stone"), vec![essence("bare", &[]), essence("x", &["u"])]);
        let record = PatternRecord::from(row);
        assert_eq!(record.essence, "bare");
        assert_eq!(record.image_url, "");
    }

    #[test]
    fn test_missing_and_null_relations_deserialize_as_empty() {
        let rows: Vec<RawVoicingJoin> = serde_json::from_value(serde_json::json!([
            { "id": "a", "content": "c", "created_at": "t" },
            { "id": "b", "content": "c", "created_at": "t", "essences": null },
            { "id": "c", "content": "c", "created_at": "t",
              "essences": [{ "content": "e", "images": null }] }
        ]))
        .unwrap();

        let records = flatten_voicings(rows);
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.word == UNKNOWN_WORD));
        assert_eq!(records[0].essence, "");
        assert_eq!(records[1].essence, "");
        assert_eq!(records[2].essence, "e");
        assert_eq!(records[2].image_url, "");
    }

    #[test]
    fn test_null_nested_text_does_not_sink_the_batch() {
        let rows: Vec<RawVoicingJoin> = serde_json::from_value(serde_json::json!([
            { "id": "ok", "content": "c", "created_at": "t", "layer": { "word": "river" } },
            { "id": "w", "content": "c", "created_at": "t", "layer": { "word": null } },
            { "id": "e", "content": "c", "created_at": "t",
              "essences": [{ "content": null, "images": [] }] },
            { "id": "i", "content": "c", "created_at": "t",
              "essences": [{ "content": "e", "images": [{ "image_url": null }] }] },
            { "id": "v", "content": null, "created_at": "t" }
        ]))
        .unwrap();

        let records = flatten_voicings(rows);
        assert_eq!(records.len(), 5);
        assert_eq!(records[0].word, "river");
        assert_eq!(records[1].word, UNKNOWN_WORD);
        assert_eq!(records[2].essence, "");
        assert_eq!(records[3].essence, "e");
        assert_eq!(records[3].image_url, "");
        assert_eq!(records[4].voicing, "");
    }

    #[test]
    fn test_empty_word_falls_back_to_unknown() {
        let record = PatternRecord::from(raw("v5", Some(""), vec![]));
        assert_eq!(record.word, UNKNOWN_WORD);
    }

    #[test]
    fn test_flatten_preserves_store_order() {
        let rows = vec![raw("newest", None, vec![]), raw("older", None, vec![]), raw("oldest", None, vec![])];
        let ids: Vec<String> = flatten_voicings(rows).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["newest", "older", "oldest"]);
    }
}
