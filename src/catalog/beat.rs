//! Backing beats.

use super::{CatalogError, Latency, MockProvider, Record};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub(super) const LATENCY: Latency = Latency {
    get_all: Duration::from_millis(250),
    get_by_id: Duration::from_millis(200),
    filter: Duration::from_millis(300),
    create: Duration::from_millis(400),
    update: Duration::from_millis(350),
    remove: Duration::from_millis(300),
};

/// A drum pattern the beat engine can loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Beat {
    #[serde(rename = "Id")]
    pub id: u32,
    pub name: String,
    pub genre: String,
    /// Tempo applied when the beat is selected.
    #[serde(default)]
    pub default_tempo: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewBeat {
    pub name: String,
    pub genre: String,
    pub default_tempo: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BeatPatch {
    pub name: Option<String>,
    pub genre: Option<String>,
    pub default_tempo: Option<u32>,
}

impl Record for Beat {
    const KIND: &'static str = "Beat";
    type Draft = NewBeat;
    type Patch = BeatPatch;

    fn id(&self) -> u32 {
        self.id
    }

    fn from_draft(id: u32, draft: NewBeat) -> Self {
        Self {
            id,
            name: draft.name,
            genre: draft.genre,
            default_tempo: draft.default_tempo,
        }
    }

    fn apply(&mut self, patch: BeatPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(genre) = patch.genre {
            self.genre = genre;
        }
        if patch.default_tempo.is_some() {
            self.default_tempo = patch.default_tempo;
        }
    }
}

pub type BeatProvider = MockProvider<Beat>;

impl MockProvider<Beat> {
    /// Returns the beats in `genre`.
    pub async fn get_by_genre(&self, genre: &str) -> Result<Vec<Beat>, CatalogError> {
        self.filtered(|b| b.genre == genre).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beats() -> BeatProvider {
        BeatProvider::from_json(
            r#"[
                {"Id": 1, "name": "Boom Bap", "genre": "Hip Hop", "defaultTempo": 90},
                {"Id": 4, "name": "Late Night", "genre": "Hip Hop"},
                {"Id": 2, "name": "Four on the Floor", "genre": "House", "defaultTempo": 124}
            ]"#,
            LATENCY,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_optional_tempo() {
        let beats = beats();
        assert_eq!(beats.records[1].default_tempo, None);
        assert_eq!(beats.records[2].default_tempo, Some(124));
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_by_genre() {
        let beats = beats();
        let start = tokio::time::Instant::now();
        let hip_hop = beats.get_by_genre("Hip Hop").await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(300));
        assert_eq!(
            hip_hop.iter().map(|b| b.id).collect::<Vec<_>>(),
            vec![1, 4]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_uses_max_id_not_count() {
        let mut beats = beats();
        let created = beats
            .create(NewBeat {
                name: "Shuffle".into(),
                genre: "Blues".into(),
                default_tempo: Some(100),
            })
            .await
            .unwrap();
        assert_eq!(created.id, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_and_remove_not_found() {
        let mut beats = beats();
        let err = beats.update(3, BeatPatch::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "Beat with id 3 not found");
        let err = beats.remove(3).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { kind: "Beat", id: 3 }));

        let updated = beats
            .update(
                4,
                BeatPatch {
                    default_tempo: Some(85),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Late Night");
        assert_eq!(updated.default_tempo, Some(85));
    }
}
