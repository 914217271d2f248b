//! Instrument sounds.

use super::{CatalogError, Latency, MockProvider, Record};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default delays for the sound provider.
pub(super) const LATENCY: Latency = Latency {
    get_all: Duration::from_millis(300),
    get_by_id: Duration::from_millis(200),
    filter: Duration::from_millis(250),
    create: Duration::from_millis(400),
    update: Duration::from_millis(350),
    remove: Duration::from_millis(300),
};

/// An instrument the keyboard can play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sound {
    #[serde(rename = "Id")]
    pub id: u32,
    pub name: String,
    /// Grouping shown in the sound library ("piano", "synth", ...).
    pub category: String,
    pub icon: String,
    pub description: String,
}

/// Fields for a new sound.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewSound {
    pub name: String,
    pub category: String,
    pub icon: String,
    pub description: String,
}

/// Partial update of a sound.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SoundPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
}

impl Record for Sound {
    const KIND: &'static str = "Sound";
    type Draft = NewSound;
    type Patch = SoundPatch;

    fn id(&self) -> u32 {
        self.id
    }

    fn from_draft(id: u32, draft: NewSound) -> Self {
        Self {
            id,
            name: draft.name,
            category: draft.category,
            icon: draft.icon,
            description: draft.description,
        }
    }

    fn apply(&mut self, patch: SoundPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(icon) = patch.icon {
            self.icon = icon;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
    }
}

pub type SoundProvider = MockProvider<Sound>;

impl MockProvider<Sound> {
    /// Returns the sounds in `category`.
    pub async fn get_by_category(&self, category: &str) -> Result<Vec<Sound>, CatalogError> {
        self.filtered(|s| s.category == category).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogSource, Catalogs};

    fn provider() -> SoundProvider {
        Catalogs::open(&CatalogSource::Bundled, 1.0).unwrap().sounds
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_by_id_not_found() {
        let sounds = provider();
        let err = sounds.get_by_id(9999).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { kind: "Sound", id: 9999 }));
        assert_eq!(err.to_string(), "Sound with id 9999 not found");
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_all_returns_snapshots() {
        let sounds = provider();
        let first = sounds.get_all().await.unwrap();
        let second = sounds.get_all().await.unwrap();
        assert_eq!(first, second);
        assert!(first.iter().any(|s| s.name == "Concert Grand"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_all_waits_for_latency() {
        let sounds = provider();
        let start = tokio::time::Instant::now();
        sounds.get_all().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_assigns_next_id() {
        let mut sounds = provider();
        let max = sounds.get_all().await.unwrap().iter().map(|s| s.id).max().unwrap();
        let created = sounds
            .create(NewSound {
                name: "Glass Harp".into(),
                category: "synth".into(),
                icon: "Sparkles".into(),
                description: "Bowed glass".into(),
            })
            .await
            .unwrap();
        assert_eq!(created.id, max + 1);
        assert_eq!(sounds.get_by_id(max + 1).await.unwrap(), created);
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_in_empty_provider_starts_at_one() {
        let mut sounds = SoundProvider::new(Vec::new(), Latency::none());
        let created = sounds.create(NewSound::default()).await.unwrap();
        assert_eq!(created.id, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_merges_fields() {
        let mut sounds = provider();
        let before = sounds.get_by_id(1).await.unwrap();
        let after = sounds
            .update(
                1,
                SoundPatch {
                    description: Some("Retuned".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(after.name, before.name);
        assert_eq!(after.description, "Retuned");

        let missing = sounds.update(4242, SoundPatch::default()).await;
        assert!(matches!(missing, Err(CatalogError::NotFound { id: 4242, .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove() {
        let mut sounds = provider();
        let count = sounds.len();
        let removed = sounds.remove(2).await.unwrap();
        assert_eq!(removed.id, 2);
        assert_eq!(sounds.len(), count - 1);
        assert!(sounds.remove(2).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_by_category() {
        let sounds = provider();
        let pianos = sounds.get_by_category("piano").await.unwrap();
        assert!(!pianos.is_empty());
        assert!(pianos.iter().all(|s| s.category == "piano"));
        assert!(sounds.get_by_category("kazoo").await.unwrap().is_empty());
    }
}
