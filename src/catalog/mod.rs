//! In-memory catalogs of sounds and beats.
//!
//! The providers behave like a small REST service: every call is async,
//! waits for an artificial latency, and hands back copies of the records.
//! Nothing is persisted; a fresh [`Catalogs`] is seeded from bundled JSON
//! (or an override directory) each time it is opened.

mod beat;
mod sound;

pub use beat::{Beat, BeatPatch, BeatProvider, NewBeat};
pub use sound::{NewSound, Sound, SoundPatch, SoundProvider};

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors returned by catalog providers.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No record with the requested id.
    #[error("{kind} with id {id} not found")]
    NotFound { kind: &'static str, id: u32 },

    /// Every id up to `u32::MAX` is taken.
    #[error("no {kind} id left after {last}")]
    IdsExhausted { kind: &'static str, last: u32 },

    /// A seed file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A seed file is not valid catalog JSON.
    #[error("invalid {what} data: {source}")]
    InvalidData {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A catalog record with a numeric `Id`.
pub trait Record: Clone + DeserializeOwned {
    /// Human-readable kind used in error messages ("Sound", "Beat").
    const KIND: &'static str;
    /// Fields supplied when creating a record (everything but the id).
    type Draft;
    /// Partial update; `None` fields are left unchanged.
    type Patch;

    fn id(&self) -> u32;
    fn from_draft(id: u32, draft: Self::Draft) -> Self;
    fn apply(&mut self, patch: Self::Patch);
}

/// Artificial delay applied to each provider operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Latency {
    pub get_all: Duration,
    pub get_by_id: Duration,
    pub filter: Duration,
    pub create: Duration,
    pub update: Duration,
    pub remove: Duration,
}

impl Latency {
    /// No delay at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Multiplies every delay by `factor` (negative factors count as zero).
    pub fn scaled(self, factor: f32) -> Self {
        let factor = f64::from(factor.max(0.0));
        let scale = |delay: Duration| {
            Duration::from_nanos((delay.as_nanos() as f64 * factor).round() as u64)
        };
        Self {
            get_all: scale(self.get_all),
            get_by_id: scale(self.get_by_id),
            filter: scale(self.filter),
            create: scale(self.create),
            update: scale(self.update),
            remove: scale(self.remove),
        }
    }
}

async fn simulate(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// A mock data provider holding records of one kind.
#[derive(Debug, Clone)]
pub struct MockProvider<T: Record> {
    records: Vec<T>,
    latency: Latency,
}

impl<T: Record> MockProvider<T> {
    /// Creates a provider seeded with `records`.
    pub fn new(records: Vec<T>, latency: Latency) -> Self {
        Self { records, latency }
    }

    /// Parses a JSON array of records.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidData`] if the JSON does not describe records
    pub fn from_json(json: &str, latency: Latency) -> Result<Self, CatalogError> {
        let records = serde_json::from_str(json).map_err(|source| CatalogError::InvalidData {
            what: T::KIND,
            source,
        })?;
        Ok(Self::new(records, latency))
    }

    fn not_found(id: u32) -> CatalogError {
        CatalogError::NotFound { kind: T::KIND, id }
    }

    fn position(&self, id: u32) -> Result<usize, CatalogError> {
        self.records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| Self::not_found(id))
    }

    /// Returns a snapshot of every record.
    pub async fn get_all(&self) -> Result<Vec<T>, CatalogError> {
        simulate(self.latency.get_all).await;
        tracing::debug!(kind = T::KIND, count = self.records.len(), "get_all");
        Ok(self.records.clone())
    }

    /// Returns the record with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] when no record matches
    pub async fn get_by_id(&self, id: u32) -> Result<T, CatalogError> {
        simulate(self.latency.get_by_id).await;
        self.records
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    /// Returns copies of the records matching `predicate`.
    async fn filtered(&self, predicate: impl Fn(&T) -> bool) -> Result<Vec<T>, CatalogError> {
        simulate(self.latency.filter).await;
        Ok(self.records.iter().filter(|r| predicate(r)).cloned().collect())
    }

    /// Appends a new record with id `max(existing) + 1`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::IdsExhausted`] when the largest id is `u32::MAX`
    pub async fn create(&mut self, draft: T::Draft) -> Result<T, CatalogError> {
        simulate(self.latency.create).await;
        let last = self.records.iter().map(Record::id).max().unwrap_or(0);
        let id = last
            .checked_add(1)
            .ok_or(CatalogError::IdsExhausted { kind: T::KIND, last })?;
        let record = T::from_draft(id, draft);
        self.records.push(record.clone());
        tracing::debug!(kind = T::KIND, id, "created record");
        Ok(record)
    }

    /// Merges `patch` into the record with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] when no record matches
    pub async fn update(&mut self, id: u32, patch: T::Patch) -> Result<T, CatalogError> {
        simulate(self.latency.update).await;
        let index = self.position(id)?;
        self.records[index].apply(patch);
        tracing::debug!(kind = T::KIND, id, "updated record");
        Ok(self.records[index].clone())
    }

    /// Deletes the record with `id` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] when no record matches
    pub async fn remove(&mut self, id: u32) -> Result<T, CatalogError> {
        simulate(self.latency.remove).await;
        let index = self.position(id)?;
        tracing::debug!(kind = T::KIND, id, "removed record");
        Ok(self.records.remove(index))
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Where catalog seed data comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CatalogSource {
    /// JSON compiled into the binary.
    #[default]
    Bundled,
    /// A directory containing `sounds.json` and `beats.json`.
    Directory(PathBuf),
}

const BUNDLED_SOUNDS: &str = include_str!("data/sounds.json");
const BUNDLED_BEATS: &str = include_str!("data/beats.json");

fn read_seed(dir: &Path, file: &str) -> Result<String, CatalogError> {
    let path = dir.join(file);
    fs::read_to_string(&path).map_err(|source| CatalogError::Io { path, source })
}

/// The sound and beat providers used by the studio.
#[derive(Debug, Clone)]
pub struct Catalogs {
    pub sounds: SoundProvider,
    pub beats: BeatProvider,
    source: CatalogSource,
    latency_scale: f32,
}

impl Catalogs {
    /// Seeds fresh providers from `source`, scaling the default latencies.
    ///
    /// Opening again discards every change made to a previous instance.
    ///
    /// # Errors
    ///
    /// Returns an error if a seed file cannot be read or parsed
    pub fn open(source: &CatalogSource, latency_scale: f32) -> Result<Self, CatalogError> {
        let (sounds_json, beats_json) = match source {
            CatalogSource::Bundled => (BUNDLED_SOUNDS.to_string(), BUNDLED_BEATS.to_string()),
            CatalogSource::Directory(dir) => {
                (read_seed(dir, "sounds.json")?, read_seed(dir, "beats.json")?)
            }
        };

        let sounds =
            SoundProvider::from_json(&sounds_json, sound::LATENCY.scaled(latency_scale))?;
        let beats = BeatProvider::from_json(&beats_json, beat::LATENCY.scaled(latency_scale))?;
        tracing::info!(
            sounds = sounds.len(),
            beats = beats.len(),
            ?source,
            "catalogs opened"
        );
        Ok(Self {
            sounds,
            beats,
            source: source.clone(),
            latency_scale,
        })
    }

    /// Reseeds both providers from the source they were opened with.
    ///
    /// On error the current providers are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if a seed file cannot be read or parsed
    pub fn reset(&mut self) -> Result<(), CatalogError> {
        *self = Self::open(&self.source, self.latency_scale)?;
        Ok(())
    }

    /// Fetches both catalogs concurrently.
    pub async fn load_all(&self) -> Result<(Vec<Sound>, Vec<Beat>), CatalogError> {
        tokio::try_join!(self.sounds.get_all(), self.beats.get_all())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latency_scaling() {
        let latency = sound::LATENCY.scaled(0.5);
        assert_eq!(latency.get_all, Duration::from_millis(150));
        assert_eq!(sound::LATENCY.scaled(0.0), Latency::none());
        assert_eq!(sound::LATENCY.scaled(-2.0), Latency::none());
    }

    #[test]
    fn test_bundled_catalogs_open() {
        let catalogs = Catalogs::open(&CatalogSource::Bundled, 0.0).unwrap();
        assert!(!catalogs.sounds.is_empty());
        assert!(!catalogs.beats.is_empty());
    }

    #[test]
    fn test_directory_source_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = Catalogs::open(&CatalogSource::Directory(dir.path().to_path_buf()), 0.0);
        assert!(matches!(missing, Err(CatalogError::Io { .. })));

        fs::write(dir.path().join("sounds.json"), "[]").unwrap();
        fs::write(dir.path().join("beats.json"), "{ not json").unwrap();
        let invalid = Catalogs::open(&CatalogSource::Directory(dir.path().to_path_buf()), 0.0);
        assert!(matches!(
            invalid,
            Err(CatalogError::InvalidData { what: "Beat", .. })
        ));
    }

    #[tokio::test]
    async fn test_create_refuses_to_wrap_ids() {
        let json = r#"[{"Id": 4294967295, "name": "Edge", "category": "piano", "icon": "x", "description": ""}]"#;
        let mut sounds = SoundProvider::from_json(json, Latency::none()).unwrap();
        let err = sounds.create(NewSound::default()).await.unwrap_err();
        assert!(matches!(
            err,
            CatalogError::IdsExhausted { kind: "Sound", last: u32::MAX }
        ));
        assert_eq!(sounds.len(), 1);
    }

    #[tokio::test]
    async fn test_reset_discards_changes() {
        let mut catalogs = Catalogs::open(&CatalogSource::Bundled, 0.0).unwrap();
        let before = catalogs.sounds.len();
        let first = catalogs.sounds.get_all().await.unwrap()[0].id;
        catalogs.sounds.remove(first).await.unwrap();
        assert_eq!(catalogs.sounds.len(), before - 1);

        catalogs.reset().unwrap();
        assert_eq!(catalogs.sounds.len(), before);
        assert!(catalogs.sounds.get_by_id(first).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_all_runs_concurrently() {
        let catalogs = Catalogs::open(&CatalogSource::Bundled, 1.0).unwrap();
        let start = tokio::time::Instant::now();
        let (sounds, beats) = catalogs.load_all().await.unwrap();
        let elapsed = start.elapsed();
        assert_eq!(sounds.len(), catalogs.sounds.len());
        assert_eq!(beats.len(), catalogs.beats.len());
        // Both requests overlap: total wait is the slower of the two.
        assert!(elapsed >= Duration::from_millis(300));
        assert!(elapsed < Duration::from_millis(550));
    }
}
