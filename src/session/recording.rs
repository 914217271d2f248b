//! Recorded performances.

use super::timer::Ticker;
use std::time::{Duration, Instant};

/// Identifier of a finished recording, unique within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordingId(pub(super) u64);

impl RecordingId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// A note played while recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEvent {
    /// Piano key id, e.g. "E4".
    pub key_id: String,
    /// Sounding note number after transpose.
    pub midi_note: i32,
    /// Sound that was selected when the note was played.
    pub sound_id: Option<u32>,
    /// Time since the recording started.
    pub offset: Duration,
}

/// The recording in progress.
///
/// The one-second clock lives here so that finishing the recording
/// also cancels it.
#[derive(Debug, Clone)]
pub struct RecordingData {
    pub(super) started_at: Instant,
    pub(super) notes: Vec<NoteEvent>,
    pub(super) clock: Ticker,
    pub(super) elapsed_secs: u32,
}

impl RecordingData {
    pub(super) fn start(now: Instant) -> Self {
        Self {
            started_at: now,
            notes: Vec::new(),
            clock: Ticker::start(now, Duration::from_secs(1)),
            elapsed_secs: 0,
        }
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn notes(&self) -> &[NoteEvent] {
        &self.notes
    }

    /// Whole seconds counted by the recording clock.
    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }
}

/// A finished recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recording {
    pub id: RecordingId,
    pub notes: Vec<NoteEvent>,
    /// Wall time between start and stop.
    pub duration: Duration,
    /// Value of the recording clock when it stopped.
    pub clock_secs: u32,
}

/// Formats seconds as "MM:SS" for the recorder display.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Formats seconds as "M:SS" for status messages.
pub fn format_short(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
