//! Studio session state.
//!
//! [`Session`] holds everything the studio screen shows and changes it in
//! response to discrete events: key presses, button presses, and timer
//! ticks. It never renders and never blocks. Time is passed in as an
//! [`Instant`] so every transition can be driven deterministically.
//!
//! Timers are owned by the state they belong to:
//! - the recording clock lives inside the in-progress [`RecordingData`]
//! - the beat clock exists only while a beat is playing
//! - the playback deadline exists only while a recording is playing
//!
//! Turning a feature off drops its timer, so a late tick cannot be seen.

pub mod chords;
pub mod effects;
pub mod recording;
pub mod timer;

use crate::catalog::{Beat, Sound};
use crate::keys::{name_to_note, KeyboardMapping, LayoutId};
use chords::{ChordDisplay, ChordSuggester};
use effects::Effects;
use recording::{NoteEvent, Recording, RecordingData, RecordingId};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};
use thiserror::Error;
use timer::{Deadline, Ticker};

/// Tempo bounds of the beat engine.
pub const MIN_TEMPO: u32 = 60;
pub const MAX_TEMPO: u32 = 180;
/// Tempo used when a beat has no default.
pub const DEFAULT_TEMPO: u32 = 120;

/// Base octave bounds for the computer keyboard.
pub const MIN_OCTAVE: i32 = 1;
pub const MAX_OCTAVE: i32 = 7;
pub const DEFAULT_OCTAVE: i32 = 4;

/// Transpose bounds in semitones.
pub const MAX_TRANSPOSE: i32 = 12;

/// How long a recording plays back before stopping on its own.
pub const PLAYBACK_LENGTH: Duration = Duration::from_secs(3);

/// Beats per bar of the visual beat indicator.
pub const BEATS_PER_BAR: u8 = 4;

/// Name of the sound picked after loading, if present.
pub const PREFERRED_SOUND: &str = "Concert Grand";

/// A user action that could not run because something is missing.
///
/// These are shown as warnings; they never leave the studio in a broken state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Precondition {
    #[error("Select an instrument first")]
    NoSoundSelected,
    #[error("Select a beat first")]
    NoBeatSelected,
    #[error("Record something first")]
    NoRecording,
    #[error("Stop recording first")]
    RecordingInProgress,
    #[error("Not a piano key")]
    UnknownKey,
}

/// Progress of the initial catalog load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

/// What happened during a call to [`Session::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Seconds added to the recording clock.
    pub recording_secs: u32,
    /// Beats advanced by the beat clock.
    pub beats: u32,
    /// Recording playback ran out.
    pub playback_finished: bool,
}

/// The state of one studio session.
pub struct Session {
    load_state: LoadState,
    sounds: Vec<Sound>,
    beats: Vec<Beat>,

    selected_sound: Option<Sound>,
    selected_beat: Option<Beat>,
    tempo: u32,
    /// Present only while the beat plays.
    beat_clock: Option<Ticker>,
    current_beat: u8,

    layout: LayoutId,
    octave: i32,
    transpose: i32,
    mapping: KeyboardMapping,
    active_keys: BTreeSet<String>,
    chords: ChordDisplay,
    suggester: Box<dyn ChordSuggester>,

    /// Present only while recording.
    recording: Option<RecordingData>,
    recordings: Vec<Recording>,
    next_recording_id: u64,
    /// Present only while a recording plays back.
    playback: Option<Deadline>,

    effects: Effects,
}

impl Session {
    /// Creates an empty session using `layout` at the default octave.
    pub fn new(layout: LayoutId, suggester: Box<dyn ChordSuggester>) -> Self {
        Self {
            load_state: LoadState::Loading,
            sounds: Vec::new(),
            beats: Vec::new(),
            selected_sound: None,
            selected_beat: None,
            tempo: DEFAULT_TEMPO,
            beat_clock: None,
            current_beat: 0,
            layout,
            octave: DEFAULT_OCTAVE,
            transpose: 0,
            mapping: KeyboardMapping::new(layout.layout(), DEFAULT_OCTAVE),
            active_keys: BTreeSet::new(),
            chords: ChordDisplay::default(),
            suggester,
            recording: None,
            recordings: Vec::new(),
            next_recording_id: 1,
            playback: None,
            effects: Effects::default(),
        }
    }

    // ==================== Loading ====================

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// Marks the catalogs as loading again (before a reload).
    pub fn begin_loading(&mut self) {
        self.load_state = LoadState::Loading;
    }

    /// Installs freshly loaded catalogs and picks the default sound.
    ///
    /// Selections that no longer exist in the new catalogs are dropped.
    pub fn finish_loading(&mut self, sounds: Vec<Sound>, beats: Vec<Beat>) {
        self.selected_sound = sounds
            .iter()
            .find(|s| s.name == PREFERRED_SOUND)
            .or_else(|| sounds.first())
            .cloned();
        if let Some(beat) = &self.selected_beat {
            if !beats.iter().any(|b| b.id == beat.id) {
                self.selected_beat = None;
                self.stop_beat();
            }
        }
        self.sounds = sounds;
        self.beats = beats;
        self.load_state = LoadState::Ready;
    }

    /// Records a failed load; the studio shows an error until reloaded.
    pub fn fail_loading(&mut self, message: impl Into<String>) {
        self.load_state = LoadState::Failed(message.into());
    }

    pub fn sounds(&self) -> &[Sound] {
        &self.sounds
    }

    pub fn beats(&self) -> &[Beat] {
        &self.beats
    }

    // ==================== Sound & beat selection ====================

    pub fn selected_sound(&self) -> Option<&Sound> {
        self.selected_sound.as_ref()
    }

    pub fn select_sound(&mut self, sound: Sound) {
        tracing::info!(sound = %sound.name, "sound selected");
        self.selected_sound = Some(sound);
    }

    pub fn selected_beat(&self) -> Option<&Beat> {
        self.selected_beat.as_ref()
    }

    /// Selects a beat (adopting its default tempo) or clears the selection.
    ///
    /// Clearing the selection stops a playing beat.
    pub fn select_beat(&mut self, beat: Option<Beat>, now: Instant) {
        match beat {
            Some(beat) => {
                tracing::info!(beat = %beat.name, "beat selected");
                let tempo = beat.default_tempo.unwrap_or(DEFAULT_TEMPO);
                self.selected_beat = Some(beat);
                self.set_tempo(tempo, now);
            }
            None => {
                self.selected_beat = None;
                self.stop_beat();
            }
        }
    }

    // ==================== Beat engine ====================

    pub fn tempo(&self) -> u32 {
        self.tempo
    }

    /// Sets the tempo, clamped to the beat engine's range.
    ///
    /// A playing beat restarts its clock at the new period.
    pub fn set_tempo(&mut self, bpm: u32, now: Instant) {
        self.tempo = bpm.clamp(MIN_TEMPO, MAX_TEMPO);
        if self.beat_clock.is_some() {
            self.beat_clock = Some(Ticker::start(now, self.beat_period()));
        }
    }

    fn beat_period(&self) -> Duration {
        Duration::from_secs_f64(60.0 / f64::from(self.tempo))
    }

    pub fn is_beat_playing(&self) -> bool {
        self.beat_clock.is_some()
    }

    /// Beat within the bar (0..4), advanced while the beat plays.
    pub fn current_beat(&self) -> u8 {
        self.current_beat
    }

    /// Starts or stops the selected beat.
    ///
    /// # Returns
    ///
    /// Whether the beat is playing afterwards
    ///
    /// # Errors
    ///
    /// [`Precondition::NoBeatSelected`] if there is no beat to play
    pub fn toggle_beat(&mut self, now: Instant) -> Result<bool, Precondition> {
        if self.selected_beat.is_none() {
            return Err(Precondition::NoBeatSelected);
        }
        if self.beat_clock.is_some() {
            self.stop_beat();
        } else {
            self.beat_clock = Some(Ticker::start(now, self.beat_period()));
            self.current_beat = 0;
        }
        Ok(self.is_beat_playing())
    }

    fn stop_beat(&mut self) {
        self.beat_clock = None;
        self.current_beat = 0;
    }

    // ==================== Keyboard ====================

    pub fn layout(&self) -> LayoutId {
        self.layout
    }

    /// Switches the computer keyboard layout.
    pub fn set_layout(&mut self, layout: LayoutId) {
        self.layout = layout;
        self.rebuild_mapping();
    }

    pub fn octave(&self) -> i32 {
        self.octave
    }

    /// Sets the base octave, clamped to 1..=7.
    ///
    /// Held keys are released because their physical keys now play other notes.
    pub fn set_octave(&mut self, octave: i32) -> i32 {
        let octave = octave.clamp(MIN_OCTAVE, MAX_OCTAVE);
        if octave != self.octave {
            self.octave = octave;
            self.rebuild_mapping();
        }
        self.octave
    }

    pub fn shift_octave(&mut self, delta: i32) -> i32 {
        self.set_octave(self.octave + delta)
    }

    fn rebuild_mapping(&mut self) {
        self.mapping = KeyboardMapping::new(self.layout.layout(), self.octave);
        self.release_all_keys();
    }

    pub fn mapping(&self) -> &KeyboardMapping {
        &self.mapping
    }

    pub fn transpose(&self) -> i32 {
        self.transpose
    }

    pub fn set_transpose(&mut self, semitones: i32) -> i32 {
        self.transpose = semitones.clamp(-MAX_TRANSPOSE, MAX_TRANSPOSE);
        self.transpose
    }

    pub fn active_keys(&self) -> impl Iterator<Item = &str> {
        self.active_keys.iter().map(String::as_str)
    }

    pub fn is_key_active(&self, key_id: &str) -> bool {
        self.active_keys.contains(key_id)
    }

    pub fn active_key_count(&self) -> usize {
        self.active_keys.len()
    }

    pub fn chords(&self) -> &ChordDisplay {
        &self.chords
    }

    /// Presses a piano key.
    ///
    /// Pressing a key that is already down leaves the set unchanged.
    /// While recording, a newly pressed key is logged with its offset.
    ///
    /// # Returns
    ///
    /// Whether the key was newly activated
    ///
    /// # Errors
    ///
    /// [`Precondition::NoSoundSelected`] if no instrument is selected,
    /// [`Precondition::UnknownKey`] if `key_id` is not a note name like "C#4"
    pub fn press_key(&mut self, key_id: &str, now: Instant) -> Result<bool, Precondition> {
        if self.selected_sound.is_none() {
            return Err(Precondition::NoSoundSelected);
        }
        let note = name_to_note(key_id).ok_or(Precondition::UnknownKey)?;
        if !self.active_keys.insert(key_id.to_string()) {
            return Ok(false);
        }

        if let Some(recording) = &mut self.recording {
            let midi_note = note + self.transpose;
            recording.notes.push(NoteEvent {
                key_id: key_id.to_string(),
                midi_note,
                sound_id: self.selected_sound.as_ref().map(|s| s.id),
                offset: now.saturating_duration_since(recording.started_at),
            });
        }

        self.update_chords();
        Ok(true)
    }

    /// Releases a piano key. Returns whether it was held.
    pub fn release_key(&mut self, key_id: &str) -> bool {
        let released = self.active_keys.remove(key_id);
        if released {
            self.update_chords();
        }
        released
    }

    pub fn release_all_keys(&mut self) {
        self.active_keys.clear();
        self.chords = ChordDisplay::default();
    }

    fn update_chords(&mut self) {
        if self.active_keys.len() >= 2 {
            let active: Vec<&str> = self.active_keys.iter().map(String::as_str).collect();
            self.chords = self.suggester.suggest(&active);
        } else {
            self.chords = ChordDisplay::default();
        }
    }

    // ==================== Recording ====================

    pub fn is_recording(&self) -> bool {
        self.recording.is_some()
    }

    /// The recording in progress, if any.
    pub fn recording_data(&self) -> Option<&RecordingData> {
        self.recording.as_ref()
    }

    pub fn recordings(&self) -> &[Recording] {
        &self.recordings
    }

    pub fn has_recording(&self) -> bool {
        !self.recordings.is_empty()
    }

    /// Seconds shown on the recorder: the running clock, else the last take.
    pub fn recording_time(&self) -> u32 {
        match &self.recording {
            Some(data) => data.elapsed_secs,
            None => self.recordings.last().map_or(0, |r| r.clock_secs),
        }
    }

    /// Starts recording with an empty note log and the clock at zero.
    ///
    /// # Returns
    ///
    /// false if a recording was already running (nothing changes)
    ///
    /// # Errors
    ///
    /// [`Precondition::NoSoundSelected`] if no instrument is selected
    pub fn start_recording(&mut self, now: Instant) -> Result<bool, Precondition> {
        if self.recording.is_some() {
            return Ok(false);
        }
        if self.selected_sound.is_none() {
            return Err(Precondition::NoSoundSelected);
        }
        self.playback = None;
        self.recording = Some(RecordingData::start(now));
        tracing::info!("recording started");
        Ok(true)
    }

    /// Finishes the recording in progress and appends it to the list.
    ///
    /// Returns None when nothing was being recorded.
    pub fn stop_recording(&mut self, now: Instant) -> Option<&Recording> {
        let data = self.recording.take()?;
        let id = RecordingId(self.next_recording_id);
        self.next_recording_id += 1;

        tracing::info!(
            id = id.as_u64(),
            notes = data.notes.len(),
            secs = data.elapsed_secs,
            "recording saved"
        );
        self.recordings.push(Recording {
            id,
            duration: now.saturating_duration_since(data.started_at),
            clock_secs: data.elapsed_secs,
            notes: data.notes,
        });
        self.recordings.last()
    }

    /// Deletes a finished recording.
    pub fn delete_recording(&mut self, id: RecordingId) -> Option<Recording> {
        let index = self.recordings.iter().position(|r| r.id == id)?;
        if self.recordings.len() == 1 {
            self.playback = None;
        }
        Some(self.recordings.remove(index))
    }

    pub fn is_playing_recording(&self) -> bool {
        self.playback.is_some()
    }

    /// Starts or stops playback of the latest recording.
    ///
    /// Playback stops by itself after [`PLAYBACK_LENGTH`].
    ///
    /// # Errors
    ///
    /// Fails while recording or when nothing has been recorded
    pub fn toggle_recording_playback(&mut self, now: Instant) -> Result<bool, Precondition> {
        self.check_can_use_recording()?;
        if self.playback.take().is_none() {
            self.playback = Some(Deadline::after(now, PLAYBACK_LENGTH));
        }
        Ok(self.is_playing_recording())
    }

    /// Simulated export of the latest recording.
    ///
    /// # Errors
    ///
    /// Fails while recording or when nothing has been recorded
    pub fn export_recording(&self) -> Result<&Recording, Precondition> {
        self.check_can_use_recording()?;
        let recording = self.recordings.last().ok_or(Precondition::NoRecording)?;
        tracing::info!(id = recording.id.as_u64(), "recording exported");
        Ok(recording)
    }

    fn check_can_use_recording(&self) -> Result<(), Precondition> {
        if self.recording.is_some() {
            Err(Precondition::RecordingInProgress)
        } else if self.recordings.is_empty() {
            Err(Precondition::NoRecording)
        } else {
            Ok(())
        }
    }

    // ==================== Effects ====================

    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut Effects {
        &mut self.effects
    }

    pub fn reset_effects(&mut self) {
        self.effects = Effects::default();
    }

    // ==================== Timers ====================

    /// Advances every live timer to `now`.
    pub fn tick(&mut self, now: Instant) -> TickReport {
        let mut report = TickReport::default();

        if let Some(recording) = &mut self.recording {
            report.recording_secs = recording.clock.poll(now);
            recording.elapsed_secs += report.recording_secs;
        }

        if let Some(clock) = &mut self.beat_clock {
            report.beats = clock.poll(now);
            self.current_beat =
                ((u32::from(self.current_beat) + report.beats) % u32::from(BEATS_PER_BAR)) as u8;
        }

        if self.playback.is_some_and(|deadline| deadline.expired(now)) {
            self.playback = None;
            report.playback_finished = true;
        }

        report
    }
}
