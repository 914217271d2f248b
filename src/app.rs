//! Application state and input handling.
//!
//! This module defines the application state that coordinates between the
//! studio session, the mock catalogs, the theme store, and the TUI.
//! Session results come back as values; the app turns them into toasts.

use crate::catalog::{CatalogError, CatalogSource, Catalogs, Sound};
use crate::keys::{generate_keys, LayoutId, PianoKey};
use crate::session::effects::EffectParam;
use crate::session::recording::format_short;
use crate::session::{LoadState, Precondition, Session};
use crate::theme::{get_theme, themes, Theme, ThemeStore};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// How long a toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Hold time after the first press before a key is released when the
/// terminal cannot report key releases. Longer than typical auto-repeat
/// delays (500-660 ms) so the first repeat lands while the key is held.
pub const AUTO_RELEASE_AFTER: Duration = Duration::from_millis(700);

/// Hold time after each auto-repeat press.
pub const REPEAT_RELEASE_AFTER: Duration = Duration::from_millis(100);

/// Tempo change per Left/Right press in the beat panel.
pub const TEMPO_STEP: u32 = 2;

/// Effect change per Left/Right press in the effects panel.
pub const EFFECT_STEP: i32 = 5;

/// Panels that can receive focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusedPanel {
    #[default]
    Keyboard,
    Sounds,
    Beats,
    Effects,
    Recorder,
}

impl FocusedPanel {
    pub fn next(self) -> Self {
        match self {
            FocusedPanel::Keyboard => FocusedPanel::Sounds,
            FocusedPanel::Sounds => FocusedPanel::Beats,
            FocusedPanel::Beats => FocusedPanel::Effects,
            FocusedPanel::Effects => FocusedPanel::Recorder,
            FocusedPanel::Recorder => FocusedPanel::Keyboard,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            FocusedPanel::Keyboard => FocusedPanel::Recorder,
            FocusedPanel::Sounds => FocusedPanel::Keyboard,
            FocusedPanel::Beats => FocusedPanel::Sounds,
            FocusedPanel::Effects => FocusedPanel::Beats,
            FocusedPanel::Recorder => FocusedPanel::Effects,
        }
    }
}

/// Severity of a toast, picks its colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    pub shown_at: Instant,
}

/// Startup options that are not part of the session itself.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub catalog_source: CatalogSource,
    /// Multiplier for the simulated catalog latency (0 disables it).
    pub latency_scale: f32,
    /// Octaves drawn on the piano.
    pub octave_range: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_source: CatalogSource::Bundled,
            latency_scale: 1.0,
            octave_range: 7,
        }
    }
}

/// A computer key currently holding a piano key down.
#[derive(Debug, Clone)]
struct HeldKey {
    key_id: String,
    last_seen: Instant,
    repeating: bool,
}

impl HeldKey {
    fn expired(&self, now: Instant) -> bool {
        let window = if self.repeating {
            REPEAT_RELEASE_AFTER
        } else {
            AUTO_RELEASE_AFTER
        };
        now.saturating_duration_since(self.last_seen) >= window
    }
}

/// Main application state.
pub struct App {
    /// Studio state.
    pub session: Session,
    catalogs: Option<Catalogs>,
    config: AppConfig,
    theme_store: ThemeStore,
    /// Active theme.
    pub theme: &'static Theme,
    /// Keys drawn on the piano, low to high.
    pub piano_keys: Vec<PianoKey>,
    /// Currently focused panel.
    pub focused_panel: FocusedPanel,
    /// Category shown in the sound library (None shows all).
    pub sound_filter: Option<String>,
    /// Sounds listed in the sound library.
    pub sound_list: Vec<Sound>,
    pub sound_index: usize,
    pub beat_index: usize,
    pub effect_index: usize,
    pub recording_index: usize,
    /// Toast to display.
    pub toast: Option<Toast>,
    pub show_help: bool,
    /// Help menu scroll offset.
    pub help_scroll: u16,
    /// Highlighted row of the theme picker while it is open.
    pub theme_picker: Option<usize>,
    /// Whether the terminal reports key releases.
    pub key_releases: bool,
    held_keys: HashMap<char, HeldKey>,
}

impl App {
    /// Creates the application around a fresh session.
    ///
    /// The persisted theme is loaded here; catalogs are loaded separately
    /// with [`App::load_catalogs`].
    pub fn new(session: Session, theme_store: ThemeStore, config: AppConfig) -> Self {
        let theme = theme_store.load();
        let piano_keys = generate_keys(config.octave_range);
        Self {
            session,
            catalogs: None,
            config,
            theme_store,
            theme,
            piano_keys,
            focused_panel: FocusedPanel::default(),
            sound_filter: None,
            sound_list: Vec::new(),
            sound_index: 0,
            beat_index: 0,
            effect_index: 0,
            recording_index: 0,
            toast: None,
            show_help: false,
            help_scroll: 0,
            theme_picker: None,
            key_releases: false,
            held_keys: HashMap::new(),
        }
    }

    // ==================== Toasts ====================

    /// Shows a toast, replacing the current one.
    pub fn notify(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            shown_at: Instant::now(),
        });
    }

    fn warn(&mut self, reason: Precondition) {
        tracing::debug!(%reason, "action refused");
        self.notify(ToastLevel::Warning, reason.to_string());
    }

    /// Clears the toast once it has been visible long enough.
    pub fn clear_expired_toast(&mut self, now: Instant) {
        if let Some(toast) = &self.toast {
            if now.saturating_duration_since(toast.shown_at) >= TOAST_DURATION {
                self.toast = None;
            }
        }
    }

    // ==================== Loading ====================

    /// Loads both catalogs, opening them first if needed.
    ///
    /// Failures leave the session in [`LoadState::Failed`].
    pub async fn load_catalogs(&mut self) {
        self.session.begin_loading();

        if self.catalogs.is_none() {
            match Catalogs::open(&self.config.catalog_source, self.config.latency_scale) {
                Ok(catalogs) => self.catalogs = Some(catalogs),
                Err(err) => {
                    self.fail_loading(err);
                    return;
                }
            }
        }

        let Some(catalogs) = &self.catalogs else {
            return;
        };
        let result = catalogs.load_all().await;

        match result {
            Ok((sounds, beats)) => {
                tracing::info!(sounds = sounds.len(), beats = beats.len(), "catalogs loaded");
                self.session.finish_loading(sounds, beats);
                self.sound_filter = None;
                self.sound_list = self.session.sounds().to_vec();
                self.sound_index = self
                    .session
                    .selected_sound()
                    .and_then(|selected| self.sound_list.iter().position(|s| s.id == selected.id))
                    .unwrap_or(0);
                self.beat_index = self.beat_index.min(self.session.beats().len().saturating_sub(1));
            }
            Err(err) => self.fail_loading(err),
        }
    }

    fn fail_loading(&mut self, err: CatalogError) {
        tracing::error!(%err, "failed to load catalogs");
        self.session.fail_loading(err.to_string());
    }

    /// Drops the catalogs and loads them again from their source.
    pub async fn reload(&mut self) {
        tracing::info!("reloading catalogs");
        if let Some(catalogs) = &mut self.catalogs {
            if let Err(err) = catalogs.reset() {
                tracing::warn!(%err, "failed to reseed catalogs");
                self.catalogs = None;
            }
        }
        self.release_all_keys();
        self.load_catalogs().await;
    }

    pub fn is_ready(&self) -> bool {
        *self.session.load_state() == LoadState::Ready
    }

    // ==================== Sound library ====================

    /// Categories present in the catalog, in first-seen order.
    pub fn sound_categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for sound in self.session.sounds() {
            if !categories.contains(&sound.category) {
                categories.push(sound.category.clone());
            }
        }
        categories
    }

    /// Steps the category filter (All, then each category) and refetches the list.
    pub async fn cycle_sound_filter(&mut self, delta: i32) {
        let mut options: Vec<Option<String>> = vec![None];
        options.extend(self.sound_categories().into_iter().map(Some));

        let current = options
            .iter()
            .position(|o| *o == self.sound_filter)
            .unwrap_or(0) as i32;
        let next = (current + delta).rem_euclid(options.len() as i32) as usize;
        let filter = options.swap_remove(next);

        let result = match (&filter, &self.catalogs) {
            (Some(category), Some(catalogs)) => catalogs.sounds.get_by_category(category).await,
            _ => Ok(self.session.sounds().to_vec()),
        };

        match result {
            Ok(list) => {
                self.sound_filter = filter;
                self.sound_list = list;
                self.sound_index = 0;
            }
            Err(err) => {
                tracing::error!(%err, "failed to filter sounds");
                self.notify(ToastLevel::Error, "Failed to load sounds");
            }
        }
    }

    /// Fetches the highlighted sound and makes it the instrument.
    pub async fn select_highlighted_sound(&mut self) {
        let Some(id) = self.sound_list.get(self.sound_index).map(|s| s.id) else {
            return;
        };
        let Some(catalogs) = &self.catalogs else {
            return;
        };
        let result = catalogs.sounds.get_by_id(id).await;

        match result {
            Ok(sound) => {
                let message = format!("{} loaded", sound.name);
                self.session.select_sound(sound);
                self.notify(ToastLevel::Success, message);
            }
            Err(err) => {
                tracing::error!(%err, "failed to load sound");
                self.notify(ToastLevel::Error, "Failed to load sound");
            }
        }
    }

    // ==================== Beat engine ====================

    /// Selects the highlighted beat, or clears the selection if it is already selected.
    pub fn select_highlighted_beat(&mut self, now: Instant) {
        let Some(beat) = self.session.beats().get(self.beat_index).cloned() else {
            return;
        };
        if self.session.selected_beat().map(|b| b.id) == Some(beat.id) {
            self.session.select_beat(None, now);
            self.notify(ToastLevel::Info, "Beat cleared");
        } else {
            let message = format!("{} beat selected", beat.name);
            self.session.select_beat(Some(beat), now);
            self.notify(ToastLevel::Success, message);
        }
    }

    pub fn toggle_beat(&mut self, now: Instant) {
        match self.session.toggle_beat(now) {
            Ok(true) => self.notify(ToastLevel::Info, "Beat playing"),
            Ok(false) => self.notify(ToastLevel::Info, "Beat stopped"),
            Err(reason) => self.warn(reason),
        }
    }

    pub fn adjust_tempo(&mut self, steps: i32, now: Instant) {
        let tempo = self.session.tempo() as i32 + steps * TEMPO_STEP as i32;
        self.session.set_tempo(tempo.max(0) as u32, now);
    }

    // ==================== Recorder ====================

    /// Starts a recording, or stops and saves the one in progress.
    pub fn toggle_recording(&mut self, now: Instant) {
        if self.session.is_recording() {
            if let Some(recording) = self.session.stop_recording(now) {
                let message = format!("Recording saved ({})", format_short(recording.clock_secs));
                self.recording_index = self.session.recordings().len() - 1;
                self.notify(ToastLevel::Success, message);
            }
            return;
        }
        match self.session.start_recording(now) {
            Ok(true) => self.notify(ToastLevel::Success, "Recording started"),
            Ok(false) => {}
            Err(reason) => self.warn(reason),
        }
    }

    pub fn toggle_recording_playback(&mut self, now: Instant) {
        match self.session.toggle_recording_playback(now) {
            Ok(true) => self.notify(ToastLevel::Info, "Playing recording"),
            Ok(false) => self.notify(ToastLevel::Info, "Playback stopped"),
            Err(reason) => self.warn(reason),
        }
    }

    pub fn export_recording(&mut self) {
        match self.session.export_recording() {
            Ok(_) => self.notify(ToastLevel::Success, "Recording exported as WAV"),
            Err(reason) => self.warn(reason),
        }
    }

    /// Deletes the recording highlighted in the recorder panel.
    pub fn delete_highlighted_recording(&mut self) {
        let Some(id) = self
            .session
            .recordings()
            .get(self.recording_index)
            .map(|r| r.id)
        else {
            return;
        };
        if self.session.delete_recording(id).is_some() {
            self.recording_index = self
                .recording_index
                .min(self.session.recordings().len().saturating_sub(1));
            self.notify(ToastLevel::Info, "Recording deleted");
        }
    }

    // ==================== Effects ====================

    pub fn selected_effect(&self) -> EffectParam {
        EffectParam::ALL[self.effect_index.min(EffectParam::ALL.len() - 1)]
    }

    pub fn adjust_effect(&mut self, steps: i32) {
        let param = self.selected_effect();
        let step = match param {
            EffectParam::ReverbKind | EffectParam::Sustain => steps.signum(),
            _ => steps * EFFECT_STEP,
        };
        self.session.effects_mut().adjust(param, step);
    }

    pub fn reset_effects(&mut self) {
        self.session.reset_effects();
        self.notify(ToastLevel::Info, "Effects reset");
    }

    // ==================== Navigation ====================

    pub fn cycle_focus(&mut self, forward: bool) {
        self.focused_panel = if forward {
            self.focused_panel.next()
        } else {
            self.focused_panel.previous()
        };
    }

    /// Moves the highlight of the focused list.
    pub fn move_selection(&mut self, delta: i32) {
        fn step(index: usize, len: usize, delta: i32) -> usize {
            if len == 0 {
                return 0;
            }
            (index as i32 + delta).clamp(0, len as i32 - 1) as usize
        }

        match self.focused_panel {
            FocusedPanel::Sounds => {
                self.sound_index = step(self.sound_index, self.sound_list.len(), delta);
            }
            FocusedPanel::Beats => {
                self.beat_index = step(self.beat_index, self.session.beats().len(), delta);
            }
            FocusedPanel::Effects => {
                self.effect_index = step(self.effect_index, EffectParam::ALL.len(), delta);
            }
            FocusedPanel::Recorder => {
                self.recording_index =
                    step(self.recording_index, self.session.recordings().len(), delta);
            }
            FocusedPanel::Keyboard => {}
        }
    }

    // ==================== Keyboard ====================

    /// Plays the note mapped to a typed character.
    ///
    /// # Returns
    ///
    /// true if the character is a note key on the current layout
    pub fn note_key_down(&mut self, c: char, now: Instant) -> bool {
        let c = c.to_lowercase().next().unwrap_or(c);
        let Some(key_id) = self.session.mapping().note_for_char(c).map(str::to_string) else {
            return false;
        };

        if let Some(held) = self.held_keys.get_mut(&c) {
            held.last_seen = now;
            held.repeating = true;
            return true;
        }

        match self.session.press_key(&key_id, now) {
            Ok(_) => {
                self.held_keys.insert(
                    c,
                    HeldKey {
                        key_id,
                        last_seen: now,
                        repeating: false,
                    },
                );
            }
            Err(reason) => self.warn(reason),
        }
        true
    }

    /// Releases the note held by a character, if any.
    pub fn note_key_up(&mut self, c: char) {
        let c = c.to_lowercase().next().unwrap_or(c);
        if let Some(held) = self.held_keys.remove(&c) {
            self.session.release_key(&held.key_id);
        }
    }

    pub fn release_all_keys(&mut self) {
        self.held_keys.clear();
        self.session.release_all_keys();
    }

    /// Releases keys the terminal will never report as released.
    fn expire_held_keys(&mut self, now: Instant) {
        if self.key_releases {
            return;
        }
        let expired: Vec<char> = self
            .held_keys
            .iter()
            .filter(|(_, held)| held.expired(now))
            .map(|(&c, _)| c)
            .collect();
        for c in expired {
            self.note_key_up(c);
        }
    }

    pub fn shift_octave(&mut self, delta: i32) {
        self.held_keys.clear();
        let octave = self.session.shift_octave(delta);
        self.notify(ToastLevel::Info, format!("Octave {octave}"));
    }

    pub fn cycle_layout(&mut self) {
        self.set_layout(self.session.layout().next());
    }

    pub fn set_layout(&mut self, layout: LayoutId) {
        self.held_keys.clear();
        self.session.set_layout(layout);
        tracing::info!(%layout, "keyboard layout changed");
        self.notify(
            ToastLevel::Info,
            format!("Layout: {}", layout.layout().name),
        );
    }

    pub fn adjust_transpose(&mut self, delta: i32) {
        let transpose = self.session.set_transpose(self.session.transpose() + delta);
        self.notify(ToastLevel::Info, format!("Transpose {transpose:+}"));
    }

    // ==================== Themes ====================

    pub fn open_theme_picker(&mut self) {
        let current = themes()
            .iter()
            .position(|t| t.id == self.theme.id)
            .unwrap_or(0);
        self.theme_picker = Some(current);
    }

    pub fn move_theme_picker(&mut self, delta: i32) {
        if let Some(index) = &mut self.theme_picker {
            let len = themes().len() as i32;
            *index = (*index as i32 + delta).rem_euclid(len) as usize;
        }
    }

    /// Applies the highlighted theme and closes the picker.
    pub fn confirm_theme_picker(&mut self) {
        if let Some(index) = self.theme_picker.take() {
            if let Some(theme) = themes().get(index) {
                self.apply_theme(theme.id);
            }
        }
    }

    /// Switches to a theme and persists the choice.
    ///
    /// The theme changes even if saving fails.
    pub fn apply_theme(&mut self, theme_id: &str) {
        self.theme = get_theme(theme_id);
        match self.theme_store.save(self.theme.id) {
            Ok(()) => self.notify(ToastLevel::Success, format!("{} theme", self.theme.name)),
            Err(err) => {
                tracing::warn!(%err, "failed to save theme");
                self.notify(ToastLevel::Error, "Theme applied but not saved");
            }
        }
    }

    // ==================== Timers ====================

    /// Advances session timers, toasts, and auto-release.
    pub fn tick(&mut self, now: Instant) {
        let report = self.session.tick(now);
        if report.playback_finished {
            self.notify(ToastLevel::Info, "Playback finished");
        }
        self.clear_expired_toast(now);
        self.expire_held_keys(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::chords::RandomChords;
    use crate::settings::MemorySettingsStore;
    use crate::theme::DEFAULT_THEME_ID;

    fn app() -> App {
        let session = Session::new(LayoutId::Qwerty, Box::new(RandomChords::seeded(3)));
        let store = ThemeStore::new(Box::new(MemorySettingsStore::new()));
        let config = AppConfig {
            latency_scale: 0.0,
            ..AppConfig::default()
        };
        App::new(session, store, config)
    }

    async fn loaded_app() -> App {
        let mut app = app();
        app.load_catalogs().await;
        app
    }

    fn toast_text(app: &App) -> Option<&str> {
        app.toast.as_ref().map(|t| t.message.as_str())
    }

    #[test]
    fn test_new_app_defaults() {
        let app = app();
        assert_eq!(app.theme.id, DEFAULT_THEME_ID);
        assert_eq!(app.piano_keys.len(), 84);
        assert_eq!(app.session.load_state(), &LoadState::Loading);
        assert_eq!(app.focused_panel, FocusedPanel::Keyboard);
    }

    #[tokio::test]
    async fn test_load_catalogs() {
        let app = loaded_app().await;
        assert!(app.is_ready());
        assert_eq!(app.sound_list.len(), app.session.sounds().len());
        assert_eq!(
            app.session.selected_sound().map(|s| s.name.as_str()),
            Some("Concert Grand")
        );
        assert_eq!(app.sound_list[app.sound_index].name, "Concert Grand");
    }

    #[tokio::test]
    async fn test_load_failure_sets_failed_state() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(LayoutId::Qwerty, Box::new(RandomChords::seeded(3)));
        let store = ThemeStore::new(Box::new(MemorySettingsStore::new()));
        let config = AppConfig {
            catalog_source: CatalogSource::Directory(dir.path().to_path_buf()),
            latency_scale: 0.0,
            octave_range: 1,
        };
        let mut app = App::new(session, store, config);
        app.load_catalogs().await;
        assert!(matches!(app.session.load_state(), LoadState::Failed(_)));
        assert!(!app.is_ready());
    }

    #[tokio::test]
    async fn test_reload_reseeds_catalogs() {
        let mut app = loaded_app().await;
        let count = app.session.sounds().len();
        if let Some(catalogs) = &mut app.catalogs {
            let id = app.session.sounds()[0].id;
            catalogs.sounds.remove(id).await.unwrap();
        }

        app.reload().await;
        assert!(app.is_ready());
        assert_eq!(app.session.sounds().len(), count);
    }

    #[tokio::test]
    async fn test_sound_filter_cycles_through_categories() {
        let mut app = loaded_app().await;
        let categories = app.sound_categories();
        assert!(!categories.is_empty());

        app.cycle_sound_filter(1).await;
        assert_eq!(app.sound_filter.as_deref(), Some(categories[0].as_str()));
        assert!(app.sound_list.iter().all(|s| s.category == categories[0]));

        app.cycle_sound_filter(-1).await;
        assert_eq!(app.sound_filter, None);
        assert_eq!(app.sound_list.len(), app.session.sounds().len());
    }

    #[tokio::test]
    async fn test_select_highlighted_sound() {
        let mut app = loaded_app().await;
        app.focused_panel = FocusedPanel::Sounds;
        app.sound_index = 0;
        let expected = app.sound_list[0].clone();
        app.select_highlighted_sound().await;
        assert_eq!(app.session.selected_sound(), Some(&expected));
        assert_eq!(toast_text(&app), Some(format!("{} loaded", expected.name).as_str()));
    }

    #[tokio::test]
    async fn test_beat_selection_and_toggle() {
        let mut app = loaded_app().await;
        let now = Instant::now();

        app.toggle_beat(now);
        assert_eq!(toast_text(&app), Some("Select a beat first"));
        assert_eq!(app.toast.as_ref().map(|t| t.level), Some(ToastLevel::Warning));

        app.beat_index = 0;
        app.select_highlighted_beat(now);
        assert!(app.session.selected_beat().is_some());
        app.toggle_beat(now);
        assert!(app.session.is_beat_playing());
        assert_eq!(toast_text(&app), Some("Beat playing"));

        // Selecting the same beat again clears it and stops playback.
        app.select_highlighted_beat(now);
        assert!(app.session.selected_beat().is_none());
        assert!(!app.session.is_beat_playing());
    }

    #[tokio::test]
    async fn test_note_keys_press_and_release() {
        let mut app = loaded_app().await;
        app.key_releases = true;
        let now = Instant::now();

        assert!(app.note_key_down('Q', now));
        assert!(app.session.is_key_active("C4"));
        assert!(app.note_key_down('q', now));
        assert_eq!(app.session.active_key_count(), 1);

        app.note_key_up('q');
        assert_eq!(app.session.active_key_count(), 0);

        assert!(!app.note_key_down('x', now));
    }

    #[test]
    fn test_note_key_without_sound_warns() {
        let mut app = app();
        assert!(app.note_key_down('q', Instant::now()));
        assert_eq!(app.session.active_key_count(), 0);
        assert_eq!(toast_text(&app), Some("Select an instrument first"));
    }

    #[tokio::test]
    async fn test_auto_release_without_release_events() {
        let mut app = loaded_app().await;
        let t0 = Instant::now();
        app.note_key_down('q', t0);
        app.tick(t0 + Duration::from_millis(600));
        assert!(app.session.is_key_active("C4"));

        // Auto-repeat keeps the key held.
        app.note_key_down('q', t0 + Duration::from_millis(650));
        app.tick(t0 + Duration::from_millis(720));
        assert!(app.session.is_key_active("C4"));

        app.tick(t0 + Duration::from_millis(750));
        assert!(!app.session.is_key_active("C4"));
    }

    #[tokio::test]
    async fn test_held_key_logs_one_note_through_repeat_delay() {
        let mut app = loaded_app().await;
        let t0 = Instant::now();
        app.session.start_recording(t0).unwrap();
        app.note_key_down('q', t0);

        // Terminal repeat delay before the first repeat.
        let mut t = t0;
        while t < t0 + Duration::from_millis(500) {
            t += Duration::from_millis(16);
            app.tick(t);
        }
        for i in 0..10 {
            let at = t0 + Duration::from_millis(500 + 33 * i);
            app.note_key_down('q', at);
            app.tick(at + Duration::from_millis(16));
        }

        let notes = app.session.recording_data().map(|r| r.notes().len());
        assert_eq!(notes, Some(1));
        assert!(app.session.is_key_active("C4"));
    }

    #[tokio::test]
    async fn test_recording_flow_toasts() {
        let mut app = loaded_app().await;
        let t0 = Instant::now();

        app.toggle_recording_playback(t0);
        assert_eq!(toast_text(&app), Some("Record something first"));

        app.toggle_recording(t0);
        assert_eq!(toast_text(&app), Some("Recording started"));
        app.tick(t0 + Duration::from_secs(65));
        app.toggle_recording(t0 + Duration::from_secs(65));
        assert_eq!(toast_text(&app), Some("Recording saved (1:05)"));

        app.export_recording();
        assert_eq!(toast_text(&app), Some("Recording exported as WAV"));

        app.delete_highlighted_recording();
        assert!(!app.session.has_recording());
    }

    #[test]
    fn test_toast_expiry() {
        let mut app = app();
        app.notify(ToastLevel::Info, "hello");
        let shown = app.toast.as_ref().map(|t| t.shown_at).unwrap();
        app.clear_expired_toast(shown + Duration::from_secs(2));
        assert!(app.toast.is_some());
        app.clear_expired_toast(shown + TOAST_DURATION);
        assert!(app.toast.is_none());
    }

    #[test]
    fn test_theme_picker_applies_and_persists() {
        let mut app = app();
        app.open_theme_picker();
        app.move_theme_picker(1);
        let expected = themes()[app.theme_picker.unwrap()].id;
        app.confirm_theme_picker();
        assert!(app.theme_picker.is_none());
        assert_eq!(app.theme.id, expected);
        assert_eq!(app.theme_store.load().id, expected);
    }

    #[test]
    fn test_focus_cycle_round_trip() {
        let mut app = app();
        for _ in 0..5 {
            app.cycle_focus(true);
        }
        assert_eq!(app.focused_panel, FocusedPanel::Keyboard);
        app.cycle_focus(false);
        assert_eq!(app.focused_panel, FocusedPanel::Recorder);
    }

    #[test]
    fn test_effect_adjustment() {
        let mut app = app();
        app.effect_index = 1;
        assert_eq!(app.selected_effect(), EffectParam::ReverbLevel);
        app.adjust_effect(1);
        assert_eq!(app.session.effects().reverb.level, 30);
        app.reset_effects();
        assert_eq!(app.session.effects().reverb.level, 25);
    }

    #[test]
    fn test_layout_and_octave_changes() {
        let mut app = app();
        app.cycle_layout();
        assert_eq!(app.session.layout(), LayoutId::Azerty);
        app.shift_octave(-1);
        assert_eq!(app.session.octave(), 3);
        assert_eq!(toast_text(&app), Some("Octave 3"));
    }
}
