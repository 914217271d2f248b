//! keystudio - A terminal music studio.
//!
//! Play a virtual piano from the computer keyboard, pick instruments and
//! backing beats, tweak effects, and record takes. All data comes from
//! in-memory mock catalogs; no audio is produced.
//!
//! # Usage
//!
//! ```bash
//! cargo run                              # Layout detected from the locale
//! cargo run -- --layout azerty           # Force a keyboard layout
//! cargo run -- --latency-scale 0         # Skip simulated catalog latency
//! RUST_LOG=debug cargo run -- --log-file studio.log
//! ```
//!
//! Press `F1` or `?` for help with keyboard shortcuts.

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use keystudio::app::{App, AppConfig, FocusedPanel};
use keystudio::catalog::CatalogSource;
use keystudio::keys::{detect_layout, LayoutId};
use keystudio::session::chords::RandomChords;
use keystudio::session::{LoadState, Session};
use keystudio::settings::FileSettingsStore;
use keystudio::theme::ThemeStore;
use keystudio::ui;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;

/// Command-line options.
#[derive(Parser, Debug)]
#[command(name = "keystudio")]
#[command(about = "Terminal music studio with a computer-keyboard piano", long_about = None)]
struct Cli {
    /// Keyboard layout (qwerty, azerty, qwertz, dvorak, colemak); detected from the locale if omitted
    #[arg(short, long)]
    layout: Option<LayoutId>,

    /// Locale used for layout detection instead of LC_ALL / LC_MESSAGES / LANG
    #[arg(long)]
    locale: Option<String>,

    /// File holding the saved theme
    #[arg(short, long, default_value = ".keystudio.json")]
    settings: PathBuf,

    /// Directory with sounds.json and beats.json replacing the bundled catalogs
    #[arg(long)]
    catalog_dir: Option<PathBuf>,

    /// Multiplier for the simulated catalog latency (0 disables it)
    #[arg(long, default_value_t = 1.0)]
    latency_scale: f32,

    /// Octaves drawn on the piano
    #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..=7))]
    octave_range: u32,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// What the event loop should do after a key press.
enum Flow {
    Continue,
    Reload,
    Quit,
}

/// Main entry point.
fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_file.as_ref())?;

    let layout = cli.layout.unwrap_or_else(|| {
        let locale = cli.locale.clone().unwrap_or_else(system_locale);
        detect_layout(&locale)
    });
    tracing::info!(%layout, "starting keystudio");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to start async runtime")?;

    let session = Session::new(layout, Box::new(RandomChords::new()));
    let theme_store = ThemeStore::new(Box::new(FileSettingsStore::new(&cli.settings)));
    let config = AppConfig {
        catalog_source: cli
            .catalog_dir
            .map(CatalogSource::Directory)
            .unwrap_or_default(),
        latency_scale: cli.latency_scale.max(0.0),
        octave_range: cli.octave_range,
    };
    let mut app = App::new(session, theme_store, config);

    let (mut terminal, key_releases) = setup_terminal().context("Failed to setup terminal")?;
    app.key_releases = key_releases;

    let result = run_app(&mut terminal, &mut app, &runtime);

    restore_terminal(&mut terminal, key_releases).context("Failed to restore terminal")?;

    result
}

/// Sends logs to stderr, or to `log_file` when given.
fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

/// Locale hint from the usual environment variables.
fn system_locale() -> String {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

/// Sets up the terminal for TUI rendering.
///
/// # Returns
///
/// The terminal, and whether key release events were enabled
fn setup_terminal() -> Result<(Terminal<CrosstermBackend<Stdout>>, bool)> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let key_releases = matches!(supports_keyboard_enhancement(), Ok(true));
    if key_releases {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )
        .context("Failed to enable key release events")?;
    }
    tracing::debug!(key_releases, "terminal ready");

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok((terminal, key_releases))
}

/// Restores the terminal to its original state.
fn restore_terminal(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    key_releases: bool,
) -> Result<()> {
    if key_releases {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)
            .context("Failed to disable key release events")?;
    }
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Runs the main loop until the user quits.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    runtime: &Runtime,
) -> Result<()> {
    // Show the loading screen while the catalogs arrive
    terminal.draw(|frame| ui::render(frame, app))?;
    runtime.block_on(app.load_catalogs());

    loop {
        app.tick(Instant::now());

        terminal.draw(|frame| ui::render(frame, app))?;

        // Short timeout so timers and toasts keep moving
        if !event::poll(Duration::from_millis(16))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        match key.kind {
            KeyEventKind::Press => match handle_key(app, runtime, key, Instant::now()) {
                Flow::Continue => {}
                Flow::Quit => break,
                Flow::Reload => {
                    app.session.begin_loading();
                    terminal.draw(|frame| ui::render(frame, app))?;
                    runtime.block_on(app.reload());
                }
            },
            KeyEventKind::Release => {
                if let KeyCode::Char(c) = key.code {
                    app.note_key_up(c);
                }
            }
            KeyEventKind::Repeat => {}
        }
    }

    tracing::info!("quitting");
    Ok(())
}

/// Handles a key press.
fn handle_key(app: &mut App, runtime: &Runtime, key: KeyEvent, now: Instant) -> Flow {
    let KeyEvent {
        code, modifiers, ..
    } = key;

    if modifiers.contains(KeyModifiers::CONTROL) && matches!(code, KeyCode::Char('c' | 'q')) {
        return Flow::Quit;
    }

    if app.show_help {
        match code {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') => {
                app.show_help = false;
                app.help_scroll = 0;
            }
            KeyCode::Up => app.help_scroll = app.help_scroll.saturating_sub(1),
            KeyCode::Down => app.help_scroll = app.help_scroll.saturating_add(1),
            KeyCode::PageUp => app.help_scroll = app.help_scroll.saturating_sub(10),
            KeyCode::PageDown => app.help_scroll = app.help_scroll.saturating_add(10),
            KeyCode::Home => app.help_scroll = 0,
            _ => {}
        }
        return Flow::Continue;
    }

    if app.theme_picker.is_some() {
        match code {
            KeyCode::Esc | KeyCode::F(3) => app.theme_picker = None,
            KeyCode::Up => app.move_theme_picker(-1),
            KeyCode::Down => app.move_theme_picker(1),
            KeyCode::Enter => app.confirm_theme_picker(),
            _ => {}
        }
        return Flow::Continue;
    }

    match app.session.load_state() {
        LoadState::Ready => {}
        LoadState::Loading => {
            return if code == KeyCode::Esc {
                Flow::Quit
            } else {
                Flow::Continue
            };
        }
        LoadState::Failed(_) => {
            return match code {
                KeyCode::Char('r' | 'R') => Flow::Reload,
                KeyCode::Esc => Flow::Quit,
                _ => Flow::Continue,
            };
        }
    }

    match code {
        KeyCode::Esc => return Flow::Quit,
        KeyCode::F(1) | KeyCode::Char('?') => app.show_help = true,
        KeyCode::F(2) => app.cycle_layout(),
        KeyCode::F(3) => app.open_theme_picker(),
        KeyCode::F(5) => app.toggle_recording(now),
        KeyCode::F(6) => app.toggle_recording_playback(now),
        KeyCode::F(7) => app.export_recording(),
        KeyCode::F(8) => app.reset_effects(),
        KeyCode::F(9) => return Flow::Reload,
        KeyCode::Tab => app.cycle_focus(true),
        KeyCode::BackTab => app.cycle_focus(false),
        KeyCode::Char(' ') => app.toggle_beat(now),
        KeyCode::Char('-') => app.shift_octave(-1),
        KeyCode::Char('=' | '+') => app.shift_octave(1),
        KeyCode::PageUp => app.adjust_transpose(1),
        KeyCode::PageDown => app.adjust_transpose(-1),
        KeyCode::Up => app.move_selection(-1),
        KeyCode::Down => app.move_selection(1),
        KeyCode::Left | KeyCode::Right => {
            let step = if code == KeyCode::Left { -1 } else { 1 };
            match app.focused_panel {
                FocusedPanel::Sounds => runtime.block_on(app.cycle_sound_filter(step)),
                FocusedPanel::Beats => app.adjust_tempo(step, now),
                FocusedPanel::Effects => app.adjust_effect(step),
                FocusedPanel::Keyboard => app.shift_octave(step),
                FocusedPanel::Recorder => {}
            }
        }
        KeyCode::Enter => match app.focused_panel {
            FocusedPanel::Sounds => runtime.block_on(app.select_highlighted_sound()),
            FocusedPanel::Beats => app.select_highlighted_beat(now),
            FocusedPanel::Effects => app.adjust_effect(1),
            FocusedPanel::Recorder => app.toggle_recording_playback(now),
            FocusedPanel::Keyboard => {}
        },
        KeyCode::Delete | KeyCode::Backspace if app.focused_panel == FocusedPanel::Recorder => {
            app.delete_highlighted_recording();
        }
        KeyCode::Char(c) if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            app.note_key_down(c, now);
        }
        _ => {}
    }
    Flow::Continue
}
