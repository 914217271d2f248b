//! Terminal user interface components.
//!
//! This module provides the visual components of the studio: the header,
//! chord display, sound library, beat engine, effects, recorder, piano
//! keyboard, and the overlays drawn on top of them.

mod dialogs;
mod header;
mod help;
mod keyboard;
mod panels;

use crate::app::App;
use crate::session::LoadState;
use crate::theme::{parse_color, Rgb, Theme};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

pub use dialogs::{render_error_screen, render_loading_screen, render_theme_picker, render_toast};
pub use header::{render_chords, render_header, render_status_bar};
pub use help::render_help;
pub use keyboard::render_keyboard;
pub use panels::{render_beats, render_effects, render_recorder, render_sounds};

/// Height of the piano panel including its border.
const PIANO_HEIGHT: u16 = 8;

/// Terminal colours derived from a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: Color,
    pub accent: Color,
    pub secondary: Color,
    pub background: Color,
    pub card_bg: Color,
    pub key_active: Color,
    pub key_highlight: Color,
}

impl Palette {
    /// Converts a theme's CSS colours, falling back to plain terminal colours.
    pub fn from_theme(theme: &Theme) -> Self {
        let colors = &theme.colors;
        Self {
            primary: css_color(colors.primary, Color::Magenta),
            accent: css_color(colors.accent, Color::Cyan),
            secondary: css_color(colors.secondary, Color::Blue),
            background: css_color(colors.background, Color::Black),
            card_bg: css_color(colors.card_bg, Color::Black),
            key_active: css_color(colors.key_active, Color::Yellow),
            key_highlight: css_color(colors.key_highlight, Color::LightYellow),
        }
    }
}

fn css_color(css: &str, fallback: Color) -> Color {
    parse_color(css)
        .map(|Rgb(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(fallback)
}

/// Bordered panel block, highlighted when focused.
fn panel_block(title: String, focused: bool, palette: &Palette) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { palette.accent } else { Color::Gray }))
}

/// Builds a "[key]Desc " hint line.
fn hint_line(hints: &[(&'static str, &'static str)]) -> Line<'static> {
    let key_style = Style::default().fg(Color::Yellow);
    let desc_style = Style::default().fg(Color::DarkGray);

    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (key, desc) in hints {
        spans.push(Span::styled("[", desc_style));
        spans.push(Span::styled(*key, key_style));
        spans.push(Span::styled(format!("]{desc} "), desc_style));
    }
    Line::from(spans)
}

/// Style for a list row: bold primary when selected.
fn selected_style(selected: bool, palette: &Palette) -> Style {
    if selected {
        Style::default()
            .fg(palette.primary)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

/// Renders the complete studio screen.
///
/// The layout is divided into:
/// - Top: header with instrument, layout, octave and beat indicator
/// - Chord display
/// - Middle: sound library, beat engine, effects, recorder
/// - Bottom: piano keyboard and status bar
pub fn render(frame: &mut Frame, app: &App) {
    let palette = Palette::from_theme(app.theme);
    let size = frame.area();

    match app.session.load_state() {
        LoadState::Loading => render_loading_screen(frame, size, &palette),
        LoadState::Failed(message) => render_error_screen(frame, size, message, &palette),
        LoadState::Ready => render_studio(frame, size, app, &palette),
    }

    if app.theme_picker.is_some() {
        render_theme_picker(frame, app, &palette);
    }
    if app.show_help {
        render_help(frame, app.help_scroll, &palette);
    }
    render_toast(frame, app);
}

fn render_studio(frame: &mut Frame, size: Rect, app: &App, palette: &Palette) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),            // Header
            Constraint::Length(3),            // Chords
            Constraint::Min(8),               // Panels
            Constraint::Length(PIANO_HEIGHT), // Piano
            Constraint::Length(1),            // Status bar
        ])
        .split(size);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(28), // Sounds
            Constraint::Percentage(24), // Beats
            Constraint::Percentage(24), // Effects
            Constraint::Percentage(24), // Recorder
        ])
        .split(rows[2]);

    use crate::app::FocusedPanel as P;
    let focus = app.focused_panel;

    render_header(frame, rows[0], app, palette);
    render_chords(frame, rows[1], app, palette);
    render_sounds(frame, columns[0], app, palette, focus == P::Sounds);
    render_beats(frame, columns[1], app, palette, focus == P::Beats);
    render_effects(frame, columns[2], app, palette, focus == P::Effects);
    render_recorder(frame, columns[3], app, palette, focus == P::Recorder);
    render_keyboard(frame, rows[3], app, palette, focus == P::Keyboard);
    render_status_bar(frame, rows[4], app, palette);
}

/// Helper function to center a rectangle within another rectangle.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Centers a popup of `height` rows (clamped to the area) and `percent_x` width.
pub fn centered_popup(percent_x: u16, height: u16, area: Rect) -> Rect {
    let height = height.min(area.height);
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);

    centered_rect(percent_x, 100, popup_layout[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppConfig;
    use crate::keys::LayoutId;
    use crate::session::chords::RandomChords;
    use crate::session::Session;
    use crate::settings::MemorySettingsStore;
    use crate::theme::{get_theme, ThemeStore};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn app() -> App {
        let session = Session::new(LayoutId::Qwerty, Box::new(RandomChords::seeded(5)));
        let store = ThemeStore::new(Box::new(MemorySettingsStore::new()));
        let config = AppConfig {
            latency_scale: 0.0,
            ..AppConfig::default()
        };
        App::new(session, store, config)
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_palette_uses_theme_colors() {
        let palette = Palette::from_theme(get_theme("ocean-breeze"));
        assert!(matches!(palette.primary, Color::Rgb(..)));
        assert!(matches!(palette.key_active, Color::Rgb(..)));
    }

    #[test]
    fn test_css_color_fallback() {
        assert_eq!(css_color("not a colour", Color::Red), Color::Red);
        assert_eq!(css_color("#102030", Color::Red), Color::Rgb(0x10, 0x20, 0x30));
    }

    #[test]
    fn test_render_loading_screen() {
        let app = app();
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();
        assert!(screen_text(&terminal).contains("Loading"));
    }

    #[test]
    fn test_loading_screen_fits_small_terminals() {
        let app = app();
        for (w, h) in [(80, 24), (60, 12)] {
            let mut terminal = Terminal::new(TestBackend::new(w, h)).unwrap();
            terminal.draw(|frame| render(frame, &app)).unwrap();
            let text = screen_text(&terminal);
            assert!(text.contains("keystudio"), "{w}x{h}");
            assert!(text.contains("Loading"), "{w}x{h}");
        }
    }

    #[test]
    fn test_centered_popup_has_fixed_height() {
        let area = Rect::new(0, 0, 80, 24);
        let popup = centered_popup(50, 5, area);
        assert_eq!(popup.height, 5);
        assert_eq!(popup.width, 40);
        assert!(popup.y >= 9 && popup.y <= 10);
        assert_eq!(centered_popup(50, 30, area).height, 24);
    }

    #[tokio::test]
    async fn test_render_studio() {
        let mut app = app();
        app.load_catalogs().await;
        app.show_help = true;
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Sound Library"));
        assert!(text.contains("Concert Grand"));
        assert!(text.contains("Help"));
    }

    #[test]
    fn test_render_tiny_terminal_does_not_panic() {
        let mut app = app();
        app.session.finish_loading(Vec::new(), Vec::new());
        let mut terminal = Terminal::new(TestBackend::new(10, 5)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();
    }
}
