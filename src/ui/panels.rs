//! Side-by-side panels: sound library, beat engine, effects, and recorder.
//!
//! Each panel is a list with the highlighted row marked, plus a line of
//! control hints at the bottom.

use super::{hint_line, panel_block, selected_style, Palette};
use crate::app::App;
use crate::session::effects::EffectParam;
use crate::session::recording::format_short;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use ratatui::Frame;

/// Height reserved for the control hints at the bottom.
const CONTROLS_HEIGHT: u16 = 1;

/// Splits a panel's inner area into list and hint rows.
fn split_panel(inner: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),                  // List
            Constraint::Length(CONTROLS_HEIGHT), // Control hints
        ])
        .split(inner);
    (chunks[0], chunks[1])
}

/// Draws a list with a highlight bar on the selected row.
fn render_list(frame: &mut Frame, area: Rect, items: Vec<ListItem<'static>>, selected: usize) {
    let list = List::new(items)
        .highlight_style(
            Style::default()
                .bg(Color::Rgb(40, 40, 40))
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn empty_hint(frame: &mut Frame, area: Rect, text: &'static str) {
    frame.render_widget(
        Paragraph::new(Span::styled(
            text,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
        area,
    );
}

/// Renders the sound library.
///
/// # Arguments
///
/// * `frame` - The frame to render to
/// * `area` - The area to render in
/// * `app` - Application state
/// * `palette` - Colours of the active theme
/// * `focused` - Whether this panel is focused
pub fn render_sounds(frame: &mut Frame, area: Rect, app: &App, palette: &Palette, focused: bool) {
    let filter = app.sound_filter.as_deref().unwrap_or("all");
    let block = panel_block(format!(" Sound Library ({filter}) "), focused, palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let (list_area, hints_area) = split_panel(inner);

    let selected_id = app.session.selected_sound().map(|s| s.id);
    let items: Vec<ListItem> = app
        .sound_list
        .iter()
        .map(|sound| {
            let is_selected = selected_id == Some(sound.id);
            ListItem::new(Line::from(vec![
                Span::styled(
                    if is_selected { "♪ " } else { "  " },
                    Style::default().fg(palette.key_active),
                ),
                Span::styled(sound.name.clone(), selected_style(is_selected, palette)),
                Span::styled(
                    format!(" {}", sound.category),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    if items.is_empty() {
        empty_hint(frame, list_area, "No sounds");
    } else {
        render_list(frame, list_area, items, app.sound_index);
    }
    frame.render_widget(
        Paragraph::new(hint_line(&[("Enter", "Use"), ("←→", "Category")])),
        hints_area,
    );
}

/// Renders the beat engine.
pub fn render_beats(frame: &mut Frame, area: Rect, app: &App, palette: &Palette, focused: bool) {
    let session = &app.session;
    let block = panel_block(
        format!(" Beat Engine ({} BPM) ", session.tempo()),
        focused,
        palette,
    );
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let (list_area, hints_area) = split_panel(inner);

    let selected_id = session.selected_beat().map(|b| b.id);
    let items: Vec<ListItem> = session
        .beats()
        .iter()
        .map(|beat| {
            let is_selected = selected_id == Some(beat.id);
            let marker = match (is_selected, session.is_beat_playing()) {
                (true, true) => Span::styled("▶ ", Style::default().fg(Color::Green)),
                (true, false) => Span::styled("■ ", Style::default().fg(palette.accent)),
                _ => Span::raw("  "),
            };
            let tempo = beat
                .default_tempo
                .map_or(String::new(), |bpm| format!(" {bpm}"));
            ListItem::new(Line::from(vec![
                marker,
                Span::styled(beat.name.clone(), selected_style(is_selected, palette)),
                Span::styled(
                    format!(" {}{}", beat.genre, tempo),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    if items.is_empty() {
        empty_hint(frame, list_area, "No beats");
    } else {
        render_list(frame, list_area, items, app.beat_index);
    }
    frame.render_widget(
        Paragraph::new(hint_line(&[("Enter", "Pick"), ("←→", "BPM")])),
        hints_area,
    );
}

/// Renders the effects panel.
pub fn render_effects(frame: &mut Frame, area: Rect, app: &App, palette: &Palette, focused: bool) {
    let block = panel_block(" Effects ".to_string(), focused, palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let (list_area, hints_area) = split_panel(inner);

    let effects = app.session.effects();
    let items: Vec<ListItem> = EffectParam::ALL
        .iter()
        .map(|&param| {
            let changed = match param {
                EffectParam::ReverbKind => false,
                EffectParam::Sustain => effects.sustain,
                _ => effects.value(param) != 0,
            };
            let value_style = if changed {
                Style::default().fg(palette.accent)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<14}", param.label()), Style::default().fg(Color::White)),
                Span::styled(effects.display(param), value_style),
            ]))
        })
        .collect();

    render_list(frame, list_area, items, app.effect_index);
    frame.render_widget(
        Paragraph::new(hint_line(&[("←→", "Adjust"), ("F8", "Reset")])),
        hints_area,
    );
}

/// Renders the recorder and the list of finished recordings.
pub fn render_recorder(frame: &mut Frame, area: Rect, app: &App, palette: &Palette, focused: bool) {
    let session = &app.session;
    let block = panel_block(" Recorder ".to_string(), focused, palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),               // State
            Constraint::Min(1),                  // Recordings
            Constraint::Length(CONTROLS_HEIGHT), // Control hints
        ])
        .split(inner);

    let state = if let Some(data) = session.recording_data() {
        Span::styled(
            format!("● Recording {} notes", data.notes().len()),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else if session.is_playing_recording() {
        Span::styled("▶ Playing", Style::default().fg(Color::Green))
    } else {
        Span::styled("Idle", Style::default().fg(Color::DarkGray))
    };
    frame.render_widget(Paragraph::new(Line::from(state)), chunks[0]);

    let items: Vec<ListItem> = session
        .recordings()
        .iter()
        .map(|recording| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("Take {}", recording.id.as_u64()),
                    Style::default().fg(palette.primary),
                ),
                Span::styled(
                    format!(
                        " {} {} notes",
                        format_short(recording.clock_secs),
                        recording.notes.len()
                    ),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    if items.is_empty() {
        empty_hint(frame, chunks[1], "No recordings yet");
    } else {
        render_list(frame, chunks[1], items, app.recording_index);
    }
    frame.render_widget(
        Paragraph::new(hint_line(&[("F5", "Rec"), ("F7", "Export"), ("Del", "Delete")])),
        chunks[2],
    );
}
