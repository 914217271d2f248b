//! Header, chord display, and status bar rendering.

use super::{hint_line, Palette};
use crate::app::App;
use crate::session::recording::format_clock;
use crate::session::BEATS_PER_BAR;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Renders the header bar at the top of the screen.
///
/// # Arguments
///
/// * `frame` - The frame to render to
/// * `area` - The area to render in
/// * `app` - Application state
/// * `palette` - Colours of the active theme
pub fn render_header(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let block = Block::default()
        .title(Span::styled(
            " keystudio ",
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.secondary));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(24),    // Instrument
            Constraint::Length(22), // Beat + tempo
            Constraint::Length(14), // Beat indicator
            Constraint::Length(12), // Recording clock
            Constraint::Length(24), // Theme
        ])
        .split(inner);

    let session = &app.session;
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);

    let sound = session
        .selected_sound()
        .map_or("none".to_string(), |s| s.name.clone());
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Sound: ", label),
            Span::styled(sound, value),
        ])),
        chunks[0],
    );

    let (state, state_style) = if session.is_beat_playing() {
        ("[>]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
    } else {
        ("[.]", Style::default().fg(Color::DarkGray))
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(state, state_style),
            Span::styled(" BPM: ", label),
            Span::styled(session.tempo().to_string(), value),
        ])),
        chunks[1],
    );

    // One dot per beat, the current one lit while playing
    let dots: Vec<Span> = (0..BEATS_PER_BAR)
        .map(|beat| {
            if session.is_beat_playing() && beat == session.current_beat() {
                Span::styled("● ", Style::default().fg(palette.accent))
            } else {
                Span::styled("○ ", Style::default().fg(Color::DarkGray))
            }
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(dots)), chunks[2]);

    let clock_style = if session.is_recording() {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(if session.is_recording() { "REC " } else { "    " }, clock_style),
            Span::styled(format_clock(session.recording_time()), clock_style),
        ])),
        chunks[3],
    );

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Theme: ", label),
            Span::styled(app.theme.name, Style::default().fg(palette.primary)),
        ])),
        chunks[4],
    );
}

/// Renders the detected chord and suggestions.
pub fn render_chords(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let block = Block::default()
        .title(" Chords ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chords = app.session.chords();
    let line = match &chords.current {
        Some(current) => {
            let mut spans = vec![
                Span::styled("Playing: ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    current.clone(),
                    Style::default()
                        .fg(palette.key_active)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("   Try next: ", Style::default().fg(Color::DarkGray)),
            ];
            for chord in &chords.suggested {
                spans.push(Span::styled(
                    format!("{chord} "),
                    Style::default().fg(palette.accent),
                ));
            }
            Line::from(spans)
        }
        None => Line::from(Span::styled(
            "Hold two or more keys to see chord suggestions",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
    };
    frame.render_widget(Paragraph::new(line), inner);
}

/// Renders the one-line status bar at the bottom of the screen.
pub fn render_status_bar(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let session = &app.session;
    let layout = session.layout().layout();

    let mut spans = vec![
        Span::styled(
            format!(" {} ", layout.name),
            Style::default()
                .fg(Color::Black)
                .bg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" Oct {} ", session.octave()),
            Style::default().fg(Color::White),
        ),
    ];
    if session.transpose() != 0 {
        spans.push(Span::styled(
            format!("Tr {:+} ", session.transpose()),
            Style::default().fg(Color::Yellow),
        ));
    }
    spans.push(Span::styled(
        format!("Keys {} ", session.active_key_count()),
        Style::default().fg(Color::DarkGray),
    ));
    spans.extend(
        hint_line(&[
            ("Tab", "Focus"),
            ("Space", "Beat"),
            ("F5", "Rec"),
            ("F6", "Play"),
            ("-/=", "Octave"),
            ("F1", "Help"),
            ("Esc", "Quit"),
        ])
        .spans,
    );

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
