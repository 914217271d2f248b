//! Help overlay rendering.
//!
//! Displays keyboard shortcuts in a modal overlay.

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::{centered_rect, Palette};

/// Key binding entry for the help display.
struct KeyBinding {
    key: &'static str,
    description: &'static str,
}

const GENERAL_BINDINGS: &[KeyBinding] = &[
    KeyBinding {
        key: "F1 / ?",
        description: "Toggle this help",
    },
    KeyBinding {
        key: "Esc",
        description: "Close overlay, or quit",
    },
    KeyBinding {
        key: "Ctrl+C / Ctrl+Q",
        description: "Quit",
    },
    KeyBinding {
        key: "Tab / Shift+Tab",
        description: "Cycle focus between panels",
    },
    KeyBinding {
        key: "F2",
        description: "Next keyboard layout",
    },
    KeyBinding {
        key: "F3",
        description: "Choose a theme",
    },
    KeyBinding {
        key: "F9",
        description: "Reload sounds and beats",
    },
];

const PLAYING_BINDINGS: &[KeyBinding] = &[
    KeyBinding {
        key: "Layout keys",
        description: "Play notes (labels shown on the piano)",
    },
    KeyBinding {
        key: "- / =",
        description: "Octave down / up",
    },
    KeyBinding {
        key: "PgUp / PgDn",
        description: "Transpose up / down a semitone",
    },
    KeyBinding {
        key: "Left / Right",
        description: "Octave (piano focused)",
    },
];

const PANEL_BINDINGS: &[KeyBinding] = &[
    KeyBinding {
        key: "Up / Down",
        description: "Move the highlight",
    },
    KeyBinding {
        key: "Enter",
        description: "Use sound, pick beat, or play take",
    },
    KeyBinding {
        key: "Left / Right",
        description: "Category, tempo, or effect value",
    },
    KeyBinding {
        key: "Space",
        description: "Start / stop the beat",
    },
    KeyBinding {
        key: "F8",
        description: "Reset effects",
    },
];

const RECORDER_BINDINGS: &[KeyBinding] = &[
    KeyBinding {
        key: "F5",
        description: "Start / stop recording",
    },
    KeyBinding {
        key: "F6",
        description: "Play / stop the last take",
    },
    KeyBinding {
        key: "F7",
        description: "Export the last take",
    },
    KeyBinding {
        key: "Delete",
        description: "Delete highlighted take (recorder focused)",
    },
];

/// Renders the help overlay.
///
/// # Arguments
///
/// * `frame` - The frame to render to
/// * `scroll` - Lines scrolled past
/// * `palette` - Colours of the active theme
pub fn render_help(frame: &mut Frame, scroll: u16, palette: &Palette) {
    let area = centered_rect(70, 80, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help - Keyboard Shortcuts ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Scrollable content
            Constraint::Length(1), // Fixed footer
        ])
        .split(inner);

    let section_style = Style::default()
        .fg(palette.primary)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let key_style = Style::default()
        .fg(palette.accent)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(Color::White);

    let sections: [(&'static str, &[KeyBinding]); 4] = [
        ("General", GENERAL_BINDINGS),
        ("Playing", PLAYING_BINDINGS),
        ("Panels", PANEL_BINDINGS),
        ("Recorder", RECORDER_BINDINGS),
    ];

    let mut lines: Vec<Line<'static>> = Vec::new();
    for (title, bindings) in sections {
        lines.push(Line::from(Span::styled(title, section_style)));
        for binding in bindings {
            lines.push(Line::from(vec![
                Span::styled(format!("{:18}", binding.key), key_style),
                Span::styled(binding.description, desc_style),
            ]));
        }
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), chunks[0]);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "Up/Down scroll, Esc close",
            Style::default().fg(Color::DarkGray),
        ))),
        chunks[1],
    );
}
