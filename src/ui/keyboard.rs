//! Piano keyboard display.
//!
//! Draws the on-screen piano, labels the keys reachable from the computer
//! keyboard, and lights up the keys currently held. When the terminal is too
//! narrow for every octave, a window around the mapped octaves is shown.

use super::{panel_block, Palette};
use crate::app::App;
use crate::keys::{black_key_after, split_keys, PianoKey};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Columns per white key.
const WHITE_WIDTH: u16 = 3;

/// Rows of the black key zone (from the top of the keys).
const BLACK_ROWS: usize = 3;

/// A character cell of the piano drawing.
#[derive(Debug, Clone, Copy)]
struct Cell {
    ch: char,
    style: Style,
}

/// Index of the first white key to draw so the mapped range stays visible.
///
/// # Arguments
///
/// * `whites` - All white keys, low to high
/// * `visible` - How many white keys fit
/// * `anchor` - Key id of the lowest mapped key (e.g. "C4")
fn first_visible_white(whites: &[&PianoKey], visible: usize, anchor: &str) -> usize {
    if whites.len() <= visible {
        return 0;
    }
    let anchor_index = whites.iter().position(|k| k.id == anchor).unwrap_or(0);
    // Leave a couple of keys of context below the mapped range
    anchor_index
        .saturating_sub(2)
        .min(whites.len() - visible)
}

fn key_style(active: bool, black: bool, palette: &Palette) -> Style {
    match (active, black) {
        (true, _) => Style::default()
            .fg(Color::Black)
            .bg(palette.key_active)
            .add_modifier(Modifier::BOLD),
        (false, false) => Style::default().fg(Color::Black).bg(Color::White),
        (false, true) => Style::default().fg(Color::White).bg(Color::Black),
    }
}

/// Renders the piano keyboard at the bottom of the screen.
///
/// # Arguments
///
/// * `frame` - The frame to render to
/// * `area` - The area to render in
/// * `app` - Application state
/// * `palette` - Colours of the active theme
/// * `focused` - Whether this panel is focused
pub fn render_keyboard(frame: &mut Frame, area: Rect, app: &App, palette: &Palette, focused: bool) {
    let session = &app.session;
    let layout = session.layout().layout();
    let block = panel_block(
        format!(
            " Piano ({} {}, Octave {}) ",
            layout.name,
            layout.display(),
            session.octave()
        ),
        focused,
        palette,
    );

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 2 || inner.width < WHITE_WIDTH {
        return;
    }

    let keys = &app.piano_keys;
    let (whites, _) = split_keys(keys);
    let visible = ((inner.width / WHITE_WIDTH) as usize).min(whites.len());
    let anchor = session
        .mapping()
        .iter()
        .next()
        .map_or(String::new(), |(_, note)| note.to_string());
    let first = first_visible_white(&whites, visible, &anchor);

    let width = visible * WHITE_WIDTH as usize;
    let height = inner.height as usize;
    let label_row = height - 1;
    let mut grid = vec![
        vec![
            Cell {
                ch: ' ',
                style: Style::default(),
            };
            width
        ];
        height
    ];

    let w = WHITE_WIDTH as usize;
    for (slot, white) in whites[first..first + visible].iter().enumerate() {
        let x = slot * w;
        let style = key_style(session.is_key_active(&white.id), false, palette);
        for row in grid.iter_mut() {
            for col in x..x + w {
                row[col] = Cell { ch: ' ', style };
            }
            row[x + w - 1].ch = '│';
            row[x + w - 1].style = style.fg(Color::DarkGray);
        }

        // Octave marker on C keys, mapped key label at the bottom
        if white.note == "C" && height > BLACK_ROWS + 1 {
            for (i, ch) in white.id.chars().take(w - 1).enumerate() {
                grid[label_row - 1][x + i] = Cell {
                    ch,
                    style: style.fg(Color::DarkGray),
                };
            }
        }
        if let Some(physical) = session.mapping().key_for_note(&white.id) {
            if let Some(ch) = physical.chars().next() {
                grid[label_row][x + 1] = Cell {
                    ch: ch.to_uppercase().next().unwrap_or(ch),
                    style: style.add_modifier(Modifier::BOLD),
                };
            }
        }
    }

    // Black keys straddle the boundary to the next white key
    let black_rows = BLACK_ROWS.min(height.saturating_sub(1));
    for (slot, white) in whites[first..first + visible].iter().enumerate() {
        let Some(black) = black_key_after(keys, white) else {
            continue;
        };
        let x = slot * w + w - 1;
        if x + 1 >= width {
            continue;
        }
        let style = key_style(session.is_key_active(&black.id), true, palette);
        for row in grid.iter_mut().take(black_rows) {
            row[x] = Cell { ch: ' ', style };
            row[x + 1] = Cell { ch: ' ', style };
        }
        if let Some(physical) = session.mapping().key_for_note(&black.id) {
            if let (Some(ch), Some(row)) = (physical.chars().next(), black_rows.checked_sub(1)) {
                grid[row][x] = Cell {
                    ch: ch.to_uppercase().next().unwrap_or(ch),
                    style: style.add_modifier(Modifier::BOLD),
                };
            }
        }
    }

    let lines: Vec<Line> = grid
        .into_iter()
        .map(|row| {
            Line::from(
                row.into_iter()
                    .map(|cell| Span::styled(cell.ch.to_string(), cell.style))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    let offset = (inner.width as usize - width) / 2;
    let piano_area = Rect::new(inner.x + offset as u16, inner.y, width as u16, inner.height);
    frame.render_widget(Paragraph::new(lines), piano_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::generate_keys;

    #[test]
    fn test_window_keeps_anchor_visible() {
        let keys = generate_keys(7);
        let whites: Vec<&PianoKey> = keys.iter().filter(|k| !k.is_black()).collect();

        assert_eq!(first_visible_white(&whites, 100, "C4"), 0);

        let first = first_visible_white(&whites, 20, "C4");
        let c4 = whites.iter().position(|k| k.id == "C4").unwrap();
        assert!(first <= c4 && c4 < first + 20);

        // Near the top the window stops at the last key
        let first = first_visible_white(&whites, 20, "C8");
        assert_eq!(first, whites.len() - 20);
    }
}
