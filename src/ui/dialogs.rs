//! Overlays and full-screen states: theme picker, loading, load error, toasts.

use super::{centered_popup, centered_rect, Palette};
use crate::app::{App, ToastLevel};
use crate::theme::themes;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

/// Renders the theme picker popup.
pub fn render_theme_picker(frame: &mut Frame, app: &App, palette: &Palette) {
    let Some(highlighted) = app.theme_picker else {
        return;
    };

    let area = centered_rect(50, 60, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Theme ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.primary));

    let items: Vec<ListItem> = themes()
        .iter()
        .map(|theme| {
            let current = theme.id == app.theme.id;
            let swatch = Palette::from_theme(theme);
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled("■", Style::default().fg(swatch.primary)),
                    Span::styled("■", Style::default().fg(swatch.accent)),
                    Span::styled("■ ", Style::default().fg(swatch.key_active)),
                    Span::styled(
                        theme.name,
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        if current { "  (current)" } else { "" },
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
                Line::from(Span::styled(
                    format!("    {}", theme.description),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Rgb(40, 40, 40)))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(highlighted));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Renders the screen shown while the catalogs load.
pub fn render_loading_screen(frame: &mut Frame, area: Rect, palette: &Palette) {
    // Border plus three lines of text
    let popup = centered_popup(50, 5, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.secondary));
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                "keystudio",
                Style::default()
                    .fg(palette.primary)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Loading sounds and beats...",
                Style::default().fg(Color::White),
            )),
        ])
        .alignment(Alignment::Center)
        .block(block),
        popup,
    );
}

/// Renders the blocking error screen after a failed load.
pub fn render_error_screen(frame: &mut Frame, area: Rect, message: &str, palette: &Palette) {
    let popup = centered_popup(60, 8, area);
    let block = Block::default()
        .title(" Failed to load studio ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                message.to_string(),
                Style::default().fg(Color::White),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("[", Style::default().fg(Color::DarkGray)),
                Span::styled("r", Style::default().fg(palette.accent)),
                Span::styled("] Reload  ", Style::default().fg(Color::DarkGray)),
                Span::styled("[", Style::default().fg(Color::DarkGray)),
                Span::styled("Esc", Style::default().fg(palette.accent)),
                Span::styled("] Quit", Style::default().fg(Color::DarkGray)),
            ]),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block),
        popup,
    );
}

/// Renders the current toast in the top-right corner.
pub fn render_toast(frame: &mut Frame, app: &App) {
    let Some(toast) = &app.toast else {
        return;
    };

    let (icon, color) = match toast.level {
        ToastLevel::Info => ("i", Color::Cyan),
        ToastLevel::Success => ("✓", Color::Green),
        ToastLevel::Warning => ("!", Color::Yellow),
        ToastLevel::Error => ("x", Color::Red),
    };

    let screen = frame.area();
    let width = (toast.message.chars().count() as u16 + 6).min(screen.width);
    let area = Rect::new(screen.right().saturating_sub(width), screen.y, width, 3.min(screen.height));

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                format!("{icon} "),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(toast.message.clone(), Style::default().fg(Color::White)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        ),
        area,
    );
}
