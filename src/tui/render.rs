//! Draws a [`DashView`] with ratatui.

use std::str::FromStr;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{DashView, FieldView};
use crate::config::ThemeSettings;
use crate::handler::HandlerVariant;
use crate::ledger::{MessageEntry, MessageType};

const HEADER_HEIGHT: u16 = 3;
const FOOTER_HEIGHT: u16 = 1;
const LOG_HEIGHT_PERCENT: u16 = 40;
const MARKER: &str = "> ";

/// Theme colors resolved once from their configured names.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub foreground: Color,
    pub background: Color,
    pub primary: Color,
    pub secondary: Color,
    pub muted: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

fn parse_color(name: &str, fallback: Color) -> Color {
    Color::from_str(name).unwrap_or_else(|_| {
        tracing::warn!(color = %name, "unknown color name");
        fallback
    })
}

impl Palette {
    pub fn from_theme(theme: &ThemeSettings) -> Self {
        Self {
            foreground: parse_color(&theme.foreground, Color::Reset),
            background: theme
                .background
                .as_deref()
                .map(|name| parse_color(name, Color::Reset))
                .unwrap_or(Color::Reset),
            primary: parse_color(&theme.primary, Color::Cyan),
            secondary: parse_color(&theme.secondary, Color::Yellow),
            muted: parse_color(&theme.muted, Color::DarkGray),
            success: parse_color(&theme.success, Color::Green),
            warning: parse_color(&theme.warning, Color::Yellow),
            error: parse_color(&theme.error, Color::Red),
        }
    }

    fn message(&self, kind: MessageType) -> Color {
        match kind {
            MessageType::Info => self.foreground,
            MessageType::Success => self.success,
            MessageType::Warning => self.warning,
            MessageType::Error => self.error,
        }
    }
}

/// Pads or cuts `text` to exactly `width` terminal columns.
fn fit(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.extend(std::iter::repeat(' ').take(width - used));
    out
}

pub fn draw(frame: &mut Frame, view: &DashView, palette: &Palette, label_width: usize) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().fg(palette.foreground).bg(palette.background)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(3),
            Constraint::Percentage(LOG_HEIGHT_PERCENT),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(area);

    draw_tabs(frame, chunks[0], view, palette);
    if let Some(cursor) = draw_fields(frame, chunks[1], view, palette, label_width) {
        frame.set_cursor_position(cursor);
    }
    draw_messages(frame, chunks[2], &view.messages, palette);
    draw_footer(frame, chunks[3], view, palette);
}

fn draw_tabs(frame: &mut Frame, area: Rect, view: &DashView, palette: &Palette) {
    let mut spans = Vec::new();
    for tab in &view.tabs {
        let style = if tab.active {
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(palette.muted)
        };
        spans.push(Span::styled(format!(" {} ", tab.title), style));
        spans.push(Span::raw(" "));
    }
    let description = view
        .active_tab_view()
        .map(|t| t.description.clone())
        .unwrap_or_default();
    let header = Paragraph::new(vec![
        Line::from(spans),
        Line::from(Span::styled(description, Style::default().fg(palette.muted))),
    ])
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

/// Returns the caret position when a field is being edited.
fn draw_fields(
    frame: &mut Frame,
    area: Rect,
    view: &DashView,
    palette: &Palette,
    label_width: usize,
) -> Option<(u16, u16)> {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if view.edit_mode {
            palette.secondary
        } else {
            palette.muted
        }));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = view
        .fields
        .iter()
        .map(|field| field_line(field, palette, label_width))
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);

    let (field, (text, cursor)) = view
        .fields
        .iter()
        .find_map(|f| f.editing.as_ref().map(|e| (f, e)))?;
    let before: String = text.chars().take(*cursor).collect();
    let x = inner.x as usize + MARKER.len() + label_width + 2 + before.width();
    let y = inner.y as usize + field.index;
    if y >= (inner.y + inner.height) as usize || x >= (inner.x + inner.width) as usize {
        return None;
    }
    Some((x as u16, y as u16))
}

fn field_line<'a>(field: &'a FieldView, palette: &Palette, label_width: usize) -> Line<'a> {
    let accent = field
        .color
        .as_deref()
        .map(|name| parse_color(name, palette.primary))
        .unwrap_or(palette.primary);
    let marker = if field.focused { MARKER } else { "  " };
    let label_style = if field.focused {
        Style::default().fg(accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.foreground)
    };

    let value = match &field.editing {
        Some((text, _)) => text.clone(),
        None => field.value.clone(),
    };
    let value_style = match (field.variant, field.editing.is_some()) {
        (_, true) => Style::default().fg(palette.secondary),
        (HandlerVariant::Execution, _) => Style::default().fg(accent).add_modifier(Modifier::BOLD),
        (HandlerVariant::Display, _) => Style::default().fg(palette.muted),
        _ => Style::default().fg(palette.foreground),
    };

    let mut spans = vec![
        Span::styled(marker, Style::default().fg(accent)),
        Span::styled(fit(&field.label, label_width), label_style),
        Span::raw(" ["),
        Span::styled(value, value_style),
        Span::raw("]"),
    ];
    if field.running {
        spans.push(Span::styled(" running...", Style::default().fg(palette.warning)));
    } else if let Some(latest) = &field.latest {
        spans.push(Span::styled(
            format!("  {}", latest.content),
            Style::default().fg(palette.message(latest.kind)),
        ));
    }
    Line::from(spans)
}

fn draw_messages(frame: &mut Frame, area: Rect, messages: &[MessageEntry], palette: &Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" messages ")
        .border_style(Style::default().fg(palette.muted));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let skip = messages.len().saturating_sub(inner.height as usize);
    let lines: Vec<Line> = messages[skip..]
        .iter()
        .map(|m| {
            Line::from(vec![
                Span::styled(
                    m.timestamp.format("%H:%M:%S ").to_string(),
                    Style::default().fg(palette.muted),
                ),
                Span::styled(
                    format!("{:<10} ", m.handler_name),
                    Style::default().fg(palette.primary),
                ),
                Span::styled(m.content.clone(), Style::default().fg(palette.message(m.kind))),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_footer(frame: &mut Frame, area: Rect, view: &DashView, palette: &Palette) {
    let mut text = if view.edit_mode {
        "enter: save  esc: discard  ←/→: move".to_string()
    } else {
        "←/→: field  tab: next tab  enter: edit/run  esc: cancel  ctrl+c: quit".to_string()
    };
    for shortcut in &view.shortcuts {
        text.push_str(&format!("  {}: {}", shortcut.key, shortcut.description));
    }
    frame.render_widget(
        Paragraph::new(Span::styled(text, Style::default().fg(palette.muted))),
        area,
    );
}

#[cfg(test)]
#[path = "../../tests/unit/tui/render.rs"]
mod tests;
