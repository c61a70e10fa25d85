//! Frame drawing.
//!
//! The visible typewriter is an animation over the scene's complete text;
//! the full text is always present on the [`phosphor_engine::Scene`] itself,
//! so any non-visual consumer of the app state sees it without waiting.

use rand::Rng;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};

use phosphor_engine::SceneKind;
use phosphor_story::{Background, StatValue};

use crate::app::App;
use crate::cycle::Phase;

/// Glyphs the glitch overlay corrupts cells with.
const GLITCH_GLYPHS: &[char] = &['▓', '▒', '░', '█', '╳', '#', '@', '%'];

/// Draw one frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let counting = app.cycle().countdown().is_some();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),                          // stats
            Constraint::Length(3),                          // backdrop
            Constraint::Min(5),                             // story text
            Constraint::Length(if counting { 1 } else { 0 }), // countdown
            Constraint::Length(8),                          // choices
            Constraint::Length(1),                          // status
        ])
        .split(frame.area());

    draw_stats(frame, app, chunks[0]);
    draw_backdrop(frame, app, chunks[1]);
    draw_text(frame, app, chunks[2]);
    if counting {
        draw_countdown(frame, app, chunks[3]);
    }
    draw_choices(frame, app, chunks[4]);
    draw_status(frame, app, chunks[5]);

    if app.cycle().glitching() {
        draw_glitch_overlay(frame, chunks[2]);
    }
}

fn draw_stats(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans: Vec<Span> = Vec::new();
    for (name, value) in &app.scene().stats {
        if !spans.is_empty() {
            spans.push(Span::raw("  "));
        }
        let text = match value {
            StatValue::Number(n) => format!("{}: {}", name.to_uppercase(), n),
            StatValue::Flag(_) => flag_label(name),
        };
        spans.push(Span::styled(text, Style::default().fg(Color::Green)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Split a camelCase flag name into words, uppercased: "hasKey" -> "HAS KEY".
fn flag_label(name: &str) -> String {
    let mut label = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_uppercase() && !label.is_empty() {
            label.push(' ');
        }
        label.extend(c.to_uppercase());
    }
    label
}

fn backdrop_label(backdrop: &Background) -> String {
    match backdrop {
        Background::Image(id) => format!("⬒ {id}"),
        Background::Video(id) => format!("▶ {id}"),
    }
}

fn draw_backdrop(frame: &mut Frame, app: &App, area: Rect) {
    let fade = app.backdrop();
    let mut line = Vec::new();
    if let Some(outgoing) = &fade.outgoing {
        // The old asset fades out while the new one fades in.
        line.push(Span::styled(
            backdrop_label(outgoing),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
        ));
        line.push(Span::raw("  "));
    }
    if let Some(current) = &fade.current {
        let style = if fade.alpha < 1.0 {
            Style::default().fg(Color::Gray).add_modifier(Modifier::DIM)
        } else {
            Style::default().fg(Color::White)
        };
        line.push(Span::styled(backdrop_label(current), style));
    }
    if let Some(vfx) = &app.scene().vfx {
        line.push(Span::styled(
            format!("  [{vfx}]"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    let widget = Paragraph::new(Line::from(line))
        .block(Block::default().borders(Borders::BOTTOM))
        .centered();
    frame.render_widget(widget, area);
}

fn draw_text(frame: &mut Frame, app: &App, area: Rect) {
    let revealed: String = app
        .scene()
        .text
        .chars()
        .take(app.cycle().revealed_chars())
        .collect();
    let style = match app.scene().kind {
        SceneKind::BrokenPath => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let widget = Paragraph::new(revealed)
        .style(style)
        .wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}

fn draw_countdown(frame: &mut Frame, app: &App, area: Rect) {
    if let Some((remaining, total)) = app.cycle().countdown() {
        let ratio = (remaining / total).clamp(0.0, 1.0) as f64;
        let gauge = Gauge::default()
            .ratio(ratio)
            .label(format!("{remaining:.0}s"))
            .gauge_style(Style::default().fg(Color::Red).bg(Color::Black));
        frame.render_widget(gauge, area);
    }
}

fn draw_choices(frame: &mut Frame, app: &App, area: Rect) {
    let cycle = app.cycle();
    let mut lines = Vec::new();

    if cycle.accepts_restart() {
        lines.push(Line::from(Span::styled(
            "[r] RESTART",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
    } else {
        for (index, choice) in app
            .scene()
            .choices
            .iter()
            .take(cycle.visible_choices())
            .enumerate()
        {
            let selected = index == cycle.selected();
            let marker = if selected { "> " } else { "  " };
            let mut style = Style::default().fg(Color::Cyan);
            if selected {
                style = style.add_modifier(Modifier::BOLD);
            }
            if cycle.phase() == Phase::Locked {
                style = Style::default().fg(Color::DarkGray);
            }
            lines.push(Line::from(Span::styled(
                format!("{marker}{}", choice.text),
                style,
            )));
        }
    }

    let widget = Paragraph::new(lines).block(Block::default().borders(Borders::TOP));
    frame.render_widget(widget, area);
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let hint = match app.cycle().phase() {
        Phase::Revealing => "enter: skip  q: quit",
        Phase::ChoicesVisible if app.cycle().accepts_restart() => "r: restart  q: quit",
        Phase::ChoicesVisible => "↑/↓: select  enter: choose  +/-: volume  [/]: speed  q: quit",
        Phase::Locked => "...",
    };
    let volume = (app.settings().volume * 100.0).round();
    let status = Paragraph::new(format!("{hint}  |  vol {volume:.0}%"))
        .style(Style::default().fg(Color::Black).bg(Color::White));
    frame.render_widget(status, area);
}

/// Corrupt a handful of random cells in the text area for one frame.
fn draw_glitch_overlay(frame: &mut Frame, area: Rect) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let mut rng = rand::rng();
    let cells = (area.width as usize * area.height as usize) / 12;
    let buffer = frame.buffer_mut();
    for _ in 0..cells {
        let x = area.x + rng.random_range(0..area.width);
        let y = area.y + rng.random_range(0..area.height);
        let glyph = GLITCH_GLYPHS[rng.random_range(0..GLITCH_GLYPHS.len())];
        if let Some(cell) = buffer.cell_mut((x, y)) {
            cell.set_char(glyph);
            cell.set_fg(Color::LightMagenta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_labels_split_camel_case_words() {
        assert_eq!(flag_label("hasKey"), "HAS KEY");
        assert_eq!(flag_label("sawTheAnomaly"), "SAW THE ANOMALY");
        assert_eq!(flag_label("cursed"), "CURSED");
    }

    #[test]
    fn flag_labels_do_not_lead_with_a_space() {
        assert_eq!(flag_label("Cursed"), "CURSED");
    }
}
