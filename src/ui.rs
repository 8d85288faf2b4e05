//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`, plus the
//! geometry helpers the event loop uses to map mouse clicks onto clip rows.

use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, CopiedField, Overlay};
use crate::config::UiSettings;
use crate::player::{MediaBackend, Playback, PlayerPhase};
use crate::reel::Clip;

const CONTROLS: &[(&str, &str)] = &[
    ("space", "play/pause"),
    ("enter", "play clip"),
    ("j/k", "up/down"),
    ("h/l", "prev/next clip"),
    ("0-9", "seek in clip"),
    ("t", "tracks"),
    ("s", "share"),
    ("q", "quit"),
];

/// Columns taken by the cursor marker in front of each clip row.
const MARKER_WIDTH: u16 = 2;

/// Screen regions, top to bottom.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Areas {
    pub header: Rect,
    pub status: Rect,
    pub transport: Rect,
    pub clips: Rect,
    pub footer: Rect,
}

pub fn areas(area: Rect) -> Areas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(area);
    Areas {
        header: chunks[0],
        status: chunks[1],
        transport: chunks[2],
        clips: chunks[3],
        footer: chunks[4],
    }
}

/// Rows `start..end` of a list of `total` rows shown in `height` lines,
/// centred on `selected` when possible.
pub fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize) {
    if total <= height || height == 0 {
        return (0, total);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

/// Map a click at (`column`, `row`) inside the bordered clip list to a clip
/// index and the horizontal fraction of the row that was hit.
pub fn clip_at(
    list: Rect,
    total: usize,
    cursor: usize,
    column: u16,
    row: u16,
) -> Option<(usize, f64)> {
    let inner = inner(list);
    if inner.width <= MARKER_WIDTH
        || row < inner.y
        || row >= inner.y + inner.height
        || column < inner.x
        || column >= inner.x + inner.width
    {
        return None;
    }
    let (start, end) = visible_window(total, inner.height as usize, cursor);
    let index = start + (row - inner.y) as usize;
    if index >= end {
        return None;
    }
    let content_x = inner.x + MARKER_WIDTH;
    let width = f64::from(inner.width - MARKER_WIDTH);
    let fraction = (f64::from(column.saturating_sub(content_x)) / width).clamp(0.0, 1.0);
    Some((index, fraction))
}

fn inner(r: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(r)
}

/// Format seconds as `M:SS`.
pub fn format_clock(secs: f64) -> String {
    let total = if secs.is_finite() && secs > 0.0 {
        secs.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

fn clip_times<B: MediaBackend>(app: &App<B>, clip: &Clip) -> String {
    let timing = app.player.timing();
    if timing.is_open_ended(clip) {
        match app.player.duration() {
            Some(d) => format!("{} - {}", format_clock(clip.start), format_clock(d)),
            None => format!("{} - end", format_clock(clip.start)),
        }
    } else {
        format!("{} - {}", format_clock(clip.start), format_clock(clip.end))
    }
}

fn phase_text(phase: PlayerPhase, playback: Playback) -> &'static str {
    match phase {
        PlayerPhase::NoTrack => "No track",
        PlayerPhase::TrackLoading => "Loading",
        PlayerPhase::Idle => "Ready",
        PlayerPhase::PlayingClip(_) if playback == Playback::Requested => "Starting",
        PlayerPhase::PlayingClip(_) => "Playing",
        PlayerPhase::PausedClip(_) => "Paused",
    }
}

fn theme(ui: &UiSettings) -> Color {
    ui.theme_color.parse::<Color>().unwrap_or(Color::Indexed(63))
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn left_padded() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

/// Render the entire UI into the provided `frame`.
pub fn draw<B: MediaBackend>(frame: &mut Frame, app: &App<B>, ui: &UiSettings, now: Instant) {
    let areas = areas(frame.area());
    let accent = theme(ui);

    let header = Paragraph::new(ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" voclip ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, areas.header);

    draw_status(frame, app, areas.status);
    draw_transport(frame, app, areas.transport, accent);
    draw_clips(frame, app, ui, areas.clips, accent);

    let footer_text = CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect::<Vec<_>>()
        .join(" | ");
    let footer = Paragraph::new(footer_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(left_padded()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, areas.footer);

    match app.overlay {
        Overlay::Picker => draw_picker(frame, app, areas.clips, accent),
        Overlay::Share => draw_share(frame, app, areas.clips, now),
        Overlay::None => {}
    }

    if let Some(message) = app.toast(now) {
        let width = (message.chars().count() as u16).saturating_add(4);
        let area = frame.area();
        let toast_area = Rect {
            x: area.x + area.width.saturating_sub(width + 1),
            y: areas.footer.y.saturating_sub(3),
            width: width.min(area.width),
            height: 3,
        };
        frame.render_widget(Clear, toast_area);
        frame.render_widget(
            Paragraph::new(message)
                .bold()
                .block(Block::bordered().border_style(Style::default().fg(accent))),
            toast_area,
        );
    }
}

fn draw_status<B: MediaBackend>(frame: &mut Frame, app: &App<B>, area: Rect) {
    let player = &app.player;
    let mut parts: Vec<String> = Vec::new();

    match player.selected_track() {
        Some(track) => parts.push(format!("Track: {}", track.name)),
        None => parts.push("No tracks in reel".to_string()),
    }
    if let (Some(clip), Some(i)) = (player.current_clip(), player.current_clip_index()) {
        let end = player.effective_end(i).unwrap_or(clip.end);
        parts.push(format!(
            "Clip: {} [{} / {}]",
            clip.name,
            format_clock(player.current_time()),
            format_clock(end)
        ));
    }
    parts.push(phase_text(player.phase(), player.playback()).to_string());
    parts.push(format!("Link: {}", player.link().as_str()));

    let status = Paragraph::new(parts.join(" • "))
        .block(Block::bordered().padding(left_padded()).title(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, area);
}

fn draw_transport<B: MediaBackend>(frame: &mut Frame, app: &App<B>, area: Rect, accent: Color) {
    let player = &app.player;
    let enabled = |on: bool| {
        if on {
            Style::default().fg(accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };
    let controls = player.has_controls();
    let play_label = if player.is_playing() {
        "⏸ pause"
    } else {
        "▶ play"
    };
    let line = Line::from(vec![
        Span::styled("⏮ prev", enabled(controls && player.can_go_previous())),
        Span::raw("    "),
        Span::styled(play_label, enabled(controls)),
        Span::raw("    "),
        Span::styled("next ⏭", enabled(controls && player.can_go_next())),
    ]);
    frame.render_widget(
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .block(Block::bordered()),
        area,
    );
}

fn draw_clips<B: MediaBackend>(
    frame: &mut Frame,
    app: &App<B>,
    ui: &UiSettings,
    area: Rect,
    accent: Color,
) {
    let block = Block::default().borders(Borders::ALL).title(" clips ");
    let Some(track) = app.player.selected_track() else {
        frame.render_widget(Paragraph::new("Nothing to play.").block(block), area);
        return;
    };
    if track.clips.is_empty() {
        frame.render_widget(
            Paragraph::new("This track has no clips.").block(block),
            area,
        );
        return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let total = track.clips.len();
    let (start, end) = visible_window(total, inner.height as usize, app.cursor);
    let content_width = inner.width.saturating_sub(MARKER_WIDTH) as usize;

    let lines: Vec<Line> = (start..end)
        .map(|i| {
            let clip = &track.clips[i];
            let marker = if i == app.cursor { "> " } else { "  " };
            let mut text = clip.name.clone();
            if ui.show_clip_times {
                text = format!("{text}  ({})", clip_times(app, clip));
            }
            let mut chars: Vec<char> = text.chars().take(content_width).collect();
            chars.resize(content_width, ' ');

            let progress = app.player.clip_progress(i);
            let filled = ((progress / 100.0) * content_width as f64).round() as usize;
            let filled = filled.min(content_width);
            let fill_style = Style::default().bg(accent).fg(Color::White);
            let mut row_style = Style::default();
            if app.player.current_clip_index() == Some(i) {
                row_style = row_style.add_modifier(Modifier::BOLD);
            }

            Line::from(vec![
                Span::styled(marker, row_style),
                Span::styled(chars[..filled].iter().collect::<String>(), fill_style.patch(row_style)),
                Span::styled(chars[filled..].iter().collect::<String>(), row_style),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_picker<B: MediaBackend>(frame: &mut Frame, app: &App<B>, area: Rect, accent: Color) {
    let popup = centered_rect_sized(60, 14, area);
    frame.render_widget(Clear, popup);

    let tracks = app.player.tracks();
    let indices = app.picker_indices();
    let items: Vec<ListItem> = indices
        .iter()
        .map(|&i| {
            // Matched characters are shown upper-cased.
            let positions = app.picker_match_positions(i);
            let mut rendered = String::new();
            for (ci, ch) in tracks[i].name.chars().enumerate() {
                if positions.contains(&ci) {
                    rendered.extend(ch.to_uppercase());
                } else {
                    rendered.push(ch);
                }
            }
            if app.player.selected_index() == Some(i) {
                rendered.push_str("  ♪");
            }
            ListItem::new(rendered)
        })
        .collect();

    let block = Block::bordered()
        .border_style(Style::default().fg(accent))
        .title(format!(" tracks: {}_ ", app.picker_query))
        .title_bottom(" [enter] load | [esc] close ");
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !indices.is_empty() {
        state.select(Some(app.picker_selected.min(indices.len() - 1)));
    }
    frame.render_stateful_widget(list, popup, &mut state);
}

fn draw_share<B: MediaBackend>(frame: &mut Frame, app: &App<B>, area: Rect, now: Instant) {
    let popup = centered_rect_sized(78, 12, area);
    frame.render_widget(Clear, popup);

    let label = |field: CopiedField, name: &'static str| {
        if app.is_copied(field, now) {
            Span::styled(format!("{name} (copied)"), Style::default().fg(Color::Green).bold())
        } else {
            Span::styled(name, Style::default().bold())
        }
    };
    let text = vec![
        Line::from(label(CopiedField::Link, "Link")),
        Line::from(app.share_link()),
        Line::from(""),
        Line::from(label(CopiedField::Embed, "Embed code")),
        Line::from(app.embed_code()),
    ];
    let share = Paragraph::new(text)
        .block(
            Block::bordered()
                .padding(left_padded())
                .title(" share ")
                .title_bottom(" [c] copy link | [e] copy embed | [esc] close "),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(share, popup);
}

#[cfg(test)]
mod tests;
