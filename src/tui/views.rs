//! TUI Views
//!
//! Rendering for the list and detail views plus the prompt, confirm,
//! and help overlays. All functions read `AppState` and draw; nothing
//! here mutates state.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

use super::colors;
use super::state::{AppState, InteractionMode, View};
use crate::forecast::{Assessment, TrackerEntry, Urgency};
use crate::format::{format_datetime, format_duration, format_duration_signed, format_relative};

const NAME_WIDTH: usize = 24;

/// Render the whole frame from application state.
pub fn render(state: &AppState, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_header(state, frame, chunks[0]);

    match state.current_view {
        View::List => render_list(state, frame, chunks[1]),
        View::Detail => render_detail(state, frame, chunks[1]),
    }

    match &state.interaction_mode {
        InteractionMode::Prompt(kind) => render_prompt(state, kind.label(), frame, chunks[2]),
        _ => render_footer(state, frame, chunks[2]),
    }

    match &state.interaction_mode {
        InteractionMode::Confirm(dialog) => render_confirm(&dialog.message, frame),
        InteractionMode::Help => render_help(frame),
        _ => {}
    }
}

fn render_header(state: &AppState, frame: &mut Frame, area: Rect) {
    let mut spans = vec![
        Span::styled(
            "trakr",
            Style::default()
                .fg(colors::HEADER)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(page_banner(state), Style::default().fg(colors::HEADER)),
        Span::raw("  sort: "),
        Span::styled(
            state.sort_key.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];
    if state.reverse {
        spans.push(Span::raw(" (reversed)"));
    }
    spans.push(Span::raw(format!("  {} trackers", state.entries.len())));

    let header = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

/// One filled dot for the current page, hollow dots for the rest.
fn page_banner(state: &AppState) -> String {
    let pages = state.page_count();
    (0..pages)
        .map(|p| if p == state.page { '⏺' } else { '○' })
        .collect()
}

fn render_list(state: &AppState, frame: &mut Frame, area: Rect) {
    let mut items: Vec<ListItem> = vec![ListItem::new(Span::styled(
        format!(
            "   {:<name$} {:<14} {:<16} {:<18} {}",
            "NAME",
            "LAST",
            "DUE",
            "EVERY",
            "TREND",
            name = NAME_WIDTH,
        ),
        Style::default().fg(colors::DIM),
    ))];

    let page_start = state.page_start();
    for (row, entry) in state.visible_entries().iter().enumerate() {
        let tag = AppState::tag_for(row);
        let text = format!("{tag}  {}", list_row(entry, state));
        let mut style = Style::default().fg(urgency_color(&entry.assessment));
        if state.selected == Some(page_start + row) {
            style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
        }
        items.push(ListItem::new(Span::styled(text, style)));
    }

    if state.entries.is_empty() {
        items.push(ListItem::new(Span::styled(
            "   no trackers yet (press 'a' to add one)",
            Style::default().fg(colors::DIM),
        )));
    }

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Trackers"));
    frame.render_widget(list, area);
}

/// One line of the list table, without the tag column.
fn list_row(entry: &TrackerEntry, state: &AppState) -> String {
    let last = match entry.tracker.last_completed() {
        Some(at) => format_datetime(at),
        None => "never".to_string(),
    };
    let due = match entry.assessment.forecast {
        Some(forecast) => format_relative(forecast.due_at, state.now),
        None => "n/a".to_string(),
    };
    let (every, trend) = match entry.assessment.stats {
        Some(stats) => (
            format!(
                "{} ±{}",
                format_duration(stats.average),
                format_duration(stats.spread)
            ),
            stats.trend.arrow().to_string(),
        ),
        None => ("n/a".to_string(), " ".to_string()),
    };

    format!(
        "{:<name$} {:<14} {:<16} {:<18} {}",
        truncate_name(&entry.tracker.name, NAME_WIDTH),
        last,
        due,
        every,
        trend,
        name = NAME_WIDTH,
    )
}

fn render_detail(state: &AppState, frame: &mut Frame, area: Rect) {
    let Some(entry) = state.selected_entry() else {
        let empty = Paragraph::new("no tracker selected")
            .block(Block::default().borders(Borders::ALL).title("Detail"));
        frame.render_widget(empty, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(0)])
        .split(area);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                entry.tracker.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  (id {})", entry.tracker.id),
                Style::default().fg(colors::DIM),
            ),
        ]),
        Line::from(format!("sigma: {}", entry.tracker.sigma)),
    ];

    match (entry.assessment.stats, entry.assessment.forecast) {
        (Some(stats), Some(forecast)) => {
            lines.push(Line::from(format!(
                "every: {} ±{}  trend: {} {}",
                format_duration(stats.average),
                format_duration(stats.spread),
                stats.trend.arrow(),
                stats.trend.as_str(),
            )));
            lines.push(Line::from(format!(
                "due: {} ({})",
                format_datetime(forecast.due_at),
                format_relative(forecast.due_at, state.now),
            )));
            lines.push(Line::from(format!(
                "window: {} .. {}",
                format_datetime(forecast.early),
                format_datetime(forecast.late),
            )));
            if let Some(urgency) = entry.assessment.urgency {
                lines.push(Line::from(Span::styled(
                    format!("status: {urgency}"),
                    Style::default().fg(urgency_color(&entry.assessment)),
                )));
            }
        }
        _ => {
            lines.push(Line::from(Span::styled(
                "no forecast yet (needs two completions)",
                Style::default().fg(colors::DIM),
            )));
        }
    }

    let info = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Tracker"));
    frame.render_widget(info, chunks[0]);

    render_history(entry, frame, chunks[1]);
}

fn render_history(entry: &TrackerEntry, frame: &mut Frame, area: Rect) {
    let history = &entry.tracker.history;
    let capacity = area.height.saturating_sub(2) as usize;
    let skip = history.len().saturating_sub(capacity);

    let lines: Vec<Line> = history
        .iter()
        .enumerate()
        .skip(skip)
        .map(|(i, record)| {
            let mut text = format!("{:>3}. {}", i + 1, format_datetime(record.completed_at));
            if !record.adjustment.is_zero() {
                text.push_str(&format!("  {}", format_duration_signed(record.adjustment)));
            }
            Line::from(text)
        })
        .collect();

    let title = format!("History ({})", history.len());
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(paragraph, area);
}

fn render_footer(state: &AppState, frame: &mut Frame, area: Rect) {
    let line = match &state.status_message {
        Some(message) => Line::from(Span::styled(
            message.clone(),
            Style::default().fg(colors::DUE),
        )),
        None => {
            let mut spans = Vec::new();
            for (key, label) in [
                ("a", "add"),
                ("c", "done"),
                ("r", "rename"),
                ("g", "sigma"),
                ("d", "delete"),
                ("s", "sort"),
                ("v", "reverse"),
                ("enter", "detail"),
                ("?", "help"),
                ("q", "quit"),
            ] {
                spans.push(Span::styled(key, Style::default().fg(colors::KEYBIND)));
                spans.push(Span::raw(format!(" {label}  ")));
            }
            Line::from(spans)
        }
    };

    let footer = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

fn render_prompt(state: &AppState, label: &str, frame: &mut Frame, area: Rect) {
    let content = state.prompt_input.content();
    let cursor = state.prompt_input.cursor_chars();

    let before: String = content.chars().take(cursor).collect();
    let at: String = content.chars().nth(cursor).map_or(" ".to_string(), |c| c.to_string());
    let after: String = content.chars().skip(cursor + 1).collect();

    let line = Line::from(vec![
        Span::styled(
            format!("{label}: "),
            Style::default()
                .fg(colors::KEYBIND)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(before),
        Span::styled(at, Style::default().add_modifier(Modifier::REVERSED)),
        Span::raw(after),
    ]);

    let prompt = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(prompt, area);
}

fn render_confirm(message: &str, frame: &mut Frame) {
    let area = centered_rect(50, 5, frame.area());
    frame.render_widget(Clear, area);

    let paragraph = Paragraph::new(message.to_string())
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Confirm")
                .border_style(Style::default().fg(colors::DUE)),
        );
    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 16, frame.area());
    frame.render_widget(Clear, area);

    let lines: Vec<Line> = [
        ("up/down", "select tracker"),
        ("left/right", "switch page"),
        ("enter", "open detail"),
        ("esc", "back / cancel"),
        ("a", "add tracker"),
        ("c", "record completion"),
        ("r", "rename tracker"),
        ("g", "set sigma"),
        ("d", "delete tracker"),
        ("s", "cycle sort key"),
        ("v", "reverse sort"),
        ("q / ctrl-c", "quit"),
    ]
    .iter()
    .map(|(key, action)| {
        Line::from(vec![
            Span::styled(
                format!("{key:>12}"),
                Style::default().fg(colors::KEYBIND),
            ),
            Span::raw(format!("  {action}")),
        ])
    })
    .collect();

    let help = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Help")
            .border_style(Style::default().fg(colors::HEADER)),
    );
    frame.render_widget(help, area);
}

/// Urgency color for a row, dim when there is no forecast.
fn urgency_color(assessment: &Assessment) -> Color {
    match assessment.urgency {
        Some(Urgency::Overdue) => colors::OVERDUE,
        Some(Urgency::DueNow) => colors::DUE,
        Some(Urgency::NotYet) => colors::NOT_YET,
        None => colors::DIM,
    }
}

fn truncate_name(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        return name.to_string();
    }
    let mut out: String = name.chars().take(max.saturating_sub(1)).collect();
    out.push('~');
    out
}

/// Centered rectangle of fixed width percentage and height in rows.
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let height = height.min(area.height);
    let width = (area.width as u32 * percent_x as u32 / 100) as u16;
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}
