use crate::app::App;
use crate::engine::Millis;
use crate::ui::utils::{blend, hex_to_rgb, render_footer, render_header};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{LineGauge, Paragraph},
    Frame,
};

/// Fade-in time for a line that just became active.
pub const HIGHLIGHT_MS: Millis = 300;
const LINES_BEFORE: usize = 1;
const LINES_AFTER: usize = 2;

pub fn draw(f: &mut Frame, app: &App) {
    render_header(f, app);

    let (sequence, progress) = regions(f.area());
    if app.view.sequence_rendered {
        draw_sequence(f, app, sequence);
    }
    draw_progress(f, app, progress);

    let playback = app.stage.playback();
    let back = if playback.position() == 0 { "" } else { "←: back | " };
    let forward = if playback.is_last() { "→: finish" } else { "→: next" };
    let hints = format!(
        "{back}{forward} | p: {} | e: end | o: letter | click: jump | +/-: speed {} | m: music | q: quit",
        if app.view.playing { "pause" } else { "play" },
        playback.speed(),
    );
    render_footer(f, app, &hints);
}

/// Line window and progress row for a terminal of the given area.
fn regions(area: Rect) -> (Rect, Rect) {
    let vertical_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Percentage(60),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .split(area);

    let horizontal = |area: Rect| {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Fill(1),
                Constraint::Percentage(80),
                Constraint::Fill(1),
            ])
            .split(area)[1]
    };

    (horizontal(vertical_layout[1]), horizontal(vertical_layout[2]))
}

pub fn sequence_area(area: Rect) -> Rect {
    regions(area).0
}

/// Wrapped rows around the active line. Each row carries the sentence it
/// belongs to; the gaps between sentences carry none.
struct Window {
    active: usize,
    rows: Vec<(Option<usize>, String)>,
    scroll: usize,
}

fn window(app: &App, area: Rect) -> Option<Window> {
    let active = app.view.active?;
    let sentences = app.stage.letter().sentences();
    let width = area.width.max(1) as usize;

    let first = active.saturating_sub(LINES_BEFORE);
    let last = (active + LINES_AFTER).min(sentences.len().saturating_sub(1));

    let mut rows = Vec::new();
    let mut active_top = 0;
    for (index, sentence) in sentences.iter().enumerate().take(last + 1).skip(first) {
        if index == active {
            active_top = rows.len();
        }
        for row in textwrap::wrap(sentence, width) {
            rows.push((Some(index), row.into_owned()));
        }
        rows.push((None, String::new()));
    }

    // keep the active line a third of the way down
    let anchor = (area.height as usize / 3).min(active_top);
    Some(Window {
        active,
        rows,
        scroll: active_top - anchor,
    })
}

/// Sentence drawn at a terminal cell, if any.
pub fn sentence_at(app: &App, screen: Rect, column: u16, row: u16) -> Option<usize> {
    if !app.view.sequence_rendered {
        return None;
    }
    let area = sequence_area(screen);
    if !area.contains(Position::new(column, row)) {
        return None;
    }
    let window = window(app, area)?;
    let offset = (row - area.y) as usize + window.scroll;
    window.rows.get(offset).and_then(|(index, _)| *index)
}

fn draw_sequence(f: &mut Frame, app: &App, area: Rect) {
    let Some(window) = window(app, area) else {
        return;
    };

    let sub = hex_to_rgb(&app.theme.sub);
    let main = hex_to_rgb(&app.theme.main);
    let fade = match app.view.activated_at {
        Some(at) => (app.now().saturating_sub(at) as f64 / HIGHLIGHT_MS as f64).min(1.0),
        None => 1.0,
    };
    let active_style = Style::default()
        .fg(blend(main, sub, fade))
        .add_modifier(Modifier::BOLD);
    let read_style = Style::default().fg(blend(sub, hex_to_rgb(&app.theme.bg), 0.6));
    let upcoming_style = Style::default().fg(sub);

    let lines: Vec<Line> = window
        .rows
        .into_iter()
        .map(|(index, text)| match index {
            Some(i) if i == window.active => Line::styled(text, active_style),
            Some(i) if i < window.active => Line::styled(text, read_style),
            Some(_) => Line::styled(text, upcoming_style),
            None => Line::default(),
        })
        .collect();

    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Left)
            .scroll((window.scroll as u16, 0)),
        area,
    );
}

fn draw_progress(f: &mut Frame, app: &App, area: Rect) {
    let (position, total) = app.view.progress;
    if total == 0 {
        return;
    }
    let shown = position + 1;

    f.render_widget(
        LineGauge::default()
            .ratio(shown as f64 / total as f64)
            .label(format!("{shown} / {total}"))
            .style(Style::default().fg(hex_to_rgb(&app.theme.sub)))
            .filled_style(Style::default().fg(hex_to_rgb(&app.theme.main)))
            .unfilled_style(Style::default().fg(hex_to_rgb(&app.theme.sub_alt))),
        area,
    );
}
