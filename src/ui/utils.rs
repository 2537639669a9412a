use ratatui::style::Color;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use crate::app::App;
use crate::models::{AudioState, PresentationMode};

pub fn hex_to_rgb(hex: &str) -> Color {
    let hex = hex.trim_start_matches('#');
    if hex.len() == 6 {
        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);
        Color::Rgb(r, g, b)
    } else {
        Color::White
    }
}

/// Mixes `fg` over `bg` at the given opacity. Terminals have no alpha, so
/// fades are drawn as colours that drift toward the background.
pub fn blend(fg: Color, bg: Color, alpha: f64) -> Color {
    let alpha = alpha.clamp(0.0, 1.0);
    match (fg, bg) {
        (Color::Rgb(fr, fg_, fb), Color::Rgb(br, bg_, bb)) => {
            let mix = |f: u8, b: u8| (b as f64 + (f as f64 - b as f64) * alpha).round() as u8;
            Color::Rgb(mix(fr, br), mix(fg_, bg_), mix(fb, bb))
        }
        _ if alpha >= 0.5 => fg,
        _ => bg,
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Percentage(percent_y),
            Constraint::Fill(1),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Percentage(percent_x),
            Constraint::Fill(1),
        ])
        .split(vertical[1])[1]
}

pub fn render_header(f: &mut Frame, app: &App) {
    let sub = Style::default().fg(hex_to_rgb(&app.theme.sub));
    let mut header_spans = vec![Span::styled(
        "wishletter",
        Style::default()
            .fg(hex_to_rgb(&app.theme.main))
            .add_modifier(Modifier::BOLD),
    )];

    let mode = match app.view.mode {
        PresentationMode::Reading if app.view.playing => "reading",
        PresentationMode::Reading => "paused",
        PresentationMode::Celebration => "celebration",
    };
    header_spans.push(Span::styled(format!(" | {mode}"), sub));

    let (label, color) = match app.audio {
        AudioState::Playing => ("♪ on", hex_to_rgb(&app.theme.accent)),
        AudioState::Paused => ("♪ off", hex_to_rgb(&app.theme.sub)),
        AudioState::Blocked => ("♪ press any key", hex_to_rgb(&app.theme.error)),
    };
    header_spans.push(Span::styled(" | ", sub));
    header_spans.push(Span::styled(label, Style::default().fg(color)));

    let header_row_area = Rect::new(0, 1, f.area().width, 1);

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Percentage(82),
            Constraint::Fill(1),
        ])
        .split(header_row_area);

    f.render_widget(Paragraph::new(Line::from(header_spans)), header_layout[1]);
}

pub fn render_footer(f: &mut Frame, app: &App, hints: &str) {
    let area = f.area();
    if area.height == 0 {
        return;
    }
    let footer = Paragraph::new(hints)
        .style(Style::default().fg(hex_to_rgb(&app.theme.sub)))
        .alignment(Alignment::Center);
    f.render_widget(footer, Rect::new(0, area.height - 1, area.width, 1));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_theme_colours() {
        assert_eq!(hex_to_rgb("#78dcff"), Color::Rgb(0x78, 0xdc, 0xff));
        assert_eq!(hex_to_rgb("nope"), Color::White);
    }

    #[test]
    fn blend_walks_toward_the_background() {
        let fg = Color::Rgb(200, 100, 0);
        let bg = Color::Rgb(0, 0, 0);
        assert_eq!(blend(fg, bg, 1.0), fg);
        assert_eq!(blend(fg, bg, 0.0), bg);
        assert_eq!(blend(fg, bg, 0.5), Color::Rgb(100, 50, 0));
        assert_eq!(blend(Color::White, bg, 0.2), bg);
    }

    #[test]
    fn centered_rect_is_inside_the_area() {
        let area = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(60, 80, area);
        assert_eq!(inner.width, 60);
        assert_eq!(inner.height, 40);
        assert_eq!(inner.x, 20);
        assert_eq!(inner.y, 5);
    }
}
