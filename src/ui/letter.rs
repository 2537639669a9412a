use crate::app::App;
use crate::ui::utils::{centered_rect, hex_to_rgb};
use ratatui::{
    layout::Alignment,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Paragraph that gets the accent treatment in the full letter.
pub const EMPHASIS: &str = "I choose you.";

pub fn draw(f: &mut Frame, app: &App) {
    if !app.view.full_text_rendered {
        return;
    }

    let area = centered_rect(70, 80, f.area());
    let text = Style::default().fg(hex_to_rgb(&app.theme.text));
    let emphasis = Style::default()
        .fg(hex_to_rgb(&app.theme.accent))
        .add_modifier(Modifier::BOLD);

    let mut lines = Vec::new();
    for (i, paragraph) in app.stage.letter().paragraphs().iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        let style = if paragraph == EMPHASIS { emphasis } else { text };
        lines.push(Line::styled(paragraph.clone(), style));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(hex_to_rgb(&app.theme.sub_alt)))
        .title(" the letter ")
        .title_bottom(Line::from(" esc: close ").alignment(Alignment::Right))
        .style(Style::default().bg(hex_to_rgb(&app.theme.bg)));

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}
