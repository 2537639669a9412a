pub mod celebration;
pub mod letter;
pub mod reading;
pub mod utils;

use crate::app::App;
use crate::models::PresentationMode;
use crate::ui::utils::hex_to_rgb;
use ratatui::{
    style::Style,
    widgets::Block,
    Frame,
};

pub fn render(f: &mut Frame, app: &App) {
    let bg_color = hex_to_rgb(&app.theme.bg);
    f.render_widget(
        Block::default().style(Style::default().bg(bg_color)),
        f.area(),
    );

    match app.view.mode {
        PresentationMode::Reading => reading::draw(f, app),
        PresentationMode::Celebration => celebration::draw(f, app),
    }

    if app.view.full_text {
        letter::draw(f, app);
    }
}
