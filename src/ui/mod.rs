pub mod overlay;
pub mod utils;

use crate::config::Theme;
use crate::models::RenderSnapshot;
use crate::ui::utils::hex_to_rgb;
use ratatui::{style::Style, widgets::Block, Frame};

pub fn render(f: &mut Frame, snapshot: &RenderSnapshot, theme: &Theme) {
    let bg_color = hex_to_rgb(&theme.bg);
    f.render_widget(
        Block::default().style(Style::default().bg(bg_color)),
        f.area(),
    );

    overlay::draw(f, snapshot, theme);
}
