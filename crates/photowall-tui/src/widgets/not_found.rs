use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::theme::Theme;

pub struct NotFoundWidget;

impl NotFoundWidget {
    pub fn render(frame: &mut Frame, area: Rect, photo_id: &str, theme: &Theme) {
        frame.render_widget(Block::default().style(Style::default().bg(theme.bg0)), area);

        let lines = vec![
            Line::from(Span::styled(
                "Photo not found",
                Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(photo_id.to_string(), Style::default().fg(theme.grey1))),
            Line::from(""),
            Line::from(Span::styled(
                "[Esc] back to the gallery",
                Style::default().fg(theme.grey0),
            )),
        ];

        let height = (lines.len() as u16).min(area.height);
        let centered = Rect {
            x: area.x,
            y: area.y + area.height.saturating_sub(height) / 2,
            width: area.width,
            height,
        };
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), centered);
    }
}
