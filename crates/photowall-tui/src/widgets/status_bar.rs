use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, View};

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;

        let mode_str = match &app.view {
            View::Gallery => "GALLERY",
            View::Carousel => "PHOTO",
            View::NotFound(_) => "NOT FOUND",
        };

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else if !app.catalog_loaded || app.is_refreshing {
            format!(" {} | {} Loading catalog", mode_str, app.spinner())
        } else if let Some(photo) = app.route_photo() {
            format!(
                " {} | {} | {}x{} ({:.2}:1) | Photos: {}",
                mode_str,
                app.current_route(),
                photo.width,
                photo.height,
                photo.aspect_ratio(),
                app.catalog.len()
            )
        } else {
            format!(
                " {} | {} | Photos: {}",
                mode_str,
                app.current_route(),
                app.catalog.len()
            )
        };

        let help_hint = match app.view {
            View::Gallery => " q:quit h/j/k/l:move ⏎:open r:refresh ",
            View::Carousel => " ←/→:photo o:full size Esc:close ",
            View::NotFound(_) => " Esc:gallery q:quit ",
        };
        let padding_len = (area.width as usize)
            .saturating_sub(status_text.width() + help_hint.width());

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(theme.fg0).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey1).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
