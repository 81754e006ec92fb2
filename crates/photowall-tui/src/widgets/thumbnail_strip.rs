use photowall_core::photo::Transform;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use super::halfblocks::{paint, Fit};
use crate::app::App;

pub struct ThumbnailStripWidget;

impl ThumbnailStripWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let Some(carousel) = app.carousel.as_ref() else {
            return;
        };

        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(theme.bg2))
            .style(Style::default().bg(theme.overlay));
        frame.render_widget(block, area);

        let strip = crate::layout::inner(area);
        let geometry = app.strip_geometry();
        let offset = app.strip.offset_cols(app.config.ui.cell_width_px);
        let active = carousel.current_index();

        for (index, photo) in carousel.catalog().iter().enumerate() {
            let placed = geometry.item_rect(index, strip, offset);
            let Some(visible) = placed.clip(strip) else {
                continue;
            };

            let url = app.urls.url(photo, &Transform::THUMBNAIL);
            let image = app
                .images
                .get(&url)
                .or_else(|| app.placeholders.get(&photo.id));
            let is_active = index == active;

            match image {
                Some(image) => paint(
                    frame.buffer_mut(),
                    placed,
                    visible,
                    image,
                    Fit::Cover,
                    !is_active,
                    theme.overlay,
                ),
                None => frame.render_widget(
                    Block::default().style(Style::default().bg(theme.skeleton)),
                    visible,
                ),
            }

            if is_active {
                // Marker row under the active thumbnail
                let marker_row = placed.y + placed.height;
                if marker_row < area.bottom() {
                    let marker = Rect::new(visible.x, marker_row, visible.width, 1);
                    frame.render_widget(
                        Block::default().style(Style::default().bg(theme.selection)),
                        marker,
                    );
                }
            }
        }
    }
}
