use photowall_core::nav::Direction;
use photowall_core::photo::Transform;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use super::halfblocks::{paint, Fit};
use crate::app::App;
use crate::images::ImageState;
use crate::layout::{PlacedRect, ScreenLayout};
use crate::theme::Theme;

/// Main image margin, leaving room for the prev/next buttons
const SIDE_MARGIN: u16 = 5;

pub struct CarouselWidget;

impl CarouselWidget {
    pub fn render(frame: &mut Frame, layout: &ScreenLayout, app: &App) {
        let theme = &app.theme;
        let Some(carousel) = app.carousel.as_ref() else {
            return;
        };

        frame.render_widget(
            Block::default().style(Style::default().bg(theme.overlay)),
            layout.body,
        );

        Self::render_actions(frame, layout, app);

        let photo = carousel.current_photo();
        let image_area = Rect {
            x: layout.main.x + SIDE_MARGIN.min(layout.main.width / 2),
            y: layout.main.y,
            width: layout.main.width.saturating_sub(SIDE_MARGIN * 2),
            height: layout.main.height,
        };
        let target = PlacedRect {
            x: image_area.x as i32,
            y: image_area.y,
            width: image_area.width,
            height: image_area.height,
        };

        let url = app.urls.url(photo, &Transform::MAIN);
        match app.images.state(&url) {
            Some(ImageState::Loaded(image)) if !carousel.loading() => {
                paint(frame.buffer_mut(), target, image_area, image, Fit::Contain, false, theme.overlay);
            }
            Some(ImageState::Failed(_)) => {
                Self::render_message(frame, image_area, "Image unavailable", theme);
            }
            _ => {
                // Blurred placeholder under the spinner
                if let Some(placeholder) = app.placeholders.get(&photo.id) {
                    paint(
                        frame.buffer_mut(),
                        target,
                        image_area,
                        placeholder,
                        Fit::Contain,
                        true,
                        theme.overlay,
                    );
                }
                let what = match carousel.direction() {
                    Some(Direction::Next) => "next photo",
                    Some(Direction::Prev) => "previous photo",
                    None => "photo",
                };
                let message = format!("{} Loading {}…", app.spinner(), what);
                Self::render_message(frame, image_area, &message, theme);
            }
        }

        if carousel.has_prev() {
            Self::render_button(frame, layout.prev_button, "‹", theme);
        }
        if carousel.has_next() {
            Self::render_button(frame, layout.next_button, "›", theme);
        }
    }

    fn render_actions(frame: &mut Frame, layout: &ScreenLayout, app: &App) {
        let theme = &app.theme;
        let Some(carousel) = app.carousel.as_ref() else {
            return;
        };

        let counter = Line::from(vec![
            Span::styled(
                format!(" {} / {} ", carousel.current_index() + 1, carousel.len()),
                Style::default().fg(theme.fg1).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                carousel.current_photo().id.clone(),
                Style::default().fg(theme.grey1),
            ),
        ]);
        frame.render_widget(
            Paragraph::new(counter).style(Style::default().bg(theme.overlay)),
            layout.actions,
        );

        let button = Style::default().fg(theme.fg0).bg(theme.bg2);
        frame.render_widget(
            Paragraph::new(" ↗ Full size ").style(button),
            layout.open_button,
        );
        frame.render_widget(Paragraph::new(" ✕ Close ").style(button), layout.close_button);
    }

    fn render_button(frame: &mut Frame, area: Rect, label: &str, theme: &Theme) {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                label.to_string(),
                Style::default().fg(theme.fg1).add_modifier(Modifier::BOLD),
            )),
        ];
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .style(Style::default().bg(theme.bg2)),
            area,
        );
    }

    fn render_message(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
        if area.height == 0 {
            return;
        }
        let line = Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(theme.fg0).add_modifier(Modifier::BOLD),
        ));
        let centered = Rect {
            x: area.x,
            y: area.y + area.height / 2,
            width: area.width,
            height: 1,
        };
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), centered);
    }
}
