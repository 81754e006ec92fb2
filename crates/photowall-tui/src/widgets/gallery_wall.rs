use photowall_core::photo::Transform;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::halfblocks::{paint, Fit};
use crate::app::App;
use crate::images::ImageState;
use crate::layout::{inner, PlacedRect};

const TEXT_INSET: u16 = 2;

pub struct GalleryWallWidget;

impl GalleryWallWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
        let theme = app.theme.clone();
        frame.render_widget(Block::default().style(Style::default().bg(theme.bg0)), area);
        app.link_areas.clear();

        let geometry = app.wall_geometry();
        let offset = app.wall.offset_cols(app.config.ui.cell_width_px);
        let slots = app.wall_slots();

        for slot in geometry.visible_slots(slots, area, offset) {
            let placed = geometry.slot_rect(slot, area, offset);
            let Some(visible) = placed.clip(area) else {
                continue;
            };

            if slot == 0 {
                Self::render_intro(frame, placed, visible, app);
            } else if !app.catalog_loaded {
                frame.render_widget(
                    Block::default().style(Style::default().bg(theme.skeleton)),
                    visible,
                );
            } else {
                Self::render_card(frame, slot, placed, visible, app);
            }
        }

        if app.catalog_loaded && app.catalog.is_empty() {
            let next = geometry.slot_rect(1, area, offset);
            if let Some(visible) = next.clip(area) {
                let message = Paragraph::new(Line::from(Span::styled(
                    "No photos found",
                    Style::default().fg(theme.grey1).add_modifier(Modifier::ITALIC),
                )));
                frame.render_widget(message, visible);
            }
        }
    }

    fn render_intro(frame: &mut Frame, placed: PlacedRect, visible: Rect, app: &mut App) {
        let theme = &app.theme;
        let site = &app.config.site;
        let text_width = placed.width.saturating_sub(TEXT_INSET * 2) as usize;

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                site.title.clone(),
                Style::default().fg(theme.fg1).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for line in wrap(&site.description, text_width) {
            lines.push(Line::from(Span::styled(line, Style::default().fg(theme.grey1))));
        }
        lines.push(Line::from(""));

        // Links are recorded for hit-testing as they are laid out
        let mut links = Vec::new();
        for link in &site.links {
            let row = placed.y + lines.len() as u16;
            let label = format!("{} ↗", link.label);
            let label_rect = PlacedRect {
                x: placed.x + TEXT_INSET as i32,
                y: row,
                width: label.width() as u16,
                height: 1,
            };
            if let Some(hit) = label_rect.clip(visible) {
                links.push((hit, link.url.clone()));
            }
            lines.push(Line::from(Span::styled(
                label,
                Style::default()
                    .fg(theme.link)
                    .add_modifier(Modifier::UNDERLINED),
            )));
        }

        let hidden_cols = (visible.x as i32 - placed.x).max(0) as u16;
        let shifted: Vec<Line> = lines
            .into_iter()
            .map(|line| {
                let mut spans = vec![Span::raw(" ".repeat(TEXT_INSET as usize))];
                spans.extend(line.spans);
                Line::from(spans)
            })
            .collect();
        let paragraph = Paragraph::new(shifted)
            .style(Style::default().bg(theme.bg1))
            .scroll((0, hidden_cols));
        frame.render_widget(paragraph, visible);

        app.link_areas.extend(links);
    }

    fn render_card(frame: &mut Frame, slot: usize, placed: PlacedRect, visible: Rect, app: &App) {
        let theme = &app.theme;
        let Some(photo) = app.slot_photo(slot) else {
            return;
        };
        let selected = slot == app.selected + 1;

        frame.render_widget(Block::default().style(Style::default().bg(theme.bg1)), visible);

        let url = app.urls.url(photo, &Transform::CARD);
        let image = match app.images.state(&url) {
            Some(ImageState::Loaded(image)) => Some(image.clone()),
            _ => app.placeholders.get(&photo.id).cloned(),
        };
        let failed = app.images.is_failed(&url);

        if let Some(image) = image {
            paint(
                frame.buffer_mut(),
                placed,
                visible,
                &image,
                Fit::Cover,
                false,
                theme.bg1,
            );
        } else {
            let label = if failed { "unavailable" } else { "" };
            let caption = Paragraph::new(Line::from(Span::styled(
                label,
                Style::default().fg(theme.grey0),
            )));
            frame.render_widget(caption, inner(visible));
        }

        if selected {
            let border = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.selection).add_modifier(Modifier::BOLD));
            frame.render_widget(border, visible);
        }
    }
}

/// Greedy word wrap by display width
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.width()
        } else {
            current.width() + 1 + word.width()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
