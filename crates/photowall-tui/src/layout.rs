//! Screen geometry and mouse hit-testing
//!
//! Scrollable content is laid out in "content columns"; the on-screen position
//! of a cell is its content column minus the pane's scroll offset.

use photowall_core::config::UiConfig;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Thumbnail strip height in rows, border included
pub const STRIP_HEIGHT: u16 = 6;
const BUTTON_WIDTH: u16 = 3;
const BUTTON_HEIGHT: u16 = 3;
const CLOSE_LABEL_WIDTH: u16 = 9;
const OPEN_LABEL_WIDTH: u16 = 13;

/// A rectangle whose x may lie outside the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedRect {
    pub x: i32,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl PlacedRect {
    /// Visible part inside `clip`
    pub fn clip(&self, clip: Rect) -> Option<Rect> {
        let left = self.x.max(clip.x as i32);
        let right = (self.x + self.width as i32).min(clip.right() as i32);
        let top = self.y.max(clip.y);
        let bottom = (self.y + self.height).min(clip.bottom());
        if left >= right || top >= bottom {
            return None;
        }
        Some(Rect::new(left as u16, top, (right - left) as u16, bottom - top))
    }
}

/// Regions of the current frame, recorded at draw time for hit-testing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenLayout {
    pub body: Rect,
    pub status: Rect,
    pub actions: Rect,
    pub open_button: Rect,
    pub close_button: Rect,
    pub main: Rect,
    pub prev_button: Rect,
    pub next_button: Rect,
    pub strip: Rect,
}

impl ScreenLayout {
    pub fn compute(area: Rect) -> Self {
        let [body, status] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .areas(area);

        let [actions, main, strip] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(STRIP_HEIGHT),
            ])
            .areas(body);

        let close_button = Rect::new(
            actions.right().saturating_sub(CLOSE_LABEL_WIDTH),
            actions.y,
            CLOSE_LABEL_WIDTH.min(actions.width),
            actions.height,
        );
        let open_button = Rect::new(
            close_button.x.saturating_sub(OPEN_LABEL_WIDTH),
            actions.y,
            OPEN_LABEL_WIDTH.min(close_button.x.saturating_sub(actions.x)),
            actions.height,
        );

        let button_y = main.y + main.height.saturating_sub(BUTTON_HEIGHT) / 2;
        let button_height = BUTTON_HEIGHT.min(main.height);
        let prev_button = Rect::new(main.x + 1.min(main.width), button_y, BUTTON_WIDTH.min(main.width), button_height);
        let next_button = Rect::new(
            main.right().saturating_sub(BUTTON_WIDTH + 1),
            button_y,
            BUTTON_WIDTH.min(main.width),
            button_height,
        );

        Self {
            body,
            status,
            actions,
            open_button,
            close_button,
            main,
            prev_button,
            next_button,
            strip,
        }
    }
}

pub fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

/// Column-major card grid of the gallery wall; slot 0 is the intro card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallGeometry {
    pub rows: u16,
    pub card_width: u16,
    pub gap: u16,
    pub padding_x: u16,
    pub padding_y: u16,
}

impl WallGeometry {
    pub fn from_ui(ui: &UiConfig) -> Self {
        Self {
            rows: ui.wall_rows.max(1),
            card_width: ui.card_width.max(4),
            gap: 1,
            padding_x: 2,
            padding_y: 1,
        }
    }

    pub fn card_height(&self, area_height: u16) -> u16 {
        let usable = area_height
            .saturating_sub(self.padding_y * 2)
            .saturating_sub(self.gap * (self.rows - 1));
        (usable / self.rows).max(1)
    }

    pub fn columns(&self, slots: usize) -> usize {
        slots.div_ceil(self.rows as usize)
    }

    /// Total content width in columns
    pub fn content_width(&self, slots: usize) -> u32 {
        let columns = self.columns(slots) as u32;
        let cards = columns * self.card_width as u32 + columns.saturating_sub(1) * self.gap as u32;
        cards + self.padding_x as u32 * 2
    }

    /// Slot rectangle for a pane at `area` scrolled by `offset_cols`
    pub fn slot_rect(&self, slot: usize, area: Rect, offset_cols: u16) -> PlacedRect {
        let column = (slot / self.rows as usize) as i32;
        let row = (slot % self.rows as usize) as u16;
        let card_height = self.card_height(area.height);

        let content_x =
            self.padding_x as i32 + column * (self.card_width as i32 + self.gap as i32);
        PlacedRect {
            x: area.x as i32 + content_x - offset_cols as i32,
            y: area.y + self.padding_y + row * (card_height + self.gap),
            width: self.card_width,
            height: card_height,
        }
    }

    /// Slots with at least one visible cell
    pub fn visible_slots(&self, slots: usize, area: Rect, offset_cols: u16) -> Vec<usize> {
        (0..slots)
            .filter(|&slot| self.slot_rect(slot, area, offset_cols).clip(area).is_some())
            .collect()
    }

    pub fn slot_at(&self, slots: usize, area: Rect, offset_cols: u16, column: u16, row: u16) -> Option<usize> {
        if !contains(area, column, row) {
            return None;
        }
        let stride = self.card_width as i32 + self.gap as i32;
        let content_x = column as i32 - area.x as i32 + offset_cols as i32 - self.padding_x as i32;
        if content_x < 0 || content_x % stride >= self.card_width as i32 {
            return None;
        }
        let grid_column = (content_x / stride) as usize;

        let row_stride = self.card_height(area.height) + self.gap;
        let content_y = (row - area.y).checked_sub(self.padding_y)?;
        if content_y % row_stride >= self.card_height(area.height) {
            return None;
        }
        let grid_row = (content_y / row_stride) as usize;
        if grid_row >= self.rows as usize {
            return None;
        }

        let slot = grid_column * self.rows as usize + grid_row;
        (slot < slots).then_some(slot)
    }
}

/// Single-row strip of equally sized thumbnails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripGeometry {
    pub thumb_width: u16,
    pub gap: u16,
    pub padding_x: u16,
}

impl StripGeometry {
    pub fn from_ui(ui: &UiConfig) -> Self {
        Self {
            thumb_width: ui.thumbnail_width.max(3),
            gap: 1,
            padding_x: 2,
        }
    }

    /// Left edge of thumbnail `index` in content columns
    pub fn item_left(&self, index: usize) -> u32 {
        self.padding_x as u32 + index as u32 * (self.thumb_width + self.gap) as u32
    }

    pub fn content_width(&self, count: usize) -> u32 {
        let count = count as u32;
        count * self.thumb_width as u32
            + count.saturating_sub(1) * self.gap as u32
            + self.padding_x as u32 * 2
    }

    pub fn item_rect(&self, index: usize, inner: Rect, offset_cols: u16) -> PlacedRect {
        PlacedRect {
            x: inner.x as i32 + self.item_left(index) as i32 - offset_cols as i32,
            y: inner.y,
            width: self.thumb_width,
            height: inner.height,
        }
    }

    pub fn index_at(&self, count: usize, inner: Rect, offset_cols: u16, column: u16, row: u16) -> Option<usize> {
        if !contains(inner, column, row) {
            return None;
        }
        let stride = (self.thumb_width + self.gap) as i32;
        let content_x = column as i32 - inner.x as i32 + offset_cols as i32 - self.padding_x as i32;
        if content_x < 0 || content_x % stride >= self.thumb_width as i32 {
            return None;
        }
        let index = (content_x / stride) as usize;
        (index < count).then_some(index)
    }
}

/// Area inside a one-cell border
pub fn inner(rect: Rect) -> Rect {
    Rect::new(
        rect.x.saturating_add(1),
        rect.y.saturating_add(1),
        rect.width.saturating_sub(2),
        rect.height.saturating_sub(2),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall() -> WallGeometry {
        WallGeometry {
            rows: 2,
            card_width: 10,
            gap: 1,
            padding_x: 2,
            padding_y: 1,
        }
    }

    #[test]
    fn test_wall_is_column_major() {
        let area = Rect::new(0, 0, 40, 13);
        let g = wall();
        // (13 - 2 - 1) / 2
        assert_eq!(g.card_height(13), 5);
        assert_eq!(g.slot_rect(0, area, 0), PlacedRect { x: 2, y: 1, width: 10, height: 5 });
        assert_eq!(g.slot_rect(1, area, 0), PlacedRect { x: 2, y: 7, width: 10, height: 5 });
        assert_eq!(g.slot_rect(2, area, 0), PlacedRect { x: 13, y: 1, width: 10, height: 5 });
        assert_eq!(g.slot_rect(2, area, 20).x, -7);
    }

    #[test]
    fn test_wall_content_width() {
        let g = wall();
        assert_eq!(g.columns(5), 3);
        assert_eq!(g.content_width(5), 2 + 10 * 3 + 2 + 2);
        assert_eq!(g.content_width(0), 4);
    }

    #[test]
    fn test_wall_hit_testing() {
        let area = Rect::new(0, 0, 40, 13);
        let g = wall();
        assert_eq!(g.slot_at(5, area, 0, 2, 1), Some(0));
        assert_eq!(g.slot_at(5, area, 0, 12, 1), None, "gap column");
        assert_eq!(g.slot_at(5, area, 0, 14, 8), Some(3));
        assert_eq!(g.slot_at(5, area, 0, 26, 8), None, "slot 5 does not exist");
        assert_eq!(g.slot_at(5, area, 0, 3, 0), None, "top padding");
        assert_eq!(g.slot_at(5, area, 11, 3, 1), Some(2));
    }

    #[test]
    fn test_visible_slots_follow_offset() {
        let area = Rect::new(0, 0, 20, 13);
        let g = wall();
        assert_eq!(g.visible_slots(8, area, 0), vec![0, 1, 2, 3]);
        assert_eq!(g.visible_slots(8, area, 22), vec![2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_clip() {
        let clip = Rect::new(0, 0, 20, 10);
        let placed = PlacedRect { x: -5, y: 2, width: 10, height: 4 };
        assert_eq!(placed.clip(clip), Some(Rect::new(0, 2, 5, 4)));
        let gone = PlacedRect { x: 25, y: 2, width: 10, height: 4 };
        assert_eq!(gone.clip(clip), None);
    }

    #[test]
    fn test_strip_geometry() {
        let g = StripGeometry { thumb_width: 8, gap: 1, padding_x: 2 };
        let inner = Rect::new(1, 20, 50, 4);
        assert_eq!(g.item_left(3), 2 + 27);
        assert_eq!(g.content_width(3), 24 + 2 + 4);
        assert_eq!(g.index_at(3, inner, 0, 3, 21), Some(0));
        assert_eq!(g.index_at(3, inner, 0, 11, 21), None, "gap");
        assert_eq!(g.index_at(3, inner, 0, 21, 21), Some(2));
        assert_eq!(g.index_at(3, inner, 9, 12, 21), Some(2));
        assert_eq!(g.index_at(3, inner, 0, 40, 21), None);
    }

    #[test]
    fn test_screen_layout_regions() {
        let layout = ScreenLayout::compute(Rect::new(0, 0, 100, 40));
        assert_eq!(layout.status, Rect::new(0, 39, 100, 1));
        assert_eq!(layout.actions.y, 0);
        assert_eq!(layout.strip.height, STRIP_HEIGHT);
        assert_eq!(layout.main.y, 1);
        assert_eq!(layout.close_button.right(), 100);
        assert_eq!(layout.open_button.right(), layout.close_button.x);
        assert!(contains(layout.main, layout.prev_button.x, layout.prev_button.y));
        assert!(contains(layout.main, layout.next_button.x, layout.next_button.y));
    }
}
