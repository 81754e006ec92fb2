use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};

use crate::app::{App, View};
use crate::keymap::{KeyBinding, Keymap};
use crate::layout::contains;

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    // Gallery wall
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    JumpToStart,
    JumpToEnd,
    PendingG, // First 'g' press, waiting for second 'g'
    OpenPhoto,
    OpenAt(usize),
    Refresh,
    OpenLink(String),
    // Carousel
    NextPhoto,
    PrevPhoto,
    GoTo(usize),
    Close,
    OpenFullSize,
    // Pointer
    WheelWall(f64),
    WheelStrip(f64),
    SwipeStart(f64),
    SwipeMove(f64),
    SwipeEnd,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App, keymap: &Keymap) -> Action {
    let binding = KeyBinding::new(key.code, key.modifiers);

    match app.view {
        View::Carousel => keymap.carousel(&binding).cloned().unwrap_or(Action::None),
        View::NotFound(_) => match keymap.carousel(&binding) {
            Some(Action::Close) => Action::Close,
            Some(Action::Quit) => Action::Quit,
            _ => Action::None,
        },
        View::Gallery => {
            if keymap.is_g_prefix(&binding) {
                return if app.pending_key == Some('g') {
                    keymap.get_pending_g_action().cloned().unwrap_or(Action::None)
                } else {
                    Action::PendingG
                };
            }
            keymap.gallery(&binding).cloned().unwrap_or(Action::None)
        }
    }
}

/// Handle a mouse event using the regions recorded by the last draw
pub fn handle_mouse_event(mouse: MouseEvent, app: &App) -> Action {
    let (column, row) = (mouse.column, mouse.row);
    let notch = app.config.ui.scroll.wheel_delta_px;
    // Vertical wheel movement scrolls horizontally
    let wheel = match mouse.kind {
        MouseEventKind::ScrollDown | MouseEventKind::ScrollRight => Some(notch),
        MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft => Some(-notch),
        _ => None,
    };
    let pointer_x = column as f64 * app.config.ui.cell_width_px;
    let layout = &app.layout;

    match app.view {
        View::Gallery => {
            if let Some(delta) = wheel {
                return Action::WheelWall(delta);
            }
            if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
                return Action::None;
            }
            if let Some(url) = app.link_at(column, row) {
                return Action::OpenLink(url.to_string());
            }
            match app.wall_slot_at(column, row) {
                // Slot 0 is the intro card
                Some(slot) if slot > 0 => Action::OpenAt(slot - 1),
                _ => Action::None,
            }
        }
        View::Carousel => {
            if let Some(delta) = wheel {
                return if contains(layout.strip, column, row) {
                    Action::WheelStrip(delta)
                } else {
                    Action::None
                };
            }

            match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    if contains(layout.close_button, column, row) {
                        Action::Close
                    } else if contains(layout.open_button, column, row) {
                        Action::OpenFullSize
                    } else if app.has_prev() && contains(layout.prev_button, column, row) {
                        Action::PrevPhoto
                    } else if app.has_next() && contains(layout.next_button, column, row) {
                        Action::NextPhoto
                    } else if let Some(index) = app.strip_index_at(column, row) {
                        Action::GoTo(index)
                    } else if contains(layout.main, column, row) {
                        Action::SwipeStart(pointer_x)
                    } else {
                        Action::None
                    }
                }
                MouseEventKind::Drag(MouseButton::Left) if app.swipe.is_tracking() => {
                    Action::SwipeMove(pointer_x)
                }
                MouseEventKind::Up(MouseButton::Left) if app.swipe.is_tracking() => Action::SwipeEnd,
                _ => Action::None,
            }
        }
        View::NotFound(_) => match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Action::Close,
            _ => Action::None,
        },
    }
}
