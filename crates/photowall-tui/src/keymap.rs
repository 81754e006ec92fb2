use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyModifiers};
use photowall_core::config::KeymapConfig;
use tracing::warn;

use crate::input::Action;

/// Parsed key binding (key code + modifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn simple(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    pub fn shift(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::SHIFT)
    }
}

/// Bindings for one screen
#[derive(Debug, Default)]
struct BindingTable {
    bindings: HashMap<KeyBinding, Action>,
    /// Action of the "gg" sequence, if configured
    pending_g_action: Option<Action>,
}

impl BindingTable {
    fn add(&mut self, key_str: &str, action: Action) {
        if key_str == "gg" {
            self.pending_g_action = Some(action);
            return;
        }

        match parse_key_binding(key_str) {
            Some(binding) => {
                if let Some(existing) = self.bindings.get(&binding) {
                    warn!(
                        "Key conflict: '{}' already bound to {:?}, ignoring binding to {:?}",
                        key_str, existing, action
                    );
                } else {
                    self.bindings.insert(binding, action);
                }
            }
            None => warn!("Invalid key binding: '{}', ignoring", key_str),
        }
    }

    fn fallback(&mut self, binding: KeyBinding, action: Action) {
        self.bindings.entry(binding).or_insert(action);
    }
}

/// Runtime keymap with separate tables for the gallery wall and the carousel
#[derive(Debug)]
pub struct Keymap {
    gallery: BindingTable,
    carousel: BindingTable,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&KeymapConfig::default())
    }
}

impl Keymap {
    /// Create a keymap from configuration
    pub fn from_config(config: &KeymapConfig) -> Self {
        let mut gallery = BindingTable::default();
        gallery.add(&config.quit, Action::Quit);
        gallery.add(&config.move_left, Action::MoveLeft);
        gallery.add(&config.move_right, Action::MoveRight);
        gallery.add(&config.move_up, Action::MoveUp);
        gallery.add(&config.move_down, Action::MoveDown);
        gallery.add(&config.jump_to_start, Action::JumpToStart);
        gallery.add(&config.jump_to_end, Action::JumpToEnd);
        gallery.add(&config.open_photo, Action::OpenPhoto);
        gallery.add(&config.refresh, Action::Refresh);

        // Ctrl+C always quits; arrows and Enter are always available
        gallery
            .bindings
            .insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        gallery.fallback(KeyBinding::simple(KeyCode::Left), Action::MoveLeft);
        gallery.fallback(KeyBinding::simple(KeyCode::Right), Action::MoveRight);
        gallery.fallback(KeyBinding::simple(KeyCode::Up), Action::MoveUp);
        gallery.fallback(KeyBinding::simple(KeyCode::Down), Action::MoveDown);
        gallery.fallback(KeyBinding::simple(KeyCode::Home), Action::JumpToStart);
        gallery.fallback(KeyBinding::simple(KeyCode::End), Action::JumpToEnd);
        gallery.fallback(KeyBinding::simple(KeyCode::Enter), Action::OpenPhoto);

        let mut carousel = BindingTable::default();
        carousel.add(&config.quit, Action::Quit);
        carousel.add(&config.next_photo, Action::NextPhoto);
        carousel.add(&config.prev_photo, Action::PrevPhoto);
        carousel.add(&config.close, Action::Close);
        carousel.add(&config.open_full_size, Action::OpenFullSize);

        // Arrow keys and Escape behave like the browser overlay regardless of config
        carousel
            .bindings
            .insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        carousel
            .bindings
            .insert(KeyBinding::simple(KeyCode::Right), Action::NextPhoto);
        carousel
            .bindings
            .insert(KeyBinding::simple(KeyCode::Left), Action::PrevPhoto);
        carousel
            .bindings
            .insert(KeyBinding::simple(KeyCode::Esc), Action::Close);

        Self { gallery, carousel }
    }

    /// Action bound on the gallery wall
    pub fn gallery(&self, binding: &KeyBinding) -> Option<&Action> {
        self.gallery.bindings.get(binding)
    }

    /// Action bound in the carousel
    pub fn carousel(&self, binding: &KeyBinding) -> Option<&Action> {
        self.carousel.bindings.get(binding)
    }

    /// Get the action for a completed "gg" sequence on the gallery wall
    pub fn get_pending_g_action(&self) -> Option<&Action> {
        self.gallery.pending_g_action.as_ref()
    }

    /// Check if a single 'g' press should start a pending sequence
    pub fn is_g_prefix(&self, binding: &KeyBinding) -> bool {
        self.gallery.pending_g_action.is_some()
            && binding.code == KeyCode::Char('g')
            && binding.modifiers == KeyModifiers::NONE
    }
}

/// Parse Vim-style key notation into KeyBinding
/// Supported formats:
/// - Single char: "j", "k", "h", "l", "q", etc.
/// - Uppercase (Shift): "G", "N", etc.
/// - Ctrl: "<C-j>", "<C-k>", etc.
/// - Shift: "<S-Tab>", "<S-g>", etc.
/// - Special keys: "<CR>", "<Enter>", "<Esc>", "<Tab>", "<Space>", "<Left>", "<Right>", "<Up>", "<Down>"
pub fn parse_key_binding(s: &str) -> Option<KeyBinding> {
    let s = s.trim();

    if s.starts_with('<') && s.ends_with('>') && s.len() > 2 {
        return parse_special_key(&s[1..s.len() - 1]);
    }

    let mut chars = s.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    // Uppercase letters are Shift+letter
    if c.is_ascii_uppercase() {
        Some(KeyBinding::shift(KeyCode::Char(c)))
    } else {
        Some(KeyBinding::simple(KeyCode::Char(c)))
    }
}

/// Parse special key notation (content inside <...>)
fn parse_special_key(inner: &str) -> Option<KeyBinding> {
    if let Some(rest) = inner.strip_prefix("C-") {
        return parse_key_name(rest).map(KeyBinding::ctrl);
    }
    if let Some(rest) = inner.strip_prefix("S-") {
        return parse_key_name(rest).map(KeyBinding::shift);
    }
    parse_key_name(inner).map(KeyBinding::simple)
}

/// Parse a key name (without modifiers)
fn parse_key_name(name: &str) -> Option<KeyCode> {
    match name.to_lowercase().as_str() {
        "cr" | "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "backtab" => Some(KeyCode::BackTab),
        "space" | "spc" => Some(KeyCode::Char(' ')),
        "bs" | "backspace" => Some(KeyCode::Backspace),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "pageup" | "pgup" => Some(KeyCode::PageUp),
        "pagedown" | "pgdn" => Some(KeyCode::PageDown),
        _ => {
            // Single character after modifier (e.g., "j" in "<C-j>")
            let mut chars = name.chars();
            let c = chars.next()?;
            if chars.next().is_none() {
                Some(KeyCode::Char(c.to_ascii_lowercase()))
            } else {
                None
            }
        }
    }
}
