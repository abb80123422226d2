use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::App;
use crate::keymap::{KeyBinding, Keymap};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollDown,
    ScrollUp,
    NextPanel,
    PrevPanel,
    ScrollHalfPageDown,
    ScrollHalfPageUp,
    JumpToTop,
    JumpToBottom,
    PendingG, // First 'g' press, waiting for second 'g'
    OpenInBrowser,
    None,
}

impl Action {
    /// Actions that move the viewport and count as scroll events
    pub fn is_scroll(&self) -> bool {
        matches!(
            self,
            Action::ScrollDown
                | Action::ScrollUp
                | Action::NextPanel
                | Action::PrevPanel
                | Action::ScrollHalfPageDown
                | Action::ScrollHalfPageUp
                | Action::JumpToTop
                | Action::JumpToBottom
        )
    }
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App, keymap: &Keymap) -> Action {
    let binding = KeyBinding::new(key.code, normalize_modifiers(key.code, key.modifiers));

    if keymap.is_g_prefix(&binding) {
        return if app.pending_key == Some('g') {
            keymap.get_pending_g_action().copied().unwrap_or(Action::None)
        } else {
            Action::PendingG
        };
    }

    keymap.get(&binding).copied().unwrap_or(Action::None)
}

/// Map mouse wheel notches to line scrolls
pub fn handle_mouse_event(mouse: MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::ScrollDown => Action::ScrollDown,
        MouseEventKind::ScrollUp => Action::ScrollUp,
        _ => Action::None,
    }
}

/// Some terminals report uppercase letters without SHIFT and symbols with it
fn normalize_modifiers(code: KeyCode, modifiers: KeyModifiers) -> KeyModifiers {
    match code {
        KeyCode::Char(c) if c.is_ascii_uppercase() => modifiers | KeyModifiers::SHIFT,
        KeyCode::Char(c) if !c.is_ascii_alphabetic() => modifiers - KeyModifiers::SHIFT,
        _ => modifiers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};
    use wikiscroll_core::AppConfig;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind) -> MouseEvent {
        MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_basic_bindings() {
        let app = App::new(AppConfig::default());
        let keymap = Keymap::default();

        assert_eq!(handle_key_event(key(KeyCode::Char('j'), KeyModifiers::NONE), &app, &keymap), Action::ScrollDown);
        assert_eq!(handle_key_event(key(KeyCode::Char(' '), KeyModifiers::NONE), &app, &keymap), Action::NextPanel);
        assert_eq!(handle_key_event(key(KeyCode::Enter, KeyModifiers::NONE), &app, &keymap), Action::OpenInBrowser);
        assert_eq!(handle_key_event(key(KeyCode::Char('z'), KeyModifiers::NONE), &app, &keymap), Action::None);
    }

    #[test]
    fn test_uppercase_without_shift_flag() {
        let app = App::new(AppConfig::default());
        let keymap = Keymap::default();
        assert_eq!(handle_key_event(key(KeyCode::Char('G'), KeyModifiers::NONE), &app, &keymap), Action::JumpToBottom);
        assert_eq!(handle_key_event(key(KeyCode::Char('G'), KeyModifiers::SHIFT), &app, &keymap), Action::JumpToBottom);
    }

    #[test]
    fn test_gg_sequence() {
        let mut app = App::new(AppConfig::default());
        let keymap = Keymap::default();
        let g = key(KeyCode::Char('g'), KeyModifiers::NONE);

        assert_eq!(handle_key_event(g, &app, &keymap), Action::PendingG);
        app.pending_key = Some('g');
        assert_eq!(handle_key_event(g, &app, &keymap), Action::JumpToTop);
    }

    #[test]
    fn test_mouse_wheel() {
        assert_eq!(handle_mouse_event(mouse(MouseEventKind::ScrollDown)), Action::ScrollDown);
        assert_eq!(handle_mouse_event(mouse(MouseEventKind::ScrollUp)), Action::ScrollUp);
        assert_eq!(handle_mouse_event(mouse(MouseEventKind::Moved)), Action::None);
    }

    #[test]
    fn test_scroll_classification() {
        assert!(Action::NextPanel.is_scroll());
        assert!(Action::JumpToTop.is_scroll());
        assert!(!Action::OpenInBrowser.is_scroll());
        assert!(!Action::PendingG.is_scroll());
    }
}
