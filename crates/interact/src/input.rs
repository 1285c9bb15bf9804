//! Keyboard classification.
//!
//! `classify` is pure: it maps a key event and the current focus context to
//! an [`Action`] without touching any state. `GridSession::execute` carries
//! the action out.
//!
//! Precedence:
//! 1. Escape always blurs, whatever the modifiers.
//! 2. Inside an editable field only Enter/Shift+Enter (cell inputs only)
//!    and the save chord are intercepted; everything else is left to the
//!    field.
//! 3. Otherwise chords toggle panels, run bulk edits and jump the view;
//!    plain arrows pan, Shift+arrows extend the selection and Enter moves
//!    edit focus.

use gridsync_config::ModifierStyle;
use gridsync_core::GridAddress;
use gridsync_protocol::{BulkEditCommand, KeyStroke};

use crate::surface::{ActiveElement, Direction, Panel, UiAction, Vertical};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub control: bool,
    pub alt: bool,
    pub shift: bool,
    /// Cmd on macOS, Super/Win elsewhere.
    pub platform: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn shift() -> Self {
        Self { shift: true, ..Self::default() }
    }

    pub fn control() -> Self {
        Self { control: true, ..Self::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Other(String),
}

impl Key {
    /// Parse a DOM `KeyboardEvent.key` name.
    pub fn from_name(name: &str) -> Key {
        match name {
            "Enter" => Key::Enter,
            "Escape" | "Esc" => Key::Escape,
            "Tab" => Key::Tab,
            "Backspace" => Key::Backspace,
            "Delete" | "Del" => Key::Delete,
            "ArrowUp" | "Up" => Key::Up,
            "ArrowDown" | "Down" => Key::Down,
            "ArrowLeft" | "Left" => Key::Left,
            "ArrowRight" | "Right" => Key::Right,
            "Home" => Key::Home,
            "End" => Key::End,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Other(name.to_string()),
                }
            }
        }
    }

    fn arrow(&self) -> Option<Direction> {
        match self {
            Key::Up => Some(Direction::Up),
            Key::Down => Some(Direction::Down),
            Key::Left => Some(Direction::Left),
            Key::Right => Some(Direction::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::none())
    }
}

impl From<&KeyStroke> for KeyEvent {
    fn from(k: &KeyStroke) -> Self {
        KeyEvent {
            key: Key::from_name(&k.key),
            modifiers: Modifiers {
                control: k.ctrl,
                alt: k.alt,
                shift: k.shift,
                platform: k.meta,
            },
        }
    }
}

/// What kind of editable field holds native focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    CellInput,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusContext {
    InEditableField(FieldKind),
    CellFocused,
    Neither,
}

/// Derive the focus context from the surface's active element and the
/// controller's focused cell.
pub fn focus_context(active: ActiveElement, focused: Option<GridAddress>) -> FocusContext {
    match active {
        ActiveElement::CellInput(_) => FocusContext::InEditableField(FieldKind::CellInput),
        ActiveElement::TextField => FocusContext::InEditableField(FieldKind::Text),
        ActiveElement::None if focused.is_some() => FocusContext::CellFocused,
        ActiveElement::None => FocusContext::Neither,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Drop native focus and edit focus, abandon any drag.
    Blur,
    Ui(UiAction),
    MoveFocus(Vertical),
    ExtendSelection(Direction),
    BulkEdit(BulkEditCommand),
    /// Not ours; let the event through.
    Ignore,
}

#[derive(Debug, Clone, Copy)]
pub struct InputDispatcher {
    platform_primary: bool,
}

impl InputDispatcher {
    /// On macOS with `Platform` style the primary modifier is Cmd,
    /// everywhere else it is Ctrl.
    pub fn new(style: ModifierStyle) -> Self {
        #[cfg(target_os = "macos")]
        let platform_primary = matches!(style, ModifierStyle::Platform);
        #[cfg(not(target_os = "macos"))]
        let platform_primary = {
            let _ = style;
            false
        };
        Self { platform_primary }
    }

    fn primary_held(&self, m: &Modifiers) -> bool {
        if self.platform_primary {
            m.platform
        } else {
            m.control
        }
    }

    pub fn classify(&self, event: &KeyEvent, context: FocusContext) -> Action {
        if event.key == Key::Escape {
            return Action::Blur;
        }
        let m = &event.modifiers;
        let chord = self.primary_held(m) && !m.alt;

        if let FocusContext::InEditableField(field) = context {
            return match &event.key {
                Key::Char(c) if chord && !m.shift && c.eq_ignore_ascii_case(&'s') => {
                    Action::Ui(UiAction::Save)
                }
                Key::Enter if field == FieldKind::CellInput && !chord && !m.alt => {
                    Action::MoveFocus(if m.shift { Vertical::Up } else { Vertical::Down })
                }
                _ => Action::Ignore,
            };
        }

        if chord {
            return self.chord(&event.key, m.shift);
        }
        if m.alt || m.control || m.platform {
            return Action::Ignore;
        }

        if let Some(dir) = event.key.arrow() {
            return if m.shift {
                Action::ExtendSelection(dir)
            } else {
                Action::Ui(UiAction::Pan(dir))
            };
        }
        match event.key {
            Key::Enter if context == FocusContext::CellFocused => {
                Action::MoveFocus(if m.shift { Vertical::Up } else { Vertical::Down })
            }
            _ => Action::Ignore,
        }
    }

    fn chord(&self, key: &Key, shift: bool) -> Action {
        let c = match key {
            Key::Delete if !shift => return Action::BulkEdit(BulkEditCommand::Delete),
            Key::Char(c) => c.to_ascii_lowercase(),
            _ => return Action::Ignore,
        };
        if shift {
            return match c {
                'l' => Action::BulkEdit(BulkEditCommand::InsertEndColumns),
                _ => Action::Ignore,
            };
        }
        if let Some(panel) = Panel::from_digit(c) {
            return Action::Ui(UiAction::TogglePanel(panel));
        }
        match c {
            's' => Action::Ui(UiAction::Save),
            'q' => Action::Ui(UiAction::ClearSelector),
            'x' => Action::BulkEdit(BulkEditCommand::Cut),
            'c' => Action::BulkEdit(BulkEditCommand::Copy),
            'v' => Action::BulkEdit(BulkEditCommand::Paste),
            'm' => Action::BulkEdit(BulkEditCommand::MoveForward),
            'n' => Action::BulkEdit(BulkEditCommand::MoveBackward),
            'i' => Action::BulkEdit(BulkEditCommand::Insert),
            'l' => Action::BulkEdit(BulkEditCommand::InsertEndRows),
            'h' => Action::Ui(UiAction::JumpHome),
            't' => Action::Ui(UiAction::JumpToTarget),
            _ => Action::Ignore,
        }
    }
}
