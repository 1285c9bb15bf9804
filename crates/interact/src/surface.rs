//! The rendering surface as seen by the interaction engine.
//!
//! The engine never draws. It asks the surface to add or remove named
//! highlight styles on individual elements, to move native input focus, and
//! to perform purely local UI actions (panel toggles, panning). Anything
//! that renders a grid (a DOM, a terminal, a test double) implements
//! [`Surface`].

use gridsync_core::{GridAddress, GridBounds};

/// Named highlight styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Highlight {
    /// Border on cells inside an in-progress drag.
    TrialSelection,
    /// Background on cells of the confirmed selection.
    Selected,
    /// Marker on the single cell in edit focus.
    EditingCurrent,
}

/// The element that currently holds native input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveElement {
    #[default]
    None,
    /// The text input inside a grid cell.
    CellInput(GridAddress),
    /// Any other editable field (formula editor, value box, ...).
    TextField,
}

impl ActiveElement {
    pub fn is_cell_input(&self) -> bool {
        matches!(self, ActiveElement::CellInput(_))
    }
}

/// Side panels / tools that chords toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Help,
    Selector,
    Editor,
    BulkEditor,
    Navigator,
}

impl Panel {
    /// Panel bound to `Ctrl+<digit>`.
    pub fn from_digit(digit: char) -> Option<Panel> {
        match digit {
            '0' => Some(Panel::Help),
            '1' => Some(Panel::Selector),
            '2' => Some(Panel::Editor),
            '3' => Some(Panel::BulkEditor),
            '4' => Some(Panel::Navigator),
            _ => None,
        }
    }
}

/// Arrow direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// (d_row, d_col)
    pub fn delta(self) -> (i64, i64) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// Direction of cell-to-cell edit focus movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vertical {
    Up,
    Down,
}

impl Vertical {
    pub fn delta(self) -> i64 {
        match self {
            Vertical::Up => -1,
            Vertical::Down => 1,
        }
    }
}

/// Local-only UI actions. None of these talk to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    TogglePanel(Panel),
    Save,
    ClearSelector,
    Pan(Direction),
    JumpHome,
    JumpToTarget,
}

/// A grid rendering backend.
pub trait Surface {
    /// Grid dimensions.
    fn bounds(&self) -> GridBounds;

    /// Check if an element exists for `addr`.
    fn has_element(&self, addr: GridAddress) -> bool {
        self.bounds().contains(addr)
    }

    fn apply_highlight(&mut self, addr: GridAddress, style: Highlight);

    fn remove_highlight(&mut self, addr: GridAddress, style: Highlight);

    /// Remove `style` from every element.
    fn clear_highlight(&mut self, style: Highlight);

    fn active_element(&self) -> ActiveElement;

    /// Move native input focus to a cell's input, or blur with `None`.
    fn focus_input(&mut self, addr: Option<GridAddress>);

    fn apply_ui(&mut self, action: UiAction);
}
