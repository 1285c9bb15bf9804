//! In-memory [`Surface`]: the model behind the terminal grid, headless
//! replays, and tests.
//!
//! Besides current highlight state it keeps a journal of every style change
//! so callers can assert on exactly which elements were touched.

use std::collections::{BTreeSet, HashMap, HashSet};

use gridsync_core::{GridAddress, GridBounds};

use crate::surface::{ActiveElement, Direction, Highlight, Panel, Surface, UiAction};

/// One recorded style change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleChange {
    pub addr: GridAddress,
    pub style: Highlight,
    /// true = applied, false = removed
    pub applied: bool,
}

/// Viewport and panel state driven by [`UiAction`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Top-left visible cell.
    pub origin_row: usize,
    pub origin_col: usize,
    pub open_panel: Option<Panel>,
    pub save_requests: usize,
    pub selector_clears: usize,
}

#[derive(Debug, Clone)]
pub struct MemorySurface {
    bounds: GridBounds,
    highlights: HashSet<(GridAddress, Highlight)>,
    journal: Vec<StyleChange>,
    active: ActiveElement,
    text: HashMap<GridAddress, String>,
    view: ViewState,
}

impl MemorySurface {
    pub fn new(bounds: GridBounds) -> Self {
        Self {
            bounds,
            highlights: HashSet::new(),
            journal: Vec::new(),
            active: ActiveElement::None,
            text: HashMap::new(),
            view: ViewState::default(),
        }
    }

    pub fn has_highlight(&self, addr: GridAddress, style: Highlight) -> bool {
        self.highlights.contains(&(addr, style))
    }

    /// All elements currently carrying `style`, in row-major order.
    pub fn highlighted(&self, style: Highlight) -> BTreeSet<GridAddress> {
        self.highlights
            .iter()
            .filter(|(_, s)| *s == style)
            .map(|(a, _)| *a)
            .collect()
    }

    /// Style changes since the last call.
    pub fn take_journal(&mut self) -> Vec<StyleChange> {
        std::mem::take(&mut self.journal)
    }

    pub fn journal(&self) -> &[StyleChange] {
        &self.journal
    }

    /// Simulate focus moving into a non-cell text field.
    pub fn set_active(&mut self, active: ActiveElement) {
        self.active = active;
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn text(&self, addr: GridAddress) -> &str {
        self.text.get(&addr).map(String::as_str).unwrap_or("")
    }

    pub fn set_text(&mut self, addr: GridAddress, value: impl Into<String>) {
        self.text.insert(addr, value.into());
    }

    /// Native text editing inside the focused cell input: append a char.
    pub fn type_char(&mut self, ch: char) -> bool {
        match self.active {
            ActiveElement::CellInput(addr) => {
                self.text.entry(addr).or_default().push(ch);
                true
            }
            _ => false,
        }
    }

    /// Native text editing inside the focused cell input: delete a char.
    pub fn backspace(&mut self) -> bool {
        match self.active {
            ActiveElement::CellInput(addr) => {
                if let Some(s) = self.text.get_mut(&addr) {
                    s.pop();
                }
                true
            }
            _ => false,
        }
    }

    fn pan(&mut self, direction: Direction) {
        let (d_row, d_col) = direction.delta();
        let max_row = self.bounds.rows.saturating_sub(1) as i64;
        let max_col = self.bounds.cols.saturating_sub(1) as i64;
        self.view.origin_row = (self.view.origin_row as i64 + d_row).clamp(0, max_row) as usize;
        self.view.origin_col = (self.view.origin_col as i64 + d_col).clamp(0, max_col) as usize;
    }

    /// Scroll so the confirmed selection's top-left cell is the origin.
    fn jump_to_target(&mut self) {
        if let Some(first) = self.highlighted(Highlight::Selected).into_iter().next() {
            self.view.origin_row = first.row.max(0) as usize;
            self.view.origin_col = first.col.max(0) as usize;
        }
    }
}

impl Surface for MemorySurface {
    fn bounds(&self) -> GridBounds {
        self.bounds
    }

    fn apply_highlight(&mut self, addr: GridAddress, style: Highlight) {
        if !self.has_element(addr) {
            return;
        }
        if self.highlights.insert((addr, style)) {
            self.journal.push(StyleChange { addr, style, applied: true });
        }
    }

    fn remove_highlight(&mut self, addr: GridAddress, style: Highlight) {
        if self.highlights.remove(&(addr, style)) {
            self.journal.push(StyleChange { addr, style, applied: false });
        }
    }

    fn clear_highlight(&mut self, style: Highlight) {
        let addrs: Vec<GridAddress> = self.highlighted(style).into_iter().collect();
        for addr in addrs {
            self.remove_highlight(addr, style);
        }
    }

    fn active_element(&self) -> ActiveElement {
        self.active
    }

    fn focus_input(&mut self, addr: Option<GridAddress>) {
        self.active = match addr {
            Some(a) if self.has_element(a) && a.is_cell() => ActiveElement::CellInput(a),
            _ => ActiveElement::None,
        };
    }

    fn apply_ui(&mut self, action: UiAction) {
        match action {
            UiAction::TogglePanel(panel) => {
                self.view.open_panel = if self.view.open_panel == Some(panel) {
                    None
                } else {
                    Some(panel)
                };
            }
            UiAction::Save => self.view.save_requests += 1,
            UiAction::ClearSelector => self.view.selector_clears += 1,
            UiAction::Pan(direction) => self.pan(direction),
            UiAction::JumpHome => {
                self.view.origin_row = 0;
                self.view.origin_col = 0;
            }
            UiAction::JumpToTarget => self.jump_to_target(),
        }
    }
}
