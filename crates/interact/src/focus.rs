//! Single-cell edit focus.
//!
//! At most one cell carries the `EditingCurrent` marker at any time. Focus
//! is client-local: the controller decides, updates the surface at once and
//! publishes the new focus for the backend to record. A reattached surface
//! always starts `Unfocused`.

use std::time::Duration;

use gridsync_core::GridAddress;

use crate::coalesce::Coalescer;
use crate::error::InteractError;
use crate::surface::{Highlight, Surface, Vertical};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusState {
    #[default]
    Unfocused,
    Focused(GridAddress),
}

#[derive(Debug)]
pub struct FocusController {
    state: FocusState,
    outbox: Coalescer<Option<GridAddress>>,
}

impl FocusController {
    pub fn new(period: Duration) -> Self {
        Self {
            state: FocusState::Unfocused,
            outbox: Coalescer::new("focus", period),
        }
    }

    pub fn state(&self) -> FocusState {
        self.state
    }

    pub fn focused(&self) -> Option<GridAddress> {
        match self.state {
            FocusState::Focused(addr) => Some(addr),
            FocusState::Unfocused => None,
        }
    }

    pub fn outbox(&self) -> &Coalescer<Option<GridAddress>> {
        &self.outbox
    }

    pub fn outbox_mut(&mut self) -> &mut Coalescer<Option<GridAddress>> {
        &mut self.outbox
    }

    /// Reset against a freshly attached surface: forget any focus and wipe
    /// stale markers left on any cell. The backend is not told; its
    /// recorded focus is overwritten by the next `set_focus`.
    pub fn attach<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.state = FocusState::Unfocused;
        surface.clear_highlight(Highlight::EditingCurrent);
    }

    pub fn set_focus<S: Surface + ?Sized>(
        &mut self,
        addr: GridAddress,
        surface: &mut S,
    ) -> Result<(), InteractError> {
        if !addr.is_cell() || !surface.has_element(addr) {
            return Err(InteractError::StaleFocusTarget { row: addr.row, col: addr.col });
        }
        if let FocusState::Focused(prev) = self.state {
            if prev != addr {
                surface.remove_highlight(prev, Highlight::EditingCurrent);
            }
        }
        surface.apply_highlight(addr, Highlight::EditingCurrent);
        surface.focus_input(Some(addr));
        self.state = FocusState::Focused(addr);
        self.outbox.publish(Some(addr));
        log::debug!("focus -> {}", addr);
        Ok(())
    }

    /// Drop edit focus. Idempotent.
    pub fn clear_focus<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        let FocusState::Focused(prev) = self.state else {
            return;
        };
        surface.remove_highlight(prev, Highlight::EditingCurrent);
        if surface.active_element().is_cell_input() {
            surface.focus_input(None);
        }
        self.state = FocusState::Unfocused;
        self.outbox.publish(None);
        log::debug!("focus cleared (was {})", prev);
    }

    /// Focus the cell directly above or below. At the grid edge this
    /// changes nothing and reports `StaleFocusTarget`.
    pub fn move_adjacent<S: Surface + ?Sized>(
        &mut self,
        direction: Vertical,
        surface: &mut S,
    ) -> Result<GridAddress, InteractError> {
        let FocusState::Focused(current) = self.state else {
            return Err(InteractError::NotFocused);
        };
        let row = current.row + direction.delta();
        let target = current
            .offset_row(direction.delta())
            .filter(|t| surface.has_element(*t))
            .ok_or(InteractError::StaleFocusTarget { row, col: current.col })?;
        self.set_focus(target, surface)?;
        Ok(target)
    }
}
