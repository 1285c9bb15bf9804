//! Pointer-driven rectangular selection.
//!
//! A gesture goes `Idle -> Active -> Idle`:
//!
//! - `begin(anchor)` fixes the anchor and paints it with the trial style
//! - `update(candidate)` moves the endpoint, redrawing only the cells in the
//!   symmetric difference, and publishes the normalized rectangle
//! - `finalize(candidate)` commits the last rectangle as the confirmed
//!   selection, or cancels if the candidate has the wrong address kind
//! - `cancel()` reverts the trial highlight
//!
//! Endpoints of another address kind than the anchor are dropped, never
//! clamped: dragging from a row header into the cell area keeps the last
//! valid row-header rectangle.

use std::time::Duration;

use gridsync_core::{covered, diff, is_compatible, AddressKind, GridAddress, SelectionRect};

use crate::coalesce::Coalescer;
use crate::error::InteractError;
use crate::surface::{Highlight, Surface};

#[derive(Debug)]
pub struct SelectionTracker {
    trial: Option<SelectionRect>,
    confirmed: Option<SelectionRect>,
    outbox: Coalescer<SelectionRect>,
}

impl SelectionTracker {
    pub fn new(period: Duration) -> Self {
        Self {
            trial: None,
            confirmed: None,
            outbox: Coalescer::new("selection", period),
        }
    }

    pub fn is_active(&self) -> bool {
        self.trial.is_some()
    }

    /// The in-progress rectangle, anchor first.
    pub fn trial(&self) -> Option<&SelectionRect> {
        self.trial.as_ref()
    }

    /// The last committed rectangle.
    pub fn confirmed(&self) -> Option<&SelectionRect> {
        self.confirmed.as_ref()
    }

    pub fn outbox(&self) -> &Coalescer<SelectionRect> {
        &self.outbox
    }

    pub fn outbox_mut(&mut self) -> &mut Coalescer<SelectionRect> {
        &mut self.outbox
    }

    pub fn begin<S: Surface + ?Sized>(
        &mut self,
        anchor: GridAddress,
        surface: &mut S,
    ) -> Result<(), InteractError> {
        if self.trial.is_some() {
            return Err(InteractError::SelectionAlreadyActive);
        }
        let rect = SelectionRect::single(anchor);
        for addr in covered(&rect, surface.bounds()) {
            surface.apply_highlight(addr, Highlight::TrialSelection);
        }
        self.trial = Some(rect);
        log::debug!("selection begin at {}", anchor);
        Ok(())
    }

    /// Move the endpoint. Returns `Ok(false)` when the endpoint did not
    /// change. An incompatible candidate is rejected without touching the
    /// surface or the outbox.
    pub fn update<S: Surface + ?Sized>(
        &mut self,
        candidate: GridAddress,
        surface: &mut S,
    ) -> Result<bool, InteractError> {
        let Some(prev) = self.trial else {
            return Err(InteractError::SelectionNotActive);
        };
        let anchor = prev.anchor();
        if !is_compatible(anchor, candidate) {
            return Err(InteractError::InvalidSelectionShape { anchor, candidate });
        }
        if prev.end() == candidate {
            return Ok(false);
        }

        let next = prev.with_end(candidate);
        let changes = diff(Some(&prev), &next, surface.bounds());
        for addr in &changes.to_clear {
            surface.remove_highlight(*addr, Highlight::TrialSelection);
        }
        for addr in &changes.to_mark {
            surface.apply_highlight(*addr, Highlight::TrialSelection);
        }
        self.trial = Some(next);
        self.outbox.publish(next.normalized());
        Ok(true)
    }

    /// End the gesture at `candidate` and commit it as the confirmed
    /// selection. Returns the committed rectangle in anchor/endpoint form.
    pub fn finalize<S: Surface + ?Sized>(
        &mut self,
        candidate: GridAddress,
        surface: &mut S,
    ) -> Result<SelectionRect, InteractError> {
        let Some(trial) = self.trial else {
            return Err(InteractError::SelectionNotActive);
        };
        let anchor = trial.anchor();
        if !is_compatible(anchor, candidate) {
            self.cancel(surface)?;
            return Err(InteractError::InvalidSelectionShape { anchor, candidate });
        }
        self.update(candidate, surface)?;

        let Some(rect) = self.trial.take() else {
            return Err(InteractError::SelectionNotActive);
        };
        let cells = covered(&rect, surface.bounds());
        for addr in &cells {
            surface.remove_highlight(*addr, Highlight::TrialSelection);
        }
        surface.clear_highlight(Highlight::Selected);
        for addr in &cells {
            surface.apply_highlight(*addr, Highlight::Selected);
        }
        self.confirmed = Some(rect);
        // A click (begin and finalize on the same cell) never went through
        // update, so the commit itself is always published.
        self.outbox.publish(rect.normalized());
        log::debug!("selection committed {:?} ({} cells)", rect.normalized(), cells.len());
        Ok(rect)
    }

    /// Abandon the gesture and revert its trial highlight.
    pub fn cancel<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<(), InteractError> {
        let Some(trial) = self.trial.take() else {
            return Err(InteractError::SelectionNotActive);
        };
        for addr in covered(&trial, surface.bounds()) {
            surface.remove_highlight(addr, Highlight::TrialSelection);
        }
        // The backend may only have seen intermediate rectangles of the
        // abandoned gesture; point it back at what is on screen.
        if self.outbox.has_pending() {
            match self.confirmed {
                Some(rect) => self.outbox.publish(rect.normalized()),
                None => {
                    self.outbox.discard();
                }
            }
        }
        log::debug!("selection cancelled");
        Ok(())
    }

    /// Grow or shrink the confirmed selection by one step from its anchor
    /// (Shift+Arrow). Without a confirmed selection, extends from
    /// `fallback` (usually the focused cell).
    pub fn extend<S: Surface + ?Sized>(
        &mut self,
        d_row: i64,
        d_col: i64,
        fallback: Option<GridAddress>,
        surface: &mut S,
    ) -> Result<SelectionRect, InteractError> {
        if self.trial.is_some() {
            return Err(InteractError::SelectionAlreadyActive);
        }
        let base = match (self.confirmed, fallback) {
            (Some(rect), _) => rect,
            (None, Some(addr)) => SelectionRect::single(addr),
            (None, None) => return Err(InteractError::NoSelection),
        };
        let bounds = surface.bounds();
        if bounds.rows == 0 || bounds.cols == 0 {
            return Err(InteractError::NoSelection);
        }
        let max_row = bounds.rows as i64 - 1;
        let max_col = bounds.cols as i64 - 1;

        let end = base.end();
        // Header selections only move along their own axis.
        let new_end = match end.kind() {
            AddressKind::Cell => GridAddress {
                row: (end.row + d_row).clamp(0, max_row),
                col: (end.col + d_col).clamp(0, max_col),
            },
            AddressKind::RowHeader => GridAddress {
                row: (end.row + d_row).clamp(0, max_row),
                col: end.col,
            },
            AddressKind::ColHeader => GridAddress {
                row: end.row,
                col: (end.col + d_col).clamp(0, max_col),
            },
        };
        let next = base.with_end(new_end);

        let changes = diff(self.confirmed.as_ref(), &next, bounds);
        for addr in &changes.to_clear {
            surface.remove_highlight(*addr, Highlight::Selected);
        }
        for addr in &changes.to_mark {
            surface.apply_highlight(*addr, Highlight::Selected);
        }
        if self.confirmed != Some(next) {
            self.confirmed = Some(next);
            self.outbox.publish(next.normalized());
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySurface;
    use gridsync_core::GridBounds;

    fn setup() -> (SelectionTracker, MemorySurface) {
        (
            SelectionTracker::new(Duration::from_millis(25)),
            MemorySurface::new(GridBounds::new(10, 8)),
        )
    }

    fn cells(r0: i64, r1: i64, c0: i64, c1: i64) -> Vec<GridAddress> {
        let mut out = Vec::new();
        for row in r0..=r1 {
            for col in c0..=c1 {
                out.push(GridAddress { row, col });
            }
        }
        out
    }

    #[test]
    fn test_begin_paints_anchor() {
        let (mut t, mut s) = setup();
        t.begin(GridAddress::cell(2, 3), &mut s).unwrap();
        assert!(s.has_highlight(GridAddress::cell(2, 3), Highlight::TrialSelection));
        assert!(!t.outbox().has_pending());
        assert_eq!(
            t.begin(GridAddress::cell(0, 0), &mut s),
            Err(InteractError::SelectionAlreadyActive)
        );
    }

    #[test]
    fn test_update_without_begin() {
        let (mut t, mut s) = setup();
        assert_eq!(
            t.update(GridAddress::cell(1, 1), &mut s),
            Err(InteractError::SelectionNotActive)
        );
        assert!(s.journal().is_empty());
    }

    #[test]
    fn test_update_same_end_is_noop() {
        let (mut t, mut s) = setup();
        t.begin(GridAddress::cell(2, 3), &mut s).unwrap();
        assert_eq!(t.update(GridAddress::cell(2, 3), &mut s), Ok(false));
        assert!(!t.outbox().has_pending());
    }

    #[test]
    fn test_incompatible_update_rejected() {
        let (mut t, mut s) = setup();
        t.begin(GridAddress::row_header(2), &mut s).unwrap();
        t.update(GridAddress::row_header(4), &mut s).unwrap();
        let before = s.highlighted(Highlight::TrialSelection);
        s.take_journal();
        t.outbox_mut().discard();

        let result = t.update(GridAddress::cell(5, 5), &mut s);
        assert!(matches!(result, Err(InteractError::InvalidSelectionShape { .. })));
        assert_eq!(s.highlighted(Highlight::TrialSelection), before);
        assert!(s.journal().is_empty());
        assert!(!t.outbox().has_pending());
        assert!(t.is_active());
    }

    #[test]
    fn test_row_header_drag_covers_full_rows() {
        let (mut t, mut s) = setup();
        t.begin(GridAddress::row_header(1), &mut s).unwrap();
        t.update(GridAddress::row_header(2), &mut s).unwrap();
        let marked = s.highlighted(Highlight::TrialSelection);
        assert_eq!(marked.len(), 2 * 8);
        assert!(!marked.contains(&GridAddress::row_header(1)));
        assert_eq!(
            t.outbox().pending(),
            Some(&SelectionRect { start_row: 1, start_col: -1, end_row: 2, end_col: -1 })
        );
    }

    #[test]
    fn test_finalize_replaces_confirmed_style() {
        let (mut t, mut s) = setup();
        t.begin(GridAddress::cell(0, 0), &mut s).unwrap();
        t.finalize(GridAddress::cell(1, 1), &mut s).unwrap();
        assert_eq!(s.highlighted(Highlight::Selected).len(), 4);

        t.begin(GridAddress::cell(5, 5), &mut s).unwrap();
        let rect = t.finalize(GridAddress::cell(5, 5), &mut s).unwrap();
        assert_eq!(rect, SelectionRect::single(GridAddress::cell(5, 5)));
        assert_eq!(
            s.highlighted(Highlight::Selected).into_iter().collect::<Vec<_>>(),
            vec![GridAddress::cell(5, 5)]
        );
        assert!(s.highlighted(Highlight::TrialSelection).is_empty());
        assert_eq!(t.confirmed(), Some(&rect));
        assert!(!t.is_active());
    }

    #[test]
    fn test_finalize_incompatible_cancels() {
        let (mut t, mut s) = setup();
        t.begin(GridAddress::col_header(2), &mut s).unwrap();
        let result = t.finalize(GridAddress::cell(3, 3), &mut s);
        assert!(matches!(result, Err(InteractError::InvalidSelectionShape { .. })));
        assert!(!t.is_active());
        assert!(s.highlighted(Highlight::TrialSelection).is_empty());
        assert!(s.highlighted(Highlight::Selected).is_empty());
        assert!(t.confirmed().is_none());
    }

    #[test]
    fn test_cancel_reverts_and_republishes_confirmed() {
        let (mut t, mut s) = setup();
        t.begin(GridAddress::cell(0, 0), &mut s).unwrap();
        t.finalize(GridAddress::cell(0, 1), &mut s).unwrap();
        t.outbox_mut().discard();

        t.begin(GridAddress::cell(4, 4), &mut s).unwrap();
        t.update(GridAddress::cell(6, 6), &mut s).unwrap();
        t.cancel(&mut s).unwrap();

        assert!(s.highlighted(Highlight::TrialSelection).is_empty());
        assert_eq!(s.highlighted(Highlight::Selected).len(), 2);
        assert_eq!(
            t.outbox().pending(),
            Some(&SelectionRect::new(GridAddress::cell(0, 0), GridAddress::cell(0, 1)))
        );
        assert_eq!(t.cancel(&mut s), Err(InteractError::SelectionNotActive));
    }

    #[test]
    fn test_cancel_without_confirmed_discards_pending() {
        let (mut t, mut s) = setup();
        t.begin(GridAddress::cell(4, 4), &mut s).unwrap();
        t.update(GridAddress::cell(6, 6), &mut s).unwrap();
        t.cancel(&mut s).unwrap();
        assert!(!t.outbox().has_pending());
    }

    #[test]
    fn test_extend_from_fallback_and_clamp() {
        let (mut t, mut s) = setup();
        assert_eq!(t.extend(0, 1, None, &mut s), Err(InteractError::NoSelection));

        let rect = t.extend(0, 1, Some(GridAddress::cell(9, 6)), &mut s).unwrap();
        assert_eq!(rect.end(), GridAddress::cell(9, 7));
        let rect = t.extend(1, 1, None, &mut s).unwrap();
        assert_eq!(rect.end(), GridAddress::cell(9, 7));
        assert_eq!(
            s.highlighted(Highlight::Selected).into_iter().collect::<Vec<_>>(),
            cells(9, 9, 6, 7)
        );

        let rect = t.extend(-2, 0, None, &mut s).unwrap();
        assert_eq!(rect.anchor(), GridAddress::cell(9, 6));
        assert_eq!(
            s.highlighted(Highlight::Selected).into_iter().collect::<Vec<_>>(),
            cells(7, 9, 6, 7)
        );
        assert_eq!(
            t.outbox().pending(),
            Some(&SelectionRect { start_row: 7, start_col: 6, end_row: 9, end_col: 7 })
        );
    }

    #[test]
    fn test_extend_header_moves_on_own_axis() {
        let (mut t, mut s) = setup();
        t.begin(GridAddress::col_header(2), &mut s).unwrap();
        t.finalize(GridAddress::col_header(2), &mut s).unwrap();

        let rect = t.extend(3, 1, None, &mut s).unwrap();
        assert_eq!(rect.end(), GridAddress::col_header(3));
        assert_eq!(s.highlighted(Highlight::Selected).len(), 2 * 10);
    }

    #[test]
    fn test_extend_during_drag_rejected() {
        let (mut t, mut s) = setup();
        t.begin(GridAddress::cell(1, 1), &mut s).unwrap();
        assert_eq!(
            t.extend(1, 0, None, &mut s),
            Err(InteractError::SelectionAlreadyActive)
        );
    }
}
