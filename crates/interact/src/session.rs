//! One editing session: a surface, a remote, and the components between
//! them.
//!
//! Everything runs on the caller's thread. Pointer and key handlers update
//! the surface synchronously and only publish to the coalescers; `pump`
//! is the scheduler tick that drains them into the remote.

use std::time::{Duration, Instant};

use gridsync_config::{ModifierStyle, Settings};
use gridsync_core::GridAddress;
use gridsync_protocol::{Ack, RemoteError, RemoteSession};

use crate::error::InteractError;
use crate::focus::FocusController;
use crate::input::{focus_context, Action, FocusContext, InputDispatcher, KeyEvent};
use crate::selection::SelectionTracker;
use crate::surface::{ActiveElement, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub selection_interval: Duration,
    pub focus_interval: Duration,
    pub modifier_style: ModifierStyle,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for SessionConfig {
    fn from(s: &Settings) -> Self {
        Self {
            selection_interval: s.selection_interval(),
            focus_interval: s.focus_interval(),
            modifier_style: s.modifier_style,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub remote_calls: u64,
    pub remote_failures: u64,
}

pub struct GridSession<S: Surface, R: RemoteSession> {
    surface: S,
    remote: R,
    selection: SelectionTracker,
    focus: FocusController,
    dispatcher: InputDispatcher,
    stats: SessionStats,
}

/// Count a remote result. Failures are logged and dropped; the next sync
/// of the same kind overwrites whatever the backend missed.
fn record(stats: &mut SessionStats, what: &str, result: Result<Ack, RemoteError>) {
    stats.remote_calls += 1;
    if let Err(e) = result {
        stats.remote_failures += 1;
        log::warn!("{} failed: {}", what, e);
    }
}

impl<S: Surface, R: RemoteSession> GridSession<S, R> {
    pub fn new(mut surface: S, remote: R, config: SessionConfig) -> Self {
        let mut focus = FocusController::new(config.focus_interval);
        focus.attach(&mut surface);
        Self {
            surface,
            remote,
            selection: SelectionTracker::new(config.selection_interval),
            focus,
            dispatcher: InputDispatcher::new(config.modifier_style),
            stats: SessionStats::default(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn remote_mut(&mut self) -> &mut R {
        &mut self.remote
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    pub fn focus(&self) -> &FocusController {
        &self.focus
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn into_parts(self) -> (S, R) {
        (self.surface, self.remote)
    }

    // ========================================================================
    // Pointer
    // ========================================================================

    /// Start a drag. A gesture whose release was never seen is cancelled
    /// first.
    pub fn pointer_down(&mut self, addr: GridAddress) -> Result<(), InteractError> {
        if self.selection.is_active() {
            log::debug!("pointer down during drag, dropping the stale gesture");
            self.selection.cancel(&mut self.surface)?;
        }
        self.selection.begin(addr, &mut self.surface)
    }

    pub fn pointer_move(&mut self, addr: GridAddress) -> Result<(), InteractError> {
        match self.selection.update(addr, &mut self.surface) {
            Ok(_) => Ok(()),
            Err(e) => {
                log::debug!("pointer move to {} dropped: {}", addr, e);
                Err(e)
            }
        }
    }

    pub fn pointer_up(&mut self, addr: GridAddress) -> Result<(), InteractError> {
        match self.selection.finalize(addr, &mut self.surface) {
            Ok(_) => Ok(()),
            Err(e) => {
                log::debug!("pointer up at {} dropped: {}", addr, e);
                Err(e)
            }
        }
    }

    pub fn pointer_cancel(&mut self) -> Result<(), InteractError> {
        self.selection.cancel(&mut self.surface)
    }

    /// Give a cell edit focus (click into its input).
    pub fn click(&mut self, addr: GridAddress) -> Result<(), InteractError> {
        match self.focus.set_focus(addr, &mut self.surface) {
            Ok(()) => Ok(()),
            Err(e) => {
                log::debug!("click at {} dropped: {}", addr, e);
                Err(e)
            }
        }
    }

    // ========================================================================
    // Keyboard
    // ========================================================================

    pub fn focus_context(&self) -> FocusContext {
        focus_context(self.surface.active_element(), self.focus.focused())
    }

    /// Classify and run a key event. Returns the action taken so the caller
    /// knows whether the key was consumed (`Action::Ignore` means it was
    /// not).
    pub fn handle_key(&mut self, event: &KeyEvent) -> Action {
        let action = self.dispatcher.classify(event, self.focus_context());
        if let Err(e) = self.execute(action) {
            log::debug!("{:?} had no effect: {}", action, e);
        }
        action
    }

    pub fn execute(&mut self, action: Action) -> Result<(), InteractError> {
        match action {
            Action::Blur => {
                if self.selection.is_active() {
                    self.selection.cancel(&mut self.surface)?;
                }
                self.focus.clear_focus(&mut self.surface);
                if self.surface.active_element() != ActiveElement::None {
                    self.surface.focus_input(None);
                }
            }
            Action::Ui(ui) => self.surface.apply_ui(ui),
            Action::MoveFocus(direction) => {
                self.focus.move_adjacent(direction, &mut self.surface)?;
            }
            Action::ExtendSelection(direction) => {
                let (d_row, d_col) = direction.delta();
                let fallback = self.focus.focused();
                self.selection.extend(d_row, d_col, fallback, &mut self.surface)?;
            }
            Action::BulkEdit(command) => {
                // One-shot, never coalesced. The backend applies it to its
                // recorded selection, so pending state goes out first.
                self.flush();
                let result = self.remote.apply_bulk_edit(command);
                let failed = result.as_ref().err().cloned();
                record(&mut self.stats, "bulk edit", result);
                if let Some(e) = failed {
                    return Err(e.into());
                }
            }
            Action::Ignore => {}
        }
        Ok(())
    }

    // ========================================================================
    // Scheduler
    // ========================================================================

    /// Scheduler tick: run each coalescer whose period has elapsed. Returns
    /// the number of remote calls made.
    pub fn pump(&mut self, now: Instant) -> usize {
        let mut sent = 0;
        let remote = &mut self.remote;
        let stats = &mut self.stats;

        if self.selection.outbox_mut().poll(now, |rect| {
            record(stats, "selection sync", remote.sync_selection(&rect));
        }) {
            sent += 1;
        }
        if self.focus.outbox_mut().poll(now, |focus| {
            record(stats, "focus sync", remote.sync_focus(focus));
        }) {
            sent += 1;
        }
        sent
    }

    /// Sync everything pending now, ignoring tick periods. Used at shutdown.
    pub fn flush(&mut self) -> usize {
        let mut sent = 0;
        let remote = &mut self.remote;
        let stats = &mut self.stats;

        if self.selection.outbox_mut().tick(|rect| {
            record(stats, "selection sync", remote.sync_selection(&rect));
        }) {
            sent += 1;
        }
        if self.focus.outbox_mut().tick(|focus| {
            record(stats, "focus sync", remote.sync_focus(focus));
        }) {
            sent += 1;
        }
        sent
    }
}
