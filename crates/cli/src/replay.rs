//! Headless replay: feed a JSONL event script through a session driven by a
//! manual clock, then report the final state.
//!
//! Usage: gridsync replay script.jsonl [--dry-run | --endpoint URL]
//!
//! `wait` events advance the clock in small steps and pump the session at
//! each step, so coalescer timing matches an interactive run. Whatever is
//! still pending when the script ends is flushed.

use std::time::Duration;

use gridsync_core::{GridAddress, SelectionRect};
use gridsync_interact::{
    Action, Clock, FocusContext, GridSession, Key, KeyEvent, ManualClock, MemorySurface, Surface,
};
use gridsync_protocol::{RemoteSession, ScriptEvent};
use serde::Serialize;

/// Clock granularity for `wait` events.
const WAIT_STEP: Duration = Duration::from_millis(5);

/// Outcome of a replay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub events: usize,
    /// Events that had no effect (wrong address kind, no focus, ...).
    pub rejected: usize,
    pub remote_calls: u64,
    pub remote_failures: u64,
    /// Confirmed selection as sent to the backend.
    pub selection: Option<SelectionRect>,
    pub selected_cells: usize,
    pub focus: Option<GridAddress>,
    pub elapsed_ms: u64,
}

/// Keys the engine leaves alone go to the focused field, like a browser
/// would deliver them.
pub fn pass_through(surface: &mut MemorySurface, context: FocusContext, event: &KeyEvent) {
    let m = &event.modifiers;
    if !matches!(context, FocusContext::InEditableField(_)) || m.control || m.alt || m.platform {
        return;
    }
    match &event.key {
        Key::Char(c) => {
            surface.type_char(*c);
        }
        Key::Backspace => {
            surface.backspace();
        }
        _ => {}
    }
}

fn address(row: i64, col: i64) -> Option<GridAddress> {
    let addr = GridAddress::new(row, col);
    if addr.is_none() {
        log::warn!("skipping event at invalid address ({}, {})", row, col);
    }
    addr
}

pub fn run<R: RemoteSession>(
    events: &[ScriptEvent],
    session: &mut GridSession<MemorySurface, R>,
    clock: &ManualClock,
) -> ReplaySummary {
    let mut summary = ReplaySummary { events: events.len(), ..ReplaySummary::default() };

    for event in events {
        let ok = match event {
            ScriptEvent::PointerDown { row, col } => {
                address(*row, *col).map_or(false, |a| session.pointer_down(a).is_ok())
            }
            ScriptEvent::PointerMove { row, col } => {
                address(*row, *col).map_or(false, |a| session.pointer_move(a).is_ok())
            }
            ScriptEvent::PointerUp { row, col } => {
                address(*row, *col).map_or(false, |a| session.pointer_up(a).is_ok())
            }
            ScriptEvent::PointerCancel => session.pointer_cancel().is_ok(),
            ScriptEvent::Click { row, col } => {
                address(*row, *col).map_or(false, |a| session.click(a).is_ok())
            }
            ScriptEvent::Key(stroke) => {
                let event = KeyEvent::from(stroke);
                let context = session.focus_context();
                if session.handle_key(&event) == Action::Ignore {
                    pass_through(session.surface_mut(), context, &event);
                }
                true
            }
            ScriptEvent::Wait { ms } => {
                let mut remaining = Duration::from_millis(*ms);
                while !remaining.is_zero() {
                    let step = remaining.min(WAIT_STEP);
                    clock.advance(step);
                    remaining -= step;
                    session.pump(clock.now());
                }
                true
            }
        };
        if !ok {
            summary.rejected += 1;
        }
        session.pump(clock.now());
    }
    session.flush();

    let stats = session.stats();
    summary.remote_calls = stats.remote_calls;
    summary.remote_failures = stats.remote_failures;
    summary.selection = session.selection().confirmed().map(SelectionRect::normalized);
    summary.selected_cells = session.selection().confirmed().map_or(0, |rect| {
        rect.effective().cell_count(session.surface().bounds())
    });
    summary.focus = session.focus().focused();
    summary.elapsed_ms = clock.elapsed().as_millis() as u64;
    summary
}
