// End-to-end interaction scenarios against the in-memory surface and a
// recording remote.

use std::collections::BTreeSet;
use std::time::Duration;

use gridsync_config::ModifierStyle;
use gridsync_core::{GridAddress, GridBounds, SelectionRect};
use gridsync_interact::*;
use gridsync_protocol::{BulkEditCommand, Request};

fn session() -> GridSession<MemorySurface, RecordingSession> {
    GridSession::new(
        MemorySurface::new(GridBounds::new(10, 8)),
        RecordingSession::new(),
        SessionConfig {
            selection_interval: Duration::from_millis(25),
            focus_interval: Duration::from_millis(100),
            modifier_style: ModifierStyle::Ctrl,
        },
    )
}

fn block(r0: i64, r1: i64, c0: i64, c1: i64) -> BTreeSet<GridAddress> {
    let mut out = BTreeSet::new();
    for row in r0..=r1 {
        for col in c0..=c1 {
            out.insert(GridAddress { row, col });
        }
    }
    out
}

fn changes(journal: &[StyleChange], style: Highlight, applied: bool) -> BTreeSet<GridAddress> {
    journal
        .iter()
        .filter(|c| c.style == style && c.applied == applied)
        .map(|c| c.addr)
        .collect()
}

#[test]
fn drag_redraws_incrementally_and_commits_once() {
    let mut s = session();
    let clock = ManualClock::new();

    s.pointer_down(GridAddress::cell(2, 3)).unwrap();
    s.pointer_move(GridAddress::cell(4, 5)).unwrap();
    assert_eq!(
        s.surface().highlighted(Highlight::TrialSelection),
        block(2, 4, 3, 5)
    );

    s.surface_mut().take_journal();
    s.pointer_move(GridAddress::cell(1, 5)).unwrap();
    let journal = s.surface_mut().take_journal();
    assert_eq!(changes(&journal, Highlight::TrialSelection, false), block(3, 4, 3, 5));
    assert_eq!(changes(&journal, Highlight::TrialSelection, true), block(1, 1, 3, 5));
    assert_eq!(
        s.surface().highlighted(Highlight::TrialSelection),
        block(1, 2, 3, 5)
    );

    s.pointer_up(GridAddress::cell(1, 5)).unwrap();
    assert!(s.surface().highlighted(Highlight::TrialSelection).is_empty());
    assert_eq!(s.surface().highlighted(Highlight::Selected), block(1, 2, 3, 5));

    s.pump(clock.now());
    clock.advance(Duration::from_millis(200));
    s.pump(clock.now());

    assert_eq!(
        s.remote().selection_syncs(),
        vec![SelectionRect { start_row: 1, start_col: 3, end_row: 2, end_col: 5 }]
    );
}

#[test]
fn enter_moves_focus_down_one_cell() {
    let mut s = session();
    let clock = ManualClock::new();

    s.click(GridAddress::cell(5, 2)).unwrap();
    s.pump(clock.now());
    s.remote_mut().take_requests();
    s.surface_mut().take_journal();

    s.surface_mut().focus_input(None);
    assert_eq!(s.focus_context(), FocusContext::CellFocused);
    let action = s.handle_key(&KeyEvent::plain(Key::Enter));
    assert_eq!(action, Action::MoveFocus(Vertical::Down));

    let journal = s.surface().journal().to_vec();
    assert_eq!(
        changes(&journal, Highlight::EditingCurrent, false),
        BTreeSet::from([GridAddress::cell(5, 2)])
    );
    assert_eq!(
        changes(&journal, Highlight::EditingCurrent, true),
        BTreeSet::from([GridAddress::cell(6, 2)])
    );

    clock.advance(Duration::from_millis(100));
    s.pump(clock.now());
    assert_eq!(
        s.remote().requests(),
        &[Request::SyncFocus { focus: Some(GridAddress::cell(6, 2)) }]
    );
}

#[test]
fn enter_inside_cell_input_hops_inputs() {
    let mut s = session();
    s.click(GridAddress::cell(0, 0)).unwrap();
    s.handle_key(&KeyEvent::plain(Key::Enter));
    s.handle_key(&KeyEvent::plain(Key::Enter));
    s.handle_key(&KeyEvent::new(Key::Enter, Modifiers::shift()));

    assert_eq!(s.focus().focused(), Some(GridAddress::cell(1, 0)));
    assert_eq!(
        s.surface().active_element(),
        ActiveElement::CellInput(GridAddress::cell(1, 0))
    );
    assert_eq!(s.surface().highlighted(Highlight::EditingCurrent).len(), 1);
}

#[test]
fn move_up_from_top_row_changes_nothing() {
    let mut s = session();
    s.click(GridAddress::cell(0, 4)).unwrap();
    s.flush();
    s.remote_mut().take_requests();
    s.surface_mut().take_journal();

    s.handle_key(&KeyEvent::new(Key::Enter, Modifiers::shift()));
    s.flush();

    assert!(s.surface().journal().is_empty());
    assert!(s.remote().requests().is_empty());
    assert_eq!(s.focus().focused(), Some(GridAddress::cell(0, 4)));
}

#[test]
fn header_drag_ignores_cell_targets() {
    let mut s = session();
    s.pointer_down(GridAddress::col_header(1)).unwrap();
    s.pointer_move(GridAddress::col_header(3)).unwrap();
    s.surface_mut().take_journal();

    assert!(s.pointer_move(GridAddress::cell(4, 6)).is_err());
    assert!(s.surface().journal().is_empty());

    s.pointer_up(GridAddress::col_header(2)).unwrap();
    assert_eq!(s.surface().highlighted(Highlight::Selected), block(0, 9, 1, 2));
    s.flush();
    assert_eq!(
        s.remote().selection_syncs(),
        vec![SelectionRect { start_row: -1, start_col: 1, end_row: -1, end_col: 2 }]
    );
}

#[test]
fn fast_drag_syncs_at_tick_rate_and_ends_on_last_rect() {
    let mut s = session();
    let clock = ManualClock::new();

    s.pointer_down(GridAddress::cell(0, 0)).unwrap();
    for i in 1..=9usize {
        s.pointer_move(GridAddress::cell(i, i % 8)).unwrap();
        clock.advance(Duration::from_millis(5));
        s.pump(clock.now());
    }
    s.pointer_up(GridAddress::cell(9, 7)).unwrap();
    clock.advance(Duration::from_millis(25));
    s.pump(clock.now());

    let syncs = s.remote().selection_syncs();
    // 45ms of dragging plus the final tick.
    assert!(syncs.len() <= 4, "too many syncs: {:?}", syncs);
    assert_eq!(
        syncs.last(),
        Some(&SelectionRect { start_row: 0, start_col: 0, end_row: 9, end_col: 7 })
    );
}

#[test]
fn chords_reach_surface_and_remote() {
    let mut s = session();
    s.handle_key(&KeyEvent::new(Key::Char('3'), Modifiers::control()));
    s.handle_key(&KeyEvent::new(Key::Char('s'), Modifiers::control()));
    s.handle_key(&KeyEvent::new(Key::Char('i'), Modifiers::control()));
    s.handle_key(&KeyEvent::plain(Key::Down));

    let view = s.surface().view();
    assert_eq!(view.open_panel, Some(Panel::BulkEditor));
    assert_eq!(view.save_requests, 1);
    assert_eq!(view.origin_row, 1);
    assert_eq!(
        s.remote().requests(),
        &[Request::BulkEdit { command: BulkEditCommand::Insert }]
    );
}

#[test]
fn text_field_keeps_its_keys() {
    let mut s = session();
    s.surface_mut().set_active(ActiveElement::TextField);
    for ev in [
        KeyEvent::plain(Key::Enter),
        KeyEvent::plain(Key::Down),
        KeyEvent::new(Key::Char('v'), Modifiers::control()),
    ] {
        assert_eq!(s.handle_key(&ev), Action::Ignore);
    }
    assert_eq!(s.handle_key(&KeyEvent::plain(Key::Escape)), Action::Blur);
    assert_eq!(s.surface().active_element(), ActiveElement::None);
}

#[test]
fn bulk_edit_sees_committed_selection_first() {
    let mut s = session();
    let clock = ManualClock::new();
    s.pump(clock.now());

    s.pointer_down(GridAddress::cell(0, 0)).unwrap();
    s.pointer_up(GridAddress::cell(3, 3)).unwrap();
    clock.advance(Duration::from_millis(5));
    s.pump(clock.now());
    assert!(s.remote().requests().is_empty());

    let delete = KeyEvent::new(Key::Delete, Modifiers::control());
    assert_eq!(s.handle_key(&delete), Action::BulkEdit(BulkEditCommand::Delete));
    assert_eq!(
        s.remote().requests(),
        &[
            Request::SyncSelection {
                rect: SelectionRect { start_row: 0, start_col: 0, end_row: 3, end_col: 3 }
            },
            Request::BulkEdit { command: BulkEditCommand::Delete },
        ]
    );

    // Nothing left over for the next tick.
    clock.advance(Duration::from_millis(100));
    assert_eq!(s.pump(clock.now()), 0);
}

#[test]
fn bulk_edit_flushes_focus_after_selection() {
    let mut s = session();
    let clock = ManualClock::new();
    s.pump(clock.now());

    s.pointer_down(GridAddress::cell(1, 1)).unwrap();
    s.pointer_up(GridAddress::cell(1, 2)).unwrap();
    s.click(GridAddress::cell(5, 2)).unwrap();
    s.surface_mut().focus_input(None);
    assert_eq!(s.focus_context(), FocusContext::CellFocused);

    s.handle_key(&KeyEvent::new(Key::Char('x'), Modifiers::control()));
    assert_eq!(
        s.remote().requests(),
        &[
            Request::SyncSelection {
                rect: SelectionRect { start_row: 1, start_col: 1, end_row: 1, end_col: 2 }
            },
            Request::SyncFocus { focus: Some(GridAddress::cell(5, 2)) },
            Request::BulkEdit { command: BulkEditCommand::Cut },
        ]
    );
}
