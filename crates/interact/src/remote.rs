//! A [`RemoteSession`] that records calls instead of sending them.
//! Used for dry-run replays and tests.

use gridsync_core::{GridAddress, SelectionRect};
use gridsync_protocol::{Ack, BulkEditCommand, RemoteError, RemoteSession, Request};

#[derive(Debug, Clone, Default)]
pub struct RecordingSession {
    requests: Vec<Request>,
    failing: bool,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail with a network error (still recorded).
    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    pub fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.requests)
    }

    pub fn selection_syncs(&self) -> Vec<SelectionRect> {
        self.requests
            .iter()
            .filter_map(|r| match r {
                Request::SyncSelection { rect } => Some(*rect),
                _ => None,
            })
            .collect()
    }

    pub fn focus_syncs(&self) -> Vec<Option<GridAddress>> {
        self.requests
            .iter()
            .filter_map(|r| match r {
                Request::SyncFocus { focus } => Some(*focus),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, request: Request) -> Result<Ack, RemoteError> {
        log::debug!("remote {}", request.describe());
        self.requests.push(request);
        if self.failing {
            Err(RemoteError::Network("simulated failure".to_string()))
        } else {
            Ok(Ack::Accepted)
        }
    }
}

impl RemoteSession for RecordingSession {
    fn sync_selection(&mut self, rect: &SelectionRect) -> Result<Ack, RemoteError> {
        self.record(Request::SyncSelection { rect: *rect })
    }

    fn sync_focus(&mut self, focus: Option<GridAddress>) -> Result<Ack, RemoteError> {
        self.record(Request::SyncFocus { focus })
    }

    fn apply_bulk_edit(&mut self, command: BulkEditCommand) -> Result<Ack, RemoteError> {
        self.record(Request::BulkEdit { command })
    }
}
