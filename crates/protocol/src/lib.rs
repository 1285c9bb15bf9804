//! gridsync Session Protocol - v1 Frozen Wire Format
//!
//! This crate defines the contract between the interaction engine and the
//! remote document/session service:
//!
//! - the three remote operations (`sync_selection`, `sync_focus`,
//!   `apply_bulk_edit`) as the [`RemoteSession`] trait
//! - their HTTP encoding ([`Request::method`], [`Request::path_segments`])
//! - the replay script format used by `gridsync replay`
//!
//! # Protocol Version
//!
//! This is **protocol v1**. Endpoint paths and bulk-edit names match what the
//! backend routes today. Changes require a bump of [`PROTOCOL_VERSION`].
//!
//! # Usage
//!
//! ```
//! use gridsync_protocol::{BulkEditCommand, Request};
//!
//! let req = Request::BulkEdit { command: BulkEditCommand::MoveForward };
//! assert_eq!(req.method(), "POST");
//! assert_eq!(req.path_segments(), vec!["bulk-editor", "apply", "Move Forward"]);
//! assert_eq!(req.describe(), "POST /bulk-editor/apply/Move Forward");
//! ```

use serde::{Deserialize, Serialize};

pub use gridsync_core::{GridAddress, SelectionRect};

mod script;

pub use script::{parse_script, KeyStroke, ScriptError, ScriptEvent};

/// Current protocol version. Increment for breaking changes.
pub const PROTOCOL_VERSION: u32 = 1;

// =============================================================================
// Bulk edit commands
// =============================================================================

/// Discrete bulk-edit commands. Sent immediately, never coalesced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BulkEditCommand {
    Cut,
    Copy,
    Paste,
    #[serde(rename = "Move Forward")]
    MoveForward,
    #[serde(rename = "Move Backward")]
    MoveBackward,
    Insert,
    #[serde(rename = "Insert End Rows")]
    InsertEndRows,
    #[serde(rename = "Insert End Columns")]
    InsertEndColumns,
    Delete,
}

impl BulkEditCommand {
    pub const ALL: [BulkEditCommand; 9] = [
        BulkEditCommand::Cut,
        BulkEditCommand::Copy,
        BulkEditCommand::Paste,
        BulkEditCommand::MoveForward,
        BulkEditCommand::MoveBackward,
        BulkEditCommand::Insert,
        BulkEditCommand::InsertEndRows,
        BulkEditCommand::InsertEndColumns,
        BulkEditCommand::Delete,
    ];

    /// Name used by the backend in the apply endpoint.
    pub fn wire_name(&self) -> &'static str {
        match self {
            BulkEditCommand::Cut => "Cut",
            BulkEditCommand::Copy => "Copy",
            BulkEditCommand::Paste => "Paste",
            BulkEditCommand::MoveForward => "Move Forward",
            BulkEditCommand::MoveBackward => "Move Backward",
            BulkEditCommand::Insert => "Insert",
            BulkEditCommand::InsertEndRows => "Insert End Rows",
            BulkEditCommand::InsertEndColumns => "Insert End Columns",
            BulkEditCommand::Delete => "Delete",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.wire_name() == name)
    }
}

impl std::fmt::Display for BulkEditCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

// =============================================================================
// Requests
// =============================================================================

/// One remote call, as it travels over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Persist the normalized effective selection. Idempotent, last write wins.
    SyncSelection { rect: SelectionRect },
    /// Persist (`Some`) or clear (`None`) the server-recorded edit focus.
    SyncFocus { focus: Option<GridAddress> },
    /// Apply a bulk-edit command to the current selection.
    BulkEdit { command: BulkEditCommand },
}

impl Request {
    pub fn method(&self) -> &'static str {
        match self {
            Request::SyncSelection { .. } => "PUT",
            Request::SyncFocus { focus: Some(_) } => "PUT",
            Request::SyncFocus { focus: None } => "POST",
            Request::BulkEdit { .. } => "POST",
        }
    }

    /// Unencoded path segments. Transports percent-encode each segment.
    pub fn path_segments(&self) -> Vec<String> {
        match self {
            Request::SyncSelection { rect } => vec![
                "selection".into(),
                "start".into(),
                rect.start_row.to_string(),
                rect.start_col.to_string(),
                "end".into(),
                rect.end_row.to_string(),
                rect.end_col.to_string(),
            ],
            Request::SyncFocus { focus: Some(addr) } => vec![
                "cell".into(),
                addr.row.to_string(),
                addr.col.to_string(),
                "focus".into(),
            ],
            Request::SyncFocus { focus: None } => vec!["cell".into(), "unfocus".into()],
            Request::BulkEdit { command } => vec![
                "bulk-editor".into(),
                "apply".into(),
                command.wire_name().into(),
            ],
        }
    }

    /// Human-readable `METHOD /path` line for logs.
    pub fn describe(&self) -> String {
        format!("{} /{}", self.method(), self.path_segments().join("/"))
    }
}

// =============================================================================
// Remote session
// =============================================================================

/// Acknowledgement of a remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ack {
    /// The service confirmed the call.
    Accepted,
    /// The call was handed to a background transport; its outcome is
    /// reported by that transport.
    Queued,
}

/// Failure of a remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// Network error (connect, timeout, ...)
    Network(String),
    /// HTTP error with status code
    Http(u16, String),
    /// The background transport has shut down
    ChannelClosed,
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteError::Network(msg) => write!(f, "Network error: {}", msg),
            RemoteError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            RemoteError::ChannelClosed => write!(f, "session transport closed"),
        }
    }
}

impl std::error::Error for RemoteError {}

/// The remote document/session service as seen by the interaction engine.
pub trait RemoteSession {
    fn sync_selection(&mut self, rect: &SelectionRect) -> Result<Ack, RemoteError>;

    fn sync_focus(&mut self, focus: Option<GridAddress>) -> Result<Ack, RemoteError>;

    fn apply_bulk_edit(&mut self, command: BulkEditCommand) -> Result<Ack, RemoteError>;

    /// Dispatch a pre-built request to the matching operation.
    fn send(&mut self, request: &Request) -> Result<Ack, RemoteError> {
        match request {
            Request::SyncSelection { rect } => self.sync_selection(rect),
            Request::SyncFocus { focus } => self.sync_focus(*focus),
            Request::BulkEdit { command } => self.apply_bulk_edit(*command),
        }
    }
}

impl<R: RemoteSession + ?Sized> RemoteSession for Box<R> {
    fn sync_selection(&mut self, rect: &SelectionRect) -> Result<Ack, RemoteError> {
        (**self).sync_selection(rect)
    }

    fn sync_focus(&mut self, focus: Option<GridAddress>) -> Result<Ack, RemoteError> {
        (**self).sync_focus(focus)
    }

    fn apply_bulk_edit(&mut self, command: BulkEditCommand) -> Result<Ack, RemoteError> {
        (**self).apply_bulk_edit(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_edit_wire_names_roundtrip() {
        for cmd in BulkEditCommand::ALL {
            assert_eq!(BulkEditCommand::from_wire_name(cmd.wire_name()), Some(cmd));
        }
        assert_eq!(BulkEditCommand::from_wire_name("Sort"), None);
    }

    #[test]
    fn test_bulk_edit_serde_uses_wire_name() {
        let json = serde_json::to_string(&BulkEditCommand::InsertEndColumns).unwrap();
        assert_eq!(json, "\"Insert End Columns\"");
    }

    #[test]
    fn test_selection_path() {
        let rect = SelectionRect::new(GridAddress::row_header(1), GridAddress::row_header(4));
        let req = Request::SyncSelection { rect };
        assert_eq!(req.method(), "PUT");
        assert_eq!(req.describe(), "PUT /selection/start/1/-1/end/4/-1");
    }

    #[test]
    fn test_focus_paths() {
        let set = Request::SyncFocus { focus: Some(GridAddress::cell(5, 2)) };
        assert_eq!(set.describe(), "PUT /cell/5/2/focus");
        let clear = Request::SyncFocus { focus: None };
        assert_eq!(clear.describe(), "POST /cell/unfocus");
    }

    #[test]
    fn test_request_json_shape() {
        let req = Request::BulkEdit { command: BulkEditCommand::MoveBackward };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["type"], "bulk_edit");
        assert_eq!(json["command"], "Move Backward");
    }
}
