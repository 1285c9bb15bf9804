use gridsync_core::GridAddress;
use gridsync_protocol::RemoteError;

/// Recoverable interaction failures.
///
/// None of these is fatal. Each one leaves the component it came from in a
/// safe state (Idle / Unfocused / unchanged) and the session only logs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractError {
    /// Selection anchor and endpoint are of different address kinds.
    InvalidSelectionShape { anchor: GridAddress, candidate: GridAddress },
    /// Focus target has no cell on the surface (grid edge).
    StaleFocusTarget { row: i64, col: i64 },
    /// A remote call failed. Not retried.
    RemoteSyncFailure(RemoteError),
    /// update/finalize/cancel without a gesture in progress.
    SelectionNotActive,
    /// begin while a gesture is already in progress.
    SelectionAlreadyActive,
    /// Keyboard extension with no selection or focused cell to extend from.
    NoSelection,
    /// move_adjacent while no cell has edit focus.
    NotFocused,
}

impl std::fmt::Display for InteractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InteractError::InvalidSelectionShape { anchor, candidate } => {
                write!(f, "selection from {} cannot end at {}", anchor, candidate)
            }
            InteractError::StaleFocusTarget { row, col } => {
                write!(f, "no cell at ({}, {}) to focus", row, col)
            }
            InteractError::RemoteSyncFailure(e) => write!(f, "remote sync failed: {}", e),
            InteractError::SelectionNotActive => write!(f, "no selection gesture in progress"),
            InteractError::SelectionAlreadyActive => write!(f, "selection gesture already in progress"),
            InteractError::NoSelection => write!(f, "nothing selected"),
            InteractError::NotFocused => write!(f, "no cell has edit focus"),
        }
    }
}

impl std::error::Error for InteractError {}

impl From<RemoteError> for InteractError {
    fn from(e: RemoteError) -> Self {
        InteractError::RemoteSyncFailure(e)
    }
}
