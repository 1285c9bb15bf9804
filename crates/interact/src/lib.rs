//! Interaction engine for a grid editing surface.
//!
//! Pointer drags, keyboard input and single-cell edit focus are handled
//! locally and immediately; the resulting state reaches the remote session
//! service through latest-wins coalescers.

pub mod clock;
pub mod coalesce;
pub mod error;
pub mod focus;
pub mod input;
pub mod memory;
pub mod remote;
pub mod selection;
pub mod session;
pub mod surface;

pub use clock::{Clock, ManualClock, RealClock};
pub use coalesce::{Coalescer, CoalescerStats};
pub use error::InteractError;
pub use focus::{FocusController, FocusState};
pub use input::{
    focus_context, Action, FieldKind, FocusContext, InputDispatcher, Key, KeyEvent, Modifiers,
};
pub use memory::{MemorySurface, StyleChange, ViewState};
pub use remote::RecordingSession;
pub use selection::SelectionTracker;
pub use session::{GridSession, SessionConfig, SessionStats};
pub use surface::{ActiveElement, Direction, Highlight, Panel, Surface, UiAction, Vertical};
