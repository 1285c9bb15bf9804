//! Core grid types shared by the interaction engine, the wire protocol and
//! the CLI. No I/O, no rendering, no clocks.

pub mod address;
pub mod diff;
pub mod selection;

pub use address::{
    classify, element_id, input_element_id, is_compatible, parse_element_id, AddressKind,
    GridAddress, HEADER,
};
pub use diff::{covered, diff, RectDiff};
pub use selection::{EffectiveRect, GridBounds, SelectionRect};
