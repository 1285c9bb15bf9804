//! CLI Exit Code Registry
//!
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Description                                      |
//! |------|--------------------------------------------------|
//! | 0    | Success                                          |
//! | 1    | Runtime error (remote unreachable, bad endpoint) |
//! | 2    | Usage error (bad args, unreadable/invalid file)  |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Runtime error - the command started but could not complete.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing or malformed input file.
pub const EXIT_USAGE: u8 = 2;
