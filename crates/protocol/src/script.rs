//! Replay script format: JSON lines, one event per line.
//!
//! ```text
//! // drag a 3x3 selection, then focus a cell and move down
//! {"type":"pointer_down","row":2,"col":3}
//! {"type":"pointer_move","row":4,"col":5}
//! {"type":"pointer_up","row":4,"col":5}
//! {"type":"wait","ms":50}
//! {"type":"click","row":5,"col":2}
//! {"type":"key","key":"Enter"}
//! ```

use serde::{Deserialize, Serialize};

/// A keyboard event as recorded in a script. `key` uses DOM key names
/// (`"Enter"`, `"ArrowUp"`, `"a"`, `"Delete"`...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyStroke {
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

/// One scripted input event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    PointerDown { row: i64, col: i64 },
    PointerMove { row: i64, col: i64 },
    PointerUp { row: i64, col: i64 },
    PointerCancel,
    /// Give a cell edit focus (a click into its input).
    Click { row: i64, col: i64 },
    Key(KeyStroke),
    /// Advance time; lets coalescers tick.
    Wait { ms: u64 },
}

/// A script line that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptError {
    /// 1-based line number.
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ScriptError {}

/// Parse a whole script. Blank lines and `//` comment lines are skipped.
pub fn parse_script(text: &str) -> Result<Vec<ScriptEvent>, ScriptError> {
    let mut events = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        let event = serde_json::from_str(line).map_err(|e| ScriptError {
            line: idx + 1,
            message: e.to_string(),
        })?;
        events.push(event);
    }
    Ok(events)
}
