//! Source locations.
//!
//! A `Span` carries byte offsets for range queries (tooling, position maps)
//! and the 1-based line / 0-based column of its start, which is what
//! diagnostics print and what anonymous binding keys are derived from.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: u32,
    /// End byte offset (exclusive)
    pub end: u32,
    /// Line of `start`, 1-based
    #[serde(default)]
    pub line: u32,
    /// Column of `start`, 0-based
    #[serde(default)]
    pub column: u32,
}

impl Span {
    pub const fn new(start: u32, end: u32, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Span used for synthesized entities (predefined bindings).
    pub const fn dummy() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub const fn is_dummy(&self) -> bool {
        self.start == 0 && self.end == 0 && self.line == 0
    }

    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the byte `offset` falls inside this span.
    pub const fn contains(&self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
