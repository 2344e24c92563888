//! Newest-first stream of user-visible status lines.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warn,
    Error,
    Detail,
}

impl Severity {
    pub fn tag(self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Success => "SUCCESS",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Detail => "DETAIL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLine {
    pub severity: Severity,
    pub text: String,
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity.tag(), self.text)
    }
}

#[derive(Debug, Clone)]
pub struct StatusLog {
    lines: VecDeque<StatusLine>,
    capacity: usize,
}

impl StatusLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Prepend a line, dropping the oldest once over capacity.
    pub fn push(&mut self, severity: Severity, text: impl Into<String>) {
        self.lines.push_front(StatusLine {
            severity,
            text: text.into(),
        });
        self.lines.truncate(self.capacity);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Most recent line.
    pub fn latest(&self) -> Option<&StatusLine> {
        self.lines.front()
    }

    /// Lines newest first.
    pub fn lines(&self) -> impl Iterator<Item = &StatusLine> {
        self.lines.iter()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.lines.iter().any(|l| l.text == text)
    }
}

impl Default for StatusLog {
    fn default() -> Self {
        Self::new(200)
    }
}
