#![forbid(unsafe_code)]

//! Bounded buffer of dispatch log lines awaiting `takeLogs()`.

use std::collections::VecDeque;

/// Lines kept when the page never drains the log.
pub const DEFAULT_LOG_CAPACITY: usize = 256;

/// Ring of log lines; the oldest line is evicted once full.
#[derive(Debug, Clone)]
pub struct DispatchLog {
    lines: VecDeque<String>,
    capacity: usize,
    evicted: u64,
}

impl Default for DispatchLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl DispatchLog {
    /// `capacity` is clamped to at least one line.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
            evicted: 0,
        }
    }

    pub fn push(&mut self, line: String) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
            self.evicted = self.evicted.saturating_add(1);
        }
        self.lines.push_back(line);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines dropped since the last drain.
    #[must_use]
    pub const fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Take every buffered line, oldest first. When lines were evicted, the
    /// first entry says how many.
    pub fn drain(&mut self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.lines.len() + 1);
        if self.evicted > 0 {
            out.push(format!("drag log evicted={}", self.evicted));
            self.evicted = 0;
        }
        out.extend(self.lines.drain(..));
        out
    }
}
