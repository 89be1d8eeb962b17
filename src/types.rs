//! Newtype wrappers and type aliases for domain concepts.
//!
//! Identifiers and priority levels are newtypes so a process id can never be
//! confused with a tick count or a queue level. Plain quantities on the
//! synthetic clock are aliases.

use std::fmt;

use serde::Serialize;

/// Process identifier. Equal to the process's creation index, so it also
/// indexes the simulator's process collection directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub struct Pid(pub usize);

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// An instant on the synthetic tick clock.
pub type Tick = u64;

/// A duration measured in ticks.
pub type Ticks = u64;

/// MLFQ priority level. Higher is better; new and I/O-returning processes
/// enter at [`Priority::TOP`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Priority(pub u8);

impl Priority {
    pub const TOP: Priority = Priority(2);
    pub const BOTTOM: Priority = Priority(0);

    /// Number of distinct levels.
    pub const LEVELS: usize = 3;

    /// The next lower level, or `None` at the bottom.
    pub fn lower(self) -> Option<Priority> {
        if self > Self::BOTTOM {
            Some(Priority(self.0 - 1))
        } else {
            None
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::TOP
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
