//! Platform abstraction traits for window inspection and process termination
//!
//! The idle accounting core only sees these seams:
//!
//! ```text
//! +----------------------+        +--------------------+
//! |   WindowInspector    |  --->  |   IdleAccounting   |
//! +----------------------+        +--------------------+
//!                                           |
//!                                 +--------------------+
//!                                 | ProcessTerminator  |
//!                                 +--------------------+
//! ```
//!
//! Each target platform implements them behind conditional compilation.

use std::fmt;
use tracing::debug;

use crate::core::exclusions::ExclusionSet;

// ============================================================================
// Error Types
// ============================================================================

/// Failure of a whole inspection pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// No window system back end is usable here
    NotSupported(String),
    /// A helper command could not be run or exited with an error
    CommandFailed { command: String, message: String },
    /// OS call failed
    SystemError { code: i32, message: String },
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::NotSupported(msg) => write!(f, "Not supported: {}", msg),
            PlatformError::CommandFailed { command, message } => {
                write!(f, "Command '{}' failed: {}", command, message)
            }
            PlatformError::SystemError { code, message } => {
                write!(f, "System error ({}): {}", code, message)
            }
        }
    }
}

impl std::error::Error for PlatformError {}

/// Result type alias for inspection passes.
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Failure to terminate one target process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminateError {
    /// Process already exited
    NotFound(u32),
    /// Process belongs to someone we may not kill
    PermissionDenied(u32),
    /// Target rejected before any OS call (PID 0, our own PID, ...)
    Refused { pid: u32, reason: String },
    /// Any other OS failure
    SystemError { pid: u32, code: i32, message: String },
}

impl TerminateError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, TerminateError::NotFound(_))
    }
}

impl fmt::Display for TerminateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminateError::NotFound(pid) => write!(f, "Process {} not found", pid),
            TerminateError::PermissionDenied(pid) => {
                write!(f, "Permission denied terminating process {}", pid)
            }
            TerminateError::Refused { pid, reason } => {
                write!(f, "Refusing to terminate process {}: {}", pid, reason)
            }
            TerminateError::SystemError { pid, code, message } => {
                write!(f, "Terminating process {} failed ({}): {}", pid, code, message)
            }
        }
    }
}

impl std::error::Error for TerminateError {}

// ============================================================================
// Snapshot Types
// ============================================================================

/// Owner of at least one minimized window in one inspection pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MinimizedProcess {
    pub name: String,
    pub pid: u32,
}

/// Result of one inspection pass: deduplicated `(name, pid)` pairs in the
/// order they were first seen. Excluded names never make it in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowSnapshot {
    entries: Vec<MinimizedProcess>,
}

impl WindowSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from the owner PIDs of minimized windows.
    ///
    /// `resolve` maps a PID to its process name; `None` means the process
    /// exited between enumeration and lookup, and that window is skipped.
    pub fn from_minimized_pids<I, F>(pids: I, mut resolve: F, exclusions: &ExclusionSet) -> Self
    where
        I: IntoIterator<Item = u32>,
        F: FnMut(u32) -> Option<String>,
    {
        let mut snapshot = Self::new();
        for pid in pids {
            let Some(name) = resolve(pid) else {
                debug!("Owner {} of a minimized window is gone, skipping", pid);
                continue;
            };
            if exclusions.contains(&name) {
                continue;
            }
            snapshot.push(name, pid);
        }
        snapshot
    }

    /// Add an entry unless the same `(name, pid)` pair is already present.
    pub fn push(&mut self, name: impl Into<String>, pid: u32) {
        let entry = MinimizedProcess { name: name.into(), pid };
        if !self.entries.contains(&entry) {
            self.entries.push(entry);
        }
    }

    pub fn entries(&self) -> &[MinimizedProcess] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Enumerates minimized windows and resolves their owning processes.
pub trait WindowInspector {
    /// Take one snapshot. Per-window lookup failures are skipped inside;
    /// an `Err` means the whole pass could not run.
    fn snapshot_minimized(&mut self, exclusions: &ExclusionSet) -> PlatformResult<WindowSnapshot>;
}

/// Force-terminates a process by PID.
pub trait ProcessTerminator {
    fn terminate(&mut self, pid: u32) -> Result<(), TerminateError>;
}
