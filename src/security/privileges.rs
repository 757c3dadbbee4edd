//! Privilege detection

use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub enum PrivilegeLevel {
    /// Standard user - can only terminate processes of the same user
    Standard,
    /// Administrator / root - can terminate other users' processes
    Elevated,
}

pub struct PrivilegeManager {
    level: PrivilegeLevel,
}

impl PrivilegeManager {
    pub fn new() -> Self {
        let level = Self::detect_level();
        info!("Running with privilege level: {:?}", level);
        Self { level }
    }

    fn detect_level() -> PrivilegeLevel {
        if is_elevated() {
            PrivilegeLevel::Elevated
        } else {
            PrivilegeLevel::Standard
        }
    }

    pub fn can_terminate_foreign_processes(&self) -> bool {
        matches!(self.level, PrivilegeLevel::Elevated)
    }
}

#[cfg(windows)]
fn is_elevated() -> bool {
    std::process::Command::new("net")
        .args(["session"])
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[cfg(unix)]
fn is_elevated() -> bool {
    // SAFETY: geteuid() has no preconditions and cannot fail
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(any(windows, unix)))]
fn is_elevated() -> bool {
    false
}

impl Default for PrivilegeManager {
    fn default() -> Self { Self::new() }
}
