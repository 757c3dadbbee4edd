//! Termination target validation

/// Validate process ID is reasonable
pub fn validate_pid(pid: u32) -> bool {
    pid > 0 && pid < 0xFFFFFFFF
}

/// PIDs that belong to the OS itself and must never be signalled.
fn is_system_pid(pid: u32) -> bool {
    #[cfg(windows)]
    {
        // System Idle Process and System
        pid == 0 || pid == 4
    }

    #[cfg(not(windows))]
    {
        // init / kthreadd
        pid == 1 || pid == 2
    }
}

/// Check that `pid` may be handed to the terminator.
///
/// Rejects out-of-range PIDs, OS-reserved PIDs and the reaper's own PID.
pub fn validate_target_pid(pid: u32) -> Result<(), String> {
    if !validate_pid(pid) {
        return Err(format!("invalid pid {}", pid));
    }
    if is_system_pid(pid) {
        return Err("system process".into());
    }
    if pid == std::process::id() {
        return Err("this is the reaper itself".into());
    }
    Ok(())
}
