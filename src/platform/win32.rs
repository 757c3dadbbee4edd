//! Windows window inspection
//!
//! Enumerates top-level windows with `EnumWindows`, keeps the iconic ones and
//! maps them to their owning process with `GetWindowThreadProcessId`.

#![cfg(windows)]

use ::windows::Win32::Foundation::{BOOL, HWND, LPARAM, TRUE};
use ::windows::Win32::UI::WindowsAndMessaging::{EnumWindows, GetWindowThreadProcessId, IsIconic};

use super::process::ProcessNames;
use super::traits::{PlatformError, PlatformResult, WindowInspector, WindowSnapshot};
use crate::core::exclusions::ExclusionSet;

/// `EnumWindows` callback: `lparam` points at the `Vec<u32>` collecting
/// owner PIDs of minimized windows.
unsafe extern "system" fn collect_minimized(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let pids = &mut *(lparam.0 as *mut Vec<u32>);

    if IsIconic(hwnd).as_bool() {
        let mut pid = 0u32;
        GetWindowThreadProcessId(hwnd, Some(&mut pid));
        if pid != 0 {
            pids.push(pid);
        }
    }

    // Keep enumerating
    TRUE
}

/// Owner PIDs of every minimized top-level window, in Z order.
fn minimized_window_pids() -> PlatformResult<Vec<u32>> {
    let mut pids: Vec<u32> = Vec::new();

    unsafe {
        EnumWindows(
            Some(collect_minimized),
            LPARAM(&mut pids as *mut Vec<u32> as isize),
        )
    }
    .map_err(|e| PlatformError::SystemError {
        code: e.code().0,
        message: e.to_string(),
    })?;

    Ok(pids)
}

/// Window inspector for the interactive Windows desktop.
pub struct Win32Inspector {
    names: ProcessNames,
}

impl Win32Inspector {
    pub fn new() -> Self {
        Self {
            names: ProcessNames::new(),
        }
    }
}

impl Default for Win32Inspector {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowInspector for Win32Inspector {
    fn snapshot_minimized(&mut self, exclusions: &ExclusionSet) -> PlatformResult<WindowSnapshot> {
        let pids = minimized_window_pids()?;
        self.names.refresh();

        let names = &self.names;
        Ok(WindowSnapshot::from_minimized_pids(
            pids,
            |pid| names.name_of(pid),
            exclusions,
        ))
    }
}
