//! Process name resolution and forced termination

use std::ffi::OsStr;
use std::path::Path;
use sysinfo::{Pid, Process, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};
use tracing::debug;

use super::traits::{ProcessTerminator, TerminateError};
use crate::security::validator::validate_target_pid;

/// PID -> process name lookup backed by a sysinfo process table.
///
/// Call [`ProcessNames::refresh`] once per inspection pass; lookups after
/// that are served from the table.
pub struct ProcessNames {
    system: System,
}

impl ProcessNames {
    pub fn new() -> Self {
        Self { system: System::new() }
    }

    pub fn refresh(&mut self) {
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::new()
                .with_exe(UpdateKind::OnlyIfNotSet)
                .with_cmd(UpdateKind::OnlyIfNotSet),
        );
    }

    /// Name of `pid`, or `None` if it is not in the table (exited).
    pub fn name_of(&self, pid: u32) -> Option<String> {
        self.system.process(Pid::from_u32(pid)).map(process_name)
    }
}

/// Longest kernel `comm` on Linux; longer names are cut to this many bytes.
const COMM_LEN: usize = 15;

fn process_name(process: &Process) -> String {
    full_name(
        &process.name().to_string_lossy(),
        process.exe(),
        process.cmd().first().map(|arg| arg.as_os_str()),
    )
}

/// Undo `comm` truncation using the executable path or `argv[0]`.
///
/// The longer name is only taken when `comm` is a truncated prefix of it, so
/// interpreters and symlinked binaries keep the name the OS reports.
fn full_name(comm: &str, exe: Option<&Path>, argv0: Option<&OsStr>) -> String {
    if comm.len() < COMM_LEN {
        return comm.to_string();
    }

    let exe_name = exe.and_then(Path::file_name);
    let argv0_name = argv0.and_then(|arg| Path::new(arg).file_name());
    [exe_name, argv0_name]
        .into_iter()
        .flatten()
        .map(|name| name.to_string_lossy())
        .find(|name| name.len() > comm.len() && name.starts_with(comm))
        .map(|name| name.into_owned())
        .unwrap_or_else(|| comm.to_string())
}

impl Default for ProcessNames {
    fn default() -> Self {
        Self::new()
    }
}

/// Terminator that force-kills through the OS (SIGKILL / TerminateProcess).
#[derive(Debug, Default)]
pub struct SystemTerminator;

impl SystemTerminator {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessTerminator for SystemTerminator {
    fn terminate(&mut self, pid: u32) -> Result<(), TerminateError> {
        validate_target_pid(pid).map_err(|reason| TerminateError::Refused { pid, reason })?;
        debug!("Force-killing process {}", pid);
        force_kill(pid)
    }
}

#[cfg(unix)]
fn force_kill(pid: u32) -> Result<(), TerminateError> {
    // SAFETY: kill() is safe to call with any pid and signal,
    // it will return an error if invalid
    let result = unsafe { libc::kill(pid as libc::pid_t, libc::SIGKILL) };

    if result == 0 {
        Ok(())
    } else {
        let errno = std::io::Error::last_os_error();
        match errno.raw_os_error() {
            Some(libc::ESRCH) => Err(TerminateError::NotFound(pid)),
            Some(libc::EPERM) => Err(TerminateError::PermissionDenied(pid)),
            code => Err(TerminateError::SystemError {
                pid,
                code: code.unwrap_or(-1),
                message: errno.to_string(),
            }),
        }
    }
}

#[cfg(windows)]
fn force_kill(pid: u32) -> Result<(), TerminateError> {
    use ::windows::Win32::Foundation::{CloseHandle, ERROR_ACCESS_DENIED, ERROR_INVALID_PARAMETER};
    use ::windows::Win32::System::Threading::{OpenProcess, TerminateProcess, PROCESS_TERMINATE};

    let map_err = |e: ::windows::core::Error| {
        let code = e.code();
        if code == ERROR_INVALID_PARAMETER.to_hresult() {
            // OpenProcess reports a PID that no longer exists this way
            TerminateError::NotFound(pid)
        } else if code == ERROR_ACCESS_DENIED.to_hresult() {
            TerminateError::PermissionDenied(pid)
        } else {
            TerminateError::SystemError {
                pid,
                code: code.0,
                message: e.to_string(),
            }
        }
    };

    unsafe {
        let handle = OpenProcess(PROCESS_TERMINATE, false, pid).map_err(map_err)?;
        let result = TerminateProcess(handle, 1).map_err(map_err);
        let _ = CloseHandle(handle);
        result
    }
}

#[cfg(not(any(unix, windows)))]
fn force_kill(pid: u32) -> Result<(), TerminateError> {
    Err(TerminateError::Refused {
        pid,
        reason: "process termination is not supported on this platform".into(),
    })
}
