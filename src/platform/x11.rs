//! X11 window inspection through `wmctrl` and `xprop`
//!
//! `wmctrl -lp` lists managed top-level windows with their owner PID;
//! a window counts as minimized when `xprop` reports `_NET_WM_STATE_HIDDEN`
//! in its `_NET_WM_STATE`. Both tools ship with every mainstream X11 desktop
//! and work under XWayland for X11 clients.

#![cfg(unix)]

use std::io;
use std::process::Command;
use tracing::debug;

use super::process::ProcessNames;
use super::traits::{PlatformError, PlatformResult, WindowInspector, WindowSnapshot};
use crate::core::exclusions::ExclusionSet;

/// Atom set on iconified windows by EWMH-compliant window managers
const HIDDEN_ATOM: &str = "_NET_WM_STATE_HIDDEN";

/// Managed window from `wmctrl -lp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedWindow {
    pub id: String,
    pub pid: u32,
}

/// Parse `wmctrl -lp` output.
///
/// Columns: window id, desktop, pid, host, title. Windows whose PID is
/// unknown (reported as 0) are dropped.
pub fn parse_wmctrl_listing(output: &str) -> Vec<ManagedWindow> {
    output
        .lines()
        .filter_map(|line| {
            let mut cols = line.split_whitespace();
            let id = cols.next()?;
            let _desktop = cols.next()?;
            let pid: u32 = cols.next()?.parse().ok()?;
            if !id.starts_with("0x") || pid == 0 {
                return None;
            }
            Some(ManagedWindow { id: id.to_string(), pid })
        })
        .collect()
}

/// Whether `xprop -id <w> _NET_WM_STATE` output marks the window minimized.
pub fn is_hidden_state(xprop_output: &str) -> bool {
    xprop_output
        .split_once('=')
        .map(|(_, atoms)| atoms.split(',').any(|atom| atom.trim() == HIDDEN_ATOM))
        .unwrap_or(false)
}

fn run(program: &str, args: &[&str]) -> PlatformResult<String> {
    let output = Command::new(program).args(args).output().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            PlatformError::NotSupported(format!("{} is not installed", program))
        } else {
            PlatformError::CommandFailed {
                command: program.to_string(),
                message: e.to_string(),
            }
        }
    })?;

    if !output.status.success() {
        return Err(PlatformError::CommandFailed {
            command: format!("{} {}", program, args.join(" ")),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Owner PIDs of hidden windows, querying tools through `run`.
///
/// A missing tool fails the whole pass. A failed `xprop` on a single window
/// (usually one that closed after the listing) only skips that window, unless
/// every window failed.
fn collect_minimized_pids<R>(mut run: R) -> PlatformResult<Vec<u32>>
where
    R: FnMut(&str, &[&str]) -> PlatformResult<String>,
{
    let listing = run("wmctrl", &["-lp"])?;
    let windows = parse_wmctrl_listing(&listing);

    let mut pids = Vec::new();
    let mut last_failure = None;
    let mut failures = 0;
    for window in &windows {
        match run("xprop", &["-id", window.id.as_str(), "_NET_WM_STATE"]) {
            Ok(state) if is_hidden_state(&state) => pids.push(window.pid),
            Ok(_) => {}
            Err(e @ PlatformError::NotSupported(_)) => return Err(e),
            Err(e) => {
                debug!("Skipping window {}: {}", window.id, e);
                failures += 1;
                last_failure = Some(e);
            }
        }
    }

    match last_failure {
        Some(e) if failures == windows.len() => Err(e),
        _ => Ok(pids),
    }
}

/// Window inspector for X11 sessions.
pub struct X11Inspector {
    names: ProcessNames,
}

impl X11Inspector {
    pub fn new() -> Self {
        Self {
            names: ProcessNames::new(),
        }
    }
}

impl Default for X11Inspector {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowInspector for X11Inspector {
    fn snapshot_minimized(&mut self, exclusions: &ExclusionSet) -> PlatformResult<WindowSnapshot> {
        let pids = collect_minimized_pids(run)?;
        self.names.refresh();

        let names = &self.names;
        Ok(WindowSnapshot::from_minimized_pids(
            pids,
            |pid| names.name_of(pid),
            exclusions,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wmctrl_listing() {
        let output = "\
0x01e00003  0 1823   laptop Terminal
0x03a00007  0 20411  laptop notes.txt - Mousepad
0x04200001 -1 0      laptop xfce4-panel
garbage line
";
        assert_eq!(
            parse_wmctrl_listing(output),
            vec![
                ManagedWindow { id: "0x01e00003".into(), pid: 1823 },
                ManagedWindow { id: "0x03a00007".into(), pid: 20411 },
            ]
        );
    }

    #[test]
    fn test_hidden_state() {
        assert!(is_hidden_state(
            "_NET_WM_STATE(ATOM) = _NET_WM_STATE_HIDDEN, _NET_WM_STATE_SKIP_PAGER"
        ));
        assert!(is_hidden_state("_NET_WM_STATE(ATOM) = _NET_WM_STATE_HIDDEN\n"));
        assert!(!is_hidden_state(
            "_NET_WM_STATE(ATOM) = _NET_WM_STATE_MAXIMIZED_VERT, _NET_WM_STATE_MAXIMIZED_HORZ"
        ));
        assert!(!is_hidden_state("_NET_WM_STATE:  not found."));
        assert!(!is_hidden_state(""));
    }

    const LISTING: &str = "\
0x01e00003  0 1823   laptop Terminal
0x03a00007  0 20411  laptop notes.txt - Mousepad
";

    fn failed(command: &str) -> PlatformError {
        PlatformError::CommandFailed {
            command: command.to_string(),
            message: "BadWindow".into(),
        }
    }

    #[test]
    fn test_collects_hidden_window_owners() {
        let pids = collect_minimized_pids(|program, args| match (program, args.get(1)) {
            ("wmctrl", _) => Ok(LISTING.to_string()),
            ("xprop", Some(&"0x03a00007")) => {
                Ok("_NET_WM_STATE(ATOM) = _NET_WM_STATE_HIDDEN".to_string())
            }
            _ => Ok("_NET_WM_STATE(ATOM) = ".to_string()),
        })
        .unwrap();
        assert_eq!(pids, vec![20411]);
    }

    #[test]
    fn test_missing_xprop_fails_the_pass() {
        let result = collect_minimized_pids(|program, _| match program {
            "wmctrl" => Ok(LISTING.to_string()),
            other => Err(PlatformError::NotSupported(format!("{} is not installed", other))),
        });
        assert!(matches!(result, Err(PlatformError::NotSupported(_))));
    }

    #[test]
    fn test_vanished_window_is_skipped() {
        let pids = collect_minimized_pids(|program, args| match (program, args.get(1)) {
            ("wmctrl", _) => Ok(LISTING.to_string()),
            ("xprop", Some(&"0x01e00003")) => Err(failed("xprop")),
            _ => Ok("_NET_WM_STATE(ATOM) = _NET_WM_STATE_HIDDEN".to_string()),
        })
        .unwrap();
        assert_eq!(pids, vec![20411]);
    }

    #[test]
    fn test_every_query_failing_fails_the_pass() {
        let result = collect_minimized_pids(|program, _| match program {
            "wmctrl" => Ok(LISTING.to_string()),
            other => Err(failed(other)),
        });
        assert!(matches!(result, Err(PlatformError::CommandFailed { .. })));
    }

    #[test]
    fn test_empty_desktop_is_not_a_failure() {
        let pids = collect_minimized_pids(|_, _| Ok(String::new())).unwrap();
        assert!(pids.is_empty());
    }

    #[test]
    fn test_missing_tool_is_not_supported() {
        let err = run("idle-reaper-no-such-tool", &[]).unwrap_err();
        assert!(matches!(err, PlatformError::NotSupported(_)));
    }
}
