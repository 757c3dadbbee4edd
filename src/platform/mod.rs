//! Platform Abstraction Layer for the idle reaper
//!
//! The platform layer uses conditional compilation to select the window
//! inspector at build time:
//!
//! ```text
//! src/platform/
//! +-- mod.rs           <- This file (module definitions, factory)
//! +-- traits.rs        <- WindowInspector / ProcessTerminator + snapshot types
//! +-- process.rs       <- PID -> name lookup, forced termination
//! +-- win32.rs         <- EnumWindows / IsIconic (cfg(windows))
//! +-- x11.rs           <- wmctrl / xprop (cfg(unix))
//! ```
//!
//! # Platform Support
//!
//! | Feature | Windows | Unix (X11) |
//! |---------|---------|------------|
//! | Minimized window enumeration | EnumWindows + IsIconic | wmctrl + xprop |
//! | Name resolution | sysinfo | sysinfo |
//! | Termination | TerminateProcess | SIGKILL |

pub mod process;
pub mod traits;

#[cfg(windows)]
pub mod win32;

#[cfg(unix)]
pub mod x11;

pub use process::{ProcessNames, SystemTerminator};
pub use traits::{
    MinimizedProcess, PlatformError, PlatformResult, ProcessTerminator, TerminateError,
    WindowInspector, WindowSnapshot,
};

/// Platform-specific window inspector type alias for Windows.
#[cfg(windows)]
pub type PlatformInspector = win32::Win32Inspector;

/// Platform-specific window inspector type alias for Unix desktops.
#[cfg(unix)]
pub type PlatformInspector = x11::X11Inspector;

#[cfg(not(any(windows, unix)))]
compile_error!("idle-reaper supports Windows and X11 (Unix) desktops only.");

/// Create the window inspector for the current platform.
pub fn create_inspector() -> PlatformInspector {
    PlatformInspector::new()
}

/// Returns the current platform name
pub fn platform_name() -> &'static str {
    #[cfg(windows)]
    {
        "windows"
    }

    #[cfg(unix)]
    {
        "x11"
    }

    #[cfg(not(any(windows, unix)))]
    {
        "unsupported"
    }
}
