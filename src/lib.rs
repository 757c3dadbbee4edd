//! Idle Reaper
//!
//! Watches the desktop for minimized windows and terminates the owning
//! process once it has stayed minimized longer than a configured limit.
//!
//! ## Features
//!
//! - **Idle Accounting**: per-process timers with a two-tick grace period
//! - **Exclusions**: baseline list of shell/helper processes plus user names
//! - **Startup Form**: one-shot console form for exclusions and the limit
//! - **Platforms**: Win32 (`EnumWindows`/`IsIconic`) and X11 (`wmctrl`/`xprop`)
//!
//! ## Safety
//!
//! - Excluded processes are filtered before accounting and again inside it
//! - The reaper never terminates itself or OS-reserved PIDs
//! - Dry-run mode for testing

pub mod core;
pub mod monitor;
pub mod platform;
pub mod security;
pub mod startup;

// Re-exports
pub use self::core::accounting::{IdleAccounting, KillRequest, TickOutcome};
pub use self::core::config::{ConfigError, ReaperConfig};
pub use self::core::exclusions::ExclusionSet;
pub use self::core::reaper::{IdleReaper, ReaperStats, TerminationOutcome, TickReport};
pub use platform::{
    create_inspector, PlatformError, PlatformInspector, ProcessTerminator, SystemTerminator,
    TerminateError, WindowInspector, WindowSnapshot,
};
pub use security::privileges::PrivilegeManager;
pub use startup::{ConfigProvider, ConsoleForm, StartupConfig};
