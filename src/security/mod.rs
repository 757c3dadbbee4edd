//! Privilege detection and termination target checks

pub mod privileges;
pub mod validator;

pub use privileges::{PrivilegeLevel, PrivilegeManager};
pub use validator::validate_target_pid;
