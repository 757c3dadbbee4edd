//! One-shot startup configuration

pub mod form;

pub use form::{ConfigProvider, ConsoleForm, StartupConfig};
