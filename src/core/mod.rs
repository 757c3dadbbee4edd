//! Core reaper logic

pub mod accounting;
pub mod config;
pub mod exclusions;
pub mod reaper;
