//! Console reporting of each tick

pub mod console;

pub use console::{render_tick, CLEAR_SCREEN};
