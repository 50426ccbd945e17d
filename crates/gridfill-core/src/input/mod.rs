//! Input events and their dispatch onto a sheet.

mod actions;

pub use actions::{Action, ActionOutcome, Key, apply_action};
