//! CLI command handlers.

pub mod check;
pub mod info;
pub mod rules;

pub use check::{CheckCommandInput, run_check};
pub use info::run_info;
pub use rules::run_rules;
