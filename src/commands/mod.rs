//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod evaluate;
pub mod groups;
pub mod utils;

// Re-export main command functions
pub use evaluate::{execute_evaluate, validate_args, BatchSummary, EvaluateArgs};
pub use groups::display_groups;
pub use utils::display_version;
