//! Configuration and constants for the evaluator.

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Synthetic function that collects cycles spent polling the Keccak core
pub const SHAKE_FUNCTION: &str = "SHAKE";

/// Entry point of every benchmark binary
pub const MAIN_FUNCTION: &str = "main";

// Status-register read. The trace charges it to the caller, but control
// belongs to the hashing subroutine while it spins on the Keccak status.
pub const STATUS_REGISTER_READ: &str = "bn.wsrr";

/// Callees starting with this prefix are helper symbols, not attributed functions
pub const INTERNAL_SYMBOL_PREFIX: &str = "_";

/// Pseudo-functions that always get a call count of one per iteration
pub const SYNTHETIC_CALLEES: &[&str] = &[SHAKE_FUNCTION, MAIN_FUNCTION];

/// Default text report written by the `evaluate` command
pub const DEFAULT_OUTPUT_FILE: &str = "eval_result.txt";
