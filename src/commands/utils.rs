use crate::utils::config::SCHEMA_VERSION;

/// Display version information
pub fn display_version() {
    println!("Dilithium Bench Eval v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Cycle attribution and statistics for Dilithium benchmark traces.");
}
