//! Groups command: show the active classification.

use super::evaluate::resolve_classification;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Print the classification, or its TOML form with `export`
pub fn display_groups(groups: Option<PathBuf>, export: bool) -> Result<()> {
    let classification = resolve_classification(groups.as_ref())?;

    if export {
        let toml = classification
            .to_toml_string()
            .context("Failed to serialize classification")?;
        print!("{}", toml);
        return Ok(());
    }

    match &groups {
        Some(path) => println!("Classification: {}", path.display()),
        None => println!("Classification: built-in (Dilithium)"),
    }
    println!();

    for (name, spec) in classification.groups() {
        match &spec.color {
            Some(color) => println!("{} [{}]", name, color),
            None => println!("{}", name),
        }
        for function in &spec.functions {
            println!("  {}", function);
        }
    }

    Ok(())
}
