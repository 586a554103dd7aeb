//! `lz4build macros`: print or write the freestanding memory-primitive header.

use std::path::Path;

use anyhow::{Context, Result};
use lz4build_plan::synthesize;

pub fn run(output: Option<&Path>) -> Result<()> {
    let header = synthesize().to_header();
    match output {
        Some(path) => {
            std::fs::write(path, &header)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => print!("{header}"),
    }
    Ok(())
}
