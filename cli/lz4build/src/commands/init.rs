//! `lz4build init`: write a starter manifest.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::manifest::{Lz4buildManifest, MANIFEST_FILE};

/// Write `lz4build.toml` into `dir`. The project name defaults to the
/// directory name.
pub fn run(dir: &Path, name: Option<&str>) -> Result<()> {
    let path = dir.join(MANIFEST_FILE);
    if path.exists() {
        bail!("{} already exists", path.display());
    }

    let name = match name {
        Some(n) => n.to_string(),
        None => dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "lz4".to_string()),
    };
    let content = Lz4buildManifest::template(&name)?;
    fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;

    println!("Created {}", path.display());
    println!("  Point [source] path at an LZ4 checkout, then run `lz4build plan`.");
    Ok(())
}
