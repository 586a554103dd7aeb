//! `lz4build doctor`: toolchain and project diagnostics.

use std::path::Path;

use anyhow::Result;
use lz4build_toolchain::{probe, SourceTree};

use crate::manifest::{Lz4buildManifest, MANIFEST_FILE};

/// Print diagnostic information about the toolchain and project.
pub fn run(project_dir: &Path, source: Option<&Path>) -> Result<()> {
    print!("{}", report(project_dir, source));
    Ok(())
}

pub(crate) fn report(project_dir: &Path, source: Option<&Path>) -> String {
    let mut out = String::new();
    out.push_str("=== lz4build Doctor ===\n\n");
    out.push_str(&format!("lz4build version: {}\n\n", env!("CARGO_PKG_VERSION")));

    let loaded = Lz4buildManifest::find_and_load(project_dir);

    out.push_str("--- Project Status ---\n");
    let (manifest, manifest_dir) = match loaded {
        Ok(Some((manifest, dir))) => {
            out.push_str(&format!("  {MANIFEST_FILE}: found at {}\n", dir.display()));
            out.push_str(&format!("  Project: {}\n", manifest.project.name));
            (Some(manifest), dir)
        }
        Ok(None) => {
            out.push_str(&format!("  {MANIFEST_FILE}: not found\n"));
            (None, project_dir.to_path_buf())
        }
        Err(e) => {
            out.push_str(&format!("  {MANIFEST_FILE}: error: {e:#}\n"));
            (None, project_dir.to_path_buf())
        }
    };
    out.push('\n');

    let toolchain = manifest
        .as_ref()
        .map(|m| m.toolchain.clone())
        .unwrap_or_default();
    out.push_str("--- System Tools ---\n");
    for program in [&toolchain.cc, &toolchain.ar] {
        let status = probe(program).unwrap_or_else(|| "not found".to_string());
        out.push_str(&format!("  {program}: {status}\n"));
    }
    out.push_str(&format!("  Compiler family: {}\n", toolchain.family()));
    out.push('\n');

    out.push_str("--- Source Tree ---\n");
    let source = source
        .map(Path::to_path_buf)
        .or_else(|| manifest.as_ref().and_then(|m| m.source_dir(&manifest_dir)));
    match source {
        None => out.push_str("  not configured\n"),
        Some(root) => match SourceTree::locate(&root) {
            Err(e) => out.push_str(&format!("  {e}\n")),
            Ok(tree) => {
                out.push_str(&format!("  Library dir: {}\n", tree.lib_dir().display()));
                match tree.version() {
                    Ok(v) => out.push_str(&format!("  Upstream version: {v}\n")),
                    Err(e) => out.push_str(&format!("  Upstream version: {e}\n")),
                }
                let missing = tree.missing_files();
                if missing.is_empty() {
                    out.push_str("  Files: complete\n");
                } else {
                    out.push_str(&format!("  Missing: {}\n", missing.join(", ")));
                }
            }
        },
    }
    out
}
