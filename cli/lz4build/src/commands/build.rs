//! `lz4build build`: compile and archive or link the requested artifacts.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use lz4build_toolchain::{build_artifact, render, SourceTree, Toolchain};
use tracing::warn;

use crate::manifest::Lz4buildManifest;

pub struct BuildArgs<'a> {
    pub source: Option<&'a Path>,
    pub out_dir: Option<&'a Path>,
    pub assignments: &'a [String],
    pub dry_run: bool,
    pub deny_warnings: bool,
}

pub fn run(
    project_dir: &Path,
    manifest: Option<&Lz4buildManifest>,
    args: &BuildArgs<'_>,
) -> Result<()> {
    let plan = super::resolve_plan(manifest, args.assignments, args.deny_warnings)?;
    for warning in &plan.warnings {
        eprintln!("warning: {warning}");
    }

    let source = source_dir(project_dir, manifest, args.source)?;
    let tree = SourceTree::locate(&source)?;
    let out_dir = match args.out_dir {
        Some(dir) => dir.to_path_buf(),
        None => manifest.map_or_else(|| project_dir.join("out"), |m| m.out_dir(project_dir)),
    };
    let toolchain = manifest.map(|m| m.toolchain.clone()).unwrap_or_default();

    if args.dry_run {
        let objects = out_dir.join("obj");
        for descriptor in &plan.artifacts {
            println!("# {} ({})", descriptor.file_name(), descriptor.kind);
            let commands = render(&toolchain, descriptor, &tree, &objects, &out_dir)
                .with_context(|| format!("rendering {}", descriptor.file_name()))?;
            for cmd in commands.commands {
                println!("{cmd}");
            }
        }
        return Ok(());
    }

    let version = match tree.version() {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(error = %e, "upstream version unknown");
            None
        }
    };

    for descriptor in &plan.artifacts {
        let built = build_artifact(&toolchain, descriptor, &tree, &out_dir, version.as_ref())
            .with_context(|| format!("building {}", descriptor.file_name()))?;
        println!("Built {} -> {}", built.kind, built.path.display());
        println!("  manifest: {}", built.manifest.display());
    }
    Ok(())
}

fn source_dir(
    project_dir: &Path,
    manifest: Option<&Lz4buildManifest>,
    explicit: Option<&Path>,
) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }
    match manifest.and_then(|m| m.source_dir(project_dir)) {
        Some(dir) => Ok(dir),
        None => bail!("no LZ4 source tree given (pass --source or set [source] path in lz4build.toml)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args<'a>(source: Option<&'a Path>, sets: &'a [String], dry_run: bool) -> BuildArgs<'a> {
        BuildArgs {
            source,
            out_dir: None,
            assignments: sets,
            dry_run,
            deny_warnings: false,
        }
    }

    #[test]
    fn build_without_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(dir.path(), None, &args(None, &[], true)).unwrap_err();
        assert!(err.to_string().contains("--source"));
    }

    #[test]
    fn dry_run_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let lib = dir.path().join("lz4/lib");
        std::fs::create_dir_all(&lib).unwrap();
        std::fs::write(lib.join("lz4.h"), "").unwrap();

        let manifest = Lz4buildManifest::from_str(
            "[project]\nname = \"t\"\n[source]\npath = \"lz4\"\n",
        )
        .unwrap();
        run(dir.path(), Some(&manifest), &args(None, &[], true)).unwrap();
        assert!(!dir.path().join("out").exists());
    }

    fn source_tree(dir: &Path) {
        std::fs::write(dir.join("lz4.h"), "").unwrap();
    }

    #[test]
    fn cross_dry_run_renders_with_default_toolchain() {
        let dir = tempfile::tempdir().unwrap();
        source_tree(dir.path());
        let sets = ["target=aarch64-linux-gnu".to_string()];
        run(dir.path(), None, &args(Some(dir.path()), &sets, true)).unwrap();
    }

    #[test]
    fn msvc_target_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        source_tree(dir.path());
        let sets = ["target=x86_64-pc-windows-msvc".to_string()];
        let err = run(dir.path(), None, &args(Some(dir.path()), &sets, true)).unwrap_err();
        assert!(format!("{err:#}").contains("MSVC"));
    }

    #[test]
    fn missing_sources_fail_before_compiling() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lz4.h"), "").unwrap();
        let sets = ["shared=false".to_string()];
        let err = run(dir.path(), None, &args(Some(dir.path()), &sets, false)).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("building liblz4.a"));
        assert!(message.contains("lz4.c"));
    }

    #[test]
    fn deny_warnings_stops_empty_build() {
        let dir = tempfile::tempdir().unwrap();
        let sets = ["static=false".to_string(), "shared=false".to_string()];
        let args = BuildArgs {
            deny_warnings: true,
            ..args(Some(dir.path()), &sets, false)
        };
        assert!(run(dir.path(), None, &args).is_err());
    }
}
