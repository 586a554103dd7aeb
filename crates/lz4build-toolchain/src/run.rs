//! Running rendered commands.

use std::path::{Path, PathBuf};
use std::process::Command;

use lz4build_plan::{ArtifactDescriptor, ArtifactKind};
use semver::Version;
use tracing::{debug, info};

use crate::command::{render, CommandPlan, Toolchain};
use crate::error::{Result, ToolchainError};
use crate::manifest::{write_header_manifest, HeaderManifest};
use crate::tree::SourceTree;

/// A finished artifact on disk.
#[derive(Debug, Clone)]
pub struct BuiltArtifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub manifest: PathBuf,
}

/// Run every command of `plan` in order, stopping at the first failure.
pub fn execute(plan: &CommandPlan) -> Result<()> {
    if plan.output.exists() {
        // `ar rcs` appends to an existing archive.
        std::fs::remove_file(&plan.output)?;
    }

    for cmd in &plan.commands {
        debug!(%cmd, "running");
        let output = Command::new(&cmd.program)
            .args(&cmd.args)
            .output()
            .map_err(|source| ToolchainError::Spawn {
                program: cmd.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ToolchainError::CommandFailed {
                program: cmd.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
    }
    Ok(())
}

/// Build one artifact into `out_dir` and write its header manifest.
///
/// Object files live in a temporary directory under `out_dir` named after
/// the descriptor fingerprint and removed afterwards.
pub fn build_artifact(
    toolchain: &Toolchain,
    descriptor: &ArtifactDescriptor,
    tree: &SourceTree,
    out_dir: &Path,
    version: Option<&Version>,
) -> Result<BuiltArtifact> {
    tree.verify(descriptor)?;
    std::fs::create_dir_all(out_dir)?;

    let fingerprint = descriptor.fingerprint()?;
    let prefix = format!(
        "lz4build-{}-",
        fingerprint.get(..12).unwrap_or(&fingerprint)
    );
    let objects = tempfile::Builder::new()
        .prefix(&prefix)
        .tempdir_in(out_dir)?;

    let plan = render(toolchain, descriptor, tree, objects.path(), out_dir)?;
    info!(
        kind = %descriptor.kind,
        artifact = %plan.output.display(),
        commands = plan.commands.len(),
        "building"
    );
    execute(&plan)?;

    let manifest = HeaderManifest::new(descriptor, version)?;
    let manifest_path = write_header_manifest(&manifest, out_dir)?;

    Ok(BuiltArtifact {
        kind: descriptor.kind,
        path: plan.output,
        manifest: manifest_path,
    })
}

/// First line of `program --version`, or `None` if it cannot be run.
pub fn probe(program: &str) -> Option<String> {
    let output = Command::new(program).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = if output.stdout.is_empty() {
        output.stderr
    } else {
        output.stdout
    };
    String::from_utf8_lossy(&text)
        .lines()
        .next()
        .map(|l| l.trim().to_string())
}
