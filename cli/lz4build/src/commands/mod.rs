//! CLI command implementations.

pub mod build;
pub mod doctor;
pub mod init;
pub mod macros;
pub mod plan;

use anyhow::{Context, Result};
use lz4build_config::RawOptions;
use lz4build_plan::{plan_from_raw, BuildPlan};

use crate::manifest::Lz4buildManifest;

/// Manifest `[options]` overlaid with `--set key=value` assignments.
pub(crate) fn collect_options(
    manifest: Option<&Lz4buildManifest>,
    assignments: &[String],
) -> Result<RawOptions> {
    let mut raw = match manifest {
        Some(m) => m.raw_options()?,
        None => RawOptions::new(),
    };
    for assignment in assignments {
        raw.assign(assignment)
            .with_context(|| format!("invalid --set {assignment}"))?;
    }
    Ok(raw)
}

/// Resolve options and derive the build plan.
///
/// With `deny_warnings` a plan that would produce nothing is an error.
pub(crate) fn resolve_plan(
    manifest: Option<&Lz4buildManifest>,
    assignments: &[String],
    deny_warnings: bool,
) -> Result<BuildPlan> {
    let raw = collect_options(manifest, assignments)?;
    let plan = plan_from_raw(&raw).context("resolving build options")?;
    if deny_warnings {
        Ok(plan.require_artifacts()?)
    } else {
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> Lz4buildManifest {
        Lz4buildManifest::from_str(
            "[project]\nname = \"t\"\n[options]\nstrip = true\nshared = false\n",
        )
        .unwrap()
    }

    #[test]
    fn assignments_override_manifest() {
        let raw = collect_options(Some(&manifest()), &["shared=on".into()]).unwrap();
        assert_eq!(raw.get("strip"), Some("true"));
        assert_eq!(raw.get("shared"), Some("on"));
    }

    #[test]
    fn malformed_assignment_is_reported() {
        let err = collect_options(None, &["freestanding".into()]).unwrap_err();
        assert!(format!("{err:#}").contains("--set freestanding"));
    }

    #[test]
    fn deny_warnings_rejects_empty_plan() {
        let sets = ["static=false".to_string(), "shared=false".to_string()];
        let plan = resolve_plan(None, &sets, false).unwrap();
        assert!(plan.artifacts.is_empty());
        assert_eq!(plan.warnings.len(), 1);
        assert!(resolve_plan(None, &sets, true).is_err());
    }

    #[test]
    fn unknown_option_fails() {
        let err = resolve_plan(None, &["lto=true".into()], false).unwrap_err();
        assert!(format!("{err:#}").contains("lto"));
    }
}
