//! Artifact assembly: configuration in, descriptors out.

use std::fmt;

use lz4build_config::{resolve, BuildConfiguration, RawOptions};
use serde::Serialize;
use tracing::{debug, warn};

use crate::artifact::{ArtifactDescriptor, ArtifactKind, Define, Sanitizers};
use crate::error::PlanError;
use crate::freestanding::{synthesize, MacroSet};
use crate::headers::exported_headers;
use crate::sources::select;

/// Prefix applied to the bundled xxHash symbols so they cannot collide with
/// another copy of xxHash linked into the same program.
pub const XXH_NAMESPACE_PREFIX: &str = "LZ4_";

/// Build one artifact descriptor.
pub fn assemble(config: &BuildConfiguration, kind: ArtifactKind) -> ArtifactDescriptor {
    let sources = select(config.freestanding);
    let macros = if config.freestanding {
        synthesize()
    } else {
        MacroSet::empty()
    };

    let mut defines = Vec::new();
    if config.freestanding {
        defines.push(Define::new("LZ4_FREESTANDING", 1));
    }
    defines.push(Define::new("XXH_NAMESPACE", XXH_NAMESPACE_PREFIX));
    defines.push(Define::new("LZ4_HEAPMODE", config.heap_mode.constant()));
    if let Some(access) = config.memory_access {
        defines.push(Define::new("LZ4_FORCE_MEMORY_ACCESS", access.constant()));
    }

    let descriptor = ArtifactDescriptor {
        kind,
        platform: config.platform.clone(),
        optimize: config.optimize,
        sources,
        macros,
        defines,
        exported_headers: exported_headers(kind, config.freestanding),
        sanitizers: Sanitizers {
            ubsan: config.ubsan,
            tsan: config.tsan,
        },
        strip: config.strip,
        freestanding: config.freestanding,
    };

    debug!(
        kind = %kind,
        units = descriptor.sources.len(),
        headers = descriptor.exported_headers.len(),
        macros = descriptor.macros.len(),
        "assembled artifact"
    );
    descriptor
}

/// Artifact kinds the configuration asks for, static first.
pub fn requested_kinds(config: &BuildConfiguration) -> Vec<ArtifactKind> {
    let mut kinds = Vec::new();
    if config.build_static {
        kinds.push(ArtifactKind::Static);
    }
    if config.build_shared {
        kinds.push(ArtifactKind::Dynamic);
    }
    kinds
}

/// A non-fatal planning condition the user should see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanWarning {
    /// Both static and shared builds are disabled.
    InconsistentArtifactRequest,
}

impl fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanWarning::InconsistentArtifactRequest => write!(
                f,
                "static and shared are both disabled; nothing will be built"
            ),
        }
    }
}

/// All artifacts derived from one configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildPlan {
    pub configuration: BuildConfiguration,
    pub artifacts: Vec<ArtifactDescriptor>,
    pub warnings: Vec<PlanWarning>,
}

impl BuildPlan {
    /// The descriptor for `kind`, if it was requested.
    pub fn artifact(&self, kind: ArtifactKind) -> Option<&ArtifactDescriptor> {
        self.artifacts.iter().find(|a| a.kind == kind)
    }

    /// Turn warnings into errors.
    pub fn require_artifacts(self) -> Result<Self, PlanError> {
        if self
            .warnings
            .contains(&PlanWarning::InconsistentArtifactRequest)
        {
            return Err(PlanError::InconsistentArtifactRequest);
        }
        Ok(self)
    }
}

/// Assemble every requested artifact.
///
/// Static and dynamic descriptors share nothing but the configuration and
/// are derived in parallel.
pub fn plan(config: &BuildConfiguration) -> BuildPlan {
    let (static_artifact, dynamic_artifact) = rayon::join(
        || config.build_static.then(|| assemble(config, ArtifactKind::Static)),
        || config.build_shared.then(|| assemble(config, ArtifactKind::Dynamic)),
    );
    let artifacts: Vec<ArtifactDescriptor> =
        static_artifact.into_iter().chain(dynamic_artifact).collect();

    let mut warnings = Vec::new();
    if artifacts.is_empty() {
        warn!("no artifact requested: static=false shared=false");
        warnings.push(PlanWarning::InconsistentArtifactRequest);
    }

    BuildPlan {
        configuration: config.clone(),
        artifacts,
        warnings,
    }
}

/// Resolve raw options and plan in one step.
pub fn plan_from_raw(raw: &RawOptions) -> Result<BuildPlan, PlanError> {
    let config = resolve(raw)?;
    Ok(plan(&config))
}
