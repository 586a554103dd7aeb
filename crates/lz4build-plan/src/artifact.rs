//! Artifact descriptors handed to the toolchain.

use std::collections::BTreeSet;
use std::fmt;

use lz4build_config::{OptimizeMode, TargetPlatform};
use serde::{Deserialize, Serialize};

use crate::fingerprint::fingerprint;
use crate::freestanding::MacroSet;
use crate::headers::HeaderId;
use crate::sources::{SourceSet, TranslationUnit};

/// Base name of the produced library.
pub const LIBRARY_NAME: &str = "lz4";

/// Kind of linkable output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    /// Static archive.
    Static,
    /// Shared object / dynamic library.
    Dynamic,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArtifactKind::Static => "static",
            ArtifactKind::Dynamic => "dynamic",
        })
    }
}

/// Sanitizer instrumentation for a whole artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sanitizers {
    pub ubsan: bool,
    pub tsan: bool,
}

impl Sanitizers {
    /// Compile and link flags enabling the selected sanitizers.
    pub fn flags(&self) -> Vec<String> {
        let mut flags = Vec::new();
        if self.ubsan {
            flags.push("-fsanitize=undefined".to_string());
        }
        if self.tsan {
            flags.push("-fsanitize=thread".to_string());
        }
        flags
    }

    pub fn any(&self) -> bool {
        self.ubsan || self.tsan
    }
}

/// A preprocessor constant `NAME=VALUE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Define {
    pub name: String,
    pub value: String,
}

impl Define {
    pub fn new(name: impl Into<String>, value: impl ToString) -> Self {
        Self {
            name: name.into(),
            value: value.to_string(),
        }
    }

    pub fn flag(&self) -> String {
        format!("-D{}={}", self.name, self.value)
    }
}

/// Compiler invocation flags for one translation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitInvocation {
    pub unit: TranslationUnit,
    pub flags: Vec<String>,
}

/// Everything the toolchain needs to produce one artifact.
///
/// Immutable once assembled; sanitizers, defines and macros belong to the
/// artifact as a whole and reach every unit identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArtifactDescriptor {
    pub kind: ArtifactKind,
    pub platform: TargetPlatform,
    pub optimize: OptimizeMode,
    pub sources: SourceSet,
    pub macros: MacroSet,
    pub defines: Vec<Define>,
    pub exported_headers: BTreeSet<HeaderId>,
    pub sanitizers: Sanitizers,
    pub strip: bool,
    pub freestanding: bool,
}

impl ArtifactDescriptor {
    /// Output file name for the target platform.
    pub fn file_name(&self) -> String {
        match self.kind {
            ArtifactKind::Static => self.platform.static_library_name(LIBRARY_NAME),
            ArtifactKind::Dynamic => self.platform.shared_library_name(LIBRARY_NAME),
        }
    }

    /// Whether the artifact links against the C library.
    pub fn links_libc(&self) -> bool {
        self.sources.link_libc
    }

    /// Compiler flags shared by every translation unit.
    ///
    /// Target selection is left to the toolchain, since the spelling depends
    /// on the compiler family.
    pub fn compile_flags(&self) -> Vec<String> {
        let mut flags = self.sources.flags.clone();
        flags.push(self.optimize.cc_flag().to_string());
        if !self.strip {
            flags.push("-g".to_string());
        }
        if self.kind == ArtifactKind::Dynamic {
            flags.push("-fPIC".to_string());
        }
        flags.extend(self.sanitizers.flags());
        flags.extend(self.defines.iter().map(Define::flag));
        flags.extend(self.macros.define_flags());
        flags
    }

    /// One invocation per translation unit, in source order.
    pub fn unit_invocations(&self) -> Vec<UnitInvocation> {
        let flags = self.compile_flags();
        self.sources
            .units
            .iter()
            .map(|&unit| UnitInvocation {
                unit,
                flags: flags.clone(),
            })
            .collect()
    }

    /// Linker flags for a dynamic artifact. Empty for static archives.
    pub fn link_flags(&self) -> Vec<String> {
        if self.kind == ArtifactKind::Static {
            return Vec::new();
        }
        let mut flags = vec!["-shared".to_string()];
        flags.extend(self.sanitizers.flags());
        if self.strip {
            flags.push("-s".to_string());
        }
        if self.links_libc() {
            flags.push("-lc".to_string());
        } else {
            flags.push("-nostdlib".to_string());
        }
        flags
    }

    /// Content fingerprint of the descriptor.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        fingerprint(self)
    }

    /// Exported header file names.
    pub fn header_files(&self) -> Vec<&'static str> {
        self.exported_headers.iter().map(|h| h.file_name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::freestanding::synthesize;
    use crate::sources::select;

    fn descriptor(kind: ArtifactKind, freestanding: bool) -> ArtifactDescriptor {
        ArtifactDescriptor {
            kind,
            platform: TargetPlatform::cross("x86_64-unknown-linux-gnu"),
            optimize: OptimizeMode::ReleaseFast,
            sources: select(freestanding),
            macros: if freestanding {
                synthesize()
            } else {
                MacroSet::empty()
            },
            defines: vec![Define::new("XXH_NAMESPACE", "LZ4_")],
            exported_headers: BTreeSet::from([HeaderId::Block]),
            sanitizers: Sanitizers {
                ubsan: true,
                tsan: false,
            },
            strip: false,
            freestanding,
        }
    }

    #[test]
    fn file_names() {
        assert_eq!(descriptor(ArtifactKind::Static, false).file_name(), "liblz4.a");
        assert_eq!(descriptor(ArtifactKind::Dynamic, false).file_name(), "liblz4.so");
    }

    #[test]
    fn compile_flags_include_everything() {
        let flags = descriptor(ArtifactKind::Dynamic, true).compile_flags();
        assert!(flags.contains(&"-ffreestanding".to_string()));
        assert!(flags.contains(&"-O3".to_string()));
        assert!(flags.contains(&"-g".to_string()));
        assert!(flags.contains(&"-fPIC".to_string()));
        assert!(!flags.iter().any(|f| f.starts_with("--target")));
        assert!(flags.contains(&"-fsanitize=undefined".to_string()));
        assert!(flags.contains(&"-DXXH_NAMESPACE=LZ4_".to_string()));
        assert!(flags.iter().any(|f| f.starts_with("-DLZ4_memmove(")));
    }

    #[test]
    fn static_objects_are_not_pic() {
        let flags = descriptor(ArtifactKind::Static, false).compile_flags();
        assert!(!flags.contains(&"-fPIC".to_string()));
        assert!(descriptor(ArtifactKind::Static, false).link_flags().is_empty());
    }

    #[test]
    fn strip_drops_debug_info_and_strips_at_link() {
        let mut d = descriptor(ArtifactKind::Dynamic, false);
        d.strip = true;
        assert!(!d.compile_flags().contains(&"-g".to_string()));
        assert!(d.link_flags().contains(&"-s".to_string()));
    }

    #[test]
    fn link_flags_follow_libc() {
        let hosted = descriptor(ArtifactKind::Dynamic, false).link_flags();
        assert!(hosted.contains(&"-lc".to_string()));
        assert!(hosted.contains(&"-fsanitize=undefined".to_string()));
        let free = descriptor(ArtifactKind::Dynamic, true).link_flags();
        assert!(free.contains(&"-nostdlib".to_string()));
        assert!(!free.contains(&"-lc".to_string()));
    }

    #[test]
    fn every_unit_gets_identical_flags() {
        let d = descriptor(ArtifactKind::Static, true);
        let invocations = d.unit_invocations();
        assert_eq!(invocations.len(), d.sources.len());
        let first = &invocations[0].flags;
        assert!(invocations.iter().all(|inv| &inv.flags == first));
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = descriptor(ArtifactKind::Static, false);
        let b = descriptor(ArtifactKind::Static, false);
        let c = descriptor(ArtifactKind::Dynamic, false);
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        assert_ne!(a.fingerprint().unwrap(), c.fingerprint().unwrap());
        assert_eq!(a.fingerprint().unwrap().len(), 64);
    }

    #[test]
    fn freestanding_descriptor_fingerprints() {
        // The macro map is keyed by an enum, which must serialize as a JSON key.
        let d = descriptor(ArtifactKind::Static, true);
        let fp = d.fingerprint().unwrap();
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(fp, descriptor(ArtifactKind::Static, false).fingerprint().unwrap());
    }
}
