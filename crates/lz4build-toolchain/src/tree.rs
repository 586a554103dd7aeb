//! The upstream LZ4 source tree.
//!
//! The tree is versioned independently of lz4build. It is accepted either as
//! the library directory itself or as a checkout whose `lib/` directory holds
//! the sources.

use std::path::{Path, PathBuf};

use lz4build_plan::{ArtifactDescriptor, HeaderId, TranslationUnit};
use semver::Version;
use tracing::debug;

use crate::error::{Result, ToolchainError};

/// A located upstream library directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTree {
    lib_dir: PathBuf,
}

impl SourceTree {
    /// Find the library directory at `root` or `root/lib`.
    pub fn locate(root: &Path) -> Result<Self> {
        for candidate in [root.join("lib"), root.to_path_buf()] {
            if candidate.join(HeaderId::Block.file_name()).is_file() {
                debug!(lib_dir = %candidate.display(), "located LZ4 sources");
                return Ok(Self { lib_dir: candidate });
            }
        }
        Err(ToolchainError::SourceTreeNotFound {
            root: root.to_path_buf(),
        })
    }

    /// Directory holding the sources and headers.
    pub fn lib_dir(&self) -> &Path {
        &self.lib_dir
    }

    pub fn unit_path(&self, unit: TranslationUnit) -> PathBuf {
        self.lib_dir.join(unit.file_name())
    }

    pub fn header_path(&self, header: HeaderId) -> PathBuf {
        self.lib_dir.join(header.file_name())
    }

    /// Files of the full upstream contract that are absent.
    pub fn missing_files(&self) -> Vec<String> {
        let units = TranslationUnit::ALL.iter().map(|u| u.file_name());
        let headers = HeaderId::ALL.iter().map(|h| h.file_name());
        units
            .chain(headers)
            .filter(|name| !self.lib_dir.join(name).is_file())
            .map(str::to_string)
            .collect()
    }

    /// Check that every unit and exported header of `descriptor` exists.
    pub fn verify(&self, descriptor: &ArtifactDescriptor) -> Result<()> {
        let units = descriptor.sources.units.iter().map(|u| u.file_name());
        let headers = descriptor.exported_headers.iter().map(|h| h.file_name());
        let missing: Vec<String> = units
            .chain(headers)
            .filter(|name| !self.lib_dir.join(name).is_file())
            .map(str::to_string)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ToolchainError::MissingSources {
                root: self.lib_dir.clone(),
                missing,
            })
        }
    }

    /// Library version from the `LZ4_VERSION_*` macros in `lz4.h`.
    pub fn version(&self) -> Result<Version> {
        let path = self.header_path(HeaderId::Block);
        let content = std::fs::read_to_string(&path)?;
        parse_version(&content).ok_or(ToolchainError::VersionNotFound { path })
    }
}

/// Extract `major.minor.release` from the text of `lz4.h`.
pub fn parse_version(header: &str) -> Option<Version> {
    let mut major = None;
    let mut minor = None;
    let mut release = None;

    for line in header.lines() {
        let mut parts = line.split_whitespace();
        if parts.next() != Some("#define") {
            continue;
        }
        let (Some(name), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };
        let slot = match name {
            "LZ4_VERSION_MAJOR" => &mut major,
            "LZ4_VERSION_MINOR" => &mut minor,
            "LZ4_VERSION_RELEASE" => &mut release,
            _ => continue,
        };
        *slot = value.parse::<u64>().ok();
    }

    Some(Version::new(major?, minor?, release?))
}
