//! Header manifests written next to built artifacts.

use std::path::{Path, PathBuf};

use lz4build_plan::{ArtifactDescriptor, ArtifactKind};
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// What a consumer needs to use an artifact: its file, kind, upstream
/// version and the headers it exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderManifest {
    pub artifact: String,
    pub kind: ArtifactKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,
    pub headers: Vec<String>,
    pub fingerprint: String,
}

impl HeaderManifest {
    pub fn new(descriptor: &ArtifactDescriptor, version: Option<&Version>) -> Result<Self> {
        Ok(Self {
            artifact: descriptor.file_name(),
            kind: descriptor.kind,
            version: version.cloned(),
            headers: descriptor
                .header_files()
                .into_iter()
                .map(str::to_string)
                .collect(),
            fingerprint: descriptor.fingerprint()?,
        })
    }

    pub fn file_name(&self) -> String {
        format!("{}.manifest.json", self.artifact)
    }
}

/// Write `manifest` into `dir`, returning the written path.
pub fn write_header_manifest(manifest: &HeaderManifest, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(manifest.file_name());
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

/// Read a manifest written by [`write_header_manifest`].
pub fn read_header_manifest(path: &Path) -> Result<HeaderManifest> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lz4build_config::BuildConfiguration;
    use lz4build_plan::assemble;

    #[test]
    fn manifest_lists_exported_headers() {
        let d = assemble(&BuildConfiguration::default(), ArtifactKind::Dynamic);
        let m = HeaderManifest::new(&d, Some(&Version::new(1, 10, 0))).unwrap();
        assert_eq!(m.kind, ArtifactKind::Dynamic);
        assert!(m.headers.iter().any(|h| h == "lz4frame.h"));
        assert!(!m.headers.iter().any(|h| h == "lz4frame_static.h"));
        assert_eq!(m.fingerprint, d.fingerprint().unwrap());
    }

    #[test]
    fn write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let d = assemble(&BuildConfiguration::default(), ArtifactKind::Static);
        let m = HeaderManifest::new(&d, None).unwrap();
        let path = write_header_manifest(&m, dir.path()).unwrap();
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .ends_with(".manifest.json"));

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("\"version\""));
        assert_eq!(read_header_manifest(&path).unwrap(), m);
    }
}
