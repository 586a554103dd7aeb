//! `lz4build.toml` manifest parsing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lz4build_config::parse::{generate_template, raw_options_from_table};
use lz4build_config::RawOptions;
use lz4build_toolchain::Toolchain;
use serde::{Deserialize, Serialize};

pub const MANIFEST_FILE: &str = "lz4build.toml";

/// The top-level manifest of an lz4build project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lz4buildManifest {
    pub project: ProjectConfig,
    /// Where the upstream LZ4 sources live.
    #[serde(default)]
    pub source: Option<SourceConfig>,
    /// Option table, interpreted by the configuration resolver.
    #[serde(default)]
    pub options: toml::Table,
    #[serde(default)]
    pub toolchain: Toolchain,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    /// Output directory, relative to the manifest.
    #[serde(default)]
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// LZ4 checkout or its `lib/` directory, relative to the manifest.
    pub path: PathBuf,
}

impl Lz4buildManifest {
    /// Search upward from `start_dir` for `lz4build.toml`, returning the
    /// manifest and the directory holding it.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: Lz4buildManifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing lz4build.toml")
    }

    /// The `[options]` table as raw options.
    pub fn raw_options(&self) -> Result<RawOptions> {
        raw_options_from_table(&self.options).context("reading [options]")
    }

    /// Source tree path resolved against `project_dir`.
    pub fn source_dir(&self, project_dir: &Path) -> Option<PathBuf> {
        self.source.as_ref().map(|s| project_dir.join(&s.path))
    }

    pub fn out_dir(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(self.project.out_dir.as_deref().unwrap_or(Path::new("out")))
    }

    /// Manifest written by `lz4build init`.
    pub fn template(name: &str) -> Result<String> {
        let options = generate_template().context("rendering default options")?;
        let toolchain = Toolchain::default();
        Ok(format!(
            r#"[project]
name = "{name}"

[source]
path = "lz4"

[options]
{options}
[toolchain]
cc = "{cc}"
ar = "{ar}"
"#,
            cc = toolchain.cc,
            ar = toolchain.ar,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lz4build_config::{resolve, HeapMode};

    #[test]
    fn parse_full_manifest() {
        let manifest = Lz4buildManifest::from_str(
            r#"
[project]
name = "firmware"
out_dir = "build"

[source]
path = "vendor/lz4"

[options]
freestanding = true
shared = false
heap-mode = "heap"

[toolchain]
cc = "clang"
"#,
        )
        .unwrap();
        assert_eq!(manifest.project.name, "firmware");
        assert_eq!(manifest.toolchain.cc, "clang");
        assert_eq!(manifest.toolchain.ar, "ar");
        assert_eq!(
            manifest.source_dir(Path::new("/p")),
            Some(PathBuf::from("/p/vendor/lz4"))
        );
        assert_eq!(manifest.out_dir(Path::new("/p")), PathBuf::from("/p/build"));

        let config = resolve(&manifest.raw_options().unwrap()).unwrap();
        assert!(config.freestanding);
        assert!(!config.build_shared);
        assert_eq!(config.heap_mode, HeapMode::Heap);
    }

    #[test]
    fn parse_minimal_manifest() {
        let manifest = Lz4buildManifest::from_str("[project]\nname = \"minimal\"\n").unwrap();
        assert!(manifest.source.is_none());
        assert!(manifest.options.is_empty());
        assert_eq!(manifest.toolchain, Toolchain::default());
        assert_eq!(manifest.out_dir(Path::new("/p")), PathBuf::from("/p/out"));
    }

    #[test]
    fn toolchain_family_override() {
        let manifest = Lz4buildManifest::from_str(
            "[project]\nname = \"x\"\n[toolchain]\ncc = \"/opt/cross/bin/cc\"\nfamily = \"clang\"\n",
        )
        .unwrap();
        assert_eq!(
            manifest.toolchain.family(),
            lz4build_toolchain::CompilerFamily::Clang
        );
    }

    #[test]
    fn reject_missing_project() {
        assert!(Lz4buildManifest::from_str("[source]\npath = \"lz4\"\n").is_err());
    }

    #[test]
    fn template_parses_and_resolves_to_defaults() {
        let text = Lz4buildManifest::template("demo").unwrap();
        let manifest = Lz4buildManifest::from_str(&text).unwrap();
        assert_eq!(manifest.project.name, "demo");
        let config = resolve(&manifest.raw_options().unwrap()).unwrap();
        assert_eq!(config, lz4build_config::BuildConfiguration::default());
    }

    #[test]
    fn find_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), "[project]\nname = \"up\"\n").unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        let (manifest, found) = Lz4buildManifest::find_and_load(&nested).unwrap().unwrap();
        assert_eq!(manifest.project.name, "up");
        assert_eq!(found, dir.path());
    }

    #[test]
    fn find_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), "not toml [[[").unwrap();
        let err = Lz4buildManifest::find_and_load(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }
}
