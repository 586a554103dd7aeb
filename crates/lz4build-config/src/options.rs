//! The build option surface and its resolution into a [`BuildConfiguration`].
//!
//! Options arrive as raw strings that may be absent. Resolution fills in
//! defaults and parses enumerated values; it never rejects a combination of
//! options, only a value outside an option's declared set.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::platform::{OptimizeMode, TargetPlatform};

/// Where the library places its internal scratch buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeapMode {
    #[default]
    Stack,
    Heap,
}

impl HeapMode {
    /// Value of the `LZ4_HEAPMODE` constant.
    pub fn constant(self) -> u8 {
        match self {
            HeapMode::Stack => 0,
            HeapMode::Heap => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HeapMode::Stack => "stack",
            HeapMode::Heap => "heap",
        }
    }
}

/// How the library reads and writes possibly misaligned values.
///
/// An optimization hint only: every strategy produces identical output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemoryAccess {
    /// Go through `memcpy`.
    ByteCopy,
    /// Use packed struct members.
    PackedStruct,
    /// Cast and dereference directly.
    DirectCast,
}

impl MemoryAccess {
    /// Value of the `LZ4_FORCE_MEMORY_ACCESS` constant.
    pub fn constant(self) -> u8 {
        match self {
            MemoryAccess::ByteCopy => 0,
            MemoryAccess::PackedStruct => 1,
            MemoryAccess::DirectCast => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MemoryAccess::ByteCopy => "byte-copy",
            MemoryAccess::PackedStruct => "packed-struct",
            MemoryAccess::DirectCast => "direct-cast",
        }
    }
}

/// Names of every recognized option.
pub mod keys {
    pub const TARGET: &str = "target";
    pub const OPTIMIZE: &str = "optimize";
    pub const STATIC: &str = "static";
    pub const SHARED: &str = "shared";
    pub const STRIP: &str = "strip";
    pub const UBSAN: &str = "ubsan";
    pub const TSAN: &str = "tsan";
    pub const FREESTANDING: &str = "freestanding";
    pub const HEAP_MODE: &str = "heap_mode";
    pub const MEMORY_ACCESS: &str = "memory_access";

    /// All option names, in the order they are documented.
    pub const ALL: [&str; 10] = [
        TARGET,
        OPTIMIZE,
        STATIC,
        SHARED,
        STRIP,
        UBSAN,
        TSAN,
        FREESTANDING,
        HEAP_MODE,
        MEMORY_ACCESS,
    ];
}

/// Raw, unvalidated option values keyed by option name.
///
/// Keys are normalized on insertion: `heap-mode` and `heap_mode` name the
/// same option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawOptions {
    values: BTreeMap<String, String>,
}

impl RawOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option, replacing any earlier value.
    pub fn set(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.values
            .insert(normalize_key(name.as_ref()), value.into());
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Parse and apply a `key=value` assignment.
    pub fn assign(&mut self, assignment: &str) -> Result<()> {
        let (key, value) =
            assignment
                .split_once('=')
                .ok_or_else(|| ConfigError::MalformedAssignment {
                    input: assignment.to_string(),
                })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::MalformedAssignment {
                input: assignment.to_string(),
            });
        }
        self.set(key, value.trim());
        Ok(())
    }

    /// Raw value of an option, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(&normalize_key(name)).map(String::as_str)
    }

    /// Overlay `other` on top of `self`; values in `other` win.
    pub fn merged(mut self, other: &RawOptions) -> Self {
        for (k, v) in &other.values {
            self.values.insert(k.clone(), v.clone());
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn normalize_key(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace('-', "_")
}

/// The resolved, immutable configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildConfiguration {
    pub platform: TargetPlatform,
    pub optimize: OptimizeMode,
    pub build_static: bool,
    pub build_shared: bool,
    pub strip: bool,
    pub ubsan: bool,
    pub tsan: bool,
    pub freestanding: bool,
    pub heap_mode: HeapMode,
    /// `None` lets the library pick its own strategy.
    pub memory_access: Option<MemoryAccess>,
}

impl Default for BuildConfiguration {
    fn default() -> Self {
        Self {
            platform: TargetPlatform::host(),
            optimize: OptimizeMode::default(),
            build_static: true,
            build_shared: true,
            strip: false,
            ubsan: false,
            tsan: false,
            freestanding: false,
            heap_mode: HeapMode::default(),
            memory_access: None,
        }
    }
}

impl fmt::Display for BuildConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "target={} optimize={} static={} shared={} strip={} ubsan={} tsan={} freestanding={} heap_mode={} memory_access={}",
            self.platform,
            self.optimize,
            self.build_static,
            self.build_shared,
            self.strip,
            self.ubsan,
            self.tsan,
            self.freestanding,
            self.heap_mode.as_str(),
            self.memory_access.map_or("default", MemoryAccess::as_str),
        )
    }
}

/// Resolve raw option values into a [`BuildConfiguration`].
pub fn resolve(raw: &RawOptions) -> Result<BuildConfiguration> {
    for (name, _) in raw.iter() {
        if !keys::ALL.contains(&name) {
            return Err(ConfigError::UnknownOption {
                name: name.to_string(),
            });
        }
    }

    let defaults = BuildConfiguration::default();
    let config = BuildConfiguration {
        platform: match raw.get(keys::TARGET) {
            Some(v) => parse_target(v),
            None => defaults.platform,
        },
        optimize: parse_or(raw, keys::OPTIMIZE, defaults.optimize, parse_optimize)?,
        build_static: parse_or(raw, keys::STATIC, defaults.build_static, parse_bool)?,
        build_shared: parse_or(raw, keys::SHARED, defaults.build_shared, parse_bool)?,
        strip: parse_or(raw, keys::STRIP, defaults.strip, parse_bool)?,
        ubsan: parse_or(raw, keys::UBSAN, defaults.ubsan, parse_bool)?,
        tsan: parse_or(raw, keys::TSAN, defaults.tsan, parse_bool)?,
        freestanding: parse_or(raw, keys::FREESTANDING, defaults.freestanding, parse_bool)?,
        heap_mode: parse_or(raw, keys::HEAP_MODE, defaults.heap_mode, parse_heap_mode)?,
        memory_access: parse_or(
            raw,
            keys::MEMORY_ACCESS,
            defaults.memory_access,
            parse_memory_access,
        )?,
    };

    debug!(%config, "resolved build configuration");
    Ok(config)
}

fn parse_or<T>(
    raw: &RawOptions,
    name: &str,
    default: T,
    parse: fn(&str) -> std::result::Result<T, &'static str>,
) -> Result<T> {
    match raw.get(name) {
        None => Ok(default),
        Some(value) => parse(value).map_err(|expected| ConfigError::InvalidOptionValue {
            name: name.to_string(),
            value: value.to_string(),
            expected,
        }),
    }
}

fn parse_target(value: &str) -> TargetPlatform {
    match value.trim() {
        "" | "native" | "host" => TargetPlatform::host(),
        triple => TargetPlatform::cross(triple),
    }
}

fn parse_bool(value: &str) -> std::result::Result<bool, &'static str> {
    const EXPECTED: &str = "true, false, yes, no, on, off, 1 or 0";
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(EXPECTED),
    }
}

fn parse_optimize(value: &str) -> std::result::Result<OptimizeMode, &'static str> {
    match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
        "debug" => Ok(OptimizeMode::Debug),
        "release-safe" => Ok(OptimizeMode::ReleaseSafe),
        "release-fast" => Ok(OptimizeMode::ReleaseFast),
        "release-small" => Ok(OptimizeMode::ReleaseSmall),
        _ => Err("debug, release-safe, release-fast or release-small"),
    }
}

fn parse_heap_mode(value: &str) -> std::result::Result<HeapMode, &'static str> {
    match value.trim().to_ascii_lowercase().as_str() {
        "stack" => Ok(HeapMode::Stack),
        "heap" => Ok(HeapMode::Heap),
        _ => Err("stack or heap"),
    }
}

fn parse_memory_access(value: &str) -> std::result::Result<Option<MemoryAccess>, &'static str> {
    match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
        "default" | "auto" => Ok(None),
        "byte-copy" | "0" => Ok(Some(MemoryAccess::ByteCopy)),
        "packed-struct" | "1" => Ok(Some(MemoryAccess::PackedStruct)),
        "direct-cast" | "2" => Ok(Some(MemoryAccess::DirectCast)),
        _ => Err("default, byte-copy, packed-struct or direct-cast"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_options_resolve_to_defaults() {
        let config = resolve(&RawOptions::new()).unwrap();
        assert_eq!(config, BuildConfiguration::default());
        assert!(config.build_static);
        assert!(config.build_shared);
        assert!(!config.strip);
        assert!(!config.ubsan);
        assert!(!config.tsan);
        assert!(!config.freestanding);
        assert_eq!(config.heap_mode, HeapMode::Stack);
        assert!(config.memory_access.is_none());
        assert!(config.platform.is_host());
    }

    #[test]
    fn every_option_is_read() {
        let raw = RawOptions::new()
            .with("target", "thumbv7em-none-eabihf")
            .with("optimize", "release-small")
            .with("static", "true")
            .with("shared", "no")
            .with("strip", "on")
            .with("ubsan", "1")
            .with("tsan", "TRUE")
            .with("freestanding", "yes")
            .with("heap-mode", "heap")
            .with("memory_access", "packed-struct");
        let config = resolve(&raw).unwrap();
        assert_eq!(
            config.platform,
            TargetPlatform::cross("thumbv7em-none-eabihf")
        );
        assert_eq!(config.optimize, OptimizeMode::ReleaseSmall);
        assert!(config.build_static);
        assert!(!config.build_shared);
        assert!(config.strip);
        assert!(config.ubsan);
        assert!(config.tsan);
        assert!(config.freestanding);
        assert_eq!(config.heap_mode, HeapMode::Heap);
        assert_eq!(config.memory_access, Some(MemoryAccess::PackedStruct));
    }

    #[test]
    fn memory_access_numeric_and_default_spellings() {
        for (value, expected) in [
            ("0", Some(MemoryAccess::ByteCopy)),
            ("1", Some(MemoryAccess::PackedStruct)),
            ("2", Some(MemoryAccess::DirectCast)),
            ("direct_cast", Some(MemoryAccess::DirectCast)),
            ("default", None),
            ("auto", None),
        ] {
            let raw = RawOptions::new().with("memory_access", value);
            assert_eq!(resolve(&raw).unwrap().memory_access, expected, "{value}");
        }
    }

    #[test]
    fn invalid_enum_value_is_reported_with_name() {
        let raw = RawOptions::new().with("heap_mode", "pool");
        let err = resolve(&raw).unwrap_err();
        match err {
            ConfigError::InvalidOptionValue { name, value, .. } => {
                assert_eq!(name, "heap_mode");
                assert_eq!(value, "pool");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_bool_value_is_reported() {
        let raw = RawOptions::new().with("strip", "maybe");
        let err = resolve(&raw).unwrap_err();
        assert!(err.to_string().contains("strip"));
        assert!(err.to_string().contains("maybe"));
    }

    #[test]
    fn unknown_option_is_rejected() {
        let raw = RawOptions::new().with("lto", "true");
        assert!(matches!(
            resolve(&raw).unwrap_err(),
            ConfigError::UnknownOption { .. }
        ));
    }

    #[test]
    fn both_artifacts_disabled_still_resolves() {
        let raw = RawOptions::new().with("static", "false").with("shared", "false");
        let config = resolve(&raw).unwrap();
        assert!(!config.build_static);
        assert!(!config.build_shared);
    }

    #[test]
    fn assign_parses_key_value() {
        let mut raw = RawOptions::new();
        raw.assign("heap-mode = heap").unwrap();
        assert_eq!(raw.get("heap_mode"), Some("heap"));
        assert!(raw.assign("no-equals-sign").is_err());
        assert!(raw.assign("=value").is_err());
    }

    #[test]
    fn merged_prefers_overlay() {
        let base = RawOptions::new().with("strip", "false").with("ubsan", "true");
        let overlay = RawOptions::new().with("strip", "true");
        let merged = base.merged(&overlay);
        assert_eq!(merged.get("strip"), Some("true"));
        assert_eq!(merged.get("ubsan"), Some("true"));
    }

    #[test]
    fn native_target_spellings() {
        for value in ["native", "host", ""] {
            let raw = RawOptions::new().with("target", value);
            assert!(resolve(&raw).unwrap().platform.is_host());
        }
    }

    #[test]
    fn constants() {
        assert_eq!(HeapMode::Stack.constant(), 0);
        assert_eq!(HeapMode::Heap.constant(), 1);
        assert_eq!(MemoryAccess::ByteCopy.constant(), 0);
        assert_eq!(MemoryAccess::PackedStruct.constant(), 1);
        assert_eq!(MemoryAccess::DirectCast.constant(), 2);
    }

    #[test]
    fn display_lists_every_option() {
        let text = BuildConfiguration::default().to_string();
        assert!(text.contains("target=native"));
        assert!(text.contains("heap_mode=stack"));
        assert!(text.contains("memory_access=default"));
    }
}
