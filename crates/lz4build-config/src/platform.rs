//! Target platform descriptor and optimization mode.
//!
//! Both are pass-through values for the toolchain. The only thing derived
//! here is the operating-system family, which decides artifact file names.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operating-system family of the target, derived from the triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OsFamily {
    /// Linux, BSDs, and other ELF-based Unix systems.
    Unix,
    /// macOS, iOS and other Mach-O systems.
    Darwin,
    Windows,
    /// No operating system (`*-none-*`, `*-unknown-elf`).
    None,
}

/// The platform a build targets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TargetPlatform {
    /// Target triple, or `None` for the host.
    pub triple: Option<String>,
}

impl TargetPlatform {
    /// The host platform.
    pub fn host() -> Self {
        Self { triple: None }
    }

    /// A cross target identified by its triple.
    pub fn cross(triple: impl Into<String>) -> Self {
        Self {
            triple: Some(triple.into()),
        }
    }

    /// Whether this is the host platform.
    pub fn is_host(&self) -> bool {
        self.triple.is_none()
    }

    /// Operating-system family of the target.
    pub fn os_family(&self) -> OsFamily {
        match self.triple.as_deref() {
            Some(triple) => os_family_of(triple),
            None => host_os_family(),
        }
    }

    /// File name of the static archive for a library called `name`.
    pub fn static_library_name(&self, name: &str) -> String {
        match self.os_family() {
            OsFamily::Windows => format!("{name}.lib"),
            _ => format!("lib{name}.a"),
        }
    }

    /// File name of the shared object for a library called `name`.
    pub fn shared_library_name(&self, name: &str) -> String {
        match self.os_family() {
            OsFamily::Windows => format!("{name}.dll"),
            OsFamily::Darwin => format!("lib{name}.dylib"),
            _ => format!("lib{name}.so"),
        }
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.triple {
            Some(triple) => write!(f, "{triple}"),
            None => write!(f, "native"),
        }
    }
}

fn os_family_of(triple: &str) -> OsFamily {
    if triple.contains("windows") {
        OsFamily::Windows
    } else if triple.contains("apple") || triple.contains("darwin") {
        OsFamily::Darwin
    } else if triple.contains("-none") || triple.ends_with("-elf") || triple.ends_with("-eabi") {
        OsFamily::None
    } else {
        OsFamily::Unix
    }
}

fn host_os_family() -> OsFamily {
    if cfg!(windows) {
        OsFamily::Windows
    } else if cfg!(target_vendor = "apple") {
        OsFamily::Darwin
    } else {
        OsFamily::Unix
    }
}

/// Optimization mode forwarded to the C compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptimizeMode {
    /// No optimization (`-O0`).
    Debug,
    /// Optimized with safety checks kept (`-O2`).
    ReleaseSafe,
    /// Maximum speed (`-O3`).
    #[default]
    ReleaseFast,
    /// Minimal size (`-Os`).
    ReleaseSmall,
}

impl OptimizeMode {
    /// The compiler flag for this mode.
    pub fn cc_flag(self) -> &'static str {
        match self {
            OptimizeMode::Debug => "-O0",
            OptimizeMode::ReleaseSafe => "-O2",
            OptimizeMode::ReleaseFast => "-O3",
            OptimizeMode::ReleaseSmall => "-Os",
        }
    }

    /// Option spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            OptimizeMode::Debug => "debug",
            OptimizeMode::ReleaseSafe => "release-safe",
            OptimizeMode::ReleaseFast => "release-fast",
            OptimizeMode::ReleaseSmall => "release-small",
        }
    }
}

impl fmt::Display for OptimizeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
