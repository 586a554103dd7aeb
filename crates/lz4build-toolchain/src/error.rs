//! Toolchain errors.

use std::path::PathBuf;

/// Errors that can occur while checking sources or running the toolchain.
#[derive(Debug, thiserror::Error)]
pub enum ToolchainError {
    /// No LZ4 library directory under the given root.
    #[error("no LZ4 sources found at {} (expected lz4.h in it or in its lib/ directory)", root.display())]
    SourceTreeNotFound { root: PathBuf },

    /// The source tree lacks files the artifact needs.
    #[error("source tree {} is missing: {}", root.display(), missing.join(", "))]
    MissingSources { root: PathBuf, missing: Vec<String> },

    /// `lz4.h` does not carry parseable version macros.
    #[error("could not read the library version from {}", path.display())]
    VersionNotFound { path: PathBuf },

    /// The compiler driver does not take GCC-style command lines.
    #[error("{program} is an MSVC-style compiler driver; only GCC- and Clang-style drivers are supported")]
    UnsupportedCompiler { program: String },

    /// The target needs a toolchain whose command lines are not GCC-style.
    #[error("target {triple} requires an MSVC toolchain, which is not supported (use a *-windows-gnu triple)")]
    UnsupportedTarget { triple: String },

    /// A tool could not be started.
    #[error("failed to invoke {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// A tool ran and reported failure. `stderr` is passed through verbatim.
    #[error("{program} failed ({status}):\n{stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for toolchain operations.
pub type Result<T> = std::result::Result<T, ToolchainError>;
