//! Turns artifact descriptors into C compiler and archiver invocations.
//!
//! Checks the upstream source tree, renders per-unit compile commands plus
//! the final archive or link step, runs them, and writes a header manifest
//! beside each artifact.

pub mod command;
pub mod error;
pub mod manifest;
pub mod run;
pub mod tree;

pub use command::{render, CommandPlan, CompilerFamily, Step, TargetTools, ToolCommand, Toolchain};
pub use error::{Result, ToolchainError};
pub use manifest::{read_header_manifest, write_header_manifest, HeaderManifest};
pub use run::{build_artifact, execute, probe, BuiltArtifact};
pub use tree::{parse_version, SourceTree};
