//! Build option model and configuration resolution for lz4build.
//!
//! Turns raw, possibly-absent option values into an immutable
//! [`BuildConfiguration`]:
//! - **Platform:** target triple and optimization mode, passed through to the toolchain
//! - **Options:** linkage, stripping, sanitizers, freestanding, buffer placement, memory access
//! - **Parsing:** TOML option tables

pub mod error;
pub mod options;
pub mod parse;
pub mod platform;

pub use error::{ConfigError, Result};
pub use options::{resolve, BuildConfiguration, HeapMode, MemoryAccess, RawOptions};
pub use platform::{OptimizeMode, OsFamily, TargetPlatform};
