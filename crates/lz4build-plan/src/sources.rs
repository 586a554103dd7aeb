//! Translation-unit selection.
//!
//! The base list is ordered so that the freestanding set is always a prefix
//! of the full set. New high-level files are appended, never inserted.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One compilable source file of the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TranslationUnit {
    /// Block compressor (`lz4.c`).
    Block,
    /// High-compression variant (`lz4hc.c`).
    HighCompression,
    /// xxHash, used internally for checksums (`xxhash.c`).
    XxHash,
    /// Frame/container format (`lz4frame.c`).
    Frame,
    /// `FILE*` stream wrapper (`lz4file.c`).
    File,
}

impl TranslationUnit {
    /// Every unit, in canonical build order.
    pub const ALL: [TranslationUnit; 5] = [
        TranslationUnit::Block,
        TranslationUnit::HighCompression,
        TranslationUnit::XxHash,
        TranslationUnit::Frame,
        TranslationUnit::File,
    ];

    /// Source file name inside the library directory.
    pub fn file_name(self) -> &'static str {
        match self {
            TranslationUnit::Block => "lz4.c",
            TranslationUnit::HighCompression => "lz4hc.c",
            TranslationUnit::XxHash => "xxhash.c",
            TranslationUnit::Frame => "lz4frame.c",
            TranslationUnit::File => "lz4file.c",
        }
    }

    /// Object file name produced for this unit.
    pub fn object_name(self) -> String {
        let stem = self.file_name().trim_end_matches(".c");
        format!("{stem}.o")
    }

    /// Whether the unit needs host buffered I/O or heap allocation.
    pub fn requires_libc(self) -> bool {
        matches!(self, TranslationUnit::Frame | TranslationUnit::File)
    }
}

impl fmt::Display for TranslationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Warnings and language pin shared by every build.
pub const WARNING_FLAGS: [&str; 12] = [
    "-std=c99",
    "-Wall",
    "-Wextra",
    "-Wcast-qual",
    "-Wcast-align",
    "-Wshadow",
    "-Wswitch-enum",
    "-Wdeclaration-after-statement",
    "-Wstrict-prototypes",
    "-Wundef",
    "-Wpointer-arith",
    "-Wstrict-aliasing=1",
];

/// Codegen flag added for libc-free builds.
pub const FREESTANDING_FLAG: &str = "-ffreestanding";

/// Ordered translation units and the base compiler flags that go with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SourceSet {
    pub units: Vec<TranslationUnit>,
    pub flags: Vec<String>,
    /// Whether the artifact links against the C library.
    pub link_libc: bool,
}

impl SourceSet {
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn contains(&self, unit: TranslationUnit) -> bool {
        self.units.contains(&unit)
    }

    /// Whether `self` is a strict, order-preserving prefix of `other`.
    pub fn is_strict_prefix_of(&self, other: &SourceSet) -> bool {
        self.units.len() < other.units.len() && other.units.starts_with(&self.units)
    }
}

/// Select the source set for a build.
pub fn select(freestanding: bool) -> SourceSet {
    let mut flags: Vec<String> = WARNING_FLAGS.iter().map(|f| f.to_string()).collect();
    let units: Vec<TranslationUnit> = if freestanding {
        flags.push(FREESTANDING_FLAG.to_string());
        TranslationUnit::ALL
            .iter()
            .copied()
            .take_while(|unit| !unit.requires_libc())
            .collect()
    } else {
        TranslationUnit::ALL.to_vec()
    };

    SourceSet {
        units,
        flags,
        link_libc: !freestanding,
    }
}
