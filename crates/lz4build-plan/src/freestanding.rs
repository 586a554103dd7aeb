//! Byte-wise replacements for `memcpy`, `memset` and `memmove`.
//!
//! A freestanding build has no C library, so the library's own
//! `LZ4_memcpy`/`LZ4_memset`/`LZ4_memmove` hooks must be defined by the
//! build. Each primitive is rendered as a statement-like C macro.
//!
//! The `emulate_*` functions run the same algorithms over Rust byte buffers.
//! They are the executable model of the C text and must stay in lockstep
//! with it, in particular the overlap direction chosen by [`move_direction`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A memory primitive the library expects the build to provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemoryPrimitive {
    /// Non-overlapping copy.
    Copy,
    /// Fill.
    Set,
    /// Overlap-safe copy.
    Move,
}

impl MemoryPrimitive {
    pub const ALL: [MemoryPrimitive; 3] = [
        MemoryPrimitive::Copy,
        MemoryPrimitive::Set,
        MemoryPrimitive::Move,
    ];

    /// Macro name consumed by the library sources.
    pub fn macro_name(self) -> &'static str {
        match self {
            MemoryPrimitive::Copy => "LZ4_memcpy",
            MemoryPrimitive::Set => "LZ4_memset",
            MemoryPrimitive::Move => "LZ4_memmove",
        }
    }

    /// Macro parameter names.
    pub fn params(self) -> [&'static str; 3] {
        match self {
            MemoryPrimitive::Copy | MemoryPrimitive::Move => ["dst", "src", "size"],
            MemoryPrimitive::Set => ["p", "v", "s"],
        }
    }
}

impl fmt::Display for MemoryPrimitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MemoryPrimitive::Copy => "copy",
            MemoryPrimitive::Set => "set",
            MemoryPrimitive::Move => "move",
        })
    }
}

/// A function-like C macro definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroDefinition {
    pub name: String,
    pub params: Vec<String>,
    pub body: String,
}

impl MacroDefinition {
    /// `NAME(a,b,c)`, the left-hand side of the definition.
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, self.params.join(","))
    }

    /// Command-line form: `-DNAME(a,b,c)=body`.
    pub fn define_flag(&self) -> String {
        format!("-D{}={}", self.signature(), self.body)
    }

    /// Header form: `#define NAME(a, b, c) body`.
    pub fn header_line(&self) -> String {
        format!(
            "#define {}({}) {}",
            self.name,
            self.params.join(", "),
            self.body
        )
    }
}

/// Replacement definitions keyed by primitive.
///
/// Empty for hosted builds. When populated, every translation unit of an
/// artifact receives the same set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacroSet {
    definitions: BTreeMap<MemoryPrimitive, MacroDefinition>,
}

impl MacroSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn get(&self, primitive: MemoryPrimitive) -> Option<&MacroDefinition> {
        self.definitions.get(&primitive)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MemoryPrimitive, &MacroDefinition)> {
        self.definitions.iter().map(|(p, d)| (*p, d))
    }

    /// `-D` flags for every definition, in primitive order.
    pub fn define_flags(&self) -> Vec<String> {
        self.definitions.values().map(|d| d.define_flag()).collect()
    }

    /// Render the set as a standalone prelude header.
    pub fn to_header(&self) -> String {
        let mut out = String::new();
        out.push_str("/* Byte-wise memory primitives for freestanding LZ4 builds. */\n");
        out.push_str("#ifndef LZ4BUILD_FREESTANDING_H\n");
        out.push_str("#define LZ4BUILD_FREESTANDING_H\n\n");
        out.push_str("#include <stddef.h>\n");
        out.push_str("#include <stdint.h>\n\n");
        for def in self.definitions.values() {
            out.push_str(&def.header_line());
            out.push('\n');
        }
        out.push_str("\n#endif\n");
        out
    }
}

/// Build the replacement set for a freestanding build.
pub fn synthesize() -> MacroSet {
    let definitions = MemoryPrimitive::ALL
        .iter()
        .map(|&primitive| (primitive, definition(primitive)))
        .collect();
    MacroSet { definitions }
}

/// Macro definition for one primitive.
pub fn definition(primitive: MemoryPrimitive) -> MacroDefinition {
    let [a, b, c] = primitive.params();
    let body = match primitive {
        MemoryPrimitive::Copy => format!(
            "do {{ unsigned char* lz4b_d = (unsigned char*)({a}); \
             const unsigned char* lz4b_s = (const unsigned char*)({b}); \
             size_t lz4b_n = (size_t)({c}); size_t lz4b_i; \
             for (lz4b_i = 0; lz4b_i < lz4b_n; lz4b_i++) lz4b_d[lz4b_i] = lz4b_s[lz4b_i]; \
             }} while (0)"
        ),
        MemoryPrimitive::Set => format!(
            "do {{ unsigned char* lz4b_d = (unsigned char*)({a}); \
             unsigned char lz4b_v = (unsigned char)({b}); \
             size_t lz4b_n = (size_t)({c}); size_t lz4b_i; \
             for (lz4b_i = 0; lz4b_i < lz4b_n; lz4b_i++) lz4b_d[lz4b_i] = lz4b_v; \
             }} while (0)"
        ),
        // Destination after source: walk backward so every byte is read
        // before the overlapping write reaches it.
        MemoryPrimitive::Move => format!(
            "do {{ unsigned char* lz4b_d = (unsigned char*)({a}); \
             const unsigned char* lz4b_s = (const unsigned char*)({b}); \
             size_t lz4b_n = (size_t)({c}); \
             if ((uintptr_t)lz4b_d > (uintptr_t)lz4b_s) {{ \
             while (lz4b_n > 0) {{ lz4b_n--; lz4b_d[lz4b_n] = lz4b_s[lz4b_n]; }} \
             }} else {{ size_t lz4b_i; \
             for (lz4b_i = 0; lz4b_i < lz4b_n; lz4b_i++) lz4b_d[lz4b_i] = lz4b_s[lz4b_i]; \
             }} }} while (0)"
        ),
    };

    MacroDefinition {
        name: primitive.macro_name().to_string(),
        params: vec![a.to_string(), b.to_string(), c.to_string()],
        body,
    }
}

/// Iteration order of an overlap-safe move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Index `0` up to `n - 1`.
    Forward,
    /// Index `n - 1` down to `0`.
    Backward,
}

/// Direction used by `move` for the given destination and source addresses.
///
/// Equal addresses take the forward branch.
pub fn move_direction(dest: usize, src: usize) -> Direction {
    if dest > src {
        Direction::Backward
    } else {
        Direction::Forward
    }
}

/// Model of `copy`: `dest[i] = src[i]` for ascending `i` in `[0, n)`.
///
/// # Panics
///
/// Panics if either slice is shorter than `n`.
#[allow(clippy::needless_range_loop, clippy::manual_memcpy)]
pub fn emulate_copy(dest: &mut [u8], src: &[u8], n: usize) {
    for i in 0..n {
        dest[i] = src[i];
    }
}

/// Model of `set`: `dest[i] = value` for `i` in `[0, n)`.
///
/// # Panics
///
/// Panics if `dest` is shorter than `n`.
pub fn emulate_set(dest: &mut [u8], value: u8, n: usize) {
    for byte in &mut dest[..n] {
        *byte = value;
    }
}

/// Model of `move` within one buffer: moves `n` bytes from offset `src` to
/// offset `dest`, correct for any overlap.
///
/// # Panics
///
/// Panics if either range extends past the end of `buf`.
pub fn emulate_move(buf: &mut [u8], dest: usize, src: usize, n: usize) {
    match move_direction(dest, src) {
        Direction::Backward => {
            for i in (0..n).rev() {
                buf[dest + i] = buf[src + i];
            }
        }
        Direction::Forward => {
            for i in 0..n {
                buf[dest + i] = buf[src + i];
            }
        }
    }
}
