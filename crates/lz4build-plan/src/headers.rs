//! Public header selection.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactKind;

/// A header of the upstream library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderId {
    /// `lz4.h`
    Block,
    /// `lz4hc.h`
    HighCompression,
    /// `lz4frame.h`
    Frame,
    /// `lz4file.h`
    File,
    /// `lz4frame_static.h`, exposing frame internals.
    FrameStatic,
}

impl HeaderId {
    pub const ALL: [HeaderId; 5] = [
        HeaderId::Block,
        HeaderId::HighCompression,
        HeaderId::Frame,
        HeaderId::File,
        HeaderId::FrameStatic,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            HeaderId::Block => "lz4.h",
            HeaderId::HighCompression => "lz4hc.h",
            HeaderId::Frame => "lz4frame.h",
            HeaderId::File => "lz4file.h",
            HeaderId::FrameStatic => "lz4frame_static.h",
        }
    }
}

impl fmt::Display for HeaderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Headers an artifact exports to its consumers.
///
/// The frame and file headers need the C library. The static-use header
/// exposes internals that are unsafe across a shared-library boundary, and it
/// includes the frame header, so it follows that header's availability too.
///
/// `lz4frame_static.h` is therefore narrower than "every static artifact": a
/// freestanding static artifact does not export it, because the
/// `lz4frame.h` it includes is not exported there.
pub fn exported_headers(kind: ArtifactKind, freestanding: bool) -> BTreeSet<HeaderId> {
    let mut headers = BTreeSet::from([HeaderId::Block, HeaderId::HighCompression]);
    if !freestanding {
        headers.insert(HeaderId::Frame);
        headers.insert(HeaderId::File);
        if kind == ArtifactKind::Static {
            headers.insert(HeaderId::FrameStatic);
        }
    }
    headers
}
