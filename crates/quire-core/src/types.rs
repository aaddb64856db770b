// SPDX-License-Identifier: MIT
//
// Core domain types for the Quire document toolbox.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity of one page reference.
///
/// Minted once when the reference is created and never reused or recomputed.
/// This is the only handle callers may retain across reorders — positional
/// indices are invalidated by every move or delete, identities never are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageId(pub Uuid);

impl PageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a loaded source document.
///
/// Page references carry a `SourceId` rather than a live handle, so a source
/// can be released while references into it still exist; such references are
/// detected as stale at assembly time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceId(pub Uuid);

impl SourceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SourceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Presentation rotation of a page, in quarter turns.
///
/// Rotations compose additively modulo 360 and form a group of order four;
/// rotating four times by 90 degrees is the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    /// Build from a degree value. Any multiple of 90 is accepted, including
    /// negative values; anything else returns `None`.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        if degrees % 90 != 0 {
            return None;
        }
        Some(match degrees.rem_euclid(360) {
            0 => Self::R0,
            90 => Self::R90,
            180 => Self::R180,
            270 => Self::R270,
            _ => unreachable!("rem_euclid(360) of a multiple of 90"),
        })
    }

    /// Degree value in [0, 360).
    pub fn degrees(&self) -> i32 {
        match self {
            Self::R0 => 0,
            Self::R90 => 90,
            Self::R180 => 180,
            Self::R270 => 270,
        }
    }

    /// Compose with a delta (any multiple of 90, typically 90, -90, or 180).
    ///
    /// Deltas that are not multiples of 90 are ignored and `self` is returned
    /// unchanged; the caller validated the delta when it was produced.
    pub fn rotated_by(self, delta: i32) -> Self {
        Self::from_degrees(self.degrees() + delta).unwrap_or(self)
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::R0
    }
}

/// Supported input document kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputKind {
    Pdf,
    Jpeg,
    Png,
    Tiff,
    /// Word processing document (DOC/DOCX) — requires remote conversion.
    Word,
    /// Spreadsheet (XLS/XLSX) — requires remote conversion.
    Spreadsheet,
    /// Presentation (PPT/PPTX) — requires remote conversion.
    Presentation,
}

impl InputKind {
    /// MIME type used for upload content negotiation.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Tiff => "image/tiff",
            Self::Word => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            Self::Presentation => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
        }
    }

    /// Infer the kind from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "tif" | "tiff" => Some(Self::Tiff),
            "doc" | "docx" | "odt" => Some(Self::Word),
            "xls" | "xlsx" | "ods" => Some(Self::Spreadsheet),
            "ppt" | "pptx" | "odp" => Some(Self::Presentation),
            _ => None,
        }
    }

    /// Whether this kind is already in the native page-container format.
    ///
    /// Non-native kinds must go through the remote conversion collaborator
    /// before any page reference can be created from them.
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Pdf)
    }

    /// Whether this kind is a raster image, handled by local composition
    /// rather than remote office conversion.
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Jpeg | Self::Png | Self::Tiff)
    }
}

/// Office formats a native document can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportKind {
    /// Word processing document (DOCX).
    Word,
    /// Presentation (PPTX).
    Presentation,
}

impl ExportKind {
    /// MIME type of the exported document.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Word => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Presentation => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
        }
    }

    /// Conventional file extension of the exported document.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Word => "docx",
            Self::Presentation => "pptx",
        }
    }
}
