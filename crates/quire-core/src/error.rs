// SPDX-License-Identifier: MIT
//
// Unified error types for Quire.

use thiserror::Error;

use crate::types::{PageId, SourceId};

/// Top-level error type for all Quire operations.
#[derive(Debug, Error)]
pub enum QuireError {
    // -- Source loading --
    /// A source document could not be parsed. Fatal to that one document;
    /// already-loaded sources are unaffected.
    #[error("corrupt or unreadable input: {0}")]
    CorruptInput(String),

    // -- Collection errors --
    /// An identity-keyed operation referenced an identity absent from the
    /// collection. Recoverable; signals a caller bug, not a session failure.
    #[error("page {0} not found in collection")]
    PageNotFound(PageId),

    /// The same identity was appended twice. Identities are minted fresh at
    /// construction, so this indicates an identity-minting bug.
    #[error("duplicate page identity {0}")]
    DuplicateIdentity(PageId),

    // -- Assembly errors --
    /// A referenced source document was released before assembly. The whole
    /// assembly attempt aborts; the collection is left unchanged.
    #[error("source {0} was released while still referenced")]
    StaleSource(SourceId),

    // -- Document errors --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("OCR failed: {0}")]
    OcrError(String),

    // -- Protection --
    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("decryption failed: {0}")]
    Decryption(String),

    // -- Remote conversion --
    #[error("office conversion failed: {0}")]
    Conversion(String),

    // -- I/O & serialization --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, QuireError>;
