// SPDX-License-Identifier: MIT
//
// Password protection — encrypt and decrypt whole documents.
//
// Protection uses lopdf's standard security handler with a 128-bit RC4 key
// (algorithm V2), granting print permission only. Unlocking requires the
// correct user or owner password and writes the document back without an
// /Encrypt dictionary.

use lopdf::encryption::{EncryptionState, EncryptionVersion, Permissions};
use lopdf::{Document, Object, StringFormat};
use quire_core::error::{QuireError, Result};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

/// Encrypt the document in `bytes` with `password` as both user and owner
/// password.
#[instrument(skip_all, fields(bytes_len = bytes.len()))]
pub fn protect(bytes: &[u8], password: &str) -> Result<Vec<u8>> {
    let mut doc = Document::load_mem(bytes)
        .map_err(|err| QuireError::CorruptInput(format!("failed to parse PDF: {err}")))?;
    if doc.is_encrypted() {
        return Err(QuireError::Encryption(
            "document is already password-protected".to_string(),
        ));
    }

    ensure_file_id(&mut doc, bytes);

    let version = EncryptionVersion::V2 {
        document: &doc,
        owner_password: password,
        user_password: password,
        key_length: 128,
        permissions: Permissions::PRINTABLE,
    };
    let state = EncryptionState::try_from(version)
        .map_err(|err| QuireError::Encryption(format!("cannot derive encryption keys: {err}")))?;
    doc.encrypt(&state)
        .map_err(|err| QuireError::Encryption(format!("cannot encrypt document: {err}")))?;

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|err| QuireError::PdfError(format!("failed to serialise protected PDF: {err}")))?;

    info!(output_bytes = output.len(), "document protected");
    Ok(output)
}

/// Key derivation for the standard security handler mixes in the trailer
/// file /ID, which is optional in an unencrypted document and absent from
/// most lopdf-written files. Derive one from the document content when
/// missing.
fn ensure_file_id(doc: &mut Document, bytes: &[u8]) {
    if doc.trailer.get(b"ID").is_ok() {
        return;
    }
    let digest = Sha256::digest(bytes);
    let half = |slice: &[u8]| Object::String(slice.to_vec(), StringFormat::Hexadecimal);
    doc.trailer.set(
        "ID",
        Object::Array(vec![half(&digest[..16]), half(&digest[16..])]),
    );
    debug!("derived trailer file /ID from document digest");
}

/// Decrypt the document in `bytes` and return it without password
/// protection. A wrong password surfaces as [`QuireError::Decryption`].
#[instrument(skip_all, fields(bytes_len = bytes.len()))]
pub fn unlock(bytes: &[u8], password: &str) -> Result<Vec<u8>> {
    let mut doc = Document::load_mem(bytes)
        .map_err(|err| QuireError::CorruptInput(format!("failed to parse PDF: {err}")))?;
    if !doc.is_encrypted() {
        return Err(QuireError::Decryption(
            "document is not password-protected".to_string(),
        ));
    }

    doc.decrypt(password)
        .map_err(|err| QuireError::Decryption(format!("cannot decrypt document: {err}")))?;

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|err| QuireError::PdfError(format!("failed to serialise unlocked PDF: {err}")))?;

    info!(output_bytes = output.len(), "document unlocked");
    Ok(output)
}
