// SPDX-License-Identifier: MIT

pub mod convert_cmd;
pub mod img2pdf;
pub mod merge;
pub mod metadata_cmd;
pub mod organize;
pub mod split;
pub mod transform;

#[cfg(feature = "ocr")]
pub mod ocr_cmd;
