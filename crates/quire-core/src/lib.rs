// SPDX-License-Identifier: MIT
//
// quire-core — Shared types, errors, and configuration for the Quire
// document toolbox.

pub mod config;
pub mod error;
pub mod fingerprint;
pub mod types;

pub use config::QuireConfig;
pub use error::QuireError;
pub use types::*;
