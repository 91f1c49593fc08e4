//! AES-128-GCM encryption primitives for vault records.
//!
//! This module is intentionally free of file and config dependencies.
//! It provides the key type and the encrypt/decrypt operations used by the
//! vault writer.
//!
//! # Payload format
//!
//! ```text
//! base64(nonce(12) || ciphertext || tag(16))
//! ```
//!
//! Standard base64 alphabet with padding. The nonce is generated fresh per
//! encryption call; the runtime loader splits the first 12 decoded bytes off
//! as the nonce and opens the remainder with the key from the `KEY` record.

pub mod cipher;

pub use cipher::{CipherError, VaultKey};
