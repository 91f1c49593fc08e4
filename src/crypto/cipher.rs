//! AES-128-GCM encryption and decryption of individual vault strings.
//!
//! **Algorithm choice:** AES-128-GCM with a random 96-bit nonce per call.
//! The runtime loader that consumes `keys.txt` expects exactly this layout,
//! so the nonce and the authentication tag travel inside the base64 payload
//! rather than in separate fields.

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes128Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

/// Byte length of an AES-128 key (16 bytes = 128 bits).
pub const KEY_LEN: usize = 16;

/// Byte length of an AES-GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the GCM authentication tag (16 bytes = 128 bits).
pub const TAG_LEN: usize = 16;

/// Errors produced by the cipher layer.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The payload is not valid base64 or is too short to contain a nonce and tag.
    #[error("invalid payload: not base64(nonce || ciphertext || tag)")]
    InvalidPayload,

    /// The `KEY` record does not hex-decode to exactly [`KEY_LEN`] bytes.
    #[error("invalid key hex: expected {} lowercase hex characters", KEY_LEN * 2)]
    InvalidKeyHex,

    /// AES-GCM encryption or decryption failed (on decrypt: authentication rejected).
    #[error("aead operation failed")]
    AeadFailure,

    /// Decrypted bytes are not valid UTF-8.
    #[error("decrypted payload is not valid UTF-8")]
    InvalidUtf8,
}

/// The run-scoped vault key: 16 random bytes shared by every record in one
/// output file.
///
/// Held in memory only and written to the output as lowercase hex. The buffer
/// is zeroed on drop and `Debug` never prints key material.
pub struct VaultKey([u8; KEY_LEN]);

impl VaultKey {
    /// Generate a fresh key from the OS CSPRNG.
    ///
    /// Failure of the randomness source panics inside `fill_bytes`, which is
    /// the desired behavior for this tool: there is no run without a key.
    pub fn generate() -> Self {
        use aes_gcm::aead::rand_core::RngCore;
        let mut bytes = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Hex representation written to the `KEY` record (32 lowercase chars).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a key back from its hex representation.
    ///
    /// Inverse half of the `KEY` record; the runtime loader performs the same
    /// parse on its side of the file format.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyHex`] if `s` is not valid hex or does
    /// not decode to exactly [`KEY_LEN`] bytes.
    // Exercised by the end-to-end tests; kept here so both halves of the
    // key record format live in one place.
    #[allow(dead_code)]
    pub fn from_hex(s: &str) -> Result<Self, CipherError> {
        let bytes = hex::decode(s).map_err(|_| CipherError::InvalidKeyHex)?;
        let bytes: [u8; KEY_LEN] = bytes.try_into().map_err(|_| CipherError::InvalidKeyHex)?;
        Ok(Self(bytes))
    }
}

impl Drop for VaultKey {
    fn drop(&mut self) {
        // Zero the key material on drop.
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material — not even in debug builds.
        f.write_str("VaultKey([REDACTED])")
    }
}

/// Encrypt one plaintext string into its vault payload.
///
/// A random 96-bit nonce is generated per call via the OS CSPRNG, so two
/// encryptions of the same plaintext under the same key produce different
/// payloads. The returned string is `base64(nonce || ciphertext || tag)`.
///
/// # Errors
///
/// Returns [`CipherError::AeadFailure`] on an internal AEAD error (should be
/// unreachable with a valid key and nonce).
pub fn encrypt_value(plaintext: &str, key: &VaultKey) -> Result<String, CipherError> {
    let cipher = build_cipher(key);

    // Use OsRng for a cryptographically secure random nonce.
    use aes_gcm::aead::rand_core::RngCore;
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|_| CipherError::AeadFailure)?;

    let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    combined.extend_from_slice(&nonce_bytes);
    combined.extend_from_slice(&ciphertext);

    Ok(STANDARD.encode(combined))
}

/// Decrypt a vault payload back to its plaintext string.
///
/// This is the exact inverse the runtime loader implements: base64-decode,
/// split off the 12-byte nonce, open the rest (ciphertext + tag) with the
/// vault key, UTF-8 decode.
///
/// # Errors
///
/// Returns [`CipherError::InvalidPayload`] if the payload is not base64 or is
/// shorter than a nonce plus a tag, [`CipherError::AeadFailure`] if the
/// authentication tag rejects the ciphertext (wrong key or tampered data),
/// and [`CipherError::InvalidUtf8`] if the decrypted bytes are not UTF-8.
// Production code only encrypts; kept alongside encrypt_value so the payload
// format is defined in one place and the round-trip stays testable.
#[allow(dead_code)]
pub fn decrypt_value(payload: &str, key: &VaultKey) -> Result<String, CipherError> {
    let combined = STANDARD
        .decode(payload)
        .map_err(|_| CipherError::InvalidPayload)?;
    if combined.len() < NONCE_LEN + TAG_LEN {
        return Err(CipherError::InvalidPayload);
    }
    let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LEN);

    let cipher = build_cipher(key);
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| CipherError::AeadFailure)?;

    String::from_utf8(plaintext).map_err(|_| CipherError::InvalidUtf8)
}

fn build_cipher(key: &VaultKey) -> Aes128Gcm {
    // Key length is fixed by the type, so construction cannot fail.
    Aes128Gcm::new_from_slice(&key.0).expect("VaultKey is always KEY_LEN bytes")
}
