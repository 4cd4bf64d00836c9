// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Reversible token codec.
//!
//! Short plaintexts (an email address, a file id) are sealed into URL-safe
//! opaque tokens that only holders of the configured key can open. Used for
//! email verification links and download links.
//!
//! ## Token Layout
//!
//! ```text
//! base64url_unpadded( version (1) || nonce (12) || AES-256-GCM ciphertext+tag )
//! ```
//!
//! Every encoding draws a fresh nonce, so the same plaintext yields a new
//! token each time while each token still opens to exactly one plaintext.
//! Tokens carry no expiry.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64ct::{Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use sha2::Sha256;

const TOKEN_VERSION: u8 = 1;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const KEY_DERIVATION_LABEL: &[u8] = b"office-exchange/reversible-token/v1";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("token key material must not be empty")]
    EmptyKey,

    #[error("token is malformed")]
    Malformed,

    #[error("token version {0} is not supported")]
    UnsupportedVersion(u8),

    #[error("token could not be decrypted")]
    Decryption,

    #[error("token encryption failed")]
    Encryption,
}

/// Symmetric encode/decode of short strings.
///
/// Callers needing expiry must layer it on top of this trait.
pub trait ReversibleCodec: Send + Sync {
    fn encode(&self, plaintext: &str) -> Result<String, CodecError>;
    fn decode(&self, token: &str) -> Result<String, CodecError>;
}

/// AES-256-GCM implementation of [`ReversibleCodec`].
pub struct AesGcmCodec {
    cipher: Aes256Gcm,
}

impl AesGcmCodec {
    /// Build a codec from raw key material. The AES key is derived with
    /// HMAC-SHA256 so any non-empty secret can be used.
    pub fn new(key_material: &[u8]) -> Result<Self, CodecError> {
        if key_material.is_empty() {
            return Err(CodecError::EmptyKey);
        }

        let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(key_material)
            .map_err(|_| CodecError::EmptyKey)?;
        mac.update(KEY_DERIVATION_LABEL);
        let key = mac.finalize().into_bytes();

        let cipher = Aes256Gcm::new_from_slice(&key).map_err(|_| CodecError::EmptyKey)?;
        Ok(Self { cipher })
    }
}

impl ReversibleCodec for AesGcmCodec {
    fn encode(&self, plaintext: &str) -> Result<String, CodecError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| CodecError::Encryption)?;

        let mut sealed = Vec::with_capacity(1 + NONCE_LEN + ciphertext.len());
        sealed.push(TOKEN_VERSION);
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(Base64UrlUnpadded::encode_string(&sealed))
    }

    fn decode(&self, token: &str) -> Result<String, CodecError> {
        let sealed = Base64UrlUnpadded::decode_vec(token).map_err(|_| CodecError::Malformed)?;
        if sealed.len() < 1 + NONCE_LEN + TAG_LEN {
            return Err(CodecError::Malformed);
        }

        let (version, rest) = sealed.split_at(1);
        if version[0] != TOKEN_VERSION {
            return Err(CodecError::UnsupportedVersion(version[0]));
        }

        let (nonce, ciphertext) = rest.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CodecError::Decryption)?;

        String::from_utf8(plaintext).map_err(|_| CodecError::Malformed)
    }
}
