//! Remark validation and symmetric encryption.

use alloy::primitives::Bytes;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Maximum remark length in characters.
pub const MAX_REMARK_CHARS: usize = 120;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Upper bound on an encoded remark: nonce, worst-case UTF-8 body and tag.
pub const MAX_PAYLOAD_BYTES: usize = NONCE_LEN + MAX_REMARK_CHARS * 4 + TAG_LEN;

/// Accepted raw key lengths in bytes.
const KEY_LENGTHS: [usize; 2] = [16, 32];

/// Errors produced while encoding or decoding a remark.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemarkError {
    /// The plaintext failed shape or length validation.
    #[error("Invalid remark: {0}")]
    InvalidFormat(String),

    /// The encryption key is not valid hex or has the wrong length.
    #[error("Invalid encryption key: {0}")]
    InvalidKey(String),

    /// The payload could not be opened with the supplied key.
    #[error("Remark decryption failed: {0}")]
    DecryptionFailed(String),
}

/// Symmetric key used to seal remarks.
///
/// Parsed from a hex string of 16 or 32 bytes; the cipher key is the SHA-256
/// digest of the raw bytes. The key material is never printed.
#[derive(Clone)]
pub struct EncryptionKey {
    cipher_key: [u8; 32],
}

impl EncryptionKey {
    /// Parse a hex-encoded key (with or without `0x` prefix).
    pub fn parse(key_hex: &str) -> Result<Self, RemarkError> {
        let trimmed = key_hex.trim();
        let stripped = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if stripped.is_empty() {
            return Err(RemarkError::InvalidKey("key is empty".to_string()));
        }

        let raw = hex::decode(stripped)
            .map_err(|e| RemarkError::InvalidKey(format!("not valid hex: {}", e)))?;

        if !KEY_LENGTHS.contains(&raw.len()) {
            return Err(RemarkError::InvalidKey(format!(
                "expected 16 or 32 bytes, got {}",
                raw.len()
            )));
        }

        Ok(Self {
            cipher_key: Sha256::digest(&raw).into(),
        })
    }

    fn cipher(&self) -> ChaCha20Poly1305 {
        ChaCha20Poly1305::new(Key::from_slice(&self.cipher_key))
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EncryptionKey(<redacted>)")
    }
}

/// Encrypted remark exactly as it is submitted on-chain.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemarkPayload(Bytes);

impl RemarkPayload {
    /// Wrap bytes previously produced by [`encode`] (e.g. read back from chain).
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// Payload bytes.
    pub fn as_bytes(&self) -> &Bytes {
        &self.0
    }

    /// Consume into the raw bytes passed to the contract.
    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for RemarkPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn validate_plaintext(plaintext: &str) -> Result<(), RemarkError> {
    let chars = plaintext.chars().count();
    if chars > MAX_REMARK_CHARS {
        return Err(RemarkError::InvalidFormat(format!(
            "remark is {} characters, maximum is {}",
            chars, MAX_REMARK_CHARS
        )));
    }

    if let Some(c) = plaintext.chars().find(|c| c.is_control()) {
        return Err(RemarkError::InvalidFormat(format!(
            "remark contains control character {:?}",
            c
        )));
    }

    Ok(())
}

/// Validate and encrypt a remark.
///
/// An empty remark yields an empty payload and the key is not inspected.
pub fn encode(plaintext: &str, key_hex: &str) -> Result<RemarkPayload, RemarkError> {
    if plaintext.is_empty() {
        return Ok(RemarkPayload::default());
    }

    validate_plaintext(plaintext)?;
    let key = EncryptionKey::parse(key_hex)?;
    encode_with_key(plaintext, &key)
}

/// Encrypt an already validated remark with a parsed key.
pub fn encode_with_key(plaintext: &str, key: &EncryptionKey) -> Result<RemarkPayload, RemarkError> {
    validate_plaintext(plaintext)?;

    let nonce_bytes: [u8; NONCE_LEN] = rand::random();
    let sealed = key
        .cipher()
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
        .map_err(|_| RemarkError::InvalidFormat("remark could not be encrypted".to_string()))?;

    let mut payload = Vec::with_capacity(NONCE_LEN + sealed.len());
    payload.extend_from_slice(&nonce_bytes);
    payload.extend_from_slice(&sealed);

    if payload.len() > MAX_PAYLOAD_BYTES {
        return Err(RemarkError::InvalidFormat(format!(
            "encoded remark is {} bytes, maximum is {}",
            payload.len(),
            MAX_PAYLOAD_BYTES
        )));
    }

    Ok(RemarkPayload(payload.into()))
}

/// Decrypt a payload produced by [`encode`].
pub fn decode(payload: &RemarkPayload, key_hex: &str) -> Result<String, RemarkError> {
    if payload.is_empty() {
        return Ok(String::new());
    }

    let key = EncryptionKey::parse(key_hex)?;
    let bytes = payload.as_bytes();

    if bytes.len() < NONCE_LEN + TAG_LEN {
        return Err(RemarkError::DecryptionFailed(format!(
            "payload of {} bytes is shorter than nonce and tag",
            bytes.len()
        )));
    }

    let (nonce, sealed) = bytes.split_at(NONCE_LEN);
    let opened = key
        .cipher()
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map_err(|_| RemarkError::DecryptionFailed("wrong key or corrupted payload".to_string()))?;

    String::from_utf8(opened)
        .map_err(|e| RemarkError::DecryptionFailed(format!("plaintext is not UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_16: &str = "000102030405060708090a0b0c0d0e0f";
    const KEY_32: &str = "0x000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    #[test]
    fn test_encode_decode_recovers_plaintext() {
        for key in [KEY_16, KEY_32] {
            let payload = encode("hello", key).unwrap();
            assert_eq!(decode(&payload, key).unwrap(), "hello");
        }
    }

    #[test]
    fn test_unicode_remark_at_limit() {
        let remark: String = "é".repeat(MAX_REMARK_CHARS);
        let payload = encode(&remark, KEY_16).unwrap();
        assert!(payload.len() <= MAX_PAYLOAD_BYTES);
        assert_eq!(decode(&payload, KEY_16).unwrap(), remark);
    }

    #[test]
    fn test_encryption_is_randomized() {
        let a = encode("same text", KEY_16).unwrap();
        let b = encode("same text", KEY_16).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_remark_skips_key() {
        let payload = encode("", "not-a-key").unwrap();
        assert!(payload.is_empty());
        assert_eq!(decode(&payload, "not-a-key").unwrap(), "");
    }

    #[test]
    fn test_remark_too_long() {
        let remark = "a".repeat(MAX_REMARK_CHARS + 1);
        let err = encode(&remark, KEY_16).unwrap_err();
        assert!(matches!(err, RemarkError::InvalidFormat(_)));
        assert!(err.to_string().contains("121"));
    }

    #[test]
    fn test_control_characters_rejected() {
        let err = encode("line\nbreak", KEY_16).unwrap_err();
        assert!(matches!(err, RemarkError::InvalidFormat(_)));
    }

    #[test]
    fn test_invalid_keys() {
        assert!(matches!(encode("hi", "zz"), Err(RemarkError::InvalidKey(_))));
        assert!(matches!(encode("hi", "0x1234"), Err(RemarkError::InvalidKey(_))));
        assert!(matches!(encode("hi", ""), Err(RemarkError::InvalidKey(_))));
    }

    #[test]
    fn test_wrong_key_fails_to_decode() {
        let payload = encode("secret", KEY_16).unwrap();
        let other = "ffffffffffffffffffffffffffffffff";
        assert!(matches!(
            decode(&payload, other),
            Err(RemarkError::DecryptionFailed(_))
        ));
    }

    #[test]
    fn test_tampered_payload_fails() {
        let payload = encode("secret", KEY_16).unwrap();
        let mut bytes = payload.as_bytes().to_vec();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let tampered = RemarkPayload::from_bytes(bytes);
        assert!(decode(&tampered, KEY_16).is_err());
    }

    #[test]
    fn test_key_debug_is_redacted() {
        let key = EncryptionKey::parse(KEY_16).unwrap();
        assert_eq!(format!("{:?}", key), "EncryptionKey(<redacted>)");
    }
}
