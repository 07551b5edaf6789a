//! Remark codec subsystem.
//!
//! # Data Flow
//! ```text
//! operator remark (plaintext) + encryption key (hex)
//!     → codec.rs (shape validation, key parsing)
//!     → ChaCha20-Poly1305 sealing with a random nonce
//!     → RemarkPayload (opaque bytes passed verbatim to the contract call)
//! ```
//!
//! # Design Decisions
//! - Pure transformation: no I/O, safe to run before any RPC connection
//! - Encryption is randomized; only `decode(encode(x)) == x` is guaranteed
//! - An empty remark encodes to an empty payload and never inspects the key

pub mod codec;

pub use codec::{
    decode, encode, EncryptionKey, RemarkError, RemarkPayload, MAX_PAYLOAD_BYTES,
    MAX_REMARK_CHARS,
};
