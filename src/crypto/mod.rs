//! Cryptographic utilities for address handling
//!
//! This module provides:
//! - SHA-256 and double SHA-256 hashing
//! - HASH160 (RIPEMD-160 of SHA-256)
//! - Base58Check checksums

pub mod hash;

pub use hash::{checksum, double_sha256, hash160, sha256, CHECKSUM_LEN, HASH160_LEN};
