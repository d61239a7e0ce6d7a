//! Hashing utilities used by the address codec
//!
//! Provides the SHA-256 and RIPEMD-160 compositions Bitcoin-family
//! addresses are built from: double SHA-256 for Base58Check checksums
//! and HASH160 for public key hashes.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Length of a Base58Check checksum
pub const CHECKSUM_LEN: usize = 4;

/// Length of a HASH160 digest
pub const HASH160_LEN: usize = 20;

/// Computes SHA-256 hash of the input data
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(data));
    out
}

/// Computes double SHA-256 hash (SHA-256 of SHA-256)
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Computes RIPEMD-160 of SHA-256, the hash committed to by P2PKH outputs
pub fn hash160(data: &[u8]) -> [u8; HASH160_LEN] {
    let mut out = [0u8; HASH160_LEN];
    out.copy_from_slice(&Ripemd160::digest(sha256(data)));
    out
}

/// First four bytes of the double SHA-256 of `payload`
pub fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let hash = double_sha256(payload);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&hash[..CHECKSUM_LEN]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256() {
        let hash = sha256(b"hello world");
        assert_eq!(
            hex::encode(hash),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_double_sha256() {
        assert_eq!(double_sha256(b"hello world"), sha256(&sha256(b"hello world")));
    }

    #[test]
    fn test_hash160_of_compressed_key() {
        let pubkey =
            hex::decode("022c50dd67570ad857c78851706a58a50beb80433fe13ef596c843f2cba1df2bad")
                .unwrap();
        assert_eq!(
            hex::encode(hash160(&pubkey)),
            "7b56c6d93e9bb83016fa99fc98e22e6293e2d86e"
        );
    }

    #[test]
    fn test_checksum() {
        // version 0x17 + hash of AGhtPfzWXejd5SVnzUnSdzuXcEQb1qpKqg
        let payload = hex::decode("170a371554b9f5958e129f8f276987526e4e1b627f").unwrap();
        assert_eq!(hex::encode(checksum(&payload)), "b1acc0e7");
    }
}
