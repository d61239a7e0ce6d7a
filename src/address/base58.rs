//! Base58Check encoding of legacy addresses
//!
//! A legacy address is `base58(version || payload || checksum)` where the
//! checksum is the first four bytes of the double SHA-256 of
//! `version || payload`.

use crate::crypto::{checksum, CHECKSUM_LEN};
use thiserror::Error;

/// Base58Check decoding errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Base58Error {
    #[error("Invalid base58 string: {0}")]
    InvalidEncoding(String),
    #[error("Decoded data too short: {0} bytes")]
    TooShort(usize),
    #[error("Checksum mismatch")]
    BadChecksum,
}

/// Encode a versioned payload with a trailing checksum
pub fn encode_check(version: u8, payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(1 + payload.len() + CHECKSUM_LEN);
    data.push(version);
    data.extend_from_slice(payload);
    let check = checksum(&data);
    data.extend_from_slice(&check);
    bs58::encode(data).into_string()
}

/// Decode and verify a Base58Check string, returning version and payload
pub fn decode_check(s: &str) -> Result<(u8, Vec<u8>), Base58Error> {
    let data = bs58::decode(s)
        .into_vec()
        .map_err(|e| Base58Error::InvalidEncoding(e.to_string()))?;
    if data.len() < 1 + CHECKSUM_LEN {
        return Err(Base58Error::TooShort(data.len()));
    }

    let (body, check) = data.split_at(data.len() - CHECKSUM_LEN);
    if checksum(body) != check {
        return Err(Base58Error::BadChecksum);
    }
    Ok((body[0], body[1..].to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_check() {
        let hash = hex::decode("0a371554b9f5958e129f8f276987526e4e1b627f").unwrap();
        assert_eq!(encode_check(0x17, &hash), "AGhtPfzWXejd5SVnzUnSdzuXcEQb1qpKqg");
    }

    #[test]
    fn test_decode_check() {
        let (version, payload) = decode_check("QPWHQu9AAcRnvGeuj6guDkyQ5itkCpJtDE").unwrap();
        assert_eq!(version, 0x3a);
        assert_eq!(hex::encode(payload), "1fd45366a2ddcd66cc48ea7f535b449b2a80a761");
    }

    #[test]
    fn test_decode_check_errors() {
        // last character altered
        assert_eq!(
            decode_check("AGhtPfzWXejd5SVnzUnSdzuXcEQb1qpKqh"),
            Err(Base58Error::BadChecksum)
        );
        // '0' is not in the base58 alphabet
        assert!(matches!(
            decode_check("0GhtPfzWXejd5SVnzUnSdzuXcEQb1qpKqg"),
            Err(Base58Error::InvalidEncoding(_))
        ));
        assert_eq!(decode_check("1"), Err(Base58Error::TooShort(1)));
        assert_eq!(decode_check(""), Err(Base58Error::TooShort(0)));
    }
}
