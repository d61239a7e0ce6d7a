//! Address codec
//!
//! Converts between human-readable addresses and address descriptors
//! (raw output scripts):
//! - Base58Check legacy addresses (P2PKH, P2SH)
//! - Bech32 witness v0 addresses (P2WPKH, P2WSH)
//! - Diagnostic strings for scripts without an address

pub mod base58;
pub mod codec;
pub mod segwit;

use thiserror::Error;

pub use codec::{AddressCodec, AddressDecoder, DecodedAddress};

/// Address conversion errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Malformed script: {0}")]
    MalformedScript(String),
}
