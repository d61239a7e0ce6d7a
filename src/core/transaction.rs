//! Transaction model as supplied by the node RPC layer
//!
//! Mirrors the fields the indexer persists: inputs keep their raw
//! unlocking script and witness, outputs keep their descriptor bytes and an
//! arbitrary-precision value. Display addresses on outputs are derived data
//! and are filled in by the address codec.

use super::script::AddrDesc;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Length of a transaction id in bytes
pub const TXID_LEN: usize = 32;

/// Sequence number that disables locktime
pub const SEQUENCE_FINAL: u32 = 0xFFFFFFFF;

/// Previous output index used by coinbase inputs
pub const COINBASE_VOUT: u32 = 0xFFFFFFFF;

// =============================================================================
// Errors
// =============================================================================

/// Transaction id parse errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TxidError {
    #[error("Invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("Invalid txid length: expected 32 bytes, got {0}")]
    InvalidLength(usize),
}

// =============================================================================
// Txid
// =============================================================================

/// 32-byte transaction id, kept in the byte order of its hex form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Txid([u8; TXID_LEN]);

impl Txid {
    pub const fn from_bytes(bytes: [u8; TXID_LEN]) -> Self {
        Txid(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; TXID_LEN] {
        &self.0
    }

    /// All-zero id referenced by coinbase inputs
    pub fn is_null(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }
}

impl fmt::Display for Txid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for Txid {
    type Err = TxidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        let len = bytes.len();
        let array: [u8; TXID_LEN] = bytes.try_into().map_err(|_| TxidError::InvalidLength(len))?;
        Ok(Txid(array))
    }
}

impl Serialize for Txid {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Txid {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Transaction Input
// =============================================================================

/// Transaction input (reference to previous output)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vin {
    /// Id of the transaction holding the spent output
    pub txid: Txid,
    /// Index of the spent output
    pub vout: u32,
    /// Unlocking script, uninterpreted
    #[serde(with = "hex_bytes")]
    pub script_sig: Vec<u8>,
    pub sequence: u32,
    /// Witness stack; `None` when the input carries no witness at all
    #[serde(default, with = "hex_stack", skip_serializing_if = "Option::is_none")]
    pub witness: Option<Vec<Vec<u8>>>,
}

impl Vin {
    /// Create an input without witness data
    pub fn new(txid: Txid, vout: u32, script_sig: Vec<u8>, sequence: u32) -> Self {
        Self {
            txid,
            vout,
            script_sig,
            sequence,
            witness: None,
        }
    }

    /// Attach a witness stack
    pub fn with_witness(mut self, witness: Vec<Vec<u8>>) -> Self {
        self.witness = Some(witness);
        self
    }

    /// Coinbase inputs spend the null outpoint
    pub fn is_coinbase(&self) -> bool {
        self.txid.is_null() && self.vout == COINBASE_VOUT
    }
}

// =============================================================================
// Transaction Output
// =============================================================================

/// Transaction output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vout {
    /// Value in satoshi-equivalent units
    #[serde(with = "decimal")]
    pub value_sat: BigUint,
    /// Position in the transaction's output list
    pub n: u32,
    /// Locking script
    pub script_pub_key: AddrDesc,
    /// Display addresses derived from `script_pub_key`
    #[serde(default)]
    pub addresses: Vec<String>,
    /// Whether `addresses` holds a real address rather than a diagnostic string
    #[serde(default)]
    pub is_address: bool,
}

impl Vout {
    /// Create an output with unresolved display data
    pub fn new(n: u32, value_sat: BigUint, script_pub_key: AddrDesc) -> Self {
        Self {
            value_sat,
            n,
            script_pub_key,
            addresses: Vec::new(),
            is_address: false,
        }
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A confirmed transaction as handled by the indexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub txid: Txid,
    /// Raw serialized transaction as returned by the node, may be empty
    #[serde(default, with = "hex_bytes")]
    pub hex: Vec<u8>,
    pub version: i32,
    pub lock_time: u32,
    pub vin: Vec<Vin>,
    pub vout: Vec<Vout>,
    /// Unix time of the confirming block
    pub block_time: i64,
}

impl Transaction {
    /// Sum of all output values
    pub fn total_output(&self) -> BigUint {
        self.vout.iter().map(|o| &o.value_sat).sum()
    }

    /// Whether the first input spends the null outpoint
    pub fn is_coinbase(&self) -> bool {
        self.vin.len() == 1 && self.vin[0].is_coinbase()
    }

    /// Whether any input carries a witness stack
    pub fn has_witness(&self) -> bool {
        self.vin.iter().any(|i| i.witness.is_some())
    }
}

// =============================================================================
// Serde helpers
// =============================================================================

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}

mod hex_stack {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        stack: &Option<Vec<Vec<u8>>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        stack
            .as_ref()
            .map(|items| items.iter().map(hex::encode).collect::<Vec<_>>())
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<Vec<u8>>>, D::Error> {
        let items: Option<Vec<String>> = Option::deserialize(deserializer)?;
        items
            .map(|items| {
                items
                    .iter()
                    .map(|s| hex::decode(s).map_err(serde::de::Error::custom))
                    .collect()
            })
            .transpose()
    }
}

/// Values travel as decimal strings so no JSON consumer parses them as floats
mod decimal {
    use num_bigint::BigUint;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Tests
// =============================================================================
