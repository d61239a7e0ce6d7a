//! Core transaction and script components
//!
//! This module contains the building blocks shared by the codecs:
//! - Transactions (inputs with witness, outputs with big-integer values)
//! - Script classification (P2PKH, P2SH, P2WPKH, P2WSH, P2PK)
//! - Address descriptors
//! - Display formatting of non-standard scripts

pub mod nonstandard;
pub mod script;
pub mod transaction;

pub use nonstandard::{format_nonstandard, op_return_payload, NONSTANDARD_MARKER};
pub use script::{classify, AddrDesc, ScriptType};
pub use transaction::{
    Transaction, Txid, TxidError, Vin, Vout, COINBASE_VOUT, SEQUENCE_FINAL, TXID_LEN,
};
