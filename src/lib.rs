//! Audax Codec: address resolution and packed transaction storage
//!
//! This crate provides the pieces an Audax block indexer needs to store
//! confirmed transactions compactly and show them to users:
//! - Network parameters (main, test, regtest)
//! - Address descriptors and script classification
//! - Base58Check and Bech32 witness v0 address codecs
//! - Diagnostic rendering of OP_RETURN and other non-standard scripts
//! - A compact, self-delimiting binary record for transactions
//!
//! # Example
//!
//! ```rust
//! use audax_codec::address::AddressCodec;
//!
//! let codec = AddressCodec::for_network("main").unwrap();
//!
//! // Address to descriptor
//! let desc = codec
//!     .addr_desc_from_address("AT22iSw5YfCeikVQ7RUFGqSPBuhJosCXPr")
//!     .unwrap();
//! assert_eq!(desc.to_hex(), "76a9147b56c6d93e9bb83016fa99fc98e22e6293e2d86e88ac");
//!
//! // Descriptor back to display addresses
//! let (addresses, is_address) = codec.addresses_from_addr_desc(desc.as_bytes()).unwrap();
//! assert_eq!(addresses, vec!["AT22iSw5YfCeikVQ7RUFGqSPBuhJosCXPr".to_string()]);
//! assert!(is_address);
//! ```

pub mod address;
pub mod chain;
pub mod cli;
pub mod codec;
pub mod config;
pub mod core;
pub mod crypto;

// Re-export commonly used types
pub use address::{AddressCodec, AddressError, DecodedAddress};
pub use chain::{get_chain_params, ChainError, ChainParams};
pub use codec::{CodecError, TxCodec};
pub use config::{CodecConfig, ConfigError};
pub use core::{AddrDesc, ScriptType, Transaction, Txid, Vin, Vout};
