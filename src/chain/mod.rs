//! Chain parameter provider
//!
//! Supplies the immutable per-network constants the address codec is
//! parameterized by.

pub mod params;

pub use params::{get_chain_params, ChainError, ChainParams, MAINNET, REGTEST, TESTNET, WITNESS_V0};
