//! Per-network chain parameters
//!
//! Address version bytes and the segwit human-readable prefix differ per
//! network. A codec is bound to one [`ChainParams`] value for its lifetime;
//! there is no process-wide network switch.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Mainnet network name
pub const MAINNET: &str = "main";

/// Testnet network name
pub const TESTNET: &str = "test";

/// Regression test network name
pub const REGTEST: &str = "regtest";

/// Witness versions this codec generation can encode and decode
pub const WITNESS_V0: u8 = 0;

// =============================================================================
// Errors
// =============================================================================

/// Chain parameter lookup errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("Unknown network: {0}")]
    UnknownNetwork(String),
}

// =============================================================================
// Chain Parameters
// =============================================================================

/// Immutable constants describing one network's address formats
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainParams {
    /// Network identifier ("main", "test", ...)
    pub name: String,
    /// Base58Check version byte of P2PKH addresses
    pub pub_key_hash_addr_id: u8,
    /// Base58Check version byte of P2SH addresses
    pub script_hash_addr_id: u8,
    /// Human-readable part of segwit addresses
    pub bech32_hrp: String,
    /// Witness versions accepted when decoding segwit addresses
    #[serde(default = "default_witness_versions")]
    pub witness_versions: Vec<u8>,
}

fn default_witness_versions() -> Vec<u8> {
    vec![WITNESS_V0]
}

impl ChainParams {
    /// Audax mainnet
    pub fn mainnet() -> Self {
        Self {
            name: MAINNET.to_string(),
            pub_key_hash_addr_id: 23,
            script_hash_addr_id: 58,
            bech32_hrp: "bc".to_string(),
            witness_versions: default_witness_versions(),
        }
    }

    /// Audax testnet
    pub fn testnet() -> Self {
        Self {
            name: TESTNET.to_string(),
            pub_key_hash_addr_id: 111,
            script_hash_addr_id: 196,
            bech32_hrp: "tb".to_string(),
            witness_versions: default_witness_versions(),
        }
    }

    /// Local regression test network
    pub fn regtest() -> Self {
        Self {
            name: REGTEST.to_string(),
            pub_key_hash_addr_id: 111,
            script_hash_addr_id: 196,
            bech32_hrp: "bcrt".to_string(),
            witness_versions: default_witness_versions(),
        }
    }

    /// Whether segwit addresses of `version` are accepted on this network
    pub fn supports_witness_version(&self, version: u8) -> bool {
        self.witness_versions.contains(&version)
    }
}

/// Look up the built-in parameters for a network by name
pub fn get_chain_params(network: &str) -> Result<ChainParams, ChainError> {
    match network {
        MAINNET => Ok(ChainParams::mainnet()),
        TESTNET => Ok(ChainParams::testnet()),
        REGTEST => Ok(ChainParams::regtest()),
        other => Err(ChainError::UnknownNetwork(other.to_string())),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_networks() {
        let main = get_chain_params("main").unwrap();
        assert_eq!(main.pub_key_hash_addr_id, 0x17);
        assert_eq!(main.script_hash_addr_id, 0x3a);
        assert_eq!(main.bech32_hrp, "bc");

        assert_eq!(get_chain_params("test").unwrap().bech32_hrp, "tb");
        assert_eq!(get_chain_params("regtest").unwrap().bech32_hrp, "bcrt");
    }

    #[test]
    fn test_unknown_network() {
        let err = get_chain_params("signet").unwrap_err();
        assert_eq!(err, ChainError::UnknownNetwork("signet".to_string()));
        assert_eq!(err.to_string(), "Unknown network: signet");
    }

    #[test]
    fn test_lookup_is_deterministic() {
        assert_eq!(get_chain_params("main"), get_chain_params("main"));
    }

    #[test]
    fn test_witness_versions() {
        let params = ChainParams::mainnet();
        assert!(params.supports_witness_version(0));
        assert!(!params.supports_witness_version(1));
    }

    #[test]
    fn test_params_from_json_default_witness_versions() {
        let json = r#"{
            "name": "custom",
            "pub_key_hash_addr_id": 30,
            "script_hash_addr_id": 22,
            "bech32_hrp": "cu"
        }"#;
        let params: ChainParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.witness_versions, vec![WITNESS_V0]);
        assert_eq!(params.name, "custom");
    }
}
