//! Address <-> descriptor conversion for one network
//!
//! Decoding tries each [`AddressDecoder`] in a fixed order and takes the
//! first success; a decoder either yields a complete [`DecodedAddress`] or
//! rejects the string outright. Encoding dispatches on the classifier.

use super::{base58, segwit, AddressError};
use crate::chain::{get_chain_params, ChainError, ChainParams, WITNESS_V0};
use crate::core::script::{
    p2pk_pubkey, p2pkh_script, p2sh_script, template_payload, witness_v0_script,
};
use crate::core::{classify, format_nonstandard, AddrDesc, ScriptType, Vout};
use crate::crypto::{hash160, HASH160_LEN};

// =============================================================================
// Decoded Address
// =============================================================================

/// Destination recovered from an address string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedAddress {
    PubKeyHash([u8; HASH160_LEN]),
    ScriptHash([u8; HASH160_LEN]),
    /// Witness v0 program, 20 or 32 bytes
    WitnessV0(Vec<u8>),
}

impl DecodedAddress {
    /// Locking script paying to this destination
    pub fn to_addr_desc(&self) -> AddrDesc {
        match self {
            DecodedAddress::PubKeyHash(hash) => p2pkh_script(hash).into(),
            DecodedAddress::ScriptHash(hash) => p2sh_script(hash).into(),
            DecodedAddress::WitnessV0(program) => witness_v0_script(program).into(),
        }
    }

    pub fn script_type(&self) -> ScriptType {
        match self {
            DecodedAddress::PubKeyHash(_) => ScriptType::P2PKH,
            DecodedAddress::ScriptHash(_) => ScriptType::P2SH,
            DecodedAddress::WitnessV0(p) if p.len() == HASH160_LEN => ScriptType::P2WPKH,
            DecodedAddress::WitnessV0(_) => ScriptType::P2WSH,
        }
    }
}

// =============================================================================
// Decoder Strategies
// =============================================================================

/// One way of reading an address string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressDecoder {
    /// Base58Check with a network version byte
    Legacy,
    /// Bech32 witness v0
    Segwit,
}

impl AddressDecoder {
    /// Priority order used by [`AddressCodec`]
    pub const ORDER: [AddressDecoder; 2] = [AddressDecoder::Legacy, AddressDecoder::Segwit];

    /// Decode `address`, or `None` if this strategy rejects it
    pub fn decode(self, address: &str, params: &ChainParams) -> Option<DecodedAddress> {
        let result = match self {
            AddressDecoder::Legacy => decode_legacy(address, params),
            AddressDecoder::Segwit => decode_segwit(address, params),
        };
        match result {
            Ok(decoded) => Some(decoded),
            Err(reason) => {
                log::trace!("{:?} decoder rejected {}: {}", self, address, reason);
                None
            }
        }
    }
}

fn decode_legacy(address: &str, params: &ChainParams) -> Result<DecodedAddress, String> {
    let (version, payload) = base58::decode_check(address).map_err(|e| e.to_string())?;
    let hash: [u8; HASH160_LEN] = payload
        .try_into()
        .map_err(|p: Vec<u8>| format!("payload is {} bytes", p.len()))?;

    if version == params.pub_key_hash_addr_id {
        Ok(DecodedAddress::PubKeyHash(hash))
    } else if version == params.script_hash_addr_id {
        Ok(DecodedAddress::ScriptHash(hash))
    } else {
        Err(format!("unknown version byte {:#04x}", version))
    }
}

fn decode_segwit(address: &str, params: &ChainParams) -> Result<DecodedAddress, String> {
    let (version, program) =
        segwit::decode(address, &params.bech32_hrp).map_err(|e| e.to_string())?;

    if version != WITNESS_V0 || !params.supports_witness_version(version) {
        return Err(format!("unsupported witness version {}", version));
    }
    match program.len() {
        20 | 32 => Ok(DecodedAddress::WitnessV0(program)),
        len => Err(format!("invalid v0 program length {}", len)),
    }
}

// =============================================================================
// Address Codec
// =============================================================================

/// Address codec bound to one network for its lifetime
#[derive(Debug, Clone)]
pub struct AddressCodec {
    params: ChainParams,
}

impl AddressCodec {
    pub fn new(params: ChainParams) -> Self {
        Self { params }
    }

    /// Create a codec for a built-in network
    pub fn for_network(network: &str) -> Result<Self, ChainError> {
        Ok(Self::new(get_chain_params(network)?))
    }

    pub fn params(&self) -> &ChainParams {
        &self.params
    }

    /// Decode an address string into its destination
    pub fn decode_address(&self, address: &str) -> Result<DecodedAddress, AddressError> {
        AddressDecoder::ORDER
            .iter()
            .find_map(|decoder| decoder.decode(address, &self.params))
            .ok_or_else(|| AddressError::InvalidAddress(address.to_string()))
    }

    /// Locking script bytes for an address
    pub fn addr_desc_from_address(&self, address: &str) -> Result<AddrDesc, AddressError> {
        Ok(self.decode_address(address)?.to_addr_desc())
    }

    /// Display addresses for a descriptor
    ///
    /// The flag is true only when the descriptor is a spendable address
    /// template. Non-standard scripts yield one diagnostic string.
    pub fn addresses_from_addr_desc(
        &self,
        desc: &[u8],
    ) -> Result<(Vec<String>, bool), AddressError> {
        let script_type = classify(desc);
        let rendered = match script_type {
            ScriptType::P2PKH => {
                base58::encode_check(self.params.pub_key_hash_addr_id, payload(desc)?)
            }
            ScriptType::P2SH => {
                base58::encode_check(self.params.script_hash_addr_id, payload(desc)?)
            }
            ScriptType::P2WPKH | ScriptType::P2WSH => {
                segwit::encode_v0(&self.params.bech32_hrp, payload(desc)?)
                    .map_err(|e| AddressError::MalformedScript(e.to_string()))?
            }
            ScriptType::P2PK => {
                let pubkey = p2pk_pubkey(desc).ok_or_else(|| {
                    AddressError::MalformedScript("P2PK script without public key".to_string())
                })?;
                base58::encode_check(self.params.pub_key_hash_addr_id, &hash160(pubkey))
            }
            ScriptType::NonStandard => format_nonstandard(desc),
        };
        Ok((vec![rendered], script_type.is_address()))
    }

    /// Fill in display addresses of every output from its descriptor
    pub fn resolve_outputs(&self, outputs: &mut [Vout]) -> Result<(), AddressError> {
        for output in outputs.iter_mut() {
            let (addresses, is_address) =
                self.addresses_from_addr_desc(output.script_pub_key.as_bytes())?;
            output.addresses = addresses;
            output.is_address = is_address;
        }
        Ok(())
    }
}

fn payload(desc: &[u8]) -> Result<&[u8], AddressError> {
    template_payload(desc)
        .ok_or_else(|| AddressError::MalformedScript(hex::encode(desc)))
}

// =============================================================================
// Tests
// =============================================================================
