//! Output script classification
//!
//! Recognizes the fixed Bitcoin output templates by their exact byte
//! layout. Classification is total: any byte string maps to exactly one
//! [`ScriptType`], and the result never depends on the network.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Opcodes
// =============================================================================

pub const OP_0: u8 = 0x00;
pub const OP_PUSHBYTES_20: u8 = 0x14;
pub const OP_PUSHBYTES_32: u8 = 0x20;
pub const OP_PUSHBYTES_33: u8 = 0x21;
pub const OP_PUSHBYTES_65: u8 = 0x41;
pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_PUSHDATA4: u8 = 0x4e;
pub const OP_RETURN: u8 = 0x6a;
pub const OP_DUP: u8 = 0x76;
pub const OP_EQUAL: u8 = 0x87;
pub const OP_EQUALVERIFY: u8 = 0x88;
pub const OP_HASH160: u8 = 0xa9;
pub const OP_CHECKSIG: u8 = 0xac;

/// OP_DUP OP_HASH160 <20> OP_EQUALVERIFY OP_CHECKSIG
pub const P2PKH_LEN: usize = 25;
/// OP_HASH160 <20> OP_EQUAL
pub const P2SH_LEN: usize = 23;
/// OP_0 <20>
pub const P2WPKH_LEN: usize = 22;
/// OP_0 <32>
pub const P2WSH_LEN: usize = 34;

// =============================================================================
// Script Types
// =============================================================================

/// Template an output script matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptType {
    /// Pay to Public Key Hash
    P2PKH,
    /// Pay to Script Hash
    P2SH,
    /// Pay to Witness Public Key Hash (witness v0, 20-byte program)
    P2WPKH,
    /// Pay to Witness Script Hash (witness v0, 32-byte program)
    P2WSH,
    /// Bare public key followed by OP_CHECKSIG
    P2PK,
    /// Anything else, including OP_RETURN data carriers
    NonStandard,
}

impl ScriptType {
    /// Whether outputs of this type have a spendable address of their own
    pub fn is_address(&self) -> bool {
        matches!(
            self,
            ScriptType::P2PKH | ScriptType::P2SH | ScriptType::P2WPKH | ScriptType::P2WSH
        )
    }

    /// Whether this is a witness v0 template
    pub fn is_segwit(&self) -> bool {
        matches!(self, ScriptType::P2WPKH | ScriptType::P2WSH)
    }

    /// Get the script type name
    pub fn name(&self) -> &'static str {
        match self {
            ScriptType::P2PKH => "P2PKH",
            ScriptType::P2SH => "P2SH",
            ScriptType::P2WPKH => "P2WPKH",
            ScriptType::P2WSH => "P2WSH",
            ScriptType::P2PK => "P2PK",
            ScriptType::NonStandard => "NonStandard",
        }
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify an output script. First matching template wins.
pub fn classify(script: &[u8]) -> ScriptType {
    if is_p2pkh(script) {
        ScriptType::P2PKH
    } else if is_p2sh(script) {
        ScriptType::P2SH
    } else if is_p2wpkh(script) {
        ScriptType::P2WPKH
    } else if is_p2wsh(script) {
        ScriptType::P2WSH
    } else if p2pk_pubkey(script).is_some() {
        ScriptType::P2PK
    } else {
        ScriptType::NonStandard
    }
}

fn is_p2pkh(script: &[u8]) -> bool {
    script.len() == P2PKH_LEN
        && script[0] == OP_DUP
        && script[1] == OP_HASH160
        && script[2] == OP_PUSHBYTES_20
        && script[23] == OP_EQUALVERIFY
        && script[24] == OP_CHECKSIG
}

fn is_p2sh(script: &[u8]) -> bool {
    script.len() == P2SH_LEN
        && script[0] == OP_HASH160
        && script[1] == OP_PUSHBYTES_20
        && script[22] == OP_EQUAL
}

fn is_p2wpkh(script: &[u8]) -> bool {
    script.len() == P2WPKH_LEN && script[0] == OP_0 && script[1] == OP_PUSHBYTES_20
}

fn is_p2wsh(script: &[u8]) -> bool {
    script.len() == P2WSH_LEN && script[0] == OP_0 && script[1] == OP_PUSHBYTES_32
}

/// Public key pushed by a P2PK script, if the script is one
pub fn p2pk_pubkey(script: &[u8]) -> Option<&[u8]> {
    match script {
        [OP_PUSHBYTES_33, key @ .., OP_CHECKSIG]
            if key.len() == 33 && matches!(key[0], 0x02 | 0x03) =>
        {
            Some(key)
        }
        [OP_PUSHBYTES_65, key @ .., OP_CHECKSIG] if key.len() == 65 && key[0] == 0x04 => Some(key),
        _ => None,
    }
}

/// Hash or witness program committed to by a standard template
///
/// Returns `None` for P2PK and non-standard scripts.
pub fn template_payload(script: &[u8]) -> Option<&[u8]> {
    match classify(script) {
        ScriptType::P2PKH => Some(&script[3..23]),
        ScriptType::P2SH => Some(&script[2..22]),
        ScriptType::P2WPKH | ScriptType::P2WSH => Some(&script[2..]),
        ScriptType::P2PK | ScriptType::NonStandard => None,
    }
}

// =============================================================================
// Script Builders
// =============================================================================

/// Build a P2PKH script for a 20-byte public key hash
pub fn p2pkh_script(hash: &[u8; 20]) -> Vec<u8> {
    let mut script = Vec::with_capacity(P2PKH_LEN);
    script.extend_from_slice(&[OP_DUP, OP_HASH160, OP_PUSHBYTES_20]);
    script.extend_from_slice(hash);
    script.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
    script
}

/// Build a P2SH script for a 20-byte script hash
pub fn p2sh_script(hash: &[u8; 20]) -> Vec<u8> {
    let mut script = Vec::with_capacity(P2SH_LEN);
    script.extend_from_slice(&[OP_HASH160, OP_PUSHBYTES_20]);
    script.extend_from_slice(hash);
    script.push(OP_EQUAL);
    script
}

/// Build a witness v0 script (`OP_0 <program>`)
///
/// The program must be 20 or 32 bytes for the result to classify as
/// P2WPKH or P2WSH.
pub fn witness_v0_script(program: &[u8]) -> Vec<u8> {
    let mut script = Vec::with_capacity(2 + program.len());
    script.push(OP_0);
    script.push(program.len() as u8);
    script.extend_from_slice(program);
    script
}

// =============================================================================
// Address Descriptor
// =============================================================================

/// Canonical identity of an output destination: the raw `scriptPubKey` bytes
///
/// Descriptors are network independent and immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AddrDesc(Vec<u8>);

impl AddrDesc {
    /// Raw script bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the descriptor, returning the script bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Template this descriptor matches
    pub fn script_type(&self) -> ScriptType {
        classify(&self.0)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl From<Vec<u8>> for AddrDesc {
    fn from(script: Vec<u8>) -> Self {
        AddrDesc(script)
    }
}

impl From<&[u8]> for AddrDesc {
    fn from(script: &[u8]) -> Self {
        AddrDesc(script.to_vec())
    }
}

impl AsRef<[u8]> for AddrDesc {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for AddrDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for AddrDesc {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex::decode(s).map(AddrDesc)
    }
}

impl Serialize for AddrDesc {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for AddrDesc {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Tests
// =============================================================================
