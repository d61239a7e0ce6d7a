//! Packed transaction records
//!
//! A packed record stores a transaction together with its confirming block
//! height and block time. Output display addresses are not stored; they
//! are re-derived from the descriptor bytes on every unpack.
//!
//! Layout (varint = canonical CompactSize, varbytes = varint length + bytes):
//!
//! ```text
//! height        u32 BE
//! block_time    i64 BE
//! txid          [u8; 32]
//! hex           varbytes
//! version       i32 LE
//! lock_time     u32 LE
//! vin count     varint
//!   txid        [u8; 32]
//!   vout        u32 LE
//!   script_sig  varbytes
//!   sequence    u32 LE
//!   flags       u8            bit 0: witness follows
//!   witness     varint count, varbytes per item
//! vout count    varint
//!   n           varint
//!   value       varbytes      big-endian magnitude, zero is empty
//!   script      varbytes
//! ```

use super::buffer::{RecordReader, RecordWriter};
use super::CodecError;
use crate::address::AddressCodec;
use crate::chain::{ChainError, ChainParams};
use crate::config::CodecConfig;
use crate::core::{AddrDesc, Transaction, Txid, Vin, Vout, TXID_LEN};
use bitflags::bitflags;
use num_bigint::BigUint;

// =============================================================================
// Constants
// =============================================================================

/// Default bound on any single length-prefixed field
pub const DEFAULT_MAX_FIELD_LEN: usize = 4_000_000;

/// Bytes taken by the fixed-width header (height, block time, txid)
const HEADER_LEN: usize = 4 + 8 + TXID_LEN;

/// Smallest encoded input: txid, vout, empty script_sig, sequence, flags
const MIN_VIN_LEN: usize = TXID_LEN + 4 + 1 + 4 + 1;

/// Smallest encoded output: n, empty value, empty script
const MIN_VOUT_LEN: usize = 3;

/// Smallest encoded witness item: empty varbytes
const MIN_WITNESS_ITEM_LEN: usize = 1;

/// Upper bound on list capacity reserved ahead of decoding
const MAX_PREALLOC: usize = 1024;

bitflags! {
    /// Per-input flags byte
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct InputFlags: u8 {
        const WITNESS = 0x01;
    }
}

// =============================================================================
// Transaction Codec
// =============================================================================

/// Packs and unpacks transactions for one network
#[derive(Debug, Clone)]
pub struct TxCodec {
    addresses: AddressCodec,
    max_field_len: usize,
}

impl TxCodec {
    pub fn new(params: ChainParams) -> Self {
        Self {
            addresses: AddressCodec::new(params),
            max_field_len: DEFAULT_MAX_FIELD_LEN,
        }
    }

    /// Create a codec for a built-in network
    pub fn for_network(network: &str) -> Result<Self, ChainError> {
        Ok(Self::new(crate::chain::get_chain_params(network)?))
    }

    /// Create a codec from configuration, resolving the network once
    pub fn from_config(config: &CodecConfig) -> Result<Self, ChainError> {
        Ok(Self::for_network(&config.network)?.with_max_field_len(config.max_field_len))
    }

    /// Override the bound on length-prefixed fields
    pub fn with_max_field_len(mut self, max_field_len: usize) -> Self {
        self.max_field_len = max_field_len;
        self
    }

    pub fn address_codec(&self) -> &AddressCodec {
        &self.addresses
    }

    pub fn params(&self) -> &ChainParams {
        self.addresses.params()
    }

    pub fn max_field_len(&self) -> usize {
        self.max_field_len
    }

    /// Serialize `tx` with its confirming height and block time
    ///
    /// The block time written is `block_time`, not `tx.block_time`.
    pub fn pack_tx(
        &self,
        tx: &Transaction,
        height: u32,
        block_time: i64,
    ) -> Result<Vec<u8>, CodecError> {
        let estimate = HEADER_LEN + tx.hex.len() + 64 * (tx.vin.len() + tx.vout.len());
        let mut w = RecordWriter::with_capacity(estimate);

        w.put_u32_be(height);
        w.put_i64_be(block_time);
        w.put_slice(tx.txid.as_bytes());
        self.put_field(&mut w, "hex", &tx.hex)?;
        w.put_i32_le(tx.version);
        w.put_u32_le(tx.lock_time);

        w.put_compact_size(tx.vin.len() as u64);
        for vin in &tx.vin {
            self.pack_vin(&mut w, vin)?;
        }

        w.put_compact_size(tx.vout.len() as u64);
        for vout in &tx.vout {
            w.put_compact_size(vout.n as u64);
            self.put_field(&mut w, "value", &value_to_bytes(&vout.value_sat))?;
            self.put_field(&mut w, "script_pub_key", vout.script_pub_key.as_bytes())?;
        }

        log::debug!(
            "Packed tx {} at height {}: {} inputs, {} outputs, {} bytes",
            tx.txid,
            height,
            tx.vin.len(),
            tx.vout.len(),
            w.len()
        );
        Ok(w.into_bytes())
    }

    /// Parse a packed record, returning the transaction and its height
    ///
    /// Output display addresses are resolved before returning. The input
    /// must be consumed exactly.
    pub fn unpack_tx(&self, data: &[u8]) -> Result<(Transaction, u32), CodecError> {
        let result = self.read_record(data);
        if let Err(CodecError::CorruptRecord(reason)) = &result {
            log::warn!("Rejected packed record of {} bytes: {}", data.len(), reason);
        }
        result
    }

    fn read_record(&self, data: &[u8]) -> Result<(Transaction, u32), CodecError> {
        let mut r = RecordReader::new(data, self.max_field_len);

        let height = r.read_u32_be("height")?;
        let block_time = r.read_i64_be("block_time")?;
        let txid = Txid::from_bytes(r.read_array::<TXID_LEN>("txid")?);
        let hex = r.read_var_bytes("hex")?;
        let version = r.read_i32_le("version")?;
        let lock_time = r.read_u32_le("lock_time")?;

        let vin_count = r.read_count("vin count", MIN_VIN_LEN)?;
        let mut vin = Vec::with_capacity(vin_count.min(MAX_PREALLOC));
        for _ in 0..vin_count {
            vin.push(unpack_vin(&mut r)?);
        }

        let vout_count = r.read_count("vout count", MIN_VOUT_LEN)?;
        let mut vout = Vec::with_capacity(vout_count.min(MAX_PREALLOC));
        for _ in 0..vout_count {
            let n = r.read_compact_size("vout n")?;
            let n = u32::try_from(n)
                .map_err(|_| CodecError::corrupt(format!("vout index {} out of range", n)))?;
            let value_sat = value_from_bytes(&r.read_var_bytes("value")?)?;
            let script_pub_key = AddrDesc::from(r.read_var_bytes("script_pub_key")?);
            vout.push(Vout::new(n, value_sat, script_pub_key));
        }

        r.finish()?;

        self.addresses.resolve_outputs(&mut vout)?;

        let tx = Transaction {
            txid,
            hex,
            version,
            lock_time,
            vin,
            vout,
            block_time,
        };
        log::debug!(
            "Unpacked tx {} at height {} from {} bytes",
            tx.txid,
            height,
            data.len()
        );
        Ok((tx, height))
    }

    fn pack_vin(&self, w: &mut RecordWriter, vin: &Vin) -> Result<(), CodecError> {
        w.put_slice(vin.txid.as_bytes());
        w.put_u32_le(vin.vout);
        self.put_field(w, "script_sig", &vin.script_sig)?;
        w.put_u32_le(vin.sequence);

        match &vin.witness {
            Some(stack) => {
                w.put_u8(InputFlags::WITNESS.bits());
                w.put_compact_size(stack.len() as u64);
                for item in stack {
                    self.put_field(w, "witness item", item)?;
                }
            }
            None => w.put_u8(InputFlags::empty().bits()),
        }
        Ok(())
    }

    fn put_field(
        &self,
        w: &mut RecordWriter,
        field: &'static str,
        bytes: &[u8],
    ) -> Result<(), CodecError> {
        if bytes.len() > self.max_field_len {
            return Err(CodecError::FieldTooLarge {
                field,
                len: bytes.len(),
                max: self.max_field_len,
            });
        }
        w.put_var_bytes(bytes);
        Ok(())
    }
}

fn unpack_vin(r: &mut RecordReader<'_>) -> Result<Vin, CodecError> {
    let txid = Txid::from_bytes(r.read_array::<TXID_LEN>("vin txid")?);
    let vout = r.read_u32_le("vin vout")?;
    let script_sig = r.read_var_bytes("script_sig")?;
    let sequence = r.read_u32_le("sequence")?;

    let raw_flags = r.read_u8("input flags")?;
    let flags = InputFlags::from_bits(raw_flags)
        .ok_or_else(|| CodecError::corrupt(format!("unknown input flags {:#04x}", raw_flags)))?;

    let witness = if flags.contains(InputFlags::WITNESS) {
        let count = r.read_count("witness count", MIN_WITNESS_ITEM_LEN)?;
        let mut stack = Vec::with_capacity(count.min(MAX_PREALLOC));
        for _ in 0..count {
            stack.push(r.read_var_bytes("witness item")?);
        }
        Some(stack)
    } else {
        None
    };

    Ok(Vin {
        txid,
        vout,
        script_sig,
        sequence,
        witness,
    })
}

/// Minimal big-endian magnitude; zero encodes as no bytes
fn value_to_bytes(value: &BigUint) -> Vec<u8> {
    if value.bits() == 0 {
        Vec::new()
    } else {
        value.to_bytes_be()
    }
}

fn value_from_bytes(bytes: &[u8]) -> Result<BigUint, CodecError> {
    if bytes.first() == Some(&0) {
        return Err(CodecError::corrupt("value has a leading zero byte"));
    }
    Ok(BigUint::from_bytes_be(bytes))
}

// =============================================================================
// Tests
// =============================================================================
