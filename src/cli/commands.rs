//! CLI commands for the codec
//!
//! Implements all command handlers for the CLI interface.

use crate::codec::TxCodec;
use crate::config::CodecConfig;
use crate::core::{classify, Transaction};
use std::fs;
use std::path::Path;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Build the codec from an optional config file and network override
pub fn build_codec(network: Option<&str>, config_path: Option<&Path>) -> CliResult<TxCodec> {
    let mut config = match config_path {
        Some(path) => CodecConfig::load(path)?,
        None => CodecConfig::default(),
    };
    if let Some(network) = network {
        config.network = network.to_string();
    }
    Ok(TxCodec::from_config(&config)?)
}

/// Show the descriptor for an address
pub fn cmd_address(codec: &TxCodec, address: &str) -> CliResult<()> {
    let decoded = codec.address_codec().decode_address(address)?;
    let desc = decoded.to_addr_desc();

    println!("📍 Address {}", address);
    println!("   ├─ Network: {}", codec.params().name);
    println!("   ├─ Type: {}", decoded.script_type());
    println!("   └─ Descriptor: {}", desc);

    Ok(())
}

/// Show the display addresses for a script
pub fn cmd_script(codec: &TxCodec, script_hex: &str) -> CliResult<()> {
    let script = hex::decode(script_hex.trim())?;
    let (addresses, is_address) = codec.address_codec().addresses_from_addr_desc(&script)?;

    println!("📜 Script {}", if script.is_empty() { "(empty)" } else { script_hex.trim() });
    println!("   ├─ Type: {}", classify(&script));
    println!("   ├─ Is address: {}", is_address);
    for address in &addresses {
        println!("   └─ {}", address);
    }

    Ok(())
}

/// Decode a packed record and print it as JSON
pub fn cmd_unpack(codec: &TxCodec, record_hex: &str) -> CliResult<()> {
    let record = hex::decode(record_hex.trim())?;
    let (tx, height) = codec.unpack_tx(&record)?;

    println!("📦 Transaction {} at height {}", tx.txid, height);
    println!("{}", serde_json::to_string_pretty(&tx)?);

    Ok(())
}

/// Pack a JSON transaction file and print the record as hex
pub fn cmd_pack(codec: &TxCodec, path: &Path, height: u32, block_time: i64) -> CliResult<()> {
    let tx = read_transaction(path)?;
    let record = codec.pack_tx(&tx, height, block_time)?;

    println!("📦 Packed {} ({} bytes)", tx.txid, record.len());
    println!("{}", hex::encode(record));

    Ok(())
}

fn read_transaction(path: &Path) -> CliResult<Transaction> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AddrDesc, Txid, Vout};
    use num_bigint::BigUint;
    use std::io::Write;

    fn sample_tx() -> Transaction {
        Transaction {
            txid: Txid::from_bytes([7u8; 32]),
            hex: vec![0x01, 0x00],
            version: 2,
            lock_time: 0,
            vin: Vec::new(),
            vout: vec![Vout::new(
                0,
                BigUint::from(800000000u64),
                "76a9147b56c6d93e9bb83016fa99fc98e22e6293e2d86e88ac"
                    .parse::<AddrDesc>()
                    .unwrap(),
            )],
            block_time: 0,
        }
    }

    #[test]
    fn test_build_codec() {
        let codec = build_codec(None, None).unwrap();
        assert_eq!(codec.params().name, "main");

        let codec = build_codec(Some("test"), None).unwrap();
        assert_eq!(codec.params().bech32_hrp, "tb");

        assert!(build_codec(Some("nope"), None).is_err());
    }

    #[test]
    fn test_build_codec_from_config_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("codec.json");
        fs::write(&path, r#"{"network": "regtest", "max_field_len": 64}"#).unwrap();

        let codec = build_codec(None, Some(&path)).unwrap();
        assert_eq!(codec.params().name, "regtest");
        assert_eq!(codec.max_field_len(), 64);

        // flag wins over file
        let codec = build_codec(Some("main"), Some(&path)).unwrap();
        assert_eq!(codec.params().name, "main");
        assert_eq!(codec.max_field_len(), 64);
    }

    #[test]
    fn test_address_and_script_commands() {
        let codec = build_codec(None, None).unwrap();
        cmd_address(&codec, "AT22iSw5YfCeikVQ7RUFGqSPBuhJosCXPr").unwrap();
        assert!(cmd_address(&codec, "not-an-address").is_err());

        cmd_script(&codec, "").unwrap();
        cmd_script(&codec, "6a0461686f6a").unwrap();
        assert!(cmd_script(&codec, "zz").is_err());
    }

    #[test]
    fn test_pack_then_unpack_commands() {
        let codec = build_codec(None, None).unwrap();
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("tx.json");
        let mut file = fs::File::create(&path).unwrap();
        write!(file, "{}", serde_json::to_string(&sample_tx()).unwrap()).unwrap();

        cmd_pack(&codec, &path, 10, 20).unwrap();

        let record = codec.pack_tx(&sample_tx(), 10, 20).unwrap();
        cmd_unpack(&codec, &hex::encode(record)).unwrap();
        assert!(cmd_unpack(&codec, "00").is_err());
    }
}
