//! Bech32 encoding of witness v0 addresses

use bech32::{segwit, Hrp};
use thiserror::Error;

/// Segwit address errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SegwitError {
    #[error("Invalid human-readable part: {0}")]
    InvalidHrp(String),
    #[error("Human-readable part mismatch: expected {expected}, got {got}")]
    HrpMismatch { expected: String, got: String },
    #[error("Bech32 decoding failed: {0}")]
    Decode(String),
    #[error("Bech32 encoding failed: {0}")]
    Encode(String),
}

/// Encode a witness v0 program under `hrp`
pub fn encode_v0(hrp: &str, program: &[u8]) -> Result<String, SegwitError> {
    let hrp = Hrp::parse(hrp).map_err(|e| SegwitError::InvalidHrp(e.to_string()))?;
    segwit::encode_v0(hrp, program).map_err(|e| SegwitError::Encode(e.to_string()))
}

/// Decode a segwit address, requiring its prefix to be `expected_hrp`
///
/// Returns the witness version and program. Checksum variant and program
/// length rules for the version are enforced by the bech32 crate.
pub fn decode(address: &str, expected_hrp: &str) -> Result<(u8, Vec<u8>), SegwitError> {
    let (hrp, version, program) =
        segwit::decode(address).map_err(|e| SegwitError::Decode(e.to_string()))?;

    let got = hrp.to_lowercase();
    if got != expected_hrp.to_ascii_lowercase() {
        return Err(SegwitError::HrpMismatch {
            expected: expected_hrp.to_string(),
            got,
        });
    }
    Ok((version.to_u8(), program))
}

#[cfg(test)]
mod tests {
    use super::*;

    const P2WPKH: &str = "bc1q0v3tadxj6pm3ym9j06v9rfyw0jeh5f8squ3nvt";

    #[test]
    fn test_encode_v0() {
        let program = hex::decode("7b22beb4d2d077126cb27e9851a48e7cb37a24f0").unwrap();
        assert_eq!(encode_v0("bc", &program).unwrap(), P2WPKH);
    }

    #[test]
    fn test_decode() {
        let (version, program) = decode(P2WPKH, "bc").unwrap();
        assert_eq!(version, 0);
        assert_eq!(hex::encode(program), "7b22beb4d2d077126cb27e9851a48e7cb37a24f0");
    }

    #[test]
    fn test_decode_uppercase() {
        let (version, program) = decode(&P2WPKH.to_uppercase(), "bc").unwrap();
        assert_eq!(version, 0);
        assert_eq!(program.len(), 20);
    }

    #[test]
    fn test_decode_wrong_hrp() {
        assert_eq!(
            decode(P2WPKH, "tb"),
            Err(SegwitError::HrpMismatch {
                expected: "tb".to_string(),
                got: "bc".to_string(),
            })
        );
    }

    #[test]
    fn test_decode_bad_checksum() {
        assert!(matches!(
            decode("bc1q0v3tadxj6pm3ym9j06v9rfyw0jeh5f8squ3nvq", "bc"),
            Err(SegwitError::Decode(_))
        ));
    }

    #[test]
    fn test_encode_invalid_hrp() {
        assert!(matches!(encode_v0("", &[0u8; 20]), Err(SegwitError::InvalidHrp(_))));
    }
}
