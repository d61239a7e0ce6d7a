//! Display strings for scripts without an address
//!
//! Data-carrier outputs render their payload, either as text when it is
//! printable ASCII or as hex otherwise. Every other script falls back to a
//! marked hex dump, so [`format_nonstandard`] is total.

use super::script::{OP_PUSHDATA1, OP_PUSHDATA2, OP_PUSHDATA4, OP_RETURN};

/// Prefix of the diagnostic string for unrecognized scripts
pub const NONSTANDARD_MARKER: &str = "NONSTANDARD";

/// Render a script that carries no address
pub fn format_nonstandard(script: &[u8]) -> String {
    match op_return_payload(script) {
        Some(payload) if is_printable_ascii(payload) => {
            // printable ASCII maps 1:1 onto chars
            let text: String = payload.iter().map(|&b| b as char).collect();
            format!("OP_RETURN ({})", text)
        }
        Some(payload) => format!("OP_RETURN {}", hex::encode(payload)),
        None if script.is_empty() => NONSTANDARD_MARKER.to_string(),
        None => format!("{} {}", NONSTANDARD_MARKER, hex::encode(script)),
    }
}

/// Payload of an `OP_RETURN <push>` script
///
/// A bare `OP_RETURN` yields an empty payload. The push must consume the
/// rest of the script exactly.
pub fn op_return_payload(script: &[u8]) -> Option<&[u8]> {
    let (&first, rest) = script.split_first()?;
    if first != OP_RETURN {
        return None;
    }
    if rest.is_empty() {
        return Some(rest);
    }
    let (payload, consumed) = read_push(rest)?;
    (consumed == rest.len()).then_some(payload)
}

/// Parse one data push at the start of `script`
///
/// Returns the pushed bytes and the number of script bytes consumed, or
/// `None` if the first opcode is not a push or the push runs past the end.
pub fn read_push(script: &[u8]) -> Option<(&[u8], usize)> {
    let (&opcode, rest) = script.split_first()?;
    let (len, header): (usize, usize) = match opcode {
        0x00..=0x4b => (opcode as usize, 1),
        OP_PUSHDATA1 => (*rest.first()? as usize, 2),
        OP_PUSHDATA2 => {
            let b = rest.get(..2)?;
            (u16::from_le_bytes([b[0], b[1]]) as usize, 3)
        }
        OP_PUSHDATA4 => {
            let b = rest.get(..4)?;
            (u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as usize, 5)
        }
        _ => return None,
    };
    let end = header.checked_add(len)?;
    let data = script.get(header..end)?;
    Some((data, end))
}

fn is_printable_ascii(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| (0x20..=0x7e).contains(&b))
}
