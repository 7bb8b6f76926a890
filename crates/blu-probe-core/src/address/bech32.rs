//! Bech32 (BIP-173) checksum, character mapping, and 5/8-bit regrouping.
//!
//! Only the BIP-173 checksum constant is supported; Bech32m strings fail the
//! checksum.

use crate::error::CoreError;

pub const SEPARATOR: char = '1';

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";
const GENERATOR: [u32; 5] = [0x3b6a_57b2, 0x2650_8e6d, 0x1ea1_19fa, 0x3d42_33dd, 0x2a14_62b3];
const CHECKSUM_LEN: usize = 6;
const MAX_LEN: usize = 90;

/// BCH checksum accumulator. A valid string (hrp expansion + data +
/// checksum) leaves the accumulator at 1.
fn polymod(values: impl IntoIterator<Item = u8>) -> u32 {
    let mut chk: u32 = 1;
    for value in values {
        let top = chk >> 25;
        chk = ((chk & 0x01ff_ffff) << 5) ^ u32::from(value);
        for (i, generator) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= generator;
            }
        }
    }
    chk
}

/// High bits of each hrp character, a zero, then the low five bits.
fn hrp_expand(hrp: &str) -> Vec<u8> {
    let bytes = hrp.as_bytes();
    let mut expanded = Vec::with_capacity(bytes.len() * 2 + 1);
    expanded.extend(bytes.iter().map(|b| b >> 5));
    expanded.push(0);
    expanded.extend(bytes.iter().map(|b| b & 0x1f));
    expanded
}

/// Decode a Bech32 string into its lowercase hrp and 5-bit data values,
/// checksum stripped.
pub fn decode(s: &str) -> Result<(String, Vec<u8>), CoreError> {
    if let Some(c) = s.chars().find(|c| !('!'..='~').contains(c)) {
        return Err(CoreError::invalid_address(format!(
            "bech32 character {c:?} is outside printable ASCII"
        )));
    }
    let has_lower = s.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = s.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(CoreError::invalid_address("bech32 string mixes upper and lower case"));
    }
    if s.len() > MAX_LEN {
        return Err(CoreError::invalid_address(format!(
            "bech32 string is {} characters, limit is {MAX_LEN}",
            s.len()
        )));
    }

    let s = s.to_ascii_lowercase();
    let pos = s
        .rfind(SEPARATOR)
        .ok_or_else(|| CoreError::invalid_address("bech32 separator `1` not found"))?;
    if pos < 1 {
        return Err(CoreError::invalid_address("bech32 human-readable part is empty"));
    }
    if pos + 1 + CHECKSUM_LEN > s.len() {
        return Err(CoreError::invalid_address("bech32 checksum is too short"));
    }

    let (hrp, rest) = s.split_at(pos);
    let mut data = rest[1..]
        .bytes()
        .map(|b| {
            CHARSET
                .iter()
                .position(|&c| c == b)
                .map(|v| v as u8)
                .ok_or_else(|| {
                    CoreError::invalid_address(format!(
                        "character {:?} is not in the bech32 charset",
                        char::from(b)
                    ))
                })
        })
        .collect::<Result<Vec<u8>, CoreError>>()?;

    if polymod(hrp_expand(hrp).into_iter().chain(data.iter().copied())) != 1 {
        return Err(CoreError::invalid_address("bech32 checksum mismatch"));
    }

    data.truncate(data.len() - CHECKSUM_LEN);
    Ok((hrp.to_owned(), data))
}

/// Encode a segwit program as a lowercase Bech32 address.
pub fn encode(hrp: &str, witness_version: u8, program: &[u8]) -> Result<String, CoreError> {
    if witness_version > 16 {
        return Err(CoreError::invalid_address(format!(
            "witness version {witness_version} is above 16"
        )));
    }
    let hrp = hrp.to_ascii_lowercase();
    let mut data = vec![witness_version];
    data.extend(convert_bits(program, 8, 5, true)?);

    let checksum = polymod(
        hrp_expand(&hrp)
            .into_iter()
            .chain(data.iter().copied())
            .chain([0u8; CHECKSUM_LEN]),
    ) ^ 1;
    data.extend((0..CHECKSUM_LEN).map(|i| ((checksum >> (5 * (5 - i))) & 0x1f) as u8));

    let mut encoded = String::with_capacity(hrp.len() + 1 + data.len());
    encoded.push_str(&hrp);
    encoded.push(SEPARATOR);
    encoded.extend(data.iter().map(|&v| char::from(CHARSET[usize::from(v)])));
    Ok(encoded)
}

/// Regroup a sequence of `from`-bit values into `to`-bit values.
///
/// With `pad == false` the input must end on a group boundary: fewer than
/// `from` leftover bits, all zero.
pub fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Result<Vec<u8>, CoreError> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let max_value: u32 = (1 << to) - 1;
    let max_acc: u32 = (1 << (from + to - 1)) - 1;
    let mut out = Vec::with_capacity(data.len() * from as usize / to as usize + 1);

    for &value in data {
        let value = u32::from(value);
        if value >> from != 0 {
            return Err(CoreError::invalid_address(format!(
                "value {value} does not fit in {from} bits"
            )));
        }
        acc = ((acc << from) | value) & max_acc;
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & max_value) as u8);
        }
    }

    if pad {
        if bits > 0 {
            out.push(((acc << (to - bits)) & max_value) as u8);
        }
    } else if bits >= from || ((acc << (to - bits)) & max_value) != 0 {
        return Err(CoreError::invalid_address("non-zero or excess padding in bech32 data"));
    }

    Ok(out)
}
