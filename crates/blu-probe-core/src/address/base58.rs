//! Base58Check decoding with double-SHA-256 checksums.

use bitcoin::hashes::{sha256d, Hash};

use crate::error::CoreError;

const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
const CHECKSUM_LEN: usize = 4;

/// Decode a base-58 string into bytes.
///
/// Digits are accumulated most-significant first into a little-endian
/// byte magnitude. Each leading `1` then restores one leading zero byte,
/// which the integer value alone cannot represent.
pub fn decode(s: &str) -> Result<Vec<u8>, CoreError> {
    let mut magnitude: Vec<u8> = Vec::with_capacity(s.len());
    for c in s.chars() {
        let digit = ALPHABET
            .iter()
            .position(|&a| char::from(a) == c)
            .ok_or_else(|| {
                CoreError::invalid_address(format!("character {c:?} is not in the base58 alphabet"))
            })?;

        let mut carry = digit as u32;
        for byte in magnitude.iter_mut() {
            carry += u32::from(*byte) * 58;
            *byte = (carry & 0xff) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            magnitude.push((carry & 0xff) as u8);
            carry >>= 8;
        }
    }

    let leading_zeros = s.chars().take_while(|&c| c == '1').count();
    let mut bytes = vec![0u8; leading_zeros];
    bytes.extend(magnitude.iter().rev());
    Ok(bytes)
}

/// Decode a Base58Check string and return the payload with the checksum
/// verified and removed.
pub fn decode_check(s: &str) -> Result<Vec<u8>, CoreError> {
    let mut bytes = decode(s)?;
    if bytes.len() < CHECKSUM_LEN {
        return Err(CoreError::invalid_address("base58 data is too short for a checksum"));
    }

    let checksum = bytes.split_off(bytes.len() - CHECKSUM_LEN);
    let expected = sha256d::Hash::hash(&bytes).to_byte_array();
    if checksum[..] != expected[..CHECKSUM_LEN] {
        return Err(CoreError::invalid_address("base58 checksum mismatch"));
    }
    Ok(bytes)
}

/// Append a double-SHA-256 checksum to `payload` and base-58 encode it.
pub fn encode_check(payload: &[u8]) -> String {
    let mut bytes = payload.to_vec();
    bytes.extend_from_slice(&sha256d::Hash::hash(payload).to_byte_array()[..CHECKSUM_LEN]);

    // Little-endian base-58 digits of the big-endian byte string.
    let mut digits: Vec<u8> = Vec::with_capacity(bytes.len() * 138 / 100 + 1);
    for &byte in &bytes {
        let mut carry = u32::from(byte);
        for digit in digits.iter_mut() {
            carry += u32::from(*digit) << 8;
            *digit = (carry % 58) as u8;
            carry /= 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    let leading_zeros = bytes.iter().take_while(|&&b| b == 0).count();
    std::iter::repeat('1')
        .take(leading_zeros)
        .chain(digits.iter().rev().map(|&d| char::from(ALPHABET[usize::from(d)])))
        .collect()
}
