//! Address decoding: human-readable address to output script to Electrum
//! script hash.
//!
//! An address starting with the network's Bech32 prefix (`bb1` on
//! BitcoinBLU) is decoded as a segwit address; anything else is tried as
//! Base58Check. A malformed Bech32 address never falls back to Base58.

pub mod base58;
pub mod bech32;
mod script;

pub use script::{classify_script, DecodedScript};

use crate::error::CoreError;
use crate::network::NetworkParams;
use crate::types::ScriptHash;

/// The two encodings an address string may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    Bech32,
    Base58,
}

impl AddressKind {
    /// Route by literal (case-sensitive) prefix match.
    pub fn of(address: &str, params: &NetworkParams) -> Self {
        if address.starts_with(&params.bech32_prefix()) {
            Self::Bech32
        } else {
            Self::Base58
        }
    }
}

/// Decode an address into its Electrum script hash.
pub fn decode(address: &str, params: &NetworkParams) -> Result<ScriptHash, CoreError> {
    Ok(address_to_script(address, params)?.script_hash())
}

/// Decode an address into the output script it locks to.
pub fn address_to_script(
    address: &str,
    params: &NetworkParams,
) -> Result<DecodedScript, CoreError> {
    let kind = AddressKind::of(address, params);
    let decoded = match kind {
        AddressKind::Bech32 => decode_segwit(address, params),
        AddressKind::Base58 => decode_legacy(address, params),
    };
    decoded.map_err(|err| match err {
        CoreError::InvalidAddress(reason) => {
            let label = match kind {
                AddressKind::Bech32 => "bech32",
                AddressKind::Base58 => "base58",
            };
            CoreError::InvalidAddress(format!("{label} address `{address}`: {reason}"))
        }
        other => other,
    })
}

fn decode_segwit(address: &str, params: &NetworkParams) -> Result<DecodedScript, CoreError> {
    let (hrp, data) = bech32::decode(address)?;
    // Exact match: a string like `bb1x1...` carries the literal prefix but
    // decodes to hrp `bb1x`, which belongs to a different network.
    if hrp != params.bech32_hrp {
        return Err(CoreError::invalid_address(format!(
            "human-readable part `{hrp}` does not match network `{}`",
            params.bech32_hrp
        )));
    }
    let (&version, words) = data
        .split_first()
        .ok_or_else(|| CoreError::invalid_address("bech32 data part is empty"))?;
    let program = bech32::convert_bits(words, 5, 8, false)?;
    DecodedScript::from_witness(version, program)
}

fn decode_legacy(address: &str, params: &NetworkParams) -> Result<DecodedScript, CoreError> {
    let payload = base58::decode_check(address)?;
    if payload.len() != 21 {
        return Err(CoreError::invalid_address(format!(
            "invalid payload length: {}",
            payload.len()
        )));
    }

    let version = payload[0];
    let mut hash = [0u8; 20];
    hash.copy_from_slice(&payload[1..]);

    if version == params.p2pkh_version {
        Ok(DecodedScript::P2pkh(hash))
    } else if version == params.p2sh_version {
        Ok(DecodedScript::P2sh(hash))
    } else {
        Err(CoreError::invalid_address(format!(
            "unknown address version byte: {version:02x}"
        )))
    }
}
