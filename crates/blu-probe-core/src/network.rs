//! Per-chain address parameters.
//!
//! The decoder is not tied to a single chain: the Bech32 human-readable part
//! and the Base58Check version bytes come from a [`NetworkParams`] value.
//! [`NetworkParams::default`] yields the BitcoinBLU mainnet parameters.

use serde::{Deserialize, Serialize};

/// BitcoinBLU Bech32 human-readable part (`bb1...` addresses).
pub const BLU_BECH32_HRP: &str = "bb";
/// BitcoinBLU P2PKH version byte (addresses start with `B`).
pub const BLU_P2PKH_VERSION: u8 = 0x19;
/// BitcoinBLU P2SH version byte (addresses start with `b`).
pub const BLU_P2SH_VERSION: u8 = 0x56;

/// Address parameters for one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkParams {
    /// Lowercase Bech32 human-readable part, without the `1` separator.
    pub bech32_hrp: String,
    pub p2pkh_version: u8,
    pub p2sh_version: u8,
    /// Unit name used when rendering balances in whole coins.
    pub coin_ticker: String,
}

impl NetworkParams {
    /// The literal prefix (`hrp` + separator) that routes an address to the
    /// Bech32 decoder.
    pub fn bech32_prefix(&self) -> String {
        format!("{}1", self.bech32_hrp)
    }
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self {
            bech32_hrp: BLU_BECH32_HRP.to_owned(),
            p2pkh_version: BLU_P2PKH_VERSION,
            p2sh_version: BLU_P2SH_VERSION,
            coin_ticker: "BBLU".to_owned(),
        }
    }
}
