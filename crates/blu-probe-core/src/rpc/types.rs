//! Typed results of the Electrum methods the client wraps.
//!
//! Everything else is returned as raw `serde_json::Value`.

use bitcoin::SignedAmount;
use serde::{Deserialize, Serialize};

// ==============================================================================
// Balance
// ==============================================================================

/// Result of `blockchain.scripthash.get_balance`, in satoshis.
///
/// `unconfirmed` is signed: mempool spends of confirmed coins make it
/// negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Balance {
    #[serde(default)]
    pub confirmed: i64,
    #[serde(default)]
    pub unconfirmed: i64,
}

impl Balance {
    pub fn total(&self) -> i64 {
        self.confirmed.saturating_add(self.unconfirmed)
    }

    pub fn confirmed_amount(&self) -> SignedAmount {
        SignedAmount::from_sat(self.confirmed)
    }

    pub fn unconfirmed_amount(&self) -> SignedAmount {
        SignedAmount::from_sat(self.unconfirmed)
    }

    pub fn total_amount(&self) -> SignedAmount {
        SignedAmount::from_sat(self.total())
    }
}

// ==============================================================================
// Server Version
// ==============================================================================

/// Result of `server.version`: `[server_software, protocol_version]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(String, String)")]
pub struct ServerVersion {
    pub server_software: String,
    pub protocol_version: String,
}

impl From<(String, String)> for ServerVersion {
    fn from((server_software, protocol_version): (String, String)) -> Self {
        Self {
            server_software,
            protocol_version,
        }
    }
}

// ==============================================================================
// Header Tip
// ==============================================================================

/// Result of `blockchain.headers.subscribe`: the current chain tip.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HeaderTip {
    pub height: u64,
    /// Raw block header, hex encoded.
    pub hex: String,
}
