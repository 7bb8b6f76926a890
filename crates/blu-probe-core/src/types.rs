//! Domain types shared between the address decoder and the RPC layer.
//!
//! Contains the output-script classification (`ScriptType`) and the
//! Electrum-style script hash (`ScriptHash`) that links the two halves of
//! the crate: the decoder produces it, the RPC client sends it as a
//! parameter.

use std::fmt;

use bitcoin::hashes::{sha256, Hash};
use serde::{Serialize, Serializer};

// ==============================================================================
// Script Type Classification
// ==============================================================================

/// Classifies a standard output script template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptType {
    P2pkh,
    P2sh,
    P2wpkh,
    P2wsh,
    P2tr,
    /// Any other segwit program (version 1-16).
    WitnessUnknown,
    Unknown,
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::P2pkh => write!(f, "p2pkh"),
            Self::P2sh => write!(f, "p2sh"),
            Self::P2wpkh => write!(f, "p2wpkh"),
            Self::P2wsh => write!(f, "p2wsh"),
            Self::P2tr => write!(f, "p2tr"),
            Self::WitnessUnknown => write!(f, "witness_unknown"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

// ==============================================================================
// Script Hash
// ==============================================================================

/// Electrum protocol script hash: SHA-256 of an output script with the byte
/// order reversed. Displays as 64 lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScriptHash([u8; 32]);

impl ScriptHash {
    /// Hash raw output script bytes.
    #[must_use]
    pub fn from_script(script: &[u8]) -> Self {
        let mut bytes = sha256::Hash::hash(script).to_byte_array();
        bytes.reverse();
        Self(bytes)
    }

    /// Bytes in display (reversed digest) order.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for ScriptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex_encode(self.0))
    }
}

impl Serialize for ScriptHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Tiny hex-encoding helper to avoid adding a `hex` crate dependency.
pub(crate) fn hex_encode(bytes: impl AsRef<[u8]>) -> String {
    bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
}
