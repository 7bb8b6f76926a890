//! Standard output scripts produced by address decoding.

use bitcoin::opcodes::all::{
    OP_CHECKSIG, OP_DUP, OP_EQUAL, OP_EQUALVERIFY, OP_HASH160, OP_PUSHBYTES_0, OP_PUSHBYTES_20,
    OP_PUSHBYTES_32, OP_PUSHNUM_1,
};
use bitcoin::{Script, ScriptBuf};

use crate::error::CoreError;
use crate::types::{ScriptHash, ScriptType};

// ==============================================================================
// Decoded Script
// ==============================================================================

/// The locking script an address stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedScript {
    /// `DUP HASH160 <20> EQUALVERIFY CHECKSIG`
    P2pkh([u8; 20]),
    /// `HASH160 <20> EQUAL`
    P2sh([u8; 20]),
    /// Version 0, 20-byte program.
    P2wpkh([u8; 20]),
    /// Version 0, 32-byte program.
    P2wsh([u8; 32]),
    /// Version 1-16 with a 2-40 byte program.
    Witness { version: u8, program: Vec<u8> },
}

impl DecodedScript {
    /// Build the script for a segwit program. Version 0 only admits 20 and
    /// 32 byte programs.
    pub fn from_witness(version: u8, program: Vec<u8>) -> Result<Self, CoreError> {
        if version > 16 {
            return Err(CoreError::invalid_address(format!(
                "invalid witness version: {version}"
            )));
        }
        if !(2..=40).contains(&program.len()) {
            return Err(CoreError::invalid_address(format!(
                "invalid witness program length: {}",
                program.len()
            )));
        }
        if version > 0 {
            return Ok(Self::Witness { version, program });
        }
        if let Ok(hash) = <[u8; 20]>::try_from(program.as_slice()) {
            return Ok(Self::P2wpkh(hash));
        }
        if let Ok(hash) = <[u8; 32]>::try_from(program.as_slice()) {
            return Ok(Self::P2wsh(hash));
        }
        Err(CoreError::invalid_address(format!(
            "invalid witness program length for version 0: {}",
            program.len()
        )))
    }

    /// Serialized script bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::P2pkh(hash) => {
                let mut script = Vec::with_capacity(25);
                script.extend_from_slice(&[
                    OP_DUP.to_u8(),
                    OP_HASH160.to_u8(),
                    OP_PUSHBYTES_20.to_u8(),
                ]);
                script.extend_from_slice(hash);
                script.extend_from_slice(&[OP_EQUALVERIFY.to_u8(), OP_CHECKSIG.to_u8()]);
                script
            }
            Self::P2sh(hash) => {
                let mut script = Vec::with_capacity(23);
                script.extend_from_slice(&[OP_HASH160.to_u8(), OP_PUSHBYTES_20.to_u8()]);
                script.extend_from_slice(hash);
                script.push(OP_EQUAL.to_u8());
                script
            }
            Self::P2wpkh(program) => {
                let mut script = vec![OP_PUSHBYTES_0.to_u8(), OP_PUSHBYTES_20.to_u8()];
                script.extend_from_slice(program);
                script
            }
            Self::P2wsh(program) => {
                let mut script = vec![OP_PUSHBYTES_0.to_u8(), OP_PUSHBYTES_32.to_u8()];
                script.extend_from_slice(program);
                script
            }
            Self::Witness { version, program } => {
                // OP_1 through OP_16 are contiguous from 0x51; the program
                // is at most 40 bytes so a direct push suffices.
                let mut script = Vec::with_capacity(program.len() + 2);
                script.push(OP_PUSHNUM_1.to_u8() - 1 + version);
                script.push(program.len() as u8);
                script.extend_from_slice(program);
                script
            }
        }
    }

    pub fn to_script_buf(&self) -> ScriptBuf {
        ScriptBuf::from_bytes(self.to_bytes())
    }

    pub fn script_type(&self) -> ScriptType {
        classify_script(&self.to_script_buf())
    }

    /// Electrum script hash of the serialized script.
    pub fn script_hash(&self) -> ScriptHash {
        ScriptHash::from_script(&self.to_bytes())
    }
}

// ==============================================================================
// Script Classification
// ==============================================================================

/// Classify a script using the `bitcoin` crate's built-in detection methods.
#[must_use]
pub fn classify_script(script: &Script) -> ScriptType {
    if script.is_p2pkh() {
        ScriptType::P2pkh
    } else if script.is_p2sh() {
        ScriptType::P2sh
    } else if script.is_p2wpkh() {
        ScriptType::P2wpkh
    } else if script.is_p2wsh() {
        ScriptType::P2wsh
    } else if script.is_p2tr() {
        ScriptType::P2tr
    } else if script.is_witness_program() {
        ScriptType::WitnessUnknown
    } else {
        ScriptType::Unknown
    }
}
