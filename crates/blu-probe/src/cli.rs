use clap::{Parser, Subcommand};

use blu_probe_core::network::{BLU_BECH32_HRP, BLU_P2PKH_VERSION, BLU_P2SH_VERSION};
use blu_probe_core::NetworkParams;

/// blu-probe: BitcoinBLU address script hashes and balances over the Electrum protocol.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Electrum server host.
    #[arg(
        long,
        global = true,
        default_value = "electrumx.bitcoin-blu.org",
        env = "BLU_PROBE_HOST"
    )]
    pub host: String,

    /// Electrum server TCP port (plain TCP; TLS ports are not supported).
    #[arg(long, global = true, default_value = "50001", env = "BLU_PROBE_PORT")]
    pub port: u16,

    /// Connect, read and write timeout in seconds.
    #[arg(long, global = true, default_value = "5")]
    pub timeout_secs: u64,

    /// Client name sent with `server.version`.
    #[arg(long, global = true, default_value = "blu-probe")]
    pub client_name: String,

    /// Protocol version requested with `server.version`.
    #[arg(long, global = true, default_value = "1.4")]
    pub protocol_version: String,

    /// Bech32 human-readable part for segwit addresses.
    #[arg(long, global = true, default_value = BLU_BECH32_HRP)]
    pub bech32_hrp: String,

    /// Base58 P2PKH version byte (decimal or 0x-prefixed hex).
    #[arg(long, global = true, value_parser = parse_version_byte)]
    pub p2pkh_version: Option<u8>,

    /// Base58 P2SH version byte (decimal or 0x-prefixed hex).
    #[arg(long, global = true, value_parser = parse_version_byte)]
    pub p2sh_version: Option<u8>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the Electrum script hash of each address (no network access).
    Scripthash {
        #[arg(required = true)]
        addresses: Vec<String>,
    },

    /// Query server.version, server.features and the current chain tip.
    Probe,

    /// Query the confirmed and unconfirmed balance of each address.
    Balance {
        #[arg(required = true)]
        addresses: Vec<String>,
    },
}

impl Cli {
    pub fn network_params(&self) -> NetworkParams {
        NetworkParams {
            bech32_hrp: self.bech32_hrp.to_ascii_lowercase(),
            p2pkh_version: self.p2pkh_version.unwrap_or(BLU_P2PKH_VERSION),
            p2sh_version: self.p2sh_version.unwrap_or(BLU_P2SH_VERSION),
            ..NetworkParams::default()
        }
    }
}

fn parse_version_byte(raw: &str) -> Result<u8, String> {
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => raw.parse::<u8>(),
    };
    parsed.map_err(|e| format!("`{raw}` is not a version byte: {e}"))
}
