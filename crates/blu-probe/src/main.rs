mod cli;
mod report;

use std::time::Duration;

use clap::Parser;
use eyre::{eyre, WrapErr};
use serde_json::json;

use blu_probe_core::address::address_to_script;
use blu_probe_core::rpc::ElectrumClient;
use blu_probe_core::{CoreError, NetworkParams, RpcError, ScriptHash};

use cli::{Cli, Command};

const GET_BALANCE: &str = "blockchain.scripthash.get_balance";

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let params = args.network_params();
    match &args.command {
        Command::Scripthash { addresses } => {
            resolve_addresses(addresses, &params);
        }
        Command::Probe => probe(&args).await?,
        Command::Balance { addresses } => balance(&args, &params, addresses).await?,
    }

    Ok(())
}

/// Decode every address, printing its script type and hash. Addresses that
/// fail to decode are reported and left out of the result.
fn resolve_addresses(addresses: &[String], params: &NetworkParams) -> Vec<(String, ScriptHash)> {
    let mut resolved = Vec::with_capacity(addresses.len());
    for address in addresses {
        match address_to_script(address, params) {
            Ok(script) => {
                let script_hash = script.script_hash();
                println!("Address:     {address}");
                println!("Script type: {}", script.script_type());
                println!("Script hash: {script_hash}");
                println!();
                resolved.push((address.clone(), script_hash));
            }
            Err(err) => {
                tracing::warn!(%address, error = %err, "skipping address");
                println!("Error converting address {address}: {err}");
                println!();
            }
        }
    }
    resolved
}

async fn connect(args: &Cli) -> eyre::Result<ElectrumClient> {
    let timeout = Duration::from_secs(args.timeout_secs);
    let endpoint = format!("{}:{}", args.host, args.port);
    let electrum = ElectrumClient::connect(&args.host, args.port, timeout)
        .await
        .map_err(|err| {
            let message = report::format_connect_error(&endpoint, &err.to_string());
            eyre!(message).wrap_err("while attempting to connect to the Electrum server")
        })?;
    tracing::info!(%endpoint, "connected to Electrum server");
    Ok(electrum)
}

async fn negotiate(electrum: &mut ElectrumClient, args: &Cli) -> eyre::Result<()> {
    let version = electrum
        .server_version(&args.client_name, &args.protocol_version)
        .await
        .wrap_err("server.version")?;
    println!(
        "server.version → {} (protocol {})",
        version.server_software, version.protocol_version
    );
    Ok(())
}

async fn probe(args: &Cli) -> eyre::Result<()> {
    let mut electrum = connect(args).await?;

    let requests = [
        (
            "server.version",
            vec![json!(args.client_name), json!(args.protocol_version)],
        ),
        ("server.features", Vec::new()),
        ("blockchain.headers.subscribe", Vec::new()),
    ];
    for (method, params) in requests {
        let reply = electrum.call(method, params).await.wrap_err(method)?;
        println!("{method} →");
        println!("{}\n", serde_json::to_string_pretty(&reply)?);
    }

    Ok(())
}

async fn balance(args: &Cli, params: &NetworkParams, addresses: &[String]) -> eyre::Result<()> {
    let resolved = resolve_addresses(addresses, params);
    if resolved.is_empty() {
        return Err(eyre!("none of the given addresses could be decoded"));
    }

    let mut electrum = connect(args).await?;
    negotiate(&mut electrum, args).await?;

    for (address, script_hash) in &resolved {
        println!("\n{}", "=".repeat(70));
        println!("Address: {address}");
        println!("{}", "=".repeat(70));

        let reply = electrum
            .call(GET_BALANCE, vec![json!(script_hash.to_string())])
            .await;
        match reply {
            Ok(raw) => {
                println!("\n{}", report::balance_reply(GET_BALANCE, raw, &params.coin_ticker));
            }
            // The server answered, so the connection is still usable.
            Err(
                err @ CoreError::Rpc(RpcError::ServerError { .. } | RpcError::InvalidResponse(_)),
            ) => {
                println!("\nError: {err}");
            }
            Err(err) => {
                return Err(err).wrap_err_with(|| format!("balance query for {address}"));
            }
        }
    }

    Ok(())
}
