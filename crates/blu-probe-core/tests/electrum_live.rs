use std::env;
use std::sync::Once;
use std::time::Duration;

use blu_probe_core::rpc::ElectrumClient;
use blu_probe_core::{decode, NetworkParams};

static TRACING_INIT: Once = Once::new();

fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("blu_probe_core=debug")),
            )
            .with_target(true)
            .try_init();
    });
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a reachable BitcoinBLU Electrum server; set BLU_PROBE_TEST_HOST"]
async fn live_server_answers_version_tip_and_balances() {
    init_tracing();

    let host = env::var("BLU_PROBE_TEST_HOST").expect("BLU_PROBE_TEST_HOST must be set");
    let port: u16 = env::var("BLU_PROBE_TEST_PORT")
        .unwrap_or_else(|_| "50001".to_owned())
        .parse()
        .expect("BLU_PROBE_TEST_PORT must be a port number");

    let mut electrum = ElectrumClient::connect(&host, port, Duration::from_secs(5))
        .await
        .expect("connect must succeed");

    eprintln!("[itest] negotiating protocol with {host}:{port}");
    let version = electrum
        .server_version("blu-probe-itest", "1.4")
        .await
        .expect("server.version must succeed");
    assert!(!version.server_software.is_empty());

    let tip = electrum
        .headers_subscribe()
        .await
        .expect("headers.subscribe must succeed");
    assert!(tip.height > 0, "live chain must have blocks");

    let params = NetworkParams::default();
    for address in [
        "bb1q4gvrjugztv8fflpznjjmfjy02sz0amjtn0grk0",
        "BDDh5sYMZRprgXrJ4Ki1npt2n6Qh3pUVCX",
        "BBQhaT9zSDjSutWYqpLY8VhFZzPzfRFtoz",
    ] {
        let script_hash = decode(address, &params).expect("fixture address must decode");
        let balance = electrum
            .scripthash_get_balance(&script_hash)
            .await
            .expect("get_balance must succeed");
        eprintln!(
            "[itest] {address}: confirmed={} unconfirmed={}",
            balance.confirmed, balance.unconfirmed
        );
        assert!(balance.confirmed >= 0);
    }
}
