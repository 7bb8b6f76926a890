use std::sync::Once;
use std::time::Duration;

use blu_probe_core::rpc::ElectrumClient;
use blu_probe_core::{decode, CoreError, NetworkParams, RpcError};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

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

const BLU_P2WPKH: &str = "bb1q4gvrjugztv8fflpznjjmfjy02sz0amjtn0grk0";

/// Serve `requests` request lines on one connection, then close it.
/// Returns the port and a channel carrying every request the server saw.
async fn spawn_fake_server(requests: usize) -> (u16, oneshot::Receiver<Vec<Value>>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener must bind");
    let port = listener.local_addr().expect("local addr").port();
    let (seen_tx, seen_rx) = oneshot::channel();

    tokio::spawn(async move {
        let (socket, _) = listener.accept().await.expect("accept must succeed");
        let (read_half, mut write_half) = socket.into_split();
        let mut lines = BufReader::new(read_half).lines();
        let mut seen = Vec::new();

        for _ in 0..requests {
            let Some(line) = lines.next_line().await.expect("read must succeed") else {
                break;
            };
            let request: Value = serde_json::from_str(&line).expect("request must be JSON");
            let id = request["id"].clone();

            match request["method"].as_str().unwrap_or_default() {
                "server.version" => {
                    // A tip notification and a corrupt line precede the reply.
                    let preamble = "{\"method\":\"blockchain.headers.subscribe\",\"params\":[{\"height\":77,\"hex\":\"00\"}]}\nnot json\n";
                    write_half
                        .write_all(preamble.as_bytes())
                        .await
                        .expect("write must succeed");
                    let reply = json!({"id": id, "result": ["FakeX 0.1", "1.4"]});
                    write_half
                        .write_all(format!("{reply}\n").as_bytes())
                        .await
                        .expect("write must succeed");
                }
                "blockchain.scripthash.get_balance" => {
                    // Deliver the reply in two writes split mid-object.
                    let reply = format!(
                        "{}\n",
                        json!({"id": id, "result": {"confirmed": 123_456_789, "unconfirmed": 1}})
                    );
                    let (head, tail) = reply.split_at(reply.len() / 2);
                    write_half
                        .write_all(head.as_bytes())
                        .await
                        .expect("write must succeed");
                    write_half.flush().await.expect("flush must succeed");
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    write_half
                        .write_all(tail.as_bytes())
                        .await
                        .expect("write must succeed");
                }
                _ => {
                    let reply = json!({
                        "id": id,
                        "error": {"code": -32601, "message": "unknown method"}
                    });
                    write_half
                        .write_all(format!("{reply}\n").as_bytes())
                        .await
                        .expect("write must succeed");
                }
            }
            seen.push(request);
        }

        let _ = seen_tx.send(seen);
    });

    (port, seen_rx)
}

#[tokio::test(flavor = "multi_thread")]
async fn electrum_session_against_fake_server() {
    init_tracing();
    let (port, seen_rx) = spawn_fake_server(3).await;

    let mut electrum = ElectrumClient::connect("127.0.0.1", port, Duration::from_secs(5))
        .await
        .expect("connect must succeed");

    let version = electrum
        .server_version("blu-probe-test", "1.4")
        .await
        .expect("server.version must succeed");
    assert_eq!(version.server_software, "FakeX 0.1");
    assert_eq!(electrum.framed().unmatched().len(), 1);

    let script_hash = decode(BLU_P2WPKH, &NetworkParams::default()).expect("address must decode");
    let balance = electrum
        .scripthash_get_balance(&script_hash)
        .await
        .expect("get_balance must succeed");
    assert_eq!(balance.confirmed, 123_456_789);
    assert_eq!(balance.total(), 123_456_790);

    let err = electrum
        .call("server.donation_address", Vec::new())
        .await
        .expect_err("fake server rejects unknown methods");
    assert!(matches!(
        err,
        CoreError::Rpc(RpcError::ServerError { code: -32601, .. })
    ));

    let seen = seen_rx.await.expect("server must report requests");
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0]["id"], json!(1));
    assert_eq!(seen[1]["id"], json!(2));
    assert_eq!(
        seen[1]["params"],
        json!(["20bb858788df8a47da27b4546ce33df1e8369fd8e224d681045eaeb8427d40d5"])
    );

    // The server hung up after three requests.
    let err = electrum
        .server_features()
        .await
        .expect_err("closed connection must fail");
    assert!(
        matches!(
            err,
            CoreError::Rpc(RpcError::ConnectionClosed { .. } | RpcError::Transport(_))
        ),
        "unexpected error: {err:?}"
    );
}
