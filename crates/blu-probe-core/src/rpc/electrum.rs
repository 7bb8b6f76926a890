use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::debug;

use crate::error::{CoreError, RpcError};
use crate::types::ScriptHash;

use super::client::FramedRpcClient;
use super::connection::connect;
use super::types::{Balance, HeaderTip, ServerVersion};

/// Electrum protocol client on top of [`FramedRpcClient`].
///
/// Allocates request ids sequentially from 1 and turns JSON-RPC error
/// replies into [`RpcError::ServerError`].
#[derive(Debug)]
pub struct ElectrumClient<S = TcpStream> {
    rpc: FramedRpcClient<S>,
    next_id: u64,
}

impl ElectrumClient<TcpStream> {
    /// Connect over plain TCP. `timeout` applies to the connect and to
    /// every subsequent read and write.
    pub async fn connect(host: &str, port: u16, timeout: Duration) -> Result<Self, CoreError> {
        let stream = connect(host, port, timeout).await?;
        Ok(Self::new(FramedRpcClient::new(stream, timeout)))
    }
}

impl<S> ElectrumClient<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(rpc: FramedRpcClient<S>) -> Self {
        Self { rpc, next_id: 1 }
    }

    /// The underlying framed client, e.g. to inspect unmatched messages.
    pub fn framed(&self) -> &FramedRpcClient<S> {
        &self.rpc
    }

    fn reserve_request_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Send one request and wait for its reply.
    pub async fn call(&mut self, method: &str, params: Vec<Value>) -> Result<Value, CoreError> {
        let id = self.reserve_request_id();
        self.rpc.send(method, &params, id).await?;
        let response = self.rpc.receive_matching(id).await?;
        debug!(
            rpc.id = id,
            rpc.method = method,
            skipped = self.rpc.unmatched().len(),
            "rpc response"
        );
        response.into_result()
    }

    /// `server.version`: negotiate the protocol version.
    pub async fn server_version(
        &mut self,
        client_name: &str,
        protocol_version: &str,
    ) -> Result<ServerVersion, CoreError> {
        let method = "server.version";
        let result = self
            .call(
                method,
                vec![
                    Value::String(client_name.to_owned()),
                    Value::String(protocol_version.to_owned()),
                ],
            )
            .await?;
        decode_result(method, result)
    }

    /// `server.features`: returned untyped, the member set varies by server.
    pub async fn server_features(&mut self) -> Result<Value, CoreError> {
        self.call("server.features", Vec::new()).await
    }

    /// `blockchain.headers.subscribe`: the current tip. Later tip
    /// notifications show up as unmatched messages.
    pub async fn headers_subscribe(&mut self) -> Result<HeaderTip, CoreError> {
        let method = "blockchain.headers.subscribe";
        let result = self.call(method, Vec::new()).await?;
        decode_result(method, result)
    }

    /// `blockchain.scripthash.get_balance` for one script hash.
    pub async fn scripthash_get_balance(
        &mut self,
        script_hash: &ScriptHash,
    ) -> Result<Balance, CoreError> {
        let method = "blockchain.scripthash.get_balance";
        let result = self
            .call(method, vec![Value::String(script_hash.to_string())])
            .await?;
        decode_result(method, result)
    }
}

fn decode_result<T: DeserializeOwned>(method: &str, result: Value) -> Result<T, CoreError> {
    serde_json::from_value(result.clone()).map_err(|e| {
        RpcError::InvalidResponse(format!("decode {method} result: {e}; result={result}")).into()
    })
}
