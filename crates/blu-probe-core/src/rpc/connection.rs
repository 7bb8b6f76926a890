use std::io;
use std::time::Duration;

use tokio::net::TcpStream;
use tracing::debug;

use crate::error::{CoreError, RpcError};

/// Open a plain TCP connection to `host:port` within `timeout`.
///
/// TLS is not handled here; for a TLS port wrap the stream before handing
/// it to a client.
pub async fn connect(host: &str, port: u16, timeout: Duration) -> Result<TcpStream, CoreError> {
    if host.trim().is_empty() {
        return Err(RpcError::Transport(io::Error::new(
            io::ErrorKind::InvalidInput,
            "server host must not be empty",
        ))
        .into());
    }

    let stream = tokio::time::timeout(timeout, TcpStream::connect((host, port)))
        .await
        .map_err(|_| RpcError::TimedOut(timeout))?
        .map_err(RpcError::Transport)?;
    stream.set_nodelay(true).map_err(RpcError::Transport)?;

    debug!(host, port, "connected to electrum server");
    Ok(stream)
}
