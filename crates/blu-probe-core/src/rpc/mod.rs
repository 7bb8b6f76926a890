//! Line-delimited JSON-RPC client for Electrum servers.
//!
//! [`FramedRpcClient`] frames requests and demultiplexes replies over any
//! `AsyncRead + AsyncWrite` stream; [`ElectrumClient`] adds request id
//! allocation and typed wrappers for the Electrum methods this crate uses;
//! [`connect`] opens the TCP stream. A scripted test stream lives in
//! `mock::MockStream`.

mod client;
mod connection;
mod electrum;
pub mod framing;
#[cfg(test)]
pub mod mock;
mod protocol;
pub mod types;

pub use client::FramedRpcClient;
pub use connection::connect;
pub use electrum::ElectrumClient;
pub use protocol::{RpcMessage, RpcNotification, RpcResponse};
pub use types::{Balance, HeaderTip, ServerVersion};
