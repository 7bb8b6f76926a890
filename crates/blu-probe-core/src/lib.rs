pub mod address;
pub mod error;
pub mod network;
pub mod rpc;
pub mod types;

pub use address::{decode, DecodedScript};
pub use error::{CoreError, RpcError};
pub use network::NetworkParams;
pub use types::{ScriptHash, ScriptType};
