use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, RpcError};

/// Outgoing request. Serialized as `{"id":..,"method":..,"params":[..]}`.
#[derive(Serialize)]
pub(super) struct JsonRpcRequest<'a> {
    pub(super) id: u64,
    pub(super) method: &'a str,
    pub(super) params: &'a [Value],
}

/// A reply to a request, carrying either `result` or `error`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RpcResponse {
    pub id: Value,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl RpcResponse {
    /// Whether this response answers request `id`. Only a numeric JSON id
    /// can match; `1.0` answers request 1.
    pub fn answers(&self, id: u64) -> bool {
        match self.id.as_u64() {
            Some(n) => n == id,
            None => self.id.as_f64() == Some(id as f64),
        }
    }

    /// Convert into the call outcome; an `error` member wins over `result`.
    pub fn into_result(self) -> Result<Value, CoreError> {
        match self.error {
            Some(err) if !err.is_null() => Err(parse_jsonrpc_error(err)),
            _ => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

/// A server-initiated message without an id.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RpcNotification {
    pub method: String,
    #[serde(default)]
    pub params: Vec<Value>,
}

/// Any JSON object received from the server.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcMessage {
    Response(RpcResponse),
    Notification(RpcNotification),
    /// An object that is neither, such as a `result` without an `id`.
    Other(Value),
}

/// Parse one received line.
///
/// Returns `Ok(None)` for blank lines and `Err` with a reason for lines that
/// are not UTF-8, not JSON, or not a JSON object.
pub(super) fn parse_message(line: &[u8]) -> Result<Option<RpcMessage>, String> {
    let text = std::str::from_utf8(line).map_err(|e| format!("line is not UTF-8: {e}"))?;
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(text).map_err(|e| format!("invalid JSON: {e}"))?;
    let Value::Object(ref object) = value else {
        return Err("JSON-RPC message must be an object".to_owned());
    };

    let message = if object.get("id").is_some_and(|id| !id.is_null()) {
        serde_json::from_value::<RpcResponse>(value.clone())
            .map(RpcMessage::Response)
            .unwrap_or(RpcMessage::Other(value))
    } else if object.contains_key("method") {
        serde_json::from_value::<RpcNotification>(value.clone())
            .map(RpcMessage::Notification)
            .unwrap_or(RpcMessage::Other(value))
    } else {
        RpcMessage::Other(value)
    };
    Ok(Some(message))
}

/// Parse a JSON-RPC error value into a structured `CoreError`.
///
/// Errors of the shape `{"code": <int>, "message": <string>}` become
/// `ServerError`; anything else falls back to `InvalidResponse` with the
/// raw JSON.
pub(super) fn parse_jsonrpc_error(err: Value) -> CoreError {
    #[derive(Deserialize)]
    struct JsonRpcError {
        code: i64,
        message: String,
    }

    if let Ok(parsed) = serde_json::from_value::<JsonRpcError>(err.clone()) {
        CoreError::Rpc(RpcError::ServerError {
            code: parsed.code,
            message: parsed.message,
        })
    } else {
        CoreError::Rpc(RpcError::InvalidResponse(format!(
            "non-standard JSON-RPC error: {err}"
        )))
    }
}
