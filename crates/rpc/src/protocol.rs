//! JSON-RPC 2.0 envelopes for `eth_call`.

use bytes::Bytes;
use corelib::{CallRequest, RemoteReadError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Block tag every read is evaluated at.
pub const LATEST: &str = "latest";

/// Outgoing request envelope.
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: Value,
}

impl<'a> RpcRequest<'a> {
    pub fn new(id: u64, method: &'a str, params: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method,
            params,
        }
    }

    /// `eth_call` for `request` at the latest block.
    pub fn eth_call(id: u64, request: &CallRequest) -> Self {
        let call = CallObject::from(request);
        Self::new(id, "eth_call", serde_json::json!([call, LATEST]))
    }
}

/// Transaction-call object (`to`, `data`, optional `from`), hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallObject {
    pub to: String,
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

impl From<&CallRequest> for CallObject {
    fn from(request: &CallRequest) -> Self {
        Self {
            to: request.to.to_string(),
            data: format!("0x{}", hex::encode(&request.data)),
            from: request.from.map(|address| address.to_string()),
        }
    }
}

/// Error object carried by a failed response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Incoming response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

impl RpcResponse {
    /// The `result` member, or the node's error.
    ///
    /// The response must echo `expected_id`. A null id is accepted only on
    /// error responses, where the node may not have parsed the request.
    pub fn into_result(self, expected_id: u64) -> Result<Value, RemoteReadError> {
        let echoed = match &self.id {
            Some(Value::Number(id)) => id.as_u64() == Some(expected_id),
            None | Some(Value::Null) => self.error.is_some(),
            Some(_) => false,
        };
        if !echoed {
            return Err(RemoteReadError::Decode(format!(
                "response id {} does not match request id {}",
                self.id.unwrap_or(Value::Null),
                expected_id
            )));
        }
        if let Some(error) = self.error {
            return Err(RemoteReadError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        self.result
            .ok_or_else(|| RemoteReadError::Decode("response has neither result nor error".into()))
    }
}

/// Decode a `0x`-prefixed hex data string.
pub fn decode_data(value: &Value) -> Result<Bytes, RemoteReadError> {
    let text = value
        .as_str()
        .ok_or_else(|| RemoteReadError::Decode(format!("expected hex string, got {}", value)))?;
    let digits = text.strip_prefix("0x").unwrap_or(text);
    hex::decode(digits)
        .map(Bytes::from)
        .map_err(|e| RemoteReadError::Decode(format!("invalid hex data: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::Address;

    #[test]
    fn test_eth_call_envelope() {
        let request = CallRequest {
            to: Address([0xaa; 20]),
            data: Bytes::from_static(&[0x01, 0xff, 0xc9, 0xa7]),
            from: None,
        };
        let body = serde_json::to_value(RpcRequest::eth_call(7, &request)).unwrap();

        assert_eq!(body["jsonrpc"], "2.0");
        assert_eq!(body["id"], 7);
        assert_eq!(body["method"], "eth_call");
        assert_eq!(
            body["params"][0]["to"],
            "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"
        );
        assert_eq!(body["params"][0]["data"], "0x01ffc9a7");
        assert!(body["params"][0].get("from").is_none());
        assert_eq!(body["params"][1], "latest");
    }

    #[test]
    fn test_call_object_includes_identity() {
        let request = CallRequest {
            to: Address([0xaa; 20]),
            data: Bytes::new(),
            from: Some(Address([0x77; 20])),
        };
        let call = CallObject::from(&request);
        assert_eq!(
            call.from.as_deref(),
            Some("0x7777777777777777777777777777777777777777")
        );
        assert_eq!(call.data, "0x");
    }

    #[test]
    fn test_error_response() {
        let response: RpcResponse = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":3,"message":"execution reverted","data":"0x"}}"#,
        )
        .unwrap();
        assert_eq!(
            response.into_result(1),
            Err(RemoteReadError::Rpc {
                code: 3,
                message: "execution reverted".into()
            })
        );
    }

    #[test]
    fn test_response_id_must_match_request() {
        let response: RpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":9,"result":"0x"}"#).unwrap();
        assert!(matches!(
            response.clone().into_result(4),
            Err(RemoteReadError::Decode(message)) if message.contains("request id 4")
        ));
        assert_eq!(response.into_result(9), Ok(Value::String("0x".into())));

        let anonymous: RpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","result":"0x"}"#).unwrap();
        assert!(matches!(
            anonymous.into_result(1),
            Err(RemoteReadError::Decode(_))
        ));
    }

    #[test]
    fn test_error_response_with_null_id() {
        let response: RpcResponse = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32700,"message":"parse error"}}"#,
        )
        .unwrap();
        assert_eq!(
            response.into_result(1),
            Err(RemoteReadError::Rpc {
                code: -32700,
                message: "parse error".into()
            })
        );
    }

    #[test]
    fn test_decode_data() {
        assert_eq!(
            decode_data(&Value::String("0x0001".into())).unwrap(),
            Bytes::from_static(&[0x00, 0x01])
        );
        assert_eq!(decode_data(&Value::String("0x".into())).unwrap(), Bytes::new());
        assert!(decode_data(&Value::Bool(true)).is_err());
        assert!(decode_data(&Value::String("0xzz".into())).is_err());
    }
}
