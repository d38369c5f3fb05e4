// WalletLens — JSON-RPC Helpers

use super::primitives::hex_encode;
use crate::atoms::error::{LensError, LensResult};
use log::debug;
use std::time::Duration;

/// Low-level JSON-RPC 2.0 call
pub(crate) async fn rpc_call(
    client: &reqwest::Client,
    rpc_url: &str,
    method: &str,
    params: serde_json::Value,
    timeout: Duration,
) -> LensResult<serde_json::Value> {
    let body = serde_json::json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params,
        "id": 1
    });
    debug!("[rpc] {} → {}", method, rpc_url);

    let resp = client
        .post(rpc_url)
        .json(&body)
        .timeout(timeout)
        .send()
        .await?;

    let result: serde_json::Value = resp.json().await?;
    extract_result(result)
}

/// Pull `result` out of a JSON-RPC envelope, surfacing `error` objects.
pub(crate) fn extract_result(envelope: serde_json::Value) -> LensResult<serde_json::Value> {
    if let Some(error) = envelope.get("error") {
        return Err(LensError::Rpc(error.to_string()));
    }

    envelope
        .get("result")
        .cloned()
        .ok_or_else(|| LensError::Rpc("response missing 'result' field".into()))
}

/// Native balance of an address, as a hex quantity
pub(crate) async fn eth_get_balance(
    client: &reqwest::Client,
    rpc_url: &str,
    address: &str,
    timeout: Duration,
) -> LensResult<String> {
    let result = rpc_call(client, rpc_url, "eth_getBalance", serde_json::json!([address, "latest"]), timeout).await?;
    result.as_str().map(String::from).ok_or(LensError::Rpc("Invalid balance result".into()))
}

/// Call a contract (read-only)
pub(crate) async fn eth_call(
    client: &reqwest::Client,
    rpc_url: &str,
    to: &str,
    data: &[u8],
    timeout: Duration,
) -> LensResult<String> {
    let result = rpc_call(
        client,
        rpc_url,
        "eth_call",
        serde_json::json!([{ "to": to, "data": hex_encode(data) }, "latest"]),
        timeout,
    )
    .await?;
    result.as_str().map(String::from).ok_or(LensError::Rpc("Invalid eth_call result".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_result_returns_payload() {
        let env = serde_json::json!({ "jsonrpc": "2.0", "id": 1, "result": "0x10" });
        assert_eq!(extract_result(env).unwrap(), serde_json::json!("0x10"));
    }

    #[test]
    fn extract_result_surfaces_error_object() {
        let env = serde_json::json!({
            "jsonrpc": "2.0", "id": 1,
            "error": { "code": -32000, "message": "execution reverted" }
        });
        let err = extract_result(env).unwrap_err();
        assert!(matches!(err, LensError::Rpc(ref m) if m.contains("execution reverted")));
    }

    #[test]
    fn extract_result_requires_result_field() {
        let env = serde_json::json!({ "jsonrpc": "2.0", "id": 1 });
        assert!(matches!(extract_result(env), Err(LensError::Rpc(_))));
    }
}
