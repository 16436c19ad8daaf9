//! JSON-RPC transport for the openBIS V3 API.
//!
//! openBIS exposes its V3 API as JSON-RPC 2.0 over HTTP POST. Every call is a
//! positional-parameter invocation against a facade endpoint; the application
//! server facade lives at `/openbis/openbis/rmi-application-server-v3.json`
//! and each data store server exposes
//! `/datastore_server/rmi-data-store-server-v3.json`.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::errors::OpenbisError;
use crate::observability::openbis_metrics;

pub const APPLICATION_SERVER_API: &str = "/openbis/openbis/rmi-application-server-v3.json";
pub const DATA_STORE_SERVER_API: &str = "/datastore_server/rmi-data-store-server-v3.json";

const CONNECT_TIMEOUT_SECS: u64 = 30;
const REQUEST_TIMEOUT_SECS: u64 = 120;
const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: String,
    method: &'a str,
    params: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    // A present-but-null `result` (e.g. a rejected login) must stay
    // distinguishable from an absent field, so wrap the value in `Some`
    // whenever the key exists at all.
    #[serde(default, deserialize_with = "present_value")]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Value>,
}

/// Build the shared HTTP client used for all RPC endpoints.
pub fn http_client() -> Result<reqwest::Client, OpenbisError> {
    Ok(reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::none())
        .build()?)
}

/// A single JSON-RPC endpoint (application server or data store server).
#[derive(Debug, Clone)]
pub struct RpcEndpoint {
    http: reqwest::Client,
    url: Url,
}

impl RpcEndpoint {
    pub fn new(http: reqwest::Client, url: Url) -> Self {
        Self { http, url }
    }

    /// Join `api_path` onto a server base URL.
    pub fn for_api(http: reqwest::Client, base: &Url, api_path: &str) -> Result<Self, OpenbisError> {
        let url = base
            .join(api_path)
            .map_err(|e| OpenbisError::Config(format!("invalid server URL: {e}")))?;
        Ok(Self::new(http, url))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Invoke `method` with positional params and return the raw result value.
    pub async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, OpenbisError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: uuid::Uuid::new_v4().to_string(),
            method,
            params,
        };

        debug!(method, endpoint = %self.url, "Issuing openBIS RPC call");
        openbis_metrics().record_request();

        let response = self
            .http
            .post(self.url.clone())
            .json(&request)
            .send()
            .await
            .inspect_err(|_| openbis_metrics().record_error())?;

        let status = response.status();
        if !status.is_success() {
            openbis_metrics().record_error();
            let body = capped_body(response).await;
            return Err(OpenbisError::Http { status, body });
        }

        let envelope: RpcResponse = response.json().await.inspect_err(|_| {
            openbis_metrics().record_error();
        })?;

        if let Some(error) = envelope.error {
            openbis_metrics().record_error();
            let message = error
                .message
                .or_else(|| error.data.as_ref().map(|d| d.to_string()))
                .unwrap_or_else(|| "unknown server error".to_string());
            warn!(method, code = ?error.code, %message, "openBIS RPC call failed");
            return Err(OpenbisError::Rpc {
                code: error.code,
                message,
            });
        }

        envelope.result.ok_or_else(|| {
            OpenbisError::UnexpectedShape(format!("RPC response for '{method}' carried no result"))
        })
    }
}

/// Read a failed response body, truncated so a misbehaving server cannot make
/// error reporting unbounded.
async fn capped_body(response: reqwest::Response) -> String {
    match response.text().await {
        Ok(mut text) => {
            if text.len() > MAX_ERROR_BODY_BYTES {
                text.truncate(MAX_ERROR_BODY_BYTES);
                text.push_str("...(truncated)");
            }
            text
        }
        Err(_) => String::from("<unreadable body>"),
    }
}
