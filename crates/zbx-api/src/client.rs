// JSON-RPC HTTP client
//
// Wraps `reqwest::Client` with the Zabbix endpoint URL, the JSON-RPC 2.0
// envelope, and session token handling. Object-kind modules (hosts,
// maintenance, triggers, ...) are implemented as inherent methods in
// separate files to keep this module focused on transport mechanics.

use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use url::Url;

use crate::auth::ApiVersion;
use crate::error::Error;
use crate::transport::TransportConfig;

const ENDPOINT: &str = "api_jsonrpc.php";

/// Outgoing JSON-RPC request envelope.
#[derive(Serialize)]
struct RpcRequest<'a, P: ?Sized> {
    jsonrpc: &'static str,
    method: &'a str,
    params: &'a P,
    id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    auth: Option<&'a str>,
}

/// Incoming JSON-RPC response envelope. Exactly one of `result` and
/// `error` is present on a well-formed reply.
#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct RpcError {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

/// Raw HTTP client for the Zabbix JSON-RPC API.
///
/// Every call is one POST to `<server>/api_jsonrpc.php`. The session token,
/// once set by [`ZabbixClient::login`] or
/// [`ZabbixClient::authenticate_with_token`], is attached to every call
/// except the anonymous ones (`apiinfo.version`, `user.login`).
pub struct ZabbixClient {
    http: reqwest::Client,
    endpoint: Url,
    token: RwLock<Option<SecretString>>,
    version: RwLock<Option<ApiVersion>>,
    next_id: AtomicU64,
}

impl ZabbixClient {
    /// Create a client for the frontend at `server` (e.g.
    /// `https://zabbix.example.com/zabbix`). The JSON-RPC endpoint path is
    /// appended unless `server` already ends with it.
    pub fn new(server: &Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, server)
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, server: &Url) -> Result<Self, Error> {
        Ok(Self {
            http,
            endpoint: endpoint_url(server)?,
            token: RwLock::new(None),
            version: RwLock::new(None),
            next_id: AtomicU64::new(1),
        })
    }

    /// The resolved JSON-RPC endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Whether a session token is present.
    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_ok_and(|t| t.is_some())
    }

    pub(crate) fn set_token(&self, token: Option<SecretString>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = token;
        }
    }

    pub(crate) fn set_version(&self, version: ApiVersion) {
        if let Ok(mut guard) = self.version.write() {
            *guard = Some(version);
        }
    }

    /// The server API version, if it has been fetched.
    pub fn cached_version(&self) -> Option<ApiVersion> {
        self.version.read().ok().and_then(|v| *v)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Call an authenticated method and deserialize its `result`.
    pub(crate) async fn call<P, T>(&self, method: &str, params: &P) -> Result<T, Error>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let token = self
            .token
            .read()
            .ok()
            .and_then(|t| t.as_ref().map(|s| s.expose_secret().to_owned()))
            .ok_or_else(|| Error::Authentication {
                message: format!("{method} requires a session; log in first"),
            })?;
        self.send(method, params, Some(&token)).await
    }

    /// Call a method that must be sent without credentials.
    pub(crate) async fn call_anonymous<P, T>(&self, method: &str, params: &P) -> Result<T, Error>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(method, params, None).await
    }

    async fn send<P, T>(&self, method: &str, params: &P, token: Option<&str>) -> Result<T, Error>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        // 6.4+ takes the token as a bearer header; older servers only
        // read it from the envelope.
        let bearer = self.cached_version().is_some_and(|v| v.supports_bearer_auth());
        let request = RpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id,
            auth: if bearer { None } else { token },
        };

        debug!(method, id, "rpc call");

        let mut builder = self
            .http
            .post(self.endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json-rpc")
            .json(&request);
        if let (true, Some(token)) = (bearer, token) {
            builder = builder.bearer_auth(token);
        }

        let resp = builder.send().await.map_err(Error::Transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                url: self.endpoint.to_string(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(method, id, body = %body, "rpc reply");

        let envelope: RpcResponse<T> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: format!("{method}: {e}"),
                body: body.clone(),
            })?;

        match (envelope.result, envelope.error) {
            (_, Some(err)) => Err(Error::Rpc {
                method: method.to_owned(),
                code: err.code,
                message: err.message,
                data: match err.data {
                    Some(serde_json::Value::String(s)) => s,
                    Some(other) => other.to_string(),
                    None => String::new(),
                },
            }),
            (Some(result), None) => Ok(result),
            (None, None) => Err(Error::MalformedResponse {
                method: method.to_owned(),
            }),
        }
    }
}

/// Append the JSON-RPC endpoint to a frontend URL.
fn endpoint_url(server: &Url) -> Result<Url, Error> {
    let base = server.as_str().trim_end_matches('/');
    if base.ends_with(ENDPOINT) {
        return Ok(server.clone());
    }
    Ok(Url::parse(&format!("{base}/{ENDPOINT}"))?)
}
