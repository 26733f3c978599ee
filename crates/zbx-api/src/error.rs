use thiserror::Error;

/// Reply text the Zabbix API uses when an object id is unknown or invisible
/// to the authenticated user.
const NOT_FOUND_MARKERS: &[&str] = &[
    "does not exist",
    "No permissions to referred object",
];

/// Top-level error type for the `zbx-api` crate.
///
/// Covers every failure mode of a JSON-RPC round trip: authentication,
/// transport, the `error` object of the RPC envelope, and malformed replies.
/// `zbx-core` wraps these unmodified; it never retries.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed, or a call was made without a session.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The session token was rejected (expired or logged out).
    #[error("Session terminated -- re-authentication required")]
    SessionExpired,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Non-success HTTP status from the API endpoint.
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    // ── JSON-RPC ────────────────────────────────────────────────────
    /// The `error` member of a JSON-RPC response.
    #[error("API error {code} in {method}: {message} {data}")]
    Rpc {
        method: String,
        code: i64,
        message: String,
        data: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// The reply was valid JSON but had neither `result` nor `error`.
    #[error("Malformed response to {method}")]
    MalformedResponse { method: String },
}

impl Error {
    /// Returns `true` if the backend reported that the referenced object
    /// is missing (or not visible to us, which Zabbix does not distinguish).
    ///
    /// Only the RPC `error` object can say this. An HTTP 404 means the
    /// endpoint itself is wrong and stays a transport failure.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Rpc { data, message, .. } => NOT_FOUND_MARKERS
                .iter()
                .any(|m| data.contains(m) || message.contains(m)),
            _ => false,
        }
    }

    /// Returns `true` if this error indicates auth has expired
    /// and re-authentication might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        match self {
            Self::Authentication { .. } | Self::SessionExpired => true,
            Self::Rpc { data, .. } => {
                data.contains("Session terminated") || data.contains("Not authorised")
            }
            _ => false,
        }
    }

    /// Returns `true` if the request timed out at the transport.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// Returns `true` if the frontend could not be reached at all.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_connect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rpc(data: &str) -> Error {
        Error::Rpc {
            method: "maintenance.delete".into(),
            code: -32602,
            message: "Invalid params.".into(),
            data: data.into(),
        }
    }

    #[test]
    fn missing_object_is_not_found() {
        assert!(rpc("No permissions to referred object or it does not exist!").is_not_found());
    }

    #[test]
    fn other_rpc_errors_are_not_not_found() {
        assert!(!rpc("Incorrect value for field \"name\": cannot be empty.").is_not_found());
        assert!(!Error::SessionExpired.is_not_found());
    }

    #[test]
    fn http_404_is_not_an_object_miss() {
        let err = Error::Http {
            status: 404,
            url: "https://zabbix.example.com/api_jsonrpc.php".into(),
        };
        assert!(!err.is_not_found());
    }

    #[test]
    fn terminated_session_is_auth_expired() {
        assert!(rpc("Session terminated, re-login, please.").is_auth_expired());
    }
}
