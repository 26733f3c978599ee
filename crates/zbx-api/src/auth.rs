// Session authentication and server version detection
//
// `user.login` returns a session token that is attached to every later
// call. The login parameter name changed from `user` to `username` in 5.4,
// and 6.4 moved the token into an `Authorization: Bearer` header, so the
// server version is fetched first.

use std::fmt;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::ZabbixClient;
use crate::error::Error;

/// A `major.minor.patch` Zabbix API version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiVersion {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

impl ApiVersion {
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self { major, minor, patch }
    }

    /// `user.login` takes `username` (5.4+) instead of `user`.
    pub fn uses_username_login(self) -> bool {
        self >= Self::new(5, 4, 0)
    }

    /// Token may be sent as `Authorization: Bearer` (6.4+).
    pub fn supports_bearer_auth(self) -> bool {
        self >= Self::new(6, 4, 0)
    }
}

impl FromStr for ApiVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || Error::Deserialization {
            message: format!("unrecognized API version '{s}'"),
            body: s.to_owned(),
        };
        let mut parts = s.trim().split('.').map(|p| {
            // Pre-release suffixes ("0rc1") only carry the leading digits.
            let digits: String = p.chars().take_while(char::is_ascii_digit).collect();
            digits.parse::<u16>()
        });
        let major = parts.next().ok_or_else(malformed)?.map_err(|_| malformed())?;
        let minor = parts.next().unwrap_or(Ok(0)).map_err(|_| malformed())?;
        let patch = parts.next().unwrap_or(Ok(0)).unwrap_or(0);
        Ok(Self::new(major, minor, patch))
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl ZabbixClient {
    /// Fetch the server API version.
    ///
    /// `apiinfo.version` (anonymous)
    pub async fn api_version(&self) -> Result<ApiVersion, Error> {
        if let Some(v) = self.cached_version() {
            return Ok(v);
        }
        let raw: String = self.call_anonymous("apiinfo.version", &json!([])).await?;
        let version: ApiVersion = raw.parse()?;
        debug!(%version, "detected API version");
        self.set_version(version);
        Ok(version)
    }

    /// Authenticate with username/password and keep the session token.
    ///
    /// `user.login`
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let version = self.api_version().await?;
        let user_key = if version.uses_username_login() {
            "username"
        } else {
            "user"
        };

        debug!(username, "logging in");
        let mut params = serde_json::Map::new();
        params.insert(user_key.into(), json!(username));
        params.insert("password".into(), json!(password.expose_secret()));

        let token: String = self
            .call_anonymous("user.login", &params)
            .await
            .map_err(|e| match e {
                Error::Rpc { message, data, .. } => Error::Authentication {
                    message: format!("{message} {data}").trim().to_owned(),
                },
                other => other,
            })?;

        self.set_token(Some(SecretString::from(token)));
        debug!("login successful");
        Ok(())
    }

    /// Use a pre-issued API token (5.4+) instead of a login session.
    pub async fn authenticate_with_token(&self, token: SecretString) -> Result<(), Error> {
        self.api_version().await?;
        self.set_token(Some(token));
        Ok(())
    }

    /// End the current session.
    ///
    /// `user.logout`
    pub async fn logout(&self) -> Result<(), Error> {
        let _: bool = self.call("user.logout", &json!([])).await?;
        self.set_token(None);
        debug!("logout complete");
        Ok(())
    }
}
