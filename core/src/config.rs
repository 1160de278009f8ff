//! Client configuration.
//!
//! The base URL defaults to the production service. Setting
//! `IMJS_URL_PREFIX` (for example `qa-`) prepends the prefix to the host
//! name; the variable is read once when the configuration is created.

use url::Url;

use crate::error::ClientError;

/// Production endpoint of the iTwins service.
pub const DEFAULT_BASE_URL: &str = "https://api.bentley.com/itwins";

/// Environment variable holding an optional host prefix.
pub const URL_PREFIX_ENV: &str = "IMJS_URL_PREFIX";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    extra_headers: Vec<(String, String)>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            extra_headers: Vec::new(),
        }
    }
}

impl ClientConfig {
    /// Default configuration with the host prefix from `IMJS_URL_PREFIX`, if set.
    pub fn from_env() -> Result<Self, ClientError> {
        match std::env::var(URL_PREFIX_ENV) {
            Ok(prefix) if !prefix.is_empty() => Self::with_host_prefix(&prefix),
            _ => Ok(Self::default()),
        }
    }

    /// Default configuration with `prefix` prepended to the host name.
    pub fn with_host_prefix(prefix: &str) -> Result<Self, ClientError> {
        let mut url = parse_base_url(DEFAULT_BASE_URL)?;
        let host = url.host_str().unwrap_or_default().to_string();
        url.set_host(Some(&format!("{prefix}{host}")))
            .map_err(|e| ClientError::InvalidBaseUrl {
                url: format!("{prefix}{host}"),
                reason: e.to_string(),
            })?;
        Ok(Self {
            base_url: url.as_str().trim_end_matches('/').to_string(),
            extra_headers: Vec::new(),
        })
    }

    /// Replace the base URL. Trailing slashes are dropped.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ClientError> {
        parse_base_url(base_url)?;
        self.base_url = base_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Add a header sent with every request. `authorization` and
    /// `content-type` set by the client take precedence over it.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.extra_headers
            .push((name.to_ascii_lowercase(), value.to_string()));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn extra_headers(&self) -> &[(String, String)] {
        &self.extra_headers
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let url = Url::parse(raw).map_err(|e| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ClientError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme `{other}`"),
        }),
    }
}
