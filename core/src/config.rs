//! Backend location.
//!
//! Only the hostname is configurable; the port and scheme are fixed by the
//! backend deployment.

pub const HOST_ENV_VAR: &str = "TUNESHARE_API_HOST";
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8080;
pub const SCHEME: &str = "http";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
}

impl ClientConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
        }
    }

    /// Read the hostname from `TUNESHARE_API_HOST`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like `from_env`, with an injectable variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup(HOST_ENV_VAR).map(|h| h.trim().to_string()) {
            Some(host) if !host.is_empty() => Self::new(host),
            _ => {
                tracing::warn!(
                    var = HOST_ENV_VAR,
                    default = DEFAULT_HOST,
                    "backend host not configured, using default"
                );
                Self::new(DEFAULT_HOST)
            }
        }
    }

    /// `http://host:port`, with no trailing slash.
    pub fn base_path(&self) -> String {
        format!("{SCHEME}://{}:{}", self.host, self.port)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST)
    }
}
