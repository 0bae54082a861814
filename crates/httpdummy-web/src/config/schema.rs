use serde::Deserialize;
use httpdummy_core::error::{HttpDummyError, Result};

/// Backend configuration. Immutable once the backend is built.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    #[serde(default)]
    pub log_http_requests: bool,

    /// Answer unknown paths with the 404 page but status 200.
    #[serde(default)]
    pub code_404_as_200: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            log_http_requests: false,
            code_404_as_200: false,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.listen_addr.is_empty() {
            return Err(HttpDummyError::Config("missing listen addr".into()));
        }
        let port = self
            .listen_addr
            .rsplit_once(':')
            .map(|(_, port)| port)
            .ok_or_else(|| {
                HttpDummyError::Config(format!(
                    "listen addr {:?} must be host:port",
                    self.listen_addr
                ))
            })?;
        if port.parse::<u16>().is_err() {
            return Err(HttpDummyError::Config(format!(
                "listen addr {:?} has an invalid port",
                self.listen_addr
            )));
        }
        Ok(())
    }
}

pub fn default_listen_addr() -> String {
    "127.0.0.1:3001".into()
}
