//! Global service status reported by the health endpoint.

use std::sync::RwLock;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum State {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl State {
    pub fn as_str(self) -> &'static str {
        match self {
            State::Ok => "OK",
            State::Warning => "WARNING",
            State::Critical => "CRITICAL",
            State::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug)]
pub struct HealthStatus {
    inner: RwLock<(State, String)>,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            inner: RwLock::new((State::Ok, String::new())),
        }
    }
}

impl HealthStatus {
    pub fn update(&self, state: State, message: impl Into<String>) {
        let mut g = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *g = (state, message.into());
    }

    pub fn state(&self) -> State {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).0
    }

    pub fn message(&self) -> String {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).1.clone()
    }
}
