//! Shared application state for the web backend.
//!
//! Built once at startup: validated config, parsed templates, `conn.*`
//! instrument handles and the route list for `/routes`. Nothing here is
//! mutated by request handlers apart from the instruments themselves.

use std::sync::{Arc, OnceLock};

use httpdummy_core::error::Result;
use httpdummy_core::metrics::{Registry, State};

use crate::config::Config;
use crate::obs::metrics::ConnMetrics;
use crate::router::RouteDescriptor;
use crate::templates::Templates;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: Config,
    templates: Templates,
    registry: Arc<Registry>,
    conn: ConnMetrics,
    routes: OnceLock<Vec<RouteDescriptor>>,
}

impl AppState {
    /// Validate config, parse templates and register instruments.
    /// Fails on a bad config, a broken template or a duplicate metric name.
    pub fn new(cfg: Config, registry: Arc<Registry>) -> Result<Self> {
        cfg.validate()?;
        let templates = Templates::load()?;
        let conn = ConnMetrics::register(&registry)?;
        registry.status().update(State::Ok, "httpdummy running");

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                templates,
                registry,
                conn,
                routes: OnceLock::new(),
            }),
        })
    }

    pub fn cfg(&self) -> &Config {
        &self.inner.cfg
    }

    pub fn templates(&self) -> &Templates {
        &self.inner.templates
    }

    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    pub fn conn(&self) -> &ConnMetrics {
        &self.inner.conn
    }

    /// Record the registered routes. Only the first call has an effect.
    pub fn set_routes(&self, routes: Vec<RouteDescriptor>) {
        let _ = self.inner.routes.set(routes);
    }

    pub fn routes(&self) -> &[RouteDescriptor] {
        self.inner.routes.get().map(Vec::as_slice).unwrap_or(&[])
    }
}
