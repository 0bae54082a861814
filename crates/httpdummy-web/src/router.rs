//! Axum router wiring.
//!
//! Routes are registered through [`RouteTable`] so `/routes` can list them.
//! Middleware, outermost first: request-rate tick, optional request log,
//! panic recovery. All of them also wrap the not-found fallback.

use axum::{
    handler::Handler,
    http::Method,
    middleware::{from_fn, from_fn_with_state},
    routing::{on, MethodFilter},
    Router,
};
use serde::{Serialize, Serializer};

use crate::{app_state::AppState, assets, handlers, middleware, ops, pages};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDescriptor {
    #[serde(serialize_with = "method_name")]
    pub method: Method,
    pub path: &'static str,
}

fn method_name<S: Serializer>(method: &Method, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(method.as_str())
}

/// Router under construction plus the list of what went into it.
pub struct RouteTable {
    router: Router<AppState>,
    routes: Vec<RouteDescriptor>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteTable {
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            routes: Vec::new(),
        }
    }

    /// Add `handler` for `method` on `path`. Several methods may share a
    /// path; registering the same method and path twice panics at startup.
    pub fn register<H, T>(mut self, method: Method, path: &'static str, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        let Ok(filter) = MethodFilter::try_from(method.clone()) else {
            tracing::warn!(%method, path, "unsupported method, route skipped");
            return self;
        };
        self.router = self.router.route(path, on(filter, handler));
        self.routes.push(RouteDescriptor { method, path });
        self
    }

    pub fn finish(self) -> (Router<AppState>, Vec<RouteDescriptor>) {
        (self.router, self.routes)
    }
}

pub fn build_router(state: AppState) -> Router {
    let (routes, table) = RouteTable::new()
        .register(Method::GET, "/_status/health", ops::health)
        .register(Method::HEAD, "/_status/health", ops::health)
        .register(Method::GET, "/_status/metrics", ops::metrics)
        .register(Method::GET, "/s/*filepath", assets::serve)
        .register(Method::GET, "/", pages::index)
        .register(Method::GET, "/slow/:duration", handlers::slow::slow_request)
        .register(Method::POST, "/post", handlers::post::post_sink)
        .register(Method::POST, "/post/:duration", handlers::post::post_sink_paced)
        .register(Method::GET, "/routes", pages::routes)
        .finish();
    state.set_routes(table);

    let mut router = routes
        .fallback(pages::not_found)
        .layer(from_fn(middleware::recover_panic));
    if state.cfg().log_http_requests {
        router = router.layer(from_fn(middleware::log_request));
    }
    router
        .layer(from_fn_with_state(state.clone(), middleware::tick_rate))
        .with_state(state)
}
