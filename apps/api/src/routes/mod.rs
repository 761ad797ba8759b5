//! Composition of the HTTP surface.
//!
//! Every module declares a [`RouteMount`]; [`build_app`] resolves them into
//! final paths, rejects conflicting declarations, and wraps the result in
//! the gate, logging, timeout and CORS layers.

pub mod health;
pub mod modules;
pub mod profile;

use std::time::Duration;

use axum::{
    handler::Handler,
    http::Method,
    middleware::{from_fn, from_fn_with_state},
    routing::{self, MethodRouter},
    Router,
};
use thiserror::Error;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::cors::cors_layer;
use crate::errors::AppError;
use crate::gate::{log_request, require_credential, AuthGate};
use crate::state::AppState;

pub const API_PREFIX: &str = "/api/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

async fn not_implemented() -> Result<(), AppError> {
    Err(AppError::NotImplemented)
}

/// Where a module's declared paths are anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountBase {
    /// Mounted under `/api/v1` plus the given sub-path.
    Versioned(&'static str),
    /// Paths are already absolute and are mounted unchanged.
    Absolute,
}

impl MountBase {
    pub fn resolve(self, path: &str) -> String {
        match self {
            MountBase::Versioned(sub) => format!("{API_PREFIX}{sub}{path}"),
            MountBase::Absolute => path.to_string(),
        }
    }
}

/// A module's router-mount contract: its base plus (method, path, handler) triples.
pub struct RouteMount {
    name: &'static str,
    base: MountBase,
    routes: Vec<(Method, &'static str, MethodRouter<AppState>)>,
}

impl RouteMount {
    pub fn versioned(name: &'static str, sub_path: &'static str) -> Self {
        Self::new(name, MountBase::Versioned(sub_path))
    }

    pub fn absolute(name: &'static str) -> Self {
        Self::new(name, MountBase::Absolute)
    }

    fn new(name: &'static str, base: MountBase) -> Self {
        Self {
            name,
            base,
            routes: Vec::new(),
        }
    }

    pub fn get<H, T>(self, path: &'static str, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.on(Method::GET, path, routing::get(handler))
    }

    pub fn post<H, T>(self, path: &'static str, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.on(Method::POST, path, routing::post(handler))
    }

    pub fn put<H, T>(self, path: &'static str, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.on(Method::PUT, path, routing::put(handler))
    }

    fn on(mut self, method: Method, path: &'static str, handler: MethodRouter<AppState>) -> Self {
        self.routes.push((method, path, handler));
        self
    }
}

/// One entry of the resolved route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub module: &'static str,
    pub method: Method,
    pub path: String,
}

#[derive(Debug, Error)]
pub enum MountError {
    #[error("module '{module}' resolves to {path}, which repeats the /api/v1 prefix")]
    DoublePrefix { module: &'static str, path: String },

    #[error("module '{module}' declares {path}, which does not start with '/'")]
    InvalidPath { module: &'static str, path: String },

    #[error("{method} {path} is declared by both '{first}' and '{second}'")]
    Duplicate {
        method: Method,
        path: String,
        first: &'static str,
        second: &'static str,
    },
}

/// Resolves every mount to its final paths and merges them into one router.
pub fn mount_all(
    mounts: Vec<RouteMount>,
) -> Result<(Router<AppState>, Vec<ResolvedRoute>), MountError> {
    let mut router = Router::new();
    let mut table: Vec<ResolvedRoute> = Vec::new();

    for RouteMount { name, base, routes } in mounts {
        for (method, path, handler) in routes {
            let full = base.resolve(path);

            if !full.starts_with('/') {
                return Err(MountError::InvalidPath { module: name, path: full });
            }
            if full.matches(API_PREFIX).count() > 1 {
                return Err(MountError::DoublePrefix { module: name, path: full });
            }
            if let Some(existing) = table.iter().find(|r| r.method == method && r.path == full) {
                return Err(MountError::Duplicate {
                    method,
                    path: full,
                    first: existing.module,
                    second: name,
                });
            }

            router = router.route(&full, handler);
            table.push(ResolvedRoute {
                module: name,
                method,
                path: full,
            });
        }
    }

    Ok((router, table))
}

fn operational() -> RouteMount {
    RouteMount::absolute("root")
        .get("/", health::root_handler)
        .get("/health", health::health_handler)
}

/// The assembled application plus the resolved table for startup logging.
pub struct App {
    pub router: Router,
    pub routes: Vec<ResolvedRoute>,
}

/// Builds the full application.
///
/// Layer order (outermost first): CORS, request timeout, TraceLayer, the
/// request log tap, then the auth gate in front of every route and the 404
/// fallback.
pub fn build_app(state: AppState, gate: AuthGate) -> Result<App, MountError> {
    let mut mounts = vec![operational()];
    mounts.extend(modules::business_mounts(&state.config));

    let (router, routes) = mount_all(mounts)?;
    let cors = cors_layer(&state.config.allowed_origins);

    let router = router
        .layer(from_fn_with_state(gate, require_credential))
        .layer(from_fn(log_request))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(cors)
        .with_state(state);

    Ok(App { router, routes })
}
