//! HTTP interface - router, shared state and request handlers.
//!
//! The router is assembled from one generic route set per resource plus the
//! login, planner and report pages. Handlers authenticate through the
//! [`auth::CurrentUser`] extractor and return [`crate::errors::Result`], which
//! renders failures as JSON with a matching status code.

pub mod auth;
pub mod error;
pub mod login;
pub mod pages;
pub mod planner;
pub mod reports;
pub mod resources;

use crate::config::settings::Settings;
use crate::core::access::Access;
use crate::core::accounts::PasswordHasher;
use crate::core::catalog::{
    AttendanceRecords, CardTypes, Cards, Incidences, MaintenanceJobs, MaintenanceStatuses,
    MovementTypes, Movements, Payments, Pqrs, Prices, Roles, RouteStops, Routes, Schedules, Shifts,
    Stops, Tickets, TransportTypes, TransportUnits, Users,
};
use crate::core::resource::{Resource, SaveContext};
use crate::core::token::TokenService;
use axum::Router;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::response::Redirect;
use axum::routing::get;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Connection pool
    pub db: DatabaseConnection,
    /// Settings loaded at startup
    pub settings: Arc<Settings>,
    /// Signs and checks access tokens
    pub tokens: Arc<TokenService>,
    /// Hashes and checks passwords
    pub hasher: Arc<PasswordHasher>,
}

impl AppState {
    /// Builds the token service from `settings`.
    #[must_use]
    pub fn new(db: DatabaseConnection, settings: Settings) -> Self {
        let ttl = chrono::Duration::minutes(settings.auth.token_ttl_minutes);
        Self {
            db,
            tokens: Arc::new(TokenService::new(&settings.auth.secret_key, ttl)),
            hasher: Arc::new(PasswordHasher::default()),
            settings: Arc::new(settings),
        }
    }

    /// Services handed to resource write hooks
    #[must_use]
    pub fn save_context(&self) -> SaveContext<'_> {
        SaveContext {
            hasher: &self.hasher,
        }
    }
}

/// A served resource, as listed on dashboards
#[derive(Debug, Clone, Copy)]
pub struct ResourceLink {
    /// Name shown in menus
    pub label: &'static str,
    /// URL segment the resource is served under
    pub collection: &'static str,
    /// Scopes allowed to read and to write
    pub access: Access,
}

impl ResourceLink {
    const fn of<R: Resource>() -> Self {
        Self {
            label: R::LABEL,
            collection: R::COLLECTION,
            access: R::ACCESS,
        }
    }
}

macro_rules! register_resources {
    ($($resource:ty),+ $(,)?) => {
        /// Every resource served, in menu order
        pub const RESOURCES: &[ResourceLink] = &[$(ResourceLink::of::<$resource>()),+];

        fn resource_routes() -> Router<AppState> {
            Router::new()$(.merge(resources::routes::<$resource>()))+
        }
    };
}

register_resources!(
    Users,
    Roles,
    Shifts,
    Cards,
    CardTypes,
    Movements,
    MovementTypes,
    Payments,
    Prices,
    Routes,
    Stops,
    RouteStops,
    Schedules,
    TransportUnits,
    TransportTypes,
    MaintenanceJobs,
    MaintenanceStatuses,
    Tickets,
    Incidences,
    Pqrs,
    AttendanceRecords,
);

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {origin:?}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
}

async fn health() -> &'static str {
    "ok"
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.server.allowed_origins);
    Router::new()
        .route("/", get(|| async { Redirect::to("/login") }))
        .route("/health", get(health))
        .merge(login::routes())
        .merge(planner::routes())
        .merge(reports::routes())
        .merge(resource_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
