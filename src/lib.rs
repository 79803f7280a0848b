use axum::{
    Router,
    extract::FromRef,
    http::{HeaderName, StatusCode},
    middleware,
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod access;
pub mod auth;
pub mod config;
pub mod guard;
pub mod handlers;
pub mod leave;
pub mod models;
pub mod repository;
pub mod weather;

// Routers grouped by access group (public, auth, employee, admin).
pub mod routes;
use routes::{admin, auth as auth_pages, employee, public};

// --- Public Re-exports ---

pub use access::{AccessDecision, AccessPolicy, RouteGroup, default_redirect_path};
pub use config::AppConfig;
pub use repository::{PostgresRepository, RepositoryState};
pub use weather::WeatherClient;

/// ApiDoc
///
/// OpenAPI document for every handler and schema, served at
/// `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::get_dashboard, handlers::get_notifications, handlers::mark_notification_read,
        handlers::get_leave_form, handlers::submit_leave_request, handlers::get_admin_dashboard,
        handlers::get_pending_leave_requests, handlers::update_leave_status,
        handlers::login_page, handlers::signup_page, handlers::get_weather
    ),
    components(
        schemas(
            models::UserRole, models::UserProfile, models::DashboardView,
            models::LeaveBalanceView, models::CreateLeaveRequest, models::LeaveRequest,
            models::LeaveStatus, models::UpdateLeaveStatusRequest, models::Notification,
            models::AdminDashboardStats, models::PageDescriptor,
            weather::WeatherReport, weather::WeatherCondition,
        )
    ),
    tags(
        (name = "morva-hr", description = "MorvaHR attendance, leave and HR dashboard API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single shared container of services and configuration. Cloned per
/// request; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub repo: RepositoryState,
    pub config: AppConfig,
    /// Route-permission table consulted by the access guard.
    pub policy: Arc<AccessPolicy>,
    pub weather: WeatherClient,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for WeatherClient {
    fn from_ref(app_state: &AppState) -> WeatherClient {
        app_state.weather.clone()
    }
}

/// create_router
///
/// Assembles all routers, wraps them in the access guard and applies the
/// observability layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    // The guard wraps every route and the fallback, so a protected path is
    // redirected whether or not a handler exists for it. Unclassified,
    // unprotected paths (health, weather, docs) are always allowed.
    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(auth_pages::auth_routes())
        .merge(employee::employee_routes())
        .merge(admin::admin_routes())
        .fallback(|| async { StatusCode::NOT_FOUND })
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard::access_guard,
        ))
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(
                    x_request_id.clone(),
                    MakeRequestUuid,
                ))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for `TraceLayer` carrying method, uri and the `x-request-id` so all
/// log lines of one request correlate.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
