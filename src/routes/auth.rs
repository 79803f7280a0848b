use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Auth Pages Router
///
/// The login and signup entry points. Both are on the literal public list, so
/// the guard lets them through without resolving an identity.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(handlers::login_page))
        .route("/signup", get(handlers::signup_page))
}
