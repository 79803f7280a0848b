use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, patch},
};

/// Employee Router Module
///
/// Pages open to every signed-in role (`employee` and `hr_admin`). Handlers
/// read the caller from the `AuthUser` the guard stored on the request.
pub fn employee_routes() -> Router<AppState> {
    Router::new()
        // GET /
        // Dashboard with leave balance bars and the unread notification badge.
        .route("/", get(handlers::get_dashboard))
        // GET /notifications
        .route("/notifications", get(handlers::get_notifications))
        // PATCH /notifications/{id}/read
        // Ownership is enforced in the repository query.
        .route(
            "/notifications/{id}/read",
            patch(handlers::mark_notification_read),
        )
        // GET /request-leave  -> balances for the form
        // POST /request-leave -> submit a pending request
        .route(
            "/request-leave",
            get(handlers::get_leave_form).post(handlers::submit_leave_request),
        )
}
