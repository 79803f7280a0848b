use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, put},
};

/// Admin Router Module
///
/// HR administration pages, reachable only with the `hr_admin` role. The guard
/// redirects other roles to their landing page; handlers re-check the role and
/// answer 403 if they are ever reached without it.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin
        // Headcount, attendance today and the pending leave queue size.
        .route("/admin", get(handlers::get_admin_dashboard))
        // GET /admin/leave-requests
        .route(
            "/admin/leave-requests",
            get(handlers::get_pending_leave_requests),
        )
        // PUT /admin/leave-requests/{id}/status
        // Approval debits the employee's balance.
        .route(
            "/admin/leave-requests/{id}/status",
            put(handlers::update_leave_status),
        )
}
