use crate::{
    AppState,
    access::default_redirect_path,
    auth::AuthUser,
    leave::{self, LeaveValidationError},
    models::{
        AdminDashboardStats, CreateLeaveRequest, DashboardView, LeaveBalanceView, LeaveRequest,
        LeaveStatus, Notification, PageDescriptor, UpdateLeaveStatusRequest, UserProfile,
        UserRole,
    },
    repository::LeaveStatusChange,
    weather::{WeatherClient, WeatherReport},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

// Handlers run behind the access guard, which has already bounced requests
// whose role does not fit the route group. Admin handlers still check the
// role themselves so they stay safe if mounted elsewhere.
fn require_hr_admin(role: UserRole) -> Result<(), StatusCode> {
    if role == UserRole::HrAdmin {
        Ok(())
    } else {
        Err(StatusCode::FORBIDDEN)
    }
}

// --- Employee Pages ---

/// get_dashboard
///
/// [Employee Route] Home page: profile, leave balance bars and the unread
/// notification badge.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Dashboard", body = DashboardView),
        (status = 404, description = "Profile missing")
    )
)]
pub async fn get_dashboard(
    AuthUser { id, role }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<DashboardView>, StatusCode> {
    let user = state.repo.get_user(id).await.ok_or(StatusCode::NOT_FOUND)?;
    let balances = state.repo.get_leave_balances(id).await;
    let unread_notifications = state
        .repo
        .get_notifications(id)
        .await
        .iter()
        .filter(|n| !n.is_read)
        .count();

    Ok(Json(DashboardView {
        profile: UserProfile {
            id,
            email: user.email,
            full_name: user.full_name,
            role,
            home_path: default_redirect_path(Some(role)).to_string(),
        },
        leave_balances: leave::balance_views(&balances),
        unread_notifications,
    }))
}

#[utoipa::path(
    get,
    path = "/notifications",
    responses((status = 200, description = "My notifications, newest first", body = [Notification]))
)]
pub async fn get_notifications(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Json<Vec<Notification>> {
    Json(state.repo.get_notifications(id).await)
}

/// mark_notification_read
///
/// [Employee Route] 404 covers both "does not exist" and "not yours".
#[utoipa::path(
    patch,
    path = "/notifications/{id}/read",
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 204, description = "Marked as read"),
        (status = 404, description = "Not Found or Not Yours")
    )
)]
pub async fn mark_notification_read(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    if state.repo.mark_notification_read(id, user_id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

#[utoipa::path(
    get,
    path = "/request-leave",
    responses((status = 200, description = "Leave balances for the request form", body = [LeaveBalanceView]))
)]
pub async fn get_leave_form(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Json<Vec<LeaveBalanceView>> {
    let balances = state.repo.get_leave_balances(id).await;
    Json(leave::balance_views(&balances))
}

/// submit_leave_request
///
/// [Employee Route] Validates the date range and the remaining balance (less
/// days held by the caller's pending requests) before storing a pending request.
#[utoipa::path(
    post,
    path = "/request-leave",
    request_body = CreateLeaveRequest,
    responses(
        (status = 201, description = "Submitted", body = LeaveRequest),
        (status = 422, description = "Invalid range, unknown leave type or insufficient balance")
    )
)]
pub async fn submit_leave_request(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateLeaveRequest>,
) -> Result<(StatusCode, Json<LeaveRequest>), StatusCode> {
    let balances = state.repo.get_leave_balances(id).await;
    let pending = state.repo.get_user_pending_leave_requests(id).await;

    let days = leave::validate_leave_request(&payload, &balances, &pending).map_err(|e| {
        match &e {
            LeaveValidationError::InsufficientBalance {
                requested,
                remaining,
            } => tracing::info!(user_id = %id, requested, remaining, "leave request exceeds balance"),
            other => tracing::info!(user_id = %id, "leave request rejected: {:?}", other),
        }
        StatusCode::UNPROCESSABLE_ENTITY
    })?;

    let request = state
        .repo
        .create_leave_request(id, payload, days)
        .await
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok((StatusCode::CREATED, Json(request)))
}

// --- Admin Pages ---

#[utoipa::path(
    get,
    path = "/admin",
    responses(
        (status = 200, description = "HR dashboard counters", body = AdminDashboardStats),
        (status = 403, description = "Not an HR admin")
    )
)]
pub async fn get_admin_dashboard(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<AdminDashboardStats>, StatusCode> {
    require_hr_admin(role)?;
    Ok(Json(state.repo.get_admin_stats().await))
}

#[utoipa::path(
    get,
    path = "/admin/leave-requests",
    responses((status = 200, description = "Pending leave requests, oldest first", body = [LeaveRequest]))
)]
pub async fn get_pending_leave_requests(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<LeaveRequest>>, StatusCode> {
    require_hr_admin(role)?;
    Ok(Json(state.repo.get_pending_leave_requests().await))
}

/// update_leave_status
///
/// [Admin Route] Approves or rejects a pending request. Moving a request back
/// to `pending` is not allowed; already-decided requests report 404 and an
/// approval the balance can no longer cover reports 409.
#[utoipa::path(
    put,
    path = "/admin/leave-requests/{id}/status",
    params(("id" = Uuid, Path, description = "Leave request ID")),
    request_body = UpdateLeaveStatusRequest,
    responses(
        (status = 200, description = "Updated", body = LeaveRequest),
        (status = 404, description = "Not found or no longer pending"),
        (status = 409, description = "Approval exceeds the remaining leave balance"),
        (status = 422, description = "Target status is pending")
    )
)]
pub async fn update_leave_status(
    AuthUser { id: admin_id, role }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLeaveStatusRequest>,
) -> Result<Json<LeaveRequest>, StatusCode> {
    require_hr_admin(role)?;
    if payload.status == LeaveStatus::Pending {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }

    let updated = match state.repo.set_leave_status(id, payload.status).await {
        LeaveStatusChange::Updated(updated) => updated,
        LeaveStatusChange::NotPending => return Err(StatusCode::NOT_FOUND),
        LeaveStatusChange::InsufficientBalance => return Err(StatusCode::CONFLICT),
        LeaveStatusChange::Failed => return Err(StatusCode::INTERNAL_SERVER_ERROR),
    };
    tracing::info!(%admin_id, request_id = %id, status = payload.status.as_str(), "leave request decided");
    Ok(Json(updated))
}

// --- Auth Pages ---

#[utoipa::path(
    get,
    path = "/login",
    responses((status = 200, description = "Login page", body = PageDescriptor))
)]
pub async fn login_page() -> Json<PageDescriptor> {
    Json(PageDescriptor {
        page: "login".to_string(),
        title: "Sign in to MorvaHR".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/signup",
    responses((status = 200, description = "Signup page", body = PageDescriptor))
)]
pub async fn signup_page() -> Json<PageDescriptor> {
    Json(PageDescriptor {
        page: "signup".to_string(),
        title: "Create your MorvaHR account".to_string(),
    })
}

// --- Widgets ---

/// get_weather
///
/// [Public Route] Current conditions at the office for the dashboard widget.
/// Upstream failures surface as 502 so the widget can hide itself.
#[utoipa::path(
    get,
    path = "/api/weather",
    responses(
        (status = 200, description = "Current weather", body = WeatherReport),
        (status = 502, description = "Weather provider unavailable")
    )
)]
pub async fn get_weather(
    State(weather): State<WeatherClient>,
) -> Result<Json<WeatherReport>, StatusCode> {
    weather.current().await.map(Json).map_err(|e| {
        tracing::warn!("weather lookup failed: {}", e);
        StatusCode::BAD_GATEWAY
    })
}
