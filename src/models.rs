use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Identity ---

/// UserRole
///
/// The RBAC classification stored on every profile. An unauthenticated request
/// has no role at all (`Option<UserRole>::None`), never a third variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum UserRole {
    Employee,
    HrAdmin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Employee => "employee",
            UserRole::HrAdmin => "hr_admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a profile carries a role string this service does not know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "employee" => Ok(UserRole::Employee),
            "hr_admin" => Ok(UserRole::HrAdmin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// User
///
/// Row from the `profiles` table. `role` stays a raw string here because the
/// column is plain text; it is parsed into `UserRole` during authentication.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub role: String,
}

/// UserProfile
///
/// Profile as returned to the client once the role has been validated.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub role: UserRole,
    /// Where this user lands after login.
    pub home_path: String,
}

// --- Leave ---

/// LeaveBalance
///
/// Yearly allocation and consumption for one leave type (`annual`, `sick`, ...).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default, PartialEq)]
pub struct LeaveBalance {
    pub leave_type: String,
    pub allocated_days: i32,
    pub used_days: i32,
}

/// LeaveBalanceView
///
/// `LeaveBalance` plus the derived values the balance bars render.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct LeaveBalanceView {
    pub leave_type: String,
    pub allocated_days: i32,
    pub used_days: i32,
    pub remaining_days: i32,
    /// 0..=100
    pub fill_percent: u8,
}

/// CreateLeaveRequest
///
/// Input payload for POST /request-leave. Both dates are inclusive.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateLeaveRequest {
    pub leave_type: String,
    #[ts(type = "string")]
    pub start_date: NaiveDate,
    #[ts(type = "string")]
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

/// LeaveRequest
///
/// Row from the `leave_requests` table. `status` is `pending`, `approved` or `rejected`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct LeaveRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub leave_type: String,
    #[ts(type = "string")]
    pub start_date: NaiveDate,
    #[ts(type = "string")]
    pub end_date: NaiveDate,
    pub days: i32,
    pub reason: Option<String>,
    pub status: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// LeaveStatus
///
/// Lifecycle of a leave request. Requests are created `pending`; HR admins move
/// them to `approved` or `rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
        }
    }
}

/// Input payload for PUT /admin/leave-requests/{id}/status.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpdateLeaveStatusRequest {
    pub status: LeaveStatus,
}

// --- Notifications ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub body: String,
    pub is_read: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

// --- Page payloads ---

/// DashboardView
///
/// Response for the employee home page (GET /).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct DashboardView {
    pub profile: UserProfile,
    pub leave_balances: Vec<LeaveBalanceView>,
    pub unread_notifications: usize,
}

/// AdminDashboardStats
///
/// Counters for the HR admin dashboard (GET /admin).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AdminDashboardStats {
    pub total_employees: i64,
    pub present_today: i64,
    pub pending_leave_requests: i64,
}

/// PageDescriptor
///
/// Minimal payload for the public auth pages; the client renders the form.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PageDescriptor {
    pub page: String,
    pub title: String,
}
