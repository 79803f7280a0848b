#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use morva_hr::{
    AccessPolicy, AppState, WeatherClient,
    config::AppConfig,
    models::{
        AdminDashboardStats, CreateLeaveRequest, LeaveBalance, LeaveRequest, LeaveStatus,
        Notification, User,
    },
    repository::{LeaveStatusChange, Repository},
};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub const EMPLOYEE_ID: Uuid = Uuid::from_u128(1);
pub const HR_ADMIN_ID: Uuid = Uuid::from_u128(2);
pub const CONTRACTOR_ID: Uuid = Uuid::from_u128(3);

// --- Mock Repository ---

/// In-memory stand-in for the hosted database. Leave submissions are recorded
/// so tests can assert what the handler passed down.
#[derive(Default)]
pub struct MockRepo {
    pub users: Vec<User>,
    pub balances: Vec<LeaveBalance>,
    pub notifications: Vec<Notification>,
    pub pending: Vec<LeaveRequest>,
    pub stats: AdminDashboardStats,
    pub submitted: Mutex<Vec<(Uuid, CreateLeaveRequest, i32)>>,
}

impl MockRepo {
    /// One employee, one HR admin and one profile with a role this service
    /// does not recognise.
    pub fn with_staff() -> Self {
        MockRepo {
            users: vec![
                user(EMPLOYEE_ID, "sara@morva.example", "employee"),
                user(HR_ADMIN_ID, "hr@morva.example", "hr_admin"),
                user(CONTRACTOR_ID, "ext@morva.example", "contractor"),
            ],
            balances: vec![
                LeaveBalance {
                    leave_type: "annual".to_string(),
                    allocated_days: 20,
                    used_days: 5,
                },
                LeaveBalance {
                    leave_type: "sick".to_string(),
                    allocated_days: 10,
                    used_days: 10,
                },
            ],
            ..MockRepo::default()
        }
    }
}

pub fn user(id: Uuid, email: &str, role: &str) -> User {
    User {
        id,
        email: email.to_string(),
        full_name: None,
        role: role.to_string(),
    }
}

pub fn notification(user_id: Uuid, is_read: bool) -> Notification {
    Notification {
        id: Uuid::new_v4(),
        user_id,
        title: "Payslip ready".to_string(),
        body: "Your payslip for this month is available.".to_string(),
        is_read,
        created_at: Utc::now(),
    }
}

pub fn pending_request(user_id: Uuid, days: i32) -> LeaveRequest {
    let start = chrono::NaiveDate::from_ymd_opt(2026, 11, 2).unwrap();
    LeaveRequest {
        id: Uuid::new_v4(),
        user_id,
        leave_type: "annual".to_string(),
        start_date: start,
        end_date: start + chrono::Duration::days(i64::from(days) - 1),
        days,
        reason: None,
        status: LeaveStatus::Pending.as_str().to_string(),
        created_at: Utc::now(),
    }
}

#[async_trait]
impl Repository for MockRepo {
    async fn get_user(&self, id: Uuid) -> Option<User> {
        self.users.iter().find(|u| u.id == id).cloned()
    }

    async fn get_leave_balances(&self, _user_id: Uuid) -> Vec<LeaveBalance> {
        self.balances.clone()
    }

    async fn create_leave_request(
        &self,
        user_id: Uuid,
        req: CreateLeaveRequest,
        days: i32,
    ) -> Option<LeaveRequest> {
        self.submitted
            .lock()
            .unwrap()
            .push((user_id, req.clone(), days));
        Some(LeaveRequest {
            id: Uuid::new_v4(),
            user_id,
            leave_type: req.leave_type,
            start_date: req.start_date,
            end_date: req.end_date,
            days,
            reason: req.reason,
            status: LeaveStatus::Pending.as_str().to_string(),
            created_at: Utc::now(),
        })
    }

    async fn get_pending_leave_requests(&self) -> Vec<LeaveRequest> {
        self.pending.clone()
    }

    async fn get_user_pending_leave_requests(&self, user_id: Uuid) -> Vec<LeaveRequest> {
        self.pending
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    async fn set_leave_status(&self, id: Uuid, status: LeaveStatus) -> LeaveStatusChange {
        let Some(request) = self.pending.iter().find(|r| r.id == id) else {
            return LeaveStatusChange::NotPending;
        };
        if status == LeaveStatus::Approved {
            let fits = self
                .balances
                .iter()
                .find(|b| b.leave_type == request.leave_type)
                .is_some_and(|b| b.used_days + request.days <= b.allocated_days);
            if !fits {
                return LeaveStatusChange::InsufficientBalance;
            }
        }
        LeaveStatusChange::Updated(LeaveRequest {
            status: status.as_str().to_string(),
            ..request.clone()
        })
    }

    async fn get_notifications(&self, user_id: Uuid) -> Vec<Notification> {
        self.notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }

    async fn mark_notification_read(&self, notification_id: Uuid, user_id: Uuid) -> bool {
        self.notifications
            .iter()
            .any(|n| n.id == notification_id && n.user_id == user_id)
    }

    async fn get_admin_stats(&self) -> AdminDashboardStats {
        self.stats.clone()
    }
}

// --- State Builders ---

pub fn test_state(repo: MockRepo) -> AppState {
    test_state_with(repo, AppConfig::default())
}

pub fn test_state_with(repo: MockRepo, config: AppConfig) -> AppState {
    // Nothing listens on port 1, so weather lookups fail fast in tests.
    let weather = WeatherClient::new("http://127.0.0.1:1", 35.6892, 51.3890);
    AppState {
        repo: Arc::new(repo),
        config,
        policy: Arc::new(AccessPolicy::morva().unwrap()),
        weather,
    }
}
