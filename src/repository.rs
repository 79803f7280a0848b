use crate::models::{
    AdminDashboardStats, CreateLeaveRequest, LeaveBalance, LeaveRequest, LeaveStatus,
    Notification, User,
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Repository Trait
///
/// Abstract contract for every query the service makes against the hosted
/// backend's database. Handlers, the `AuthUser` extractor and the access guard
/// only ever see `Arc<dyn Repository>`, so tests can swap in a mock.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Identity ---
    async fn get_user(&self, id: Uuid) -> Option<User>;

    // --- Leave ---
    async fn get_leave_balances(&self, user_id: Uuid) -> Vec<LeaveBalance>;
    // Inserts a pending request consuming `days`. None on database failure.
    async fn create_leave_request(
        &self,
        user_id: Uuid,
        req: CreateLeaveRequest,
        days: i32,
    ) -> Option<LeaveRequest>;
    async fn get_pending_leave_requests(&self) -> Vec<LeaveRequest>;
    async fn get_user_pending_leave_requests(&self, user_id: Uuid) -> Vec<LeaveRequest>;
    // Only transitions requests that are still pending.
    async fn set_leave_status(&self, id: Uuid, status: LeaveStatus) -> LeaveStatusChange;

    // --- Notifications ---
    async fn get_notifications(&self, user_id: Uuid) -> Vec<Notification>;
    // Ownership enforced by `user_id`.
    async fn mark_notification_read(&self, notification_id: Uuid, user_id: Uuid) -> bool;

    // --- HR Dashboard ---
    async fn get_admin_stats(&self) -> AdminDashboardStats;
}

pub type RepositoryState = Arc<dyn Repository>;

/// Outcome of `Repository::set_leave_status`.
#[derive(Debug, Clone)]
pub enum LeaveStatusChange {
    Updated(LeaveRequest),
    /// No request with that id, or it was already decided.
    NotPending,
    /// Approval would push `used_days` past `allocated_days`; nothing changed.
    InsufficientBalance,
    Failed,
}

/// PostgresRepository
///
/// `Repository` backed by the hosted Postgres instance.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self, sql: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("count error ({}): {:?}", sql, e);
                0
            })
    }
}

const LEAVE_REQUEST_COLUMNS: &str =
    "id, user_id, leave_type, start_date, end_date, days, reason, status, created_at";

#[async_trait]
impl Repository for PostgresRepository {
    async fn get_user(&self, id: Uuid) -> Option<User> {
        sqlx::query_as::<_, User>("SELECT id, email, full_name, role FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_user error: {:?}", e);
                None
            })
    }

    async fn get_leave_balances(&self, user_id: Uuid) -> Vec<LeaveBalance> {
        match sqlx::query_as::<_, LeaveBalance>(
            "SELECT leave_type, allocated_days, used_days FROM leave_balances WHERE user_id = $1 ORDER BY leave_type",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        {
            Ok(b) => b,
            Err(e) => {
                tracing::error!("get_leave_balances error: {:?}", e);
                vec![]
            }
        }
    }

    /// create_leave_request
    ///
    /// New requests always start `pending`. Balances are only debited when an
    /// HR admin approves, see `set_leave_status`.
    async fn create_leave_request(
        &self,
        user_id: Uuid,
        req: CreateLeaveRequest,
        days: i32,
    ) -> Option<LeaveRequest> {
        let sql = format!(
            "INSERT INTO leave_requests (id, user_id, leave_type, start_date, end_date, days, reason, status, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {LEAVE_REQUEST_COLUMNS}"
        );
        sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(req.leave_type)
            .bind(req.start_date)
            .bind(req.end_date)
            .bind(days)
            .bind(req.reason)
            .bind(LeaveStatus::Pending.as_str())
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| tracing::error!("create_leave_request error: {:?}", e))
            .ok()
    }

    async fn get_pending_leave_requests(&self) -> Vec<LeaveRequest> {
        let sql = format!(
            "SELECT {LEAVE_REQUEST_COLUMNS} FROM leave_requests WHERE status = 'pending' ORDER BY created_at ASC"
        );
        match sqlx::query_as::<_, LeaveRequest>(&sql)
            .fetch_all(&self.pool)
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::error!("get_pending_leave_requests error: {:?}", e);
                vec![]
            }
        }
    }

    async fn get_user_pending_leave_requests(&self, user_id: Uuid) -> Vec<LeaveRequest> {
        let sql = format!(
            "SELECT {LEAVE_REQUEST_COLUMNS} FROM leave_requests WHERE user_id = $1 AND status = 'pending' ORDER BY created_at ASC"
        );
        match sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::error!("get_user_pending_leave_requests error: {:?}", e);
                vec![]
            }
        }
    }

    /// set_leave_status
    ///
    /// Approval debits the matching balance in the same transaction as the
    /// status change. The debit only applies while it fits the allocation;
    /// otherwise the transaction is rolled back and the request stays pending.
    async fn set_leave_status(&self, id: Uuid, status: LeaveStatus) -> LeaveStatusChange {
        let mut tx = match self.pool.begin().await {
            Ok(tx) => tx,
            Err(e) => {
                tracing::error!("set_leave_status begin error: {:?}", e);
                return LeaveStatusChange::Failed;
            }
        };

        let sql = format!(
            "UPDATE leave_requests SET status = $1 WHERE id = $2 AND status = 'pending' RETURNING {LEAVE_REQUEST_COLUMNS}"
        );
        let updated = match sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(status.as_str())
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
        {
            Ok(Some(updated)) => updated,
            Ok(None) => return LeaveStatusChange::NotPending,
            Err(e) => {
                tracing::error!("set_leave_status error: {:?}", e);
                return LeaveStatusChange::Failed;
            }
        };

        if status == LeaveStatus::Approved {
            let debit = sqlx::query(
                "UPDATE leave_balances SET used_days = used_days + $1 \
                 WHERE user_id = $2 AND leave_type = $3 AND used_days + $1 <= allocated_days",
            )
            .bind(updated.days)
            .bind(updated.user_id)
            .bind(&updated.leave_type)
            .execute(&mut *tx)
            .await;
            match debit {
                Ok(res) if res.rows_affected() == 0 => {
                    tracing::warn!(request_id = %id, days = updated.days, "approval exceeds leave balance");
                    if let Err(e) = tx.rollback().await {
                        tracing::error!("set_leave_status rollback error: {:?}", e);
                    }
                    return LeaveStatusChange::InsufficientBalance;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!("leave balance debit error: {:?}", e);
                    return LeaveStatusChange::Failed;
                }
            }
        }

        match tx.commit().await {
            Ok(()) => LeaveStatusChange::Updated(updated),
            Err(e) => {
                tracing::error!("set_leave_status commit error: {:?}", e);
                LeaveStatusChange::Failed
            }
        }
    }

    async fn get_notifications(&self, user_id: Uuid) -> Vec<Notification> {
        match sqlx::query_as::<_, Notification>(
            "SELECT id, user_id, title, body, is_read, created_at FROM notifications WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        {
            Ok(n) => n,
            Err(e) => {
                tracing::error!("get_notifications error: {:?}", e);
                vec![]
            }
        }
    }

    async fn mark_notification_read(&self, notification_id: Uuid, user_id: Uuid) -> bool {
        match sqlx::query("UPDATE notifications SET is_read = true WHERE id = $1 AND user_id = $2")
            .bind(notification_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("mark_notification_read error: {:?}", e);
                false
            }
        }
    }

    /// get_admin_stats
    ///
    /// `present_today` counts distinct employees with a check-in dated today.
    async fn get_admin_stats(&self) -> AdminDashboardStats {
        let total_employees = self
            .count("SELECT COUNT(*) FROM profiles WHERE role = 'employee'")
            .await;
        let present_today = self
            .count("SELECT COUNT(DISTINCT user_id) FROM attendance WHERE check_in::date = CURRENT_DATE")
            .await;
        let pending_leave_requests = self
            .count("SELECT COUNT(*) FROM leave_requests WHERE status = 'pending'")
            .await;
        AdminDashboardStats {
            total_employees,
            present_today,
            pending_leave_requests,
        }
    }
}
