use chrono::NaiveDate;

use crate::models::{CreateLeaveRequest, LeaveBalance, LeaveBalanceView, LeaveRequest, LeaveStatus};

/// Days left in a balance; never negative, even when a balance was overdrawn.
pub fn remaining_days(balance: &LeaveBalance) -> i32 {
    (balance.allocated_days - balance.used_days).max(0)
}

/// fill_percent
///
/// Share of the allocation already used, as a whole percentage for the balance
/// bar. A zero (or negative) allocation renders as an empty bar rather than
/// dividing by zero, and overdrawn balances cap at a full bar.
pub fn fill_percent(used_days: i32, allocated_days: i32) -> u8 {
    if allocated_days <= 0 {
        return 0;
    }
    let ratio = f64::from(used_days) / f64::from(allocated_days) * 100.0;
    ratio.round().clamp(0.0, 100.0) as u8
}

impl From<&LeaveBalance> for LeaveBalanceView {
    fn from(balance: &LeaveBalance) -> Self {
        LeaveBalanceView {
            leave_type: balance.leave_type.clone(),
            allocated_days: balance.allocated_days,
            used_days: balance.used_days,
            remaining_days: remaining_days(balance),
            fill_percent: fill_percent(balance.used_days, balance.allocated_days),
        }
    }
}

pub fn balance_views(balances: &[LeaveBalance]) -> Vec<LeaveBalanceView> {
    balances.iter().map(LeaveBalanceView::from).collect()
}

/// Inclusive calendar-day span, `None` if `end` precedes `start`.
pub fn requested_days(start: NaiveDate, end: NaiveDate) -> Option<i32> {
    let span = (end - start).num_days();
    if span < 0 {
        return None;
    }
    i32::try_from(span + 1).ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveValidationError {
    InvertedRange,
    UnknownLeaveType(String),
    InsufficientBalance { requested: i32, remaining: i32 },
}

/// Days already claimed by the caller's undecided requests of `leave_type`.
pub fn committed_days(pending: &[LeaveRequest], leave_type: &str) -> i32 {
    pending
        .iter()
        .filter(|r| r.leave_type == leave_type && r.status == LeaveStatus::Pending.as_str())
        .map(|r| r.days)
        .sum()
}

/// validate_leave_request
///
/// Checks a submission against the caller's balances and returns the number
/// of days it would consume. Days held by the caller's pending requests count
/// against the balance, so `remaining` in `InsufficientBalance` is what is
/// still free after them.
pub fn validate_leave_request(
    request: &CreateLeaveRequest,
    balances: &[LeaveBalance],
    pending: &[LeaveRequest],
) -> Result<i32, LeaveValidationError> {
    let requested = requested_days(request.start_date, request.end_date)
        .ok_or(LeaveValidationError::InvertedRange)?;

    let balance = balances
        .iter()
        .find(|b| b.leave_type == request.leave_type)
        .ok_or_else(|| LeaveValidationError::UnknownLeaveType(request.leave_type.clone()))?;

    let remaining =
        (remaining_days(balance) - committed_days(pending, &request.leave_type)).max(0);
    if requested > remaining {
        return Err(LeaveValidationError::InsufficientBalance {
            requested,
            remaining,
        });
    }

    Ok(requested)
}
