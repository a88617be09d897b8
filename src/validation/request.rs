use chrono::{Duration, NaiveDate};

use crate::error::{AppError, AppResult};
use crate::services::context::RequestContext;

pub const MAX_REASON_LEN: usize = 1000;
pub const MAX_REPORT_SPAN_DAYS: i64 = 366;

/// Start and optional end of a new request must fall inside the booking
/// window, and a recurring request must end strictly after it starts.
pub fn validate_request_window(
    ctx: &RequestContext,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> AppResult<()> {
    let (from, to) = (ctx.window_start(), ctx.window_end());

    if start_date < from || start_date > to {
        return Err(AppError::validation(format!(
            "Start date must be between {} and {}",
            from, to
        )));
    }

    if let Some(end_date) = end_date {
        if end_date < from || end_date > to {
            return Err(AppError::validation(format!(
                "End date must be between {} and {}",
                from, to
            )));
        }
        if end_date <= start_date {
            return Err(AppError::validation("End date must be after start date"));
        }
    }

    Ok(())
}

/// Approved days can only be withdrawn close to today, both directions inclusive.
pub fn validate_withdrawal_window(ctx: &RequestContext, date: NaiveDate) -> AppResult<()> {
    let window = Duration::days(ctx.policy.withdrawal_window_days);
    if date < ctx.today - window || date > ctx.today + window {
        return Err(AppError::out_of_range(format!(
            "Schedules can only be withdrawn within {} days of today",
            ctx.policy.withdrawal_window_days
        )));
    }
    Ok(())
}

pub fn validate_reason(reason: &str) -> AppResult<()> {
    if reason.trim().is_empty() {
        return Err(AppError::validation("Reason is required"));
    }
    if reason.chars().count() > MAX_REASON_LEN {
        return Err(AppError::validation(format!(
            "Reason must be at most {} characters",
            MAX_REASON_LEN
        )));
    }
    Ok(())
}

/// Resolves an optional report range, defaulting to the booking window.
pub fn validate_report_range(
    ctx: &RequestContext,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> AppResult<(NaiveDate, NaiveDate)> {
    let from = from.unwrap_or_else(|| ctx.window_start());
    let to = to.unwrap_or_else(|| ctx.window_end());

    if from > to {
        return Err(AppError::validation("Report start must not be after its end"));
    }
    if (to - from).num_days() > MAX_REPORT_SPAN_DAYS {
        return Err(AppError::validation(format!(
            "Report range must not exceed {} days",
            MAX_REPORT_SPAN_DAYS
        )));
    }
    Ok((from, to))
}
