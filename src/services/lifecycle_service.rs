use chrono::NaiveDate;

use crate::{
    db::enums::{RequestKind, WfhStatus},
    db::models::request::WfhRequest,
    db::models::schedule::ScheduleEntry,
    error::{AppError, AppResult},
    services::admission_service::AdmissionService,
    services::context::RequestContext,
    services::requests_service::{RequestDraft, RequestsService},
    store::{Directory, WfhStore},
    validation::request::{validate_reason, validate_withdrawal_window},
};

pub struct LifecycleService;

impl LifecycleService {
    /// Moves a PENDING request to APPROVED, REJECTED or CANCELLED and carries
    /// the change to the schedule entries it owns.
    pub fn set_status<S: WfhStore + Directory>(
        store: &mut S,
        ctx: &RequestContext,
        request_id: i64,
        target: WfhStatus,
        reason: Option<&str>,
    ) -> AppResult<WfhRequest> {
        if !matches!(
            target,
            WfhStatus::Approved | WfhStatus::Rejected | WfhStatus::Cancelled
        ) {
            return Err(AppError::validation(format!(
                "Requests cannot be moved to {} directly",
                target
            )));
        }
        if let Some(reason) = reason {
            validate_reason(reason)?;
        }

        store.transaction(|tx| {
            let request = tx
                .lock_request(request_id)?
                .ok_or_else(|| AppError::not_found(format!("request {}", request_id)))?;

            if request.status != WfhStatus::Pending {
                return Err(AppError::validation(format!(
                    "Request {} is already finalized ({})",
                    request_id, request.status
                )));
            }

            match request.kind {
                RequestKind::WorkFromHome => Self::resolve_ordinary(tx, ctx, &request, target, reason),
                RequestKind::Withdrawal => Self::resolve_withdrawal(tx, &request, target, reason),
                // Stored cancel markers target nothing this service can act on.
                RequestKind::Cancellation => Err(AppError::validation(format!(
                    "Request {} is a {} marker and cannot be resolved",
                    request_id, request.kind
                ))),
            }
        })
    }

    fn resolve_ordinary<S: WfhStore + Directory>(
        tx: &mut S,
        ctx: &RequestContext,
        request: &WfhRequest,
        target: WfhStatus,
        reason: Option<&str>,
    ) -> AppResult<WfhRequest> {
        if target == WfhStatus::Approved {
            if request.start_date < ctx.window_start() {
                return Err(AppError::validation(format!(
                    "Request {} starts before {} and can no longer be approved",
                    request.id,
                    ctx.window_start()
                )));
            }

            let upcoming: Vec<NaiveDate> = request
                .occurrence_dates()
                .into_iter()
                .filter(|date| *date >= ctx.today)
                .collect();
            let violated =
                AdmissionService::violations(tx, ctx, request.staff_id, &upcoming, request.duration)?;
            if !violated.is_empty() {
                tracing::warn!(
                    request_id = request.id,
                    violations = violated.len(),
                    "Approval refused by team capacity policy"
                );
                return Err(AppError::PolicyViolation { dates: violated });
            }
        }

        let rejection = reason.filter(|_| target == WfhStatus::Rejected);
        let updated = tx.update_request_status(request.id, target, rejection)?;
        // A cancellation reaches every owned entry; other outcomes only settle pending ones.
        let only_pending = target != WfhStatus::Cancelled;
        let touched = tx.update_schedule_status_for_request(request.id, target, only_pending)?;

        tracing::info!(
            request_id = request.id,
            status = %target,
            schedules = touched,
            "Request status updated"
        );
        Ok(updated)
    }

    fn resolve_withdrawal<S: WfhStore>(
        tx: &mut S,
        withdrawal: &WfhRequest,
        target: WfhStatus,
        reason: Option<&str>,
    ) -> AppResult<WfhRequest> {
        if target != WfhStatus::Approved {
            let rejection = reason.filter(|_| target == WfhStatus::Rejected);
            let updated = tx.update_request_status(withdrawal.id, target, rejection)?;
            let restored = Self::release_withdrawal(tx, withdrawal.id)?;
            tracing::info!(
                request_id = withdrawal.id,
                status = %target,
                schedules = restored,
                "Withdrawal closed, schedules returned to their requests"
            );
            return Ok(updated);
        }

        let updated = tx.update_request_status(withdrawal.id, WfhStatus::Withdrawn, None)?;
        let entries = Self::held_entries(tx, withdrawal.id)?;
        for mut entry in entries {
            let original_id = entry.complete_withdrawal(&withdrawal.reason_for_applying)?;
            tx.save_schedule(&entry)?;

            if let Some(original) = tx.lock_request(original_id)? {
                if !original.is_recurring() {
                    tx.update_request_status(original_id, WfhStatus::Withdrawn, None)?;
                }
            }
            tracing::info!(
                request_id = withdrawal.id,
                schedule_id = entry.id,
                original_request = original_id,
                "Schedule withdrawn"
            );
        }
        Ok(updated)
    }

    /// Hands every entry held by a withdrawal back to its parked request.
    /// Returns how many entries were restored.
    pub(crate) fn release_withdrawal<S: WfhStore>(tx: &mut S, withdrawal_id: i64) -> AppResult<usize> {
        let entries = tx.lock_schedules_for_request(withdrawal_id)?;
        let count = entries.len();
        for mut entry in entries {
            entry.restore_owner()?;
            tx.save_schedule(&entry)?;
        }
        Ok(count)
    }

    fn held_entries<S: WfhStore>(tx: &mut S, withdrawal_id: i64) -> AppResult<Vec<ScheduleEntry>> {
        let entries = tx.lock_schedules_for_request(withdrawal_id)?;
        if entries.is_empty() {
            return Err(AppError::internal(format!(
                "Withdrawal request {} holds no schedule",
                withdrawal_id
            )));
        }
        Ok(entries)
    }

    /// Opens a withdrawal against one approved schedule entry. The entry
    /// moves under the new request and keeps its APPROVED status until the
    /// withdrawal is resolved.
    pub fn create_withdrawal<S: WfhStore + Directory>(
        store: &mut S,
        ctx: &RequestContext,
        schedule_id: i64,
        reason: &str,
    ) -> AppResult<WfhRequest> {
        validate_reason(reason)?;

        store.transaction(|tx| {
            let mut entry = tx
                .lock_schedule(schedule_id)?
                .ok_or_else(|| AppError::not_found(format!("schedule {}", schedule_id)))?;

            validate_withdrawal_window(ctx, entry.date)?;

            let withdrawal = RequestsService::create(
                tx,
                ctx,
                &RequestDraft {
                    staff_id: entry.staff_id,
                    manager_id: Some(entry.manager_id),
                    start_date: entry.date,
                    end_date: None,
                    reason: reason.to_string(),
                    kind: RequestKind::Withdrawal,
                    duration: entry.duration,
                },
            )?;

            entry.reassign_to_withdrawal(withdrawal.id)?;
            tx.save_schedule(&entry)?;

            tracing::info!(
                request_id = withdrawal.id,
                schedule_id,
                date = %entry.date,
                "Withdrawal requested"
            );
            Ok(withdrawal)
        })
    }

    pub fn has_pending_withdrawal<S: WfhStore>(
        store: &mut S,
        staff_id: i64,
        date: NaiveDate,
    ) -> AppResult<bool> {
        store.pending_withdrawal_exists(staff_id, date)
    }

    pub fn schedules_for_request<S: WfhStore>(
        store: &mut S,
        request_id: i64,
    ) -> AppResult<Vec<ScheduleEntry>> {
        RequestsService::get(store, request_id)?;
        store.schedules_for_request(request_id)
    }

    pub fn schedules_parked_under<S: WfhStore>(
        store: &mut S,
        request_id: i64,
    ) -> AppResult<Vec<ScheduleEntry>> {
        RequestsService::get(store, request_id)?;
        store.schedules_parked_under(request_id)
    }
}
