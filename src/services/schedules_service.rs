use serde::Serialize;

use crate::{
    db::enums::{RequestKind, WfhStatus},
    db::models::request::WfhRequest,
    db::models::schedule::{NewScheduleEntry, ScheduleEntry},
    error::{AppError, AppResult},
    services::context::RequestContext,
    services::requests_service::{RequestDraft, RequestsService},
    store::{Directory, WfhStore},
};

/// A freshly created request together with the entries it expanded into.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub request: WfhRequest,
    pub schedules: Vec<ScheduleEntry>,
}

pub struct SchedulesService;

impl SchedulesService {
    /// Creates a request and expands it in one transaction. When every
    /// candidate date is taken nothing is persisted.
    pub fn submit<S: WfhStore + Directory>(
        store: &mut S,
        ctx: &RequestContext,
        draft: &RequestDraft,
    ) -> AppResult<Submission> {
        if draft.kind != RequestKind::WorkFromHome {
            return Err(AppError::validation(format!(
                "Only work-from-home requests can be submitted, not {}",
                draft.kind
            )));
        }

        store.transaction(|tx| {
            let request = RequestsService::create(tx, ctx, draft)?;
            let schedules = Self::materialize(tx, &request)?;
            if schedules.is_empty() {
                tracing::warn!(request_id = request.id, "Every requested date is already taken");
                return Err(AppError::EmptySchedule {
                    request_id: request.id,
                });
            }
            Ok(Submission { request, schedules })
        })
    }

    /// Expands an existing request. If no date could be scheduled the
    /// request is deleted before the error is returned.
    pub fn expand<S: WfhStore + Directory>(
        store: &mut S,
        request_id: i64,
    ) -> AppResult<Vec<ScheduleEntry>> {
        let schedules = store.transaction(|tx| {
            let request = tx
                .lock_request(request_id)?
                .ok_or_else(|| AppError::not_found(format!("request {}", request_id)))?;

            if request.kind != RequestKind::WorkFromHome {
                return Err(AppError::validation("Only work-from-home requests can be expanded"));
            }
            if request.status != WfhStatus::Pending {
                return Err(AppError::validation(format!(
                    "Request {} is already {}",
                    request_id, request.status
                )));
            }
            if !tx.schedules_for_request(request_id)?.is_empty() {
                return Err(AppError::validation(format!(
                    "Request {} has already been expanded",
                    request_id
                )));
            }

            let schedules = Self::materialize(tx, &request)?;
            if schedules.is_empty() {
                tx.delete_request(request_id)?;
                tracing::warn!(request_id, "Every requested date is already taken, request removed");
            }
            Ok(schedules)
        })?;

        if schedules.is_empty() {
            return Err(AppError::EmptySchedule { request_id });
        }
        Ok(schedules)
    }

    /// One PENDING entry per free occurrence date; taken dates are skipped.
    fn materialize<S: WfhStore + Directory>(
        store: &mut S,
        request: &WfhRequest,
    ) -> AppResult<Vec<ScheduleEntry>> {
        let staff = store
            .lookup(request.staff_id)?
            .ok_or_else(|| AppError::not_found(format!("staff {}", request.staff_id)))?;

        let mut created = Vec::new();
        for date in request.occurrence_dates() {
            if let Some(existing) = store.find_occupying_schedule(request.staff_id, date)? {
                tracing::debug!(
                    request_id = request.id,
                    %date,
                    existing_schedule = existing.id,
                    "Date already scheduled, skipping"
                );
                continue;
            }

            let entry = store.insert_schedule(&NewScheduleEntry {
                request_id: request.id,
                staff_id: request.staff_id,
                manager_id: request.manager_id,
                date,
                duration: request.duration,
                status: WfhStatus::Pending,
                dept: staff.dept.clone(),
                position: staff.position.clone(),
            })?;
            created.push(entry);
        }

        tracing::info!(
            request_id = request.id,
            created = created.len(),
            "Request expanded into schedules"
        );
        Ok(created)
    }
}
