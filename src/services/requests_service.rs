use chrono::NaiveDate;

use crate::{
    db::enums::{RequestKind, WfhDuration, WfhStatus},
    db::models::request::{NewWfhRequest, WfhRequest},
    error::{AppError, AppResult},
    services::context::RequestContext,
    store::{Directory, WfhStore},
    validation::request::{validate_reason, validate_request_window},
};

/// Everything a caller supplies to open a request. `manager_id` defaults to
/// the staff member's team lead.
#[derive(Debug, Clone)]
pub struct RequestDraft {
    pub staff_id: i64,
    pub manager_id: Option<i64>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub reason: String,
    pub kind: RequestKind,
    pub duration: WfhDuration,
}

pub struct RequestsService;

impl RequestsService {
    pub fn create<S: WfhStore + Directory>(
        store: &mut S,
        ctx: &RequestContext,
        draft: &RequestDraft,
    ) -> AppResult<WfhRequest> {
        if draft.kind == RequestKind::Cancellation {
            return Err(AppError::validation(
                "Cancellations are made by moving the request itself to CANCELLED",
            ));
        }
        validate_reason(&draft.reason)?;
        validate_request_window(ctx, draft.start_date, draft.end_date)?;

        let staff = store
            .lookup(draft.staff_id)?
            .ok_or_else(|| AppError::not_found(format!("staff {}", draft.staff_id)))?;

        // Meta requests target days that are already booked.
        if !draft.kind.is_meta() && store.blocking_request_exists(draft.staff_id, draft.start_date)? {
            tracing::warn!(
                staff_id = draft.staff_id,
                start_date = %draft.start_date,
                "Duplicate request refused"
            );
            return Err(AppError::duplicate("A request for this date already exists"));
        }

        let new_request = NewWfhRequest {
            staff_id: draft.staff_id,
            manager_id: draft.manager_id.unwrap_or_else(|| staff.team_lead()),
            request_date: ctx.today,
            start_date: draft.start_date,
            end_date: draft.end_date,
            kind: draft.kind,
            duration: draft.duration,
            status: WfhStatus::Pending,
            reason_for_applying: draft.reason.trim().to_string(),
        };
        let request = store.insert_request(&new_request)?;

        tracing::info!(
            request_id = request.id,
            staff_id = request.staff_id,
            kind = %request.kind,
            start_date = %request.start_date,
            "Request created"
        );
        Ok(request)
    }

    pub fn pending_for_manager<S: WfhStore>(
        store: &mut S,
        manager_id: i64,
    ) -> AppResult<Vec<WfhRequest>> {
        store.requests_for_manager(manager_id, Some(WfhStatus::Pending))
    }

    pub fn requests_for_staff<S: WfhStore>(
        store: &mut S,
        staff_id: i64,
    ) -> AppResult<Vec<WfhRequest>> {
        store.requests_for_staff(staff_id)
    }

    pub fn get<S: WfhStore>(store: &mut S, request_id: i64) -> AppResult<WfhRequest> {
        store
            .find_request(request_id)?
            .ok_or_else(|| AppError::not_found(format!("request {}", request_id)))
    }
}
