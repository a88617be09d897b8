use crate::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::db::enums::{RequestKind, WfhDuration, WfhStatus};
use crate::db::models::*;
use crate::error::AppResult;
use crate::routes::Actor;
use crate::services::{LifecycleService, RequestDraft, RequestsService, SchedulesService, Submission};
use crate::store::PgStore;
use crate::validation::{ValidatedJson, rules};

#[derive(Deserialize, Validate)]
pub struct SubmitRequestPayload {
    pub staff_id: i64,
    #[serde(default)]
    pub manager_id: Option<i64>,
    #[serde(deserialize_with = "rules::calendar_date")]
    pub start_date: NaiveDate,
    #[serde(default, deserialize_with = "rules::optional_calendar_date")]
    pub end_date: Option<NaiveDate>,
    #[validate(
        length(max = 1000, message = "must be at most 1000 characters"),
        custom(function = "rules::not_blank", message = "must not be blank")
    )]
    pub reason: String,
    pub duration: WfhDuration,
}

impl SubmitRequestPayload {
    fn into_draft(self) -> RequestDraft {
        RequestDraft {
            staff_id: self.staff_id,
            manager_id: self.manager_id,
            start_date: self.start_date,
            end_date: self.end_date,
            reason: self.reason,
            kind: RequestKind::WorkFromHome,
            duration: self.duration,
        }
    }
}

#[derive(Deserialize, Validate)]
pub struct UpdateStatusPayload {
    pub status: WfhStatus,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    #[serde(default)]
    pub reason: Option<String>,
}

/// Creates a request and its schedule entries in one step.
pub async fn submit_request(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    ValidatedJson(payload): ValidatedJson<SubmitRequestPayload>,
) -> AppResult<(StatusCode, Json<ApiResponse<Submission>>)> {
    let mut conn = state.db.get()?;
    let ctx = state.context(actor.0);
    let submission = SchedulesService::submit(&mut PgStore::new(&mut conn), &ctx, &payload.into_draft())?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(submission, "Request submitted")),
    ))
}

pub async fn get_request(
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<i64>,
) -> AppResult<Json<ApiResponse<WfhRequest>>> {
    let mut conn = state.db.get()?;
    let request = RequestsService::get(&mut PgStore::new(&mut conn), request_id)?;
    Ok(Json(ApiResponse::success(request, "Request retrieved")))
}

pub async fn expand_request(
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<i64>,
) -> AppResult<(StatusCode, Json<ApiResponse<Vec<ScheduleEntry>>>)> {
    let mut conn = state.db.get()?;
    let schedules = SchedulesService::expand(&mut PgStore::new(&mut conn), request_id)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(schedules, "Schedules created")),
    ))
}

pub async fn update_request_status(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(request_id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateStatusPayload>,
) -> AppResult<Json<ApiResponse<WfhRequest>>> {
    let mut conn = state.db.get()?;
    let ctx = state.context(actor.0);
    let request = LifecycleService::set_status(
        &mut PgStore::new(&mut conn),
        &ctx,
        request_id,
        payload.status,
        payload.reason.as_deref(),
    )?;
    Ok(Json(ApiResponse::success(request, "Request status updated")))
}
