use crate::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::db::models::*;
use crate::error::AppResult;
use crate::routes::Actor;
use crate::services::LifecycleService;
use crate::store::PgStore;
use crate::validation::{ValidatedJson, rules};

#[derive(Deserialize, Validate)]
pub struct WithdrawalPayload {
    #[validate(
        length(max = 1000, message = "must be at most 1000 characters"),
        custom(function = "rules::not_blank", message = "must not be blank")
    )]
    pub reason: String,
}

pub async fn get_request_schedules(
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<i64>,
) -> AppResult<Json<ApiResponse<Vec<ScheduleEntry>>>> {
    let mut conn = state.db.get()?;
    let schedules = LifecycleService::schedules_for_request(&mut PgStore::new(&mut conn), request_id)?;
    Ok(Json(ApiResponse::success(schedules, "Schedules retrieved")))
}

/// Entries with a pending withdrawal against the given original request.
pub async fn get_parked_schedules(
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<i64>,
) -> AppResult<Json<ApiResponse<Vec<ScheduleEntry>>>> {
    let mut conn = state.db.get()?;
    let schedules = LifecycleService::schedules_parked_under(&mut PgStore::new(&mut conn), request_id)?;
    Ok(Json(ApiResponse::success(schedules, "Schedules retrieved")))
}

pub async fn create_withdrawal(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(schedule_id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<WithdrawalPayload>,
) -> AppResult<(StatusCode, Json<ApiResponse<WfhRequest>>)> {
    let mut conn = state.db.get()?;
    let ctx = state.context(actor.0);
    let withdrawal = LifecycleService::create_withdrawal(
        &mut PgStore::new(&mut conn),
        &ctx,
        schedule_id,
        &payload.reason,
    )?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(withdrawal, "Withdrawal requested")),
    ))
}
