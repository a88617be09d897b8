use crate::AppState;
use axum::{Json, extract::State};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::db::enums::WfhDuration;
use crate::db::models::ApiResponse;
use crate::error::AppResult;
use crate::routes::Actor;
use crate::services::{Admission, AdmissionService, ExpiryService};
use crate::store::PgStore;
use crate::validation::{ValidatedJson, rules};

#[derive(Deserialize, Validate)]
pub struct AdmissionCheckPayload {
    pub staff_id: i64,
    #[serde(deserialize_with = "rules::calendar_date")]
    pub date: NaiveDate,
    pub duration: WfhDuration,
}

#[derive(Deserialize, Validate)]
pub struct ExpirePayload {
    #[serde(default, deserialize_with = "rules::optional_calendar_date")]
    pub cutoff: Option<NaiveDate>,
}

#[derive(Serialize)]
pub struct ExpireResult {
    pub cutoff: NaiveDate,
    pub expired: Vec<i64>,
}

pub async fn check_admission(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    ValidatedJson(payload): ValidatedJson<AdmissionCheckPayload>,
) -> AppResult<Json<ApiResponse<Admission>>> {
    let mut conn = state.db.get()?;
    let ctx = state.context(actor.0);
    let decision = AdmissionService::check(
        &mut PgStore::new(&mut conn),
        &ctx,
        payload.staff_id,
        payload.date,
        payload.duration,
    )?;
    Ok(Json(ApiResponse::success(decision, "Admission checked")))
}

/// Runs the expiry sweep on demand. Without a cutoff the default window applies.
pub async fn expire_requests(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    ValidatedJson(payload): ValidatedJson<ExpirePayload>,
) -> AppResult<Json<ApiResponse<ExpireResult>>> {
    let mut conn = state.db.get()?;
    let ctx = state.context(actor.0);
    let cutoff = payload
        .cutoff
        .unwrap_or_else(|| ExpiryService::default_cutoff(&ctx));
    let expired = ExpiryService::sweep_expired(&mut PgStore::new(&mut conn), &ctx, cutoff)?;
    tracing::info!(count = expired.len(), %cutoff, "Manual expiry sweep finished");
    Ok(Json(ApiResponse::success(
        ExpireResult { cutoff, expired },
        "Expired requests swept",
    )))
}
