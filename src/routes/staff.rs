use crate::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::models::*;
use crate::error::AppResult;
use crate::services::{LifecycleService, RequestsService};
use crate::store::PgStore;
use crate::validation::rules;

#[derive(Deserialize)]
pub struct PendingWithdrawalQuery {
    #[serde(deserialize_with = "rules::calendar_date")]
    pub date: NaiveDate,
}

#[derive(Serialize)]
pub struct PendingWithdrawalInfo {
    pub staff_id: i64,
    pub date: NaiveDate,
    pub pending: bool,
}

pub async fn get_pending_for_manager(
    State(state): State<Arc<AppState>>,
    Path(manager_id): Path<i64>,
) -> AppResult<Json<ApiResponse<Vec<WfhRequest>>>> {
    let mut conn = state.db.get()?;
    let requests = RequestsService::pending_for_manager(&mut PgStore::new(&mut conn), manager_id)?;
    Ok(Json(ApiResponse::success(requests, "Pending requests retrieved")))
}

pub async fn get_staff_requests(
    State(state): State<Arc<AppState>>,
    Path(staff_id): Path<i64>,
) -> AppResult<Json<ApiResponse<Vec<WfhRequest>>>> {
    let mut conn = state.db.get()?;
    let requests = RequestsService::requests_for_staff(&mut PgStore::new(&mut conn), staff_id)?;
    Ok(Json(ApiResponse::success(requests, "Requests retrieved")))
}

pub async fn get_pending_withdrawal(
    State(state): State<Arc<AppState>>,
    Path(staff_id): Path<i64>,
    Query(query): Query<PendingWithdrawalQuery>,
) -> AppResult<Json<ApiResponse<PendingWithdrawalInfo>>> {
    let mut conn = state.db.get()?;
    let pending =
        LifecycleService::has_pending_withdrawal(&mut PgStore::new(&mut conn), staff_id, query.date)?;
    Ok(Json(ApiResponse::success(
        PendingWithdrawalInfo {
            staff_id,
            date: query.date,
            pending,
        },
        "Withdrawal status retrieved",
    )))
}
