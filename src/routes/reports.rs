use crate::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

use crate::db::models::ApiResponse;
use crate::error::{AppError, AppResult};
use crate::routes::Actor;
use crate::services::reporting_service::{CalendarDay, DaySummary, ReportingService, StaffDayStatus};
use crate::store::PgStore;
use crate::validation::{request::validate_report_range, rules};

/// Optional `from`/`to` bounds; missing ends default to the booking window.
#[derive(Deserialize)]
pub struct RangeQuery {
    #[serde(default, deserialize_with = "rules::optional_calendar_date")]
    pub from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "rules::optional_calendar_date")]
    pub to: Option<NaiveDate>,
}

pub async fn get_team_summary(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(manager_id): Path<i64>,
    Query(range): Query<RangeQuery>,
) -> AppResult<Json<ApiResponse<Vec<DaySummary>>>> {
    let (from, to) = validate_report_range(&state.context(actor.0), range.from, range.to)?;
    let mut conn = state.db.get()?;
    let days = ReportingService::team_summary(&mut PgStore::new(&mut conn), manager_id, from, to)?;
    Ok(Json(ApiResponse::success(days, "Team summary retrieved")))
}

pub async fn get_team_day(
    State(state): State<Arc<AppState>>,
    Path((manager_id, date)): Path<(i64, String)>,
) -> AppResult<Json<ApiResponse<Vec<StaffDayStatus>>>> {
    let date = rules::parse_calendar_date(&date).map_err(AppError::validation)?;
    let mut conn = state.db.get()?;
    let team = ReportingService::team_day(&mut PgStore::new(&mut conn), manager_id, date)?;
    Ok(Json(ApiResponse::success(team, "Team schedule retrieved")))
}

pub async fn get_org_summary(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(director_id): Path<i64>,
    Query(range): Query<RangeQuery>,
) -> AppResult<Json<ApiResponse<Vec<DaySummary>>>> {
    let (from, to) = validate_report_range(&state.context(actor.0), range.from, range.to)?;
    let mut conn = state.db.get()?;
    let days = ReportingService::org_summary(&mut PgStore::new(&mut conn), director_id, from, to)?;
    Ok(Json(ApiResponse::success(days, "Organization summary retrieved")))
}

pub async fn get_org_day(
    State(state): State<Arc<AppState>>,
    Path((director_id, date)): Path<(i64, String)>,
) -> AppResult<Json<ApiResponse<Vec<StaffDayStatus>>>> {
    let date = rules::parse_calendar_date(&date).map_err(AppError::validation)?;
    let mut conn = state.db.get()?;
    let org = ReportingService::org_day(&mut PgStore::new(&mut conn), director_id, date)?;
    Ok(Json(ApiResponse::success(org, "Organization schedule retrieved")))
}

pub async fn get_company_summary(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Query(range): Query<RangeQuery>,
) -> AppResult<Json<ApiResponse<Vec<DaySummary>>>> {
    let (from, to) = validate_report_range(&state.context(actor.0), range.from, range.to)?;
    let mut conn = state.db.get()?;
    let days = ReportingService::company_summary(&mut PgStore::new(&mut conn), from, to)?;
    Ok(Json(ApiResponse::success(days, "Company summary retrieved")))
}

pub async fn get_personal_calendar(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(staff_id): Path<i64>,
    Query(range): Query<RangeQuery>,
) -> AppResult<Json<ApiResponse<Vec<CalendarDay>>>> {
    let (from, to) = validate_report_range(&state.context(actor.0), range.from, range.to)?;
    let mut conn = state.db.get()?;
    let days = ReportingService::personal_calendar(&mut PgStore::new(&mut conn), staff_id, from, to)?;
    Ok(Json(ApiResponse::success(days, "Calendar retrieved")))
}

/// Where every staff member works on one date.
pub async fn get_company_day(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<StaffDayStatus>>>> {
    let date = rules::parse_calendar_date(&date).map_err(AppError::validation)?;
    let mut conn = state.db.get()?;
    let everyone = ReportingService::company_day(&mut PgStore::new(&mut conn), date)?;
    Ok(Json(ApiResponse::success(everyone, "Company schedule retrieved")))
}
