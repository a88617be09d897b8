pub mod maintenance;
pub mod reports;
pub mod requests;
pub mod schedules;
pub mod staff;

use crate::AppState;
use axum::{
    Router, async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    routing::{get, patch, post},
};
use std::sync::Arc;

use crate::error::AppError;

pub const ACTOR_HEADER: &str = "x-actor-id";

/// Staff id of the caller as forwarded by the authenticating proxy. Calls
/// without the header act as the system (id 0).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Actor(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.headers.get(ACTOR_HEADER) {
            None => Ok(Actor(0)),
            Some(value) => value
                .to_str()
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .map(Actor)
                .ok_or_else(|| AppError::validation(format!("Invalid {} header", ACTOR_HEADER))),
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/requests", post(requests::submit_request))
        .route("/requests/:request_id", get(requests::get_request))
        .route("/requests/:request_id/expand", post(requests::expand_request))
        .route("/requests/:request_id/status", patch(requests::update_request_status))
        .route("/requests/:request_id/schedules", get(schedules::get_request_schedules))
        .route(
            "/requests/:request_id/parked-schedules",
            get(schedules::get_parked_schedules),
        )
        .route("/schedules/:schedule_id/withdrawals", post(schedules::create_withdrawal))
        .route(
            "/managers/:manager_id/pending-requests",
            get(staff::get_pending_for_manager),
        )
        .route("/staff/:staff_id/requests", get(staff::get_staff_requests))
        .route(
            "/staff/:staff_id/pending-withdrawal",
            get(staff::get_pending_withdrawal),
        )
        .route("/admission-checks", post(maintenance::check_admission))
        .route("/maintenance/expire-requests", post(maintenance::expire_requests))
        .route("/reports/teams/:manager_id/summary", get(reports::get_team_summary))
        .route("/reports/teams/:manager_id/days/:date", get(reports::get_team_day))
        .route(
            "/reports/directors/:director_id/summary",
            get(reports::get_org_summary),
        )
        .route(
            "/reports/directors/:director_id/days/:date",
            get(reports::get_org_day),
        )
        .route("/reports/company/summary", get(reports::get_company_summary))
        .route("/reports/company/days/:date", get(reports::get_company_day))
        .route("/reports/staff/:staff_id/calendar", get(reports::get_personal_calendar))
        .with_state(state)
}
