use chrono::{Duration, NaiveDate};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::enums::{RequestKind, WfhDuration, WfhStatus};

/// Days between two occurrences of a recurring request.
pub const RECURRENCE_STEP_DAYS: i64 = 7;

#[derive(Queryable, Selectable, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[diesel(table_name = crate::schema::wfh_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WfhRequest {
    pub id: i64,
    pub staff_id: i64,
    pub manager_id: i64,
    pub request_date: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub kind: RequestKind,
    pub duration: WfhDuration,
    pub status: WfhStatus,
    pub reason_for_applying: String,
    pub reason_for_rejection: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl WfhRequest {
    pub fn is_recurring(&self) -> bool {
        self.end_date.is_some()
    }

    /// Every date the request covers: the start date, then weekly while on
    /// or before the end date.
    pub fn occurrence_dates(&self) -> Vec<NaiveDate> {
        occurrence_dates(self.start_date, self.end_date)
    }
}

pub fn occurrence_dates(start_date: NaiveDate, end_date: Option<NaiveDate>) -> Vec<NaiveDate> {
    let Some(end_date) = end_date else {
        return vec![start_date];
    };

    let mut dates = Vec::new();
    let mut current = start_date;
    while current <= end_date {
        dates.push(current);
        current += Duration::days(RECURRENCE_STEP_DAYS);
    }
    dates
}

#[derive(Insertable, Clone, Debug)]
#[diesel(table_name = crate::schema::wfh_requests)]
pub struct NewWfhRequest {
    pub staff_id: i64,
    pub manager_id: i64,
    pub request_date: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub kind: RequestKind,
    pub duration: WfhDuration,
    pub status: WfhStatus,
    pub reason_for_applying: String,
}
