use chrono::NaiveDate;
use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::{AsExpression, FromSqlRow};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::db::enums::{WfhDuration, WfhStatus};
use crate::error::{AppError, AppResult};

const PARKED_PREFIX: &str = "parked:";
const REASON_PREFIX: &str = "reason:";

/// Contents of `reason_for_withdrawing`: the free-text reason of a finished
/// withdrawal, or the id of the request displaced by a pending one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum WithdrawalNote {
    Reason(String),
    ParkedRequest(i64),
}

impl WithdrawalNote {
    pub fn encode(&self) -> String {
        match self {
            WithdrawalNote::Reason(text) => format!("{}{}", REASON_PREFIX, text),
            WithdrawalNote::ParkedRequest(id) => format!("{}{}", PARKED_PREFIX, id),
        }
    }

    pub fn decode(raw: &str) -> Result<Self, String> {
        if let Some(id) = raw.strip_prefix(PARKED_PREFIX) {
            return id
                .parse()
                .map(WithdrawalNote::ParkedRequest)
                .map_err(|_| format!("Invalid parked request id: {}", id));
        }
        // Untagged text predates the tagged encoding and is always a reason.
        let text = raw.strip_prefix(REASON_PREFIX).unwrap_or(raw);
        Ok(WithdrawalNote::Reason(text.to_string()))
    }
}

impl FromSql<Text, Pg> for WithdrawalNote {
    fn from_sql(bytes: <Pg as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        WithdrawalNote::decode(&s).map_err(|e| e.into())
    }
}

impl ToSql<Text, Pg> for WithdrawalNote {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.encode().as_bytes())?;
        Ok(IsNull::No)
    }
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[diesel(table_name = crate::schema::wfh_schedules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ScheduleEntry {
    pub id: i64,
    pub request_id: i64,
    pub staff_id: i64,
    pub manager_id: i64,
    pub date: NaiveDate,
    pub duration: WfhDuration,
    pub status: WfhStatus,
    pub dept: String,
    pub position: String,
    pub reason_for_withdrawing: Option<WithdrawalNote>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// Ownership transitions. `request_id` only changes through these.
impl ScheduleEntry {
    pub fn parked_request_id(&self) -> Option<i64> {
        match self.reason_for_withdrawing {
            Some(WithdrawalNote::ParkedRequest(id)) => Some(id),
            _ => None,
        }
    }

    /// Hands the entry to a pending withdrawal request and parks the request
    /// that owned it until the withdrawal is resolved.
    pub fn reassign_to_withdrawal(&mut self, withdrawal_id: i64) -> AppResult<()> {
        if self.status != WfhStatus::Approved {
            return Err(AppError::validation(format!(
                "Only approved schedule entries can be withdrawn (schedule {} is {})",
                self.id, self.status
            )));
        }
        if let Some(parked) = self.parked_request_id() {
            return Err(AppError::duplicate(format!(
                "Schedule {} already has a pending withdrawal against request {}",
                self.id, parked
            )));
        }

        let original = std::mem::replace(&mut self.request_id, withdrawal_id);
        self.reason_for_withdrawing = Some(WithdrawalNote::ParkedRequest(original));
        Ok(())
    }

    /// Gives the entry back to its parked request. Returns that request id.
    pub fn restore_owner(&mut self) -> AppResult<i64> {
        let original = self.require_parked()?;
        self.request_id = original;
        self.reason_for_withdrawing = None;
        self.status = WfhStatus::Approved;
        Ok(original)
    }

    /// Finalizes an approved withdrawal. The withdrawal request stays the
    /// owner; the parked id is replaced by the withdrawal reason and returned.
    pub fn complete_withdrawal(&mut self, reason: &str) -> AppResult<i64> {
        let original = self.require_parked()?;
        self.status = WfhStatus::Withdrawn;
        self.reason_for_withdrawing = Some(WithdrawalNote::Reason(reason.to_string()));
        Ok(original)
    }

    fn require_parked(&self) -> AppResult<i64> {
        self.parked_request_id().ok_or_else(|| {
            AppError::internal(format!(
                "Schedule {} has no parked request to resolve",
                self.id
            ))
        })
    }
}

#[derive(Insertable, Clone, Debug)]
#[diesel(table_name = crate::schema::wfh_schedules)]
pub struct NewScheduleEntry {
    pub request_id: i64,
    pub staff_id: i64,
    pub manager_id: i64,
    pub date: NaiveDate,
    pub duration: WfhDuration,
    pub status: WfhStatus,
    pub dept: String,
    pub position: String,
}

/// Mutable columns of a schedule entry, written back as a whole.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::wfh_schedules)]
#[diesel(treat_none_as_null = true)]
pub struct ScheduleChanges {
    pub request_id: i64,
    pub status: WfhStatus,
    pub reason_for_withdrawing: Option<WithdrawalNote>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<&ScheduleEntry> for ScheduleChanges {
    fn from(entry: &ScheduleEntry) -> Self {
        Self {
            request_id: entry.request_id,
            status: entry.status,
            reason_for_withdrawing: entry.reason_for_withdrawing.clone(),
            updated_at: chrono::Utc::now(),
        }
    }
}
