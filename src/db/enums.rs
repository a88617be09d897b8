use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql};
use diesel::pg::Pg;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::{AsExpression, FromSqlRow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// Status shared by requests and schedule entries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WfhStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
    Expired,
    Withdrawn,
}

impl WfhStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WfhStatus::Pending => "PENDING",
            WfhStatus::Approved => "APPROVED",
            WfhStatus::Rejected => "REJECTED",
            WfhStatus::Cancelled => "CANCELLED",
            WfhStatus::Expired => "EXPIRED",
            WfhStatus::Withdrawn => "WITHDRAWN",
        }
    }

    /// Statuses an occupied day can be in; anything else frees the date.
    pub fn occupies_date(&self) -> bool {
        !matches!(self, WfhStatus::Expired | WfhStatus::Rejected)
    }
}

impl fmt::Display for WfhStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WfhStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(WfhStatus::Pending),
            "APPROVED" => Ok(WfhStatus::Approved),
            "REJECTED" => Ok(WfhStatus::Rejected),
            "CANCELLED" => Ok(WfhStatus::Cancelled),
            "EXPIRED" => Ok(WfhStatus::Expired),
            "WITHDRAWN" => Ok(WfhStatus::Withdrawn),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}

impl FromSql<Text, Pg> for WfhStatus {
    fn from_sql(bytes: <Pg as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl ToSql<Text, Pg> for WfhStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WfhDuration {
    FullDay,
    HalfDayAm,
    HalfDayPm,
}

impl WfhDuration {
    pub fn as_str(&self) -> &'static str {
        match self {
            WfhDuration::FullDay => "FULL_DAY",
            WfhDuration::HalfDayAm => "HALF_DAY_AM",
            WfhDuration::HalfDayPm => "HALF_DAY_PM",
        }
    }

    /// Durations that draw on the same capacity as `self`. A full day
    /// consumes both halves, so it is always included.
    pub fn capacity_peers(&self) -> Vec<WfhDuration> {
        match self {
            WfhDuration::FullDay => vec![WfhDuration::FullDay],
            other => vec![*other, WfhDuration::FullDay],
        }
    }

    pub fn covers_am(&self) -> bool {
        matches!(self, WfhDuration::FullDay | WfhDuration::HalfDayAm)
    }

    pub fn covers_pm(&self) -> bool {
        matches!(self, WfhDuration::FullDay | WfhDuration::HalfDayPm)
    }
}

impl fmt::Display for WfhDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WfhDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FULL_DAY" => Ok(WfhDuration::FullDay),
            "HALF_DAY_AM" => Ok(WfhDuration::HalfDayAm),
            "HALF_DAY_PM" => Ok(WfhDuration::HalfDayPm),
            _ => Err(format!("Invalid duration: {}", s)),
        }
    }
}

impl FromSql<Text, Pg> for WfhDuration {
    fn from_sql(bytes: <Pg as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl ToSql<Text, Pg> for WfhDuration {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

/// What a request is about: a day at home, or a meta-request targeting an
/// existing request or schedule entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Text)]
pub enum RequestKind {
    #[serde(rename = "WORK_FROM_HOME")]
    WorkFromHome,
    #[serde(rename = "WITHDRAWAL_REQUEST")]
    Withdrawal,
    #[serde(rename = "CANCEL_REQUEST")]
    Cancellation,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::WorkFromHome => "WORK_FROM_HOME",
            RequestKind::Withdrawal => "WITHDRAWAL_REQUEST",
            RequestKind::Cancellation => "CANCEL_REQUEST",
        }
    }

    pub fn is_meta(&self) -> bool {
        !matches!(self, RequestKind::WorkFromHome)
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "WORK_FROM_HOME" => Ok(RequestKind::WorkFromHome),
            "WITHDRAWAL_REQUEST" => Ok(RequestKind::Withdrawal),
            "CANCEL_REQUEST" => Ok(RequestKind::Cancellation),
            _ => Err(format!("Invalid request kind: {}", s)),
        }
    }
}

impl FromSql<Text, Pg> for RequestKind {
    fn from_sql(bytes: <Pg as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl ToSql<Text, Pg> for RequestKind {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

/// Directory role codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    Director,
    Staff,
    Manager,
}

impl StaffRole {
    pub fn code(&self) -> i32 {
        match self {
            StaffRole::Director => 1,
            StaffRole::Staff => 2,
            StaffRole::Manager => 3,
        }
    }

    pub fn from_code(code: i32) -> Self {
        match code {
            1 => StaffRole::Director,
            3 => StaffRole::Manager,
            _ => StaffRole::Staff,
        }
    }
}
