use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    db::enums::WfhDuration,
    error::{AppError, AppResult},
    services::context::RequestContext,
    store::{Directory, WfhStore},
};

/// Outcome of one capacity check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Admission {
    Admitted {
        team_size: usize,
        remote_count: i64,
    },
    Denied {
        team_size: usize,
        remote_count: i64,
    },
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted { .. })
    }
}

pub struct AdmissionService;

impl AdmissionService {
    /// Would one more remote `duration` on `date` keep the staff member's team
    /// at or under the remote ratio? Approved full days count against both halves.
    pub fn check<S: WfhStore + Directory>(
        store: &mut S,
        ctx: &RequestContext,
        staff_id: i64,
        date: NaiveDate,
        duration: WfhDuration,
    ) -> AppResult<Admission> {
        let staff = store
            .lookup(staff_id)?
            .ok_or_else(|| AppError::not_found(format!("staff {}", staff_id)))?;

        let team: Vec<i64> = store
            .subordinates(staff.team_lead())?
            .iter()
            .map(|member| member.staff_id)
            .collect();

        if team.is_empty() {
            return Ok(Admission::Admitted {
                team_size: 0,
                remote_count: 0,
            });
        }

        let remote_count = store.count_approved_on(&team, date, &duration.capacity_peers())?;
        let ratio = (remote_count + 1) as f64 / team.len() as f64;

        let decision = if ratio <= ctx.policy.max_remote_ratio {
            Admission::Admitted {
                team_size: team.len(),
                remote_count,
            }
        } else {
            Admission::Denied {
                team_size: team.len(),
                remote_count,
            }
        };

        tracing::debug!(
            staff_id,
            %date,
            duration = %duration,
            team_size = team.len(),
            remote_count,
            admitted = decision.is_admitted(),
            "Admission check"
        );
        Ok(decision)
    }

    /// Dates among `dates` that would break the remote ratio.
    pub fn violations<S: WfhStore + Directory>(
        store: &mut S,
        ctx: &RequestContext,
        staff_id: i64,
        dates: &[NaiveDate],
        duration: WfhDuration,
    ) -> AppResult<Vec<NaiveDate>> {
        let mut violated = Vec::new();
        for &date in dates {
            if !Self::check(store, ctx, staff_id, date, duration)?.is_admitted() {
                violated.push(date);
            }
        }
        Ok(violated)
    }
}
