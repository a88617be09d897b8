//! Read-only headcount views over approved and pending schedule entries.
//!
//! Every report captures one [`OrgSnapshot`] from the directory and walks the
//! reporting lines in memory.

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::{
    db::enums::{WfhDuration, WfhStatus},
    db::models::schedule::ScheduleEntry,
    db::models::staff::Staff,
    error::{AppError, AppResult},
    store::{Directory, WfhStore},
};

/// Immutable copy of the org chart taken at the start of a report.
#[derive(Debug, Clone, Default)]
pub struct OrgSnapshot {
    staff: BTreeMap<i64, Staff>,
    reports: BTreeMap<i64, Vec<i64>>,
}

impl OrgSnapshot {
    pub fn capture<D: Directory>(directory: &mut D) -> AppResult<Self> {
        Ok(Self::from_staff(directory.all_staff()?))
    }

    pub fn from_staff(members: Vec<Staff>) -> Self {
        let mut reports: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
        for member in &members {
            if let Some(manager) = member.reporting_manager {
                reports.entry(manager).or_default().push(member.staff_id);
            }
        }
        let staff = members.into_iter().map(|s| (s.staff_id, s)).collect();
        Self { staff, reports }
    }

    pub fn get(&self, staff_id: i64) -> Option<&Staff> {
        self.staff.get(&staff_id)
    }

    fn require(&self, staff_id: i64) -> AppResult<&Staff> {
        self.get(staff_id)
            .ok_or_else(|| AppError::not_found(format!("staff {}", staff_id)))
    }

    /// Direct reports of `manager_id`.
    pub fn team(&self, manager_id: i64) -> Vec<i64> {
        self.reports.get(&manager_id).cloned().unwrap_or_default()
    }

    /// Direct and indirect reports of `root_id`, excluding the root.
    pub fn org(&self, root_id: i64) -> Vec<i64> {
        let mut seen = HashSet::from([root_id]);
        let mut queue = VecDeque::from([root_id]);
        let mut members = Vec::new();

        while let Some(current) = queue.pop_front() {
            for &report in self.reports.get(&current).into_iter().flatten() {
                if seen.insert(report) {
                    members.push(report);
                    queue.push_back(report);
                }
            }
        }
        members.sort_unstable();
        members
    }

    pub fn everyone(&self) -> Vec<i64> {
        self.staff.keys().copied().collect()
    }
}

/// Headcount for one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub total_staff: usize,
    pub wfh_am: usize,
    pub wfh_pm: usize,
    pub office_am: usize,
    pub office_pm: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Presence {
    Office,
    Wfh,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffDayStatus {
    pub staff_id: i64,
    pub name: String,
    pub position: String,
    pub status_am: Presence,
    pub status_pm: Presence,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub schedule: String,
}

pub struct ReportingService;

impl ReportingService {
    pub fn team_summary<S: WfhStore + Directory>(
        store: &mut S,
        manager_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<DaySummary>> {
        let snapshot = OrgSnapshot::capture(store)?;
        snapshot.require(manager_id)?;
        Self::summarize(store, &snapshot.team(manager_id), from, to)
    }

    pub fn org_summary<S: WfhStore + Directory>(
        store: &mut S,
        director_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<DaySummary>> {
        let snapshot = OrgSnapshot::capture(store)?;
        snapshot.require(director_id)?;
        Self::summarize(store, &snapshot.org(director_id), from, to)
    }

    pub fn company_summary<S: WfhStore + Directory>(
        store: &mut S,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<DaySummary>> {
        let snapshot = OrgSnapshot::capture(store)?;
        Self::summarize(store, &snapshot.everyone(), from, to)
    }

    /// Where each member of a manager's team works on `date`.
    pub fn team_day<S: WfhStore + Directory>(
        store: &mut S,
        manager_id: i64,
        date: NaiveDate,
    ) -> AppResult<Vec<StaffDayStatus>> {
        let snapshot = OrgSnapshot::capture(store)?;
        snapshot.require(manager_id)?;
        Self::day_statuses(store, &snapshot, &snapshot.team(manager_id), date)
    }

    pub fn org_day<S: WfhStore + Directory>(
        store: &mut S,
        director_id: i64,
        date: NaiveDate,
    ) -> AppResult<Vec<StaffDayStatus>> {
        let snapshot = OrgSnapshot::capture(store)?;
        snapshot.require(director_id)?;
        Self::day_statuses(store, &snapshot, &snapshot.org(director_id), date)
    }

    /// Every staff member's presence on `date`.
    pub fn company_day<S: WfhStore + Directory>(
        store: &mut S,
        date: NaiveDate,
    ) -> AppResult<Vec<StaffDayStatus>> {
        let snapshot = OrgSnapshot::capture(store)?;
        Self::day_statuses(store, &snapshot, &snapshot.everyone(), date)
    }

    /// One line per date in `from..=to`, e.g. `FullDay` or `AMPending`;
    /// free days carry an empty string.
    pub fn personal_calendar<S: WfhStore + Directory>(
        store: &mut S,
        staff_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<CalendarDay>> {
        store
            .lookup(staff_id)?
            .ok_or_else(|| AppError::not_found(format!("staff {}", staff_id)))?;

        let entries = store.schedules_between(
            &[staff_id],
            from,
            to,
            &[WfhStatus::Approved, WfhStatus::Pending],
        )?;

        let mut labels: BTreeMap<NaiveDate, String> = BTreeMap::new();
        for entry in &entries {
            labels
                .entry(entry.date)
                .or_default()
                .push_str(&calendar_label(entry.duration, entry.status));
        }

        let mut days = Vec::new();
        let mut date = from;
        while date <= to {
            days.push(CalendarDay {
                date,
                schedule: labels.remove(&date).unwrap_or_default(),
            });
            date += Duration::days(1);
        }
        Ok(days)
    }

    fn day_statuses<S: WfhStore>(
        store: &mut S,
        snapshot: &OrgSnapshot,
        members: &[i64],
        date: NaiveDate,
    ) -> AppResult<Vec<StaffDayStatus>> {
        let approved = store.schedules_between(members, date, date, &[WfhStatus::Approved])?;
        let (am, pm) = remote_halves(&approved);

        let mut statuses = Vec::with_capacity(members.len());
        for &staff_id in members {
            let Some(member) = snapshot.get(staff_id) else {
                continue;
            };
            statuses.push(StaffDayStatus {
                staff_id,
                name: member.name(),
                position: member.position.clone(),
                status_am: presence(am.contains(&staff_id)),
                status_pm: presence(pm.contains(&staff_id)),
            });
        }
        Ok(statuses)
    }

    fn summarize<S: WfhStore>(
        store: &mut S,
        members: &[i64],
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<DaySummary>> {
        let approved = store.schedules_between(members, from, to, &[WfhStatus::Approved])?;

        let mut by_date: BTreeMap<NaiveDate, Vec<ScheduleEntry>> = BTreeMap::new();
        for entry in approved {
            by_date.entry(entry.date).or_default().push(entry);
        }

        let total = members.len();
        let mut days = Vec::new();
        let mut date = from;
        while date <= to {
            let (am, pm) = by_date
                .get(&date)
                .map(|entries| remote_halves(entries))
                .unwrap_or_default();
            days.push(DaySummary {
                date,
                total_staff: total,
                wfh_am: am.len(),
                wfh_pm: pm.len(),
                office_am: total.saturating_sub(am.len()),
                office_pm: total.saturating_sub(pm.len()),
            });
            date += Duration::days(1);
        }
        Ok(days)
    }
}

/// Staff working remotely in the morning and in the afternoon.
fn remote_halves(entries: &[ScheduleEntry]) -> (BTreeSet<i64>, BTreeSet<i64>) {
    let mut am = BTreeSet::new();
    let mut pm = BTreeSet::new();
    for entry in entries {
        if entry.duration.covers_am() {
            am.insert(entry.staff_id);
        }
        if entry.duration.covers_pm() {
            pm.insert(entry.staff_id);
        }
    }
    (am, pm)
}

fn presence(remote: bool) -> Presence {
    if remote { Presence::Wfh } else { Presence::Office }
}

fn calendar_label(duration: WfhDuration, status: WfhStatus) -> String {
    let base = match duration {
        WfhDuration::FullDay => "FullDay",
        WfhDuration::HalfDayAm => "AM",
        WfhDuration::HalfDayPm => "PM",
    };
    if status == WfhStatus::Pending {
        format!("{}Pending", base)
    } else {
        base.to_string()
    }
}
