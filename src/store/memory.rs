use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};

use crate::db::enums::{RequestKind, WfhDuration, WfhStatus};
use crate::db::models::{
    NewScheduleEntry, NewWfhRequest, ScheduleEntry, Staff, WfhRequest, WithdrawalNote,
};
use crate::error::{AppError, AppResult};
use crate::store::{Directory, WfhStore};

#[derive(Clone, Default)]
struct Tables {
    requests: BTreeMap<i64, WfhRequest>,
    schedules: BTreeMap<i64, ScheduleEntry>,
    staff: BTreeMap<i64, Staff>,
    next_request_id: i64,
    next_schedule_id: i64,
}

/// Store kept entirely in memory. Transactions snapshot the tables and
/// restore them when the closure fails, so rollback behaves like Postgres.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Tables,
    fail_next_schedule_save: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_staff(staff: impl IntoIterator<Item = Staff>) -> Self {
        let mut store = Self::new();
        for member in staff {
            store.add_staff(member);
        }
        store
    }

    pub fn add_staff(&mut self, member: Staff) {
        self.tables.staff.insert(member.staff_id, member);
    }

    /// Makes the next `save_schedule` call fail with a storage error.
    pub fn fail_next_schedule_save(&mut self) {
        self.fail_next_schedule_save = true;
    }

    pub fn request_count(&self) -> usize {
        self.tables.requests.len()
    }

    pub fn all_schedules(&self) -> Vec<ScheduleEntry> {
        self.tables.schedules.values().cloned().collect()
    }

    fn schedule_mut(&mut self, schedule_id: i64) -> AppResult<&mut ScheduleEntry> {
        self.tables
            .schedules
            .get_mut(&schedule_id)
            .ok_or_else(|| AppError::not_found("schedule"))
    }
}

impl WfhStore for InMemoryStore {
    fn transaction<T, F>(&mut self, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut Self) -> AppResult<T>,
    {
        let snapshot = self.tables.clone();
        let outcome = f(self);
        if outcome.is_err() {
            self.tables = snapshot;
        }
        outcome
    }

    fn insert_request(&mut self, new_request: &NewWfhRequest) -> AppResult<WfhRequest> {
        self.tables.next_request_id += 1;
        let now = Utc::now();
        let request = WfhRequest {
            id: self.tables.next_request_id,
            staff_id: new_request.staff_id,
            manager_id: new_request.manager_id,
            request_date: new_request.request_date,
            start_date: new_request.start_date,
            end_date: new_request.end_date,
            kind: new_request.kind,
            duration: new_request.duration,
            status: new_request.status,
            reason_for_applying: new_request.reason_for_applying.clone(),
            reason_for_rejection: None,
            created_at: now,
            updated_at: now,
        };
        self.tables.requests.insert(request.id, request.clone());
        Ok(request)
    }

    fn find_request(&mut self, request_id: i64) -> AppResult<Option<WfhRequest>> {
        Ok(self.tables.requests.get(&request_id).cloned())
    }

    fn lock_request(&mut self, request_id: i64) -> AppResult<Option<WfhRequest>> {
        self.find_request(request_id)
    }

    fn update_request_status(
        &mut self,
        request_id: i64,
        status: WfhStatus,
        reason_for_rejection: Option<&str>,
    ) -> AppResult<WfhRequest> {
        let request = self
            .tables
            .requests
            .get_mut(&request_id)
            .ok_or_else(|| AppError::not_found("request"))?;
        request.status = status;
        if let Some(reason) = reason_for_rejection {
            request.reason_for_rejection = Some(reason.to_string());
        }
        request.updated_at = Utc::now();
        Ok(request.clone())
    }

    fn delete_request(&mut self, request_id: i64) -> AppResult<()> {
        self.tables.requests.remove(&request_id);
        Ok(())
    }

    fn blocking_request_exists(
        &mut self,
        staff_id: i64,
        start_date: NaiveDate,
    ) -> AppResult<bool> {
        Ok(self.tables.requests.values().any(|r| {
            r.staff_id == staff_id
                && r.start_date == start_date
                && r.end_date.is_none()
                && matches!(r.status, WfhStatus::Pending | WfhStatus::Approved)
        }))
    }

    fn requests_for_manager(
        &mut self,
        manager_id: i64,
        status: Option<WfhStatus>,
    ) -> AppResult<Vec<WfhRequest>> {
        let mut requests: Vec<WfhRequest> = self
            .tables
            .requests
            .values()
            .filter(|r| r.manager_id == manager_id)
            .filter(|r| status.is_none_or(|s| r.status == s))
            .cloned()
            .collect();
        requests.sort_by_key(|r| (r.start_date, r.id));
        Ok(requests)
    }

    fn requests_for_staff(&mut self, staff_id: i64) -> AppResult<Vec<WfhRequest>> {
        let mut requests: Vec<WfhRequest> = self
            .tables
            .requests
            .values()
            .filter(|r| r.staff_id == staff_id)
            .cloned()
            .collect();
        requests.sort_by_key(|r| std::cmp::Reverse((r.start_date, r.id)));
        Ok(requests)
    }

    fn pending_requests_before(
        &mut self,
        cutoff: NaiveDate,
        limit: i64,
    ) -> AppResult<Vec<WfhRequest>> {
        Ok(self
            .tables
            .requests
            .values()
            .filter(|r| r.status == WfhStatus::Pending && r.start_date < cutoff)
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    fn pending_withdrawal_exists(&mut self, staff_id: i64, date: NaiveDate) -> AppResult<bool> {
        Ok(self.tables.requests.values().any(|r| {
            r.staff_id == staff_id
                && r.start_date == date
                && r.kind == RequestKind::Withdrawal
                && r.status == WfhStatus::Pending
        }))
    }

    fn insert_schedule(&mut self, new_entry: &NewScheduleEntry) -> AppResult<ScheduleEntry> {
        self.tables.next_schedule_id += 1;
        let now = Utc::now();
        let entry = ScheduleEntry {
            id: self.tables.next_schedule_id,
            request_id: new_entry.request_id,
            staff_id: new_entry.staff_id,
            manager_id: new_entry.manager_id,
            date: new_entry.date,
            duration: new_entry.duration,
            status: new_entry.status,
            dept: new_entry.dept.clone(),
            position: new_entry.position.clone(),
            reason_for_withdrawing: None,
            created_at: now,
            updated_at: now,
        };
        self.tables.schedules.insert(entry.id, entry.clone());
        Ok(entry)
    }

    fn lock_schedule(&mut self, schedule_id: i64) -> AppResult<Option<ScheduleEntry>> {
        Ok(self.tables.schedules.get(&schedule_id).cloned())
    }

    fn find_occupying_schedule(
        &mut self,
        staff_id: i64,
        date: NaiveDate,
    ) -> AppResult<Option<ScheduleEntry>> {
        Ok(self
            .tables
            .schedules
            .values()
            .find(|s| s.staff_id == staff_id && s.date == date && s.status.occupies_date())
            .cloned())
    }

    fn schedules_for_request(&mut self, request_id: i64) -> AppResult<Vec<ScheduleEntry>> {
        let mut entries: Vec<ScheduleEntry> = self
            .tables
            .schedules
            .values()
            .filter(|s| s.request_id == request_id)
            .cloned()
            .collect();
        entries.sort_by_key(|s| (s.date, s.id));
        Ok(entries)
    }

    fn lock_schedules_for_request(&mut self, request_id: i64) -> AppResult<Vec<ScheduleEntry>> {
        self.schedules_for_request(request_id)
    }

    fn schedules_parked_under(
        &mut self,
        original_request_id: i64,
    ) -> AppResult<Vec<ScheduleEntry>> {
        let parked = WithdrawalNote::ParkedRequest(original_request_id);
        let mut entries: Vec<ScheduleEntry> = self
            .tables
            .schedules
            .values()
            .filter(|s| s.reason_for_withdrawing.as_ref() == Some(&parked))
            .cloned()
            .collect();
        entries.sort_by_key(|s| (s.date, s.id));
        Ok(entries)
    }

    fn save_schedule(&mut self, entry: &ScheduleEntry) -> AppResult<ScheduleEntry> {
        if std::mem::take(&mut self.fail_next_schedule_save) {
            return Err(AppError::Database(diesel::result::Error::BrokenTransactionManager));
        }
        let stored = self.schedule_mut(entry.id)?;
        stored.request_id = entry.request_id;
        stored.status = entry.status;
        stored.reason_for_withdrawing = entry.reason_for_withdrawing.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    fn update_schedule_status_for_request(
        &mut self,
        request_id: i64,
        status: WfhStatus,
        only_pending: bool,
    ) -> AppResult<usize> {
        let now = Utc::now();
        let mut updated = 0;
        for entry in self.tables.schedules.values_mut() {
            if entry.request_id != request_id {
                continue;
            }
            if only_pending && entry.status != WfhStatus::Pending {
                continue;
            }
            entry.status = status;
            entry.updated_at = now;
            updated += 1;
        }
        Ok(updated)
    }

    fn count_approved_on(
        &mut self,
        staff_ids: &[i64],
        date: NaiveDate,
        durations: &[WfhDuration],
    ) -> AppResult<i64> {
        let count = self
            .tables
            .schedules
            .values()
            .filter(|s| {
                staff_ids.contains(&s.staff_id)
                    && s.date == date
                    && s.status == WfhStatus::Approved
                    && durations.contains(&s.duration)
            })
            .count();
        Ok(count as i64)
    }

    fn schedules_between(
        &mut self,
        staff_ids: &[i64],
        from: NaiveDate,
        to: NaiveDate,
        statuses: &[WfhStatus],
    ) -> AppResult<Vec<ScheduleEntry>> {
        let mut entries: Vec<ScheduleEntry> = self
            .tables
            .schedules
            .values()
            .filter(|s| {
                staff_ids.contains(&s.staff_id)
                    && s.date >= from
                    && s.date <= to
                    && statuses.contains(&s.status)
            })
            .cloned()
            .collect();
        entries.sort_by_key(|s| (s.date, s.staff_id));
        Ok(entries)
    }
}

impl Directory for InMemoryStore {
    fn lookup(&mut self, staff_id: i64) -> AppResult<Option<Staff>> {
        Ok(self.tables.staff.get(&staff_id).cloned())
    }

    fn subordinates(&mut self, manager_id: i64) -> AppResult<Vec<Staff>> {
        Ok(self
            .tables
            .staff
            .values()
            .filter(|s| s.reporting_manager == Some(manager_id))
            .cloned()
            .collect())
    }

    fn all_staff(&mut self) -> AppResult<Vec<Staff>> {
        Ok(self.tables.staff.values().cloned().collect())
    }
}
