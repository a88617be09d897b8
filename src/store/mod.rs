//! Persistence ports used by the services.
//!
//! Services are generic over `S: WfhStore + Directory` so the same code runs
//! against Postgres in production and against [`InMemoryStore`] in tests.

pub mod memory;
pub mod pg;

use chrono::NaiveDate;

use crate::db::enums::{WfhDuration, WfhStatus};
use crate::db::models::{NewScheduleEntry, NewWfhRequest, ScheduleEntry, Staff, WfhRequest};
use crate::error::AppResult;

pub use memory::InMemoryStore;
pub use pg::PgStore;

/// Transactional storage of requests and schedule entries.
pub trait WfhStore {
    /// Runs `f` atomically. An `Err` from `f` rolls every write back.
    /// Nested calls join the enclosing transaction as a savepoint.
    fn transaction<T, F>(&mut self, f: F) -> AppResult<T>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> AppResult<T>;

    // === Requests ===

    fn insert_request(&mut self, new_request: &NewWfhRequest) -> AppResult<WfhRequest>;

    fn find_request(&mut self, request_id: i64) -> AppResult<Option<WfhRequest>>;

    /// Like `find_request`, but holds a row lock until the transaction ends.
    fn lock_request(&mut self, request_id: i64) -> AppResult<Option<WfhRequest>>;

    fn update_request_status(
        &mut self,
        request_id: i64,
        status: WfhStatus,
        reason_for_rejection: Option<&str>,
    ) -> AppResult<WfhRequest>;

    fn delete_request(&mut self, request_id: i64) -> AppResult<()>;

    /// True when a non-recurring PENDING or APPROVED request already starts
    /// on `start_date` for this staff member.
    fn blocking_request_exists(&mut self, staff_id: i64, start_date: NaiveDate)
    -> AppResult<bool>;

    fn requests_for_manager(
        &mut self,
        manager_id: i64,
        status: Option<WfhStatus>,
    ) -> AppResult<Vec<WfhRequest>>;

    fn requests_for_staff(&mut self, staff_id: i64) -> AppResult<Vec<WfhRequest>>;

    /// Oldest PENDING requests starting before `cutoff`, locked. Rows locked
    /// by someone else are skipped.
    fn pending_requests_before(
        &mut self,
        cutoff: NaiveDate,
        limit: i64,
    ) -> AppResult<Vec<WfhRequest>>;

    fn pending_withdrawal_exists(&mut self, staff_id: i64, date: NaiveDate) -> AppResult<bool>;

    // === Schedule entries ===

    fn insert_schedule(&mut self, new_entry: &NewScheduleEntry) -> AppResult<ScheduleEntry>;

    /// Loads and row-locks one entry.
    fn lock_schedule(&mut self, schedule_id: i64) -> AppResult<Option<ScheduleEntry>>;

    /// An entry for this staff/date whose status still occupies the day.
    fn find_occupying_schedule(
        &mut self,
        staff_id: i64,
        date: NaiveDate,
    ) -> AppResult<Option<ScheduleEntry>>;

    fn schedules_for_request(&mut self, request_id: i64) -> AppResult<Vec<ScheduleEntry>>;

    /// Row-locked variant of `schedules_for_request`.
    fn lock_schedules_for_request(&mut self, request_id: i64) -> AppResult<Vec<ScheduleEntry>>;

    /// Entries whose pending withdrawal parked `original_request_id`.
    fn schedules_parked_under(
        &mut self,
        original_request_id: i64,
    ) -> AppResult<Vec<ScheduleEntry>>;

    /// Writes back owner, status and note of an entry.
    fn save_schedule(&mut self, entry: &ScheduleEntry) -> AppResult<ScheduleEntry>;

    /// Sets the status of entries owned by `request_id`; with `only_pending`
    /// entries in any other status are left alone. Returns the row count.
    fn update_schedule_status_for_request(
        &mut self,
        request_id: i64,
        status: WfhStatus,
        only_pending: bool,
    ) -> AppResult<usize>;

    fn count_approved_on(
        &mut self,
        staff_ids: &[i64],
        date: NaiveDate,
        durations: &[WfhDuration],
    ) -> AppResult<i64>;

    fn schedules_between(
        &mut self,
        staff_ids: &[i64],
        from: NaiveDate,
        to: NaiveDate,
        statuses: &[WfhStatus],
    ) -> AppResult<Vec<ScheduleEntry>>;
}

/// Read-only view of the organization chart.
pub trait Directory {
    fn lookup(&mut self, staff_id: i64) -> AppResult<Option<Staff>>;

    /// Staff whose reporting manager is `manager_id`.
    fn subordinates(&mut self, manager_id: i64) -> AppResult<Vec<Staff>>;

    fn all_staff(&mut self) -> AppResult<Vec<Staff>>;
}
