use chrono::NaiveDate;
use diesel::PgConnection;
use diesel::connection::{AnsiTransactionManager, TransactionManager};

use crate::db::enums::{WfhDuration, WfhStatus};
use crate::db::models::{NewScheduleEntry, NewWfhRequest, ScheduleEntry, Staff, WfhRequest};
use crate::db::repositories::{RequestsRepo, SchedulesRepo, StaffRepo};
use crate::error::{AppError, AppResult};
use crate::store::{Directory, WfhStore};

type Tm = AnsiTransactionManager;

/// Postgres-backed store over one pooled connection.
///
/// The outermost transaction runs at SERIALIZABLE isolation so an admission
/// read and the approval that follows it cannot interleave with a concurrent
/// approval. Nested transactions become savepoints.
pub struct PgStore<'a> {
    conn: &'a mut PgConnection,
    depth: u32,
}

impl<'a> PgStore<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn, depth: 0 }
    }

    fn begin(&mut self) -> AppResult<()> {
        if self.depth == 0 {
            Tm::begin_transaction_sql(
                &mut *self.conn,
                "BEGIN TRANSACTION ISOLATION LEVEL SERIALIZABLE",
            )?;
        } else {
            <Tm as TransactionManager<PgConnection>>::begin_transaction(&mut *self.conn)?;
        }
        self.depth += 1;
        Ok(())
    }

    fn finish<T>(&mut self, outcome: AppResult<T>) -> AppResult<T> {
        self.depth -= 1;
        match outcome {
            Ok(value) => {
                <Tm as TransactionManager<PgConnection>>::commit_transaction(&mut *self.conn)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) =
                    <Tm as TransactionManager<PgConnection>>::rollback_transaction(&mut *self.conn)
                {
                    tracing::error!(error = %rollback_err, "Rollback failed");
                }
                Err(err)
            }
        }
    }
}

impl WfhStore for PgStore<'_> {
    fn transaction<T, F>(&mut self, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut Self) -> AppResult<T>,
    {
        self.begin()?;
        let outcome = f(self);
        self.finish(outcome)
    }

    fn insert_request(&mut self, new_request: &NewWfhRequest) -> AppResult<WfhRequest> {
        Ok(RequestsRepo::insert(self.conn, new_request)?)
    }

    fn find_request(&mut self, request_id: i64) -> AppResult<Option<WfhRequest>> {
        Ok(RequestsRepo::find_by_id(self.conn, request_id)?)
    }

    fn lock_request(&mut self, request_id: i64) -> AppResult<Option<WfhRequest>> {
        Ok(RequestsRepo::lock_by_id(self.conn, request_id)?)
    }

    fn update_request_status(
        &mut self,
        request_id: i64,
        status: WfhStatus,
        reason_for_rejection: Option<&str>,
    ) -> AppResult<WfhRequest> {
        match RequestsRepo::update_status(self.conn, request_id, status, reason_for_rejection) {
            Err(diesel::result::Error::NotFound) => Err(AppError::not_found("request")),
            other => Ok(other?),
        }
    }

    fn delete_request(&mut self, request_id: i64) -> AppResult<()> {
        RequestsRepo::delete_by_id(self.conn, request_id)?;
        Ok(())
    }

    fn blocking_request_exists(
        &mut self,
        staff_id: i64,
        start_date: NaiveDate,
    ) -> AppResult<bool> {
        Ok(RequestsRepo::blocking_exists(self.conn, staff_id, start_date)?)
    }

    fn requests_for_manager(
        &mut self,
        manager_id: i64,
        status: Option<WfhStatus>,
    ) -> AppResult<Vec<WfhRequest>> {
        Ok(RequestsRepo::list_by_manager(self.conn, manager_id, status)?)
    }

    fn requests_for_staff(&mut self, staff_id: i64) -> AppResult<Vec<WfhRequest>> {
        Ok(RequestsRepo::list_by_staff(self.conn, staff_id)?)
    }

    fn pending_requests_before(
        &mut self,
        cutoff: NaiveDate,
        limit: i64,
    ) -> AppResult<Vec<WfhRequest>> {
        Ok(RequestsRepo::lock_pending_before(self.conn, cutoff, limit)?)
    }

    fn pending_withdrawal_exists(&mut self, staff_id: i64, date: NaiveDate) -> AppResult<bool> {
        Ok(RequestsRepo::pending_withdrawal_exists(self.conn, staff_id, date)?)
    }

    fn insert_schedule(&mut self, new_entry: &NewScheduleEntry) -> AppResult<ScheduleEntry> {
        Ok(SchedulesRepo::insert(self.conn, new_entry)?)
    }

    fn lock_schedule(&mut self, schedule_id: i64) -> AppResult<Option<ScheduleEntry>> {
        Ok(SchedulesRepo::lock_by_id(self.conn, schedule_id)?)
    }

    fn find_occupying_schedule(
        &mut self,
        staff_id: i64,
        date: NaiveDate,
    ) -> AppResult<Option<ScheduleEntry>> {
        Ok(SchedulesRepo::find_occupying(self.conn, staff_id, date)?)
    }

    fn schedules_for_request(&mut self, request_id: i64) -> AppResult<Vec<ScheduleEntry>> {
        Ok(SchedulesRepo::list_by_request(self.conn, request_id)?)
    }

    fn lock_schedules_for_request(&mut self, request_id: i64) -> AppResult<Vec<ScheduleEntry>> {
        Ok(SchedulesRepo::lock_by_request(self.conn, request_id)?)
    }

    fn schedules_parked_under(
        &mut self,
        original_request_id: i64,
    ) -> AppResult<Vec<ScheduleEntry>> {
        Ok(SchedulesRepo::list_parked_under(self.conn, original_request_id)?)
    }

    fn save_schedule(&mut self, entry: &ScheduleEntry) -> AppResult<ScheduleEntry> {
        Ok(SchedulesRepo::save(self.conn, entry)?)
    }

    fn update_schedule_status_for_request(
        &mut self,
        request_id: i64,
        status: WfhStatus,
        only_pending: bool,
    ) -> AppResult<usize> {
        Ok(SchedulesRepo::update_status_for_request(
            self.conn,
            request_id,
            status,
            only_pending,
        )?)
    }

    fn count_approved_on(
        &mut self,
        staff_ids: &[i64],
        date: NaiveDate,
        durations: &[WfhDuration],
    ) -> AppResult<i64> {
        Ok(SchedulesRepo::count_approved_on(self.conn, staff_ids, date, durations)?)
    }

    fn schedules_between(
        &mut self,
        staff_ids: &[i64],
        from: NaiveDate,
        to: NaiveDate,
        statuses: &[WfhStatus],
    ) -> AppResult<Vec<ScheduleEntry>> {
        Ok(SchedulesRepo::list_between(self.conn, staff_ids, from, to, statuses)?)
    }
}

impl Directory for PgStore<'_> {
    fn lookup(&mut self, staff_id: i64) -> AppResult<Option<Staff>> {
        Ok(StaffRepo::find_by_id(self.conn, staff_id)?)
    }

    fn subordinates(&mut self, manager_id: i64) -> AppResult<Vec<Staff>> {
        Ok(StaffRepo::list_reporting_to(self.conn, manager_id)?)
    }

    fn all_staff(&mut self) -> AppResult<Vec<Staff>> {
        Ok(StaffRepo::list_all(self.conn)?)
    }
}
