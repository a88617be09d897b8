use chrono::NaiveDate;
use diesel::prelude::*;

use crate::db::enums::{WfhDuration, WfhStatus};
use crate::db::models::schedule::{NewScheduleEntry, ScheduleChanges, ScheduleEntry, WithdrawalNote};

pub struct SchedulesRepo;

/// Statuses that keep a date taken for its staff member.
const OCCUPYING: [WfhStatus; 4] = [
    WfhStatus::Pending,
    WfhStatus::Approved,
    WfhStatus::Cancelled,
    WfhStatus::Withdrawn,
];

impl SchedulesRepo {
    pub fn insert(conn: &mut PgConnection, new_entry: &NewScheduleEntry) -> Result<ScheduleEntry, diesel::result::Error> {
        diesel::insert_into(crate::schema::wfh_schedules::table)
            .values(new_entry)
            .returning(ScheduleEntry::as_returning())
            .get_result(conn)
    }

    pub fn lock_by_id(conn: &mut PgConnection, schedule_id: i64) -> Result<Option<ScheduleEntry>, diesel::result::Error> {
        use crate::schema::wfh_schedules::dsl::*;
        wfh_schedules
            .filter(id.eq(schedule_id))
            .select(ScheduleEntry::as_select())
            .for_update()
            .first::<ScheduleEntry>(conn)
            .optional()
    }

    pub fn find_occupying(conn: &mut PgConnection, staff: i64, on: NaiveDate) -> Result<Option<ScheduleEntry>, diesel::result::Error> {
        use crate::schema::wfh_schedules::dsl::*;
        wfh_schedules
            .filter(staff_id.eq(staff))
            .filter(date.eq(on))
            .filter(status.eq_any(OCCUPYING.to_vec()))
            .select(ScheduleEntry::as_select())
            .first::<ScheduleEntry>(conn)
            .optional()
    }

    pub fn list_by_request(conn: &mut PgConnection, owner: i64) -> Result<Vec<ScheduleEntry>, diesel::result::Error> {
        use crate::schema::wfh_schedules::dsl::*;
        wfh_schedules
            .filter(request_id.eq(owner))
            .select(ScheduleEntry::as_select())
            .order(date.asc())
            .load::<ScheduleEntry>(conn)
    }

    pub fn lock_by_request(conn: &mut PgConnection, owner: i64) -> Result<Vec<ScheduleEntry>, diesel::result::Error> {
        use crate::schema::wfh_schedules::dsl::*;
        wfh_schedules
            .filter(request_id.eq(owner))
            .select(ScheduleEntry::as_select())
            .order(date.asc())
            .for_update()
            .load::<ScheduleEntry>(conn)
    }

    pub fn list_parked_under(conn: &mut PgConnection, original: i64) -> Result<Vec<ScheduleEntry>, diesel::result::Error> {
        use crate::schema::wfh_schedules::dsl::*;
        wfh_schedules
            .filter(reason_for_withdrawing.eq(WithdrawalNote::ParkedRequest(original)))
            .select(ScheduleEntry::as_select())
            .order(date.asc())
            .load::<ScheduleEntry>(conn)
    }

    pub fn save(conn: &mut PgConnection, entry: &ScheduleEntry) -> Result<ScheduleEntry, diesel::result::Error> {
        use crate::schema::wfh_schedules::dsl::*;
        diesel::update(wfh_schedules.filter(id.eq(entry.id)))
            .set(&ScheduleChanges::from(entry))
            .returning(ScheduleEntry::as_returning())
            .get_result(conn)
    }

    pub fn update_status_for_request(
        conn: &mut PgConnection,
        owner: i64,
        new_status: WfhStatus,
        only_pending: bool,
    ) -> Result<usize, diesel::result::Error> {
        use crate::schema::wfh_schedules::dsl::*;
        let changes = (status.eq(new_status), updated_at.eq(chrono::Utc::now()));
        if only_pending {
            diesel::update(
                wfh_schedules
                    .filter(request_id.eq(owner))
                    .filter(status.eq(WfhStatus::Pending)),
            )
            .set(changes)
            .execute(conn)
        } else {
            diesel::update(wfh_schedules.filter(request_id.eq(owner)))
                .set(changes)
                .execute(conn)
        }
    }

    pub fn count_approved_on(
        conn: &mut PgConnection,
        staff_ids: &[i64],
        on: NaiveDate,
        durations: &[WfhDuration],
    ) -> Result<i64, diesel::result::Error> {
        use crate::schema::wfh_schedules::dsl::*;
        wfh_schedules
            .filter(staff_id.eq_any(staff_ids))
            .filter(date.eq(on))
            .filter(status.eq(WfhStatus::Approved))
            .filter(duration.eq_any(durations.to_vec()))
            .count()
            .get_result(conn)
    }

    pub fn list_between(
        conn: &mut PgConnection,
        staff_ids: &[i64],
        from: NaiveDate,
        to: NaiveDate,
        statuses: &[WfhStatus],
    ) -> Result<Vec<ScheduleEntry>, diesel::result::Error> {
        use crate::schema::wfh_schedules::dsl::*;
        wfh_schedules
            .filter(staff_id.eq_any(staff_ids))
            .filter(date.between(from, to))
            .filter(status.eq_any(statuses.to_vec()))
            .select(ScheduleEntry::as_select())
            .order((date.asc(), staff_id.asc()))
            .load::<ScheduleEntry>(conn)
    }
}
