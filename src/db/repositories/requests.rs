use chrono::NaiveDate;
use diesel::prelude::*;

use crate::db::enums::{RequestKind, WfhStatus};
use crate::db::models::request::{NewWfhRequest, WfhRequest};

pub struct RequestsRepo;

impl RequestsRepo {
    pub fn insert(conn: &mut PgConnection, new_request: &NewWfhRequest) -> Result<WfhRequest, diesel::result::Error> {
        diesel::insert_into(crate::schema::wfh_requests::table)
            .values(new_request)
            .returning(WfhRequest::as_returning())
            .get_result(conn)
    }

    pub fn find_by_id(conn: &mut PgConnection, request_id: i64) -> Result<Option<WfhRequest>, diesel::result::Error> {
        use crate::schema::wfh_requests::dsl::*;
        wfh_requests
            .filter(id.eq(request_id))
            .select(WfhRequest::as_select())
            .first::<WfhRequest>(conn)
            .optional()
    }

    pub fn lock_by_id(conn: &mut PgConnection, request_id: i64) -> Result<Option<WfhRequest>, diesel::result::Error> {
        use crate::schema::wfh_requests::dsl::*;
        wfh_requests
            .filter(id.eq(request_id))
            .select(WfhRequest::as_select())
            .for_update()
            .first::<WfhRequest>(conn)
            .optional()
    }

    pub fn update_status(
        conn: &mut PgConnection,
        request_id: i64,
        new_status: WfhStatus,
        rejection: Option<&str>,
    ) -> Result<WfhRequest, diesel::result::Error> {
        use crate::schema::wfh_requests::dsl as r;
        let target = diesel::update(r::wfh_requests.filter(r::id.eq(request_id)));
        match rejection {
            Some(text) => target
                .set((
                    r::status.eq(new_status),
                    r::reason_for_rejection.eq(Some(text)),
                    r::updated_at.eq(chrono::Utc::now()),
                ))
                .returning(WfhRequest::as_returning())
                .get_result(conn),
            None => target
                .set((r::status.eq(new_status), r::updated_at.eq(chrono::Utc::now())))
                .returning(WfhRequest::as_returning())
                .get_result(conn),
        }
    }

    pub fn delete_by_id(conn: &mut PgConnection, request_id: i64) -> Result<usize, diesel::result::Error> {
        use crate::schema::wfh_requests::dsl::*;
        diesel::delete(wfh_requests.filter(id.eq(request_id))).execute(conn)
    }

    pub fn blocking_exists(conn: &mut PgConnection, staff: i64, start: NaiveDate) -> Result<bool, diesel::result::Error> {
        use crate::schema::wfh_requests::dsl as r;
        diesel::select(diesel::dsl::exists(
            r::wfh_requests
                .filter(r::staff_id.eq(staff))
                .filter(r::start_date.eq(start))
                .filter(r::end_date.is_null())
                .filter(r::status.eq_any(vec![WfhStatus::Pending, WfhStatus::Approved])),
        ))
        .get_result(conn)
    }

    pub fn list_by_manager(
        conn: &mut PgConnection,
        manager: i64,
        status_filter: Option<WfhStatus>,
    ) -> Result<Vec<WfhRequest>, diesel::result::Error> {
        use crate::schema::wfh_requests::dsl::*;
        let mut query = wfh_requests
            .filter(manager_id.eq(manager))
            .select(WfhRequest::as_select())
            .into_boxed();
        if let Some(s) = status_filter {
            query = query.filter(status.eq(s));
        }
        query.order((start_date.asc(), id.asc())).load::<WfhRequest>(conn)
    }

    pub fn list_by_staff(conn: &mut PgConnection, staff: i64) -> Result<Vec<WfhRequest>, diesel::result::Error> {
        use crate::schema::wfh_requests::dsl::*;
        wfh_requests
            .filter(staff_id.eq(staff))
            .select(WfhRequest::as_select())
            .order((start_date.desc(), id.desc()))
            .load::<WfhRequest>(conn)
    }

    pub fn lock_pending_before(
        conn: &mut PgConnection,
        cutoff: NaiveDate,
        limit: i64,
    ) -> Result<Vec<WfhRequest>, diesel::result::Error> {
        use crate::schema::wfh_requests::dsl::*;
        wfh_requests
            .filter(status.eq(WfhStatus::Pending))
            .filter(start_date.lt(cutoff))
            .select(WfhRequest::as_select())
            .order(id.asc())
            .limit(limit)
            .for_update()
            .skip_locked()
            .load::<WfhRequest>(conn)
    }

    pub fn pending_withdrawal_exists(conn: &mut PgConnection, staff: i64, on: NaiveDate) -> Result<bool, diesel::result::Error> {
        use crate::schema::wfh_requests::dsl as r;
        diesel::select(diesel::dsl::exists(
            r::wfh_requests
                .filter(r::staff_id.eq(staff))
                .filter(r::start_date.eq(on))
                .filter(r::kind.eq(RequestKind::Withdrawal))
                .filter(r::status.eq(WfhStatus::Pending)),
        ))
        .get_result(conn)
    }
}
