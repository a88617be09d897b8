use diesel::prelude::*;

use crate::db::models::staff::Staff;

pub struct StaffRepo;

impl StaffRepo {
    pub fn find_by_id(conn: &mut PgConnection, id: i64) -> Result<Option<Staff>, diesel::result::Error> {
        use crate::schema::staff::dsl::*;
        staff
            .filter(staff_id.eq(id))
            .select(Staff::as_select())
            .first::<Staff>(conn)
            .optional()
    }

    pub fn list_reporting_to(conn: &mut PgConnection, manager: i64) -> Result<Vec<Staff>, diesel::result::Error> {
        use crate::schema::staff::dsl::*;
        staff
            .filter(reporting_manager.eq(manager))
            .select(Staff::as_select())
            .order(staff_id.asc())
            .load::<Staff>(conn)
    }

    pub fn list_all(conn: &mut PgConnection) -> Result<Vec<Staff>, diesel::result::Error> {
        use crate::schema::staff::dsl::*;
        staff.select(Staff::as_select()).order(staff_id.asc()).load::<Staff>(conn)
    }
}
