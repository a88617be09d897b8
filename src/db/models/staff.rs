use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::enums::StaffRole;

/// One row of the organization directory.
#[derive(Queryable, Selectable, Insertable, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[diesel(table_name = crate::schema::staff)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Staff {
    pub staff_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub dept: String,
    pub position: String,
    pub country: String,
    pub email: String,
    pub reporting_manager: Option<i64>,
    pub role: i32,
}

impl Staff {
    pub fn name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn role(&self) -> StaffRole {
        StaffRole::from_code(self.role)
    }

    /// The manager whose team this person counts against. Top-level staff
    /// without a reporting manager lead their own team.
    pub fn team_lead(&self) -> i64 {
        self.reporting_manager.unwrap_or(self.staff_id)
    }
}
