pub mod requests;
pub mod schedules;
pub mod staff;

pub use requests::RequestsRepo;
pub use schedules::SchedulesRepo;
pub use staff::StaffRepo;
