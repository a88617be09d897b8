pub mod admission_service;
pub mod context;
pub mod expiry_service;
pub mod lifecycle_service;
pub mod reporting_service;
pub mod requests_service;
pub mod schedules_service;

pub use admission_service::{Admission, AdmissionService};
pub use expiry_service::ExpiryService;
pub use lifecycle_service::LifecycleService;
pub use reporting_service::ReportingService;
pub use requests_service::{RequestDraft, RequestsService};
pub use schedules_service::{SchedulesService, Submission};
