// Sub-modules organized by functional domain
pub mod api;
pub mod request;
pub mod schedule;
pub mod staff;

pub use api::*;
pub use request::*;
pub use schedule::*;
pub use staff::*;
