mod attendance;
pub mod models;
pub mod routes;

pub use attendance::Attendance;
pub use models::*;
