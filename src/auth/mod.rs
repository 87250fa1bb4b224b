mod helpers;
pub mod routes;

pub use helpers::*;
