pub mod common;
pub mod location;
pub mod log_sheet;
pub mod record;
pub mod route;
