pub mod hos;
pub mod log_generator;
pub mod route_planner;
