//! Truck route planning: encoded polylines, Hours-of-Service duty schedules,
//! daily log sheets, and the HTTP service and client around them.

pub mod client;
pub mod config;
pub mod data_types;
pub mod database;
pub mod maps;
pub mod polyline;
pub mod processors;
pub mod server;
pub mod util;

pub use client::{ClientError, RoutingClient};
pub use config::Settings;
pub use data_types::{
    common::{Coordinate, Path},
    location::{Location, RouteInput},
    log_sheet::{Activity, DutyStatus, LogSheet},
    route::{FuelStop, RouteResponse, Stop, StopType},
};
pub use processors::route_planner::{PlannerError, RoutePlanner};
