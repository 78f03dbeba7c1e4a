use thiserror::Error;

use crate::data_types::{
    common::Coordinate,
    route::{Bounds, FuelStop},
};

pub mod api;

#[derive(Debug, Error)]
pub enum MapsError {
    #[error("maps request failed: {0}")]
    Http(#[from] curl::Error),
    #[error("maps service answered HTTP {0}")]
    HttpStatus(u32),
    #[error("maps service answered {status}: {message}")]
    Status { status: String, message: String },
    #[error("malformed maps response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no route found")]
    NoRoute,
    #[error("no Google Maps API key configured")]
    MissingApiKey,
}

/// Driving directions summed over every leg.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDetails {
    /// Meters.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
    pub polyline: String,
    pub bounds: Option<Bounds>,
}

impl RouteDetails {
    pub fn drive_hours(&self) -> f64 {
        self.duration / 3600.0
    }
}

/// The directions and places lookups a route calculation needs.
pub trait MapsService: Send + Sync {
    fn route_details(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        waypoints: &[Coordinate],
    ) -> Result<RouteDetails, MapsError>;

    fn nearby_fuel_station(&self, point: Coordinate) -> Result<Option<FuelStop>, MapsError>;
}
