use serde_derive::{Deserialize, Serialize};
use thiserror::Error;

use super::common::Coordinate;

pub const MAX_CYCLE_HOURS: f64 = 70.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field}: ({lat}, {lng}) is not a valid coordinate")]
    InvalidLocation { field: &'static str, lat: f64, lng: f64 },
    #[error("current_cycle_hours must be within [0, {max}], got {0}", max = MAX_CYCLE_HOURS)]
    InvalidCycleHours(f64),
}

/// A place picked by the user: a coordinate and, when resolved, its formatted address.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Location {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            address: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    pub fn validate(&self, field: &'static str) -> Result<(), ValidationError> {
        if !self.coordinate().is_valid() {
            return Err(ValidationError::InvalidLocation {
                field,
                lat: self.lat,
                lng: self.lng,
            });
        }

        Ok(())
    }
}

impl From<&Location> for Coordinate {
    fn from(value: &Location) -> Self {
        value.coordinate()
    }
}

/// Body of `POST /api/calculate-route/`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RouteInput {
    pub current_location: Location,
    pub pickup_location: Location,
    pub dropoff_location: Location,
    pub current_cycle_hours: f64,
}

impl RouteInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.current_location.validate("current_location")?;
        self.pickup_location.validate("pickup_location")?;
        self.dropoff_location.validate("dropoff_location")?;

        if !self.current_cycle_hours.is_finite()
            || !(0.0..=MAX_CYCLE_HOURS).contains(&self.current_cycle_hours)
        {
            return Err(ValidationError::InvalidCycleHours(self.current_cycle_hours));
        }

        Ok(())
    }
}
