use std::fmt;

use geo_types::Coord;
use serde_derive::{Deserialize, Serialize};

pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;
pub const MIN_LNG: f64 = -180.0;
pub const MAX_LNG: f64 = 180.0;

/// A point on the map, in degrees.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Default)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

/// Ordered travel path. Order matters: it is the route itself.
pub type Path = Vec<Coordinate>;

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (MIN_LAT..=MAX_LAT).contains(&self.lat)
            && (MIN_LNG..=MAX_LNG).contains(&self.lng)
    }

    /// `lat,lng`, the form the Google web services take as a location parameter.
    pub fn to_query_param(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lng)
    }
}

// geo-types is x/y, so longitude goes first
impl From<Coordinate> for Coord {
    fn from(value: Coordinate) -> Self {
        Coord {
            x: value.lng,
            y: value.lat,
        }
    }
}

impl From<Coord> for Coordinate {
    fn from(value: Coord) -> Self {
        Coordinate::new(value.y, value.x)
    }
}
