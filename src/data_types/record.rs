use mongodb::bson::oid::ObjectId;
use serde_derive::{Deserialize, Serialize};

use super::{
    location::{Location, RouteInput},
    route::{RouteResponse, Stop},
};

/// A computed route as it is kept in the `routes` collection.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RouteRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub current_location: Location,
    pub pickup_location: Location,
    pub dropoff_location: Location,
    pub current_cycle_hours: f64,

    /// Unix timestamp, seconds.
    pub created_at: i64,

    pub estimated_duration: Option<f64>,
    pub route_polyline: Option<String>,
    pub stops: Vec<Stop>,
}

impl RouteRecord {
    pub fn new(input: &RouteInput, response: &RouteResponse, created_at: i64) -> Self {
        Self {
            id: None,
            current_location: input.current_location.clone(),
            pickup_location: input.pickup_location.clone(),
            dropoff_location: input.dropoff_location.clone(),
            current_cycle_hours: input.current_cycle_hours,
            created_at,
            estimated_duration: Some(response.total_trip_duration),
            route_polyline: Some(response.polyline.clone()),
            stops: response.breaks.clone(),
        }
    }
}
