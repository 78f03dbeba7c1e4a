use chrono::NaiveDate;
use serde_derive::{Deserialize, Serialize};
use thiserror::Error;

use super::common::{Coordinate, Path};
use super::log_sheet::LogSheet;
use crate::polyline::{self, PolylineError};

#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("malformed route response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("route polyline is malformed: {0}")]
    Polyline(#[from] PolylineError),
    #[error("invalid route response: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StopType {
    Pickup,
    Driving,
    Break,
    Rest,
    Restart,
    Dropoff,
}

impl StopType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopType::Pickup => "pickup",
            StopType::Driving => "driving",
            StopType::Break => "break",
            StopType::Rest => "rest",
            StopType::Restart => "restart",
            StopType::Dropoff => "dropoff",
        }
    }

    pub fn is_on_duty(&self) -> bool {
        matches!(self, StopType::Pickup | StopType::Driving | StopType::Dropoff)
    }
}

/// One entry of the duty schedule. Times are hours since the trip started.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Stop {
    pub r#type: StopType,
    pub duration: f64,
    pub start_time: f64,
    pub end_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinate>,
}

impl Stop {
    pub fn new(r#type: StopType, start_time: f64, duration: f64) -> Self {
        Self {
            r#type,
            duration,
            start_time,
            end_time: start_time + duration,
            location: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Geometry {
    pub location: Coordinate,
}

/// A gas station near the route, in the shape of a Places search result.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FuelStop {
    pub geometry: Geometry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vicinity: Option<String>,
}

impl FuelStop {
    pub fn at(location: Coordinate) -> Self {
        Self {
            geometry: Geometry { location },
            name: None,
            vicinity: None,
        }
    }

    pub fn location(&self) -> Coordinate {
        self.geometry.location
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Bounds {
    pub northeast: Coordinate,
    pub southwest: Coordinate,
}

/// Result of `POST /api/calculate-route/`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RouteResponse {
    /// Meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Seconds of driving.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    pub polyline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    pub breaks: Vec<Stop>,
    pub fuel_stops: Vec<FuelStop>,
    pub total_trip_duration: f64,
    pub hos_compliance: bool,
    pub log_sheets: Vec<LogSheet>,
}

/// Error body returned by the routing service.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

impl RouteResponse {
    /// Parses and validates a response body. Shape problems are reported, never papered over.
    pub fn from_json(body: &str) -> Result<Self, ResponseError> {
        let response: RouteResponse = serde_json::from_str(body)?;
        response.validate()?;

        Ok(response)
    }

    pub fn validate(&self) -> Result<(), ResponseError> {
        polyline::decode(&self.polyline)?;

        if !non_negative(self.total_trip_duration) {
            return Err(ResponseError::Invalid(format!(
                "total_trip_duration is {}",
                self.total_trip_duration
            )));
        }

        for (index, stop) in self.breaks.iter().enumerate() {
            if !non_negative(stop.duration) || !stop.start_time.is_finite() || stop.end_time < stop.start_time {
                return Err(ResponseError::Invalid(format!(
                    "breaks[{}] spans {}..{} for {} hours",
                    index, stop.start_time, stop.end_time, stop.duration
                )));
            }
        }

        for (index, sheet) in self.log_sheets.iter().enumerate() {
            if NaiveDate::parse_from_str(&sheet.date, "%Y-%m-%d").is_err() {
                return Err(ResponseError::Invalid(format!(
                    "log_sheets[{}] has date {:?}",
                    index, sheet.date
                )));
            }

            if !non_negative(sheet.total_hours)
                || sheet.activities.iter().any(|activity| !non_negative(activity.duration))
            {
                return Err(ResponseError::Invalid(format!(
                    "log_sheets[{}] has negative or non-finite hours",
                    index
                )));
            }
        }

        Ok(())
    }

    pub fn path(&self) -> Result<Path, PolylineError> {
        polyline::decode(&self.polyline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "distance": 290000,
        "duration": 10800,
        "polyline": "_p~iF~ps|U_ulLnnqC_mqNvxq`@",
        "breaks": [
            {"type": "pickup", "duration": 1, "start_time": 0, "end_time": 1},
            {"type": "driving", "duration": 3, "start_time": 1, "end_time": 4},
            {"type": "dropoff", "duration": 1, "start_time": 4, "end_time": 5,
             "location": {"lat": 43.252, "lng": -126.453}}
        ],
        "fuel_stops": [{"geometry": {"location": {"lat": 40.7, "lng": -120.95}}, "name": "Gas"}],
        "total_trip_duration": 5,
        "hos_compliance": true,
        "log_sheets": [{
            "date": "2026-10-16",
            "activities": [
                {"status": "ON", "start_time": "08:00", "end_time": "09:00", "duration": 1, "location": "Sacramento, CA"},
                {"status": "D", "start_time": "09:00", "end_time": "12:00", "duration": 3, "location": "En Route"}
            ],
            "total_hours": 4
        }]
    }"#;

    #[test]
    fn parses_a_complete_response() {
        let response = RouteResponse::from_json(RESPONSE).unwrap();

        assert_eq!(response.breaks.len(), 3);
        assert_eq!(response.breaks[2].r#type, StopType::Dropoff);
        assert_eq!(response.fuel_stops[0].location(), Coordinate::new(40.7, -120.95));
        assert_eq!(response.path().unwrap().len(), 3);
        assert!(response.hos_compliance);
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        let body = r#"{"polyline": "", "breaks": [], "fuel_stops": [], "log_sheets": []}"#;

        assert!(matches!(RouteResponse::from_json(body), Err(ResponseError::Json(_))));
    }

    #[test]
    fn malformed_polyline_is_rejected() {
        let body = RESPONSE.replace("_p~iF~ps|U_ulLnnqC_mqNvxq`@", "_p~iF");

        assert!(matches!(
            RouteResponse::from_json(&body),
            Err(ResponseError::Polyline(PolylineError::Truncated { .. }))
        ));
    }

    #[test]
    fn inverted_stop_window_is_rejected() {
        let body = RESPONSE.replace(r#""start_time": 1, "end_time": 4"#, r#""start_time": 4, "end_time": 1"#);

        assert!(matches!(RouteResponse::from_json(&body), Err(ResponseError::Invalid(_))));
    }

    #[test]
    fn bad_log_sheet_date_is_rejected() {
        let body = RESPONSE.replace("2026-10-16", "16/10/2026");

        assert!(matches!(RouteResponse::from_json(&body), Err(ResponseError::Invalid(_))));
    }

    #[test]
    fn unknown_stop_types_are_rejected() {
        let body = RESPONSE.replace(r#""type": "pickup""#, r#""type": "nap""#);

        assert!(RouteResponse::from_json(&body).is_err());
    }

    #[test]
    fn stop_type_serializes_under_type_key() {
        let json = serde_json::to_value(Stop::new(StopType::Break, 8.0, 0.5)).unwrap();

        assert_eq!(json["type"], "break");
        assert_eq!(json["end_time"], 8.5);
        assert!(json.get("location").is_none());
    }
}
