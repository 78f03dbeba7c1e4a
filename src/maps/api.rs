use curl::easy::Easy;
use serde_derive::Deserialize;

use super::{MapsError, MapsService, RouteDetails};
use crate::{
    data_types::{
        common::Coordinate,
        route::{Bounds, FuelStop},
    },
    logln, logvbln,
};

const GOOGLE_MAPS_BASE_URL: &str = "https://maps.googleapis.com/maps/api/";
const FUEL_SEARCH_RADIUS_M: u32 = 5000;

#[derive(Debug, Deserialize)]
struct Directions {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    legs: Vec<Leg>,
    overview_polyline: OverviewPolyline,
    #[serde(default)]
    bounds: Option<Bounds>,
}

#[derive(Debug, Deserialize)]
struct Leg {
    distance: Measure,
    duration: Measure,
}

#[derive(Debug, Deserialize)]
struct Measure {
    value: f64,
}

#[derive(Debug, Deserialize)]
struct OverviewPolyline {
    points: String,
}

#[derive(Debug, Deserialize)]
struct Places {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<FuelStop>,
}

fn ensure_ok(status: &str, error_message: Option<String>) -> Result<(), MapsError> {
    if status == "OK" {
        return Ok(());
    }

    Err(MapsError::Status {
        status: status.to_string(),
        message: error_message.unwrap_or_default(),
    })
}

/// Google Maps web services (Directions, Places Nearby Search).
pub struct GoogleMaps {
    api_key: String,
    base_url: String,
}

impl GoogleMaps {
    const CC: &str = "GoogleMaps";

    pub fn new(api_key: impl Into<String>) -> Result<Self, MapsError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(MapsError::MissingApiKey);
        }

        Ok(Self {
            api_key,
            base_url: GOOGLE_MAPS_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        if !self.base_url.ends_with('/') {
            self.base_url.push('/');
        }
        self
    }

    fn get_request(&self, url: &str) -> Result<String, MapsError> {
        let mut handle = Easy::new();
        handle.get(true)?;
        handle.url(url)?;

        let mut buffer_response = Vec::new();
        {
            let mut transfer = handle.transfer();
            transfer.write_function(|data| {
                buffer_response.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = handle.response_code()?;
        if !(200..300).contains(&code) {
            return Err(MapsError::HttpStatus(code));
        }

        Ok(String::from_utf8_lossy(&buffer_response).into_owned())
    }

    pub(crate) fn directions_url(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        waypoints: &[Coordinate],
    ) -> String {
        let mut url = format!(
            "{}directions/json?origin={}&destination={}&alternatives=true",
            self.base_url,
            origin.to_query_param(),
            destination.to_query_param()
        );

        if !waypoints.is_empty() {
            let stops: Vec<String> = waypoints.iter().map(Coordinate::to_query_param).collect();
            url += &format!("&waypoints=optimize:true%7C{}", stops.join("%7C"));
        }

        url + "&key=" + &self.api_key
    }

    pub(crate) fn nearby_url(&self, point: Coordinate) -> String {
        format!(
            "{}place/nearbysearch/json?location={}&radius={}&type=gas_station&key={}",
            self.base_url,
            point.to_query_param(),
            FUEL_SEARCH_RADIUS_M,
            self.api_key
        )
    }

    /// Takes the first route offered and sums its legs.
    pub fn parse_directions(body: &str) -> Result<RouteDetails, MapsError> {
        let directions: Directions = serde_json::from_str(body)?;

        if directions.status == "ZERO_RESULTS" {
            return Err(MapsError::NoRoute);
        }
        ensure_ok(&directions.status, directions.error_message)?;

        let route = directions.routes.into_iter().next().ok_or(MapsError::NoRoute)?;

        Ok(RouteDetails {
            distance: route.legs.iter().map(|leg| leg.distance.value).sum(),
            duration: route.legs.iter().map(|leg| leg.duration.value).sum(),
            polyline: route.overview_polyline.points,
            bounds: route.bounds,
        })
    }

    /// The closest station, when there is one.
    pub fn parse_places(body: &str) -> Result<Option<FuelStop>, MapsError> {
        let places: Places = serde_json::from_str(body)?;

        if places.status == "ZERO_RESULTS" {
            return Ok(None);
        }
        ensure_ok(&places.status, places.error_message)?;

        Ok(places.results.into_iter().next())
    }
}

impl MapsService for GoogleMaps {
    fn route_details(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        waypoints: &[Coordinate],
    ) -> Result<RouteDetails, MapsError> {
        logln!("Directions {} -> {} via {} waypoint(s)", origin, destination, waypoints.len());

        let body = self.get_request(&self.directions_url(origin, destination, waypoints))?;
        GoogleMaps::parse_directions(&body)
    }

    fn nearby_fuel_station(&self, point: Coordinate) -> Result<Option<FuelStop>, MapsError> {
        logvbln!("Fuel search around {}", point);

        let body = self.get_request(&self.nearby_url(point))?;
        GoogleMaps::parse_places(&body)
    }
}
