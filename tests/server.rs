use std::sync::Arc;

use rocket::{http::ContentType, http::Status, local::asynchronous::Client};
use route_planner::{
    data_types::route::ApiError,
    maps::{MapsError, MapsService, RouteDetails},
    server::{self, ServerState},
    Coordinate, FuelStop, RouteResponse, StopType,
};

struct FixedRoute {
    hours: f64,
}

impl MapsService for FixedRoute {
    fn route_details(&self, _: Coordinate, _: Coordinate, _: &[Coordinate]) -> Result<RouteDetails, MapsError> {
        if self.hours < 0. {
            return Err(MapsError::NoRoute);
        }

        Ok(RouteDetails {
            distance: self.hours * 88_000.,
            duration: self.hours * 3600.,
            polyline: "_p~iF~ps|U_ulLnnqC_mqNvxq`@".to_string(),
            bounds: None,
        })
    }

    fn nearby_fuel_station(&self, point: Coordinate) -> Result<Option<FuelStop>, MapsError> {
        Ok(Some(FuelStop::at(point)))
    }
}

const TRIP: &str = r#"{
    "current_location": {"lat": 38.5, "lng": -120.2, "address": "Sacramento, CA, USA"},
    "pickup_location": {"lat": 40.7, "lng": -120.95, "address": "Susanville, CA, USA"},
    "dropoff_location": {"lat": 43.252, "lng": -126.453},
    "current_cycle_hours": 12.5
}"#;

async fn client(hours: f64) -> Client {
    let state = ServerState::new(Arc::new(FixedRoute { hours }), None);
    Client::tracked(server::build(state)).await.expect("valid rocket instance")
}

#[tokio::test]
async fn calculates_a_route() {
    let client = client(14.).await;
    let response = client
        .post("/api/calculate-route/")
        .header(ContentType::JSON)
        .body(TRIP)
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);
    assert_eq!(
        response.headers().get_one("Access-Control-Allow-Origin"),
        Some("*")
    );

    let body = response.into_string().await.unwrap();
    let route = RouteResponse::from_json(&body).unwrap();

    assert!(route.hos_compliance);
    assert_eq!(route.path().unwrap().len(), 3);
    assert!(route.breaks.iter().any(|stop| stop.r#type == StopType::Break));
    assert!(route.breaks.iter().any(|stop| stop.r#type == StopType::Rest));
    assert_eq!(route.fuel_stops.len(), 3);
    assert!(!route.log_sheets.is_empty());
}

#[tokio::test]
async fn path_without_trailing_slash_is_served_too() {
    let client = client(2.).await;
    let response = client
        .post("/api/calculate-route")
        .header(ContentType::JSON)
        .body(TRIP)
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);
}

#[tokio::test]
async fn invalid_input_is_a_bad_request() {
    let client = client(2.).await;
    let body = TRIP.replace("12.5", "80");
    let response = client
        .post("/api/calculate-route/")
        .header(ContentType::JSON)
        .body(body)
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::BadRequest);
    let error: ApiError = serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
    assert!(error.error.contains("current_cycle_hours"));
}

#[tokio::test]
async fn missing_fields_are_a_bad_request() {
    let client = client(2.).await;
    let response = client
        .post("/api/calculate-route/")
        .header(ContentType::JSON)
        .body(r#"{"current_cycle_hours": 3}"#)
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::BadRequest);
}

#[tokio::test]
async fn planning_failures_carry_an_error_message() {
    let client = client(-1.).await;
    let response = client
        .post("/api/calculate-route/")
        .header(ContentType::JSON)
        .body(TRIP)
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::InternalServerError);
    let error: ApiError = serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
    assert!(error.error.contains("no route found"));
}

#[tokio::test]
async fn stored_routes_need_a_database() {
    let client = client(2.).await;
    let response = client.get("/api/routes").dispatch().await;

    assert_eq!(response.status(), Status::NotFound);
}

#[tokio::test]
async fn preflight_is_answered() {
    let client = client(2.).await;
    let response = client.options("/api/calculate-route/").dispatch().await;

    assert_eq!(response.status(), Status::Ok);
    assert_eq!(
        response.headers().get_one("Access-Control-Allow-Methods"),
        Some("POST, GET, OPTIONS")
    );
}
