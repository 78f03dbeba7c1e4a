use chrono::NaiveDateTime;
use thiserror::Error;

use super::{
    hos::HosCalculator,
    log_generator::{LogSheetGenerator, TripLocations},
};
use crate::{
    data_types::{
        common::{Coordinate, Path},
        location::{RouteInput, ValidationError},
        route::{FuelStop, RouteResponse, Stop, StopType},
    },
    logln, logvbln,
    maps::{MapsError, MapsService},
    polyline::{self, PolylineError},
    util::geo::{GeoUtils, KM_PER_MILE},
};

/// A truck should be able to refuel at least this often.
pub const FUEL_INTERVAL_MILES: f64 = 1000.0;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("invalid trip: {0}")]
    Validation(#[from] ValidationError),
    #[error("error calculating route: {0}")]
    Maps(#[from] MapsError),
    #[error("route geometry is unusable: {0}")]
    Polyline(#[from] PolylineError),
}

impl PlannerError {
    /// The request itself was wrong, as opposed to a failure while serving it.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PlannerError::Validation(_))
    }
}

/// Turns a trip request into a route plan: directions, duty schedule, fuel stops and daily logs.
pub struct RoutePlanner<'a> {
    maps: &'a dyn MapsService,
    log_generator: LogSheetGenerator,
}

impl<'a> RoutePlanner<'a> {
    const CC: &'static str = "Planner";

    pub fn new(maps: &'a dyn MapsService) -> Self {
        Self {
            maps,
            log_generator: LogSheetGenerator::new(),
        }
    }

    pub fn plan(&self, input: &RouteInput, start: NaiveDateTime) -> Result<RouteResponse, PlannerError> {
        input.validate()?;

        let details = self.maps.route_details(
            input.current_location.coordinate(),
            input.dropoff_location.coordinate(),
            &[input.pickup_location.coordinate()],
        )?;
        let path = polyline::decode(&details.polyline)?;

        let total_drive_time = details.drive_hours();
        let hos_calculator = HosCalculator::new(input.current_cycle_hours);

        let mut breaks = hos_calculator.calculate_breaks(total_drive_time);
        RoutePlanner::place_stops(&mut breaks, &path, input, total_drive_time);

        let fuel_stops = self.find_fuel_stops(input, &path)?;
        let log_sheets = self
            .log_generator
            .generate_daily_logs(&breaks, start, &TripLocations::from(input));

        logln!(
            "Planned {:.1} km, {:.2}h driving, {} stop(s), {} fuel stop(s), {} log sheet(s)",
            details.distance / 1000.0,
            total_drive_time,
            breaks.len(),
            fuel_stops.len(),
            log_sheets.len()
        );

        Ok(RouteResponse {
            distance: Some(details.distance),
            duration: Some(details.duration),
            bounds: details.bounds.or_else(|| GeoUtils::get_bounding_box(&path)),
            polyline: details.polyline,
            total_trip_duration: breaks.iter().map(|stop| stop.duration).sum(),
            hos_compliance: hos_calculator.is_compliant(total_drive_time),
            breaks,
            fuel_stops,
            log_sheets,
        })
    }

    /// Pickup and dropoff happen at their locations; stops on the road are placed
    /// on the path in proportion to the driving done before them.
    fn place_stops(stops: &mut [Stop], path: &Path, input: &RouteInput, total_drive_time: f64) {
        let mut driven = 0.;

        for stop in stops.iter_mut() {
            match stop.r#type {
                StopType::Pickup => stop.location = Some(input.pickup_location.coordinate()),
                StopType::Dropoff => stop.location = Some(input.dropoff_location.coordinate()),
                StopType::Driving => driven += stop.duration,
                StopType::Break | StopType::Rest | StopType::Restart => {
                    let progress = if total_drive_time > 0. {
                        driven / total_drive_time
                    } else {
                        0.
                    };
                    stop.location = GeoUtils::point_at_fraction(path, progress);
                }
            }
        }
    }

    /// Stations near each trip location, then along the route every `FUEL_INTERVAL_MILES`.
    fn find_fuel_stops(&self, input: &RouteInput, path: &Path) -> Result<Vec<FuelStop>, PlannerError> {
        let mut search_points: Vec<Coordinate> = vec![
            input.current_location.coordinate(),
            input.pickup_location.coordinate(),
            input.dropoff_location.coordinate(),
        ];
        search_points.extend(GeoUtils::sample_every(path, FUEL_INTERVAL_MILES * KM_PER_MILE));

        let mut fuel_stops: Vec<FuelStop> = Vec::new();
        for point in search_points {
            if let Some(station) = self.maps.nearby_fuel_station(point)? {
                if !fuel_stops.iter().any(|known| known.location() == station.location()) {
                    fuel_stops.push(station);
                }
            } else {
                logvbln!("No fuel station around {}", point);
            }
        }

        Ok(fuel_stops)
    }
}
