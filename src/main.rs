use std::process::ExitCode;

use route_planner::{
    polyline,
    util::geo::GeoUtils,
    RouteInput, RouteResponse, RoutingClient, Settings,
};

const USAGE: &str = "usage:\n  route-planner <trip.json>      plan a trip with the routing service (see demos/trip.json)\n  route-planner decode <polyline> print the coordinates of an encoded polyline";

fn print_summary(response: &RouteResponse) {
    println!("Trip Summary");
    println!("Total Trip Duration: {:.2} hours", response.total_trip_duration);
    println!(
        "HOS Compliance: {}",
        if response.hos_compliance { "Compliant" } else { "Non-compliant" }
    );

    match response.path() {
        Ok(path) => {
            let center = GeoUtils::map_center(&path);
            println!(
                "Route: {} points, {:.1} km, map centered on {}",
                path.len(),
                GeoUtils::path_length(&path),
                center
            );
        }
        Err(err) => println!("Route: unusable geometry ({})", err),
    }

    println!();
    for stop in &response.breaks {
        let at = stop.location.map(|location| location.to_string()).unwrap_or_default();
        println!(
            "{:<8} {:>7.2}h - {:>7.2}h  {:>5.2}h  {}",
            stop.r#type.as_str(),
            stop.start_time,
            stop.end_time,
            stop.duration,
            at
        );
    }

    for fuel in &response.fuel_stops {
        println!(
            "fuel     {}  {}",
            fuel.location(),
            fuel.name.as_deref().unwrap_or("gas station")
        );
    }

    for sheet in &response.log_sheets {
        println!("\n{}", sheet);
    }
}

fn plan(trip_file: &str) -> Result<(), String> {
    let content = std::fs::read_to_string(trip_file).map_err(|err| format!("{}: {}", trip_file, err))?;
    let input: RouteInput = serde_json::from_str(&content).map_err(|err| format!("{}: {}", trip_file, err))?;
    input.validate().map_err(|err| err.to_string())?;

    let settings = Settings::load().map_err(|err| err.to_string())?;
    settings.apply_logging();

    let response = RoutingClient::new(settings.client.api_base_url.as_str())
        .calculate_route(&input)
        .map_err(|err| err.user_message())?;

    print_summary(&response);
    Ok(())
}

fn decode(encoded: &str) -> Result<(), String> {
    let path = polyline::decode(encoded).map_err(|err| err.to_string())?;

    for coordinate in path {
        println!("{},{}", coordinate.lat, coordinate.lng);
    }

    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let result = match args.as_slice() {
        [command, encoded] if command == "decode" => decode(encoded),
        [trip_file] => plan(trip_file),
        _ => {
            eprintln!("{}", USAGE);
            return ExitCode::from(2);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}
