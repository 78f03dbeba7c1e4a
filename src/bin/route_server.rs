use route_planner::{server, Settings};

#[rocket::launch]
async fn rocket() -> _ {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };
    settings.apply_logging();

    match server::ServerState::from_settings(&settings).await {
        Ok(state) => server::build(state),
        Err(err) => {
            eprintln!("Unable to start the routing service: {}", err);
            std::process::exit(1);
        }
    }
}
