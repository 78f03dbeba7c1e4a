use std::sync::Arc;

use rocket::{
    fairing::{Fairing, Info, Kind},
    get,
    http::{ContentType, Header, Status},
    options, post, routes, Build, Request, Response, Rocket, State,
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    config::Settings,
    data_types::{
        location::RouteInput,
        record::RouteRecord,
        route::{ApiError, RouteResponse},
    },
    database::{route_db::RouteDB, DbError},
    logln,
    maps::{api::GoogleMaps, MapsError, MapsService},
    processors::route_planner::RoutePlanner,
    util::DateTimeUtils,
};

const RECENT_ROUTES_LIMIT: i64 = 20;

type JsonReply = (Status, (ContentType, String));

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Maps(#[from] MapsError),
    #[error(transparent)]
    Db(#[from] DbError),
}

pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Cross-Origin-Resource-Sharing Fairing",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new("Access-Control-Allow-Methods", "POST, GET, OPTIONS"));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

/// What the endpoints share: the maps backend and, optionally, route storage.
pub struct ServerState {
    maps: Arc<dyn MapsService>,
    route_db: Option<RouteDB>,
}

impl ServerState {
    const CC: &str = "Server";

    pub fn new(maps: Arc<dyn MapsService>, route_db: Option<RouteDB>) -> Self {
        Self { maps, route_db }
    }

    pub async fn from_settings(settings: &Settings) -> Result<Self, ServerError> {
        let api_key = settings.server.google_maps_api_key.clone().unwrap_or_default();
        let maps = GoogleMaps::new(api_key)?;

        let route_db = match &settings.server.mongodb_uri {
            Some(uri) => Some(RouteDB::new(uri, &settings.server.database).await?),
            None => None,
        };

        Ok(ServerState::new(Arc::new(maps), route_db))
    }

    // Storage is best effort; the caller still gets the route.
    async fn remember(&self, input: &RouteInput, response: &RouteResponse) {
        if let Some(route_db) = &self.route_db {
            let record = RouteRecord::new(input, response, chrono::Utc::now().timestamp());
            if let Err(err) = route_db.insert(&record).await {
                logln!("Unable to store route: {}", err);
            }
        }
    }
}

fn json_reply<T: Serialize>(status: Status, value: &T) -> JsonReply {
    match serde_json::to_string(value) {
        Ok(body) => (status, (ContentType::JSON, body)),
        Err(err) => error_reply(Status::InternalServerError, err.to_string()),
    }
}

fn error_reply(status: Status, message: impl Into<String>) -> JsonReply {
    let body = serde_json::to_string(&ApiError::new(message)).unwrap_or_default();
    (status, (ContentType::JSON, body))
}

#[options("/<_..>")]
fn all_options() {
    /* Intentionally left empty */
}

#[post("/calculate-route/<_..>", data = "<body>")]
async fn calculate_route(body: String, state: &State<ServerState>) -> JsonReply {
    let input: RouteInput = match serde_json::from_str(&body) {
        Ok(input) => input,
        Err(err) => return error_reply(Status::BadRequest, format!("invalid request: {}", err)),
    };

    if let Err(err) = input.validate() {
        return error_reply(Status::BadRequest, err.to_string());
    }

    let maps = state.maps.clone();
    let request = input.clone();
    let planned = tokio::task::spawn_blocking(move || {
        RoutePlanner::new(maps.as_ref()).plan(&request, DateTimeUtils::now())
    })
    .await;

    match planned {
        Ok(Ok(response)) => {
            state.remember(&input, &response).await;
            json_reply(Status::Ok, &response)
        }
        Ok(Err(err)) if err.is_client_error() => error_reply(Status::BadRequest, err.to_string()),
        Ok(Err(err)) => error_reply(
            Status::InternalServerError,
            format!("Something went wrong, check that all locations are valid: {}", err),
        ),
        Err(err) => error_reply(Status::InternalServerError, err.to_string()),
    }
}

#[get("/routes")]
async fn recent_routes(state: &State<ServerState>) -> JsonReply {
    let Some(route_db) = &state.route_db else {
        return error_reply(Status::NotFound, "route storage is not configured");
    };

    match route_db.recent(RECENT_ROUTES_LIMIT).await {
        Ok(routes) => json_reply(Status::Ok, &routes),
        Err(err) => error_reply(Status::InternalServerError, err.to_string()),
    }
}

pub fn build(state: ServerState) -> Rocket<Build> {
    rocket::build()
        .attach(Cors)
        .manage(state)
        .mount("/api", routes![calculate_route, recent_routes])
        .mount("/", routes![all_options])
}
