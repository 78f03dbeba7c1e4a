use curl::easy::{Easy, List};
use thiserror::Error;

use crate::{
    data_types::{
        location::RouteInput,
        route::{ApiError, ResponseError, RouteResponse},
    },
    logln,
};

/// Shown when the service gives no reason of its own.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to the routing service failed: {0}")]
    Http(#[from] curl::Error),
    #[error("routing service answered HTTP {status}: {message}")]
    Api { status: u32, message: String },
    #[error(transparent)]
    Response(#[from] ResponseError),
    #[error("unable to encode request: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ClientError {
    /// What to tell the user: the service's own message when it sent one.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } => message.clone(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Client of the routing service. One attempt per call, no retries.
pub struct RoutingClient {
    base_url: String,
}

impl RoutingClient {
    const CC: &str = "RoutingClient";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn calculate_route_url(&self) -> String {
        format!("{}/calculate-route/", self.base_url)
    }

    pub fn calculate_route(&self, input: &RouteInput) -> Result<RouteResponse, ClientError> {
        let url = self.calculate_route_url();
        logln!("POST {}", url);

        let (status, body) = RoutingClient::post_json(&url, &serde_json::to_string(input)?)?;
        RoutingClient::interpret(status, &body)
    }

    fn post_json(url: &str, payload: &str) -> Result<(u32, String), ClientError> {
        let mut handle = Easy::new();
        let mut headers = List::new();
        headers.append("Content-Type: application/json")?;
        headers.append("Accept: application/json")?;

        handle.url(url)?;
        handle.post(true)?;
        handle.http_headers(headers)?;
        handle.post_fields_copy(payload.as_bytes())?;

        let mut buffer_response = Vec::new();
        {
            let mut transfer = handle.transfer();
            transfer.write_function(|data| {
                buffer_response.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = handle.response_code()?;
        Ok((status, String::from_utf8_lossy(&buffer_response).into_owned()))
    }

    /// Maps an HTTP status and body to a validated response or an error carrying the service's message.
    pub fn interpret(status: u32, body: &str) -> Result<RouteResponse, ClientError> {
        if !(200..300).contains(&status) {
            let message = serde_json::from_str::<ApiError>(body)
                .map(|api_error| api_error.error)
                .unwrap_or_else(|_| GENERIC_ERROR_MESSAGE.to_string());

            return Err(ClientError::Api { status, message });
        }

        Ok(RouteResponse::from_json(body)?)
    }
}
