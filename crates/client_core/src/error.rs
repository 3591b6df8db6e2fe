use shared::{domain::Region, protocol::RequestName};
use thiserror::Error;

use crate::dispatcher::FetchStatus;

/// Failures the controller absorbs and turns into notifications or logs.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("unknown tab '{0}'")]
    InvalidTabName(String),
    #[error("{0} is not a game request")]
    InvalidGameRequest(RequestName),
    #[error("error while loading {request}, status: {status}{}", http_status_suffix(.http_status))]
    FetchFailure {
        request: RequestName,
        status: FetchStatus,
        http_status: Option<u16>,
    },
    #[error("notification region '{0}' does not exist")]
    NotificationRegionMissing(Region),
    #[error("malformed response to {request}: {source}")]
    InvalidGameResponse {
        request: RequestName,
        #[source]
        source: serde_json::Error,
    },
    #[error("application controller is no longer running")]
    ControllerClosed,
}

fn http_status_suffix(http_status: &Option<u16>) -> String {
    match http_status {
        Some(code) => format!(" ({code})"),
        None => String::new(),
    }
}
