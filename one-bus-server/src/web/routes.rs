//! HTTP route handlers.

use std::sync::Arc;

use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::board::{arrival_messages, group_by_route};
use crate::domain::{ArrivalPrediction, MalformedInput, StopCandidate, nearest_stop};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/arrivals", get(flat_arrivals))
        .route("/arrivals/grouped", get(grouped_arrivals))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// The selected stop and whatever the upstream had for it.
struct StopArrivals {
    stop: StopCandidate,
    /// `None` when the fetch failed
    arrivals: Option<Arc<Vec<ArrivalPrediction>>>,
    now_millis: i64,
}

/// Parse the query, pick the nearest stop, and fetch its arrivals.
///
/// Upstream failures are logged and reported as `arrivals: None`; only
/// bad input is an error.
async fn lookup(state: &AppState, query: ArrivalsQuery) -> Result<StopArrivals, AppError> {
    let request = ArrivalsRequest::try_from(query)?;

    if let Some(limit) = &request.limit {
        debug!(limit = %limit, "limit parameter accepted but not applied");
    }

    let stop = nearest_stop(&request.origin, &request.stops)
        .cloned()
        .ok_or(MalformedInput::NoTrips)?;

    debug!(
        stop_id = %stop.id,
        stop_name = %stop.name,
        origin = %request.origin,
        "selected nearest stop"
    );

    let arrivals = match state.oba.arrivals_for_stop(&stop.id, &request.api_key).await {
        Ok(arrivals) => Some(arrivals),
        Err(e) => {
            warn!(stop_id = %stop.id, error = %e, "failed to fetch arrivals");
            None
        }
    };

    Ok(StopArrivals {
        stop,
        arrivals,
        now_millis: Utc::now().timestamp_millis(),
    })
}

/// Flat board: messages ordered by minutes until arrival.
async fn flat_arrivals(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ArrivalsQuery>,
) -> Response {
    let html = accepts_html(&headers);

    let found = match lookup(&state, query).await {
        Ok(found) => found,
        Err(e) => return e.respond(html),
    };

    let messages = found
        .arrivals
        .map(|arrivals| arrival_messages(&found.stop, &arrivals, found.now_millis))
        .unwrap_or_default();

    if !html {
        return Json(messages).into_response();
    }

    let rendered = serde_json::to_string_pretty(&messages)
        .map_err(|e| AppError::Internal {
            message: format!("JSON error: {e}"),
        })
        .and_then(|output| {
            ArrivalListTemplate {
                stop_name: found.stop.name,
                output,
            }
            .render()
            .map_err(AppError::from)
        });

    match rendered {
        Ok(page) => Html(page).into_response(),
        Err(e) => e.respond(html),
    }
}

/// Grouped board: minutes per route, routes in first-seen order.
async fn grouped_arrivals(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ArrivalsQuery>,
) -> Response {
    let html = accepts_html(&headers);

    let found = match lookup(&state, query).await {
        Ok(found) => found,
        Err(e) => return e.respond(html),
    };

    let groups = found
        .arrivals
        .map(|arrivals| group_by_route(&found.stop, &arrivals, found.now_millis));

    if !html {
        return Json(groups.unwrap_or_default()).into_response();
    }

    let template = RouteGroupsTemplate {
        stop_name: found.stop.name,
        groups,
    };

    match template.render() {
        Ok(page) => Html(page).into_response(),
        Err(e) => AppError::from(e).respond(html),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            AppError::BadRequest { message } | AppError::Internal { message } => message,
        }
    }

    /// Render as the HTML error page or the JSON error body.
    fn respond(self, html: bool) -> Response {
        if !html {
            return self.into_response();
        }

        let status = self.status();
        log_error(status, self.message());

        let template = ErrorTemplate {
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.message().to_string(),
        };

        match template.render() {
            Ok(page) => (status, Html(page)).into_response(),
            Err(e) => {
                error!(error = %e, "failed to render error page");
                (status, self.message().to_string()).into_response()
            }
        }
    }
}

fn log_error(status: StatusCode, message: &str) {
    if status.is_server_error() {
        error!(%status, message, "request failed");
    } else {
        debug!(%status, message, "rejected request");
    }
}

impl From<MalformedInput> for AppError {
    fn from(e: MalformedInput) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Internal {
            message: format!("Template error: {e}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        log_error(status, self.message());

        let body = Json(ErrorResponse {
            error: self.message().to_string(),
        });
        (status, body).into_response()
    }
}
