//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::domain::{GraphError, InvalidColor, Line, Rgb};
use crate::graph::LineTopology;
use crate::planner::{InvalidStrategy, Planner, Strategy};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stations", get(list_stations).post(create_station))
        .route("/lines", get(list_lines).post(create_line))
        .route("/lines/:name/stations", get(line_stations))
        .route("/connections", post(create_connection))
        .route("/route", get(find_route))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Every station, sorted by name.
async fn list_stations(State(state): State<AppState>) -> Json<StationListResponse> {
    let graph = state.graph.read().await;
    let stations = graph
        .sorted_station_names()
        .into_iter()
        .filter_map(|name| graph.station(name))
        .map(|station| StationResult::from_station(station, &graph))
        .collect();

    Json(StationListResponse { stations })
}

/// Every line, in the order they were added.
async fn list_lines(State(state): State<AppState>) -> Json<LineListResponse> {
    let graph = state.graph.read().await;
    let lines = graph
        .lines()
        .iter()
        .map(|line| LineResult::from_line(line, &graph))
        .collect();

    Json(LineListResponse { lines })
}

/// Stations of one line in display order.
async fn line_stations(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<LineStationsResponse>, AppError> {
    let graph = state.graph.read().await;
    if !graph.has_line(&name) {
        return Err(AppError::NotFound {
            message: format!("Unknown line: {name}"),
        });
    }

    let topology = LineTopology::build(&graph, &name);
    Ok(Json(LineStationsResponse::from_topology(&topology)))
}

/// Find a route between two stations.
///
/// Unknown stations are a 404; connected stations with no route between
/// them are a 200 with `found: false`.
async fn find_route(
    State(state): State<AppState>,
    Query(req): Query<RouteRequest>,
) -> Result<Json<RouteResponse>, AppError> {
    let strategy = match req.strategy.as_deref() {
        Some(s) if !s.is_empty() => s.parse::<Strategy>()?,
        _ => Strategy::default(),
    };

    let graph = state.graph.read().await;
    for station in [&req.from, &req.to] {
        if !graph.has_station(station) {
            return Err(AppError::NotFound {
                message: format!("Unknown station: {station}"),
            });
        }
    }

    let planner = Planner::new(&graph, &state.distance);
    let itinerary = planner.find_path(&req.from, &req.to, strategy);

    Ok(Json(RouteResponse::from_itinerary(&itinerary)))
}

/// Add a line, connecting its stations in sequence.
async fn create_line(
    State(state): State<AppState>,
    Json(req): Json<CreateLineRequest>,
) -> Result<(StatusCode, Json<CreateLineResponse>), AppError> {
    let color = match &req.color {
        Some(components) => Rgb::from_components(components)?,
        None => Rgb::BLACK,
    };

    let mut graph = state.graph.write().await;
    let line = Line::new(req.name.clone(), color);
    let report = graph.add_line_with_stations(line, req.stations.as_slice())?;
    debug!(
        line = %req.name,
        connected = report.connected,
        rejected = report.rejected.len(),
        "created line"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateLineResponse::from_report(&req.name, &report)),
    ))
}

/// Add a station.
async fn create_station(
    State(state): State<AppState>,
    Json(req): Json<CreateStationRequest>,
) -> Result<(StatusCode, Json<StationResult>), AppError> {
    let mut graph = state.graph.write().await;
    graph.add_station(req.to_station())?;

    let station = graph.station(&req.name).ok_or_else(|| AppError::Internal {
        message: format!("Station {} missing after insert", req.name),
    })?;
    Ok((
        StatusCode::CREATED,
        Json(StationResult::from_station(station, &graph)),
    ))
}

/// Connect two existing stations on an existing line.
async fn create_connection(
    State(state): State<AppState>,
    Json(req): Json<CreateConnectionRequest>,
) -> Result<(StatusCode, Json<ConnectionResult>), AppError> {
    let mut graph = state.graph.write().await;
    graph.add_connection(&req.from, &req.to, &req.line, req.waypoints())?;

    Ok((
        StatusCode::CREATED,
        Json(ConnectionResult {
            from: req.from,
            to: req.to,
            line: req.line,
        }),
    ))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Conflict { message: String },
    Internal { message: String },
}

impl From<GraphError> for AppError {
    fn from(e: GraphError) -> Self {
        let message = e.to_string();
        match e {
            GraphError::DuplicateLine(_)
            | GraphError::DuplicateStation(_)
            | GraphError::DuplicateConnection(..) => AppError::Conflict { message },
            GraphError::UnknownStation(_) | GraphError::UnknownLine(_) => {
                AppError::NotFound { message }
            }
            GraphError::EmptyName | GraphError::SelfConnection(_) => {
                AppError::BadRequest { message }
            }
        }
    }
}

impl From<InvalidStrategy> for AppError {
    fn from(e: InvalidStrategy) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<InvalidColor> for AppError {
    fn from(e: InvalidColor) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
