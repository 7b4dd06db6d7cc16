//! Flight task endpoint handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use domain::models::{FlightTask, FlightTaskChanges, NewFlightTask};
use uuid::Uuid;

use super::{respond, DataResponse};
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// GET /api/v1/flights/:id/tasks
pub async fn list_flight_tasks(
    State(state): State<AppState>,
    _auth: UserAuth,
    flight_id: Result<Path<Uuid>, PathRejection>,
) -> Result<DataResponse<Vec<FlightTask>>, ApiError> {
    let Path(flight_id) = flight_id?;
    Ok(respond(
        state.data.list_flight_tasks(flight_id).await,
        StatusCode::OK,
    ))
}

/// POST /api/v1/flights/:id/tasks
pub async fn create_flight_task(
    State(state): State<AppState>,
    UserAuth(user): UserAuth,
    flight_id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<NewFlightTask>, JsonRejection>,
) -> Result<DataResponse<FlightTask>, ApiError> {
    let Path(flight_id) = flight_id?;
    let Json(input) = payload?;
    let result = state.data.create_flight_task(&user, flight_id, input).await;
    Ok(respond(result, StatusCode::CREATED))
}

/// PATCH /api/v1/tasks/:id
pub async fn update_flight_task(
    State(state): State<AppState>,
    _auth: UserAuth,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<FlightTaskChanges>, JsonRejection>,
) -> Result<DataResponse<FlightTask>, ApiError> {
    let Path(id) = id?;
    let Json(changes) = payload?;
    Ok(respond(
        state.data.update_flight_task(id, changes).await,
        StatusCode::OK,
    ))
}

/// POST /api/v1/tasks/:id/toggle
pub async fn toggle_flight_task(
    State(state): State<AppState>,
    _auth: UserAuth,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<DataResponse<FlightTask>, ApiError> {
    let Path(id) = id?;
    Ok(respond(
        state.data.toggle_flight_task(id).await,
        StatusCode::OK,
    ))
}

/// DELETE /api/v1/tasks/:id
pub async fn delete_flight_task(
    State(state): State<AppState>,
    _auth: UserAuth,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<DataResponse<()>, ApiError> {
    let Path(id) = id?;
    Ok(respond(
        state.data.delete_flight_task(id).await,
        StatusCode::OK,
    ))
}
