//! Flight endpoint handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use domain::models::{Flight, FlightChanges, FlightQuery, FlightSort, FlightStatus, NewFlight};
use domain::services::FlightFilter;
use serde::Deserialize;
use uuid::Uuid;

use super::{respond, DataResponse};
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// Query string for `GET /api/v1/flights`.
///
/// `company_id`, `tail_number` and `status` filter in the store; `search`,
/// `from` and `to` narrow the listed rows afterwards.
#[derive(Debug, Default, Deserialize)]
pub struct FlightListParams {
    pub company_id: Option<Uuid>,
    pub tail_number: Option<String>,
    pub status: Option<FlightStatus>,
    pub sort: Option<FlightSort>,
    pub search: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl FlightListParams {
    fn split(self) -> (FlightQuery, FlightFilter) {
        let query = FlightQuery {
            company_id: self.company_id,
            tail_number: self.tail_number.filter(|t| !t.trim().is_empty()),
            status: self.status,
            sort: self.sort.unwrap_or_default(),
        };
        let filter = FlightFilter {
            search: self.search,
            from: self.from,
            to: self.to,
        };
        (query, filter)
    }
}

/// List or search flights.
///
/// GET /api/v1/flights
pub async fn list_flights(
    State(state): State<AppState>,
    _auth: UserAuth,
    params: Result<Query<FlightListParams>, QueryRejection>,
) -> Result<DataResponse<Vec<Flight>>, ApiError> {
    let Query(params) = params?;
    let (query, filter) = params.split();

    let result = if filter.is_empty() {
        state.data.list_flights(&query).await
    } else {
        state.data.search_flights(&query, &filter).await
    };
    Ok(respond(result, StatusCode::OK))
}

/// Create a flight.
///
/// POST /api/v1/flights
///
/// A client-supplied `id` makes the call safe to repeat.
pub async fn create_flight(
    State(state): State<AppState>,
    UserAuth(user): UserAuth,
    payload: Result<Json<NewFlight>, JsonRejection>,
) -> Result<DataResponse<Flight>, ApiError> {
    let Json(input) = payload?;
    let result = state.data.create_flight(&user, input).await;
    Ok(respond(result, StatusCode::CREATED))
}

/// GET /api/v1/flights/:id
pub async fn get_flight(
    State(state): State<AppState>,
    _auth: UserAuth,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<DataResponse<Flight>, ApiError> {
    let Path(id) = id?;
    Ok(respond(state.data.get_flight(id).await, StatusCode::OK))
}

/// Partially update a flight; absent fields keep their values.
///
/// PATCH /api/v1/flights/:id
pub async fn update_flight(
    State(state): State<AppState>,
    UserAuth(user): UserAuth,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<FlightChanges>, JsonRejection>,
) -> Result<DataResponse<Flight>, ApiError> {
    let Path(id) = id?;
    let Json(changes) = payload?;
    let result = state.data.update_flight(&user, id, changes).await;
    Ok(respond(result, StatusCode::OK))
}

/// POST /api/v1/flights/:id/cancel
pub async fn cancel_flight(
    State(state): State<AppState>,
    UserAuth(user): UserAuth,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<DataResponse<Flight>, ApiError> {
    let Path(id) = id?;
    Ok(respond(
        state.data.cancel_flight(&user, id).await,
        StatusCode::OK,
    ))
}

/// Delete a flight with its tasks, audit trail and lock.
///
/// DELETE /api/v1/flights/:id
pub async fn delete_flight(
    State(state): State<AppState>,
    _auth: UserAuth,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<DataResponse<()>, ApiError> {
    let Path(id) = id?;
    Ok(respond(state.data.delete_flight(id).await, StatusCode::OK))
}
