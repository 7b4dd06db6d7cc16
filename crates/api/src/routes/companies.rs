//! Company and company tail endpoint handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use domain::models::{Company, CompanyChanges, CompanyTail, NewCompany, NewCompanyTail};
use uuid::Uuid;

use super::{respond, DataResponse};
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// GET /api/v1/companies
pub async fn list_companies(
    State(state): State<AppState>,
    _auth: UserAuth,
) -> Result<DataResponse<Vec<Company>>, ApiError> {
    Ok(respond(state.data.list_companies().await, StatusCode::OK))
}

/// POST /api/v1/companies
pub async fn create_company(
    State(state): State<AppState>,
    UserAuth(user): UserAuth,
    payload: Result<Json<NewCompany>, JsonRejection>,
) -> Result<DataResponse<Company>, ApiError> {
    let Json(input) = payload?;
    Ok(respond(
        state.data.create_company(&user, input).await,
        StatusCode::CREATED,
    ))
}

/// GET /api/v1/companies/:id
pub async fn get_company(
    State(state): State<AppState>,
    _auth: UserAuth,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<DataResponse<Company>, ApiError> {
    let Path(id) = id?;
    Ok(respond(state.data.get_company(id).await, StatusCode::OK))
}

/// PATCH /api/v1/companies/:id
pub async fn update_company(
    State(state): State<AppState>,
    _auth: UserAuth,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<CompanyChanges>, JsonRejection>,
) -> Result<DataResponse<Company>, ApiError> {
    let Path(id) = id?;
    let Json(changes) = payload?;
    Ok(respond(
        state.data.update_company(id, changes).await,
        StatusCode::OK,
    ))
}

/// Delete a company and its tails. Its flights stay, without a company.
///
/// DELETE /api/v1/companies/:id
pub async fn delete_company(
    State(state): State<AppState>,
    _auth: UserAuth,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<DataResponse<()>, ApiError> {
    let Path(id) = id?;
    Ok(respond(state.data.delete_company(id).await, StatusCode::OK))
}

/// GET /api/v1/companies/:id/tails
pub async fn list_company_tails(
    State(state): State<AppState>,
    _auth: UserAuth,
    company_id: Result<Path<Uuid>, PathRejection>,
) -> Result<DataResponse<Vec<CompanyTail>>, ApiError> {
    let Path(company_id) = company_id?;
    Ok(respond(
        state.data.list_company_tails(company_id).await,
        StatusCode::OK,
    ))
}

/// POST /api/v1/companies/:id/tails
pub async fn create_company_tail(
    State(state): State<AppState>,
    _auth: UserAuth,
    company_id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<NewCompanyTail>, JsonRejection>,
) -> Result<DataResponse<CompanyTail>, ApiError> {
    let Path(company_id) = company_id?;
    let Json(input) = payload?;
    Ok(respond(
        state.data.create_company_tail(company_id, input).await,
        StatusCode::CREATED,
    ))
}

/// DELETE /api/v1/tails/:id
pub async fn delete_company_tail(
    State(state): State<AppState>,
    _auth: UserAuth,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<DataResponse<()>, ApiError> {
    let Path(id) = id?;
    Ok(respond(
        state.data.delete_company_tail(id).await,
        StatusCode::OK,
    ))
}
