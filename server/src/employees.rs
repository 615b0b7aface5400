//! HTTP-facing employee handlers: thin marshaling between requests, the
//! store contract, and JSON or spreadsheet responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use entity::{CreateEmployeeRequest, Employee, UpdateEmployeeRequest};
use platform_api::{ApiError, ApiResult};
use platform_db::StoreError;
use validator::Validate;

use crate::export;
use crate::http::AppState;

const NOT_FOUND_MESSAGE: &str = "no employee with that id";
const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

fn store_error(err: StoreError) -> ApiError {
    ApiError::internal(err)
}

/// Unwrap a JSON body, turning malformed payloads into a 400 instead of the
/// extractor's default rejection.
fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|err| ApiError::bad_request(err.body_text()))
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Employee>>> {
    let employees = state.store.list().await.map_err(store_error)?;
    Ok(Json(employees))
}

pub async fn export(State(state): State<AppState>) -> ApiResult<Response> {
    let employees = state.store.list().await.map_err(store_error)?;
    let workbook = export::render_workbook(&employees).map_err(ApiError::internal)?;
    let filename = export::timestamped_filename(Utc::now());
    Response::builder()
        .header(header::CONTENT_TYPE, XLSX_CONTENT_TYPE)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .body(workbook.into())
        .map_err(ApiError::internal)
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateEmployeeRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let request = parse_body(payload)?;
    request.validate()?;
    let employee = state.store.create(&request).await.map_err(store_error)?;
    let location = format!("/api/employees/{}", employee.employee_id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(employee),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<UpdateEmployeeRequest>, JsonRejection>,
) -> ApiResult<Json<Employee>> {
    let request = parse_body(payload)?;
    request.validate()?;
    match state.store.update(id, &request).await.map_err(store_error)? {
        Some(employee) => Ok(Json(employee)),
        None => Err(ApiError::not_found(NOT_FOUND_MESSAGE)),
    }
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<StatusCode> {
    if state.store.delete(id).await.map_err(store_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(NOT_FOUND_MESSAGE))
    }
}
