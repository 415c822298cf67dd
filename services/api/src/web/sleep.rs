//! services/api/src/web/sleep.rs
//!
//! Sleep logging. The client sends a date and two clock times; the whole-hour
//! duration is always derived server-side and recomputed on every edit.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use fitness_core::domain::SleepRecord;
use fitness_core::sleep::{
    format_clock, format_date, parse_clock, parse_date, SleepInterval, TimeParseError,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::web::{port_failure, state::AppState, HandlerError};

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSleepRequest {
    /// `YYYY-MM-DD`, the night the user went to bed.
    pub date: String,
    /// `HH:MM`
    #[serde(alias = "sleepTime")]
    pub bed_time: String,
    /// `HH:MM`; earlier than `bedTime` means the next morning.
    pub wake_time: String,
}

/// Any subset of fields; the duration is recomputed from the merged values.
#[derive(Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSleepRequest {
    pub date: Option<String>,
    #[serde(alias = "sleepTime")]
    pub bed_time: Option<String>,
    pub wake_time: Option<String>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SleepRangeQuery {
    /// Inclusive lower bound, `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD`.
    pub end_date: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SleepResponse {
    pub id: Uuid,
    pub date: String,
    pub bed_time: String,
    pub wake_time: String,
    /// Whole hours slept.
    pub duration: u32,
}

impl From<SleepRecord> for SleepResponse {
    fn from(record: SleepRecord) -> Self {
        let interval = record.interval;
        Self {
            id: record.id,
            date: format_date(interval.date()),
            bed_time: format_clock(interval.bed_time()),
            wake_time: format_clock(interval.wake_time()),
            duration: interval.duration_hours(),
        }
    }
}

fn bad_time(e: TimeParseError) -> HandlerError {
    (StatusCode::BAD_REQUEST, e.to_string())
}

/// Applies the provided fields through the interval's setters.
fn apply_update(
    mut interval: SleepInterval,
    req: &UpdateSleepRequest,
) -> Result<SleepInterval, TimeParseError> {
    if let Some(date) = req.date.as_deref() {
        interval.set_date(parse_date(date)?);
    }
    if let Some(bed_time) = req.bed_time.as_deref() {
        interval.set_bed_time(parse_clock(bed_time)?);
    }
    if let Some(wake_time) = req.wake_time.as_deref() {
        interval.set_wake_time(parse_clock(wake_time)?);
    }
    Ok(interval)
}

#[utoipa::path(
    post,
    path = "/api/sleep",
    request_body = CreateSleepRequest,
    responses(
        (status = 201, description = "Sleep logged", body = SleepResponse),
        (status = 400, description = "Malformed date or time")
    )
)]
pub async fn create_sleep_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<CreateSleepRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let interval =
        SleepInterval::parse(&req.date, &req.bed_time, &req.wake_time).map_err(bad_time)?;

    let record = state
        .db
        .create_sleep_record(user_id, &interval)
        .await
        .map_err(|e| port_failure("log sleep", e))?;
    info!(
        "Logged {}h of sleep for user {} on {}",
        interval.duration_hours(),
        user_id,
        interval.date()
    );

    Ok((StatusCode::CREATED, Json(SleepResponse::from(record))))
}

#[utoipa::path(
    get,
    path = "/api/sleep",
    params(SleepRangeQuery),
    responses(
        (status = 200, description = "Sleep records, newest first", body = [SleepResponse]),
        (status = 400, description = "Malformed date filter")
    )
)]
pub async fn list_sleep_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Query(range): Query<SleepRangeQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let parse_bound = |bound: Option<String>| {
        bound.as_deref().map(parse_date).transpose().map_err(bad_time)
    };
    let start_date = parse_bound(range.start_date)?;
    let end_date = parse_bound(range.end_date)?;

    let records = state
        .db
        .list_sleep_records(user_id, start_date, end_date)
        .await
        .map_err(|e| port_failure("list sleep records", e))?;

    let body: Vec<SleepResponse> = records.into_iter().map(SleepResponse::from).collect();
    Ok(Json(body))
}

#[utoipa::path(
    get,
    path = "/api/sleep/{id}",
    params(("id" = Uuid, Path, description = "Sleep record id")),
    responses(
        (status = 200, description = "The sleep record", body = SleepResponse),
        (status = 404, description = "Sleep record not found")
    )
)]
pub async fn get_sleep_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(record_id): Path<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    let record = state
        .db
        .get_sleep_record(user_id, record_id)
        .await
        .map_err(|e| port_failure("load sleep record", e))?;
    Ok(Json(SleepResponse::from(record)))
}

#[utoipa::path(
    put,
    path = "/api/sleep/{id}",
    params(("id" = Uuid, Path, description = "Sleep record id")),
    request_body = UpdateSleepRequest,
    responses(
        (status = 200, description = "Sleep record updated", body = SleepResponse),
        (status = 400, description = "Malformed date or time"),
        (status = 404, description = "Sleep record not found")
    )
)]
pub async fn update_sleep_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(record_id): Path<Uuid>,
    Json(req): Json<UpdateSleepRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let existing = state
        .db
        .get_sleep_record(user_id, record_id)
        .await
        .map_err(|e| port_failure("load sleep record", e))?;

    let interval = apply_update(existing.interval, &req).map_err(bad_time)?;

    let record = state
        .db
        .update_sleep_record(user_id, record_id, &interval)
        .await
        .map_err(|e| port_failure("update sleep record", e))?;

    Ok(Json(SleepResponse::from(record)))
}

#[utoipa::path(
    delete,
    path = "/api/sleep/{id}",
    params(("id" = Uuid, Path, description = "Sleep record id")),
    responses(
        (status = 204, description = "Sleep record deleted"),
        (status = 404, description = "Sleep record not found")
    )
)]
pub async fn delete_sleep_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(record_id): Path<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    state
        .db
        .delete_sleep_record(user_id, record_id)
        .await
        .map_err(|e| port_failure("delete sleep record", e))?;
    Ok(StatusCode::NO_CONTENT)
}
