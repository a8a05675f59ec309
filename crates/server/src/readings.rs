//! Meter reading endpoints.

use api_types::{
    reading::{BulkReadingsNew, BulkReadingsResult, MeterReadingView},
    report::ReportGet,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use engine::{BulkReadingsCmd, ReadingItem};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, views};

pub async fn bulk_submit(
    State(state): State<ServerState>,
    Path(branch_id): Path<Uuid>,
    Json(payload): Json<BulkReadingsNew>,
) -> Result<Json<BulkReadingsResult>, ServerError> {
    if payload.branch_id != branch_id {
        return Err(ServerError::Generic(
            "branch id in path and body differ".to_string(),
        ));
    }

    let mut cmd = BulkReadingsCmd::new(branch_id, payload.date);
    for item in payload.items {
        let mut reading = ReadingItem::new(item.nozzle_id);
        if let Some(closing) = item.closing_reading.as_deref() {
            reading = reading.closing(views::parse_volume(closing)?);
        }
        if let Some(opening) = item.opening_reading.as_deref() {
            reading = reading.opening(views::parse_volume(opening)?);
        }
        if let Some(version) = item.expected_version {
            reading = reading.expected_version(version);
        }
        if let Some(fuel_type) = item.fuel_type {
            reading = reading.fuel_type(fuel_type);
        }
        cmd = cmd.item(reading);
    }

    let outcome = state.engine.submit_readings(cmd).await?;
    Ok(Json(views::bulk_outcome(outcome)))
}

pub async fn list(
    State(state): State<ServerState>,
    Path(branch_id): Path<Uuid>,
    Query(query): Query<ReportGet>,
) -> Result<Json<Vec<MeterReadingView>>, ServerError> {
    let readings = state.engine.meter_readings(branch_id, query.date).await?;
    Ok(Json(readings.into_iter().map(views::meter_reading).collect()))
}
