//! Branch roster endpoints.

use api_types::{
    Created,
    roster::{BranchNew, BranchView, FuelProductUpsert, FuelProductView, MachineNew, NozzleNew, NozzleView},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Money, Volume};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, views};

pub async fn branch_new(
    State(state): State<ServerState>,
    Json(payload): Json<BranchNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let id = state.engine.new_branch(&payload.name).await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn branches(
    State(state): State<ServerState>,
) -> Result<Json<Vec<BranchView>>, ServerError> {
    let branches = state.engine.branches().await?;
    Ok(Json(branches.into_iter().map(views::branch).collect()))
}

pub async fn fuel_product_upsert(
    State(state): State<ServerState>,
    Path(branch_id): Path<Uuid>,
    Json(payload): Json<FuelProductUpsert>,
) -> Result<Json<FuelProductView>, ServerError> {
    let product = state
        .engine
        .upsert_fuel_product(
            branch_id,
            &payload.fuel_type,
            Money::new(payload.selling_price_minor),
        )
        .await?;
    Ok(Json(views::fuel_product(product)))
}

pub async fn fuel_products(
    State(state): State<ServerState>,
    Path(branch_id): Path<Uuid>,
) -> Result<Json<Vec<FuelProductView>>, ServerError> {
    let products = state.engine.fuel_products(branch_id).await?;
    Ok(Json(products.into_iter().map(views::fuel_product).collect()))
}

pub async fn machine_new(
    State(state): State<ServerState>,
    Path(branch_id): Path<Uuid>,
    Json(payload): Json<MachineNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let id = state.engine.new_machine(branch_id, &payload.name).await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn nozzle_new(
    State(state): State<ServerState>,
    Path(machine_id): Path<Uuid>,
    Json(payload): Json<NozzleNew>,
) -> Result<(StatusCode, Json<NozzleView>), ServerError> {
    let initial = match payload.initial_reading.as_deref() {
        Some(value) => views::parse_volume(value)?,
        None => Volume::ZERO,
    };
    let nozzle = state
        .engine
        .new_nozzle(machine_id, &payload.fuel_type, initial)
        .await?;
    Ok((StatusCode::CREATED, Json(views::nozzle(nozzle))))
}

pub async fn nozzle(
    State(state): State<ServerState>,
    Path(nozzle_id): Path<Uuid>,
) -> Result<Json<NozzleView>, ServerError> {
    let nozzle = state.engine.nozzle(nozzle_id).await?;
    Ok(Json(views::nozzle(nozzle)))
}
