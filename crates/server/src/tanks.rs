//! Tank stock endpoints.

use api_types::tank::{TankLevelView, TankLevels, TankNew};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, views};

pub async fn tank_new(
    State(state): State<ServerState>,
    Path(branch_id): Path<Uuid>,
    Json(payload): Json<TankNew>,
) -> Result<(StatusCode, Json<TankLevelView>), ServerError> {
    let opening_level = views::parse_volume(&payload.opening_level)?;
    let tank = state
        .engine
        .new_tank(branch_id, &payload.fuel_type, &payload.tank_name, opening_level)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(TankLevelView {
            current_level: tank.current_level.to_string(),
            tank_name: tank.tank_name,
        }),
    ))
}

/// Current level of every tank of the branch, keyed by fuel type.
pub async fn levels(
    State(state): State<ServerState>,
    Path(branch_id): Path<Uuid>,
) -> Result<Json<TankLevels>, ServerError> {
    let levels = state.engine.tank_levels(branch_id).await?;
    Ok(Json(views::tank_levels(levels)))
}
