//! Daily settlement endpoints.

use api_types::report::{BalanceReceiptView, DailyReportView, ReportGet, SettlementView};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use engine::EngineError;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, views};

/// The reconciled report, recomputed from committed rows on every request.
pub async fn daily(
    State(state): State<ServerState>,
    Path(branch_id): Path<Uuid>,
    Query(query): Query<ReportGet>,
) -> Result<Json<DailyReportView>, ServerError> {
    let report = state.engine.daily_report(branch_id, query.date).await?;
    Ok(Json(views::report(report)))
}

/// Fold the day and carry its cash balance into the next day.
pub async fn settle(
    State(state): State<ServerState>,
    Path(branch_id): Path<Uuid>,
    Json(payload): Json<ReportGet>,
) -> Result<Json<SettlementView>, ServerError> {
    let settlement = state.engine.settle_day(branch_id, payload.date).await?;
    Ok(Json(SettlementView {
        report: views::report(settlement.report),
        carried: views::balance_receipt(settlement.carried),
    }))
}

pub async fn balance_receipt(
    State(state): State<ServerState>,
    Path(branch_id): Path<Uuid>,
    Query(query): Query<ReportGet>,
) -> Result<Json<BalanceReceiptView>, ServerError> {
    let receipt = state
        .engine
        .balance_receipt(branch_id, query.date)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("balance receipt not exists".to_string()))?;
    Ok(Json(views::balance_receipt(receipt)))
}
