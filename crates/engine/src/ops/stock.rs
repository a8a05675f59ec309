//! Tank stock ledger.

use std::collections::BTreeMap;

use sea_orm::{DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*, sea_query::Expr};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, StockPolicy, StockReservation, StockWarning, Volume, tanks,
    util::normalize_fuel_type,
};

use super::{Engine, with_tx};

/// Level and label of one tank, as shown on the dashboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TankLevel {
    pub current_level: Volume,
    pub tank_name: String,
}

/// Result of a committed stock change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockCommit {
    pub fuel_type: String,
    pub level: Volume,
    pub warning: Option<StockWarning>,
}

impl Engine {
    pub(super) async fn require_tank(
        &self,
        db_tx: &DatabaseTransaction,
        branch_id: Uuid,
        fuel_type: &str,
    ) -> ResultEngine<tanks::Model> {
        tanks::Entity::find()
            .filter(tanks::Column::BranchId.eq(branch_id.to_string()))
            .filter(tanks::Column::FuelType.eq(fuel_type))
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("no tank for fuel type '{fuel_type}'")))
    }

    /// Reserve `delta` from the tank of `fuel_type`.
    ///
    /// Under [`StockPolicy::Block`] a reservation that would leave the tank
    /// negative is refused; under [`StockPolicy::Warn`] it carries a warning.
    pub(super) async fn reserve_stock(
        &self,
        db_tx: &DatabaseTransaction,
        branch_id: Uuid,
        fuel_type: &str,
        delta: Volume,
    ) -> ResultEngine<StockReservation> {
        let tank = self.require_tank(db_tx, branch_id, fuel_type).await?;
        let current_level = Volume::from_milli(tank.current_level_milli);
        current_level.try_sub(delta)?;
        let reservation = StockReservation {
            tank_id: tank.id,
            branch_id,
            fuel_type: fuel_type.to_string(),
            current_level,
            delta,
        };

        if let Some(warning) = reservation.warning() {
            match self.stock_policy {
                StockPolicy::Block => {
                    reservation.release();
                    return Err(EngineError::InsufficientStock(warning.to_string()));
                }
                StockPolicy::Warn => {
                    tracing::warn!(branch_id = %branch_id, "stock shortfall: {warning}");
                }
            }
        }
        Ok(reservation)
    }

    /// Persist a reservation and return the new level.
    ///
    /// The decrement is applied as a relative SQL update so it composes with
    /// any other committed change to the same tank.
    pub(super) async fn commit_reservation(
        &self,
        db_tx: &DatabaseTransaction,
        reservation: StockReservation,
    ) -> ResultEngine<StockCommit> {
        let warning = reservation.warning();
        tanks::Entity::update_many()
            .col_expr(
                tanks::Column::CurrentLevelMilli,
                Expr::col(tanks::Column::CurrentLevelMilli).sub(reservation.delta.milli()),
            )
            .filter(tanks::Column::Id.eq(reservation.tank_id.as_str()))
            .exec(db_tx)
            .await?;

        let level = tanks::Entity::find_by_id(reservation.tank_id.clone())
            .one(db_tx)
            .await?
            .map(|tank| Volume::from_milli(tank.current_level_milli))
            .ok_or_else(|| EngineError::KeyNotFound("tank not exists".to_string()))?;

        tracing::debug!(
            branch_id = %reservation.branch_id,
            fuel_type = %reservation.fuel_type,
            delta = %reservation.delta,
            level = %level,
            "stock committed"
        );

        Ok(StockCommit {
            fuel_type: reservation.fuel_type,
            level,
            warning,
        })
    }

    /// Current on-hand quantity of `fuel_type` at a branch.
    pub async fn tank_level(&self, branch_id: Uuid, fuel_type: &str) -> ResultEngine<Volume> {
        let fuel_type = normalize_fuel_type(fuel_type)?;
        with_tx!(self, |db_tx| {
            let tank = self.require_tank(&db_tx, branch_id, &fuel_type).await?;
            Ok(Volume::from_milli(tank.current_level_milli))
        })
    }

    /// Level the tank would have after dispensing `delta`. Never writes.
    pub async fn projected_remaining(
        &self,
        branch_id: Uuid,
        fuel_type: &str,
        delta: Volume,
    ) -> ResultEngine<Volume> {
        let level = self.tank_level(branch_id, fuel_type).await?;
        level.try_sub(delta)
    }

    /// Dispense `delta` from a tank outside of a reading batch.
    ///
    /// Going negative is reported through [`StockCommit::warning`] and only
    /// fails under [`StockPolicy::Block`].
    pub async fn commit_stock(
        &self,
        branch_id: Uuid,
        fuel_type: &str,
        delta: Volume,
    ) -> ResultEngine<StockCommit> {
        let fuel_type = normalize_fuel_type(fuel_type)?;
        let _guard = self.branch_locks.acquire(branch_id).await;
        with_tx!(self, |db_tx| {
            let reservation = self
                .reserve_stock(&db_tx, branch_id, &fuel_type, delta)
                .await?;
            self.commit_reservation(&db_tx, reservation).await
        })
    }

    /// Levels of every tank of the branch keyed by fuel type.
    pub async fn tank_levels(&self, branch_id: Uuid) -> ResultEngine<BTreeMap<String, TankLevel>> {
        with_tx!(self, |db_tx| {
            self.require_branch(&db_tx, branch_id).await?;
            let tanks = tanks::Entity::find()
                .filter(tanks::Column::BranchId.eq(branch_id.to_string()))
                .all(&db_tx)
                .await?;
            Ok(tanks
                .into_iter()
                .map(|tank| {
                    (
                        tank.fuel_type,
                        TankLevel {
                            current_level: Volume::from_milli(tank.current_level_milli),
                            tank_name: tank.tank_name,
                        },
                    )
                })
                .collect())
        })
    }
}
