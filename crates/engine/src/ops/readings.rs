//! Meter reading bulk processor.
//!
//! A submission carries closing readings for many nozzles of one branch and
//! date. For each nozzle the opening comes from stored state, the closing is
//! clamped so the sale volume is never negative, and the value is computed
//! from the branch's selling price. Rows, nozzle counters and tank stock are
//! written in one DB transaction.
//!
//! Listing a nozzle without a closing keeps whatever it already shows for the
//! date: nothing sold on a first submission, the stored closing on a later
//! one. An explicit closing replaces the day's figure, so a correction on the
//! nozzle's latest date may lower its counter, never below the day's opening.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use sea_orm::{
    DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    BulkReadingsCmd, EngineError, MeterReading, Money, Nozzle, ReadingItem, ResultEngine,
    StockWarning, Volume, fuel_products, meter_readings, nozzles, util::normalize_fuel_type,
};

use super::{Engine, with_tx};

/// What a committed batch produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkReadingsOutcome {
    pub branch_id: Uuid,
    pub date: NaiveDate,
    pub readings: Vec<MeterReading>,
    /// Sale volume of this batch per fuel type.
    pub dispensed: BTreeMap<String, Volume>,
    pub warnings: Vec<StockWarning>,
}

/// Derived figures for one nozzle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Derived {
    pub closing: Volume,
    pub sale_volume: Volume,
    pub total_amount: Option<Money>,
}

/// Derive closing, sale volume and value for one nozzle.
///
/// `closing` is the submitted closing, or the stored one when the row
/// already exists. `None` means nothing was sold; a closing below the
/// opening is clamped up to it.
pub(crate) fn derive_reading(
    opening: Volume,
    closing: Option<Volume>,
    fuel_rate: Option<Money>,
) -> ResultEngine<Derived> {
    let closing = closing.unwrap_or(opening).max(opening);
    let sale_volume = closing - opening;
    let total_amount = fuel_rate
        .map(|rate| sale_volume.value_at(rate))
        .transpose()?;
    Ok(Derived {
        closing,
        sale_volume,
        total_amount,
    })
}

/// Reject batches that cannot be applied before touching the database.
fn validate_batch(items: &[ReadingItem]) -> ResultEngine<()> {
    if !items.iter().any(ReadingItem::has_values) {
        return Err(EngineError::Validation(
            "batch has no opening or closing readings".to_string(),
        ));
    }
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.nozzle_id) {
            return Err(EngineError::Validation(format!(
                "nozzle {} appears more than once",
                item.nozzle_id
            )));
        }
    }
    Ok(())
}

impl Engine {
    /// Authoritative opening for `nozzle` on `date`, and the row it replaces.
    ///
    /// A row for the nozzle's latest date is re-opened from its stored
    /// opening, so a retried batch is an update, not a second sale. Older
    /// dates are immutable.
    async fn resolve_opening(
        &self,
        db_tx: &DatabaseTransaction,
        nozzle: &Nozzle,
        date: NaiveDate,
    ) -> ResultEngine<(Volume, Option<meter_readings::Model>)> {
        let existing = meter_readings::Entity::find()
            .filter(meter_readings::Column::NozzleId.eq(nozzle.id.to_string()))
            .filter(meter_readings::Column::Date.eq(date))
            .one(db_tx)
            .await?;

        match existing {
            Some(row) if nozzle.last_reading_date == Some(date) => {
                Ok((Volume::from_milli(row.opening_milli), Some(row)))
            }
            Some(_) => Err(EngineError::Continuity(format!(
                "reading of nozzle {} on {date} is superseded by a later reading",
                nozzle.id
            ))),
            None if nozzle.last_reading_date.is_some_and(|last| last > date) => {
                Err(EngineError::Continuity(format!(
                    "nozzle {} already has readings after {date}",
                    nozzle.id
                )))
            }
            None => Ok((nozzle.last_closing, None)),
        }
    }

    /// Advance the nozzle counter, failing if anyone moved it since we read it.
    async fn advance_nozzle(
        &self,
        db_tx: &DatabaseTransaction,
        nozzle: &Nozzle,
        closing: Volume,
        date: NaiveDate,
    ) -> ResultEngine<()> {
        let result = nozzles::Entity::update_many()
            .col_expr(
                nozzles::Column::LastClosingMilli,
                Expr::value(closing.milli()),
            )
            .col_expr(nozzles::Column::LastReadingDate, Expr::value(date))
            .col_expr(
                nozzles::Column::Version,
                Expr::col(nozzles::Column::Version).add(1),
            )
            .filter(nozzles::Column::Id.eq(nozzle.id.to_string()))
            .filter(nozzles::Column::Version.eq(nozzle.version))
            .exec(db_tx)
            .await?;
        if result.rows_affected != 1 {
            return Err(EngineError::Continuity(format!(
                "nozzle {} was updated concurrently",
                nozzle.id
            )));
        }
        Ok(())
    }

    async fn fuel_rates(
        &self,
        db_tx: &DatabaseTransaction,
        branch_id: Uuid,
    ) -> ResultEngine<BTreeMap<String, Money>> {
        let products = fuel_products::Entity::find()
            .filter(fuel_products::Column::BranchId.eq(branch_id.to_string()))
            .all(db_tx)
            .await?;
        Ok(products
            .into_iter()
            .map(|p| (p.fuel_type, Money::new(p.selling_price_minor)))
            .collect())
    }

    /// Apply a batch of closing readings for one branch and date.
    ///
    /// Everything is committed together or not at all: meter reading rows
    /// (upserted per nozzle and date), nozzle counters, and one stock change
    /// per fuel type. Resubmitting the same batch leaves rows and stock
    /// unchanged.
    pub async fn submit_readings(&self, cmd: BulkReadingsCmd) -> ResultEngine<BulkReadingsOutcome> {
        validate_batch(&cmd.items)?;
        let BulkReadingsCmd {
            branch_id,
            date,
            items,
        } = cmd;

        let _guard = self.branch_locks.acquire(branch_id).await;
        let outcome: ResultEngine<BulkReadingsOutcome> = with_tx!(self, |db_tx| {
            self.require_branch(&db_tx, branch_id).await?;
            let rates = self.fuel_rates(&db_tx, branch_id).await?;

            let mut readings = Vec::with_capacity(items.len());
            let mut dispensed: BTreeMap<String, Volume> = BTreeMap::new();
            let mut stock_deltas: BTreeMap<String, Volume> = BTreeMap::new();

            for item in &items {
                let nozzle = self
                    .require_nozzle_in_branch(&db_tx, branch_id, item.nozzle_id)
                    .await?;
                if let Some(fuel_type) = item.fuel_type.as_deref()
                    && normalize_fuel_type(fuel_type)? != nozzle.fuel_type
                {
                    return Err(EngineError::Validation(format!(
                        "nozzle {} dispenses {}, not {fuel_type}",
                        nozzle.id, nozzle.fuel_type
                    )));
                }
                if let Some(expected) = item.expected_version
                    && expected != nozzle.version
                {
                    return Err(EngineError::Continuity(format!(
                        "nozzle {} is at version {}, batch expected {expected}",
                        nozzle.id, nozzle.version
                    )));
                }

                let (opening, existing) = self.resolve_opening(&db_tx, &nozzle, date).await?;
                if let Some(client_opening) = item.opening_reading
                    && client_opening != opening
                {
                    return Err(EngineError::Continuity(format!(
                        "nozzle {} opens at {opening}, batch says {client_opening}",
                        nozzle.id
                    )));
                }
                if item.closing_reading.is_some_and(|closing| closing < opening) {
                    tracing::warn!(
                        nozzle_id = %nozzle.id,
                        opening = %opening,
                        "closing reading below opening, clamped"
                    );
                }

                let fuel_rate = rates.get(&nozzle.fuel_type).copied();
                let closing = item.closing_reading.or_else(|| {
                    existing
                        .as_ref()
                        .map(|row| Volume::from_milli(row.closing_milli))
                });
                let derived = derive_reading(opening, closing, fuel_rate)?;

                let previous_volume = existing
                    .as_ref()
                    .map(|row| Volume::from_milli(row.sale_volume_milli))
                    .unwrap_or_default();
                let delta = stock_deltas.entry(nozzle.fuel_type.clone()).or_default();
                *delta = delta.try_add(derived.sale_volume.try_sub(previous_volume)?)?;
                let total = dispensed.entry(nozzle.fuel_type.clone()).or_default();
                *total = total.try_add(derived.sale_volume)?;

                let reading = MeterReading {
                    id: match existing.as_ref() {
                        Some(row) => crate::util::parse_uuid(&row.id, "meter reading")?,
                        None => Uuid::new_v4(),
                    },
                    branch_id,
                    nozzle_id: nozzle.id,
                    date,
                    fuel_type: nozzle.fuel_type.clone(),
                    opening_reading: opening,
                    closing_reading: derived.closing,
                    fuel_rate,
                    sale_volume: derived.sale_volume,
                    total_amount: derived.total_amount,
                };
                let active = meter_readings::ActiveModel::from(&reading);
                if existing.is_some() {
                    active.update(&db_tx).await?;
                } else {
                    active.insert(&db_tx).await?;
                }

                self.advance_nozzle(&db_tx, &nozzle, derived.closing, date)
                    .await?;
                readings.push(reading);
            }

            let mut warnings = Vec::new();
            for (fuel_type, delta) in stock_deltas {
                if delta == Volume::ZERO {
                    continue;
                }
                let reservation = self
                    .reserve_stock(&db_tx, branch_id, &fuel_type, delta)
                    .await?;
                let commit = self.commit_reservation(&db_tx, reservation).await?;
                warnings.extend(commit.warning);
            }

            Ok(BulkReadingsOutcome {
                branch_id,
                date,
                readings,
                dispensed,
                warnings,
            })
        });
        let outcome = outcome?;

        tracing::info!(
            branch_id = %outcome.branch_id,
            date = %outcome.date,
            nozzles = outcome.readings.len(),
            warnings = outcome.warnings.len(),
            "meter readings committed"
        );
        Ok(outcome)
    }

    /// Meter readings of a branch for one date, ordered by nozzle.
    pub async fn meter_readings(
        &self,
        branch_id: Uuid,
        date: NaiveDate,
    ) -> ResultEngine<Vec<MeterReading>> {
        with_tx!(self, |db_tx| {
            self.require_branch(&db_tx, branch_id).await?;
            self.load_meter_readings(&db_tx, branch_id, date).await
        })
    }

    pub(super) async fn load_meter_readings(
        &self,
        db_tx: &DatabaseTransaction,
        branch_id: Uuid,
        date: NaiveDate,
    ) -> ResultEngine<Vec<MeterReading>> {
        meter_readings::Entity::find()
            .filter(meter_readings::Column::BranchId.eq(branch_id.to_string()))
            .filter(meter_readings::Column::Date.eq(date))
            .order_by_asc(meter_readings::Column::NozzleId)
            .all(db_tx)
            .await?
            .into_iter()
            .map(MeterReading::try_from)
            .collect()
    }
}
