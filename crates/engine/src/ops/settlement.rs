//! Daily settlement and balance carry forward.

use chrono::NaiveDate;
use sea_orm::{DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    BalanceReceipt, BankDeposit, Credit, CustomerPayment, DailyInputs, DailyReport, EngineError,
    Expense, Money, OilSale, Purchase, ResultEngine, Sale, balance_receipts, bank_deposits, credits,
    customer_payments, expenses, oil_sales, purchases, sales,
};

use super::{Engine, with_tx};

/// A day's report together with the receipt it carried into the next day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub report: DailyReport,
    pub carried: BalanceReceipt,
}

/// Rows of one entity for a branch and date.
async fn load_day<E, T>(
    db_tx: &DatabaseTransaction,
    branch_col: E::Column,
    date_col: E::Column,
    branch_id: Uuid,
    date: NaiveDate,
) -> ResultEngine<Vec<T>>
where
    E: EntityTrait,
    T: TryFrom<E::Model, Error = EngineError>,
{
    E::find()
        .filter(branch_col.eq(branch_id.to_string()))
        .filter(date_col.eq(date))
        .all(db_tx)
        .await?
        .into_iter()
        .map(T::try_from)
        .collect()
}

fn next_day(date: NaiveDate) -> ResultEngine<NaiveDate> {
    date.succ_opt()
        .ok_or_else(|| EngineError::Validation(format!("{date} has no following day")))
}

impl Engine {
    async fn fold_daily_report(
        &self,
        db_tx: &DatabaseTransaction,
        branch_id: Uuid,
        date: NaiveDate,
    ) -> ResultEngine<DailyReport> {
        self.require_branch(db_tx, branch_id).await?;

        let previous_balance_receipts = match date.pred_opt() {
            Some(previous) => {
                load_day::<balance_receipts::Entity, BalanceReceipt>(
                    db_tx,
                    balance_receipts::Column::BranchId,
                    balance_receipts::Column::Date,
                    branch_id,
                    previous,
                )
                .await?
            }
            None => Vec::new(),
        };

        let inputs = DailyInputs {
            sales: load_day::<sales::Entity, Sale>(
                db_tx,
                sales::Column::BranchId,
                sales::Column::Date,
                branch_id,
                date,
            )
            .await?,
            meter_readings: self.load_meter_readings(db_tx, branch_id, date).await?,
            oil_sales: load_day::<oil_sales::Entity, OilSale>(
                db_tx,
                oil_sales::Column::BranchId,
                oil_sales::Column::Date,
                branch_id,
                date,
            )
            .await?,
            purchases: load_day::<purchases::Entity, Purchase>(
                db_tx,
                purchases::Column::BranchId,
                purchases::Column::Date,
                branch_id,
                date,
            )
            .await?,
            expenses: load_day::<expenses::Entity, Expense>(
                db_tx,
                expenses::Column::BranchId,
                expenses::Column::Date,
                branch_id,
                date,
            )
            .await?,
            credits: load_day::<credits::Entity, Credit>(
                db_tx,
                credits::Column::BranchId,
                credits::Column::Date,
                branch_id,
                date,
            )
            .await?,
            customer_payments: load_day::<customer_payments::Entity, CustomerPayment>(
                db_tx,
                customer_payments::Column::BranchId,
                customer_payments::Column::Date,
                branch_id,
                date,
            )
            .await?,
            bank_deposits: load_day::<bank_deposits::Entity, BankDeposit>(
                db_tx,
                bank_deposits::Column::BranchId,
                bank_deposits::Column::Date,
                branch_id,
                date,
            )
            .await?,
            previous_balance_receipts,
        };

        let report = DailyReport::fold(branch_id, date, inputs)?;
        tracing::debug!(
            branch_id = %branch_id,
            date = %date,
            total_sale = %report.total_sale,
            cash_balance = %report.cash_balance,
            "daily report folded"
        );
        Ok(report)
    }

    /// Write `amount` as the opening receipt of `date`, replacing any
    /// previous value.
    async fn upsert_balance_receipt(
        &self,
        db_tx: &DatabaseTransaction,
        branch_id: Uuid,
        date: NaiveDate,
        amount: Money,
    ) -> ResultEngine<BalanceReceipt> {
        let existing = balance_receipts::Entity::find()
            .filter(balance_receipts::Column::BranchId.eq(branch_id.to_string()))
            .filter(balance_receipts::Column::Date.eq(date))
            .one(db_tx)
            .await?;

        let receipt = BalanceReceipt {
            id: match existing.as_ref() {
                Some(model) => crate::util::parse_uuid(&model.id, "balance receipt")?,
                None => Uuid::new_v4(),
            },
            branch_id,
            date,
            amount,
        };
        let active = balance_receipts::ActiveModel::from(&receipt);
        if existing.is_some() {
            active.update(db_tx).await?;
        } else {
            active.insert(db_tx).await?;
        }
        Ok(receipt)
    }

    /// Reconciled figures of one branch and day, recomputed from committed
    /// rows on every call.
    pub async fn daily_report(&self, branch_id: Uuid, date: NaiveDate) -> ResultEngine<DailyReport> {
        with_tx!(self, |db_tx| {
            self.fold_daily_report(&db_tx, branch_id, date).await
        })
    }

    /// Carry the cash balance of `date` into the opening receipt of the
    /// following day. Running it again overwrites the receipt with the
    /// current balance.
    pub async fn carry_forward(
        &self,
        branch_id: Uuid,
        date: NaiveDate,
    ) -> ResultEngine<BalanceReceipt> {
        Ok(self.settle_day(branch_id, date).await?.carried)
    }

    /// Fold the day and carry its balance forward in one transaction.
    pub async fn settle_day(&self, branch_id: Uuid, date: NaiveDate) -> ResultEngine<Settlement> {
        let next = next_day(date)?;
        let _guard = self.branch_locks.acquire(branch_id).await;
        let settlement: ResultEngine<Settlement> = with_tx!(self, |db_tx| {
            let report = self.fold_daily_report(&db_tx, branch_id, date).await?;
            let carried = self
                .upsert_balance_receipt(&db_tx, branch_id, next, report.cash_balance)
                .await?;
            Ok(Settlement { report, carried })
        });
        let settlement = settlement?;

        tracing::info!(
            branch_id = %branch_id,
            date = %date,
            carried_to = %settlement.carried.date,
            amount = %settlement.carried.amount,
            "balance carried forward"
        );
        Ok(settlement)
    }

    /// Opening receipt recorded for `date`, if any.
    pub async fn balance_receipt(
        &self,
        branch_id: Uuid,
        date: NaiveDate,
    ) -> ResultEngine<Option<BalanceReceipt>> {
        with_tx!(self, |db_tx| {
            self.require_branch(&db_tx, branch_id).await?;
            balance_receipts::Entity::find()
                .filter(balance_receipts::Column::BranchId.eq(branch_id.to_string()))
                .filter(balance_receipts::Column::Date.eq(date))
                .one(&db_tx)
                .await?
                .map(BalanceReceipt::try_from)
                .transpose()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_representable_day_cannot_carry() {
        assert!(matches!(
            next_day(NaiveDate::MAX),
            Err(EngineError::Validation(_))
        ));
        let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(
            next_day(day).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }
}
