//! Daily transaction streams.
//!
//! Each stream is recorded independently of the others; the settlement fold
//! is the only place they meet.

use sea_orm::{QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    BankDeposit, BankDepositCmd, Credit, CreditCmd, CustomerPayment, CustomerPaymentCmd,
    EngineError, Expense, ExpenseCmd, Money, OilSale, OilSaleCmd, Purchase, PurchaseCmd,
    ResultEngine, Sale, SaleCmd, bank_deposits, credits, customer_payments, expenses, oil_sales,
    purchases, sales,
    util::{
        normalize_fuel_type, normalize_optional_text, normalize_required_name,
        require_positive_amount, require_positive_volume,
    },
};

use super::{Engine, with_tx};

macro_rules! impl_daily_entry {
    (
        $(#[$meta:meta])*
        $fn_name:ident, $cmd_type:ty, $entry_type:ty, $entity:ident, $label:literal,
        |$cmd:ident| $build:expr
    ) => {
        $(#[$meta])*
        pub async fn $fn_name(&self, $cmd: $cmd_type) -> ResultEngine<$entry_type> {
            require_positive_amount($cmd.amount, $label)?;
            let entry: $entry_type = $build;
            with_tx!(self, |db_tx| {
                self.require_branch(&db_tx, entry.branch_id).await?;
                $entity::ActiveModel::from(&entry).insert(&db_tx).await?;
                tracing::info!(
                    branch_id = %entry.branch_id,
                    date = %entry.date,
                    amount = %entry.amount,
                    stream = $label,
                    "daily entry recorded"
                );
                Ok(entry)
            })
        }
    };
}

impl Engine {
    impl_daily_entry!(
        /// Record cash paid out of the till.
        record_expense,
        ExpenseCmd,
        Expense,
        expenses,
        "expense",
        |cmd| Expense {
            id: Uuid::new_v4(),
            branch_id: cmd.branch_id,
            date: cmd.date,
            category: normalize_required_name(&cmd.category, "expense category")?,
            description: normalize_optional_text(cmd.description.as_deref()),
            amount: cmd.amount,
        }
    );

    impl_daily_entry!(
        /// Record a sale on credit. Credits are reported but do not move the
        /// cash balance.
        record_credit,
        CreditCmd,
        Credit,
        credits,
        "credit",
        |cmd| Credit {
            id: Uuid::new_v4(),
            branch_id: cmd.branch_id,
            date: cmd.date,
            customer_name: normalize_required_name(&cmd.customer_name, "customer")?,
            note: normalize_optional_text(cmd.note.as_deref()),
            amount: cmd.amount,
        }
    );

    impl_daily_entry!(
        /// Record a customer settling credit.
        record_customer_payment,
        CustomerPaymentCmd,
        CustomerPayment,
        customer_payments,
        "customer payment",
        |cmd| CustomerPayment {
            id: Uuid::new_v4(),
            branch_id: cmd.branch_id,
            date: cmd.date,
            customer_name: normalize_required_name(&cmd.customer_name, "customer")?,
            method: normalize_optional_text(cmd.method.as_deref()),
            amount: cmd.amount,
        }
    );

    impl_daily_entry!(
        record_bank_deposit,
        BankDepositCmd,
        BankDeposit,
        bank_deposits,
        "bank deposit",
        |cmd| BankDeposit {
            id: Uuid::new_v4(),
            branch_id: cmd.branch_id,
            date: cmd.date,
            bank_name: normalize_required_name(&cmd.bank_name, "bank")?,
            reference: normalize_optional_text(cmd.reference.as_deref()),
            amount: cmd.amount,
        }
    );

    /// Record a packaged product sale. The amount is `quantity * unit_price`
    /// rounded to two decimals.
    pub async fn record_oil_sale(&self, cmd: OilSaleCmd) -> ResultEngine<OilSale> {
        let product_name = normalize_required_name(&cmd.product_name, "product")?;
        require_positive_volume(cmd.quantity, "oil sale")?;
        require_positive_amount(cmd.unit_price, "unit price")?;
        let amount = cmd.quantity.value_at(cmd.unit_price)?;

        let oil_sale = OilSale {
            id: Uuid::new_v4(),
            branch_id: cmd.branch_id,
            date: cmd.date,
            product_name,
            quantity: cmd.quantity,
            unit_price: cmd.unit_price,
            amount,
        };
        with_tx!(self, |db_tx| {
            self.require_branch(&db_tx, oil_sale.branch_id).await?;
            oil_sales::ActiveModel::from(&oil_sale)
                .insert(&db_tx)
                .await?;
            Ok(oil_sale)
        })
    }

    /// Record a fuel delivery and add it to the tank.
    pub async fn record_purchase(&self, cmd: PurchaseCmd) -> ResultEngine<Purchase> {
        let fuel_type = normalize_fuel_type(&cmd.fuel_type)?;
        require_positive_volume(cmd.quantity, "purchase")?;
        require_positive_amount(cmd.purchase_price, "purchase")?;

        let purchase = Purchase {
            id: Uuid::new_v4(),
            branch_id: cmd.branch_id,
            date: cmd.date,
            fuel_type,
            quantity: cmd.quantity,
            purchase_price: cmd.purchase_price,
            invoice: normalize_optional_text(cmd.invoice.as_deref()),
        };

        let _guard = self.branch_locks.acquire(purchase.branch_id).await;
        with_tx!(self, |db_tx| {
            self.require_branch(&db_tx, purchase.branch_id).await?;
            let reservation = self
                .reserve_stock(&db_tx, purchase.branch_id, &purchase.fuel_type, -purchase.quantity)
                .await?;
            purchases::ActiveModel::from(&purchase)
                .insert(&db_tx)
                .await?;
            let commit = self.commit_reservation(&db_tx, reservation).await?;
            tracing::info!(
                branch_id = %purchase.branch_id,
                fuel_type = %purchase.fuel_type,
                quantity = %purchase.quantity,
                level = %commit.level,
                "fuel purchase received"
            );
            Ok(purchase)
        })
    }

    /// Record how the day's sales were paid.
    ///
    /// The day's total is recomputed from meter-reading and oil-sale revenue
    /// on every call, so recording again after late readings refreshes it.
    pub async fn record_sale(&self, cmd: SaleCmd) -> ResultEngine<Sale> {
        for (split, label) in [(cmd.atm, "atm"), (cmd.paytm, "paytm"), (cmd.fleet, "fleet")] {
            if split.is_negative() {
                return Err(EngineError::Validation(format!(
                    "{label} amount must not be negative"
                )));
            }
        }

        let _guard = self.branch_locks.acquire(cmd.branch_id).await;
        with_tx!(self, |db_tx| {
            self.require_branch(&db_tx, cmd.branch_id).await?;

            let fuel_revenue = Money::try_sum(
                self.load_meter_readings(&db_tx, cmd.branch_id, cmd.date)
                    .await?
                    .iter()
                    .filter_map(|reading| reading.total_amount),
            )?;
            let oil_revenue = Money::try_sum(
                oil_sales::Entity::find()
                    .filter(oil_sales::Column::BranchId.eq(cmd.branch_id.to_string()))
                    .filter(oil_sales::Column::Date.eq(cmd.date))
                    .all(&db_tx)
                    .await?
                    .iter()
                    .map(|oil| Money::new(oil.amount_minor)),
            )?;
            let rate = fuel_revenue.try_add(oil_revenue)?;

            let splits = Money::try_sum([cmd.atm, cmd.paytm, cmd.fleet])?;
            if splits > rate {
                return Err(EngineError::Validation(format!(
                    "payment splits {splits} exceed the day's sales {rate}"
                )));
            }

            let existing = sales::Entity::find()
                .filter(sales::Column::BranchId.eq(cmd.branch_id.to_string()))
                .filter(sales::Column::Date.eq(cmd.date))
                .one(&db_tx)
                .await?;

            let sale = Sale {
                id: match existing.as_ref() {
                    Some(model) => crate::util::parse_uuid(&model.id, "sale")?,
                    None => Uuid::new_v4(),
                },
                branch_id: cmd.branch_id,
                date: cmd.date,
                rate,
                atm: cmd.atm,
                paytm: cmd.paytm,
                fleet: cmd.fleet,
            };
            let active = sales::ActiveModel::from(&sale);
            if existing.is_some() {
                active.update(&db_tx).await?;
            } else {
                active.insert(&db_tx).await?;
            }

            tracing::info!(
                branch_id = %sale.branch_id,
                date = %sale.date,
                rate = %sale.rate,
                cash = %sale.cash(),
                "daily sale recorded"
            );
            Ok(sale)
        })
    }
}
