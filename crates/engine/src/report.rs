//! Daily settlement report.
//!
//! [`DailyReport::fold`] is a pure function over already-committed rows; the
//! engine only loads the rows and calls it. Nothing here is cached, so every
//! request reflects late or corrected entries.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    BalanceReceipt, BankDeposit, Credit, CustomerPayment, Expense, MeterReading, Money, OilSale,
    Purchase, ResultEngine, Sale, Volume,
};

/// Every committed row the settlement of one branch/day depends on.
#[derive(Clone, Debug, Default)]
pub struct DailyInputs {
    pub sales: Vec<Sale>,
    pub meter_readings: Vec<MeterReading>,
    pub oil_sales: Vec<OilSale>,
    pub purchases: Vec<Purchase>,
    pub expenses: Vec<Expense>,
    pub credits: Vec<Credit>,
    pub customer_payments: Vec<CustomerPayment>,
    pub bank_deposits: Vec<BankDeposit>,
    /// Receipts recorded for the previous day.
    pub previous_balance_receipts: Vec<BalanceReceipt>,
}

/// Dispensed volume and its value for one fuel type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelSummary {
    pub volume: Volume,
    pub revenue: Money,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyReport {
    pub branch_id: Uuid,
    pub date: NaiveDate,

    pub total_purchase: Money,
    pub total_sale: Money,
    pub total_expense: Money,
    pub total_credit: Money,
    pub total_customer_payment: Money,
    pub total_balance_receipt: Money,
    pub total_bank_deposit: Money,
    pub sales_and_balance_receipt: Money,
    /// Net cash position of the day. Negative means a shortfall.
    pub cash_balance: Money,

    pub atm: Money,
    pub paytm: Money,
    pub fleet: Money,
    pub cash: Money,

    pub fuel_revenue: Money,
    pub oil_revenue: Money,
    pub fuel: BTreeMap<String, FuelSummary>,

    pub meter_readings: Vec<MeterReading>,
    pub oil_sales: Vec<OilSale>,
    pub purchases: Vec<Purchase>,
    pub bank_deposits: Vec<BankDeposit>,
    pub expenses: Vec<Expense>,
    pub credits: Vec<Credit>,
    pub customer_payments: Vec<CustomerPayment>,
}

impl DailyReport {
    /// Fold a day's committed rows into the report.
    ///
    /// Totals that do not fit in `i64` minor units are a validation error.
    pub fn fold(branch_id: Uuid, date: NaiveDate, inputs: DailyInputs) -> ResultEngine<Self> {
        let total_purchase = Money::try_sum(inputs.purchases.iter().map(|p| p.purchase_price))?;
        let total_sale = Money::try_sum(inputs.sales.iter().map(|s| s.rate))?;
        let total_expense = Money::try_sum(inputs.expenses.iter().map(|e| e.amount))?;
        let total_credit = Money::try_sum(inputs.credits.iter().map(|c| c.amount))?;
        let total_customer_payment =
            Money::try_sum(inputs.customer_payments.iter().map(|p| p.amount))?;
        let total_balance_receipt =
            Money::try_sum(inputs.previous_balance_receipts.iter().map(|r| r.amount))?;
        let total_bank_deposit = Money::try_sum(inputs.bank_deposits.iter().map(|d| d.amount))?;

        let atm = Money::try_sum(inputs.sales.iter().map(|s| s.atm))?;
        let paytm = Money::try_sum(inputs.sales.iter().map(|s| s.paytm))?;
        let fleet = Money::try_sum(inputs.sales.iter().map(|s| s.fleet))?;

        let mut fuel: BTreeMap<String, FuelSummary> = BTreeMap::new();
        for reading in &inputs.meter_readings {
            let summary = fuel.entry(reading.fuel_type.clone()).or_default();
            summary.volume = summary.volume.try_add(reading.sale_volume)?;
            summary.revenue = summary
                .revenue
                .try_add(reading.total_amount.unwrap_or_default())?;
        }
        let fuel_revenue = Money::try_sum(fuel.values().map(|s| s.revenue))?;
        let oil_revenue = Money::try_sum(inputs.oil_sales.iter().map(|o| o.amount))?;

        let sales_and_balance_receipt =
            Money::try_sum([total_sale, total_balance_receipt, total_customer_payment])?;
        let cash_balance = total_sale
            .try_sub(total_expense)?
            .try_add(total_balance_receipt)?;
        let cash = total_sale.try_sub(Money::try_sum([atm, paytm, fleet])?)?;

        Ok(Self {
            branch_id,
            date,
            total_purchase,
            total_sale,
            total_expense,
            total_credit,
            total_customer_payment,
            total_balance_receipt,
            total_bank_deposit,
            sales_and_balance_receipt,
            cash_balance,
            atm,
            paytm,
            fleet,
            cash,
            fuel_revenue,
            oil_revenue,
            fuel,
            meter_readings: inputs.meter_readings,
            oil_sales: inputs.oil_sales,
            purchases: inputs.purchases,
            bank_deposits: inputs.bank_deposits,
            expenses: inputs.expenses,
            credits: inputs.credits,
            customer_payments: inputs.customer_payments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn sale(rate: i64, atm: i64, paytm: i64, fleet: i64) -> Sale {
        Sale {
            id: Uuid::new_v4(),
            branch_id: Uuid::nil(),
            date: day(),
            rate: Money::new(rate),
            atm: Money::new(atm),
            paytm: Money::new(paytm),
            fleet: Money::new(fleet),
        }
    }

    fn expense(amount: i64) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            branch_id: Uuid::nil(),
            date: day(),
            category: "misc".to_string(),
            description: None,
            amount: Money::new(amount),
        }
    }

    fn receipt(amount: i64) -> BalanceReceipt {
        BalanceReceipt {
            id: Uuid::new_v4(),
            branch_id: Uuid::nil(),
            date: day().pred_opt().unwrap(),
            amount: Money::new(amount),
        }
    }

    #[test]
    fn cash_balance_is_sales_minus_expenses_plus_carried() {
        let inputs = DailyInputs {
            sales: vec![sale(10_000_00, 0, 0, 0)],
            expenses: vec![expense(3_000_00)],
            previous_balance_receipts: vec![receipt(500_00)],
            ..Default::default()
        };
        let report = DailyReport::fold(Uuid::nil(), day(), inputs).unwrap();
        assert_eq!(report.cash_balance, Money::new(7_500_00));
    }

    #[test]
    fn only_carried_balance_on_an_empty_day() {
        let inputs = DailyInputs {
            previous_balance_receipts: vec![receipt(1_234_00)],
            ..Default::default()
        };
        let report = DailyReport::fold(Uuid::nil(), day(), inputs).unwrap();
        assert_eq!(report.cash_balance, report.total_balance_receipt);
        assert_eq!(report.cash_balance, Money::new(1_234_00));
    }

    #[test]
    fn shortfall_is_negative_not_an_error() {
        let inputs = DailyInputs {
            expenses: vec![expense(700_00), expense(300_00)],
            previous_balance_receipts: vec![receipt(200_00)],
            ..Default::default()
        };
        let report = DailyReport::fold(Uuid::nil(), day(), inputs).unwrap();
        assert_eq!(report.total_expense, Money::new(1_000_00));
        assert_eq!(report.cash_balance, Money::new(-800_00));
    }

    #[test]
    fn cash_is_residual_of_payment_methods() {
        let inputs = DailyInputs {
            sales: vec![sale(5_000_00, 1_000_00, 500_00, 250_00)],
            ..Default::default()
        };
        let report = DailyReport::fold(Uuid::nil(), day(), inputs).unwrap();
        assert_eq!(report.atm, Money::new(1_000_00));
        assert_eq!(report.paytm, Money::new(500_00));
        assert_eq!(report.fleet, Money::new(250_00));
        assert_eq!(report.cash, Money::new(3_250_00));
    }

    #[test]
    fn customer_payments_count_towards_sales_and_receipts_only() {
        let payment = CustomerPayment {
            id: Uuid::new_v4(),
            branch_id: Uuid::nil(),
            date: day(),
            customer_name: "Ravi Transport".to_string(),
            method: None,
            amount: Money::new(400_00),
        };
        let inputs = DailyInputs {
            sales: vec![sale(1_000_00, 0, 0, 0)],
            customer_payments: vec![payment],
            previous_balance_receipts: vec![receipt(100_00)],
            ..Default::default()
        };
        let report = DailyReport::fold(Uuid::nil(), day(), inputs).unwrap();
        assert_eq!(report.sales_and_balance_receipt, Money::new(1_500_00));
        assert_eq!(report.cash_balance, Money::new(1_100_00));
    }

    #[test]
    fn overflowing_totals_are_rejected() {
        let inputs = DailyInputs {
            sales: vec![sale(i64::MAX, 0, 0, 0)],
            previous_balance_receipts: vec![receipt(1)],
            ..Default::default()
        };
        assert!(matches!(
            DailyReport::fold(Uuid::nil(), day(), inputs),
            Err(crate::EngineError::Validation(_))
        ));
    }
}
