//! Request and response bodies of the HTTP API.
//!
//! Money is carried as integer minor units (`*_minor`), volumes and meter
//! readings as decimal strings (`"150.250"`) so clients never lose precision
//! to floating point.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a newly created resource.
#[derive(Debug, Serialize, Deserialize)]
pub struct Created {
    pub id: Uuid,
}

pub mod roster {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BranchNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BranchView {
        pub id: Uuid,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FuelProductUpsert {
        pub fuel_type: String,
        pub selling_price_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FuelProductView {
        pub id: Uuid,
        pub fuel_type: String,
        pub selling_price_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MachineNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct NozzleNew {
        pub fuel_type: String,
        /// Counter value the first reading batch opens from. Defaults to 0.
        pub initial_reading: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct NozzleView {
        pub id: Uuid,
        pub machine_id: Uuid,
        pub branch_id: Uuid,
        pub fuel_type: String,
        pub last_closing: String,
        pub last_reading_date: Option<NaiveDate>,
        /// Pass back as `expectedVersion` to detect concurrent submissions.
        pub version: i64,
    }
}

pub mod tank {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TankNew {
        pub fuel_type: String,
        pub tank_name: String,
        pub opening_level: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TankLevelView {
        pub current_level: String,
        pub tank_name: String,
    }

    /// Tank levels of a branch keyed by fuel type.
    pub type TankLevels = BTreeMap<String, TankLevelView>;
}

pub mod reading {
    use super::*;

    /// One nozzle of a bulk submission.
    ///
    /// Derived values a client may echo back (`fuelRate`, `sale`,
    /// `totalAmount`) are ignored; they are always recomputed.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ReadingItemNew {
        pub nozzle_id: Uuid,
        pub fuel_type: Option<String>,
        /// Opening the client saw. Checked against the stored counter.
        pub opening_reading: Option<String>,
        pub closing_reading: Option<String>,
        pub expected_version: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BulkReadingsNew {
        pub date: NaiveDate,
        pub branch_id: Uuid,
        pub items: Vec<ReadingItemNew>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MeterReadingView {
        pub id: Uuid,
        pub nozzle_id: Uuid,
        pub date: NaiveDate,
        pub fuel_type: String,
        pub opening_reading: String,
        pub closing_reading: String,
        pub fuel_rate_minor: Option<i64>,
        pub sale_volume: String,
        pub total_amount_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StockWarningView {
        pub fuel_type: String,
        pub current_level: String,
        pub requested: String,
        pub projected_remaining: String,
        pub message: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BulkReadingsResult {
        pub branch_id: Uuid,
        pub date: NaiveDate,
        pub readings: Vec<MeterReadingView>,
        /// Volume dispensed by this batch per fuel type.
        pub dispensed: BTreeMap<String, String>,
        pub warnings: Vec<StockWarningView>,
    }
}

pub mod entry {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseNew {
        pub date: NaiveDate,
        pub category: String,
        pub description: Option<String>,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CreditNew {
        pub date: NaiveDate,
        pub customer_name: String,
        pub note: Option<String>,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CustomerPaymentNew {
        pub date: NaiveDate,
        pub customer_name: String,
        pub method: Option<String>,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BankDepositNew {
        pub date: NaiveDate,
        pub bank_name: String,
        pub reference: Option<String>,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct OilSaleNew {
        pub date: NaiveDate,
        pub product_name: String,
        pub quantity: String,
        pub unit_price_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PurchaseNew {
        pub date: NaiveDate,
        pub fuel_type: String,
        pub quantity: String,
        pub purchase_price_minor: i64,
        pub invoice: Option<String>,
    }

    /// Payment-method split of a day's sales. Cash is the residual.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SaleNew {
        pub date: NaiveDate,
        #[serde(default)]
        pub atm_minor: i64,
        #[serde(default)]
        pub paytm_minor: i64,
        #[serde(default)]
        pub fleet_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SaleView {
        pub id: Uuid,
        pub date: NaiveDate,
        pub rate_minor: i64,
        pub atm_minor: i64,
        pub paytm_minor: i64,
        pub fleet_minor: i64,
        pub cash_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct OilSaleView {
        pub id: Uuid,
        pub product_name: String,
        pub quantity: String,
        pub unit_price_minor: i64,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PurchaseView {
        pub id: Uuid,
        pub fuel_type: String,
        pub quantity: String,
        pub purchase_price_minor: i64,
        pub invoice: Option<String>,
    }

    /// Any single-amount line item (expense, credit, customer payment, bank
    /// deposit).
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LineView {
        pub id: Uuid,
        /// Category, customer or bank name.
        pub label: String,
        /// Description, note, payment method or deposit reference.
        pub detail: Option<String>,
        pub amount_minor: i64,
    }
}

pub mod report {
    use super::*;
    use crate::{
        entry::{LineView, OilSaleView, PurchaseView},
        reading::MeterReadingView,
    };

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ReportGet {
        pub date: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FuelSummaryView {
        pub volume: String,
        pub revenue_minor: i64,
    }

    /// The flat daily settlement report.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DailyReportView {
        pub branch_id: Uuid,
        pub date: NaiveDate,
        pub total_purchase_minor: i64,
        pub total_sale_minor: i64,
        pub total_expense_minor: i64,
        pub total_credit_minor: i64,
        pub total_customer_payment_minor: i64,
        pub total_balance_receipt_minor: i64,
        pub total_bank_deposit_minor: i64,
        pub sales_and_balance_receipt_minor: i64,
        pub cash_balance_minor: i64,
        pub atm_minor: i64,
        pub paytm_minor: i64,
        pub fleet_minor: i64,
        pub cash_minor: i64,
        pub fuel_revenue_minor: i64,
        pub oil_revenue_minor: i64,
        pub fuel: BTreeMap<String, FuelSummaryView>,
        pub meter_readings: Vec<MeterReadingView>,
        pub oil_sales: Vec<OilSaleView>,
        pub purchases: Vec<PurchaseView>,
        pub bank_deposits: Vec<LineView>,
        pub expenses: Vec<LineView>,
        pub credits: Vec<LineView>,
        pub customer_payments: Vec<LineView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BalanceReceiptView {
        pub id: Uuid,
        pub date: NaiveDate,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SettlementView {
        pub report: DailyReportView,
        pub carried: BalanceReceiptView,
    }
}
