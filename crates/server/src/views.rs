//! Mapping of engine values onto API bodies.

use std::collections::BTreeMap;

use api_types::{
    entry::{LineView, OilSaleView, PurchaseView, SaleView},
    reading::{BulkReadingsResult, MeterReadingView, StockWarningView},
    report::{BalanceReceiptView, DailyReportView, FuelSummaryView},
    roster::{BranchView, FuelProductView, NozzleView},
    tank::{TankLevelView, TankLevels},
};
use engine::{
    BalanceReceipt, BankDeposit, Branch, BulkReadingsOutcome, Credit, CustomerPayment,
    DailyReport, Expense, FuelProduct, MeterReading, Money, Nozzle, OilSale, Purchase, Sale,
    StockWarning, TankLevel, Volume,
};

use crate::ServerError;

/// Parse a decimal volume from a request body.
pub(crate) fn parse_volume(value: &str) -> Result<Volume, ServerError> {
    value.parse::<Volume>().map_err(ServerError::from)
}

pub(crate) fn branch(branch: Branch) -> BranchView {
    BranchView {
        id: branch.id,
        name: branch.name,
    }
}

pub(crate) fn fuel_product(product: FuelProduct) -> FuelProductView {
    FuelProductView {
        id: product.id,
        fuel_type: product.fuel_type,
        selling_price_minor: product.selling_price.minor(),
    }
}

pub(crate) fn nozzle(nozzle: Nozzle) -> NozzleView {
    NozzleView {
        id: nozzle.id,
        machine_id: nozzle.machine_id,
        branch_id: nozzle.branch_id,
        fuel_type: nozzle.fuel_type,
        last_closing: nozzle.last_closing.to_string(),
        last_reading_date: nozzle.last_reading_date,
        version: nozzle.version,
    }
}

pub(crate) fn tank_levels(levels: BTreeMap<String, TankLevel>) -> TankLevels {
    levels
        .into_iter()
        .map(|(fuel_type, level)| {
            (
                fuel_type,
                TankLevelView {
                    current_level: level.current_level.to_string(),
                    tank_name: level.tank_name,
                },
            )
        })
        .collect()
}

pub(crate) fn meter_reading(reading: MeterReading) -> MeterReadingView {
    MeterReadingView {
        id: reading.id,
        nozzle_id: reading.nozzle_id,
        date: reading.date,
        fuel_type: reading.fuel_type,
        opening_reading: reading.opening_reading.to_string(),
        closing_reading: reading.closing_reading.to_string(),
        fuel_rate_minor: reading.fuel_rate.map(Money::minor),
        sale_volume: reading.sale_volume.to_string(),
        total_amount_minor: reading.total_amount.map(Money::minor),
    }
}

fn stock_warning(warning: StockWarning) -> StockWarningView {
    StockWarningView {
        message: warning.to_string(),
        fuel_type: warning.fuel_type,
        current_level: warning.current_level.to_string(),
        requested: warning.requested.to_string(),
        projected_remaining: warning.projected_remaining.to_string(),
    }
}

pub(crate) fn bulk_outcome(outcome: BulkReadingsOutcome) -> BulkReadingsResult {
    BulkReadingsResult {
        branch_id: outcome.branch_id,
        date: outcome.date,
        readings: outcome.readings.into_iter().map(meter_reading).collect(),
        dispensed: outcome
            .dispensed
            .into_iter()
            .map(|(fuel_type, volume)| (fuel_type, volume.to_string()))
            .collect(),
        warnings: outcome.warnings.into_iter().map(stock_warning).collect(),
    }
}

pub(crate) fn sale(sale: Sale) -> SaleView {
    SaleView {
        id: sale.id,
        date: sale.date,
        cash_minor: sale.cash().minor(),
        rate_minor: sale.rate.minor(),
        atm_minor: sale.atm.minor(),
        paytm_minor: sale.paytm.minor(),
        fleet_minor: sale.fleet.minor(),
    }
}

fn oil_sale(oil: OilSale) -> OilSaleView {
    OilSaleView {
        id: oil.id,
        product_name: oil.product_name,
        quantity: oil.quantity.to_string(),
        unit_price_minor: oil.unit_price.minor(),
        amount_minor: oil.amount.minor(),
    }
}

fn purchase(purchase: Purchase) -> PurchaseView {
    PurchaseView {
        id: purchase.id,
        fuel_type: purchase.fuel_type,
        quantity: purchase.quantity.to_string(),
        purchase_price_minor: purchase.purchase_price.minor(),
        invoice: purchase.invoice,
    }
}

fn expense(expense: Expense) -> LineView {
    LineView {
        id: expense.id,
        label: expense.category,
        detail: expense.description,
        amount_minor: expense.amount.minor(),
    }
}

fn credit(credit: Credit) -> LineView {
    LineView {
        id: credit.id,
        label: credit.customer_name,
        detail: credit.note,
        amount_minor: credit.amount.minor(),
    }
}

fn customer_payment(payment: CustomerPayment) -> LineView {
    LineView {
        id: payment.id,
        label: payment.customer_name,
        detail: payment.method,
        amount_minor: payment.amount.minor(),
    }
}

fn bank_deposit(deposit: BankDeposit) -> LineView {
    LineView {
        id: deposit.id,
        label: deposit.bank_name,
        detail: deposit.reference,
        amount_minor: deposit.amount.minor(),
    }
}

pub(crate) fn report(report: DailyReport) -> DailyReportView {
    DailyReportView {
        branch_id: report.branch_id,
        date: report.date,
        total_purchase_minor: report.total_purchase.minor(),
        total_sale_minor: report.total_sale.minor(),
        total_expense_minor: report.total_expense.minor(),
        total_credit_minor: report.total_credit.minor(),
        total_customer_payment_minor: report.total_customer_payment.minor(),
        total_balance_receipt_minor: report.total_balance_receipt.minor(),
        total_bank_deposit_minor: report.total_bank_deposit.minor(),
        sales_and_balance_receipt_minor: report.sales_and_balance_receipt.minor(),
        cash_balance_minor: report.cash_balance.minor(),
        atm_minor: report.atm.minor(),
        paytm_minor: report.paytm.minor(),
        fleet_minor: report.fleet.minor(),
        cash_minor: report.cash.minor(),
        fuel_revenue_minor: report.fuel_revenue.minor(),
        oil_revenue_minor: report.oil_revenue.minor(),
        fuel: report
            .fuel
            .into_iter()
            .map(|(fuel_type, summary)| {
                (
                    fuel_type,
                    FuelSummaryView {
                        volume: summary.volume.to_string(),
                        revenue_minor: summary.revenue.minor(),
                    },
                )
            })
            .collect(),
        meter_readings: report.meter_readings.into_iter().map(meter_reading).collect(),
        oil_sales: report.oil_sales.into_iter().map(oil_sale).collect(),
        purchases: report.purchases.into_iter().map(purchase).collect(),
        bank_deposits: report.bank_deposits.into_iter().map(bank_deposit).collect(),
        expenses: report.expenses.into_iter().map(expense).collect(),
        credits: report.credits.into_iter().map(credit).collect(),
        customer_payments: report
            .customer_payments
            .into_iter()
            .map(customer_payment)
            .collect(),
    }
}

pub(crate) fn balance_receipt(receipt: BalanceReceipt) -> BalanceReceiptView {
    BalanceReceiptView {
        id: receipt.id,
        date: receipt.date,
        amount_minor: receipt.amount.minor(),
    }
}
