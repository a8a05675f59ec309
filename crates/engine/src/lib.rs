//! Fuel-retail back-office core.
//!
//! The [`Engine`] turns per-nozzle meter readings into sale volumes and
//! revenue against a finite tank stock, and folds every daily transaction
//! stream of a branch into a reconciled cash report whose balance is carried
//! into the next day.

pub use balance_receipts::BalanceReceipt;
pub use bank_deposits::BankDeposit;
pub use branches::Branch;
pub use commands::{
    BankDepositCmd, BulkReadingsCmd, CreditCmd, CustomerPaymentCmd, ExpenseCmd, OilSaleCmd,
    PurchaseCmd, ReadingItem, SaleCmd,
};
pub use credits::Credit;
pub use customer_payments::CustomerPayment;
pub use error::EngineError;
pub use expenses::Expense;
pub use fuel_products::FuelProduct;
pub use meter_readings::MeterReading;
pub use money::Money;
pub use nozzles::Nozzle;
pub use oil_sales::OilSale;
pub use ops::{BulkReadingsOutcome, Engine, EngineBuilder, Settlement, StockCommit, TankLevel};
pub use purchases::Purchase;
pub use report::{DailyInputs, DailyReport, FuelSummary};
pub use sales::Sale;
pub use stock::{StockPolicy, StockReservation, StockWarning};
pub use tanks::TankStock;
pub use volume::Volume;

mod balance_receipts;
mod bank_deposits;
mod branches;
mod commands;
mod credits;
mod customer_payments;
mod error;
mod expenses;
mod fuel_products;
mod locks;
mod machines;
mod meter_readings;
mod money;
mod nozzles;
mod oil_sales;
mod ops;
mod purchases;
mod report;
mod sales;
mod stock;
mod tanks;
mod util;
mod volume;

type ResultEngine<T> = Result<T, EngineError>;
