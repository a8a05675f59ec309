//! Command structs for engine write operations.
//!
//! These types group parameters for the bulk reading submission and the
//! daily transaction streams, keeping call sites readable and avoiding long
//! argument lists.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{Money, Volume};

/// One nozzle inside a bulk reading submission.
///
/// Only `nozzle_id` is required. The opening is always derived from stored
/// state; a client-supplied `opening_reading` or `expected_version` is only
/// checked against it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadingItem {
    pub nozzle_id: Uuid,
    pub closing_reading: Option<Volume>,
    pub opening_reading: Option<Volume>,
    pub expected_version: Option<i64>,
    pub fuel_type: Option<String>,
}

impl ReadingItem {
    #[must_use]
    pub fn new(nozzle_id: Uuid) -> Self {
        Self {
            nozzle_id,
            closing_reading: None,
            opening_reading: None,
            expected_version: None,
            fuel_type: None,
        }
    }

    #[must_use]
    pub fn closing(mut self, closing: Volume) -> Self {
        self.closing_reading = Some(closing);
        self
    }

    #[must_use]
    pub fn opening(mut self, opening: Volume) -> Self {
        self.opening_reading = Some(opening);
        self
    }

    #[must_use]
    pub fn expected_version(mut self, version: i64) -> Self {
        self.expected_version = Some(version);
        self
    }

    #[must_use]
    pub fn fuel_type(mut self, fuel_type: impl Into<String>) -> Self {
        self.fuel_type = Some(fuel_type.into());
        self
    }

    pub(crate) fn has_values(&self) -> bool {
        self.closing_reading.is_some() || self.opening_reading.is_some()
    }
}

/// Closing readings for many nozzles of one branch on one date.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BulkReadingsCmd {
    pub branch_id: Uuid,
    pub date: NaiveDate,
    pub items: Vec<ReadingItem>,
}

impl BulkReadingsCmd {
    #[must_use]
    pub fn new(branch_id: Uuid, date: NaiveDate) -> Self {
        Self {
            branch_id,
            date,
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn item(mut self, item: ReadingItem) -> Self {
        self.items.push(item);
        self
    }
}

/// Record cash paid out of the till.
#[derive(Clone, Debug)]
pub struct ExpenseCmd {
    pub branch_id: Uuid,
    pub date: NaiveDate,
    pub category: String,
    pub description: Option<String>,
    pub amount: Money,
}

impl ExpenseCmd {
    #[must_use]
    pub fn new(
        branch_id: Uuid,
        date: NaiveDate,
        category: impl Into<String>,
        amount: Money,
    ) -> Self {
        Self {
            branch_id,
            date,
            category: category.into(),
            description: None,
            amount,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Record fuel or products given to a customer on credit.
#[derive(Clone, Debug)]
pub struct CreditCmd {
    pub branch_id: Uuid,
    pub date: NaiveDate,
    pub customer_name: String,
    pub note: Option<String>,
    pub amount: Money,
}

impl CreditCmd {
    #[must_use]
    pub fn new(
        branch_id: Uuid,
        date: NaiveDate,
        customer_name: impl Into<String>,
        amount: Money,
    ) -> Self {
        Self {
            branch_id,
            date,
            customer_name: customer_name.into(),
            note: None,
            amount,
        }
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Record a customer paying back credit.
#[derive(Clone, Debug)]
pub struct CustomerPaymentCmd {
    pub branch_id: Uuid,
    pub date: NaiveDate,
    pub customer_name: String,
    pub method: Option<String>,
    pub amount: Money,
}

impl CustomerPaymentCmd {
    #[must_use]
    pub fn new(
        branch_id: Uuid,
        date: NaiveDate,
        customer_name: impl Into<String>,
        amount: Money,
    ) -> Self {
        Self {
            branch_id,
            date,
            customer_name: customer_name.into(),
            method: None,
            amount,
        }
    }

    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }
}

/// Record cash deposited at a bank.
#[derive(Clone, Debug)]
pub struct BankDepositCmd {
    pub branch_id: Uuid,
    pub date: NaiveDate,
    pub bank_name: String,
    pub reference: Option<String>,
    pub amount: Money,
}

impl BankDepositCmd {
    #[must_use]
    pub fn new(
        branch_id: Uuid,
        date: NaiveDate,
        bank_name: impl Into<String>,
        amount: Money,
    ) -> Self {
        Self {
            branch_id,
            date,
            bank_name: bank_name.into(),
            reference: None,
            amount,
        }
    }

    #[must_use]
    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

/// Record a packaged product (oil, lubricant) sale.
#[derive(Clone, Debug)]
pub struct OilSaleCmd {
    pub branch_id: Uuid,
    pub date: NaiveDate,
    pub product_name: String,
    pub quantity: Volume,
    pub unit_price: Money,
}

impl OilSaleCmd {
    #[must_use]
    pub fn new(
        branch_id: Uuid,
        date: NaiveDate,
        product_name: impl Into<String>,
        quantity: Volume,
        unit_price: Money,
    ) -> Self {
        Self {
            branch_id,
            date,
            product_name: product_name.into(),
            quantity,
            unit_price,
        }
    }
}

/// Record a fuel delivery into a tank.
#[derive(Clone, Debug)]
pub struct PurchaseCmd {
    pub branch_id: Uuid,
    pub date: NaiveDate,
    pub fuel_type: String,
    pub quantity: Volume,
    pub purchase_price: Money,
    pub invoice: Option<String>,
}

impl PurchaseCmd {
    #[must_use]
    pub fn new(
        branch_id: Uuid,
        date: NaiveDate,
        fuel_type: impl Into<String>,
        quantity: Volume,
        purchase_price: Money,
    ) -> Self {
        Self {
            branch_id,
            date,
            fuel_type: fuel_type.into(),
            quantity,
            purchase_price,
            invoice: None,
        }
    }

    #[must_use]
    pub fn invoice(mut self, invoice: impl Into<String>) -> Self {
        self.invoice = Some(invoice.into());
        self
    }
}

/// Record the payment-method split of a day's sales.
///
/// The day's total is computed by the engine; cash is the residual.
#[derive(Clone, Debug)]
pub struct SaleCmd {
    pub branch_id: Uuid,
    pub date: NaiveDate,
    pub atm: Money,
    pub paytm: Money,
    pub fleet: Money,
}

impl SaleCmd {
    #[must_use]
    pub fn new(branch_id: Uuid, date: NaiveDate) -> Self {
        Self {
            branch_id,
            date,
            atm: Money::ZERO,
            paytm: Money::ZERO,
            fleet: Money::ZERO,
        }
    }

    #[must_use]
    pub fn atm(mut self, amount: Money) -> Self {
        self.atm = amount;
        self
    }

    #[must_use]
    pub fn paytm(mut self, amount: Money) -> Self {
        self.paytm = amount;
        self
    }

    #[must_use]
    pub fn fleet(mut self, amount: Money) -> Self {
        self.fleet = amount;
        self
    }
}
