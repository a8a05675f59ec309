//! Cash carried forward from one day's settlement into the next day.
//!
//! Rows are derived by the carry-forward step, never entered by hand, and are
//! unique per `(branch_id, date)`.

use chrono::NaiveDate;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceReceipt {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub date: NaiveDate,
    pub amount: Money,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "balance_receipts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub branch_id: String,
    pub date: Date,
    pub amount_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&BalanceReceipt> for ActiveModel {
    fn from(value: &BalanceReceipt) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            branch_id: ActiveValue::Set(value.branch_id.to_string()),
            date: ActiveValue::Set(value.date),
            amount_minor: ActiveValue::Set(value.amount.minor()),
        }
    }
}

impl TryFrom<Model> for BalanceReceipt {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "balance receipt")?,
            branch_id: parse_uuid(&model.branch_id, "branch")?,
            date: model.date,
            amount: Money::new(model.amount_minor),
        })
    }
}
