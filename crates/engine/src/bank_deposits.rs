//! Cash moved from the till to a bank account.

use chrono::NaiveDate;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankDeposit {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub date: NaiveDate,
    pub bank_name: String,
    pub reference: Option<String>,
    pub amount: Money,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bank_deposits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub branch_id: String,
    pub date: Date,
    pub bank_name: String,
    pub reference: Option<String>,
    pub amount_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&BankDeposit> for ActiveModel {
    fn from(value: &BankDeposit) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            branch_id: ActiveValue::Set(value.branch_id.to_string()),
            date: ActiveValue::Set(value.date),
            bank_name: ActiveValue::Set(value.bank_name.clone()),
            reference: ActiveValue::Set(value.reference.clone()),
            amount_minor: ActiveValue::Set(value.amount.minor()),
        }
    }
}

impl TryFrom<Model> for BankDeposit {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "bank deposit")?,
            branch_id: parse_uuid(&model.branch_id, "branch")?,
            date: model.date,
            bank_name: model.bank_name,
            reference: model.reference,
            amount: Money::new(model.amount_minor),
        })
    }
}
