//! Customers settling their credit. Decreases what the customer owes.

use chrono::NaiveDate;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerPayment {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub date: NaiveDate,
    pub customer_name: String,
    pub method: Option<String>,
    pub amount: Money,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "customer_payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub branch_id: String,
    pub date: Date,
    pub customer_name: String,
    pub method: Option<String>,
    pub amount_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&CustomerPayment> for ActiveModel {
    fn from(value: &CustomerPayment) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            branch_id: ActiveValue::Set(value.branch_id.to_string()),
            date: ActiveValue::Set(value.date),
            customer_name: ActiveValue::Set(value.customer_name.clone()),
            method: ActiveValue::Set(value.method.clone()),
            amount_minor: ActiveValue::Set(value.amount.minor()),
        }
    }
}

impl TryFrom<Model> for CustomerPayment {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "customer payment")?,
            branch_id: parse_uuid(&model.branch_id, "branch")?,
            date: model.date,
            customer_name: model.customer_name,
            method: model.method,
            amount: Money::new(model.amount_minor),
        })
    }
}
