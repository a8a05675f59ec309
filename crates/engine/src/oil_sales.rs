//! Lubricant and other packaged product sales.

use chrono::NaiveDate;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, Volume, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OilSale {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub date: NaiveDate,
    pub product_name: String,
    pub quantity: Volume,
    pub unit_price: Money,
    pub amount: Money,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "oil_sales")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub branch_id: String,
    pub date: Date,
    pub product_name: String,
    pub quantity_milli: i64,
    pub unit_price_minor: i64,
    pub amount_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&OilSale> for ActiveModel {
    fn from(value: &OilSale) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            branch_id: ActiveValue::Set(value.branch_id.to_string()),
            date: ActiveValue::Set(value.date),
            product_name: ActiveValue::Set(value.product_name.clone()),
            quantity_milli: ActiveValue::Set(value.quantity.milli()),
            unit_price_minor: ActiveValue::Set(value.unit_price.minor()),
            amount_minor: ActiveValue::Set(value.amount.minor()),
        }
    }
}

impl TryFrom<Model> for OilSale {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "oil sale")?,
            branch_id: parse_uuid(&model.branch_id, "branch")?,
            date: model.date,
            product_name: model.product_name,
            quantity: Volume::from_milli(model.quantity_milli),
            unit_price: Money::new(model.unit_price_minor),
            amount: Money::new(model.amount_minor),
        })
    }
}
