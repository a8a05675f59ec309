//! Fuel deliveries. A purchase raises the matching tank level.

use chrono::NaiveDate;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, Volume, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub date: NaiveDate,
    pub fuel_type: String,
    pub quantity: Volume,
    pub purchase_price: Money,
    pub invoice: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub branch_id: String,
    pub date: Date,
    pub fuel_type: String,
    pub quantity_milli: i64,
    pub purchase_price_minor: i64,
    pub invoice: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Purchase> for ActiveModel {
    fn from(value: &Purchase) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            branch_id: ActiveValue::Set(value.branch_id.to_string()),
            date: ActiveValue::Set(value.date),
            fuel_type: ActiveValue::Set(value.fuel_type.clone()),
            quantity_milli: ActiveValue::Set(value.quantity.milli()),
            purchase_price_minor: ActiveValue::Set(value.purchase_price.minor()),
            invoice: ActiveValue::Set(value.invoice.clone()),
        }
    }
}

impl TryFrom<Model> for Purchase {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "purchase")?,
            branch_id: parse_uuid(&model.branch_id, "branch")?,
            date: model.date,
            fuel_type: model.fuel_type,
            quantity: Volume::from_milli(model.quantity_milli),
            purchase_price: Money::new(model.purchase_price_minor),
            invoice: model.invoice,
        })
    }
}
