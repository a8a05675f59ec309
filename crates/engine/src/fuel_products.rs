//! Per-branch fuel roster with the selling price used to value sale volume.
//!
//! Fuel types are not a closed enum: every branch sells its own set, resolved
//! from this table at request time.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelProduct {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub fuel_type: String,
    pub selling_price: Money,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "fuel_products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub branch_id: String,
    pub fuel_type: String,
    pub selling_price_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::branches::Entity",
        from = "Column::BranchId",
        to = "super::branches::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Branches,
}

impl Related<super::branches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Branches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&FuelProduct> for ActiveModel {
    fn from(value: &FuelProduct) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            branch_id: ActiveValue::Set(value.branch_id.to_string()),
            fuel_type: ActiveValue::Set(value.fuel_type.clone()),
            selling_price_minor: ActiveValue::Set(value.selling_price.minor()),
        }
    }
}

impl TryFrom<Model> for FuelProduct {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "fuel product")?,
            branch_id: parse_uuid(&model.branch_id, "branch")?,
            fuel_type: model.fuel_type,
            selling_price: Money::new(model.selling_price_minor),
        })
    }
}
