//! Tank stock: on-hand quantity of one fuel type at one branch.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Volume, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TankStock {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub fuel_type: String,
    pub tank_name: String,
    pub current_level: Volume,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tanks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub branch_id: String,
    pub fuel_type: String,
    pub tank_name: String,
    pub current_level_milli: i64,
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

impl From<&TankStock> for ActiveModel {
    fn from(value: &TankStock) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            branch_id: ActiveValue::Set(value.branch_id.to_string()),
            fuel_type: ActiveValue::Set(value.fuel_type.clone()),
            tank_name: ActiveValue::Set(value.tank_name.clone()),
            current_level_milli: ActiveValue::Set(value.current_level.milli()),
        }
    }
}

impl TryFrom<Model> for TankStock {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "tank")?,
            branch_id: parse_uuid(&model.branch_id, "branch")?,
            fuel_type: model.fuel_type,
            tank_name: model.tank_name,
            current_level: Volume::from_milli(model.current_level_milli),
        })
    }
}
