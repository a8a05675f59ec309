//! Nozzles and their authoritative cumulative counter.
//!
//! `last_closing` is written only by the reading processor. Every write bumps
//! `version`, which the processor uses as an optimistic-concurrency token.

use chrono::NaiveDate;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Volume, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nozzle {
    pub id: Uuid,
    pub machine_id: Uuid,
    pub branch_id: Uuid,
    pub fuel_type: String,
    /// Cumulative counter after the latest committed reading.
    pub last_closing: Volume,
    /// Date of the latest committed reading, if any.
    pub last_reading_date: Option<NaiveDate>,
    pub version: i64,
}

impl Nozzle {
    pub fn new(machine_id: Uuid, branch_id: Uuid, fuel_type: String, initial: Volume) -> Self {
        Self {
            id: Uuid::new_v4(),
            machine_id,
            branch_id,
            fuel_type,
            last_closing: initial,
            last_reading_date: None,
            version: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "nozzles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub machine_id: String,
    pub branch_id: String,
    pub fuel_type: String,
    pub last_closing_milli: i64,
    pub last_reading_date: Option<Date>,
    pub version: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::machines::Entity",
        from = "Column::MachineId",
        to = "super::machines::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Machines,
    #[sea_orm(has_many = "super::meter_readings::Entity")]
    MeterReadings,
}

impl Related<super::machines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Machines.def()
    }
}

impl Related<super::meter_readings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MeterReadings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Nozzle> for ActiveModel {
    fn from(value: &Nozzle) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            machine_id: ActiveValue::Set(value.machine_id.to_string()),
            branch_id: ActiveValue::Set(value.branch_id.to_string()),
            fuel_type: ActiveValue::Set(value.fuel_type.clone()),
            last_closing_milli: ActiveValue::Set(value.last_closing.milli()),
            last_reading_date: ActiveValue::Set(value.last_reading_date),
            version: ActiveValue::Set(value.version),
        }
    }
}

impl TryFrom<Model> for Nozzle {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "nozzle")?,
            machine_id: parse_uuid(&model.machine_id, "machine")?,
            branch_id: parse_uuid(&model.branch_id, "branch")?,
            fuel_type: model.fuel_type,
            last_closing: Volume::from_milli(model.last_closing_milli),
            last_reading_date: model.last_reading_date,
            version: model.version,
        })
    }
}
