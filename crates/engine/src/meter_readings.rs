//! One meter reading per nozzle per date.

use chrono::NaiveDate;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, Volume, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeterReading {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub nozzle_id: Uuid,
    pub date: NaiveDate,
    pub fuel_type: String,
    pub opening_reading: Volume,
    pub closing_reading: Volume,
    /// Selling price per unit at submission time, `None` if the branch has no
    /// price for the fuel type.
    pub fuel_rate: Option<Money>,
    pub sale_volume: Volume,
    pub total_amount: Option<Money>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "meter_readings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub branch_id: String,
    pub nozzle_id: String,
    pub date: Date,
    pub fuel_type: String,
    pub opening_milli: i64,
    pub closing_milli: i64,
    pub fuel_rate_minor: Option<i64>,
    pub sale_volume_milli: i64,
    pub total_amount_minor: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::nozzles::Entity",
        from = "Column::NozzleId",
        to = "super::nozzles::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Nozzles,
}

impl Related<super::nozzles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Nozzles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&MeterReading> for ActiveModel {
    fn from(value: &MeterReading) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            branch_id: ActiveValue::Set(value.branch_id.to_string()),
            nozzle_id: ActiveValue::Set(value.nozzle_id.to_string()),
            date: ActiveValue::Set(value.date),
            fuel_type: ActiveValue::Set(value.fuel_type.clone()),
            opening_milli: ActiveValue::Set(value.opening_reading.milli()),
            closing_milli: ActiveValue::Set(value.closing_reading.milli()),
            fuel_rate_minor: ActiveValue::Set(value.fuel_rate.map(Money::minor)),
            sale_volume_milli: ActiveValue::Set(value.sale_volume.milli()),
            total_amount_minor: ActiveValue::Set(value.total_amount.map(Money::minor)),
        }
    }
}

impl TryFrom<Model> for MeterReading {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "meter reading")?,
            branch_id: parse_uuid(&model.branch_id, "branch")?,
            nozzle_id: parse_uuid(&model.nozzle_id, "nozzle")?,
            date: model.date,
            fuel_type: model.fuel_type,
            opening_reading: Volume::from_milli(model.opening_milli),
            closing_reading: Volume::from_milli(model.closing_milli),
            fuel_rate: model.fuel_rate_minor.map(Money::new),
            sale_volume: Volume::from_milli(model.sale_volume_milli),
            total_amount: model.total_amount_minor.map(Money::new),
        })
    }
}
