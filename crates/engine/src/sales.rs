//! Day-level sale aggregate for a branch.
//!
//! `rate` is the grand total of the day (meter-reading revenue plus oil-sale
//! revenue). Cash is never stored: it is the residual after card/wallet/fleet
//! splits.

use chrono::NaiveDate;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub date: NaiveDate,
    pub rate: Money,
    pub atm: Money,
    pub paytm: Money,
    pub fleet: Money,
}

impl Sale {
    /// Cash share of the day's total.
    pub fn cash(&self) -> Money {
        self.rate - self.atm - self.paytm - self.fleet
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub branch_id: String,
    pub date: Date,
    pub rate_minor: i64,
    pub atm_minor: i64,
    pub paytm_minor: i64,
    pub fleet_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Sale> for ActiveModel {
    fn from(value: &Sale) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            branch_id: ActiveValue::Set(value.branch_id.to_string()),
            date: ActiveValue::Set(value.date),
            rate_minor: ActiveValue::Set(value.rate.minor()),
            atm_minor: ActiveValue::Set(value.atm.minor()),
            paytm_minor: ActiveValue::Set(value.paytm.minor()),
            fleet_minor: ActiveValue::Set(value.fleet.minor()),
        }
    }
}

impl TryFrom<Model> for Sale {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "sale")?,
            branch_id: parse_uuid(&model.branch_id, "branch")?,
            date: model.date,
            rate: Money::new(model.rate_minor),
            atm: Money::new(model.atm_minor),
            paytm: Money::new(model.paytm_minor),
            fleet: Money::new(model.fleet_minor),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cash_is_the_residual() {
        let sale = Sale {
            id: Uuid::new_v4(),
            branch_id: Uuid::new_v4(),
            date: NaiveDate::default(),
            rate: Money::new(10_000_00),
            atm: Money::new(2_000_00),
            paytm: Money::new(1_500_00),
            fleet: Money::new(500_00),
        };
        assert_eq!(sale.cash(), Money::new(6_000_00));
    }
}
