//! Tank stock reservations.
//!
//! Dispensing is modeled as `reserve -> commit | release`. A reservation
//! carries the projected remaining level and, when that would drop below
//! zero, a [`StockWarning`]. Whether a warning blocks the commit is decided by
//! the engine's [`StockPolicy`].

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Volume;

/// What to do when a commit would drive a tank below zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockPolicy {
    /// Commit anyway and attach a [`StockWarning`] to the result.
    #[default]
    Warn,
    /// Refuse the commit with `EngineError::InsufficientStock`.
    Block,
}

/// Informational metadata returned alongside a successful commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockWarning {
    pub fuel_type: String,
    pub current_level: Volume,
    pub requested: Volume,
    pub projected_remaining: Volume,
}

impl fmt::Display for StockWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: dispensing {} from {} leaves {}",
            self.fuel_type, self.requested, self.current_level, self.projected_remaining
        )
    }
}

/// A pending change to one tank, valid inside the transaction that created it.
///
/// A positive `delta` is dispensed volume (decrement), a negative one is a
/// delivery or a corrected reading giving volume back.
#[derive(Debug)]
#[must_use = "a reservation must be committed or released"]
pub struct StockReservation {
    pub(crate) tank_id: String,
    pub branch_id: Uuid,
    pub fuel_type: String,
    pub current_level: Volume,
    pub delta: Volume,
}

impl StockReservation {
    pub fn projected_remaining(&self) -> Volume {
        self.current_level - self.delta
    }

    pub fn warning(&self) -> Option<StockWarning> {
        let projected = self.projected_remaining();
        (self.delta > Volume::ZERO && projected.is_negative()).then(|| StockWarning {
            fuel_type: self.fuel_type.clone(),
            current_level: self.current_level,
            requested: self.delta,
            projected_remaining: projected,
        })
    }

    /// Abandon the reservation without touching the tank.
    pub fn release(self) {
        tracing::debug!(
            branch_id = %self.branch_id,
            fuel_type = %self.fuel_type,
            "stock reservation released"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reservation(level: i64, delta: i64) -> StockReservation {
        StockReservation {
            tank_id: "tank".to_string(),
            branch_id: Uuid::new_v4(),
            fuel_type: "diesel".to_string(),
            current_level: Volume::from_units(level),
            delta: Volume::from_units(delta),
        }
    }

    #[test]
    fn no_warning_while_stock_lasts() {
        let r = reservation(100, 100);
        assert_eq!(r.projected_remaining(), Volume::ZERO);
        assert!(r.warning().is_none());
        r.release();
    }

    #[test]
    fn warns_when_projected_negative() {
        let r = reservation(40, 50);
        let warning = r.warning().unwrap();
        assert_eq!(warning.projected_remaining, Volume::from_units(-10));
        assert_eq!(
            warning.to_string(),
            "diesel: dispensing 50.000 from 40.000 leaves -10.000"
        );
        r.release();
    }

    #[test]
    fn giving_volume_back_never_warns() {
        let r = reservation(-20, -5);
        assert_eq!(r.projected_remaining(), Volume::from_units(-15));
        assert!(r.warning().is_none());
        r.release();
    }
}
