#![allow(dead_code)]

use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

use engine::{Engine, Money, StockPolicy, Volume};
use migration::MigratorTrait;

pub async fn engine_with_db(policy: StockPolicy) -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .stock_policy(policy)
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

pub fn vol(value: &str) -> Volume {
    value.parse().unwrap()
}

pub fn money(value: &str) -> Money {
    value.parse().unwrap()
}

/// One branch selling petrol at 95.50 and diesel at 89.00.
///
/// The petrol tank holds 1000, the diesel tank 40. The petrol nozzle starts
/// at 100, the diesel nozzle at 200.
pub struct Station {
    pub engine: Engine,
    pub db: DatabaseConnection,
    pub branch: Uuid,
    pub petrol: Uuid,
    pub diesel: Uuid,
}

impl Station {
    pub async fn new() -> Self {
        Self::with_policy(StockPolicy::Warn).await
    }

    pub async fn with_policy(policy: StockPolicy) -> Self {
        let (engine, db) = engine_with_db(policy).await;
        let branch = engine.new_branch("Main Road").await.unwrap();
        engine
            .upsert_fuel_product(branch, "Petrol", money("95.50"))
            .await
            .unwrap();
        engine
            .upsert_fuel_product(branch, "diesel", money("89.00"))
            .await
            .unwrap();
        engine
            .new_tank(branch, "petrol", "Tank A", vol("1000"))
            .await
            .unwrap();
        engine
            .new_tank(branch, "diesel", "Tank B", vol("40"))
            .await
            .unwrap();
        let machine = engine.new_machine(branch, "Dispenser 1").await.unwrap();
        let petrol = engine
            .new_nozzle(machine, "petrol", vol("100"))
            .await
            .unwrap()
            .id;
        let diesel = engine
            .new_nozzle(machine, "diesel", vol("200"))
            .await
            .unwrap()
            .id;
        Self {
            engine,
            db,
            branch,
            petrol,
            diesel,
        }
    }
}
