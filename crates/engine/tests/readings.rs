mod common;

use std::sync::Arc;

use engine::{
    BulkReadingsCmd, BulkReadingsOutcome, EngineError, PurchaseCmd, ReadingItem, StockPolicy,
    Volume,
};

use common::{Station, day, money, vol};

#[tokio::test]
async fn closing_reading_values_the_sale() {
    let station = Station::new().await;
    let outcome = station
        .engine
        .submit_readings(
            BulkReadingsCmd::new(station.branch, day(10))
                .item(ReadingItem::new(station.petrol).closing(vol("150.0"))),
        )
        .await
        .unwrap();

    let reading = &outcome.readings[0];
    assert_eq!(reading.opening_reading, vol("100"));
    assert_eq!(reading.closing_reading, vol("150"));
    assert_eq!(reading.sale_volume, vol("50"));
    assert_eq!(reading.fuel_rate, Some(money("95.50")));
    assert_eq!(reading.total_amount, Some(money("4775.00")));
    assert_eq!(outcome.dispensed.get("petrol"), Some(&vol("50")));
    assert!(outcome.warnings.is_empty());

    let nozzle = station.engine.nozzle(station.petrol).await.unwrap();
    assert_eq!(nozzle.last_closing, vol("150"));
    assert_eq!(nozzle.last_reading_date, Some(day(10)));
    assert_eq!(nozzle.version, 1);

    let level = station
        .engine
        .tank_level(station.branch, "petrol")
        .await
        .unwrap();
    assert_eq!(level, vol("950"));
}

#[tokio::test]
async fn omitted_closing_persists_a_zero_sale_row() {
    let station = Station::new().await;
    station
        .engine
        .submit_readings(
            BulkReadingsCmd::new(station.branch, day(10))
                .item(ReadingItem::new(station.petrol))
                .item(ReadingItem::new(station.diesel).closing(vol("210"))),
        )
        .await
        .unwrap();

    let rows = station
        .engine
        .meter_readings(station.branch, day(10))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    let petrol = rows.iter().find(|r| r.nozzle_id == station.petrol).unwrap();
    assert_eq!(petrol.closing_reading, vol("100"));
    assert_eq!(petrol.sale_volume, Volume::ZERO);
    assert_eq!(petrol.total_amount, Some(money("0")));
}

#[tokio::test]
async fn closing_below_opening_is_clamped() {
    let station = Station::new().await;
    let outcome = station
        .engine
        .submit_readings(
            BulkReadingsCmd::new(station.branch, day(10))
                .item(ReadingItem::new(station.diesel).closing(vol("150"))),
        )
        .await
        .unwrap();

    let reading = &outcome.readings[0];
    assert_eq!(reading.closing_reading, vol("200"));
    assert_eq!(reading.sale_volume, Volume::ZERO);
    let level = station
        .engine
        .tank_level(station.branch, "diesel")
        .await
        .unwrap();
    assert_eq!(level, vol("40"));
}

#[tokio::test]
async fn batch_without_values_is_rejected_before_writing() {
    let station = Station::new().await;
    let err = station
        .engine
        .submit_readings(
            BulkReadingsCmd::new(station.branch, day(10))
                .item(ReadingItem::new(station.petrol))
                .item(ReadingItem::new(station.diesel)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let rows = station
        .engine
        .meter_readings(station.branch, day(10))
        .await
        .unwrap();
    assert!(rows.is_empty());
    assert_eq!(station.engine.nozzle(station.petrol).await.unwrap().version, 0);
}

#[tokio::test]
async fn resubmitting_a_batch_is_idempotent() {
    let station = Station::new().await;
    let cmd = BulkReadingsCmd::new(station.branch, day(10))
        .item(ReadingItem::new(station.petrol).closing(vol("150")))
        .item(ReadingItem::new(station.diesel).closing(vol("220")));

    let first = station.engine.submit_readings(cmd.clone()).await.unwrap();
    let second = station.engine.submit_readings(cmd).await.unwrap();

    assert_eq!(first.readings, second.readings);
    let rows = station
        .engine
        .meter_readings(station.branch, day(10))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);

    let levels = station.engine.tank_levels(station.branch).await.unwrap();
    assert_eq!(levels["petrol"].current_level, vol("950"));
    assert_eq!(levels["diesel"].current_level, vol("20"));
}

#[tokio::test]
async fn corrected_closing_only_moves_stock_by_the_difference() {
    let station = Station::new().await;
    station
        .engine
        .submit_readings(
            BulkReadingsCmd::new(station.branch, day(10))
                .item(ReadingItem::new(station.petrol).closing(vol("150"))),
        )
        .await
        .unwrap();
    let corrected = station
        .engine
        .submit_readings(
            BulkReadingsCmd::new(station.branch, day(10))
                .item(ReadingItem::new(station.petrol).closing(vol("160.5"))),
        )
        .await
        .unwrap();

    assert_eq!(corrected.readings[0].opening_reading, vol("100"));
    assert_eq!(corrected.readings[0].sale_volume, vol("60.5"));
    let level = station
        .engine
        .tank_level(station.branch, "petrol")
        .await
        .unwrap();
    assert_eq!(level, vol("939.5"));
}

#[tokio::test]
async fn later_partial_batch_keeps_committed_sales() {
    let station = Station::new().await;
    station
        .engine
        .submit_readings(
            BulkReadingsCmd::new(station.branch, day(10))
                .item(ReadingItem::new(station.petrol).closing(vol("150"))),
        )
        .await
        .unwrap();

    let outcome = station
        .engine
        .submit_readings(
            BulkReadingsCmd::new(station.branch, day(10))
                .item(ReadingItem::new(station.petrol))
                .item(ReadingItem::new(station.diesel).closing(vol("210"))),
        )
        .await
        .unwrap();
    assert_eq!(outcome.dispensed["petrol"], vol("50"));

    let rows = station
        .engine
        .meter_readings(station.branch, day(10))
        .await
        .unwrap();
    let petrol = rows.iter().find(|r| r.nozzle_id == station.petrol).unwrap();
    assert_eq!(petrol.closing_reading, vol("150"));
    assert_eq!(petrol.sale_volume, vol("50"));
    assert_eq!(petrol.total_amount, Some(money("4775")));

    let nozzle = station.engine.nozzle(station.petrol).await.unwrap();
    assert_eq!(nozzle.last_closing, vol("150"));
    let level = station
        .engine
        .tank_level(station.branch, "petrol")
        .await
        .unwrap();
    assert_eq!(level, vol("950"));
}

async fn close_petrol(
    station: &Station,
    closing: &str,
) -> Result<BulkReadingsOutcome, EngineError> {
    station
        .engine
        .submit_readings(
            BulkReadingsCmd::new(station.branch, day(10))
                .item(ReadingItem::new(station.petrol).closing(vol(closing))),
        )
        .await
}

#[tokio::test]
async fn explicit_lower_closing_corrects_the_day_down_to_its_opening() {
    let station = Station::new().await;
    close_petrol(&station, "150").await.unwrap();

    let corrected = close_petrol(&station, "140").await.unwrap();
    assert_eq!(corrected.readings[0].sale_volume, vol("40"));
    let nozzle = station.engine.nozzle(station.petrol).await.unwrap();
    assert_eq!(nozzle.last_closing, vol("140"));

    let clamped = close_petrol(&station, "90").await.unwrap();
    assert_eq!(clamped.readings[0].closing_reading, vol("100"));
    assert_eq!(clamped.readings[0].sale_volume, Volume::ZERO);
    let nozzle = station.engine.nozzle(station.petrol).await.unwrap();
    assert_eq!(nozzle.last_closing, vol("100"));
    let level = station
        .engine
        .tank_level(station.branch, "petrol")
        .await
        .unwrap();
    assert_eq!(level, vol("1000"));
}

#[tokio::test]
async fn nozzles_need_a_tank_for_their_fuel() {
    let station = Station::new().await;
    station
        .engine
        .upsert_fuel_product(station.branch, "cng", money("76.00"))
        .await
        .unwrap();
    let machine = station
        .engine
        .new_machine(station.branch, "CNG dispenser")
        .await
        .unwrap();

    let err = station
        .engine
        .new_nozzle(machine, "cng", vol("0"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    station
        .engine
        .new_tank(station.branch, "cng", "Cascade", vol("500"))
        .await
        .unwrap();
    let cng = station
        .engine
        .new_nozzle(machine, "cng", vol("0"))
        .await
        .unwrap()
        .id;

    let outcome = station
        .engine
        .submit_readings(
            BulkReadingsCmd::new(station.branch, day(10))
                .item(ReadingItem::new(cng))
                .item(ReadingItem::new(station.petrol).closing(vol("150"))),
        )
        .await
        .unwrap();
    assert_eq!(outcome.readings.len(), 2);
    assert_eq!(outcome.dispensed["cng"], Volume::ZERO);
    let levels = station.engine.tank_levels(station.branch).await.unwrap();
    assert_eq!(levels["cng"].current_level, vol("500"));
    assert_eq!(levels["petrol"].current_level, vol("950"));
}

#[tokio::test]
async fn concurrent_double_submit_decrements_once() {
    let station = Station::new().await;
    let engine = Arc::new(station.engine);
    let cmd = BulkReadingsCmd::new(station.branch, day(10))
        .item(ReadingItem::new(station.petrol).closing(vol("150")));

    let (a, b) = tokio::join!(
        engine.submit_readings(cmd.clone()),
        engine.submit_readings(cmd.clone())
    );
    a.unwrap();
    b.unwrap();

    let level = engine.tank_level(station.branch, "petrol").await.unwrap();
    assert_eq!(level, vol("950"));
}

#[tokio::test]
async fn overdrawn_tank_warns_but_commits() {
    let station = Station::new().await;
    let outcome = station
        .engine
        .submit_readings(
            BulkReadingsCmd::new(station.branch, day(10))
                .item(ReadingItem::new(station.diesel).closing(vol("250"))),
        )
        .await
        .unwrap();

    assert_eq!(outcome.warnings.len(), 1);
    let warning = &outcome.warnings[0];
    assert_eq!(warning.fuel_type, "diesel");
    assert_eq!(warning.requested, vol("50"));
    assert_eq!(warning.projected_remaining, vol("-10"));

    let level = station
        .engine
        .tank_level(station.branch, "diesel")
        .await
        .unwrap();
    assert_eq!(level, vol("-10"));
}

#[tokio::test]
async fn block_policy_refuses_overdrawn_batch() {
    let station = Station::with_policy(StockPolicy::Block).await;
    let err = station
        .engine
        .submit_readings(
            BulkReadingsCmd::new(station.branch, day(10))
                .item(ReadingItem::new(station.petrol).closing(vol("150")))
                .item(ReadingItem::new(station.diesel).closing(vol("250"))),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientStock(_)));

    let petrol = station.engine.nozzle(station.petrol).await.unwrap();
    assert_eq!(petrol.last_closing, vol("100"));
    let rows = station
        .engine
        .meter_readings(station.branch, day(10))
        .await
        .unwrap();
    assert!(rows.is_empty());
    let levels = station.engine.tank_levels(station.branch).await.unwrap();
    assert_eq!(levels["petrol"].current_level, vol("1000"));
    assert_eq!(levels["diesel"].current_level, vol("40"));
}

#[tokio::test]
async fn stale_client_opening_fails_the_whole_batch() {
    let station = Station::new().await;
    let err = station
        .engine
        .submit_readings(
            BulkReadingsCmd::new(station.branch, day(10))
                .item(ReadingItem::new(station.petrol).closing(vol("150")))
                .item(
                    ReadingItem::new(station.diesel)
                        .opening(vol("190"))
                        .closing(vol("210")),
                ),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Continuity(_)));

    let petrol = station.engine.nozzle(station.petrol).await.unwrap();
    assert_eq!(petrol.last_closing, vol("100"));
    assert_eq!(petrol.version, 0);
    let level = station
        .engine
        .tank_level(station.branch, "petrol")
        .await
        .unwrap();
    assert_eq!(level, vol("1000"));
}

#[tokio::test]
async fn matching_client_opening_is_accepted() {
    let station = Station::new().await;
    let outcome = station
        .engine
        .submit_readings(
            BulkReadingsCmd::new(station.branch, day(10)).item(
                ReadingItem::new(station.petrol)
                    .opening(vol("100"))
                    .expected_version(0)
                    .fuel_type("PETROL")
                    .closing(vol("101")),
            ),
        )
        .await
        .unwrap();
    assert_eq!(outcome.readings[0].sale_volume, vol("1"));
}

#[tokio::test]
async fn stale_version_is_a_continuity_error() {
    let station = Station::new().await;
    station
        .engine
        .submit_readings(
            BulkReadingsCmd::new(station.branch, day(10))
                .item(ReadingItem::new(station.petrol).closing(vol("150"))),
        )
        .await
        .unwrap();

    let err = station
        .engine
        .submit_readings(
            BulkReadingsCmd::new(station.branch, day(11)).item(
                ReadingItem::new(station.petrol)
                    .expected_version(0)
                    .closing(vol("170")),
            ),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Continuity(_)));
}

#[tokio::test]
async fn next_day_opens_from_previous_closing() {
    let station = Station::new().await;
    station
        .engine
        .submit_readings(
            BulkReadingsCmd::new(station.branch, day(10))
                .item(ReadingItem::new(station.petrol).closing(vol("150"))),
        )
        .await
        .unwrap();
    let outcome = station
        .engine
        .submit_readings(
            BulkReadingsCmd::new(station.branch, day(11))
                .item(ReadingItem::new(station.petrol).closing(vol("175.25"))),
        )
        .await
        .unwrap();
    assert_eq!(outcome.readings[0].opening_reading, vol("150"));
    assert_eq!(outcome.readings[0].sale_volume, vol("25.25"));
}

#[tokio::test]
async fn superseded_and_backdated_readings_are_rejected() {
    let station = Station::new().await;
    for (date, closing) in [(day(10), "150"), (day(11), "160")] {
        station
            .engine
            .submit_readings(
                BulkReadingsCmd::new(station.branch, date)
                    .item(ReadingItem::new(station.petrol).closing(vol(closing))),
            )
            .await
            .unwrap();
    }

    let superseded = station
        .engine
        .submit_readings(
            BulkReadingsCmd::new(station.branch, day(10))
                .item(ReadingItem::new(station.petrol).closing(vol("155"))),
        )
        .await
        .unwrap_err();
    assert!(matches!(superseded, EngineError::Continuity(_)));

    let backdated = station
        .engine
        .submit_readings(
            BulkReadingsCmd::new(station.branch, day(9))
                .item(ReadingItem::new(station.petrol).closing(vol("155"))),
        )
        .await
        .unwrap_err();
    assert!(matches!(backdated, EngineError::Continuity(_)));
}

#[tokio::test]
async fn wrong_fuel_type_and_duplicates_are_validation_errors() {
    let station = Station::new().await;
    let wrong_fuel = station
        .engine
        .submit_readings(
            BulkReadingsCmd::new(station.branch, day(10)).item(
                ReadingItem::new(station.petrol)
                    .fuel_type("diesel")
                    .closing(vol("150")),
            ),
        )
        .await
        .unwrap_err();
    assert!(matches!(wrong_fuel, EngineError::Validation(_)));

    let duplicate = station
        .engine
        .submit_readings(
            BulkReadingsCmd::new(station.branch, day(10))
                .item(ReadingItem::new(station.petrol).closing(vol("150")))
                .item(ReadingItem::new(station.petrol).closing(vol("160"))),
        )
        .await
        .unwrap_err();
    assert!(matches!(duplicate, EngineError::Validation(_)));
}

#[tokio::test]
async fn nozzle_of_another_branch_is_not_found() {
    let station = Station::new().await;
    let other = station.engine.new_branch("Highway").await.unwrap();
    let err = station
        .engine
        .submit_readings(
            BulkReadingsCmd::new(other, day(10))
                .item(ReadingItem::new(station.petrol).closing(vol("150"))),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn purchases_refill_the_tank() {
    let station = Station::new().await;
    station
        .engine
        .record_purchase(
            PurchaseCmd::new(station.branch, day(10), "Diesel", vol("500"), money("44500"))
                .invoice("INV-77"),
        )
        .await
        .unwrap();

    let level = station
        .engine
        .tank_level(station.branch, "diesel")
        .await
        .unwrap();
    assert_eq!(level, vol("540"));
}

#[tokio::test]
async fn ledger_projects_and_commits_directly() {
    let station = Station::new().await;
    let projected = station
        .engine
        .projected_remaining(station.branch, "diesel", vol("55"))
        .await
        .unwrap();
    assert_eq!(projected, vol("-15"));
    assert_eq!(
        station
            .engine
            .tank_level(station.branch, "diesel")
            .await
            .unwrap(),
        vol("40")
    );

    let commit = station
        .engine
        .commit_stock(station.branch, "diesel", vol("55"))
        .await
        .unwrap();
    assert_eq!(commit.level, vol("-15"));
    assert!(commit.warning.is_some());

    let missing = station
        .engine
        .tank_level(station.branch, "kerosene")
        .await
        .unwrap_err();
    assert!(matches!(missing, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn tank_levels_are_keyed_by_fuel_type() {
    let station = Station::new().await;
    let levels = station.engine.tank_levels(station.branch).await.unwrap();
    assert_eq!(levels.len(), 2);
    assert_eq!(levels["petrol"].tank_name, "Tank A");
    assert_eq!(levels["diesel"].current_level, vol("40"));
}
