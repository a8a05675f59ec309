mod common;

use engine::{
    BankDepositCmd, BulkReadingsCmd, CreditCmd, CustomerPaymentCmd, EngineError, ExpenseCmd,
    Money, OilSaleCmd, ReadingItem, SaleCmd,
};

use common::{Station, day, money, vol};

/// Book a single oil sale of `amount` and record the day's sale row.
async fn sell_oil(station: &Station, date: chrono::NaiveDate, amount: &str) {
    station
        .engine
        .record_oil_sale(OilSaleCmd::new(
            station.branch,
            date,
            "Engine oil 1L",
            vol("1"),
            money(amount),
        ))
        .await
        .unwrap();
    station
        .engine
        .record_sale(SaleCmd::new(station.branch, date))
        .await
        .unwrap();
}

#[tokio::test]
async fn cash_balance_combines_sales_expenses_and_carried_receipt() {
    let station = Station::new().await;
    // The carried receipt dated 9th is produced by settling the 8th.
    sell_oil(&station, day(8), "500").await;
    let settled = station.engine.settle_day(station.branch, day(8)).await.unwrap();
    assert_eq!(settled.carried.date, day(9));
    assert_eq!(settled.carried.amount, money("500"));

    sell_oil(&station, day(10), "10000").await;
    station
        .engine
        .record_expense(ExpenseCmd::new(
            station.branch,
            day(10),
            "salaries",
            money("3000"),
        ))
        .await
        .unwrap();

    let report = station
        .engine
        .daily_report(station.branch, day(10))
        .await
        .unwrap();
    assert_eq!(report.total_sale, money("10000"));
    assert_eq!(report.total_expense, money("3000"));
    assert_eq!(report.total_balance_receipt, money("500"));
    assert_eq!(report.cash_balance, money("7500"));
}

#[tokio::test]
async fn report_is_pure_between_writes() {
    let station = Station::new().await;
    sell_oil(&station, day(10), "250.75").await;

    let first = station
        .engine
        .daily_report(station.branch, day(10))
        .await
        .unwrap();
    let second = station
        .engine
        .daily_report(station.branch, day(10))
        .await
        .unwrap();
    assert_eq!(first, second);
    assert!(
        station
            .engine
            .balance_receipt(station.branch, day(11))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn report_reflects_late_entries() {
    let station = Station::new().await;
    let before = station
        .engine
        .daily_report(station.branch, day(10))
        .await
        .unwrap();
    station
        .engine
        .record_expense(ExpenseCmd::new(station.branch, day(10), "tea", money("40")))
        .await
        .unwrap();
    let after = station
        .engine
        .daily_report(station.branch, day(10))
        .await
        .unwrap();
    assert_eq!(before.total_expense, Money::ZERO);
    assert_eq!(after.total_expense, money("40"));
    assert_eq!(after.cash_balance, money("-40"));
}

#[tokio::test]
async fn carry_forward_matches_cash_balance_and_overwrites() {
    let station = Station::new().await;
    sell_oil(&station, day(10), "1200").await;

    let receipt = station
        .engine
        .carry_forward(station.branch, day(10))
        .await
        .unwrap();
    assert_eq!(receipt.date, day(11));
    assert_eq!(receipt.amount, money("1200"));

    station
        .engine
        .record_expense(ExpenseCmd::new(station.branch, day(10), "rent", money("200")))
        .await
        .unwrap();
    let settlement = station
        .engine
        .settle_day(station.branch, day(10))
        .await
        .unwrap();
    assert_eq!(settlement.carried.amount, settlement.report.cash_balance);
    assert_eq!(settlement.carried.amount, money("1000"));
    assert_eq!(settlement.carried.id, receipt.id);

    let stored = station
        .engine
        .balance_receipt(station.branch, day(11))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored, settlement.carried);
}

#[tokio::test]
async fn empty_day_reports_only_the_carried_balance() {
    let station = Station::new().await;
    sell_oil(&station, day(8), "300").await;
    station.engine.settle_day(station.branch, day(8)).await.unwrap();

    let report = station
        .engine
        .daily_report(station.branch, day(10))
        .await
        .unwrap();
    assert_eq!(report.total_sale, Money::ZERO);
    assert_eq!(report.total_expense, Money::ZERO);
    assert_eq!(report.cash_balance, report.total_balance_receipt);
    assert_eq!(report.cash_balance, money("300"));

    let quiet = station
        .engine
        .carry_forward(station.branch, day(12))
        .await
        .unwrap();
    assert_eq!(quiet.amount, Money::ZERO);
}

#[tokio::test]
async fn report_breaks_down_fuel_and_payment_methods() {
    let station = Station::new().await;
    station
        .engine
        .submit_readings(
            BulkReadingsCmd::new(station.branch, day(10))
                .item(ReadingItem::new(station.petrol).closing(vol("150")))
                .item(ReadingItem::new(station.diesel).closing(vol("210"))),
        )
        .await
        .unwrap();
    station
        .engine
        .record_oil_sale(OilSaleCmd::new(
            station.branch,
            day(10),
            "2T oil",
            vol("2.5"),
            money("120.30"),
        ))
        .await
        .unwrap();
    let sale = station
        .engine
        .record_sale(
            SaleCmd::new(station.branch, day(10))
                .atm(money("1000"))
                .paytm(money("500"))
                .fleet(money("250")),
        )
        .await
        .unwrap();
    // 4775.00 petrol + 890.00 diesel + 300.75 oil
    assert_eq!(sale.rate, money("5965.75"));
    assert_eq!(sale.cash(), money("4215.75"));

    station
        .engine
        .record_credit(
            CreditCmd::new(station.branch, day(10), "Ravi Transport", money("800"))
                .note("fleet card pending"),
        )
        .await
        .unwrap();
    station
        .engine
        .record_customer_payment(
            CustomerPaymentCmd::new(station.branch, day(10), "Ravi Transport", money("300"))
                .method("upi"),
        )
        .await
        .unwrap();
    station
        .engine
        .record_bank_deposit(
            BankDepositCmd::new(station.branch, day(10), "State Bank", money("2000"))
                .reference("DEP-1"),
        )
        .await
        .unwrap();

    let report = station
        .engine
        .daily_report(station.branch, day(10))
        .await
        .unwrap();
    assert_eq!(report.fuel["petrol"].volume, vol("50"));
    assert_eq!(report.fuel["petrol"].revenue, money("4775"));
    assert_eq!(report.fuel["diesel"].revenue, money("890"));
    assert_eq!(report.fuel_revenue, money("5665"));
    assert_eq!(report.oil_revenue, money("300.75"));
    assert_eq!(report.atm, money("1000"));
    assert_eq!(report.cash, money("4215.75"));
    assert_eq!(report.total_credit, money("800"));
    assert_eq!(report.total_customer_payment, money("300"));
    assert_eq!(report.total_bank_deposit, money("2000"));
    assert_eq!(report.sales_and_balance_receipt, money("6265.75"));
    // credits, payments and deposits do not move the cash balance
    assert_eq!(report.cash_balance, money("5965.75"));
    assert_eq!(report.meter_readings.len(), 2);
    assert_eq!(report.oil_sales.len(), 1);
    assert_eq!(report.credits[0].note.as_deref(), Some("fleet card pending"));
}

#[tokio::test]
async fn sale_splits_cannot_exceed_the_day_total() {
    let station = Station::new().await;
    sell_oil(&station, day(10), "100").await;

    let over = station
        .engine
        .record_sale(SaleCmd::new(station.branch, day(10)).atm(money("100.01")))
        .await
        .unwrap_err();
    assert!(matches!(over, EngineError::Validation(_)));

    let negative = station
        .engine
        .record_sale(SaleCmd::new(station.branch, day(10)).fleet(money("-1")))
        .await
        .unwrap_err();
    assert!(matches!(negative, EngineError::Validation(_)));
}

#[tokio::test]
async fn stream_amounts_must_be_positive() {
    let station = Station::new().await;
    let zero = station
        .engine
        .record_expense(ExpenseCmd::new(station.branch, day(10), "misc", Money::ZERO))
        .await
        .unwrap_err();
    assert!(matches!(zero, EngineError::Validation(_)));

    let negative = station
        .engine
        .record_bank_deposit(BankDepositCmd::new(
            station.branch,
            day(10),
            "State Bank",
            money("-5"),
        ))
        .await
        .unwrap_err();
    assert!(matches!(negative, EngineError::Validation(_)));
}

#[tokio::test]
async fn unknown_branch_is_not_found() {
    let station = Station::new().await;
    let err = station
        .engine
        .daily_report(uuid::Uuid::new_v4(), day(10))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}
