//! Initial schema.
//!
//! - `branches`, `fuel_products`, `tanks`, `machines`, `nozzles`: the roster
//! - `meter_readings`: one row per nozzle and date
//! - `sales`, `oil_sales`, `purchases`, `expenses`, `credits`,
//!   `customer_payments`, `bank_deposits`: daily transaction streams
//! - `balance_receipts`: balance carried into a day
//!
//! Volumes are stored in thousandths (`*_milli`), money in minor units
//! (`*_minor`).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Branches {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum FuelProducts {
    Table,
    Id,
    BranchId,
    FuelType,
    SellingPriceMinor,
}

#[derive(Iden)]
enum Tanks {
    Table,
    Id,
    BranchId,
    FuelType,
    TankName,
    CurrentLevelMilli,
}

#[derive(Iden)]
enum Machines {
    Table,
    Id,
    BranchId,
    Name,
}

#[derive(Iden)]
enum Nozzles {
    Table,
    Id,
    MachineId,
    BranchId,
    FuelType,
    LastClosingMilli,
    LastReadingDate,
    Version,
}

#[derive(Iden)]
enum MeterReadings {
    Table,
    Id,
    BranchId,
    NozzleId,
    Date,
    FuelType,
    OpeningMilli,
    ClosingMilli,
    FuelRateMinor,
    SaleVolumeMilli,
    TotalAmountMinor,
}

#[derive(Iden)]
enum Sales {
    Table,
    Id,
    BranchId,
    Date,
    RateMinor,
    AtmMinor,
    PaytmMinor,
    FleetMinor,
}

#[derive(Iden)]
enum OilSales {
    Table,
    Id,
    BranchId,
    Date,
    ProductName,
    QuantityMilli,
    UnitPriceMinor,
    AmountMinor,
}

#[derive(Iden)]
enum Purchases {
    Table,
    Id,
    BranchId,
    Date,
    FuelType,
    QuantityMilli,
    PurchasePriceMinor,
    Invoice,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    BranchId,
    Date,
    Category,
    Description,
    AmountMinor,
}

#[derive(Iden)]
enum Credits {
    Table,
    Id,
    BranchId,
    Date,
    CustomerName,
    Note,
    AmountMinor,
}

#[derive(Iden)]
enum CustomerPayments {
    Table,
    Id,
    BranchId,
    Date,
    CustomerName,
    Method,
    AmountMinor,
}

#[derive(Iden)]
enum BankDeposits {
    Table,
    Id,
    BranchId,
    Date,
    BankName,
    Reference,
    AmountMinor,
}

#[derive(Iden)]
enum BalanceReceipts {
    Table,
    Id,
    BranchId,
    Date,
    AmountMinor,
}

/// Index on `(branch_id, date)`, the key every daily query filters on.
fn branch_day_index<T>(name: &str, table: T, branch_id: T, date: T, unique: bool) -> IndexCreateStatement
where
    T: Iden + 'static,
{
    let mut index = Index::create();
    index.name(name).table(table).col(branch_id).col(date);
    if unique {
        index.unique();
    }
    index.to_owned()
}

fn branch_fk<T>(name: &str, table: T, branch_id: T) -> ForeignKeyCreateStatement
where
    T: Iden + 'static,
{
    ForeignKey::create()
        .name(name)
        .from(table, branch_id)
        .to(Branches::Table, Branches::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .to_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Roster
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Branches::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Branches::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Branches::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FuelProducts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FuelProducts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FuelProducts::BranchId).string().not_null())
                    .col(ColumnDef::new(FuelProducts::FuelType).string().not_null())
                    .col(
                        ColumnDef::new(FuelProducts::SellingPriceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(&mut branch_fk(
                        "fk-fuel_products-branch_id",
                        FuelProducts::Table,
                        FuelProducts::BranchId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-fuel_products-branch_id-fuel_type-unique")
                    .table(FuelProducts::Table)
                    .col(FuelProducts::BranchId)
                    .col(FuelProducts::FuelType)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tanks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tanks::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Tanks::BranchId).string().not_null())
                    .col(ColumnDef::new(Tanks::FuelType).string().not_null())
                    .col(ColumnDef::new(Tanks::TankName).string().not_null())
                    .col(
                        ColumnDef::new(Tanks::CurrentLevelMilli)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(&mut branch_fk(
                        "fk-tanks-branch_id",
                        Tanks::Table,
                        Tanks::BranchId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-tanks-branch_id-fuel_type-unique")
                    .table(Tanks::Table)
                    .col(Tanks::BranchId)
                    .col(Tanks::FuelType)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Machines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Machines::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Machines::BranchId).string().not_null())
                    .col(ColumnDef::new(Machines::Name).string().not_null())
                    .foreign_key(&mut branch_fk(
                        "fk-machines-branch_id",
                        Machines::Table,
                        Machines::BranchId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Nozzles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Nozzles::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Nozzles::MachineId).string().not_null())
                    .col(ColumnDef::new(Nozzles::BranchId).string().not_null())
                    .col(ColumnDef::new(Nozzles::FuelType).string().not_null())
                    .col(
                        ColumnDef::new(Nozzles::LastClosingMilli)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Nozzles::LastReadingDate).date())
                    .col(
                        ColumnDef::new(Nozzles::Version)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-nozzles-machine_id")
                            .from(Nozzles::Table, Nozzles::MachineId)
                            .to(Machines::Table, Machines::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(&mut branch_fk(
                        "fk-nozzles-branch_id",
                        Nozzles::Table,
                        Nozzles::BranchId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-nozzles-branch_id")
                    .table(Nozzles::Table)
                    .col(Nozzles::BranchId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Meter readings
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(MeterReadings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MeterReadings::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MeterReadings::BranchId).string().not_null())
                    .col(ColumnDef::new(MeterReadings::NozzleId).string().not_null())
                    .col(ColumnDef::new(MeterReadings::Date).date().not_null())
                    .col(ColumnDef::new(MeterReadings::FuelType).string().not_null())
                    .col(
                        ColumnDef::new(MeterReadings::OpeningMilli)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MeterReadings::ClosingMilli)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MeterReadings::FuelRateMinor).big_integer())
                    .col(
                        ColumnDef::new(MeterReadings::SaleVolumeMilli)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MeterReadings::TotalAmountMinor).big_integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-meter_readings-nozzle_id")
                            .from(MeterReadings::Table, MeterReadings::NozzleId)
                            .to(Nozzles::Table, Nozzles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(&mut branch_fk(
                        "fk-meter_readings-branch_id",
                        MeterReadings::Table,
                        MeterReadings::BranchId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-meter_readings-nozzle_id-date-unique")
                    .table(MeterReadings::Table)
                    .col(MeterReadings::NozzleId)
                    .col(MeterReadings::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(branch_day_index(
                "idx-meter_readings-branch_id-date",
                MeterReadings::Table,
                MeterReadings::BranchId,
                MeterReadings::Date,
                false,
            ))
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Daily streams
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Sales::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sales::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Sales::BranchId).string().not_null())
                    .col(ColumnDef::new(Sales::Date).date().not_null())
                    .col(ColumnDef::new(Sales::RateMinor).big_integer().not_null())
                    .col(
                        ColumnDef::new(Sales::AtmMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Sales::PaytmMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Sales::FleetMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(&mut branch_fk(
                        "fk-sales-branch_id",
                        Sales::Table,
                        Sales::BranchId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(branch_day_index(
                "idx-sales-branch_id-date-unique",
                Sales::Table,
                Sales::BranchId,
                Sales::Date,
                true,
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OilSales::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OilSales::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OilSales::BranchId).string().not_null())
                    .col(ColumnDef::new(OilSales::Date).date().not_null())
                    .col(ColumnDef::new(OilSales::ProductName).string().not_null())
                    .col(
                        ColumnDef::new(OilSales::QuantityMilli)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OilSales::UnitPriceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OilSales::AmountMinor).big_integer().not_null())
                    .foreign_key(&mut branch_fk(
                        "fk-oil_sales-branch_id",
                        OilSales::Table,
                        OilSales::BranchId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(branch_day_index(
                "idx-oil_sales-branch_id-date",
                OilSales::Table,
                OilSales::BranchId,
                OilSales::Date,
                false,
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Purchases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Purchases::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Purchases::BranchId).string().not_null())
                    .col(ColumnDef::new(Purchases::Date).date().not_null())
                    .col(ColumnDef::new(Purchases::FuelType).string().not_null())
                    .col(
                        ColumnDef::new(Purchases::QuantityMilli)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Purchases::PurchasePriceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Purchases::Invoice).string())
                    .foreign_key(&mut branch_fk(
                        "fk-purchases-branch_id",
                        Purchases::Table,
                        Purchases::BranchId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(branch_day_index(
                "idx-purchases-branch_id-date",
                Purchases::Table,
                Purchases::BranchId,
                Purchases::Date,
                false,
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::BranchId).string().not_null())
                    .col(ColumnDef::new(Expenses::Date).date().not_null())
                    .col(ColumnDef::new(Expenses::Category).string().not_null())
                    .col(ColumnDef::new(Expenses::Description).string())
                    .col(ColumnDef::new(Expenses::AmountMinor).big_integer().not_null())
                    .foreign_key(&mut branch_fk(
                        "fk-expenses-branch_id",
                        Expenses::Table,
                        Expenses::BranchId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(branch_day_index(
                "idx-expenses-branch_id-date",
                Expenses::Table,
                Expenses::BranchId,
                Expenses::Date,
                false,
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Credits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Credits::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Credits::BranchId).string().not_null())
                    .col(ColumnDef::new(Credits::Date).date().not_null())
                    .col(ColumnDef::new(Credits::CustomerName).string().not_null())
                    .col(ColumnDef::new(Credits::Note).string())
                    .col(ColumnDef::new(Credits::AmountMinor).big_integer().not_null())
                    .foreign_key(&mut branch_fk(
                        "fk-credits-branch_id",
                        Credits::Table,
                        Credits::BranchId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(branch_day_index(
                "idx-credits-branch_id-date",
                Credits::Table,
                Credits::BranchId,
                Credits::Date,
                false,
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CustomerPayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CustomerPayments::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CustomerPayments::BranchId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CustomerPayments::Date).date().not_null())
                    .col(
                        ColumnDef::new(CustomerPayments::CustomerName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CustomerPayments::Method).string())
                    .col(
                        ColumnDef::new(CustomerPayments::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(&mut branch_fk(
                        "fk-customer_payments-branch_id",
                        CustomerPayments::Table,
                        CustomerPayments::BranchId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(branch_day_index(
                "idx-customer_payments-branch_id-date",
                CustomerPayments::Table,
                CustomerPayments::BranchId,
                CustomerPayments::Date,
                false,
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BankDeposits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BankDeposits::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BankDeposits::BranchId).string().not_null())
                    .col(ColumnDef::new(BankDeposits::Date).date().not_null())
                    .col(ColumnDef::new(BankDeposits::BankName).string().not_null())
                    .col(ColumnDef::new(BankDeposits::Reference).string())
                    .col(
                        ColumnDef::new(BankDeposits::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(&mut branch_fk(
                        "fk-bank_deposits-branch_id",
                        BankDeposits::Table,
                        BankDeposits::BranchId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(branch_day_index(
                "idx-bank_deposits-branch_id-date",
                BankDeposits::Table,
                BankDeposits::BranchId,
                BankDeposits::Date,
                false,
            ))
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Balance receipts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(BalanceReceipts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BalanceReceipts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BalanceReceipts::BranchId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BalanceReceipts::Date).date().not_null())
                    .col(
                        ColumnDef::new(BalanceReceipts::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(&mut branch_fk(
                        "fk-balance_receipts-branch_id",
                        BalanceReceipts::Table,
                        BalanceReceipts::BranchId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(branch_day_index(
                "idx-balance_receipts-branch_id-date-unique",
                BalanceReceipts::Table,
                BalanceReceipts::BranchId,
                BalanceReceipts::Date,
                true,
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(BalanceReceipts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BankDeposits::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CustomerPayments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Credits::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Purchases::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OilSales::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sales::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MeterReadings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Nozzles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Machines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tanks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FuelProducts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Branches::Table).to_owned())
            .await?;
        Ok(())
    }
}
