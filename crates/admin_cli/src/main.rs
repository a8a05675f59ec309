use std::error::Error;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use engine::{DailyReport, Engine, Money, Volume};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "fuelday_admin")]
#[command(about = "Operator utilities for Fuelday (roster setup, reports, settlement)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./fuelday.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply pending migrations and exit.
    Migrate,
    Branch(Branch),
    FuelProduct(FuelProduct),
    Tank(Tank),
    Machine(Machine),
    Nozzle(Nozzle),
    /// Print the settlement report of a branch/day.
    Report(DayArgs),
    /// Settle a day and write its cash balance as the next day's receipt.
    CarryForward(DayArgs),
    /// Print the current tank levels of a branch.
    Tanks(BranchArgs),
}

#[derive(Args, Debug)]
struct Branch {
    #[command(subcommand)]
    command: BranchCommand,
}

#[derive(Subcommand, Debug)]
enum BranchCommand {
    Create(BranchCreateArgs),
    List,
}

#[derive(Args, Debug)]
struct BranchCreateArgs {
    #[arg(long)]
    name: String,
}

#[derive(Args, Debug)]
struct FuelProduct {
    #[command(subcommand)]
    command: FuelProductCommand,
}

#[derive(Subcommand, Debug)]
enum FuelProductCommand {
    /// Add a fuel type or change its selling price.
    Set(FuelProductSetArgs),
}

#[derive(Args, Debug)]
struct FuelProductSetArgs {
    #[arg(long)]
    branch: Uuid,
    #[arg(long)]
    fuel_type: String,
    /// Selling price per unit, e.g. `95.50`.
    #[arg(long)]
    price: Money,
}

#[derive(Args, Debug)]
struct Tank {
    #[command(subcommand)]
    command: TankCommand,
}

#[derive(Subcommand, Debug)]
enum TankCommand {
    Create(TankCreateArgs),
}

#[derive(Args, Debug)]
struct TankCreateArgs {
    #[arg(long)]
    branch: Uuid,
    #[arg(long)]
    fuel_type: String,
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "0")]
    opening_level: Volume,
}

#[derive(Args, Debug)]
struct Machine {
    #[command(subcommand)]
    command: MachineCommand,
}

#[derive(Subcommand, Debug)]
enum MachineCommand {
    Create(MachineCreateArgs),
}

#[derive(Args, Debug)]
struct MachineCreateArgs {
    #[arg(long)]
    branch: Uuid,
    #[arg(long)]
    name: String,
}

#[derive(Args, Debug)]
struct Nozzle {
    #[command(subcommand)]
    command: NozzleCommand,
}

#[derive(Subcommand, Debug)]
enum NozzleCommand {
    Create(NozzleCreateArgs),
}

#[derive(Args, Debug)]
struct NozzleCreateArgs {
    #[arg(long)]
    machine: Uuid,
    #[arg(long)]
    fuel_type: String,
    #[arg(long, default_value = "0")]
    initial_reading: Volume,
}

#[derive(Args, Debug)]
struct BranchArgs {
    #[arg(long)]
    branch: Uuid,
}

#[derive(Args, Debug)]
struct DayArgs {
    #[arg(long)]
    branch: Uuid,
    /// Business day, `YYYY-MM-DD`.
    #[arg(long)]
    date: NaiveDate,
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

fn print_line(label: &str, value: impl std::fmt::Display) {
    println!("  {label:<20} {:>14}", value.to_string());
}

fn print_report(report: &DailyReport) {
    println!("report {} {}", report.branch_id, report.date);
    for (fuel_type, summary) in &report.fuel {
        println!(
            "  {fuel_type:<20} {:>14} {:>14}",
            summary.volume.to_string(),
            summary.revenue.to_string()
        );
    }
    print_line("oil revenue", report.oil_revenue);
    print_line("total sale", report.total_sale);
    print_line("  atm", report.atm);
    print_line("  paytm", report.paytm);
    print_line("  fleet", report.fleet);
    print_line("  cash", report.cash);
    print_line("balance receipt", report.total_balance_receipt);
    print_line("sales + receipt", report.sales_and_balance_receipt);
    print_line("expenses", report.total_expense);
    print_line("purchases", report.total_purchase);
    print_line("credits", report.total_credit);
    print_line("customer payments", report.total_customer_payment);
    print_line("bank deposits", report.total_bank_deposit);
    print_line("cash balance", report.cash_balance);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::Migrate => {
            println!("database is up to date");
        }
        Command::Branch(Branch {
            command: BranchCommand::Create(args),
        }) => {
            let branch_id = engine.new_branch(&args.name).await?;
            println!("created branch: {} ({branch_id})", args.name);
        }
        Command::Branch(Branch {
            command: BranchCommand::List,
        }) => {
            for branch in engine.branches().await? {
                println!("{} {}", branch.id, branch.name);
            }
        }
        Command::FuelProduct(FuelProduct {
            command: FuelProductCommand::Set(args),
        }) => {
            let product = engine
                .upsert_fuel_product(args.branch, &args.fuel_type, args.price)
                .await?;
            println!(
                "fuel product {} at {} ({})",
                product.fuel_type, product.selling_price, product.id
            );
        }
        Command::Tank(Tank {
            command: TankCommand::Create(args),
        }) => {
            let tank = engine
                .new_tank(args.branch, &args.fuel_type, &args.name, args.opening_level)
                .await?;
            println!(
                "created tank: {} for {} at {} ({})",
                tank.tank_name, tank.fuel_type, tank.current_level, tank.id
            );
        }
        Command::Machine(Machine {
            command: MachineCommand::Create(args),
        }) => {
            let machine_id = engine.new_machine(args.branch, &args.name).await?;
            println!("created machine: {} ({machine_id})", args.name);
        }
        Command::Nozzle(Nozzle {
            command: NozzleCommand::Create(args),
        }) => {
            let nozzle = engine
                .new_nozzle(args.machine, &args.fuel_type, args.initial_reading)
                .await?;
            println!("created nozzle: {} ({})", nozzle.fuel_type, nozzle.id);
        }
        Command::Report(args) => {
            let report = engine.daily_report(args.branch, args.date).await?;
            print_report(&report);
        }
        Command::CarryForward(args) => {
            let receipt = engine.carry_forward(args.branch, args.date).await?;
            println!(
                "carried {} into {} ({})",
                receipt.amount, receipt.date, receipt.id
            );
        }
        Command::Tanks(args) => {
            for (fuel_type, level) in engine.tank_levels(args.branch).await? {
                println!(
                    "{fuel_type:<12} {:<20} {:>14}",
                    level.tank_name,
                    level.current_level.to_string()
                );
            }
        }
    }

    Ok(())
}
