use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use serde_json::json;
use time::{Duration, OffsetDateTime};

use bookkeeper_rs::{
    BudgetLimits, NewRecord, RecordType, create_record, initialize_db, month_key, upsert_budget,
};

/// A utility for creating a test database for the REST API server of bookkeeper_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let now = OffsetDateTime::now_utc();
    let today = now.date();

    println!("Creating sample records...");

    let records = [
        NewRecord::build(RecordType::Income, 5200.0, "salary", today - Duration::days(14))
            .description("Monthly salary")
            .recurring(Some("monthly")),
        NewRecord::build(RecordType::Expense, 1800.0, "rent", today - Duration::days(13))
            .recurring(Some("monthly")),
        NewRecord::build(RecordType::Expense, 142.35, "food", today - Duration::days(9))
            .description("Weekly groceries"),
        NewRecord::build(RecordType::Expense, 58.0, "transport", today - Duration::days(6)),
        NewRecord::build(RecordType::Expense, 37.5, "food", today - Duration::days(2))
            .description("Dinner out"),
        NewRecord::build(RecordType::Income, 120.0, "other", today - Duration::days(1))
            .description("Sold an old bike"),
    ];

    for record in records {
        create_record(record, now, &conn)?;
    }

    println!("Creating budget for {}...", month_key(today));

    let limits: BudgetLimits = json!({ "food": 600, "transport": 150, "rent": 1800 });
    upsert_budget(&month_key(today), &limits, now, &conn)?;

    println!("Success!");

    Ok(())
}
