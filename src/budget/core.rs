//! Defines the budget model and the database queries for budgets.

use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;
use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::Error;

/// Spending limits, usually an object from category name to limit.
///
/// The limits are stored as given, the application does not interpret them.
pub type BudgetLimits = Value;

/// The budget for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Budget {
    /// The month the budget applies to, formatted as `YYYY-MM`.
    pub month: String,
    /// The limits by category.
    pub budget: BudgetLimits,
}

pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
            month TEXT PRIMARY KEY,
            budget TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Get the budget for `month`, with no limits if none has been saved yet.
///
/// # Errors
/// Returns an error if the query fails or the stored limits are not valid JSON.
pub fn get_budget(month: &str, connection: &Connection) -> Result<Budget, Error> {
    let stored: Option<String> = connection
        .query_row(
            "SELECT budget FROM budget WHERE month = ?1",
            [month],
            |row| row.get(0),
        )
        .optional()?;

    let budget = match stored {
        Some(text) => serde_json::from_str(&text)
            .map_err(|error| Error::JSONSerializationError(error.to_string()))?,
        None => Value::Object(Map::new()),
    };

    Ok(Budget {
        month: month.to_owned(),
        budget,
    })
}

/// Create or replace the budget for `month` in a single statement.
///
/// # Errors
/// Returns an error if the limits cannot be serialized or the statement fails.
pub fn upsert_budget(
    month: &str,
    limits: &BudgetLimits,
    updated_at: OffsetDateTime,
    connection: &Connection,
) -> Result<(), Error> {
    let limits = serde_json::to_string(limits)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    connection.execute(
        "INSERT INTO budget (month, budget, updated_at) VALUES (?1, ?2, ?3)
        ON CONFLICT(month) DO UPDATE SET budget = excluded.budget, updated_at = excluded.updated_at",
        (month, limits, updated_at),
    )?;

    Ok(())
}
