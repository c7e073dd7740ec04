//! Income and expense totals over a date range.
//!
//! The sums and the per-category grouping are computed by SQLite so that only
//! the totals leave the database. Nothing is cached, every call aggregates the
//! matching records from scratch.

use std::ops::RangeInclusive;

use rusqlite::Connection;
use serde::Serialize;
use time::Date;

use crate::{Error, record::RecordType};

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// The category name.
    #[serde(rename = "_id")]
    pub category: String,
    /// The sum of the expense amounts in the category.
    pub total: f64,
}

/// Income, expenses and the balance for a date range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_income: f64,
    pub total_expense: f64,
    /// `total_income - total_expense`.
    pub balance: f64,
    /// Expenses per category, largest total first.
    pub category_stats: Vec<CategoryTotal>,
}

/// Summarize the records dated within `date_range`, or all records if `None`.
///
/// # Errors
/// Returns [Error::SqlError] if any of the queries fail.
pub fn get_summary(
    date_range: Option<&RangeInclusive<Date>>,
    connection: &Connection,
) -> Result<Summary, Error> {
    let total_income = get_total(RecordType::Income, date_range, connection)?;
    let total_expense = get_total(RecordType::Expense, date_range, connection)?;
    let category_stats = get_expense_totals_by_category(date_range, connection)?;

    Ok(Summary {
        total_income,
        total_expense,
        balance: total_income - total_expense,
        category_stats,
    })
}

fn bounds(date_range: Option<&RangeInclusive<Date>>) -> (Option<Date>, Option<Date>) {
    match date_range {
        Some(range) => (Some(*range.start()), Some(*range.end())),
        None => (None, None),
    }
}

/// The sum of the amounts of every record of `record_type` in `date_range`, 0 if there are none.
fn get_total(
    record_type: RecordType,
    date_range: Option<&RangeInclusive<Date>>,
    connection: &Connection,
) -> Result<f64, Error> {
    let (start_date, end_date) = bounds(date_range);

    connection
        .prepare(
            "SELECT COALESCE(SUM(amount), 0) FROM record \
            WHERE type = ?1 AND (?2 IS NULL OR date BETWEEN ?2 AND ?3)",
        )?
        .query_row((record_type, start_date, end_date), |row| row.get(0))
        .map_err(Error::from)
}

/// The expense totals per category, largest first.
///
/// Categories with equal totals are ordered by name.
fn get_expense_totals_by_category(
    date_range: Option<&RangeInclusive<Date>>,
    connection: &Connection,
) -> Result<Vec<CategoryTotal>, Error> {
    let (start_date, end_date) = bounds(date_range);

    connection
        .prepare(
            "SELECT category, SUM(amount) AS total FROM record \
            WHERE type = ?1 AND (?2 IS NULL OR date BETWEEN ?2 AND ?3) \
            GROUP BY category \
            ORDER BY total DESC, category ASC",
        )?
        .query_map((RecordType::Expense, start_date, end_date), |row| {
            Ok(CategoryTotal {
                category: row.get(0)?,
                total: row.get(1)?,
            })
        })?
        .map(|total_result| total_result.map_err(Error::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::{
        Date,
        macros::{date, datetime},
    };

    use crate::{
        db::initialize,
        record::{NewRecord, RecordType, create_record},
    };

    use super::{CategoryTotal, Summary, get_summary};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn insert(conn: &Connection, record_type: RecordType, amount: f64, category: &str, date: Date) {
        create_record(
            NewRecord::build(record_type, amount, category, date),
            datetime!(2024-03-01 00:00 UTC),
            conn,
        )
        .unwrap();
    }

    fn seed(conn: &Connection) {
        insert(conn, RecordType::Income, 3000.0, "salary", date!(2024 - 01 - 01));
        insert(conn, RecordType::Expense, 100.0, "food", date!(2024 - 01 - 15));
        insert(conn, RecordType::Expense, 50.5, "food", date!(2024 - 01 - 20));
        insert(conn, RecordType::Expense, 1200.0, "rent", date!(2024 - 01 - 31));
        insert(conn, RecordType::Expense, 30.0, "transport", date!(2024 - 02 - 02));
        insert(conn, RecordType::Income, 200.0, "gift", date!(2023 - 12 - 31));
    }

    #[test]
    fn empty_store_has_zero_totals() {
        let conn = get_test_connection();

        let got = get_summary(None, &conn).unwrap();

        assert_eq!(
            got,
            Summary {
                total_income: 0.0,
                total_expense: 0.0,
                balance: 0.0,
                category_stats: vec![],
            }
        );
    }

    #[test]
    fn summarizes_all_records_without_range() {
        let conn = get_test_connection();
        seed(&conn);

        let got = get_summary(None, &conn).unwrap();

        assert_eq!(got.total_income, 3200.0);
        assert_eq!(got.total_expense, 1380.5);
        assert_eq!(got.balance, 1819.5);
        assert_eq!(got.category_stats.len(), 3);
    }

    #[test]
    fn summarizes_records_in_range() {
        let conn = get_test_connection();
        seed(&conn);
        let range = date!(2024 - 01 - 01)..=date!(2024 - 01 - 31);

        let got = get_summary(Some(&range), &conn).unwrap();

        assert_eq!(
            got,
            Summary {
                total_income: 3000.0,
                total_expense: 1350.5,
                balance: 1649.5,
                category_stats: vec![
                    CategoryTotal {
                        category: "rent".to_owned(),
                        total: 1200.0
                    },
                    CategoryTotal {
                        category: "food".to_owned(),
                        total: 150.5
                    },
                ],
            }
        );
    }

    #[test]
    fn range_without_records_has_zero_totals() {
        let conn = get_test_connection();
        seed(&conn);
        let range = date!(2020 - 01 - 01)..=date!(2020 - 12 - 31);

        let got = get_summary(Some(&range), &conn).unwrap();

        assert_eq!(got.total_income, 0.0);
        assert_eq!(got.total_expense, 0.0);
        assert_eq!(got.balance, 0.0);
        assert!(got.category_stats.is_empty());
    }

    #[test]
    fn category_totals_are_sorted_and_add_up_to_total_expense() {
        let conn = get_test_connection();
        seed(&conn);

        let got = get_summary(None, &conn).unwrap();

        assert!(
            got.category_stats
                .windows(2)
                .all(|pair| pair[0].total >= pair[1].total),
            "category totals are not sorted: {:?}",
            got.category_stats
        );
        let category_sum: f64 = got.category_stats.iter().map(|stat| stat.total).sum();
        assert_eq!(category_sum, got.total_expense);
    }
}
