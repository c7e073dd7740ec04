//! Defines the endpoint for the income and expense statistics.

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::{
    Error,
    app_state::StoreState,
    extract::QueryParams,
    record::parse_date_range,
    stats::aggregation::{Summary, get_summary},
};

/// The query string for the statistics, both dates are needed to restrict the range.
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// A route handler for the total income, total expense, balance and the
/// expenses per category.
pub async fn get_stats_endpoint(
    State(state): State<StoreState>,
    QueryParams(query): QueryParams<StatsQuery>,
) -> Result<Json<Summary>, Error> {
    let connection = state.store.lock()?;
    let date_range = parse_date_range(query.start_date.as_deref(), query.end_date.as_deref())?;

    let summary = get_summary(date_range.as_ref(), &connection).inspect_err(|error| {
        tracing::error!("Could not compute statistics for {date_range:?}: {error}");
    })?;

    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, response::IntoResponse};
    use serde_json::json;
    use time::macros::date;

    use crate::{
        Error,
        extract::QueryParams,
        record::{NewRecord, RecordType, create_record},
        test_utils::{TEST_NOW, json_body, must_create_store_state},
    };

    use super::{StatsQuery, get_stats_endpoint};

    #[tokio::test]
    async fn responds_with_summary_json() {
        let state = must_create_store_state();
        create_record(
            NewRecord::build(RecordType::Expense, 100.0, "food", date!(2024 - 01 - 15)),
            TEST_NOW,
            &state.store.lock().unwrap(),
        )
        .unwrap();
        let query = StatsQuery {
            start_date: Some("2024-01-01".to_owned()),
            end_date: Some("2024-01-31".to_owned()),
        };

        let response = get_stats_endpoint(State(state), QueryParams(query))
            .await
            .into_response();

        assert_eq!(
            json_body(response).await,
            json!({
                "total_income": 0.0,
                "total_expense": 100.0,
                "balance": -100.0,
                "category_stats": [{ "_id": "food", "total": 100.0 }],
            })
        );
    }

    #[tokio::test]
    async fn rejects_invalid_dates() {
        let state = must_create_store_state();
        let query = StatsQuery {
            start_date: Some("January".to_owned()),
            end_date: Some("2024-01-31".to_owned()),
        };

        let result = get_stats_endpoint(State(state), QueryParams(query)).await;

        assert_eq!(
            result.err(),
            Some(Error::InvalidDate("January".to_owned()))
        );
    }
}
