//! Request bodies and query strings for the record endpoints, and their
//! validation into the record models.

use std::ops::RangeInclusive;

use serde::{Deserialize, Deserializer};
use time::{Date, macros::format_description};

use crate::{
    Error,
    record::core::{NewRecord, RecordChanges, RecordFilter, RecordType},
};

/// An amount as sent by a client, either a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl AmountInput {
    /// Coerce the input into a non-negative, finite amount.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if the input is not a number, or is
    /// negative, infinite or NaN.
    pub fn to_amount(&self) -> Result<f64, Error> {
        let amount = match self {
            AmountInput::Number(number) => *number,
            AmountInput::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| Error::InvalidAmount(text.clone()))?,
            AmountInput::Other(value) => return Err(Error::InvalidAmount(value.to_string())),
        };

        if !amount.is_finite() || amount < 0.0 {
            return Err(Error::InvalidAmount(amount.to_string()));
        }

        Ok(amount)
    }
}

/// Parse a `YYYY-MM-DD` date.
///
/// # Errors
/// Returns [Error::InvalidDate] if `text` is not a valid date in that format.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .map_err(|_| Error::InvalidDate(text.to_owned()))
}

/// Build an inclusive date range from query parameters.
///
/// The range only applies when both ends are given and non-empty, otherwise
/// there is no date restriction.
pub fn parse_date_range(
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<Option<RangeInclusive<Date>>, Error> {
    match (start_date, end_date) {
        (Some(start), Some(end)) if !start.is_empty() && !end.is_empty() => {
            Ok(Some(parse_date(start)?..=parse_date(end)?))
        }
        _ => Ok(None),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

/// Distinguishes a field set to `null` (`Some(None)`) from a missing field (`None`).
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// The body of a request to create a record.
#[derive(Debug, Default, Deserialize)]
pub struct CreateRecordRequest {
    #[serde(rename = "type")]
    pub record_type: Option<String>,
    pub amount: Option<AmountInput>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub is_recurring: Option<bool>,
    pub recurring_type: Option<String>,
}

impl CreateRecordRequest {
    /// Check the required fields and convert the request into a [NewRecord].
    ///
    /// # Errors
    /// Returns:
    /// - [Error::EmptyBody] if no known field was sent,
    /// - [Error::MissingField] for the first missing field of `type`, `amount`, `category`, `date`,
    /// - [Error::InvalidRecordType], [Error::InvalidAmount] or [Error::InvalidDate] for bad values.
    pub fn into_new_record(self) -> Result<NewRecord, Error> {
        let Self {
            record_type,
            amount,
            category,
            date,
            description,
            is_recurring,
            recurring_type,
        } = self;

        if record_type.is_none()
            && amount.is_none()
            && category.is_none()
            && date.is_none()
            && description.is_none()
            && is_recurring.is_none()
            && recurring_type.is_none()
        {
            return Err(Error::EmptyBody);
        }

        let record_type = record_type.ok_or(Error::MissingField("type"))?;
        let amount = amount.ok_or(Error::MissingField("amount"))?;
        let category = category.ok_or(Error::MissingField("category"))?;
        let date = date.ok_or(Error::MissingField("date"))?;

        Ok(NewRecord {
            record_type: record_type.parse()?,
            amount: amount.to_amount()?,
            category,
            date: parse_date(&date)?,
            description: description.unwrap_or_default(),
            is_recurring: is_recurring.unwrap_or(false),
            recurring_type,
        })
    }
}

/// The body of a request to update a record, every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateRecordRequest {
    #[serde(rename = "type")]
    pub record_type: Option<String>,
    pub amount: Option<AmountInput>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub is_recurring: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub recurring_type: Option<Option<String>>,
}

impl UpdateRecordRequest {
    /// Validate the fields that were sent and convert them into [RecordChanges].
    ///
    /// # Errors
    /// Returns [Error::NoFieldsToUpdate] if no known field was sent, or a
    /// validation error for the first bad value.
    pub fn into_changes(self) -> Result<RecordChanges, Error> {
        let changes = RecordChanges {
            record_type: self
                .record_type
                .as_deref()
                .map(str::parse::<RecordType>)
                .transpose()?,
            amount: self
                .amount
                .as_ref()
                .map(AmountInput::to_amount)
                .transpose()?,
            category: self.category,
            date: self.date.as_deref().map(parse_date).transpose()?,
            description: self.description,
            is_recurring: self.is_recurring,
            recurring_type: self.recurring_type,
        };

        if changes.is_empty() {
            return Err(Error::NoFieldsToUpdate);
        }

        Ok(changes)
    }
}

/// The query string for listing records.
#[derive(Debug, Default, Deserialize)]
pub struct ListRecordsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(rename = "type")]
    pub record_type: Option<String>,
    pub category: Option<String>,
}

impl ListRecordsQuery {
    /// Convert the query into a [RecordFilter], empty parameters are ignored.
    ///
    /// # Errors
    /// Returns [Error::InvalidDate] or [Error::InvalidRecordType] for bad values.
    pub fn into_filter(self) -> Result<RecordFilter, Error> {
        Ok(RecordFilter {
            date_range: parse_date_range(self.start_date.as_deref(), self.end_date.as_deref())?,
            record_type: non_empty(self.record_type)
                .as_deref()
                .map(str::parse::<RecordType>)
                .transpose()?,
            category: non_empty(self.category),
        })
    }
}

#[cfg(test)]
mod amount_tests {
    use serde_json::json;

    use crate::Error;

    use super::AmountInput;

    fn amount_from(value: serde_json::Value) -> Result<f64, Error> {
        serde_json::from_value::<AmountInput>(value)
            .expect("every JSON value should decode")
            .to_amount()
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        assert_eq!(amount_from(json!(100)), Ok(100.0));
        assert_eq!(amount_from(json!(100.5)), Ok(100.5));
        assert_eq!(amount_from(json!(" 42.25 ")), Ok(42.25));
        assert_eq!(amount_from(json!(0)), Ok(0.0));
    }

    #[test]
    fn rejects_non_numeric_input() {
        assert_eq!(
            amount_from(json!("lots")),
            Err(Error::InvalidAmount("lots".to_owned()))
        );
        assert_eq!(
            amount_from(json!(true)),
            Err(Error::InvalidAmount("true".to_owned()))
        );
        assert!(amount_from(json!("NaN")).is_err());
    }

    #[test]
    fn rejects_negative_amounts() {
        assert_eq!(
            amount_from(json!(-5)),
            Err(Error::InvalidAmount("-5".to_owned()))
        );
    }
}

#[cfg(test)]
mod create_request_tests {
    use serde_json::json;
    use time::macros::date;

    use crate::{
        Error,
        record::core::{NewRecord, RecordType},
    };

    use super::CreateRecordRequest;

    fn new_record_from(value: serde_json::Value) -> Result<NewRecord, Error> {
        serde_json::from_value::<CreateRecordRequest>(value)
            .expect("request should decode")
            .into_new_record()
    }

    #[test]
    fn applies_defaults() {
        let got = new_record_from(json!({
            "type": "expense",
            "amount": "100",
            "category": "food",
            "date": "2024-01-15",
        }));

        assert_eq!(
            got,
            Ok(NewRecord::build(
                RecordType::Expense,
                100.0,
                "food",
                date!(2024 - 01 - 15)
            ))
        );
    }

    #[test]
    fn keeps_optional_fields() {
        let got = new_record_from(json!({
            "type": "income",
            "amount": 3000,
            "category": "salary",
            "date": "2024-01-01",
            "description": "January pay",
            "is_recurring": true,
            "recurring_type": "monthly",
        }))
        .unwrap();

        assert_eq!(got.description, "January pay");
        assert!(got.is_recurring);
        assert_eq!(got.recurring_type.as_deref(), Some("monthly"));
    }

    #[test]
    fn empty_body_is_rejected() {
        assert_eq!(new_record_from(json!({})), Err(Error::EmptyBody));
    }

    #[test]
    fn names_first_missing_field() {
        assert_eq!(
            new_record_from(json!({ "amount": 1, "category": "food", "date": "2024-01-15" })),
            Err(Error::MissingField("type"))
        );
        assert_eq!(
            new_record_from(json!({ "type": "expense", "category": "food", "date": "2024-01-15" })),
            Err(Error::MissingField("amount"))
        );
        assert_eq!(
            new_record_from(json!({ "type": "expense", "amount": 1, "date": "2024-01-15" })),
            Err(Error::MissingField("category"))
        );
        assert_eq!(
            new_record_from(json!({ "type": "expense", "amount": 1, "category": "food" })),
            Err(Error::MissingField("date"))
        );
    }

    #[test]
    fn rejects_unknown_type() {
        assert_eq!(
            new_record_from(json!({
                "type": "invalid_type",
                "amount": 1,
                "category": "food",
                "date": "2024-01-15",
            })),
            Err(Error::InvalidRecordType("invalid_type".to_owned()))
        );
    }

    #[test]
    fn rejects_bad_date() {
        assert_eq!(
            new_record_from(json!({
                "type": "expense",
                "amount": 1,
                "category": "food",
                "date": "15/01/2024",
            })),
            Err(Error::InvalidDate("15/01/2024".to_owned()))
        );
    }
}
