//! Income and expense records.
//!
//! This module contains everything related to records:
//! - The `Record` model and the types used to create, change and select records
//! - Database functions for storing, querying, and removing records
//! - Route handlers for the record endpoints

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod form;
mod list_endpoint;

pub use core::{NewRecord, Record, RecordType, create_record, create_record_table};
#[cfg(test)]
pub use core::get_record;
pub use create_endpoint::create_record_endpoint;
pub use delete_endpoint::delete_record_endpoint;
pub use edit_endpoint::edit_record_endpoint;
pub use form::parse_date_range;
pub use list_endpoint::list_records_endpoint;
