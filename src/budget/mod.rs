//! Monthly spending limits per category.

mod core;
mod get_endpoint;
mod set_endpoint;

pub use core::{BudgetLimits, create_budget_table, upsert_budget};
pub use get_endpoint::get_budget_endpoint;
pub use set_endpoint::set_budget_endpoint;
