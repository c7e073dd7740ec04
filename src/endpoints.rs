//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/records/{record_id}', use [format_endpoint].

/// The route to list and create records.
pub const RECORDS: &str = "/admin/api/accounting/records";
/// The route to update and delete a single record.
pub const RECORD: &str = "/admin/api/accounting/records/{record_id}";
/// The route for the income and expense statistics.
pub const STATS: &str = "/admin/api/accounting/stats";
/// The route to get and set the budget of the current month.
pub const BUDGET: &str = "/admin/api/accounting/budget";
/// The liveness check, which does not need the admin secret.
pub const STATUS: &str = "/status";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter starts with a left brace and ends with a right brace, e.g.
/// '{record_id}' in '/records/{record_id}'. Only the first parameter is
/// replaced. If no parameter is found, the original `endpoint_path` is returned.
pub fn format_endpoint(endpoint_path: &str, id: &str) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
