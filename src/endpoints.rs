//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/goals/{record_id}', use [format_endpoint].

/// The root route which redirects to the transactions page.
pub const ROOT: &str = "/";
/// The page for displaying and editing a user's transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for displaying and editing a user's savings goals.
pub const GOALS_VIEW: &str = "/goals";
/// The page for requesting generated insights.
pub const INSIGHTS_VIEW: &str = "/insights";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/api/coffee";
/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to access users.
pub const USERS: &str = "/api/users";

/// The route to create transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to replace or delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{record_id}";
/// The route for the form pre-filled with an existing transaction.
pub const EDIT_TRANSACTION_FORM: &str = "/api/transactions/{record_id}/edit";
/// The route for an empty transaction form.
pub const TRANSACTION_FORM: &str = "/api/transactions/form";
/// The server-sent event stream of the rendered transaction list.
pub const TRANSACTIONS_STREAM: &str = "/api/transactions/stream";

/// The route to create goals.
pub const GOALS_API: &str = "/api/goals";
/// The route to replace or delete a single goal.
pub const GOAL: &str = "/api/goals/{record_id}";
/// The route for the form pre-filled with an existing goal.
pub const EDIT_GOAL_FORM: &str = "/api/goals/{record_id}/edit";
/// The route for an empty goal form.
pub const GOAL_FORM: &str = "/api/goals/form";
/// The server-sent event stream of the rendered goal list.
pub const GOALS_STREAM: &str = "/api/goals/stream";

/// The route that asks the analysis service for new insights.
pub const INSIGHTS_API: &str = "/api/insights";

/// The analysis service route, served by the `analyzer` binary.
pub const ANALYZE: &str = "/analyze";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
