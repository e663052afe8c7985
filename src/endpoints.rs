//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/expenses/{expense_id}/edit', use [format_endpoint].

/// The root route which redirects to the expenses page.
pub const ROOT: &str = "/";
/// The page for browsing, filtering and summarising expenses.
pub const EXPENSES_VIEW: &str = "/expenses";
/// The page for recording a new expense.
pub const NEW_EXPENSE_VIEW: &str = "/expenses/new";
/// The page for editing an existing expense.
pub const EDIT_EXPENSE_VIEW: &str = "/expenses/{expense_id}/edit";
/// The page for listing and creating categories.
pub const CATEGORIES_VIEW: &str = "/categories";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to create an expense.
pub const POST_EXPENSE: &str = "/api/expenses";
/// The route to update an expense.
pub const PUT_EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route to delete an expense.
pub const DELETE_EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route to download the filtered expenses as CSV.
pub const EXPORT_EXPENSES: &str = "/api/expenses/export";
/// The route to create a category.
pub const POST_CATEGORY: &str = "/api/categories";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/expenses/{expense_id}', '{expense_id}' is the parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
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

/// Return `redirect_url` if it is a path on this site, otherwise `default`.
///
/// Browsers treat a backslash like a forward slash, so "/\host" is rejected
/// along with "//host" and absolute URLs.
pub fn local_redirect_url(redirect_url: Option<String>, default: &str) -> String {
    redirect_url
        .filter(|url| url.starts_with('/') && !url.starts_with("//") && !url.contains('\\'))
        .unwrap_or_else(|| default.to_owned())
}
