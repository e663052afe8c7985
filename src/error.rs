//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{alert::Alert, category::CategoryId, error_page::ErrorPage};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// The category ID used to create or update an expense did not match a
    /// stored category.
    #[error("the category ID {0} does not refer to a valid category")]
    InvalidCategory(CategoryId),

    /// An expense amount was negative or not a finite number.
    #[error("{0} is not a valid amount, amounts must be zero or greater")]
    InvalidAmount(f64),

    /// A string did not name one of the known expense types.
    #[error("\"{0}\" is not a valid expense type")]
    InvalidExpenseType(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update an expense that does not exist
    #[error("tried to update an expense that is not in the database")]
    UpdateMissingExpense,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The filtered expenses could not be written as CSV.
    #[error("could not export expenses as CSV: {0}")]
    CsvExport(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::CsvExport(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => ErrorPage::not_found().into_response(),
            Error::DatabaseLockError => ErrorPage::internal().into_response(),
            Error::CsvExport(reason) => ErrorPage::internal_with(
                "Export Failed",
                &format!("The expenses could not be exported: {reason}. Please try again."),
            )
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                ErrorPage::internal().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::EmptyCategoryName => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid category name".to_owned(),
                    details: "Category names cannot be empty.".to_owned(),
                },
            ),
            Error::InvalidCategory(category_id) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid category".to_owned(),
                    details: format!("Could not find a category with the ID {category_id}"),
                },
            ),
            Error::InvalidAmount(amount) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid amount".to_owned(),
                    details: format!("{amount} is not a valid amount. Enter zero or more."),
                },
            ),
            Error::InvalidExpenseType(expense_type) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid expense type".to_owned(),
                    details: format!(
                        "\"{expense_type}\" is not an expense type. \
                        Choose one of Personal, Shared or For spouse."
                    ),
                },
            ),
            Error::UpdateMissingExpense => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update expense".to_owned(),
                    details: "The expense could not be found. \
                    It may have been deleted in another tab."
                        .to_owned(),
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Not found".to_owned(),
                    details: "The requested item could not be found.".to_owned(),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details:
                        "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::{
        Error,
        test_utils::{assert_valid_html, parse_html_fragment},
    };

    #[test]
    fn query_returned_no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[tokio::test]
    async fn validation_errors_are_bad_requests() {
        let cases = [
            Error::EmptyCategoryName,
            Error::InvalidCategory(42),
            Error::InvalidAmount(-1.0),
            Error::InvalidExpenseType("Business".to_owned()),
        ];

        for error in cases {
            let response = error.into_alert_response();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let html = parse_html_fragment(response).await;
            assert_valid_html(&html);
        }
    }

    #[test]
    fn update_missing_expense_is_not_found() {
        let response = Error::UpdateMissingExpense.into_alert_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn lock_error_is_internal_server_error() {
        let response = Error::DatabaseLockError.into_alert_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
