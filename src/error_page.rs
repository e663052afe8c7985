//! Full-page error views (404 and 500).
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// A full HTML page describing an error and how the user may recover from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorPage {
    status: StatusCode,
    description: String,
    fix: String,
}

impl ErrorPage {
    /// The page for a resource that does not exist.
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            description: "Something's missing.".to_owned(),
            fix: "Sorry, we can't find that page. Head back to your expenses and try again."
                .to_owned(),
        }
    }

    /// The generic page for unexpected server-side failures.
    pub fn internal() -> Self {
        Self::internal_with(
            "Sorry, something went wrong.",
            "Try again later or check the server logs",
        )
    }

    /// A server-side failure with a custom description and fix.
    pub fn internal_with(description: &str, fix: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            description: description.to_owned(),
            fix: fix.to_owned(),
        }
    }
}

impl IntoResponse for ErrorPage {
    fn into_response(self) -> Response {
        let (title, header) = if self.status == StatusCode::NOT_FOUND {
            ("Not Found", "404")
        } else {
            ("Internal Server Error", "500")
        };

        let page = error_view(title, header, &self.description, &self.fix);

        (self.status, Html(page.into_string())).into_response()
    }
}

/// Fallback handler for unknown routes.
pub async fn get_404_not_found() -> Response {
    ErrorPage::not_found().into_response()
}
