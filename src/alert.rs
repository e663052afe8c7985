//! Alerts for displaying error messages to users.
//!
//! Alerts are rendered as HTML fragments that HTMX swaps into the
//! `#alert-container` element defined in [crate::html::base].

use axum::response::{Html, IntoResponse, Response};
use maud::{Markup, html};

const ERROR_ALERT_STYLE: &str = "flex items-start p-4 mb-4 text-red-800 border border-red-300 \
    rounded-lg bg-red-50 dark:bg-gray-800 dark:text-red-400 dark:border-red-800";

/// An alert message with optional details.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// An error message with extra details.
    Error {
        /// A short summary of what went wrong.
        message: String,
        /// What the user can do about it, or empty.
        details: String,
    },
}

impl Alert {
    fn to_markup(&self) -> Markup {
        let Alert::Error { message, details } = self;

        html!(
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div class=(ERROR_ALERT_STYLE) role="alert"
                {
                    div class="flex-1"
                    {
                        p class="font-medium" { (message) }

                        @if !details.is_empty() {
                            span class="text-sm" { (details) }
                        }
                    }

                    button
                        type="button"
                        class="ms-3 bg-transparent border-none cursor-pointer"
                        aria-label="Close"
                        onclick="this.closest('[role=alert]').remove()"
                    {
                        "×"
                    }
                }
            }
        )
    }

    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Html<String> {
        Html(self.to_markup().into_string())
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use scraper::Selector;

    use crate::{
        alert::Alert,
        test_utils::{assert_valid_html, parse_html_fragment},
    };

    #[tokio::test]
    async fn renders_message_and_details() {
        let response = Alert::Error {
            message: "Oh no".to_owned(),
            details: "Something broke".to_owned(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let text = html
            .select(&Selector::parse("[role=alert]").unwrap())
            .next()
            .expect("No alert found")
            .text()
            .collect::<String>();
        assert!(
            text.contains("Oh no"),
            "alert text {text:?} missing message"
        );
        assert!(
            text.contains("Something broke"),
            "alert text {text:?} missing details"
        );
    }

    #[tokio::test]
    async fn omits_empty_details() {
        let response = Alert::Error {
            message: "Oh no".to_owned(),
            details: String::new(),
        }
        .into_response();

        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        assert!(
            html.select(&Selector::parse("[role=alert] span").unwrap())
                .next()
                .is_none(),
            "empty details should not render a span"
        );
    }
}
