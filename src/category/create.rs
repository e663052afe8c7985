//! Category creation form and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    category::{CategoryName, create_category, domain::CategoryFormData},
    html::{BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryEndpointState {
    /// The database connection for reading and writing the ledger.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters for the category creation endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct QueryParams {
    /// The page to send the client to after the category is created.
    redirect_url: Option<String>,
}

/// Handle category creation form submission.
///
/// Submitting a name that already exists succeeds without creating a second
/// category.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryEndpointState>,
    Query(query_params): Query<QueryParams>,
    Form(new_category): Form<CategoryFormData>,
) -> Response {
    let redirect_url = redirect_url_or_default(query_params.redirect_url);

    let name = match CategoryName::new(&new_category.name) {
        Ok(name) => name,
        Err(error) => {
            return new_category_form_view(&redirect_url, &format!("Error: {error}"))
                .into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_category(name, &connection) {
        Ok(category) => {
            tracing::info!(
                "category \"{}\" is available with ID {}",
                category.name,
                category.id
            );
            (HxRedirect(redirect_url), StatusCode::SEE_OTHER).into_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a category: {error}");

            error.into_alert_response()
        }
    }
}

/// Only allow redirects to pages on this site.
fn redirect_url_or_default(redirect_url: Option<String>) -> String {
    endpoints::local_redirect_url(redirect_url, endpoints::CATEGORIES_VIEW)
}

/// The form for adding a category.
///
/// `redirect_url` is where the client is sent after the category is saved.
pub fn new_category_form_view(redirect_url: &str, error_message: &str) -> Markup {
    let create_category_endpoint = format!(
        "{}?{}",
        endpoints::POST_CATEGORY,
        serde_urlencoded::to_string([("redirect_url", redirect_url)]).unwrap_or_default()
    );

    html! {
        form
            hx-post=(create_category_endpoint)
            hx-target-error="#alert-container"
            hx-swap="outerHTML"
            class="w-full space-y-4"
        {
            div
            {
                label
                    for="name"
                    class=(FORM_LABEL_STYLE)
                {
                    "New category name"
                }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="e.g. Groceries"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Add Category" }
        }
    }
}
