//! The endpoint for updating an expense.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    database_id::ExpenseId,
    endpoints,
    expense::{form::ExpenseForm, update_expense},
};

/// The state needed to edit an expense.
#[derive(Debug, Clone)]
pub struct EditExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters for the edit expense endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct QueryParams {
    /// The page to return to after saving, usually the filtered expenses page.
    redirect_url: Option<String>,
}

/// Overwrite an expense with the submitted values and redirect back to the expenses page.
pub async fn edit_expense_endpoint(
    State(state): State<EditExpenseState>,
    Path(expense_id): Path<ExpenseId>,
    Query(query_params): Query<QueryParams>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let builder = match form.into_builder() {
        Ok(builder) => builder,
        Err(error) => {
            tracing::warn!("rejected update to expense {expense_id}: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = update_expense(expense_id, builder, &connection) {
        tracing::error!("Could not update expense {expense_id}: {error}");
        return error.into_alert_response();
    }

    let redirect_url =
        endpoints::local_redirect_url(query_params.redirect_url, endpoints::EXPENSES_VIEW);

    (HxRedirect(redirect_url), StatusCode::SEE_OTHER).into_response()
}
