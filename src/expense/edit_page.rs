//! The page for editing an existing expense.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    category::{Category, get_all_categories},
    database_id::ExpenseId,
    endpoints::{self, format_endpoint},
    expense::{
        Expense,
        form::{ExpenseFormDefaults, expense_form_fields},
        get_expense,
    },
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, currency_input_styles, link},
    navigation::NavBar,
};

/// The state needed for the edit expense page.
#[derive(Debug, Clone)]
pub struct EditExpensePageState {
    /// The database connection for reading and writing the ledger.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditExpensePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters for the edit expense page.
#[derive(Debug, Default, Deserialize)]
pub struct QueryParams {
    /// The page to return to once the expense is saved, e.g. a filtered expenses page.
    redirect_url: Option<String>,
}

/// Renders the page for editing an expense.
pub async fn get_edit_expense_page(
    State(state): State<EditExpensePageState>,
    Path(expense_id): Path<ExpenseId>,
    Query(query_params): Query<QueryParams>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expense = get_expense(expense_id, &connection).inspect_err(|error| match error {
        Error::NotFound => tracing::debug!("no expense with ID {expense_id} to edit"),
        error => tracing::error!("Failed to retrieve expense {expense_id}: {error}"),
    })?;

    let categories = get_all_categories(&connection).inspect_err(|error| {
        tracing::error!("Failed to retrieve categories for edit expense page: {error}")
    })?;

    let redirect_url = query_params.redirect_url.as_deref();

    Ok(edit_expense_view(&expense, &categories, redirect_url).into_response())
}

fn edit_expense_view(
    expense: &Expense,
    categories: &[Category],
    redirect_url: Option<&str>,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_EXPENSE_VIEW).into_html();
    let update_endpoint = format_endpoint(endpoints::PUT_EXPENSE, expense.id);
    let update_endpoint = match redirect_url {
        Some(redirect_url) => format!(
            "{update_endpoint}?{}",
            serde_urlencoded::to_string([("redirect_url", redirect_url)]).unwrap_or_default()
        ),
        None => update_endpoint,
    };
    let cancel_url = redirect_url.unwrap_or(endpoints::EXPENSES_VIEW);
    let defaults = ExpenseFormDefaults {
        amount: Some(expense.amount.value()),
        date: expense.date,
        category_id: Some(expense.category_id),
        expense_type: expense.expense_type,
        comment: Some(&expense.comment),
        autofocus_amount: false,
    };

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_endpoint)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit Expense" }

                (expense_form_fields(&defaults, categories))

                button type="submit" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    "Save Changes"
                }

                p class="text-sm text-center" { (link(cancel_url, "Cancel")) }
            }
        }
    };

    base("Edit Expense", &[currency_input_styles()], &content)
}
