//! Defines the endpoint for recording a new expense.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    expense::{create_expense, form::ExpenseForm},
};

/// The state needed to create an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new expense, redirects to the expenses view on success.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let builder = match form.into_builder() {
        Ok(builder) => builder,
        Err(error) => {
            tracing::warn!("rejected new expense: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_expense(builder, &connection) {
        Ok(expense) => {
            tracing::info!(
                "created expense {} of {:.2}",
                expense.id,
                expense.amount.value()
            );
            (
                HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("could not create expense: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use axum_extra::extract::Form;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        category::get_category_by_name,
        db::initialize,
        endpoints,
        expense::{
            ExpenseType, count_expenses,
            create_endpoint::{CreateExpenseState, create_expense_endpoint},
            form::ExpenseForm,
            get_expense,
        },
        test_utils::assert_hx_redirect,
    };

    fn get_test_state() -> CreateExpenseState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        CreateExpenseState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn can_create_expense() {
        let state = get_test_state();
        let category_id = get_category_by_name("Leisure", &state.db_connection.lock().unwrap())
            .unwrap()
            .id;
        let form = ExpenseForm {
            amount: 12.3,
            date: date!(2024 - 04 - 01),
            category_id,
            expense_type: "Shared".to_owned(),
            comment: Some("cinema".to_owned()),
        };

        let response = create_expense_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::EXPENSES_VIEW);
        let connection = state.db_connection.lock().unwrap();
        let expense = get_expense(1, &connection).unwrap();
        assert_eq!(expense.amount.value(), 12.3);
        assert_eq!(expense.category_id, category_id);
        assert_eq!(expense.expense_type, ExpenseType::Shared);
        assert_eq!(expense.comment, "cinema");
    }

    #[tokio::test]
    async fn missing_comment_is_stored_as_empty() {
        let state = get_test_state();
        let category_id = get_category_by_name("Food", &state.db_connection.lock().unwrap())
            .unwrap()
            .id;
        let form = ExpenseForm {
            amount: 0.0,
            date: date!(2024 - 04 - 01),
            category_id,
            expense_type: "Personal".to_owned(),
            comment: None,
        };

        let response = create_expense_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let expense = get_expense(1, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(expense.comment, "");
    }

    #[tokio::test]
    async fn unknown_category_is_a_bad_request() {
        let state = get_test_state();
        let form = ExpenseForm {
            amount: 10.0,
            date: date!(2024 - 01 - 01),
            category_id: 999,
            expense_type: "Personal".to_owned(),
            comment: None,
        };

        let response = create_expense_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(count_expenses(&state.db_connection.lock().unwrap()), Ok(0));
    }

    #[tokio::test]
    async fn negative_amount_is_a_bad_request() {
        let state = get_test_state();
        let form = ExpenseForm {
            amount: -4.0,
            date: date!(2024 - 01 - 01),
            category_id: 1,
            expense_type: "Personal".to_owned(),
            comment: None,
        };

        let response = create_expense_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(count_expenses(&state.db_connection.lock().unwrap()), Ok(0));
    }
}
