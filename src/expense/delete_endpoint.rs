use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, database_id::ExpenseId, expense::delete_expense};

/// The state needed to delete an expense.
#[derive(Debug, Clone)]
pub struct DeleteExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting an expense.
///
/// Responds with an empty body so htmx removes the expense's table row.
/// Deleting an expense that is already gone also succeeds.
pub async fn delete_expense_endpoint(
    State(state): State<DeleteExpenseState>,
    Path(expense_id): Path<ExpenseId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_expense(expense_id, &connection) {
        // The status code has to be 200 OK or htmx will not delete the table row.
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => {
            tracing::error!("Could not delete expense {expense_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        expense::{Amount, Expense, create_expense, get_expense},
    };

    use super::{DeleteExpenseState, delete_expense_endpoint};

    #[tokio::test]
    async fn deletes_expense_and_repeats_are_ok() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let expense = create_expense(
            Expense::build(Amount::new(1.23).unwrap(), date!(2025 - 10 - 26), 1),
            &connection,
        )
        .unwrap();
        let state = DeleteExpenseState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let first = delete_expense_endpoint(State(state.clone()), Path(expense.id)).await;
        let second = delete_expense_endpoint(State(state.clone()), Path(expense.id)).await;

        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(second.status(), StatusCode::OK);
        assert_eq!(
            get_expense(expense.id, &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );
    }
}
