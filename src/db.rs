//! Sets up the application's SQLite database.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    Error,
    category::{create_category_table, seed_default_categories},
    expense::{assign_uncategorized_expenses, create_expense_table},
};

/// Create the application tables and seed the default categories.
///
/// Safe to run on every start up: existing tables are kept, columns added in
/// later versions are added to old expense tables, and the default categories
/// are only inserted into an empty category table. Expenses from tables that
/// had no category column are moved to the "Other" category.
///
/// The app expects to be the only writer. Other processes writing to the same
/// database file are only serialized by SQLite's own locking, and a write that
/// finds the database locked fails with [Error::SqlError] rather than retrying.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Foreign key enforcement cannot be changed inside a transaction.
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_category_table(&transaction)?;
    create_expense_table(&transaction)?;
    let seeded = seed_default_categories(&transaction)?;
    assign_uncategorized_expenses(&transaction)?;

    transaction.commit()?;

    if seeded > 0 {
        tracing::info!("seeded {seeded} default categories");
    }

    Ok(())
}
