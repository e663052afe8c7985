//! Database queries for expenses.

use std::collections::HashSet;

use rusqlite::{Connection, Row, params};

use crate::{
    Error,
    category::{CategoryId, CategoryName, create_category},
    database_id::ExpenseId,
    expense::{Expense, ExpenseBuilder, LedgerEntry},
};

/// Columns added after the first release of the expense table, with the
/// definitions used to add them to older databases.
///
/// SQLite only accepts a foreign key column in `ADD COLUMN` if it may be NULL,
/// so old rows get their category from [assign_uncategorized_expenses].
const LATER_EXPENSE_COLUMNS: [(&str, &str); 3] = [
    ("category_id", "INTEGER REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT"),
    ("expense_type", "TEXT NOT NULL DEFAULT 'Personal'"),
    ("comment", "TEXT"),
];

/// The category given to expenses stored before they had a category.
const FALLBACK_CATEGORY: &str = "Other";

/// Create a new expense in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCategory] if the category ID does not refer to a stored category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_expense(builder: ExpenseBuilder, connection: &Connection) -> Result<Expense, Error> {
    let category_id = builder.category_id;

    connection
        .prepare(
            "INSERT INTO expense (amount, date, category_id, expense_type, comment)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, amount, date, category_id, expense_type, comment",
        )?
        .query_row(
            (
                builder.amount,
                builder.date,
                builder.category_id,
                builder.expense_type,
                builder.comment,
            ),
            map_expense_row,
        )
        .map_err(|error| map_write_error(error, category_id))
}

/// Retrieve an expense from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a stored expense,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    let expense = connection
        .prepare(
            "SELECT id, amount, date, category_id, expense_type, comment
             FROM expense
             WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_expense_row)?;

    Ok(expense)
}

/// Retrieve every expense with its category name, most recent first.
///
/// Expenses on the same date are listed in the order they were created.
pub fn get_all_expenses(connection: &Connection) -> Result<Vec<LedgerEntry>, Error> {
    connection
        .prepare(
            "SELECT expense.id, expense.amount, expense.date, expense.category_id, category.name,
                expense.expense_type, expense.comment
             FROM expense
             INNER JOIN category ON category.id = expense.category_id
             ORDER BY expense.date DESC, expense.id ASC",
        )?
        .query_map([], map_ledger_entry_row)?
        .map(|maybe_entry| maybe_entry.map_err(Error::from))
        .collect()
}

/// Overwrite every writable field of the expense `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingExpense] if `id` does not refer to a stored expense,
/// - [Error::InvalidCategory] if the new category does not exist,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_expense(
    id: ExpenseId,
    builder: ExpenseBuilder,
    connection: &Connection,
) -> Result<Expense, Error> {
    let rows_affected = connection
        .execute(
            "UPDATE expense
             SET amount = ?1, date = ?2, category_id = ?3, expense_type = ?4, comment = ?5
             WHERE id = ?6",
            params![
                builder.amount,
                builder.date,
                builder.category_id,
                builder.expense_type,
                builder.comment,
                id,
            ],
        )
        .map_err(|error| map_write_error(error, builder.category_id))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingExpense);
    }

    Ok(builder.finalize(id))
}

/// Delete the expense `id`.
///
/// Deleting an expense that does not exist succeeds and changes nothing.
pub fn delete_expense(id: ExpenseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM expense WHERE id = :id", &[(":id", &id)])?;

    if rows_affected == 0 {
        tracing::debug!("expense {id} was already deleted");
    }

    Ok(())
}

/// Get the total number of expenses in the database.
pub fn count_expenses(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM expense;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the expense table, adding any columns missing from an older schema.
///
/// Existing rows are kept. Columns added to an existing table take their
/// default values, i.e. no category, [crate::expense::ExpenseType::Personal]
/// and no comment. The index is created once every column exists.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                category_id INTEGER NOT NULL,
                expense_type TEXT NOT NULL DEFAULT 'Personal',
                comment TEXT,
                FOREIGN KEY(category_id) REFERENCES category(id)
                    ON UPDATE CASCADE ON DELETE RESTRICT
                )",
        (),
    )?;

    add_missing_expense_columns(connection)?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_date_category ON expense(date, category_id);",
        (),
    )?;

    Ok(())
}

/// Put expenses that have no category into the "Other" category.
///
/// Only rows from a table that predates the category column lack a category.
/// The category is created if it does not exist. Returns the number of
/// expenses updated.
pub fn assign_uncategorized_expenses(connection: &Connection) -> Result<usize, Error> {
    let uncategorized: i64 = connection.query_row(
        "SELECT COUNT(id) FROM expense WHERE category_id IS NULL;",
        [],
        |row| row.get(0),
    )?;

    if uncategorized == 0 {
        return Ok(0);
    }

    let fallback = create_category(CategoryName::new_unchecked(FALLBACK_CATEGORY), connection)?;
    let updated = connection.execute(
        "UPDATE expense SET category_id = ?1 WHERE category_id IS NULL;",
        (fallback.id,),
    )?;

    tracing::info!("moved {updated} expenses without a category to \"{FALLBACK_CATEGORY}\"");

    Ok(updated)
}

fn add_missing_expense_columns(connection: &Connection) -> Result<(), rusqlite::Error> {
    let existing_columns = connection
        .prepare("SELECT name FROM pragma_table_info('expense')")?
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<HashSet<_>, _>>()?;

    for (column, definition) in LATER_EXPENSE_COLUMNS {
        if existing_columns.contains(column) {
            continue;
        }

        tracing::info!("adding missing column \"{column}\" to the expense table");
        connection.execute(
            &format!("ALTER TABLE expense ADD COLUMN {column} {definition}"),
            (),
        )?;
    }

    Ok(())
}

fn map_write_error(error: rusqlite::Error, category_id: CategoryId) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            },
            _,
        ) => Error::InvalidCategory(category_id),
        error => error.into(),
    }
}

/// Map a database row to an Expense.
fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        amount: row.get(1)?,
        date: row.get(2)?,
        category_id: row.get(3)?,
        expense_type: row.get(4)?,
        comment: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
    })
}

fn map_ledger_entry_row(row: &Row) -> Result<LedgerEntry, rusqlite::Error> {
    Ok(LedgerEntry {
        id: row.get(0)?,
        amount: row.get(1)?,
        date: row.get(2)?,
        category_id: row.get(3)?,
        category_name: row.get(4)?,
        expense_type: row.get(5)?,
        comment: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
    })
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        category::{CategoryName, create_category, get_category_by_name},
        db::initialize,
        expense::{
            Amount, Expense, ExpenseType, count_expenses, create_expense, delete_expense,
            get_all_expenses, get_expense, update_expense,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn amount(value: f64) -> Amount {
        Amount::new(value).unwrap()
    }

    fn food_id(conn: &Connection) -> i64 {
        get_category_by_name("Food", conn).unwrap().id
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let category_id = food_id(&conn);

        let result = create_expense(
            Expense::build(amount(12.3), date!(2025 - 10 - 05), category_id),
            &conn,
        );

        match result {
            Ok(expense) => {
                assert_eq!(expense.amount, amount(12.3));
                assert_eq!(expense.expense_type, ExpenseType::Personal);
                assert_eq!(expense.comment, "");
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn created_expense_reads_back_unchanged() {
        let conn = get_test_connection();
        let category = create_category(CategoryName::new_unchecked("Gifts"), &conn).unwrap();

        let created = create_expense(
            Expense::build(amount(42.5), date!(2024 - 06 - 30), category.id)
                .expense_type(ExpenseType::ForSpouse)
                .comment("Birthday flowers"),
            &conn,
        )
        .expect("Could not create expense");

        let entries = get_all_expenses(&conn).unwrap();
        let entry = entries
            .iter()
            .find(|entry| entry.id == created.id)
            .expect("Created expense missing from listing");
        assert_eq!(entry.amount, amount(42.5));
        assert_eq!(entry.date, date!(2024 - 06 - 30));
        assert_eq!(entry.category_id, category.id);
        assert_eq!(entry.category_name, "Gifts");
        assert_eq!(entry.expense_type, ExpenseType::ForSpouse);
        assert_eq!(entry.comment, "Birthday flowers");
        assert_eq!(get_expense(created.id, &conn), Ok(created));
    }

    #[test]
    fn create_fails_on_unknown_category() {
        let conn = get_test_connection();

        let result = create_expense(
            Expense::build(amount(10.0), date!(2024 - 01 - 01), 999),
            &conn,
        );

        assert_eq!(result, Err(Error::InvalidCategory(999)));
        assert_eq!(count_expenses(&conn), Ok(0));
    }

    #[test]
    fn get_missing_expense_returns_not_found() {
        let conn = get_test_connection();

        assert_eq!(get_expense(1, &conn), Err(Error::NotFound));
    }

    #[test]
    fn list_orders_by_date_descending_then_id() {
        let conn = get_test_connection();
        let category_id = food_id(&conn);
        let dates = [
            date!(2024 - 01 - 15),
            date!(2024 - 03 - 01),
            date!(2024 - 01 - 15),
            date!(2024 - 02 - 01),
        ];
        for date in dates {
            create_expense(Expense::build(amount(1.0), date, category_id), &conn).unwrap();
        }

        let got = get_all_expenses(&conn)
            .unwrap()
            .into_iter()
            .map(|entry| (entry.id, entry.date))
            .collect::<Vec<_>>();

        assert_eq!(
            got,
            vec![
                (2, date!(2024 - 03 - 01)),
                (4, date!(2024 - 02 - 01)),
                (1, date!(2024 - 01 - 15)),
                (3, date!(2024 - 01 - 15)),
            ]
        );
    }

    #[test]
    fn update_replaces_all_fields() {
        let conn = get_test_connection();
        let category_a = food_id(&conn);
        let category_b = get_category_by_name("Transport", &conn).unwrap().id;
        let target = create_expense(
            Expense::build(amount(1.0), date!(2024 - 01 - 01), category_a).comment("old note"),
            &conn,
        )
        .unwrap();
        let other = create_expense(
            Expense::build(amount(2.0), date!(2024 - 01 - 02), category_a),
            &conn,
        )
        .unwrap();

        let updated = update_expense(
            target.id,
            Expense::build(amount(99.99), date!(2024 - 03 - 01), category_b)
                .expense_type(ExpenseType::Shared)
                .comment("new note"),
            &conn,
        )
        .expect("Could not update expense");

        let got = get_expense(target.id, &conn).unwrap();
        assert_eq!(got, updated);
        assert_eq!(got.amount, amount(99.99));
        assert_eq!(got.date, date!(2024 - 03 - 01));
        assert_eq!(got.category_id, category_b);
        assert_eq!(got.expense_type, ExpenseType::Shared);
        assert_eq!(got.comment, "new note");
        assert_eq!(get_expense(other.id, &conn), Ok(other));
    }

    #[test]
    fn update_missing_expense_fails() {
        let conn = get_test_connection();
        let category_id = food_id(&conn);

        let result = update_expense(
            42,
            Expense::build(amount(1.0), date!(2024 - 01 - 01), category_id),
            &conn,
        );

        assert_eq!(result, Err(Error::UpdateMissingExpense));
    }

    #[test]
    fn update_fails_on_unknown_category() {
        let conn = get_test_connection();
        let expense = create_expense(
            Expense::build(amount(1.0), date!(2024 - 01 - 01), food_id(&conn)),
            &conn,
        )
        .unwrap();

        let result = update_expense(
            expense.id,
            Expense::build(amount(1.0), date!(2024 - 01 - 01), 999),
            &conn,
        );

        assert_eq!(result, Err(Error::InvalidCategory(999)));
        assert_eq!(get_expense(expense.id, &conn), Ok(expense));
    }

    #[test]
    fn delete_twice_is_not_an_error() {
        let conn = get_test_connection();
        let category_id = food_id(&conn);
        let expense = create_expense(
            Expense::build(amount(3.0), date!(2024 - 01 - 01), category_id),
            &conn,
        )
        .unwrap();
        let kept = create_expense(
            Expense::build(amount(4.0), date!(2024 - 01 - 02), category_id),
            &conn,
        )
        .unwrap();

        assert_eq!(delete_expense(expense.id, &conn), Ok(()));
        assert_eq!(delete_expense(expense.id, &conn), Ok(()));

        assert_eq!(get_expense(expense.id, &conn), Err(Error::NotFound));
        assert_eq!(get_all_expenses(&conn).unwrap().len(), 1);
        assert_eq!(get_expense(kept.id, &conn), Ok(kept));
    }

    #[test]
    fn get_count() {
        let conn = get_test_connection();
        let category_id = food_id(&conn);
        let want_count = 20;
        for i in 1..=want_count {
            create_expense(
                Expense::build(amount(i as f64), date!(2025 - 10 - 05), category_id),
                &conn,
            )
            .expect("Could not create expense");
        }

        let got_count = count_expenses(&conn).expect("Could not get count");

        assert_eq!(want_count, got_count);
    }
}
