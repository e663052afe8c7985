//! Database operations for categories.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    category::{Category, CategoryName, DEFAULT_CATEGORIES},
};

/// Create a category and return it with its generated ID.
///
/// Category names are unique. If a category with the same (normalized) name
/// already exists, nothing is written and the existing category is returned,
/// so adding a duplicate is a silent no-op rather than an error.
pub fn create_category(name: CategoryName, connection: &Connection) -> Result<Category, Error> {
    let rows_affected = connection.execute(
        "INSERT INTO category (name) VALUES (?1) ON CONFLICT(name) DO NOTHING;",
        (name.as_ref(),),
    )?;

    if rows_affected == 0 {
        tracing::debug!("category \"{name}\" already exists, skipping insert");
        return get_category_by_name(name.as_ref(), connection);
    }

    let id = connection.last_insert_rowid();

    Ok(Category { id, name })
}

/// Resolve a human-entered category name to the stored category.
///
/// The lookup ignores ASCII case, matching the uniqueness rule on the table.
pub fn get_category_by_name(name: &str, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name FROM category WHERE name = :name;")?
        .query_row(&[(":name", &name.trim())], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered alphabetically by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name FROM category ORDER BY name ASC;")?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Initialize the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE COLLATE NOCASE
        );",
        (),
    )?;

    Ok(())
}

/// Insert [DEFAULT_CATEGORIES] if the category table is empty.
///
/// Returns the number of categories inserted. Run this inside a transaction
/// so the defaults land as one batch.
pub fn seed_default_categories(connection: &Connection) -> Result<usize, rusqlite::Error> {
    let count: i64 = connection.query_row("SELECT COUNT(id) FROM category;", [], |row| {
        row.get(0)
    })?;

    if count > 0 {
        return Ok(0);
    }

    let mut statement = connection.prepare("INSERT INTO category (name) VALUES (?1);")?;

    for name in DEFAULT_CATEGORIES {
        statement.execute((name,))?;
    }

    Ok(DEFAULT_CATEGORIES.len())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);

    Ok(Category { id, name })
}
