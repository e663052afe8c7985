//! Categories page.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    category::{Category, CategoryId, get_all_categories, new_category_form_view},
    html::{
        CATEGORY_BADGE_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base,
    },
    navigation::NavBar,
};

/// The state needed for the categories page.
#[derive(Debug, Clone)]
pub struct CategoriesPageState {
    /// The database connection for reading and writing the ledger.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoriesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the categories page with the number of expenses in each category.
pub async fn get_categories_page(
    State(state): State<CategoriesPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    let expenses_per_category = count_expenses_per_category(&connection).inspect_err(|error| {
        tracing::error!("Could not count expenses per category: {error}")
    })?;

    let rows = categories
        .into_iter()
        .map(|category| {
            let expense_count = *expenses_per_category.get(&category.id).unwrap_or(&0);
            (category, expense_count)
        })
        .collect::<Vec<_>>();

    Ok(categories_view(&rows).into_response())
}

/// Count the expenses filed under each category.
///
/// Categories without any expenses are absent from the map.
pub fn count_expenses_per_category(
    connection: &Connection,
) -> Result<HashMap<CategoryId, u32>, Error> {
    let result: Result<HashMap<CategoryId, u32>, rusqlite::Error> = connection
        .prepare("SELECT category_id, COUNT(1) FROM expense GROUP BY category_id")?
        .query_map((), |row| {
            let category_id = row.get(0)?;
            let count = row.get(1)?;

            Ok((category_id, count))
        })?
        .collect();

    result.map_err(Error::from)
}

fn categories_view(rows: &[(Category, u32)]) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();
    let create_form = new_category_form_view(endpoints::CATEGORIES_VIEW, "");

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-3xl"
            {
                h1 class="text-xl font-bold" { "Categories" }

                div class="dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Expenses" }
                            }
                        }

                        tbody
                        {
                            @for (category, expense_count) in rows {
                                tr class=(TABLE_ROW_STYLE)
                                {
                                    td class=(TABLE_CELL_STYLE)
                                    {
                                        span class=(CATEGORY_BADGE_STYLE) { (category.name) }
                                    }

                                    td class=(TABLE_CELL_STYLE) { (expense_count) }
                                }
                            }

                            @if rows.is_empty() {
                                tr
                                {
                                    td
                                        colspan="2"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No categories yet. Add one below."
                                    }
                                }
                            }
                        }
                    }
                }

                section class="max-w-md"
                {
                    (create_form)
                }
            }
        }
    );

    base("Categories", &[], &content)
}
