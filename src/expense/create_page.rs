//! Defines the route handler for the page for recording a new expense.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error, endpoints,
    category::{Category, get_all_categories, new_category_form_view},
    expense::{
        ExpenseType,
        form::{ExpenseFormDefaults, expense_form_fields},
    },
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, currency_input_styles},
    navigation::NavBar,
    timezone::local_today,
};

/// The state needed for the new expense page.
#[derive(Debug, Clone)]
pub struct CreateExpensePageState {
    /// The local timezone as a canonical timezone name, e.g. "Europe/Paris".
    pub local_timezone: String,
    /// The database connection for accessing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpensePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for recording an expense.
pub async fn get_create_expense_page(
    State(state): State<CreateExpensePageState>,
) -> Result<Response, Error> {
    let categories = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_all_categories(&connection).inspect_err(|error| {
            tracing::error!("Failed to retrieve categories for new expense page: {error}")
        })?
    };

    let today = local_today(&state.local_timezone);

    Ok(create_expense_view(today, &categories).into_response())
}

fn create_expense_view(today: Date, categories: &[Category]) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_EXPENSE_VIEW).into_html();
    let defaults = ExpenseFormDefaults {
        amount: None,
        date: today,
        category_id: categories.first().map(|category| category.id),
        expense_type: ExpenseType::Personal,
        comment: None,
        autofocus_amount: true,
    };

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::POST_EXPENSE)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New Expense" }

                (expense_form_fields(&defaults, categories))

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    "Add Expense"
                }
            }

            details class="w-full mt-8"
            {
                summary class="cursor-pointer text-sm font-medium" { "Missing a category?" }

                div class="mt-4"
                {
                    (new_category_form_view(endpoints::NEW_EXPENSE_VIEW, ""))
                }
            }
        }
    };

    base("New Expense", &[currency_input_styles()], &content)
}

#[cfg(test)]
mod view_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{
        db::initialize,
        endpoints,
        expense::{create_page::CreateExpensePageState, get_create_expense_page},
        test_utils::{
            assert_content_type, assert_form_input, assert_form_submit_button, assert_hx_endpoint,
            assert_status_ok, assert_valid_html, must_get_form, parse_html_document,
        },
        timezone::local_today,
    };

    fn get_test_state() -> CreateExpensePageState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        CreateExpensePageState {
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn new_expense_page_returns_form() {
        let response = get_create_expense_page(State(get_test_state()))
            .await
            .unwrap();

        assert_status_ok(&response);
        assert_content_type(&response, "text/html; charset=utf-8");
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::POST_EXPENSE, "hx-post");
        assert_form_input(&form, "amount", "number");
        assert_form_input(&form, "date", "date");
        assert_form_input(&form, "expense_type", "radio");
        assert_form_submit_button(&form);
    }

    #[tokio::test]
    async fn defaults_to_today() {
        let today = local_today("Etc/UTC");

        let response = get_create_expense_page(State(get_test_state()))
            .await
            .unwrap();

        let document = parse_html_document(response).await;
        let date_value = document
            .select(&Selector::parse("input[name=date]").unwrap())
            .next()
            .and_then(|input| input.value().attr("value"))
            .expect("No date input found")
            .to_owned();
        assert_eq!(date_value, today.to_string());
    }

    #[tokio::test]
    async fn lists_all_categories() {
        let response = get_create_expense_page(State(get_test_state()))
            .await
            .unwrap();

        let document = parse_html_document(response).await;
        let options = document
            .select(&Selector::parse("select[name=category_id] option").unwrap())
            .map(|option| option.text().collect::<String>())
            .collect::<Vec<_>>();
        assert_eq!(
            options,
            vec!["Food", "Health", "Housing", "Leisure", "Other", "Transport"]
        );
    }

    #[tokio::test]
    async fn has_inline_category_form() {
        let response = get_create_expense_page(State(get_test_state()))
            .await
            .unwrap();

        let document = parse_html_document(response).await;
        let category_form = document
            .select(&Selector::parse("details form").unwrap())
            .next()
            .expect("No category form found");
        assert_hx_endpoint(
            &category_form,
            &format!(
                "{}?redirect_url=%2Fexpenses%2Fnew",
                endpoints::POST_CATEGORY
            ),
            "hx-post",
        );
    }
}
