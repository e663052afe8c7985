//! The expenses page: filterable history, totals and breakdown charts.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{Category, get_all_categories},
    endpoints::{self, format_endpoint},
    expense::{ExpenseType, LedgerEntry, get_all_expenses},
    html::{
        BUTTON_SECONDARY_STYLE, CATEGORY_BADGE_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        HeadElement, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links, format_currency, link,
    },
    navigation::NavBar,
    report::{
        aggregation::{Report, ReportOutcome},
        charts::{build_report_charts, charts_script, charts_view},
        filter::{CategoryFilter, DateRange, ExpenseTypeFilter, ReportFilter, ReportQuery},
    },
};

/// The state needed for the expenses page.
#[derive(Debug, Clone)]
pub struct ExpensesPageState {
    /// The database connection for reading and writing the ledger.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpensesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the expense history filtered by the query parameters.
///
/// Missing dates default to the span of all recorded expenses, and missing
/// category and type filters default to "all".
pub async fn get_expenses_page(
    State(state): State<ExpensesPageState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, Error> {
    let (all_entries, categories) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let all_entries = get_all_expenses(&connection)
            .inspect_err(|error| tracing::error!("could not load expenses: {error}"))?;
        let categories = get_all_categories(&connection)
            .inspect_err(|error| tracing::error!("could not load categories: {error}"))?;

        (all_entries, categories)
    };

    let outcome = match DateRange::spanning(&all_entries) {
        Some(default_range) => {
            Report::build(&all_entries, &categories, query.into_filter(default_range))
        }
        None => ReportOutcome::NoData,
    };

    Ok(expenses_view(&outcome, &categories).into_response())
}

fn expenses_view(outcome: &ReportOutcome, categories: &[Category]) -> Markup {
    let nav_bar = NavBar::new(endpoints::EXPENSES_VIEW).into_html();
    let mut head_elements = Vec::new();

    let body = match outcome {
        ReportOutcome::NoData => no_data_view(),
        ReportOutcome::NoMatches(filter) => html! {
            (filter_form(filter, categories))

            p id="no-matches" class="text-center text-gray-600 dark:text-gray-400"
            {
                "No expenses match these filters. Try a wider date range or another category."
            }
        },
        ReportOutcome::Results(report) => {
            let charts = report
                .filter
                .covers_all_groups()
                .then(|| build_report_charts(&report.by_category, &report.by_expense_type));

            if let Some(charts) = &charts {
                head_elements.push(HeadElement::ScriptLink(
                    "/static/echarts.6.0.0.min.js".to_owned(),
                ));
                head_elements.push(charts_script(charts));
            }

            html! {
                (filter_form(&report.filter, categories))
                (summary_view(report, categories))

                @if let Some(charts) = &charts {
                    (charts_view(charts))
                }

                (expense_table(&report.entries, &report.filter))
            }
        }
    };

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6 w-full lg:max-w-5xl"
            {
                h1 class="text-xl font-bold" { "History and Statistics" }

                (body)
            }
        }
    };

    base("Expenses", &head_elements, &content)
}

fn no_data_view() -> Markup {
    let new_expense_link = link(endpoints::NEW_EXPENSE_VIEW, "Record your first expense");

    html! {
        p id="no-data" class="text-center"
        {
            "No expenses recorded yet. " (new_expense_link) "."
        }
    }
}

fn filter_form(filter: &ReportFilter, categories: &[Category]) -> Markup {
    let selected_category = match filter.category {
        CategoryFilter::All => None,
        CategoryFilter::Only(category_id) => Some(category_id),
    };
    let selected_type = match filter.expense_type {
        ExpenseTypeFilter::All => None,
        ExpenseTypeFilter::Only(expense_type) => Some(expense_type),
    };

    html! {
        form
            method="get"
            action=(endpoints::EXPENSES_VIEW)
            class="grid grid-cols-1 md:grid-cols-5 gap-4 items-end"
        {
            div
            {
                label for="start" class=(FORM_LABEL_STYLE) { "From" }
                input
                    id="start"
                    name="start"
                    type="date"
                    value=(filter.range.start)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="end" class=(FORM_LABEL_STYLE) { "To" }
                input
                    id="end"
                    name="end"
                    type="date"
                    value=(filter.range.end)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                select id="category" name="category" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected[selected_category.is_none()] { "All" }

                    @for category in categories {
                        option
                            value=(category.id)
                            selected[selected_category == Some(category.id)]
                        {
                            (category.name)
                        }
                    }
                }
            }

            div
            {
                label for="type" class=(FORM_LABEL_STYLE) { "Type" }
                select id="type" name="type" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected[selected_type.is_none()] { "All" }

                    @for expense_type in ExpenseType::ALL {
                        option
                            value=(expense_type)
                            selected[selected_type == Some(expense_type)]
                        {
                            (expense_type)
                        }
                    }
                }
            }

            button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Apply" }
        }
    }
}

fn summary_view(report: &Report, categories: &[Category]) -> Markup {
    let export_url = format!(
        "{}?{}",
        endpoints::EXPORT_EXPENSES,
        ReportQuery::from(&report.filter).to_query_string()
    );

    html! {
        div class="flex justify-between flex-wrap items-end gap-4"
        {
            div
            {
                p class="text-sm text-gray-600 dark:text-gray-400"
                {
                    "Total for " (report.filter.describe(categories)) ", " (report.filter.range)
                }

                p id="total" class="text-3xl font-bold tabular-nums"
                {
                    (format_currency(report.total))
                }
            }

            a
                href=(export_url)
                download
                class="text-blue-600 hover:text-blue-500 dark:text-blue-500 underline"
            {
                "Download CSV"
            }
        }
    }
}

fn expense_table(entries: &[LedgerEntry], filter: &ReportFilter) -> Markup {
    let current_page = format!(
        "{}?{}",
        endpoints::EXPENSES_VIEW,
        ReportQuery::from(filter).to_query_string()
    );
    let redirect_query =
        serde_urlencoded::to_string([("redirect_url", current_page.as_str())]).unwrap_or_default();

    let table_row = |entry: &LedgerEntry| {
        let edit_url = format!(
            "{}?{redirect_query}",
            format_endpoint(endpoints::EDIT_EXPENSE_VIEW, entry.id)
        );
        let delete_url = format_endpoint(endpoints::DELETE_EXPENSE, entry.id);
        let confirm_message = format!(
            "Are you sure you want to delete the expense of {} on {}?",
            format_currency(entry.amount.value()),
            entry.date
        );

        html! {
            tr class=(TABLE_ROW_STYLE) data-expense-id=(entry.id)
            {
                td class=(TABLE_CELL_STYLE) { (entry.date) }
                td class=(TABLE_CELL_STYLE)
                {
                    span class=(CATEGORY_BADGE_STYLE) { (entry.category_name) }
                }
                td class=(TABLE_CELL_STYLE) { (entry.expense_type) }
                td class="px-6 py-4 text-right tabular-nums"
                {
                    (format_currency(entry.amount.value()))
                }
                td class=(TABLE_CELL_STYLE) { (entry.comment) }
                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &edit_url,
                            &delete_url,
                            &confirm_message,
                            "closest tr",
                            "delete",
                        ))
                    }
                }
            }
        }
    };

    html! {
        div class="overflow-x-auto dark:bg-gray-800"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                        th scope="col" class="px-6 py-4 text-right" { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Comment" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for entry in entries {
                        (table_row(entry))
                    }
                }
            }
        }
    }
}
