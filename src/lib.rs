//! Spendbook is a web app for keeping a ledger of personal expenses.
//!
//! Expenses are recorded against categories and tagged as personal, shared or
//! for a spouse. The history can be filtered by date range, category and
//! type, summarised with totals and charts, and exported as CSV.
//!
//! This library provides a web server that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod category;
mod database_id;
mod db;
mod endpoints;
mod error;
mod error_page;
mod expense;
mod html;
mod logging;
mod navigation;
mod report;
mod routing;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use category::{
    Category, CategoryId, CategoryName, DEFAULT_CATEGORIES, create_category, get_all_categories,
    get_category_by_name,
};
pub use db::initialize as initialize_db;
pub use error::Error;
pub use expense::{
    Amount, Expense, ExpenseType, LedgerEntry, count_expenses, create_expense, get_all_expenses,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use report::{
    DateRange, Report, ReportFilter, ReportOutcome, aggregate_by, filter_expenses, total, write_csv,
};
pub use routing::build_router;
pub use timezone::get_local_offset;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install the terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
        },
    }

    handle.graceful_shutdown(Some(Duration::from_secs(1)));
}
