//! CSV export of filtered expenses.

use std::{
    io::Write,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    expense::{LedgerEntry, get_all_expenses},
    report::filter::{DateRange, ReportQuery, filter_expenses},
};

/// The file name offered to the browser for downloads.
pub const EXPORT_FILE_NAME: &str = "filtered_expenses.csv";

const CSV_HEADER: [&str; 5] = ["date", "amount", "category", "expense_type", "comment"];

/// Write `entries` as CSV with a header row.
///
/// Dates are written as YYYY-MM-DD and amounts with two decimal places.
pub fn write_csv<W: Write>(entries: &[LedgerEntry], writer: W) -> Result<(), Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(CSV_HEADER)?;

    for entry in entries {
        csv_writer.write_record([
            entry.date.to_string(),
            format!("{:.2}", entry.amount.value()),
            entry.category_name.clone(),
            entry.expense_type.to_string(),
            entry.comment.clone(),
        ])?;
    }

    csv_writer
        .flush()
        .map_err(|error| Error::CsvExport(error.to_string()))
}

/// The state needed to export expenses.
#[derive(Debug, Clone)]
pub struct ExportState {
    /// The database connection for reading and writing the ledger.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Download the expenses matching the query as a CSV file.
///
/// Takes the same query parameters as the expenses page.
pub async fn export_expenses_endpoint(
    State(state): State<ExportState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, Error> {
    let all_entries = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_all_expenses(&connection)
            .inspect_err(|error| tracing::error!("could not load expenses for export: {error}"))?
    };

    let entries = match DateRange::spanning(&all_entries) {
        Some(default_range) => filter_expenses(&all_entries, &query.into_filter(default_range)),
        None => Vec::new(),
    };

    let mut body = Vec::new();
    write_csv(&entries, &mut body)
        .inspect_err(|error| tracing::error!("could not write CSV export: {error}"))?;

    tracing::info!("exported {} expenses as CSV", entries.len());

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        body,
    )
        .into_response())
}
