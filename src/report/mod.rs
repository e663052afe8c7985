//! Filtering, totals, charts and CSV export over the expense history.

mod aggregation;
mod charts;
mod export;
mod filter;
mod handlers;

pub use aggregation::{Report, ReportOutcome, aggregate_by, total};
pub use export::{export_expenses_endpoint, write_csv};
pub use filter::{DateRange, ReportFilter, filter_expenses};
pub use handlers::get_expenses_page;
