//! Filters for narrowing down the expense history.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    category::{Category, CategoryId},
    expense::{ExpenseType, LedgerEntry},
};

/// An inclusive range of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// The first day in the range.
    pub start: Date,
    /// The last day in the range.
    pub end: Date,
}

impl DateRange {
    /// Create a range covering `start` to `end`, swapping them if they are reversed.
    pub fn new(start: Date, end: Date) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// The smallest range containing every entry's date, or `None` if there are no entries.
    pub fn spanning(entries: &[LedgerEntry]) -> Option<Self> {
        let start = entries.iter().map(|entry| entry.date).min()?;
        let end = entries.iter().map(|entry| entry.date).max()?;

        Some(Self { start, end })
    }

    /// Whether `date` falls on or between the start and end dates.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Which categories to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Keep every category.
    All,
    /// Keep only the category with this ID.
    Only(CategoryId),
}

/// Which expense types to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseTypeFilter {
    /// Keep every expense type.
    All,
    /// Keep only this expense type.
    Only(ExpenseType),
}

/// The user's choice of date range, category and expense type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportFilter {
    /// The dates to keep, inclusive.
    pub range: DateRange,
    /// The category to keep.
    pub category: CategoryFilter,
    /// The expense type to keep.
    pub expense_type: ExpenseTypeFilter,
}

impl ReportFilter {
    /// A filter that keeps every entry inside `range`.
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            category: CategoryFilter::All,
            expense_type: ExpenseTypeFilter::All,
        }
    }

    /// Whether `entry` passes the date, category and type filters.
    pub fn matches(&self, entry: &LedgerEntry) -> bool {
        let category_matches = match self.category {
            CategoryFilter::All => true,
            CategoryFilter::Only(category_id) => entry.category_id == category_id,
        };
        let type_matches = match self.expense_type {
            ExpenseTypeFilter::All => true,
            ExpenseTypeFilter::Only(expense_type) => entry.expense_type == expense_type,
        };

        self.range.contains(entry.date) && category_matches && type_matches
    }

    /// Whether neither category nor expense type narrows the results.
    pub fn covers_all_groups(&self) -> bool {
        self.category == CategoryFilter::All && self.expense_type == ExpenseTypeFilter::All
    }

    /// A short description of the chosen category and type, e.g. "Food, Shared".
    pub fn describe(&self, categories: &[Category]) -> String {
        let category = match self.category {
            CategoryFilter::All => "all categories".to_owned(),
            CategoryFilter::Only(category_id) => categories
                .iter()
                .find(|category| category.id == category_id)
                .map(|category| category.name.to_string())
                .unwrap_or_else(|| format!("category {category_id}")),
        };
        let expense_type = match self.expense_type {
            ExpenseTypeFilter::All => "all types".to_owned(),
            ExpenseTypeFilter::Only(expense_type) => expense_type.to_string(),
        };

        format!("{category}, {expense_type}")
    }
}

/// Keep the entries that match `filter`, in their original order.
pub fn filter_expenses(entries: &[LedgerEntry], filter: &ReportFilter) -> Vec<LedgerEntry> {
    entries
        .iter()
        .filter(|entry| filter.matches(entry))
        .cloned()
        .collect()
}

/// The filter as it appears in the query string of the expenses page and CSV export.
///
/// Missing values fall back to the full date range and "all".
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportQuery {
    /// The first date to include.
    pub start: Option<Date>,
    /// The last date to include.
    pub end: Option<Date>,
    /// The ID of the only category to include.
    pub category: Option<CategoryId>,
    /// The only expense type to include.
    #[serde(rename = "type")]
    pub expense_type: Option<ExpenseType>,
}

impl ReportQuery {
    /// Resolve the query into a filter, using `default_range` for missing dates.
    pub fn into_filter(self, default_range: DateRange) -> ReportFilter {
        let range = DateRange::new(
            self.start.unwrap_or(default_range.start),
            self.end.unwrap_or(default_range.end),
        );

        ReportFilter {
            range,
            category: self
                .category
                .map_or(CategoryFilter::All, CategoryFilter::Only),
            expense_type: self
                .expense_type
                .map_or(ExpenseTypeFilter::All, ExpenseTypeFilter::Only),
        }
    }

    /// Encode the query as a URL query string without the leading '?'.
    pub fn to_query_string(&self) -> String {
        serde_urlencoded::to_string(self).unwrap_or_else(|error| {
            tracing::error!("could not encode report query {self:?}: {error}");
            String::new()
        })
    }
}

impl From<&ReportFilter> for ReportQuery {
    fn from(filter: &ReportFilter) -> Self {
        Self {
            start: Some(filter.range.start),
            end: Some(filter.range.end),
            category: match filter.category {
                CategoryFilter::All => None,
                CategoryFilter::Only(category_id) => Some(category_id),
            },
            expense_type: match filter.expense_type {
                ExpenseTypeFilter::All => None,
                ExpenseTypeFilter::Only(expense_type) => Some(expense_type),
            },
        }
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        category::{Category, CategoryName},
        expense::{Amount, ExpenseType, LedgerEntry},
        report::filter::{
            CategoryFilter, DateRange, ExpenseTypeFilter, ReportFilter, ReportQuery,
            filter_expenses,
        },
    };

    fn entry(
        id: i64,
        amount: f64,
        date: time::Date,
        category_id: i64,
        expense_type: ExpenseType,
    ) -> LedgerEntry {
        LedgerEntry {
            id,
            amount: Amount::new(amount).unwrap(),
            date,
            category_id,
            category_name: if category_id == 1 { "A" } else { "B" }.to_owned(),
            expense_type,
            comment: String::new(),
        }
    }

    fn sample_entries() -> Vec<LedgerEntry> {
        vec![
            entry(1, 10.0, date!(2024 - 01 - 01), 1, ExpenseType::Personal),
            entry(2, 20.0, date!(2024 - 01 - 15), 2, ExpenseType::Shared),
            entry(3, 5.0, date!(2024 - 02 - 01), 1, ExpenseType::Personal),
        ]
    }

    fn year_2024() -> DateRange {
        DateRange::new(date!(2024 - 01 - 01), date!(2024 - 12 - 31))
    }

    #[test]
    fn date_range_is_inclusive() {
        let january = DateRange::new(date!(2024 - 01 - 01), date!(2024 - 01 - 31));
        let filter = ReportFilter::new(january);

        let got = filter_expenses(&sample_entries(), &filter);

        let ids = got.iter().map(|entry| entry.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn filters_by_category_id() {
        let filter = ReportFilter {
            category: CategoryFilter::Only(1),
            ..ReportFilter::new(year_2024())
        };

        let got = filter_expenses(&sample_entries(), &filter);

        let ids = got.iter().map(|entry| entry.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn filters_by_expense_type() {
        let filter = ReportFilter {
            expense_type: ExpenseTypeFilter::Only(ExpenseType::Shared),
            ..ReportFilter::new(year_2024())
        };

        let got = filter_expenses(&sample_entries(), &filter);

        let ids = got.iter().map(|entry| entry.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn empty_result_is_valid() {
        let filter = ReportFilter {
            expense_type: ExpenseTypeFilter::Only(ExpenseType::ForSpouse),
            ..ReportFilter::new(year_2024())
        };

        assert!(filter_expenses(&sample_entries(), &filter).is_empty());
    }

    #[test]
    fn reversed_range_is_swapped() {
        let range = DateRange::new(date!(2024 - 02 - 01), date!(2024 - 01 - 01));

        assert_eq!(range.start, date!(2024 - 01 - 01));
        assert_eq!(range.end, date!(2024 - 02 - 01));
    }

    #[test]
    fn spanning_covers_min_and_max_dates() {
        let range = DateRange::spanning(&sample_entries()).unwrap();

        let want = DateRange::new(date!(2024 - 01 - 01), date!(2024 - 02 - 01));
        assert_eq!(range, want);
        assert_eq!(DateRange::spanning(&[]), None);
    }

    #[test]
    fn query_defaults_to_everything() {
        let default_range = DateRange::new(date!(2024 - 01 - 01), date!(2024 - 02 - 01));

        let filter = ReportQuery::default().into_filter(default_range);

        assert_eq!(filter, ReportFilter::new(default_range));
        assert!(filter.covers_all_groups());
    }

    #[test]
    fn query_string_round_trips_through_filter() {
        let filter = ReportFilter {
            range: DateRange::new(date!(2024 - 01 - 01), date!(2024 - 01 - 31)),
            category: CategoryFilter::Only(2),
            expense_type: ExpenseTypeFilter::Only(ExpenseType::ForSpouse),
        };

        let query_string = ReportQuery::from(&filter).to_query_string();

        assert_eq!(
            query_string,
            "start=2024-01-01&end=2024-01-31&category=2&type=For+spouse"
        );
    }

    #[test]
    fn describe_names_category_and_type() {
        let categories = [Category {
            id: 2,
            name: CategoryName::new_unchecked("Food"),
        }];
        let range = DateRange::new(date!(2024 - 01 - 01), date!(2024 - 01 - 31));

        assert_eq!(
            ReportFilter::new(range).describe(&categories),
            "all categories, all types"
        );
        assert_eq!(
            ReportFilter {
                category: CategoryFilter::Only(2),
                expense_type: ExpenseTypeFilter::Only(ExpenseType::Shared),
                range,
            }
            .describe(&categories),
            "Food, Shared"
        );
    }
}
