//! Totals and breakdowns over filtered expenses.

use std::{collections::HashMap, hash::Hash};

use crate::{
    category::{Category, CategoryId},
    expense::{ExpenseType, LedgerEntry},
    report::filter::{ReportFilter, filter_expenses},
};

/// The sum of all amounts, zero for no entries.
pub fn total(entries: &[LedgerEntry]) -> f64 {
    entries.iter().map(|entry| entry.amount.value()).sum()
}

/// Group entries by `key` and sum the amounts in each group.
pub fn aggregate_by<K, F>(entries: &[LedgerEntry], key: F) -> HashMap<K, f64>
where
    K: Eq + Hash,
    F: Fn(&LedgerEntry) -> K,
{
    let mut totals = HashMap::new();

    for entry in entries {
        *totals.entry(key(entry)).or_insert(0.0) += entry.amount.value();
    }

    totals
}

/// The total for every category, including categories with no entries.
///
/// The result follows the order of `categories`.
pub fn totals_by_category(
    entries: &[LedgerEntry],
    categories: &[Category],
) -> Vec<(Category, f64)> {
    let totals: HashMap<CategoryId, f64> = aggregate_by(entries, |entry| entry.category_id);

    categories
        .iter()
        .map(|category| {
            let total = totals.get(&category.id).copied().unwrap_or(0.0);
            (category.clone(), total)
        })
        .collect()
}

/// The total for each expense type present in `entries`, largest first.
///
/// Ties are broken by the order of [ExpenseType::ALL].
pub fn totals_by_expense_type(entries: &[LedgerEntry]) -> Vec<(ExpenseType, f64)> {
    let mut totals = aggregate_by(entries, |entry| entry.expense_type)
        .into_iter()
        .collect::<Vec<_>>();

    totals.sort_by(|(type_a, total_a), (type_b, total_b)| {
        total_b.total_cmp(total_a).then(type_a.cmp(type_b))
    });

    totals
}

/// Everything the expenses page shows for a filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// The filter the report was built with.
    pub filter: ReportFilter,
    /// The entries that passed the filter, most recent first.
    pub entries: Vec<LedgerEntry>,
    /// The sum of the amounts in `entries`.
    pub total: f64,
    /// The total for every category, including those with no entries.
    pub by_category: Vec<(Category, f64)>,
    /// The total for each expense type in `entries`, largest first.
    pub by_expense_type: Vec<(ExpenseType, f64)>,
}

/// What a filter produced.
///
/// Having nothing recorded and having nothing match the filter are shown to
/// the user differently.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    /// No expenses have been recorded at all.
    NoData,
    /// Expenses exist but none match the filter.
    NoMatches(ReportFilter),
    /// At least one expense matches the filter.
    Results(Report),
}

impl Report {
    /// Filter `all_entries` and compute the totals for the result.
    pub fn build(
        all_entries: &[LedgerEntry],
        categories: &[Category],
        filter: ReportFilter,
    ) -> ReportOutcome {
        if all_entries.is_empty() {
            return ReportOutcome::NoData;
        }

        let entries = filter_expenses(all_entries, &filter);

        if entries.is_empty() {
            return ReportOutcome::NoMatches(filter);
        }

        ReportOutcome::Results(Report {
            filter,
            total: total(&entries),
            by_category: totals_by_category(&entries, categories),
            by_expense_type: totals_by_expense_type(&entries),
            entries,
        })
    }
}
