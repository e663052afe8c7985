//! Expense management.
//!
//! This module contains everything related to expenses:
//! - The `Expense` model, `ExpenseBuilder` and the validated `Amount` and `ExpenseType` values
//! - Database functions for storing, querying, updating and deleting expenses
//! - View handlers and endpoints for the expense forms

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod domain;
mod edit_endpoint;
mod edit_page;
mod form;

pub use core::{
    assign_uncategorized_expenses, count_expenses, create_expense, create_expense_table,
    delete_expense, get_all_expenses, get_expense, update_expense,
};
pub use create_endpoint::create_expense_endpoint;
pub use create_page::get_create_expense_page;
pub use delete_endpoint::delete_expense_endpoint;
pub use domain::{Amount, Expense, ExpenseBuilder, ExpenseType, LedgerEntry};
pub use edit_endpoint::edit_expense_endpoint;
pub use edit_page::get_edit_expense_page;
