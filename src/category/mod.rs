//! Category management for grouping expenses.

mod create;
mod db;
mod domain;
mod list;

pub use create::{create_category_endpoint, new_category_form_view};
pub use db::{
    create_category, create_category_table, get_all_categories, get_category_by_name,
    seed_default_categories,
};
pub use domain::{Category, CategoryId, CategoryName, DEFAULT_CATEGORIES};
pub use list::get_categories_page;
