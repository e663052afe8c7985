//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// The categories a fresh ledger starts with.
pub const DEFAULT_CATEGORIES: [&str; 6] =
    ["Food", "Housing", "Transport", "Leisure", "Health", "Other"];

/// A validated, non-empty category name.
///
/// Names are normalized so that the first character is upper case and the
/// rest are lower case, so "food", "FOOD" and "Food" all name the same
/// category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a normalized category name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is
    /// empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            return Err(Error::EmptyCategoryName);
        }

        let mut chars = name.chars();
        let normalized = match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect(),
            None => String::new(),
        };

        Ok(Self(normalized))
    }

    /// Create a category name without validation or normalization.
    ///
    /// Intended for names read back from the database, which were validated on the way in.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a category.
pub type CategoryId = i64;

/// A named grouping for expenses, e.g. 'Food' or 'Transport'.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The unique, normalized name of the category.
    pub name: CategoryName,
}

/// Form data for category creation.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryFormData {
    /// The name as typed by the user.
    pub name: String,
}
