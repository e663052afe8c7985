//! The shared form used to create and edit expenses.

use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    category::{Category, CategoryId},
    expense::{Amount, Expense, ExpenseBuilder, ExpenseType},
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE,
    },
};

/// The form data for creating or updating an expense.
#[derive(Debug, Deserialize)]
pub struct ExpenseForm {
    /// The amount as entered, validated by [ExpenseForm::into_builder].
    pub amount: f64,
    /// The day the money was spent.
    pub date: Date,
    /// The ID of the chosen category.
    pub category_id: CategoryId,
    /// The expense type label, e.g. "For spouse".
    pub expense_type: String,
    /// The optional note. Blank notes are stored as empty.
    #[serde(default)]
    pub comment: Option<String>,
}

impl ExpenseForm {
    /// Validate the submitted values.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] or [Error::InvalidExpenseType] for bad input.
    /// Whether the category exists is checked when the expense is written.
    pub fn into_builder(self) -> Result<ExpenseBuilder, Error> {
        let amount = Amount::new(self.amount)?;
        let expense_type = self.expense_type.parse::<ExpenseType>()?;
        let comment = self.comment.unwrap_or_default();

        Ok(Expense::build(amount, self.date, self.category_id)
            .expense_type(expense_type)
            .comment(comment.trim()))
    }
}

/// The values to pre-fill the form with.
pub struct ExpenseFormDefaults<'a> {
    pub amount: Option<f64>,
    pub date: Date,
    /// The category to select, or the first one if `None`.
    pub category_id: Option<CategoryId>,
    pub expense_type: ExpenseType,
    pub comment: Option<&'a str>,
    pub autofocus_amount: bool,
}

/// The inputs shared by the new and edit expense forms.
pub fn expense_form_fields(defaults: &ExpenseFormDefaults<'_>, categories: &[Category]) -> Markup {
    let amount_str = defaults.amount.map(|amount| format!("{amount:.2}"));

    html! {
        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            // w-full needed to ensure input takes the full width when prefilled with a value
            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    min="0"
                    placeholder="0.00"
                    required
                    value=[amount_str.as_deref()]
                    autofocus[defaults.autofocus_amount]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label
                for="date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="date"
                id="date"
                type="date"
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="category_id"
                class=(FORM_LABEL_STYLE)
            {
                "Category"
            }

            select
                name="category_id"
                id="category_id"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                @for category in categories {
                    @if Some(category.id) == defaults.category_id {
                        option value=(category.id) selected { (category.name) }
                    } @else {
                        option value=(category.id) { (category.name) }
                    }
                }
            }
        }

        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Expense type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                @for expense_type in ExpenseType::ALL {
                    @let input_id = format!("expense-type-{}", expense_type.as_str().to_lowercase().replace(' ', "-"));

                    div class="flex items-center gap-3"
                    {
                        input
                            name="expense_type"
                            id=(input_id)
                            type="radio"
                            value=(expense_type)
                            checked[expense_type == defaults.expense_type]
                            required
                            class=(FORM_RADIO_INPUT_STYLE);

                        label
                            for=(input_id)
                            class=(FORM_RADIO_LABEL_STYLE)
                        {
                            (expense_type)
                        }
                    }
                }
            }
        }

        div
        {
            label
                for="comment"
                class=(FORM_LABEL_STYLE)
            {
                "Comment"
            }

            input
                name="comment"
                id="comment"
                type="text"
                placeholder="Optional note"
                value=[defaults.comment]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}
