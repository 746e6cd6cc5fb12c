use axum::response::{IntoResponse, Response};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    account::{get_all_accounts, get_or_create_account},
    auth::UserID,
    category::{get_all_categories, get_or_create_category},
    endpoints::{self, format_endpoint},
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        submit_button,
    },
    money::convert_amount_to_miliunits,
    picker::{Picker, resolve_picker_value},
    transaction::core::{Transaction, TransactionBuilder, TransactionType},
};

/// The form data for creating or editing a transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionForm {
    pub date: Date,
    /// The name of an existing account, or of an account to create.
    pub account: String,
    /// The name of an existing category, a category to create, or empty.
    #[serde(default)]
    pub category: String,
    pub payee: String,
    /// A positive decimal amount, e.g. "12.34". The sign comes from `type`.
    pub amount: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    #[serde(default)]
    pub notes: String,
}

impl TransactionForm {
    /// The values to show in the form when editing `transaction`.
    pub fn from_transaction(
        transaction: &Transaction,
        account_name: &str,
        category_name: Option<&str>,
    ) -> Self {
        Self {
            date: transaction.date,
            account: account_name.to_owned(),
            category: category_name.unwrap_or_default().to_owned(),
            payee: transaction.payee.clone(),
            amount: transaction.amount.abs().to_string(),
            transaction_type: TransactionType::of(transaction.amount),
            notes: transaction.notes.clone(),
        }
    }

    /// An empty form dated `today`.
    pub fn empty(today: Date) -> Self {
        Self {
            date: today,
            account: String::new(),
            category: String::new(),
            payee: String::new(),
            amount: String::new(),
            transaction_type: TransactionType::Expense,
            notes: String::new(),
        }
    }

    /// Validate the form and turn it into a [TransactionBuilder].
    ///
    /// The account and category are looked up by name and created if the
    /// user does not have them yet. Nothing is created unless the other
    /// fields are valid.
    ///
    /// # Errors
    /// Returns [Error::FutureDate], [Error::EmptyPayee], [Error::InvalidAmount]
    /// or [Error::MissingAccount] for invalid input, or [Error::SqlError] if an
    /// account or category could not be created.
    pub fn into_builder(
        self,
        today: Date,
        user_id: UserID,
        connection: &Connection,
    ) -> Result<TransactionBuilder, Error> {
        if self.date > today {
            return Err(Error::FutureDate(self.date));
        }

        let payee = self.payee.trim();
        if payee.is_empty() {
            return Err(Error::EmptyPayee);
        }

        let amount = self
            .transaction_type
            .apply(convert_amount_to_miliunits(&self.amount)?);

        let account_id = resolve_picker_value(&self.account, |name| {
            get_or_create_account(name, user_id, connection).map(|account| account.id)
        })?
        .ok_or(Error::MissingAccount)?;

        let category_id = resolve_picker_value(&self.category, |name| {
            get_or_create_category(name, user_id, connection).map(|category| category.id)
        })?;

        Ok(
            Transaction::build(amount, &account_id, self.date, payee)
                .category_id(category_id)
                .notes(self.notes.trim()),
        )
    }
}

/// Whether the form creates a transaction or edits an existing one.
#[derive(Debug, Clone, Copy)]
pub(crate) enum TransactionFormAction<'a> {
    Create,
    Edit { transaction_id: &'a str },
}

/// Whether `error` should be shown inside the form instead of as an alert.
pub(crate) fn is_form_error(error: &Error) -> bool {
    matches!(
        error,
        Error::FutureDate(_)
            | Error::EmptyPayee
            | Error::InvalidAmount(_)
            | Error::MissingAccount
            | Error::EmptyAccountName
            | Error::EmptyCategoryName
    )
}

/// Render the transaction form with the user's accounts and categories as
/// picker suggestions.
pub(crate) fn render_transaction_form(
    action: TransactionFormAction,
    values: &TransactionForm,
    max_date: Date,
    error_message: Option<&str>,
    user_id: UserID,
    connection: &Connection,
) -> Result<Markup, Error> {
    let account_names = get_all_accounts(user_id, connection)?
        .into_iter()
        .map(|account| account.name.to_string())
        .collect::<Vec<_>>();
    let category_names = get_all_categories(user_id, connection)?
        .into_iter()
        .map(|category| category.name.to_string())
        .collect::<Vec<_>>();

    Ok(transaction_form(
        action,
        values,
        &account_names,
        &category_names,
        max_date,
        error_message,
    ))
}

/// Send back the form with `error` shown above the fields.
pub(crate) fn form_error_response(
    action: TransactionFormAction,
    values: &TransactionForm,
    max_date: Date,
    error: &Error,
    user_id: UserID,
    connection: &Connection,
) -> Response {
    match render_transaction_form(
        action,
        values,
        max_date,
        Some(&format!("Error: {error}")),
        user_id,
        connection,
    ) {
        Ok(form) => form.into_response(),
        Err(error) => {
            tracing::error!("Could not render transaction form: {error}");
            error.into_alert_response()
        }
    }
}

pub(crate) fn transaction_form(
    action: TransactionFormAction,
    values: &TransactionForm,
    account_names: &[String],
    category_names: &[String],
    max_date: Date,
    error_message: Option<&str>,
) -> Markup {
    let (hx_post, hx_put, button_text) = match action {
        TransactionFormAction::Create => (
            Some(endpoints::TRANSACTIONS_API.to_owned()),
            None,
            "Create Transaction",
        ),
        TransactionFormAction::Edit { transaction_id } => (
            None,
            Some(format_endpoint(endpoints::TRANSACTION, transaction_id)),
            "Save Changes",
        ),
    };
    let is_expense = values.transaction_type == TransactionType::Expense;

    html! {
        form
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-disabled-elt="find input, find textarea, find button"
            class="w-full space-y-4"
        {
            @if let Some(error_message) = error_message {
                p class="text-red-500 text-base" { (error_message) }
            }

            fieldset class="space-y-2"
            {
                legend class=(FORM_LABEL_STYLE) { "Type" }

                div class="flex gap-4"
                {
                    @for (value, label, checked) in [("expense", "Expense", is_expense), ("income", "Income", !is_expense)] {
                        div class="flex flex-1 items-center gap-3"
                        {
                            input
                                name="type"
                                id={ "type-" (value) }
                                type="radio"
                                value=(value)
                                checked[checked]
                                required
                                class=(FORM_RADIO_INPUT_STYLE);

                            label for={ "type-" (value) } class=(FORM_RADIO_LABEL_STYLE) { (label) }
                        }
                    }
                }
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                input
                    name="amount"
                    id="amount"
                    type="text"
                    inputmode="decimal"
                    placeholder="0.00"
                    value=(values.amount)
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    name="date"
                    id="date"
                    type="date"
                    max=(max_date)
                    value=(values.date)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            (Picker {
                name: "account",
                label: "Account",
                placeholder: "Select or create an account",
                options: account_names,
                value: &values.account,
                required: true,
            }.into_html())

            (Picker {
                name: "category",
                label: "Category",
                placeholder: "Select or create a category",
                options: category_names,
                value: &values.category,
                required: false,
            }.into_html())

            div
            {
                label for="payee" class=(FORM_LABEL_STYLE) { "Payee" }

                input
                    name="payee"
                    id="payee"
                    type="text"
                    placeholder="e.g. Supermarket"
                    value=(values.payee)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="notes" class=(FORM_LABEL_STYLE)
                {
                    "Notes"
                    span class="font-normal text-gray-500 dark:text-gray-400" { " (optional)" }
                }

                textarea
                    name="notes"
                    id="notes"
                    rows="3"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    (values.notes)
                }
            }

            (submit_button(button_text))
        }
    }
}
