use maud::{Markup, html};

use crate::{
    endpoints::{self, format_endpoint},
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, submit_button},
};

/// Whether the form creates a new account or edits an existing one.
#[derive(Debug, Clone, Copy)]
pub(crate) enum AccountFormAction<'a> {
    Create,
    Edit { account_id: &'a str },
}

/// The form for the name of an account.
///
/// Validation errors come back as a new copy of this form which replaces the
/// old one. Other errors are shown as an alert.
pub(crate) fn account_form(
    action: AccountFormAction,
    name: &str,
    error_message: Option<&str>,
) -> Markup {
    let (hx_post, hx_put, button_text) = match action {
        AccountFormAction::Create => (Some(endpoints::ACCOUNTS_API.to_owned()), None, "Create Account"),
        AccountFormAction::Edit { account_id } => (
            None,
            Some(format_endpoint(endpoints::ACCOUNT, account_id)),
            "Save Changes",
        ),
    };

    html! {
        form
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-disabled-elt="#name, #submit-button"
            class="w-full space-y-4 md:space-y-6"
        {
            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }

            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Name" }

                input
                    type="text"
                    name="name"
                    id="name"
                    value=(name)
                    placeholder="e.g. Cash, Bank, Credit Card"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            (submit_button(button_text))
        }
    }
}
