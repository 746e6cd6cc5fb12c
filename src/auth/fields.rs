//! Markup shared by the log-in and registration pages.

use maud::{Markup, html};

use crate::html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, field_error};

/// The centred card that holds the log-in or registration form.
pub(super) fn auth_page(page_title: &str, heading: &str, form: &Markup) -> Markup {
    let content = html! {
        main class="min-h-screen flex flex-col items-center justify-center gap-6 px-6 py-8"
        {
            p class="text-3xl font-bold tracking-tight text-teal-700 dark:text-teal-400"
            {
                "Buddy"
            }

            section
                class="w-full sm:max-w-md p-6 sm:p-8 flex flex-col gap-5 rounded-xl
                    bg-white dark:bg-gray-800 shadow-md ring-1 ring-gray-200
                    dark:ring-gray-700"
            {
                h1 class="text-xl md:text-2xl font-semibold text-gray-900 dark:text-white"
                {
                    (heading)
                }

                (form)
            }
        }
    };

    base(page_title, &content)
}

pub(super) fn username_field(value: &str, error: Option<&str>) -> Markup {
    html! {
        div
        {
            label for="username" class=(FORM_LABEL_STYLE) { "Username" }

            input
                type="text"
                id="username"
                name="username"
                value=(value)
                autocomplete="username"
                autofocus
                required
                class=(FORM_TEXT_INPUT_STYLE);

            @if let Some(error) = error {
                (field_error(error))
            }
        }
    }
}

/// A password input. `min_length` is a hint for the browser only.
pub(super) fn password_field(
    name: &str,
    label: &str,
    autocomplete: &str,
    min_length: Option<u8>,
    error: Option<&str>,
) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            input
                type="password"
                id=(name)
                name=(name)
                autocomplete=(autocomplete)
                minlength=[min_length]
                autofocus[error.is_some()]
                required
                class=(FORM_TEXT_INPUT_STYLE);

            @if let Some(error) = error {
                (field_error(error))
            }
        }
    }
}

/// The line under a form that links to the other auth page.
pub(super) fn switch_page_link(question: &str, href: &str, link_text: &str) -> Markup {
    html! {
        p class="text-sm text-gray-500 dark:text-gray-400"
        {
            (question) " "
            a href=(href) class="font-semibold text-teal-700 hover:underline dark:text-teal-400"
            {
                (link_text)
            }
        }
    }
}
