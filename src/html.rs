//! Page skeleton, shared Tailwind classes and small widgets used across views.

use maud::{DOCTYPE, Markup, html};

use crate::money::Milliunits;

pub const LINK_STYLE: &str = "font-medium text-teal-700 underline-offset-2 \
    hover:underline dark:text-teal-400";

pub const BUTTON_PRIMARY_STYLE: &str = "inline-flex w-full items-center justify-center \
    gap-2 rounded-lg bg-teal-600 px-4 py-2.5 font-semibold text-white shadow-sm \
    hover:enabled:bg-teal-700 disabled:opacity-60 dark:bg-teal-500 \
    hover:enabled:dark:bg-teal-600";

pub const BUTTON_DELETE_STYLE: &str = "cursor-pointer border-none bg-transparent \
    font-medium text-rose-600 hover:underline dark:text-rose-400";

pub const BUTTON_DANGER_STYLE: &str = "inline-flex w-full items-center justify-center \
    rounded-lg bg-rose-600 px-4 py-2.5 font-semibold text-white \
    hover:enabled:bg-rose-700 disabled:opacity-60";

pub const FORM_LABEL_STYLE: &str = "mb-1.5 block text-sm font-medium \
    text-gray-700 dark:text-gray-200";

pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full rounded-lg border \
    border-gray-300 bg-white p-2.5 text-sm text-gray-900 \
    focus:border-teal-500 focus:ring-teal-500 disabled:text-gray-400 \
    dark:border-gray-600 dark:bg-gray-800 dark:text-white";

pub const FORM_RADIO_INPUT_STYLE: &str = "peer sr-only";

pub const FORM_RADIO_LABEL_STYLE: &str = "flex-1 cursor-pointer rounded-lg border \
    border-gray-300 px-3 py-2 text-center text-sm font-medium text-gray-600 \
    hover:bg-gray-100 peer-checked:border-teal-600 peer-checked:bg-teal-50 \
    peer-checked:text-teal-800 peer-focus-visible:ring-2 peer-focus-visible:ring-teal-500 \
    dark:border-gray-600 dark:text-gray-300 dark:hover:bg-gray-700 \
    peer-checked:dark:bg-teal-900/40 peer-checked:dark:text-teal-200";

pub const TABLE_HEADER_STYLE: &str = "bg-gray-100 text-left text-xs font-semibold \
    uppercase tracking-wide text-gray-500 dark:bg-gray-800 dark:text-gray-400";

pub const TABLE_ROW_STYLE: &str = "border-b border-gray-200 bg-white \
    dark:border-gray-700 dark:bg-gray-900";

pub const TABLE_CELL_STYLE: &str = "px-4 py-3";

pub const PAGE_CONTAINER_STYLE: &str = "mx-auto flex w-full max-w-5xl flex-col \
    gap-4 px-4 py-6 text-gray-900 dark:text-gray-100";

/// The document every page is rendered into.
///
/// `content` is followed by `#alert-container`, which htmx swaps alerts into.
pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " | Buddy" }
                link rel="icon" type="image/svg+xml" href="/static/favicon.svg";

                script src="https://unpkg.com/@tailwindcss/browser@4" {}
                script src="https://unpkg.com/htmx.org@2.0.8/dist/htmx.min.js" {}
                script src="https://unpkg.com/htmx-ext-response-targets@2.0.4/response-targets.js" {}

                style
                {
                    "#indicator.htmx-indicator, #indicator .htmx-indicator { display: none; } "
                    "#indicator.htmx-request.htmx-indicator, "
                    "#indicator.htmx-request .htmx-indicator { display: inline; }"
                }
            }

            body
                hx-ext="response-targets"
                class="min-h-screen bg-gray-50 pb-20 text-gray-900 lg:pb-0
                    dark:bg-gray-950 dark:text-gray-100"
            {
                (content)

                div
                    id="alert-container"
                    class="fixed bottom-4 left-1/2 z-50 w-full max-w-md -translate-x-1/2 px-4"
                {}
            }
        }
    }
}

/// A full page with a big status code, what happened and what to do next.
pub fn error_view(title: &str, status_code: &str, message: &str, next_step: &str) -> Markup {
    let content = html! {
        main class="flex min-h-screen flex-col items-center justify-center gap-4 px-6 text-center"
        {
            h1 class="text-7xl font-black tracking-tight text-teal-600 lg:text-9xl dark:text-teal-400"
            {
                (status_code)
            }

            p class="text-2xl font-bold md:text-3xl" { (message) }
            p class="text-lg text-gray-600 dark:text-gray-400" { (next_step) }

            a href="/" class=(LINK_STYLE) { "Take me home" }
        }
    };

    base(title, &content)
}

/// The red message under a form field.
pub fn field_error(message: &str) -> Markup {
    html! {
        p class="text-red-500 text-base mt-1" { (message) }
    }
}

fn loading_spinner() -> Markup {
    html! {
        svg
            aria-hidden="true"
            class="inline h-4 w-4 animate-spin"
            viewBox="0 0 24 24"
            fill="none"
            xmlns="http://www.w3.org/2000/svg"
        {
            circle cx="12" cy="12" r="10" stroke="currentColor" stroke-opacity="0.25" stroke-width="4" {}
            path d="M22 12a10 10 0 0 0-10-10" stroke="currentColor" stroke-width="4" stroke-linecap="round" {}
        }
    }
}

/// A submit button that spins while its form's request is in flight.
pub fn submit_button(text: &str) -> Markup {
    html! {
        button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
        {
            span id="indicator" class="htmx-indicator" { (loading_spinner()) }
            (text)
        }
    }
}

/// Format `amount` as dollars and cents with thousands separators, e.g.,
/// "$1,234.50" or "-$5.00".
///
/// Milliunits are rounded half away from zero to the nearest cent.
pub fn format_currency(amount: Milliunits) -> String {
    let milliunits = amount.as_i64();
    let total_cents = {
        let abs = milliunits.unsigned_abs();
        abs / 10 + u64::from(abs % 10 >= 5)
    };

    let dollars = (total_cents / 100).to_string();
    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (index, digit) in dollars.chars().enumerate() {
        let remaining = dollars.len() - index;
        if index > 0 && remaining % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if milliunits < 0 && total_cents > 0 { "-" } else { "" };

    format!("{sign}${grouped}.{:02}", total_cents % 100)
}

/// "Edit" and "Delete" controls for a row of a list page.
///
/// Delete asks `confirm_message` first. A successful response is swapped into
/// `hx_target` with `hx_swap` and an error goes to the alert container.
pub fn edit_delete_action_links(
    edit_url: &str,
    delete_url: &str,
    confirm_message: &str,
    hx_target: &str,
    hx_swap: &str,
) -> Markup {
    html! {
        div class="flex gap-4"
        {
            a href=(edit_url) class=(LINK_STYLE) { "Edit" }

            button
                hx-delete=(delete_url)
                hx-confirm=(confirm_message)
                hx-target=(hx_target)
                hx-target-error="#alert-container"
                hx-swap=(hx_swap)
                class=(BUTTON_DELETE_STYLE)
            {
                "Delete"
            }
        }
    }
}
