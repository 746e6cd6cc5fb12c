//! Alerts for displaying success and error messages to users.
//!
//! Alerts are rendered into `#alert-container` by htmx, either as the target
//! of a successful delete or via `hx-target-error` when a request fails.

use axum::response::{Html, IntoResponse, Response};
use maud::{Markup, html};

/// An alert message, styled according to whether it reports success or failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message with extra details.
    Success { message: String, details: String },
    /// A success message without details.
    SuccessSimple { message: String },
    /// An error message with details on what went wrong or how to fix it.
    Error { message: String, details: String },
}

const SUCCESS_STYLE: &str = "p-4 mb-4 text-sm text-green-800 rounded-lg \
    bg-green-50 dark:bg-gray-800 dark:text-green-400 border border-green-300 \
    dark:border-green-800";

const ERROR_STYLE: &str = "p-4 mb-4 text-sm text-red-800 rounded-lg \
    bg-red-50 dark:bg-gray-800 dark:text-red-400 border border-red-300 \
    dark:border-red-800";

impl Alert {
    pub fn into_html(self) -> Markup {
        let (style, role, message, details) = match self {
            Alert::Success { message, details } => (SUCCESS_STYLE, "status", message, details),
            Alert::SuccessSimple { message } => (SUCCESS_STYLE, "status", message, String::new()),
            Alert::Error { message, details } => (ERROR_STYLE, "alert", message, details),
        };

        // Template adapted from https://flowbite.com/docs/components/alerts/
        html! {
            div
                class=(style)
                role=(role)
            {
                div class="flex items-start justify-between gap-4"
                {
                    div
                    {
                        span class="font-medium" { (message) }

                        @if !details.is_empty()
                        {
                            p class="mt-1" { (details) }
                        }
                    }

                    button
                        type="button"
                        aria-label="Close"
                        class="font-bold"
                        onclick="this.closest('div[role]').remove()"
                    {
                        "×"
                    }
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        Html(self.into_html().into_string()).into_response()
    }
}
