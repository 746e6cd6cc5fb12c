//! Slide-over panels ("sheets") for create and edit forms.
//!
//! Whether a sheet is open lives in the page's query string, so a sheet can be
//! linked to, survives a reload, and is closed by linking back to the bare
//! page URL.

use maud::{Markup, html};
use serde::Deserialize;

use crate::html::BUTTON_DANGER_STYLE;

const SHEET_PARAM_NEW: &str = "new";
const SHEET_PARAM_EDIT: &str = "edit";

/// The query parameters that control which sheet is open.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SheetQuery {
    /// Either "new" or "edit".
    pub sheet: Option<String>,
    /// The ID of the entity to edit.
    pub id: Option<String>,
}

/// The sheet to render on top of a page.
#[derive(Debug, Clone, PartialEq)]
pub enum Sheet {
    Closed,
    New,
    /// Edit the entity with the given ID.
    Edit(String),
}

impl Sheet {
    /// Read the open sheet from the page's query parameters.
    ///
    /// Unknown sheet names, and `sheet=edit` without a non-empty `id`, mean
    /// the sheet is closed.
    pub fn from_query(query: &SheetQuery) -> Self {
        match (query.sheet.as_deref(), query.id.as_deref()) {
            (Some(SHEET_PARAM_NEW), _) => Sheet::New,
            (Some(SHEET_PARAM_EDIT), Some(id)) if !id.trim().is_empty() => {
                Sheet::Edit(id.trim().to_owned())
            }
            _ => Sheet::Closed,
        }
    }
}

/// The URL that opens the "new" sheet on `page`.
pub fn new_sheet_url(page: &str) -> String {
    format!("{page}?sheet={SHEET_PARAM_NEW}")
}

/// The URL that opens the edit sheet for `id` on `page`.
pub fn edit_sheet_url(page: &str, id: &str) -> String {
    match serde_urlencoded::to_string([("sheet", SHEET_PARAM_EDIT), ("id", id)]) {
        Ok(query) => format!("{page}?{query}"),
        Err(error) => {
            tracing::error!("Could not encode edit sheet URL for {id}: {error}");
            page.to_owned()
        }
    }
}

/// A panel that slides over the right side of the page.
///
/// Clicking the backdrop or the close button follows `close_url`.
pub fn sheet_view(title: &str, description: &str, close_url: &str, content: &Markup) -> Markup {
    html! {
        div
            id="sheet"
            class="fixed inset-0 z-50"
            role="dialog"
            aria-modal="true"
            aria-labelledby="sheet-title"
        {
            a
                href=(close_url)
                class="absolute inset-0 bg-gray-900/50"
                aria-label="Close"
                tabindex="-1"
            {}

            aside
                class="absolute inset-y-0 right-0 flex w-full max-w-md flex-col
                    gap-y-6 overflow-y-auto bg-white p-6 shadow-xl
                    dark:bg-gray-800 text-gray-900 dark:text-white"
            {
                header class="flex items-start justify-between gap-4"
                {
                    div
                    {
                        h2 id="sheet-title" class="text-lg font-semibold" { (title) }
                        p class="text-sm text-gray-500 dark:text-gray-400" { (description) }
                    }

                    a
                        href=(close_url)
                        aria-label="Close"
                        class="text-2xl leading-none text-gray-500 hover:text-gray-900
                            dark:text-gray-400 dark:hover:text-white"
                    {
                        "×"
                    }
                }

                (content)
            }
        }
    }
}

/// Query parameters for delete requests.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    /// Set by the delete button inside an edit sheet. The client is sent back
    /// to the list view instead of receiving an alert.
    #[serde(default)]
    pub redirect: bool,
}

/// A full width delete button for the bottom of an edit sheet.
///
/// The browser asks the user to confirm with `confirm_message` before the
/// request is sent.
pub fn sheet_delete_button(delete_url: &str, confirm_message: &str, text: &str) -> Markup {
    html! {
        button
            type="button"
            hx-delete=(format!("{delete_url}?redirect=true"))
            hx-confirm=(confirm_message)
            hx-target-error="#alert-container"
            hx-disabled-elt="this"
            class=(BUTTON_DANGER_STYLE)
        {
            (text)
        }
    }
}
