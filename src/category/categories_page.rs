use axum::{
    Extension,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    auth::UserID,
    category::{
        Category, CategoryState,
        core::{get_all_categories, get_category},
        form::category_form,
    },
    db::lock_connection,
    endpoints::{self, format_endpoint},
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, base, edit_delete_action_links},
    navigation::NavBar,
    sheet::{Sheet, SheetQuery, edit_sheet_url, new_sheet_url, sheet_delete_button, sheet_view},
};

const DELETE_CATEGORY_CONFIRM_MESSAGE: &str = "Are you sure you want to delete this category? \
    Its transactions will become uncategorised.";

fn category_list_item(category: &Category) -> Markup {
    html! {
        li class="flex items-center justify-between px-4 py-3"
        {
            span class="font-medium text-gray-900 dark:text-white" { (category.name) }

            (edit_delete_action_links(
                &edit_sheet_url(endpoints::CATEGORIES_VIEW, &category.id),
                &format_endpoint(endpoints::CATEGORY, &category.id),
                DELETE_CATEGORY_CONFIRM_MESSAGE,
                "closest li",
                "delete",
            ))
        }
    }
}

fn categories_view(categories: &[Category], sheet: Option<Markup>) -> Markup {
    let new_category_url = new_sheet_url(endpoints::CATEGORIES_VIEW);

    let content = html! {
        (NavBar::new(endpoints::CATEGORIES_VIEW).into_html())

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-3xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Categories" }
                    a href=(new_category_url) class=(LINK_STYLE) { "New Category" }
                }

                @if categories.is_empty() {
                    p class="text-gray-500 dark:text-gray-400"
                    {
                        "No categories yet. Create a category "
                        a href=(new_category_url) class=(LINK_STYLE) { "here" }
                        "."
                    }
                } @else {
                    ul
                        class="divide-y divide-gray-200 dark:divide-gray-700 rounded
                            bg-white dark:bg-gray-800 shadow"
                    {
                        @for category in categories {
                            (category_list_item(category))
                        }
                    }
                }
            }
        }

        @if let Some(sheet) = sheet {
            (sheet)
        }
    };

    base("Categories", &content)
}

/// Renders the categories page, with a sheet on top if one is open.
pub async fn get_categories_page(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<SheetQuery>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let categories = get_all_categories(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get categories: {error}"))?;

    let sheet = match Sheet::from_query(&query) {
        Sheet::Closed => None,
        Sheet::New => Some(sheet_view(
            "New Category",
            "Create a new category to organise your transactions.",
            endpoints::CATEGORIES_VIEW,
            &category_form(None, "", None),
        )),
        Sheet::Edit(category_id) => {
            let content = match get_category(&category_id, user_id, &connection) {
                Ok(category) => html! {
                    (category_form(Some(&category.id), category.name.as_ref(), None))
                    (sheet_delete_button(
                        &format_endpoint(endpoints::CATEGORY, &category.id),
                        DELETE_CATEGORY_CONFIRM_MESSAGE,
                        "Delete Category",
                    ))
                },
                Err(Error::NotFound) => html! {
                    p class="text-gray-500 dark:text-gray-400" { "Category not found" }
                },
                Err(error) => return Err(error),
            };

            Some(sheet_view(
                "Edit Category",
                "Edit an existing category.",
                endpoints::CATEGORIES_VIEW,
                &content,
            ))
        }
    };

    Ok(categories_view(&categories, sheet).into_response())
}
