//! The create, edit and delete endpoints for categories.

use axum::{
    Extension, Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use serde::Deserialize;

use crate::{
    Error,
    alert::Alert,
    auth::UserID,
    category::{
        CategoryName, CategoryState,
        core::{create_category, delete_category, update_category},
        form::category_form,
    },
    database_id::CategoryId,
    db::lock_connection,
    endpoints,
    sheet::DeleteQuery,
};

/// The form data for creating or renaming a category.
#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    pub name: String,
}

fn back_to_categories() -> Response {
    (
        HxRedirect(endpoints::CATEGORIES_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

/// The category form again, with the reason `raw_name` was rejected.
fn rejected_name(category_id: Option<&str>, raw_name: &str, error: Error) -> Response {
    category_form(category_id, raw_name, Some(&format!("Error: {error}"))).into_response()
}

fn log_unexpected(error: &Error, context: std::fmt::Arguments<'_>) {
    match error {
        Error::DuplicateCategoryName(_) => tracing::debug!("{context}: {error}"),
        _ => tracing::error!("{context}: {error}"),
    }
}

pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<CategoryForm>,
) -> Response {
    let name = match CategoryName::new(&form.name) {
        Ok(name) => name,
        Err(error) => return rejected_name(None, &form.name, error),
    };

    let result = lock_connection(&state.db_connection)
        .and_then(|connection| create_category(name, None, user_id, &connection));

    match result {
        Ok(category) => {
            tracing::info!("User {user_id} created category {}", category.id);
            back_to_categories()
        }
        Err(error) => {
            log_unexpected(&error, format_args!("Could not create category {:?}", form.name));
            error.into_alert_response()
        }
    }
}

pub async fn edit_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
    Form(form): Form<CategoryForm>,
) -> Response {
    let name = match CategoryName::new(&form.name) {
        Ok(name) => name,
        Err(error) => return rejected_name(Some(&category_id), &form.name, error),
    };

    let result = lock_connection(&state.db_connection)
        .and_then(|connection| update_category(&category_id, &name, user_id, &connection));

    match result {
        Ok(0) => Error::UpdateMissingCategory.into_alert_response(),
        Ok(_) => back_to_categories(),
        Err(error) => {
            log_unexpected(&error, format_args!("Could not rename category {category_id}"));
            error.into_alert_response()
        }
    }
}

/// Responds with an alert, or redirects when the edit sheet asked with
/// `?redirect=true`.
pub async fn delete_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
    Query(query): Query<DeleteQuery>,
) -> Response {
    let result = lock_connection(&state.db_connection)
        .and_then(|connection| delete_category(&category_id, user_id, &connection));

    match result {
        Ok(0) => Error::DeleteMissingCategory.into_alert_response(),
        Ok(_) if query.redirect => back_to_categories(),
        Ok(_) => Alert::SuccessSimple {
            message: "Category deleted successfully".to_owned(),
        }
        .into_response(),
        Err(error) => {
            log_unexpected(&error, format_args!("Could not delete category {category_id}"));
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Form,
        extract::{Path, Query, State},
        http::StatusCode,
        response::Response,
    };

    use crate::{
        Error,
        auth::UserID,
        category::{
            CategoryName, CategoryState,
            core::{get_all_categories, get_category},
            create_category,
        },
        endpoints,
        sheet::DeleteQuery,
        test_utils::{
            assert_alert_message, assert_form_error_message, assert_hx_redirect,
            must_create_test_connection, must_get_form, parse_html_fragment,
        },
    };

    use super::{
        CategoryForm, create_category_endpoint, delete_category_endpoint, edit_category_endpoint,
    };

    fn form(name: &str) -> Form<CategoryForm> {
        Form(CategoryForm {
            name: name.to_owned(),
        })
    }

    /// State where alice owns "Food" (if `with_food`), plus both user IDs and
    /// the category's ID.
    fn setup(with_food: bool) -> (CategoryState, UserID, UserID, String) {
        let (connection, alice, bob) = must_create_test_connection();
        let food_id = if with_food {
            create_category(CategoryName::new_unchecked("Food"), None, alice, &connection)
                .unwrap()
                .id
        } else {
            String::new()
        };

        let state = CategoryState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        (state, alice, bob, food_id)
    }

    #[track_caller]
    fn assert_back_to_categories(response: &Response) {
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(response, endpoints::CATEGORIES_VIEW);
    }

    async fn assert_alert(response: Response, status: StatusCode, message: &str) {
        assert_eq!(response.status(), status);
        assert_alert_message(&parse_html_fragment(response).await, message);
    }

    #[tokio::test]
    async fn create_adds_category() {
        let (state, alice, _, _) = setup(false);

        let response =
            create_category_endpoint(State(state.clone()), Extension(alice), form("Food")).await;

        assert_back_to_categories(&response);
        let connection = state.db_connection.lock().unwrap();
        let names = get_all_categories(alice, &connection)
            .unwrap()
            .into_iter()
            .map(|category| category.name)
            .collect::<Vec<_>>();
        assert_eq!(names, [CategoryName::new_unchecked("Food")]);
    }

    #[tokio::test]
    async fn blank_name_returns_form_with_error() {
        let (state, alice, _, _) = setup(false);

        let response = create_category_endpoint(State(state), Extension(alice), form("")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_form_error_message(&must_get_form(&html), "Error: Category name cannot be empty");
    }

    #[tokio::test]
    async fn duplicate_name_ignores_case() {
        let (state, alice, _, _) = setup(true);

        let response = create_category_endpoint(State(state), Extension(alice), form("food")).await;

        assert_alert(response, StatusCode::BAD_REQUEST, "Duplicate Category Name").await;
    }

    #[tokio::test]
    async fn edit_renames() {
        let (state, alice, _, food_id) = setup(true);

        let response = edit_category_endpoint(
            State(state.clone()),
            Extension(alice),
            Path(food_id.clone()),
            form("Groceries"),
        )
        .await;

        assert_back_to_categories(&response);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_category(&food_id, alice, &connection).unwrap().name,
            CategoryName::new_unchecked("Groceries")
        );
    }

    #[tokio::test]
    async fn edit_by_other_user_is_not_found() {
        let (state, _, bob, food_id) = setup(true);

        let response =
            edit_category_endpoint(State(state), Extension(bob), Path(food_id), form("Groceries"))
                .await;

        assert_alert(response, StatusCode::NOT_FOUND, "Could not update category").await;
    }

    #[tokio::test]
    async fn delete_from_list_shows_alert() {
        let (state, alice, _, food_id) = setup(true);

        let response = delete_category_endpoint(
            State(state.clone()),
            Extension(alice),
            Path(food_id.clone()),
            Query(DeleteQuery::default()),
        )
        .await;

        assert_alert(response, StatusCode::OK, "Category deleted successfully").await;
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_category(&food_id, alice, &connection),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn delete_from_sheet_redirects() {
        let (state, alice, _, food_id) = setup(true);

        let response = delete_category_endpoint(
            State(state),
            Extension(alice),
            Path(food_id),
            Query(DeleteQuery { redirect: true }),
        )
        .await;

        assert_back_to_categories(&response);
    }

    #[tokio::test]
    async fn delete_by_other_user_is_not_found() {
        let (state, _, bob, food_id) = setup(true);

        let response = delete_category_endpoint(
            State(state),
            Extension(bob),
            Path(food_id),
            Query(DeleteQuery::default()),
        )
        .await;

        assert_alert(response, StatusCode::NOT_FOUND, "Could not delete category").await;
    }
}
