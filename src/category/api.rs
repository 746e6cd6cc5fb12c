use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::{
    Error,
    auth::UserID,
    category::{
        Category, CategoryState,
        core::{get_all_categories, get_category},
    },
    database_id::CategoryId,
    db::lock_connection,
};

/// A route handler that returns the user's categories as JSON.
pub async fn get_categories_json(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Category>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    Ok(Json(get_all_categories(user_id, &connection)?))
}

/// A route handler that returns a single category as JSON.
pub async fn get_category_json(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
) -> Result<Json<Category>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    Ok(Json(get_category(&category_id, user_id, &connection)?))
}
