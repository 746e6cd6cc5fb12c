//! Spending and income categories, e.g. "Groceries" or "Wages".

mod api;
mod categories_page;
mod core;
mod form;
mod handlers;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

pub use api::{get_categories_json, get_category_json};
pub use categories_page::get_categories_page;
pub use core::{
    Category, CategoryName, create_category, create_category_table, get_all_categories,
    get_category, get_or_create_category,
};
pub use handlers::{create_category_endpoint, delete_category_endpoint, edit_category_endpoint};

/// The state needed by the category pages and endpoints.
#[derive(Debug, Clone)]
pub struct CategoryState {
    /// The database connection for managing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
