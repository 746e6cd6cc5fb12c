//! Accounts are the places money is kept, e.g. "Cash" or "Credit Card".

mod accounts_page;
mod api;
mod core;
mod form;
mod handlers;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

pub use accounts_page::get_accounts_page;
pub use api::{get_account_json, get_accounts_json};
pub use core::{
    Account, AccountName, create_account, create_account_table, get_account, get_all_accounts,
    get_or_create_account,
};
pub use handlers::{create_account_endpoint, delete_account_endpoint, edit_account_endpoint};

/// The state needed by the account pages and endpoints.
#[derive(Debug, Clone)]
pub struct AccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
