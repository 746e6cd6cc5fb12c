//! JSON reads of a user's accounts.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::{
    Error,
    account::{
        Account, AccountState,
        core::{get_account, get_all_accounts},
    },
    auth::UserID,
    database_id::AccountId,
    db::lock_connection,
};

/// A route handler that returns all of the user's accounts sorted by name.
pub async fn get_accounts_json(
    State(state): State<AccountState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Account>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_all_accounts(user_id, &connection).map(Json)
}

/// A route handler that returns a single account, or 404 if the user has no
/// such account.
pub async fn get_account_json(
    State(state): State<AccountState>,
    Extension(user_id): Extension<UserID>,
    Path(account_id): Path<AccountId>,
) -> Result<Json<Account>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_account(&account_id, user_id, &connection).map(Json)
}
