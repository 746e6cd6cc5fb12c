//! JSON reads of a user's transactions.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};

use crate::{
    Error,
    auth::UserID,
    database_id::TransactionId,
    db::lock_connection,
    transaction::{
        Transaction, TransactionFilter, TransactionState,
        core::{TransactionListItem, get_transaction, get_transactions},
    },
};

/// A route handler that returns the user's transactions, newest first.
///
/// Pass `account_id` in the query string to only get one account's transactions.
pub async fn get_transactions_json(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Query(filter): Query<TransactionFilter>,
) -> Result<Json<Vec<TransactionListItem>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_transactions(user_id, &filter, &connection).map(Json)
}

/// A route handler that returns a single transaction.
pub async fn get_transaction_json(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<Transaction>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_transaction(&transaction_id, user_id, &connection).map(Json)
}
