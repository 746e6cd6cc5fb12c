//! Creates the application's tables in a SQLite database.

use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, account::create_account_table, auth::create_user_table,
    category::create_category_table, transaction::create_transaction_table,
};

/// Create all of the application's tables in a single exclusive transaction
/// and turn on foreign key enforcement for `connection`.
///
/// Tables are only created if they do not already exist, so it is safe to
/// call this on an existing database.
///
/// # Errors
/// Returns an error if a table could not be created or the transaction fails to commit.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Foreign key enforcement is a per-connection setting and cannot be changed
    // inside a transaction.
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_account_table(&transaction)?;
    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Take the connection shared by the handlers.
///
/// # Errors
///
/// Returns [Error::DatabaseLockError] if a thread panicked while holding it.
pub(crate) fn lock_connection(
    connection: &Mutex<Connection>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    connection.lock().map_err(|error| {
        tracing::error!("Could not lock the database connection: {error}");
        Error::DatabaseLockError
    })
}
