//! The account model and the functions for storing accounts in the database.

use std::fmt::Display;

use rusqlite::{Connection, Row, params};
use serde::Serialize;

use crate::{
    Error,
    auth::UserID,
    database_id::{AccountId, create_id},
};

/// The name of an account, e.g. "Cash", with surrounding whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AccountName(String);

impl AccountName {
    /// Create an account name from `name`.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyAccountName] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyAccountName)
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create an account name without validation.
    ///
    /// The caller should ensure that `name` is trimmed and not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for AccountName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for AccountName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A place money is kept, e.g. a bank account or credit card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    /// The id for the account.
    pub id: AccountId,
    /// The id of the account at an external provider, if it was imported.
    pub plaid_id: Option<String>,
    /// The display name.
    pub name: AccountName,
    /// The user that owns the account.
    pub user_id: UserID,
}

pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id TEXT PRIMARY KEY,
            plaid_id TEXT,
            name TEXT NOT NULL COLLATE NOCASE,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            UNIQUE(user_id, name)
        )",
        (),
    )?;

    Ok(())
}

fn map_row_to_account(row: &Row) -> Result<Account, rusqlite::Error> {
    let raw_name: String = row.get(2)?;

    Ok(Account {
        id: row.get(0)?,
        plaid_id: row.get(1)?,
        name: AccountName::new_unchecked(&raw_name),
        user_id: UserID::new(row.get(3)?),
    })
}

fn map_unique_violation(error: rusqlite::Error, name: &AccountName) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(sql_error, _)
            if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            Error::DuplicateAccountName(name.to_string())
        }
        error => error.into(),
    }
}

/// Create a new account for `user_id`.
///
/// # Errors
///
/// Returns:
/// - [Error::DuplicateAccountName] if the user already has an account called `name`, ignoring case,
/// - [Error::SqlError] if there is some other SQL error.
pub fn create_account(
    name: AccountName,
    plaid_id: Option<&str>,
    user_id: UserID,
    connection: &Connection,
) -> Result<Account, Error> {
    let id = create_id();

    connection
        .execute(
            "INSERT INTO account (id, plaid_id, name, user_id) VALUES (?1, ?2, ?3, ?4)",
            params![id, plaid_id, name.as_ref(), user_id.as_i64()],
        )
        .map_err(|error| map_unique_violation(error, &name))?;

    Ok(Account {
        id,
        plaid_id: plaid_id.map(ToOwned::to_owned),
        name,
        user_id,
    })
}

/// Retrieve the account `id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to an account owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_account(id: &str, user_id: UserID, connection: &Connection) -> Result<Account, Error> {
    let account = connection
        .prepare(
            "SELECT id, plaid_id, name, user_id FROM account \
            WHERE id = ?1 AND user_id = ?2",
        )?
        .query_one(params![id, user_id.as_i64()], map_row_to_account)?;

    Ok(account)
}

/// Get all of the accounts owned by `user_id` sorted by name.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_all_accounts(user_id: UserID, connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare(
            "SELECT id, plaid_id, name, user_id FROM account \
            WHERE user_id = ?1 ORDER BY name ASC",
        )?
        .query_map([user_id.as_i64()], map_row_to_account)?
        .map(|account_result| account_result.map_err(Error::from))
        .collect()
}

/// Find the account owned by `user_id` called `name`, ignoring case, or
/// create it if there is none.
///
/// # Errors
///
/// Returns [Error::EmptyAccountName] if `name` is blank, or [Error::SqlError]
/// if the account could not be read or created.
pub fn get_or_create_account(
    name: &str,
    user_id: UserID,
    connection: &Connection,
) -> Result<Account, Error> {
    let name = AccountName::new(name)?;

    let existing = connection
        .prepare(
            "SELECT id, plaid_id, name, user_id FROM account \
            WHERE user_id = ?1 AND name = ?2",
        )?
        .query_one(params![user_id.as_i64(), name.as_ref()], map_row_to_account);

    match existing {
        Ok(account) => Ok(account),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            tracing::debug!("Creating account \"{name}\" for user {user_id}");
            create_account(name, None, user_id, connection)
        }
        Err(error) => Err(error.into()),
    }
}

pub type RowsAffected = usize;

/// Rename the account `id` owned by `user_id`.
///
/// Returns the number of rows updated, zero if there is no such account.
///
/// # Errors
///
/// Returns [Error::DuplicateAccountName] if the user has another account called `name`.
pub fn update_account(
    id: &str,
    name: &AccountName,
    user_id: UserID,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "UPDATE account SET name = ?1 WHERE id = ?2 AND user_id = ?3",
            params![name.as_ref(), id, user_id.as_i64()],
        )
        .map_err(|error| map_unique_violation(error, name))
}

/// Delete the account `id` owned by `user_id` along with its transactions.
///
/// Returns the number of accounts deleted, zero if there is no such account.
pub fn delete_account(
    id: &str,
    user_id: UserID,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM account WHERE id = ?1 AND user_id = ?2",
            params![id, user_id.as_i64()],
        )
        .map_err(Error::from)
}
