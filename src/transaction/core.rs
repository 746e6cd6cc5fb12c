//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    auth::UserID,
    database_id::{AccountId, CategoryId, TransactionId, create_id},
    money::Milliunits,
};

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: TransactionId,
    /// Negative for expenses, positive for income.
    pub amount: Milliunits,
    pub account_id: AccountId,
    pub category_id: Option<CategoryId>,
    /// When the money moved.
    pub date: Date,
    /// Free-text notes, empty if there are none.
    pub notes: String,
    /// Who was paid or who paid, e.g. "Countdown".
    pub payee: String,
    pub user_id: UserID,
}

impl Transaction {
    /// Start building a transaction with the required fields.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(amount: Milliunits, account_id: &str, date: Date, payee: &str) -> TransactionBuilder {
        TransactionBuilder {
            amount,
            account_id: account_id.to_owned(),
            category_id: None,
            date,
            notes: String::new(),
            payee: payee.to_owned(),
        }
    }
}

/// The fields of a transaction that a user can set.
///
/// ```ignore
/// let builder = Transaction::build(Milliunits::new(-4_500), &cash.id, date!(2025-01-15), "Cafe")
///     .category_id(Some(eating_out.id))
///     .notes("Flat white");
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    pub amount: Milliunits,
    pub account_id: AccountId,
    pub category_id: Option<CategoryId>,
    pub date: Date,
    pub notes: String,
    pub payee: String,
}

impl TransactionBuilder {
    /// Set the category of the transaction.
    pub fn category_id(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }

    /// Set the notes for the transaction.
    pub fn notes(mut self, notes: &str) -> Self {
        notes.clone_into(&mut self.notes);
        self
    }
}

/// Whether a transaction spends or earns money.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[default]
    Expense,
    Income,
}

impl TransactionType {
    /// The type implied by the sign of `amount`. Zero counts as income.
    pub fn of(amount: Milliunits) -> Self {
        if amount.is_negative() {
            TransactionType::Expense
        } else {
            TransactionType::Income
        }
    }

    /// Give `amount` the sign for this type.
    pub fn apply(self, amount: Milliunits) -> Milliunits {
        match self {
            TransactionType::Expense => -amount.abs(),
            TransactionType::Income => amount.abs(),
        }
    }
}

/// A transaction with the names of its account and category for list views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionListItem {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub account_name: String,
    pub category_name: Option<String>,
}

/// Narrows down which transactions are listed.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TransactionFilter {
    /// Only list transactions in this account.
    pub account_id: Option<AccountId>,
}

pub type RowsAffected = usize;

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id TEXT PRIMARY KEY,
                amount INTEGER NOT NULL,
                account_id TEXT NOT NULL REFERENCES account(id) ON DELETE CASCADE,
                category_id TEXT REFERENCES category(id) ON DELETE SET NULL,
                date TEXT NOT NULL,
                notes TEXT NOT NULL DEFAULT '',
                payee TEXT NOT NULL,
                user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE
                )",
        (),
    )?;

    // Covers the list view, which filters by user and sorts by date.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        amount: row.get(1)?,
        account_id: row.get(2)?,
        category_id: row.get(3)?,
        date: row.get(4)?,
        notes: row.get(5)?,
        payee: row.get(6)?,
        user_id: UserID::new(row.get(7)?),
    })
}

fn map_list_item_row(row: &Row) -> Result<TransactionListItem, rusqlite::Error> {
    Ok(TransactionListItem {
        transaction: map_transaction_row(row)?,
        account_name: row.get(8)?,
        category_name: row.get(9)?,
    })
}

/// Check that the account and category in `builder` belong to `user_id`.
///
/// Foreign keys only check that the rows exist, not who owns them.
fn check_references(
    builder: &TransactionBuilder,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let account_exists: bool = connection.query_row(
        "SELECT EXISTS(SELECT 1 FROM account WHERE id = ?1 AND user_id = ?2)",
        params![builder.account_id, user_id.as_i64()],
        |row| row.get(0),
    )?;

    if !account_exists {
        return Err(Error::InvalidAccount);
    }

    if let Some(category_id) = &builder.category_id {
        let category_exists: bool = connection.query_row(
            "SELECT EXISTS(SELECT 1 FROM category WHERE id = ?1 AND user_id = ?2)",
            params![category_id, user_id.as_i64()],
            |row| row.get(0),
        )?;

        if !category_exists {
            return Err(Error::InvalidCategory);
        }
    }

    Ok(())
}

/// Create a new transaction for `user_id` from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAccount] if the account is not one of the user's accounts,
/// - [Error::InvalidCategory] if the category is not one of the user's categories,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    check_references(&builder, user_id, connection)?;

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\"
                (id, amount, account_id, category_id, date, notes, payee, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             RETURNING id, amount, account_id, category_id, date, notes, payee, user_id",
        )?
        .query_row(
            params![
                create_id(),
                builder.amount,
                builder.account_id,
                builder.category_id,
                builder.date,
                builder.notes,
                builder.payee,
                user_id.as_i64(),
            ],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve the transaction `id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to one of the user's transactions,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    id: &str,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, amount, account_id, category_id, date, notes, payee, user_id \
            FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        )?
        .query_one(params![id, user_id.as_i64()], map_transaction_row)?;

    Ok(transaction)
}

/// Get the user's transactions, newest first, with their account and category names.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_transactions(
    user_id: UserID,
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<TransactionListItem>, Error> {
    connection
        .prepare(
            "SELECT t.id, t.amount, t.account_id, t.category_id, t.date, t.notes, t.payee, \
                t.user_id, a.name, c.name
            FROM \"transaction\" t
            INNER JOIN account a ON a.id = t.account_id
            LEFT JOIN category c ON c.id = t.category_id
            WHERE t.user_id = ?1 AND (?2 IS NULL OR t.account_id = ?2)
            ORDER BY t.date DESC, t.rowid DESC",
        )?
        .query_map(
            params![user_id.as_i64(), filter.account_id],
            map_list_item_row,
        )?
        .map(|maybe_item| maybe_item.map_err(Error::from))
        .collect()
}

/// Overwrite the user-editable fields of the transaction `id`.
///
/// Returns the number of rows updated, zero if the user has no such transaction.
///
/// # Errors
/// Returns [Error::InvalidAccount] or [Error::InvalidCategory] if the builder
/// refers to an account or category the user does not own.
pub fn update_transaction(
    id: &str,
    builder: TransactionBuilder,
    user_id: UserID,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    check_references(&builder, user_id, connection)?;

    connection
        .execute(
            "UPDATE \"transaction\"
            SET amount = ?1, account_id = ?2, category_id = ?3, date = ?4, notes = ?5, payee = ?6
            WHERE id = ?7 AND user_id = ?8",
            params![
                builder.amount,
                builder.account_id,
                builder.category_id,
                builder.date,
                builder.notes,
                builder.payee,
                id,
                user_id.as_i64(),
            ],
        )
        .map_err(Error::from)
}

/// Delete the transaction `id`. Returns zero if the user has no such transaction.
pub fn delete_transaction(
    id: &str,
    user_id: UserID,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
            params![id, user_id.as_i64()],
        )
        .map_err(Error::from)
}

// ============================================================================
// TESTS
// ============================================================================
