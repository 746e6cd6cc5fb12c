//! The category model and its database queries.
//!
//! A category acts like a label for a transaction, e.g. "Groceries" or
//! "Wages". A transaction has at most one category.

use std::fmt::Display;

use rusqlite::{Connection, Row, params};
use serde::Serialize;

use crate::{
    Error,
    auth::UserID,
    database_id::{CategoryId, create_id},
};

/// The name of a category with surrounding whitespace removed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Hash)]
#[serde(transparent)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return [Error::EmptyCategoryName] if `name` is blank.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is trimmed and not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A category for expenses and income, e.g., 'Groceries', 'Eating Out', 'Wages'.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    /// The id of the category at an external provider, if it was imported.
    pub plaid_id: Option<String>,
    pub name: CategoryName,
    pub user_id: UserID,
}

pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
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

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let name: String = row.get(2)?;

    Ok(Category {
        id: row.get(0)?,
        plaid_id: row.get(1)?,
        name: CategoryName::new_unchecked(&name),
        user_id: UserID::new(row.get(3)?),
    })
}

fn into_category_error(error: rusqlite::Error, name: &CategoryName) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(sql_error, _)
            if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            Error::DuplicateCategoryName(name.to_string())
        }
        error => error.into(),
    }
}

/// Create a category in the database.
///
/// # Errors
/// This function will return an error if:
/// - the user already has a category with the same name, ignoring case,
/// - or there is some other SQL error.
pub fn create_category(
    name: CategoryName,
    plaid_id: Option<&str>,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    let id = create_id();

    connection
        .execute(
            "INSERT INTO category (id, plaid_id, name, user_id) VALUES (?1, ?2, ?3, ?4)",
            params![id, plaid_id, name.as_ref(), user_id.as_i64()],
        )
        .map_err(|error| into_category_error(error, &name))?;

    Ok(Category {
        id,
        plaid_id: plaid_id.map(ToOwned::to_owned),
        name,
        user_id,
    })
}

/// Retrieve a category in the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a category owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_category(id: &str, user_id: UserID, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, plaid_id, name, user_id FROM category WHERE id = ?1 AND user_id = ?2")?
        .query_one(params![id, user_id.as_i64()], map_row)
        .map_err(Error::from)
}

/// Retrieve the categories owned by `user_id`, sorted by name.
pub fn get_all_categories(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, plaid_id, name, user_id FROM category \
            WHERE user_id = ?1 ORDER BY name ASC",
        )?
        .query_map([user_id.as_i64()], map_row)?
        .map(|maybe_category| maybe_category.map_err(Error::from))
        .collect()
}

/// Find the category called `name`, ignoring case, or create it.
///
/// # Errors
/// Returns [Error::EmptyCategoryName] if `name` is blank.
pub fn get_or_create_category(
    name: &str,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    let name = CategoryName::new(name)?;

    let existing = connection
        .prepare(
            "SELECT id, plaid_id, name, user_id FROM category \
            WHERE user_id = ?1 AND name = ?2",
        )?
        .query_one(params![user_id.as_i64(), name.as_ref()], map_row);

    match existing {
        Ok(category) => Ok(category),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            tracing::debug!("Creating category \"{name}\" for user {user_id}");
            create_category(name, None, user_id, connection)
        }
        Err(error) => Err(error.into()),
    }
}

pub type RowsAffected = usize;

/// Rename the category `id`. Returns zero if the user has no such category.
pub fn update_category(
    id: &str,
    name: &CategoryName,
    user_id: UserID,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "UPDATE category SET name = ?1 WHERE id = ?2 AND user_id = ?3",
            params![name.as_ref(), id, user_id.as_i64()],
        )
        .map_err(|error| into_category_error(error, name))
}

/// Delete the category `id`. Transactions in the category become uncategorised.
pub fn delete_category(
    id: &str,
    user_id: UserID,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
            params![id, user_id.as_i64()],
        )
        .map_err(Error::from)
}
