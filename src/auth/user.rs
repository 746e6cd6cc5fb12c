//! Registered users and the user table.

use std::fmt;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    auth::{
        PasswordHash,
        password::{DEFAULT_HASH_COST, check_strength},
    },
};

/// The integer key of a row in the user table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserID(i64);

impl UserID {
    /// Wrap a raw row ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw row ID.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A trimmed, non-empty log-in name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Trim `name` and reject it if nothing is left.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyUsername] for blank names.
    pub fn new(name: &str) -> Result<Self, Error> {
        match name.trim() {
            "" => Err(Error::EmptyUsername),
            trimmed => Ok(Self(trimmed.to_owned())),
        }
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A row of the user table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Primary key.
    pub id: UserID,
    /// Unique ignoring case.
    pub username: Username,
    /// bcrypt hash of the user's password.
    pub password_hash: PasswordHash,
}

/// A checked registration, ready for [create_user].
///
/// Building one validates the username, checks the password and hashes it,
/// so the database lock is not held while bcrypt runs.
#[derive(Debug, Clone)]
pub struct NewUser {
    username: Username,
    password_hash: PasswordHash,
}

impl NewUser {
    /// Check a registration form.
    ///
    /// # Errors
    ///
    /// In the order they are checked:
    /// - [Error::EmptyUsername] for a blank username,
    /// - [Error::TooWeak] if zxcvbn rejects the password,
    /// - [Error::PasswordMismatch] if `confirm_password` differs,
    /// - [Error::HashingError] if bcrypt fails.
    pub fn register(username: &str, password: &str, confirm_password: &str) -> Result<Self, Error> {
        Self::register_with_cost(username, password, confirm_password, DEFAULT_HASH_COST)
    }

    pub(crate) fn register_with_cost(
        username: &str,
        password: &str,
        confirm_password: &str,
        cost: u32,
    ) -> Result<Self, Error> {
        let username = Username::new(username)?;
        check_strength(password, &[username.as_ref()])?;

        if password != confirm_password {
            return Err(Error::PasswordMismatch);
        }

        Ok(Self {
            password_hash: PasswordHash::hash(password, cost)?,
            username,
        })
    }

    /// A user whose password skips the strength check, e.g. the account in
    /// a database seeded for manual testing.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyUsername] or [Error::HashingError].
    pub fn with_any_password(username: &str, password: &str, cost: u32) -> Result<Self, Error> {
        Ok(Self {
            username: Username::new(username)?,
            password_hash: PasswordHash::hash(password, cost)?,
        })
    }

    /// The username that will be stored.
    pub fn username(&self) -> &Username {
        &self.username
    }
}

/// Create the user table if it does not exist.
///
/// # Errors
///
/// Returns an error if the SQL query fails.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS user (
            id INTEGER PRIMARY KEY,
            username TEXT NOT NULL UNIQUE COLLATE NOCASE,
            password TEXT NOT NULL
        );",
    )
}

fn user_from_row(row: &Row) -> Result<User, rusqlite::Error> {
    Ok(User {
        id: UserID::new(row.get("id")?),
        username: Username(row.get("username")?),
        password_hash: PasswordHash::from_stored(row.get("password")?),
    })
}

/// Store `new_user`.
///
/// # Errors
///
/// Returns [Error::DuplicateUsername] if the name is taken, ignoring case,
/// or [Error::SqlError] for other database errors.
pub fn create_user(new_user: NewUser, connection: &Connection) -> Result<User, Error> {
    let NewUser {
        username,
        password_hash,
    } = new_user;

    let inserted = connection.execute(
        "INSERT INTO user (username, password) VALUES (?1, ?2)",
        (username.as_ref(), password_hash.as_ref()),
    );

    match inserted {
        Ok(_) => Ok(User {
            id: UserID::new(connection.last_insert_rowid()),
            username,
            password_hash,
        }),
        Err(rusqlite::Error::SqliteFailure(failure, _))
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            Err(Error::DuplicateUsername(username.to_string()))
        }
        Err(error) => Err(error.into()),
    }
}

/// Look up a user by name, ignoring case and surrounding whitespace.
///
/// # Errors
///
/// Returns [Error::NotFound] if nobody has that name.
pub fn get_user_by_username(username: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, username, password FROM user WHERE username = ?1")?
        .query_row([username.trim()], user_from_row)
        .map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::Error;

    use super::{NewUser, Username, create_user, create_user_table, get_user_by_username};

    const STRONG_PASSWORD: &str = "slow-orange-ledger-tuesday";
    const TEST_COST: u32 = 4;

    fn connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_user_table(&connection).unwrap();
        connection
    }

    fn register(username: &str, password: &str, confirm: &str) -> Result<NewUser, Error> {
        NewUser::register_with_cost(username, password, confirm, TEST_COST)
    }

    #[test]
    fn username_is_trimmed_and_required() {
        assert_eq!(Username::new("  alice ").unwrap().as_ref(), "alice");
        assert_eq!(Username::new(" \t"), Err(Error::EmptyUsername));
    }

    #[test]
    fn registration_checks_run_in_order() {
        let cases = [
            (" ", "a", "b", Error::EmptyUsername),
            ("alice", STRONG_PASSWORD, "something else", Error::PasswordMismatch),
        ];

        for (username, password, confirm, want) in cases {
            assert_eq!(register(username, password, confirm).unwrap_err(), want);
        }

        assert!(matches!(
            register("alice", "alice123", "nope"),
            Err(Error::TooWeak(_))
        ));
    }

    #[test]
    fn registration_hashes_the_password() {
        let new_user = register(" alice ", STRONG_PASSWORD, STRONG_PASSWORD).unwrap();

        assert_eq!(new_user.username().as_ref(), "alice");
        assert_eq!(new_user.password_hash.verify(STRONG_PASSWORD), Ok(true));
    }

    #[test]
    fn created_user_can_be_found_ignoring_case() {
        let connection = connection();
        let new_user = NewUser::with_any_password("Alice", "pw", TEST_COST).unwrap();

        let alice = create_user(new_user, &connection).unwrap();

        assert!(alice.id.as_i64() > 0);
        assert_eq!(get_user_by_username(" aLiCe ", &connection), Ok(alice));
    }

    #[test]
    fn usernames_are_unique_ignoring_case() {
        let connection = connection();
        let alice = || NewUser::with_any_password("alice", "pw", TEST_COST).unwrap();
        create_user(alice(), &connection).unwrap();

        let shouting = NewUser::with_any_password("ALICE", "pw", TEST_COST).unwrap();

        assert_eq!(
            create_user(shouting, &connection),
            Err(Error::DuplicateUsername("ALICE".to_owned()))
        );
        assert!(create_user(alice(), &connection).is_err());
    }

    #[test]
    fn unknown_username_is_not_found() {
        assert_eq!(
            get_user_by_username("nobody", &connection()),
            Err(Error::NotFound)
        );
    }
}
