//! State shared by every handler of the server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{Error, auth::SESSION_DURATION, db::initialize, timezone::get_local_offset};

/// The server's configuration and database.
///
/// Handlers usually take a narrower state, such as
/// [AuthState](crate::auth::AuthState), built from this one with [FromRef].
#[derive(Debug, Clone)]
pub struct AppState {
    /// Encrypts the session cookie. Derived from the `SECRET` env var.
    pub cookie_key: Key,
    /// How long a session lasts without "remember me".
    pub cookie_duration: Duration,
    /// Canonical timezone name, e.g. "Pacific/Auckland". Decides what
    /// "today" is.
    pub local_timezone: String,
    /// The one SQLite connection, shared behind a mutex.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Set up the database behind `db_connection` and wrap it in shared state.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidTimezoneError] if `local_timezone` is not a
    /// canonical timezone name, or [Error::SqlError] if the tables cannot be
    /// created.
    pub fn new(
        db_connection: Connection,
        cookie_secret: &str,
        local_timezone: &str,
    ) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        initialize(&db_connection)?;

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: SESSION_DURATION,
            local_timezone: local_timezone.to_owned(),
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Stretch `secret` into the 64 bytes a cookie [Key] needs.
pub fn create_cookie_key(secret: &str) -> Key {
    Key::from(&Sha512::digest(secret))
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::Error;

    use super::{AppState, create_cookie_key};

    #[test]
    fn rejects_unknown_timezone() {
        let connection = Connection::open_in_memory().unwrap();

        let result = AppState::new(connection, "secret", "Middle/Earth");

        assert!(matches!(
            result,
            Err(Error::InvalidTimezoneError(timezone)) if timezone == "Middle/Earth"
        ));
    }

    #[test]
    fn creates_tables() {
        let connection = Connection::open_in_memory().unwrap();

        let state = AppState::new(connection, "secret", "Pacific/Auckland").unwrap();

        let connection = state.db_connection.lock().unwrap();
        let user_table: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'user'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(user_table, 1);
    }

    #[test]
    fn same_secret_gives_same_key() {
        let master = |secret| create_cookie_key(secret).master().to_vec();

        assert_eq!(master("a"), master("a"));
        assert_ne!(master("a"), master("b"));
    }
}
