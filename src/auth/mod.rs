//! Users, log-in sessions and the pages for registering, logging in and out.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use time::Duration;

use crate::AppState;

mod fields;
mod guard;
mod log_in;
mod log_out;
mod password;
mod redirect;
mod register;
mod session;
mod user;

pub use guard::{auth_guard, auth_guard_hx};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use password::{DEFAULT_HASH_COST, PasswordHash};
pub use register::{get_register_page, register_user};
pub(crate) use session::SESSION_DURATION;
pub use user::{NewUser, User, UserID, Username, create_user};
pub(crate) use user::{create_user_table, get_user_by_username};

#[cfg(test)]
pub(crate) use session::{SESSION_COOKIE, start_session};

/// What the auth handlers and middleware need from [AppState].
#[derive(Debug, Clone)]
pub struct AuthState {
    /// Encrypts and authenticates the session cookie.
    pub cookie_key: Key,
    /// How long a session lasts without "remember me".
    pub cookie_duration: Duration,
    /// Canonical name of the server's timezone, used for cookie expiry.
    pub local_timezone: String,
    /// The app database.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

#[cfg(test)]
impl AuthState {
    /// State over `connection` with a fixed key and UTC.
    pub(crate) fn for_tests(connection: Connection) -> Self {
        Self {
            cookie_key: crate::app_state::create_cookie_key("test secret"),
            cookie_duration: SESSION_DURATION,
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }
}
