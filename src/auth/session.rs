//! The session cookie that keeps a user logged in.
//!
//! The cookie lives in a [PrivateCookieJar], so the browser only ever sees
//! ciphertext. Its plaintext is a JSON [Session].

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use cookie::CookieBuilder;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime, UtcOffset};

use crate::{Error, auth::UserID};

/// Name of the session cookie.
pub(crate) const SESSION_COOKIE: &str = "session";

/// How long a session lasts, both after logging in and after each request.
pub(crate) const SESSION_DURATION: Duration = Duration::minutes(5);

/// Who is logged in and until when.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct Session {
    pub user_id: UserID,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl Session {
    fn lasting(user_id: UserID, duration: Duration, local_offset: UtcOffset) -> Result<Self, Error> {
        let now = OffsetDateTime::now_utc().to_offset(local_offset);
        let expires_at = now
            .checked_add(duration)
            .ok_or_else(|| Error::SessionOutOfRange(format!("{now} + {duration}")))?;

        Ok(Self {
            user_id,
            expires_at,
        })
    }

    fn is_over(&self) -> bool {
        self.expires_at <= OffsetDateTime::now_utc()
    }

    fn to_cookie(self) -> Result<Cookie<'static>, Error> {
        let json = serde_json::to_string(&self)
            .map_err(|error| Error::SerializationError(error.to_string()))?;

        Ok(session_cookie(json).expires(self.expires_at).build())
    }
}

fn session_cookie(value: String) -> CookieBuilder<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .secure(true)
        .http_only(true)
        .same_site(SameSite::Strict)
}

/// Log `user_id` in for `duration` from now.
///
/// # Errors
///
/// Returns [Error::SessionOutOfRange] if the expiry overflows, or
/// [Error::SerializationError] if the session cannot be encoded.
pub(crate) fn start_session(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
    local_offset: UtcOffset,
) -> Result<PrivateCookieJar, Error> {
    let cookie = Session::lasting(user_id, duration, local_offset)?.to_cookie()?;

    Ok(jar.add(cookie))
}

/// Overwrite the session cookie with an empty one the browser drops at once.
pub(crate) fn end_session(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        session_cookie(String::new())
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO),
    )
}

/// The live session in `jar`.
///
/// # Errors
///
/// Returns [Error::CookieMissing] if there is no session cookie, or
/// [Error::InvalidCredentials] if it cannot be decoded or has expired.
pub(crate) fn current_session(jar: &PrivateCookieJar) -> Result<Session, Error> {
    let cookie = jar.get(SESSION_COOKIE).ok_or(Error::CookieMissing)?;

    serde_json::from_str::<Session>(cookie.value())
        .ok()
        .filter(|session| !session.is_over())
        .ok_or(Error::InvalidCredentials)
}

/// Push the end of `session` out to `duration` from now.
///
/// Sessions that already last longer, such as "remember me" sessions, are
/// left alone and `jar` comes back unchanged.
///
/// # Errors
///
/// Same as [start_session]. `jar` is not modified on error.
pub(crate) fn refresh_session(
    jar: PrivateCookieJar,
    session: Session,
    duration: Duration,
    local_offset: UtcOffset,
) -> Result<PrivateCookieJar, Error> {
    let refreshed = Session::lasting(session.user_id, duration, local_offset)?;

    if refreshed.expires_at <= session.expires_at {
        return Ok(jar);
    }

    Ok(jar.add(refreshed.to_cookie()?))
}
