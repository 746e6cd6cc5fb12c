//! The log-in page and form handler.

use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    Error,
    auth::{
        AuthState, User,
        fields::{auth_page, password_field, switch_page_link, username_field},
        get_user_by_username,
        redirect::sanitize_redirect_url,
        session::{end_session, start_session},
    },
    db::lock_connection,
    endpoints,
    html::submit_button,
    timezone::get_local_offset,
};

/// Session length when "remember me" is ticked.
const REMEMBER_ME_DURATION: Duration = Duration::days(7);

/// Shown for both unknown usernames and wrong passwords.
pub(crate) const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect username or password.";
const INTERNAL_ERROR_MSG: &str = "An internal error occurred. Please try again later.";

fn log_in_form(username: &str, error: Option<&str>, redirect_url: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-indicator="#indicator"
            hx-disabled-elt="find input, find button"
            class="flex flex-col gap-5"
        {
            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            (username_field(username, None))
            (password_field("password", "Password", "current-password", None, error))

            label class="flex items-center gap-2 text-sm text-gray-700 dark:text-gray-300"
            {
                input type="checkbox" name="remember_me" class="rounded-sm";
                "Keep me logged in for a week"
            }

            (submit_button("Log in"))
            (switch_page_link("New to Buddy?", endpoints::REGISTER_VIEW, "Create an account"))
        }
    }
}

/// Drop `raw_url` unless it is a page of this site, logging what was dropped.
fn checked_redirect_url(raw_url: Option<&str>, source: &str) -> Option<String> {
    let raw_url = raw_url.filter(|url| !url.is_empty())?;
    let redirect_url = sanitize_redirect_url(raw_url);

    if redirect_url.is_none() {
        tracing::warn!("Ignoring redirect URL {raw_url:?} from {source}");
    }

    redirect_url
}

/// Query parameters of the log-in page.
#[derive(Debug, Default, Deserialize)]
pub struct RedirectQuery {
    /// The page to open after logging in.
    pub redirect_url: Option<String>,
}

/// Display the log-in page.
pub async fn get_log_in_page(Query(query): Query<RedirectQuery>) -> Response {
    let redirect_url = checked_redirect_url(query.redirect_url.as_deref(), "log-in query");
    let form = log_in_form("", None, redirect_url.as_deref());

    auth_page("Log In", "Log in to your account", &form).into_response()
}

/// The fields of the log-in form.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInForm {
    /// Matched ignoring case.
    pub username: String,
    /// Checked against the stored hash.
    pub password: String,
    /// Present when the checkbox is ticked, whatever its value.
    pub remember_me: Option<String>,
    /// The page to open after logging in.
    pub redirect_url: Option<String>,
}

/// Find the user named in `form` and check their password.
///
/// Unknown users and wrong passwords are both [Error::InvalidCredentials].
fn authenticate(state: &AuthState, form: &LogInForm) -> Result<User, Error> {
    let user = lock_connection(&state.db_connection)
        .and_then(|connection| get_user_by_username(&form.username, &connection))
        .map_err(|error| match error {
            Error::NotFound => Error::InvalidCredentials,
            error => error,
        })?;

    if user.password_hash.verify(&form.password)? {
        Ok(user)
    } else {
        Err(Error::InvalidCredentials)
    }
}

/// Log a user in.
///
/// Good credentials start a session and send the client to `redirect_url`,
/// or the transactions page. Otherwise the form comes back with an error.
pub async fn post_log_in(
    State(state): State<AuthState>,
    jar: PrivateCookieJar,
    Form(form): Form<LogInForm>,
) -> Response {
    let redirect_url = checked_redirect_url(form.redirect_url.as_deref(), "log-in form");
    let form_with_error = |message: &str| {
        log_in_form(&form.username, Some(message), redirect_url.as_deref()).into_response()
    };

    let user = match authenticate(&state, &form) {
        Ok(user) => user,
        Err(Error::InvalidCredentials) => {
            tracing::info!("Failed log-in attempt for {:?}", form.username);
            return form_with_error(INVALID_CREDENTIALS_ERROR_MSG);
        }
        Err(error) => {
            tracing::error!("Could not check credentials for {:?}: {error}", form.username);
            return form_with_error(INTERNAL_ERROR_MSG);
        }
    };

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone).into_response();
    };

    let duration = match form.remember_me {
        Some(_) => REMEMBER_ME_DURATION,
        None => state.cookie_duration,
    };

    match start_session(jar.clone(), user.id, duration, local_offset) {
        Ok(jar) => {
            tracing::info!("User {} logged in", user.id);
            let destination =
                redirect_url.unwrap_or_else(|| endpoints::TRANSACTIONS_VIEW.to_owned());

            (jar, HxRedirect(destination), StatusCode::SEE_OTHER).into_response()
        }
        Err(error) => {
            tracing::error!("Could not start a session for user {}: {error}", user.id);

            (
                end_session(jar),
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
                .into_response()
        }
    }
}
