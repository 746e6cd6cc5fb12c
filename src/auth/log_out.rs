//! Ends the user's session.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;

use crate::{auth::session::end_session, endpoints};

/// Clear the session cookie and go back to the log-in page.
pub async fn get_log_out(jar: PrivateCookieJar) -> Response {
    tracing::debug!("Ending session");

    (end_session(jar), Redirect::to(endpoints::LOG_IN_VIEW)).into_response()
}
