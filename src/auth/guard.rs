//! Middleware that only lets requests with a live session through.
//!
//! Handlers behind a guard receive the logged in user with
//! `Extension(user_id): Extension<UserID>`.

use axum::{
    extract::{Request, State},
    http::{StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;
use axum_htmx::{HxCurrentUrl, HxRedirect};

use crate::{
    auth::{
        AuthState,
        redirect::{log_in_url, return_page},
        session::{current_session, refresh_session},
    },
    endpoints,
    timezone::get_local_offset,
};

/// How a guard sends an anonymous client to the log-in page.
#[derive(Debug, Clone, Copy)]
enum TurnAway {
    /// A 303 redirect for full page loads.
    Redirect,
    /// An `HX-Redirect` header, since htmx does not follow redirects itself.
    HxRedirect,
}

impl TurnAway {
    fn to(self, url: String) -> Response {
        match self {
            TurnAway::Redirect => Redirect::to(&url).into_response(),
            TurnAway::HxRedirect => (HxRedirect(url), StatusCode::OK).into_response(),
        }
    }
}

async fn check_session(
    state: AuthState,
    jar: PrivateCookieJar,
    htmx_page: Option<Uri>,
    mut request: Request,
    next: Next,
    turn_away: TurnAway,
) -> Response {
    let session = match current_session(&jar) {
        Ok(session) => session,
        Err(error) => {
            tracing::debug!("No session for {}: {error}", request.uri().path());
            let page = return_page(request.uri(), htmx_page.as_ref())
                .unwrap_or_else(|| endpoints::TRANSACTIONS_VIEW.to_owned());
            return turn_away.to(log_in_url(&page));
        }
    };

    request.extensions_mut().insert(session.user_id);
    let response = next.run(request).await;

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        tracing::error!(
            "Invalid timezone {:?}, the session was not extended",
            state.local_timezone
        );
        return response;
    };

    match refresh_session(jar, session, state.cookie_duration, local_offset) {
        Ok(jar) => (jar, response).into_response(),
        Err(error) => {
            tracing::error!("Could not extend the session of user {}: {error}", session.user_id);
            response
        }
    }
}

/// Guard for pages. Anonymous clients are redirected to the log-in page,
/// which brings them back here afterwards.
pub async fn auth_guard(
    State(state): State<AuthState>,
    jar: PrivateCookieJar,
    HxCurrentUrl(htmx_page): HxCurrentUrl,
    request: Request,
    next: Next,
) -> Response {
    check_session(state, jar, htmx_page, request, next, TurnAway::Redirect).await
}

/// Guard for the htmx API. Anonymous clients get an `HX-Redirect` to the
/// log-in page, which brings them back to the page that made the request.
pub async fn auth_guard_hx(
    State(state): State<AuthState>,
    jar: PrivateCookieJar,
    HxCurrentUrl(htmx_page): HxCurrentUrl,
    request: Request,
    next: Next,
) -> Response {
    check_session(state, jar, htmx_page, request, next, TurnAway::HxRedirect).await
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension, Router, middleware,
        routing::{get, post},
    };
    use axum_extra::extract::PrivateCookieJar;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use time::{Duration, OffsetDateTime, UtcOffset};

    use crate::{
        Error,
        auth::{
            AuthState, SESSION_COOKIE, UserID, auth_guard, auth_guard_hx,
            redirect::log_in_url, start_session,
        },
        endpoints,
    };

    const PAGE: &str = "/page";
    const API: &str = "/api/thing";

    async fn whoami(Extension(user_id): Extension<UserID>) -> String {
        format!("user {user_id}")
    }

    async fn log_in_for(seconds: i64, jar: PrivateCookieJar) -> Result<PrivateCookieJar, Error> {
        start_session(jar, UserID::new(3), Duration::seconds(seconds), UtcOffset::UTC)
    }

    fn server() -> TestServer {
        let state = AuthState::for_tests(Connection::open_in_memory().unwrap());

        let app = Router::new()
            .route(PAGE, get(whoami))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
            .merge(
                Router::new()
                    .route(API, get(whoami))
                    .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
            )
            .route("/short", post(|jar: PrivateCookieJar| log_in_for(5, jar)))
            .route("/expired", post(|jar: PrivateCookieJar| log_in_for(-5, jar)))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn live_session_reaches_the_handler() {
        let server = server();
        let session = server.post("/short").await.cookie(SESSION_COOKIE);

        let response = server.get(PAGE).add_cookie(session).await;

        response.assert_status_ok();
        response.assert_text("user 3");
    }

    #[tokio::test]
    async fn short_session_is_extended() {
        let server = server();
        let session = server.post("/short").await.cookie(SESSION_COOKIE);

        let response = server.get(PAGE).add_cookie(session).await;

        let expires = response
            .cookie(SESSION_COOKIE)
            .expires_datetime()
            .expect("want an expiry");
        let want = OffsetDateTime::now_utc() + Duration::minutes(5);
        assert!((expires - want).abs() < Duration::seconds(2), "expires at {expires}");
    }

    #[tokio::test]
    async fn page_without_session_redirects_to_log_in() {
        let server = server();

        let response = server.get(&format!("{PAGE}?sheet=new")).await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), log_in_url("/page?sheet=new"));
    }

    #[tokio::test]
    async fn expired_session_is_turned_away() {
        let server = server();
        let session = server.post("/expired").await.cookie(SESSION_COOKIE);

        let response = server.get(PAGE).add_cookie(session).await;

        response.assert_status_see_other();
    }

    #[tokio::test]
    async fn api_without_session_sends_hx_redirect_back_to_page() {
        let server = server();

        let response = server
            .get(API)
            .add_header("HX-Request", "true")
            .add_header("HX-Current-URL", "https://localhost:3000/accounts?sheet=new")
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.header("hx-redirect"),
            log_in_url("/accounts?sheet=new")
        );
    }

    #[tokio::test]
    async fn api_without_htmx_page_returns_to_transactions() {
        let server = server();

        let response = server.get(API).await;

        response.assert_status_ok();
        assert_eq!(
            response.header("hx-redirect"),
            log_in_url(endpoints::TRANSACTIONS_VIEW)
        );
    }
}
