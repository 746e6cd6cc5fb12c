//! Where to send a user once they have logged in.
//!
//! Only paths on this site are accepted, and never the log-in page itself,
//! so a crafted link cannot bounce the user to another origin or in a loop.

use axum::http::Uri;

use crate::endpoints;

/// The path and query of `uri` if it points at a page of this site.
fn local_page(uri: &Uri) -> Option<String> {
    let target = uri.path_and_query()?.as_str();
    let is_local = target.starts_with('/') && !target.starts_with("//");

    (is_local && uri.path() != endpoints::LOG_IN_VIEW).then(|| target.to_owned())
}

/// Keep a client supplied `redirect_url` only if it is a relative path to a
/// page of this site.
pub(crate) fn sanitize_redirect_url(raw_url: &str) -> Option<String> {
    let uri: Uri = raw_url.parse().ok()?;

    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }

    local_page(&uri)
}

/// The page to come back to after logging in, for a request that was turned
/// away.
///
/// Pages come back to themselves. API requests come back to the page that
/// sent them, which htmx reports as `htmx_page`.
pub(crate) fn return_page(request_uri: &Uri, htmx_page: Option<&Uri>) -> Option<String> {
    if request_uri.path().starts_with("/api") {
        htmx_page.and_then(local_page)
    } else {
        local_page(request_uri)
    }
}

/// The log-in page URL that leads back to `page`.
pub(crate) fn log_in_url(page: &str) -> String {
    match serde_urlencoded::to_string([("redirect_url", page)]) {
        Ok(query) => format!("{}?{query}", endpoints::LOG_IN_VIEW),
        Err(error) => {
            tracing::error!("Could not encode redirect URL {page:?}: {error}");
            endpoints::LOG_IN_VIEW.to_owned()
        }
    }
}
