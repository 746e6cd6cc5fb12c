//! Full-page views for missing pages and server failures.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{endpoints, html::error_view};

/// A page shown instead of the requested one.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ErrorPage {
    /// No route or row matched the request.
    NotFound,
    /// The server could not finish the request.
    ServerError {
        /// What went wrong, in words the user understands.
        reason: String,
        /// What the user can do about it.
        next_step: String,
    },
}

impl ErrorPage {
    /// A server error that gives nothing away.
    pub(crate) fn server_error() -> Self {
        ErrorPage::ServerError {
            reason: "Sorry, something went wrong.".to_owned(),
            next_step: "Try again later or check the server logs".to_owned(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ErrorPage::NotFound => StatusCode::NOT_FOUND,
            ErrorPage::ServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ErrorPage {
    fn into_response(self) -> Response {
        let status = self.status();
        let markup = match &self {
            ErrorPage::NotFound => error_view(
                "Not Found",
                "404",
                "Nothing to see here.",
                "That page does not exist. Your transactions are on the home page.",
            ),
            ErrorPage::ServerError { reason, next_step } => {
                error_view("Internal Server Error", "500", reason, next_step)
            }
        };

        (status, Html(markup.into_string())).into_response()
    }
}

/// The fallback for unknown routes.
pub async fn get_not_found_page() -> Response {
    ErrorPage::NotFound.into_response()
}

/// The page htmx clients land on after an unrecoverable error.
pub async fn get_error_page() -> Response {
    ErrorPage::server_error().into_response()
}

/// Send an htmx client to the error page.
pub(crate) fn redirect_to_error_page() -> Response {
    (
        HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
        .into_response()
}
