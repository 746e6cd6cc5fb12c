//! The crate-wide error type and how each error is shown to the client.
//!
//! Page handlers turn errors into full error pages via [IntoResponse]. Handlers
//! called by htmx use [Error::into_alert_response] so the error shows up as an
//! alert without replacing the page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use time::Date;

use crate::{alert::Alert, error_page::ErrorPage};

/// Everything that can go wrong in Buddy.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    // Authentication and sessions.
    /// The username or password given at log-in is wrong.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The request has no session cookie.
    #[error("the session cookie is missing")]
    CookieMissing,

    /// A session expiry could not be represented.
    #[error("session expiry out of range: {0}")]
    SessionOutOfRange(String),

    /// A session could not be written to its cookie.
    #[error("could not serialize the session: {0}")]
    SerializationError(String),

    // Registration.
    /// zxcvbn rated the password below the minimum score. Holds its feedback.
    #[error("that password is too weak: {0}")]
    TooWeak(String),

    /// The password and its confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// bcrypt failed. The message is for the logs only.
    #[error("could not hash the password: {0}")]
    HashingError(String),

    /// A username was blank.
    #[error("Username cannot be empty")]
    EmptyUsername,

    /// Usernames are unique regardless of case.
    #[error("the username \"{0}\" is already taken")]
    DuplicateUsername(String),

    // Form validation.
    /// An account name was blank.
    #[error("Account name cannot be empty")]
    EmptyAccountName,

    /// A category name was blank.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// A transaction form left the account picker empty.
    #[error("Account is required")]
    MissingAccount,

    /// A transaction had a blank payee.
    #[error("Payee cannot be empty")]
    EmptyPayee,

    /// The text is not a decimal amount or is out of range.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// A transaction named an account the user does not own.
    #[error("no account of yours has that ID")]
    InvalidAccount,

    /// A transaction named a category the user does not own.
    #[error("no category of yours has that ID")]
    InvalidCategory,

    /// Transactions cannot be dated after today in the server's timezone.
    #[error("{0} is in the future")]
    FutureDate(Date),

    /// The user already has an account with this name, ignoring case.
    #[error("you already have an account named \"{0}\"")]
    DuplicateAccountName(String),

    /// The user already has a category with this name, ignoring case.
    #[error("you already have a category named \"{0}\"")]
    DuplicateCategoryName(String),

    // Storage.
    /// No row matched. Rows owned by other users count as missing.
    #[error("nothing matched the request")]
    NotFound,

    /// Any other SQLite error.
    #[error("SQLite error: {0}")]
    SqlError(rusqlite::Error),

    /// The database mutex was poisoned.
    #[error("the database mutex is poisoned")]
    DatabaseLockError,

    /// The configured timezone is not a canonical timezone name.
    #[error("{0} is not a known timezone")]
    InvalidTimezoneError(String),

    /// A delete matched no transaction.
    #[error("no transaction to delete")]
    DeleteMissingTransaction,

    /// An update matched no transaction.
    #[error("no transaction to update")]
    UpdateMissingTransaction,

    /// A delete matched no account.
    #[error("no account to delete")]
    DeleteMissingAccount,

    /// An update matched no account.
    #[error("no account to update")]
    UpdateMissingAccount,

    /// A delete matched no category.
    #[error("no category to delete")]
    DeleteMissingCategory,

    /// An update matched no category.
    #[error("no category to update")]
    UpdateMissingCategory,
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        if let rusqlite::Error::QueryReturnedNoRows = error {
            return Error::NotFound;
        }

        tracing::error!("SQLite error: {error}");
        Error::SqlError(error)
    }
}

fn timezone_fix(timezone: &str) -> String {
    format!(
        "The server timezone \"{timezone}\" is not recognised. \
        Set it to a canonical timezone name such as \"Pacific/Auckland\"."
    )
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => ErrorPage::NotFound.into_response(),
            Error::InvalidTimezoneError(timezone) => ErrorPage::ServerError {
                reason: "Invalid Timezone Settings".to_owned(),
                next_step: timezone_fix(&timezone),
            }
            .into_response(),
            Error::DatabaseLockError => ErrorPage::server_error().into_response(),
            error => {
                tracing::error!("Unhandled error rendered as error page: {error}");
                ErrorPage::server_error().into_response()
            }
        }
    }
}

/// The alert for an update or delete that matched no row.
fn missing_row(action: &str, entity: &str) -> (StatusCode, Alert) {
    let details = match action {
        "delete" => format!(
            "The {entity} could not be found. \
            Try refreshing the page to see if the {entity} has already been deleted."
        ),
        _ => format!("The {entity} could not be found."),
    };

    (
        StatusCode::NOT_FOUND,
        Alert::Error {
            message: format!("Could not {action} {entity}"),
            details,
        },
    )
}

fn bad_request(message: &str, details: String) -> (StatusCode, Alert) {
    (
        StatusCode::BAD_REQUEST,
        Alert::Error {
            message: message.to_owned(),
            details,
        },
    )
}

impl Error {
    /// Render the error as an alert fragment for htmx requests.
    ///
    /// Bad input gives 400, rows that do not exist give 404 and everything
    /// else is a 500 with a generic message.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::FutureDate(date) => bad_request(
                "Invalid transaction date",
                format!(
                    "{date} is in the future. \
                    Change the date to today or earlier."
                ),
            ),
            Error::InvalidAmount(amount) => bad_request(
                "Invalid amount",
                format!("\"{amount}\" is not a valid amount."),
            ),
            Error::InvalidAccount => bad_request(
                "Invalid account",
                "The selected account could not be found.".to_owned(),
            ),
            Error::InvalidCategory => bad_request(
                "Invalid category",
                "The selected category could not be found.".to_owned(),
            ),
            Error::DuplicateAccountName(name) => bad_request(
                "Duplicate Account Name",
                format!(
                    "The account {name} already exists. \
                    Choose a different account name, or edit or delete the existing account."
                ),
            ),
            Error::DuplicateCategoryName(name) => bad_request(
                "Duplicate Category Name",
                format!(
                    "The category {name} already exists. \
                    Choose a different category name, or edit or delete the existing category."
                ),
            ),
            Error::UpdateMissingTransaction => missing_row("update", "transaction"),
            Error::DeleteMissingTransaction => missing_row("delete", "transaction"),
            Error::UpdateMissingAccount => missing_row("update", "account"),
            Error::DeleteMissingAccount => missing_row("delete", "account"),
            Error::UpdateMissingCategory => missing_row("update", "category"),
            Error::DeleteMissingCategory => missing_row("delete", "category"),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Not found".to_owned(),
                    details: "The requested resource could not be found.".to_owned(),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: timezone_fix(&timezone),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details: "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}
