//! Form handlers that create, rename and delete accounts.
//!
//! A blank name sends the form back with the error in it. Anything else that
//! goes wrong is shown as an alert.

use axum::{
    Extension, Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use serde::Deserialize;

use crate::{
    Error,
    account::{
        AccountName, AccountState,
        core::{create_account, delete_account, update_account},
        form::{AccountFormAction, account_form},
    },
    alert::Alert,
    auth::UserID,
    database_id::AccountId,
    db::lock_connection,
    endpoints,
    sheet::DeleteQuery,
};

/// The single field of the account form.
#[derive(Debug, Deserialize)]
pub struct AccountForm {
    /// Trimmed before use. Must not be blank.
    pub name: String,
}

fn back_to_accounts() -> Response {
    (
        HxRedirect(endpoints::ACCOUNTS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

fn checked_name(action: AccountFormAction, raw_name: &str) -> Result<AccountName, Response> {
    AccountName::new(raw_name).map_err(|error| {
        account_form(action, raw_name, Some(&format!("Error: {error}"))).into_response()
    })
}

/// Alert for a failed write. Name clashes are the user's doing and not logged.
fn failure_alert(error: Error, context: &str) -> Response {
    if !matches!(error, Error::DuplicateAccountName(_)) {
        tracing::error!("{context}: {error}");
    }

    error.into_alert_response()
}

/// Create an account and go back to the accounts page.
pub async fn create_account_endpoint(
    State(state): State<AccountState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<AccountForm>,
) -> Response {
    let name = match checked_name(AccountFormAction::Create, &form.name) {
        Ok(name) => name,
        Err(form_with_error) => return form_with_error,
    };

    let created = lock_connection(&state.db_connection)
        .and_then(|connection| create_account(name, None, user_id, &connection));

    match created {
        Ok(account) => {
            tracing::info!("User {user_id} created account {}", account.id);
            back_to_accounts()
        }
        Err(error) => failure_alert(error, &format!("Could not create account {:?}", form.name)),
    }
}

/// Rename an account and go back to the accounts page.
pub async fn edit_account_endpoint(
    State(state): State<AccountState>,
    Extension(user_id): Extension<UserID>,
    Path(account_id): Path<AccountId>,
    Form(form): Form<AccountForm>,
) -> Response {
    let action = AccountFormAction::Edit {
        account_id: &account_id,
    };
    let name = match checked_name(action, &form.name) {
        Ok(name) => name,
        Err(form_with_error) => return form_with_error,
    };

    let updated = lock_connection(&state.db_connection)
        .and_then(|connection| update_account(&account_id, &name, user_id, &connection));

    match updated {
        Ok(0) => Error::UpdateMissingAccount.into_alert_response(),
        Ok(_) => back_to_accounts(),
        Err(error) => failure_alert(error, &format!("Could not rename account {account_id}")),
    }
}

/// Delete an account along with its transactions.
///
/// The list page gets a 200 alert so htmx removes the row. The edit sheet
/// asks for `?redirect=true` and goes back to the accounts page instead.
pub async fn delete_account_endpoint(
    State(state): State<AccountState>,
    Extension(user_id): Extension<UserID>,
    Path(account_id): Path<AccountId>,
    Query(query): Query<DeleteQuery>,
) -> Response {
    let deleted = lock_connection(&state.db_connection)
        .and_then(|connection| delete_account(&account_id, user_id, &connection));

    match deleted {
        Ok(0) => Error::DeleteMissingAccount.into_alert_response(),
        Ok(_) if query.redirect => back_to_accounts(),
        Ok(_) => Alert::Success {
            message: "Account deleted".to_owned(),
            details: "Its transactions were deleted too.".to_owned(),
        }
        .into_response(),
        Err(error) => failure_alert(error, &format!("Could not delete account {account_id}")),
    }
}
