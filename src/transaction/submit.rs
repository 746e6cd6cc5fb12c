//! The steps shared by creating and editing a transaction from the form.

use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    Error,
    auth::UserID,
    db::lock_connection,
    timezone::local_today,
    transaction::{
        TransactionBuilder, TransactionState,
        form::{TransactionForm, TransactionFormAction, form_error_response, is_form_error},
        transactions_page::transactions_view_url,
    },
};

/// Check `form`, then hand the transaction to `save` inside one SQL
/// transaction.
///
/// Accounts and categories typed into the pickers are created on the way, and
/// are rolled back with everything else when `save` fails. Invalid input
/// brings the form back. Success sends the client to the transactions page
/// it came from.
pub(crate) fn submit_transaction_form(
    state: &TransactionState,
    user_id: UserID,
    action: TransactionFormAction<'_>,
    form: TransactionForm,
    current_url: Option<&Uri>,
    save: impl FnOnce(TransactionBuilder, &Connection) -> Result<(), Error>,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => {
            tracing::error!("Could not work out today's date: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match lock_connection(&state.db_connection) {
        Ok(connection) => connection,
        Err(error) => return error.into_alert_response(),
    };
    let sql_transaction = match connection.unchecked_transaction() {
        Ok(sql_transaction) => sql_transaction,
        Err(error) => return Error::from(error).into_alert_response(),
    };

    let builder = match form.clone().into_builder(today, user_id, &sql_transaction) {
        Ok(builder) => builder,
        Err(error) if is_form_error(&error) => {
            return form_error_response(action, &form, today, &error, user_id, &sql_transaction);
        }
        Err(error) => {
            tracing::error!("Could not look up the account or category in {form:?}: {error}");
            return error.into_alert_response();
        }
    };

    let saved = save(builder, &sql_transaction)
        .and_then(|()| sql_transaction.commit().map_err(Error::from));

    match saved {
        Ok(()) => (
            HxRedirect(transactions_view_url(current_url)),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ Error::UpdateMissingTransaction) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not save {form:?}: {error}");
            error.into_alert_response()
        }
    }
}
