//! Creating a transaction from the form.

use axum::{Extension, Form, extract::State, response::Response};
use axum_htmx::HxCurrentUrl;

use crate::{
    auth::UserID,
    transaction::{
        TransactionState,
        core::create_transaction,
        form::{TransactionForm, TransactionFormAction},
        submit::submit_transaction_form,
    },
};

/// Save a new transaction and go back to the transactions page.
///
/// Accounts and categories typed into the pickers that do not exist yet are
/// created along with the transaction.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    HxCurrentUrl(current_url): HxCurrentUrl,
    Form(form): Form<TransactionForm>,
) -> Response {
    submit_transaction_form(
        &state,
        user_id,
        TransactionFormAction::Create,
        form,
        current_url.as_ref(),
        |builder, connection| {
            let transaction = create_transaction(builder, user_id, connection)?;
            tracing::info!("User {user_id} created transaction {}", transaction.id);
            Ok(())
        },
    )
}
