//! Updating a transaction from its edit sheet.

use axum::{
    Extension, Form,
    extract::{Path, State},
    response::Response,
};
use axum_htmx::HxCurrentUrl;

use crate::{
    Error,
    auth::UserID,
    database_id::TransactionId,
    transaction::{
        TransactionState,
        core::update_transaction,
        form::{TransactionForm, TransactionFormAction},
        submit::submit_transaction_form,
    },
};

/// Overwrite one of the user's transactions and go back to the transactions
/// page.
///
/// Another user's transaction counts as missing, and nothing is changed.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
    HxCurrentUrl(current_url): HxCurrentUrl,
    Form(form): Form<TransactionForm>,
) -> Response {
    let action = TransactionFormAction::Edit {
        transaction_id: &transaction_id,
    };

    submit_transaction_form(
        &state,
        user_id,
        action,
        form,
        current_url.as_ref(),
        |builder, connection| {
            match update_transaction(&transaction_id, builder, user_id, connection)? {
                0 => Err(Error::UpdateMissingTransaction),
                _ => Ok(()),
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Form,
        extract::{Path, State},
        http::StatusCode,
    };
    use axum_htmx::HxCurrentUrl;
    use time::macros::date;

    use crate::{
        account::{AccountName, create_account, get_all_accounts},
        auth::UserID,
        money::Milliunits,
        test_utils::{
            assert_alert_message, assert_form_error_message, assert_hx_endpoint,
            assert_hx_redirect, must_create_test_connection, must_get_form, parse_html_fragment,
        },
        transaction::{
            Transaction, TransactionState,
            core::{TransactionType, get_transaction},
            create_transaction,
            form::TransactionForm,
        },
    };

    use super::edit_transaction_endpoint;

    fn fixture() -> (TransactionState, UserID, UserID, String) {
        let (connection, alice, bob) = must_create_test_connection();
        let cash =
            create_account(AccountName::new_unchecked("Cash"), None, alice, &connection).unwrap();
        let transaction = create_transaction(
            Transaction::build(Milliunits::new(-1_000), &cash.id, date!(2025 - 01 - 01), "Cafe"),
            alice,
            &connection,
        )
        .unwrap();

        (
            TransactionState {
                db_connection: Arc::new(Mutex::new(connection)),
                local_timezone: "Etc/UTC".to_owned(),
            },
            alice,
            bob,
            transaction.id,
        )
    }

    fn form(account: &str, payee: &str) -> TransactionForm {
        TransactionForm {
            date: date!(2025 - 02 - 01),
            account: account.to_owned(),
            category: "Wages".to_owned(),
            payee: payee.to_owned(),
            amount: "100".to_owned(),
            transaction_type: TransactionType::Income,
            notes: "bonus".to_owned(),
        }
    }

    #[tokio::test]
    async fn updates_transaction() {
        let (state, alice, _, transaction_id) = fixture();

        let current_url = format!(
            "https://localhost:3000/transactions?account_id=abc123&sheet=edit&id={transaction_id}"
        );

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Extension(alice),
            Path(transaction_id.clone()),
            HxCurrentUrl(Some(current_url.parse().unwrap())),
            Form(form("Bank", "Employer")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, "/transactions?account_id=abc123");
        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(&transaction_id, alice, &connection).unwrap();
        assert_eq!(transaction.amount, Milliunits::new(100_000));
        assert_eq!(transaction.payee, "Employer");
        assert_eq!(transaction.notes, "bonus");
        assert_eq!(transaction.date, date!(2025 - 02 - 01));
        assert!(transaction.category_id.is_some());
    }

    #[tokio::test]
    async fn empty_payee_renders_form_error() {
        let (state, alice, _, transaction_id) = fixture();

        let response = edit_transaction_endpoint(
            State(state),
            Extension(alice),
            Path(transaction_id.clone()),
            HxCurrentUrl(None),
            Form(form("Cash", " ")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_hx_endpoint(
            &form,
            &format!("/api/transactions/{transaction_id}"),
            "hx-put",
        );
        assert_form_error_message(&form, "Error: Payee cannot be empty");
    }

    #[tokio::test]
    async fn other_users_transaction_is_not_updated() {
        let (state, alice, bob, transaction_id) = fixture();

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Extension(bob),
            Path(transaction_id.clone()),
            HxCurrentUrl(None),
            Form(form("Bob's Bank", "Bob")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = parse_html_fragment(response).await;
        assert_alert_message(&html, "Could not update transaction");
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_transaction(&transaction_id, alice, &connection)
                .unwrap()
                .payee,
            "Cafe"
        );
        assert!(
            get_all_accounts(bob, &connection).unwrap().is_empty(),
            "accounts created for a failed update should be rolled back"
        );
    }
}
