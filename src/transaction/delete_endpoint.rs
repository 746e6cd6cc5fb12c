//! Deleting a transaction from the list or from its edit sheet.

use axum::{
    Extension,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::{HxCurrentUrl, HxRedirect};

use crate::{
    Error,
    alert::Alert,
    auth::UserID,
    database_id::TransactionId,
    db::lock_connection,
    sheet::DeleteQuery,
    transaction::{
        TransactionState, core::delete_transaction, transactions_page::transactions_view_url,
    },
};

/// Delete one of the user's transactions.
///
/// The list gets a 200 alert so htmx drops the row. With `?redirect=true` the
/// edit sheet is closed by sending the client back to the transactions page,
/// still filtered to the account it was showing.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
    HxCurrentUrl(current_url): HxCurrentUrl,
    Query(query): Query<DeleteQuery>,
) -> Response {
    let deleted = lock_connection(&state.db_connection)
        .and_then(|connection| delete_transaction(&transaction_id, user_id, &connection));

    match deleted {
        Ok(0) => Error::DeleteMissingTransaction.into_alert_response(),
        Ok(_) if query.redirect => {
            let destination = transactions_view_url(current_url.as_ref());
            (HxRedirect(destination), StatusCode::SEE_OTHER).into_response()
        }
        Ok(_) => Alert::SuccessSimple {
            message: "Transaction deleted".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, Query, State},
        http::{StatusCode, Uri},
        response::Response,
    };
    use axum_htmx::HxCurrentUrl;
    use time::macros::date;

    use crate::{
        Error,
        account::{AccountName, create_account},
        auth::UserID,
        endpoints,
        money::Milliunits,
        sheet::DeleteQuery,
        test_utils::{
            assert_alert_message, assert_hx_redirect, must_create_test_connection,
            parse_html_fragment,
        },
        transaction::{Transaction, TransactionState, core::get_transaction, create_transaction},
    };

    use super::delete_transaction_endpoint;

    /// Alice has one transaction in her "Cash" account.
    struct Fixture {
        state: TransactionState,
        alice: UserID,
        bob: UserID,
        account_id: String,
        transaction_id: String,
    }

    impl Fixture {
        fn new() -> Self {
            let (connection, alice, bob) = must_create_test_connection();
            let cash = create_account(AccountName::new_unchecked("Cash"), None, alice, &connection)
                .unwrap();
            let cafe = Transaction::build(
                Milliunits::new(-1_000),
                &cash.id,
                date!(2025 - 01 - 01),
                "Cafe",
            );
            let transaction = create_transaction(cafe, alice, &connection).unwrap();

            Self {
                state: TransactionState {
                    db_connection: Arc::new(Mutex::new(connection)),
                    local_timezone: "Etc/UTC".to_owned(),
                },
                alice,
                bob,
                account_id: cash.id,
                transaction_id: transaction.id,
            }
        }

        async fn delete_as(
            &self,
            user_id: UserID,
            current_url: Option<Uri>,
            redirect: bool,
        ) -> Response {
            delete_transaction_endpoint(
                State(self.state.clone()),
                Extension(user_id),
                Path(self.transaction_id.clone()),
                HxCurrentUrl(current_url),
                Query(DeleteQuery { redirect }),
            )
            .await
        }

        fn still_exists(&self) -> bool {
            let connection = self.state.db_connection.lock().unwrap();

            match get_transaction(&self.transaction_id, self.alice, &connection) {
                Ok(_) => true,
                Err(Error::NotFound) => false,
                Err(error) => panic!("unexpected error: {error}"),
            }
        }
    }

    #[tokio::test]
    async fn delete_from_list_shows_alert() {
        let fixture = Fixture::new();

        let response = fixture.delete_as(fixture.alice, None, false).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_alert_message(&parse_html_fragment(response).await, "Transaction deleted");
        assert!(!fixture.still_exists());
    }

    #[tokio::test]
    async fn other_users_transaction_is_not_found() {
        let fixture = Fixture::new();

        let response = fixture.delete_as(fixture.bob, None, false).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_alert_message(
            &parse_html_fragment(response).await,
            "Could not delete transaction",
        );
        assert!(fixture.still_exists());
    }

    #[tokio::test]
    async fn redirects_when_deleted_from_sheet() {
        let fixture = Fixture::new();

        let response = fixture.delete_as(fixture.alice, None, true).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::TRANSACTIONS_VIEW);
    }

    #[tokio::test]
    async fn sheet_delete_keeps_account_filter() {
        let fixture = Fixture::new();
        let current_url = format!(
            "https://localhost:3000/transactions?account_id={}&sheet=edit&id={}",
            fixture.account_id, fixture.transaction_id
        );

        let response = fixture
            .delete_as(fixture.alice, Some(current_url.parse().unwrap()), true)
            .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(
            &response,
            &format!("/transactions?account_id={}", fixture.account_id),
        );
        assert!(!fixture.still_exists());
    }
}
