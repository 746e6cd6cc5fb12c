//! Which handler serves each endpoint and which routes need a session.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    account::{
        create_account_endpoint, delete_account_endpoint, edit_account_endpoint,
        get_account_json, get_accounts_json, get_accounts_page,
    },
    auth::{
        auth_guard, auth_guard_hx, get_log_in_page, get_log_out, get_register_page, post_log_in,
        register_user,
    },
    category::{
        create_category_endpoint, delete_category_endpoint, edit_category_endpoint,
        get_categories_json, get_categories_page, get_category_json,
    },
    endpoints,
    error_page::{get_error_page, get_not_found_page},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_transaction_json, get_transactions_json, get_transactions_page,
    },
};

/// Log-in, registration and the error page.
fn public_routes() -> Router<AppState> {
    Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::USERS, post(register_user))
        .route(endpoints::INTERNAL_ERROR_VIEW, get(get_error_page))
}

/// Full pages. Anonymous visitors are redirected to log in.
fn page_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(endpoints::ACCOUNTS_VIEW, get(get_accounts_page))
        .route(endpoints::CATEGORIES_VIEW, get(get_categories_page))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
}

/// The JSON and form API. Anonymous htmx requests get an `HX-Redirect`.
fn api_routes(state: &AppState) -> Router<AppState> {
    let accounts = Router::new()
        .route(
            endpoints::ACCOUNTS_API,
            get(get_accounts_json).post(create_account_endpoint),
        )
        .route(
            endpoints::ACCOUNT,
            get(get_account_json)
                .put(edit_account_endpoint)
                .delete(delete_account_endpoint),
        );

    let categories = Router::new()
        .route(
            endpoints::CATEGORIES_API,
            get(get_categories_json).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            get(get_category_json)
                .put(edit_category_endpoint)
                .delete(delete_category_endpoint),
        );

    let transactions = Router::new()
        .route(
            endpoints::TRANSACTIONS_API,
            get(get_transactions_json).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_json)
                .put(edit_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        );

    accounts
        .merge(categories)
        .merge(transactions)
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx))
}

/// The whole app, with static files under [endpoints::STATIC] and a 404 page
/// for everything else.
pub fn build_router(state: AppState) -> Router {
    page_routes(&state)
        .merge(api_routes(&state))
        .merge(public_routes())
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_not_found_page)
        .with_state(state)
}

async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::TRANSACTIONS_VIEW)
}
