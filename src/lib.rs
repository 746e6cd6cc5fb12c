//! Buddy is a web app for tracking personal finances.
//!
//! Users keep a list of accounts (e.g., "Cash", "Credit Card"), a list of
//! spending categories, and the transactions that move money between them.
//! This library provides a REST API that directly serves HTML pages, with
//! create and edit forms shown in slide-over sheets.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod account;
mod alert;
mod app_state;
mod auth;
mod category;
mod database_id;
mod db;
mod endpoints;
mod error;
mod error_page;
mod html;
mod logging;
mod money;
mod navigation;
mod picker;
mod routing;
mod sheet;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{DEFAULT_HASH_COST, NewUser, PasswordHash, User, UserID, Username, create_user};
pub use db::initialize as initialize_db;
pub use error::Error;
pub use logging::logging_middleware;
pub use routing::build_router;

/// Functions for seeding a database outside of the web server, e.g., for
/// creating a database for manual testing.
pub mod seed {
    pub use crate::account::{AccountName, create_account};
    pub use crate::category::{CategoryName, create_category};
    pub use crate::money::{Milliunits, convert_amount_to_miliunits};
    pub use crate::transaction::{Transaction, create_transaction};
}

/// Wait for Ctrl+C or SIGTERM, then give open connections one second to
/// finish before `handle` stops the server.
///
/// If a signal handler cannot be installed, only the other signal is awaited.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let interrupt = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Could not listen for Ctrl+C: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(error) => {
                tracing::error!("Could not listen for SIGTERM: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal_name = tokio::select! {
        _ = interrupt => "Ctrl+C",
        _ = terminate => "SIGTERM",
    };

    tracing::info!("Received {signal_name}, shutting down");
    handle.graceful_shutdown(Some(Duration::from_secs(1)));
}
