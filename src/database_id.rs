//! Identifiers for rows in the database.
//!
//! Accounts, categories and transactions use randomly generated text IDs so
//! that IDs do not leak how many rows exist. Users keep integer IDs.

use rand::{Rng, distributions::Alphanumeric};

pub type AccountId = String;
pub type CategoryId = String;
pub type TransactionId = String;

const ID_LENGTH: usize = 24;

/// Generate a new random ID of lowercase letters and digits.
pub fn create_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LENGTH)
        .map(|byte| char::from(byte).to_ascii_lowercase())
        .collect()
}
