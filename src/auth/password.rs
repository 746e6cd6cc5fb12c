//! Password strength checks and bcrypt hashes.

use serde::{Deserialize, Serialize};
use zxcvbn::{Score, zxcvbn};

use crate::Error;

/// The bcrypt cost for new passwords.
pub const DEFAULT_HASH_COST: u32 = bcrypt::DEFAULT_COST;

/// Reject `password` unless zxcvbn scores it three or higher.
///
/// `related` holds strings the password should not be built from, such as
/// the username.
///
/// # Errors
///
/// Returns [Error::TooWeak] with zxcvbn's advice.
pub(crate) fn check_strength(password: &str, related: &[&str]) -> Result<(), Error> {
    let estimate = zxcvbn(password, related);

    if matches!(estimate.score(), Score::Three | Score::Four) {
        return Ok(());
    }

    let advice = estimate
        .feedback()
        .map(ToString::to_string)
        .unwrap_or_default();

    Err(Error::TooWeak(advice))
}

/// A salted bcrypt hash as stored in the user table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash `password` with `cost` rounds.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if bcrypt fails, e.g. for a cost outside 4..=31.
    pub(crate) fn hash(password: &str, cost: u32) -> Result<Self, Error> {
        bcrypt::hash(password, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Wrap a hash read from the database.
    pub(crate) fn from_stored(hash: String) -> Self {
        Self(hash)
    }

    /// Whether `password` produces this hash.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if the stored hash is malformed.
    pub fn verify(&self, password: &str) -> Result<bool, Error> {
        bcrypt::verify(password, &self.0).map_err(|error| Error::HashingError(error.to_string()))
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
