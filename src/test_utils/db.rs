use rusqlite::Connection;

use crate::{
    auth::{NewUser, UserID, create_user},
    initialize_db,
};

#[track_caller]
fn must_create_user(username: &str, connection: &Connection) -> UserID {
    let user = NewUser::with_any_password(username, "hunter2", 4)
        .and_then(|user| create_user(user, connection))
        .expect("could not create test user");

    user.id
}

/// An initialised in-memory database with two users, alice and bob.
#[track_caller]
pub(crate) fn must_create_test_connection() -> (Connection, UserID, UserID) {
    let connection =
        Connection::open_in_memory().expect("could not create in-memory SQLite database");
    initialize_db(&connection).expect("could not initialize test DB");

    let alice = must_create_user("alice", &connection);
    let bob = must_create_user("bob", &connection);

    (connection, alice, bob)
}
