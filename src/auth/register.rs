//! The registration page and the handler that creates users.

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    auth::{
        AuthState, NewUser, create_user,
        fields::{auth_page, password_field, switch_page_link, username_field},
        session::start_session,
    },
    db::lock_connection,
    endpoints,
    error_page::redirect_to_error_page,
    html::submit_button,
    timezone::get_local_offset,
};

/// Browser-side hint only. zxcvbn has the final say.
const PASSWORD_MIN_LENGTH: u8 = 14;

/// Which field an error message belongs under.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Username,
    Password,
    ConfirmPassword,
}

fn registration_form(username: &str, error: Option<(Field, &str)>) -> Markup {
    let error_for = |field: Field| {
        error
            .filter(|(error_field, _)| *error_field == field)
            .map(|(_, message)| message)
    };

    html! {
        form
            hx-post=(endpoints::USERS)
            hx-indicator="#indicator"
            hx-disabled-elt="find input, find button"
            class="flex flex-col gap-5"
        {
            (username_field(username, error_for(Field::Username)))
            (password_field(
                "password",
                "Password",
                "new-password",
                Some(PASSWORD_MIN_LENGTH),
                error_for(Field::Password),
            ))
            (password_field(
                "confirm_password",
                "Confirm password",
                "new-password",
                Some(PASSWORD_MIN_LENGTH),
                error_for(Field::ConfirmPassword),
            ))

            (submit_button("Create Account"))
            (switch_page_link("Already registered?", endpoints::LOG_IN_VIEW, "Log in"))
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let form = registration_form("", None);

    auth_page("Register", "Create Account", &form).into_response()
}

/// The fields of the registration form.
#[derive(Serialize, Deserialize)]
pub struct RegisterForm {
    /// Trimmed before it is stored.
    pub username: String,
    /// Must satisfy zxcvbn.
    pub password: String,
    /// Must equal `password`.
    pub confirm_password: String,
}

/// The field to show `error` under, or `None` if it is not the user's fault.
fn field_for(error: &Error) -> Option<Field> {
    match error {
        Error::EmptyUsername | Error::DuplicateUsername(_) => Some(Field::Username),
        Error::TooWeak(_) => Some(Field::Password),
        Error::PasswordMismatch => Some(Field::ConfirmPassword),
        _ => None,
    }
}

/// Create a user and log them in.
///
/// Success sends the client to the transactions page. A rejected field
/// brings the form back with the reason under that field.
pub async fn register_user(
    State(state): State<AuthState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    let user = NewUser::register(&form.username, &form.password, &form.confirm_password)
        .and_then(|new_user| {
            let connection = lock_connection(&state.db_connection)?;
            create_user(new_user, &connection)
        });

    let user = match user {
        Ok(user) => user,
        Err(error) => {
            return match field_for(&error) {
                Some(field) => {
                    registration_form(&form.username, Some((field, &error.to_string())))
                        .into_response()
                }
                None => {
                    tracing::error!("Could not register {:?}: {error}", form.username);
                    redirect_to_error_page()
                }
            };
        }
    };

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone).into_response();
    };

    match start_session(jar, user.id, state.cookie_duration, local_offset) {
        Ok(jar) => {
            tracing::info!("Registered user {} ({})", user.username, user.id);

            (
                jar,
                HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not start a session for new user {}: {error}", user.id);
            redirect_to_error_page()
        }
    }
}

#[cfg(test)]
mod page_tests {
    use scraper::Selector;

    use crate::{
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button_with_text, assert_hx_endpoint,
            assert_status_ok, assert_valid_html, must_get_form, parse_html_document,
        },
    };

    use super::get_register_page;

    #[tokio::test]
    async fn shows_registration_form() {
        let response = get_register_page().await;

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let heading = document
            .select(&Selector::parse("h1").unwrap())
            .next()
            .map(|h1| h1.text().collect::<String>());
        assert_eq!(heading.as_deref().map(str::trim), Some("Create Account"));

        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::USERS, "hx-post");
        assert_form_input(&form, "username", "text");
        assert_form_input(&form, "password", "password");
        assert_form_input(&form, "confirm_password", "password");
        assert_form_submit_button_with_text(&form, "Create Account");

        let links = form
            .select(&Selector::parse("a[href]").unwrap())
            .filter_map(|link| link.value().attr("href"))
            .collect::<Vec<_>>();
        assert_eq!(links, [endpoints::LOG_IN_VIEW]);
    }
}

#[cfg(test)]
mod handler_tests {
    use axum::{Router, routing::post};
    use axum_test::{TestResponse, TestServer};
    use rusqlite::Connection;
    use scraper::{ElementRef, Html, Selector};

    use crate::{
        auth::{AuthState, NewUser, SESSION_COOKIE, create_user, create_user_table},
        endpoints,
    };

    use super::register_user;

    const STRONG_PASSWORD: &str = "iamtestingwhethericancreateanewuser";

    fn server_with_users(usernames: &[&str]) -> TestServer {
        let connection = Connection::open_in_memory().unwrap();
        create_user_table(&connection).unwrap();
        for username in usernames {
            let user = NewUser::with_any_password(username, "hunter2", 4).unwrap();
            create_user(user, &connection).unwrap();
        }

        let app = Router::new()
            .route(endpoints::USERS, post(register_user))
            .with_state(AuthState::for_tests(connection));

        TestServer::try_new(app).expect("Could not create test server.")
    }

    async fn register(
        server: &TestServer,
        username: &str,
        password: &str,
        confirm: &str,
    ) -> TestResponse {
        server
            .post(endpoints::USERS)
            .form(&[
                ("username", username),
                ("password", password),
                ("confirm_password", confirm),
            ])
            .await
    }

    /// The single error on the form and the name of the input it sits under.
    #[track_caller]
    fn form_error(response: &TestResponse) -> (String, String) {
        response.assert_status_ok();
        let html = Html::parse_fragment(&response.text());
        let input_selector = Selector::parse("input").unwrap();
        let errors = html
            .select(&Selector::parse("div").unwrap())
            .filter_map(|field| {
                let message = field
                    .children()
                    .filter_map(ElementRef::wrap)
                    .find(|child| {
                        child.value().name() == "p"
                            && child.value().classes().any(|class| class == "text-red-500")
                    })?;
                let input = field
                    .select(&input_selector)
                    .next()
                    .and_then(|input| input.value().attr("name"))
                    .unwrap_or_default();

                Some((input.to_owned(), message.text().collect::<String>().to_lowercase()))
            })
            .collect::<Vec<_>>();

        assert_eq!(errors.len(), 1, "want 1 error, got {errors:?}");
        errors.into_iter().next().unwrap()
    }

    #[tokio::test]
    async fn new_user_is_logged_in() {
        let server = server_with_users(&[]);

        let response = register(&server, "alice", STRONG_PASSWORD, STRONG_PASSWORD).await;

        response.assert_status_see_other();
        assert_eq!(response.header("hx-redirect"), endpoints::TRANSACTIONS_VIEW);
        assert!(!response.cookie(SESSION_COOKIE).value().is_empty());
    }

    #[tokio::test]
    async fn taken_username_ignores_case() {
        let server = server_with_users(&["alice"]);

        let response = register(&server, "Alice", STRONG_PASSWORD, STRONG_PASSWORD).await;

        let (field, message) = form_error(&response);
        assert_eq!(field, "username");
        assert!(message.contains("already taken"), "got {message:?}");
    }

    #[tokio::test]
    async fn blank_username_is_rejected() {
        let server = server_with_users(&[]);

        let response = register(&server, "   ", STRONG_PASSWORD, STRONG_PASSWORD).await;

        assert_eq!(
            form_error(&response),
            ("username".to_owned(), "username cannot be empty".to_owned())
        );
    }

    #[tokio::test]
    async fn weak_passwords_are_rejected() {
        let server = server_with_users(&[]);
        let username_as_password = "correcthorsebatterystaple";

        for (username, password) in [
            ("alice", "foo"),
            (username_as_password, username_as_password),
        ] {
            let response = register(&server, username, password, password).await;

            let (field, message) = form_error(&response);
            assert_eq!(field, "password");
            assert!(message.contains("password is too weak"), "got {message:?}");
        }
    }

    #[tokio::test]
    async fn mismatched_confirmation_is_rejected() {
        let server = server_with_users(&[]);

        let response =
            register(&server, "alice", STRONG_PASSWORD, "thisisadifferentpassword").await;

        assert_eq!(
            form_error(&response),
            ("confirm_password".to_owned(), "passwords do not match".to_owned())
        );
    }
}
