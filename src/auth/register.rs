//! The registration page for creating an account with an email and password.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use email_address::EmailAddress;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error, PasswordHash, ValidatedPassword,
    auth::{CredentialError, set_auth_cookie},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, base, email_input, link, loading_spinner, log_in_register,
        password_input,
    },
    internal_server_error::internal_error_redirect,
    user::{User, create_user},
};

fn registration_form(email: &str, error: Option<CredentialError>) -> Markup {
    let email_error = error.filter(|error| error.concerns_email()).map(|e| e.to_string());
    let password_error = error
        .filter(|error| !error.concerns_email())
        .map(|e| e.to_string());

    html! {
        form
            hx-post=(endpoints::USERS)
            hx-indicator="#indicator"
            hx-disabled-elt="#email, #password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            (email_input(email, email_error.as_deref()))
            (password_input("", ValidatedPassword::MIN_LENGTH, password_error.as_deref()))

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Register"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                (link(endpoints::LOG_IN_VIEW, "Login"))
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let registration_form = registration_form("", None);
    let content = log_in_register("Register", &registration_form);
    base("Register", &[], &content).into_response()
}

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The bcrypt cost for hashing new passwords.
    pub hash_cost: u32,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            hash_cost: PasswordHash::DEFAULT_COST,
            db_connection: state.store.connection().clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<RegistrationState> for Key {
    fn from_ref(state: &RegistrationState) -> Self {
        state.cookie_key.clone()
    }
}

#[derive(Serialize, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
}

/// Create an account and log the new user in.
///
/// On success the client is redirected to the transactions page, otherwise
/// the form is returned with the reason the account could not be created.
pub async fn register_user(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<RegisterForm>,
) -> Response {
    let user = match create_account(&state, &user_data) {
        Ok(user) => user,
        Err(error) => {
            tracing::info!("Registration failed: {}", error.code());
            return registration_form(&user_data.email, Some(error)).into_response();
        }
    };

    tracing::info!("Registered user {}", user.id);

    match set_auth_cookie(jar, user.id, state.cookie_duration) {
        Ok(jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            jar,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An error occurred while setting the auth cookie: {error}");
            internal_error_redirect()
        }
    }
}

fn create_account(
    state: &RegistrationState,
    user_data: &RegisterForm,
) -> Result<User, CredentialError> {
    let email: EmailAddress = user_data
        .email
        .trim()
        .parse()
        .map_err(|error: email_address::Error| Error::InvalidEmail(error.to_string()))?;
    let password = ValidatedPassword::new(&user_data.password)?;
    let password_hash = PasswordHash::new(password, state.hash_cost)?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    Ok(create_user(email, password_hash, &connection)?)
}
