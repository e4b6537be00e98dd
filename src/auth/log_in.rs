//! This file defines the routes for displaying the log-in page and handling log-in requests.
//! The cookie and middleware modules handle the lower level session logic.

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
    AppState, Error,
    auth::{
        CredentialError,
        cookie::{
            REMEMBER_ME_COOKIE_DURATION, get_token_from_cookies, invalidate_auth_cookie,
            set_auth_cookie,
        },
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, base, email_input, link, loading_spinner, log_in_register,
        password_input,
    },
    internal_server_error::internal_error_redirect,
    user::{User, get_user_by_email, get_user_by_id},
};

fn log_in_form(email: &str, error: Option<CredentialError>) -> Markup {
    let email_error = error.filter(|error| error.concerns_email()).map(|e| e.to_string());
    let password_error = error
        .filter(|error| !error.concerns_email())
        .map(|e| e.to_string());

    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-indicator="#indicator"
            hx-disabled-elt="#email, #password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            (email_input(email, email_error.as_deref()))
            (password_input("", 0, password_error.as_deref()))

            div class="flex items-center gap-x-3"
            {
                input
                    type="checkbox"
                    name="remember_me"
                    id="remember_me"
                    tabindex="0"
                    class="rounded-xs";

                label
                    for="remember_me"
                    class="block text-sm font-medium text-gray-900 dark:text-white"
                {
                    "Keep me logged in for one week"
                }
            }

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Login"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400" {
                "Need an account? "
                (link(endpoints::REGISTER_VIEW, "Register"))
            }
        }
    }
}

fn signed_in_view(user: &User) -> Markup {
    html! {
        div class="space-y-2 text-center text-gray-900 dark:text-white"
        {
            p {
                "Logged in as: "
                span class="font-bold" { (user.email) }
            }

            p { (link(endpoints::TRANSACTIONS_VIEW, "Go to your transactions")) }
            p { (link(endpoints::LOG_OUT, "Log out")) }
        }
    }
}

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.store.connection().clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

/// Display the log-in page, or who is logged in if the session is still valid.
pub async fn get_log_in_page(State(state): State<LoginState>, jar: PrivateCookieJar) -> Response {
    let signed_in_user = get_token_from_cookies(&jar).ok().and_then(|token| {
        let connection = state.db_connection.lock().ok()?;
        get_user_by_id(token.user_id, &connection).ok()
    });

    let content = match signed_in_user {
        Some(user) => log_in_register("Login", &signed_in_view(&user)),
        None => log_in_register("Login", &log_in_form("", None)),
    };

    base("Log In", &[], &content).into_response()
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the auth cookie set and the client is redirected to the transactions page.
/// Otherwise, the form is returned with an error message explaining the problem.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    let user = match verify_credentials(&state, &user_data) {
        Ok(user) => user,
        Err(error) => {
            tracing::info!("Log-in failed: {}", error.code());
            return log_in_form(&user_data.email, Some(error)).into_response();
        }
    };

    let cookie_duration = if user_data.remember_me.is_some() {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };

    set_auth_cookie(jar.clone(), user.id, cookie_duration)
        .map(|updated_jar| {
            (
                StatusCode::SEE_OTHER,
                HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
                updated_jar,
            )
        })
        .map_err(|err| {
            tracing::error!("Error setting auth cookie: {err}");
            (invalidate_auth_cookie(jar), internal_error_redirect())
        })
        .into_response()
}

fn verify_credentials(state: &LoginState, user_data: &LogInData) -> Result<User, CredentialError> {
    let email: EmailAddress = user_data
        .email
        .trim()
        .parse()
        .map_err(|_| CredentialError::InvalidEmail)?;

    let user = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;
        get_user_by_email(&email, &connection)?
    };

    match user.password_hash.verify(&user_data.password) {
        Ok(true) => Ok(user),
        Ok(false) => Err(CredentialError::WrongPassword),
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            Err(CredentialError::Other)
        }
    }
}

/// The raw data entered by the user in the log-in form.
///
/// Nothing is validated beyond the email format, since the password is compared
/// against the hash of one that was validated at registration.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    /// Email entered during log-in.
    pub email: String,

    /// Password entered during log-in.
    pub password: String,

    /// Whether to extend the initial auth cookie duration.
    ///
    /// This value comes from a checkbox, so it either has a string value or is not set
    /// (see the [MDN docs](https://developer.mozilla.org/en-US/docs/Web/HTML/Element/input/checkbox#value_2)).
    /// The `Some` variant should be interpreted as `true` irregardless of the
    /// string value, and the `None` variant should be interpreted as `false`.
    pub remember_me: Option<String>,
}
