//! Sessions: the encrypted token cookie, the guard that checks it and the
//! log-in, registration and log-out pages.

mod cookie;
mod credential;
mod log_in;
mod log_out;
mod middleware;
mod register;
mod token;

pub use cookie::{
    DEFAULT_COOKIE_DURATION, REMEMBER_ME_COOKIE_DURATION, invalidate_auth_cookie,
    set_auth_cookie,
};
pub use credential::CredentialError;
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{AuthState, auth_guard, auth_guard_hx};
pub use register::{get_register_page, register_user};
