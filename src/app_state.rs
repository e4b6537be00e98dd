//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{
    Error,
    auth::DEFAULT_COOKIE_DURATION,
    db::initialize,
    insights::{AnalysisClient, InsightsBoard, InsightsSource},
    store::Store,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,

    /// The user records and their live feeds.
    pub store: Store,

    /// The latest insights and whether a request is running, per user.
    pub insights_board: InsightsBoard,

    /// Where insights are requested from.
    pub insights_source: Arc<dyn InsightsSource>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for
    /// users, transactions and goals. Insights are requested from
    /// `analyze_url`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        cookie_secret: &str,
        analyze_url: &str,
    ) -> Result<Self, Error> {
        Self::with_insights_source(
            db_connection,
            cookie_secret,
            Arc::new(AnalysisClient::new(analyze_url)),
        )
    }

    /// Like [AppState::new], but with any source of insights.
    pub fn with_insights_source(
        db_connection: Connection,
        cookie_secret: &str,
        insights_source: Arc<dyn InsightsSource>,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            store: Store::new(Arc::new(Mutex::new(db_connection))),
            insights_board: InsightsBoard::new(),
            insights_source,
        })
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
