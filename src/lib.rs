//! Spendsight is a web app for recording transactions and savings goals and
//! asking a generative-language model for insights about them.
//!
//! This library provides a REST API that directly serves HTML pages, and a
//! separate analysis endpoint that forwards prompts to the model.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod analysis;
mod app_state;
mod auth;
mod database_id;
mod db;
mod endpoints;
mod error;
mod goal;
mod html;
mod insights;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod password;
mod record;
mod routing;
mod store;
#[cfg(test)]
mod test_utils;
mod transaction;
mod user;

pub use analysis::{DEFAULT_MODEL, Gemini, GenerativeModel, ModelError, build_analysis_router};
pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use error::Error;
pub use insights::{AnalysisClient, AnalysisError, DEFAULT_ANALYZE_URL, InsightsSource};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use password::{PasswordHash, ValidatedPassword};
pub use routing::build_router;
pub use user::{User, UserID, get_user_by_email, get_user_by_id, update_password};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
