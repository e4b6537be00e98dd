//! Sends the user's records to the analysis endpoint.

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    goal::Goal,
    store::{Record, Store},
    transaction::Transaction,
    user::UserID,
};

/// The default location of the analysis endpoint.
pub const DEFAULT_ANALYZE_URL: &str = "http://localhost:3001/analyze";

/// The errors that may occur while requesting insights.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The records could not be read from the store.
    #[error("could not read the records to analyze: {0}")]
    Snapshot(#[from] Error),

    /// The endpoint could not be reached, answered with an error status or
    /// sent a body without insights.
    #[error("the analysis request failed: {0}")]
    Request(#[from] reqwest::Error),
}

#[derive(Debug, Serialize)]
struct AnalysisRequest<'a> {
    transactions: &'a [Record<Transaction>],
    goals: &'a [Record<Goal>],
}

#[derive(Debug, Deserialize)]
struct AnalysisResponse {
    insights: String,
}

/// Something that turns a user's records into narrative insights.
#[async_trait]
pub trait InsightsSource: Send + Sync + Debug {
    /// Describe the given records in a few paragraphs of text.
    async fn analyze(
        &self,
        transactions: &[Record<Transaction>],
        goals: &[Record<Goal>],
    ) -> Result<String, AnalysisError>;
}

/// Posts `{ transactions, goals }` as JSON to the analysis endpoint and reads
/// back `{ insights }`.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    client: reqwest::Client,
    url: String,
}

impl AnalysisClient {
    /// Create a client that posts to `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl InsightsSource for AnalysisClient {
    async fn analyze(
        &self,
        transactions: &[Record<Transaction>],
        goals: &[Record<Goal>],
    ) -> Result<String, AnalysisError> {
        let response: AnalysisResponse = self
            .client
            .post(&self.url)
            .json(&AnalysisRequest {
                transactions,
                goals,
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.insights)
    }
}

/// Read the user's current transactions and goals and ask `source` about them.
///
/// The two lists are read one after the other, so a write in between may
/// show up in one and not the other.
pub async fn request_insights(
    store: &Store,
    source: &dyn InsightsSource,
    user_id: UserID,
) -> Result<String, AnalysisError> {
    let transactions = store.list::<Transaction>(user_id)?;
    let goals = store.list::<Goal>(user_id)?;

    tracing::debug!(
        "Requesting insights for {} transactions and {} goals of user {user_id}",
        transactions.len(),
        goals.len()
    );

    source.analyze(&transactions, &goals).await
}
