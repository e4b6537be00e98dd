//! The insights page: asks the analysis endpoint about the user's records on
//! request and shows the answer.

mod board;
mod client;
mod endpoints;
mod view;

pub use board::{InsightsBoard, PendingInsights};
pub use client::{
    AnalysisClient, AnalysisError, DEFAULT_ANALYZE_URL, InsightsSource, request_insights,
};
pub use endpoints::{InsightsState, generate_insights, get_insights_page};
