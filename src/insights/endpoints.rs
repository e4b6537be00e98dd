//! Route handlers for the insights page.

use std::sync::Arc;

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    insights::{
        InsightsBoard, InsightsSource, request_insights,
        view::{insights_card, insights_page_view},
    },
    store::Store,
    user::UserID,
};

/// The state needed by the insights route handlers.
#[derive(Debug, Clone)]
pub struct InsightsState {
    pub store: Store,
    pub board: InsightsBoard,
    pub source: Arc<dyn InsightsSource>,
}

impl FromRef<AppState> for InsightsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            board: state.insights_board.clone(),
            source: state.insights_source.clone(),
        }
    }
}

/// Renders the page with the user's latest insights.
pub async fn get_insights_page(
    State(state): State<InsightsState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let latest = state.board.latest(user_id);

    insights_page_view(latest.as_deref(), state.board.is_loading(user_id)).into_response()
}

/// Requests insights for the user's current records and responds with them.
///
/// Responds with 204 and no body if a request is already running or the
/// request fails, so the page keeps showing what it had. The request runs on
/// its own task and finishes even if the client goes away.
pub async fn generate_insights(
    State(state): State<InsightsState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let Some(pending) = state.board.begin(user_id) else {
        tracing::debug!("Insights for user {user_id} are already being generated");
        return StatusCode::NO_CONTENT.into_response();
    };

    let task = tokio::spawn(async move {
        let result = request_insights(&state.store, state.source.as_ref(), user_id).await;

        if let Ok(text) = &result {
            pending.finish(text.clone());
        }

        result
    });

    match task.await {
        Ok(Ok(text)) => insights_card(Some(&text)).into_response(),
        Ok(Err(error)) => {
            tracing::error!("Error fetching insights for user {user_id}: {error}");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(error) => {
            tracing::error!("Insights task for user {user_id} did not finish: {error}");
            StatusCode::NO_CONTENT.into_response()
        }
    }
}
