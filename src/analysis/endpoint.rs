//! The `/analyze` route: builds a prompt from the posted records and answers
//! with the model's text.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{
        HeaderValue, StatusCode,
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
    },
    middleware,
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::json;

use crate::{
    analysis::{AnalyzeRequest, GenerativeModel, build_prompt},
    endpoints,
};

/// Return a router serving [endpoints::ANALYZE] with `model`.
///
/// Every response, including errors, allows any origin.
pub fn build_analysis_router(model: Arc<dyn GenerativeModel>) -> Router {
    Router::new()
        .route(endpoints::ANALYZE, post(analyze).options(preflight))
        .layer(middleware::map_response(allow_any_origin))
        .with_state(model)
}

async fn allow_any_origin(mut response: Response) -> Response {
    response
        .headers_mut()
        .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}

async fn preflight() -> Response {
    (
        StatusCode::NO_CONTENT,
        [
            (ACCESS_CONTROL_ALLOW_METHODS, "POST"),
            (ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
        .into_response()
}

async fn analyze(
    State(model): State<Arc<dyn GenerativeModel>>,
    Json(request): Json<AnalyzeRequest>,
) -> Response {
    tracing::info!(
        "Analyzing {} transactions and {} goals",
        request.transactions().len(),
        request.goals().len()
    );

    match model.generate(&build_prompt(&request)).await {
        Ok(insights) => Json(json!({ "insights": insights })).into_response(),
        Err(error) => {
            tracing::error!("Model error: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Something went wrong" })),
            )
                .into_response()
        }
    }
}
