//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post, put},
};

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_hx, get_log_in_page, get_log_out, get_register_page, post_log_in,
        register_user,
    },
    endpoints,
    goal::Goal,
    insights::{generate_insights, get_insights_page},
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    record::{
        create_record, delete_record, get_edit_form, get_empty_form, get_records_page,
        stream_records, update_record,
    },
    transaction::Transaction,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::USERS, post(register_user))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(
            endpoints::TRANSACTIONS_VIEW,
            get(get_records_page::<Transaction>),
        )
        .route(endpoints::GOALS_VIEW, get(get_records_page::<Goal>))
        .route(endpoints::INSIGHTS_VIEW, get(get_insights_page))
        .route(
            endpoints::TRANSACTIONS_STREAM,
            get(stream_records::<Transaction>),
        )
        .route(endpoints::GOALS_STREAM, get(stream_records::<Goal>))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These routes are requested by htmx and need the HX-REDIRECT header for auth redirects to work.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(
                endpoints::TRANSACTIONS_API,
                post(create_record::<Transaction>),
            )
            .route(
                endpoints::TRANSACTION,
                put(update_record::<Transaction>).delete(delete_record::<Transaction>),
            )
            .route(
                endpoints::EDIT_TRANSACTION_FORM,
                get(get_edit_form::<Transaction>),
            )
            .route(
                endpoints::TRANSACTION_FORM,
                get(get_empty_form::<Transaction>),
            )
            .route(endpoints::GOALS_API, post(create_record::<Goal>))
            .route(
                endpoints::GOAL,
                put(update_record::<Goal>).delete(delete_record::<Goal>),
            )
            .route(endpoints::EDIT_GOAL_FORM, get(get_edit_form::<Goal>))
            .route(endpoints::GOAL_FORM, get(get_empty_form::<Goal>))
            .route(endpoints::INSIGHTS_API, post(generate_insights))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, Html("I'm a teapot")).into_response()
}

/// The root path '/' redirects to the transactions page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::TRANSACTIONS_VIEW)
}


#[cfg(test)]
mod router_tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        AppState, endpoints,
        goal::Goal,
        insights::{AnalysisError, InsightsSource},
        store::Record,
        transaction::Transaction,
    };

    use super::build_router;

    #[derive(Debug)]
    struct NoInsights;

    #[async_trait]
    impl InsightsSource for NoInsights {
        async fn analyze(
            &self,
            _transactions: &[Record<Transaction>],
            _goals: &[Record<Goal>],
        ) -> Result<String, AnalysisError> {
            Ok(String::new())
        }
    }

    fn get_server() -> TestServer {
        let connection = Connection::open_in_memory().unwrap();
        let state =
            AppState::with_insights_source(connection, "42", Arc::new(NoInsights)).unwrap();

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn pages_redirect_to_log_in_without_session() {
        let server = get_server();

        for page in [
            endpoints::TRANSACTIONS_VIEW,
            endpoints::GOALS_VIEW,
            endpoints::INSIGHTS_VIEW,
        ] {
            let response = server.get(page).await;

            response.assert_status_see_other();
            assert_eq!(response.header("location"), endpoints::LOG_IN_VIEW);
        }
    }

    #[tokio::test]
    async fn htmx_routes_redirect_to_log_in_without_session() {
        let server = get_server();

        let response = server.post(endpoints::INSIGHTS_API).await;

        response.assert_status_ok();
        assert_eq!(response.header("hx-redirect"), endpoints::LOG_IN_VIEW);
    }

    #[tokio::test]
    async fn log_in_page_is_public() {
        let server = get_server();

        server.get(endpoints::LOG_IN_VIEW).await.assert_status_ok();
        server.get(endpoints::REGISTER_VIEW).await.assert_status_ok();
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_server();

        server.get("/nope").await.assert_status_not_found();
    }
}
