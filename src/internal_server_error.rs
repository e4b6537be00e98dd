//! The page shown when something went wrong on the server.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{endpoints, html::error_view};

/// An error page with a short description and a suggested fix.
#[derive(Debug, Clone, Copy)]
pub struct InternalServerError<'a> {
    pub description: &'a str,
    pub fix: &'a str,
}

impl Default for InternalServerError<'_> {
    fn default() -> Self {
        Self {
            description: "Sorry, something went wrong.",
            fix: "Try again later or check the server logs",
        }
    }
}

impl IntoResponse for InternalServerError<'_> {
    fn into_response(self) -> Response {
        let page = error_view("Internal Server Error", "500", self.description, self.fix);

        (StatusCode::INTERNAL_SERVER_ERROR, Html(page.into_string())).into_response()
    }
}

pub async fn get_internal_server_error_page() -> Response {
    InternalServerError::default().into_response()
}

/// Sends an htmx client to the error page instead of swapping in an error.
pub fn internal_error_redirect() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
        (),
    )
        .into_response()
}

#[cfg(test)]
mod internal_server_error_tests {
    use axum::http::StatusCode;

    use crate::{
        endpoints,
        test_utils::{assert_hx_redirect, body_text},
    };

    use super::{get_internal_server_error_page, internal_error_redirect};

    #[tokio::test]
    async fn page_explains_the_error() {
        let response = get_internal_server_error_page().await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let text = body_text(response).await;
        assert!(text.contains("Sorry, something went wrong."));
    }

    #[test]
    fn redirect_points_htmx_at_error_page() {
        let response = internal_error_redirect();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_hx_redirect(&response, endpoints::INTERNAL_ERROR_VIEW);
    }
}
