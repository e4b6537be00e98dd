//! The guard in front of every page and route that needs a signed-in user.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{StatusCode, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use time::Duration;

use crate::{
    AppState,
    auth::cookie::{extend_auth_cookie_duration_if_needed, get_token_from_cookies},
    endpoints,
};

/// The state needed for the auth middleware.
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// How a request without a valid session is sent to the log-in page.
#[derive(Debug, Clone, Copy)]
enum Rejection {
    /// A plain `303 See Other` redirect for page loads.
    Page,
    /// An `HX-Redirect` header so htmx navigates instead of swapping the
    /// log-in page into the current one.
    Htmx,
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        match self {
            Rejection::Page => Redirect::to(endpoints::LOG_IN_VIEW).into_response(),
            Rejection::Htmx => {
                (HxRedirect(endpoints::LOG_IN_VIEW.to_owned()), StatusCode::OK).into_response()
            }
        }
    }
}

/// Run `request` as the session's user and push the session expiry forward
/// afterwards, or reject it if there is no live session.
async fn guard(state: AuthState, request: Request, next: Next, rejection: Rejection) -> Response {
    let (mut parts, body) = request.into_parts();

    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(error) => {
            tracing::error!("Could not read the cookie jar: {error:?}");
            return rejection.into_response();
        }
    };
    let token = match get_token_from_cookies(&jar) {
        Ok(token) => token,
        Err(error) => {
            tracing::debug!("Rejected session for {}: {error}", parts.uri.path());
            return rejection.into_response();
        }
    };

    parts.extensions.insert(token.user_id);
    let response = next.run(Request::from_parts(parts, body)).await;

    let jar = extend_auth_cookie_duration_if_needed(jar.clone(), state.cookie_duration)
        .unwrap_or_else(|error| {
            tracing::error!("Could not extend the session of user {}: {error}", token.user_id);
            jar
        });

    with_session_cookie(response, jar)
}

/// Copy the `Set-Cookie` headers of `jar` onto `response`.
fn with_session_cookie(response: Response, jar: PrivateCookieJar) -> Response {
    let (mut parts, body) = response.into_parts();
    let jar_response = jar.into_response();

    for value in jar_response.headers().get_all(SET_COOKIE) {
        parts.headers.append(SET_COOKIE, value.clone());
    }

    Response::from_parts(parts, body)
}

/// Middleware function that checks for a valid session cookie.
///
/// The request runs with the session's user ID as an extension and the
/// session is extended by [AuthState::cookie_duration]. Without a live
/// session the client is redirected to the log-in page.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    guard(state, request, next, Rejection::Page).await
}

/// Like [auth_guard], but for routes requested by htmx.
pub async fn auth_guard_hx(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    guard(state, request, next, Rejection::Htmx).await
}

#[cfg(test)]
mod auth_guard_tests {
    use axum::{
        Extension, Router,
        extract::State,
        middleware,
        routing::{get, post},
    };
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, SameSite},
    };
    use axum_test::TestServer;
    use time::{Duration, OffsetDateTime};

    use crate::{
        Error,
        app_state::create_cookie_key,
        auth::{
            AuthState, DEFAULT_COOKIE_DURATION, auth_guard, auth_guard_hx, cookie::COOKIE_TOKEN,
            set_auth_cookie,
        },
        endpoints,
        user::UserID,
    };

    const LOG_IN_ROUTE: &str = "/log_in_as_user_7";
    const PAGE_ROUTE: &str = "/page";
    const HTMX_ROUTE: &str = "/api/thing";

    async fn whoami(Extension(user_id): Extension<UserID>) -> String {
        format!("user {user_id}")
    }

    async fn log_in_as_user_7(
        State(state): State<AuthState>,
        jar: PrivateCookieJar,
    ) -> Result<PrivateCookieJar, Error> {
        set_auth_cookie(jar, UserID::new(7), state.cookie_duration)
    }

    fn get_server(cookie_duration: Duration) -> TestServer {
        let state = AuthState {
            cookie_key: create_cookie_key("nafstenoas"),
            cookie_duration,
        };

        let pages = Router::new()
            .route(PAGE_ROUTE, get(whoami))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));
        let htmx_routes = Router::new()
            .route(HTMX_ROUTE, get(whoami))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx));

        let app = pages
            .merge(htmx_routes)
            .route(LOG_IN_ROUTE, post(log_in_as_user_7))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[track_caller]
    fn assert_date_time_close(left: OffsetDateTime, right: OffsetDateTime) {
        assert!(
            (left - right).abs() < Duration::seconds(1),
            "got date time {left:?}, want {right:?}"
        );
    }

    #[tokio::test]
    async fn session_user_reaches_handler() {
        let server = get_server(DEFAULT_COOKIE_DURATION);
        let session = server.post(LOG_IN_ROUTE).await.cookie(COOKIE_TOKEN);

        let response = server.get(PAGE_ROUTE).add_cookie(session).await;

        response.assert_status_ok();
        response.assert_text("user 7");
    }

    #[tokio::test]
    async fn session_is_extended_after_each_request() {
        let server = get_server(Duration::minutes(5));
        let response = server.post(LOG_IN_ROUTE).await;
        let jar = response.cookies();
        let issued_expiry = response
            .cookie(COOKIE_TOKEN)
            .expires_datetime()
            .unwrap();
        // Cookie expiry has a resolution of one second.
        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

        let response = server.get(PAGE_ROUTE).add_cookies(jar).await;

        let session = response.cookie(COOKIE_TOKEN);
        assert!(session.expires_datetime().unwrap() > issued_expiry);
        assert_date_time_close(
            session.expires_datetime().unwrap(),
            OffsetDateTime::now_utc() + Duration::minutes(5),
        );
        assert_eq!(session.secure(), Some(true));
        assert_eq!(session.http_only(), Some(true));
        assert_eq!(session.same_site(), Some(SameSite::Strict));
    }

    #[tokio::test]
    async fn page_without_session_redirects_to_log_in() {
        let server = get_server(DEFAULT_COOKIE_DURATION);

        let response = server.get(PAGE_ROUTE).await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::LOG_IN_VIEW);
    }

    #[tokio::test]
    async fn page_with_garbage_session_redirects_to_log_in() {
        let server = get_server(DEFAULT_COOKIE_DURATION);

        let response = server
            .get(PAGE_ROUTE)
            .add_cookie(Cookie::new(COOKIE_TOKEN, "FOOBAR"))
            .await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::LOG_IN_VIEW);
    }

    #[tokio::test]
    async fn htmx_route_without_session_uses_hx_redirect() {
        let server = get_server(DEFAULT_COOKIE_DURATION);

        let response = server
            .get(HTMX_ROUTE)
            .add_header("HX-Request", "true")
            .await;

        response.assert_status_ok();
        assert_eq!(response.header("hx-redirect"), endpoints::LOG_IN_VIEW);
    }
}
