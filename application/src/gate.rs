//! Session gate guarding the protected area.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse as _, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use common::DateTime;
use service::domain::route::{self, Action};
use tracing as log;

use crate::cookie::SessionCookie;

/// Middleware deciding whether the request may proceed, according to the
/// [`route::RULES`].
pub async fn guard(
    State(cookie): State<SessionCookie>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();
    let token = SessionCookie::token(&jar);
    let action = route::decide_for(path, token.as_ref(), DateTime::now());
    log::debug!(path, %action, "session gate");

    match respond(action, jar, cookie) {
        Some(response) => response,
        None => next.run(request).await,
    }
}

/// Builds a [`Response`] performing the provided [`Action`].
///
/// [`None`] is returned if the request should proceed.
#[must_use]
pub fn respond(
    action: Action,
    jar: CookieJar,
    cookie: SessionCookie,
) -> Option<Response> {
    match action {
        Action::Allow => None,
        Action::RedirectToAuthEntry { clear_session } => {
            let redirect = Redirect::temporary(route::AUTH_ENTRY_PATH);
            Some(if clear_session {
                (jar.add(cookie.clear()), redirect).into_response()
            } else {
                redirect.into_response()
            })
        }
        Action::RedirectToProtectedDefault => Some(
            Redirect::temporary(route::PROTECTED_DEFAULT_PATH).into_response(),
        ),
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use axum::{
        body::Body, middleware, response::Response, routing::get, Router,
    };
    use axum_extra::extract::{cookie::Cookie, CookieJar};
    use service::domain::route::Action;
    use tower::ServiceExt as _;

    use crate::cookie::SessionCookie;

    use super::{guard, respond};

    const COOKIE: SessionCookie = SessionCookie {
        secure: false,
        max_age: Duration::from_secs(60),
    };

    fn jar() -> CookieJar {
        let mut headers = http::HeaderMap::new();
        _ = headers.insert(
            http::header::COOKIE,
            http::HeaderValue::from_static("auth-token=a.b.c"),
        );
        CookieJar::from_headers(&headers)
    }

    fn location(resp: &Response) -> Option<&str> {
        resp.headers()
            .get(http::header::LOCATION)
            .and_then(|h| h.to_str().ok())
    }

    fn set_cookie(resp: &Response) -> Vec<&str> {
        resp.headers()
            .get_all(http::header::SET_COOKIE)
            .iter()
            .filter_map(|h| h.to_str().ok())
            .collect()
    }

    const EXPIRED: &str = "auth-token=header.eyJleHAiOjF9.sig";

    const VALID: &str = "auth-token=header.eyJleHAiOjk5OTk5OTk5OTk5fQ==.sig";

    fn app() -> Router {
        Router::new()
            .route("/profile", get(|| async { "profile" }))
            .route("/login", get(|| async { "login" }))
            .layer(middleware::from_fn_with_state(COOKIE, guard))
    }

    async fn visit(path: &str, cookie: Option<&str>) -> Response {
        let req = http::Request::get(path);
        let req = match cookie {
            Some(c) => req.header(http::header::COOKIE, c),
            None => req,
        };
        app().oneshot(req.body(Body::empty()).unwrap()).await.unwrap()
    }

    #[tokio::test]
    async fn clears_expired_session_on_protected_path() {
        let resp = visit("/profile", Some(EXPIRED)).await;

        assert_eq!(resp.status(), http::StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&resp), Some("/login"));

        let cookies = set_cookie(&resp);
        assert_eq!(cookies.len(), 1);
        let cleared = Cookie::parse(cookies[0]).unwrap();
        assert_eq!(cleared.name(), "auth-token");
        assert_eq!(cleared.value(), "");
        assert_eq!(
            cleared.expires_datetime().map(|dt| dt.unix_timestamp()),
            Some(0),
        );
    }

    #[tokio::test]
    async fn guards_requests_end_to_end() {
        let resp = visit("/profile", None).await;
        assert_eq!(resp.status(), http::StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&resp), Some("/login"));
        assert!(set_cookie(&resp).is_empty());

        let resp = visit("/profile", Some(VALID)).await;
        assert_eq!(resp.status(), http::StatusCode::OK);
        assert!(set_cookie(&resp).is_empty());

        let resp = visit("/login", Some(VALID)).await;
        assert_eq!(resp.status(), http::StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&resp), Some("/profile"));

        let resp = visit("/login", Some(EXPIRED)).await;
        assert_eq!(resp.status(), http::StatusCode::OK);
    }

    #[test]
    fn lets_allowed_through() {
        assert!(respond(Action::Allow, jar(), COOKIE).is_none());
    }

    #[test]
    fn redirects_to_login() {
        let resp = respond(
            Action::RedirectToAuthEntry {
                clear_session: false,
            },
            jar(),
            COOKIE,
        )
        .unwrap();

        assert_eq!(resp.status(), http::StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&resp), Some("/login"));
        assert!(set_cookie(&resp).is_empty());
    }

    #[test]
    fn redirects_to_login_clearing_session() {
        let resp = respond(
            Action::RedirectToAuthEntry {
                clear_session: true,
            },
            jar(),
            COOKIE,
        )
        .unwrap();

        assert_eq!(resp.status(), http::StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&resp), Some("/login"));

        let cookies = set_cookie(&resp);
        assert_eq!(cookies.len(), 1);
        let cleared = Cookie::parse(cookies[0]).unwrap();
        assert_eq!(cleared.name(), "auth-token");
        assert_eq!(cleared.value(), "");
        assert_eq!(cleared.http_only(), Some(true));
        assert_eq!(cleared.path(), Some("/"));
        assert_eq!(
            cleared.expires_datetime().map(|dt| dt.unix_timestamp()),
            Some(0),
        );
    }

    #[test]
    fn redirects_to_profile() {
        let resp =
            respond(Action::RedirectToProtectedDefault, jar(), COOKIE).unwrap();

        assert_eq!(resp.status(), http::StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&resp), Some("/profile"));
        assert!(set_cookie(&resp).is_empty());
    }
}
