//! Authentication HTTP handlers.

use axum::{
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use axum_extra::extract::CookieJar;
use secrecy::SecretBox;
use serde::Deserialize;
use service::{
    command::{self, create_user_session::ExecutionError, Command as _},
    domain::{route, user},
    query, Query as _,
};
use tracing as log;

use crate::{cookie::SessionCookie, define_error, AsError, Error, Service};

/// Minimal login page.
const LOGIN_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Sign in</title>
</head>
<body>
  <form method="post" action="/login">
    <label>Email <input type="email" name="email" required></label>
    <label>Password <input type="password" name="password" required></label>
    <button type="submit">Sign in</button>
  </form>
</body>
</html>
"#;

/// Form submitted to the [`login()`] handler.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    /// Email of a user.
    pub email: String,

    /// Password of a user.
    pub password: String,
}

/// Redirects to the protected area if the upstream recognizes the session,
/// or to the login page otherwise.
pub async fn home(
    Extension(service): Extension<Service>,
    jar: CookieJar,
) -> Redirect {
    let Some(token) = SessionCookie::token(&jar) else {
        return Redirect::temporary(route::AUTH_ENTRY_PATH);
    };

    match service.execute(query::user::ByToken::by(token)).await {
        Ok(Some(_)) => Redirect::temporary(route::PROTECTED_DEFAULT_PATH),
        Ok(None) => Redirect::temporary(route::AUTH_ENTRY_PATH),
        Err(e) => {
            log::error!("failed to fetch `User` profile: {e}");
            Redirect::temporary(route::AUTH_ENTRY_PATH)
        }
    }
}

/// Renders the login page.
#[expect(
    clippy::unused_async,
    reason = "`async` is required to match signature"
)]
pub async fn login_page() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}

/// Exchanges the submitted credentials for a session cookie, redirecting to
/// the protected area on success.
pub async fn login(
    Extension(service): Extension<Service>,
    Extension(cookie): Extension<SessionCookie>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let LoginForm { email, password } = form;
    let (Some(email), Some(password)) =
        (user::Email::new(email), user::Password::new(password))
    else {
        return Error::from(LoginError::MissingCredentials).into_response();
    };

    let res = service
        .execute(command::CreateUserSession {
            email,
            password: SecretBox::new(Box::new(password)),
        })
        .await;
    match res {
        Ok(out) => (
            jar.add(cookie.issue(&out.token)),
            Redirect::to(route::PROTECTED_DEFAULT_PATH),
        )
            .into_response(),
        Err(e) => {
            let err: &ExecutionError = e.as_ref();
            match err {
                ExecutionError::Api(_) => log::error!("login failed: {e}"),
                ExecutionError::WrongCredentials { .. } => {
                    log::info!("login rejected: {e}");
                }
            }
            e.into_error().into_response()
        }
    }
}

/// Clears the session cookie and redirects to the login page.
#[expect(
    clippy::unused_async,
    reason = "`async` is required to match signature"
)]
pub async fn logout(
    Extension(cookie): Extension<SessionCookie>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    (
        jar.add(cookie.clear()),
        Redirect::to(route::AUTH_ENTRY_PATH),
    )
}

impl AsError for ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Api(_) => Some(LoginError::Unavailable.into()),
            Self::WrongCredentials { message } => Some(Error::new(
                "WRONG_CREDENTIALS",
                http::StatusCode::UNAUTHORIZED,
                message.as_deref().unwrap_or("Login failed"),
            )),
        }
    }
}

define_error! {
    enum LoginError {
        #[code = "CREDENTIALS_REQUIRED"]
        #[status = BAD_REQUEST]
        #[message = "Email and password are required"]
        MissingCredentials,

        #[code = "AUTH_SERVICE_UNAVAILABLE"]
        #[status = BAD_GATEWAY]
        #[message = "Authentication service is unavailable"]
        Unavailable,
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use axum::{
        body::{self, Body},
        extract::Request,
        response::{IntoResponse, Response},
        routing::{get, post},
        Extension, Router,
    };
    use axum_extra::extract::cookie::Cookie;
    use common::TimeZone;
    use http::{header, StatusCode};
    use service::{
        command::create_user_session::ExecutionError,
        infra::{http::Config as ApiConfig, Http},
    };
    use tokio::net::TcpListener;
    use tower::ServiceExt as _;

    use crate::{cookie::SessionCookie, AsError as _, Service};

    use super::{home, login, LoginError};

    const COOKIE: SessionCookie = SessionCookie {
        secure: false,
        max_age: Duration::from_secs(60),
    };

    const GRANTED: &str = r#"{"success":true,"token":"a.b.c"}"#;

    const DENIED: &str =
        r#"{"success":false,"message":"Invalid credentials"}"#;

    const PROFILE: &str = concat!(
        r#"{"success":true,"user":"#,
        r#"{"id":1,"full_name":"J","email":"j@example.com"}}"#,
    );

    fn json(body: &'static str) -> impl IntoResponse {
        ([(header::CONTENT_TYPE, "application/json")], body)
    }

    async fn upstream_login(body: String) -> impl IntoResponse {
        json(if body.contains(r#""password":"secret""#) {
            GRANTED
        } else {
            DENIED
        })
    }

    async fn upstream_user(headers: http::HeaderMap) -> impl IntoResponse {
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());
        json(if auth == Some("Bearer a.b.c") {
            PROFILE
        } else {
            r#"{"success":false}"#
        })
    }

    /// Spawns an upstream authentication API accepting the `secret` password
    /// and the `a.b.c` token, returning its base URL.
    async fn upstream() -> String {
        let api = Router::new()
            .route("/auth/login", post(upstream_login))
            .route("/auth/user", get(upstream_user));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        _ = tokio::spawn(async move { axum::serve(listener, api).await });
        format!("http://{addr}")
    }

    /// Returns the base URL of an upstream refusing any connection.
    async fn unreachable() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }

    fn app(base_url: String) -> Router {
        let api = Http::new(&ApiConfig {
            base_url,
            timeout: Duration::from_secs(5),
        })
        .unwrap();
        let service = Service::new(
            service::Config {
                time_zone: TimeZone::utc(),
            },
            api,
        );

        Router::new()
            .route("/", get(home))
            .route("/login", post(login))
            .layer(Extension(service))
            .layer(Extension(COOKIE))
    }

    fn submit(form: &'static str) -> Request {
        http::Request::post("/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap()
    }

    fn visit(cookie: Option<&'static str>) -> Request {
        let req = http::Request::get("/");
        match cookie {
            Some(c) => req.header(header::COOKIE, c),
            None => req,
        }
        .body(Body::empty())
            .unwrap()
    }

    fn location(resp: &Response) -> Option<&str> {
        resp.headers()
            .get(header::LOCATION)
            .and_then(|h| h.to_str().ok())
    }

    async fn text(resp: Response) -> String {
        let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn requires_credentials_before_calling_upstream() {
        for form in ["email=&password=", "email=j%40example.com&password="] {
            let resp =
                app(unreachable().await).oneshot(submit(form)).await.unwrap();

            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            assert!(resp.headers().get(header::SET_COOKIE).is_none());
            let body = text(resp).await;
            assert!(body.contains(r#""success":false"#), "{body}");
            assert!(body.contains("CREDENTIALS_REQUIRED"), "{body}");
            assert!(body.contains("Email and password are required"), "{body}");
        }
    }

    #[tokio::test]
    async fn issues_session_on_login() {
        let resp = app(upstream().await)
            .oneshot(submit("email=j%40example.com&password=secret"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), Some("/profile"));

        let cookie = resp
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .map(|c| Cookie::parse(c.to_owned()).unwrap())
            .unwrap();
        assert_eq!(cookie.name(), "auth-token");
        assert_eq!(cookie.value(), "a.b.c");
        assert_eq!(cookie.http_only(), Some(true));
    }

    #[tokio::test]
    async fn rejects_wrong_password() {
        let resp = app(upstream().await)
            .oneshot(submit("email=j%40example.com&password=guess"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(resp.headers().get(header::SET_COOKIE).is_none());
        let body = text(resp).await;
        assert!(body.contains("WRONG_CREDENTIALS"), "{body}");
        assert!(body.contains("Invalid credentials"), "{body}");
    }

    #[tokio::test]
    async fn reports_unavailable_upstream_on_login() {
        let resp = app(unreachable().await)
            .oneshot(submit("email=j%40example.com&password=secret"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert!(text(resp).await.contains("AUTH_SERVICE_UNAVAILABLE"));
    }

    #[tokio::test]
    async fn home_redirects_to_login_without_cookie() {
        let resp = app(upstream().await).oneshot(visit(None)).await.unwrap();

        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&resp), Some("/login"));
    }

    #[tokio::test]
    async fn home_redirects_to_login_if_upstream_fails() {
        let resp = app(unreachable().await)
            .oneshot(visit(Some("auth-token=a.b.c")))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&resp), Some("/login"));
    }

    #[tokio::test]
    async fn home_redirects_to_login_if_session_is_unknown() {
        let resp = app(upstream().await)
            .oneshot(visit(Some("auth-token=x.y.z")))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&resp), Some("/login"));
    }

    #[tokio::test]
    async fn home_redirects_to_profile_with_session() {
        let resp = app(upstream().await)
            .oneshot(visit(Some("auth-token=a.b.c")))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&resp), Some("/profile"));
    }

    #[test]
    fn maps_login_failures() {
        let err = ExecutionError::WrongCredentials {
            message: Some("Invalid credentials".into()),
        }
        .as_error();
        assert_eq!(err.code, "WRONG_CREDENTIALS");
        assert_eq!(err.status_code, http::StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "Invalid credentials");

        let err = ExecutionError::WrongCredentials { message: None }.as_error();
        assert_eq!(err.message, "Login failed");

        let err = LoginError::Unavailable.as_error();
        assert_eq!(err.status_code, http::StatusCode::BAD_GATEWAY);
        assert_eq!(err.message, "Authentication service is unavailable");

        let err = LoginError::MissingCredentials.as_error();
        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Email and password are required");
    }
}
