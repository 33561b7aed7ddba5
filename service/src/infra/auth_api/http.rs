//! HTTP [`AuthApi`] implementation.

use std::time::Duration;

use common::operations::{By, Perform, Select};
use derive_more::{Display, Error as StdError, From};
use secrecy::ExposeSecret as _;
use serde::Deserialize;
use tracerr::Traced;

#[cfg(doc)]
use crate::infra::AuthApi;
use crate::{
    domain::{user::session, User},
    infra::auth_api::{self, Authentication, Credentials},
};

/// [`Http`] client configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the upstream authentication API.
    pub base_url: String,

    /// Timeout of a single request.
    pub timeout: Duration,
}

/// [`AuthApi`] client speaking JSON over HTTP.
#[derive(Clone, Debug)]
pub struct Http {
    /// Underlying [`reqwest::Client`].
    client: reqwest::Client,

    /// Base URL of the upstream authentication API, without a trailing `/`.
    base_url: String,
}

impl Http {
    /// Path of the login endpoint.
    const LOGIN_PATH: &'static str = "/auth/login";

    /// Path of the current user endpoint.
    const USER_PATH: &'static str = "/auth/user";

    /// Creates a new [`Http`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If failed to build the underlying [`reqwest::Client`].
    pub fn new(conf: &Config) -> Result<Self, Traced<auth_api::Error>> {
        let client = reqwest::Client::builder()
            .timeout(conf.timeout)
            .build()
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Ok(Self {
            client,
            base_url: conf.base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Returns the full URL of the provided endpoint `path`.
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Body of the login endpoint response.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    /// Indicator whether the login succeeded.
    #[serde(default)]
    success: bool,

    /// Issued token, if the login succeeded.
    #[serde(default)]
    token: Option<String>,

    /// Human-readable failure reason.
    #[serde(default)]
    message: Option<String>,
}

impl From<LoginResponse> for Authentication {
    fn from(resp: LoginResponse) -> Self {
        match resp.token.filter(|_| resp.success).and_then(session::Token::new)
        {
            Some(token) => Self::Granted(token),
            None => Self::Denied {
                message: resp.message.filter(|m| !m.is_empty()),
            },
        }
    }
}

/// Body of the current user endpoint response.
#[derive(Debug, Deserialize)]
struct UserResponse {
    /// Indicator whether the [`User`] has been resolved.
    #[serde(default)]
    success: bool,

    /// Resolved [`User`].
    #[serde(default)]
    user: Option<User>,
}

impl auth_api::AuthApi<Perform<Credentials>> for Http {
    type Ok = Authentication;
    type Err = Traced<auth_api::Error>;

    async fn execute(
        &self,
        Perform(creds): Perform<Credentials>,
    ) -> Result<Self::Ok, Self::Err> {
        let email: &str = creds.email.as_ref();
        let password: &str = creds.password.expose_secret().as_ref();

        let resp = self
            .client
            .post(self.url(Self::LOGIN_PATH))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;

        let status = resp.status();
        let body = resp
            .json::<LoginResponse>()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        tracing::debug!(%status, success = body.success, "upstream login");

        Ok(body.into())
    }
}

impl auth_api::AuthApi<Select<By<Option<User>, session::Token>>> for Http {
    type Ok = Option<User>;
    type Err = Traced<auth_api::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, session::Token>>,
    ) -> Result<Self::Ok, Self::Err> {
        let token = by.into_inner();
        let token: &str = token.as_ref();

        let resp = self
            .client
            .get(self.url(Self::USER_PATH))
            .bearer_auth(token)
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;

        let status = resp.status();
        let body = resp
            .json::<UserResponse>()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        tracing::debug!(%status, success = body.success, "upstream user");

        Ok(body.user.filter(|_| body.success))
    }
}

/// [`Http`] client [`Error`].
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Request failed to be performed or its response failed to be decoded.
    #[display("HTTP request failed: {_0}")]
    Request(reqwest::Error),
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use crate::infra::auth_api::Authentication;

    use super::{Config, Http, LoginResponse};

    #[test]
    fn joins_urls() {
        let http = Http::new(&Config {
            base_url: "http://127.0.0.1:3001/".into(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();

        assert_eq!(
            http.url(Http::LOGIN_PATH),
            "http://127.0.0.1:3001/auth/login",
        );
        assert_eq!(
            http.url(Http::USER_PATH),
            "http://127.0.0.1:3001/auth/user",
        );
    }

    #[test]
    fn interprets_login_response() {
        let parse = |json: &str| {
            Authentication::from(
                serde_json::from_str::<LoginResponse>(json).unwrap(),
            )
        };

        assert!(matches!(
            parse(r#"{"success":true,"token":"a.b.c"}"#),
            Authentication::Granted(t)
                if AsRef::<str>::as_ref(&t) == "a.b.c",
        ));
        assert_eq!(
            parse(r#"{"success":false,"message":"Invalid credentials"}"#),
            Authentication::Denied {
                message: Some("Invalid credentials".into()),
            },
        );
        assert_eq!(
            parse(r#"{"success":true,"token":""}"#),
            Authentication::Denied { message: None },
        );
        assert_eq!(
            parse(r#"{"success":false,"token":"a.b.c","message":""}"#),
            Authentication::Denied { message: None },
        );
        assert_eq!(parse("{}"), Authentication::Denied { message: None });
    }
}
