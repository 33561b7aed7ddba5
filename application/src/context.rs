//! [`Context`]-related definitions.

use std::sync::atomic::{self, AtomicU16};

use axum::{async_trait, extract::FromRequestParts};
use axum_extra::extract::CookieJar;
use juniper::{
    http::{GraphQLBatchResponse, GraphQLResponse},
    IntoFieldError as _,
};
use service::{
    domain::{self, user::session},
    query, Query as _,
};
use tokio::sync::OnceCell;
use tracing as log;

use crate::{
    cookie::SessionCookie, define_error, Error, JuniperResponse, Service,
};

/// Application context.
#[derive(Debug)]
pub struct Context {
    /// [`Service`] instance.
    service: Service,

    /// Error status code.
    error_status_code: AtomicU16,

    /// [`session::Token`] the current HTTP request carries.
    token: Option<session::Token>,

    /// [`domain::User`] owning the [`session::Token`].
    current_user: OnceCell<domain::User>,
}

impl Context {
    /// Creates a new [`Context`] for a request carrying the provided
    /// [`session::Token`].
    #[must_use]
    pub fn new(service: Service, token: Option<session::Token>) -> Self {
        Self {
            service,
            error_status_code: AtomicU16::new(
                http::StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            ),
            token,
            current_user: OnceCell::new(),
        }
    }

    /// Returns [`Service`] instance of this [`Context`].
    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Returns the error status code of this [`Context`].
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn error_status_code(&self) -> http::StatusCode {
        http::StatusCode::from_u16(
            self.error_status_code.load(atomic::Ordering::Relaxed),
        )
        .expect("invalid status code")
    }

    /// Sets the error status code for this [`Context`].
    ///
    /// Provided [`http::StatusCode`] will be applied to the response.
    pub fn set_error_status_code(&self, status_code: http::StatusCode) {
        self.error_status_code
            .store(status_code.as_u16(), atomic::Ordering::Relaxed);
    }

    /// Helper method calling [`Context::set_error_status_code()`] inside
    /// [`Result::map_err()`] closure.
    pub fn error(&self) -> impl FnOnce(Error) -> Error + '_ {
        move |err| {
            self.set_error_status_code(err.status_code);
            err
        }
    }

    /// Returns the [`domain::User`] owning the [`session::Token`] of the
    /// current HTTP request.
    ///
    /// The upstream is asked at most once per [`Context`].
    ///
    /// # Errors
    ///
    /// Errors if:
    /// - the current HTTP request carries no [`session::Token`], or the
    ///   upstream doesn't recognize it;
    /// - the upstream is unavailable.
    pub async fn current_user(&self) -> Result<&domain::User, Error> {
        self.current_user
            .get_or_try_init(|| self.fetch_user())
            .await
            .map_err(self.error())
    }

    /// Fetches the [`domain::User`] owning the [`session::Token`] from the
    /// upstream.
    ///
    /// # Errors
    ///
    /// See [`Context::current_user()`] for details.
    async fn fetch_user(&self) -> Result<domain::User, Error> {
        let token = self
            .token
            .clone()
            .ok_or(AuthError::AuthorizationRequired)?;

        self.service
            .execute(query::user::ByToken::by(token))
            .await
            .map_err(|e| {
                log::error!("failed to fetch `User` profile: {e}");
                ProfileError::Unavailable
            })?
            .ok_or_else(|| AuthError::AuthorizationRequired.into())
    }
}

impl juniper::Context for Context {}

#[async_trait]
impl<S> FromRequestParts<S> for Context
where
    S: Send + Sync,
{
    type Rejection = JuniperResponse;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        let service =
            parts.extensions.get::<Service>().cloned().ok_or_else(|| {
                JuniperResponse {
                    status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
                    response: GraphQLBatchResponse::Single(
                        GraphQLResponse::error(
                            Error::internal(&"missing `Service` extension")
                                .into_field_error(),
                        ),
                    ),
                }
            })?;
        let token =
            SessionCookie::token(&CookieJar::from_headers(&parts.headers));

        Ok(Self::new(service, token))
    }
}

define_error! {
    enum AuthError {
        #[code = "AUTHORIZATION_REQUIRED"]
        #[status = UNAUTHORIZED]
        #[message = "Authorization required"]
        AuthorizationRequired,
    }
}

define_error! {
    enum ProfileError {
        #[code = "PROFILE_UNAVAILABLE"]
        #[status = BAD_GATEWAY]
        #[message = "`User` profile is unavailable"]
        Unavailable,
    }
}
