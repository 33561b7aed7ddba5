//! [`Error`]-related definitions.

use std::fmt;

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use derive_more::Error as StdError;
use itertools::Itertools as _;
use juniper::IntoFieldError;
use serde::Serialize;
use tracerr::{Trace, Traced};

/// Defines a new error type convertible into an [`Error`].
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[status = $status_code:ident]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self::new(
                            $code,
                            ::http::StatusCode::$status_code,
                            $message,
                        ),
                    )*
                }
            }
        }

        impl $crate::AsError for $name {
            fn try_as_error(&self) -> Option<$crate::Error> {
                Some((*self).into())
            }
        }
    };
}

/// Error reported to a client of the gateway.
///
/// Rendered as a GraphQL field error by the API, and as a JSON [`Failure`]
/// body by the plain HTTP handlers.
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// [`http::StatusCode`] of this [`Error`].
    pub status_code: http::StatusCode,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// Human-readable [`Error`] message.
    pub message: String,
}

impl Error {
    /// Creates a new [`Error`] without a backtrace.
    #[must_use]
    pub fn new(
        code: Code,
        status_code: http::StatusCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            status_code,
            backtrace: None,
            message: message.into(),
        }
    }

    /// Creates a new [`Error`] representing an internal server error.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self::new(
            "INTERNAL_SERVER_ERROR",
            http::StatusCode::INTERNAL_SERVER_ERROR,
            msg.to_string(),
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(trace) = &self.backtrace {
            write!(f, "\n{}", trace.iter().format("\n"))?;
        }
        Ok(())
    }
}

impl<S> IntoFieldError<S> for Error
where
    S: From<String>,
{
    fn into_field_error(self) -> juniper::FieldError<S> {
        let Self {
            code,
            status_code: _,
            backtrace,
            message,
        } = self;

        let frames = backtrace
            .iter()
            .flat_map(|trace| trace.iter())
            .map(|frame| juniper::Value::scalar(frame.to_string()))
            .collect();

        let mut ext = juniper::Object::with_capacity(2);
        drop(ext.add_field("code", juniper::Value::scalar(code.to_owned())));
        drop(ext.add_field("backtrace", juniper::Value::list(frames)));

        juniper::FieldError::new(message, juniper::Value::object(ext))
    }
}

/// JSON body of a failed plain HTTP request.
#[derive(Debug, Serialize)]
pub struct Failure {
    /// Always `false`.
    pub success: bool,

    /// [`Code`] of the [`Error`].
    pub code: Code,

    /// Human-readable failure reason.
    pub message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let Self {
            code,
            status_code,
            backtrace: _,
            message,
        } = self;

        let body = Failure {
            success: false,
            code,
            message,
        };
        (status_code, Json(body)).into_response()
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type has no client-facing meaning.
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`], falling back to
    /// [`Error::internal()`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

#[cfg(test)]
mod spec {
    use axum::response::IntoResponse as _;
    use juniper::{DefaultScalarValue, IntoFieldError as _};

    use crate::define_error;

    use super::{AsError as _, Error};

    define_error! {
        enum TestError {
            #[code = "TEST_FAILED"]
            #[status = CONFLICT]
            #[message = "Test failed"]
            Failed,
        }
    }

    #[test]
    fn defines_errors() {
        let err = TestError::Failed.as_error();

        assert_eq!(err.code, "TEST_FAILED");
        assert_eq!(err.status_code, http::StatusCode::CONFLICT);
        assert_eq!(err.message, "Test failed");
        assert_eq!(err.to_string(), "[TEST_FAILED] Test failed");
    }

    #[test]
    fn keeps_backtrace_of_traced() {
        let err = tracerr::new!(TestError::Failed).into_error();

        assert_eq!(err.code, "TEST_FAILED");
        assert!(err.backtrace.is_some());
        assert!(err.to_string().starts_with("[TEST_FAILED] Test failed\n"));
    }

    #[test]
    fn falls_back_to_internal() {
        let err = Error::internal(&"boom");

        assert_eq!(err.code, "INTERNAL_SERVER_ERROR");
        assert_eq!(err.status_code, http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn renders_field_error_with_code() {
        let err: juniper::FieldError<DefaultScalarValue> =
            Error::from(TestError::Failed).into_field_error();

        assert_eq!(err.message(), "Test failed");
        assert_eq!(
            err.extensions()
                .as_object_value()
                .and_then(|o| o.get_field_value("code"))
                .and_then(juniper::Value::as_string_value),
            Some("TEST_FAILED"),
        );
    }

    #[test]
    fn renders_json_failure() {
        let resp = Error::from(TestError::Failed).into_response();

        assert_eq!(resp.status(), http::StatusCode::CONFLICT);
        assert_eq!(
            resp.headers().get(http::header::CONTENT_TYPE).unwrap(),
            "application/json",
        );
    }
}
