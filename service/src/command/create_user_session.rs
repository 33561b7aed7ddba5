//! [`Command`] for creating a [`Session`].

use common::operations::Perform;
use derive_more::{Display, Error, From};
use secrecy::SecretBox;
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{user::Session, User};
use crate::{
    domain::user::{self, session},
    infra::{
        auth_api::{self, Authentication, Credentials},
        AuthApi,
    },
    Service,
};

use super::Command;

/// [`Command`] for creating a [`Session`] by [`User`] credentials.
#[derive(Debug)]
pub struct CreateUserSession {
    /// [`user::Email`] of a [`User`].
    pub email: user::Email,

    /// [`user::Password`] of a [`User`].
    pub password: SecretBox<user::Password>,
}

/// Output of [`CreateUserSession`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// [`session::Token`] of the created [`Session`].
    pub token: session::Token,
}

impl<Api> Command<CreateUserSession> for Service<Api>
where
    Api: AuthApi<
        Perform<Credentials>,
        Ok = Authentication,
        Err = Traced<auth_api::Error>,
    >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateUserSession { email, password } = cmd;

        match self
            .api()
            .execute(Perform(Credentials { email, password }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        {
            Authentication::Granted(token) => Ok(Output { token }),
            Authentication::Denied { message } => {
                Err(tracerr::new!(E::WrongCredentials { message }))
            }
        }
    }
}

/// Error of [`CreateUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`AuthApi`] error.
    #[display("`AuthApi` operation failed: {_0}")]
    Api(auth_api::Error),

    /// [`CreateUserSession`] contains credentials rejected by the upstream.
    #[display("Wrong `User` credentials")]
    #[from(ignore)]
    WrongCredentials {
        /// Human-readable reason provided by the upstream, if any.
        #[error(not(source))]
        message: Option<String>,
    },
}
