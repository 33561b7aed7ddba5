//! [`SessionCookie`] definitions.

use std::time::Duration;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use common::DateTime;
use service::domain::user::session::{self, Token};

/// Attributes of the cookie carrying a session [`Token`].
#[derive(Clone, Copy, Debug)]
pub struct SessionCookie {
    /// Indicator whether the cookie is sent over HTTPS only.
    pub secure: bool,

    /// Lifetime of an issued cookie.
    pub max_age: Duration,
}

impl SessionCookie {
    /// Extracts the session [`Token`] from the provided [`CookieJar`].
    ///
    /// An empty cookie value is treated as no [`Token`].
    #[must_use]
    pub fn token(jar: &CookieJar) -> Option<Token> {
        jar.get(session::COOKIE_NAME)
            .map(Cookie::value)
            .and_then(Token::new)
    }

    /// Builds a [`Cookie`] issuing the provided [`Token`].
    #[must_use]
    pub fn issue(&self, token: &Token) -> Cookie<'static> {
        let value: &str = token.as_ref();
        let mut cookie = self.base(value.to_owned());
        cookie.set_max_age(
            i64::try_from(self.max_age.as_secs())
                .map_or(time::Duration::MAX, time::Duration::seconds),
        );
        cookie
    }

    /// Builds a [`Cookie`] clearing the issued one.
    #[must_use]
    pub fn clear(&self) -> Cookie<'static> {
        let mut cookie = self.base(String::new());
        cookie.set_expires(time::OffsetDateTime::from(DateTime::UNIX_EPOCH));
        cookie
    }

    /// Builds a [`Cookie`] with the attributes shared by issued and cleared
    /// ones.
    fn base(&self, value: String) -> Cookie<'static> {
        Cookie::build((session::COOKIE_NAME, value))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Strict)
            .build()
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
    use service::domain::user::session::Token;

    use super::SessionCookie;

    const COOKIE: SessionCookie = SessionCookie {
        secure: true,
        max_age: Duration::from_secs(7 * 24 * 60 * 60),
    };

    #[test]
    fn issues_hardened_cookie() {
        let cookie = COOKIE.issue(&Token::new("a.b.c").unwrap());

        assert_eq!(cookie.name(), "auth-token");
        assert_eq!(cookie.value(), "a.b.c");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(7)));
    }

    #[test]
    fn clears_with_same_attributes() {
        let cookie = COOKIE.clear();

        assert_eq!(cookie.name(), "auth-token");
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(
            cookie.expires_datetime(),
            Some(time::OffsetDateTime::UNIX_EPOCH),
        );
    }

    #[test]
    fn reads_token_from_jar() {
        assert!(SessionCookie::token(&CookieJar::new()).is_none());

        let jar = CookieJar::new().add(Cookie::new("auth-token", ""));
        assert!(SessionCookie::token(&jar).is_none());

        let jar = CookieJar::new().add(Cookie::new("auth-token", "a.b.c"));
        assert_eq!(SessionCookie::token(&jar), Token::new("a.b.c"));
    }
}
