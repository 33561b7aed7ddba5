//! Routing policy guarding the session-protected area.
//!
//! Every incoming request is classified by its path into a [`Class`] and by
//! its [`Token`] into a [`TokenState`]. The pair is then matched against the
//! ordered [`RULES`] table, the first matching [`Rule`] deciding the
//! [`Action`].

use common::DateTime;
use derive_more::Display;

use crate::domain::user::session::{self, Token};

/// Path of the authentication entry (login) page.
pub const AUTH_ENTRY_PATH: &str = "/login";

/// Path prefix of the protected area.
pub const PROTECTED_PREFIX: &str = "/profile";

/// Default page of the protected area.
pub const PROTECTED_DEFAULT_PATH: &str = PROTECTED_PREFIX;

/// Classification of a request path.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Class {
    /// Path requires a valid session.
    #[display("protected")]
    Protected,

    /// Path of the authentication entry.
    #[display("auth-entry")]
    AuthEntry,

    /// Path not guarded in any way.
    #[display("unclassified")]
    Unclassified,
}

impl Class {
    /// Classifies the provided request `path`.
    ///
    /// The protected area is [`PROTECTED_PREFIX`] itself and everything under
    /// it, while the authentication entry is [`AUTH_ENTRY_PATH`] exactly.
    #[must_use]
    pub fn of(path: &str) -> Self {
        let is_protected = path
            .strip_prefix(PROTECTED_PREFIX)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));

        if is_protected {
            Self::Protected
        } else if path == AUTH_ENTRY_PATH {
            Self::AuthEntry
        } else {
            Self::Unclassified
        }
    }
}

/// State of a request [`Token`].
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum TokenState {
    /// Request carries no [`Token`].
    #[display("absent")]
    Absent,

    /// Request carries an expired or undecodable [`Token`].
    #[display("expired")]
    Expired,

    /// Request carries a [`Token`] which is not expired yet.
    #[display("valid")]
    Valid,
}

impl TokenState {
    /// Determines the [`TokenState`] of the provided `token` at the provided
    /// `now` moment.
    #[must_use]
    pub fn of(token: Option<&Token>, now: DateTime) -> Self {
        match token.map(|t| t.status(now)) {
            None => Self::Absent,
            Some(session::Status::Valid) => Self::Valid,
            Some(session::Status::Expired | session::Status::Malformed) => {
                Self::Expired
            }
        }
    }
}

/// Action to perform on a request.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Action {
    /// Let the request through.
    #[display("allow")]
    Allow,

    /// Redirect to the [`AUTH_ENTRY_PATH`], clearing the session cookie if
    /// `clear_session` is set.
    #[display(
        "redirect to `{}` (clear session: {clear_session})",
        AUTH_ENTRY_PATH,
    )]
    RedirectToAuthEntry {
        /// Indicator whether the session cookie must be cleared.
        clear_session: bool,
    },

    /// Redirect to the [`PROTECTED_DEFAULT_PATH`].
    #[display("redirect to `{}`", PROTECTED_DEFAULT_PATH)]
    RedirectToProtectedDefault,
}

/// Pattern of [`TokenState`]s a [`Rule`] applies to.
#[derive(Clone, Copy, Debug)]
pub enum TokenMatch {
    /// Any [`TokenState`].
    Any,

    /// Exactly the specified [`TokenState`].
    Is(TokenState),

    /// Any [`TokenState`] except the specified one.
    Not(TokenState),
}

impl TokenMatch {
    /// Checks whether the provided `state` matches this [`TokenMatch`].
    #[must_use]
    pub fn matches(self, state: TokenState) -> bool {
        match self {
            Self::Any => true,
            Self::Is(s) => s == state,
            Self::Not(s) => s != state,
        }
    }
}

/// Single entry of the [`RULES`] table.
#[derive(Clone, Copy, Debug)]
pub struct Rule {
    /// [`Class`] of the paths this [`Rule`] applies to.
    pub class: Option<Class>,

    /// [`TokenState`]s this [`Rule`] applies to.
    pub token: TokenMatch,

    /// [`Action`] to perform once this [`Rule`] matches.
    pub action: Action,
}

impl Rule {
    /// Checks whether this [`Rule`] applies to the provided request.
    #[must_use]
    pub fn matches(&self, class: Class, token: TokenState) -> bool {
        self.class.map_or(true, |c| c == class) && self.token.matches(token)
    }
}

/// Ordered routing rules, the first matching one wins.
///
/// An expired session on a protected path comes first, so its cookie is always
/// cleared.
pub const RULES: [Rule; 6] = [
    Rule {
        class: Some(Class::Protected),
        token: TokenMatch::Is(TokenState::Expired),
        action: Action::RedirectToAuthEntry {
            clear_session: true,
        },
    },
    Rule {
        class: Some(Class::Protected),
        token: TokenMatch::Is(TokenState::Absent),
        action: Action::RedirectToAuthEntry {
            clear_session: false,
        },
    },
    Rule {
        class: Some(Class::Protected),
        token: TokenMatch::Is(TokenState::Valid),
        action: Action::Allow,
    },
    Rule {
        class: Some(Class::AuthEntry),
        token: TokenMatch::Is(TokenState::Valid),
        action: Action::RedirectToProtectedDefault,
    },
    Rule {
        class: Some(Class::AuthEntry),
        token: TokenMatch::Not(TokenState::Valid),
        action: Action::Allow,
    },
    Rule {
        class: None,
        token: TokenMatch::Any,
        action: Action::Allow,
    },
];

/// Decides the [`Action`] for a request of the provided [`Class`] carrying a
/// [`Token`] in the provided [`TokenState`].
#[must_use]
pub fn decide(class: Class, token: TokenState) -> Action {
    RULES
        .iter()
        .find(|r| r.matches(class, token))
        .map_or(Action::Allow, |r| r.action)
}

/// Decides the [`Action`] for a request to the provided `path` carrying the
/// provided `token` at the provided `now` moment.
#[must_use]
pub fn decide_for(path: &str, token: Option<&Token>, now: DateTime) -> Action {
    let class = Class::of(path);
    if class == Class::Unclassified {
        return Action::Allow;
    }
    decide(class, TokenState::of(token, now))
}
