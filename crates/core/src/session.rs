//! Session
//!
//! Who the client is acting as. A session starts out as a guest and becomes
//! authenticated only through [`Session::sign_in`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroize;

use crate::ids::UserId;

/// Errors raised when changing the session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The gateway handed back an empty credential.
    #[error("cannot sign in with an empty token")]
    EmptyToken,
}

/// Account role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Back-office administrator.
    Admin,

    /// Shopper.
    #[default]
    User,

    /// A role this client does not know about.
    #[serde(other)]
    Unknown,
}

/// Signed-in user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User id
    #[serde(rename = "_id")]
    pub id: UserId,

    /// First name
    #[serde(default)]
    pub first_name: String,

    /// Last name
    #[serde(default)]
    pub last_name: String,

    /// Full name
    #[serde(default)]
    pub full_name: String,

    /// Email address
    #[serde(default)]
    pub email: String,

    /// Role
    #[serde(default)]
    pub role: Role,
}

impl User {
    /// Whether the user may use the back-office.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Name to greet the user with.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.first_name
        } else {
            &self.full_name
        }
    }
}

/// Opaque bearer credential.
///
/// Never printed, and wiped from memory when dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wrap a raw token.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptyToken`] for a blank token.
    pub fn new(token: impl Into<String>) -> Result<Self, SessionError> {
        let token = token.into();

        if token.trim().is_empty() {
            return Err(SessionError::EmptyToken);
        }

        Ok(Self(token))
    }

    /// The raw token, for the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

impl Drop for BearerToken {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Whether the client is a guest or signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No credential.
    Guest,

    /// Holding a credential.
    Authenticated,
}

/// Current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<BearerToken>,
    user: Option<User>,
}

impl Session {
    /// A guest session.
    #[must_use]
    pub fn guest() -> Self {
        Self::default()
    }

    /// Move to the authenticated state.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptyToken`] for a blank token; the session is
    /// left unchanged.
    pub fn sign_in(&mut self, token: impl Into<String>, user: User) -> Result<(), SessionError> {
        let token = BearerToken::new(token)?;

        self.token = Some(token);
        self.user = Some(user);

        Ok(())
    }

    /// Drop the credential and profile.
    pub fn sign_out(&mut self) {
        self.token = None;
        self.user = None;
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.token.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Guest
        }
    }

    /// Whether a credential is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    /// The credential, when signed in.
    #[must_use]
    pub fn token(&self) -> Option<&BearerToken> {
        self.token.as_ref()
    }

    /// The signed-in user.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}
