//! Sign-in and sign-up.

use std::fmt;

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use storefront::session::User;
use thiserror::Error;

use super::{
    GatewayError, HttpGateway, MultipartPayload,
    client::Access,
    routes::{SIGN_IN, SIGN_UP},
};

/// Shortest password accepted at sign-up.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Email and password.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    /// Account email
    pub email: String,

    /// Account password
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Problems with a sign-up form caught before it is sent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignUpError {
    /// The password is too short.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    PasswordTooShort,

    /// The confirmation does not match the password.
    #[error("passwords do not match")]
    PasswordMismatch,
}

/// New account details.
#[derive(Clone, PartialEq, Eq)]
pub struct SignUpForm {
    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Account email
    pub email: String,

    /// Chosen password
    pub password: String,

    /// Password typed a second time
    pub password_confirmation: String,
}

impl SignUpForm {
    /// Check the password rules.
    ///
    /// # Errors
    ///
    /// Returns the first rule the form breaks.
    pub fn validate(&self) -> Result<(), SignUpError> {
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(SignUpError::PasswordTooShort);
        }

        if self.password != self.password_confirmation {
            return Err(SignUpError::PasswordMismatch);
        }

        Ok(())
    }

    fn into_payload(self) -> MultipartPayload {
        MultipartPayload::new()
            .text("firstName", self.first_name)
            .text("lastName", self.last_name)
            .text("email", self.email)
            .text("password", self.password)
            .text("passwordConfirmation", self.password_confirmation)
    }
}

impl fmt::Debug for SignUpForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpForm")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Credential and profile handed out on sign-in or sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthSession {
    /// Bearer token
    pub token: String,

    /// Signed-in user
    pub user: User,
}

/// Account endpoints.
#[automock]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchange credentials for a session.
    async fn sign_in(&self, credentials: Credentials) -> Result<AuthSession, GatewayError>;

    /// Create an account and sign into it.
    async fn sign_up(&self, form: SignUpForm) -> Result<AuthSession, GatewayError>;
}

#[async_trait]
impl AuthGateway for HttpGateway {
    #[tracing::instrument(name = "gateway.auth.sign_in", skip_all, err)]
    async fn sign_in(&self, credentials: Credentials) -> Result<AuthSession, GatewayError> {
        let request = self.request(Method::POST, SIGN_IN, None).json(&credentials);

        self.send(request, Access::Public).await
    }

    #[tracing::instrument(name = "gateway.auth.sign_up", skip_all, err)]
    async fn sign_up(&self, form: SignUpForm) -> Result<AuthSession, GatewayError> {
        let request = self
            .request(Method::POST, SIGN_UP, None)
            .multipart(form.into_payload().into_form()?);

        self.send(request, Access::Public).await
    }
}
