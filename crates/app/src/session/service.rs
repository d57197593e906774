//! Session service.

use std::{fmt, sync::Arc};

use storefront::session::{SessionState, User};
use tracing::{info, warn};

use crate::{
    cart::{CartService, ReconcileReport},
    errors::StoreError,
    gateway::{AuthGateway, AuthSession, Credentials, SignUpForm},
    session::SessionGate,
    state::StoreState,
    storage::{TOKEN_KEY, USER_KEY},
};

/// Sign-in, sign-up, sign-out and startup restore.
#[derive(Clone)]
pub struct SessionService {
    state: StoreState,
    gate: SessionGate,
    auth: Arc<dyn AuthGateway>,
    cart: CartService,
}

impl SessionService {
    /// Service over the shared state.
    pub fn new(
        state: StoreState,
        gate: SessionGate,
        auth: Arc<dyn AuthGateway>,
        cart: CartService,
    ) -> Self {
        Self {
            state,
            gate,
            auth,
            cart,
        }
    }

    /// Move from guest to signed in, persisting the credential and profile.
    ///
    /// This is the only way into the authenticated state.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Session`]: the token is blank; the session is unchanged.
    /// - [`StoreError::Storage`]: the credential could not be persisted.
    #[tracing::instrument(name = "session.service.sign_in", skip_all, fields(user = %user.id), err)]
    pub async fn sign_in(&self, token: String, user: User) -> Result<(), StoreError> {
        let profile = serde_json::to_string(&user).map_err(crate::storage::StorageError::from)?;

        self.state.session_mut().sign_in(token.clone(), user)?;

        let storage = self.state.storage();

        storage.set(TOKEN_KEY, token).await?;
        storage.set(USER_KEY, profile).await?;

        info!("signed in");

        Ok(())
    }

    /// Sign in with email and password, then hand the guest cart to the server.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Gateway`]: the gateway refused the credentials
    ///   ([`crate::gateway::GatewayError::Rejected`]) or could not be reached.
    /// - Any error from [`SessionService::sign_in`] or
    ///   [`CartService::reconcile_guest_cart_with_server`].
    #[tracing::instrument(name = "session.service.sign_in_with_credentials", skip_all, err)]
    pub async fn sign_in_with_credentials(
        &self,
        credentials: Credentials,
    ) -> Result<ReconcileReport, StoreError> {
        let session = self.auth.sign_in(credentials).await?;

        self.establish(session).await
    }

    /// Create an account, sign into it, then hand the guest cart to the server.
    ///
    /// # Errors
    ///
    /// - [`StoreError::SignUp`]: the form breaks a password rule; nothing is sent.
    /// - Otherwise as [`SessionService::sign_in_with_credentials`].
    #[tracing::instrument(name = "session.service.sign_up", skip_all, err)]
    pub async fn sign_up(&self, form: SignUpForm) -> Result<ReconcileReport, StoreError> {
        form.validate()?;

        let session = self.auth.sign_up(form).await?;

        self.establish(session).await
    }

    /// End the session. See [`SessionGate::sign_out`].
    ///
    /// # Errors
    ///
    /// Returns a storage error if a persisted key cannot be deleted.
    pub async fn sign_out(&self) -> Result<(), StoreError> {
        self.gate.sign_out().await
    }

    /// Restore the session persisted by a previous run.
    ///
    /// A stored token and profile sign the session back in and load the
    /// server's cart. A token the server refuses leaves a guest session.
    /// Otherwise the session stays a guest and the guest cart snapshot is
    /// loaded. A malformed profile is discarded along with its token.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Storage`]: the persisted keys cannot be read.
    /// - [`StoreError::Gateway`]: the server's cart could not be fetched.
    #[tracing::instrument(name = "session.service.restore", skip_all, err)]
    pub async fn restore(&self) -> Result<SessionState, StoreError> {
        let storage = self.state.storage();

        let token = storage.get(TOKEN_KEY).await?;
        let profile = storage.get(USER_KEY).await?;

        if let (Some(token), Some(profile)) = (token, profile) {
            match serde_json::from_str::<User>(&profile) {
                Ok(user) => {
                    if self.state.session_mut().sign_in(token, user).is_ok() {
                        return self.load_server_cart().await;
                    }

                    warn!("discarding blank persisted token");
                }
                Err(error) => warn!(%error, "discarding malformed persisted user"),
            }

            storage.remove(TOKEN_KEY).await?;
            storage.remove(USER_KEY).await?;
        }

        self.cart.restore_guest_cart().await?;

        Ok(SessionState::Guest)
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Option<User> {
        self.state.session().user().cloned()
    }

    /// Whether a credential is held.
    pub fn is_authenticated(&self) -> bool {
        self.state.session().is_authenticated()
    }

    async fn load_server_cart(&self) -> Result<SessionState, StoreError> {
        match self.cart.refresh().await {
            Ok(cart) => {
                info!(lines = cart.len(), "restored signed-in session");

                Ok(SessionState::Authenticated)
            }
            Err(StoreError::SessionExpired) => {
                warn!("persisted session was refused, continuing as guest");

                Ok(SessionState::Guest)
            }
            Err(error) => Err(error),
        }
    }

    async fn establish(&self, session: AuthSession) -> Result<ReconcileReport, StoreError> {
        let guest_lines = self.state.cart_snapshot().into_lines();

        self.sign_in(session.token, session.user).await?;

        let token = self.gate.token()?;

        self.cart
            .reconcile_guest_cart_with_server(guest_lines, token)
            .await
    }
}

impl fmt::Debug for SessionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionService")
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        gateway::{GatewayError, MockAuthGateway, MockCartGateway},
        storage::{GUEST_CART_KEY, LocalStore, MemoryStore},
        test::{TOKEN, cart_service, guest_state, line, user},
    };

    use super::*;

    fn service(state: &StoreState, auth: MockAuthGateway, cart: MockCartGateway) -> SessionService {
        SessionService::new(
            state.clone(),
            SessionGate::new(state.clone()),
            Arc::new(auth),
            cart_service(state, cart),
        )
    }

    fn credentials() -> Credentials {
        Credentials {
            email: "ada@example.com".to_string(),
            password: "correct horse".to_string(),
        }
    }

    fn form(password: &str, confirmation: &str) -> SignUpForm {
        SignUpForm {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: password.to_string(),
            password_confirmation: confirmation.to_string(),
        }
    }

    #[tokio::test]
    async fn sign_in_persists_token_and_user() -> TestResult {
        let storage = Arc::new(MemoryStore::new());
        let state = guest_state(storage.clone());
        let service = service(&state, MockAuthGateway::new(), MockCartGateway::new());

        service.sign_in(TOKEN.to_string(), user()?).await?;

        assert!(service.is_authenticated());
        assert_eq!(service.current_user(), Some(user()?));
        assert_eq!(storage.get(TOKEN_KEY).await?.as_deref(), Some(TOKEN));

        let persisted: User =
            serde_json::from_str(&storage.get(USER_KEY).await?.unwrap_or_default())?;

        assert_eq!(persisted, user()?);

        Ok(())
    }

    #[tokio::test]
    async fn blank_token_leaves_guest_session() -> TestResult {
        let storage = Arc::new(MemoryStore::new());
        let state = guest_state(storage.clone());
        let service = service(&state, MockAuthGateway::new(), MockCartGateway::new());

        let result = service.sign_in("  ".to_string(), user()?).await;

        assert!(matches!(result, Err(StoreError::Session(_))));
        assert!(!service.is_authenticated());
        assert!(!storage.contains(TOKEN_KEY));

        Ok(())
    }

    #[tokio::test]
    async fn credentials_sign_in_hands_guest_cart_to_server() -> TestResult {
        let storage = Arc::new(MemoryStore::new());
        let state = guest_state(storage.clone());
        state.cart().add_line(line("P1", 2, 10))?;

        let session = AuthSession {
            token: TOKEN.to_string(),
            user: user()?,
        };

        let mut auth = MockAuthGateway::new();
        auth.expect_sign_in()
            .once()
            .withf(|credentials| credentials.email == "ada@example.com")
            .return_once(move |_| Ok(session));

        let mut cart = MockCartGateway::new();
        cart.expect_add_item()
            .once()
            .withf(|token, added| token.expose() == TOKEN && added == &line("P1", 2, 10))
            .return_once(|_, _| Ok(None));
        cart.expect_items()
            .once()
            .return_once(|_| Ok(vec![line("P1", 5, 10)]));

        let service = service(&state, auth, cart);

        let report = service.sign_in_with_credentials(credentials()).await?;

        assert!(report.is_complete());
        assert!(service.is_authenticated());
        assert_eq!(state.cart_snapshot().lines(), &[line("P1", 5, 10)]);

        Ok(())
    }

    #[tokio::test]
    async fn rejected_credentials_stay_guest() -> TestResult {
        let state = guest_state(Arc::new(MemoryStore::new()));

        let mut auth = MockAuthGateway::new();
        auth.expect_sign_in()
            .once()
            .return_once(|_| Err(GatewayError::Rejected("Invalid credentials".to_string())));

        let mut cart = MockCartGateway::new();
        cart.expect_add_item().never();

        let service = service(&state, auth, cart);

        let result = service.sign_in_with_credentials(credentials()).await;

        assert!(matches!(
            result,
            Err(StoreError::Gateway(GatewayError::Rejected(_)))
        ));
        assert!(!service.is_authenticated());

        Ok(())
    }

    #[tokio::test]
    async fn invalid_sign_up_is_never_sent() -> TestResult {
        let state = guest_state(Arc::new(MemoryStore::new()));

        let mut auth = MockAuthGateway::new();
        auth.expect_sign_up().never();

        let service = service(&state, auth, MockCartGateway::new());

        let short = service.sign_up(form("short", "short")).await;
        let mismatch = service.sign_up(form("long enough", "long enougH")).await;

        assert!(matches!(
            short,
            Err(StoreError::SignUp(crate::gateway::SignUpError::PasswordTooShort))
        ));
        assert!(matches!(
            mismatch,
            Err(StoreError::SignUp(crate::gateway::SignUpError::PasswordMismatch))
        ));

        Ok(())
    }

    fn persisted_session() -> TestResult<Arc<MemoryStore>> {
        let profile = serde_json::to_string(&user()?)?;

        Ok(Arc::new(MemoryStore::with_entries([
            (TOKEN_KEY, TOKEN.to_string()),
            (USER_KEY, profile),
        ])))
    }

    #[tokio::test]
    async fn restore_signs_back_in_and_loads_server_cart() -> TestResult {
        let state = guest_state(persisted_session()?);

        let mut cart = MockCartGateway::new();
        cart.expect_items()
            .once()
            .withf(|token| token.expose() == TOKEN)
            .return_once(|_| Ok(vec![line("p1", 2, 10)]));
        cart.expect_subtract_item()
            .once()
            .withf(|_, key, quantity| key.item_id.as_str() == "p1" && *quantity == 1)
            .return_once(|_, _, _| Ok(Some(vec![line("p1", 1, 10)])));

        let service = service(&state, MockAuthGateway::new(), cart);

        assert_eq!(service.restore().await?, SessionState::Authenticated);
        assert_eq!(service.current_user(), Some(user()?));
        assert_eq!(state.cart_snapshot().lines(), &[line("p1", 2, 10)]);

        let remaining = service
            .cart
            .decrement_line(storefront::cart::LineKey::item("p1"), 1)
            .await?;

        assert_eq!(remaining, 1);
        assert_eq!(state.cart_snapshot().lines(), &[line("p1", 1, 10)]);

        Ok(())
    }

    #[tokio::test]
    async fn restore_with_refused_token_continues_as_guest() -> TestResult {
        let storage = persisted_session()?;
        let state = guest_state(storage.clone());

        let mut cart = MockCartGateway::new();
        cart.expect_items()
            .once()
            .return_once(|_| Err(GatewayError::Unauthorized));

        let service = service(&state, MockAuthGateway::new(), cart);

        assert_eq!(service.restore().await?, SessionState::Guest);
        assert!(!service.is_authenticated());
        assert!(!storage.contains(TOKEN_KEY));
        assert!(state.cart().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn restore_discards_malformed_profile_and_loads_guest_cart() -> TestResult {
        let snapshot = serde_json::to_string(&[line("p1", 1, 10)])?;
        let storage = Arc::new(MemoryStore::with_entries([
            (TOKEN_KEY, TOKEN.to_string()),
            (USER_KEY, "not json".to_string()),
            (GUEST_CART_KEY, snapshot),
        ]));
        let state = guest_state(storage.clone());
        let service = service(&state, MockAuthGateway::new(), MockCartGateway::new());

        assert_eq!(service.restore().await?, SessionState::Guest);
        assert!(!storage.contains(TOKEN_KEY));
        assert!(!storage.contains(USER_KEY));
        assert_eq!(state.cart().len(), 1);

        Ok(())
    }
}
