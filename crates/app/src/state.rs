//! Shared client state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use storefront::{cart::Cart, session::Session};

use crate::storage::LocalStore;

/// State shared by every service: the cart, the session, and local storage.
///
/// Locks guard short synchronous critical sections only and are never held
/// across an `.await`.
#[derive(Clone)]
pub struct StoreState {
    cart: Arc<Mutex<Cart>>,
    session: Arc<RwLock<Session>>,
    storage: Arc<dyn LocalStore>,
}

impl StoreState {
    /// Fresh guest state over `storage`.
    pub fn new(storage: Arc<dyn LocalStore>) -> Self {
        Self {
            cart: Arc::new(Mutex::new(Cart::new())),
            session: Arc::new(RwLock::new(Session::guest())),
            storage,
        }
    }

    pub(crate) fn cart(&self) -> MutexGuard<'_, Cart> {
        lock(&self.cart)
    }

    pub(crate) fn session(&self) -> RwLockReadGuard<'_, Session> {
        self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn session_mut(&self) -> RwLockWriteGuard<'_, Session> {
        self.session.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Local storage.
    pub fn storage(&self) -> &Arc<dyn LocalStore> {
        &self.storage
    }

    /// Copy of the current cart.
    pub fn cart_snapshot(&self) -> Cart {
        self.cart().clone()
    }

    /// Copy of the current session.
    pub fn session_snapshot(&self) -> Session {
        self.session().clone()
    }
}

/// Lock `mutex`, recovering the data if a holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl std::fmt::Debug for StoreState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreState")
            .field("cart", &*self.cart())
            .field("session", &*self.session())
            .finish_non_exhaustive()
    }
}
