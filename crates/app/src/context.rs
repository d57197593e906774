//! App Context

use std::sync::Arc;

use storefront::session::SessionState;

use crate::{
    cart::CartService,
    catalog::CatalogService,
    checkout::CheckoutService,
    errors::StoreError,
    gateway::{
        AuthGateway, CartGateway, CatalogGateway, CheckoutGateway, HomeSectionsGateway,
        HttpGateway, OrdersGateway,
    },
    home_sections::HomeSectionsService,
    orders::OrdersService,
    session::{SessionGate, SessionService},
    state::StoreState,
    storage::LocalStore,
};

/// One implementation per gateway seam.
#[derive(Clone)]
pub struct Gateways {
    pub auth: Arc<dyn AuthGateway>,
    pub cart: Arc<dyn CartGateway>,
    pub catalog: Arc<dyn CatalogGateway>,
    pub checkout: Arc<dyn CheckoutGateway>,
    pub home_sections: Arc<dyn HomeSectionsGateway>,
    pub orders: Arc<dyn OrdersGateway>,
}

impl Gateways {
    /// Every seam served by the same HTTP client.
    pub fn http(gateway: HttpGateway) -> Self {
        let gateway = Arc::new(gateway);

        Self {
            auth: gateway.clone(),
            cart: gateway.clone(),
            catalog: gateway.clone(),
            checkout: gateway.clone(),
            home_sections: gateway.clone(),
            orders: gateway,
        }
    }
}

/// The store: shared state plus a service per concern.
#[derive(Clone)]
pub struct AppContext {
    pub state: StoreState,
    pub session: SessionService,
    pub cart: CartService,
    pub catalog: CatalogService,
    pub checkout: CheckoutService,
    pub home_sections: HomeSectionsService,
    pub orders: OrdersService,
}

impl AppContext {
    /// Wire every service over fresh guest state.
    pub fn new(storage: Arc<dyn LocalStore>, gateways: Gateways) -> Self {
        let state = StoreState::new(storage);
        let gate = SessionGate::new(state.clone());

        let cart = CartService::new(state.clone(), gate.clone(), gateways.cart);

        Self {
            session: SessionService::new(state.clone(), gate.clone(), gateways.auth, cart.clone()),
            checkout: CheckoutService::new(state.clone(), cart.clone(), gateways.checkout),
            catalog: CatalogService::new(gate.clone(), gateways.catalog),
            home_sections: HomeSectionsService::new(gate.clone(), gateways.home_sections),
            orders: OrdersService::new(gate, gateways.orders),
            cart,
            state,
        }
    }

    /// Restore the session and guest cart persisted by a previous run.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the persisted keys cannot be read.
    pub async fn restore(&self) -> Result<SessionState, StoreError> {
        self.session.restore().await
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use storefront::checkout::StockCheck;
    use testresult::TestResult;

    use crate::{
        gateway::{
            MockAuthGateway, MockCartGateway, MockCatalogGateway, MockCheckoutGateway,
            MockHomeSectionsGateway, MockOrdersGateway,
        },
        storage::{GUEST_CART_KEY, MemoryStore, TOKEN_KEY, USER_KEY},
        test::{TOKEN, line, user},
    };

    use super::*;

    fn gateways(cart: MockCartGateway) -> Gateways {
        gateways_with_checkout(cart, MockCheckoutGateway::new())
    }

    fn gateways_with_checkout(cart: MockCartGateway, checkout: MockCheckoutGateway) -> Gateways {
        Gateways {
            auth: Arc::new(MockAuthGateway::new()),
            cart: Arc::new(cart),
            catalog: Arc::new(MockCatalogGateway::new()),
            checkout: Arc::new(checkout),
            home_sections: Arc::new(MockHomeSectionsGateway::new()),
            orders: Arc::new(MockOrdersGateway::new()),
        }
    }

    #[tokio::test]
    async fn services_share_one_cart() -> TestResult {
        let snapshot = serde_json::to_string(&[line("p1", 2, 10)])?;
        let storage = Arc::new(MemoryStore::with_entries([(GUEST_CART_KEY, snapshot)]));

        let mut cart = MockCartGateway::new();
        cart.expect_add_item().never();

        let context = AppContext::new(storage, gateways(cart));

        assert_eq!(context.restore().await?, SessionState::Guest);
        assert_eq!(context.cart.snapshot().len(), 1);
        assert_eq!(context.state.cart_snapshot(), context.cart.snapshot());

        context.cart.add_line(line("p2", 1, 5)).await?;

        assert_eq!(context.state.cart_snapshot().len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn restored_session_can_check_out_its_server_cart() -> TestResult {
        let storage = Arc::new(MemoryStore::with_entries([
            (TOKEN_KEY, TOKEN.to_string()),
            (USER_KEY, serde_json::to_string(&user()?)?),
        ]));

        let mut cart = MockCartGateway::new();
        cart.expect_items()
            .once()
            .return_once(|_| Ok(vec![line("p1", 2, 10)]));

        let mut checkout = MockCheckoutGateway::new();
        checkout
            .expect_verify_stock()
            .once()
            .withf(|request| {
                request.cart_items.len() == 1 && request.total_amount == Decimal::from(20)
            })
            .return_once(|_| {
                Ok(StockCheck {
                    check_status: true,
                    message: String::new(),
                })
            });

        let context = AppContext::new(storage, gateways_with_checkout(cart, checkout));

        assert_eq!(context.restore().await?, SessionState::Authenticated);
        assert_eq!(context.cart.snapshot().len(), 1);
        assert!(context.checkout.verify_stock().await?.check_status);

        Ok(())
    }
}
