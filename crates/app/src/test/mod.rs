//! Test Helpers

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;
use storefront::{cart::CartLine, session::User};
use testresult::TestResult;

use crate::{
    cart::CartService, gateway::MockCartGateway, session::SessionGate, state::StoreState,
    storage::LocalStore,
};

pub(crate) const TOKEN: &str = "test-token";

pub(crate) fn user() -> TestResult<User> {
    Ok(serde_json::from_value(json!({
        "_id": "u1",
        "firstName": "Ada",
        "lastName": "Lovelace",
        "fullName": "Ada Lovelace",
        "email": "ada@example.com",
        "role": "admin"
    }))?)
}

pub(crate) fn guest_state(storage: Arc<dyn LocalStore>) -> StoreState {
    StoreState::new(storage)
}

pub(crate) fn signed_in_state(storage: Arc<dyn LocalStore>) -> TestResult<StoreState> {
    let state = StoreState::new(storage);

    state.session_mut().sign_in(TOKEN, user()?)?;

    Ok(state)
}

pub(crate) fn line(id: &str, quantity: u32, price: i64) -> CartLine {
    CartLine::new(id, quantity, Decimal::from(price))
}

pub(crate) fn cart_service(state: &StoreState, gateway: MockCartGateway) -> CartService {
    CartService::new(
        state.clone(),
        SessionGate::new(state.clone()),
        Arc::new(gateway),
    )
}
