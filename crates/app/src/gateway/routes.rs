//! Gateway endpoint paths, relative to the API base URL.

use storefront::ids::{CategoryId, HomeSectionId, OrderId, ProductId};

pub(crate) const SIGN_UP: &str = "signup";
pub(crate) const SIGN_IN: &str = "signin";

pub(crate) const PRODUCTS: &str = "products";
pub(crate) const CATEGORIES: &str = "categories";

pub(crate) const CART_ADD: &str = "cart/add";
pub(crate) const CART_SUBTRACT: &str = "cart/subtract";
pub(crate) const CART_CLEAR: &str = "cart/clear";
pub(crate) const CART_ITEMS: &str = "cart/items";
pub(crate) const CART_CHECKOUT: &str = "cart/checkout";

pub(crate) const ORDERS: &str = "orders";

pub(crate) const HOME_SECTIONS: &str = "homeSections";
pub(crate) const HOME_SECTION_CREATE: &str = "homeSection/create";

pub(crate) const CREATE_PREFERENCE: &str = "payment/create-preference";

pub(crate) fn product(id: &ProductId) -> String {
    format!("product/{id}")
}

pub(crate) fn category(id: &CategoryId) -> String {
    format!("categories/{id}")
}

pub(crate) fn cart_remove(id: &ProductId) -> String {
    format!("cart/remove/{id}")
}

pub(crate) fn order(id: &OrderId) -> String {
    format!("order/{id}")
}

pub(crate) fn home_section_update(id: &HomeSectionId) -> String {
    format!("homeSection/update/{id}")
}

pub(crate) fn home_section_delete(id: &HomeSectionId) -> String {
    format!("homeSection/delete/{id}")
}
