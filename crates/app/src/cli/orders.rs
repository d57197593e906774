use std::io;

use storefront_app::AppContext;

use super::{Output, render::orders_table, report};

pub(crate) async fn list(
    context: &AppContext,
    out: &mut Output<impl io::Write>,
) -> Result<(), String> {
    let orders = context
        .orders
        .load()
        .await
        .map_err(|error| format!("failed to load orders: {}", report(&error)))?;

    if orders.is_empty() {
        return out.line("no orders found");
    }

    out.line(orders_table(&orders, out.currency()))
}
