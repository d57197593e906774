//! Terminal output

use std::{fmt::Display, io};

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use storefront::{
    cart::Cart,
    catalog::{CategoryTree, Product},
    orders::Order,
    pricing::to_money,
};
use tabled::{
    Table,
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

/// Where command output goes, and how prices are printed.
pub(crate) struct Output<W> {
    out: W,
    currency: &'static Currency,
}

impl<W: io::Write> Output<W> {
    pub(crate) fn new(out: W, currency: &'static Currency) -> Self {
        Self { out, currency }
    }

    pub(crate) fn currency(&self) -> &'static Currency {
        self.currency
    }

    pub(crate) fn line(&mut self, text: impl Display) -> Result<(), String> {
        writeln!(self.out, "{text}").map_err(|error| format!("failed to write output: {error}"))
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }
}

pub(crate) fn money(amount: Decimal, currency: &'static Currency) -> String {
    to_money(amount, currency).to_string()
}

fn finish(builder: Builder, right_aligned: std::ops::Range<usize>) -> Table {
    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(right_aligned), Alignment::right());

    table
}

pub(crate) fn products_table(products: &[Product], currency: &'static Currency) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Id", "Name", "Category", "Price", "Discount", "Stock"]);

    for product in products {
        let price = product
            .effective_price()
            .map_or_else(|_| "invalid".to_string(), |price| money(price, currency));

        let discount = product
            .discount_percent
            .filter(|_| product.has_discount())
            .map(|percent| format!("{percent}%"))
            .unwrap_or_default();

        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product
                .category
                .as_ref()
                .map(|category| category.name.clone())
                .unwrap_or_default(),
            price,
            discount,
            product.quantity.to_string(),
        ]);
    }

    finish(builder, 3..6)
}

pub(crate) fn categories_table(tree: &CategoryTree) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Id", "Name", "Parent"]);

    for category in tree.iter() {
        let name = if category.parent_id.is_some() {
            format!("  {}", category.name)
        } else {
            category.name.clone()
        };

        builder.push_record([
            category.id.to_string(),
            name,
            category
                .parent_id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        ]);
    }

    finish(builder, 0..0)
}

pub(crate) fn cart_table(cart: &Cart, currency: &'static Currency) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Item", "Size", "Colour", "Qty", "Unit", "Subtotal"]);

    for line in cart.iter() {
        builder.push_record([
            line.item_id.to_string(),
            line.size.clone().unwrap_or_default(),
            line.color.clone().unwrap_or_default(),
            line.quantity.to_string(),
            money(line.unit_price, currency),
            line
                .subtotal()
                .map(|subtotal| money(subtotal, currency))
                .unwrap_or_default(),
        ]);
    }

    let totals = cart.totals();

    builder.push_record([
        "Total".to_string(),
        String::new(),
        String::new(),
        totals.unit_count().to_string(),
        String::new(),
        money(totals.grand_total(), currency),
    ]);

    finish(builder, 3..6)
}

pub(crate) fn orders_table(orders: &[Order], currency: &'static Currency) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Id", "Customer", "Placed", "Units", "Total", "Status", "Payment"]);

    for order in orders {
        builder.push_record([
            order.id.to_string(),
            order.name.clone(),
            order
                .created_at
                .map(|at| at.strftime("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            order.unit_count().to_string(),
            money(order.total_amount, currency),
            order.order_status.to_string(),
            order.payment_status.clone(),
        ]);
    }

    finish(builder, 3..5)
}
