use std::io;

use clap::{Args, Subcommand};
use storefront::{
    cart::{CartLine, LineKey},
    ids::ProductId,
};
use storefront_app::{AppContext, StoreError};

use super::{Output, render::cart_table, report};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Print the cart
    Show,

    /// Add units of a product
    Add(AddArgs),

    /// Take units off a line
    Subtract(SubtractArgs),

    /// Remove a line outright
    Remove(LineArgs),

    /// Empty the cart
    Clear,

    /// Reload the cart from the server
    Refresh,
}

#[derive(Debug, Args)]
struct LineArgs {
    /// Product id
    #[arg(long)]
    product: ProductId,

    /// Chosen size
    #[arg(long)]
    size: Option<String>,

    /// Chosen colour
    #[arg(long)]
    color: Option<String>,
}

impl LineArgs {
    fn key(&self) -> LineKey {
        LineKey::variant(self.product.clone(), self.size.clone(), self.color.clone())
    }
}

#[derive(Debug, Args)]
struct AddArgs {
    #[command(flatten)]
    line: LineArgs,

    /// Units to add
    #[arg(long, default_value_t = 1)]
    quantity: u32,
}

#[derive(Debug, Args)]
struct SubtractArgs {
    #[command(flatten)]
    line: LineArgs,

    /// Units to take off
    #[arg(long, default_value_t = 1)]
    quantity: u32,
}

pub(crate) async fn run(
    context: &AppContext,
    command: CartCommand,
    out: &mut Output<impl io::Write>,
) -> Result<(), String> {
    match command.command {
        CartSubcommand::Show => {}
        CartSubcommand::Add(args) => add(context, args, out).await?,
        CartSubcommand::Subtract(args) => {
            let remaining = context
                .cart
                .decrement_line(args.line.key(), args.quantity)
                .await
                .map_err(describe)?;

            out.line(format!("{} now has {remaining} left", args.line.product))?;
        }
        CartSubcommand::Remove(args) => {
            let removed = context
                .cart
                .remove_line(args.key())
                .await
                .map_err(describe)?;

            out.line(format!("removed {} x{}", removed.item_id, removed.quantity))?;
        }
        CartSubcommand::Clear => context.cart.clear().await.map_err(describe)?,
        CartSubcommand::Refresh => {
            context.cart.refresh().await.map_err(describe)?;
        }
    }

    let cart = context.cart.snapshot();

    if cart.is_empty() {
        return out.line("the cart is empty");
    }

    out.line(cart_table(&cart, out.currency()))
}

async fn add(
    context: &AppContext,
    args: AddArgs,
    out: &mut Output<impl io::Write>,
) -> Result<(), String> {
    let product = context
        .catalog
        .product(args.line.product.clone())
        .await
        .map_err(|error| {
            format!(
                "failed to load product {}: {}",
                args.line.product,
                report(&error)
            )
        })?;

    if !product.has_stock_for(args.quantity) {
        return Err(format!(
            "only {} of {} in stock",
            product.quantity, product.name
        ));
    }

    if !product.offers_size(args.line.size.as_deref())
        || !product.offers_color(args.line.color.as_deref())
    {
        return Err(format!("{} is not offered in that variant", product.name));
    }

    let line = CartLine::for_product(&product, args.quantity, args.line.size, args.line.color)
        .map_err(|error| format!("cannot price {}: {error}", product.name))?;

    let quantity = context.cart.add_line(line).await.map_err(describe)?;

    out.line(format!("{} x{quantity} in cart", product.name))
}

/// Cart failures, with the next step where there is one.
fn describe(error: StoreError) -> String {
    match error {
        StoreError::SessionExpired => {
            "session expired and the cart was cleared; sign in again".to_string()
        }
        StoreError::SyncFailed(source) => {
            format!(
                "cart changed locally but the server did not confirm it: {}",
                report(&source)
            )
        }
        error => format!("cart operation failed: {}", report(&error)),
    }
}
