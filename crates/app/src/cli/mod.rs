use std::{error::Error, io};

use clap::Subcommand;
use storefront_app::AppContext;

pub(crate) use render::Output;

mod cart;
mod catalog;
mod checkout;
mod orders;
mod render;
mod session;

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// List products, optionally narrowed to a category
    Products(catalog::ProductsArgs),

    /// Show the category tree
    Categories,

    /// Inspect or change the cart
    Cart(cart::CartCommand),

    /// Sign in and hand the guest cart to the server
    Signin(session::SignInArgs),

    /// Create an account and sign into it
    Signup(session::SignUpArgs),

    /// Sign out and forget the cart
    Signout,

    /// Verify stock and open a payment
    Checkout,

    /// Settle the cart after the payment provider redirects back
    CheckoutReturn(checkout::ReturnArgs),

    /// List orders
    Orders,
}

impl Command {
    pub(crate) async fn run(
        self,
        context: &AppContext,
        out: &mut Output<impl io::Write>,
    ) -> Result<(), String> {
        match self {
            Self::Products(args) => catalog::products(context, &args, out).await,
            Self::Categories => catalog::categories(context, out).await,
            Self::Cart(command) => cart::run(context, command, out).await,
            Self::Signin(args) => session::sign_in(context, args, out).await,
            Self::Signup(args) => session::sign_up(context, args, out).await,
            Self::Signout => session::sign_out(context, out).await,
            Self::Checkout => checkout::checkout(context, out).await,
            Self::CheckoutReturn(args) => checkout::complete(context, &args, out).await,
            Self::Orders => orders::list(context, out).await,
        }
    }
}

/// An error followed by each of its sources.
pub(crate) fn report(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}
