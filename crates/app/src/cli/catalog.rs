use std::io;

use clap::Args;
use storefront::catalog::CategorySelection;
use storefront_app::AppContext;

use super::{
    Output,
    render::{categories_table, products_table},
};

#[derive(Debug, Args)]
pub(crate) struct ProductsArgs {
    /// Category id, or `all`
    #[arg(long, default_value = "all")]
    category: CategorySelection,
}

pub(crate) async fn products(
    context: &AppContext,
    args: &ProductsArgs,
    out: &mut Output<impl io::Write>,
) -> Result<(), String> {
    context
        .catalog
        .load_products()
        .await
        .map_err(|error| format!("failed to load products: {error}"))?;

    if args.category != CategorySelection::All {
        context
            .catalog
            .load_categories()
            .await
            .map_err(|error| format!("failed to load categories: {error}"))?;
    }

    let products = context.catalog.visible_products(&args.category);

    if products.is_empty() {
        return out.line(format!("no products in {}", args.category));
    }

    out.line(products_table(&products, out.currency()))
}

pub(crate) async fn categories(
    context: &AppContext,
    out: &mut Output<impl io::Write>,
) -> Result<(), String> {
    let tree = context
        .catalog
        .load_categories()
        .await
        .map_err(|error| format!("failed to load categories: {error}"))?;

    if tree.is_empty() {
        return out.line("no categories found");
    }

    out.line(categories_table(&tree))
}
