//! Category filtering of the product list.

use std::{borrow::Cow, convert::Infallible, fmt, str::FromStr};

use crate::{
    catalog::{CategoryTree, Product},
    ids::CategoryId,
};

/// Which slice of the catalog to show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategorySelection {
    /// Every product.
    #[default]
    All,

    /// Products in the category or one of its direct children.
    Category(CategoryId),
}

impl FromStr for CategorySelection {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            Ok(Self::Category(CategoryId::new(value)))
        }
    }
}

impl fmt::Display for CategorySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Category(id) => write!(f, "{id}"),
        }
    }
}

/// Products visible under `selection`.
///
/// `All` hands back the input slice itself. A category selection keeps the
/// products whose category is the selected one or one of its direct children,
/// in their original order; products without a usable category never match.
pub fn filter_products<'a>(
    products: &'a [Product],
    categories: &CategoryTree,
    selection: &CategorySelection,
) -> Cow<'a, [Product]> {
    let CategorySelection::Category(selected) = selection else {
        return Cow::Borrowed(products);
    };

    let allowed = categories.selection_ids(selected);

    Cow::Owned(
        products
            .iter()
            .filter(|product| product.category_id().is_some_and(|id| allowed.contains(id)))
            .cloned()
            .collect(),
    )
}
