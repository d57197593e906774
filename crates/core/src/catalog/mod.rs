//! Catalog
//!
//! Products and the two-level category tree they are filed under.

pub mod category;
pub mod filter;
pub mod product;

pub use category::{Category, CategoryTree};
pub use filter::{CategorySelection, filter_products};
pub use product::{CategoryRef, Product, ProductImage};
