//! Catalog service
//!
//! Keeps the last product list and category tree fetched from the gateway.
//! Product writes apply the gateway's echo locally; category writes refetch
//! the whole tree.

use std::{
    fmt,
    sync::{Arc, Mutex},
};

use storefront::{
    catalog::{Category, CategorySelection, CategoryTree, Product, filter_products},
    ids::{CategoryId, ProductId},
};
use tracing::debug;

use crate::{
    errors::StoreError,
    gateway::{CatalogGateway, MultipartPayload},
    session::SessionGate,
    state::lock,
};

/// Product and category browsing plus back-office writes.
#[derive(Clone)]
pub struct CatalogService {
    gate: SessionGate,
    gateway: Arc<dyn CatalogGateway>,
    products: Arc<Mutex<Vec<Product>>>,
    categories: Arc<Mutex<CategoryTree>>,
}

impl CatalogService {
    /// Service with an empty catalog.
    pub fn new(gate: SessionGate, gateway: Arc<dyn CatalogGateway>) -> Self {
        Self {
            gate,
            gateway,
            products: Arc::new(Mutex::new(Vec::new())),
            categories: Arc::new(Mutex::new(CategoryTree::default())),
        }
    }

    /// Products fetched so far.
    pub fn products(&self) -> Vec<Product> {
        lock(&self.products).clone()
    }

    /// Category tree fetched so far.
    pub fn categories(&self) -> CategoryTree {
        lock(&self.categories).clone()
    }

    /// Products in `selection`, in list order.
    pub fn visible_products(&self, selection: &CategorySelection) -> Vec<Product> {
        let products = lock(&self.products);
        let categories = lock(&self.categories);

        filter_products(&products, &categories, selection).into_owned()
    }

    /// Fetch every product, replacing the local list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Gateway`] if the list could not be fetched.
    #[tracing::instrument(name = "catalog.service.load_products", skip(self), err)]
    pub async fn load_products(&self) -> Result<Vec<Product>, StoreError> {
        let products = self.gateway.products().await?;

        debug!(products = products.len(), "loaded products");

        *lock(&self.products) = products.clone();

        Ok(products)
    }

    /// Fetch a single product.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`]: no product has this id.
    /// - [`StoreError::Gateway`]: any other failure.
    #[tracing::instrument(name = "catalog.service.product", skip(self), fields(product = %id), err)]
    pub async fn product(&self, id: ProductId) -> Result<Product, StoreError> {
        Ok(self.gateway.product(id).await?)
    }

    /// Fetch the category tree, replacing the local one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Gateway`] if the list could not be fetched.
    #[tracing::instrument(name = "catalog.service.load_categories", skip(self), err)]
    pub async fn load_categories(&self) -> Result<CategoryTree, StoreError> {
        let categories: Vec<Category> = self.gateway.categories().await?;
        let tree = CategoryTree::from_categories(categories);

        debug!(categories = tree.len(), "loaded categories");

        *lock(&self.categories) = tree.clone();

        Ok(tree)
    }

    /// Create a product and append the saved copy to the local list.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotSignedIn`]: no credential is held.
    /// - [`StoreError::SessionExpired`]: the credential was refused.
    /// - [`StoreError::Gateway`]: any other failure.
    #[tracing::instrument(name = "catalog.service.create_product", skip_all, err)]
    pub async fn create_product(
        &self,
        form: MultipartPayload,
    ) -> Result<Option<Product>, StoreError> {
        let token = self.gate.token()?;
        let saved = self
            .gate
            .check(self.gateway.create_product(token, form).await)
            .await?;

        if let Some(product) = &saved {
            lock(&self.products).push(product.clone());
        }

        Ok(saved)
    }

    /// Update a product and replace the local copy with the gateway's.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`]: no product has this id; nothing changed.
    /// - Otherwise as [`CatalogService::create_product`].
    #[tracing::instrument(name = "catalog.service.update_product", skip(self, form), fields(product = %id), err)]
    pub async fn update_product(
        &self,
        id: ProductId,
        form: MultipartPayload,
    ) -> Result<Option<Product>, StoreError> {
        let token = self.gate.token()?;
        let updated = self
            .gate
            .check(self.gateway.update_product(token, id, form).await)
            .await?;

        if let Some(product) = &updated {
            let mut products = lock(&self.products);

            if let Some(existing) = products.iter_mut().find(|p| p.id == product.id) {
                *existing = product.clone();
            }
        }

        Ok(updated)
    }

    /// Delete a product and drop it from the local list.
    ///
    /// # Errors
    ///
    /// As [`CatalogService::update_product`].
    #[tracing::instrument(name = "catalog.service.delete_product", skip(self), fields(product = %id), err)]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        let token = self.gate.token()?;

        self.gate
            .check(self.gateway.delete_product(token, id.clone()).await)
            .await?;

        lock(&self.products).retain(|product| product.id != id);

        Ok(())
    }

    /// Create a category, then refetch the tree.
    ///
    /// # Errors
    ///
    /// As [`CatalogService::create_product`].
    #[tracing::instrument(name = "catalog.service.create_category", skip_all, err)]
    pub async fn create_category(&self, form: MultipartPayload) -> Result<CategoryTree, StoreError> {
        let token = self.gate.token()?;

        self.gate
            .check(self.gateway.create_category(token, form).await)
            .await?;

        self.load_categories().await
    }

    /// Update a category, then refetch the tree.
    ///
    /// # Errors
    ///
    /// As [`CatalogService::update_product`].
    #[tracing::instrument(name = "catalog.service.update_category", skip(self, form), fields(category = %id), err)]
    pub async fn update_category(
        &self,
        id: CategoryId,
        form: MultipartPayload,
    ) -> Result<CategoryTree, StoreError> {
        let token = self.gate.token()?;

        self.gate
            .check(self.gateway.update_category(token, id, form).await)
            .await?;

        self.load_categories().await
    }

    /// Delete a category, then refetch the tree.
    ///
    /// # Errors
    ///
    /// As [`CatalogService::update_product`].
    #[tracing::instrument(name = "catalog.service.delete_category", skip(self), fields(category = %id), err)]
    pub async fn delete_category(&self, id: CategoryId) -> Result<CategoryTree, StoreError> {
        let token = self.gate.token()?;

        self.gate
            .check(self.gateway.delete_category(token, id).await)
            .await?;

        self.load_categories().await
    }
}

impl fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogService")
            .field("products", &lock(&self.products).len())
            .field("categories", &lock(&self.categories).len())
            .finish_non_exhaustive()
    }
}
