//! Products and categories.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;
use serde::Deserialize;
use storefront::{
    catalog::{Category, Product},
    ids::{CategoryId, ProductId},
    session::BearerToken,
};

use super::{
    GatewayError, HttpGateway, MultipartPayload,
    client::Access,
    routes::{CATEGORIES, PRODUCTS, category, product},
};

/// Catalog endpoints. Reads are public; writes need an admin credential.
#[automock]
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// Every product.
    async fn products(&self) -> Result<Vec<Product>, GatewayError>;

    /// A single product.
    async fn product(&self, id: ProductId) -> Result<Product, GatewayError>;

    /// Create a product, returning it when the gateway echoes it back.
    async fn create_product(
        &self,
        token: BearerToken,
        form: MultipartPayload,
    ) -> Result<Option<Product>, GatewayError>;

    /// Update a product, returning it when the gateway echoes it back.
    async fn update_product(
        &self,
        token: BearerToken,
        id: ProductId,
        form: MultipartPayload,
    ) -> Result<Option<Product>, GatewayError>;

    /// Delete a product.
    async fn delete_product(&self, token: BearerToken, id: ProductId) -> Result<(), GatewayError>;

    /// The category list, nested or flat.
    async fn categories(&self) -> Result<Vec<Category>, GatewayError>;

    /// Create a category.
    async fn create_category(
        &self,
        token: BearerToken,
        form: MultipartPayload,
    ) -> Result<(), GatewayError>;

    /// Update a category.
    async fn update_category(
        &self,
        token: BearerToken,
        id: CategoryId,
        form: MultipartPayload,
    ) -> Result<(), GatewayError>;

    /// Delete a category.
    async fn delete_category(&self, token: BearerToken, id: CategoryId)
    -> Result<(), GatewayError>;
}

#[derive(Debug, Deserialize)]
struct ProductsEnvelope {
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProductBody {
    Wrapped { product: Product },
    Bare(Product),
}

impl From<ProductBody> for Product {
    fn from(body: ProductBody) -> Self {
        match body {
            ProductBody::Wrapped { product } | ProductBody::Bare(product) => product,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedProductEnvelope {
    #[serde(default)]
    saved_product: Option<Product>,
}

#[derive(Debug, Deserialize)]
struct UpdatedProductEnvelope {
    #[serde(default)]
    product: Option<Product>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CategoriesBody {
    Wrapped {
        #[serde(rename = "categoryList")]
        category_list: Vec<Category>,
    },
    Bare(Vec<Category>),
}

impl From<CategoriesBody> for Vec<Category> {
    fn from(body: CategoriesBody) -> Self {
        match body {
            CategoriesBody::Wrapped { category_list } => category_list,
            CategoriesBody::Bare(categories) => categories,
        }
    }
}

#[async_trait]
impl CatalogGateway for HttpGateway {
    #[tracing::instrument(name = "gateway.catalog.products", skip_all, err)]
    async fn products(&self) -> Result<Vec<Product>, GatewayError> {
        let request = self.request(Method::GET, PRODUCTS, None);

        let envelope: ProductsEnvelope = self.send(request, Access::Public).await?;

        Ok(envelope.products)
    }

    #[tracing::instrument(name = "gateway.catalog.product", skip(self), fields(product = %id), err)]
    async fn product(&self, id: ProductId) -> Result<Product, GatewayError> {
        let request = self.request(Method::GET, &product(&id), None);

        let body: ProductBody = self.send(request, Access::Public).await?;

        Ok(body.into())
    }

    #[tracing::instrument(name = "gateway.catalog.create_product", skip_all, err)]
    async fn create_product(
        &self,
        token: BearerToken,
        form: MultipartPayload,
    ) -> Result<Option<Product>, GatewayError> {
        let request = self
            .request(Method::POST, PRODUCTS, Some(&token))
            .multipart(form.into_form()?);

        let envelope: SavedProductEnvelope = self.send(request, Access::Authenticated).await?;

        Ok(envelope.saved_product)
    }

    #[tracing::instrument(name = "gateway.catalog.update_product", skip(self, token, form), fields(product = %id), err)]
    async fn update_product(
        &self,
        token: BearerToken,
        id: ProductId,
        form: MultipartPayload,
    ) -> Result<Option<Product>, GatewayError> {
        let request = self
            .request(Method::PUT, &product(&id), Some(&token))
            .multipart(form.into_form()?);

        let envelope: UpdatedProductEnvelope = self.send(request, Access::Authenticated).await?;

        Ok(envelope.product)
    }

    #[tracing::instrument(name = "gateway.catalog.delete_product", skip(self, token), fields(product = %id), err)]
    async fn delete_product(&self, token: BearerToken, id: ProductId) -> Result<(), GatewayError> {
        let request = self.request(Method::DELETE, &product(&id), Some(&token));

        self.send_discarding(request, Access::Authenticated).await
    }

    #[tracing::instrument(name = "gateway.catalog.categories", skip_all, err)]
    async fn categories(&self) -> Result<Vec<Category>, GatewayError> {
        let request = self.request(Method::GET, CATEGORIES, None);

        let body: CategoriesBody = self.send(request, Access::Public).await?;

        Ok(body.into())
    }

    #[tracing::instrument(name = "gateway.catalog.create_category", skip_all, err)]
    async fn create_category(
        &self,
        token: BearerToken,
        form: MultipartPayload,
    ) -> Result<(), GatewayError> {
        let request = self
            .request(Method::POST, CATEGORIES, Some(&token))
            .multipart(form.into_form()?);

        self.send_discarding(request, Access::Authenticated).await
    }

    #[tracing::instrument(name = "gateway.catalog.update_category", skip(self, token, form), fields(category = %id), err)]
    async fn update_category(
        &self,
        token: BearerToken,
        id: CategoryId,
        form: MultipartPayload,
    ) -> Result<(), GatewayError> {
        let request = self
            .request(Method::PUT, &category(&id), Some(&token))
            .multipart(form.into_form()?);

        self.send_discarding(request, Access::Authenticated).await
    }

    #[tracing::instrument(name = "gateway.catalog.delete_category", skip(self, token), fields(category = %id), err)]
    async fn delete_category(
        &self,
        token: BearerToken,
        id: CategoryId,
    ) -> Result<(), GatewayError> {
        let request = self.request(Method::DELETE, &category(&id), Some(&token));

        self.send_discarding(request, Access::Authenticated).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn product_json() -> serde_json::Value {
        json!({ "_id": "p1", "name": "Linen shirt", "price": 40 })
    }

    #[test]
    fn product_body_accepts_wrapped_and_bare() -> TestResult {
        let wrapped: ProductBody = serde_json::from_value(json!({ "product": product_json() }))?;
        let bare: ProductBody = serde_json::from_value(product_json())?;

        assert_eq!(Product::from(wrapped), Product::from(bare));

        Ok(())
    }

    #[test]
    fn categories_body_accepts_wrapped_and_bare() -> TestResult {
        let category = json!({ "_id": "c1", "name": "Shirts", "children": [] });

        let wrapped: CategoriesBody =
            serde_json::from_value(json!({ "categoryList": [category.clone()] }))?;
        let bare: CategoriesBody = serde_json::from_value(json!([category]))?;

        assert_eq!(Vec::<Category>::from(wrapped), Vec::<Category>::from(bare));

        Ok(())
    }

    #[test]
    fn null_saved_product_is_none() -> TestResult {
        let envelope: SavedProductEnvelope =
            serde_json::from_value(json!({ "savedProduct": null }))?;

        assert!(envelope.saved_product.is_none());

        Ok(())
    }
}
