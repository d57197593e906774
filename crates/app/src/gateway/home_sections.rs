//! Home page sections.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;
use serde::Deserialize;
use storefront::{home_sections::HomeSection, ids::HomeSectionId, session::BearerToken};

use super::{
    GatewayError, HttpGateway, MultipartPayload,
    client::Access,
    routes::{HOME_SECTION_CREATE, HOME_SECTIONS, home_section_delete, home_section_update},
};

/// Home section endpoints. Listing is public; writes need an admin credential.
#[automock]
#[async_trait]
pub trait HomeSectionsGateway: Send + Sync {
    /// Every section.
    async fn home_sections(&self) -> Result<Vec<HomeSection>, GatewayError>;

    /// Create a section.
    async fn create_home_section(
        &self,
        token: BearerToken,
        form: MultipartPayload,
    ) -> Result<HomeSection, GatewayError>;

    /// Update a section.
    async fn update_home_section(
        &self,
        token: BearerToken,
        id: HomeSectionId,
        form: MultipartPayload,
    ) -> Result<HomeSection, GatewayError>;

    /// Delete a section, returning the id the gateway reports as deleted.
    async fn delete_home_section(
        &self,
        token: BearerToken,
        id: HomeSectionId,
    ) -> Result<HomeSectionId, GatewayError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HomeSectionsEnvelope {
    #[serde(default)]
    home_sections: Vec<HomeSection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedEnvelope {
    home_section: HomeSection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatedEnvelope {
    updated_home_section: HomeSection,
}

#[derive(Debug, Deserialize)]
struct DeletedEnvelope {
    #[serde(default)]
    id: Option<HomeSectionId>,
}

#[async_trait]
impl HomeSectionsGateway for HttpGateway {
    #[tracing::instrument(name = "gateway.home_sections.list", skip_all, err)]
    async fn home_sections(&self) -> Result<Vec<HomeSection>, GatewayError> {
        let request = self.request(Method::GET, HOME_SECTIONS, None);

        let envelope: HomeSectionsEnvelope = self.send(request, Access::Public).await?;

        Ok(envelope.home_sections)
    }

    #[tracing::instrument(name = "gateway.home_sections.create", skip_all, err)]
    async fn create_home_section(
        &self,
        token: BearerToken,
        form: MultipartPayload,
    ) -> Result<HomeSection, GatewayError> {
        let request = self
            .request(Method::POST, HOME_SECTION_CREATE, Some(&token))
            .multipart(form.into_form()?);

        let envelope: CreatedEnvelope = self.send(request, Access::Authenticated).await?;

        Ok(envelope.home_section)
    }

    #[tracing::instrument(name = "gateway.home_sections.update", skip(self, token, form), fields(section = %id), err)]
    async fn update_home_section(
        &self,
        token: BearerToken,
        id: HomeSectionId,
        form: MultipartPayload,
    ) -> Result<HomeSection, GatewayError> {
        let request = self
            .request(Method::PUT, &home_section_update(&id), Some(&token))
            .multipart(form.into_form()?);

        let envelope: UpdatedEnvelope = self.send(request, Access::Authenticated).await?;

        Ok(envelope.updated_home_section)
    }

    #[tracing::instrument(name = "gateway.home_sections.delete", skip(self, token), fields(section = %id), err)]
    async fn delete_home_section(
        &self,
        token: BearerToken,
        id: HomeSectionId,
    ) -> Result<HomeSectionId, GatewayError> {
        let request = self.request(Method::DELETE, &home_section_delete(&id), Some(&token));

        let envelope: DeletedEnvelope = self.send(request, Access::Authenticated).await?;

        Ok(envelope.id.unwrap_or(id))
    }
}
