//! Home sections service
//!
//! The local list is always sorted by section order.

use std::{
    fmt,
    sync::{Arc, Mutex},
};

use storefront::{
    home_sections::{HomeSection, sort_by_order},
    ids::HomeSectionId,
};
use tracing::debug;

use crate::{
    errors::StoreError,
    gateway::{HomeSectionsGateway, MultipartPayload},
    session::SessionGate,
    state::lock,
};

/// Editorial sections shown on the home page.
#[derive(Clone)]
pub struct HomeSectionsService {
    gate: SessionGate,
    gateway: Arc<dyn HomeSectionsGateway>,
    sections: Arc<Mutex<Vec<HomeSection>>>,
}

impl HomeSectionsService {
    /// Service with no sections loaded.
    pub fn new(gate: SessionGate, gateway: Arc<dyn HomeSectionsGateway>) -> Self {
        Self {
            gate,
            gateway,
            sections: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Sections fetched so far, in display order.
    pub fn sections(&self) -> Vec<HomeSection> {
        lock(&self.sections).clone()
    }

    /// Fetch every section.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Gateway`] if the list could not be fetched.
    #[tracing::instrument(name = "home_sections.service.load", skip(self), err)]
    pub async fn load(&self) -> Result<Vec<HomeSection>, StoreError> {
        let mut sections = self.gateway.home_sections().await?;
        sort_by_order(&mut sections);

        debug!(sections = sections.len(), "loaded home sections");

        *lock(&self.sections) = sections.clone();

        Ok(sections)
    }

    /// Create a section and insert it at its position.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotSignedIn`]: no credential is held.
    /// - [`StoreError::SessionExpired`]: the credential was refused.
    /// - [`StoreError::Gateway`]: any other failure.
    #[tracing::instrument(name = "home_sections.service.create", skip_all, err)]
    pub async fn create(&self, form: MultipartPayload) -> Result<HomeSection, StoreError> {
        let token = self.gate.token()?;
        let created = self
            .gate
            .check(self.gateway.create_home_section(token, form).await)
            .await?;

        let mut sections = lock(&self.sections);
        sections.push(created.clone());
        sort_by_order(&mut sections);

        Ok(created)
    }

    /// Update a section and replace the local copy.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`]: no section has this id; nothing changed.
    /// - Otherwise as [`HomeSectionsService::create`].
    #[tracing::instrument(name = "home_sections.service.update", skip(self, form), fields(section = %id), err)]
    pub async fn update(
        &self,
        id: HomeSectionId,
        form: MultipartPayload,
    ) -> Result<HomeSection, StoreError> {
        let token = self.gate.token()?;
        let updated = self
            .gate
            .check(self.gateway.update_home_section(token, id, form).await)
            .await?;

        let mut sections = lock(&self.sections);

        if let Some(existing) = sections.iter_mut().find(|s| s.id == updated.id) {
            *existing = updated.clone();
        }

        sort_by_order(&mut sections);

        Ok(updated)
    }

    /// Delete a section and drop it from the local list.
    ///
    /// # Errors
    ///
    /// As [`HomeSectionsService::update`].
    #[tracing::instrument(name = "home_sections.service.delete", skip(self), fields(section = %id), err)]
    pub async fn delete(&self, id: HomeSectionId) -> Result<HomeSectionId, StoreError> {
        let token = self.gate.token()?;
        let deleted = self
            .gate
            .check(self.gateway.delete_home_section(token, id).await)
            .await?;

        lock(&self.sections).retain(|section| section.id != deleted);

        Ok(deleted)
    }
}

impl fmt::Debug for HomeSectionsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HomeSectionsService")
            .field("sections", &lock(&self.sections).len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{gateway::MockHomeSectionsGateway, storage::MemoryStore, test::signed_in_state};

    use super::*;

    fn section(id: &str, order: Option<i64>) -> HomeSection {
        HomeSection {
            id: id.into(),
            title: Some(format!("Section {id}")),
            paragraphs: Vec::new(),
            image: None,
            order,
        }
    }

    fn ids(sections: &[HomeSection]) -> Vec<&str> {
        sections.iter().map(|section| section.id.as_str()).collect()
    }

    fn service(gateway: MockHomeSectionsGateway) -> TestResult<HomeSectionsService> {
        let state = signed_in_state(Arc::new(MemoryStore::new()))?;

        Ok(HomeSectionsService::new(SessionGate::new(state), Arc::new(gateway)))
    }

    #[tokio::test]
    async fn created_section_lands_at_its_position() -> TestResult {
        let mut gateway = MockHomeSectionsGateway::new();
        gateway.expect_home_sections().once().return_once(|| {
            Ok(vec![section("c", Some(3)), section("a", Some(1))])
        });
        gateway
            .expect_create_home_section()
            .once()
            .return_once(|_, _| Ok(section("b", Some(2))));

        let service = service(gateway)?;

        assert_eq!(ids(&service.load().await?), vec!["a", "c"]);

        service.create(MultipartPayload::new()).await?;

        assert_eq!(ids(&service.sections()), vec!["a", "b", "c"]);

        Ok(())
    }

    #[tokio::test]
    async fn unordered_section_sorts_first() -> TestResult {
        let mut gateway = MockHomeSectionsGateway::new();
        gateway
            .expect_home_sections()
            .once()
            .return_once(|| Ok(vec![section("a", Some(1)), section("z", None)]));

        let service = service(gateway)?;

        assert_eq!(ids(&service.load().await?), vec!["z", "a"]);

        Ok(())
    }

    #[tokio::test]
    async fn update_and_delete_touch_only_their_section() -> TestResult {
        let mut gateway = MockHomeSectionsGateway::new();
        gateway
            .expect_home_sections()
            .once()
            .return_once(|| Ok(vec![section("a", Some(1)), section("b", Some(2))]));
        gateway
            .expect_update_home_section()
            .once()
            .withf(|_, id, _| id.as_str() == "a")
            .return_once(|_, _, _| Ok(section("a", Some(5))));
        gateway
            .expect_delete_home_section()
            .once()
            .return_once(|_, id| Ok(id));

        let service = service(gateway)?;
        service.load().await?;

        service.update("a".into(), MultipartPayload::new()).await?;

        assert_eq!(ids(&service.sections()), vec!["b", "a"]);

        let deleted = service.delete("b".into()).await?;

        assert_eq!(deleted.as_str(), "b");
        assert_eq!(ids(&service.sections()), vec!["a"]);

        Ok(())
    }
}
