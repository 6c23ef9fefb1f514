use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use models::provider::ProviderStatus;
use models::status::StatusFlow;

use crate::cache::{EntityCache, EntityKind};
use crate::errors::ServiceError;
use crate::provider::repository::ProviderRepository;
use crate::status::{ensure_transition, parse_status};

/// Provider onboarding and lifecycle, with cached reads.
pub struct ProviderService<R: ProviderRepository> {
    repo: Arc<R>,
    cache: EntityCache,
}

impl<R: ProviderRepository> ProviderService<R> {
    pub fn new(repo: Arc<R>, cache: EntityCache) -> Self {
        Self { repo, cache }
    }

    /// New providers start pending until verified.
    #[instrument(skip(self), fields(name = %name))]
    pub async fn register(&self, name: &str, contact_email: &str) -> Result<models::provider::Model, ServiceError> {
        models::provider::validate_new(name, contact_email)?;
        let created = self.repo.insert(name, contact_email).await?;
        info!(provider_id = %created.id, "provider_registered");
        Ok(created)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<models::provider::Model>, ServiceError> {
        self.repo.find_by_id(id).await
    }

    /// Cached read; status changes invalidate the entry.
    pub async fn get_cached(&self, id: Uuid) -> Result<Option<models::provider::Model>, ServiceError> {
        self.cache
            .get_or_load(EntityKind::Provider, id, self.repo.find_by_id(id))
            .await
    }

    pub async fn list(&self) -> Result<Vec<models::provider::Model>, ServiceError> {
        self.repo.list().await
    }

    pub async fn verify(&self, id: Uuid) -> Result<models::provider::Model, ServiceError> {
        self.transition(id, ProviderStatus::Active, "provider_verified").await
    }

    pub async fn suspend(&self, id: Uuid) -> Result<models::provider::Model, ServiceError> {
        self.transition(id, ProviderStatus::Suspended, "provider_suspended").await
    }

    pub async fn reactivate(&self, id: Uuid) -> Result<models::provider::Model, ServiceError> {
        self.transition(id, ProviderStatus::Active, "provider_reactivated").await
    }

    async fn transition(
        &self,
        id: Uuid,
        to: ProviderStatus,
        log_event: &'static str,
    ) -> Result<models::provider::Model, ServiceError> {
        let found = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("provider"))?;
        let current: ProviderStatus = parse_status(&found.status)?;
        ensure_transition(current, to)?;
        let updated = self.repo.set_status(id, to.as_str()).await?;
        self.cache.invalidate(EntityKind::Provider, id).await;
        info!(provider_id = %id, status = to.as_str(), "{}", log_event);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::provider::repository::mock::MockProviderRepo;

    fn service() -> (ProviderService<MockProviderRepo>, Arc<MockProviderRepo>) {
        let repo = Arc::new(MockProviderRepo::default());
        let cache = EntityCache::new(Duration::from_secs(60), 100);
        (ProviderService::new(repo.clone(), cache), repo)
    }

    #[tokio::test]
    async fn register_starts_pending() {
        let (svc, _) = service();
        let created = svc.register("Acme Logistics", "ops@acme.test").await.unwrap();
        assert_eq!(created.status, "pending");
    }

    #[tokio::test]
    async fn lifecycle_pending_active_suspended_active() {
        let (svc, _) = service();
        let p = svc.register("Acme", "ops@acme.test").await.unwrap();

        assert_eq!(svc.verify(p.id).await.unwrap().status, "active");
        assert_eq!(svc.suspend(p.id).await.unwrap().status, "suspended");
        assert_eq!(svc.reactivate(p.id).await.unwrap().status, "active");
    }

    #[tokio::test]
    async fn suspending_a_pending_provider_is_illegal() {
        let (svc, _) = service();
        let p = svc.register("Acme", "ops@acme.test").await.unwrap();
        let err = svc.suspend(p.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn cached_read_reflects_status_changes() {
        let (svc, _) = service();
        let p = svc.register("Acme", "ops@acme.test").await.unwrap();

        assert_eq!(svc.get_cached(p.id).await.unwrap().unwrap().status, "pending");
        svc.verify(p.id).await.unwrap();
        assert_eq!(svc.get_cached(p.id).await.unwrap().unwrap().status, "active");
    }

    #[tokio::test]
    async fn register_rejects_bad_contact() {
        let (svc, _) = service();
        let err = svc.register("Acme", "not-an-email").await.unwrap_err();
        assert!(matches!(err, ServiceError::Model(_)));
    }
}
