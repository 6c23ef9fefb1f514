use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::events::{DomainEvent, EventBus, LocationAction};
use crate::provider_location::repository::{NewLocation, ProviderLocationRepository};

/// Provider locations: at most one primary per provider.
pub struct ProviderLocationService<R: ProviderLocationRepository> {
    repo: Arc<R>,
    bus: EventBus,
}

impl<R: ProviderLocationRepository> ProviderLocationService<R> {
    pub fn new(repo: Arc<R>, bus: EventBus) -> Self {
        Self { repo, bus }
    }

    #[instrument(skip(self, input), fields(provider_id = %input.provider_id))]
    pub async fn create(&self, input: NewLocation) -> Result<models::provider_location::Model, ServiceError> {
        models::provider_location::validate_new(&input.label, &input.city, &input.country)?;
        if input.is_primary && self.repo.primary_exists(input.provider_id, None).await? {
            return Err(ServiceError::Conflict("provider already has a primary location".into()));
        }
        let created = self.repo.insert(&input).await?;
        info!(location_id = %created.id, "provider_location_created");
        self.bus.publish(DomainEvent::ProviderLocation {
            action: LocationAction::Created,
            location: created.clone(),
        });
        Ok(created)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<models::provider_location::Model>, ServiceError> {
        self.repo.find_by_id(id).await
    }

    pub async fn list_for_provider(&self, provider_id: Uuid) -> Result<Vec<models::provider_location::Model>, ServiceError> {
        self.repo.list_by_provider(provider_id).await
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: Uuid,
        label: Option<&str>,
        city: Option<&str>,
        country: Option<&str>,
        is_primary: Option<bool>,
    ) -> Result<models::provider_location::Model, ServiceError> {
        let found = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("provider location"))?;
        if is_primary == Some(true)
            && self.repo.primary_exists(found.provider_id, Some(id)).await?
        {
            return Err(ServiceError::Conflict("provider already has a primary location".into()));
        }
        let updated = self.repo.update(id, label, city, country, is_primary).await?;
        self.bus.publish(DomainEvent::ProviderLocation {
            action: LocationAction::Updated,
            location: updated.clone(),
        });
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let found = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("provider location"))?;
        self.repo.delete(id).await?;
        info!(location_id = %id, "provider_location_deleted");
        self.bus.publish(DomainEvent::ProviderLocation {
            action: LocationAction::Deleted,
            location: found,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider_location::repository::mock::MockLocationRepo;

    fn service() -> (ProviderLocationService<MockLocationRepo>, EventBus) {
        let bus = EventBus::new(16);
        (ProviderLocationService::new(Arc::new(MockLocationRepo::default()), bus.clone()), bus)
    }

    fn input(provider_id: Uuid, is_primary: bool) -> NewLocation {
        NewLocation {
            provider_id,
            label: "Main warehouse".into(),
            city: "Rotterdam".into(),
            country: "NL".into(),
            is_primary,
        }
    }

    #[tokio::test]
    async fn second_primary_conflicts() {
        let (svc, _) = service();
        let provider = Uuid::new_v4();
        svc.create(input(provider, true)).await.unwrap();
        let err = svc.create(input(provider, true)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        // Non-primary additions are fine.
        svc.create(input(provider, false)).await.unwrap();
    }

    #[tokio::test]
    async fn promoting_a_second_primary_conflicts() {
        let (svc, _) = service();
        let provider = Uuid::new_v4();
        svc.create(input(provider, true)).await.unwrap();
        let secondary = svc.create(input(provider, false)).await.unwrap();

        let err = svc
            .update(secondary.id, None, None, None, Some(true))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn re_saving_the_primary_itself_is_allowed() {
        let (svc, _) = service();
        let provider = Uuid::new_v4();
        let primary = svc.create(input(provider, true)).await.unwrap();

        let updated = svc
            .update(primary.id, Some("HQ"), None, None, Some(true))
            .await
            .unwrap();
        assert_eq!(updated.label, "HQ");
        assert!(updated.is_primary);
    }

    #[tokio::test]
    async fn lifecycle_publishes_events() {
        let (svc, bus) = service();
        let mut rx = bus.subscribe();
        let provider = Uuid::new_v4();

        let created = svc.create(input(provider, false)).await.unwrap();
        svc.update(created.id, Some("Dock 3"), None, None, None).await.unwrap();
        svc.delete(created.id).await.unwrap();

        let kinds: Vec<_> = (0..3).map(|_| rx.try_recv().unwrap().kind()).collect();
        assert_eq!(
            kinds,
            [
                "provider_location.created",
                "provider_location.updated",
                "provider_location.deleted"
            ]
        );
    }

    #[tokio::test]
    async fn blank_label_is_rejected() {
        let (svc, _) = service();
        let mut bad = input(Uuid::new_v4(), false);
        bad.label = " ".into();
        let err = svc.create(bad).await.unwrap_err();
        assert!(matches!(err, ServiceError::Model(_)));
    }
}
