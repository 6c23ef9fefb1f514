use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::events::{DomainEvent, EventBus, SegmentAction};
use crate::segment::repository::{CustomerSegmentRepository, NewSegment};

/// Marketing segments with a typed vocabulary and JSON criteria.
pub struct CustomerSegmentService<R: CustomerSegmentRepository> {
    repo: Arc<R>,
    bus: EventBus,
}

fn validate_criteria(criteria: &serde_json::Value) -> Result<(), ServiceError> {
    match criteria.as_object() {
        Some(map) if !map.is_empty() => Ok(()),
        _ => Err(ServiceError::Validation("criteria must be a non-empty JSON object".into())),
    }
}

impl<R: CustomerSegmentRepository> CustomerSegmentService<R> {
    pub fn new(repo: Arc<R>, bus: EventBus) -> Self {
        Self { repo, bus }
    }

    #[instrument(skip(self, input), fields(name = %input.name, segment_type = %input.segment_type))]
    pub async fn create(&self, input: NewSegment) -> Result<models::customer_segment::Model, ServiceError> {
        if input.name.trim().is_empty() {
            return Err(ServiceError::Validation("segment name required".into()));
        }
        models::customer_segment::validate_type(&input.segment_type)?;
        validate_criteria(&input.criteria)?;
        let created = self.repo.insert(&input).await?;
        info!(segment_id = %created.id, "segment_created");
        self.publish(SegmentAction::Created, created.clone());
        Ok(created)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<models::customer_segment::Model>, ServiceError> {
        self.repo.find_by_id(id).await
    }

    pub async fn list_active(&self) -> Result<Vec<models::customer_segment::Model>, ServiceError> {
        self.repo.list_active().await
    }

    #[instrument(skip(self, criteria))]
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        criteria: Option<&serde_json::Value>,
    ) -> Result<models::customer_segment::Model, ServiceError> {
        if let Some(name) = name {
            if name.trim().is_empty() {
                return Err(ServiceError::Validation("segment name required".into()));
            }
        }
        if let Some(criteria) = criteria {
            validate_criteria(criteria)?;
        }
        let updated = self.repo.update(id, name, criteria).await?;
        self.publish(SegmentAction::Updated, updated.clone());
        Ok(updated)
    }

    /// Activation is idempotent; the event fires only on an actual change.
    pub async fn activate(&self, id: Uuid) -> Result<models::customer_segment::Model, ServiceError> {
        self.flip_active(id, true, SegmentAction::Activated).await
    }

    pub async fn deactivate(&self, id: Uuid) -> Result<models::customer_segment::Model, ServiceError> {
        self.flip_active(id, false, SegmentAction::Deactivated).await
    }

    async fn flip_active(
        &self,
        id: Uuid,
        active: bool,
        action: SegmentAction,
    ) -> Result<models::customer_segment::Model, ServiceError> {
        let found = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("segment"))?;
        if found.active == active {
            return Ok(found);
        }
        let updated = self.repo.set_active(id, active).await?;
        self.publish(action, updated.clone());
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let found = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("segment"))?;
        self.repo.delete(id).await?;
        info!(segment_id = %id, "segment_deleted");
        self.publish(SegmentAction::Deleted, found);
        Ok(())
    }

    fn publish(&self, action: SegmentAction, segment: models::customer_segment::Model) {
        self.bus.publish(DomainEvent::CustomerSegment { action, segment });
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::segment::repository::mock::MockSegmentRepo;

    fn service() -> (CustomerSegmentService<MockSegmentRepo>, EventBus) {
        let bus = EventBus::new(32);
        (CustomerSegmentService::new(Arc::new(MockSegmentRepo::default()), bus.clone()), bus)
    }

    fn input() -> NewSegment {
        NewSegment {
            name: "High spenders".into(),
            segment_type: "behavioral".into(),
            criteria: json!({"min_total_cents": 100_000}),
        }
    }

    #[tokio::test]
    async fn create_validates_type_and_criteria() {
        let (svc, _) = service();

        let mut bad_type = input();
        bad_type.segment_type = "astrological".into();
        assert!(matches!(svc.create(bad_type).await.unwrap_err(), ServiceError::Model(_)));

        let mut empty_criteria = input();
        empty_criteria.criteria = json!({});
        assert!(matches!(
            svc.create(empty_criteria).await.unwrap_err(),
            ServiceError::Validation(_)
        ));

        let mut array_criteria = input();
        array_criteria.criteria = json!([1, 2]);
        assert!(matches!(
            svc.create(array_criteria).await.unwrap_err(),
            ServiceError::Validation(_)
        ));

        let created = svc.create(input()).await.unwrap();
        assert!(created.active);
    }

    #[tokio::test]
    async fn activation_events_fire_only_on_change() {
        let (svc, bus) = service();
        let mut rx = bus.subscribe();
        let segment = svc.create(input()).await.unwrap();
        assert_eq!(rx.try_recv().unwrap().kind(), "customer_segment.created");

        // Already active; no event.
        svc.activate(segment.id).await.unwrap();
        assert!(rx.try_recv().is_err());

        svc.deactivate(segment.id).await.unwrap();
        assert_eq!(rx.try_recv().unwrap().kind(), "customer_segment.deactivated");

        svc.activate(segment.id).await.unwrap();
        assert_eq!(rx.try_recv().unwrap().kind(), "customer_segment.activated");
    }

    #[tokio::test]
    async fn delete_publishes_the_removed_segment() {
        let (svc, bus) = service();
        let segment = svc.create(input()).await.unwrap();
        let mut rx = bus.subscribe();

        svc.delete(segment.id).await.unwrap();
        match rx.try_recv().unwrap() {
            DomainEvent::CustomerSegment { action: SegmentAction::Deleted, segment: gone } => {
                assert_eq!(gone.id, segment.id);
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert!(svc.get(segment.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deactivated_segments_leave_the_active_list() {
        let (svc, _) = service();
        let segment = svc.create(input()).await.unwrap();
        assert_eq!(svc.list_active().await.unwrap().len(), 1);
        svc.deactivate(segment.id).await.unwrap();
        assert!(svc.list_active().await.unwrap().is_empty());
    }
}
