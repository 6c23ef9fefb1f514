use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument};
use uuid::Uuid;

use models::status::StatusFlow;
use models::user_subscription::SubscriptionStatus;

use crate::errors::ServiceError;
use crate::status::{ensure_transition, parse_status};
use crate::subscription::repository::SubscriptionRepository;

/// Subscription lifecycle: active/paused with cancellation, expiry and
/// renewal back from expired.
pub struct SubscriptionService<R: SubscriptionRepository> {
    repo: Arc<R>,
}

impl<R: SubscriptionRepository> SubscriptionService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self), fields(customer_id = %customer_id, plan = %plan))]
    pub async fn start(
        &self,
        customer_id: Uuid,
        plan: &str,
        ends_at: Option<DateTime<Utc>>,
    ) -> Result<models::user_subscription::Model, ServiceError> {
        models::user_subscription::validate_plan(plan)?;
        if let Some(ends_at) = ends_at {
            if ends_at <= Utc::now() {
                return Err(ServiceError::Validation("end of term must be in the future".into()));
            }
        }
        let created = self.repo.insert(customer_id, plan, ends_at).await?;
        info!(subscription_id = %created.id, "subscription_started");
        Ok(created)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<models::user_subscription::Model>, ServiceError> {
        self.repo.find_by_id(id).await
    }

    pub async fn list_for_customer(&self, customer_id: Uuid) -> Result<Vec<models::user_subscription::Model>, ServiceError> {
        self.repo.list_by_customer(customer_id).await
    }

    pub async fn pause(&self, id: Uuid) -> Result<models::user_subscription::Model, ServiceError> {
        self.transition(id, SubscriptionStatus::Paused).await
    }

    pub async fn resume(&self, id: Uuid) -> Result<models::user_subscription::Model, ServiceError> {
        self.transition(id, SubscriptionStatus::Active).await
    }

    pub async fn cancel(&self, id: Uuid) -> Result<models::user_subscription::Model, ServiceError> {
        self.transition(id, SubscriptionStatus::Cancelled).await
    }

    pub async fn expire(&self, id: Uuid) -> Result<models::user_subscription::Model, ServiceError> {
        self.transition(id, SubscriptionStatus::Expired).await
    }

    /// Extend the term. Active subscriptions keep running; expired ones are
    /// revived. Anything else must be resumed or restarted instead.
    #[instrument(skip(self))]
    pub async fn renew(
        &self,
        id: Uuid,
        new_ends_at: Option<DateTime<Utc>>,
    ) -> Result<models::user_subscription::Model, ServiceError> {
        if let Some(ends_at) = new_ends_at {
            if ends_at <= Utc::now() {
                return Err(ServiceError::Validation("end of term must be in the future".into()));
            }
        }
        let found = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("subscription"))?;
        let current: SubscriptionStatus = parse_status(&found.status)?;
        match current {
            SubscriptionStatus::Active => {}
            SubscriptionStatus::Expired => {
                ensure_transition(SubscriptionStatus::Expired, SubscriptionStatus::Active)?;
            }
            _ => {
                return Err(ServiceError::Validation(
                    "only active or expired subscriptions can be renewed".into(),
                ));
            }
        }
        let updated = self
            .repo
            .set_status_and_term(id, SubscriptionStatus::Active.as_str(), new_ends_at)
            .await?;
        info!(subscription_id = %id, "subscription_renewed");
        Ok(updated)
    }

    async fn transition(&self, id: Uuid, to: SubscriptionStatus) -> Result<models::user_subscription::Model, ServiceError> {
        let found = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("subscription"))?;
        let current: SubscriptionStatus = parse_status(&found.status)?;
        ensure_transition(current, to)?;
        let updated = self.repo.set_status(id, to.as_str()).await?;
        info!(subscription_id = %id, status = to.as_str(), "subscription_status_changed");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::subscription::repository::mock::MockSubscriptionRepo;

    fn service() -> SubscriptionService<MockSubscriptionRepo> {
        SubscriptionService::new(Arc::new(MockSubscriptionRepo::default()))
    }

    #[tokio::test]
    async fn start_rejects_past_term_end() {
        let svc = service();
        let err = svc
            .start(Uuid::new_v4(), "premium", Some(Utc::now() - Duration::days(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn pause_and_resume_round_trip() {
        let svc = service();
        let sub = svc.start(Uuid::new_v4(), "premium", None).await.unwrap();
        assert_eq!(svc.pause(sub.id).await.unwrap().status, "paused");
        assert_eq!(svc.resume(sub.id).await.unwrap().status, "active");
    }

    #[tokio::test]
    async fn cancelled_subscription_is_terminal() {
        let svc = service();
        let sub = svc.start(Uuid::new_v4(), "premium", None).await.unwrap();
        svc.cancel(sub.id).await.unwrap();

        assert!(matches!(
            svc.resume(sub.id).await.unwrap_err(),
            ServiceError::InvalidTransition { .. }
        ));
        assert!(matches!(
            svc.renew(sub.id, None).await.unwrap_err(),
            ServiceError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn renew_revives_an_expired_subscription() {
        let svc = service();
        let sub = svc.start(Uuid::new_v4(), "premium", None).await.unwrap();
        svc.expire(sub.id).await.unwrap();

        let ends = Utc::now() + Duration::days(30);
        let renewed = svc.renew(sub.id, Some(ends)).await.unwrap();
        assert_eq!(renewed.status, "active");
        assert!(renewed.ends_at.is_some());
    }

    #[tokio::test]
    async fn renew_extends_an_active_subscription() {
        let svc = service();
        let sub = svc
            .start(Uuid::new_v4(), "premium", Some(Utc::now() + Duration::days(7)))
            .await
            .unwrap();
        let renewed = svc.renew(sub.id, Some(Utc::now() + Duration::days(37))).await.unwrap();
        assert_eq!(renewed.status, "active");
    }

    #[tokio::test]
    async fn paused_subscription_cannot_be_renewed() {
        let svc = service();
        let sub = svc.start(Uuid::new_v4(), "premium", None).await.unwrap();
        svc.pause(sub.id).await.unwrap();
        let err = svc.renew(sub.id, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
