use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use models::provider_payment::PaymentStatus;
use models::status::StatusFlow;

use crate::errors::ServiceError;
use crate::events::{DomainEvent, EventBus, PaymentAction};
use crate::provider_payment::repository::ProviderPaymentRepository;
use crate::status::{ensure_transition, parse_status};

/// Provider payout pipeline: pending -> processed -> completed -> reconciled,
/// with failure possible until completion. Every step is announced on the bus.
pub struct ProviderPaymentService<R: ProviderPaymentRepository> {
    repo: Arc<R>,
    bus: EventBus,
}

impl<R: ProviderPaymentRepository> ProviderPaymentService<R> {
    pub fn new(repo: Arc<R>, bus: EventBus) -> Self {
        Self { repo, bus }
    }

    /// # Examples
    /// ```
    /// use service::events::EventBus;
    /// use service::provider_payment::{ProviderPaymentService, mock::MockPaymentRepo};
    /// use std::sync::Arc;
    /// let svc = ProviderPaymentService::new(Arc::new(MockPaymentRepo::default()), EventBus::new(8));
    /// let payment = tokio_test::block_on(svc.create(uuid::Uuid::new_v4(), 10_000, "USD")).unwrap();
    /// assert_eq!(payment.status, "pending");
    /// ```
    #[instrument(skip(self), fields(provider_id = %provider_id))]
    pub async fn create(
        &self,
        provider_id: Uuid,
        amount_cents: i64,
        currency: &str,
    ) -> Result<models::provider_payment::Model, ServiceError> {
        models::provider_payment::validate_new(amount_cents, currency)?;
        let created = self.repo.insert(provider_id, amount_cents, currency).await?;
        info!(payment_id = %created.id, amount_cents, "payment_created");
        self.publish(PaymentAction::Created, created.clone());
        Ok(created)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<models::provider_payment::Model>, ServiceError> {
        self.repo.find_by_id(id).await
    }

    pub async fn list_for_provider(&self, provider_id: Uuid) -> Result<Vec<models::provider_payment::Model>, ServiceError> {
        self.repo.list_by_provider(provider_id).await
    }

    /// The amount may only change while the payment is still pending.
    #[instrument(skip(self))]
    pub async fn update_amount(&self, id: Uuid, amount_cents: i64) -> Result<models::provider_payment::Model, ServiceError> {
        let found = self.required(id).await?;
        let current: PaymentStatus = parse_status(&found.status)?;
        if current != PaymentStatus::Pending {
            return Err(ServiceError::Validation(format!(
                "amount of a {} payment cannot be changed",
                found.status
            )));
        }
        models::provider_payment::validate_new(amount_cents, &found.currency)?;
        let updated = self.repo.set_amount(id, amount_cents).await?;
        self.publish(PaymentAction::Updated, updated.clone());
        Ok(updated)
    }

    /// Hand the payment to the payment rail and stamp `processed_at`.
    pub async fn process(&self, id: Uuid) -> Result<models::provider_payment::Model, ServiceError> {
        self.transition(id, PaymentStatus::Processed, PaymentAction::Processed, Some(Utc::now()))
            .await
    }

    pub async fn complete(&self, id: Uuid) -> Result<models::provider_payment::Model, ServiceError> {
        self.transition(id, PaymentStatus::Completed, PaymentAction::Completed, None).await
    }

    pub async fn fail(&self, id: Uuid) -> Result<models::provider_payment::Model, ServiceError> {
        self.transition(id, PaymentStatus::Failed, PaymentAction::Failed, None).await
    }

    pub async fn reconcile(&self, id: Uuid) -> Result<models::provider_payment::Model, ServiceError> {
        self.transition(id, PaymentStatus::Reconciled, PaymentAction::Reconciled, None).await
    }

    async fn transition(
        &self,
        id: Uuid,
        to: PaymentStatus,
        action: PaymentAction,
        processed_at: Option<chrono::DateTime<Utc>>,
    ) -> Result<models::provider_payment::Model, ServiceError> {
        let found = self.required(id).await?;
        let current: PaymentStatus = parse_status(&found.status)?;
        ensure_transition(current, to)?;
        let updated = self.repo.set_status(id, to.as_str(), processed_at).await?;
        info!(payment_id = %id, status = to.as_str(), "payment_status_changed");
        self.publish(action, updated.clone());
        Ok(updated)
    }

    fn publish(&self, action: PaymentAction, payment: models::provider_payment::Model) {
        self.bus.publish(DomainEvent::ProviderPayment { action, payment: Some(payment) });
    }

    async fn required(&self, id: Uuid) -> Result<models::provider_payment::Model, ServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("payment"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider_payment::repository::mock::MockPaymentRepo;

    fn service() -> (ProviderPaymentService<MockPaymentRepo>, EventBus) {
        let bus = EventBus::new(32);
        (ProviderPaymentService::new(Arc::new(MockPaymentRepo::default()), bus.clone()), bus)
    }

    #[tokio::test]
    async fn full_pipeline_publishes_each_step() {
        let (svc, bus) = service();
        let mut rx = bus.subscribe();

        let p = svc.create(Uuid::new_v4(), 10_000, "EUR").await.unwrap();
        svc.process(p.id).await.unwrap();
        svc.complete(p.id).await.unwrap();
        let reconciled = svc.reconcile(p.id).await.unwrap();
        assert_eq!(reconciled.status, "reconciled");

        let kinds: Vec<_> = (0..4).map(|_| rx.try_recv().unwrap().kind()).collect();
        assert_eq!(
            kinds,
            [
                "provider_payment.created",
                "provider_payment.processed",
                "provider_payment.completed",
                "provider_payment.reconciled"
            ]
        );
    }

    #[tokio::test]
    async fn process_stamps_processed_at() {
        let (svc, _) = service();
        let p = svc.create(Uuid::new_v4(), 10_000, "EUR").await.unwrap();
        assert!(p.processed_at.is_none());
        let processed = svc.process(p.id).await.unwrap();
        assert!(processed.processed_at.is_some());
    }

    #[tokio::test]
    async fn amount_is_frozen_after_processing() {
        let (svc, _) = service();
        let p = svc.create(Uuid::new_v4(), 10_000, "EUR").await.unwrap();

        let updated = svc.update_amount(p.id, 12_000).await.unwrap();
        assert_eq!(updated.amount_cents, 12_000);

        svc.process(p.id).await.unwrap();
        let err = svc.update_amount(p.id, 15_000).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn failure_is_terminal_for_the_pipeline() {
        let (svc, _) = service();
        let p = svc.create(Uuid::new_v4(), 10_000, "EUR").await.unwrap();
        svc.process(p.id).await.unwrap();
        svc.fail(p.id).await.unwrap();

        let err = svc.complete(p.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn completed_payment_cannot_fail() {
        let (svc, _) = service();
        let p = svc.create(Uuid::new_v4(), 10_000, "EUR").await.unwrap();
        svc.process(p.id).await.unwrap();
        svc.complete(p.id).await.unwrap();

        let err = svc.fail(p.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn create_rejects_bad_currency() {
        let (svc, _) = service();
        let err = svc.create(Uuid::new_v4(), 10_000, "eur").await.unwrap_err();
        assert!(matches!(err, ServiceError::Model(_)));
    }
}
