use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use models::customer_communication::CommunicationStatus;
use models::status::StatusFlow;

use crate::communication::repository::{CommunicationRepository, NewCommunication};
use crate::errors::ServiceError;
use crate::notify::Notifier;
use crate::status::{ensure_transition, parse_status};

/// Outbound customer messages: draft -> sent -> delivered -> read, with
/// bounces off the sent state.
pub struct CommunicationService<R: CommunicationRepository> {
    repo: Arc<R>,
    notifier: Arc<dyn Notifier>,
}

impl<R: CommunicationRepository> CommunicationService<R> {
    pub fn new(repo: Arc<R>, notifier: Arc<dyn Notifier>) -> Self {
        Self { repo, notifier }
    }

    #[instrument(skip(self, input), fields(customer_id = %input.customer_id, channel = %input.channel))]
    pub async fn create_draft(&self, input: NewCommunication) -> Result<models::customer_communication::Model, ServiceError> {
        models::customer_communication::validate_channel(&input.channel)?;
        if input.subject.trim().is_empty() {
            return Err(ServiceError::Validation("subject required".into()));
        }
        let created = self.repo.insert(&input).await?;
        info!(communication_id = %created.id, "communication_drafted");
        Ok(created)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<models::customer_communication::Model>, ServiceError> {
        self.repo.find_by_id(id).await
    }

    pub async fn list_for_customer(&self, customer_id: Uuid) -> Result<Vec<models::customer_communication::Model>, ServiceError> {
        self.repo.list_by_customer(customer_id).await
    }

    /// Deliver the draft through the notifier. A transport failure surfaces
    /// as a notification error and leaves the draft untouched for retry.
    #[instrument(skip(self, recipient))]
    pub async fn send(&self, id: Uuid, recipient: &str) -> Result<models::customer_communication::Model, ServiceError> {
        let found = self.required(id).await?;
        let current: CommunicationStatus = parse_status(&found.status)?;
        ensure_transition(current, CommunicationStatus::Sent)?;

        self.notifier
            .send(recipient, &found.subject, &found.body)
            .await
            .map_err(|e| ServiceError::Notification(e.to_string()))?;

        let updated = self
            .repo
            .set_status(id, CommunicationStatus::Sent.as_str(), Some(Utc::now()))
            .await?;
        info!(communication_id = %id, "communication_sent");
        Ok(updated)
    }

    pub async fn mark_delivered(&self, id: Uuid) -> Result<models::customer_communication::Model, ServiceError> {
        self.transition(id, CommunicationStatus::Delivered).await
    }

    pub async fn mark_read(&self, id: Uuid) -> Result<models::customer_communication::Model, ServiceError> {
        self.transition(id, CommunicationStatus::Read).await
    }

    pub async fn mark_bounced(&self, id: Uuid) -> Result<models::customer_communication::Model, ServiceError> {
        self.transition(id, CommunicationStatus::Bounced).await
    }

    async fn transition(&self, id: Uuid, to: CommunicationStatus) -> Result<models::customer_communication::Model, ServiceError> {
        let found = self.required(id).await?;
        let current: CommunicationStatus = parse_status(&found.status)?;
        ensure_transition(current, to)?;
        self.repo.set_status(id, to.as_str(), None).await
    }

    async fn required(&self, id: Uuid) -> Result<models::customer_communication::Model, ServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("communication"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::communication::repository::mock::MockCommunicationRepo;
    use crate::notify::mock::RecordingNotifier;

    fn service() -> (CommunicationService<MockCommunicationRepo>, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        (
            CommunicationService::new(Arc::new(MockCommunicationRepo::default()), notifier.clone()),
            notifier,
        )
    }

    fn input() -> NewCommunication {
        NewCommunication {
            customer_id: Uuid::new_v4(),
            channel: "email".into(),
            subject: "Your order shipped".into(),
            body: "Tracking inside.".into(),
        }
    }

    #[tokio::test]
    async fn draft_starts_unsent() {
        let (svc, _) = service();
        let draft = svc.create_draft(input()).await.unwrap();
        assert_eq!(draft.status, "draft");
        assert!(draft.sent_at.is_none());
    }

    #[tokio::test]
    async fn unknown_channel_is_rejected() {
        let (svc, _) = service();
        let mut bad = input();
        bad.channel = "pigeon".into();
        assert!(matches!(svc.create_draft(bad).await.unwrap_err(), ServiceError::Model(_)));
    }

    #[tokio::test]
    async fn send_delivers_and_stamps_sent_at() {
        let (svc, notifier) = service();
        let draft = svc.create_draft(input()).await.unwrap();

        let sent = svc.send(draft.id, "ada@example.com").await.unwrap();
        assert_eq!(sent.status, "sent");
        assert!(sent.sent_at.is_some());
        assert_eq!(notifier.sent_count(), 1);
    }

    #[tokio::test]
    async fn transport_failure_keeps_the_draft() {
        let (svc, notifier) = service();
        let draft = svc.create_draft(input()).await.unwrap();

        notifier.fail_next();
        let err = svc.send(draft.id, "ada@example.com").await.unwrap_err();
        assert!(matches!(err, ServiceError::Notification(_)));

        // Still a draft; a retry succeeds.
        let unchanged = svc.get(draft.id).await.unwrap().unwrap();
        assert_eq!(unchanged.status, "draft");
        svc.send(draft.id, "ada@example.com").await.unwrap();
    }

    #[tokio::test]
    async fn resending_is_an_illegal_transition() {
        let (svc, notifier) = service();
        let draft = svc.create_draft(input()).await.unwrap();
        svc.send(draft.id, "ada@example.com").await.unwrap();

        let err = svc.send(draft.id, "ada@example.com").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition { .. }));
        assert_eq!(notifier.sent_count(), 1);
    }

    #[tokio::test]
    async fn delivery_tracking_follows_the_table() {
        let (svc, _) = service();
        let draft = svc.create_draft(input()).await.unwrap();
        svc.send(draft.id, "ada@example.com").await.unwrap();

        assert_eq!(svc.mark_delivered(draft.id).await.unwrap().status, "delivered");
        assert_eq!(svc.mark_read(draft.id).await.unwrap().status, "read");

        // A read message cannot bounce.
        let err = svc.mark_bounced(draft.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn bounce_only_from_sent() {
        let (svc, _) = service();
        let draft = svc.create_draft(input()).await.unwrap();
        svc.send(draft.id, "ada@example.com").await.unwrap();
        assert_eq!(svc.mark_bounced(draft.id).await.unwrap().status, "bounced");
    }
}
