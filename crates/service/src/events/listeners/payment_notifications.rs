//! Provider-facing notifications for terminal payment outcomes.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::events::{DomainEvent, EventListener, PaymentAction};
use crate::notify::Notifier;
use crate::provider::ProviderRepository;

/// Emails the owning provider when a payment completes or fails.
///
/// Transport errors propagate so the delivery policy can retry; a missing
/// provider row is logged and dropped since retrying cannot fix it.
pub struct NotifyProviderOnPayment<R: ProviderRepository> {
    providers: Arc<R>,
    notifier: Arc<dyn Notifier>,
}

impl<R: ProviderRepository> NotifyProviderOnPayment<R> {
    pub fn new(providers: Arc<R>, notifier: Arc<dyn Notifier>) -> Self {
        Self { providers, notifier }
    }
}

#[async_trait]
impl<R: ProviderRepository> EventListener for NotifyProviderOnPayment<R> {
    fn name(&self) -> &'static str {
        "notify_provider_on_payment"
    }

    async fn handle(&self, event: &DomainEvent) -> anyhow::Result<()> {
        let DomainEvent::ProviderPayment { action, payment: Some(payment) } = event else {
            return Ok(());
        };
        let (subject, body) = match action {
            PaymentAction::Completed => (
                "Payment completed",
                format!(
                    "Payment {} for {} {} has completed.",
                    payment.id, payment.amount_cents, payment.currency
                ),
            ),
            PaymentAction::Failed => (
                "Payment failed",
                format!(
                    "Payment {} for {} {} has failed.",
                    payment.id, payment.amount_cents, payment.currency
                ),
            ),
            _ => return Ok(()),
        };

        let provider = self.providers.find_by_id(payment.provider_id).await?;
        let Some(provider) = provider else {
            warn!(
                provider_id = %payment.provider_id,
                payment_id = %payment.id,
                "payment_notification_provider_missing"
            );
            return Ok(());
        };
        self.notifier
            .send(&provider.contact_email, subject, &body)
            .await
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::events::tests::sample_payment;
    use crate::notify::mock::RecordingNotifier;
    use crate::provider::mock::MockProviderRepo;

    #[tokio::test]
    async fn completed_payment_notifies_provider_contact() {
        let repo = Arc::new(MockProviderRepo::default());
        let mut payment = sample_payment();
        let provider = repo
            .seed("Acme Logistics", "billing@acme.test", "active")
            .await;
        payment.provider_id = provider.id;

        let notifier = Arc::new(RecordingNotifier::default());
        let listener = NotifyProviderOnPayment::new(repo, notifier.clone());

        listener
            .handle(&DomainEvent::ProviderPayment {
                action: PaymentAction::Completed,
                payment: Some(payment),
            })
            .await
            .unwrap();

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "billing@acme.test");
        assert_eq!(sent[0].1, "Payment completed");
    }

    #[tokio::test]
    async fn missing_provider_is_dropped_without_error() {
        let repo = Arc::new(MockProviderRepo::default());
        let mut payment = sample_payment();
        payment.provider_id = Uuid::new_v4();

        let notifier = Arc::new(RecordingNotifier::default());
        let listener = NotifyProviderOnPayment::new(repo, notifier.clone());

        listener
            .handle(&DomainEvent::ProviderPayment {
                action: PaymentAction::Failed,
                payment: Some(payment),
            })
            .await
            .unwrap();
        assert_eq!(notifier.sent_count(), 0);
    }

    #[tokio::test]
    async fn non_terminal_actions_send_nothing() {
        let repo = Arc::new(MockProviderRepo::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let listener = NotifyProviderOnPayment::new(repo, notifier.clone());

        listener
            .handle(&DomainEvent::ProviderPayment {
                action: PaymentAction::Processed,
                payment: Some(sample_payment()),
            })
            .await
            .unwrap();
        assert_eq!(notifier.sent_count(), 0);
    }

    #[tokio::test]
    async fn transport_error_propagates_for_retry() {
        let repo = Arc::new(MockProviderRepo::default());
        let mut payment = sample_payment();
        let provider = repo.seed("Acme", "ops@acme.test", "active").await;
        payment.provider_id = provider.id;

        let notifier = Arc::new(RecordingNotifier::default());
        notifier.fail_next();
        let listener = NotifyProviderOnPayment::new(repo, notifier);

        let result = listener
            .handle(&DomainEvent::ProviderPayment {
                action: PaymentAction::Completed,
                payment: Some(payment),
            })
            .await;
        assert!(result.is_err());
    }
}
