//! Structured activity log for provider payment events.

use async_trait::async_trait;
use tracing::{error, info};

use crate::events::{DomainEvent, EventListener};

/// Writes one structured log line per payment event. A payload-less payment
/// event is itself logged as an error rather than failing delivery.
pub struct LogProviderPaymentActivity;

#[async_trait]
impl EventListener for LogProviderPaymentActivity {
    fn name(&self) -> &'static str {
        "log_provider_payment_activity"
    }

    async fn handle(&self, event: &DomainEvent) -> anyhow::Result<()> {
        let DomainEvent::ProviderPayment { action, payment } = event else {
            return Ok(());
        };
        match payment {
            Some(p) => info!(
                kind = event.kind(),
                payment_id = %p.id,
                provider_id = %p.provider_id,
                amount_cents = p.amount_cents,
                currency = %p.currency,
                status = %p.status,
                action = ?action,
                "payment_activity"
            ),
            None => error!(
                kind = event.kind(),
                payment_id = "unknown",
                action = ?action,
                "payment_activity_missing_payload"
            ),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::PaymentAction;

    #[tokio::test]
    async fn missing_payload_is_logged_not_failed() {
        let listener = LogProviderPaymentActivity;
        let event = DomainEvent::ProviderPayment {
            action: PaymentAction::Processed,
            payment: None,
        };
        assert!(listener.handle(&event).await.is_ok());
    }
}
