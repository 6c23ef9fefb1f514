//! In-memory per-provider payment counters.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::events::{DomainEvent, EventListener, PaymentAction};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PaymentStats {
    pub created: u64,
    pub completed: u64,
    pub failed: u64,
    pub completed_amount_cents: i64,
}

/// Keeps a live projection of payment activity per provider. Events without
/// a payload carry no provider id and are skipped.
#[derive(Default)]
pub struct PaymentCounterProjection {
    counters: DashMap<Uuid, PaymentStats>,
}

impl PaymentCounterProjection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self, provider_id: Uuid) -> PaymentStats {
        self.counters
            .get(&provider_id)
            .map(|entry| *entry)
            .unwrap_or_default()
    }
}

#[async_trait]
impl EventListener for PaymentCounterProjection {
    fn name(&self) -> &'static str {
        "payment_counter_projection"
    }

    async fn handle(&self, event: &DomainEvent) -> anyhow::Result<()> {
        let DomainEvent::ProviderPayment { action, payment: Some(payment) } = event else {
            return Ok(());
        };
        let mut stats = self.counters.entry(payment.provider_id).or_default();
        match action {
            PaymentAction::Created => stats.created += 1,
            PaymentAction::Completed => {
                stats.completed += 1;
                stats.completed_amount_cents += payment.amount_cents;
            }
            PaymentAction::Failed => stats.failed += 1,
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::tests::sample_payment;

    #[tokio::test]
    async fn counters_accumulate_per_provider() {
        let projection = PaymentCounterProjection::new();
        let payment = sample_payment();
        let provider_id = payment.provider_id;

        projection
            .handle(&DomainEvent::ProviderPayment {
                action: PaymentAction::Created,
                payment: Some(payment.clone()),
            })
            .await
            .unwrap();
        projection
            .handle(&DomainEvent::ProviderPayment {
                action: PaymentAction::Completed,
                payment: Some(payment.clone()),
            })
            .await
            .unwrap();

        let stats = projection.stats(provider_id);
        assert_eq!(stats.created, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.completed_amount_cents, payment.amount_cents);
        assert_eq!(stats.failed, 0);
    }

    #[tokio::test]
    async fn unknown_provider_reads_as_zero() {
        let projection = PaymentCounterProjection::new();
        assert_eq!(projection.stats(Uuid::new_v4()), PaymentStats::default());
    }

    #[tokio::test]
    async fn payload_less_events_are_skipped() {
        let projection = PaymentCounterProjection::new();
        projection
            .handle(&DomainEvent::ProviderPayment {
                action: PaymentAction::Created,
                payment: None,
            })
            .await
            .unwrap();
        assert!(projection.counters.is_empty());
    }
}
