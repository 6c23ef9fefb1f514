//! Typed in-process domain events.
//!
//! Services publish fire-and-forget; listeners run on their own tasks fed by
//! a broadcast channel. Whether a failing listener is retried or dropped is
//! decided by [`DeliveryPolicy`], not by per-listener error handling.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};
use uuid::Uuid;

pub mod listeners;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentAction {
    Created,
    Updated,
    Processed,
    Completed,
    Failed,
    Reconciled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentAction {
    Created,
    Updated,
    Deleted,
    Activated,
    Deactivated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocationAction {
    Created,
    Updated,
    Deleted,
}

/// Every event the service layer produces, with its full payload.
///
/// The payment payload is optional: activity may still be reported for rows
/// that no longer exist (or failed to load), and listeners must cope.
#[derive(Clone, Debug)]
pub enum DomainEvent {
    ProviderPayment {
        action: PaymentAction,
        payment: Option<models::provider_payment::Model>,
    },
    CustomerSegment {
        action: SegmentAction,
        segment: models::customer_segment::Model,
    },
    ProviderLocation {
        action: LocationAction,
        location: models::provider_location::Model,
    },
}

impl DomainEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            DomainEvent::ProviderPayment { action, .. } => match action {
                PaymentAction::Created => "provider_payment.created",
                PaymentAction::Updated => "provider_payment.updated",
                PaymentAction::Processed => "provider_payment.processed",
                PaymentAction::Completed => "provider_payment.completed",
                PaymentAction::Failed => "provider_payment.failed",
                PaymentAction::Reconciled => "provider_payment.reconciled",
            },
            DomainEvent::CustomerSegment { action, .. } => match action {
                SegmentAction::Created => "customer_segment.created",
                SegmentAction::Updated => "customer_segment.updated",
                SegmentAction::Deleted => "customer_segment.deleted",
                SegmentAction::Activated => "customer_segment.activated",
                SegmentAction::Deactivated => "customer_segment.deactivated",
            },
            DomainEvent::ProviderLocation { action, .. } => match action {
                LocationAction::Created => "provider_location.created",
                LocationAction::Updated => "provider_location.updated",
                LocationAction::Deleted => "provider_location.deleted",
            },
        }
    }

    /// Best-effort id of the entity the event is about.
    pub fn entity_id(&self) -> Option<Uuid> {
        match self {
            DomainEvent::ProviderPayment { payment, .. } => payment.as_ref().map(|p| p.id),
            DomainEvent::CustomerSegment { segment, .. } => Some(segment.id),
            DomainEvent::ProviderLocation { location, .. } => Some(location.id),
        }
    }
}

/// Broadcast-backed publisher handle; cheap to clone into services.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    pub fn new(buffer: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer);
        Self { tx }
    }

    pub fn from_config(cfg: &configs::EventsConfig) -> Self {
        Self::new(cfg.buffer)
    }

    /// Fire-and-forget. Publishing without subscribers is not an error.
    pub fn publish(&self, event: DomainEvent) {
        let kind = event.kind();
        match self.tx.send(event) {
            Ok(subscribers) => debug!(kind, subscribers, "event_published"),
            Err(_) => debug!(kind, "event_unobserved"),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

/// A side-effecting subscriber.
#[async_trait]
pub trait EventListener: Send + Sync {
    fn name(&self) -> &'static str;
    async fn handle(&self, event: &DomainEvent) -> anyhow::Result<()>;
}

/// Retry-vs-drop configuration applied to every event a listener receives.
#[derive(Clone, Copy, Debug)]
pub struct DeliveryPolicy {
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl DeliveryPolicy {
    pub fn from_config(cfg: &configs::EventsConfig) -> Self {
        Self {
            max_attempts: cfg.max_attempts,
            retry_delay: Duration::from_millis(cfg.retry_delay_ms),
        }
    }
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3, retry_delay: Duration::from_millis(200) }
    }
}

/// Run a listener on its own task. Failures are retried per policy and then
/// logged; they never reach the publisher.
pub fn spawn_listener(
    bus: &EventBus,
    listener: Arc<dyn EventListener>,
    policy: DeliveryPolicy,
) -> JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            let event = match rx.recv().await {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(listener = listener.name(), skipped, "listener_lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };
            deliver(listener.as_ref(), &event, policy).await;
        }
    })
}

/// Attempt delivery up to `policy.max_attempts`; absorb the terminal error.
pub async fn deliver(listener: &dyn EventListener, event: &DomainEvent, policy: DeliveryPolicy) {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match listener.handle(event).await {
            Ok(()) => return,
            Err(err) if attempt < policy.max_attempts => {
                warn!(
                    listener = listener.name(),
                    kind = event.kind(),
                    attempt,
                    error = %err,
                    "listener_retry"
                );
                tokio::time::sleep(policy.retry_delay).await;
            }
            Err(err) => {
                let entity_id = event
                    .entity_id()
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                error!(
                    listener = listener.name(),
                    kind = event.kind(),
                    entity_id = %entity_id,
                    error = %err,
                    "listener_failed"
                );
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;

    pub(crate) fn sample_payment() -> models::provider_payment::Model {
        let now = Utc::now().into();
        models::provider_payment::Model {
            id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
            amount_cents: 12_500,
            currency: "USD".into(),
            status: "pending".into(),
            processed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    struct Recording {
        seen: Mutex<Vec<&'static str>>,
        fail_times: AtomicU32,
    }

    impl Recording {
        fn new(fail_times: u32) -> Self {
            Self { seen: Mutex::new(Vec::new()), fail_times: AtomicU32::new(fail_times) }
        }
    }

    #[async_trait]
    impl EventListener for Recording {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn handle(&self, event: &DomainEvent) -> anyhow::Result<()> {
            let remaining = self.fail_times.load(Ordering::SeqCst);
            if remaining > 0 {
                self.fail_times.store(remaining - 1, Ordering::SeqCst);
                anyhow::bail!("transient failure");
            }
            self.seen.lock().unwrap().push(event.kind());
            Ok(())
        }
    }

    #[tokio::test]
    async fn listener_receives_published_events() {
        let bus = EventBus::new(16);
        let listener = Arc::new(Recording::new(0));
        let handle = spawn_listener(&bus, listener.clone(), DeliveryPolicy::default());

        bus.publish(DomainEvent::ProviderPayment {
            action: PaymentAction::Created,
            payment: Some(sample_payment()),
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(listener.seen.lock().unwrap().as_slice(), ["provider_payment.created"]);
        handle.abort();
    }

    #[tokio::test]
    async fn delivery_retries_until_policy_exhausted() {
        let listener = Recording::new(2);
        let policy = DeliveryPolicy { max_attempts: 3, retry_delay: Duration::from_millis(1) };
        let event = DomainEvent::ProviderPayment {
            action: PaymentAction::Completed,
            payment: Some(sample_payment()),
        };

        deliver(&listener, &event, policy).await;
        assert_eq!(listener.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn terminal_failure_is_absorbed() {
        let listener = Recording::new(10);
        let policy = DeliveryPolicy { max_attempts: 2, retry_delay: Duration::from_millis(1) };
        let event = DomainEvent::ProviderPayment { action: PaymentAction::Failed, payment: None };

        // Must return (and not panic) even though every attempt fails.
        deliver(&listener, &event, policy).await;
        assert!(listener.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::new(4);
        bus.publish(DomainEvent::ProviderPayment {
            action: PaymentAction::Created,
            payment: None,
        });
    }
}
