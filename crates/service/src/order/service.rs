use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use models::order::OrderStatus;
use models::status::StatusFlow;

use crate::errors::ServiceError;
use crate::order::repository::OrderRepository;
use crate::status::{ensure_transition, parse_status};

/// Order lifecycle: placement, payment, refund and cancellation.
///
/// Shipping transitions are driven by the shipment service against the same
/// repository.
pub struct OrderService<R: OrderRepository> {
    repo: Arc<R>,
}

fn generate_order_number() -> String {
    let raw = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("ORD-{}", &raw[..12])
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self), fields(customer_id = %customer_id))]
    pub async fn place(&self, customer_id: Uuid, total_cents: i64) -> Result<models::order::Model, ServiceError> {
        if total_cents <= 0 {
            return Err(ServiceError::Validation("order total must be positive".into()));
        }
        let created = self
            .repo
            .insert(customer_id, &generate_order_number(), total_cents)
            .await?;
        self.repo.increment_customer_orders(customer_id).await?;
        info!(order_id = %created.id, order_number = %created.order_number, "order_placed");
        Ok(created)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<models::order::Model>, ServiceError> {
        self.repo.find_by_id(id).await
    }

    pub async fn get_by_number(&self, order_number: &str) -> Result<Option<models::order::Model>, ServiceError> {
        self.repo.find_by_number(order_number).await
    }

    pub async fn list_for_customer(&self, customer_id: Uuid) -> Result<Vec<models::order::Model>, ServiceError> {
        self.repo.list_by_customer(customer_id).await
    }

    pub async fn transactions(&self, id: Uuid) -> Result<Vec<models::order_transaction::Model>, ServiceError> {
        self.repo.transactions(id).await
    }

    /// Record full payment and move the order to `paid`. Partial payments are
    /// rejected.
    #[instrument(skip(self))]
    pub async fn process_payment(
        &self,
        id: Uuid,
        amount_cents: i64,
        reference: Option<&str>,
    ) -> Result<models::order::Model, ServiceError> {
        let found = self.required(id).await?;
        let current: OrderStatus = parse_status(&found.status)?;
        ensure_transition(current, OrderStatus::Paid)?;
        if amount_cents != found.total_cents {
            return Err(ServiceError::Validation(format!(
                "payment of {} does not match order total {}",
                amount_cents, found.total_cents
            )));
        }
        self.repo
            .record_transaction(id, "payment", amount_cents, reference)
            .await?;
        let updated = self.repo.set_status(id, OrderStatus::Paid.as_str()).await?;
        info!(order_id = %id, amount_cents, "order_paid");
        Ok(updated)
    }

    /// Refund the full order total and move the order to `refunded`.
    #[instrument(skip(self))]
    pub async fn process_refund(
        &self,
        id: Uuid,
        reference: Option<&str>,
    ) -> Result<models::order::Model, ServiceError> {
        let found = self.required(id).await?;
        let current: OrderStatus = parse_status(&found.status)?;
        ensure_transition(current, OrderStatus::Refunded)?;
        self.repo
            .record_transaction(id, "refund", found.total_cents, reference)
            .await?;
        let updated = self.repo.set_status(id, OrderStatus::Refunded.as_str()).await?;
        info!(order_id = %id, amount_cents = found.total_cents, "order_refunded");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn cancel(&self, id: Uuid) -> Result<models::order::Model, ServiceError> {
        let found = self.required(id).await?;
        let current: OrderStatus = parse_status(&found.status)?;
        ensure_transition(current, OrderStatus::Cancelled)?;
        let updated = self.repo.set_status(id, OrderStatus::Cancelled.as_str()).await?;
        info!(order_id = %id, "order_cancelled");
        Ok(updated)
    }

    async fn required(&self, id: Uuid) -> Result<models::order::Model, ServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("order"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::repository::mock::MockOrderRepo;

    fn service() -> (OrderService<MockOrderRepo>, Arc<MockOrderRepo>) {
        let repo = Arc::new(MockOrderRepo::default());
        (OrderService::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn place_assigns_number_and_counts_toward_customer() {
        let (svc, repo) = service();
        let customer = Uuid::new_v4();
        let order = svc.place(customer, 9_900).await.unwrap();

        assert!(order.order_number.starts_with("ORD-"));
        assert_eq!(order.order_number.len(), 16);
        assert_eq!(order.status, "pending");
        assert_eq!(*repo.order_counts.lock().unwrap().get(&customer).unwrap(), 1);
    }

    #[tokio::test]
    async fn place_rejects_nonpositive_total() {
        let (svc, _) = service();
        let err = svc.place(Uuid::new_v4(), 0).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn payment_must_match_total_exactly() {
        let (svc, repo) = service();
        let order = repo.seed("pending", 5_000);

        let err = svc.process_payment(order.id, 4_999, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        // Rejected payment leaves no ledger entry and no status change.
        assert!(svc.transactions(order.id).await.unwrap().is_empty());
        assert_eq!(svc.get(order.id).await.unwrap().unwrap().status, "pending");

        let paid = svc.process_payment(order.id, 5_000, Some("txn-1")).await.unwrap();
        assert_eq!(paid.status, "paid");
        let ledger = svc.transactions(order.id).await.unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].kind, "payment");
        assert_eq!(ledger[0].amount_cents, 5_000);
    }

    #[tokio::test]
    async fn paying_twice_is_an_illegal_transition() {
        let (svc, repo) = service();
        let order = repo.seed("paid", 5_000);
        let err = svc.process_payment(order.id, 5_000, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn refund_allowed_from_paid_and_delivered_only() {
        let (svc, repo) = service();
        let paid = repo.seed("paid", 3_000);
        let delivered = repo.seed("delivered", 3_000);
        let pending = repo.seed("pending", 3_000);

        let refunded = svc.process_refund(paid.id, None).await.unwrap();
        assert_eq!(refunded.status, "refunded");
        let ledger = svc.transactions(paid.id).await.unwrap();
        assert_eq!(ledger[0].kind, "refund");
        assert_eq!(ledger[0].amount_cents, 3_000);

        svc.process_refund(delivered.id, None).await.unwrap();

        let err = svc.process_refund(pending.id, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn cancel_is_blocked_once_shipped() {
        let (svc, repo) = service();
        let pending = repo.seed("pending", 1_000);
        let shipped = repo.seed("shipped", 1_000);

        assert_eq!(svc.cancel(pending.id).await.unwrap().status, "cancelled");
        let err = svc.cancel(shipped.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn order_pay_refund_db_flow() -> Result<(), anyhow::Error> {
        use crate::customer::{CustomerRepository, NewCustomer, SeaOrmCustomerRepository};

        if std::env::var("DATABASE_URL").is_err() {
            return Ok(());
        }
        let db = crate::test_support::get_db().await?;
        let customers = SeaOrmCustomerRepository { db: db.clone() };
        let customer = customers
            .create_with_account(&NewCustomer {
                email: format!("it_{}@example.com", Uuid::new_v4()),
                first_name: "Order".into(),
                last_name: "Flow".into(),
                phone: None,
            })
            .await?;

        let svc = OrderService::new(Arc::new(crate::order::SeaOrmOrderRepository { db }));
        let order = svc.place(customer.id, 12_500).await?;
        assert_eq!(order.status, "pending");

        let paid = svc.process_payment(order.id, 12_500, Some("it-txn")).await?;
        assert_eq!(paid.status, "paid");

        let refunded = svc.process_refund(order.id, None).await?;
        assert_eq!(refunded.status, "refunded");

        let ledger = svc.transactions(order.id).await?;
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger[0].kind, "payment");
        assert_eq!(ledger[1].kind, "refund");
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_status_string_is_validation() {
        let (svc, repo) = service();
        let weird = repo.seed("sideways", 1_000);
        let err = svc.cancel(weird.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
