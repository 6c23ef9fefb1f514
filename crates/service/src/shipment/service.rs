use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use models::order::OrderStatus;
use models::shipment::ShipmentStatus;
use models::status::StatusFlow;

use crate::errors::ServiceError;
use crate::order::repository::OrderRepository;
use crate::shipment::repository::ShipmentRepository;
use crate::status::{ensure_transition, parse_status};

/// Shipment lifecycle, kept in lockstep with the owning order.
pub struct ShipmentService<S: ShipmentRepository, O: OrderRepository> {
    shipments: Arc<S>,
    orders: Arc<O>,
}

impl<S: ShipmentRepository, O: OrderRepository> ShipmentService<S, O> {
    pub fn new(shipments: Arc<S>, orders: Arc<O>) -> Self {
        Self { shipments, orders }
    }

    /// Only paid orders can be handed to a carrier, and only once.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn create_for_order(
        &self,
        order_id: Uuid,
        carrier: &str,
        tracking_number: Option<&str>,
    ) -> Result<models::shipment::Model, ServiceError> {
        models::shipment::validate_carrier(carrier)?;
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("order"))?;
        let status: OrderStatus = parse_status(&order.status)?;
        if status != OrderStatus::Paid {
            return Err(ServiceError::Validation(format!(
                "order must be paid before shipping, currently {}",
                order.status
            )));
        }
        if self.shipments.find_by_order(order_id).await?.is_some() {
            return Err(ServiceError::Conflict("order already has a shipment".into()));
        }
        let created = self.shipments.insert(order_id, carrier, tracking_number).await?;
        info!(shipment_id = %created.id, carrier, "shipment_created");
        Ok(created)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<models::shipment::Model>, ServiceError> {
        self.shipments.find_by_id(id).await
    }

    pub async fn get_for_order(&self, order_id: Uuid) -> Result<Option<models::shipment::Model>, ServiceError> {
        self.shipments.find_by_order(order_id).await
    }

    /// Hand-off to the carrier: shipment goes in transit, order goes shipped.
    #[instrument(skip(self))]
    pub async fn mark_shipped(&self, id: Uuid) -> Result<models::shipment::Model, ServiceError> {
        let found = self.required(id).await?;
        let current: ShipmentStatus = parse_status(&found.status)?;
        ensure_transition(current, ShipmentStatus::InTransit)?;

        let order = self
            .orders
            .find_by_id(found.order_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("order"))?;
        let order_status: OrderStatus = parse_status(&order.status)?;
        ensure_transition(order_status, OrderStatus::Shipped)?;

        self.orders.set_status(order.id, OrderStatus::Shipped.as_str()).await?;
        let updated = self
            .shipments
            .set_status(id, ShipmentStatus::InTransit.as_str(), Some(Utc::now()), None)
            .await?;
        info!(shipment_id = %id, order_id = %order.id, "shipment_in_transit");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn mark_delivered(&self, id: Uuid) -> Result<models::shipment::Model, ServiceError> {
        let found = self.required(id).await?;
        let current: ShipmentStatus = parse_status(&found.status)?;
        ensure_transition(current, ShipmentStatus::Delivered)?;

        let order = self
            .orders
            .find_by_id(found.order_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("order"))?;
        let order_status: OrderStatus = parse_status(&order.status)?;
        ensure_transition(order_status, OrderStatus::Delivered)?;

        self.orders.set_status(order.id, OrderStatus::Delivered.as_str()).await?;
        let updated = self
            .shipments
            .set_status(id, ShipmentStatus::Delivered.as_str(), None, Some(Utc::now()))
            .await?;
        info!(shipment_id = %id, order_id = %order.id, "shipment_delivered");
        Ok(updated)
    }

    /// A failed shipment does not change the order; a new shipment attempt
    /// requires operator action.
    #[instrument(skip(self))]
    pub async fn mark_failed(&self, id: Uuid) -> Result<models::shipment::Model, ServiceError> {
        let found = self.required(id).await?;
        let current: ShipmentStatus = parse_status(&found.status)?;
        ensure_transition(current, ShipmentStatus::Failed)?;
        let updated = self
            .shipments
            .set_status(id, ShipmentStatus::Failed.as_str(), None, None)
            .await?;
        info!(shipment_id = %id, "shipment_failed");
        Ok(updated)
    }

    async fn required(&self, id: Uuid) -> Result<models::shipment::Model, ServiceError> {
        self.shipments
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("shipment"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::repository::mock::MockOrderRepo;
    use crate::shipment::repository::mock::MockShipmentRepo;

    fn service() -> (
        ShipmentService<MockShipmentRepo, MockOrderRepo>,
        Arc<MockShipmentRepo>,
        Arc<MockOrderRepo>,
    ) {
        let shipments = Arc::new(MockShipmentRepo::default());
        let orders = Arc::new(MockOrderRepo::default());
        (ShipmentService::new(shipments.clone(), orders.clone()), shipments, orders)
    }

    #[tokio::test]
    async fn unpaid_order_cannot_be_shipped() {
        let (svc, _, orders) = service();
        let pending = orders.seed("pending", 2_000);
        let err = svc.create_for_order(pending.id, "UPS", None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn one_shipment_per_order() {
        let (svc, _, orders) = service();
        let paid = orders.seed("paid", 2_000);
        svc.create_for_order(paid.id, "UPS", Some("1Z999")).await.unwrap();
        let err = svc.create_for_order(paid.id, "DHL", None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn shipping_advances_shipment_and_order_together() {
        let (svc, _, orders) = service();
        let order = orders.seed("paid", 2_000);
        let shipment = svc.create_for_order(order.id, "UPS", None).await.unwrap();

        let in_transit = svc.mark_shipped(shipment.id).await.unwrap();
        assert_eq!(in_transit.status, "in_transit");
        assert!(in_transit.shipped_at.is_some());
        assert_eq!(orders.find_by_id(order.id).await.unwrap().unwrap().status, "shipped");

        let delivered = svc.mark_delivered(shipment.id).await.unwrap();
        assert_eq!(delivered.status, "delivered");
        assert!(delivered.delivered_at.is_some());
        assert_eq!(orders.find_by_id(order.id).await.unwrap().unwrap().status, "delivered");
    }

    #[tokio::test]
    async fn delivery_requires_in_transit() {
        let (svc, _, orders) = service();
        let order = orders.seed("paid", 2_000);
        let shipment = svc.create_for_order(order.id, "UPS", None).await.unwrap();

        let err = svc.mark_delivered(shipment.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn failure_leaves_the_order_alone() {
        let (svc, _, orders) = service();
        let order = orders.seed("paid", 2_000);
        let shipment = svc.create_for_order(order.id, "UPS", None).await.unwrap();
        svc.mark_shipped(shipment.id).await.unwrap();

        let failed = svc.mark_failed(shipment.id).await.unwrap();
        assert_eq!(failed.status, "failed");
        // Order stays shipped; recovery is an operator decision.
        assert_eq!(orders.find_by_id(order.id).await.unwrap().unwrap().status, "shipped");
    }

    #[tokio::test]
    async fn blank_carrier_is_rejected() {
        let (svc, _, orders) = service();
        let order = orders.seed("paid", 2_000);
        let err = svc.create_for_order(order.id, "  ", None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Model(_)));
    }
}
