use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use models::shipment;

use crate::errors::ServiceError;

#[async_trait]
pub trait ShipmentRepository: Send + Sync {
    async fn insert(
        &self,
        order_id: Uuid,
        carrier: &str,
        tracking_number: Option<&str>,
    ) -> Result<shipment::Model, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<shipment::Model>, ServiceError>;
    async fn find_by_order(&self, order_id: Uuid) -> Result<Option<shipment::Model>, ServiceError>;
    /// Update status and optionally stamp the shipped/delivered timestamps.
    async fn set_status(
        &self,
        id: Uuid,
        status: &str,
        shipped_at: Option<chrono::DateTime<chrono::Utc>>,
        delivered_at: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<shipment::Model, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmShipmentRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl ShipmentRepository for SeaOrmShipmentRepository {
    async fn insert(
        &self,
        order_id: Uuid,
        carrier: &str,
        tracking_number: Option<&str>,
    ) -> Result<shipment::Model, ServiceError> {
        let now = Utc::now();
        let am = shipment::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            carrier: Set(carrier.to_string()),
            tracking_number: Set(tracking_number.map(str::to_string)),
            status: Set("pending".to_string()),
            shipped_at: Set(None),
            delivered_at: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        am.insert(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<shipment::Model>, ServiceError> {
        shipment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn find_by_order(&self, order_id: Uuid) -> Result<Option<shipment::Model>, ServiceError> {
        shipment::Entity::find()
            .filter(shipment::Column::OrderId.eq(order_id))
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: &str,
        shipped_at: Option<chrono::DateTime<chrono::Utc>>,
        delivered_at: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<shipment::Model, ServiceError> {
        let found = shipment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .ok_or_else(|| ServiceError::not_found("shipment"))?;
        let mut am: shipment::ActiveModel = found.into();
        am.status = Set(status.to_string());
        if let Some(ts) = shipped_at {
            am.shipped_at = Set(Some(ts.into()));
        }
        if let Some(ts) = delivered_at {
            am.delivered_at = Set(Some(ts.into()));
        }
        am.updated_at = Set(Utc::now().into());
        am.update(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockShipmentRepo {
        rows: Mutex<HashMap<Uuid, shipment::Model>>,
    }

    #[async_trait]
    impl ShipmentRepository for MockShipmentRepo {
        async fn insert(
            &self,
            order_id: Uuid,
            carrier: &str,
            tracking_number: Option<&str>,
        ) -> Result<shipment::Model, ServiceError> {
            let now = Utc::now();
            let model = shipment::Model {
                id: Uuid::new_v4(),
                order_id,
                carrier: carrier.to_string(),
                tracking_number: tracking_number.map(str::to_string),
                status: "pending".into(),
                shipped_at: None,
                delivered_at: None,
                created_at: now.into(),
                updated_at: now.into(),
            };
            self.rows.lock().unwrap().insert(model.id, model.clone());
            Ok(model)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<shipment::Model>, ServiceError> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn find_by_order(&self, order_id: Uuid) -> Result<Option<shipment::Model>, ServiceError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .find(|s| s.order_id == order_id)
                .cloned())
        }

        async fn set_status(
            &self,
            id: Uuid,
            status: &str,
            shipped_at: Option<chrono::DateTime<chrono::Utc>>,
            delivered_at: Option<chrono::DateTime<chrono::Utc>>,
        ) -> Result<shipment::Model, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows.get_mut(&id).ok_or_else(|| ServiceError::not_found("shipment"))?;
            row.status = status.to_string();
            if let Some(ts) = shipped_at {
                row.shipped_at = Some(ts.into());
            }
            if let Some(ts) = delivered_at {
                row.delivered_at = Some(ts.into());
            }
            Ok(row.clone())
        }
    }
}
