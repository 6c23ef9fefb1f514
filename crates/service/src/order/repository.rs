use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use models::{customer, order, order_transaction};

use crate::errors::ServiceError;

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn insert(
        &self,
        customer_id: Uuid,
        order_number: &str,
        total_cents: i64,
    ) -> Result<order::Model, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<order::Model>, ServiceError>;
    async fn find_by_number(&self, order_number: &str) -> Result<Option<order::Model>, ServiceError>;
    async fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<order::Model>, ServiceError>;
    async fn set_status(&self, id: Uuid, status: &str) -> Result<order::Model, ServiceError>;
    /// Append a row to the payment/refund ledger.
    async fn record_transaction(
        &self,
        order_id: Uuid,
        kind: &str,
        amount_cents: i64,
        reference: Option<&str>,
    ) -> Result<order_transaction::Model, ServiceError>;
    async fn transactions(&self, order_id: Uuid) -> Result<Vec<order_transaction::Model>, ServiceError>;
    async fn increment_customer_orders(&self, customer_id: Uuid) -> Result<(), ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmOrderRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl OrderRepository for SeaOrmOrderRepository {
    async fn insert(
        &self,
        customer_id: Uuid,
        order_number: &str,
        total_cents: i64,
    ) -> Result<order::Model, ServiceError> {
        let now = Utc::now();
        let am = order::ActiveModel {
            id: Set(Uuid::new_v4()),
            customer_id: Set(customer_id),
            order_number: Set(order_number.to_string()),
            status: Set("pending".to_string()),
            total_cents: Set(total_cents),
            placed_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        am.insert(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<order::Model>, ServiceError> {
        order::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn find_by_number(&self, order_number: &str) -> Result<Option<order::Model>, ServiceError> {
        order::Entity::find()
            .filter(order::Column::OrderNumber.eq(order_number))
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<order::Model>, ServiceError> {
        order::Entity::find()
            .filter(order::Column::CustomerId.eq(customer_id))
            .order_by_desc(order::Column::PlacedAt)
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn set_status(&self, id: Uuid, status: &str) -> Result<order::Model, ServiceError> {
        let found = order::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .ok_or_else(|| ServiceError::not_found("order"))?;
        let mut am: order::ActiveModel = found.into();
        am.status = Set(status.to_string());
        am.updated_at = Set(Utc::now().into());
        am.update(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn record_transaction(
        &self,
        order_id: Uuid,
        kind: &str,
        amount_cents: i64,
        reference: Option<&str>,
    ) -> Result<order_transaction::Model, ServiceError> {
        let am = order_transaction::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            kind: Set(kind.to_string()),
            amount_cents: Set(amount_cents),
            reference: Set(reference.map(str::to_string)),
            created_at: Set(Utc::now().into()),
        };
        am.insert(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn transactions(&self, order_id: Uuid) -> Result<Vec<order_transaction::Model>, ServiceError> {
        order_transaction::Entity::find()
            .filter(order_transaction::Column::OrderId.eq(order_id))
            .order_by_asc(order_transaction::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn increment_customer_orders(&self, customer_id: Uuid) -> Result<(), ServiceError> {
        let found = customer::Entity::find_by_id(customer_id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .ok_or_else(|| ServiceError::not_found("customer"))?;
        let next = found.total_orders + 1;
        let mut am: customer::ActiveModel = found.into();
        am.total_orders = Set(next);
        am.updated_at = Set(Utc::now().into());
        am.update(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(())
    }
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockOrderRepo {
        rows: Mutex<HashMap<Uuid, order::Model>>,
        ledger: Mutex<Vec<order_transaction::Model>>,
        pub order_counts: Mutex<HashMap<Uuid, i32>>,
    }

    impl MockOrderRepo {
        /// Place an order directly in a given status.
        pub fn seed(&self, status: &str, total_cents: i64) -> order::Model {
            let now = Utc::now();
            let id = Uuid::new_v4();
            let model = order::Model {
                id,
                customer_id: Uuid::new_v4(),
                order_number: format!("ORD-SEED{}", &id.simple().to_string()[..6].to_uppercase()),
                status: status.to_string(),
                total_cents,
                placed_at: now.into(),
                updated_at: now.into(),
            };
            self.rows.lock().unwrap().insert(model.id, model.clone());
            model
        }
    }

    #[async_trait]
    impl OrderRepository for MockOrderRepo {
        async fn insert(
            &self,
            customer_id: Uuid,
            order_number: &str,
            total_cents: i64,
        ) -> Result<order::Model, ServiceError> {
            let now = Utc::now();
            let model = order::Model {
                id: Uuid::new_v4(),
                customer_id,
                order_number: order_number.to_string(),
                status: "pending".into(),
                total_cents,
                placed_at: now.into(),
                updated_at: now.into(),
            };
            self.rows.lock().unwrap().insert(model.id, model.clone());
            Ok(model)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<order::Model>, ServiceError> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn find_by_number(&self, order_number: &str) -> Result<Option<order::Model>, ServiceError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .find(|o| o.order_number == order_number)
                .cloned())
        }

        async fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<order::Model>, ServiceError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|o| o.customer_id == customer_id)
                .cloned()
                .collect())
        }

        async fn set_status(&self, id: Uuid, status: &str) -> Result<order::Model, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows.get_mut(&id).ok_or_else(|| ServiceError::not_found("order"))?;
            row.status = status.to_string();
            Ok(row.clone())
        }

        async fn record_transaction(
            &self,
            order_id: Uuid,
            kind: &str,
            amount_cents: i64,
            reference: Option<&str>,
        ) -> Result<order_transaction::Model, ServiceError> {
            let model = order_transaction::Model {
                id: Uuid::new_v4(),
                order_id,
                kind: kind.to_string(),
                amount_cents,
                reference: reference.map(str::to_string),
                created_at: Utc::now().into(),
            };
            self.ledger.lock().unwrap().push(model.clone());
            Ok(model)
        }

        async fn transactions(&self, order_id: Uuid) -> Result<Vec<order_transaction::Model>, ServiceError> {
            Ok(self
                .ledger
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.order_id == order_id)
                .cloned()
                .collect())
        }

        async fn increment_customer_orders(&self, customer_id: Uuid) -> Result<(), ServiceError> {
            *self.order_counts.lock().unwrap().entry(customer_id).or_insert(0) += 1;
            Ok(())
        }
    }
}
