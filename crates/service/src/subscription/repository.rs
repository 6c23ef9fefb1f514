use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use models::user_subscription;

use crate::errors::ServiceError;

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn insert(
        &self,
        customer_id: Uuid,
        plan: &str,
        ends_at: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<user_subscription::Model, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<user_subscription::Model>, ServiceError>;
    async fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<user_subscription::Model>, ServiceError>;
    async fn set_status(&self, id: Uuid, status: &str) -> Result<user_subscription::Model, ServiceError>;
    /// Status and term change together on renewal.
    async fn set_status_and_term(
        &self,
        id: Uuid,
        status: &str,
        ends_at: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<user_subscription::Model, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmSubscriptionRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmSubscriptionRepository {
    async fn required(&self, id: Uuid) -> Result<user_subscription::Model, ServiceError> {
        user_subscription::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .ok_or_else(|| ServiceError::not_found("subscription"))
    }
}

#[async_trait]
impl SubscriptionRepository for SeaOrmSubscriptionRepository {
    async fn insert(
        &self,
        customer_id: Uuid,
        plan: &str,
        ends_at: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<user_subscription::Model, ServiceError> {
        let now = Utc::now();
        let am = user_subscription::ActiveModel {
            id: Set(Uuid::new_v4()),
            customer_id: Set(customer_id),
            plan: Set(plan.to_string()),
            status: Set("active".to_string()),
            started_at: Set(now.into()),
            ends_at: Set(ends_at.map(Into::into)),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        am.insert(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<user_subscription::Model>, ServiceError> {
        user_subscription::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<user_subscription::Model>, ServiceError> {
        user_subscription::Entity::find()
            .filter(user_subscription::Column::CustomerId.eq(customer_id))
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn set_status(&self, id: Uuid, status: &str) -> Result<user_subscription::Model, ServiceError> {
        let mut am: user_subscription::ActiveModel = self.required(id).await?.into();
        am.status = Set(status.to_string());
        am.updated_at = Set(Utc::now().into());
        am.update(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn set_status_and_term(
        &self,
        id: Uuid,
        status: &str,
        ends_at: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<user_subscription::Model, ServiceError> {
        let mut am: user_subscription::ActiveModel = self.required(id).await?.into();
        am.status = Set(status.to_string());
        am.ends_at = Set(ends_at.map(Into::into));
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
    pub struct MockSubscriptionRepo {
        rows: Mutex<HashMap<Uuid, user_subscription::Model>>,
    }

    #[async_trait]
    impl SubscriptionRepository for MockSubscriptionRepo {
        async fn insert(
            &self,
            customer_id: Uuid,
            plan: &str,
            ends_at: Option<chrono::DateTime<chrono::Utc>>,
        ) -> Result<user_subscription::Model, ServiceError> {
            let now = Utc::now();
            let model = user_subscription::Model {
                id: Uuid::new_v4(),
                customer_id,
                plan: plan.to_string(),
                status: "active".into(),
                started_at: now.into(),
                ends_at: ends_at.map(Into::into),
                created_at: now.into(),
                updated_at: now.into(),
            };
            self.rows.lock().unwrap().insert(model.id, model.clone());
            Ok(model)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<user_subscription::Model>, ServiceError> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<user_subscription::Model>, ServiceError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|s| s.customer_id == customer_id)
                .cloned()
                .collect())
        }

        async fn set_status(&self, id: Uuid, status: &str) -> Result<user_subscription::Model, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows.get_mut(&id).ok_or_else(|| ServiceError::not_found("subscription"))?;
            row.status = status.to_string();
            Ok(row.clone())
        }

        async fn set_status_and_term(
            &self,
            id: Uuid,
            status: &str,
            ends_at: Option<chrono::DateTime<chrono::Utc>>,
        ) -> Result<user_subscription::Model, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows.get_mut(&id).ok_or_else(|| ServiceError::not_found("subscription"))?;
            row.status = status.to_string();
            row.ends_at = ends_at.map(Into::into);
            Ok(row.clone())
        }
    }
}
