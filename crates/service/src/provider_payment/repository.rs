use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use models::provider_payment;

use crate::errors::ServiceError;

#[async_trait]
pub trait ProviderPaymentRepository: Send + Sync {
    async fn insert(
        &self,
        provider_id: Uuid,
        amount_cents: i64,
        currency: &str,
    ) -> Result<provider_payment::Model, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<provider_payment::Model>, ServiceError>;
    async fn list_by_provider(&self, provider_id: Uuid) -> Result<Vec<provider_payment::Model>, ServiceError>;
    async fn set_amount(&self, id: Uuid, amount_cents: i64) -> Result<provider_payment::Model, ServiceError>;
    async fn set_status(
        &self,
        id: Uuid,
        status: &str,
        processed_at: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<provider_payment::Model, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmProviderPaymentRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl ProviderPaymentRepository for SeaOrmProviderPaymentRepository {
    async fn insert(
        &self,
        provider_id: Uuid,
        amount_cents: i64,
        currency: &str,
    ) -> Result<provider_payment::Model, ServiceError> {
        let now = Utc::now();
        let am = provider_payment::ActiveModel {
            id: Set(Uuid::new_v4()),
            provider_id: Set(provider_id),
            amount_cents: Set(amount_cents),
            currency: Set(currency.to_string()),
            status: Set("pending".to_string()),
            processed_at: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        am.insert(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<provider_payment::Model>, ServiceError> {
        provider_payment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn list_by_provider(&self, provider_id: Uuid) -> Result<Vec<provider_payment::Model>, ServiceError> {
        provider_payment::Entity::find()
            .filter(provider_payment::Column::ProviderId.eq(provider_id))
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn set_amount(&self, id: Uuid, amount_cents: i64) -> Result<provider_payment::Model, ServiceError> {
        let found = self.required(id).await?;
        let mut am: provider_payment::ActiveModel = found.into();
        am.amount_cents = Set(amount_cents);
        am.updated_at = Set(Utc::now().into());
        am.update(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: &str,
        processed_at: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<provider_payment::Model, ServiceError> {
        let found = self.required(id).await?;
        let mut am: provider_payment::ActiveModel = found.into();
        am.status = Set(status.to_string());
        if let Some(ts) = processed_at {
            am.processed_at = Set(Some(ts.into()));
        }
        am.updated_at = Set(Utc::now().into());
        am.update(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }
}

impl SeaOrmProviderPaymentRepository {
    async fn required(&self, id: Uuid) -> Result<provider_payment::Model, ServiceError> {
        provider_payment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .ok_or_else(|| ServiceError::not_found("payment"))
    }
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockPaymentRepo {
        rows: Mutex<HashMap<Uuid, provider_payment::Model>>,
    }

    #[async_trait]
    impl ProviderPaymentRepository for MockPaymentRepo {
        async fn insert(
            &self,
            provider_id: Uuid,
            amount_cents: i64,
            currency: &str,
        ) -> Result<provider_payment::Model, ServiceError> {
            let now = Utc::now();
            let model = provider_payment::Model {
                id: Uuid::new_v4(),
                provider_id,
                amount_cents,
                currency: currency.to_string(),
                status: "pending".into(),
                processed_at: None,
                created_at: now.into(),
                updated_at: now.into(),
            };
            self.rows.lock().unwrap().insert(model.id, model.clone());
            Ok(model)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<provider_payment::Model>, ServiceError> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn list_by_provider(&self, provider_id: Uuid) -> Result<Vec<provider_payment::Model>, ServiceError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|p| p.provider_id == provider_id)
                .cloned()
                .collect())
        }

        async fn set_amount(&self, id: Uuid, amount_cents: i64) -> Result<provider_payment::Model, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows.get_mut(&id).ok_or_else(|| ServiceError::not_found("payment"))?;
            row.amount_cents = amount_cents;
            Ok(row.clone())
        }

        async fn set_status(
            &self,
            id: Uuid,
            status: &str,
            processed_at: Option<chrono::DateTime<chrono::Utc>>,
        ) -> Result<provider_payment::Model, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows.get_mut(&id).ok_or_else(|| ServiceError::not_found("payment"))?;
            row.status = status.to_string();
            if let Some(ts) = processed_at {
                row.processed_at = Some(ts.into());
            }
            Ok(row.clone())
        }
    }
}
