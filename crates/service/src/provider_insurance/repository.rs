use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use models::provider_insurance;

use crate::errors::ServiceError;

#[derive(Clone, Debug)]
pub struct NewInsurance {
    pub provider_id: Uuid,
    pub policy_number: String,
    pub coverage_amount_cents: i64,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
}

#[async_trait]
pub trait ProviderInsuranceRepository: Send + Sync {
    async fn insert(&self, input: &NewInsurance) -> Result<provider_insurance::Model, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<provider_insurance::Model>, ServiceError>;
    async fn list_by_provider(&self, provider_id: Uuid) -> Result<Vec<provider_insurance::Model>, ServiceError>;
    async fn set_status(&self, id: Uuid, status: &str) -> Result<provider_insurance::Model, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmProviderInsuranceRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl ProviderInsuranceRepository for SeaOrmProviderInsuranceRepository {
    async fn insert(&self, input: &NewInsurance) -> Result<provider_insurance::Model, ServiceError> {
        let now = Utc::now();
        let am = provider_insurance::ActiveModel {
            id: Set(Uuid::new_v4()),
            provider_id: Set(input.provider_id),
            policy_number: Set(input.policy_number.clone()),
            coverage_amount_cents: Set(input.coverage_amount_cents),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            status: Set("pending".to_string()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        am.insert(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<provider_insurance::Model>, ServiceError> {
        provider_insurance::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn list_by_provider(&self, provider_id: Uuid) -> Result<Vec<provider_insurance::Model>, ServiceError> {
        provider_insurance::Entity::find()
            .filter(provider_insurance::Column::ProviderId.eq(provider_id))
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn set_status(&self, id: Uuid, status: &str) -> Result<provider_insurance::Model, ServiceError> {
        let found = provider_insurance::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .ok_or_else(|| ServiceError::not_found("insurance"))?;
        let mut am: provider_insurance::ActiveModel = found.into();
        am.status = Set(status.to_string());
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
    pub struct MockInsuranceRepo {
        rows: Mutex<HashMap<Uuid, provider_insurance::Model>>,
    }

    #[async_trait]
    impl ProviderInsuranceRepository for MockInsuranceRepo {
        async fn insert(&self, input: &NewInsurance) -> Result<provider_insurance::Model, ServiceError> {
            let now = Utc::now();
            let model = provider_insurance::Model {
                id: Uuid::new_v4(),
                provider_id: input.provider_id,
                policy_number: input.policy_number.clone(),
                coverage_amount_cents: input.coverage_amount_cents,
                start_date: input.start_date,
                end_date: input.end_date,
                status: "pending".into(),
                created_at: now.into(),
                updated_at: now.into(),
            };
            self.rows.lock().unwrap().insert(model.id, model.clone());
            Ok(model)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<provider_insurance::Model>, ServiceError> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn list_by_provider(&self, provider_id: Uuid) -> Result<Vec<provider_insurance::Model>, ServiceError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|i| i.provider_id == provider_id)
                .cloned()
                .collect())
        }

        async fn set_status(&self, id: Uuid, status: &str) -> Result<provider_insurance::Model, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows.get_mut(&id).ok_or_else(|| ServiceError::not_found("insurance"))?;
            row.status = status.to_string();
            Ok(row.clone())
        }
    }
}
