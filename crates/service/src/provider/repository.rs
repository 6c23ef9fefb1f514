use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use models::provider;

use crate::errors::ServiceError;

#[async_trait]
pub trait ProviderRepository: Send + Sync {
    async fn insert(&self, name: &str, contact_email: &str) -> Result<provider::Model, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<provider::Model>, ServiceError>;
    async fn list(&self) -> Result<Vec<provider::Model>, ServiceError>;
    async fn set_status(&self, id: Uuid, status: &str) -> Result<provider::Model, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmProviderRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl ProviderRepository for SeaOrmProviderRepository {
    async fn insert(&self, name: &str, contact_email: &str) -> Result<provider::Model, ServiceError> {
        let now = Utc::now();
        let am = provider::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            contact_email: Set(contact_email.to_string()),
            status: Set("pending".to_string()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        am.insert(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<provider::Model>, ServiceError> {
        provider::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn list(&self) -> Result<Vec<provider::Model>, ServiceError> {
        provider::Entity::find()
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn set_status(&self, id: Uuid, status: &str) -> Result<provider::Model, ServiceError> {
        let found = provider::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .ok_or_else(|| ServiceError::not_found("provider"))?;
        let mut am: provider::ActiveModel = found.into();
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
    pub struct MockProviderRepo {
        rows: Mutex<HashMap<Uuid, provider::Model>>,
    }

    impl MockProviderRepo {
        /// Place a provider directly in a given status.
        pub async fn seed(&self, name: &str, contact_email: &str, status: &str) -> provider::Model {
            let now = Utc::now();
            let model = provider::Model {
                id: Uuid::new_v4(),
                name: name.to_string(),
                contact_email: contact_email.to_string(),
                status: status.to_string(),
                created_at: now.into(),
                updated_at: now.into(),
            };
            self.rows.lock().unwrap().insert(model.id, model.clone());
            model
        }
    }

    #[async_trait]
    impl ProviderRepository for MockProviderRepo {
        async fn insert(&self, name: &str, contact_email: &str) -> Result<provider::Model, ServiceError> {
            let now = Utc::now();
            let model = provider::Model {
                id: Uuid::new_v4(),
                name: name.to_string(),
                contact_email: contact_email.to_string(),
                status: "pending".into(),
                created_at: now.into(),
                updated_at: now.into(),
            };
            self.rows.lock().unwrap().insert(model.id, model.clone());
            Ok(model)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<provider::Model>, ServiceError> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn list(&self) -> Result<Vec<provider::Model>, ServiceError> {
            Ok(self.rows.lock().unwrap().values().cloned().collect())
        }

        async fn set_status(&self, id: Uuid, status: &str) -> Result<provider::Model, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows.get_mut(&id).ok_or_else(|| ServiceError::not_found("provider"))?;
            row.status = status.to_string();
            Ok(row.clone())
        }
    }
}
