use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use models::customer_communication;

use crate::errors::ServiceError;

#[derive(Clone, Debug)]
pub struct NewCommunication {
    pub customer_id: Uuid,
    pub channel: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait CommunicationRepository: Send + Sync {
    async fn insert(&self, input: &NewCommunication) -> Result<customer_communication::Model, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<customer_communication::Model>, ServiceError>;
    async fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<customer_communication::Model>, ServiceError>;
    async fn set_status(
        &self,
        id: Uuid,
        status: &str,
        sent_at: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<customer_communication::Model, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmCommunicationRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl CommunicationRepository for SeaOrmCommunicationRepository {
    async fn insert(&self, input: &NewCommunication) -> Result<customer_communication::Model, ServiceError> {
        let now = Utc::now();
        let am = customer_communication::ActiveModel {
            id: Set(Uuid::new_v4()),
            customer_id: Set(input.customer_id),
            channel: Set(input.channel.clone()),
            subject: Set(input.subject.clone()),
            body: Set(input.body.clone()),
            status: Set("draft".to_string()),
            sent_at: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        am.insert(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<customer_communication::Model>, ServiceError> {
        customer_communication::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<customer_communication::Model>, ServiceError> {
        customer_communication::Entity::find()
            .filter(customer_communication::Column::CustomerId.eq(customer_id))
            .order_by_desc(customer_communication::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: &str,
        sent_at: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<customer_communication::Model, ServiceError> {
        let found = customer_communication::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .ok_or_else(|| ServiceError::not_found("communication"))?;
        let mut am: customer_communication::ActiveModel = found.into();
        am.status = Set(status.to_string());
        if let Some(ts) = sent_at {
            am.sent_at = Set(Some(ts.into()));
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
    pub struct MockCommunicationRepo {
        rows: Mutex<HashMap<Uuid, customer_communication::Model>>,
    }

    #[async_trait]
    impl CommunicationRepository for MockCommunicationRepo {
        async fn insert(&self, input: &NewCommunication) -> Result<customer_communication::Model, ServiceError> {
            let now = Utc::now();
            let model = customer_communication::Model {
                id: Uuid::new_v4(),
                customer_id: input.customer_id,
                channel: input.channel.clone(),
                subject: input.subject.clone(),
                body: input.body.clone(),
                status: "draft".into(),
                sent_at: None,
                created_at: now.into(),
                updated_at: now.into(),
            };
            self.rows.lock().unwrap().insert(model.id, model.clone());
            Ok(model)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<customer_communication::Model>, ServiceError> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<customer_communication::Model>, ServiceError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|c| c.customer_id == customer_id)
                .cloned()
                .collect())
        }

        async fn set_status(
            &self,
            id: Uuid,
            status: &str,
            sent_at: Option<chrono::DateTime<chrono::Utc>>,
        ) -> Result<customer_communication::Model, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows.get_mut(&id).ok_or_else(|| ServiceError::not_found("communication"))?;
            row.status = status.to_string();
            if let Some(ts) = sent_at {
                row.sent_at = Some(ts.into());
            }
            Ok(row.clone())
        }
    }
}
