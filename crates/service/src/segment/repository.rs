use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use models::customer_segment;

use crate::errors::ServiceError;

#[derive(Clone, Debug)]
pub struct NewSegment {
    pub name: String,
    pub segment_type: String,
    pub criteria: serde_json::Value,
}

#[async_trait]
pub trait CustomerSegmentRepository: Send + Sync {
    async fn insert(&self, input: &NewSegment) -> Result<customer_segment::Model, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<customer_segment::Model>, ServiceError>;
    async fn list_active(&self) -> Result<Vec<customer_segment::Model>, ServiceError>;
    async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        criteria: Option<&serde_json::Value>,
    ) -> Result<customer_segment::Model, ServiceError>;
    async fn set_active(&self, id: Uuid, active: bool) -> Result<customer_segment::Model, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmCustomerSegmentRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmCustomerSegmentRepository {
    async fn required(&self, id: Uuid) -> Result<customer_segment::Model, ServiceError> {
        customer_segment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .ok_or_else(|| ServiceError::not_found("segment"))
    }
}

#[async_trait]
impl CustomerSegmentRepository for SeaOrmCustomerSegmentRepository {
    async fn insert(&self, input: &NewSegment) -> Result<customer_segment::Model, ServiceError> {
        let now = Utc::now();
        let am = customer_segment::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.clone()),
            segment_type: Set(input.segment_type.clone()),
            criteria: Set(input.criteria.clone()),
            active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        am.insert(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<customer_segment::Model>, ServiceError> {
        customer_segment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn list_active(&self) -> Result<Vec<customer_segment::Model>, ServiceError> {
        customer_segment::Entity::find()
            .filter(customer_segment::Column::Active.eq(true))
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        criteria: Option<&serde_json::Value>,
    ) -> Result<customer_segment::Model, ServiceError> {
        let mut am: customer_segment::ActiveModel = self.required(id).await?.into();
        if let Some(name) = name {
            am.name = Set(name.to_string());
        }
        if let Some(criteria) = criteria {
            am.criteria = Set(criteria.clone());
        }
        am.updated_at = Set(Utc::now().into());
        am.update(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<customer_segment::Model, ServiceError> {
        let mut am: customer_segment::ActiveModel = self.required(id).await?.into();
        am.active = Set(active);
        am.updated_at = Set(Utc::now().into());
        am.update(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let res = customer_segment::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(res.rows_affected > 0)
    }
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockSegmentRepo {
        rows: Mutex<HashMap<Uuid, customer_segment::Model>>,
    }

    #[async_trait]
    impl CustomerSegmentRepository for MockSegmentRepo {
        async fn insert(&self, input: &NewSegment) -> Result<customer_segment::Model, ServiceError> {
            let now = Utc::now();
            let model = customer_segment::Model {
                id: Uuid::new_v4(),
                name: input.name.clone(),
                segment_type: input.segment_type.clone(),
                criteria: input.criteria.clone(),
                active: true,
                created_at: now.into(),
                updated_at: now.into(),
            };
            self.rows.lock().unwrap().insert(model.id, model.clone());
            Ok(model)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<customer_segment::Model>, ServiceError> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn list_active(&self) -> Result<Vec<customer_segment::Model>, ServiceError> {
            Ok(self.rows.lock().unwrap().values().filter(|s| s.active).cloned().collect())
        }

        async fn update(
            &self,
            id: Uuid,
            name: Option<&str>,
            criteria: Option<&serde_json::Value>,
        ) -> Result<customer_segment::Model, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows.get_mut(&id).ok_or_else(|| ServiceError::not_found("segment"))?;
            if let Some(name) = name {
                row.name = name.to_string();
            }
            if let Some(criteria) = criteria {
                row.criteria = criteria.clone();
            }
            Ok(row.clone())
        }

        async fn set_active(&self, id: Uuid, active: bool) -> Result<customer_segment::Model, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows.get_mut(&id).ok_or_else(|| ServiceError::not_found("segment"))?;
            row.active = active;
            Ok(row.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
            Ok(self.rows.lock().unwrap().remove(&id).is_some())
        }
    }
}
