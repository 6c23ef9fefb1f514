use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use uuid::Uuid;

use models::provider_location;

use crate::errors::ServiceError;

#[derive(Clone, Debug)]
pub struct NewLocation {
    pub provider_id: Uuid,
    pub label: String,
    pub city: String,
    pub country: String,
    pub is_primary: bool,
}

#[async_trait]
pub trait ProviderLocationRepository: Send + Sync {
    async fn insert(&self, input: &NewLocation) -> Result<provider_location::Model, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<provider_location::Model>, ServiceError>;
    async fn list_by_provider(&self, provider_id: Uuid) -> Result<Vec<provider_location::Model>, ServiceError>;
    /// Whether the provider already has a primary location, optionally
    /// ignoring one row (for updates).
    async fn primary_exists(&self, provider_id: Uuid, exclude: Option<Uuid>) -> Result<bool, ServiceError>;
    async fn update(
        &self,
        id: Uuid,
        label: Option<&str>,
        city: Option<&str>,
        country: Option<&str>,
        is_primary: Option<bool>,
    ) -> Result<provider_location::Model, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmProviderLocationRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl ProviderLocationRepository for SeaOrmProviderLocationRepository {
    async fn insert(&self, input: &NewLocation) -> Result<provider_location::Model, ServiceError> {
        let now = Utc::now();
        let am = provider_location::ActiveModel {
            id: Set(Uuid::new_v4()),
            provider_id: Set(input.provider_id),
            label: Set(input.label.clone()),
            city: Set(input.city.clone()),
            country: Set(input.country.clone()),
            is_primary: Set(input.is_primary),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        am.insert(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<provider_location::Model>, ServiceError> {
        provider_location::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn list_by_provider(&self, provider_id: Uuid) -> Result<Vec<provider_location::Model>, ServiceError> {
        provider_location::Entity::find()
            .filter(provider_location::Column::ProviderId.eq(provider_id))
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn primary_exists(&self, provider_id: Uuid, exclude: Option<Uuid>) -> Result<bool, ServiceError> {
        let mut query = provider_location::Entity::find()
            .filter(provider_location::Column::ProviderId.eq(provider_id))
            .filter(provider_location::Column::IsPrimary.eq(true));
        if let Some(exclude) = exclude {
            query = query.filter(provider_location::Column::Id.ne(exclude));
        }
        let count = query
            .count(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(count > 0)
    }

    async fn update(
        &self,
        id: Uuid,
        label: Option<&str>,
        city: Option<&str>,
        country: Option<&str>,
        is_primary: Option<bool>,
    ) -> Result<provider_location::Model, ServiceError> {
        let found = provider_location::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .ok_or_else(|| ServiceError::not_found("provider location"))?;
        let mut am: provider_location::ActiveModel = found.into();
        if let Some(label) = label {
            am.label = Set(label.to_string());
        }
        if let Some(city) = city {
            am.city = Set(city.to_string());
        }
        if let Some(country) = country {
            am.country = Set(country.to_string());
        }
        if let Some(is_primary) = is_primary {
            am.is_primary = Set(is_primary);
        }
        am.updated_at = Set(Utc::now().into());
        am.update(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let res = provider_location::Entity::delete_by_id(id)
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
    pub struct MockLocationRepo {
        rows: Mutex<HashMap<Uuid, provider_location::Model>>,
    }

    #[async_trait]
    impl ProviderLocationRepository for MockLocationRepo {
        async fn insert(&self, input: &NewLocation) -> Result<provider_location::Model, ServiceError> {
            let now = Utc::now();
            let model = provider_location::Model {
                id: Uuid::new_v4(),
                provider_id: input.provider_id,
                label: input.label.clone(),
                city: input.city.clone(),
                country: input.country.clone(),
                is_primary: input.is_primary,
                created_at: now.into(),
                updated_at: now.into(),
            };
            self.rows.lock().unwrap().insert(model.id, model.clone());
            Ok(model)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<provider_location::Model>, ServiceError> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn list_by_provider(&self, provider_id: Uuid) -> Result<Vec<provider_location::Model>, ServiceError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|l| l.provider_id == provider_id)
                .cloned()
                .collect())
        }

        async fn primary_exists(&self, provider_id: Uuid, exclude: Option<Uuid>) -> Result<bool, ServiceError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .any(|l| l.provider_id == provider_id && l.is_primary && Some(l.id) != exclude))
        }

        async fn update(
            &self,
            id: Uuid,
            label: Option<&str>,
            city: Option<&str>,
            country: Option<&str>,
            is_primary: Option<bool>,
        ) -> Result<provider_location::Model, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows
                .get_mut(&id)
                .ok_or_else(|| ServiceError::not_found("provider location"))?;
            if let Some(label) = label {
                row.label = label.to_string();
            }
            if let Some(city) = city {
                row.city = city.to_string();
            }
            if let Some(country) = country {
                row.country = country.to_string();
            }
            if let Some(is_primary) = is_primary {
                row.is_primary = is_primary;
            }
            Ok(row.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
            Ok(self.rows.lock().unwrap().remove(&id).is_some())
        }
    }
}
