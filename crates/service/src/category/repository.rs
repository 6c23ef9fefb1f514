use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use uuid::Uuid;

use models::{category, product};

use crate::errors::ServiceError;

#[derive(Clone, Debug)]
pub struct NewCategory {
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub description: Option<String>,
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn insert(&self, input: &NewCategory, slug: &str) -> Result<category::Model, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<category::Model>, ServiceError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<category::Model>, ServiceError>;
    async fn slug_exists(&self, slug: &str) -> Result<bool, ServiceError>;
    async fn list_active(&self) -> Result<Vec<category::Model>, ServiceError>;
    async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        description: Option<Option<&str>>,
        active: Option<bool>,
    ) -> Result<category::Model, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
    async fn product_count(&self, id: Uuid) -> Result<u64, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmCategoryRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl CategoryRepository for SeaOrmCategoryRepository {
    async fn insert(&self, input: &NewCategory, slug: &str) -> Result<category::Model, ServiceError> {
        let now = Utc::now();
        let am = category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.clone()),
            slug: Set(slug.to_string()),
            parent_id: Set(input.parent_id),
            description: Set(input.description.clone()),
            active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        am.insert(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<category::Model>, ServiceError> {
        category::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<category::Model>, ServiceError> {
        category::Entity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, ServiceError> {
        let count = category::Entity::find()
            .filter(category::Column::Slug.eq(slug))
            .count(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(count > 0)
    }

    async fn list_active(&self) -> Result<Vec<category::Model>, ServiceError> {
        category::Entity::find()
            .filter(category::Column::Active.eq(true))
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        description: Option<Option<&str>>,
        active: Option<bool>,
    ) -> Result<category::Model, ServiceError> {
        let found = category::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .ok_or_else(|| ServiceError::not_found("category"))?;
        let mut am: category::ActiveModel = found.into();
        if let Some(name) = name {
            am.name = Set(name.to_string());
        }
        if let Some(description) = description {
            am.description = Set(description.map(str::to_string));
        }
        if let Some(active) = active {
            am.active = Set(active);
        }
        am.updated_at = Set(Utc::now().into());
        am.update(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let res = category::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(res.rows_affected > 0)
    }

    async fn product_count(&self, id: Uuid) -> Result<u64, ServiceError> {
        product::Entity::find()
            .filter(product::Column::CategoryId.eq(id))
            .count(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockCategoryRepo {
        rows: Mutex<HashMap<Uuid, category::Model>>,
        pub products: Mutex<HashMap<Uuid, u64>>,
    }

    #[async_trait]
    impl CategoryRepository for MockCategoryRepo {
        async fn insert(&self, input: &NewCategory, slug: &str) -> Result<category::Model, ServiceError> {
            let now = Utc::now();
            let model = category::Model {
                id: Uuid::new_v4(),
                name: input.name.clone(),
                slug: slug.to_string(),
                parent_id: input.parent_id,
                description: input.description.clone(),
                active: true,
                created_at: now.into(),
                updated_at: now.into(),
            };
            self.rows.lock().unwrap().insert(model.id, model.clone());
            Ok(model)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<category::Model>, ServiceError> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn find_by_slug(&self, slug: &str) -> Result<Option<category::Model>, ServiceError> {
            Ok(self.rows.lock().unwrap().values().find(|c| c.slug == slug).cloned())
        }

        async fn slug_exists(&self, slug: &str) -> Result<bool, ServiceError> {
            Ok(self.rows.lock().unwrap().values().any(|c| c.slug == slug))
        }

        async fn list_active(&self) -> Result<Vec<category::Model>, ServiceError> {
            Ok(self.rows.lock().unwrap().values().filter(|c| c.active).cloned().collect())
        }

        async fn update(
            &self,
            id: Uuid,
            name: Option<&str>,
            description: Option<Option<&str>>,
            active: Option<bool>,
        ) -> Result<category::Model, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows.get_mut(&id).ok_or_else(|| ServiceError::not_found("category"))?;
            if let Some(name) = name {
                row.name = name.to_string();
            }
            if let Some(description) = description {
                row.description = description.map(str::to_string);
            }
            if let Some(active) = active {
                row.active = active;
            }
            Ok(row.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
            Ok(self.rows.lock().unwrap().remove(&id).is_some())
        }

        async fn product_count(&self, id: Uuid) -> Result<u64, ServiceError> {
            Ok(*self.products.lock().unwrap().get(&id).unwrap_or(&0))
        }
    }
}
