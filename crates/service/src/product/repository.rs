use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use models::product;

use crate::errors::ServiceError;

#[derive(Clone, Debug)]
pub struct NewProduct {
    pub category_id: Uuid,
    pub provider_id: Uuid,
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub stock: Option<i32>,
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn insert(&self, input: &NewProduct, stock: i32) -> Result<product::Model, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<product::Model>, ServiceError>;
    async fn sku_exists(&self, provider_id: Uuid, sku: &str) -> Result<bool, ServiceError>;
    async fn list_by_category(&self, category_id: Uuid) -> Result<Vec<product::Model>, ServiceError>;
    async fn search(&self, query: &str) -> Result<Vec<product::Model>, ServiceError>;
    async fn set_stock(&self, id: Uuid, stock: i32) -> Result<product::Model, ServiceError>;
    async fn set_price(&self, id: Uuid, price_cents: i64) -> Result<product::Model, ServiceError>;
    async fn set_active(&self, id: Uuid, active: bool) -> Result<product::Model, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmProductRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmProductRepository {
    async fn required(&self, id: Uuid) -> Result<product::Model, ServiceError> {
        product::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .ok_or_else(|| ServiceError::not_found("product"))
    }
}

#[async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn insert(&self, input: &NewProduct, stock: i32) -> Result<product::Model, ServiceError> {
        let now = Utc::now();
        let am = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            category_id: Set(input.category_id),
            provider_id: Set(input.provider_id),
            name: Set(input.name.clone()),
            sku: Set(input.sku.clone()),
            description: Set(input.description.clone()),
            price_cents: Set(input.price_cents),
            stock: Set(stock),
            active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        am.insert(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<product::Model>, ServiceError> {
        product::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn sku_exists(&self, provider_id: Uuid, sku: &str) -> Result<bool, ServiceError> {
        use sea_orm::PaginatorTrait;
        let count = product::Entity::find()
            .filter(product::Column::ProviderId.eq(provider_id))
            .filter(product::Column::Sku.eq(sku))
            .count(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(count > 0)
    }

    async fn list_by_category(&self, category_id: Uuid) -> Result<Vec<product::Model>, ServiceError> {
        product::Entity::find()
            .filter(product::Column::CategoryId.eq(category_id))
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn search(&self, query: &str) -> Result<Vec<product::Model>, ServiceError> {
        let pattern = format!("%{}%", query);
        product::Entity::find()
            .filter(
                Condition::any()
                    .add(product::Column::Name.like(&pattern))
                    .add(product::Column::Sku.like(&pattern)),
            )
            .filter(product::Column::Active.eq(true))
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn set_stock(&self, id: Uuid, stock: i32) -> Result<product::Model, ServiceError> {
        let mut am: product::ActiveModel = self.required(id).await?.into();
        am.stock = Set(stock);
        am.updated_at = Set(Utc::now().into());
        am.update(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn set_price(&self, id: Uuid, price_cents: i64) -> Result<product::Model, ServiceError> {
        let mut am: product::ActiveModel = self.required(id).await?.into();
        am.price_cents = Set(price_cents);
        am.updated_at = Set(Utc::now().into());
        am.update(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<product::Model, ServiceError> {
        let mut am: product::ActiveModel = self.required(id).await?.into();
        am.active = Set(active);
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
    pub struct MockProductRepo {
        rows: Mutex<HashMap<Uuid, product::Model>>,
    }

    #[async_trait]
    impl ProductRepository for MockProductRepo {
        async fn insert(&self, input: &NewProduct, stock: i32) -> Result<product::Model, ServiceError> {
            let now = Utc::now();
            let model = product::Model {
                id: Uuid::new_v4(),
                category_id: input.category_id,
                provider_id: input.provider_id,
                name: input.name.clone(),
                sku: input.sku.clone(),
                description: input.description.clone(),
                price_cents: input.price_cents,
                stock,
                active: true,
                created_at: now.into(),
                updated_at: now.into(),
            };
            self.rows.lock().unwrap().insert(model.id, model.clone());
            Ok(model)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<product::Model>, ServiceError> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn sku_exists(&self, provider_id: Uuid, sku: &str) -> Result<bool, ServiceError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .any(|p| p.provider_id == provider_id && p.sku == sku))
        }

        async fn list_by_category(&self, category_id: Uuid) -> Result<Vec<product::Model>, ServiceError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|p| p.category_id == category_id)
                .cloned()
                .collect())
        }

        async fn search(&self, query: &str) -> Result<Vec<product::Model>, ServiceError> {
            let q = query.to_lowercase();
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|p| {
                    p.active
                        && (p.name.to_lowercase().contains(&q) || p.sku.to_lowercase().contains(&q))
                })
                .cloned()
                .collect())
        }

        async fn set_stock(&self, id: Uuid, stock: i32) -> Result<product::Model, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows.get_mut(&id).ok_or_else(|| ServiceError::not_found("product"))?;
            row.stock = stock;
            Ok(row.clone())
        }

        async fn set_price(&self, id: Uuid, price_cents: i64) -> Result<product::Model, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows.get_mut(&id).ok_or_else(|| ServiceError::not_found("product"))?;
            row.price_cents = price_cents;
            Ok(row.clone())
        }

        async fn set_active(&self, id: Uuid, active: bool) -> Result<product::Model, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows.get_mut(&id).ok_or_else(|| ServiceError::not_found("product"))?;
            row.active = active;
            Ok(row.clone())
        }
    }
}
