use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use uuid::Uuid;

use models::address;

use crate::errors::ServiceError;

#[derive(Clone, Debug)]
pub struct NewAddress {
    pub customer_id: Uuid,
    pub kind: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub country: String,
    pub is_default: bool,
}

#[async_trait]
pub trait AddressRepository: Send + Sync {
    async fn insert(&self, input: &NewAddress) -> Result<address::Model, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<address::Model>, ServiceError>;
    async fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<address::Model>, ServiceError>;
    async fn count_by_customer_and_kind(&self, customer_id: Uuid, kind: &str) -> Result<u64, ServiceError>;
    /// Drop the default flag from every address of this customer and kind.
    async fn clear_default(&self, customer_id: Uuid, kind: &str) -> Result<(), ServiceError>;
    async fn set_default_flag(&self, id: Uuid, is_default: bool) -> Result<address::Model, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmAddressRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl AddressRepository for SeaOrmAddressRepository {
    async fn insert(&self, input: &NewAddress) -> Result<address::Model, ServiceError> {
        let now = Utc::now();
        let am = address::ActiveModel {
            id: Set(Uuid::new_v4()),
            customer_id: Set(input.customer_id),
            kind: Set(input.kind.clone()),
            line1: Set(input.line1.clone()),
            line2: Set(input.line2.clone()),
            city: Set(input.city.clone()),
            region: Set(input.region.clone()),
            postal_code: Set(input.postal_code.clone()),
            country: Set(input.country.clone()),
            is_default: Set(input.is_default),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        am.insert(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<address::Model>, ServiceError> {
        address::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<address::Model>, ServiceError> {
        address::Entity::find()
            .filter(address::Column::CustomerId.eq(customer_id))
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn count_by_customer_and_kind(&self, customer_id: Uuid, kind: &str) -> Result<u64, ServiceError> {
        address::Entity::find()
            .filter(address::Column::CustomerId.eq(customer_id))
            .filter(address::Column::Kind.eq(kind))
            .count(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn clear_default(&self, customer_id: Uuid, kind: &str) -> Result<(), ServiceError> {
        use sea_orm::sea_query::Expr;
        address::Entity::update_many()
            .col_expr(address::Column::IsDefault, Expr::value(false))
            .filter(address::Column::CustomerId.eq(customer_id))
            .filter(address::Column::Kind.eq(kind))
            .filter(address::Column::IsDefault.eq(true))
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(())
    }

    async fn set_default_flag(&self, id: Uuid, is_default: bool) -> Result<address::Model, ServiceError> {
        let found = address::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .ok_or_else(|| ServiceError::not_found("address"))?;
        let mut am: address::ActiveModel = found.into();
        am.is_default = Set(is_default);
        am.updated_at = Set(Utc::now().into());
        am.update(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let res = address::Entity::delete_by_id(id)
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
    pub struct MockAddressRepo {
        rows: Mutex<HashMap<Uuid, address::Model>>,
    }

    #[async_trait]
    impl AddressRepository for MockAddressRepo {
        async fn insert(&self, input: &NewAddress) -> Result<address::Model, ServiceError> {
            let now = Utc::now();
            let model = address::Model {
                id: Uuid::new_v4(),
                customer_id: input.customer_id,
                kind: input.kind.clone(),
                line1: input.line1.clone(),
                line2: input.line2.clone(),
                city: input.city.clone(),
                region: input.region.clone(),
                postal_code: input.postal_code.clone(),
                country: input.country.clone(),
                is_default: input.is_default,
                created_at: now.into(),
                updated_at: now.into(),
            };
            self.rows.lock().unwrap().insert(model.id, model.clone());
            Ok(model)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<address::Model>, ServiceError> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<address::Model>, ServiceError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|a| a.customer_id == customer_id)
                .cloned()
                .collect())
        }

        async fn count_by_customer_and_kind(&self, customer_id: Uuid, kind: &str) -> Result<u64, ServiceError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|a| a.customer_id == customer_id && a.kind == kind)
                .count() as u64)
        }

        async fn clear_default(&self, customer_id: Uuid, kind: &str) -> Result<(), ServiceError> {
            for row in self.rows.lock().unwrap().values_mut() {
                if row.customer_id == customer_id && row.kind == kind {
                    row.is_default = false;
                }
            }
            Ok(())
        }

        async fn set_default_flag(&self, id: Uuid, is_default: bool) -> Result<address::Model, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows.get_mut(&id).ok_or_else(|| ServiceError::not_found("address"))?;
            row.is_default = is_default;
            Ok(row.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
            Ok(self.rows.lock().unwrap().remove(&id).is_some())
        }
    }
}
