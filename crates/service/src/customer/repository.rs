use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use common::pagination::Pagination;
use models::{customer, user};

use crate::errors::ServiceError;

/// Input for registering a customer together with its account.
#[derive(Clone, Debug)]
pub struct NewCustomer {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Create the customer and its backing account atomically.
    async fn create_with_account(&self, input: &NewCustomer) -> Result<customer::Model, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<customer::Model>, ServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<customer::Model>, ServiceError>;
    async fn search(&self, query: &str) -> Result<Vec<customer::Model>, ServiceError>;
    async fn list_paginated(&self, opts: Pagination) -> Result<Vec<customer::Model>, ServiceError>;
    async fn update_profile(
        &self,
        id: Uuid,
        first_name: &str,
        last_name: &str,
        phone: Option<&str>,
    ) -> Result<customer::Model, ServiceError>;
    async fn add_points(&self, id: Uuid, delta: i32) -> Result<customer::Model, ServiceError>;
    async fn soft_delete(&self, id: Uuid) -> Result<(), ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmCustomerRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmCustomerRepository {
    async fn required(&self, id: Uuid) -> Result<customer::Model, ServiceError> {
        customer::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .ok_or_else(|| ServiceError::not_found("customer"))
    }
}

#[async_trait]
impl CustomerRepository for SeaOrmCustomerRepository {
    async fn create_with_account(&self, input: &NewCustomer) -> Result<customer::Model, ServiceError> {
        let display_name = format!("{} {}", input.first_name, input.last_name);
        let txn = self.db.begin().await.map_err(|e| ServiceError::Db(e.to_string()))?;

        let account = user::find_or_create(&txn, &input.email, &display_name).await?;
        let now = Utc::now();
        let am = customer::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(account.id),
            first_name: Set(input.first_name.clone()),
            last_name: Set(input.last_name.clone()),
            email: Set(input.email.clone()),
            phone: Set(input.phone.clone()),
            loyalty_points: Set(0),
            total_orders: Set(0),
            status: Set("active".to_string()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            deleted_at: Set(None),
        };
        let created = match am.insert(&txn).await {
            Ok(model) => model,
            Err(e) => {
                // Best-effort rollback; the original error is the one to report.
                let _ = txn.rollback().await;
                return Err(ServiceError::Db(e.to_string()));
            }
        };
        txn.commit().await.map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<customer::Model>, ServiceError> {
        customer::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<customer::Model>, ServiceError> {
        customer::Entity::find()
            .filter(customer::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn search(&self, query: &str) -> Result<Vec<customer::Model>, ServiceError> {
        let pattern = format!("%{}%", query);
        customer::Entity::find()
            .filter(
                Condition::any()
                    .add(customer::Column::FirstName.like(&pattern))
                    .add(customer::Column::LastName.like(&pattern))
                    .add(customer::Column::Email.like(&pattern)),
            )
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn list_paginated(&self, opts: Pagination) -> Result<Vec<customer::Model>, ServiceError> {
        let (page_idx, per_page) = opts.normalize();
        customer::Entity::find()
            .filter(customer::Column::DeletedAt.is_null())
            .paginate(&self.db, per_page)
            .fetch_page(page_idx)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        first_name: &str,
        last_name: &str,
        phone: Option<&str>,
    ) -> Result<customer::Model, ServiceError> {
        let mut am: customer::ActiveModel = self.required(id).await?.into();
        am.first_name = Set(first_name.to_string());
        am.last_name = Set(last_name.to_string());
        am.phone = Set(phone.map(str::to_string));
        am.updated_at = Set(Utc::now().into());
        am.update(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn add_points(&self, id: Uuid, delta: i32) -> Result<customer::Model, ServiceError> {
        let found = self.required(id).await?;
        let next = found.loyalty_points + delta;
        let mut am: customer::ActiveModel = found.into();
        am.loyalty_points = Set(next);
        am.updated_at = Set(Utc::now().into());
        am.update(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn soft_delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let mut am: customer::ActiveModel = self.required(id).await?.into();
        let now = Utc::now();
        am.deleted_at = Set(Some(now.into()));
        am.updated_at = Set(now.into());
        am.update(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(())
    }
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockCustomerRepo {
        rows: Mutex<HashMap<Uuid, customer::Model>>,
        pub deleted: Mutex<Vec<Uuid>>,
    }

    impl MockCustomerRepo {
        /// Place a customer with given counters, bypassing the create path.
        pub fn seed(&self, loyalty_points: i32, total_orders: i32) -> customer::Model {
            let now = Utc::now();
            let model = customer::Model {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                email: format!("ada_{}@example.com", Uuid::new_v4()),
                phone: None,
                loyalty_points,
                total_orders,
                status: "active".into(),
                created_at: now.into(),
                updated_at: now.into(),
                deleted_at: None,
            };
            self.rows.lock().unwrap().insert(model.id, model.clone());
            model
        }
    }

    #[async_trait]
    impl CustomerRepository for MockCustomerRepo {
        async fn create_with_account(&self, input: &NewCustomer) -> Result<customer::Model, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            if rows.values().any(|c| c.email == input.email) {
                return Err(ServiceError::Conflict("email already registered".into()));
            }
            let now = Utc::now();
            let model = customer::Model {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                first_name: input.first_name.clone(),
                last_name: input.last_name.clone(),
                email: input.email.clone(),
                phone: input.phone.clone(),
                loyalty_points: 0,
                total_orders: 0,
                status: "active".into(),
                created_at: now.into(),
                updated_at: now.into(),
                deleted_at: None,
            };
            rows.insert(model.id, model.clone());
            Ok(model)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<customer::Model>, ServiceError> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<customer::Model>, ServiceError> {
            Ok(self.rows.lock().unwrap().values().find(|c| c.email == email).cloned())
        }

        async fn search(&self, query: &str) -> Result<Vec<customer::Model>, ServiceError> {
            let q = query.to_lowercase();
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|c| {
                    c.first_name.to_lowercase().contains(&q)
                        || c.last_name.to_lowercase().contains(&q)
                        || c.email.to_lowercase().contains(&q)
                })
                .cloned()
                .collect())
        }

        async fn list_paginated(&self, opts: Pagination) -> Result<Vec<customer::Model>, ServiceError> {
            let (page_idx, per_page) = opts.normalize();
            let mut all: Vec<_> = self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|c| c.deleted_at.is_none())
                .cloned()
                .collect();
            all.sort_by_key(|c| c.id);
            Ok(all
                .into_iter()
                .skip((page_idx * per_page) as usize)
                .take(per_page as usize)
                .collect())
        }

        async fn update_profile(
            &self,
            id: Uuid,
            first_name: &str,
            last_name: &str,
            phone: Option<&str>,
        ) -> Result<customer::Model, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows.get_mut(&id).ok_or_else(|| ServiceError::not_found("customer"))?;
            row.first_name = first_name.to_string();
            row.last_name = last_name.to_string();
            row.phone = phone.map(str::to_string);
            Ok(row.clone())
        }

        async fn add_points(&self, id: Uuid, delta: i32) -> Result<customer::Model, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows.get_mut(&id).ok_or_else(|| ServiceError::not_found("customer"))?;
            row.loyalty_points += delta;
            Ok(row.clone())
        }

        async fn soft_delete(&self, id: Uuid) -> Result<(), ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows.get_mut(&id).ok_or_else(|| ServiceError::not_found("customer"))?;
            row.deleted_at = Some(Utc::now().into());
            self.deleted.lock().unwrap().push(id);
            Ok(())
        }
    }
}
