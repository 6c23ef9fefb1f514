use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use common::pagination::Pagination;

use crate::customer::repository::{CustomerRepository, NewCustomer};
use crate::errors::ServiceError;

/// Customer registration, profile and loyalty rules.
pub struct CustomerService<R: CustomerRepository> {
    repo: Arc<R>,
}

impl<R: CustomerRepository> CustomerService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Register a customer; the backing account is created in the same
    /// transaction when missing.
    ///
    /// # Examples
    /// ```
    /// use service::customer::{CustomerService, NewCustomer, mock::MockCustomerRepo};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockCustomerRepo::default());
    /// let svc = CustomerService::new(repo);
    /// let input = NewCustomer { email: "ada@example.com".into(), first_name: "Ada".into(), last_name: "Lovelace".into(), phone: None };
    /// let customer = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(customer.email, "ada@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: NewCustomer) -> Result<models::customer::Model, ServiceError> {
        models::user::validate_email(&input.email)?;
        models::customer::validate_names(&input.first_name, &input.last_name)?;
        if self.repo.find_by_email(&input.email).await?.is_some() {
            return Err(ServiceError::Conflict("email already registered".into()));
        }
        let created = self.repo.create_with_account(&input).await?;
        info!(customer_id = %created.id, "customer_registered");
        Ok(created)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<models::customer::Model>, ServiceError> {
        self.repo.find_by_id(id).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<models::customer::Model>, ServiceError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::Validation("search query required".into()));
        }
        self.repo.search(trimmed).await
    }

    pub async fn list(&self, opts: Pagination) -> Result<Vec<models::customer::Model>, ServiceError> {
        self.repo.list_paginated(opts).await
    }

    pub async fn update_profile(
        &self,
        id: Uuid,
        first_name: &str,
        last_name: &str,
        phone: Option<&str>,
    ) -> Result<models::customer::Model, ServiceError> {
        models::customer::validate_names(first_name, last_name)?;
        self.repo.update_profile(id, first_name, last_name, phone).await
    }

    #[instrument(skip(self))]
    pub async fn award_points(&self, id: Uuid, points: i32) -> Result<models::customer::Model, ServiceError> {
        if points <= 0 {
            return Err(ServiceError::Validation("points must be positive".into()));
        }
        let updated = self.repo.add_points(id, points).await?;
        info!(customer_id = %id, points, balance = updated.loyalty_points, "loyalty_points_awarded");
        Ok(updated)
    }

    /// Soft-delete. Customers with order history or a points balance are
    /// retained.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let found = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("customer"))?;
        if found.total_orders > 0 || found.loyalty_points > 0 {
            return Err(ServiceError::Validation(
                "customer with orders or loyalty points cannot be deleted".into(),
            ));
        }
        self.repo.soft_delete(id).await?;
        info!(customer_id = %id, "customer_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::repository::mock::MockCustomerRepo;

    fn service() -> (CustomerService<MockCustomerRepo>, Arc<MockCustomerRepo>) {
        let repo = Arc::new(MockCustomerRepo::default());
        (CustomerService::new(repo.clone()), repo)
    }

    fn input(email: &str) -> NewCustomer {
        NewCustomer {
            email: email.to_string(),
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            phone: None,
        }
    }

    #[tokio::test]
    async fn register_creates_customer_with_zeroed_counters() {
        let (svc, _) = service();
        let created = svc.register(input("grace@example.com")).await.unwrap();
        assert_eq!(created.email, "grace@example.com");
        assert_eq!(created.loyalty_points, 0);
        assert_eq!(created.total_orders, 0);
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let (svc, _) = service();
        svc.register(input("dup@example.com")).await.unwrap();
        let err = svc.register(input("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn register_rejects_bad_email_and_blank_names() {
        let (svc, _) = service();
        let err = svc.register(input("not-an-email")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Model(_)));

        let mut blank = input("ok@example.com");
        blank.first_name = "  ".into();
        let err = svc.register(blank).await.unwrap_err();
        assert!(matches!(err, ServiceError::Model(_)));
    }

    #[tokio::test]
    async fn award_points_requires_positive_delta() {
        let (svc, repo) = service();
        let customer = repo.seed(0, 0);

        let err = svc.award_points(customer.id, 0).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let updated = svc.award_points(customer.id, 50).await.unwrap();
        assert_eq!(updated.loyalty_points, 50);
    }

    #[tokio::test]
    async fn delete_refuses_customers_with_history() {
        let (svc, repo) = service();
        let with_orders = repo.seed(0, 3);
        let with_points = repo.seed(120, 0);
        let clean = repo.seed(0, 0);

        assert!(matches!(
            svc.delete(with_orders.id).await.unwrap_err(),
            ServiceError::Validation(_)
        ));
        assert!(matches!(
            svc.delete(with_points.id).await.unwrap_err(),
            ServiceError::Validation(_)
        ));
        // The guard must fire before the repository delete.
        assert!(repo.deleted.lock().unwrap().is_empty());

        svc.delete(clean.id).await.unwrap();
        assert_eq!(repo.deleted.lock().unwrap().as_slice(), [clean.id]);
    }

    #[tokio::test]
    async fn delete_missing_customer_is_not_found() {
        let (svc, _) = service();
        let err = svc.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn customer_register_db_roundtrip() -> Result<(), anyhow::Error> {
        if std::env::var("DATABASE_URL").is_err() {
            return Ok(());
        }
        let db = crate::test_support::get_db().await?;
        let repo = Arc::new(crate::customer::SeaOrmCustomerRepository { db });
        let svc = CustomerService::new(repo);

        let email = format!("it_{}@example.com", Uuid::new_v4());
        let created = svc
            .register(NewCustomer {
                email: email.clone(),
                first_name: "Integration".into(),
                last_name: "Test".into(),
                phone: Some("+1555000".into()),
            })
            .await?;
        let found = svc.get(created.id).await?.expect("customer persisted");
        assert_eq!(found.email, email);

        // Fresh customer has no history, so delete succeeds.
        svc.delete(created.id).await?;
        let after = svc.get(created.id).await?.expect("soft-deleted row remains");
        assert!(after.deleted_at.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn search_rejects_blank_query() {
        let (svc, repo) = service();
        repo.seed(0, 0);
        assert!(matches!(
            svc.search("   ").await.unwrap_err(),
            ServiceError::Validation(_)
        ));
        let hits = svc.search("ada").await.unwrap();
        assert_eq!(hits.len(), 1);
    }
}
