use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::product::repository::{NewProduct, ProductRepository};

/// Catalog rules: SKU uniqueness per provider and non-negative stock.
pub struct ProductService<R: ProductRepository> {
    repo: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, input), fields(sku = %input.sku, provider_id = %input.provider_id))]
    pub async fn create(&self, input: NewProduct) -> Result<models::product::Model, ServiceError> {
        models::product::validate_new(&input.name, &input.sku, input.price_cents)?;
        let stock = input.stock.unwrap_or(0);
        if stock < 0 {
            return Err(ServiceError::Validation("stock cannot be negative".into()));
        }
        if self.repo.sku_exists(input.provider_id, &input.sku).await? {
            return Err(ServiceError::Conflict(format!(
                "sku {} already exists for this provider",
                input.sku
            )));
        }
        let created = self.repo.insert(&input, stock).await?;
        info!(product_id = %created.id, "product_created");
        Ok(created)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<models::product::Model>, ServiceError> {
        self.repo.find_by_id(id).await
    }

    pub async fn list_by_category(&self, category_id: Uuid) -> Result<Vec<models::product::Model>, ServiceError> {
        self.repo.list_by_category(category_id).await
    }

    /// Active products matching by name or SKU.
    pub async fn search(&self, query: &str) -> Result<Vec<models::product::Model>, ServiceError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::Validation("search query required".into()));
        }
        self.repo.search(trimmed).await
    }

    /// Apply a signed stock delta; the result may never go below zero.
    #[instrument(skip(self))]
    pub async fn adjust_stock(&self, id: Uuid, delta: i32) -> Result<models::product::Model, ServiceError> {
        let found = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("product"))?;
        let next = found.stock + delta;
        if next < 0 {
            return Err(ServiceError::Validation(format!(
                "stock adjustment {} would leave {} below zero",
                delta, found.sku
            )));
        }
        let updated = self.repo.set_stock(id, next).await?;
        info!(product_id = %id, delta, stock = next, "stock_adjusted");
        Ok(updated)
    }

    pub async fn update_price(&self, id: Uuid, price_cents: i64) -> Result<models::product::Model, ServiceError> {
        if price_cents <= 0 {
            return Err(ServiceError::Validation("price must be positive".into()));
        }
        self.repo.set_price(id, price_cents).await
    }

    pub async fn set_active(&self, id: Uuid, active: bool) -> Result<models::product::Model, ServiceError> {
        self.repo.set_active(id, active).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::repository::mock::MockProductRepo;

    fn service() -> ProductService<MockProductRepo> {
        ProductService::new(Arc::new(MockProductRepo::default()))
    }

    fn input(sku: &str, provider_id: Uuid) -> NewProduct {
        NewProduct {
            category_id: Uuid::new_v4(),
            provider_id,
            name: "Walnut Desk".into(),
            sku: sku.to_string(),
            description: None,
            price_cents: 45_000,
            stock: None,
        }
    }

    #[tokio::test]
    async fn create_defaults_stock_to_zero_and_active() {
        let svc = service();
        let created = svc.create(input("DESK-1", Uuid::new_v4())).await.unwrap();
        assert_eq!(created.stock, 0);
        assert!(created.active);
    }

    #[tokio::test]
    async fn duplicate_sku_conflicts_only_within_provider() {
        let svc = service();
        let provider = Uuid::new_v4();
        svc.create(input("DESK-1", provider)).await.unwrap();

        let err = svc.create(input("DESK-1", provider)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        // Another provider may reuse the SKU.
        svc.create(input("DESK-1", Uuid::new_v4())).await.unwrap();
    }

    #[tokio::test]
    async fn adjust_stock_rejects_going_negative() {
        let svc = service();
        let mut with_stock = input("DESK-2", Uuid::new_v4());
        with_stock.stock = Some(5);
        let created = svc.create(with_stock).await.unwrap();

        let after = svc.adjust_stock(created.id, -3).await.unwrap();
        assert_eq!(after.stock, 2);

        let err = svc.adjust_stock(created.id, -3).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        // Failed adjustment leaves stock untouched.
        assert_eq!(svc.get(created.id).await.unwrap().unwrap().stock, 2);
    }

    #[tokio::test]
    async fn create_rejects_nonpositive_price() {
        let svc = service();
        let mut free = input("DESK-3", Uuid::new_v4());
        free.price_cents = 0;
        let err = svc.create(free).await.unwrap_err();
        assert!(matches!(err, ServiceError::Model(_)));
    }

    #[tokio::test]
    async fn search_skips_inactive_products() {
        let svc = service();
        let shown = svc.create(input("DESK-4", Uuid::new_v4())).await.unwrap();
        let hidden = svc.create(input("DESK-5", Uuid::new_v4())).await.unwrap();
        svc.set_active(hidden.id, false).await.unwrap();

        let hits = svc.search("desk").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, shown.id);
    }
}
