use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::cache::{EntityCache, EntityKind};
use crate::category::repository::{CategoryRepository, NewCategory};
use crate::errors::ServiceError;

/// Category tree with slug generation and cached reads.
pub struct CategoryService<R: CategoryRepository> {
    repo: Arc<R>,
    cache: EntityCache,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repo: Arc<R>, cache: EntityCache) -> Self {
        Self { repo, cache }
    }

    /// Create with a slug derived from the name; collisions get a numeric
    /// suffix (`sale`, `sale-1`, `sale-2`, ...).
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: NewCategory) -> Result<models::category::Model, ServiceError> {
        models::category::validate_name(&input.name)?;
        if let Some(parent_id) = input.parent_id {
            if self.repo.find_by_id(parent_id).await?.is_none() {
                return Err(ServiceError::not_found("parent category"));
            }
        }
        let slug = self.unique_slug(&input.name).await?;
        let created = self.repo.insert(&input, &slug).await?;
        info!(category_id = %created.id, slug = %created.slug, "category_created");
        Ok(created)
    }

    async fn unique_slug(&self, name: &str) -> Result<String, ServiceError> {
        let base = models::category::slugify(name);
        if base.is_empty() {
            return Err(ServiceError::Validation("name yields an empty slug".into()));
        }
        if !self.repo.slug_exists(&base).await? {
            return Ok(base);
        }
        let mut n = 1;
        loop {
            let candidate = format!("{}-{}", base, n);
            if !self.repo.slug_exists(&candidate).await? {
                return Ok(candidate);
            }
            n += 1;
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<models::category::Model>, ServiceError> {
        self.repo.find_by_id(id).await
    }

    /// Cached read; write paths invalidate the entry.
    pub async fn get_cached(&self, id: Uuid) -> Result<Option<models::category::Model>, ServiceError> {
        self.cache
            .get_or_load(EntityKind::Category, id, self.repo.find_by_id(id))
            .await
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<models::category::Model>, ServiceError> {
        self.repo.find_by_slug(slug).await
    }

    pub async fn list_active(&self) -> Result<Vec<models::category::Model>, ServiceError> {
        self.repo.list_active().await
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        description: Option<Option<&str>>,
        active: Option<bool>,
    ) -> Result<models::category::Model, ServiceError> {
        if let Some(name) = name {
            models::category::validate_name(name)?;
        }
        let updated = self.repo.update(id, name, description, active).await?;
        self.cache.invalidate(EntityKind::Category, id).await;
        Ok(updated)
    }

    /// Categories still referenced by products cannot be removed.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let products = self.repo.product_count(id).await?;
        if products > 0 {
            return Err(ServiceError::Conflict(format!(
                "category still has {} products",
                products
            )));
        }
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("category"));
        }
        self.cache.invalidate(EntityKind::Category, id).await;
        info!(category_id = %id, "category_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::category::repository::mock::MockCategoryRepo;

    fn service() -> (CategoryService<MockCategoryRepo>, Arc<MockCategoryRepo>) {
        let repo = Arc::new(MockCategoryRepo::default());
        let cache = EntityCache::new(Duration::from_secs(60), 100);
        (CategoryService::new(repo.clone(), cache), repo)
    }

    fn input(name: &str) -> NewCategory {
        NewCategory { name: name.to_string(), parent_id: None, description: None }
    }

    #[tokio::test]
    async fn slug_collisions_get_numeric_suffixes() {
        let (svc, _) = service();
        let a = svc.create(input("Summer Sale")).await.unwrap();
        let b = svc.create(input("Summer Sale")).await.unwrap();
        let c = svc.create(input("Summer Sale")).await.unwrap();
        assert_eq!(a.slug, "summer-sale");
        assert_eq!(b.slug, "summer-sale-1");
        assert_eq!(c.slug, "summer-sale-2");
    }

    #[tokio::test]
    async fn symbol_only_name_is_rejected() {
        let (svc, _) = service();
        let err = svc.create(input("!!!")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn unknown_parent_is_rejected() {
        let (svc, _) = service();
        let mut orphan = input("Shoes");
        orphan.parent_id = Some(Uuid::new_v4());
        let err = svc.create(orphan).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn cached_read_sees_updates() {
        let (svc, _) = service();
        let created = svc.create(input("Books")).await.unwrap();

        let first = svc.get_cached(created.id).await.unwrap().unwrap();
        assert_eq!(first.name, "Books");

        svc.update(created.id, Some("Paper Books"), None, None).await.unwrap();
        let second = svc.get_cached(created.id).await.unwrap().unwrap();
        assert_eq!(second.name, "Paper Books");
    }

    #[tokio::test]
    async fn delete_refuses_category_with_products() {
        let (svc, repo) = service();
        let created = svc.create(input("Garden")).await.unwrap();
        repo.products.lock().unwrap().insert(created.id, 4);

        let err = svc.delete(created.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        repo.products.lock().unwrap().remove(&created.id);
        svc.delete(created.id).await.unwrap();
        assert!(svc.get(created.id).await.unwrap().is_none());
    }
}
