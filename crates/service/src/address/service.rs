use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::address::repository::{AddressRepository, NewAddress};
use crate::errors::ServiceError;

/// Address book rules: one default per `(customer, kind)` pair.
pub struct AddressService<R: AddressRepository> {
    repo: Arc<R>,
}

impl<R: AddressRepository> AddressService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, input), fields(customer_id = %input.customer_id, kind = %input.kind))]
    pub async fn create(&self, input: NewAddress) -> Result<models::address::Model, ServiceError> {
        models::address::validate_kind(&input.kind)?;
        if input.line1.trim().is_empty()
            || input.city.trim().is_empty()
            || input.country.trim().is_empty()
        {
            return Err(ServiceError::Validation("line1, city and country are required".into()));
        }
        if input.is_default {
            self.repo.clear_default(input.customer_id, &input.kind).await?;
        }
        let created = self.repo.insert(&input).await?;
        info!(address_id = %created.id, "address_created");
        Ok(created)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<models::address::Model>, ServiceError> {
        self.repo.find_by_id(id).await
    }

    pub async fn list_for_customer(&self, customer_id: Uuid) -> Result<Vec<models::address::Model>, ServiceError> {
        self.repo.list_by_customer(customer_id).await
    }

    /// Make this address the default for its kind, demoting any previous one.
    #[instrument(skip(self))]
    pub async fn set_default(&self, id: Uuid) -> Result<models::address::Model, ServiceError> {
        let found = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("address"))?;
        self.repo.clear_default(found.customer_id, &found.kind).await?;
        self.repo.set_default_flag(id, true).await
    }

    /// Deleting the last address of a kind is allowed but logged, since the
    /// customer loses that capability until a new one is added.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let found = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("address"))?;
        let remaining = self
            .repo
            .count_by_customer_and_kind(found.customer_id, &found.kind)
            .await?;
        if remaining <= 1 {
            warn!(
                customer_id = %found.customer_id,
                kind = %found.kind,
                "deleting_last_address_of_kind"
            );
        }
        self.repo.delete(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::repository::mock::MockAddressRepo;

    fn service() -> (AddressService<MockAddressRepo>, Arc<MockAddressRepo>) {
        let repo = Arc::new(MockAddressRepo::default());
        (AddressService::new(repo.clone()), repo)
    }

    fn input(customer_id: Uuid, kind: &str, is_default: bool) -> NewAddress {
        NewAddress {
            customer_id,
            kind: kind.to_string(),
            line1: "12 Elm St".into(),
            line2: None,
            city: "Springfield".into(),
            region: "IL".into(),
            postal_code: "62704".into(),
            country: "US".into(),
            is_default,
        }
    }

    #[tokio::test]
    async fn create_rejects_unknown_kind() {
        let (svc, _) = service();
        let err = svc
            .create(input(Uuid::new_v4(), "warehouse", false))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Model(_)));
    }

    #[tokio::test]
    async fn create_rejects_blank_required_lines() {
        let (svc, _) = service();
        let mut bad = input(Uuid::new_v4(), "billing", false);
        bad.city = "  ".into();
        let err = svc.create(bad).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn new_default_demotes_previous_default_of_same_kind() {
        let (svc, repo) = service();
        let customer = Uuid::new_v4();
        let first = svc.create(input(customer, "shipping", true)).await.unwrap();
        let second = svc.create(input(customer, "shipping", true)).await.unwrap();
        // A default of another kind is untouched.
        let billing = svc.create(input(customer, "billing", true)).await.unwrap();

        let first = repo.find_by_id(first.id).await.unwrap().unwrap();
        let second = repo.find_by_id(second.id).await.unwrap().unwrap();
        let billing = repo.find_by_id(billing.id).await.unwrap().unwrap();
        assert!(!first.is_default);
        assert!(second.is_default);
        assert!(billing.is_default);
    }

    #[tokio::test]
    async fn set_default_moves_the_flag() {
        let (svc, repo) = service();
        let customer = Uuid::new_v4();
        let a = svc.create(input(customer, "shipping", true)).await.unwrap();
        let b = svc.create(input(customer, "shipping", false)).await.unwrap();

        let promoted = svc.set_default(b.id).await.unwrap();
        assert!(promoted.is_default);
        let demoted = repo.find_by_id(a.id).await.unwrap().unwrap();
        assert!(!demoted.is_default);
    }

    #[tokio::test]
    async fn delete_last_of_kind_proceeds() {
        let (svc, repo) = service();
        let customer = Uuid::new_v4();
        let only = svc.create(input(customer, "billing", true)).await.unwrap();

        svc.delete(only.id).await.unwrap();
        assert!(repo.find_by_id(only.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_missing_address_is_not_found() {
        let (svc, _) = service();
        let err = svc.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
