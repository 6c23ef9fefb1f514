use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use models::provider_insurance::InsuranceStatus;
use models::status::StatusFlow;

use crate::errors::ServiceError;
use crate::provider_insurance::repository::{NewInsurance, ProviderInsuranceRepository};
use crate::status::{ensure_transition, parse_status};

/// Insurance policy review: pending -> approved/rejected -> processed.
pub struct ProviderInsuranceService<R: ProviderInsuranceRepository> {
    repo: Arc<R>,
}

impl<R: ProviderInsuranceRepository> ProviderInsuranceService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, input), fields(provider_id = %input.provider_id, policy = %input.policy_number))]
    pub async fn submit(&self, input: NewInsurance) -> Result<models::provider_insurance::Model, ServiceError> {
        models::provider_insurance::validate_new(
            &input.policy_number,
            input.coverage_amount_cents,
            input.start_date,
            input.end_date,
        )?;
        let created = self.repo.insert(&input).await?;
        info!(insurance_id = %created.id, "insurance_submitted");
        Ok(created)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<models::provider_insurance::Model>, ServiceError> {
        self.repo.find_by_id(id).await
    }

    pub async fn list_for_provider(&self, provider_id: Uuid) -> Result<Vec<models::provider_insurance::Model>, ServiceError> {
        self.repo.list_by_provider(provider_id).await
    }

    pub async fn approve(&self, id: Uuid) -> Result<models::provider_insurance::Model, ServiceError> {
        self.transition(id, InsuranceStatus::Approved).await
    }

    pub async fn reject(&self, id: Uuid) -> Result<models::provider_insurance::Model, ServiceError> {
        self.transition(id, InsuranceStatus::Rejected).await
    }

    /// Payout bookkeeping after approval.
    pub async fn process(&self, id: Uuid) -> Result<models::provider_insurance::Model, ServiceError> {
        self.transition(id, InsuranceStatus::Processed).await
    }

    async fn transition(&self, id: Uuid, to: InsuranceStatus) -> Result<models::provider_insurance::Model, ServiceError> {
        let found = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("insurance"))?;
        let current: InsuranceStatus = parse_status(&found.status)?;
        ensure_transition(current, to)?;
        let updated = self.repo.set_status(id, to.as_str()).await?;
        info!(insurance_id = %id, status = to.as_str(), "insurance_status_changed");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::provider_insurance::repository::mock::MockInsuranceRepo;

    fn service() -> ProviderInsuranceService<MockInsuranceRepo> {
        ProviderInsuranceService::new(Arc::new(MockInsuranceRepo::default()))
    }

    fn input() -> NewInsurance {
        NewInsurance {
            provider_id: Uuid::new_v4(),
            policy_number: "POL-2026-001".into(),
            coverage_amount_cents: 50_000_00,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        }
    }

    #[tokio::test]
    async fn submit_starts_pending() {
        let svc = service();
        let created = svc.submit(input()).await.unwrap();
        assert_eq!(created.status, "pending");
    }

    #[tokio::test]
    async fn inverted_dates_are_rejected() {
        let svc = service();
        let mut bad = input();
        bad.end_date = bad.start_date;
        let err = svc.submit(bad).await.unwrap_err();
        assert!(matches!(err, ServiceError::Model(_)));
    }

    #[tokio::test]
    async fn approve_then_process() {
        let svc = service();
        let created = svc.submit(input()).await.unwrap();
        assert_eq!(svc.approve(created.id).await.unwrap().status, "approved");
        assert_eq!(svc.process(created.id).await.unwrap().status, "processed");
    }

    #[tokio::test]
    async fn rejected_policy_cannot_be_processed() {
        let svc = service();
        let created = svc.submit(input()).await.unwrap();
        svc.reject(created.id).await.unwrap();
        let err = svc.process(created.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn processing_a_pending_policy_is_illegal() {
        let svc = service();
        let created = svc.submit(input()).await.unwrap();
        let err = svc.process(created.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition { .. }));
    }
}
