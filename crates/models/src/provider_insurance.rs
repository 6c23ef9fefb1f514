use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::provider;
use crate::status::StatusFlow;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "provider_insurance")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub provider_id: Uuid,
    pub policy_number: String,
    pub coverage_amount_cents: i64,
    pub start_date: Date,
    pub end_date: Date,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Provider,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Provider => Entity::belongs_to(provider::Entity)
                .from(Column::ProviderId)
                .to(provider::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_new(
    policy_number: &str,
    coverage_amount_cents: i64,
    start_date: Date,
    end_date: Date,
) -> Result<(), errors::ModelError> {
    if policy_number.trim().is_empty() {
        return Err(errors::ModelError::Validation("policy number required".into()));
    }
    if coverage_amount_cents <= 0 {
        return Err(errors::ModelError::Validation("coverage amount must be positive".into()));
    }
    if end_date <= start_date {
        return Err(errors::ModelError::Validation("end date must be after start date".into()));
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsuranceStatus {
    Pending,
    Approved,
    Rejected,
    Processed,
}

impl StatusFlow for InsuranceStatus {
    const ENTITY: &'static str = "provider insurance";

    fn as_str(self) -> &'static str {
        match self {
            InsuranceStatus::Pending => "pending",
            InsuranceStatus::Approved => "approved",
            InsuranceStatus::Rejected => "rejected",
            InsuranceStatus::Processed => "processed",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(InsuranceStatus::Pending),
            "approved" => Some(InsuranceStatus::Approved),
            "rejected" => Some(InsuranceStatus::Rejected),
            "processed" => Some(InsuranceStatus::Processed),
            _ => None,
        }
    }

    fn can_transition(self, to: Self) -> bool {
        use InsuranceStatus::*;
        matches!((self, to), (Pending, Approved) | (Pending, Rejected) | (Approved, Processed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn rejects_inverted_dates() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert!(validate_new("POL-1", 100_000, start, end).is_err());
        assert!(validate_new("POL-1", 100_000, start, start).is_err());
    }

    #[test]
    fn rejects_non_positive_coverage() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        assert!(validate_new("POL-1", 0, start, end).is_err());
        assert!(validate_new("POL-1", -5, start, end).is_err());
        assert!(validate_new("POL-1", 1, start, end).is_ok());
    }

    #[test]
    fn rejected_is_terminal() {
        use crate::status::StatusFlow;
        assert!(!InsuranceStatus::Rejected.can_transition(InsuranceStatus::Approved));
        assert!(!InsuranceStatus::Rejected.can_transition(InsuranceStatus::Processed));
    }
}
