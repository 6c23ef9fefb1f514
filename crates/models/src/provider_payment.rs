use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::provider;
use crate::status::StatusFlow;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "provider_payment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub provider_id: Uuid,
    pub amount_cents: i64,
    pub currency: String,
    pub status: String,
    pub processed_at: Option<DateTimeWithTimeZone>,
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

pub fn validate_new(amount_cents: i64, currency: &str) -> Result<(), errors::ModelError> {
    if amount_cents <= 0 {
        return Err(errors::ModelError::Validation("amount must be positive".into()));
    }
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(errors::ModelError::Validation("currency must be a 3-letter ISO code".into()));
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Processed,
    Completed,
    Failed,
    Reconciled,
}

impl StatusFlow for PaymentStatus {
    const ENTITY: &'static str = "provider payment";

    fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Processed => "processed",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Reconciled => "reconciled",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(PaymentStatus::Pending),
            "processed" => Some(PaymentStatus::Processed),
            "completed" => Some(PaymentStatus::Completed),
            "failed" => Some(PaymentStatus::Failed),
            "reconciled" => Some(PaymentStatus::Reconciled),
            _ => None,
        }
    }

    fn can_transition(self, to: Self) -> bool {
        use PaymentStatus::*;
        matches!(
            (self, to),
            (Pending, Processed)
                | (Processed, Completed)
                | (Completed, Reconciled)
                | (Pending, Failed)
                | (Processed, Failed)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusFlow;

    #[test]
    fn lifecycle_matrix() {
        use PaymentStatus::*;
        assert!(Pending.can_transition(Processed));
        assert!(Processed.can_transition(Completed));
        assert!(Completed.can_transition(Reconciled));
        assert!(Processed.can_transition(Failed));
        assert!(!Completed.can_transition(Failed));
        assert!(!Failed.can_transition(Pending));
        assert!(!Reconciled.can_transition(Completed));
    }

    #[test]
    fn currency_must_be_iso_alpha3() {
        assert!(validate_new(100, "USD").is_ok());
        assert!(validate_new(100, "usd").is_err());
        assert!(validate_new(100, "US").is_err());
        assert!(validate_new(0, "USD").is_err());
    }
}
