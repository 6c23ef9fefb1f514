use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::customer;
use crate::errors;
use crate::status::StatusFlow;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_subscription")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub plan: String,
    pub status: String,
    pub started_at: DateTimeWithTimeZone,
    pub ends_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Customer,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Customer => Entity::belongs_to(customer::Entity)
                .from(Column::CustomerId)
                .to(customer::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_plan(plan: &str) -> Result<(), errors::ModelError> {
    if plan.trim().is_empty() {
        return Err(errors::ModelError::Validation("plan required".into()));
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubscriptionStatus {
    Active,
    Paused,
    Cancelled,
    Expired,
}

impl StatusFlow for SubscriptionStatus {
    const ENTITY: &'static str = "subscription";

    fn as_str(self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Paused => "paused",
            SubscriptionStatus::Cancelled => "cancelled",
            SubscriptionStatus::Expired => "expired",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "active" => Some(SubscriptionStatus::Active),
            "paused" => Some(SubscriptionStatus::Paused),
            "cancelled" => Some(SubscriptionStatus::Cancelled),
            "expired" => Some(SubscriptionStatus::Expired),
            _ => None,
        }
    }

    fn can_transition(self, to: Self) -> bool {
        use SubscriptionStatus::*;
        matches!(
            (self, to),
            (Active, Paused)
                | (Paused, Active)
                | (Active, Cancelled)
                | (Paused, Cancelled)
                | (Active, Expired)
                | (Expired, Active)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::SubscriptionStatus::*;
    use crate::status::StatusFlow;

    #[test]
    fn cancelled_is_terminal() {
        assert!(!Cancelled.can_transition(Active));
        assert!(!Cancelled.can_transition(Paused));
        assert!(!Cancelled.can_transition(Expired));
    }

    #[test]
    fn pause_resume_round_trip() {
        assert!(Active.can_transition(Paused));
        assert!(Paused.can_transition(Active));
    }

    #[test]
    fn expired_can_reactivate_via_renewal() {
        assert!(Expired.can_transition(Active));
        assert!(!Expired.can_transition(Paused));
    }
}
