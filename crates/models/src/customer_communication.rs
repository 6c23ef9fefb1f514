use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::customer;
use crate::errors;
use crate::status::StatusFlow;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customer_communication")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    /// "email" or "sms"
    pub channel: String,
    pub subject: String,
    pub body: String,
    pub status: String,
    pub sent_at: Option<DateTimeWithTimeZone>,
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

pub fn validate_channel(channel: &str) -> Result<(), errors::ModelError> {
    match channel {
        "email" | "sms" => Ok(()),
        other => Err(errors::ModelError::Validation(format!("unknown channel: {}", other))),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommunicationStatus {
    Draft,
    Sent,
    Delivered,
    Read,
    Bounced,
}

impl StatusFlow for CommunicationStatus {
    const ENTITY: &'static str = "customer communication";

    fn as_str(self) -> &'static str {
        match self {
            CommunicationStatus::Draft => "draft",
            CommunicationStatus::Sent => "sent",
            CommunicationStatus::Delivered => "delivered",
            CommunicationStatus::Read => "read",
            CommunicationStatus::Bounced => "bounced",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "draft" => Some(CommunicationStatus::Draft),
            "sent" => Some(CommunicationStatus::Sent),
            "delivered" => Some(CommunicationStatus::Delivered),
            "read" => Some(CommunicationStatus::Read),
            "bounced" => Some(CommunicationStatus::Bounced),
            _ => None,
        }
    }

    fn can_transition(self, to: Self) -> bool {
        use CommunicationStatus::*;
        matches!(
            (self, to),
            (Draft, Sent) | (Sent, Delivered) | (Delivered, Read) | (Sent, Bounced)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::CommunicationStatus::*;
    use crate::status::StatusFlow;

    #[test]
    fn bounced_only_from_sent() {
        assert!(Sent.can_transition(Bounced));
        assert!(!Draft.can_transition(Bounced));
        assert!(!Delivered.can_transition(Bounced));
    }

    #[test]
    fn read_requires_delivery() {
        assert!(!Sent.can_transition(Read));
        assert!(Delivered.can_transition(Read));
    }
}
