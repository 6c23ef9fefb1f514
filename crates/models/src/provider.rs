use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::status::StatusFlow;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "provider")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub contact_email: String,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_new(name: &str, contact_email: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("name required".into()));
    }
    if !contact_email.contains('@') {
        return Err(errors::ModelError::Validation("invalid contact email".into()));
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderStatus {
    Pending,
    Active,
    Suspended,
}

impl StatusFlow for ProviderStatus {
    const ENTITY: &'static str = "provider";

    fn as_str(self) -> &'static str {
        match self {
            ProviderStatus::Pending => "pending",
            ProviderStatus::Active => "active",
            ProviderStatus::Suspended => "suspended",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(ProviderStatus::Pending),
            "active" => Some(ProviderStatus::Active),
            "suspended" => Some(ProviderStatus::Suspended),
            _ => None,
        }
    }

    fn can_transition(self, to: Self) -> bool {
        use ProviderStatus::*;
        matches!((self, to), (Pending, Active) | (Active, Suspended) | (Suspended, Active))
    }
}
