use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customer_segment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub segment_type: String,
    pub criteria: Json,
    pub active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

/// Closed vocabulary for segment types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentType {
    Demographic,
    Behavioral,
    Geographic,
    Lifecycle,
}

impl SegmentType {
    pub fn as_str(self) -> &'static str {
        match self {
            SegmentType::Demographic => "demographic",
            SegmentType::Behavioral => "behavioral",
            SegmentType::Geographic => "geographic",
            SegmentType::Lifecycle => "lifecycle",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "demographic" => Some(SegmentType::Demographic),
            "behavioral" => Some(SegmentType::Behavioral),
            "geographic" => Some(SegmentType::Geographic),
            "lifecycle" => Some(SegmentType::Lifecycle),
            _ => None,
        }
    }
}

pub fn validate_type(segment_type: &str) -> Result<SegmentType, errors::ModelError> {
    SegmentType::parse(segment_type)
        .ok_or_else(|| errors::ModelError::Validation(format!("unknown segment type: {}", segment_type)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_vocabulary_is_closed() {
        assert!(validate_type("behavioral").is_ok());
        assert!(validate_type("astrological").is_err());
        assert!(validate_type("").is_err());
    }
}
