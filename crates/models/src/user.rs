use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    if !email.contains('@') {
        return Err(errors::ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

/// Look up an account by email, creating it when absent.
///
/// Generic over the connection so it can run inside a transaction.
pub async fn find_or_create<C: ConnectionTrait>(
    conn: &C,
    email: &str,
    name: &str,
) -> Result<Model, errors::ModelError> {
    validate_email(email)?;
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("name required".into()));
    }
    let existing = Entity::find()
        .filter(Column::Email.eq(email))
        .one(conn)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    if let Some(found) = existing {
        return Ok(found);
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        name: Set(name.to_string()),
        created_at: Set(Utc::now().into()),
    };
    am.insert(conn).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
