use thiserror::Error;

/// The single error type every service operation returns.
///
/// Plain lookups report a miss as `Ok(None)`; `NotFound` is reserved for
/// operations that require the row to exist.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("illegal {entity} transition: {from} -> {to}")]
    InvalidTransition {
        entity: &'static str,
        from: &'static str,
        to: &'static str,
    },
    #[error("notification error: {0}")]
    Notification(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(format!("{} not found", entity))
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 2001,
            ServiceError::NotFound(_) => 2002,
            ServiceError::Conflict(_) => 2003,
            ServiceError::InvalidTransition { .. } => 2004,
            ServiceError::Notification(_) => 2101,
            ServiceError::Db(_) => 2200,
            ServiceError::Model(_) => 2201,
        }
    }
}
