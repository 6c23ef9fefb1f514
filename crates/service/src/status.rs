//! Central status parsing and transition checks.
//!
//! Services never compare status strings themselves; they parse into the
//! entity's `StatusFlow` enum and ask the table.

use models::status::StatusFlow;

use crate::errors::ServiceError;

/// Parse a stored status string; unknown values are validation errors.
pub fn parse_status<S: StatusFlow>(raw: &str) -> Result<S, ServiceError> {
    S::parse(raw)
        .ok_or_else(|| ServiceError::Validation(format!("unknown {} status: {}", S::ENTITY, raw)))
}

/// Check the `(from, to)` pair against the entity's transition table.
pub fn ensure_transition<S: StatusFlow>(from: S, to: S) -> Result<(), ServiceError> {
    if from.can_transition(to) {
        Ok(())
    } else {
        Err(ServiceError::InvalidTransition {
            entity: S::ENTITY,
            from: from.as_str(),
            to: to.as_str(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::order::OrderStatus;
    use models::provider_payment::PaymentStatus;

    #[test]
    fn legal_transition_passes() {
        assert!(ensure_transition(OrderStatus::Pending, OrderStatus::Paid).is_ok());
        assert!(ensure_transition(PaymentStatus::Completed, PaymentStatus::Reconciled).is_ok());
    }

    #[test]
    fn illegal_transition_reports_entity_and_pair() {
        let err = ensure_transition(OrderStatus::Pending, OrderStatus::Delivered).unwrap_err();
        match err {
            ServiceError::InvalidTransition { entity, from, to } => {
                assert_eq!(entity, "order");
                assert_eq!(from, "pending");
                assert_eq!(to, "delivered");
            }
            other => panic!("expected InvalidTransition, got {:?}", other),
        }
    }

    #[test]
    fn unknown_status_string_is_validation() {
        let err = parse_status::<OrderStatus>("sideways").unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
