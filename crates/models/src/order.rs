use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::customer;
use crate::status::StatusFlow;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    #[sea_orm(unique)]
    pub order_number: String,
    pub status: String,
    pub total_cents: i64,
    pub placed_at: DateTimeWithTimeZone,
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

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

impl StatusFlow for OrderStatus {
    const ENTITY: &'static str = "order";

    fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(OrderStatus::Pending),
            "paid" => Some(OrderStatus::Paid),
            "shipped" => Some(OrderStatus::Shipped),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            "refunded" => Some(OrderStatus::Refunded),
            _ => None,
        }
    }

    fn can_transition(self, to: Self) -> bool {
        use OrderStatus::*;
        matches!(
            (self, to),
            (Pending, Paid)
                | (Paid, Shipped)
                | (Shipped, Delivered)
                | (Pending, Cancelled)
                | (Paid, Cancelled)
                | (Paid, Refunded)
                | (Delivered, Refunded)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::OrderStatus::*;
    use crate::status::StatusFlow;

    #[test]
    fn happy_path_is_legal() {
        assert!(Pending.can_transition(Paid));
        assert!(Paid.can_transition(Shipped));
        assert!(Shipped.can_transition(Delivered));
        assert!(Delivered.can_transition(Refunded));
    }

    #[test]
    fn skipping_states_is_illegal() {
        assert!(!Pending.can_transition(Shipped));
        assert!(!Pending.can_transition(Delivered));
        assert!(!Shipped.can_transition(Cancelled));
        assert!(!Refunded.can_transition(Pending));
    }

    #[test]
    fn parse_round_trips() {
        for s in ["pending", "paid", "shipped", "delivered", "cancelled", "refunded"] {
            assert_eq!(super::OrderStatus::parse(s).unwrap().as_str(), s);
        }
        assert!(super::OrderStatus::parse("unknown").is_none());
    }
}
