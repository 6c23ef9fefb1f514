pub mod log_payment_activity;
pub mod payment_counters;
pub mod payment_notifications;

pub use log_payment_activity::LogProviderPaymentActivity;
pub use payment_counters::PaymentCounterProjection;
pub use payment_notifications::NotifyProviderOnPayment;
