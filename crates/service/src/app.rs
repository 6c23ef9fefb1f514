//! Composition root: builds every service against one database connection
//! and wires the event listeners.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio::task::JoinHandle;

use crate::address::{AddressService, SeaOrmAddressRepository};
use crate::cache::EntityCache;
use crate::category::{CategoryService, SeaOrmCategoryRepository};
use crate::communication::{CommunicationService, SeaOrmCommunicationRepository};
use crate::customer::{CustomerService, SeaOrmCustomerRepository};
use crate::events::listeners::{
    LogProviderPaymentActivity, NotifyProviderOnPayment, PaymentCounterProjection,
};
use crate::events::{spawn_listener, DeliveryPolicy, EventBus};
use crate::notify::{Notifier, TracingNotifier};
use crate::order::{OrderService, SeaOrmOrderRepository};
use crate::product::{ProductService, SeaOrmProductRepository};
use crate::provider::{ProviderService, SeaOrmProviderRepository};
use crate::provider_insurance::{ProviderInsuranceService, SeaOrmProviderInsuranceRepository};
use crate::provider_location::{ProviderLocationService, SeaOrmProviderLocationRepository};
use crate::provider_payment::{ProviderPaymentService, SeaOrmProviderPaymentRepository};
use crate::segment::{CustomerSegmentService, SeaOrmCustomerSegmentRepository};
use crate::shipment::{SeaOrmShipmentRepository, ShipmentService};
use crate::subscription::{SeaOrmSubscriptionRepository, SubscriptionService};

/// All domain services over the SeaORM repositories.
pub struct AppServices {
    pub customers: CustomerService<SeaOrmCustomerRepository>,
    pub addresses: AddressService<SeaOrmAddressRepository>,
    pub categories: CategoryService<SeaOrmCategoryRepository>,
    pub products: ProductService<SeaOrmProductRepository>,
    pub orders: OrderService<SeaOrmOrderRepository>,
    pub shipments: ShipmentService<SeaOrmShipmentRepository, SeaOrmOrderRepository>,
    pub providers: ProviderService<SeaOrmProviderRepository>,
    pub provider_locations: ProviderLocationService<SeaOrmProviderLocationRepository>,
    pub provider_insurances: ProviderInsuranceService<SeaOrmProviderInsuranceRepository>,
    pub provider_payments: ProviderPaymentService<SeaOrmProviderPaymentRepository>,
    pub segments: CustomerSegmentService<SeaOrmCustomerSegmentRepository>,
    pub communications: CommunicationService<SeaOrmCommunicationRepository>,
    pub subscriptions: SubscriptionService<SeaOrmSubscriptionRepository>,
    pub events: EventBus,
    pub payment_counters: Arc<PaymentCounterProjection>,
    listener_handles: Vec<JoinHandle<()>>,
}

impl AppServices {
    /// Wire every service and start the payment listeners.
    pub fn build(db: DatabaseConnection, cfg: &configs::AppConfig) -> Self {
        Self::build_with_notifier(db, cfg, Arc::new(TracingNotifier))
    }

    pub fn build_with_notifier(
        db: DatabaseConnection,
        cfg: &configs::AppConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let bus = EventBus::from_config(&cfg.events);
        let policy = DeliveryPolicy::from_config(&cfg.events);
        let cache = EntityCache::from_config(&cfg.cache);

        let order_repo = Arc::new(SeaOrmOrderRepository { db: db.clone() });
        let provider_repo = Arc::new(SeaOrmProviderRepository { db: db.clone() });

        let payment_counters = Arc::new(PaymentCounterProjection::new());
        let mut listener_handles = Vec::new();
        listener_handles.push(spawn_listener(&bus, Arc::new(LogProviderPaymentActivity), policy));
        listener_handles.push(spawn_listener(&bus, payment_counters.clone(), policy));
        listener_handles.push(spawn_listener(
            &bus,
            Arc::new(NotifyProviderOnPayment::new(provider_repo.clone(), notifier.clone())),
            policy,
        ));

        Self {
            customers: CustomerService::new(Arc::new(SeaOrmCustomerRepository {
                db: db.clone(),
            })),
            addresses: AddressService::new(Arc::new(SeaOrmAddressRepository { db: db.clone() })),
            categories: CategoryService::new(
                Arc::new(SeaOrmCategoryRepository { db: db.clone() }),
                cache.clone(),
            ),
            products: ProductService::new(Arc::new(SeaOrmProductRepository { db: db.clone() })),
            orders: OrderService::new(order_repo.clone()),
            shipments: ShipmentService::new(
                Arc::new(SeaOrmShipmentRepository { db: db.clone() }),
                order_repo,
            ),
            providers: ProviderService::new(provider_repo, cache),
            provider_locations: ProviderLocationService::new(
                Arc::new(SeaOrmProviderLocationRepository { db: db.clone() }),
                bus.clone(),
            ),
            provider_insurances: ProviderInsuranceService::new(Arc::new(
                SeaOrmProviderInsuranceRepository { db: db.clone() },
            )),
            provider_payments: ProviderPaymentService::new(
                Arc::new(SeaOrmProviderPaymentRepository { db: db.clone() }),
                bus.clone(),
            ),
            segments: CustomerSegmentService::new(
                Arc::new(SeaOrmCustomerSegmentRepository { db: db.clone() }),
                bus.clone(),
            ),
            communications: CommunicationService::new(
                Arc::new(SeaOrmCommunicationRepository { db: db.clone() }),
                notifier,
            ),
            subscriptions: SubscriptionService::new(Arc::new(SeaOrmSubscriptionRepository {
                db,
            })),
            events: bus,
            payment_counters,
            listener_handles,
        }
    }

    /// Stop the listener tasks. Events published afterwards are dropped.
    pub fn shutdown_listeners(&mut self) {
        for handle in self.listener_handles.drain(..) {
            handle.abort();
        }
    }
}
