//! Request context the checkout session reads but does not own.

use async_trait::async_trait;

use crate::domain::event::CheckoutEvent;
use crate::domain::quote::CustomerId;
use crate::domain::store::Store;

pub trait StoreResolver: Send + Sync + 'static {
    fn current_store(&self) -> Store;
}

pub trait CustomerSession: Send + Sync + 'static {
    fn is_logged_in(&self) -> bool;
    fn customer_id(&self) -> Option<CustomerId>;
}

/// Fire-and-forget notification of checkout events.
#[async_trait]
pub trait EventDispatcher: Send + Sync + 'static {
    async fn dispatch(&self, event: CheckoutEvent);
}
