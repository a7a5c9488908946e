//! Fixed request context, for the binary and for tests.

use checkout_types::domain::quote::CustomerId;
use checkout_types::domain::store::Store;
use checkout_types::ports::context::{CustomerSession, StoreResolver};

#[derive(Debug, Clone, Copy)]
pub struct StaticStoreResolver {
    store: Store,
}

impl StaticStoreResolver {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl StoreResolver for StaticStoreResolver {
    fn current_store(&self) -> Store {
        self.store
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCustomerSession {
    customer_id: Option<CustomerId>,
}

impl StaticCustomerSession {
    pub fn guest() -> Self {
        Self { customer_id: None }
    }

    pub fn logged_in(customer_id: CustomerId) -> Self {
        Self {
            customer_id: Some(customer_id),
        }
    }
}

impl CustomerSession for StaticCustomerSession {
    fn is_logged_in(&self) -> bool {
        self.customer_id.is_some()
    }

    fn customer_id(&self) -> Option<CustomerId> {
        self.customer_id
    }
}
