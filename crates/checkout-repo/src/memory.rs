use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use checkout_types::domain::mask::QuoteIdMask;
use checkout_types::domain::order::Order;
use checkout_types::domain::quote::{CustomerId, Quote, QuoteId};
use checkout_types::domain::session::{SessionId, SessionState};
use checkout_types::domain::totals::TotalsSnapshot;
use checkout_types::ports::cart_repository::{CartRepository, CartTotalRepository};
use checkout_types::ports::order_repository::{OrderRepository, RepoError};
use checkout_types::ports::quote_id_mask::QuoteIdMaskRepository;
use checkout_types::ports::session_storage::SessionStorage;
use dashmap::DashMap;

/// Orders, carts, masks and session records kept in process memory.
///
/// Clones share the same maps.
#[derive(Clone)]
pub struct InMemoryRepo {
    pub orders: Arc<DashMap<String, Order>>,
    pub quotes: Arc<DashMap<QuoteId, Quote>>,
    pub masks: Arc<DashMap<QuoteId, QuoteIdMask>>,
    pub sessions: Arc<DashMap<SessionId, SessionState>>,
    next_quote_id: Arc<AtomicU64>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            orders: Arc::new(DashMap::new()),
            quotes: Arc::new(DashMap::new()),
            masks: Arc::new(DashMap::new()),
            sessions: Arc::new(DashMap::new()),
            next_quote_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Orders are placed elsewhere; this only seeds the lookup.
    pub fn insert_order(&self, order: Order) {
        if let Some(increment_id) = order.increment_id.clone() {
            self.orders.insert(increment_id, order);
        }
    }
}

impl Default for InMemoryRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderRepository for InMemoryRepo {
    async fn load_by_increment_id(&self, increment_id: &str) -> Result<Option<Order>, RepoError> {
        Ok(self.orders.get(increment_id).map(|r| r.clone()))
    }
}

#[async_trait]
impl CartRepository for InMemoryRepo {
    async fn get(&self, id: QuoteId) -> Result<Option<Quote>, RepoError> {
        Ok(self.quotes.get(&id).map(|r| r.clone()))
    }

    async fn get_active(&self, id: QuoteId) -> Result<Option<Quote>, RepoError> {
        Ok(self
            .quotes
            .get(&id)
            .filter(|r| r.is_active)
            .map(|r| r.clone()))
    }

    async fn get_active_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<Quote>, RepoError> {
        Ok(self
            .quotes
            .iter()
            .filter(|kv| kv.is_active && kv.customer_id == Some(customer_id))
            .max_by_key(|kv| kv.updated_at)
            .map(|kv| kv.value().clone()))
    }

    async fn save(&self, mut quote: Quote) -> Result<Quote, RepoError> {
        let id = match quote.id {
            Some(id) => {
                self.next_quote_id.fetch_max(id.0 + 1, Ordering::SeqCst);
                id
            }
            None => QuoteId(self.next_quote_id.fetch_add(1, Ordering::SeqCst)),
        };
        quote.id = Some(id);
        quote.touch();
        self.quotes.insert(id, quote.clone());
        Ok(quote)
    }
}

#[async_trait]
impl CartTotalRepository for InMemoryRepo {
    async fn get(&self, cart_id: QuoteId) -> Result<Option<TotalsSnapshot>, RepoError> {
        let Some(mut quote) = self.quotes.get(&cart_id).map(|r| r.clone()) else {
            return Ok(None);
        };
        if !quote.totals_collected {
            quote.collect_totals();
        }
        Ok(Some(TotalsSnapshot::from_quote(cart_id, &quote)))
    }
}

#[async_trait]
impl QuoteIdMaskRepository for InMemoryRepo {
    async fn load_by_quote_id(&self, quote_id: QuoteId) -> Result<Option<QuoteIdMask>, RepoError> {
        Ok(self.masks.get(&quote_id).map(|r| r.clone()))
    }

    async fn load_by_masked_id(&self, masked_id: &str) -> Result<Option<QuoteIdMask>, RepoError> {
        Ok(self
            .masks
            .iter()
            .find(|kv| kv.masked_id.as_deref() == Some(masked_id))
            .map(|kv| kv.value().clone()))
    }

    async fn save(&self, mut mask: QuoteIdMask) -> Result<QuoteIdMask, RepoError> {
        mask.ensure_masked_id();
        self.masks.insert(mask.quote_id, mask.clone());
        Ok(mask)
    }
}

#[async_trait]
impl SessionStorage for InMemoryRepo {
    async fn load(&self, id: &SessionId) -> Result<Option<SessionState>, RepoError> {
        Ok(self.sessions.get(id).map(|r| r.clone()))
    }

    async fn save(&self, id: &SessionId, state: SessionState) -> Result<(), RepoError> {
        self.sessions.insert(id.clone(), state);
        Ok(())
    }

    async fn remove(&self, id: &SessionId) -> Result<bool, RepoError> {
        Ok(self.sessions.remove(id).is_some())
    }
}
