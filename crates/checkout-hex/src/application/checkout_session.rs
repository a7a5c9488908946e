use std::sync::Arc;

use checkout_types::domain::event::CheckoutEvent;
use checkout_types::domain::mask::QuoteIdMask;
use checkout_types::domain::order::Order;
use checkout_types::domain::quote::{Quote, QuoteId};
use checkout_types::domain::restore::{restore_transition, RestoreOutcome};
use checkout_types::domain::session::{CheckoutState, SessionId, SessionState, StepData};
use checkout_types::domain::store::WebsiteId;
use checkout_types::ports::cart_repository::CartRepository;
use checkout_types::ports::context::{CustomerSession, EventDispatcher, StoreResolver};
use checkout_types::ports::order_repository::OrderRepository;
use checkout_types::ports::quote_id_mask::QuoteIdMaskRepository;
use checkout_types::ports::session_storage::SessionStorage;
use serde_json::{Map, Value};

use crate::errors::AppError;

/// Everything a checkout session talks to.
#[derive(Clone)]
pub struct SessionPorts {
    pub storage: Arc<dyn SessionStorage>,
    pub orders: Arc<dyn OrderRepository>,
    pub carts: Arc<dyn CartRepository>,
    pub masks: Arc<dyn QuoteIdMaskRepository>,
    pub stores: Arc<dyn StoreResolver>,
    pub events: Arc<dyn EventDispatcher>,
    pub customer: Arc<dyn CustomerSession>,
}

/// Checkout state of one customer session, bound to a single request.
///
/// State is loaded on [`CheckoutSession::open`], mutated in place and written back
/// by [`CheckoutSession::commit`].
pub struct CheckoutSession {
    id: SessionId,
    state: SessionState,
    quote: Option<Quote>,
    last_real_order: Option<Order>,
    ports: SessionPorts,
}

impl CheckoutSession {
    pub async fn open(id: SessionId, ports: SessionPorts) -> Result<Self, AppError> {
        let state = ports.storage.load(&id).await?.unwrap_or_default();
        Ok(Self {
            id,
            state,
            quote: None,
            last_real_order: None,
            ports,
        })
    }

    pub async fn commit(&self) -> Result<(), AppError> {
        self.ports.storage.save(&self.id, self.state.clone()).await?;
        Ok(())
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    fn website_id(&self) -> WebsiteId {
        self.ports.stores.current_store().website_id
    }

    pub fn quote_id(&self) -> Option<QuoteId> {
        self.state.quote_id(self.website_id())
    }

    pub fn set_quote_id(&mut self, quote_id: Option<QuoteId>) -> &mut Self {
        let website_id = self.website_id();
        self.state.set_quote_id(website_id, quote_id);
        self
    }

    pub fn last_real_order_id(&self) -> Option<&str> {
        self.state.last_real_order_id.as_deref()
    }

    pub fn set_last_real_order_id(&mut self, increment_id: Option<String>) -> &mut Self {
        self.state.last_real_order_id = increment_id;
        self
    }

    pub fn last_order_id(&self) -> Option<&str> {
        self.state.last_order_id.as_deref()
    }

    pub fn set_last_order_id(&mut self, order_id: Option<String>) -> &mut Self {
        self.state.last_order_id = order_id;
        self
    }

    pub fn set_last_quote_id(&mut self, quote_id: Option<QuoteId>) -> &mut Self {
        self.state.last_quote_id = quote_id;
        self
    }

    pub fn set_last_success_quote_id(&mut self, quote_id: Option<QuoteId>) -> &mut Self {
        self.state.last_success_quote_id = quote_id;
        self
    }

    pub fn redirect_url(&self) -> Option<&str> {
        self.state.redirect_url.as_deref()
    }

    pub fn set_redirect_url(&mut self, url: Option<String>) -> &mut Self {
        self.state.redirect_url = url;
        self
    }

    pub fn additional_messages(&self) -> &[String] {
        &self.state.additional_messages
    }

    pub fn add_additional_message(&mut self, message: impl Into<String>) -> &mut Self {
        self.state.additional_messages.push(message.into());
        self
    }

    pub fn checkout_state(&self) -> CheckoutState {
        self.state.checkout_state
    }

    pub fn set_checkout_state(&mut self, checkout_state: CheckoutState) -> &mut Self {
        self.state.checkout_state = checkout_state;
        self
    }

    pub fn reset_checkout(&mut self) -> &mut Self {
        self.state.reset_checkout();
        self
    }

    pub fn steps(&self) -> &StepData {
        &self.state.steps
    }

    pub fn set_steps(&mut self, steps: StepData) -> &mut Self {
        self.state.steps = steps;
        self
    }

    pub fn step_data(&self, step: &str) -> Option<&Value> {
        self.state.steps.get(step)
    }

    pub fn step_value(&self, step: &str, key: &str) -> Option<&Value> {
        self.state.steps.get_value(step, key)
    }

    pub fn set_step_data(
        &mut self,
        step: impl Into<String>,
        data: Map<String, Value>,
    ) -> &mut Self {
        self.state.steps.set(step, data);
        self
    }

    pub fn set_step_value(
        &mut self,
        step: impl Into<String>,
        key: impl Into<String>,
        value: Value,
    ) -> &mut Self {
        self.state.steps.set_value(step, key, value);
        self
    }

    /// Drops the redirect url, last order ids and pending messages.
    pub fn clear_helper_data(&mut self) -> &mut Self {
        self.state.clear_helper_data();
        self
    }

    /// Forgets everything stored for this session, attached quote included, and
    /// drops the stored record.
    pub async fn clear_storage(&mut self) -> Result<&mut Self, AppError> {
        self.state = SessionState::default();
        self.quote = None;
        self.last_real_order = None;
        if !self.ports.storage.remove(&self.id).await? {
            tracing::debug!(session_id = %self.id, "no stored session to remove");
        }
        Ok(self)
    }

    pub fn has_quote(&self) -> bool {
        self.quote.is_some()
    }

    /// Order behind `last_real_order_id`; empty when unset or unknown.
    pub async fn last_real_order(&mut self) -> Order {
        let Some(increment_id) = self.state.last_real_order_id.clone() else {
            return Order::empty();
        };
        if let Some(order) = &self.last_real_order {
            if order.increment_id.as_deref() == Some(increment_id.as_str()) {
                return order.clone();
            }
        }

        let order = match self.ports.orders.load_by_increment_id(&increment_id).await {
            Ok(Some(order)) => order,
            Ok(None) => {
                tracing::debug!(%increment_id, "last real order not found");
                Order::empty()
            }
            Err(err) => {
                tracing::warn!(%increment_id, error = %err, "failed to load last real order");
                Order::empty()
            }
        };
        if order.is_loaded() {
            self.last_real_order = Some(order.clone());
        }
        order
    }

    /// Reopens the cart of the last placed order.
    ///
    /// Returns `false`, leaving the session untouched, when there is no last order,
    /// the order is gone or its quote is gone.
    pub async fn restore_quote(&mut self) -> Result<bool, AppError> {
        let website_id = self.website_id();
        let outcome = self.resolve_restore().await?;

        match &outcome {
            RestoreOutcome::Restored { quote, .. } => {
                if let Some(quote_id) = quote.id {
                    // The quote is already saved as active; a missing mask is
                    // retried on the next guest quote access.
                    if let Err(err) = self.ensure_quote_mask(quote_id).await {
                        tracing::warn!(%quote_id, error = %err, "failed to mask restored quote id");
                    }
                }
            }
            RestoreOutcome::QuoteNotFound { order } => {
                tracing::warn!(
                    increment_id = ?order.increment_id,
                    quote_id = ?order.quote_id,
                    "quote of last real order not found"
                );
            }
            RestoreOutcome::NoLastRealOrder | RestoreOutcome::OrderNotFound => {
                tracing::debug!(?outcome, "nothing to restore");
            }
        }

        let current = std::mem::take(&mut self.state);
        let (state, restored) = restore_transition(current, website_id, &outcome);
        self.state = state;

        if let RestoreOutcome::Restored { order, quote } = outcome {
            self.quote = Some(quote.clone());
            self.ports
                .events
                .dispatch(CheckoutEvent::RestoreQuote { order, quote })
                .await;
        }
        Ok(restored)
    }

    async fn resolve_restore(&mut self) -> Result<RestoreOutcome, AppError> {
        if self.state.last_real_order_id.is_none() {
            return Ok(RestoreOutcome::NoLastRealOrder);
        }
        let order = self.last_real_order().await;
        if !order.is_loaded() {
            return Ok(RestoreOutcome::OrderNotFound);
        }
        let Some(quote_id) = order.quote_id else {
            return Ok(RestoreOutcome::QuoteNotFound { order });
        };
        match self.ports.carts.get(quote_id).await? {
            Some(mut quote) => {
                quote.reactivate();
                let quote = self.ports.carts.save(quote).await?;
                Ok(RestoreOutcome::Restored { order, quote })
            }
            None => Ok(RestoreOutcome::QuoteNotFound { order }),
        }
    }

    /// Makes `quote` the working quote of the session.
    pub async fn replace_quote(&mut self, quote: Quote) -> Result<&mut Self, AppError> {
        let website_id = self.website_id();
        if let Some(quote_id) = quote.id {
            self.ensure_quote_mask(quote_id).await?;
        }
        self.state.set_quote_id(website_id, quote.id);
        self.quote = Some(quote);
        Ok(self)
    }

    /// Detaches the quote and forgets its id.
    pub async fn clear_quote(&mut self) -> &mut Self {
        let quote_id = self.quote_id();
        self.ports
            .events
            .dispatch(CheckoutEvent::QuoteDestroy { quote_id })
            .await;
        self.quote = None;
        self.set_quote_id(None);
        self.state.last_success_quote_id = None;
        self
    }

    /// The working quote, loaded on first use. Falls back to a fresh quote; lookup
    /// failures are logged, never returned.
    pub async fn quote(&mut self) -> &Quote {
        if self.quote.is_none() {
            let quote = self.load_quote().await;
            self.quote = Some(quote);
        }

        if !self.state.is_quote_masked && !self.ports.customer.is_logged_in() {
            if let Some(quote_id) = self.quote_id() {
                if let Err(err) = self.ensure_quote_mask(quote_id).await {
                    tracing::warn!(%quote_id, error = %err, "failed to mask guest quote id");
                }
            }
        }

        self.quote.get_or_insert_with(Quote::new)
    }

    async fn load_quote(&mut self) -> Quote {
        let store = self.ports.stores.current_store();
        let customer_id = self
            .ports
            .customer
            .customer_id()
            .filter(|_| self.ports.customer.is_logged_in());
        let mut quote = Quote::new();

        if let Some(quote_id) = self.state.quote_id(store.website_id) {
            match self.ports.carts.get_active(quote_id).await {
                Ok(Some(found))
                    if found.customer_id.is_some() && found.customer_id != customer_id =>
                {
                    tracing::debug!(%quote_id, "session quote belongs to another customer");
                    self.state.set_quote_id(store.website_id, None);
                }
                Ok(Some(found)) => quote = found,
                Ok(None) => {
                    tracing::debug!(%quote_id, "session quote not found");
                    self.state.set_quote_id(store.website_id, None);
                }
                Err(err) => {
                    tracing::warn!(%quote_id, error = %err, "failed to load session quote");
                    self.state.set_quote_id(store.website_id, None);
                }
            }
        }

        if self.state.quote_id(store.website_id).is_none() {
            match customer_id {
                Some(customer_id) => {
                    match self.ports.carts.get_active_for_customer(customer_id).await {
                        Ok(Some(found)) => {
                            self.state.set_quote_id(store.website_id, found.id);
                            quote = found;
                        }
                        Ok(None) => {
                            tracing::debug!(customer_id, "customer has no active cart");
                            quote.set_customer(None);
                        }
                        Err(err) => {
                            tracing::warn!(
                                customer_id,
                                error = %err,
                                "failed to load customer cart"
                            );
                            quote.set_customer(None);
                        }
                    }
                }
                None => {
                    quote.is_checkout_cart = true;
                    quote.customer_is_guest = true;
                    self.ports
                        .events
                        .dispatch(CheckoutEvent::QuoteInit {
                            quote: quote.clone(),
                        })
                        .await;
                }
            }
        }

        quote.store_id = Some(store.store_id);
        quote
    }

    async fn ensure_quote_mask(&mut self, quote_id: QuoteId) -> Result<(), AppError> {
        let mask = self.ports.masks.load_by_quote_id(quote_id).await?;
        if mask.as_ref().and_then(|m| m.masked_id.as_ref()).is_none() {
            let mask = mask.unwrap_or_else(|| QuoteIdMask::new(quote_id));
            self.ports.masks.save(mask).await?;
        }
        self.state.is_quote_masked = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use checkout_repo::context::{StaticCustomerSession, StaticStoreResolver};
    use checkout_repo::events::RecordingEventBus;
    use checkout_repo::memory::InMemoryRepo;
    use checkout_types::domain::quote::CustomerId;
    use checkout_types::domain::store::Store;
    use checkout_types::ports::order_repository::RepoError;
    use serde_json::json;

    fn ports(
        repo: &InMemoryRepo,
        events: &RecordingEventBus,
        customer: StaticCustomerSession,
    ) -> SessionPorts {
        SessionPorts {
            storage: Arc::new(repo.clone()),
            orders: Arc::new(repo.clone()),
            carts: Arc::new(repo.clone()),
            masks: Arc::new(repo.clone()),
            stores: Arc::new(StaticStoreResolver::new(Store::new(1, 1))),
            events: Arc::new(events.clone()),
            customer: Arc::new(customer),
        }
    }

    async fn guest_session(repo: &InMemoryRepo, events: &RecordingEventBus) -> CheckoutSession {
        let ports = ports(repo, events, StaticCustomerSession::guest());
        CheckoutSession::open(SessionId::generate(), ports)
            .await
            .unwrap()
    }

    /// Cart lookups by customer always fail; everything else goes to memory.
    struct BrokenCustomerCarts(InMemoryRepo);

    #[async_trait]
    impl CartRepository for BrokenCustomerCarts {
        async fn get(&self, id: QuoteId) -> Result<Option<Quote>, RepoError> {
            CartRepository::get(&self.0, id).await
        }
        async fn get_active(&self, id: QuoteId) -> Result<Option<Quote>, RepoError> {
            self.0.get_active(id).await
        }
        async fn get_active_for_customer(&self, _: CustomerId) -> Result<Option<Quote>, RepoError> {
            Err(RepoError::Storage("connection reset".into()))
        }
        async fn save(&self, quote: Quote) -> Result<Quote, RepoError> {
            CartRepository::save(&self.0, quote).await
        }
    }

    #[tokio::test]
    async fn last_real_order_is_empty_without_increment_id() {
        let repo = InMemoryRepo::new();
        repo.insert_order(Order::new(1, "000000001", QuoteId(1)));
        let mut session = guest_session(&repo, &RecordingEventBus::new()).await;

        let order = session.last_real_order().await;
        assert!(order.increment_id.is_none());
        assert!(!order.is_loaded());
    }

    #[tokio::test]
    async fn last_real_order_loads_and_follows_id_changes() {
        let repo = InMemoryRepo::new();
        repo.insert_order(Order::new(1, "000000001", QuoteId(1)));
        repo.insert_order(Order::new(2, "000000002", QuoteId(2)));
        let mut session = guest_session(&repo, &RecordingEventBus::new()).await;

        session.set_last_real_order_id(Some("000000001".into()));
        assert_eq!(session.last_real_order().await.id, Some(1));
        assert_eq!(session.last_real_order().await.id, Some(1));

        session.set_last_real_order_id(Some("000000002".into()));
        assert_eq!(session.last_real_order().await.id, Some(2));

        session.set_last_real_order_id(Some("999".into()));
        assert!(!session.last_real_order().await.is_loaded());
    }

    #[tokio::test]
    async fn has_quote_only_after_attach() {
        let repo = InMemoryRepo::new();
        let mut session = guest_session(&repo, &RecordingEventBus::new()).await;
        session.set_quote_id(Some(QuoteId(9)));
        assert!(!session.has_quote());

        session.quote().await;
        assert!(session.has_quote());

        session.clear_storage().await.unwrap();
        assert!(!session.has_quote());
        assert_eq!(session.quote_id(), None);
    }

    #[tokio::test]
    async fn replace_quote_masks_and_adopts_id() {
        let repo = InMemoryRepo::new();
        let mut session = guest_session(&repo, &RecordingEventBus::new()).await;
        let quote = Quote::with_id(QuoteId(3));

        session.replace_quote(quote.clone()).await.unwrap();

        assert_eq!(session.quote_id(), Some(QuoteId(3)));
        assert_eq!(session.quote().await, &quote);
        let mask = repo.load_by_quote_id(QuoteId(3)).await.unwrap().unwrap();
        assert!(mask.masked_id.is_some());
        assert!(session.state().is_quote_masked);
    }

    #[tokio::test]
    async fn replace_quote_keeps_existing_mask() {
        let repo = InMemoryRepo::new();
        let existing = QuoteIdMaskRepository::save(&repo, QuoteIdMask::new(QuoteId(3)))
            .await
            .unwrap();
        let mut session = guest_session(&repo, &RecordingEventBus::new()).await;

        session.replace_quote(Quote::with_id(QuoteId(3))).await.unwrap();

        let mask = repo.load_by_quote_id(QuoteId(3)).await.unwrap().unwrap();
        assert_eq!(mask.masked_id, existing.masked_id);
    }

    #[tokio::test]
    async fn reset_checkout_returns_to_begin() {
        let repo = InMemoryRepo::new();
        let mut session = guest_session(&repo, &RecordingEventBus::new()).await;
        session.set_checkout_state(CheckoutState::InProgress);
        session.reset_checkout();
        assert_eq!(session.checkout_state(), CheckoutState::Begin);
    }

    #[tokio::test]
    async fn step_data_reads_and_merges() {
        let repo = InMemoryRepo::new();
        let mut session = guest_session(&repo, &RecordingEventBus::new()).await;
        let steps: StepData = serde_json::from_value(json!({
            "simple": "data",
            "complex": { "key": "value" },
        }))
        .unwrap();
        session.set_steps(steps.clone());

        assert_eq!(session.steps(), &steps);
        assert!(session.step_data("invalid_key").is_none());
        assert_eq!(session.step_data("complex"), Some(&json!({ "key": "value" })));
        assert!(session.step_value("simple", "invalid_sub_key").is_none());
        assert_eq!(session.step_value("complex", "key"), Some(&json!("value")));

        session.set_step_value("complex", "key2", json!("value2"));
        assert_eq!(
            session.step_data("complex"),
            Some(&json!({ "key": "value", "key2": "value2" }))
        );
    }

    #[tokio::test]
    async fn customer_without_cart_gets_fresh_unassigned_quote() {
        let repo = InMemoryRepo::new();
        let events = RecordingEventBus::new();
        let mut session = CheckoutSession::open(
            SessionId::generate(),
            ports(&repo, &events, StaticCustomerSession::logged_in(42)),
        )
        .await
        .unwrap();

        let quote = session.quote().await.clone();
        assert!(quote.id.is_none());
        assert!(quote.customer_id.is_none());
        assert_eq!(quote.store_id, Some(1));
        assert_eq!(session.quote_id(), None);
        assert!(events.events().is_empty());
    }

    #[tokio::test]
    async fn customer_cart_failure_is_swallowed() {
        let repo = InMemoryRepo::new();
        let mut customer_cart = Quote::with_id(QuoteId(8));
        customer_cart.customer_id = Some(42);
        CartRepository::save(&repo, customer_cart).await.unwrap();

        let customer = StaticCustomerSession::logged_in(42);
        let mut ports = ports(&repo, &RecordingEventBus::new(), customer);
        ports.carts = Arc::new(BrokenCustomerCarts(repo.clone()));
        let mut session = CheckoutSession::open(SessionId::generate(), ports).await.unwrap();

        let quote = session.quote().await;
        assert!(quote.id.is_none());
        assert!(quote.customer_id.is_none());
    }

    #[tokio::test]
    async fn customer_cart_is_adopted() {
        let repo = InMemoryRepo::new();
        let mut customer_cart = Quote::with_id(QuoteId(8));
        customer_cart.customer_id = Some(42);
        CartRepository::save(&repo, customer_cart).await.unwrap();

        let mut session = CheckoutSession::open(
            SessionId::generate(),
            ports(&repo, &RecordingEventBus::new(), StaticCustomerSession::logged_in(42)),
        )
        .await
        .unwrap();

        assert_eq!(session.quote().await.id, Some(QuoteId(8)));
        assert_eq!(session.quote_id(), Some(QuoteId(8)));
        // Logged-in customers are not handed masked ids.
        assert!(repo.load_by_quote_id(QuoteId(8)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn guest_gets_checkout_cart_and_init_event() {
        let repo = InMemoryRepo::new();
        let events = RecordingEventBus::new();
        let mut session = guest_session(&repo, &events).await;

        let quote = session.quote().await;
        assert!(quote.customer_is_guest);
        assert!(quote.is_checkout_cart);
        assert_eq!(events.names(), vec!["checkout_quote_init"]);
    }

    #[tokio::test]
    async fn stale_quote_id_is_dropped() {
        let repo = InMemoryRepo::new();
        let mut session = guest_session(&repo, &RecordingEventBus::new()).await;
        session.set_quote_id(Some(QuoteId(77)));

        let quote = session.quote().await;
        assert!(quote.id.is_none());
        assert_eq!(session.quote_id(), None);
    }

    #[tokio::test]
    async fn foreign_customer_quote_is_not_loaded() {
        let repo = InMemoryRepo::new();
        let mut other = Quote::with_id(QuoteId(5));
        other.customer_id = Some(7);
        CartRepository::save(&repo, other).await.unwrap();

        let mut session = guest_session(&repo, &RecordingEventBus::new()).await;
        session.set_quote_id(Some(QuoteId(5)));

        assert!(session.quote().await.id.is_none());
        assert_eq!(session.quote_id(), None);
    }

    #[tokio::test]
    async fn guest_quote_id_gets_masked() {
        let repo = InMemoryRepo::new();
        CartRepository::save(&repo, Quote::with_id(QuoteId(4))).await.unwrap();
        let mut session = guest_session(&repo, &RecordingEventBus::new()).await;
        session.set_quote_id(Some(QuoteId(4)));

        assert_eq!(session.quote().await.id, Some(QuoteId(4)));
        assert!(repo.load_by_quote_id(QuoteId(4)).await.unwrap().is_some());
        assert!(session.state().is_quote_masked);
    }

    #[tokio::test]
    async fn clear_quote_forgets_quote() {
        let repo = InMemoryRepo::new();
        let events = RecordingEventBus::new();
        let mut session = guest_session(&repo, &events).await;
        session.replace_quote(Quote::with_id(QuoteId(2))).await.unwrap();
        session.set_last_success_quote_id(Some(QuoteId(2)));

        session.clear_quote().await;

        assert!(!session.has_quote());
        assert_eq!(session.quote_id(), None);
        assert!(session.state().last_success_quote_id.is_none());
        assert_eq!(
            events.events(),
            vec![CheckoutEvent::QuoteDestroy {
                quote_id: Some(QuoteId(2))
            }]
        );
    }

    #[tokio::test]
    async fn commit_and_reopen_keeps_state() {
        let repo = InMemoryRepo::new();
        let events = RecordingEventBus::new();
        let id = SessionId::generate();
        let guest = || ports(&repo, &events, StaticCustomerSession::guest());
        let mut session = CheckoutSession::open(id.clone(), guest()).await.unwrap();
        session
            .set_redirect_url(Some("https://shop.test/success".into()))
            .set_quote_id(Some(QuoteId(6)));
        session.commit().await.unwrap();

        let reopened = CheckoutSession::open(id, guest()).await.unwrap();
        assert_eq!(reopened.redirect_url(), Some("https://shop.test/success"));
        assert_eq!(reopened.quote_id(), Some(QuoteId(6)));
        assert!(!reopened.has_quote());
    }
}
