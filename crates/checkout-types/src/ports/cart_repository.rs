use async_trait::async_trait;

use crate::domain::quote::{CustomerId, Quote, QuoteId};
use crate::domain::totals::TotalsSnapshot;
use crate::ports::order_repository::RepoError;

#[async_trait]
pub trait CartRepository: Send + Sync + 'static {
    /// Any quote by id, active or not.
    async fn get(&self, id: QuoteId) -> Result<Option<Quote>, RepoError>;
    async fn get_active(&self, id: QuoteId) -> Result<Option<Quote>, RepoError>;
    async fn get_active_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<Quote>, RepoError>;
    /// Persists the quote, assigning an id to a fresh one.
    async fn save(&self, quote: Quote) -> Result<Quote, RepoError>;
}

#[async_trait]
pub trait CartTotalRepository: Send + Sync + 'static {
    async fn get(&self, cart_id: QuoteId) -> Result<Option<TotalsSnapshot>, RepoError>;
}
