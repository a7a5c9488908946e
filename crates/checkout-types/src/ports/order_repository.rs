use async_trait::async_trait;

use crate::domain::order::Order;

#[derive(thiserror::Error, Debug)]
pub enum RepoError {
    #[error("storage error: {0}")]
    Storage(String),
}

/// Lookup of placed orders.
///
/// `Ok(None)` means the order does not exist; `Err` is reserved for failures of
/// the backing store.
#[async_trait]
pub trait OrderRepository: Send + Sync + 'static {
    async fn load_by_increment_id(&self, increment_id: &str) -> Result<Option<Order>, RepoError>;
}
