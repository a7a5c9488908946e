use async_trait::async_trait;

use crate::domain::mask::QuoteIdMask;
use crate::domain::quote::QuoteId;
use crate::ports::order_repository::RepoError;

#[async_trait]
pub trait QuoteIdMaskRepository: Send + Sync + 'static {
    async fn load_by_quote_id(&self, quote_id: QuoteId) -> Result<Option<QuoteIdMask>, RepoError>;
    async fn load_by_masked_id(&self, masked_id: &str) -> Result<Option<QuoteIdMask>, RepoError>;
    /// Stores the mask, generating the masked id when it is still empty.
    async fn save(&self, mask: QuoteIdMask) -> Result<QuoteIdMask, RepoError>;
}
