use async_trait::async_trait;

use crate::domain::session::{SessionId, SessionState};
use crate::ports::order_repository::RepoError;

#[async_trait]
pub trait SessionStorage: Send + Sync + 'static {
    async fn load(&self, id: &SessionId) -> Result<Option<SessionState>, RepoError>;
    async fn save(&self, id: &SessionId, state: SessionState) -> Result<(), RepoError>;
    async fn remove(&self, id: &SessionId) -> Result<bool, RepoError>;
}
