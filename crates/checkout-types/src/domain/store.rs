use serde::{Deserialize, Serialize};

pub type StoreId = u32;
pub type WebsiteId = u32;

/// The store view a request is served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub store_id: StoreId,
    pub website_id: WebsiteId,
}

impl Store {
    pub fn new(store_id: StoreId, website_id: WebsiteId) -> Self {
        Self {
            store_id,
            website_id,
        }
    }
}
