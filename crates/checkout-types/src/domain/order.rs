use serde::{Deserialize, Serialize};

use crate::domain::quote::QuoteId;

/// A placed order as seen by checkout. Read-only here.
///
/// A lookup that finds nothing yields an empty order (no `id`), never an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    pub id: Option<u64>,
    pub increment_id: Option<String>,
    pub quote_id: Option<QuoteId>,
}

impl Order {
    pub fn new(id: u64, increment_id: impl Into<String>, quote_id: QuoteId) -> Self {
        Self {
            id: Some(id),
            increment_id: Some(increment_id.into()),
            quote_id: Some(quote_id),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.id.is_some()
    }
}
