use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::quote::QuoteId;

/// Link between a quote id and the opaque token handed to guests in its place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuoteIdMask {
    pub quote_id: QuoteId,
    pub masked_id: Option<String>,
}

impl QuoteIdMask {
    pub fn new(quote_id: QuoteId) -> Self {
        Self {
            quote_id,
            masked_id: None,
        }
    }

    /// Fills in a masked id if the record has none yet and returns it.
    pub fn ensure_masked_id(&mut self) -> &str {
        self.masked_id
            .get_or_insert_with(|| Uuid::new_v4().simple().to_string())
            .as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_32_hex_chars_once() {
        let mut mask = QuoteIdMask::new(QuoteId(3));
        let first = mask.ensure_masked_id().to_string();
        assert_eq!(first.len(), 32);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(mask.ensure_masked_id(), first);
    }
}
