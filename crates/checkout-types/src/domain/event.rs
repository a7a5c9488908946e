use crate::domain::order::Order;
use crate::domain::quote::{Quote, QuoteId};

/// Notifications the checkout session emits to interested listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutEvent {
    /// A quote was reactivated from the last placed order.
    RestoreQuote { order: Order, quote: Quote },
    /// A fresh guest quote was created for the session.
    QuoteInit { quote: Quote },
    /// The session dropped its quote.
    QuoteDestroy { quote_id: Option<QuoteId> },
}

impl CheckoutEvent {
    pub fn name(&self) -> &'static str {
        match self {
            CheckoutEvent::RestoreQuote { .. } => "restore_quote",
            CheckoutEvent::QuoteInit { .. } => "checkout_quote_init",
            CheckoutEvent::QuoteDestroy { .. } => "checkout_quote_destroy",
        }
    }
}
