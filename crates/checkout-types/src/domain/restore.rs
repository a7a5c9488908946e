//! Restoring the cart of the last placed order.
//!
//! The lookups happen in the session service; what they found is summarised as a
//! [`RestoreOutcome`] and [`restore_transition`] decides the new session state.

use crate::domain::order::Order;
use crate::domain::quote::Quote;
use crate::domain::session::SessionState;
use crate::domain::store::WebsiteId;

#[derive(Debug, Clone, PartialEq)]
pub enum RestoreOutcome {
    /// The session has no last real order id.
    NoLastRealOrder,
    /// The increment id did not resolve to a stored order.
    OrderNotFound,
    /// The order exists but its quote does not.
    QuoteNotFound { order: Order },
    /// The quote was found, reactivated and saved.
    Restored { order: Order, quote: Quote },
}

/// Only a restored quote changes the session: its id becomes the website's quote
/// id and the last real order id is dropped. Every other outcome leaves the state
/// as it was.
pub fn restore_transition(
    mut state: SessionState,
    website_id: WebsiteId,
    outcome: &RestoreOutcome,
) -> (SessionState, bool) {
    match outcome {
        RestoreOutcome::Restored { quote, .. } => {
            state.set_quote_id(website_id, quote.id);
            state.last_real_order_id = None;
            (state, true)
        }
        RestoreOutcome::NoLastRealOrder
        | RestoreOutcome::OrderNotFound
        | RestoreOutcome::QuoteNotFound { .. } => (state, false),
    }
}
