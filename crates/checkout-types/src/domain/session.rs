use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::quote::QuoteId;
use crate::domain::store::WebsiteId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutState {
    #[default]
    Begin,
    InProgress,
}

/// Payloads of the checkout wizard, keyed by step name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepData(BTreeMap<String, Value>);

impl StepData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, step: &str) -> Option<&Value> {
        self.0.get(step)
    }

    /// `None` when the step is absent, is not an object, or lacks `key`.
    pub fn get_value(&self, step: &str, key: &str) -> Option<&Value> {
        self.0.get(step)?.as_object()?.get(key)
    }

    /// Replaces the payload of one step.
    pub fn set(&mut self, step: impl Into<String>, data: Map<String, Value>) {
        self.0.insert(step.into(), Value::Object(data));
    }

    /// Merges `key` into the step object, creating it when missing.
    pub fn set_value(&mut self, step: impl Into<String>, key: impl Into<String>, value: Value) {
        let entry = self
            .0
            .entry(step.into())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(map) = entry {
            map.insert(key.into(), value);
        }
    }

}

/// Everything the checkout keeps for one customer session.
///
/// The quote id is scoped per website so one session can hold a cart on each.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    pub quote_ids: BTreeMap<WebsiteId, QuoteId>,
    pub last_order_id: Option<String>,
    pub last_real_order_id: Option<String>,
    pub last_quote_id: Option<QuoteId>,
    pub last_success_quote_id: Option<QuoteId>,
    pub redirect_url: Option<String>,
    pub additional_messages: Vec<String>,
    pub steps: StepData,
    pub checkout_state: CheckoutState,
    pub is_quote_masked: bool,
}

impl SessionState {
    pub fn quote_id(&self, website_id: WebsiteId) -> Option<QuoteId> {
        self.quote_ids.get(&website_id).copied()
    }

    pub fn set_quote_id(&mut self, website_id: WebsiteId, quote_id: Option<QuoteId>) {
        match quote_id {
            Some(id) => {
                self.quote_ids.insert(website_id, id);
            }
            None => {
                self.quote_ids.remove(&website_id);
            }
        }
    }

    pub fn clear_helper_data(&mut self) {
        self.redirect_url = None;
        self.last_order_id = None;
        self.last_real_order_id = None;
        self.additional_messages.clear();
    }

    pub fn reset_checkout(&mut self) {
        self.checkout_state = CheckoutState::Begin;
    }
}
