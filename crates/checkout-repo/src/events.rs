use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use checkout_types::domain::event::CheckoutEvent;
use checkout_types::ports::context::EventDispatcher;

/// Logs every event and keeps it for later inspection.
#[derive(Clone, Default)]
pub struct RecordingEventBus {
    events: Arc<Mutex<Vec<CheckoutEvent>>>,
}

impl RecordingEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<CheckoutEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(CheckoutEvent::name).collect()
    }
}

#[async_trait]
impl EventDispatcher for RecordingEventBus {
    async fn dispatch(&self, event: CheckoutEvent) {
        tracing::debug!(event = event.name(), "checkout event");
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
