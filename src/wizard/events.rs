//! Cross-step signalling.
//!
//! Steps never call each other. A step that changes something other steps care about
//! publishes a [`WizardEvent`] on the context's bus; interested steps hold a
//! [`Subscriptions`] set and process pending events when the host dispatches.

use serde_json::{Map, Value};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, warn};

use crate::types::Runtime;

const EVENT_CAPACITY: usize = 64;

/// Events published between wizard steps
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    /// The active runtime changed; pipelines must follow its platform
    RuntimeChanged { runtime: Runtime },
    /// A step was completed; payload carries the chosen values by name
    Telemetry {
        name: String,
        payload: Map<String, Value>,
    },
}

impl WizardEvent {
    pub fn telemetry<'a>(
        name: impl Into<String>,
        fields: impl IntoIterator<Item = (&'a str, Option<&'a str>)>,
    ) -> Self {
        let payload = fields
            .into_iter()
            .map(|(key, value)| {
                (
                    key.to_string(),
                    value.map_or(Value::Null, |v| Value::String(v.to_string())),
                )
            })
            .collect();

        WizardEvent::Telemetry {
            name: name.into(),
            payload,
        }
    }

    pub fn event_type(&self) -> &str {
        match self {
            WizardEvent::RuntimeChanged { .. } => "runtime-changed",
            WizardEvent::Telemetry { name, .. } => name.as_str(),
        }
    }
}

/// Broadcast channel owned by the wizard context
pub struct EventBus {
    sender: broadcast::Sender<WizardEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WizardEvent> {
        self.sender.subscribe()
    }

    /// Publish to every live subscriber; returns how many received it
    pub fn publish(&self, event: WizardEvent) -> usize {
        let event_type = event.event_type().to_string();
        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(event = %event_type, receivers, "Published wizard event");
                receivers
            }
            // No subscribers is not an error: nobody is interested yet
            Err(_) => 0,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Receivers held by one step. Dropping or clearing it unsubscribes.
#[derive(Default)]
pub struct Subscriptions {
    receivers: Vec<broadcast::Receiver<WizardEvent>>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, receiver: broadcast::Receiver<WizardEvent>) {
        self.receivers.push(receiver);
    }

    /// Take every event received since the last drain
    pub fn drain(&mut self) -> Vec<WizardEvent> {
        let mut events = Vec::new();
        for receiver in &mut self.receivers {
            loop {
                match receiver.try_recv() {
                    Ok(event) => events.push(event),
                    Err(TryRecvError::Lagged(skipped)) => {
                        warn!(skipped, "Step fell behind on wizard events");
                    }
                    Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                }
            }
        }
        events
    }

    pub fn clear(&mut self) {
        self.receivers.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.receivers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.receivers.len()
    }
}
