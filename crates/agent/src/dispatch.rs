use serde::{Deserialize, Serialize};

/// Outbound side of an action: where user-facing text goes.
pub trait MessageSink: Send {
    fn emit(&mut self, text: String);
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub text: String,
}

/// Collects emitted messages in order so a host can return them in one response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollectingDispatcher {
    messages: Vec<OutboundMessage>,
}

impl CollectingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[OutboundMessage] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<OutboundMessage> {
        self.messages
    }
}

impl MessageSink for CollectingDispatcher {
    fn emit(&mut self, text: String) {
        self.messages.push(OutboundMessage { text });
    }
}
