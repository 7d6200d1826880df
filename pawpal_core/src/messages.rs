//! Message-request events emitted on habit completion.
//!
//! The engine hands each request to a [`MessageSink`] and moves on. Sinks
//! must not block and have no way to report failure back to the engine.

use serde::{Deserialize, Serialize};
use std::sync::mpsc::Sender;
use uuid::Uuid;

/// Request for an encouraging message
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageRequest {
    /// Issue order within the session, starting at 1
    pub seq: u64,
    pub id: Uuid,
    /// Display name of the completed habit
    pub habit_type: String,
    /// Goal with unit, e.g. "8 glasses"
    pub habit_goal: String,
    pub habit_progress: f64,
    pub streak_length: u32,
}

/// Destination for message requests
pub trait MessageSink {
    fn submit(&mut self, request: MessageRequest);
}

/// Sink that discards every request
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl MessageSink for NullSink {
    fn submit(&mut self, request: MessageRequest) {
        tracing::debug!("Discarding message request {}", request.seq);
    }
}

impl MessageSink for Vec<MessageRequest> {
    fn submit(&mut self, request: MessageRequest) {
        self.push(request);
    }
}

impl MessageSink for Sender<MessageRequest> {
    fn submit(&mut self, request: MessageRequest) {
        let seq = request.seq;
        if self.send(request).is_err() {
            tracing::warn!("Message channel closed, dropping request {}", seq);
        }
    }
}

impl<S: MessageSink + ?Sized> MessageSink for &mut S {
    fn submit(&mut self, request: MessageRequest) {
        (**self).submit(request);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    fn request(seq: u64) -> MessageRequest {
        MessageRequest {
            seq,
            id: Uuid::new_v4(),
            habit_type: "Water Intake".into(),
            habit_goal: "8 glasses".into(),
            habit_progress: 8.0,
            streak_length: 1,
        }
    }

    #[test]
    fn test_request_uses_collaborator_field_names() {
        let value = serde_json::to_value(request(1)).unwrap();
        assert_eq!(value["habitType"], "Water Intake");
        assert_eq!(value["habitGoal"], "8 glasses");
        assert_eq!(value["habitProgress"], 8.0);
        assert_eq!(value["streakLength"], 1);
    }

    #[test]
    fn test_channel_sink_delivers() {
        let (mut tx, rx) = channel();
        tx.submit(request(7));
        assert_eq!(rx.recv().unwrap().seq, 7);
    }

    #[test]
    fn test_closed_channel_does_not_panic() {
        let (mut tx, rx) = channel();
        drop(rx);
        tx.submit(request(1));
    }
}
