use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use crate::adaptive::{DifficultyLevel, SessionStatus};

const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum TutorEvent {
    #[serde(rename = "SESSION_STARTED")]
    SessionStarted(SessionStartedPayload),

    #[serde(rename = "ATTEMPT_RECORDED")]
    AttemptRecorded(AttemptRecordedPayload),

    #[serde(rename = "MASTERY_UPDATED")]
    MasteryUpdated(MasteryUpdatedPayload),

    #[serde(rename = "DIFFICULTY_CHANGED")]
    DifficultyChanged(DifficultyChangedPayload),

    #[serde(rename = "MASTERY_REACHED")]
    MasteryReached(MasteryReachedPayload),

    #[serde(rename = "STRUGGLE_DETECTED")]
    StruggleDetected(StruggleDetectedPayload),

    #[serde(rename = "XP_AWARDED")]
    XpAwarded(XpAwardedPayload),

    #[serde(rename = "SESSION_ENDED")]
    SessionEnded(SessionEndedPayload),
}

impl TutorEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            TutorEvent::SessionStarted(_) => "SESSION_STARTED",
            TutorEvent::AttemptRecorded(_) => "ATTEMPT_RECORDED",
            TutorEvent::MasteryUpdated(_) => "MASTERY_UPDATED",
            TutorEvent::DifficultyChanged(_) => "DIFFICULTY_CHANGED",
            TutorEvent::MasteryReached(_) => "MASTERY_REACHED",
            TutorEvent::StruggleDetected(_) => "STRUGGLE_DETECTED",
            TutorEvent::XpAwarded(_) => "XP_AWARDED",
            TutorEvent::SessionEnded(_) => "SESSION_ENDED",
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        match self {
            TutorEvent::SessionStarted(p) => Some(&p.session_id),
            TutorEvent::AttemptRecorded(p) => p.session_id.as_deref(),
            TutorEvent::MasteryUpdated(p) => p.session_id.as_deref(),
            TutorEvent::DifficultyChanged(p) => p.session_id.as_deref(),
            TutorEvent::MasteryReached(p) => p.session_id.as_deref(),
            TutorEvent::StruggleDetected(p) => p.session_id.as_deref(),
            TutorEvent::XpAwarded(p) => Some(&p.session_id),
            TutorEvent::SessionEnded(p) => Some(&p.session_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStartedPayload {
    pub session_id: String,
    pub level_id: String,
    pub concept: String,
    pub difficulty: DifficultyLevel,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecordedPayload {
    pub session_id: Option<String>,
    pub attempt_number: usize,
    pub correct: bool,
    pub time_spent_seconds: f64,
    pub used_hint: bool,
    pub difficulty: DifficultyLevel,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryUpdatedPayload {
    pub session_id: Option<String>,
    pub mastery: f64,
    pub attempt_count: usize,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyChangedPayload {
    pub session_id: Option<String>,
    pub from: DifficultyLevel,
    pub to: DifficultyLevel,
    pub recent_accuracy: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryReachedPayload {
    pub session_id: Option<String>,
    pub mastery: f64,
    pub attempts: usize,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StruggleDetectedPayload {
    pub session_id: Option<String>,
    pub recent_accuracy: f64,
    pub attempts: usize,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XpAwardedPayload {
    pub session_id: String,
    pub amount: u32,
    pub total: u64,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEndedPayload {
    pub session_id: String,
    pub level_id: String,
    pub status: SessionStatus,
    pub attempts: usize,
    pub correct: usize,
    pub xp_earned: u64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct EventEnvelope {
    pub id: String,
    pub event: TutorEvent,
    pub created_at: DateTime<Utc>,
}

impl EventEnvelope {
    pub fn new(event: TutorEvent) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            event,
            created_at: Utc::now(),
        }
    }
}

type SubscriberId = String;

struct Subscriber {
    session_id: Option<String>,
    event_types: Option<Vec<String>>,
    sender: broadcast::Sender<EventEnvelope>,
}

impl Subscriber {
    fn matches(&self, envelope: &EventEnvelope) -> bool {
        if let Some(ref session_id) = self.session_id {
            if envelope.event.session_id() != Some(session_id.as_str()) {
                return false;
            }
        }

        if let Some(ref event_types) = self.event_types {
            if !event_types.iter().any(|t| t == envelope.event.event_type()) {
                return false;
            }
        }

        true
    }
}

/// Fan-out of tutor events. Publishing is synchronous and never fails: an
/// event nobody listens to is dropped.
pub struct EventBus {
    global_sender: broadcast::Sender<EventEnvelope>,
    subscribers: RwLock<HashMap<SubscriberId, Subscriber>>,
    event_count: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        let (global_sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            global_sender,
            subscribers: RwLock::new(HashMap::new()),
            event_count: AtomicU64::new(0),
        }
    }

    /// Returns how many receivers the event reached.
    pub fn publish(&self, event: TutorEvent) -> usize {
        let envelope = EventEnvelope::new(event);
        self.event_count.fetch_add(1, Ordering::Relaxed);

        let mut sent_count = 0usize;
        {
            let subscribers = self.subscribers.read();
            for subscriber in subscribers.values() {
                if subscriber.matches(&envelope) && subscriber.sender.send(envelope.clone()).is_ok() {
                    sent_count += 1;
                }
            }
        }

        match self.global_sender.send(envelope.clone()) {
            Ok(receivers) => sent_count += receivers,
            Err(_) => debug!("No global subscribers for event"),
        }

        debug!(
            event_type = envelope.event.event_type(),
            session_id = envelope.event.session_id().unwrap_or("-"),
            sent_to = sent_count,
            "Event published"
        );

        sent_count
    }

    pub fn subscribe_global(&self) -> broadcast::Receiver<EventEnvelope> {
        self.global_sender.subscribe()
    }

    pub fn subscribe_filtered(
        &self,
        session_id: Option<String>,
        event_types: Option<Vec<String>>,
    ) -> (SubscriberId, broadcast::Receiver<EventEnvelope>) {
        let (sender, receiver) = broadcast::channel(CHANNEL_CAPACITY);
        let subscriber_id = uuid::Uuid::new_v4().to_string();

        self.subscribers.write().insert(
            subscriber_id.clone(),
            Subscriber {
                session_id,
                event_types,
                sender,
            },
        );

        debug!(subscriber_id = %subscriber_id, "New filtered subscription created");

        (subscriber_id, receiver)
    }

    pub fn unsubscribe(&self, subscriber_id: &str) {
        if self.subscribers.write().remove(subscriber_id).is_some() {
            debug!(subscriber_id = %subscriber_id, "Subscription removed");
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len() + self.global_sender.receiver_count()
    }

    pub fn event_count(&self) -> u64 {
        self.event_count.load(Ordering::Relaxed)
    }

    pub fn stats(&self) -> EventBusStats {
        EventBusStats {
            total_events: self.event_count(),
            subscriber_count: self.subscriber_count(),
            global_subscribers: self.global_sender.receiver_count(),
            filtered_subscribers: self.subscribers.read().len(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventBusStats {
    pub total_events: u64,
    pub subscriber_count: usize,
    pub global_subscribers: usize,
    pub filtered_subscribers: usize,
}
