mod event_bus;

pub use event_bus::{
    AttemptRecordedPayload, DifficultyChangedPayload, EventBus, EventBusStats, EventEnvelope,
    MasteryReachedPayload, MasteryUpdatedPayload, SessionEndedPayload, SessionStartedPayload,
    StruggleDetectedPayload, TutorEvent, XpAwardedPayload,
};
