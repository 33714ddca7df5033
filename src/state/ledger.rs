use std::{sync::Arc, time::Duration};

use tracing::debug;

use crate::state::{audit::AuditSink, identity::TeamIdentity, store::ExpiringStore};

/// Progress flag stored per team and room. Presence of the key means the flag is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressKey {
    /// The RGB gate of the room has been opened.
    Unlocked {
        /// Team number.
        team: u32,
        /// Room number.
        room: u32,
    },
    /// The lockbox of the room has been opened.
    Solved {
        /// Team number.
        team: u32,
        /// Room number.
        room: u32,
    },
}

/// Per-team record of which rooms are unlocked and solved.
///
/// Flags are only ever dropped by the TTL of the backing store.
pub struct RoomUnlockLedger {
    store: ExpiringStore<ProgressKey, ()>,
    audit: Arc<dyn AuditSink>,
}

impl RoomUnlockLedger {
    /// Build a ledger backed by a fresh store.
    pub fn new(capacity: usize, ttl: Duration, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            store: ExpiringStore::new(capacity, ttl),
            audit,
        }
    }

    /// Whether `team` may enter the interactive part of `room`.
    pub async fn is_unlocked(&self, team: u32, room: u32) -> bool {
        self.store
            .contains(&ProgressKey::Unlocked { team, room })
            .await
    }

    /// Record that the team opened the RGB gate of `room` and emit the audit event.
    pub async fn unlock(&self, identity: &TeamIdentity, room: u32) {
        let team = identity.team;
        self.store.put(ProgressKey::Unlocked { team, room }, ()).await;
        debug!(team, room, "ledger unlock recorded");
        self.audit.room_unlocked(identity, room);
    }

    /// Whether `team` opened the lockbox of `room`.
    pub async fn is_solved(&self, team: u32, room: u32) -> bool {
        self.store.contains(&ProgressKey::Solved { team, room }).await
    }

    /// Record that the team opened the lockbox of `room` and emit the audit event.
    pub async fn mark_solved(&self, identity: &TeamIdentity, room: u32) {
        let team = identity.team;
        self.store.put(ProgressKey::Solved { team, room }, ()).await;
        debug!(team, room, "ledger solve recorded");
        self.audit.room_solved(identity, room);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tokio::time::advance;

    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<(&'static str, u32, u32)>>,
    }

    impl AuditSink for RecordingSink {
        fn room_unlocked(&self, identity: &TeamIdentity, room: u32) {
            self.events
                .lock()
                .unwrap()
                .push(("unlocked", identity.team, room));
        }

        fn room_solved(&self, identity: &TeamIdentity, room: u32) {
            self.events
                .lock()
                .unwrap()
                .push(("solved", identity.team, room));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn unlock_is_scoped_to_team_and_room() {
        let sink = Arc::new(RecordingSink::default());
        let ledger = RoomUnlockLedger::new(16, Duration::from_secs(100), sink.clone());
        let alice = TeamIdentity::new("Alice", 1);

        assert!(!ledger.is_unlocked(1, 4).await);
        ledger.unlock(&alice, 4).await;

        assert!(ledger.is_unlocked(1, 4).await);
        assert!(!ledger.is_unlocked(1, 3).await);
        assert!(!ledger.is_unlocked(2, 4).await);
        assert!(!ledger.is_solved(1, 4).await);
        assert_eq!(*sink.events.lock().unwrap(), vec![("unlocked", 1, 4)]);
    }

    #[tokio::test(start_paused = true)]
    async fn unlock_lapses_after_ttl() {
        let ledger = RoomUnlockLedger::new(
            16,
            Duration::from_secs(100),
            Arc::new(RecordingSink::default()),
        );
        ledger.unlock(&TeamIdentity::new("Alice", 1), 4).await;

        advance(Duration::from_secs(99)).await;
        assert!(ledger.is_unlocked(1, 4).await);
        advance(Duration::from_secs(2)).await;
        assert!(!ledger.is_unlocked(1, 4).await);
    }

    #[tokio::test(start_paused = true)]
    async fn solving_records_audit_event() {
        let sink = Arc::new(RecordingSink::default());
        let ledger = RoomUnlockLedger::new(16, Duration::from_secs(100), sink.clone());
        ledger.mark_solved(&TeamIdentity::new("Bob", 7), 1).await;

        assert!(ledger.is_solved(7, 1).await);
        assert!(!ledger.is_unlocked(7, 1).await);
        assert_eq!(*sink.events.lock().unwrap(), vec![("solved", 7, 1)]);
    }
}
