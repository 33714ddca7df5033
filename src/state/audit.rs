//! Hook points for recording room unlocks and solves.

use std::time::SystemTime;

use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::info;

use crate::state::identity::TeamIdentity;

/// Receives progress events worth keeping an audit trail of.
pub trait AuditSink: Send + Sync {
    /// A team entered the right RGB key for `room`.
    fn room_unlocked(&self, identity: &TeamIdentity, room: u32);

    /// A team opened the lockbox of `room`.
    fn room_solved(&self, identity: &TeamIdentity, room: u32);
}

/// Writes audit lines through `tracing` under the `audit` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn room_unlocked(&self, identity: &TeamIdentity, room: u32) {
        info!(
            target: "audit",
            team = identity.team,
            name = %identity.name,
            room,
            at = %now_rfc3339(),
            "room unlocked"
        );
    }

    fn room_solved(&self, identity: &TeamIdentity, room: u32) {
        info!(
            target: "audit",
            team = identity.team,
            name = %identity.name,
            room,
            at = %now_rfc3339(),
            "room solved"
        );
    }
}

/// Discards every event; used when audit logging is switched off.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn room_unlocked(&self, _identity: &TeamIdentity, _room: u32) {}

    fn room_solved(&self, _identity: &TeamIdentity, _room: u32) {}
}

fn now_rfc3339() -> String {
    OffsetDateTime::from(SystemTime::now())
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
