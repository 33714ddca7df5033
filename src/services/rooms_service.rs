//! Business logic powering the room routes: views, lockboxes and RGB gates.
//!
//! The Room 4 lockbox is special: its secret is the puzzle passcode, so it is
//! delegated to the puzzle engine instead of the room table.

use tracing::{debug, info};

use crate::{
    dto::rooms::{AnswerView, Navigation, RoomFailure, RoomQuery, RoomView},
    error::ServiceError,
    state::{
        SharedState,
        identity::TeamIdentity,
        rooms::{LockboxDecision, LockboxReward, RoomSpec},
    },
};

fn find_room(state: &SharedState, room: u32) -> Result<&RoomSpec, ServiceError> {
    state
        .rooms()
        .room(room)
        .ok_or_else(|| ServiceError::NotFound(format!("room `{room}` not found")))
}

fn is_puzzle_room(state: &SharedState, room: u32) -> bool {
    state.room4().settings().room == room
}

/// Describe `room` from the caller's point of view.
pub async fn room_view(
    state: &SharedState,
    identity: &TeamIdentity,
    room: u32,
    query: RoomQuery,
) -> Result<RoomView, ServiceError> {
    let spec = find_room(state, room)?;
    let has_rgb_gate = spec.rgb_key.is_some();
    let unlocked = !has_rgb_gate || state.ledger().is_unlocked(identity.team, room).await;

    Ok(RoomView {
        room,
        title: spec.content.as_ref().map(|content| content.title.clone()),
        has_lockbox: spec.lockbox.is_some() || is_puzzle_room(state, room),
        has_rgb_gate,
        unlocked,
        solved: state.ledger().is_solved(identity.team, room).await,
        lockbox_failed: query.lockbox_failed,
        rgb_failed: query.rgb_failed,
    })
}

/// Check a lockbox key and decide where the caller goes next.
pub async fn open_lockbox(
    state: &SharedState,
    identity: &TeamIdentity,
    room: u32,
    key: &str,
) -> Result<Navigation, ServiceError> {
    find_room(state, room)?;
    let failed = Navigation::Room {
        room,
        failure: Some(RoomFailure::Lockbox),
    };

    if is_puzzle_room(state, room) {
        return Ok(if state.room4().redeem_passcode(identity, key).await {
            Navigation::Answer(room)
        } else {
            failed
        });
    }

    let decision = state
        .rooms()
        .verify_lockbox(room, key)
        .ok_or_else(|| ServiceError::NotFound(format!("room `{room}` has no lockbox")))?;

    match decision {
        LockboxDecision::Fail => {
            debug!(team = identity.team, room, "lockbox rejected key");
            Ok(failed)
        }
        LockboxDecision::Pass(LockboxReward::Reveal) => {
            state.ledger().mark_solved(identity, room).await;
            Ok(Navigation::Answer(room))
        }
        LockboxDecision::Pass(LockboxReward::Unlock(target)) => {
            state.ledger().mark_solved(identity, room).await;
            state.ledger().unlock(identity, target).await;
            info!(team = identity.team, room, target, "lockbox unlocked another room");
            Ok(Navigation::Room {
                room: target,
                failure: None,
            })
        }
    }
}

/// Check an RGB key and unlock the room on a match.
pub async fn open_rgb_gate(
    state: &SharedState,
    identity: &TeamIdentity,
    room: u32,
    r: &str,
    g: &str,
    b: &str,
) -> Result<Navigation, ServiceError> {
    find_room(state, room)?;
    let matched = state
        .rooms()
        .verify_rgb(room, r, g, b)
        .ok_or_else(|| ServiceError::NotFound(format!("room `{room}` has no RGB gate")))?;

    if !matched {
        debug!(team = identity.team, room, "RGB gate rejected key");
        return Ok(Navigation::Room {
            room,
            failure: Some(RoomFailure::Rgb),
        });
    }

    state.ledger().unlock(identity, room).await;
    Ok(Navigation::Room {
        room,
        failure: None,
    })
}

/// Return the content revealed by the lockbox of `room`, once the caller opened it.
pub async fn answer(
    state: &SharedState,
    identity: &TeamIdentity,
    room: u32,
) -> Result<AnswerView, ServiceError> {
    let spec = find_room(state, room)?;
    if !state.ledger().is_solved(identity.team, room).await {
        return Err(ServiceError::InvalidState(format!(
            "lockbox of room `{room}` is still closed"
        )));
    }
    let content = spec
        .content
        .as_ref()
        .ok_or_else(|| ServiceError::NotFound(format!("room `{room}` has no answer content")))?;

    Ok(AnswerView::new(room, content))
}
