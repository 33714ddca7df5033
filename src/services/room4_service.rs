//! Service helpers behind the Room 4 puzzle route.

use tracing::debug;

use crate::{
    dto::room4::{Room4Query, Room4View},
    state::{SharedState, identity::TeamIdentity},
};

/// Apply the requested action for the caller and project the outcome for display.
pub async fn play(state: &SharedState, identity: &TeamIdentity, query: Room4Query) -> Room4View {
    let action = query.action();
    debug!(team = identity.team, name = %identity.name, ?action, "room 4 request");
    let outcome = state.room4().handle(identity, action).await;
    Room4View::from(&outcome)
}
