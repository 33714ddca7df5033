//! Room views, lockbox/RGB queries and the navigation directives they produce.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::state::rooms::RoomContent;

/// Failure flags echoed back on the room view after a redirect.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RoomQuery {
    /// Set after a rejected lockbox key.
    #[serde(default)]
    pub lockbox_failed: bool,
    /// Set after a rejected RGB key.
    #[serde(default)]
    pub rgb_failed: bool,
}

/// Key submitted to a lockbox.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LockboxQuery {
    /// Submitted key, compared as-is.
    #[serde(default)]
    pub key: String,
}

/// Components submitted to an RGB gate. Each is parsed independently.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RgbQuery {
    /// Red component.
    #[serde(default)]
    pub r: String,
    /// Green component.
    #[serde(default)]
    pub g: String,
    /// Blue component.
    #[serde(default)]
    pub b: String,
}

/// State of a room as seen by the calling team.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoomView {
    /// Room number.
    pub room: u32,
    /// Room title, when content is configured.
    pub title: Option<String>,
    /// Whether the room has a lockbox.
    pub has_lockbox: bool,
    /// Whether the room has an RGB gate.
    pub has_rgb_gate: bool,
    /// False while an RGB gate still blocks the room for this team.
    pub unlocked: bool,
    /// Whether this team opened the room's lockbox.
    pub solved: bool,
    /// Previous lockbox attempt failed.
    pub lockbox_failed: bool,
    /// Previous RGB attempt failed.
    pub rgb_failed: bool,
}

/// Content revealed once a room's lockbox opens.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnswerView {
    /// Room number.
    pub room: u32,
    /// Page title.
    pub room_title: String,
    /// Header text.
    pub room_header: String,
    /// Header color.
    pub color: String,
    /// First note.
    pub message1: String,
    /// Second note.
    pub message2: String,
}

impl AnswerView {
    /// Build the view for `room`.
    pub fn new(room: u32, content: &RoomContent) -> Self {
        Self {
            room,
            room_title: content.title.clone(),
            room_header: content.header.clone(),
            color: format!("color:{}", content.color),
            message1: content.message1.clone(),
            message2: content.message2.clone(),
        }
    }
}

/// Why the caller is sent back to a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomFailure {
    /// Wrong lockbox key.
    Lockbox,
    /// Wrong RGB key.
    Rgb,
}

/// Where a lockbox or gate decision sends the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Registration entry point.
    Register,
    /// Room view, optionally flagging a failed attempt.
    Room {
        /// Room number.
        room: u32,
        /// Failed attempt to flag.
        failure: Option<RoomFailure>,
    },
    /// Answer content of a room.
    Answer(u32),
}

impl Navigation {
    /// Path the browser is redirected to.
    pub fn location(&self) -> String {
        match self {
            Navigation::Register => "/".into(),
            Navigation::Room {
                room,
                failure: None,
            } => format!("/rooms/{room}"),
            Navigation::Room {
                room,
                failure: Some(RoomFailure::Lockbox),
            } => format!("/rooms/{room}?lockbox_failed=true"),
            Navigation::Room {
                room,
                failure: Some(RoomFailure::Rgb),
            } => format!("/rooms/{room}?rgb_failed=true"),
            Navigation::Answer(room) => format!("/rooms/{room}/answer"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_paths() {
        assert_eq!(Navigation::Register.location(), "/");
        assert_eq!(Navigation::Answer(1).location(), "/rooms/1/answer");
        assert_eq!(
            Navigation::Room {
                room: 4,
                failure: Some(RoomFailure::Rgb)
            }
            .location(),
            "/rooms/4?rgb_failed=true"
        );
        assert_eq!(
            Navigation::Room {
                room: 2,
                failure: Some(RoomFailure::Lockbox)
            }
            .location(),
            "/rooms/2?lockbox_failed=true"
        );
    }
}
