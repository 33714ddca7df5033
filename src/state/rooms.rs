//! Table-driven lockbox and RGB gate checks for every room.

use std::collections::BTreeMap;

/// What a room reveals once its lockbox opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomContent {
    /// Page title.
    pub title: String,
    /// Header shown above the notes.
    pub header: String,
    /// CSS color of the header.
    pub color: String,
    /// First note found in the room.
    pub message1: String,
    /// Second note found in the room.
    pub message2: String,
}

/// What happens when a lockbox accepts a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockboxReward {
    /// Show the room's answer content.
    Reveal,
    /// Unlock the interactive part of another room.
    Unlock(u32),
}

/// Secrets of one lockbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockboxSpec {
    /// Accepted keys; any of them opens the box.
    pub secrets: Vec<String>,
    /// Fold case before comparing (textual passphrases).
    pub case_insensitive: bool,
    /// Effect of a correct key.
    pub reward: LockboxReward,
}

impl LockboxSpec {
    /// Whether `key` opens this lockbox. Keys are compared exactly, without trimming.
    pub fn accepts(&self, key: &str) -> bool {
        self.secrets.iter().any(|secret| {
            if self.case_insensitive {
                secret.to_lowercase() == key.to_lowercase()
            } else {
                secret == key
            }
        })
    }
}

/// Decision reached by a lockbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockboxDecision {
    /// The key matched.
    Pass(LockboxReward),
    /// The key did not match.
    Fail,
}

/// Secret triple of an RGB gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbKey {
    /// Red component.
    pub r: i64,
    /// Green component.
    pub g: i64,
    /// Blue component.
    pub b: i64,
}

impl RgbKey {
    /// Compare raw submitted components against the key.
    ///
    /// A component that does not parse never matches, so "not a number" and
    /// "wrong number" are indistinguishable to the caller.
    pub fn matches(&self, r: &str, g: &str, b: &str) -> bool {
        let submitted = (
            parse_component(r),
            parse_component(g),
            parse_component(b),
        );
        submitted == (Some(self.r), Some(self.g), Some(self.b))
    }
}

/// Parse one RGB component; `None` stands for "not a number".
pub fn parse_component(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Everything configured for a single room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSpec {
    /// Lockbox guarding the answer content, if the room has one.
    pub lockbox: Option<LockboxSpec>,
    /// RGB gate guarding the interactive part, if the room has one.
    pub rgb_key: Option<RgbKey>,
    /// Content revealed by the lockbox.
    pub content: Option<RoomContent>,
}

/// All rooms of the game, keyed by room number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomTable {
    rooms: BTreeMap<u32, RoomSpec>,
}

impl RoomTable {
    /// Build a table from `(room, spec)` pairs.
    pub fn new(rooms: impl IntoIterator<Item = (u32, RoomSpec)>) -> Self {
        Self {
            rooms: rooms.into_iter().collect(),
        }
    }

    /// Room configuration, if the room exists.
    pub fn room(&self, room: u32) -> Option<&RoomSpec> {
        self.rooms.get(&room)
    }

    /// Known room numbers in ascending order.
    pub fn room_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.rooms.keys().copied()
    }

    /// Run the lockbox of `room`. `None` when the room has no lockbox.
    pub fn verify_lockbox(&self, room: u32, key: &str) -> Option<LockboxDecision> {
        let lockbox = self.room(room)?.lockbox.as_ref()?;
        Some(if lockbox.accepts(key) {
            LockboxDecision::Pass(lockbox.reward)
        } else {
            LockboxDecision::Fail
        })
    }

    /// Run the RGB gate of `room`. `None` when the room has no gate.
    pub fn verify_rgb(&self, room: u32, r: &str, g: &str, b: &str) -> Option<bool> {
        let key = self.room(room)?.rgb_key?;
        Some(key.matches(r, g, b))
    }
}
