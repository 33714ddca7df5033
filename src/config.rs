//! Application-level configuration loading: store sizing, puzzle tunables and room secrets.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::{
    room4::Room4Settings,
    rooms::{LockboxReward, LockboxSpec, RgbKey, RoomContent, RoomSpec, RoomTable},
};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "ESCAPE_ROOMS_CONFIG_PATH";

/// Sizing of the in-memory stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreSettings {
    /// Maximum entries per store.
    pub capacity: usize,
    /// Lifetime of unlock/solve flags.
    pub progress_ttl: Duration,
    /// Lifetime of Room 4 puzzle runs.
    pub puzzle_ttl: Duration,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            capacity: 100,
            progress_ttl: Duration::from_secs(36_000),
            puzzle_ttl: Duration::from_secs(3_600),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Store sizing.
    pub stores: StoreSettings,
    /// Whether unlock/solve events are written to the audit log.
    pub audit_enabled: bool,
    /// Room 4 puzzle tunables.
    pub room4: Room4Settings,
    /// Lockboxes, gates and content of every room.
    pub rooms: RoomTable,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(app_config) => {
                    info!(
                        path = %path.display(),
                        rooms = app_config.rooms.room_numbers().count(),
                        "loaded escape rooms config"
                    );
                    for issue in app_config.puzzle_room_issues() {
                        warn!(path = %path.display(), room = app_config.room4.room, "{issue}");
                    }
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Describe settings that leave the Room 4 puzzle unreachable or partly ignored.
    pub fn puzzle_room_issues(&self) -> Vec<&'static str> {
        let Some(spec) = self.rooms.room(self.room4.room) else {
            return vec!["puzzle room is not listed in rooms; it can never be unlocked"];
        };
        let mut issues = Vec::new();
        if spec.rgb_key.is_none() {
            issues.push("puzzle room has no rgb_key; it can never be unlocked");
        }
        if spec.lockbox.is_some() {
            issues.push("puzzle room lockbox is ignored; the puzzle passcode opens it");
        }
        issues
    }

    /// Parse a JSON document; omitted sections keep their defaults.
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            stores: StoreSettings::default(),
            audit_enabled: true,
            room4: Room4Settings::default(),
            rooms: default_rooms(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    stores: Option<RawStores>,
    audit: Option<RawAudit>,
    room4: Option<RawRoom4>,
    rooms: Option<Vec<RawRoom>>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = AppConfig::default();
        Self {
            stores: value.stores.map(Into::into).unwrap_or(defaults.stores),
            audit_enabled: value
                .audit
                .map(|audit| audit.enabled)
                .unwrap_or(defaults.audit_enabled),
            room4: value.room4.map(Into::into).unwrap_or(defaults.room4),
            rooms: value
                .rooms
                .map(|rooms| RoomTable::new(rooms.into_iter().map(RawRoom::into_entry)))
                .unwrap_or(defaults.rooms),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawStores {
    capacity: usize,
    progress_ttl_secs: u64,
    puzzle_ttl_secs: u64,
}

impl From<RawStores> for StoreSettings {
    fn from(value: RawStores) -> Self {
        Self {
            capacity: value.capacity,
            progress_ttl: Duration::from_secs(value.progress_ttl_secs),
            puzzle_ttl: Duration::from_secs(value.puzzle_ttl_secs),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawAudit {
    enabled: bool,
}

#[derive(Debug, Deserialize)]
struct RawRoom4 {
    #[serde(default = "default_room4_number")]
    room: u32,
    alphabet: String,
    max_number: u32,
    rounds: u32,
    passcode: String,
}

fn default_room4_number() -> u32 {
    4
}

impl From<RawRoom4> for Room4Settings {
    fn from(value: RawRoom4) -> Self {
        Self {
            room: value.room,
            alphabet: value.alphabet.chars().collect(),
            max_number: value.max_number,
            rounds: value.rounds,
            passcode: value.passcode,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawRoom {
    room: u32,
    #[serde(default)]
    lockbox: Option<RawLockbox>,
    #[serde(default)]
    rgb_key: Option<RawRgbKey>,
    #[serde(default)]
    content: Option<RawContent>,
}

impl RawRoom {
    fn into_entry(self) -> (u32, RoomSpec) {
        let spec = RoomSpec {
            lockbox: self.lockbox.map(|lockbox| LockboxSpec {
                secrets: lockbox.secrets,
                case_insensitive: lockbox.case_insensitive,
                reward: match lockbox.unlocks {
                    Some(room) => LockboxReward::Unlock(room),
                    None => LockboxReward::Reveal,
                },
            }),
            rgb_key: self.rgb_key.map(|key| RgbKey {
                r: key.r,
                g: key.g,
                b: key.b,
            }),
            content: self.content.map(|content| RoomContent {
                title: content.title,
                header: content.header,
                color: content.color,
                message1: content.message1,
                message2: content.message2,
            }),
        };
        (self.room, spec)
    }
}

#[derive(Debug, Deserialize)]
struct RawLockbox {
    secrets: Vec<String>,
    #[serde(default)]
    case_insensitive: bool,
    /// Room unlocked by this lockbox; absent means the answer content is revealed.
    #[serde(default)]
    unlocks: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawRgbKey {
    r: i64,
    g: i64,
    b: i64,
}

#[derive(Debug, Deserialize)]
struct RawContent {
    title: String,
    header: String,
    color: String,
    message1: String,
    message2: String,
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn content(title: &str, header: &str, color: &str, message1: &str, message2: &str) -> RoomContent {
    RoomContent {
        title: title.into(),
        header: header.into(),
        color: color.into(),
        message1: message1.into(),
        message2: message2.into(),
    }
}

/// Built-in rooms shipped with the binary.
fn default_rooms() -> RoomTable {
    RoomTable::new([
        (
            1,
            RoomSpec {
                lockbox: Some(LockboxSpec {
                    secrets: vec!["13407".into()],
                    case_insensitive: false,
                    reward: LockboxReward::Reveal,
                }),
                rgb_key: None,
                content: Some(content(
                    "Room 1",
                    "Red Room",
                    "red",
                    "There is a note with the message: \"R: 5\"",
                    "A second note has the message: \"The keys to locked rooms are in RGB format.\"",
                )),
            },
        ),
        (
            2,
            RoomSpec {
                lockbox: Some(LockboxSpec {
                    secrets: vec!["lantern".into()],
                    case_insensitive: true,
                    reward: LockboxReward::Reveal,
                }),
                rgb_key: None,
                content: Some(content(
                    "Room 2",
                    "Green Room",
                    "green",
                    "There is a note with the message: \"G: 128\"",
                    "A second note has the message: \"Not every room opens with words.\"",
                )),
            },
        ),
        (
            3,
            RoomSpec {
                lockbox: Some(LockboxSpec {
                    secrets: vec!["6021".into()],
                    case_insensitive: false,
                    reward: LockboxReward::Reveal,
                }),
                rgb_key: None,
                content: Some(content(
                    "Room 3",
                    "Blue Room",
                    "blue",
                    "There is a note with the message: \"B: 255\"",
                    "A second note has the message: \"Room 4 needs two pairs of hands.\"",
                )),
            },
        ),
        (
            4,
            RoomSpec {
                lockbox: None,
                rgb_key: Some(RgbKey {
                    r: 5,
                    g: 128,
                    b: 255,
                }),
                content: Some(content(
                    "Room 4",
                    "Grid Room",
                    "black",
                    "The grid goes dark as the lockbox clicks open.",
                    "A final note reads: \"Well done. Find a game master.\"",
                )),
            },
        ),
    ])
}
