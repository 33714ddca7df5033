//! Display payload of the Room 4 puzzle and its conversion from engine outcomes.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::state::room4::{Room4Action, Room4Notice, Room4Outcome, Room4Phase};

const LOCKED_MESSAGE: &str = "This room is locked. Enter the RGB key to get in.";
const INCORRECT_MESSAGE: &str = "Incorrect coordinate. Press start to try again.";
const ASSISTANCE_MESSAGE: &str = "Assistance required. Please ask a game master for help.";
const COMPLETE_MESSAGE: &str = "All rounds complete. Enter the passcode in the lockbox.";
const FINISHED_MESSAGE: &str = "Room solved.";

/// Inputs of a Room 4 request.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Room4Query {
    /// Any value other than empty, `false` or `0` starts a run.
    #[serde(default)]
    pub start: Option<String>,
    /// Coordinate clicked by the player. Empty counts as absent.
    #[serde(default)]
    pub coordinate: Option<String>,
}

impl Room4Query {
    /// Resolve the engine action. Start wins over a coordinate.
    pub fn action(self) -> Room4Action {
        let start = self
            .start
            .as_deref()
            .is_some_and(|value| !matches!(value.trim(), "" | "false" | "0"));
        let coordinate = self.coordinate.filter(|value| !value.is_empty());
        Room4Action::from_inputs(start, coordinate)
    }
}

/// Color of the status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MessageColor {
    /// Informational.
    Black,
    /// The run was aborted.
    Red,
}

/// What the Room 4 page should display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Room4View {
    /// Whether the start control is offered.
    pub show_start: bool,
    /// Status line, if any.
    pub message: Option<String>,
    /// Color of `message`.
    pub message_color: MessageColor,
    /// Coordinate (or passcode) to show.
    pub current_code_hint: Option<String>,
}

impl Room4View {
    fn info(show_start: bool, message: Option<&str>, hint: Option<String>) -> Self {
        Self {
            show_start,
            message: message.map(str::to_owned),
            message_color: MessageColor::Black,
            current_code_hint: hint,
        }
    }
}

impl From<&Room4Outcome> for Room4View {
    fn from(outcome: &Room4Outcome) -> Self {
        match (outcome.phase, outcome.notice) {
            (_, Some(notice)) => {
                let message = match notice {
                    Room4Notice::Incorrect => INCORRECT_MESSAGE,
                    Room4Notice::AssistanceRequired => ASSISTANCE_MESSAGE,
                };
                Self {
                    show_start: true,
                    message: Some(message.to_owned()),
                    message_color: MessageColor::Red,
                    current_code_hint: None,
                }
            }
            (Room4Phase::Locked, None) => Self::info(false, Some(LOCKED_MESSAGE), None),
            (Room4Phase::Unstarted, None) => Self::info(true, None, None),
            (Room4Phase::AwaitingClick, None) => Self::info(false, None, outcome.code.clone()),
            (Room4Phase::Complete, None) => {
                Self::info(false, Some(COMPLETE_MESSAGE), outcome.code.clone())
            }
            (Room4Phase::Finished, None) => Self::info(false, Some(FINISHED_MESSAGE), None),
        }
    }
}
