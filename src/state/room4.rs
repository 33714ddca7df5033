//! Room 4 "find the coordinate" puzzle.
//!
//! A run starts when a player presses start: the engine draws a coordinate
//! code (letter + number) and remembers who drew it. Another player has to
//! submit that code; each correct submission by a *different* player counts a
//! round and draws the next code on behalf of the submitter. After the
//! configured number of rounds the served code becomes the room passcode,
//! which the room lockbox then redeems.
//!
//! A wrong code, or a correct code submitted by the same player who drew it,
//! aborts the run: the puzzle state is removed and the team starts over.

use std::{sync::Arc, time::Duration};

use rand::Rng;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::state::{identity::TeamIdentity, ledger::RoomUnlockLedger, store::ExpiringStore};

/// Tunables of the puzzle, loaded from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room4Settings {
    /// Room number the engine is mounted on (gates and lockbox key).
    pub room: u32,
    /// Letters a code may start with.
    pub alphabet: Vec<char>,
    /// Highest number a code may end with (numbers start at 1).
    pub max_number: u32,
    /// Successful rounds required before the passcode is served.
    pub rounds: u32,
    /// Code served once every round is done; also the lockbox secret.
    pub passcode: String,
}

impl Default for Room4Settings {
    fn default() -> Self {
        Self {
            room: 4,
            alphabet: ('A'..='J').collect(),
            max_number: 10,
            rounds: 10,
            passcode: "8254".into(),
        }
    }
}

/// Per-team puzzle progress. Stored as one value so the fields live and die together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room4PuzzleState {
    /// Rounds completed in the current run.
    pub round_count: u32,
    /// Code the team must submit next (the passcode once complete).
    pub current_code: String,
    /// Player whose action drew `current_code`.
    pub last_actor_name: String,
}

/// Where a team stands in Room 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Room4Phase {
    /// The RGB gate of the room has not been opened.
    Locked,
    /// Unlocked, no run in progress.
    Unstarted,
    /// A run is in progress and waits for the next coordinate.
    AwaitingClick,
    /// Every round is done; the passcode is on display.
    Complete,
    /// The passcode went through the lockbox.
    Finished,
}

/// What the player asked for on this request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Room4Action {
    /// Begin a run.
    Start,
    /// Submit a coordinate; `None` when the form was sent empty.
    Submit(Option<String>),
    /// Just look at the room.
    Poll,
}

impl Room4Action {
    /// Combine the raw request inputs. Start wins over a coordinate.
    pub fn from_inputs(start: bool, coordinate: Option<String>) -> Self {
        if start {
            return Room4Action::Start;
        }
        match coordinate {
            Some(coordinate) => Room4Action::Submit(Some(coordinate)),
            None => Room4Action::Poll,
        }
    }
}

/// Reason a run was aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Room4Notice {
    /// The submitted coordinate did not match.
    Incorrect,
    /// The player who drew the code also submitted it.
    AssistanceRequired,
}

/// Result of handling one request, consumed by the display adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room4Outcome {
    /// Phase after the request.
    pub phase: Room4Phase,
    /// Rounds completed so far, `None` when no run is active.
    pub round_count: Option<u32>,
    /// Code to display, if any.
    pub code: Option<String>,
    /// Set when the request aborted the run.
    pub notice: Option<Room4Notice>,
}

impl Room4Outcome {
    fn without_run(phase: Room4Phase) -> Self {
        Self {
            phase,
            round_count: None,
            code: None,
            notice: None,
        }
    }

    fn aborted(notice: Room4Notice) -> Self {
        Self {
            notice: Some(notice),
            ..Self::without_run(Room4Phase::Unstarted)
        }
    }

    fn showing(state: &Room4PuzzleState, rounds: u32) -> Self {
        let phase = if state.round_count >= rounds {
            Room4Phase::Complete
        } else {
            Room4Phase::AwaitingClick
        };
        Self {
            phase,
            round_count: Some(state.round_count),
            code: Some(state.current_code.clone()),
            notice: None,
        }
    }
}

/// Source of fresh coordinate codes.
pub trait CodeSource: Send + Sync {
    /// Draw the next code for a run played with `settings`.
    fn next_code(&self, settings: &Room4Settings) -> String;
}

/// Uniformly random codes from the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCodes;

impl CodeSource for RandomCodes {
    fn next_code(&self, settings: &Room4Settings) -> String {
        let mut rng = rand::rng();
        let letter = if settings.alphabet.is_empty() {
            'A'
        } else {
            settings.alphabet[rng.random_range(0..settings.alphabet.len())]
        };
        let number = rng.random_range(1..=settings.max_number.max(1));
        format!("{letter}{number}")
    }
}

/// Change to apply to the stored puzzle state.
#[derive(Debug, Clone, PartialEq, Eq)]
enum StateChange {
    Keep,
    Replace(Room4PuzzleState),
    Clear,
}

/// Pure transition for an unlocked, unfinished team.
fn step(
    settings: &Room4Settings,
    codes: &dyn CodeSource,
    current: Option<&Room4PuzzleState>,
    actor: &str,
    action: &Room4Action,
) -> (StateChange, Room4Outcome) {
    let Some(state) = current else {
        return match action {
            Room4Action::Start => {
                let fresh = Room4PuzzleState {
                    round_count: 0,
                    current_code: codes.next_code(settings),
                    last_actor_name: actor.to_owned(),
                };
                let outcome = Room4Outcome::showing(&fresh, settings.rounds);
                (StateChange::Replace(fresh), outcome)
            }
            Room4Action::Submit(_) | Room4Action::Poll => (
                StateChange::Keep,
                Room4Outcome::without_run(Room4Phase::Unstarted),
            ),
        };
    };

    if state.round_count >= settings.rounds {
        return (
            StateChange::Keep,
            Room4Outcome::showing(state, settings.rounds),
        );
    }

    let Room4Action::Submit(Some(coordinate)) = action else {
        return (
            StateChange::Keep,
            Room4Outcome::showing(state, settings.rounds),
        );
    };

    if state.last_actor_name == actor {
        return (
            StateChange::Clear,
            Room4Outcome::aborted(Room4Notice::AssistanceRequired),
        );
    }

    if *coordinate != state.current_code {
        return (
            StateChange::Clear,
            Room4Outcome::aborted(Room4Notice::Incorrect),
        );
    }

    let round_count = state.round_count + 1;
    let current_code = if round_count >= settings.rounds {
        settings.passcode.clone()
    } else {
        codes.next_code(settings)
    };
    let next = Room4PuzzleState {
        round_count,
        current_code,
        last_actor_name: actor.to_owned(),
    };
    let outcome = Room4Outcome::showing(&next, settings.rounds);
    (StateChange::Replace(next), outcome)
}

/// Drives the Room 4 puzzle for every team.
pub struct Room4Engine {
    settings: Room4Settings,
    ledger: Arc<RoomUnlockLedger>,
    puzzles: ExpiringStore<u32, Room4PuzzleState>,
    transition_gate: Mutex<()>,
    codes: Arc<dyn CodeSource>,
}

impl Room4Engine {
    /// Build an engine with its own puzzle store.
    pub fn new(
        settings: Room4Settings,
        ledger: Arc<RoomUnlockLedger>,
        capacity: usize,
        ttl: Duration,
        codes: Arc<dyn CodeSource>,
    ) -> Self {
        Self {
            settings,
            ledger,
            puzzles: ExpiringStore::new(capacity, ttl),
            transition_gate: Mutex::new(()),
            codes,
        }
    }

    /// Puzzle settings in use.
    pub fn settings(&self) -> &Room4Settings {
        &self.settings
    }

    /// Stored puzzle state for `team`, if a run is active.
    pub async fn puzzle_state(&self, team: u32) -> Option<Room4PuzzleState> {
        self.puzzles.get(&team).await
    }

    /// Apply `action` for the caller and report what to display.
    pub async fn handle(&self, identity: &TeamIdentity, action: Room4Action) -> Room4Outcome {
        let team = identity.team;
        let _guard = self.transition_gate.lock().await;

        if !self.ledger.is_unlocked(team, self.settings.room).await {
            return Room4Outcome::without_run(Room4Phase::Locked);
        }
        if self.ledger.is_solved(team, self.settings.room).await {
            return Room4Outcome::without_run(Room4Phase::Finished);
        }

        let current = self.puzzles.get(&team).await;
        let (change, outcome) = step(
            &self.settings,
            self.codes.as_ref(),
            current.as_ref(),
            &identity.name,
            &action,
        );

        match change {
            StateChange::Keep => {}
            StateChange::Replace(next) => {
                debug!(team, round = next.round_count, "room 4 state advanced");
                self.puzzles.put(team, next).await;
            }
            StateChange::Clear => {
                info!(team, name = %identity.name, notice = ?outcome.notice, "room 4 run aborted");
                self.puzzles.delete(&team).await;
            }
        }

        outcome
    }

    /// Check a lockbox submission against the passcode.
    ///
    /// The passcode only opens the lockbox once the team has unlocked the room
    /// and completed every round. On a match the puzzle state is dropped for
    /// good and the room is recorded as solved. Returns whether the key was
    /// accepted; a team that already finished the room may enter it again.
    pub async fn redeem_passcode(&self, identity: &TeamIdentity, key: &str) -> bool {
        if key != self.settings.passcode {
            return false;
        }

        let team = identity.team;
        let room = self.settings.room;
        let _guard = self.transition_gate.lock().await;

        if !self.ledger.is_unlocked(team, room).await {
            debug!(team, "room 4 passcode rejected, room locked");
            return false;
        }
        if self.ledger.is_solved(team, room).await {
            return true;
        }
        let complete = self
            .puzzles
            .get(&team)
            .await
            .is_some_and(|state| state.round_count >= self.settings.rounds);
        if !complete {
            debug!(team, "room 4 passcode rejected, rounds incomplete");
            return false;
        }

        self.puzzles.delete(&team).await;
        self.ledger.mark_solved(identity, room).await;
        info!(team, "room 4 passcode redeemed");
        true
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, sync::Mutex as StdMutex};

    use tokio::time::advance;

    use super::*;
    use crate::state::audit::NoopAuditSink;

    /// Hands out codes from a fixed script, then falls back to `Z0`.
    struct ScriptedCodes(StdMutex<VecDeque<&'static str>>);

    impl ScriptedCodes {
        fn new(codes: &[&'static str]) -> Arc<Self> {
            Arc::new(Self(StdMutex::new(codes.iter().copied().collect())))
        }
    }

    impl CodeSource for ScriptedCodes {
        fn next_code(&self, _settings: &Room4Settings) -> String {
            self.0
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or("Z0")
                .to_string()
        }
    }

    fn engine_with(codes: Arc<dyn CodeSource>) -> (Room4Engine, Arc<RoomUnlockLedger>) {
        let ledger = Arc::new(RoomUnlockLedger::new(
            100,
            Duration::from_secs(36_000),
            Arc::new(NoopAuditSink),
        ));
        let engine = Room4Engine::new(
            Room4Settings::default(),
            ledger.clone(),
            100,
            Duration::from_secs(3_600),
            codes,
        );
        (engine, ledger)
    }

    async fn unlocked_engine(codes: &[&'static str]) -> Room4Engine {
        let (engine, ledger) = engine_with(ScriptedCodes::new(codes));
        ledger.unlock(&TeamIdentity::new("Alice", 1), 4).await;
        engine
    }

    fn submit(code: &str) -> Room4Action {
        Room4Action::Submit(Some(code.to_string()))
    }

    #[tokio::test(start_paused = true)]
    async fn locked_team_sees_locked_room_whatever_the_action() {
        let (engine, _ledger) = engine_with(ScriptedCodes::new(&["C7"]));
        let alice = TeamIdentity::new("Alice", 1);

        for action in [Room4Action::Start, submit("C7"), Room4Action::Poll] {
            let outcome = engine.handle(&alice, action).await;
            assert_eq!(outcome.phase, Room4Phase::Locked);
        }
        assert_eq!(engine.puzzle_state(1).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn start_draws_code_and_records_actor() {
        let engine = unlocked_engine(&["C7"]).await;
        let alice = TeamIdentity::new("Alice", 1);

        let idle = engine.handle(&alice, Room4Action::Poll).await;
        assert_eq!(idle.phase, Room4Phase::Unstarted);

        let outcome = engine.handle(&alice, Room4Action::Start).await;
        assert_eq!(outcome.phase, Room4Phase::AwaitingClick);
        assert_eq!(outcome.code.as_deref(), Some("C7"));
        assert_eq!(outcome.round_count, Some(0));
        assert_eq!(
            engine.puzzle_state(1).await,
            Some(Room4PuzzleState {
                round_count: 0,
                current_code: "C7".into(),
                last_actor_name: "Alice".into(),
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn submission_without_a_run_only_offers_start() {
        let engine = unlocked_engine(&["C7"]).await;
        let bob = TeamIdentity::new("Bob", 1);

        let outcome = engine.handle(&bob, submit("C7")).await;
        assert_eq!(outcome, Room4Outcome::without_run(Room4Phase::Unstarted));
        assert_eq!(engine.puzzle_state(1).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn polling_is_idempotent() {
        let engine = unlocked_engine(&["C7", "F3"]).await;
        let alice = TeamIdentity::new("Alice", 1);
        engine.handle(&alice, Room4Action::Start).await;

        for _ in 0..3 {
            let outcome = engine.handle(&alice, Room4Action::Poll).await;
            assert_eq!(outcome.code.as_deref(), Some("C7"));
            assert_eq!(outcome.round_count, Some(0));
        }
        let empty = engine.handle(&alice, Room4Action::Submit(None)).await;
        assert_eq!(empty.code.as_deref(), Some("C7"));
        let restart = engine.handle(&alice, Room4Action::Start).await;
        assert_eq!(restart.code.as_deref(), Some("C7"));
    }

    #[tokio::test(start_paused = true)]
    async fn alice_and_bob_scenario() {
        let engine = unlocked_engine(&["C7", "F3"]).await;
        let alice = TeamIdentity::new("Alice", 1);
        let bob = TeamIdentity::new("Bob", 1);

        engine.handle(&alice, Room4Action::Start).await;

        let advanced = engine.handle(&bob, submit("C7")).await;
        assert_eq!(advanced.round_count, Some(1));
        assert_eq!(advanced.code.as_deref(), Some("F3"));
        assert_eq!(
            engine
                .puzzle_state(1)
                .await
                .map(|state| state.last_actor_name),
            Some("Bob".to_string())
        );

        // Bob drew F3, so Alice may submit it.
        let advanced = engine.handle(&alice, submit("F3")).await;
        assert_eq!(advanced.round_count, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn same_actor_replay_resets_the_run() {
        let engine = unlocked_engine(&["C7", "F3"]).await;
        let alice = TeamIdentity::new("Alice", 1);
        let bob = TeamIdentity::new("Bob", 1);

        engine.handle(&alice, Room4Action::Start).await;
        engine.handle(&bob, submit("C7")).await;

        let outcome = engine.handle(&bob, submit("F3")).await;
        assert_eq!(outcome.phase, Room4Phase::Unstarted);
        assert_eq!(outcome.notice, Some(Room4Notice::AssistanceRequired));
        assert_eq!(outcome.round_count, None);
        assert_eq!(engine.puzzle_state(1).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn replay_check_runs_before_code_check() {
        let engine = unlocked_engine(&["C7"]).await;
        let alice = TeamIdentity::new("Alice", 1);
        engine.handle(&alice, Room4Action::Start).await;

        let outcome = engine.handle(&alice, submit("J1")).await;
        assert_eq!(outcome.notice, Some(Room4Notice::AssistanceRequired));
    }

    #[tokio::test(start_paused = true)]
    async fn wrong_code_resets_the_run() {
        let engine = unlocked_engine(&["C7"]).await;
        let alice = TeamIdentity::new("Alice", 1);
        let bob = TeamIdentity::new("Bob", 1);
        engine.handle(&alice, Room4Action::Start).await;

        let outcome = engine.handle(&bob, submit("c7")).await;
        assert_eq!(outcome.notice, Some(Room4Notice::Incorrect));
        assert_eq!(outcome.phase, Room4Phase::Unstarted);
        assert_eq!(engine.puzzle_state(1).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn ten_rounds_serve_the_passcode() {
        let codes = ROUND_CODES;
        let engine = unlocked_engine(&codes).await;
        let players = [TeamIdentity::new("Alice", 1), TeamIdentity::new("Bob", 1)];

        engine.handle(&players[0], Room4Action::Start).await;
        let mut last = None;
        for (round, code) in codes.iter().enumerate() {
            let actor = &players[(round + 1) % 2];
            last = Some(engine.handle(actor, submit(code)).await);
        }

        let last = last.unwrap();
        assert_eq!(last.phase, Room4Phase::Complete);
        assert_eq!(last.round_count, Some(10));
        assert_eq!(last.code.as_deref(), Some("8254"));

        // The passcode stays put whoever polls or submits.
        for action in [Room4Action::Poll, submit("nope"), Room4Action::Start] {
            let outcome = engine.handle(&players[0], action).await;
            assert_eq!(outcome.phase, Room4Phase::Complete);
            assert_eq!(outcome.code.as_deref(), Some("8254"));
            assert_eq!(outcome.round_count, Some(10));
        }
    }

    const ROUND_CODES: [&str; 10] = ["A1", "B2", "C3", "D4", "E5", "F6", "G7", "H8", "I9", "J10"];

    async fn play_all_rounds(engine: &Room4Engine) {
        let players = [TeamIdentity::new("Alice", 1), TeamIdentity::new("Bob", 1)];
        engine.handle(&players[0], Room4Action::Start).await;
        for (round, code) in ROUND_CODES.iter().enumerate() {
            engine.handle(&players[(round + 1) % 2], submit(code)).await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn passcode_finishes_the_room_for_good() {
        let engine = unlocked_engine(&ROUND_CODES).await;
        let alice = TeamIdentity::new("Alice", 1);
        play_all_rounds(&engine).await;

        assert!(!engine.redeem_passcode(&alice, "0000").await);
        assert!(engine.puzzle_state(1).await.is_some());

        assert!(engine.redeem_passcode(&alice, "8254").await);
        assert_eq!(engine.puzzle_state(1).await, None);

        let outcome = engine.handle(&alice, Room4Action::Start).await;
        assert_eq!(outcome.phase, Room4Phase::Finished);
        assert_eq!(engine.puzzle_state(1).await, None);

        // Reopening the lockbox of a finished room is still accepted.
        assert!(engine.redeem_passcode(&alice, "8254").await);
    }

    #[tokio::test(start_paused = true)]
    async fn passcode_is_refused_while_the_room_is_locked() {
        let (engine, ledger) = engine_with(ScriptedCodes::new(&[]));
        let eve = TeamIdentity::new("Eve", 9);

        assert!(!engine.redeem_passcode(&eve, "8254").await);
        assert!(!ledger.is_solved(9, 4).await);
        assert_eq!(
            engine.handle(&eve, Room4Action::Poll).await.phase,
            Room4Phase::Locked
        );
    }

    #[tokio::test(start_paused = true)]
    async fn passcode_is_refused_before_the_last_round() {
        let engine = unlocked_engine(&["C7"]).await;
        let alice = TeamIdentity::new("Alice", 1);

        // No run at all.
        assert!(!engine.redeem_passcode(&alice, "8254").await);

        engine.handle(&alice, Room4Action::Start).await;
        assert!(!engine.redeem_passcode(&alice, "8254").await);

        let outcome = engine.handle(&alice, Room4Action::Poll).await;
        assert_eq!(outcome.phase, Room4Phase::AwaitingClick);
        assert_eq!(outcome.code.as_deref(), Some("C7"));
        assert_eq!(engine.puzzle_state(1).await.map(|s| s.round_count), Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn many_teams_stay_within_store_capacity() {
        let (engine, ledger) = engine_with(ScriptedCodes::new(&[]));

        for team in 1..=250 {
            let identity = TeamIdentity::new("Alice", team);
            ledger.unlock(&identity, 4).await;
            engine.handle(&identity, Room4Action::Start).await;
        }
        for team in 1_000..11_000 {
            engine
                .handle(&TeamIdentity::new("Mallory", team), Room4Action::Poll)
                .await;
        }

        assert!(engine.puzzles.len().await <= 100);
        assert!(engine.puzzle_state(250).await.is_some());
        assert_eq!(engine.puzzle_state(1).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_run_counts_as_unstarted() {
        let engine = unlocked_engine(&["C7"]).await;
        let alice = TeamIdentity::new("Alice", 1);
        engine.handle(&alice, Room4Action::Start).await;

        advance(Duration::from_secs(3_601)).await;

        let outcome = engine.handle(&alice, Room4Action::Poll).await;
        assert_eq!(outcome.phase, Room4Phase::Unstarted);
    }

    #[tokio::test(start_paused = true)]
    async fn teams_do_not_share_runs() {
        let (engine, ledger) = engine_with(ScriptedCodes::new(&["C7", "D8"]));
        ledger.unlock(&TeamIdentity::new("Alice", 1), 4).await;
        ledger.unlock(&TeamIdentity::new("Carol", 2), 4).await;

        engine
            .handle(&TeamIdentity::new("Alice", 1), Room4Action::Start)
            .await;
        let other = engine
            .handle(&TeamIdentity::new("Dave", 2), submit("C7"))
            .await;

        assert_eq!(other.phase, Room4Phase::Unstarted);
        assert_eq!(engine.puzzle_state(1).await.map(|s| s.round_count), Some(0));
    }

    #[tokio::test]
    async fn racing_submissions_advance_only_once() {
        let engine = Arc::new(unlocked_engine(&["C7", "F3", "G4"]).await);
        engine
            .handle(&TeamIdentity::new("Alice", 1), Room4Action::Start)
            .await;

        let first = {
            let engine = engine.clone();
            tokio::spawn(async move {
                engine
                    .handle(&TeamIdentity::new("Bob", 1), submit("C7"))
                    .await
            })
        };
        let second = {
            let engine = engine.clone();
            tokio::spawn(async move {
                engine
                    .handle(&TeamIdentity::new("Carol", 1), submit("C7"))
                    .await
            })
        };

        let outcomes = [first.await.unwrap(), second.await.unwrap()];
        let advanced = outcomes
            .iter()
            .filter(|outcome| outcome.round_count == Some(1))
            .count();
        assert_eq!(advanced, 1);
        // The loser submitted a superseded code and aborted the run.
        assert!(
            outcomes
                .iter()
                .any(|outcome| outcome.notice == Some(Room4Notice::Incorrect))
        );
    }

    #[test]
    fn random_codes_stay_inside_the_grid() {
        let settings = Room4Settings::default();
        for _ in 0..500 {
            let code = RandomCodes.next_code(&settings);
            let (letter, number) = code.split_at(1);
            assert!(('A'..='J').contains(&letter.chars().next().unwrap()));
            let number: u32 = number.parse().unwrap();
            assert!((1..=10).contains(&number));
        }
    }

    #[test]
    fn start_takes_precedence_over_coordinate() {
        assert_eq!(
            Room4Action::from_inputs(true, Some("C7".into())),
            Room4Action::Start
        );
        assert_eq!(
            Room4Action::from_inputs(false, Some("C7".into())),
            submit("C7")
        );
        assert_eq!(Room4Action::from_inputs(false, None), Room4Action::Poll);
    }
}
