//! Core game logic and state management

pub mod accusation;
pub mod clue_index;
pub mod config;
pub mod ledger;

pub use accusation::{
    AccusationEngine, AccusationPrompt, Decision, EngineOutcome, EngineState, Evaluation, Offer,
    Verdict,
};
pub use clue_index::ClueIndex;
pub use config::GameConfig;
pub use ledger::{checksum, Association, SuspectLedger, Tally};

use crate::data::mansion::{self, WIRED_CLUES};
use crate::data::*;
use crate::{GameError, Result};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Walking the mansion
    Exploring,
    /// An accusation has been offered and needs an answer
    AwaitingVerdict,
    /// The culprit was caught; waiting to hear whether to play again
    CaseClosed,
    /// The player left
    Finished,
}

/// Game statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    pub rooms_visited: u32,
    pub clues_discovered: u32,
    pub accusations_made: u32,
    pub wrong_accusations: u32,
    /// Carried across resets
    pub cases_opened: u32,
    /// Carried across resets
    pub games_won: u32,
}

/// A message to display to the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMessage {
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    pub source: String,
    pub message: String,
}

impl GameMessage {
    pub fn info(source: &str, message: &str) -> Self {
        Self::alert(Severity::Info, source, message)
    }

    pub fn alert(severity: Severity, source: &str, message: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            severity,
            source: source.to_string(),
            message: message.to_string(),
        }
    }
}

/// What happened on entering a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomReport {
    pub room: RoomName,
    /// The move ran past a dead end and came back to the entrance.
    pub looped_back: bool,
    /// `None` when the room holds no clue or the clue could not be filed.
    pub evaluation: Option<Evaluation>,
}

/// End-of-game listing of the ledger and where the evidence points
#[derive(Debug, Clone, Serialize)]
pub struct CaseSummary {
    pub associations: Vec<(SuspectName, ClueText)>,
    pub discovered: Vec<ClueText>,
    pub most_likely: Option<(SuspectName, usize)>,
}

impl fmt::Display for CaseSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===== Clues ↔ suspects =====")?;
        for (suspect, clue) in &self.associations {
            writeln!(f, " • [{}] ➜ {}", suspect, clue)?;
        }
        writeln!(f, "===== Clues found: {} =====", self.discovered.len())?;
        for clue in &self.discovered {
            writeln!(f, " • {}", clue)?;
        }
        match &self.most_likely {
            Some((suspect, clues)) => {
                writeln!(f, "Most likely suspect: {} ({} clues)", suspect, clues)
            }
            None => writeln!(f, "No suspect stands out yet."),
        }
    }
}

/// Everything rebuilt on a new case
struct World {
    map: Map,
    clues: ClueIndex,
    ledger: SuspectLedger,
    culprit: SuspectName,
}

/// One playthrough: the mansion, the evidence gathered so far and the truth
#[derive(Debug)]
pub struct Session<R: Rng = StdRng> {
    pub id: Id,
    config: GameConfig,
    map: Map,
    current: RoomId,
    clues: ClueIndex,
    ledger: SuspectLedger,
    culprit: SuspectName,
    engine: AccusationEngine,
    phase: GamePhase,
    pub stats: GameStats,
    pub message_log: Vec<GameMessage>,
    rng: R,
}

impl Session<StdRng> {
    /// A session whose culprit and wiring are fixed by `seed`.
    pub fn from_seed(config: GameConfig, seed: u64) -> Result<Self> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(config: GameConfig) -> Result<Self> {
        Self::new(config, StdRng::from_entropy())
    }
}

impl<R: Rng> Session<R> {
    /// Open a new case. `rng` picks the culprit and shuffles who each clue
    /// points at.
    pub fn new(config: GameConfig, mut rng: R) -> Result<Self> {
        config.validate()?;

        let mut message_log = Vec::new();
        let world = Self::build_world(&config, &mut rng, &mut message_log)?;
        let mut session = Self {
            id: Id::new(),
            engine: AccusationEngine::new(config.evidence_threshold),
            config,
            current: world.map.root(),
            map: world.map,
            clues: world.clues,
            ledger: world.ledger,
            culprit: world.culprit,
            phase: GamePhase::Exploring,
            stats: GameStats {
                cases_opened: 1,
                ..GameStats::default()
            },
            message_log,
            rng,
        };
        session.open_case();
        Ok(session)
    }

    fn build_world(config: &GameConfig, rng: &mut R, log: &mut Vec<GameMessage>) -> Result<World> {
        let map = mansion::build_map()?;
        let pool = mansion::suspect_pool()?;

        let culprit = pool
            .choose(rng)
            .cloned()
            .ok_or_else(|| GameError::InvalidState("the suspect pool is empty".to_string()))?;

        let mut order: Vec<usize> = (0..pool.len()).collect();
        order.shuffle(rng);

        let mut ledger =
            SuspectLedger::with_capacity_limit(config.bucket_count, config.ledger_capacity)?;
        for (i, text) in WIRED_CLUES.iter().enumerate() {
            let suspect = pool[order[i % order.len()]].clone();
            if let Err(e) = ledger.insert(ClueText::new(*text)?, suspect) {
                warn!(error = %e, clue = text, "association dropped");
                log.push(GameMessage::alert(Severity::Warning, "Ledger", &e.to_string()));
            }
        }

        let mut clues = ClueIndex::with_capacity_limit(config.clue_capacity);
        if let Err(e) = clues.insert(mansion::initial_clue()?) {
            warn!(error = %e, "initial clue dropped");
            log.push(GameMessage::alert(Severity::Warning, "Clues", &e.to_string()));
        }

        Ok(World {
            map,
            clues,
            ledger,
            culprit,
        })
    }

    fn open_case(&mut self) {
        info!(session = %self.id, case = self.stats.cases_opened, "case opened");
        debug!(session = %self.id, culprit = %self.culprit, "culprit drawn");
        self.add_message(GameMessage::info(
            "System",
            "A crime was committed in the mansion. Find the clues and name the culprit.",
        ));
    }

    /// Throw away the mansion, the evidence and the culprit and open a fresh
    /// case. Cumulative statistics survive.
    pub fn reset(&mut self) -> Result<()> {
        let mut log = Vec::new();
        let world = Self::build_world(&self.config, &mut self.rng, &mut log)?;
        self.current = world.map.root();
        self.map = world.map;
        self.clues = world.clues;
        self.ledger = world.ledger;
        self.culprit = world.culprit;
        self.engine.reset();
        self.phase = GamePhase::Exploring;
        self.stats = GameStats {
            cases_opened: self.stats.cases_opened + 1,
            games_won: self.stats.games_won,
            ..GameStats::default()
        };
        self.message_log = log;
        self.open_case();
        Ok(())
    }

    /// Add a message to the log
    pub fn add_message(&mut self, message: GameMessage) {
        self.message_log.push(message);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn current_room_id(&self) -> RoomId {
        self.current
    }

    pub fn current_room(&self) -> &Room {
        self.map.room(self.current)
    }

    pub fn clues(&self) -> &ClueIndex {
        &self.clues
    }

    pub fn ledger(&self) -> &SuspectLedger {
        &self.ledger
    }

    pub fn engine(&self) -> &AccusationEngine {
        &self.engine
    }

    /// The truth. Only a controller that wants to cheat should look.
    pub fn culprit(&self) -> &SuspectName {
        &self.culprit
    }

    fn expect_phase(&self, phase: GamePhase, action: &str) -> Result<()> {
        if self.phase != phase {
            return Err(GameError::InvalidState(format!(
                "cannot {} while {:?}",
                action, self.phase
            )));
        }
        Ok(())
    }

    /// Walk one room left or right, then look around.
    pub fn explore(&mut self, direction: Direction) -> Result<RoomReport> {
        self.expect_phase(GamePhase::Exploring, "explore")?;

        let step = self.map.explore(direction, self.current);
        self.current = step.room;
        if step.looped_back {
            self.add_message(GameMessage::info(
                "Map",
                "Nothing lies beyond this room. Back to the starting point.",
            ));
        }

        let mut report = self.enter_current_room()?;
        report.looped_back = step.looped_back;
        Ok(report)
    }

    /// Look around the current room and weigh any clue found there.
    pub fn enter_current_room(&mut self) -> Result<RoomReport> {
        self.expect_phase(GamePhase::Exploring, "search a room")?;
        self.stats.rooms_visited += 1;

        let room = self.map.room(self.current);
        let name = room.name().clone();
        let clue = room.clue().cloned();

        let evaluation = match clue {
            Some(clue) => {
                let line = format!("Found a clue here: {}", clue);
                self.add_message(GameMessage::info("Clues", &line));
                self.discover_clue(&clue)?
            }
            None => None,
        };
        self.add_message(GameMessage::info("Map", &format!("You are in: {}", name)));

        Ok(RoomReport {
            room: name,
            looped_back: false,
            evaluation,
        })
    }

    /// Feed a clue to the accusation engine. A full clue index drops the
    /// event with a warning and returns `Ok(None)`.
    pub fn discover_clue(&mut self, clue: &ClueText) -> Result<Option<Evaluation>> {
        self.expect_phase(GamePhase::Exploring, "collect clues")?;

        let evaluation = match self.engine.discover(clue, &mut self.clues, &self.ledger) {
            Ok(evaluation) => evaluation,
            Err(e @ GameError::CapacityExhausted { .. }) => {
                warn!(error = %e, clue = %clue, "clue dropped");
                self.add_message(GameMessage::alert(Severity::Warning, "Clues", &e.to_string()));
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if evaluation.newly_filed {
            self.stats.clues_discovered += 1;
        }
        if let Some(suspect) = &evaluation.suspect {
            let line = format!(
                "Clue '{}' points at {}. (Clues against them: {})",
                evaluation.clue, suspect, evaluation.evidence_count
            );
            self.add_message(GameMessage::alert(Severity::Notice, "Ledger", &line));
        }
        if let Some(offer) = &evaluation.offer {
            let line = format!(
                "{} or more clues point at {}. Accuse them?",
                self.engine.threshold(),
                offer.suspect
            );
            self.add_message(GameMessage::alert(Severity::Warning, "Verdict", &line));
            self.phase = GamePhase::AwaitingVerdict;
        }
        Ok(Some(evaluation))
    }

    /// Answer the open accusation offer.
    pub fn resolve_accusation(&mut self, decision: Decision) -> Result<EngineOutcome> {
        self.expect_phase(GamePhase::AwaitingVerdict, "answer an accusation")?;
        let outcome = self.engine.resolve(decision, &self.culprit)?;

        match &outcome {
            EngineOutcome::NoAction | EngineOutcome::Declined { .. } => {
                self.phase = GamePhase::Exploring;
                self.add_message(GameMessage::info("Verdict", "Back to the investigation..."));
            }
            EngineOutcome::AccusationResolved { accused, verdict } => {
                self.stats.accusations_made += 1;
                match verdict {
                    Verdict::Correct => {
                        self.stats.games_won += 1;
                        self.phase = GamePhase::CaseClosed;
                        info!(session = %self.id, accused = %accused, "case solved");
                        self.add_message(GameMessage::alert(
                            Severity::Notice,
                            "Verdict",
                            &format!(
                                "The investigation was conclusive! {} is the culprit. Case closed.",
                                accused
                            ),
                        ));
                    }
                    Verdict::Incorrect => {
                        self.stats.wrong_accusations += 1;
                        self.phase = GamePhase::Exploring;
                        info!(session = %self.id, accused = %accused, "wrong accusation");
                        self.add_message(GameMessage::alert(
                            Severity::Critical,
                            "Verdict",
                            &format!(
                                "{} is not the real culprit. Review the clues and keep looking.",
                                accused
                            ),
                        ));
                    }
                }
            }
        }
        Ok(outcome)
    }

    /// The full discovery protocol with `prompt` answering any offer.
    pub fn on_clue_discovered(
        &mut self,
        clue: &ClueText,
        prompt: &mut impl AccusationPrompt,
    ) -> Result<EngineOutcome> {
        let offer = match self.discover_clue(clue)? {
            Some(Evaluation { offer: Some(offer), .. }) => offer,
            _ => return Ok(EngineOutcome::NoAction),
        };
        let decision = prompt.decide(&offer);
        self.resolve_accusation(decision)
    }

    /// After a solved case: start over, or stop. Starting over files the
    /// closed case's listing at the top of the new message log.
    pub fn play_again(&mut self, again: bool) -> Result<()> {
        self.expect_phase(GamePhase::CaseClosed, "start a new case")?;
        if again {
            let closed = self.summary();
            self.reset()?;
            let opening = std::mem::take(&mut self.message_log);
            for line in closed.to_string().lines() {
                self.add_message(GameMessage::info("Case file", line));
            }
            self.message_log.extend(opening);
            Ok(())
        } else {
            self.phase = GamePhase::Finished;
            Ok(())
        }
    }

    /// Leave the mansion.
    pub fn finish(&mut self) -> CaseSummary {
        self.phase = GamePhase::Finished;
        self.summary()
    }

    pub fn summary(&self) -> CaseSummary {
        CaseSummary {
            associations: self
                .ledger
                .iter()
                .map(|a| (a.suspect().clone(), a.clue().clone()))
                .collect(),
            discovered: self.clues.in_order().cloned().collect(),
            most_likely: self
                .ledger
                .most_likely_suspect(&self.clues)
                .map(|t| (t.suspect.clone(), t.clues)),
        }
    }

    /// Check current game status
    pub fn check_status(&self) -> String {
        format!(
            "Room: {} | Rooms visited: {} | Clues: {} | Accusations: {} | Cases solved: {}",
            self.current_room().name(),
            self.stats.rooms_visited,
            self.clues.len(),
            self.stats.accusations_made,
            self.stats.games_won,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::from_seed(GameConfig::default(), 7).unwrap()
    }

    #[test]
    fn new_session_starts_at_the_entrance_with_one_clue() {
        let s = session();
        assert_eq!(s.phase(), GamePhase::Exploring);
        assert_eq!(s.current_room().name(), "Entrance Hall");
        let clues: Vec<&str> = s.clues().in_order().map(|c| c.as_str()).collect();
        assert_eq!(clues, [mansion::INITIAL_CLUE]);
        assert_eq!(s.ledger().len(), 14);
        assert!(mansion::SUSPECT_POOL.contains(&s.culprit().as_str()));
    }

    #[test]
    fn every_suspect_gets_two_clues() {
        let s = session();
        for suspect in mansion::SUSPECT_POOL {
            assert_eq!(s.ledger().clues_for(suspect).count(), 2, "{suspect}");
        }
    }

    #[test]
    fn same_seed_same_case() {
        let a = session();
        let b = session();
        assert_eq!(a.culprit(), b.culprit());
        let wiring = |s: &Session| -> Vec<(String, String)> {
            s.ledger()
                .iter()
                .map(|x| (x.clue().to_string(), x.suspect().to_string()))
                .collect()
        };
        assert_eq!(wiring(&a), wiring(&b));
    }

    #[test]
    fn entering_the_hall_offers_nothing() {
        let mut s = session();
        let report = s.enter_current_room().unwrap();
        let eval = report.evaluation.unwrap();
        assert!(!eval.newly_filed);
        assert_eq!(eval.suspect, None);
        assert_eq!(s.clues().len(), 1);
        assert_eq!(s.stats.rooms_visited, 1);
    }

    #[test]
    fn exploring_files_the_room_clue() {
        let mut s = session();
        let report = s.explore(Direction::Left).unwrap();
        assert_eq!(report.room, "Restricted Area");
        assert!(!report.looped_back);
        let eval = report.evaluation.unwrap();
        assert!(eval.newly_filed);
        assert_eq!(eval.evidence_count, 1);
        assert!(s.clues().contains(WIRED_CLUES[0]));
        assert_eq!(s.stats.clues_discovered, 1);
    }

    #[test]
    fn past_a_leaf_is_the_entrance() {
        let mut s = session();
        for _ in 0..3 {
            s.explore(Direction::Right).unwrap();
            if s.phase() == GamePhase::AwaitingVerdict {
                s.resolve_accusation(Decision::Decline).unwrap();
            }
        }
        let report = s.explore(Direction::Right).unwrap();
        assert!(report.looped_back);
        assert_eq!(report.room, "Entrance Hall");
        assert_eq!(s.current_room_id(), s.map().root());
    }

    #[test]
    fn answering_without_an_offer_is_invalid() {
        let mut s = session();
        assert!(matches!(
            s.resolve_accusation(Decision::Accuse),
            Err(GameError::InvalidState(_))
        ));
        assert!(s.play_again(true).is_err());
    }

    #[test]
    fn full_ledger_still_yields_a_playable_session() {
        let config = GameConfig {
            ledger_capacity: Some(3),
            ..GameConfig::default()
        };
        let mut s = Session::from_seed(config, 1).unwrap();
        assert_eq!(s.ledger().len(), 3);
        assert!(s
            .message_log
            .iter()
            .any(|m| m.severity == Severity::Warning && m.source == "Ledger"));
        s.explore(Direction::Left).unwrap();
    }

    #[test]
    fn full_clue_index_drops_the_clue() {
        let config = GameConfig {
            clue_capacity: Some(1),
            ..GameConfig::default()
        };
        let mut s = Session::from_seed(config, 1).unwrap();
        let report = s.explore(Direction::Left).unwrap();
        assert!(report.evaluation.is_none());
        assert_eq!(s.clues().len(), 1);
        assert_eq!(s.phase(), GamePhase::Exploring);
    }

    #[test]
    fn summary_lists_ledger_and_found_clues() {
        let mut s = session();
        s.explore(Direction::Left).unwrap();
        let summary = s.finish();
        assert_eq!(s.phase(), GamePhase::Finished);
        assert_eq!(summary.associations.len(), 14);
        assert_eq!(summary.discovered.len(), 2);
        assert!(summary.most_likely.is_some());
        assert!(summary.to_string().contains("Most likely suspect"));
    }
}
