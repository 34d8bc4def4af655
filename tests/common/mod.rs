//! Shared fixtures for the integration tests

#![allow(dead_code)]

use detective_quest::data::{ClueText, Direction, Map, RoomId, SuspectName};
use detective_quest::game::{GameConfig, Session, SuspectLedger};

pub fn clue(text: &str) -> ClueText {
    ClueText::new(text).unwrap()
}

pub fn suspect(name: &str) -> SuspectName {
    SuspectName::new(name).unwrap()
}

/// A ledger holding exactly `pairs`, inserted in order.
pub fn ledger_of(pairs: &[(&str, &str)]) -> SuspectLedger {
    let mut ledger = SuspectLedger::default();
    for (c, s) in pairs {
        ledger.insert(clue(c), suspect(s)).unwrap();
    }
    ledger
}

/// A reproducible session with the default configuration.
pub fn seeded(seed: u64) -> Session {
    Session::from_seed(GameConfig::default(), seed).unwrap()
}

/// Turns from the root to the room holding `text`, if any room does.
pub fn path_to_clue(map: &Map, text: &str) -> Option<Vec<Direction>> {
    fn search(map: &Map, at: RoomId, text: &str, path: &mut Vec<Direction>) -> bool {
        if map.room(at).clue().is_some_and(|c| c == text) {
            return true;
        }
        for direction in [Direction::Left, Direction::Right] {
            if let Some(child) = map.room(at).child(direction) {
                path.push(direction);
                if search(map, child, text, path) {
                    return true;
                }
                path.pop();
            }
        }
        false
    }

    let mut path = Vec::new();
    search(map, map.root(), text, &mut path).then_some(path)
}

/// A suspect from the pool who did not do it.
pub fn innocent(session: &Session) -> SuspectName {
    session
        .ledger()
        .suspects()
        .into_iter()
        .find(|s| *s != session.culprit())
        .cloned()
        .unwrap()
}
