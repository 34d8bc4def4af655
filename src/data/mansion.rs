//! The reference mansion: rooms, the clues hidden in them and the suspect pool

use super::map::Direction::{Left as L, Right as R};
use super::map::{Direction, Map, MapBuilder, RoomId};
use super::{ClueText, SuspectName};
use crate::Result;

/// Clue found in the entrance hall. Every fresh clue index starts with it and
/// no suspect is linked to it.
pub const INITIAL_CLUE: &str = "The alarm system was not triggered.";

/// Everyone who could have done it.
pub const SUSPECT_POOL: [&str; 7] = [
    "Mr. X",
    "Butcher",
    "El Divo",
    "Dr. Stein",
    "Krauser",
    "Julius",
    "Freud",
];

/// Clues wired to a suspect, in wiring order. Clue `i` goes to the suspect at
/// shuffled pool position `i % 7`, so every suspect ends up with two clues.
pub const WIRED_CLUES: [&str; 14] = [
    "There is a bullet casing on the floor.",
    "A broken vase with a dagger inside.",
    "A shattered necklace.",
    "There is a bloodstain.",
    "A broken door handle.",
    "The wiring has been tampered with.",
    "Books are scattered across the floor.",
    "The window is broken.",
    "The coffee in the cup is still warm.",
    "The seats are in disarray.",
    "Someone left the appliances switched on.",
    "Groceries are strewn across the floor.",
    "The cover is only partly drawn.",
    "Only some of the floodlights work.",
];

struct RoomPlan {
    name: &'static str,
    clue: &'static str,
    /// Path of turns from the entrance hall.
    path: &'static [Direction],
}

const fn plan(name: &'static str, clue: &'static str, path: &'static [Direction]) -> RoomPlan {
    RoomPlan { name, clue, path }
}

const ROOMS: [RoomPlan; 15] = [
    plan("Entrance Hall", INITIAL_CLUE, &[]),
    plan("Restricted Area", WIRED_CLUES[0], &[L]),
    plan("Living Room", WIRED_CLUES[1], &[R]),
    plan("Staircase", WIRED_CLUES[2], &[L, L]),
    plan("The Corridor", WIRED_CLUES[3], &[L, R]),
    plan("The Suite", WIRED_CLUES[4], &[L, L, L]),
    plan("Spa", WIRED_CLUES[5], &[L, L, R]),
    plan("Library", WIRED_CLUES[6], &[L, R, L]),
    plan("Study", WIRED_CLUES[7], &[L, R, R]),
    plan("The Dining Room", WIRED_CLUES[8], &[R, L]),
    plan("The Gazebo", WIRED_CLUES[9], &[R, R]),
    plan("The Kitchen", WIRED_CLUES[10], &[R, L, L]),
    plan("Pantry", WIRED_CLUES[11], &[R, L, R]),
    plan("The Pool", WIRED_CLUES[12], &[R, R, L]),
    plan("Tennis Court", WIRED_CLUES[13], &[R, R, R]),
];

/// Build the mansion. Rooms are listed parent first, so every path's prefix
/// already exists when a room is placed.
pub fn build_map() -> Result<Map> {
    let mut builder = MapBuilder::new(ROOMS[0].name, Some(ROOMS[0].clue))?;
    for room in &ROOMS[1..] {
        let (last, prefix) = match room.path.split_last() {
            Some(split) => split,
            None => continue,
        };
        let parent = walk(&builder, prefix);
        builder.attach(parent, *last, room.name, Some(room.clue))?;
    }
    Ok(builder.build())
}

fn walk(builder: &MapBuilder, path: &[Direction]) -> RoomId {
    path.iter().fold(builder.root(), |at, dir| {
        builder.child(at, *dir).unwrap_or(at)
    })
}

/// The suspect pool as validated names.
pub fn suspect_pool() -> Result<Vec<SuspectName>> {
    SUSPECT_POOL.iter().map(|s| SuspectName::new(*s)).collect()
}

/// The initial clue as a validated value.
pub fn initial_clue() -> Result<ClueText> {
    ClueText::new(INITIAL_CLUE)
}
