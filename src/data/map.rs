//! The mansion map
//!
//! A static binary tree of rooms. Rooms live in an arena and refer to their
//! children by [`RoomId`], so a session can hold its position as a plain
//! handle while the map stays immutable.

use super::{ClueText, RoomName};
use crate::{GameError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a room in a [`Map`]. Only a [`MapBuilder`] hands these out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RoomId(usize);

/// Which way to walk from the current room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// A room of the mansion
#[derive(Debug, Clone, Serialize)]
pub struct Room {
    name: RoomName,
    clue: Option<ClueText>,
    left: Option<RoomId>,
    right: Option<RoomId>,
}

impl Room {
    pub fn name(&self) -> &RoomName {
        &self.name
    }

    /// The clue hidden here, if any.
    pub fn clue(&self) -> Option<&ClueText> {
        self.clue.as_ref()
    }

    pub fn child(&self, direction: Direction) -> Option<RoomId> {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Where a move ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub room: RoomId,
    /// The move ran past a dead end and returned to the root.
    pub looped_back: bool,
}

/// The whole mansion. Read-only once built, and only [`MapBuilder`] builds
/// one, so the rooms always form a tree.
#[derive(Debug, Clone, Serialize)]
pub struct Map {
    rooms: Vec<Room>,
}

impl Map {
    pub fn root(&self) -> RoomId {
        RoomId(0)
    }

    /// # Panics
    ///
    /// If `id` was handed out for a different, larger map.
    pub fn room(&self, id: RoomId) -> &Room {
        &self.rooms[id.0]
    }

    pub fn get(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// All rooms in arena order.
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter()
    }

    /// Walk from `current` in `direction`. Walking past a missing child, or
    /// from a handle this map does not know, returns to the root.
    pub fn explore(&self, direction: Direction, current: RoomId) -> Step {
        match self.get(current).and_then(|room| room.child(direction)) {
            Some(room) => Step {
                room,
                looped_back: false,
            },
            None => Step {
                room: self.root(),
                looped_back: true,
            },
        }
    }

    /// Number of levels; a lone root has height 1.
    pub fn height(&self) -> usize {
        self.height_from(Some(self.root()))
    }

    fn height_from(&self, at: Option<RoomId>) -> usize {
        match at {
            None => 0,
            Some(id) => {
                let room = self.room(id);
                1 + self.height_from(room.left).max(self.height_from(room.right))
            }
        }
    }

    /// Distance of `target` from the root, or `None` if it is not reachable.
    pub fn depth(&self, target: RoomId) -> Option<usize> {
        self.depth_from(Some(self.root()), target, 0)
    }

    fn depth_from(&self, at: Option<RoomId>, target: RoomId, level: usize) -> Option<usize> {
        let id = at?;
        if id == target {
            return Some(level);
        }
        let room = self.room(id);
        self.depth_from(room.left, target, level + 1)
            .or_else(|| self.depth_from(room.right, target, level + 1))
    }

    pub fn pre_order(&self) -> impl Iterator<Item = &Room> {
        let mut order = Vec::with_capacity(self.len());
        self.collect(Some(self.root()), Visit::Pre, &mut order);
        order.into_iter().map(move |id| self.room(id))
    }

    pub fn in_order(&self) -> impl Iterator<Item = &Room> {
        let mut order = Vec::with_capacity(self.len());
        self.collect(Some(self.root()), Visit::In, &mut order);
        order.into_iter().map(move |id| self.room(id))
    }

    pub fn post_order(&self) -> impl Iterator<Item = &Room> {
        let mut order = Vec::with_capacity(self.len());
        self.collect(Some(self.root()), Visit::Post, &mut order);
        order.into_iter().map(move |id| self.room(id))
    }

    fn collect(&self, at: Option<RoomId>, visit: Visit, out: &mut Vec<RoomId>) {
        let Some(id) = at else { return };
        let room = self.room(id);
        if visit == Visit::Pre {
            out.push(id);
        }
        self.collect(room.left, visit, out);
        if visit == Visit::In {
            out.push(id);
        }
        self.collect(room.right, visit, out);
        if visit == Visit::Post {
            out.push(id);
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Pre,
    In,
    Post,
}

/// Assembles a [`Map`] room by room, starting from the root.
#[derive(Debug)]
pub struct MapBuilder {
    rooms: Vec<Room>,
}

impl MapBuilder {
    pub fn new(name: &str, clue: Option<&str>) -> Result<Self> {
        Ok(Self {
            rooms: vec![Self::make_room(name, clue)?],
        })
    }

    fn make_room(name: &str, clue: Option<&str>) -> Result<Room> {
        Ok(Room {
            name: RoomName::new(name)?,
            clue: clue.map(ClueText::new).transpose()?,
            left: None,
            right: None,
        })
    }

    pub fn root(&self) -> RoomId {
        RoomId(0)
    }

    pub fn child(&self, at: RoomId, direction: Direction) -> Option<RoomId> {
        self.rooms.get(at.0)?.child(direction)
    }

    /// Place a new room below `parent`. The slot must be free.
    pub fn attach(
        &mut self,
        parent: RoomId,
        direction: Direction,
        name: &str,
        clue: Option<&str>,
    ) -> Result<RoomId> {
        let room = Self::make_room(name, clue)?;
        let id = RoomId(self.rooms.len());
        let parent_room = self
            .rooms
            .get_mut(parent.0)
            .ok_or_else(|| GameError::InvalidState(format!("no room {:?} to attach to", parent)))?;
        let slot = match direction {
            Direction::Left => &mut parent_room.left,
            Direction::Right => &mut parent_room.right,
        };
        if slot.is_some() {
            return Err(GameError::InvalidState(format!(
                "{} already has a room to the {}",
                parent_room.name, direction
            )));
        }
        *slot = Some(id);
        self.rooms.push(room);
        Ok(id)
    }

    pub fn build(self) -> Map {
        Map { rooms: self.rooms }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_map() -> Map {
        //      B
        //    A   C
        //          D
        let mut b = MapBuilder::new("B", Some("clue b")).unwrap();
        let root = b.root();
        b.attach(root, Direction::Left, "A", None).unwrap();
        let c = b.attach(root, Direction::Right, "C", Some("clue c")).unwrap();
        b.attach(c, Direction::Right, "D", None).unwrap();
        b.build()
    }

    fn names<'a>(rooms: impl Iterator<Item = &'a Room>) -> Vec<&'a str> {
        rooms.map(|r| r.name().as_str()).collect()
    }

    #[test]
    fn explore_follows_children() {
        let map = small_map();
        let step = map.explore(Direction::Right, map.root());
        assert!(!step.looped_back);
        assert_eq!(map.room(step.room).name(), "C");
    }

    #[test]
    fn walking_off_a_leaf_loops_back_to_the_root() {
        let map = small_map();
        let a = map.explore(Direction::Left, map.root()).room;
        let step = map.explore(Direction::Left, a);
        assert!(step.looped_back);
        assert_eq!(step.room, map.root());
    }

    #[test]
    fn traversal_orders() {
        let map = small_map();
        assert_eq!(names(map.pre_order()), ["B", "A", "C", "D"]);
        assert_eq!(names(map.in_order()), ["A", "B", "C", "D"]);
        assert_eq!(names(map.post_order()), ["A", "D", "C", "B"]);
    }

    #[test]
    fn height_and_depth() {
        let map = small_map();
        assert_eq!(map.height(), 3);
        let c = map.explore(Direction::Right, map.root()).room;
        let d = map.explore(Direction::Right, c).room;
        assert_eq!(map.depth(map.root()), Some(0));
        assert_eq!(map.depth(d), Some(2));
    }

    #[test]
    fn unknown_handle_loops_back_instead_of_panicking() {
        let small = small_map();
        let lone = MapBuilder::new("Lone", None).unwrap().build();

        let d = small.explore(Direction::Right, small.root()).room;
        let d = small.explore(Direction::Right, d).room;
        assert!(lone.get(d).is_none());
        let step = lone.explore(Direction::Left, d);
        assert!(step.looped_back);
        assert_eq!(step.room, lone.root());
    }

    #[test]
    fn occupied_slot_is_rejected() {
        let mut b = MapBuilder::new("Root", None).unwrap();
        let root = b.root();
        b.attach(root, Direction::Left, "First", None).unwrap();
        let err = b.attach(root, Direction::Left, "Second", None).unwrap_err();
        assert!(matches!(err, GameError::InvalidState(_)));
    }
}
