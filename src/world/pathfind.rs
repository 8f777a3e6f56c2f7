//! Shortest-path search over the room graph.
//!
//! An edge exists from room A to room B only while some exit slot of A points
//! at B, so locked doors drop out of the graph automatically. The search holds
//! no cache and is safe to re-run after any door state change.

use std::collections::{HashMap, HashSet, VecDeque};

use super::state::WorldState;
use super::types::RoomId;

/// Breadth-first search from `from` to `to` honoring current exit slots.
/// Returns the room sequence including both endpoints, or `None` when `to` is
/// unreachable under current lock states.
pub fn find_path(world: &WorldState, from: &str, to: &str) -> Option<Vec<RoomId>> {
    if !world.rooms.contains_key(from) || !world.rooms.contains_key(to) {
        return None;
    }
    if from == to {
        return Some(vec![from.to_string()]);
    }

    let mut open = VecDeque::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut parent: HashMap<&str, &str> = HashMap::new();

    open.push_back(from);
    visited.insert(from);

    while let Some(current) = open.pop_front() {
        // Exit slots naming rooms outside the arena contribute no edges.
        let Some(room) = world.rooms.get(current) else {
            continue;
        };
        for slot in &room.exits {
            let Some(next) = slot.to.as_deref() else {
                continue;
            };
            if !visited.insert(next) {
                continue;
            }
            parent.insert(next, current);
            if next == to {
                let mut path = vec![next.to_string()];
                let mut step = next;
                while let Some(&prev) = parent.get(step) {
                    path.push(prev.to_string());
                    step = prev;
                }
                path.reverse();
                return Some(path);
            }
            open.push_back(next);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::types::{Direction, Room};

    fn linear_world() -> WorldState {
        let mut world = WorldState::new("a");
        world.add_room(Room::new("a", "A", "a", "").with_exit(Direction::East, "b"));
        world.add_room(
            Room::new("b", "B", "b", "")
                .with_exit(Direction::West, "a")
                .with_exit(Direction::East, "c"),
        );
        world.add_room(Room::new("c", "C", "c", "").with_exit(Direction::West, "b"));
        world
    }

    #[test]
    fn finds_linear_path() {
        let world = linear_world();
        assert_eq!(
            find_path(&world, "a", "c"),
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn trivial_path_is_the_room_itself() {
        let world = linear_world();
        assert_eq!(find_path(&world, "b", "b"), Some(vec!["b".to_string()]));
    }

    #[test]
    fn severed_exit_makes_destination_unreachable() {
        let mut world = linear_world();
        world.room_mut("b").expect("room").exits[Direction::East.slot()].to = None;
        assert_eq!(find_path(&world, "a", "c"), None);
        // One-way edges still work in the stated direction.
        assert!(find_path(&world, "c", "a").is_some());
    }

    #[test]
    fn dangling_exit_contributes_no_edges() {
        let mut world = linear_world();
        world.room_mut("a").expect("room").exits[Direction::North.slot()].to =
            Some("ghost".to_string());
        // The search walks past the dangling slot without faulting.
        assert_eq!(
            find_path(&world, "a", "c"),
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
        world.room_mut("a").expect("room").exits[Direction::East.slot()].to = None;
        assert_eq!(find_path(&world, "a", "c"), None);
    }

    #[test]
    fn unknown_rooms_have_no_path() {
        let world = linear_world();
        assert_eq!(find_path(&world, "a", "nowhere"), None);
    }
}
