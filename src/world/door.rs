//! Door lock state machine and exit-table wiring.
//!
//! A door connects exactly two rooms through one exit slot on each side. While
//! unlocked, the two slots point at each other (with the door's optional
//! per-side labels); while locked, both slots and labels are cleared. This is
//! the sole mechanism by which the otherwise-static room exit table becomes
//! dynamic, which is also what makes locked doors disappear from the
//! pathfinder's graph.

use log::debug;

use super::attrs::entity as entity_attr;
use super::engine::Engine;
use super::errors::WorldError;
use super::state::WorldState;
use super::types::{DoorSide, DoorState, Direction, Entity, EntityKind, EntityLocation, RoomId};

/// Build a door entity between two rooms. `directions[i]` is the exit slot
/// `rooms[i]` uses to pass through; `sides[i]` carries the text shown from
/// `rooms[i]`. The entity is placed in the first room.
pub fn make_door(
    id: &str,
    name: &str,
    rooms: [&str; 2],
    directions: [Direction; 2],
    sides: [DoorSide; 2],
    key: Option<&str>,
    locked: bool,
) -> Entity {
    let mut door = Entity::new(
        id,
        name,
        // Door descriptions come from the sides; the base description is a
        // fallback for tooling.
        &sides[0].description,
        EntityLocation::Room(rooms[0].to_string()),
    );
    door.attrs.set(entity_attr::DOOR);
    door.kind = EntityKind::Door(DoorState {
        rooms: [rooms[0].to_string(), rooms[1].to_string()],
        directions,
        sides,
        key: key.map(str::to_string),
        locked,
    });
    door
}

/// Insert a door into the world and wire both rooms' exit slots to match its
/// starting lock state.
pub fn install_door(world: &mut WorldState, door: Entity) -> Result<(), WorldError> {
    let id = door.id.clone();
    let Some(state) = door.door() else {
        return Err(WorldError::Internal(format!("entity {id} is not a door")));
    };
    // Both rooms must exist before wiring.
    world.room(&state.rooms[0])?;
    world.room(&state.rooms[1])?;
    let locked = state.locked;
    world.add_entity(door);
    apply_door_wiring(world, &id, locked)?;
    Ok(())
}

/// Point both rooms' exit slots at each other (unlocked) or clear them
/// (locked).
fn apply_door_wiring(world: &mut WorldState, id: &str, locked: bool) -> Result<(), WorldError> {
    let Some(state) = world.entity(id)?.door().cloned() else {
        return Err(WorldError::Internal(format!("entity {id} is not a door")));
    };
    for side in 0..2 {
        let room: &RoomId = &state.rooms[side];
        let other: &RoomId = &state.rooms[1 - side];
        let slot = &mut world.room_mut(room)?.exits[state.directions[side].slot()];
        if locked {
            slot.to = None;
            slot.label = None;
        } else {
            slot.to = Some(other.clone());
            slot.label = state.sides[side].label.clone();
        }
    }
    debug!("door: {id} wiring {}", if locked { "cleared" } else { "restored" });
    Ok(())
}

impl Engine {
    /// Lock or unlock a door. The transition requires the key entity in the
    /// player's inventory; a missing key yields the door's per-side failure
    /// message and no state change. Returns whether the state changed.
    pub fn set_door_locked(&mut self, id: &str, locked: bool) -> Result<bool, WorldError> {
        let entity = self.world.entity(id)?;
        let name = entity.name.clone();
        let Some(door) = entity.door().cloned() else {
            return Err(WorldError::Internal(format!("entity {id} is not a door")));
        };
        // Text is read from the side facing the player.
        let side = if door.rooms[1] == self.world.player.room { 1 } else { 0 };
        let Some(key) = door.key.clone() else {
            self.out.say(format!("The {name} has no keyhole."));
            return Ok(false);
        };
        if door.locked == locked {
            self.out.say(if locked {
                format!("The {name} is already locked.")
            } else {
                format!("The {name} is already unlocked.")
            });
            return Ok(false);
        }
        if !self.world.player.carries(&key) {
            self.out.say("You don't have the key.");
            return Ok(false);
        }
        if let Some(d) = self.world.entity_mut(id)?.door_mut() {
            d.locked = locked;
        }
        apply_door_wiring(&mut self.world, id, locked)?;
        let message = if locked {
            door.sides[side].locked_message.clone()
        } else {
            door.sides[side].unlocked_message.clone()
        };
        if message.is_empty() {
            self.out.say(if locked {
                format!("You lock the {name}.")
            } else {
                format!("You unlock the {name}.")
            });
        } else {
            self.out.say(message);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::types::Room;

    fn door_world() -> WorldState {
        let mut world = WorldState::new("hall");
        world.add_room(Room::new("hall", "The Hall", "hall", "A hall."));
        world.add_room(Room::new("study", "The Study", "study", "A study."));
        world
    }

    fn plain_sides() -> [DoorSide; 2] {
        [
            DoorSide {
                description: "A stout oak door.".into(),
                locked_message: "The lock clicks shut.".into(),
                unlocked_message: "The lock clicks open.".into(),
                label: Some("oak door".into()),
            },
            DoorSide {
                description: "The other side of the oak door.".into(),
                locked_message: String::new(),
                unlocked_message: String::new(),
                label: None,
            },
        ]
    }

    #[test]
    fn unlocked_door_wires_mutual_exits() {
        let mut world = door_world();
        let door = make_door(
            "oak_door",
            "oak door",
            ["hall", "study"],
            [Direction::North, Direction::South],
            plain_sides(),
            Some("brass_key"),
            false,
        );
        install_door(&mut world, door).expect("install");
        assert_eq!(
            world.room("hall").expect("room").exit(Direction::North),
            Some(&"study".to_string())
        );
        assert_eq!(
            world.room("study").expect("room").exit(Direction::South),
            Some(&"hall".to_string())
        );
        assert_eq!(
            world.room("hall").expect("room").exits[Direction::North.slot()].label,
            Some("oak door".to_string())
        );
    }

    #[test]
    fn locked_door_starts_with_cleared_slots() {
        let mut world = door_world();
        let door = make_door(
            "oak_door",
            "oak door",
            ["hall", "study"],
            [Direction::North, Direction::South],
            plain_sides(),
            Some("brass_key"),
            true,
        );
        install_door(&mut world, door).expect("install");
        assert_eq!(world.room("hall").expect("room").exit(Direction::North), None);
        assert_eq!(world.room("study").expect("room").exit(Direction::South), None);
    }
}
