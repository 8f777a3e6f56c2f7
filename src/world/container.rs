//! Container lock state machine and content operations.
//!
//! A container is an entity whose contents are disjoint from room entity lists
//! and from player inventory — an item is either "in the container" or "in the
//! world/inventory", never both. Lock transitions require the acting party to
//! hold the designated key entity; a container configured without a key can
//! never be locked. Missing keys and missing locks are configuration
//! conditions reported as in-world text, never as errors.

use log::debug;

use super::engine::Engine;
use super::errors::WorldError;
use super::types::EntityLocation;

impl Engine {
    /// Lock or unlock a container. Returns whether the state actually changed.
    pub fn set_container_locked(&mut self, id: &str, locked: bool) -> Result<bool, WorldError> {
        let entity = self.world.entity(id)?;
        let name = entity.name.clone();
        let Some(container) = entity.container() else {
            return Err(WorldError::Internal(format!("entity {id} is not a container")));
        };
        let Some(key) = container.key.clone() else {
            self.out.say(format!("The {name} has no lock."));
            return Ok(false);
        };
        if container.locked == locked {
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
        if let Some(c) = self.world.entity_mut(id)?.container_mut() {
            c.locked = locked;
        }
        debug!("container: {id} now {}", if locked { "locked" } else { "unlocked" });
        self.out.say(if locked {
            format!("You lock the {name}.")
        } else {
            format!("You unlock the {name}.")
        });
        Ok(true)
    }

    /// Put a carried or co-located item into a container. Refused in-world
    /// while the container is locked; container listeners may also veto.
    pub fn put_in_container(&mut self, item: &str, container: &str) -> Result<bool, WorldError> {
        let holder = self.world.entity(container)?;
        let name = holder.name.clone();
        let Some(state) = holder.container() else {
            return Err(WorldError::Internal(format!(
                "entity {container} is not a container"
            )));
        };
        if state.locked {
            self.out.say(format!("The {name} is locked."));
            return Ok(false);
        }
        let moved = self.move_entity(item, EntityLocation::Container(container.to_string()))?;
        if moved {
            let item_name = self.world.entity(item)?.name.clone();
            self.out.say(format!("You put the {item_name} in the {name}."));
        }
        Ok(moved)
    }

    /// Take an item out of a container into inventory. Refused in-world while
    /// locked; container listeners may also veto.
    pub fn take_from_container(&mut self, item: &str, container: &str) -> Result<bool, WorldError> {
        let holder = self.world.entity(container)?;
        let name = holder.name.clone();
        let Some(state) = holder.container() else {
            return Err(WorldError::Internal(format!(
                "entity {container} is not a container"
            )));
        };
        if state.locked {
            self.out.say(format!("The {name} is locked."));
            return Ok(false);
        }
        if !state.contents.iter().any(|e| e == item) {
            let item_name = self.world.entity(item)?.name.clone();
            self.out.say(format!("The {item_name} isn't in the {name}."));
            return Ok(false);
        }
        let moved = self.move_entity(item, EntityLocation::Inventory)?;
        if moved {
            let item_name = self.world.entity(item)?.name.clone();
            self.out
                .say(format!("You take the {item_name} from the {name}."));
        }
        Ok(moved)
    }
}
