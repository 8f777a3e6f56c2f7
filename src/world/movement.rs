//! Movement and scope management.
//!
//! Relocating the player or an entity fires notifications in a fixed order.
//! Player moves: pre-move listeners (may veto) → exit-scope on the old room and
//! its entities → relocation → enter-scope on the new room and its entities →
//! post-move listeners. Entity moves: exit-scope before the entity leaves its
//! current position, enter-scope after it lands — always, even when the
//! positions overlap in visibility; scope notifications are position-transition
//! events, not visibility-optimized. Container sources and destinations get a
//! veto chance before anything happens.

use log::debug;

use super::attrs::room as room_attr;
use super::behavior::Ctx;
use super::engine::Engine;
use super::errors::WorldError;
use super::types::{Direction, EntityLocation};

impl Engine {
    /// Move the player to another room. Returns `Ok(false)` when a pre-move
    /// listener vetoed the move.
    pub fn move_player(&mut self, dest: &str) -> Result<bool, WorldError> {
        self.world.room(dest)?;
        let from = self.world.player.room.clone();

        for listener in self.move_listeners.iter_mut() {
            let mut ctx = Ctx::new(&mut self.world, &mut self.out, self.audio.as_ref());
            if listener.before_move(&mut ctx, &from, dest)? {
                debug!("move: {from} -> {dest} vetoed");
                return Ok(false);
            }
        }

        self.fire_exit_scope(&from);
        for id in self.world.room(&from)?.entities.clone() {
            self.fire_exit_scope(&id);
        }

        self.world.player.room = dest.to_string();
        self.world.room_mut(dest)?.attrs.set(room_attr::VISITED);
        debug!("move: player {from} -> {dest}");

        self.fire_enter_scope(dest);
        for id in self.world.room(dest)?.entities.clone() {
            self.fire_enter_scope(&id);
        }

        for listener in self.move_listeners.iter_mut() {
            let mut ctx = Ctx::new(&mut self.world, &mut self.out, self.audio.as_ref());
            listener.after_move(&mut ctx, &from, dest)?;
        }
        Ok(true)
    }

    /// Move the player through an exit of the current room. A closed or
    /// missing exit is an in-world refusal, not an error.
    pub fn move_player_dir(&mut self, dir: Direction) -> Result<bool, WorldError> {
        let dest = self.world.current_room()?.exit(dir).cloned();
        match dest {
            Some(dest) => self.move_player(&dest),
            None => {
                self.out.say("You can't go that way.");
                Ok(false)
            }
        }
    }

    /// Relocate an entity between room, inventory, and container positions.
    /// Returns `Ok(false)` when a container listener vetoed the change; the
    /// entity then stays exactly where it was.
    pub fn move_entity(&mut self, id: &str, dest: EntityLocation) -> Result<bool, WorldError> {
        let old = self.world.entity(id)?.location.clone();
        match &dest {
            EntityLocation::Room(room) => {
                self.world.room(room)?;
            }
            EntityLocation::Container(holder) => {
                let entity = self.world.entity(holder)?;
                if entity.container().is_none() {
                    return Err(WorldError::Internal(format!(
                        "entity {holder} is not a container"
                    )));
                }
            }
            EntityLocation::Inventory => {}
        }

        // A locked container refuses content changes in either direction,
        // whatever path the request arrived by.
        for position in [&old, &dest] {
            if let EntityLocation::Container(holder) = position {
                let entity = self.world.entity(holder)?;
                if entity.container().is_some_and(|c| c.locked) {
                    let name = entity.name.clone();
                    self.out.say(format!("The {name} is locked."));
                    return Ok(false);
                }
            }
        }

        // Container veto stage: both the source and the destination container
        // get a chance to block before the item is touched.
        if let EntityLocation::Container(holder) = &old {
            if self.container_change_vetoed(holder, id, false) {
                return Ok(false);
            }
        }
        if let EntityLocation::Container(holder) = &dest {
            if self.container_change_vetoed(holder, id, true) {
                return Ok(false);
            }
        }

        self.fire_exit_scope(id);

        match &old {
            EntityLocation::Room(room) => {
                self.world.room_mut(room)?.entities.retain(|e| e != id);
            }
            EntityLocation::Inventory => {
                self.world.player.inventory.retain(|e| e != id);
                // Leaving inventory always clears derived wear/equip state.
                self.world.player.worn.retain(|e| e != id);
                self.world.player.equipped.retain(|e| e != id);
            }
            EntityLocation::Container(holder) => {
                if let Some(c) = self.world.entity_mut(holder)?.container_mut() {
                    c.contents.retain(|e| e != id);
                }
            }
        }

        self.world.entity_mut(id)?.location = dest.clone();
        match &dest {
            EntityLocation::Room(room) => {
                self.world.room_mut(room)?.entities.push(id.to_string());
            }
            EntityLocation::Inventory => {
                self.world.player.inventory.push(id.to_string());
            }
            EntityLocation::Container(holder) => {
                if let Some(c) = self.world.entity_mut(holder)?.container_mut() {
                    c.contents.push(id.to_string());
                }
            }
        }
        debug!("move: entity {id} {old:?} -> {dest:?}");

        self.fire_enter_scope(id);

        // Informational stage after the move.
        if let EntityLocation::Container(holder) = &old {
            let holder = holder.clone();
            for listener in self.container_listeners.iter_mut() {
                listener.after_change(&self.world, &holder, id, false);
            }
        }
        if let EntityLocation::Container(holder) = &dest {
            for listener in self.container_listeners.iter_mut() {
                listener.after_change(&self.world, holder, id, true);
            }
        }
        Ok(true)
    }

    fn container_change_vetoed(&mut self, container: &str, item: &str, adding: bool) -> bool {
        for listener in self.container_listeners.iter_mut() {
            if listener.before_change(&self.world, container, item, adding) {
                debug!(
                    "move: container {container} {} of {item} vetoed",
                    if adding { "add" } else { "remove" }
                );
                return true;
            }
        }
        false
    }

    /// Toggle worn state. Wearing requires the entity to already be in
    /// inventory; taking something off never removes it from inventory.
    pub fn set_worn(&mut self, id: &str, worn: bool) -> Result<(), WorldError> {
        self.world.entity(id)?;
        if worn {
            if !self.world.player.carries(id) {
                return Err(WorldError::NotCarried(id.to_string()));
            }
            if !self.world.player.is_worn(id) {
                self.world.player.worn.push(id.to_string());
            }
        } else {
            self.world.player.worn.retain(|e| e != id);
        }
        Ok(())
    }

    /// Toggle equipped state, with the same inventory requirement as
    /// [`Engine::set_worn`].
    pub fn set_equipped(&mut self, id: &str, equipped: bool) -> Result<(), WorldError> {
        self.world.entity(id)?;
        if equipped {
            if !self.world.player.carries(id) {
                return Err(WorldError::NotCarried(id.to_string()));
            }
            if !self.world.player.is_equipped(id) {
                self.world.player.equipped.push(id.to_string());
            }
        } else {
            self.world.player.equipped.retain(|e| e != id);
        }
        Ok(())
    }
}
