//! The action dispatch chain.
//!
//! A chosen action label and an optional target entity run through a fixed
//! sequence: every registered pre-action listener (any of which can claim the
//! action and stop the chain), then the target's behavior delegate or the
//! built-in entity logic, then every listener again post-action with the
//! handled flag. Post-action listeners may suppress the default "nothing
//! happens" feedback even when nothing handled the action. The textual echo of
//! the action is resolved separately, before processing. Listener and delegate
//! faults are not caught here; they propagate to the caller.

use log::debug;

use crate::logutil::escape_log;

use super::attrs::entity as entity_attr;
use super::behavior::{ActionEcho, Ctx, ListenerVerdict};
use super::engine::Engine;
use super::errors::WorldError;
use super::types::{EntityKind, EntityLocation};

/// Default feedback shown when no participant handled the action and no
/// post-action listener suppressed it.
pub const DEFAULT_FEEDBACK: &str = "Nothing happens.";

/// Result of one trip through the dispatch chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Some participant claimed to have fully handled the action.
    pub handled: bool,
    /// A post-action listener suppressed the default feedback.
    pub suppressed: bool,
    /// How the presentation layer should echo the action, resolved before the
    /// action was processed.
    pub echo: ActionEcho,
}

impl Engine {
    /// Route an action through the dispatch chain. `target` is `None` for
    /// room-level actions, which consult the current room's behavior.
    pub fn dispatch_action(
        &mut self,
        action: &str,
        target: Option<&str>,
    ) -> Result<DispatchOutcome, WorldError> {
        let subject = match target {
            Some(id) => {
                self.world.entity(id)?;
                id.to_string()
            }
            None => self.world.player.room.clone(),
        };
        debug!("dispatch: {} on {subject}", escape_log(action));

        // Echo interception happens before the action is processed.
        let echo = self
            .behavior_of(&subject)
            .map(|b| b.echo(&self.world, &subject, action))
            .unwrap_or(ActionEcho::Default);

        // Pre-action pass: first listener to claim the action stops the chain
        // before the entity is reached.
        let mut handled = false;
        let mut suppressed = false;
        for listener in self.action_listeners.iter_mut() {
            let mut ctx = Ctx::new(&mut self.world, &mut self.out, self.audio.as_ref());
            match listener.action_performed(&mut ctx, action, target, true, false)? {
                ListenerVerdict::Handled => {
                    handled = true;
                    break;
                }
                ListenerVerdict::SuppressDefault => suppressed = true,
                ListenerVerdict::Pass => {}
            }
        }

        // Delegate, falling through to the built-in entity logic.
        if !handled {
            let delegated = self
                .with_behavior(&subject, |b, ctx| b.process_action(ctx, &subject, action))
                .transpose()?
                .unwrap_or(false);
            handled = if delegated {
                true
            } else if target.is_some() {
                self.default_entity_action(&subject, action)?
            } else {
                false
            };
        }

        // Post-action pass: every listener hears the outcome and may suppress
        // the default feedback.
        for listener in self.action_listeners.iter_mut() {
            let mut ctx = Ctx::new(&mut self.world, &mut self.out, self.audio.as_ref());
            match listener.action_performed(&mut ctx, action, target, false, handled)? {
                ListenerVerdict::Pass => {}
                _ => suppressed = true,
            }
        }

        if !handled && !suppressed {
            self.out.say(DEFAULT_FEEDBACK);
        }

        Ok(DispatchOutcome {
            handled,
            suppressed,
            echo,
        })
    }

    /// Action labels currently applicable to a target: the built-in ones its
    /// attributes and kind allow, plus whatever its behavior override offers.
    pub fn available_actions(&self, target: &str) -> Result<Vec<String>, WorldError> {
        let entity = self.world.entity(target)?;
        let mut actions = vec!["Examine".to_string()];
        if entity.attrs.has(entity_attr::TAKEABLE) {
            if self.world.player.carries(target) {
                actions.push("Drop".to_string());
            } else {
                actions.push("Take".to_string());
            }
        }
        if entity.attrs.has(entity_attr::WEARABLE) {
            if self.world.player.is_worn(target) {
                actions.push("Remove".to_string());
            } else {
                actions.push("Wear".to_string());
            }
        }
        if entity.attrs.has(entity_attr::EQUIPPABLE) {
            if self.world.player.is_equipped(target) {
                actions.push("Unequip".to_string());
            } else {
                actions.push("Equip".to_string());
            }
        }
        let lockable = match &entity.kind {
            EntityKind::Container(c) => c.key.is_some(),
            EntityKind::Door(d) => d.key.is_some(),
            EntityKind::Plain => false,
        };
        if lockable {
            let locked = match &entity.kind {
                EntityKind::Container(c) => c.locked,
                EntityKind::Door(d) => d.locked,
                EntityKind::Plain => false,
            };
            actions.push(if locked { "Unlock" } else { "Lock" }.to_string());
        }
        if let Some(behavior) = self.behavior_of(target) {
            for action in behavior.actions(&self.world, target) {
                if !actions.contains(&action) {
                    actions.push(action);
                }
            }
        }
        Ok(actions)
    }

    /// Built-in entity action logic, consulted when no delegate claimed the
    /// action. A matching label counts as handled even when it ends in an
    /// in-world refusal.
    fn default_entity_action(&mut self, id: &str, action: &str) -> Result<bool, WorldError> {
        match action {
            "Examine" => {
                let entity = self.world.entity(id)?;
                let text = match entity.door() {
                    // Doors describe the side facing the player.
                    Some(door) => {
                        let side = if door.rooms[0] == self.world.player.room { 0 } else { 1 };
                        door.sides[side].description.clone()
                    }
                    None => entity.description.clone(),
                };
                self.out.say(text);
                Ok(true)
            }
            "Take" => {
                let entity = self.world.entity(id)?;
                if self.world.player.carries(id) {
                    self.out.say("You already have that.");
                } else if !entity.attrs.has(entity_attr::TAKEABLE) {
                    self.out.say(format!("You can't take the {}.", entity.name));
                } else if self.move_entity(id, EntityLocation::Inventory)? {
                    self.out.say("Taken.");
                }
                Ok(true)
            }
            "Drop" => {
                if self.world.player.carries(id) {
                    let room = self.world.player.room.clone();
                    if self.move_entity(id, EntityLocation::Room(room))? {
                        self.out.say("Dropped.");
                    }
                } else {
                    self.out.say("You aren't carrying that.");
                }
                Ok(true)
            }
            "Wear" => {
                let entity = self.world.entity(id)?;
                if !entity.attrs.has(entity_attr::WEARABLE) {
                    self.out.say(format!("You can't wear the {}.", entity.name));
                    return Ok(true);
                }
                let name = entity.name.clone();
                match self.set_worn(id, true) {
                    Ok(()) => self.out.say(format!("You are now wearing the {name}.")),
                    Err(WorldError::NotCarried(_)) => {
                        self.out.say("You aren't carrying that.")
                    }
                    Err(err) => return Err(err),
                }
                Ok(true)
            }
            "Remove" => {
                if self.world.player.is_worn(id) {
                    let name = self.world.entity(id)?.name.clone();
                    self.set_worn(id, false)?;
                    self.out.say(format!("You take off the {name}."));
                } else {
                    self.out.say("You aren't wearing that.");
                }
                Ok(true)
            }
            "Equip" => {
                let entity = self.world.entity(id)?;
                if !entity.attrs.has(entity_attr::EQUIPPABLE) {
                    self.out.say(format!("You can't equip the {}.", entity.name));
                    return Ok(true);
                }
                let name = entity.name.clone();
                match self.set_equipped(id, true) {
                    Ok(()) => self.out.say(format!("You ready the {name}.")),
                    Err(WorldError::NotCarried(_)) => {
                        self.out.say("You aren't carrying that.")
                    }
                    Err(err) => return Err(err),
                }
                Ok(true)
            }
            "Unequip" => {
                if self.world.player.is_equipped(id) {
                    let name = self.world.entity(id)?.name.clone();
                    self.set_equipped(id, false)?;
                    self.out.say(format!("You put away the {name}."));
                } else {
                    self.out.say("You don't have that readied.");
                }
                Ok(true)
            }
            "Lock" | "Unlock" => {
                let lock = action == "Lock";
                match &self.world.entity(id)?.kind {
                    EntityKind::Container(_) => {
                        self.set_container_locked(id, lock)?;
                        Ok(true)
                    }
                    EntityKind::Door(_) => {
                        self.set_door_locked(id, lock)?;
                        Ok(true)
                    }
                    EntityKind::Plain => Ok(false),
                }
            }
            _ => Ok(false),
        }
    }
}
