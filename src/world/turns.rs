//! End-of-turn notification registry.
//!
//! Listeners are notified once per turn advance, in registration order. A
//! listener may register or deregister listeners (including itself) while being
//! notified; those requests go through a deferred-mutation queue ([`TurnOps`])
//! and take effect only after the current pass completes, so the pass neither
//! skips nor double-fires anyone.

use log::debug;

use super::behavior::Ctx;
use super::errors::WorldError;

/// Handle identifying one registered turn listener.
pub type TurnToken = u64;

/// Listener notified once per turn advance.
pub trait TurnListener: Send {
    /// `token` is this listener's own registration handle, usable with
    /// [`TurnOps::deregister`] to remove itself.
    fn on_turn(
        &mut self,
        ctx: &mut Ctx<'_>,
        token: TurnToken,
        ops: &mut TurnOps,
    ) -> Result<(), WorldError>;
}

/// Deferred registry mutations collected during a notification pass.
#[derive(Default)]
pub struct TurnOps {
    adds: Vec<(TurnToken, Box<dyn TurnListener>)>,
    removes: Vec<TurnToken>,
    next_token: TurnToken,
}

impl TurnOps {
    fn new(next_token: TurnToken) -> Self {
        Self {
            adds: Vec::new(),
            removes: Vec::new(),
            next_token,
        }
    }

    /// Queue a new listener; it first fires on the *next* turn.
    pub fn register(&mut self, listener: Box<dyn TurnListener>) -> TurnToken {
        let token = self.next_token;
        self.next_token += 1;
        self.adds.push((token, listener));
        token
    }

    /// Queue removal of a listener; it still finishes the current pass.
    pub fn deregister(&mut self, token: TurnToken) {
        self.removes.push(token);
    }
}

/// Dynamically-sized turn listener registry.
#[derive(Default)]
pub struct TurnRegistry {
    entries: Vec<(TurnToken, Box<dyn TurnListener>)>,
    next_token: TurnToken,
}

impl TurnRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener outside a notification pass.
    pub fn register(&mut self, listener: Box<dyn TurnListener>) -> TurnToken {
        let token = self.next_token;
        self.next_token += 1;
        self.entries.push((token, listener));
        debug!("turns: registered listener {token}");
        token
    }

    /// Deregister a listener outside a notification pass.
    pub fn deregister(&mut self, token: TurnToken) {
        self.entries.retain(|(t, _)| *t != token);
        debug!("turns: deregistered listener {token}");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run one notification pass over a stable snapshot of the registry, then
    /// apply the queued add/remove operations.
    pub fn notify(&mut self, ctx: &mut Ctx<'_>) -> Result<(), WorldError> {
        let mut entries = std::mem::take(&mut self.entries);
        let mut ops = TurnOps::new(self.next_token);
        let mut result = Ok(());
        for (token, listener) in entries.iter_mut() {
            if let Err(err) = listener.on_turn(ctx, *token, &mut ops) {
                result = Err(err);
                break;
            }
        }
        // Registry mutations still apply when a listener faulted; the caller
        // decides whether to abort the session.
        self.next_token = ops.next_token;
        entries.retain(|(t, _)| !ops.removes.contains(t));
        entries.extend(ops.adds);
        self.entries = entries;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::behavior::Transcript;
    use crate::world::state::WorldState;

    struct Counter {
        name: &'static str,
        deregister_self: bool,
    }

    impl TurnListener for Counter {
        fn on_turn(
            &mut self,
            ctx: &mut Ctx<'_>,
            token: TurnToken,
            ops: &mut TurnOps,
        ) -> Result<(), WorldError> {
            ctx.say(format!("{} fired", self.name));
            if self.deregister_self {
                ops.deregister(token);
            }
            Ok(())
        }
    }

    struct Spawner;

    impl TurnListener for Spawner {
        fn on_turn(
            &mut self,
            ctx: &mut Ctx<'_>,
            token: TurnToken,
            ops: &mut TurnOps,
        ) -> Result<(), WorldError> {
            ctx.say("spawner fired");
            ops.register(Box::new(Counter {
                name: "spawned",
                deregister_self: false,
            }));
            ops.deregister(token);
            Ok(())
        }
    }

    fn pass(registry: &mut TurnRegistry, world: &mut WorldState) -> Vec<String> {
        let mut out = Transcript::default();
        let mut ctx = Ctx::new(world, &mut out, None);
        registry.notify(&mut ctx).expect("notify");
        out.drain()
    }

    #[test]
    fn listeners_fire_in_registration_order() {
        let mut world = WorldState::new("start");
        let mut registry = TurnRegistry::new();
        registry.register(Box::new(Counter {
            name: "first",
            deregister_self: false,
        }));
        registry.register(Box::new(Counter {
            name: "second",
            deregister_self: false,
        }));
        assert_eq!(pass(&mut registry, &mut world), vec!["first fired", "second fired"]);
    }

    #[test]
    fn self_deregistration_takes_effect_next_pass() {
        let mut world = WorldState::new("start");
        let mut registry = TurnRegistry::new();
        registry.register(Box::new(Counter {
            name: "oneshot",
            deregister_self: true,
        }));
        assert_eq!(pass(&mut registry, &mut world), vec!["oneshot fired"]);
        assert!(registry.is_empty());
        assert!(pass(&mut registry, &mut world).is_empty());
    }

    #[test]
    fn registration_during_pass_fires_next_turn_not_this_one() {
        let mut world = WorldState::new("start");
        let mut registry = TurnRegistry::new();
        registry.register(Box::new(Spawner));
        // The spawned listener must not fire during the pass that created it.
        assert_eq!(pass(&mut registry, &mut world), vec!["spawner fired"]);
        assert_eq!(registry.len(), 1);
        assert_eq!(pass(&mut registry, &mut world), vec!["spawned fired"]);
    }
}
