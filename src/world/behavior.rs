//! Behavior overrides and listener seams.
//!
//! Rooms and entities customize the engine through a small fixed capability
//! trait ([`Behavior`]) registered under a string key; the record stores the key
//! and absence falls back to built-in default behavior. Listeners observe the
//! dispatch chain, player moves, and container changes. All hooks receive an
//! explicit [`Ctx`] instead of reaching for any global state.

use crate::audio::{AudioCmd, AudioHandle};

use super::errors::WorldError;
use super::state::WorldState;

/// In-world text accumulated during one engine call, in emission order. The
/// presentation layer drains it after each call.
#[derive(Debug, Default)]
pub struct Transcript {
    lines: Vec<String>,
}

impl Transcript {
    /// Emit a line of in-world text.
    pub fn say(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Take all accumulated lines.
    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Explicit context handed to behaviors and listeners: mutable world access,
/// the transcript, and the audio channel. Borrowed from the engine for the
/// duration of one hook invocation.
pub struct Ctx<'a> {
    pub world: &'a mut WorldState,
    pub out: &'a mut Transcript,
    audio: Option<&'a AudioHandle>,
}

impl<'a> Ctx<'a> {
    pub fn new(
        world: &'a mut WorldState,
        out: &'a mut Transcript,
        audio: Option<&'a AudioHandle>,
    ) -> Self {
        Self { world, out, audio }
    }

    /// Emit a line of in-world text.
    pub fn say(&mut self, line: impl Into<String>) {
        self.out.say(line);
    }

    /// Fire-and-forget an audio command. A missing or failed audio worker is
    /// never an error here.
    pub fn audio(&self, cmd: AudioCmd) {
        if let Some(handle) = self.audio {
            handle.send(cmd);
        }
    }
}

/// How an action's textual echo (e.g. "> TAKE CLOAK") should be rendered.
/// Resolved before the action is processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionEcho {
    /// Show the default echo.
    Default,
    /// Suppress the echo entirely.
    Suppress,
    /// Show replacement text instead.
    Replace(String),
}

/// Optional behavior override for one room or entity. Every method has a
/// default so overrides implement only what they need; a record with no
/// behavior key gets the engine's built-in handling.
#[allow(unused_variables)]
pub trait Behavior: Send {
    /// Action labels this subject offers, appended to the built-in ones.
    fn actions(&self, world: &WorldState, subject: &str) -> Vec<String> {
        Vec::new()
    }

    /// Echo interception for an action on this subject.
    fn echo(&self, world: &WorldState, subject: &str, action: &str) -> ActionEcho {
        ActionEcho::Default
    }

    /// Process an action. Return `Ok(true)` when fully handled; `Ok(false)`
    /// falls through to the built-in default logic. Errors propagate out of
    /// the dispatch chain uncaught.
    fn process_action(
        &mut self,
        ctx: &mut Ctx<'_>,
        subject: &str,
        action: &str,
    ) -> Result<bool, WorldError> {
        Ok(false)
    }

    /// Subject is entering the player's scope.
    fn on_enter_scope(&mut self, ctx: &mut Ctx<'_>, subject: &str) {}

    /// Subject is leaving the player's scope.
    fn on_exit_scope(&mut self, ctx: &mut Ctx<'_>, subject: &str) {}
}

/// What an action listener decided about the action it was shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerVerdict {
    /// Not interested.
    Pass,
    /// Fully handled; in the pre-action pass this stops the chain before the
    /// entity is consulted.
    Handled,
    /// Suppress the default "nothing happens" feedback (post-action pass).
    SuppressDefault,
}

/// Non-entity observer of the action dispatch chain. Invoked once with
/// `before_action = true` ahead of the entity and once with
/// `before_action = false` afterwards; the post-action call carries whether
/// anything handled the action.
pub trait ActionListener: Send {
    fn action_performed(
        &mut self,
        ctx: &mut Ctx<'_>,
        action: &str,
        target: Option<&str>,
        before_action: bool,
        handled: bool,
    ) -> Result<ListenerVerdict, WorldError>;
}

/// Observer of player movement between rooms. `before_move` may veto;
/// `after_move` cannot.
#[allow(unused_variables)]
pub trait MoveListener: Send {
    /// Return `Ok(true)` to veto the move entirely.
    fn before_move(&mut self, ctx: &mut Ctx<'_>, from: &str, to: &str) -> Result<bool, WorldError> {
        Ok(false)
    }

    fn after_move(&mut self, ctx: &mut Ctx<'_>, from: &str, to: &str) -> Result<(), WorldError> {
        Ok(())
    }
}

/// Observer of container content changes. Consulted once before the item is
/// moved (may veto) and once after (informational).
#[allow(unused_variables)]
pub trait ContainerListener: Send {
    /// Return `true` to veto the change; the item stays where it was.
    fn before_change(&mut self, world: &WorldState, container: &str, item: &str, adding: bool) -> bool {
        false
    }

    fn after_change(&mut self, world: &WorldState, container: &str, item: &str, adding: bool) {}
}
