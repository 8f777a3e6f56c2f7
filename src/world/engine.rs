//! The engine context object.
//!
//! [`Engine`] owns the [`WorldState`] plus everything that is deliberately not
//! part of the serialized world: the behavior registry, the listener
//! registries, the turn registry, the undo checkpoint stack, the audio handle,
//! and the optional prompt/debug collaborators. There is exactly one logical
//! mutator — all world mutation flows through `&mut Engine` — so the
//! single-writer rule of the world model is enforced by ownership rather than
//! by convention.
//!
//! Behaviors and listeners are registered by game setup code after
//! construction and after every load; snapshots capture data only, and records
//! re-attach to their delegates through the stored behavior key.

use std::collections::BTreeMap;

use log::{debug, info, warn};

use crate::audio::AudioHandle;
use crate::config::EngineConfig;
use crate::logutil::escape_log;

use super::behavior::{ActionListener, Behavior, ContainerListener, Ctx, MoveListener, Transcript};
use super::errors::WorldError;
use super::snapshot::{self, Checkpoint};
use super::state::WorldState;
use super::turns::TurnRegistry;

/// Synchronous player-input boundary implemented by the presentation layer.
/// Issuing a request suspends the in-progress chain until a response is
/// available; `None` means the player dismissed the dialog.
pub trait PromptHandler: Send {
    /// Choose-from-list dialog; returns the chosen index.
    fn choose(&mut self, prompt: &str, options: &[String]) -> Option<usize>;

    /// Free-text prompt.
    fn text_input(&mut self, prompt: &str) -> Option<String>;
}

/// Game-specific debug command hook. The engine hands the raw string through
/// without parsing or validating it.
pub trait DebugHandler: Send {
    fn handle(&mut self, ctx: &mut Ctx<'_>, raw: &str) -> Result<(), WorldError>;
}

/// The world model engine: single owner and single mutator of the world graph.
pub struct Engine {
    pub world: WorldState,
    config: EngineConfig,
    behaviors: BTreeMap<String, Box<dyn Behavior>>,
    pub(super) action_listeners: Vec<Box<dyn ActionListener>>,
    pub(super) move_listeners: Vec<Box<dyn MoveListener>>,
    pub(super) container_listeners: Vec<Box<dyn ContainerListener>>,
    pub turns: TurnRegistry,
    pub(super) audio: Option<AudioHandle>,
    pub(super) out: Transcript,
    checkpoints: Vec<Checkpoint>,
    prompt: Option<Box<dyn PromptHandler>>,
    debug_handler: Option<Box<dyn DebugHandler>>,
}

impl Engine {
    pub fn new(world: WorldState, config: EngineConfig) -> Self {
        Self {
            world,
            config,
            behaviors: BTreeMap::new(),
            action_listeners: Vec::new(),
            move_listeners: Vec::new(),
            container_listeners: Vec::new(),
            turns: TurnRegistry::new(),
            audio: None,
            out: Transcript::default(),
            checkpoints: Vec::new(),
            prompt: None,
            debug_handler: None,
        }
    }

    /// Attach the audio command channel. Without one, audio requests from game
    /// content are silently dropped.
    pub fn with_audio(mut self, audio: AudioHandle) -> Self {
        self.audio = Some(audio);
        self
    }

    pub fn set_prompt_handler(&mut self, handler: Box<dyn PromptHandler>) {
        self.prompt = Some(handler);
    }

    pub fn set_debug_handler(&mut self, handler: Box<dyn DebugHandler>) {
        self.debug_handler = Some(handler);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register a behavior override under a key; rooms/entities reference it
    /// through their `behavior` field.
    pub fn register_behavior(&mut self, key: &str, behavior: Box<dyn Behavior>) {
        debug!("engine: registered behavior {key}");
        self.behaviors.insert(key.to_string(), behavior);
    }

    pub fn add_action_listener(&mut self, listener: Box<dyn ActionListener>) {
        self.action_listeners.push(listener);
    }

    pub fn add_move_listener(&mut self, listener: Box<dyn MoveListener>) {
        self.move_listeners.push(listener);
    }

    pub fn add_container_listener(&mut self, listener: Box<dyn ContainerListener>) {
        self.container_listeners.push(listener);
    }

    /// Take all in-world text accumulated since the last drain.
    pub fn drain_output(&mut self) -> Vec<String> {
        self.out.drain()
    }

    /// Behavior key attached to a subject (entity first, then room).
    pub(super) fn behavior_key_of(&self, subject: &str) -> Option<String> {
        if let Some(entity) = self.world.entities.get(subject) {
            return entity.behavior.clone();
        }
        self.world.rooms.get(subject).and_then(|r| r.behavior.clone())
    }

    pub(super) fn fire_enter_scope(&mut self, subject: &str) {
        if let Some(key) = self.behavior_key_of(subject) {
            if let Some(behavior) = self.behaviors.get_mut(&key) {
                let mut ctx = Ctx::new(&mut self.world, &mut self.out, self.audio.as_ref());
                behavior.on_enter_scope(&mut ctx, subject);
            }
        }
    }

    pub(super) fn fire_exit_scope(&mut self, subject: &str) {
        if let Some(key) = self.behavior_key_of(subject) {
            if let Some(behavior) = self.behaviors.get_mut(&key) {
                let mut ctx = Ctx::new(&mut self.world, &mut self.out, self.audio.as_ref());
                behavior.on_exit_scope(&mut ctx, subject);
            }
        }
    }

    /// Run a closure against the subject's behavior override, if both the key
    /// and the registered behavior exist.
    pub(super) fn with_behavior<R>(
        &mut self,
        subject: &str,
        f: impl FnOnce(&mut Box<dyn Behavior>, &mut Ctx<'_>) -> R,
    ) -> Option<R> {
        let key = self.behavior_key_of(subject)?;
        let behavior = self.behaviors.get_mut(&key)?;
        let mut ctx = Ctx::new(&mut self.world, &mut self.out, self.audio.as_ref());
        Some(f(behavior, &mut ctx))
    }

    /// Immutable behavior lookup for echo/action queries.
    pub(super) fn behavior_of(&self, subject: &str) -> Option<&dyn Behavior> {
        let key = self.behavior_key_of(subject)?;
        self.behaviors.get(&key).map(|b| b.as_ref())
    }

    /// Advance one turn: bump the counter and notify the turn registry.
    pub fn advance_turn(&mut self) -> Result<(), WorldError> {
        self.world.turn += 1;
        debug!("engine: turn {}", self.world.turn);
        let mut ctx = Ctx::new(&mut self.world, &mut self.out, self.audio.as_ref());
        self.turns.notify(&mut ctx)
    }

    /// Capture an undo checkpoint, evicting the oldest one beyond the
    /// configured depth.
    pub fn push_checkpoint(&mut self) -> Result<(), WorldError> {
        let checkpoint = Checkpoint::capture(&self.world)?;
        self.checkpoints.push(checkpoint);
        let depth = self.config.saves.undo_depth.max(1);
        while self.checkpoints.len() > depth {
            self.checkpoints.remove(0);
        }
        Ok(())
    }

    /// Restore the most recent checkpoint. The current world is replaced only
    /// after the checkpoint decodes cleanly.
    pub fn undo(&mut self) -> Result<(), WorldError> {
        let checkpoint = self.checkpoints.pop().ok_or(WorldError::NoCheckpoint)?;
        self.world = checkpoint.restore()?;
        info!("engine: undo to turn {}", self.world.turn);
        Ok(())
    }

    pub fn checkpoint_count(&self) -> usize {
        self.checkpoints.len()
    }

    /// Save the world to a file under the configured saves directory.
    pub fn save(&self, slot: &str) -> Result<(), WorldError> {
        let path = self.config.save_path(slot);
        snapshot::save_to_file(&self.world, path)
    }

    /// Load a save slot, replacing the world wholesale. An incompatible file
    /// leaves the current world untouched and playable.
    pub fn load(&mut self, slot: &str) -> Result<(), WorldError> {
        let path = self.config.save_path(slot);
        let world = snapshot::load_from_file(path)?;
        self.world = world;
        Ok(())
    }

    /// Pose a choose-from-list dialog through the prompt handler, if attached.
    pub fn prompt_choice(&mut self, prompt: &str, options: &[String]) -> Option<usize> {
        self.prompt.as_mut()?.choose(prompt, options)
    }

    /// Pose a free-text prompt through the prompt handler, if attached.
    pub fn prompt_text(&mut self, prompt: &str) -> Option<String> {
        self.prompt.as_mut()?.text_input(prompt)
    }

    /// Hand an opaque debug string to game-specific logic.
    pub fn debug_command(&mut self, raw: &str) -> Result<(), WorldError> {
        debug!("engine: debug command {}", escape_log(raw));
        let Some(mut handler) = self.debug_handler.take() else {
            warn!("engine: debug command with no handler attached");
            return Ok(());
        };
        let mut ctx = Ctx::new(&mut self.world, &mut self.out, self.audio.as_ref());
        let result = handler.handle(&mut ctx, raw);
        self.debug_handler = Some(handler);
        result
    }
}
