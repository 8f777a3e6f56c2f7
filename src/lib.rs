//! # Fabula - World Model & Action-Processing Engine
//!
//! Fabula is the world-model core of an interactive-fiction runtime: the in-memory
//! graph of rooms and entities, the dispatch chain that routes a player's chosen
//! action through listeners and delegates, movement with scope notifications,
//! containers and lockable doors, turn advancement, pathfinding, and whole-graph
//! snapshot/restore for save and undo.
//!
//! ## Features
//!
//! - **Arena world graph**: rooms, entities, and talk topics addressed by stable
//!   string keys, so cyclic cross-references serialize without special cases.
//! - **Action Dispatch Chain**: ordered pre-listeners, per-entity behavior
//!   delegates, built-in defaults, and post-listeners with feedback suppression.
//! - **Movement & Scope**: veto-able player moves and entity relocation with
//!   enter/exit scope hooks fired in a fixed order.
//! - **Containers & Doors**: key-guarded lock state machines; doors are the only
//!   mechanism that rewires the otherwise-static room exit table.
//! - **Persistence**: versioned bincode snapshots with identity-preserving
//!   restore, reused in memory as undo checkpoints.
//! - **Async Audio Channel**: fire-and-forget command queue on a dedicated Tokio
//!   task; audio failures never surface into the action chain.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fabula::config::EngineConfig;
//! use fabula::world::{Engine, WorldState};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = EngineConfig::load("fabula.toml").await?;
//!     let world = WorldState::new("start");
//!     let mut engine = Engine::new(world, config);
//!     engine.dispatch_action("Look", None)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`world`] - The world graph, dispatch chain, movement, turns, persistence
//! - [`audio`] - Fire-and-forget audio command channel
//! - [`config`] - Configuration management and validation
//! - [`logutil`] - Log sanitization helpers
//!
//! ## Architecture
//!
//! The engine is single-writer by construction: all mutation flows through one
//! [`world::Engine`] value, which owns the [`world::WorldState`] graph plus the
//! listener and behavior registries. There is no global state; game content
//! receives an explicit context when it is invoked.

pub mod audio;
pub mod config;
pub mod logutil;
pub mod world;
