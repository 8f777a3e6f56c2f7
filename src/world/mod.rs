//! World model and action-processing core.
//!
//! The world is an arena of rooms, entities, and talk topics addressed by
//! stable string keys; the [`Engine`] is the single owner and mutator, routing
//! every player action through the dispatch chain and every relocation through
//! the movement manager so the graph invariants hold at every quiescent point.

pub mod actions;
pub mod attrs;
pub mod behavior;
pub mod container;
pub mod describe;
pub mod door;
pub mod engine;
pub mod errors;
pub mod movement;
pub mod pathfind;
pub mod snapshot;
pub mod state;
pub mod turns;
pub mod types;

pub use actions::{DispatchOutcome, DEFAULT_FEEDBACK};
pub use attrs::{AttrSet, ATTR_CAPACITY, FIRST_CUSTOM_ATTR};
pub use behavior::{
    ActionEcho, ActionListener, Behavior, ContainerListener, Ctx, ListenerVerdict, MoveListener,
    Transcript,
};
pub use describe::{describe_room, format_inventory};
pub use door::{install_door, make_door};
pub use engine::{DebugHandler, Engine, PromptHandler};
pub use errors::WorldError;
pub use pathfind::find_path;
pub use snapshot::{
    load_from_file, restore, save_to_file, snapshot, Checkpoint, SNAPSHOT_SCHEMA_VERSION,
};
pub use state::WorldState;
pub use turns::{TurnListener, TurnOps, TurnRegistry, TurnToken};
pub use types::{
    ContainerState, Direction, DoorSide, DoorState, Entity, EntityId, EntityKind, EntityLocation,
    ExitSlot, Player, Room, RoomId, TalkTopic, TopicKey, Value, EXIT_SLOTS,
};
