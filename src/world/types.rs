//! Core data model for the world graph.
//!
//! Rooms, entities, and talk topics are addressed by stable string keys and all
//! cross-links are stored as keys resolved through the [`WorldState`] arena, so
//! cyclic structures (entity↔room back-references, topic-to-topic links)
//! serialize without special cases and restore with identity preserved.
//!
//! [`WorldState`]: super::state::WorldState

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::attrs::AttrSet;

/// Stable identity key of a room.
pub type RoomId = String;
/// Stable identity key of an entity.
pub type EntityId = String;
/// Stable identity key of a conversation topic.
pub type TopicKey = String;

/// Number of directional exit slots per room.
pub const EXIT_SLOTS: usize = 12;

/// The twelve exit directions, in slot order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    South,
    East,
    West,
    Northeast,
    Northwest,
    Southeast,
    Southwest,
    Up,
    Down,
    In,
    Out,
}

impl Direction {
    /// Slot index of this direction in a room's exit table.
    pub fn slot(self) -> usize {
        self as usize
    }

    /// All directions in slot order.
    pub const ALL: [Direction; EXIT_SLOTS] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::Northeast,
        Direction::Northwest,
        Direction::Southeast,
        Direction::Southwest,
        Direction::Up,
        Direction::Down,
        Direction::In,
        Direction::Out,
    ];

    /// Display label ("north", "up", ...).
    pub fn label(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
            Direction::Northeast => "northeast",
            Direction::Northwest => "northwest",
            Direction::Southeast => "southeast",
            Direction::Southwest => "southwest",
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::In => "in",
            Direction::Out => "out",
        }
    }
}

/// One directional exit slot: destination room plus an optional override label
/// shown instead of the destination's short exit name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExitSlot {
    pub to: Option<RoomId>,
    pub label: Option<String>,
}

/// A location in the world graph. Rooms are created once per game and never
/// destroyed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    /// Short name shown in exit listings of neighboring rooms.
    pub exit_name: String,
    pub description: String,
    pub attrs: AttrSet,
    pub exits: [ExitSlot; EXIT_SLOTS],
    /// Entities physically present, in display order.
    pub entities: Vec<EntityId>,
    /// Behavior registry key of this room's delegate, if any.
    #[serde(default)]
    pub behavior: Option<String>,
}

impl Room {
    pub fn new(id: &str, name: &str, exit_name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            exit_name: exit_name.to_string(),
            description: description.to_string(),
            attrs: AttrSet::new(),
            exits: Default::default(),
            entities: Vec::new(),
            behavior: None,
        }
    }

    /// Wire a plain (non-door) exit toward another room.
    pub fn with_exit(mut self, dir: Direction, to: &str) -> Self {
        self.exits[dir.slot()].to = Some(to.to_string());
        self
    }

    /// Current exit destination in a direction, if open.
    pub fn exit(&self, dir: Direction) -> Option<&RoomId> {
        self.exits[dir.slot()].to.as_ref()
    }
}

/// Where an entity currently is. This reference is the single source of truth
/// for "where is this thing"; the holder's content list mirrors it and the two
/// are kept in sync by the movement manager.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntityLocation {
    Room(RoomId),
    Inventory,
    Container(EntityId),
}

/// Per-side door text and the optional exit label shown while the door is
/// unlocked.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DoorSide {
    pub description: String,
    pub locked_message: String,
    pub unlocked_message: String,
    #[serde(default)]
    pub label: Option<String>,
}

/// Lock state machine of a door between two rooms. When locked, both rooms'
/// corresponding exit slots are cleared; when unlocked, both point at each
/// other. This is the only place the static room exit table becomes dynamic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoorState {
    /// The two connected rooms.
    pub rooms: [RoomId; 2],
    /// Exit direction each room uses to pass through the door. `sides[i]`
    /// belongs to `rooms[i]`.
    pub directions: [Direction; 2],
    pub sides: [DoorSide; 2],
    /// Key entity required to lock or unlock; `None` means the door can never
    /// change lock state.
    pub key: Option<EntityId>,
    pub locked: bool,
}

/// Lock state machine and contents of a container. Contents are disjoint from
/// room entity lists and from player inventory.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContainerState {
    pub contents: Vec<EntityId>,
    /// Key entity required to lock or unlock; `None` means the container can
    /// never be locked.
    pub key: Option<EntityId>,
    pub locked: bool,
}

/// Entity specialization tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Plain,
    Container(ContainerState),
    Door(DoorState),
}

/// Ad hoc extension value for entity properties and auxiliary world state.
/// Self-describing so bincode round-trips it without a schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

/// A thing in the world: scenery, takeable object, container, door, or NPC.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    /// Name used in room/inventory listings; may carry suffixes like "(worn)".
    pub list_name: String,
    pub description: String,
    pub attrs: AttrSet,
    pub location: EntityLocation,
    pub kind: EntityKind,
    /// Open-ended extension data for game content.
    #[serde(default)]
    pub props: BTreeMap<String, Value>,
    /// Active conversation topics, for NPC-like entities.
    #[serde(default)]
    pub topics: Vec<TopicKey>,
    /// Behavior registry key of this entity's delegate, if any.
    #[serde(default)]
    pub behavior: Option<String>,
}

impl Entity {
    pub fn new(id: &str, name: &str, description: &str, location: EntityLocation) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            list_name: name.to_string(),
            description: description.to_string(),
            attrs: AttrSet::new(),
            location,
            kind: EntityKind::Plain,
            props: BTreeMap::new(),
            topics: Vec::new(),
            behavior: None,
        }
    }

    pub fn with_attr(mut self, bit: usize) -> Self {
        self.attrs.set(bit);
        self
    }

    pub fn with_behavior(mut self, key: &str) -> Self {
        self.behavior = Some(key.to_string());
        self
    }

    pub fn with_prop(mut self, key: &str, value: Value) -> Self {
        self.props.insert(key.to_string(), value);
        self
    }

    /// Container state, if this entity is a container.
    pub fn container(&self) -> Option<&ContainerState> {
        match &self.kind {
            EntityKind::Container(c) => Some(c),
            _ => None,
        }
    }

    pub fn container_mut(&mut self) -> Option<&mut ContainerState> {
        match &mut self.kind {
            EntityKind::Container(c) => Some(c),
            _ => None,
        }
    }

    /// Door state, if this entity is a door.
    pub fn door(&self) -> Option<&DoorState> {
        match &self.kind {
            EntityKind::Door(d) => Some(d),
            _ => None,
        }
    }

    pub fn door_mut(&mut self) -> Option<&mut DoorState> {
        match &mut self.kind {
            EntityKind::Door(d) => Some(d),
            _ => None,
        }
    }
}

/// A conversation topic. The adds/removes lists form a directed, possibly
/// cyclic graph over topic keys; the graph lives in the world arena and is
/// referenced by key only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TalkTopic {
    pub key: TopicKey,
    pub label: String,
    pub body: String,
    /// Topics unlocked by choosing this one.
    #[serde(default)]
    pub adds: Vec<TopicKey>,
    /// Topics retired by choosing this one.
    #[serde(default)]
    pub removes: Vec<TopicKey>,
}

impl TalkTopic {
    pub fn new(key: &str, label: &str, body: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            body: body.to_string(),
            adds: Vec::new(),
            removes: Vec::new(),
        }
    }

    pub fn with_add(mut self, key: &str) -> Self {
        self.adds.push(key.to_string());
        self
    }

    pub fn with_remove(mut self, key: &str) -> Self {
        self.removes.push(key.to_string());
        self
    }
}

/// The player: current room, ordered inventory, and the worn/equipped subsets.
/// Both subsets are invariant-checked to be subsets of inventory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub room: RoomId,
    pub inventory: Vec<EntityId>,
    pub worn: Vec<EntityId>,
    pub equipped: Vec<EntityId>,
}

impl Player {
    pub fn new(room: &str) -> Self {
        Self {
            room: room.to_string(),
            inventory: Vec::new(),
            worn: Vec::new(),
            equipped: Vec::new(),
        }
    }

    pub fn carries(&self, id: &str) -> bool {
        self.inventory.iter().any(|e| e == id)
    }

    pub fn is_worn(&self, id: &str) -> bool {
        self.worn.iter().any(|e| e == id)
    }

    pub fn is_equipped(&self, id: &str) -> bool {
        self.equipped.iter().any(|e| e == id)
    }
}
