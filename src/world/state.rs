//! The root world aggregate and its invariants.
//!
//! [`WorldState`] owns the room, entity, and topic arenas plus the player and an
//! open map of auxiliary singleton state. It is constructed once at new-game
//! time by game-specific setup code, mutated in place for the life of a session,
//! replaced wholesale on load, and captured wholesale on save/checkpoint.

use std::collections::BTreeMap;

use log::debug;

use super::attrs::{entity as entity_attr, room as room_attr};
use super::errors::WorldError;
use super::types::{
    Entity, EntityId, EntityKind, EntityLocation, Player, Room, RoomId, TalkTopic, TopicKey, Value,
};

/// The complete mutable world: player, room/entity/topic arenas, auxiliary
/// state, and the turn counter. All cross-links between records are identity
/// keys resolved through this arena.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct WorldState {
    pub player: Player,
    pub rooms: BTreeMap<RoomId, Room>,
    pub entities: BTreeMap<EntityId, Entity>,
    pub topics: BTreeMap<TopicKey, TalkTopic>,
    /// Auxiliary singleton state keyed by name (manager state, per-game flags).
    pub aux: BTreeMap<String, Value>,
    pub turn: u64,
}

impl WorldState {
    /// Create an empty world with the player standing in `start_room`. The
    /// start room itself must still be inserted by game setup.
    pub fn new(start_room: &str) -> Self {
        Self {
            player: Player::new(start_room),
            rooms: BTreeMap::new(),
            entities: BTreeMap::new(),
            topics: BTreeMap::new(),
            aux: BTreeMap::new(),
            turn: 0,
        }
    }

    /// Insert a room into the arena. Rooms are created once per game and never
    /// destroyed.
    pub fn add_room(&mut self, room: Room) {
        debug!("world: add room {}", room.id);
        self.rooms.insert(room.id.clone(), room);
    }

    /// Insert an entity and mirror its location into the holder's content list.
    pub fn add_entity(&mut self, entity: Entity) {
        debug!("world: add entity {} at {:?}", entity.id, entity.location);
        let id = entity.id.clone();
        let location = entity.location.clone();
        self.entities.insert(id.clone(), entity);
        match location {
            EntityLocation::Room(room_id) => {
                if let Some(room) = self.rooms.get_mut(&room_id) {
                    room.entities.push(id);
                }
            }
            EntityLocation::Inventory => self.player.inventory.push(id),
            EntityLocation::Container(holder) => {
                if let Some(c) = self.entities.get_mut(&holder).and_then(Entity::container_mut) {
                    c.contents.push(id);
                }
            }
        }
    }

    /// Insert a conversation topic into the arena.
    pub fn add_topic(&mut self, topic: TalkTopic) {
        self.topics.insert(topic.key.clone(), topic);
    }

    pub fn room(&self, id: &str) -> Result<&Room, WorldError> {
        self.rooms
            .get(id)
            .ok_or_else(|| WorldError::NotFound(format!("room: {id}")))
    }

    pub fn room_mut(&mut self, id: &str) -> Result<&mut Room, WorldError> {
        self.rooms
            .get_mut(id)
            .ok_or_else(|| WorldError::NotFound(format!("room: {id}")))
    }

    pub fn entity(&self, id: &str) -> Result<&Entity, WorldError> {
        self.entities
            .get(id)
            .ok_or_else(|| WorldError::NotFound(format!("entity: {id}")))
    }

    pub fn entity_mut(&mut self, id: &str) -> Result<&mut Entity, WorldError> {
        self.entities
            .get_mut(id)
            .ok_or_else(|| WorldError::NotFound(format!("entity: {id}")))
    }

    pub fn topic(&self, key: &str) -> Result<&TalkTopic, WorldError> {
        self.topics
            .get(key)
            .ok_or_else(|| WorldError::NotFound(format!("topic: {key}")))
    }

    /// The room the player is standing in.
    pub fn current_room(&self) -> Result<&Room, WorldError> {
        self.room(&self.player.room)
    }

    /// Whether an entity is in scope: present in the current room (directly or
    /// inside an unlocked open container there) or carried by the player.
    pub fn in_scope(&self, id: &str) -> bool {
        match self.entities.get(id).map(|e| &e.location) {
            Some(EntityLocation::Room(room_id)) => *room_id == self.player.room,
            Some(EntityLocation::Inventory) => true,
            Some(EntityLocation::Container(holder)) => self.in_scope(holder),
            None => false,
        }
    }

    /// Whether the room can currently be seen: not dark, or some unconcealed
    /// light-source entity is in the room or carried.
    pub fn room_is_lit(&self, room_id: &str) -> Result<bool, WorldError> {
        let room = self.room(room_id)?;
        if !room.attrs.has(room_attr::DARK) {
            return Ok(true);
        }
        let lit = |id: &EntityId| {
            self.entities.get(id).is_some_and(|e| {
                e.attrs.has(entity_attr::LIGHT_SOURCE) && !e.attrs.has(entity_attr::CONCEALED)
            })
        };
        Ok(room.entities.iter().any(lit) || self.player.inventory.iter().any(lit))
    }

    /// Choose a conversation topic on an NPC-like entity: returns the body text
    /// and applies the topic's adds/removes to the entity's active topic list,
    /// preserving order and skipping duplicates.
    ///
    /// A topic graph edge naming a key that is not in the arena is a
    /// programming error in game content and fails fast.
    pub fn choose_topic(&mut self, npc: &str, key: &str) -> Result<String, WorldError> {
        let topic = self.topic(key)?.clone();
        for linked in topic.adds.iter().chain(topic.removes.iter()) {
            assert!(
                self.topics.contains_key(linked),
                "topic graph references unknown key {linked:?} (from {key:?})"
            );
        }
        let entity = self.entity_mut(npc)?;
        entity.topics.retain(|t| !topic.removes.contains(t));
        for add in &topic.adds {
            if !entity.topics.contains(add) {
                entity.topics.push(add.clone());
            }
        }
        debug!("world: topic {key} chosen on {npc}");
        Ok(topic.body)
    }

    /// Verify the structural invariants of the graph, panicking with a
    /// diagnostic on the first violation. Called after restore and from tests;
    /// violations are programming errors, not recoverable conditions.
    pub fn check_invariants(&self) {
        for (id, entity) in &self.entities {
            assert_eq!(*id, entity.id, "entity arena key mismatch for {id:?}");
            // Exactly one holder list must contain the entity, and it must be
            // the one its location names.
            let mut holders = 0usize;
            for room in self.rooms.values() {
                if room.entities.iter().any(|e| e == id) {
                    holders += 1;
                    assert_eq!(
                        entity.location,
                        EntityLocation::Room(room.id.clone()),
                        "entity {id:?} listed in room {:?} but located at {:?}",
                        room.id,
                        entity.location
                    );
                }
            }
            if self.player.inventory.iter().any(|e| e == id) {
                holders += 1;
                assert_eq!(
                    entity.location,
                    EntityLocation::Inventory,
                    "entity {id:?} listed in inventory but located at {:?}",
                    entity.location
                );
            }
            for (hid, holder) in &self.entities {
                if let EntityKind::Container(c) = &holder.kind {
                    if c.contents.iter().any(|e| e == id) {
                        holders += 1;
                        assert_eq!(
                            entity.location,
                            EntityLocation::Container(hid.clone()),
                            "entity {id:?} listed in container {hid:?} but located at {:?}",
                            entity.location
                        );
                    }
                }
            }
            assert_eq!(holders, 1, "entity {id:?} held by {holders} locations");
            for topic in &entity.topics {
                assert!(
                    self.topics.contains_key(topic),
                    "entity {id:?} references unknown topic {topic:?}"
                );
            }
        }
        for id in self.player.worn.iter().chain(self.player.equipped.iter()) {
            assert!(
                self.player.carries(id),
                "worn/equipped entity {id:?} is not in inventory"
            );
        }
        assert!(
            self.rooms.contains_key(&self.player.room),
            "player is in unknown room {:?}",
            self.player.room
        );
        for room in self.rooms.values() {
            for slot in &room.exits {
                if let Some(to) = &slot.to {
                    assert!(
                        self.rooms.contains_key(to),
                        "room {:?} has an exit to unknown room {to:?}",
                        room.id
                    );
                }
            }
        }
        for topic in self.topics.values() {
            for linked in topic.adds.iter().chain(topic.removes.iter()) {
                assert!(
                    self.topics.contains_key(linked),
                    "topic {:?} references unknown key {linked:?}",
                    topic.key
                );
            }
        }
    }
}
