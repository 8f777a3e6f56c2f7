//! Whole-graph persistence: save files, and in-memory undo checkpoints.
//!
//! A snapshot is a self-describing, versioned blob: a fixed magic tag, the
//! schema version, and the bincode-encoded [`WorldState`]. Because the world is
//! an arena keyed by identity, all cross-references (player→room,
//! room→entities, container→contents, door→rooms, topic→topic cycles) come
//! back with identity preserved and no cycle handling. Loading an incompatible
//! blob fails with [`WorldError::SchemaMismatch`] and leaves the caller's
//! in-memory world untouched.

use std::path::Path;

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::errors::WorldError;
use super::state::WorldState;

/// Magic tag identifying a fabula snapshot.
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"FABL";

/// Schema version written into every snapshot and checked on restore.
pub const SNAPSHOT_SCHEMA_VERSION: u16 = 3;

#[derive(Serialize, Deserialize)]
struct SnapshotBlob {
    magic: [u8; 4],
    schema_version: u16,
    created_at: DateTime<Utc>,
    world: WorldState,
}

/// Leading fields of [`SnapshotBlob`], decodable on their own so the version
/// check never depends on the rest of the blob being readable.
#[derive(Serialize, Deserialize)]
struct SnapshotHeader {
    magic: [u8; 4],
    schema_version: u16,
}

/// Serialize the complete world graph into a versioned blob.
pub fn snapshot(world: &WorldState) -> Result<Vec<u8>, WorldError> {
    let blob = SnapshotBlob {
        magic: SNAPSHOT_MAGIC,
        schema_version: SNAPSHOT_SCHEMA_VERSION,
        created_at: Utc::now(),
        world: world.clone(),
    };
    let bytes = bincode::serialize(&blob)?;
    debug!("snapshot: captured {} bytes at turn {}", bytes.len(), world.turn);
    Ok(bytes)
}

/// Restore a world graph from a snapshot blob. The restored graph passes the
/// full invariant check before it is returned.
pub fn restore(bytes: &[u8]) -> Result<WorldState, WorldError> {
    if bytes.len() < 4 || bytes[..4] != SNAPSHOT_MAGIC {
        return Err(WorldError::NotASnapshot);
    }
    let header: SnapshotHeader = bincode::deserialize(bytes)?;
    if header.schema_version != SNAPSHOT_SCHEMA_VERSION {
        return Err(WorldError::SchemaMismatch {
            entity: "snapshot",
            expected: SNAPSHOT_SCHEMA_VERSION,
            found: header.schema_version,
        });
    }
    let blob: SnapshotBlob = bincode::deserialize(bytes)?;
    blob.world.check_invariants();
    debug!("snapshot: restored world at turn {}", blob.world.turn);
    Ok(blob.world)
}

/// Write a snapshot to a save file, creating parent directories as needed.
pub fn save_to_file(world: &WorldState, path: impl AsRef<Path>) -> Result<(), WorldError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let bytes = snapshot(world)?;
    std::fs::write(path, &bytes)?;
    info!("snapshot: saved {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Load a world from a save file. An incompatible file is a fatal error for
/// this load attempt only.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<WorldState, WorldError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let world = restore(&bytes)?;
    info!("snapshot: loaded world from {}", path.display());
    Ok(world)
}

/// An in-memory snapshot usable for undo: capture before a risky operation,
/// restore on demand. Same blob format as save files.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    bytes: Vec<u8>,
}

impl Checkpoint {
    /// Capture the current world.
    pub fn capture(world: &WorldState) -> Result<Self, WorldError> {
        Ok(Self {
            bytes: snapshot(world)?,
        })
    }

    /// Rebuild the captured world.
    pub fn restore(&self) -> Result<WorldState, WorldError> {
        restore(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::types::{Entity, EntityLocation, Room};

    fn sample_world() -> WorldState {
        let mut world = WorldState::new("hall");
        world.add_room(Room::new("hall", "The Hall", "hall", "A long hall."));
        world.add_entity(Entity::new(
            "cloak",
            "velvet cloak",
            "A cloak of deepest black.",
            EntityLocation::Inventory,
        ));
        world
    }

    #[test]
    fn snapshot_restore_round_trip() {
        let world = sample_world();
        let bytes = snapshot(&world).expect("snapshot");
        let restored = restore(&bytes).expect("restore");
        assert_eq!(restored, world);
    }

    #[test]
    fn wrong_schema_version_is_rejected() {
        let world = sample_world();
        let blob = SnapshotBlob {
            magic: SNAPSHOT_MAGIC,
            schema_version: SNAPSHOT_SCHEMA_VERSION + 1,
            created_at: Utc::now(),
            world,
        };
        let bytes = bincode::serialize(&blob).expect("serialize");
        match restore(&bytes) {
            Err(WorldError::SchemaMismatch { expected, found, .. }) => {
                assert_eq!(expected, SNAPSHOT_SCHEMA_VERSION);
                assert_eq!(found, SNAPSHOT_SCHEMA_VERSION + 1);
            }
            other => panic!("expected schema mismatch, got {other:?}"),
        }
    }

    #[test]
    fn version_is_checked_before_the_world_decodes() {
        // A tagged blob from a later schema whose world payload is unreadable
        // still reports the version mismatch, not a decode failure.
        let mut bytes = SNAPSHOT_MAGIC.to_vec();
        bytes.extend_from_slice(&(SNAPSHOT_SCHEMA_VERSION + 9).to_le_bytes());
        bytes.extend_from_slice(b"unreadable payload");
        match restore(&bytes) {
            Err(WorldError::SchemaMismatch { found, .. }) => {
                assert_eq!(found, SNAPSHOT_SCHEMA_VERSION + 9);
            }
            other => panic!("expected schema mismatch, got {other:?}"),
        }
    }

    #[test]
    fn garbage_is_not_a_snapshot() {
        assert!(matches!(
            restore(b"not a snapshot at all"),
            Err(WorldError::NotASnapshot)
        ));
    }

    #[test]
    fn checkpoint_round_trip() {
        let mut world = sample_world();
        let checkpoint = Checkpoint::capture(&world).expect("capture");
        world.player.inventory.clear();
        world.entities.clear();
        let undone = checkpoint.restore().expect("restore");
        assert!(undone.player.carries("cloak"));
    }
}
