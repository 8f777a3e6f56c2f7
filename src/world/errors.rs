use thiserror::Error;

/// Errors that can arise while mutating or persisting the world graph.
#[derive(Debug, Error)]
pub enum WorldError {
    /// Wrapper around IO errors (save directory creation, file writes).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Returned when looking up a room, entity, or topic that is not present.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Returned when loading a snapshot with an unexpected schema version.
    /// The in-memory world is untouched when this is returned.
    #[error("schema mismatch for {entity}: expected {expected}, got {found}")]
    SchemaMismatch {
        entity: &'static str,
        expected: u16,
        found: u16,
    },

    /// Returned when loading bytes that are not a fabula snapshot at all.
    #[error("not a fabula snapshot")]
    NotASnapshot,

    /// Worn/equipped toggles require the entity to already be in inventory.
    #[error("entity not in inventory: {0}")]
    NotCarried(String),

    /// Returned when undoing with no checkpoint on the stack.
    #[error("no checkpoint available")]
    NoCheckpoint,

    /// Internal error (unexpected conditions that are not invariant breaks).
    #[error("internal error: {0}")]
    Internal(String),
}
