//! Fixed-capacity attribute flags for rooms and entities.
//!
//! Every room and entity carries an [`AttrSet`]: 128 boolean flags addressed by
//! index. Indices below [`FIRST_CUSTOM_ATTR`] are reserved for engine-defined
//! flags (one namespace per kind, see [`room`] and [`entity`]); everything at or
//! above the boundary is free for game content. Attribute changes never fire
//! listeners; callers that need a notification invoke it themselves after
//! mutating.

use serde::{Deserialize, Serialize};

/// Number of flags in every attribute set.
pub const ATTR_CAPACITY: usize = 128;

/// First attribute index available to game content. Indices below this are
/// reserved for the engine.
pub const FIRST_CUSTOM_ATTR: usize = 32;

/// Engine-defined room attributes.
pub mod room {
    /// Room has no ambient light; needs a light source in scope to be seen.
    pub const DARK: usize = 0;
    /// Player has entered this room at least once.
    pub const VISITED: usize = 1;
    /// Room is open to the sky.
    pub const OUTDOOR: usize = 2;
}

/// Engine-defined entity attributes.
pub mod entity {
    /// Hidden from room descriptions until revealed.
    pub const CONCEALED: usize = 0;
    /// Can be picked up into inventory.
    pub const TAKEABLE: usize = 1;
    /// Can be worn once carried.
    pub const WEARABLE: usize = 2;
    /// Can be equipped once carried.
    pub const EQUIPPABLE: usize = 3;
    /// Entity is a door.
    pub const DOOR: usize = 4;
    /// Entity is a key for some container or door.
    pub const KEY: usize = 5;
    /// Lights up dark rooms while in scope.
    pub const LIGHT_SOURCE: usize = 6;
}

/// Fixed-capacity bit-flag storage. Out-of-range indices are a programming
/// error and panic immediately rather than being reported as a recoverable
/// condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttrSet {
    bits: [u64; ATTR_CAPACITY / 64],
}

impl AttrSet {
    /// Create an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Test a single flag.
    pub fn has(&self, bit: usize) -> bool {
        assert!(bit < ATTR_CAPACITY, "attribute index {bit} out of range");
        self.bits[bit / 64] & (1u64 << (bit % 64)) != 0
    }

    /// Set a single flag.
    pub fn set(&mut self, bit: usize) {
        assert!(bit < ATTR_CAPACITY, "attribute index {bit} out of range");
        self.bits[bit / 64] |= 1u64 << (bit % 64);
    }

    /// Clear a single flag.
    pub fn clear(&mut self, bit: usize) {
        assert!(bit < ATTR_CAPACITY, "attribute index {bit} out of range");
        self.bits[bit / 64] &= !(1u64 << (bit % 64));
    }

    /// Clear every flag.
    pub fn clear_all(&mut self) {
        self.bits = [0; ATTR_CAPACITY / 64];
    }
}
