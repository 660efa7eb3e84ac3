//! Content pack port - Interface for loading a game content pack
//!
//! Loading is infallible by contract: whatever cannot be read becomes an
//! empty table, so a broken pack degrades the game instead of stopping it.

use crate::domain::value_objects::ContentTables;

/// Source of game content packs
pub trait ContentPackPort: Send + Sync {
    /// Load every table of the named pack
    fn load_pack(&self, pack_name: &str) -> ContentTables;
}
