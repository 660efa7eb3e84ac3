//! Value objects - Immutable objects defined by their attributes

mod content;
mod effect;
mod ids;

pub use content::{
    AgeLimits, BodyLimits, BunkerRow, CardRow, ContentRow, ContentTables, DisasterRow, FactRow,
    FearRow, HealthRow, ItemRow, ItemSize, PackConfig, ProfessionRow, NOTHING,
};
pub use effect::{AttributeKind, EffectDescriptor, EffectKind, EffectParseError, TargetKind};
pub use ids::{PlayerId, RoomCode};
