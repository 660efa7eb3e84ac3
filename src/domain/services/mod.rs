//! Domain services - Pure game rules over entities and content
//!
//! Every service takes its randomness as an argument so games can be
//! replayed in tests with a seeded generator.

pub mod character_generator;
pub mod effect_engine;
pub mod scenario;

pub use effect_engine::{EffectEngine, EffectOutcome, EffectTable};
