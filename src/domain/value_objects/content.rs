//! Content tables - the static rows of a game pack
//!
//! Rows arrive from the pack as flat field maps ([`ContentRow`]) and are
//! converted into one typed row per table. A missing column reads as an
//! empty string; only rows that are looked up by id (professions and cards)
//! refuse to exist without one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::effect::{EffectDescriptor, EffectParseError};

/// Flat field-name to value mapping, as read from a delimited file
pub type ContentRow = BTreeMap<String, String>;

/// Display value used wherever a table had nothing to draw from
pub const NOTHING: &str = "Nothing";

fn field(row: &ContentRow, key: &str) -> String {
    row.get(key).cloned().unwrap_or_default()
}

fn required_id(row: &ContentRow) -> Option<String> {
    row.get("id").filter(|id| !id.is_empty()).cloned()
}

/// Everything in the row except the named columns
fn remaining(row: &ContentRow, known: &[&str]) -> BTreeMap<String, String> {
    row.iter()
        .filter(|(k, _)| !known.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessionRow {
    pub id: String,
    pub name: String,
    pub ability: String,
    pub target: String,
    pub effect: String,
    pub attribute: String,
}

impl ProfessionRow {
    pub fn from_row(row: &ContentRow) -> Option<Self> {
        Some(Self {
            id: required_id(row)?,
            name: field(row, "name"),
            ability: field(row, "ability"),
            target: field(row, "target"),
            effect: field(row, "effect"),
            attribute: field(row, "attribute"),
        })
    }

    /// The active ability of this profession. An empty `effect` column means
    /// the profession has no ability at all.
    pub fn descriptor(&self) -> Result<EffectDescriptor, EffectParseError> {
        if self.effect.trim().is_empty() {
            return Err(EffectParseError::NoEffect(self.id.clone()));
        }
        EffectDescriptor::from_columns(
            &self.id,
            &self.name,
            &self.target,
            &self.effect,
            &self.attribute,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub target: String,
    pub effect: String,
    pub attribute: String,
}

impl CardRow {
    pub fn from_row(row: &ContentRow) -> Option<Self> {
        Some(Self {
            id: required_id(row)?,
            name: field(row, "name"),
            description: field(row, "description"),
            target: field(row, "target"),
            effect: field(row, "effect"),
            attribute: field(row, "attribute"),
        })
    }

    /// Stand-in dealt when the pack has no cards. Matches no table row.
    pub fn placeholder() -> Self {
        Self {
            id: String::new(),
            name: NOTHING.to_string(),
            description: String::new(),
            target: String::new(),
            effect: String::new(),
            attribute: String::new(),
        }
    }

    pub fn descriptor(&self) -> Result<EffectDescriptor, EffectParseError> {
        EffectDescriptor::from_columns(
            &self.id,
            &self.name,
            &self.target,
            &self.effect,
            &self.attribute,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRow {
    pub id: String,
    pub name: String,
}

impl HealthRow {
    pub fn from_row(row: &ContentRow) -> Self {
        Self {
            id: field(row, "id"),
            name: field(row, "name"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FearRow {
    pub id: String,
    pub name: String,
}

impl FearRow {
    pub fn from_row(row: &ContentRow) -> Self {
        Self {
            id: field(row, "id"),
            name: field(row, "name"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemSize {
    Small,
    Big,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRow {
    pub id: String,
    pub name: String,
    pub size: ItemSize,
}

impl ItemRow {
    /// Items carry a `type` column; anything other than small/big is skipped
    pub fn from_row(row: &ContentRow) -> Option<Self> {
        let size = match row.get("type").map(String::as_str) {
            Some("small") => ItemSize::Small,
            Some("big") => ItemSize::Big,
            _ => return None,
        };
        Some(Self {
            id: field(row, "id"),
            name: field(row, "name"),
            size,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactRow {
    pub id: String,
    pub text: String,
}

impl FactRow {
    pub fn from_row(row: &ContentRow) -> Self {
        Self {
            id: field(row, "id"),
            text: field(row, "text"),
        }
    }
}

/// Catastrophe that sent everyone into the bunker.
///
/// `description`, `residue` and `time` are templates with `{placeholder}`
/// slots filled in when a game starts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisasterRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub residue: String,
    pub time: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl DisasterRow {
    pub fn from_row(row: &ContentRow) -> Self {
        Self {
            id: field(row, "id"),
            name: field(row, "name"),
            description: field(row, "description"),
            residue: field(row, "residue"),
            time: field(row, "time"),
            extra: remaining(row, &["id", "name", "description", "residue", "time"]),
        }
    }
}

/// The shelter itself; `description` and `supplies` are templates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BunkerRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub supplies: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl BunkerRow {
    pub fn from_row(row: &ContentRow) -> Self {
        Self {
            id: field(row, "id"),
            name: field(row, "name"),
            description: field(row, "description"),
            supplies: field(row, "supplies"),
            extra: remaining(row, &["id", "name", "description", "supplies"]),
        }
    }
}

/// Inclusive age range for generated characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeLimits {
    pub min: u32,
    pub max: u32,
}

/// Inclusive height/weight ranges for generated characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyLimits {
    pub height_min: u32,
    pub height_max: u32,
    pub weight_min: u32,
    pub weight_max: u32,
}

/// Numeric ranges and string lists from a pack's `config.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackConfig {
    #[serde(default)]
    pub age_limits: Option<AgeLimits>,
    #[serde(default)]
    pub body_limits: Option<BodyLimits>,
    #[serde(default)]
    pub genders: Vec<String>,
}

/// All content of one loaded pack. Immutable after loading.
#[derive(Debug, Clone, Default)]
pub struct ContentTables {
    pub professions: Vec<ProfessionRow>,
    pub health: Vec<HealthRow>,
    pub fears: Vec<FearRow>,
    pub hobbies: Vec<ContentRow>,
    pub items_small: Vec<ItemRow>,
    pub items_big: Vec<ItemRow>,
    pub facts: Vec<FactRow>,
    pub disasters: Vec<DisasterRow>,
    pub bunkers: Vec<BunkerRow>,
    pub cards: Vec<CardRow>,
    pub config: PackConfig,
}

impl ContentTables {
    pub fn profession(&self, id: &str) -> Option<&ProfessionRow> {
        self.professions.iter().find(|p| p.id == id)
    }

    pub fn card(&self, id: &str) -> Option<&CardRow> {
        self.cards.iter().find(|c| c.id == id)
    }
}
