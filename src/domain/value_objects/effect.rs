//! Effect descriptors carried by cards and profession abilities
//!
//! A descriptor says *who* an effect lands on ([`TargetKind`]), *what* it
//! does ([`EffectKind`]) and *which* part of the character it touches
//! ([`AttributeKind`]). Effect and attribute kinds are open-ended: content
//! packs may name values the engine does not know yet, and those resolve to
//! a no-op rather than an error.

use std::str::FromStr;

/// Who an effect applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// Every player in the room
    All,
    /// The acting player only
    SelfOnly,
    /// A player chosen by the actor, or a random one if the choice is missing
    SelectPlayer,
    /// One random player in the room
    RandomPlayer,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::SelfOnly => "SELF",
            Self::SelectPlayer => "SELECT_PLAYER",
            Self::RandomPlayer => "RANDOM_PLAYER",
        }
    }
}

impl FromStr for TargetKind {
    type Err = EffectParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ALL" => Ok(Self::All),
            "SELF" => Ok(Self::SelfOnly),
            "SELECT_PLAYER" => Ok(Self::SelectPlayer),
            "RANDOM_PLAYER" => Ok(Self::RandomPlayer),
            other => Err(EffectParseError::UnknownTarget(other.to_string())),
        }
    }
}

/// What an effect does to the targeted attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// Re-roll the attribute from the content tables
    Random,
    /// Reset the attribute to its "nothing wrong" value
    Heal,
    /// Any effect the engine has no mutation for
    Other(String),
}

impl EffectKind {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "RANDOM" => Self::Random,
            "HEAL" => Self::Heal,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Random => "RANDOM",
            Self::Heal => "HEAL",
            Self::Other(s) => s,
        }
    }
}

/// Which character attribute an effect touches
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Profession,
    Health,
    Fear,
    Other(String),
}

impl AttributeKind {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "profession" => Self::Profession,
            "health" => Self::Health,
            "fear" => Self::Fear,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Profession => "profession",
            Self::Health => "health",
            Self::Fear => "fear",
            Self::Other(s) => s,
        }
    }
}

/// Immutable description of one effect, sourced from a card or profession row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectDescriptor {
    pub id: String,
    pub name: String,
    pub target: TargetKind,
    pub effect: EffectKind,
    pub attribute: AttributeKind,
}

impl EffectDescriptor {
    /// Build a descriptor from the raw content columns.
    ///
    /// An empty `effect` column parses as `EffectKind::Other("")`, which no
    /// table entry handles, so targets are still resolved and recorded.
    pub fn from_columns(
        id: &str,
        name: &str,
        target: &str,
        effect: &str,
        attribute: &str,
    ) -> Result<Self, EffectParseError> {
        Ok(Self {
            id: id.to_string(),
            name: name.to_string(),
            target: target.parse()?,
            effect: EffectKind::parse(effect),
            attribute: AttributeKind::parse(attribute),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EffectParseError {
    #[error("Row {0} declares no effect")]
    NoEffect(String),

    #[error("Unknown target kind: {0:?}")]
    UnknownTarget(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_kind_parse() {
        assert_eq!("ALL".parse::<TargetKind>(), Ok(TargetKind::All));
        assert_eq!(" SELF ".parse::<TargetKind>(), Ok(TargetKind::SelfOnly));
        assert_eq!(
            "EVERYONE".parse::<TargetKind>(),
            Err(EffectParseError::UnknownTarget("EVERYONE".to_string()))
        );
    }

    #[test]
    fn test_unknown_kinds_are_kept() {
        assert_eq!(EffectKind::parse("SWAP"), EffectKind::Other("SWAP".into()));
        assert_eq!(
            AttributeKind::parse("hobby"),
            AttributeKind::Other("hobby".into())
        );
        assert_eq!(AttributeKind::parse("hobby").as_str(), "hobby");
    }

    #[test]
    fn test_descriptor_parses_columns() {
        let dud = EffectDescriptor::from_columns("dud", "Dud", "ALL", "", "").unwrap();
        assert_eq!(dud.effect, EffectKind::Other(String::new()));
        assert_eq!(
            EffectDescriptor::from_columns("x", "X", "NOBODY", "HEAL", "health"),
            Err(EffectParseError::UnknownTarget("NOBODY".to_string()))
        );

        let ok = EffectDescriptor::from_columns("doc", "Doctor", "SELF", "HEAL", "health")
            .unwrap();
        assert_eq!(ok.target, TargetKind::SelfOnly);
        assert_eq!(ok.effect, EffectKind::Heal);
        assert_eq!(ok.attribute, AttributeKind::Health);
    }
}
