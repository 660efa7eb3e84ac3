//! Character generation - rolls one player's attribute bundle from the pack
//!
//! Generation is total over partially filled packs: an empty table yields the
//! [`NOTHING`] placeholder for that attribute instead of failing. Only a pack
//! config without usable numeric ranges makes generation inert.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use crate::domain::entities::{Baggage, Bio, Character, HealthState, Profession};
use crate::domain::value_objects::{CardRow, ContentRow, ContentTables, PackConfig, NOTHING};

/// How many times the second card is re-drawn when it duplicates the first
pub const CARD_RESAMPLE_ATTEMPTS: u32 = 10;

/// Generate a character, or `None` if the pack config lacks valid ranges
pub fn generate<R: Rng + ?Sized>(
    config: &PackConfig,
    tables: &ContentTables,
    rng: &mut R,
) -> Option<Character> {
    let (Some(age_limits), Some(body)) = (config.age_limits, config.body_limits) else {
        warn!("Pack config has no age/body limits, character generation is inert");
        return None;
    };

    let age = roll_inclusive(age_limits.min, age_limits.max, rng)?;
    let height = roll_inclusive(body.height_min, body.height_max, rng)?;
    let weight = roll_inclusive(body.weight_min, body.weight_max, rng)?;

    let bio = Bio {
        age,
        sex: if rng.gen_bool(0.5) { "Male" } else { "Female" }.to_string(),
        gender: config
            .genders
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| NOTHING.to_string()),
        height,
        weight,
    };

    let profession = match tables.professions.choose(rng) {
        Some(row) => Profession {
            id: row.id.clone(),
            name: row.name.clone(),
            experience: roll_experience(bio.age, rng),
            ability: row.ability.clone(),
        },
        None => Profession {
            id: String::new(),
            name: NOTHING.to_string(),
            experience: roll_experience(bio.age, rng),
            ability: String::new(),
        },
    };

    let health = HealthState::new(name_or_nothing(
        tables.health.choose(rng).map(|h| h.name.as_str()),
    ));
    let fear = name_or_nothing(tables.fears.choose(rng).map(|f| f.name.as_str()));
    let hobby = tables
        .hobbies
        .choose(rng)
        .cloned()
        .unwrap_or_else(placeholder_row);
    let baggage = Baggage {
        small: name_or_nothing(tables.items_small.choose(rng).map(|i| i.name.as_str())),
        big: name_or_nothing(tables.items_big.choose(rng).map(|i| i.name.as_str())),
    };
    let cards = draw_cards(&tables.cards, rng);
    let fact = name_or_nothing(tables.facts.choose(rng).map(|f| f.text.as_str()));

    Some(Character {
        bio,
        profession,
        health,
        fear,
        hobby,
        baggage,
        cards,
        fact,
    })
}

/// Years of experience for a character of the given age, in `[0, age - 16]`
pub fn roll_experience<R: Rng + ?Sized>(age: u32, rng: &mut R) -> u32 {
    let max = age.saturating_sub(crate::domain::entities::WORKING_AGE);
    rng.gen_range(0..=max)
}

/// Draw two cards, re-drawing the second a bounded number of times if it
/// matches the first. Duplicates are accepted once the attempts run out.
pub fn draw_cards<R: Rng + ?Sized>(cards: &[CardRow], rng: &mut R) -> [CardRow; 2] {
    let Some(first) = cards.choose(rng) else {
        return [CardRow::placeholder(), CardRow::placeholder()];
    };
    let mut second = cards.choose(rng).unwrap_or(first);

    let mut attempts = 0;
    while second.id == first.id && cards.len() > 1 && attempts < CARD_RESAMPLE_ATTEMPTS {
        second = cards.choose(rng).unwrap_or(first);
        attempts += 1;
    }

    [first.clone(), second.clone()]
}

fn roll_inclusive<R: Rng + ?Sized>(min: u32, max: u32, rng: &mut R) -> Option<u32> {
    if min > max {
        warn!("Pack config range {}..={} is empty", min, max);
        return None;
    }
    Some(rng.gen_range(min..=max))
}

fn name_or_nothing(name: Option<&str>) -> String {
    name.unwrap_or(NOTHING).to_string()
}

fn placeholder_row() -> ContentRow {
    ContentRow::from([("name".to_string(), NOTHING.to_string())])
}
