//! Scenario generation - the disaster and bunker a game is played in

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::entities::GameData;
use crate::domain::value_objects::{BunkerRow, ContentTables, DisasterRow, NOTHING};

/// Bunker seats for a given number of players: half of them, rounded up, plus one
pub fn places_for(player_count: usize) -> u32 {
    (player_count as u32).div_ceil(2) + 1
}

/// Values substituted into `{placeholder}` slots of scenario texts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVars {
    vars: Vec<(&'static str, u32)>,
}

impl TemplateVars {
    /// Draw one value per placeholder for a game with `places` seats
    pub fn roll<R: Rng + ?Sized>(places: u32, rng: &mut R) -> Self {
        Self {
            vars: vec![
                ("{places}", places),
                ("{alive}", rng.gen_range(1..=15)),
                ("{infected}", rng.gen_range(80..=99)),
                ("{years}", rng.gen_range(5..=50)),
                ("{months}", rng.gen_range(2..=24)),
                ("{days}", rng.gen_range(10..=100)),
                ("{rad}", rng.gen_range(50..=500)),
            ],
        }
    }

    pub fn get(&self, key: &str) -> Option<u32> {
        self.vars.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    /// Replace every known placeholder; unknown ones are left as written
    pub fn fill(&self, text: &str) -> String {
        self.vars
            .iter()
            .fold(text.to_string(), |acc, (key, value)| {
                if acc.contains(key) {
                    acc.replace(key, &value.to_string())
                } else {
                    acc
                }
            })
    }
}

/// Draw the disaster and bunker for a room of `player_count` players
pub fn generate_scenario<R: Rng + ?Sized>(
    tables: &ContentTables,
    player_count: usize,
    rng: &mut R,
) -> GameData {
    let places = places_for(player_count);
    let vars = TemplateVars::roll(places, rng);

    let mut disaster = tables
        .disasters
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| DisasterRow {
            name: NOTHING.to_string(),
            ..Default::default()
        });
    disaster.description = vars.fill(&disaster.description);
    disaster.residue = vars.fill(&disaster.residue);
    disaster.time = vars.fill(&disaster.time);

    let mut bunker = tables
        .bunkers
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| BunkerRow {
            name: NOTHING.to_string(),
            ..Default::default()
        });
    bunker.description = vars.fill(&bunker.description);
    bunker.supplies = vars.fill(&bunker.supplies);

    GameData {
        disaster,
        bunker,
        places,
        total_players: player_count as u32,
    }
}
