//! Effect engine - resolves who an effect lands on and mutates their characters
//!
//! Resolution happens in two steps:
//!
//! 1. **Targeting** turns a [`TargetKind`] into positions in `room.players`.
//! 2. **Mutation** looks up the `(EffectKind, AttributeKind)` pair in an
//!    [`EffectTable`] and applies the function found there to every target
//!    that has a character.
//!
//! Mutations are applied through the room's own player list, so whoever
//! broadcasts the room afterwards sees the changed state. Pairs missing from
//! the table are no-ops, but the target still counts as affected.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use tracing::{debug, instrument};

use crate::domain::entities::{Character, HealthState, Profession, Room, NO_FEAR};
use crate::domain::services::character_generator::roll_experience;
use crate::domain::value_objects::{
    AttributeKind, ContentTables, EffectDescriptor, EffectKind, PlayerId, TargetKind,
};

/// A mutation of one character, given the pack to draw replacements from
pub type Mutation = fn(&mut Character, &ContentTables, &mut dyn RngCore);

/// Summary prefix for an effect that reached at least one player
pub const APPLIED_TO: &str = "Applied to";
/// Summary for an effect that reached nobody
pub const NO_TARGETS: &str = "No targets";

/// Result of resolving one effect
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectOutcome {
    /// Names of affected players, in resolution order
    pub target_names: Vec<String>,
}

impl EffectOutcome {
    pub fn is_empty(&self) -> bool {
        self.target_names.is_empty()
    }

    /// Human-readable line for the room notification
    pub fn summary(&self) -> String {
        if self.is_empty() {
            NO_TARGETS.to_string()
        } else {
            format!("{}: {}", APPLIED_TO, self.target_names.join(", "))
        }
    }
}

/// Dispatch table from `(effect, attribute)` to the mutation it performs
#[derive(Clone)]
pub struct EffectTable {
    entries: HashMap<(EffectKind, AttributeKind), Mutation>,
}

impl std::fmt::Debug for EffectTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set()
            .entries(
                self.entries
                    .keys()
                    .map(|(effect, attribute)| format!("{}/{}", effect.as_str(), attribute.as_str())),
            )
            .finish()
    }
}

impl EffectTable {
    /// A table with no entries; every lookup is a no-op
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The effects the game ships with
    ///
    /// | effect | attribute    | mutation                                   |
    /// |--------|--------------|--------------------------------------------|
    /// | RANDOM | profession   | new profession row, experience re-rolled   |
    /// | RANDOM | health       | new health row, stage cleared              |
    /// | HEAL   | health       | "Perfectly healthy", stage cleared         |
    /// | HEAL   | fear         | "None"                                     |
    /// | *      | *            | nothing                                    |
    pub fn standard() -> Self {
        Self::empty()
            .with(EffectKind::Random, AttributeKind::Profession, reroll_profession)
            .with(EffectKind::Random, AttributeKind::Health, reroll_health)
            .with(EffectKind::Heal, AttributeKind::Health, heal_health)
            .with(EffectKind::Heal, AttributeKind::Fear, heal_fear)
    }

    pub fn with(mut self, effect: EffectKind, attribute: AttributeKind, mutation: Mutation) -> Self {
        self.register(effect, attribute, mutation);
        self
    }

    /// Add or replace the mutation for a pair
    pub fn register(&mut self, effect: EffectKind, attribute: AttributeKind, mutation: Mutation) {
        self.entries.insert((effect, attribute), mutation);
    }

    /// The mutation for a pair; [`no_op`] when the pair is unknown
    pub fn lookup(&self, effect: &EffectKind, attribute: &AttributeKind) -> Mutation {
        self.entries
            .get(&(effect.clone(), attribute.clone()))
            .copied()
            .unwrap_or(no_op)
    }

    pub fn handles(&self, effect: &EffectKind, attribute: &AttributeKind) -> bool {
        self.entries
            .contains_key(&(effect.clone(), attribute.clone()))
    }
}

impl Default for EffectTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Stateless service applying effect descriptors to rooms
#[derive(Debug, Clone, Default)]
pub struct EffectEngine {
    table: EffectTable,
}

impl EffectEngine {
    pub fn new() -> Self {
        Self::with_table(EffectTable::standard())
    }

    pub fn with_table(table: EffectTable) -> Self {
        Self { table }
    }

    /// Resolve `descriptor` against `room` on behalf of `actor` and mutate
    /// every targeted character in place.
    ///
    /// `explicit_target` is only consulted for [`TargetKind::SelectPlayer`].
    #[instrument(skip(self, room, tables, rng), fields(room = %room.code, effect = %descriptor.name))]
    pub fn resolve(
        &self,
        room: &mut Room,
        actor: PlayerId,
        descriptor: &EffectDescriptor,
        tables: &ContentTables,
        explicit_target: Option<PlayerId>,
        rng: &mut dyn RngCore,
    ) -> EffectOutcome {
        let targets = resolve_targets(room, actor, descriptor.target, explicit_target, rng);
        let mutation = self.table.lookup(&descriptor.effect, &descriptor.attribute);
        if !self.table.handles(&descriptor.effect, &descriptor.attribute) {
            debug!(
                "No mutation for {}/{}, targets are only recorded",
                descriptor.effect.as_str(),
                descriptor.attribute.as_str()
            );
        }

        let mut outcome = EffectOutcome::default();
        for index in targets {
            let player = &mut room.players[index];
            let Some(character) = player.character.as_mut() else {
                debug!("Skipping {}: no character yet", player.name);
                continue;
            };
            mutation(character, tables, rng);
            outcome.target_names.push(player.name.clone());
        }

        debug!(
            "{} {}/{} -> {}",
            descriptor.target.as_str(),
            descriptor.effect.as_str(),
            descriptor.attribute.as_str(),
            outcome.summary()
        );
        outcome
    }
}

/// Positions in `room.players` an effect with the given target kind reaches
pub fn resolve_targets<R: Rng + ?Sized>(
    room: &Room,
    actor: PlayerId,
    target: TargetKind,
    explicit_target: Option<PlayerId>,
    rng: &mut R,
) -> Vec<usize> {
    match target {
        TargetKind::All => (0..room.players.len()).collect(),
        // The explicit target is never consulted here, so a stale or forged
        // id cannot redirect a self effect.
        TargetKind::SelfOnly => room.position(actor).into_iter().collect(),
        TargetKind::SelectPlayer => explicit_target
            .and_then(|id| room.position(id))
            .or_else(|| random_position(room, rng))
            .into_iter()
            .collect(),
        TargetKind::RandomPlayer => random_position(room, rng).into_iter().collect(),
    }
}

fn random_position<R: Rng + ?Sized>(room: &Room, rng: &mut R) -> Option<usize> {
    if room.players.is_empty() {
        None
    } else {
        Some(rng.gen_range(0..room.players.len()))
    }
}

/// Default entry for pairs the table does not know
pub fn no_op(_: &mut Character, _: &ContentTables, _: &mut dyn RngCore) {}

fn reroll_profession(character: &mut Character, tables: &ContentTables, rng: &mut dyn RngCore) {
    let Some(row) = tables.professions.choose(rng) else {
        return;
    };
    character.profession = Profession {
        id: row.id.clone(),
        name: row.name.clone(),
        experience: roll_experience(character.bio.age, rng),
        ability: row.ability.clone(),
    };
}

fn reroll_health(character: &mut Character, tables: &ContentTables, rng: &mut dyn RngCore) {
    if let Some(row) = tables.health.choose(rng) {
        character.health = HealthState::new(row.name.clone());
    }
}

fn heal_health(character: &mut Character, _: &ContentTables, _: &mut dyn RngCore) {
    character.health = HealthState::healthy();
}

fn heal_fear(character: &mut Character, _: &ContentTables, _: &mut dyn RngCore) {
    character.fear = NO_FEAR.to_string();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Baggage, Bio, PERFECTLY_HEALTHY};
    use crate::domain::value_objects::{CardRow, ContentRow, HealthRow, ProfessionRow, RoomCode};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn character(age: u32) -> Character {
        Character {
            bio: Bio {
                age,
                sex: "Male".into(),
                gender: "Man".into(),
                height: 180,
                weight: 80,
            },
            profession: Profession {
                id: "origin".into(),
                name: "Origin".into(),
                experience: 0,
                ability: "None".into(),
            },
            health: HealthState::new("Flu"),
            fear: "Spiders".into(),
            hobby: ContentRow::new(),
            baggage: Baggage {
                small: "Knife".into(),
                big: "Tent".into(),
            },
            cards: [CardRow::placeholder(), CardRow::placeholder()],
            fact: "Was a spy".into(),
        }
    }

    fn profession(id: &str) -> ProfessionRow {
        ProfessionRow {
            id: id.into(),
            name: format!("Prof {}", id),
            ability: format!("Ability {}", id),
            target: String::new(),
            effect: String::new(),
            attribute: String::new(),
        }
    }

    fn tables() -> ContentTables {
        ContentTables {
            professions: vec![profession("p1"), profession("p2"), profession("p3")],
            health: vec![
                HealthRow {
                    id: "h1".into(),
                    name: "Diabetes".into(),
                },
                HealthRow {
                    id: "h2".into(),
                    name: "Insomnia".into(),
                },
            ],
            ..Default::default()
        }
    }

    /// Room with `n` players; the first `with_character` of them have characters
    fn room(n: usize, with_character: usize) -> Room {
        let mut room = Room::new(RoomCode::new("TEST"));
        for i in 0..n {
            room.add_player(PlayerId::new(), format!("P{}", i));
            if i < with_character {
                room.players[i].assign_character(Some(character(40)));
            }
        }
        room
    }

    fn descriptor(target: TargetKind, effect: EffectKind, attribute: AttributeKind) -> EffectDescriptor {
        EffectDescriptor {
            id: "test".into(),
            name: "Test".into(),
            target,
            effect,
            attribute,
        }
    }

    #[test]
    fn test_self_ignores_explicit_target() {
        let mut rng = StdRng::seed_from_u64(1);
        let room = room(3, 3);
        let actor = room.players[0].id;
        let other = room.players[2].id;

        for explicit in [None, Some(other), Some(PlayerId::new())] {
            let targets = resolve_targets(&room, actor, TargetKind::SelfOnly, explicit, &mut rng);
            assert_eq!(targets, vec![0]);
        }
    }

    #[test]
    fn test_self_with_unknown_actor_is_empty() {
        let mut rng = StdRng::seed_from_u64(2);
        let room = room(2, 2);
        let targets = resolve_targets(&room, PlayerId::new(), TargetKind::SelfOnly, None, &mut rng);
        assert!(targets.is_empty());
    }

    #[test]
    fn test_select_player_uses_valid_target() {
        let mut rng = StdRng::seed_from_u64(3);
        let room = room(4, 4);
        let actor = room.players[0].id;
        let chosen = room.players[3].id;

        for _ in 0..20 {
            let targets =
                resolve_targets(&room, actor, TargetKind::SelectPlayer, Some(chosen), &mut rng);
            assert_eq!(targets, vec![3]);
        }
    }

    #[test]
    fn test_select_player_falls_back_to_random() {
        let mut rng = StdRng::seed_from_u64(4);
        let room = room(3, 3);
        let actor = room.players[0].id;

        for explicit in [None, Some(PlayerId::new())] {
            let targets =
                resolve_targets(&room, actor, TargetKind::SelectPlayer, explicit, &mut rng);
            assert_eq!(targets.len(), 1);
            assert!(targets[0] < 3);
        }
    }

    #[test]
    fn test_empty_room_resolves_nothing() {
        let mut rng = StdRng::seed_from_u64(5);
        let empty = room(0, 0);
        let actor = PlayerId::new();
        for kind in [
            TargetKind::All,
            TargetKind::SelfOnly,
            TargetKind::SelectPlayer,
            TargetKind::RandomPlayer,
        ] {
            assert!(resolve_targets(&empty, actor, kind, Some(actor), &mut rng).is_empty());
        }
    }

    #[test]
    fn test_all_skips_players_without_character() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut room = room(5, 3);
        let actor = room.players[0].id;
        let engine = EffectEngine::new();

        let outcome = engine.resolve(
            &mut room,
            actor,
            &descriptor(TargetKind::All, EffectKind::Heal, AttributeKind::Health),
            &tables(),
            None,
            &mut rng,
        );

        assert_eq!(outcome.target_names, vec!["P0", "P1", "P2"]);
        assert!(room.players[4].character.is_none());
    }

    #[test]
    fn test_reroll_profession_for_everyone() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut room = room(4, 4);
        let actor = room.players[1].id;
        let tables = tables();

        let outcome = EffectEngine::new().resolve(
            &mut room,
            actor,
            &descriptor(TargetKind::All, EffectKind::Random, AttributeKind::Profession),
            &tables,
            None,
            &mut rng,
        );

        assert_eq!(outcome.target_names, vec!["P0", "P1", "P2", "P3"]);
        assert_eq!(outcome.summary(), "Applied to: P0, P1, P2, P3");
        for player in &room.players {
            let profession = &player.character.as_ref().unwrap().profession;
            assert_ne!(profession.id, "origin");
            let row = tables.profession(&profession.id).unwrap();
            assert_eq!(profession.name, row.name);
            assert_eq!(profession.ability, row.ability);
            // Generation-time link is untouched by the reroll
            assert_eq!(player.origin_profession_id.as_deref(), Some("origin"));
        }
    }

    #[test]
    fn test_reroll_profession_keeps_experience_bound() {
        let mut rng = StdRng::seed_from_u64(8);
        let tables = tables();
        for age in [10, 16, 17, 30, 90] {
            let mut c = character(age);
            for _ in 0..50 {
                reroll_profession(&mut c, &tables, &mut rng);
                assert!(c.profession.experience <= age.saturating_sub(16));
            }
        }
    }

    #[test]
    fn test_reroll_with_empty_tables_keeps_character() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut c = character(30);
        let before = c.clone();
        reroll_profession(&mut c, &ContentTables::default(), &mut rng);
        reroll_health(&mut c, &ContentTables::default(), &mut rng);
        assert_eq!(c, before);
    }

    #[test]
    fn test_reroll_health_clears_stage() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut c = character(30);
        c.health.stage = "Terminal".into();
        reroll_health(&mut c, &tables(), &mut rng);
        assert!(["Diabetes", "Insomnia"].contains(&c.health.name.as_str()));
        assert!(c.health.stage.is_empty());
    }

    #[test]
    fn test_heal_health_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut c = character(30);
        heal_health(&mut c, &tables(), &mut rng);
        let once = c.health.clone();
        heal_health(&mut c, &tables(), &mut rng);

        assert_eq!(c.health, once);
        assert_eq!(c.health.name, PERFECTLY_HEALTHY);
        assert!(c.health.stage.is_empty());
    }

    #[test]
    fn test_heal_fear() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut c = character(30);
        heal_fear(&mut c, &tables(), &mut rng);
        assert_eq!(c.fear, NO_FEAR);
    }

    #[test]
    fn test_unhandled_pair_still_records_target() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut room = room(2, 2);
        let actor = room.players[1].id;
        let before = room.players[1].character.clone();

        let outcome = EffectEngine::new().resolve(
            &mut room,
            actor,
            &descriptor(
                TargetKind::SelfOnly,
                EffectKind::Heal,
                AttributeKind::Other("hobby".into()),
            ),
            &tables(),
            None,
            &mut rng,
        );

        assert_eq!(outcome.target_names, vec!["P1"]);
        assert_eq!(room.players[1].character, before);
    }

    #[test]
    fn test_table_lookup_defaults_to_no_op() {
        let table = EffectTable::standard();
        assert!(table.handles(&EffectKind::Heal, &AttributeKind::Fear));
        assert!(!table.handles(&EffectKind::Random, &AttributeKind::Fear));
        assert!(!table.handles(&EffectKind::Other("SWAP".into()), &AttributeKind::Health));
    }

    #[test]
    fn test_registered_mutation_is_used() {
        fn brave(c: &mut Character, _: &ContentTables, _: &mut dyn RngCore) {
            c.fear = "Nothing scares me".into();
        }

        let mut rng = StdRng::seed_from_u64(14);
        let mut room = room(1, 1);
        let actor = room.players[0].id;
        let engine = EffectEngine::with_table(EffectTable::standard().with(
            EffectKind::Other("BRAVE".into()),
            AttributeKind::Fear,
            brave,
        ));

        engine.resolve(
            &mut room,
            actor,
            &descriptor(
                TargetKind::SelfOnly,
                EffectKind::Other("BRAVE".into()),
                AttributeKind::Fear,
            ),
            &tables(),
            None,
            &mut rng,
        );
        assert_eq!(room.players[0].character.as_ref().unwrap().fear, "Nothing scares me");
    }

    #[test]
    fn test_empty_outcome_summary() {
        assert_eq!(EffectOutcome::default().summary(), NO_TARGETS);
    }
}
