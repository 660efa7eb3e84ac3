//! File-based content packs
//!
//! A pack is a directory of `;`-delimited tables plus a `config.json`:
//!
//! ```text
//! data/packs/classic/
//!   config.json  professions.csv  health.csv  fears.csv  hobbies.csv
//!   items.csv    facts.csv        disasters.csv  bunkers.csv  cards.csv
//! ```
//!
//! Nothing in here fails loudly. A file that is missing or unreadable becomes
//! an empty table and a log line; the game copes with empty tables.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::application::ports::outbound::ContentPackPort;
use crate::domain::value_objects::{
    BunkerRow, CardRow, ContentRow, ContentTables, DisasterRow, FactRow, FearRow, HealthRow,
    ItemRow, ItemSize, PackConfig, ProfessionRow,
};

const DELIMITER: char = ';';

/// Errors reading a single pack file
#[derive(Debug, thiserror::Error)]
pub enum ContentLoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse pack config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: config::ConfigError,
    },
}

impl ContentLoadError {
    fn is_missing_file(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Parse delimited text into rows keyed by the header line.
///
/// Blank lines are ignored. Fewer than two remaining lines (header included)
/// is an empty table. Missing trailing values read as `""`.
pub fn parse_delimited(text: &str) -> Vec<ContentRow> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

    let Some(header) = lines.next() else {
        return Vec::new();
    };
    let headers: Vec<&str> = header
        .trim_start_matches('\u{feff}')
        .split(DELIMITER)
        .map(str::trim)
        .collect();

    lines
        .map(|line| {
            let values: Vec<&str> = line.split(DELIMITER).collect();
            headers
                .iter()
                .enumerate()
                .map(|(i, h)| {
                    let value = values.get(i).map(|v| v.trim()).unwrap_or_default();
                    (h.to_string(), value.to_string())
                })
                .collect()
        })
        .collect()
}

/// Read and parse one delimited table
pub fn read_table(path: &Path) -> Result<Vec<ContentRow>, ContentLoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| ContentLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_delimited(&text))
}

/// Read a pack's `config.json`
pub fn read_pack_config(path: &Path) -> Result<PackConfig, ContentLoadError> {
    let to_error = |source| ContentLoadError::Config {
        path: path.to_path_buf(),
        source,
    };
    config::Config::builder()
        .add_source(config::File::from(path).format(config::FileFormat::Json))
        .build()
        .map_err(to_error)?
        .try_deserialize::<PackConfig>()
        .map_err(to_error)
}

/// Read a table, turning any failure into an empty table
fn load_table(dir: &Path, file: &str) -> Vec<ContentRow> {
    match read_table(&dir.join(file)) {
        Ok(rows) => rows,
        Err(e) if e.is_missing_file() => {
            debug!("Optional table {} not present", file);
            Vec::new()
        }
        Err(e) => {
            warn!("{}", e);
            Vec::new()
        }
    }
}

/// Keep the first row for every id
fn unique_by_id<T>(rows: Vec<T>, id: impl Fn(&T) -> &str, table: &str) -> Vec<T> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| {
            let fresh = seen.insert(id(row).to_string());
            if !fresh {
                warn!("Duplicate id {:?} in {}, keeping the first row", id(row), table);
            }
            fresh
        })
        .collect()
}

/// Build typed rows, dropping the ones without an id
fn with_ids<T>(rows: &[ContentRow], convert: fn(&ContentRow) -> Option<T>, table: &str) -> Vec<T> {
    let typed: Vec<T> = rows.iter().filter_map(convert).collect();
    if typed.len() < rows.len() {
        warn!("Dropped {} rows without id from {}", rows.len() - typed.len(), table);
    }
    typed
}

/// Load every table of the pack at `dir`
pub fn load_pack_dir(dir: &Path) -> ContentTables {
    if !dir.is_dir() {
        error!("Content pack not found: {}", dir.display());
        return ContentTables::default();
    }

    let config = read_pack_config(&dir.join("config.json")).unwrap_or_else(|e| {
        warn!("{}; characters cannot be generated", e);
        PackConfig::default()
    });

    let professions = with_ids(
        &load_table(dir, "professions.csv"),
        ProfessionRow::from_row,
        "professions",
    );
    let cards = with_ids(&load_table(dir, "cards.csv"), CardRow::from_row, "cards");

    let items: Vec<ItemRow> = load_table(dir, "items.csv")
        .iter()
        .filter_map(ItemRow::from_row)
        .collect();
    let (items_small, items_big): (Vec<ItemRow>, Vec<ItemRow>) =
        items.into_iter().partition(|i| i.size == ItemSize::Small);

    let tables = ContentTables {
        professions: unique_by_id(professions, |p| p.id.as_str(), "professions"),
        health: load_table(dir, "health.csv").iter().map(HealthRow::from_row).collect(),
        fears: load_table(dir, "fears.csv").iter().map(FearRow::from_row).collect(),
        hobbies: load_table(dir, "hobbies.csv"),
        items_small,
        items_big,
        facts: load_table(dir, "facts.csv").iter().map(FactRow::from_row).collect(),
        disasters: load_table(dir, "disasters.csv")
            .iter()
            .map(DisasterRow::from_row)
            .collect(),
        bunkers: load_table(dir, "bunkers.csv")
            .iter()
            .map(BunkerRow::from_row)
            .collect(),
        cards: unique_by_id(cards, |c| c.id.as_str(), "cards"),
        config,
    };

    info!(
        "Pack loaded from {}: {} professions, {} cards, {} disasters, {} bunkers",
        dir.display(),
        tables.professions.len(),
        tables.cards.len(),
        tables.disasters.len(),
        tables.bunkers.len()
    );
    tables
}

/// Content packs stored as directories under one root
#[derive(Debug, Clone)]
pub struct FilePackRepository {
    packs_dir: PathBuf,
}

impl FilePackRepository {
    pub fn new(packs_dir: impl Into<PathBuf>) -> Self {
        Self {
            packs_dir: packs_dir.into(),
        }
    }
}

impl ContentPackPort for FilePackRepository {
    fn load_pack(&self, pack_name: &str) -> ContentTables {
        load_pack_dir(&self.packs_dir.join(pack_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_trims_and_pads() {
        let rows = parse_delimited("id; name ;ability\n 1 ; Doctor \n2;Cook\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], "Doctor");
        assert_eq!(rows[0]["id"], "1");
        assert_eq!(rows[1]["ability"], "");
    }

    #[test]
    fn test_parse_short_input_is_empty() {
        assert!(parse_delimited("").is_empty());
        assert!(parse_delimited("id;name\n").is_empty());
        assert!(parse_delimited("\n\n  \nid;name\n\n").is_empty());
    }

    #[test]
    fn test_parse_handles_crlf_and_bom() {
        let rows = parse_delimited("\u{feff}id;name\r\n1;Flood\r\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "1");
        assert_eq!(rows[0]["name"], "Flood");
    }

    #[test]
    fn test_missing_pack_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let tables = FilePackRepository::new(dir.path()).load_pack("nope");
        assert!(tables.professions.is_empty());
        assert!(tables.config.age_limits.is_none());
    }

    #[test]
    fn test_load_pack_dir() {
        let dir = tempfile::tempdir().unwrap();
        let pack = dir.path().join("classic");
        fs::create_dir(&pack).unwrap();
        fs::write(
            pack.join("config.json"),
            r#"{"age_limits": {"min": 18, "max": 90},
                "body_limits": {"height_min": 150, "height_max": 200, "weight_min": 40, "weight_max": 130},
                "genders": ["Woman", "Man"]}"#,
        )
        .unwrap();
        fs::write(
            pack.join("professions.csv"),
            "id;name;ability;target;effect;attribute\n\
             doctor;Doctor;Heal yourself;SELF;HEAL;health\n\
             ;Nameless;;;;\n\
             doctor;Second doctor;;;;\n\
             cook;Cook;Feeds people;;;\n",
        )
        .unwrap();
        fs::write(
            pack.join("items.csv"),
            "id;name;type\n1;Knife;small\n2;Boat;big\n3;Ghost;medium\n",
        )
        .unwrap();
        fs::write(pack.join("fears.csv"), "id;name\n").unwrap();

        let tables = FilePackRepository::new(dir.path()).load_pack("classic");

        assert_eq!(tables.config.genders.len(), 2);
        assert_eq!(tables.config.age_limits.unwrap().max, 90);
        assert_eq!(tables.config.body_limits.unwrap().weight_min, 40);

        assert_eq!(tables.professions.len(), 2);
        assert_eq!(tables.profession("doctor").unwrap().name, "Doctor");
        assert!(tables.profession("doctor").unwrap().descriptor().is_ok());
        assert!(tables.profession("cook").unwrap().descriptor().is_err());

        assert_eq!(tables.items_small.len(), 1);
        assert_eq!(tables.items_big.len(), 1);
        assert_eq!(tables.items_big[0].name, "Boat");

        assert!(tables.fears.is_empty());
        assert!(tables.cards.is_empty());
    }

    #[test]
    fn test_malformed_config_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.json"), "{ not json").unwrap();
        let tables = load_pack_dir(dir.path());
        assert_eq!(tables.config, PackConfig::default());
    }
}
