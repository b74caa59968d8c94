//! Data-driven round and campaign parameters
//!
//! Parameters are read through [`ConfigSource`], a section/key lookup that
//! hides the storage format. A campaign is a `DEFAULT` section holding
//! campaign-wide values plus consecutive `round0`, `round1`, ... sections.
//! Any lookup failure is a [`ConfigError`] and is fatal at startup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glam::IVec2;
use serde_json::{Map, Value};

use crate::sim::cube::Category;
use crate::sim::zones::{ScoreZones, Zone};

/// Section holding campaign-wide values
pub const DEFAULT_SECTION: &str = "DEFAULT";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing config section [{0}]")]
    MissingSection(String),
    #[error("missing key {key} in section [{section}]")]
    MissingKey { section: String, key: String },
    #[error("key {key} in section [{section}] is not a valid {expected}")]
    WrongType {
        section: String,
        key: String,
        expected: &'static str,
    },
    #[error("invalid value for {key} in section [{section}]: {reason}")]
    Invalid {
        section: String,
        key: String,
        reason: String,
    },
    #[error("campaign defines no rounds")]
    NoRounds,
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("config document must be an object of sections")]
    NotSections,
}

/// Section/key parameter lookup, independent of storage format
pub trait ConfigSource {
    fn has_section(&self, section: &str) -> bool;
    fn get_int(&self, section: &str, key: &str) -> Result<i64, ConfigError>;
    fn get_float(&self, section: &str, key: &str) -> Result<f64, ConfigError>;
    fn get_string(&self, section: &str, key: &str) -> Result<String, ConfigError>;
    fn get_bool(&self, section: &str, key: &str) -> Result<bool, ConfigError>;

    /// Like [`ConfigSource::get_bool`] but falls back to `default` when the key is absent
    fn get_bool_or(&self, section: &str, key: &str, default: bool) -> Result<bool, ConfigError> {
        match self.get_bool(section, key) {
            Err(ConfigError::MissingKey { .. }) => Ok(default),
            other => other,
        }
    }
}

/// JSON document of the form `{ "section": { "Key": value, ... }, ... }`
#[derive(Debug, Clone)]
pub struct JsonConfig {
    sections: Map<String, Value>,
}

impl JsonConfig {
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(sections) if sections.values().all(Value::is_object) => {
                Ok(Self { sections })
            }
            _ => Err(ConfigError::NotSections),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_value(value)
    }

    fn lookup(&self, section: &str, key: &str) -> Result<&Value, ConfigError> {
        let table = self
            .sections
            .get(section)
            .and_then(Value::as_object)
            .ok_or_else(|| ConfigError::MissingSection(section.to_string()))?;
        table.get(key).ok_or_else(|| ConfigError::MissingKey {
            section: section.to_string(),
            key: key.to_string(),
        })
    }
}

fn wrong_type(section: &str, key: &str, expected: &'static str) -> ConfigError {
    ConfigError::WrongType {
        section: section.to_string(),
        key: key.to_string(),
        expected,
    }
}

impl ConfigSource for JsonConfig {
    fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    fn get_int(&self, section: &str, key: &str) -> Result<i64, ConfigError> {
        self.lookup(section, key)?
            .as_i64()
            .ok_or_else(|| wrong_type(section, key, "integer"))
    }

    fn get_float(&self, section: &str, key: &str) -> Result<f64, ConfigError> {
        self.lookup(section, key)?
            .as_f64()
            .ok_or_else(|| wrong_type(section, key, "number"))
    }

    fn get_string(&self, section: &str, key: &str) -> Result<String, ConfigError> {
        self.lookup(section, key)?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| wrong_type(section, key, "string"))
    }

    fn get_bool(&self, section: &str, key: &str) -> Result<bool, ConfigError> {
        self.lookup(section, key)?
            .as_bool()
            .ok_or_else(|| wrong_type(section, key, "boolean"))
    }
}

/// In-memory source of raw string values, parsed on lookup
#[derive(Debug, Clone, Default)]
pub struct MapConfig {
    sections: HashMap<String, HashMap<String, String>>,
}

impl MapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, creating the section if needed
    pub fn set(&mut self, section: &str, key: &str, value: impl ToString) -> &mut Self {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        self
    }

    fn raw(&self, section: &str, key: &str) -> Result<&str, ConfigError> {
        let table = self
            .sections
            .get(section)
            .ok_or_else(|| ConfigError::MissingSection(section.to_string()))?;
        table
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::MissingKey {
                section: section.to_string(),
                key: key.to_string(),
            })
    }
}

impl ConfigSource for MapConfig {
    fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    fn get_int(&self, section: &str, key: &str) -> Result<i64, ConfigError> {
        self.raw(section, key)?
            .trim()
            .parse()
            .map_err(|_| wrong_type(section, key, "integer"))
    }

    fn get_float(&self, section: &str, key: &str) -> Result<f64, ConfigError> {
        self.raw(section, key)?
            .trim()
            .parse()
            .map_err(|_| wrong_type(section, key, "number"))
    }

    fn get_string(&self, section: &str, key: &str) -> Result<String, ConfigError> {
        self.raw(section, key).map(str::to_string)
    }

    fn get_bool(&self, section: &str, key: &str) -> Result<bool, ConfigError> {
        match self.raw(section, key)?.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(wrong_type(section, key, "boolean")),
        }
    }
}

/// Maximum concurrent adversaries per category, indexed by [`Category::index`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategoryMaxes(pub [u32; 6]);

impl CategoryMaxes {
    pub fn get(&self, category: Category) -> u32 {
        category.index().map(|i| self.0[i]).unwrap_or(0)
    }
}

/// Immutable parameters of one round
#[derive(Debug, Clone, PartialEq)]
pub struct RoundConfig {
    pub name: String,
    /// Player speed in pixels per tick
    pub player_speed: i32,
    /// Adversary speed at speed level 0
    pub base_speed: i32,
    /// Seconds between speed level increments
    pub seconds_per_level: f32,
    /// Speed level at which the round is cleared
    pub max_speed_levels: u32,
    /// Seconds between spawn attempts
    pub spawn_rate: f32,
    pub maxes: CategoryMaxes,
    /// Wrap adversaries that leave the screen instead of deleting them
    pub keep_on_screen: bool,
    pub score_zones: Option<ScoreZones>,
}

/// Config keys for per-category maxima, in [`Category::ADVERSARIES`] order
const MAX_KEYS: [&str; 6] = [
    "MaxHoriLCubes",
    "MaxHoriRCubes",
    "MaxVertiTCubes",
    "MaxVertiBCubes",
    "MaxDiaCubes",
    "MaxRockCubes",
];

fn get_non_negative(source: &dyn ConfigSource, section: &str, key: &str) -> Result<u32, ConfigError> {
    let value = source.get_int(section, key)?;
    u32::try_from(value).map_err(|_| ConfigError::Invalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: format!("{value} is not a non-negative 32-bit integer"),
    })
}

fn get_speed(source: &dyn ConfigSource, section: &str, key: &str) -> Result<i32, ConfigError> {
    get_non_negative(source, section, key).and_then(|v| {
        i32::try_from(v).map_err(|_| ConfigError::Invalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{v} is too large"),
        })
    })
}

fn get_seconds(source: &dyn ConfigSource, section: &str, key: &str) -> Result<f32, ConfigError> {
    let value = source.get_float(section, key)?;
    if value.is_finite() && value > 0.0 {
        Ok(value as f32)
    } else {
        Err(ConfigError::Invalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{value} is not a positive duration"),
        })
    }
}

fn load_zone(source: &dyn ConfigSource, section: &str, letter: char) -> Result<Zone, ConfigError> {
    let w = get_speed(source, section, &format!("Zone{letter}Width"))?;
    let h = get_speed(source, section, &format!("Zone{letter}Height"))?;
    let points = get_non_negative(source, section, &format!("Zone{letter}Points"))?;
    Ok(Zone {
        size: IVec2::new(w, h),
        points: points as u64,
    })
}

fn load_zones(source: &dyn ConfigSource, section: &str) -> Result<Option<ScoreZones>, ConfigError> {
    // Zones are present only when the innermost zone is configured.
    match source.get_int(section, "ZoneAWidth") {
        Err(ConfigError::MissingKey { .. }) => return Ok(None),
        Err(e) => return Err(e),
        Ok(_) => {}
    }
    let zones = ScoreZones {
        a: load_zone(source, section, 'A')?,
        b: load_zone(source, section, 'B')?,
        c: load_zone(source, section, 'C')?,
    };
    if !zones.is_nested() {
        return Err(ConfigError::Invalid {
            section: section.to_string(),
            key: "ZoneA/B/C".to_string(),
            reason: "score zones must be nested A inside B inside C".to_string(),
        });
    }
    Ok(Some(zones))
}

impl RoundConfig {
    /// Load the round stored in `section`
    pub fn load(source: &dyn ConfigSource, section: &str) -> Result<Self, ConfigError> {
        if !source.has_section(section) {
            return Err(ConfigError::MissingSection(section.to_string()));
        }

        let mut maxes = [0u32; 6];
        for (slot, key) in maxes.iter_mut().zip(MAX_KEYS) {
            *slot = get_non_negative(source, section, key)?;
        }

        Ok(Self {
            name: source.get_string(section, "Name")?,
            player_speed: get_speed(source, section, "GoodCubeSpeed")?,
            base_speed: get_speed(source, section, "StartSpeed")?,
            seconds_per_level: get_seconds(source, section, "SecondsPerLevel")?,
            max_speed_levels: get_non_negative(source, section, "SpeedLevelsPerRound")?,
            spawn_rate: get_seconds(source, section, "SpawnRate")?,
            maxes: CategoryMaxes(maxes),
            keep_on_screen: source.get_bool_or(section, "KeepOnScreen", true)?,
            score_zones: load_zones(source, section)?,
        })
    }
}

/// Section name of round `index`
pub fn round_section(index: usize) -> String {
    format!("round{index}")
}

/// An ordered sequence of rounds with its own high score list
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignConfig {
    pub name: String,
    /// Used to name the high score file
    pub short_name: String,
    pub lives: u32,
    pub rounds: Vec<RoundConfig>,
}

impl CampaignConfig {
    /// Load `DEFAULT` plus every consecutive `roundN` section
    pub fn load(source: &dyn ConfigSource) -> Result<Self, ConfigError> {
        let name = source.get_string(DEFAULT_SECTION, "Name")?;
        let short_name = source.get_string(DEFAULT_SECTION, "ShortName")?;
        let lives = get_non_negative(source, DEFAULT_SECTION, "NumberOfLives")?;
        if lives == 0 {
            return Err(ConfigError::Invalid {
                section: DEFAULT_SECTION.to_string(),
                key: "NumberOfLives".to_string(),
                reason: "a campaign needs at least one life".to_string(),
            });
        }

        let mut rounds = Vec::new();
        while source.has_section(&round_section(rounds.len())) {
            let round = RoundConfig::load(source, &round_section(rounds.len()))?;
            log::debug!("Loaded round {}: {}", rounds.len(), round.name);
            rounds.push(round);
        }
        if rounds.is_empty() {
            return Err(ConfigError::NoRounds);
        }

        log::info!("Loaded campaign '{}' with {} rounds", name, rounds.len());
        Ok(Self {
            name,
            short_name,
            lives,
            rounds,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::load(&JsonConfig::from_file(path)?)
    }

    pub fn round(&self, index: usize) -> Option<&RoundConfig> {
        self.rounds.get(index)
    }

    /// Find a round by its configured name
    pub fn round_by_name(&self, name: &str) -> Option<(usize, &RoundConfig)> {
        self.rounds.iter().enumerate().find(|(_, r)| r.name == name)
    }

    pub fn last_round_index(&self) -> usize {
        self.rounds.len().saturating_sub(1)
    }

    /// The campaign used when no campaign file is supplied
    pub fn builtin() -> Self {
        let round = |name: &str, player, base, levels, spawn: f32, maxes: [u32; 6]| RoundConfig {
            name: name.to_string(),
            player_speed: player,
            base_speed: base,
            seconds_per_level: 10.0,
            max_speed_levels: levels,
            spawn_rate: spawn,
            maxes: CategoryMaxes(maxes),
            keep_on_screen: true,
            score_zones: Some(ScoreZones {
                a: Zone { size: IVec2::new(120, 80), points: 3 },
                b: Zone { size: IVec2::new(320, 200), points: 2 },
                c: Zone { size: IVec2::new(520, 320), points: 1 },
            }),
        };
        Self {
            name: "InfiniCube".to_string(),
            short_name: "infinicube".to_string(),
            lives: 3,
            rounds: vec![
                round("Warm Up", 4, 1, 3, 1.5, [2, 2, 0, 0, 0, 0]),
                round("Crossfire", 4, 1, 4, 1.2, [2, 2, 2, 2, 0, 0]),
                round("Rockslide", 5, 2, 4, 1.0, [2, 2, 2, 2, 0, 4]),
                round("Slants", 5, 2, 5, 1.0, [2, 2, 2, 2, 3, 2]),
                round("Infinity", 6, 3, 6, 0.8, [3, 3, 3, 3, 4, 4]),
            ],
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    /// A small campaign in the on-disk JSON layout
    pub(crate) fn sample_json() -> Value {
        json!({
            "DEFAULT": { "Name": "Test Campaign", "ShortName": "test", "NumberOfLives": 3 },
            "round0": {
                "Name": "Opening", "GoodCubeSpeed": 8, "StartSpeed": 2,
                "SpeedLevelsPerRound": 3, "SecondsPerLevel": 5.0, "SpawnRate": 1.0,
                "MaxHoriLCubes": 1, "MaxHoriRCubes": 1, "MaxVertiTCubes": 1,
                "MaxVertiBCubes": 1, "MaxDiaCubes": 0, "MaxRockCubes": 2
            },
            "round1": {
                "Name": "Second", "GoodCubeSpeed": 8, "StartSpeed": 3,
                "SpeedLevelsPerRound": 4, "SecondsPerLevel": 4.5, "SpawnRate": 0.5,
                "MaxHoriLCubes": 2, "MaxHoriRCubes": 2, "MaxVertiTCubes": 2,
                "MaxVertiBCubes": 2, "MaxDiaCubes": 2, "MaxRockCubes": 2,
                "KeepOnScreen": false,
                "ZoneAWidth": 50, "ZoneAHeight": 50, "ZoneAPoints": 10,
                "ZoneBWidth": 150, "ZoneBHeight": 100, "ZoneBPoints": 4,
                "ZoneCWidth": 300, "ZoneCHeight": 200, "ZoneCPoints": 1
            }
        })
    }

    #[test]
    fn test_load_campaign_from_json() {
        let source = JsonConfig::from_value(sample_json()).unwrap();
        let campaign = CampaignConfig::load(&source).unwrap();
        assert_eq!(campaign.name, "Test Campaign");
        assert_eq!(campaign.short_name, "test");
        assert_eq!(campaign.lives, 3);
        assert_eq!(campaign.rounds.len(), 2);

        let r0 = &campaign.rounds[0];
        assert_eq!(r0.name, "Opening");
        assert_eq!(r0.player_speed, 8);
        assert_eq!(r0.maxes.get(Category::Rock), 2);
        assert_eq!(r0.maxes.get(Category::Diagonal), 0);
        assert!(r0.keep_on_screen);
        assert!(r0.score_zones.is_none());

        let r1 = &campaign.rounds[1];
        assert!(!r1.keep_on_screen);
        let zones = r1.score_zones.unwrap();
        assert_eq!(zones.a.points, 10);
        assert_eq!(zones.c.size, IVec2::new(300, 200));
    }

    #[test]
    fn test_round_lookup_by_name() {
        let source = JsonConfig::from_value(sample_json()).unwrap();
        let campaign = CampaignConfig::load(&source).unwrap();
        let (index, round) = campaign.round_by_name("Second").unwrap();
        assert_eq!(index, 1);
        assert_eq!(round.base_speed, 3);
        assert!(campaign.round_by_name("Nope").is_none());

        let direct = RoundConfig::load(&source, "round1").unwrap();
        assert_eq!(&direct, round);
    }

    #[test]
    fn test_missing_key_is_reported() {
        let mut value = sample_json();
        value["round1"].as_object_mut().unwrap().remove("SpawnRate");
        let source = JsonConfig::from_value(value).unwrap();
        let err = CampaignConfig::load(&source).unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingKey { ref section, ref key } if section == "round1" && key == "SpawnRate"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_wrong_type_is_reported() {
        let mut value = sample_json();
        value["round0"]["StartSpeed"] = json!("fast");
        let source = JsonConfig::from_value(value).unwrap();
        assert!(matches!(
            CampaignConfig::load(&source),
            Err(ConfigError::WrongType { expected: "integer", .. })
        ));
    }

    #[test]
    fn test_negative_and_zero_values_rejected() {
        let mut value = sample_json();
        value["round0"]["MaxRockCubes"] = json!(-1);
        let source = JsonConfig::from_value(value).unwrap();
        assert!(matches!(CampaignConfig::load(&source), Err(ConfigError::Invalid { .. })));

        let mut value = sample_json();
        value["round0"]["SpawnRate"] = json!(0.0);
        let source = JsonConfig::from_value(value).unwrap();
        assert!(matches!(CampaignConfig::load(&source), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_campaign_without_rounds() {
        let value = json!({ "DEFAULT": { "Name": "Empty", "ShortName": "e", "NumberOfLives": 1 } });
        let source = JsonConfig::from_value(value).unwrap();
        assert!(matches!(CampaignConfig::load(&source), Err(ConfigError::NoRounds)));
    }

    #[test]
    fn test_document_must_be_sections() {
        assert!(matches!(
            JsonConfig::from_value(json!([1, 2, 3])),
            Err(ConfigError::NotSections)
        ));
        assert!(matches!(
            JsonConfig::from_value(json!({ "DEFAULT": 4 })),
            Err(ConfigError::NotSections)
        ));
    }

    #[test]
    fn test_unnested_zones_rejected() {
        let mut value = sample_json();
        value["round1"]["ZoneAWidth"] = json!(500);
        let source = JsonConfig::from_value(value).unwrap();
        assert!(matches!(CampaignConfig::load(&source), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_map_config_parses_strings() {
        let mut source = MapConfig::new();
        source
            .set(DEFAULT_SECTION, "Name", "Map")
            .set(DEFAULT_SECTION, "ShortName", "map")
            .set(DEFAULT_SECTION, "NumberOfLives", 2)
            .set("round0", "Name", "Only")
            .set("round0", "GoodCubeSpeed", 6)
            .set("round0", "StartSpeed", 1)
            .set("round0", "SpeedLevelsPerRound", 2)
            .set("round0", "SecondsPerLevel", "2.5")
            .set("round0", "SpawnRate", "0.75")
            .set("round0", "KeepOnScreen", "no");
        for key in MAX_KEYS {
            source.set("round0", key, 1);
        }
        let campaign = CampaignConfig::load(&source).unwrap();
        assert_eq!(campaign.lives, 2);
        assert_eq!(campaign.rounds[0].seconds_per_level, 2.5);
        assert!(!campaign.rounds[0].keep_on_screen);
    }

    #[test]
    fn test_builtin_campaign_is_well_formed() {
        let campaign = CampaignConfig::builtin();
        assert!(campaign.lives > 0);
        assert!(!campaign.rounds.is_empty());
        for round in &campaign.rounds {
            assert!(round.score_zones.map(|z| z.is_nested()).unwrap_or(true));
            assert!(round.spawn_rate > 0.0 && round.seconds_per_level > 0.0);
        }
    }

    #[test]
    fn test_campaign_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(CampaignConfig::from_file(&missing), Err(ConfigError::Io { .. })));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(CampaignConfig::from_file(&broken), Err(ConfigError::Parse { .. })));

        let good = dir.path().join("good.json");
        std::fs::write(&good, sample_json().to_string()).unwrap();
        assert_eq!(CampaignConfig::from_file(&good).unwrap().rounds.len(), 2);
    }
}
