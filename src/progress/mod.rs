//! Completion tracking of per-console game databases.
//!
//! A data directory holds `dead_consoles.json` (the reference list of
//! discontinued consoles and their official library sizes) and one
//! `<console>_games.json` database per console being catalogued.

pub mod report;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::GameDatabase;
use crate::error::Result;

pub use report::{progress_bar, render_report};

/// Reference list file name
pub const DEAD_CONSOLES_FILE: &str = "dead_consoles.json";

/// Suffix of per-console database files
pub const DATABASE_SUFFIX: &str = "_games.json";

/// A discontinued console from the reference list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleInfo {
    pub console: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub generation: u32,
    #[serde(default)]
    pub release_year: i32,
    #[serde(default)]
    pub discontinuation_year: i32,
    #[serde(default)]
    pub total_official_games: u64,
}

#[derive(Debug, Default, Deserialize)]
struct DeadConsoles {
    #[serde(default)]
    consoles: Vec<ConsoleInfo>,
}

/// A `<console>_games.json` file found in the data directory
#[derive(Debug, Clone)]
pub struct ConsoleDatabase {
    /// Console name derived from the file name
    pub name: String,
    pub filename: String,
    pub game_count: usize,
    pub last_updated: String,
    pub data: GameDatabase,
}

impl ConsoleDatabase {
    pub fn new(name: impl Into<String>, filename: impl Into<String>, data: GameDatabase) -> Self {
        Self {
            name: name.into(),
            filename: filename.into(),
            game_count: data.games.len(),
            last_updated: data.last_updated.clone().unwrap_or_else(|| "Unknown".to_string()),
            data,
        }
    }
}

/// Completion tier of a console database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    Complete,
    NearlyDone,
    InProgress,
    Started,
    Minimal,
    NotStarted,
}

impl ProgressStatus {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 100.0 {
            ProgressStatus::Complete
        } else if percentage >= 75.0 {
            ProgressStatus::NearlyDone
        } else if percentage >= 50.0 {
            ProgressStatus::InProgress
        } else if percentage >= 25.0 {
            ProgressStatus::Started
        } else if percentage > 0.0 {
            ProgressStatus::Minimal
        } else {
            ProgressStatus::NotStarted
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProgressStatus::Complete => "✅ Complete",
            ProgressStatus::NearlyDone => "🟢 Nearly Done",
            ProgressStatus::InProgress => "🟡 In Progress",
            ProgressStatus::Started => "🟠 Started",
            ProgressStatus::Minimal => "🔴 Minimal",
            ProgressStatus::NotStarted => "⚫ Not Started",
        }
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Progress of one console database against the reference list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsoleProgress {
    pub console: String,
    pub manufacturer: String,
    pub generation: u32,
    pub release_year: i32,
    pub discontinuation_year: i32,
    pub total_official_games: u64,
    pub current_games: u64,
    pub percentage_complete: f64,
    pub filename: String,
    pub last_updated: String,
    pub status: ProgressStatus,
}

/// Totals across all matched databases
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub total_consoles: usize,
    pub databases_created: usize,
    /// Matched databases as a share of reference consoles, one decimal
    pub coverage_percent: f64,
    pub games_current: u64,
    pub games_target: u64,
    pub overall_percent: f64,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// `snes_games.json` → `Snes`, `neo_geo_cd_games.json` → `Neo Geo Cd`
pub fn console_name_from_filename(filename: &str) -> Option<String> {
    let stem = filename.strip_suffix(DATABASE_SUFFIX)?;
    let words: Vec<String> = stem
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
                None => String::new(),
            }
        })
        .collect();
    Some(words.join(" "))
}

/// Reads a data directory and computes completion figures
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    consoles: Vec<ConsoleInfo>,
    databases: BTreeMap<String, ConsoleDatabase>,
}

impl ProgressTracker {
    /// Load the reference list and every console database under `dir`.
    ///
    /// A missing reference list yields an empty console list; database files
    /// that do not parse are skipped with a warning.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let consoles = Self::load_dead_consoles(dir)?;
        let databases = Self::find_console_databases(dir)?;

        tracing::info!(
            "📊 Loaded {} reference consoles and {} databases from {}",
            consoles.len(),
            databases.len(),
            dir.display()
        );

        Ok(Self::from_parts(consoles, databases.into_values()))
    }

    pub fn from_parts(consoles: Vec<ConsoleInfo>, databases: impl IntoIterator<Item = ConsoleDatabase>) -> Self {
        Self {
            consoles,
            databases: databases.into_iter().map(|db| (db.name.clone(), db)).collect(),
        }
    }

    fn load_dead_consoles(dir: &Path) -> Result<Vec<ConsoleInfo>> {
        let path = dir.join(DEAD_CONSOLES_FILE);
        match std::fs::read_to_string(&path) {
            Ok(json) => {
                let parsed: DeadConsoles = serde_json::from_str(&json)?;
                Ok(parsed.consoles)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("❌ {} not found!", path.display());
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn find_console_databases(dir: &Path) -> Result<BTreeMap<String, ConsoleDatabase>> {
        let mut databases = BTreeMap::new();

        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let filename = entry.file_name().to_string_lossy().into_owned();
            if filename == DEAD_CONSOLES_FILE {
                continue;
            }
            let Some(name) = console_name_from_filename(&filename) else {
                continue;
            };

            match Self::read_database(&entry.path()) {
                Ok(Some(data)) => {
                    databases.insert(name.clone(), ConsoleDatabase::new(name, filename, data));
                }
                Ok(None) => tracing::debug!("Skipping {}: no games list", filename),
                Err(e) => tracing::warn!("⚠️  Error reading {}: {}", filename, e),
            }
        }

        Ok(databases)
    }

    /// `Ok(None)` when the file is JSON but has no `games` key
    fn read_database(path: &Path) -> Result<Option<GameDatabase>> {
        let json = std::fs::read_to_string(path)?;
        let value: serde_json::Value = serde_json::from_str(&json)?;
        if value.get("games").is_none() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value)?))
    }

    pub fn consoles(&self) -> &[ConsoleInfo] {
        &self.consoles
    }

    /// Databases by derived console name
    pub fn databases(&self) -> &BTreeMap<String, ConsoleDatabase> {
        &self.databases
    }

    /// First reference console whose name contains `name` (case-insensitive)
    pub fn console_info(&self, name: &str) -> Option<&ConsoleInfo> {
        let name = name.to_lowercase();
        self.consoles
            .iter()
            .find(|c| c.console.to_lowercase().contains(&name))
    }

    /// Progress of every database that matches a reference console, best first
    pub fn calculate_progress(&self) -> Vec<ConsoleProgress> {
        let mut progress: Vec<ConsoleProgress> = self
            .databases
            .values()
            .filter_map(|db| {
                let info = self.console_info(&db.name)?;
                let total = info.total_official_games;
                let current = db.game_count as u64;
                let percentage = if total > 0 {
                    current as f64 / total as f64 * 100.0
                } else {
                    0.0
                };

                Some(ConsoleProgress {
                    console: info.console.clone(),
                    manufacturer: info.manufacturer.clone(),
                    generation: info.generation,
                    release_year: info.release_year,
                    discontinuation_year: info.discontinuation_year,
                    total_official_games: total,
                    current_games: current,
                    percentage_complete: round_to(percentage, 2),
                    filename: db.filename.clone(),
                    last_updated: db.last_updated.clone(),
                    status: ProgressStatus::from_percentage(percentage),
                })
            })
            .collect();

        progress.sort_by(|a, b| {
            b.percentage_complete
                .partial_cmp(&a.percentage_complete)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        progress
    }

    pub fn summary(&self) -> ProgressSummary {
        let progress = self.calculate_progress();
        let total_consoles = self.consoles.len();
        let databases_created = progress.len();

        let coverage_percent = if total_consoles > 0 {
            round_to(databases_created as f64 / total_consoles as f64 * 100.0, 1)
        } else {
            0.0
        };

        let games_target: u64 = progress.iter().map(|p| p.total_official_games).sum();
        let games_current: u64 = progress.iter().map(|p| p.current_games).sum();
        let overall_percent = if games_target > 0 {
            games_current as f64 / games_target as f64 * 100.0
        } else {
            0.0
        };

        ProgressSummary {
            total_consoles,
            databases_created,
            coverage_percent,
            games_current,
            games_target,
            overall_percent,
        }
    }

    /// Reference consoles without a matching database, largest library first
    pub fn missing_consoles(&self) -> Vec<&ConsoleInfo> {
        // A database covers every console whose name contains its own
        let names: Vec<String> = self.databases.keys().map(|name| name.to_lowercase()).collect();

        let mut missing: Vec<&ConsoleInfo> = self
            .consoles
            .iter()
            .filter(|c| {
                let console = c.console.to_lowercase();
                !names.iter().any(|name| console.contains(name.as_str()))
            })
            .collect();
        missing.sort_by(|a, b| b.total_official_games.cmp(&a.total_official_games));
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameEntry;

    fn console(name: &str, total: u64) -> ConsoleInfo {
        ConsoleInfo {
            console: name.to_string(),
            manufacturer: "Sega".to_string(),
            generation: 4,
            release_year: 1988,
            discontinuation_year: 1997,
            total_official_games: total,
        }
    }

    fn database(name: &str, games: usize) -> ConsoleDatabase {
        let data = GameDatabase {
            games: vec![GameEntry::default(); games],
            last_updated: Some("2024-05-01".to_string()),
        };
        let filename = format!("{}{}", name.to_lowercase().replace(' ', "_"), DATABASE_SUFFIX);
        ConsoleDatabase::new(name, filename, data)
    }

    #[test]
    fn test_console_name_from_filename() {
        assert_eq!(console_name_from_filename("snes_games.json").as_deref(), Some("Snes"));
        assert_eq!(
            console_name_from_filename("neo_geo_cd_games.json").as_deref(),
            Some("Neo Geo Cd")
        );
        assert_eq!(console_name_from_filename("notes.json"), None);
    }

    #[test]
    fn test_status_tiers() {
        assert_eq!(ProgressStatus::from_percentage(100.0), ProgressStatus::Complete);
        assert_eq!(ProgressStatus::from_percentage(120.0), ProgressStatus::Complete);
        assert_eq!(ProgressStatus::from_percentage(75.0), ProgressStatus::NearlyDone);
        assert_eq!(ProgressStatus::from_percentage(50.0), ProgressStatus::InProgress);
        assert_eq!(ProgressStatus::from_percentage(25.0), ProgressStatus::Started);
        assert_eq!(ProgressStatus::from_percentage(0.1), ProgressStatus::Minimal);
        assert_eq!(ProgressStatus::from_percentage(0.0), ProgressStatus::NotStarted);
        assert_eq!(ProgressStatus::Started.label(), "🟠 Started");
    }

    #[test]
    fn test_progress_sorted_and_rounded() {
        let tracker = ProgressTracker::from_parts(
            vec![console("Sega Genesis", 900), console("Sega Saturn", 3), console("Sega CD", 200)],
            vec![database("Genesis", 300), database("Saturn", 3)],
        );

        let progress = tracker.calculate_progress();
        assert_eq!(progress.len(), 2);
        assert_eq!(progress[0].console, "Sega Saturn");
        assert_eq!(progress[0].status, ProgressStatus::Complete);
        assert_eq!(progress[1].console, "Sega Genesis");
        assert_eq!(progress[1].percentage_complete, 33.33);
        assert_eq!(progress[1].status, ProgressStatus::Started);
        assert_eq!(progress[1].last_updated, "2024-05-01");
    }

    #[test]
    fn test_unmatched_database_is_ignored() {
        let tracker = ProgressTracker::from_parts(vec![console("Sega Genesis", 900)], vec![database("Jaguar", 10)]);
        assert!(tracker.calculate_progress().is_empty());
        assert_eq!(tracker.missing_consoles().len(), 1);
    }

    #[test]
    fn test_zero_total_is_zero_percent() {
        let tracker = ProgressTracker::from_parts(vec![console("Sega Pico", 0)], vec![database("Pico", 4)]);
        let progress = tracker.calculate_progress();
        assert_eq!(progress[0].percentage_complete, 0.0);
        assert_eq!(progress[0].status, ProgressStatus::NotStarted);
    }

    #[test]
    fn test_summary_and_missing() {
        let tracker = ProgressTracker::from_parts(
            vec![console("Sega Genesis", 900), console("Sega Saturn", 1000), console("Sega CD", 200)],
            vec![database("Genesis", 450)],
        );

        let summary = tracker.summary();
        assert_eq!(summary.total_consoles, 3);
        assert_eq!(summary.databases_created, 1);
        assert_eq!(summary.coverage_percent, 33.3);
        assert_eq!(summary.games_current, 450);
        assert_eq!(summary.games_target, 900);
        assert_eq!(summary.overall_percent, 50.0);

        let missing: Vec<&str> = tracker.missing_consoles().iter().map(|c| c.console.as_str()).collect();
        assert_eq!(missing, vec!["Sega Saturn", "Sega CD"]);
    }

    #[test]
    fn test_database_covers_every_matching_console() {
        let tracker = ProgressTracker::from_parts(
            vec![console("Sega Genesis", 900), console("Sega Saturn", 1000), console("Atari Jaguar", 50)],
            vec![database("Sega", 120)],
        );

        let missing: Vec<&str> = tracker.missing_consoles().iter().map(|c| c.console.as_str()).collect();
        assert_eq!(missing, vec!["Atari Jaguar"]);
    }

    #[test]
    fn test_empty_reference_list() {
        let summary = ProgressTracker::default().summary();
        assert_eq!(summary.coverage_percent, 0.0);
        assert_eq!(summary.overall_percent, 0.0);
    }
}
