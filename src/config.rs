use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::Board;

const APP_NAME: &str = "taskboard";
const CONFIG_FILE: &str = "config.json";

/// A column in the configured layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnConfig {
    pub key: String,
    pub title: String,
}

impl ColumnConfig {
    fn new(key: &str, title: &str) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
        }
    }
}

/// Board configuration, read from `config.json` in the user's config directory.
///
/// Environment overrides:
/// - `TASKBOARD_CONFIG`: path to the config file
/// - `TASKBOARD_DB`: path to the SQLite database
/// - `TASKBOARD_PORT`: HTTP port for `serve`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Column layout used when no board has been stored yet.
    pub columns: Vec<ColumnConfig>,
    /// Key of the column new tasks land in.
    pub default_column: String,
    /// People tasks may be assigned to.
    pub team: Vec<String>,
    /// Database location. Defaults to the platform data directory.
    pub database_path: Option<PathBuf>,
    /// Start a fresh board with the demo tasks instead of empty columns.
    pub seed_sample_tasks: bool,
    pub port: u16,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            columns: vec![
                ColumnConfig::new("todo", "To Do"),
                ColumnConfig::new("inProgress", "In Progress"),
                ColumnConfig::new("done", "Done"),
            ],
            default_column: "todo".to_string(),
            team: vec!["John".to_string(), "Mike".to_string(), "Tom".to_string()],
            database_path: None,
            seed_sample_tasks: false,
            port: 3000,
        }
    }
}

impl BoardConfig {
    /// Load configuration, applying environment overrides.
    /// Returns defaults if the file doesn't exist or fails to parse.
    pub fn load() -> Self {
        let mut config = match Self::try_load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        config.apply_env();
        config
    }

    fn try_load() -> Result<Self> {
        let config_path = match std::env::var_os("TASKBOARD_CONFIG") {
            Some(path) => PathBuf::from(path),
            None => get_config_path()?,
        };
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(&config_path)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Some(path) = std::env::var_os("TASKBOARD_DB") {
            self.database_path = Some(PathBuf::from(path));
        }
        if let Some(port) = std::env::var("TASKBOARD_PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.port = port;
        }
    }

    /// Check that the layout is usable before any board is built from it.
    pub fn validate(&self) -> Result<()> {
        if !self.columns.iter().any(|c| c.key == self.default_column) {
            anyhow::bail!(
                "Default column '{}' is not in the column layout",
                self.default_column
            );
        }
        if self.team.is_empty() {
            anyhow::bail!("Team roster must list at least one member");
        }
        Ok(())
    }

    pub fn is_team_member(&self, name: &str) -> bool {
        self.team.iter().any(|member| member == name)
    }

    /// The board a fresh store starts with: the configured layout, plus the
    /// demo tasks when `seed_sample_tasks` is set. Demo tasks keep their
    /// sample column where the layout has the same key and land in the
    /// default column otherwise.
    pub fn initial_board(&self) -> Board {
        let mut board = Board::from_layout(
            self.columns
                .iter()
                .map(|c| (c.key.clone(), c.title.clone())),
        );
        if !self.seed_sample_tasks || board.columns.is_empty() {
            return board;
        }

        let fallback = board.column_index(&self.default_column).unwrap_or(0);
        for sample_column in Board::sample().columns {
            let index = board
                .column_index(&sample_column.key)
                .unwrap_or(fallback);
            board.columns[index].tasks.extend(sample_column.tasks);
        }
        board
    }
}

fn get_config_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", APP_NAME)
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    Ok(dirs.config_dir().join(CONFIG_FILE))
}
