use cardtable_core::game::definition::{
    DEFAULT_GAME_NAME, DEFAULT_MAX_ROUNDS, DEFAULT_ROUND_POINTS, EndPrecedence, GameDefinition,
};
use cardtable_core::game::round::standard_steps;
use cardtable_core::model::deck::DeckSize;
use cardtable_core::model::player::{CardChooser, Player, PlayerKind, RandomChooser};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::Level;

use crate::input::ConsoleChooser;

const DEFAULT_DECK_SIZE: u32 = 32;
const DEFAULT_LOG_FILE: &str = "cardtable.log";

/// Root table configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TableConfig {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default = "default_players")]
    pub players: Vec<PlayerConfig>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            players: default_players(),
            seed: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl TableConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: TableConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        let deck = self.game.validate()?;
        self.logging.validate()?;
        validate_players(&self.players)?;

        if self.game.round_points == 0 && self.definition()?.score_limit_decides() {
            return Err(ValidationError::InvalidField {
                field: "game.round_points".to_string(),
                message: format!(
                    "score limit {} can never be reached with 0 points per round",
                    self.game.max_score
                ),
            });
        }

        let players = self.players.len();
        if deck.card_count() % players != 0 {
            return Err(ValidationError::InvalidField {
                field: "players".to_string(),
                message: format!(
                    "{} cards cannot be dealt evenly to {players} players",
                    deck.card_count()
                ),
            });
        }
        Ok(())
    }

    /// Turns every player into an automated one.
    pub fn automate_all(&mut self) {
        for player in &mut self.players {
            player.kind = PlayerKind::Automated;
        }
    }

    pub fn definition(&self) -> Result<GameDefinition, ValidationError> {
        let deck = self.game.deck()?;
        Ok(GameDefinition::new(self.game.name.clone())
            .with_deck_size(deck)
            .with_max_rounds(self.game.max_rounds)
            .with_max_score(self.game.max_score)
            .with_precedence(self.game.precedence)
            .with_steps(standard_steps(self.game.round_points)))
    }

    /// Players reading interactive choices from the process console.
    pub fn players(&self) -> Vec<Player> {
        let stdin = ConsoleChooser::stdin_reader();
        self.build_players(|| Box::new(ConsoleChooser::stdio(Arc::clone(&stdin))))
    }

    /// Players whose interactive members get a chooser from `interactive`.
    pub fn build_players<F>(&self, mut interactive: F) -> Vec<Player>
    where
        F: FnMut() -> Box<dyn CardChooser>,
    {
        self.players
            .iter()
            .map(|player| {
                let chooser: Box<dyn CardChooser> = match player.kind {
                    PlayerKind::Interactive => interactive(),
                    PlayerKind::Automated => Box::new(RandomChooser),
                };
                Player::with_chooser(player.name.clone(), player.kind, chooser)
                    .with_visibility(player.is_visible())
            })
            .collect()
    }
}

/// Game block: deck, end-of-match limits and scoring.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct GameConfig {
    #[serde(default = "default_game_name")]
    pub name: String,
    #[serde(default = "default_deck_size")]
    pub deck_size: u32,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
    #[serde(default)]
    pub max_score: u32,
    #[serde(default)]
    pub precedence: EndPrecedence,
    #[serde(default = "default_round_points")]
    pub round_points: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            name: default_game_name(),
            deck_size: default_deck_size(),
            max_rounds: default_max_rounds(),
            max_score: 0,
            precedence: EndPrecedence::default(),
            round_points: default_round_points(),
        }
    }
}

impl GameConfig {
    fn validate(&self) -> Result<DeckSize, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "game.name".to_string(),
                message: "game name must not be empty".to_string(),
            });
        }
        self.deck()
    }

    pub fn deck(&self) -> Result<DeckSize, ValidationError> {
        DeckSize::from_count(self.deck_size).ok_or_else(|| ValidationError::InvalidField {
            field: "game.deck_size".to_string(),
            message: format!("deck size must be 32 or 54, got {}", self.deck_size),
        })
    }
}

fn default_game_name() -> String {
    DEFAULT_GAME_NAME.to_string()
}

fn default_deck_size() -> u32 {
    DEFAULT_DECK_SIZE
}

fn default_max_rounds() -> u32 {
    DEFAULT_MAX_ROUNDS
}

fn default_round_points() -> u32 {
    DEFAULT_ROUND_POINTS
}

/// One seat at the table.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PlayerConfig {
    pub name: String,
    #[serde(default = "default_kind")]
    pub kind: PlayerKind,
    /// Defaults to visible for interactive players only.
    #[serde(default)]
    pub visible: Option<bool>,
}

impl PlayerConfig {
    pub fn new(name: &str, kind: PlayerKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            visible: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
            .unwrap_or(self.kind == PlayerKind::Interactive)
    }
}

fn default_kind() -> PlayerKind {
    PlayerKind::Automated
}

fn default_players() -> Vec<PlayerConfig> {
    vec![
        PlayerConfig::new("you", PlayerKind::Interactive),
        PlayerConfig::new("left", PlayerKind::Automated),
        PlayerConfig::new("partner", PlayerKind::Automated),
        PlayerConfig::new("right", PlayerKind::Automated),
    ]
}

fn validate_players(players: &[PlayerConfig]) -> Result<(), ValidationError> {
    if players.is_empty() {
        return Err(ValidationError::InvalidField {
            field: "players".to_string(),
            message: "at least one player must be seated".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for (index, player) in players.iter().enumerate() {
        if player.name.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: format!("players[{index}].name"),
                message: "player name must not be empty".to_string(),
            });
        }

        if !seen.insert(player.name.as_str()) {
            return Err(ValidationError::InvalidField {
                field: "players".to_string(),
                message: format!("player name '{}' used more than once", player.name),
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Log file settings; logging is on by default.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
    #[serde(default = "default_tracing_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            file: default_log_file(),
            level: default_tracing_level(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingConfig {
    fn validate(&mut self) -> Result<(), ValidationError> {
        if self.level.trim().is_empty() {
            self.level = default_tracing_level();
        }
        if self.level().is_none() {
            return Err(ValidationError::InvalidField {
                field: "logging.level".to_string(),
                message: format!("unknown tracing level '{}'", self.level),
            });
        }
        if self.enabled && self.file.as_os_str().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "logging.file".to_string(),
                message: "log file path must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn level(&self) -> Option<Level> {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}

fn default_tracing_level() -> String {
    "info".to_string()
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
