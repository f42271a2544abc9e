use std::path::PathBuf;

use directories::ProjectDirs;
use serde::Deserialize;

/// Application configuration loaded from TOML config file.
/// All fields have sensible defaults; the config file is optional.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Custom database path (overrides XDG default).
    pub db_path: Option<PathBuf>,
    /// Fixed RNG seed for reproducible picks (unset = fresh entropy per run).
    pub seed: Option<u64>,
    /// Good/bad selection settings.
    pub recommend: RecommendationConfig,
    /// Playlist-name generation settings.
    pub naming: NamingConfig,
    /// Lyric lookup settings.
    pub lyrics: LyricsConfig,
}

/// How far into the ranking each mode may reach.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    /// "Good" picks come from this many nearest catalog entries.
    pub similar_pool: usize,
    /// "Bad" picks come from this many farthest catalog entries.
    pub dissimilar_pool: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            similar_pool: 100,
            dissimilar_pool: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Phrases shorter than this are never picked.
    pub min_words: usize,
    /// Phrases up to this length are used whole; longer ones are cut to two words.
    pub max_whole_words: usize,
    /// Words a two-word name may not start or end with.
    pub conjunctions: Vec<String>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            min_words: 3,
            max_whole_words: 4,
            conjunctions: vec!["and".into(), "or".into(), "but".into()],
        }
    }
}

/// LRCLIB-compatible lyrics API configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LyricsConfig {
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Rate limit between API requests in milliseconds.
    pub rate_limit_ms: u64,
    /// Stop fetching once one track's lyrics have been found.
    pub stop_after_first: bool,
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://lrclib.net".to_string(),
            timeout_secs: 10,
            rate_limit_ms: 250,
            stop_after_first: false,
        }
    }
}

impl AppConfig {
    /// Load config from `~/.config/moodswing/config.toml`.
    /// Returns default config if file doesn't exist.
    /// Logs a warning if the file exists but can't be parsed.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) if path.exists() => match std::fs::read_to_string(&path) {
                Ok(contents) => match Self::parse(&contents) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", path.display());
                        config
                    }
                    Err(e) => {
                        log::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                        Self::default()
                    }
                },
                Err(e) => {
                    log::warn!("Failed to read {}: {}. Using defaults.", path.display(), e);
                    Self::default()
                }
            },
            _ => {
                log::debug!("No config file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Get the config file path.
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", crate::APP_NAME)
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// Resolve the default database path using XDG data directory.
pub fn default_db_path() -> PathBuf {
    if let Some(dirs) = ProjectDirs::from("", "", crate::APP_NAME) {
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir).ok();
        data_dir.join("moodswing.db")
    } else {
        // Fallback: current directory
        PathBuf::from("moodswing.db")
    }
}
