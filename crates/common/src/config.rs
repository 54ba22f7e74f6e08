//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Security configuration.
    pub security: SecurityConfig,
    /// Favorites behavior configuration.
    #[serde(default)]
    pub favorites: FavoritesConfig,
    /// User-facing terminology.
    #[serde(default)]
    pub labels: LabelsConfig,
    /// Per-user provisioning defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Legacy bookmark import.
    #[serde(default)]
    pub legacy: LegacyConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this instance.
    pub url: String,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Security configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// Secret used to sign capability tokens.
    pub capability_secret: String,
}

/// Favorites behavior configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FavoritesConfig {
    /// Supported target kinds.
    #[serde(default = "default_kinds")]
    pub kinds: Vec<String>,
    /// Dashboard page size.
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    /// Default dashboard view ("favorites" or "lists").
    #[serde(default = "default_view")]
    pub default_view: String,
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            kinds: default_kinds(),
            per_page: default_per_page(),
            default_view: default_view(),
        }
    }
}

/// User-facing terminology for notices.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelsConfig {
    /// Singular label for a favorite.
    #[serde(default = "default_favorite_singular")]
    pub favorite_singular: String,
    /// Plural label for favorites.
    #[serde(default = "default_favorite_plural")]
    pub favorite_plural: String,
    /// Singular label for a list.
    #[serde(default = "default_list_singular")]
    pub list_singular: String,
    /// Plural label for lists.
    #[serde(default = "default_list_plural")]
    pub list_plural: String,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            favorite_singular: default_favorite_singular(),
            favorite_plural: default_favorite_plural(),
            list_singular: default_list_singular(),
            list_plural: default_list_plural(),
        }
    }
}

/// Per-user provisioning defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefaultsConfig {
    /// List names created for each new user.
    #[serde(default)]
    pub lists: Vec<String>,
}

/// Legacy bookmark import configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyConfig {
    /// Whether the one-time legacy bookmark import is enabled.
    #[serde(default)]
    pub import_enabled: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

fn default_kinds() -> Vec<String> {
    vec!["post".to_string()]
}

const fn default_per_page() -> u64 {
    25
}

fn default_view() -> String {
    "favorites".to_string()
}

fn default_favorite_singular() -> String {
    "favorite".to_string()
}

fn default_favorite_plural() -> String {
    "favorites".to_string()
}

fn default_list_singular() -> String {
    "list".to_string()
}

fn default_list_plural() -> String {
    "lists".to_string()
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `FAVED_ENV`)
    /// 3. Environment variables with `FAVED_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("FAVED_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("FAVED")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("FAVED")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
