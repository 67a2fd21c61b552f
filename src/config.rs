//! Application configuration.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
    value::Uncased,
};

use music_clicker_model::item::DEFAULT_GENRES;

use serde::{Deserialize, Serialize};

use anyhow::Error;

/// Full application configuration.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// General server configuration.
    pub server: ServerConfig,
    /// HTTP server configuration.
    pub http: HttpConfig,
    /// Authentication configuration.
    pub auth: AuthConfig,
    /// Game balance.
    pub game: GameConfig,
}

/// General server configuration.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Where user records are kept when no database is configured.
    pub data_dir: PathBuf,
    /// The database url to connect to.
    ///
    /// If this is set, user records are stored in the database instead of
    /// [`ServerConfig::data_dir`]. Use `sqlite://<path>?mode=rwc` to create
    /// the database file if it doesn't exist.
    pub database_url: Option<String>,
    /// The origin of the frontend, for CORS.
    ///
    /// If this is `None`, cross-origin requests are not allowed.
    pub frontend_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            data_dir: PathBuf::from("data"),
            database_url: None,
            frontend_origin: None,
        }
    }
}

/// HTTP server configuration.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct HttpConfig {
    /// The port to listen on.
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig { port: 3000 }
    }
}

/// Authentication configuration.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Secret used to sign login tokens.
    ///
    /// Without a secret, clients identify themselves with a bare username in
    /// the `x-username` header and nothing stops them from claiming any
    /// username they like.
    pub secret: Option<String>,
}

/// Game balance configuration.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GameConfig {
    /// How much a pack costs.
    pub pack_cost: f64,
    /// How many items are in a pack.
    pub pack_size: usize,
    /// How many items of each kind can be equipped at once.
    pub max_equipped: usize,
    /// The genres items are minted in.
    pub genres: Vec<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            pack_cost: 1_000.0,
            pack_size: 5,
            max_equipped: 4,
            genres: DEFAULT_GENRES.iter().map(|&genre| genre.to_owned()).collect(),
        }
    }
}

/// Reads the configuration.
pub fn read_config(config_file: impl AsRef<Path>) -> Result<Config, Error> {
    let config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(config_file))
        .merge(Env::prefixed("MUSICCLICKER_").split("__"))
        .merge(Env::raw().filter_map(|k| match k.as_str() {
            "DATABASE_URL" => Some(Uncased::from("server.database_url")),
            "DATA_DIR" => Some(Uncased::from("server.data_dir")),
            "FRONTEND_ORIGIN" => Some(Uncased::from("server.frontend_origin")),
            "AUTH_SECRET" => Some(Uncased::from("auth.secret")),
            "PORT" => Some(Uncased::from("http.port")),
            _ => None,
        }))
        .extract::<Config>()?;

    if config.game.genres.is_empty() {
        return Err(Error::msg("`game.genres` must name at least one genre"));
    }

    Ok(config)
}
